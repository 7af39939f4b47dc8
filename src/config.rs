// Copyright (c) Sienna Satterwhite, CesiumDB Contributors
// SPDX-License-Identifier: GPL-3.0-only WITH Classpath-exception-2.0

use getset::CopyGetters;

use crate::errs::{
    Result,
    SkipListError,
};

/// The default level ceiling. With a promotion probability of one half this
/// keeps the expected height sane for lists on the order of 2^32 elements.
pub const DEFAULT_MAX_LEVEL: usize = 32;

/// The default chance that a node linked at level `i` is also linked at level
/// `i + 1`.
pub const DEFAULT_PROBABILITY: f64 = 0.5;

/// Upper bound on `max_level`. At one half, 64 levels already cover more
/// elements than fit in memory.
pub const MAX_LEVEL_CEILING: usize = 64;

/// Construction parameters for an
/// [`OrderedSkipList`](crate::skiplist::OrderedSkipList).
///
/// Levels are zero-indexed, so a list configured with `max_level` has
/// `max_level + 1` levels in total.
#[derive(Clone, Copy, Debug, PartialEq, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct SkipListConfig {
    /// Highest level a node may be promoted to. Must be at least 1.
    max_level: usize,
    /// Promotion probability, in the open interval `(0, 1)`.
    probability: f64,
    /// Seed for the level generator. `None` seeds from entropy.
    seed: Option<u64>,
}

impl SkipListConfig {
    pub fn new(max_level: usize, probability: f64) -> Result<Self> {
        let config = Self {
            max_level,
            probability,
            seed: None,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_max_level(mut self, max_level: usize) -> Self {
        self.max_level = max_level;
        self
    }

    pub fn with_probability(mut self, probability: f64) -> Self {
        self.probability = probability;
        self
    }

    /// Fixes the level generator's seed so that node heights are reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_level < 1 {
            return Err(SkipListError::InvalidConfig {
                reason: "max_level must be > 0",
            });
        }
        if self.max_level > MAX_LEVEL_CEILING {
            return Err(SkipListError::InvalidConfig {
                reason: "max_level must be <= 64",
            });
        }
        // written this way so NaN is rejected too
        if !(self.probability > 0.0 && self.probability < 1.0) {
            return Err(SkipListError::InvalidConfig {
                reason: "probability must be in (0, 1)",
            });
        }
        Ok(())
    }
}

impl Default for SkipListConfig {
    fn default() -> Self {
        Self {
            max_level: DEFAULT_MAX_LEVEL,
            probability: DEFAULT_PROBABILITY,
            seed: None,
        }
    }
}

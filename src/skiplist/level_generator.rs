// Copyright (c) Sienna Satterwhite, CesiumDB Contributors
// SPDX-License-Identifier: GPL-3.0-only WITH Classpath-exception-2.0

use rand::prelude::*;

use crate::{
    config::SkipListConfig,
    errs::{
        Result,
        SkipListError,
    },
};

/// Upon the insertion of a new node in the list, the node is replicated to high
/// levels with a certain probability as determined by a `LevelGenerator`.
pub trait LevelGenerator {
    /// The total number of levels that are assumed to exist for this level
    /// generator.
    fn total(&self) -> usize;
    /// Generate a random level for a new node in the range `[0, total)`.
    ///
    /// This must never return a level that is `>= self.total()`.
    fn random(&mut self) -> usize;
}

/// A level generator which will produce geometrically distributed numbers.
///
/// Each draw starts at level 0 and keeps climbing while a uniform sample falls
/// below `p`, so the probability of generating level `n` is `p` times the
/// probability of generating level `n-1`, truncated at the top level.
#[derive(Debug)]
pub struct GeometricalLevelGenerator {
    total: usize,
    p: f64,
    rng: SmallRng, // Fast generator
}

impl GeometricalLevelGenerator {
    /// Create a new GeometricalLevelGenerator with `total` number of levels,
    /// and `p` as the probability that a given node is present in the next
    /// level.
    ///
    /// `p` must be between 0 and 1 (exclusive) and `total` must be at least 2,
    /// i.e. the base level plus one level to promote into.
    pub fn new(total: usize, p: f64) -> Result<Self> {
        Self::with_rng(total, p, SmallRng::from_entropy())
    }

    /// Same as [`GeometricalLevelGenerator::new`] but with a reproducible
    /// sequence of levels.
    pub fn with_seed(total: usize, p: f64, seed: u64) -> Result<Self> {
        Self::with_rng(total, p, SmallRng::seed_from_u64(seed))
    }

    pub fn from_config(config: &SkipListConfig) -> Result<Self> {
        config.validate()?;
        let total = config.max_level() + 1;
        match config.seed() {
            | Some(seed) => Self::with_seed(total, config.probability(), seed),
            | None => Self::new(total, config.probability()),
        }
    }

    fn with_rng(total: usize, p: f64, rng: SmallRng) -> Result<Self> {
        if total < 2 {
            return Err(SkipListError::InvalidConfig {
                reason: "max_level must be > 0",
            });
        }
        if !(p > 0.0 && p < 1.0) {
            return Err(SkipListError::InvalidConfig {
                reason: "probability must be in (0, 1)",
            });
        }
        Ok(GeometricalLevelGenerator { total, p, rng })
    }
}

impl LevelGenerator for GeometricalLevelGenerator {
    fn random(&mut self) -> usize {
        let mut h = 0;
        while h + 1 < self.total && self.rng.gen::<f64>() < self.p {
            h += 1;
        }
        h
    }

    fn total(&self) -> usize {
        self.total
    }
}

#[cfg(test)]
mod tests {
    use super::{
        GeometricalLevelGenerator,
        LevelGenerator,
    };
    use crate::{
        config::SkipListConfig,
        errs::SkipListError,
    };

    #[test]
    fn invalid_total() {
        assert!(GeometricalLevelGenerator::new(0, 0.5).is_err());
        assert!(GeometricalLevelGenerator::new(1, 0.5).is_err());
    }

    #[test]
    fn invalid_p_0() {
        assert!(GeometricalLevelGenerator::new(2, 0.0).is_err());
    }

    #[test]
    fn invalid_p_1() {
        assert!(GeometricalLevelGenerator::new(2, 1.0).is_err());
    }

    #[test]
    fn new() {
        assert!(GeometricalLevelGenerator::new(2, 0.5).is_ok());
    }

    #[test]
    fn test_levels_stay_in_range() {
        let mut lg = GeometricalLevelGenerator::with_seed(4, 0.9, 11).unwrap();
        for _ in 0..10_000 {
            assert!(lg.random() < lg.total());
        }
    }

    #[test]
    fn test_from_config_rejects_huge_levels() {
        let config = SkipListConfig::default().with_max_level(usize::MAX);
        assert!(matches!(
            GeometricalLevelGenerator::from_config(&config),
            Err(SkipListError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_seeded_generators_agree() {
        let config = SkipListConfig::default().with_seed(42);
        let mut a = GeometricalLevelGenerator::from_config(&config).unwrap();
        let mut b = GeometricalLevelGenerator::from_config(&config).unwrap();
        let left: Vec<usize> = (0..256).map(|_| a.random()).collect();
        let right: Vec<usize> = (0..256).map(|_| b.random()).collect();
        assert_eq!(left, right);
    }

    #[test]
    fn test_distribution_is_roughly_geometric() {
        const DRAWS: usize = 100_000;
        let mut lg = GeometricalLevelGenerator::with_seed(33, 0.5, 3).unwrap();
        let mut base = 0;
        let mut promoted = 0;
        for _ in 0..DRAWS {
            match lg.random() {
                | 0 => base += 1,
                | _ => promoted += 1,
            }
        }
        // p = 0.5, so about half the nodes never leave level 0
        let ratio = base as f64 / DRAWS as f64;
        assert!((0.45..0.55).contains(&ratio), "ratio was {}", ratio);
        assert_eq!(base + promoted, DRAWS);
    }
}

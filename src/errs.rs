// Copyright (c) Sienna Satterwhite, CesiumDB Contributors
// SPDX-License-Identifier: GPL-3.0-only WITH Classpath-exception-2.0

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SkipListError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SkipListError {
    #[error("invalid skiplist configuration: {reason}")]
    InvalidConfig { reason: &'static str },
    /// The value has no place in the ordering, e.g. a float `NaN`, which
    /// doesn't even compare equal to itself.
    #[error("value is null or cannot be ordered")]
    NullValue,
    #[error("index {index} is out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("destination holds {available} slots but {needed} are required")]
    InsufficientCapacity { needed: usize, available: usize },
    #[error("skiplist was modified during iteration (expected version {expected}, found {found})")]
    ConcurrentModification { expected: u64, found: u64 },
    #[error("cursor was created by a different skiplist")]
    ForeignCursor,
}

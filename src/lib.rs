// Copyright (c) Sienna Satterwhite, CesiumDB Contributors
// SPDX-License-Identifier: GPL-3.0-only WITH Classpath-exception-2.0

/// Construction parameters and their defaults.
pub mod config;
pub mod errs;

/// A single-threaded, always-sorted [`skip list`].
///
/// [`skip list`]: https://en.wikipedia.org/wiki/Skip_list
pub mod skiplist;

pub use config::SkipListConfig;
pub use errs::{
    Result,
    SkipListError,
};
pub use skiplist::{
    Cursor,
    OrderedSkipList,
};

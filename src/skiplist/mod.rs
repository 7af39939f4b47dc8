//! An always-sorted skiplist which allows faster search than a standard
//! linked list, without any of the rebalancing a tree needs.
//!
//! SkipLists use a probabilistic distribution of nodes over the internal
//! levels, whereby the lowest level (level 0) contains all the nodes, and each
//! level `n > 0` will contain a random subset of the nodes on level `n - 1`.
//!
//! ```text
//! <head> ----------> [2] ----------------------------------> [9] ---------->
//! <head> ----------> [2] ------------------> [7] ----------> [9] ---------->
//! <head> --> [1] --> [2] --> [4] --> [5] --> [7] --> [8] --> [9] --> [10] ->
//! ```
//!
//! Most commonly, a geometric distribution is used whereby the chance that a
//! node occupies level `n` is `p` times the chance of occupying level `n-1`
//! (with `0 < p < 1`).
//!
//! It is very unlikely that this will need to be changed as the default should
//! suffice, but if need be custom level generators can be implemented.
//!
//! Nodes live in an arena and link to each other through handles, so the list
//! owns every node outright and nothing outside of it can hold on to one.

mod arena;
mod iter;
mod level_generator;
mod ordered_skiplist;
mod skipnode;

pub use iter::{
    Cursor,
    IntoIter,
    Iter,
};
pub use level_generator::{
    GeometricalLevelGenerator,
    LevelGenerator,
};
pub use ordered_skiplist::OrderedSkipList;

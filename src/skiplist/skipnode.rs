// Copyright (c) Sienna Satterwhite, CesiumDB Contributors
// SPDX-License-Identifier: GPL-3.0-only WITH Classpath-exception-2.0

use crate::skiplist::arena::Handle;

/// A value plus one forward link per level the node is linked at.
///
/// `forward[i]` is the next node at level `i`, so a node of level `n` carries
/// `n + 1` links and shows up in every level from 0 through `n`.
#[derive(Debug)]
pub(crate) struct SkipNode<T> {
    pub(crate) value: T,
    pub(crate) forward: Vec<Option<Handle>>,
}

impl<T> SkipNode<T> {
    pub(crate) fn new(value: T, level: usize) -> Self {
        SkipNode {
            value,
            forward: vec![None; level + 1],
        }
    }

    /// The highest level this node is linked at.
    #[inline]
    pub(crate) fn level(&self) -> usize {
        self.forward.len() - 1
    }

    #[inline]
    pub(crate) fn next(&self) -> Option<Handle> {
        self.forward[0]
    }
}

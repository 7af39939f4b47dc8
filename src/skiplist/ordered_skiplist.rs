// Copyright (c) Sienna Satterwhite, CesiumDB Contributors
// SPDX-License-Identifier: GPL-3.0-only WITH Classpath-exception-2.0

use std::{
    cmp::Ordering,
    fmt,
    ops,
    sync::atomic::{
        AtomicU64,
        Ordering::Relaxed,
    },
};

use tracing::{
    debug,
    instrument,
    trace,
};

use crate::{
    config::SkipListConfig,
    errs::{
        Result,
        SkipListError,
    },
    skiplist::{
        arena::{
            Arena,
            Handle,
        },
        iter::{
            Cursor,
            IntoIter,
            Iter,
        },
        level_generator::{
            GeometricalLevelGenerator,
            LevelGenerator,
        },
        skipnode::SkipNode,
    },
};

/// Source of list identities, so a cursor can tell which list made it.
static NEXT_LIST_ID: AtomicU64 = AtomicU64::new(0);

/// Where a walk currently stands: on the head sentinel or on a real node.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Position {
    Head,
    Node(Handle),
}

/// An always-sorted, duplicate-tolerant skiplist.
///
/// Elements are ordered with [`PartialOrd`]. Values that cannot be ordered
/// against themselves (a float `NaN`, for instance) are refused with
/// [`SkipListError::NullValue`], so every stored element has a place in the
/// order. Equal elements are all kept; their relative order is unspecified.
///
/// Indexed access walks the base level and is `O(n)`; nodes don't carry rank
/// annotations.
///
/// # Examples
///
/// ```
/// use cesium_skiplist::OrderedSkipList;
///
/// let mut list = OrderedSkipList::default();
/// list.insert(5).unwrap();
/// list.insert(1).unwrap();
/// list.insert(3).unwrap();
///
/// assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![1, 3, 5]);
/// assert_eq!(list.at(2), Ok(&5));
/// assert_eq!(list.remove(&3), Ok(true));
/// assert!(!list.contains(&3));
/// assert_eq!(list.len(), 2);
/// ```
pub struct OrderedSkipList<T> {
    /// Forward links of the head sentinel, one per configured level.
    pub(crate) head: Vec<Option<Handle>>,
    pub(crate) nodes: Arena<SkipNode<T>>,
    config: SkipListConfig,
    level_generator: Box<dyn LevelGenerator>,
    /// Highest level holding at least one real node.
    level: usize,
    pub(crate) len: usize,
    pub(crate) version: u64,
    pub(crate) id: u64,
}

#[inline]
fn is_less<T: PartialOrd>(a: &T, b: &T) -> bool {
    matches!(a.partial_cmp(b), Some(Ordering::Less))
}

#[inline]
fn is_equal<T: PartialOrd>(a: &T, b: &T) -> bool {
    matches!(a.partial_cmp(b), Some(Ordering::Equal))
}

#[inline]
fn ensure_ordered<T: PartialOrd>(value: &T) -> Result<()> {
    match is_equal(value, value) {
        | true => Ok(()),
        | false => Err(SkipListError::NullValue),
    }
}

impl<T> OrderedSkipList<T> {
    /// Creates an empty list with `max_level` as the level ceiling and
    /// `probability` as the per-level promotion chance.
    pub fn new(max_level: usize, probability: f64) -> Result<Self> {
        Self::with_config(SkipListConfig::new(max_level, probability)?)
    }

    pub fn with_config(config: SkipListConfig) -> Result<Self> {
        config.validate()?;
        let generator = GeometricalLevelGenerator::from_config(&config)?;
        Self::with_level_generator(config, generator)
    }

    /// Creates an empty list whose node heights come from `generator`.
    ///
    /// The generator must cover exactly the configured levels, i.e.
    /// `generator.total() == config.max_level() + 1`.
    pub fn with_level_generator<G>(config: SkipListConfig, generator: G) -> Result<Self>
    where
        G: LevelGenerator + 'static,
    {
        config.validate()?;
        if generator.total() != config.max_level() + 1 {
            return Err(SkipListError::InvalidConfig {
                reason: "level generator must cover max_level + 1 levels",
            });
        }

        Ok(OrderedSkipList {
            head: vec![None; config.max_level() + 1],
            nodes: Arena::new(),
            config,
            level_generator: Box::new(generator),
            level: 0,
            len: 0,
            version: 0,
            id: NEXT_LIST_ID.fetch_add(1, Relaxed),
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn max_level(&self) -> usize {
        self.config.max_level()
    }

    #[inline]
    pub fn probability(&self) -> f64 {
        self.config.probability()
    }

    /// The highest level currently holding at least one element.
    #[inline]
    pub fn level(&self) -> usize {
        self.level
    }

    /// Structural mutation counter. Every successful insert, removal or clear
    /// bumps it by exactly one.
    #[inline]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Removes every element. Counts as a single mutation, even on an empty
    /// list.
    #[instrument(level = "debug", skip_all, fields(len = self.len))]
    pub fn clear(&mut self) {
        self.head.iter_mut().for_each(|link| *link = None);
        self.nodes.clear();
        self.len = 0;
        self.level = 0;
        self.version += 1;
    }

    pub fn front(&self) -> Option<&T> {
        self.head[0].map(|h| &self.nodes.get(h).value)
    }

    /// The largest element. Runs down the express lanes, so it's `O(log n)`
    /// expected rather than a full walk.
    pub fn back(&self) -> Option<&T> {
        let mut current = Position::Head;
        for lvl in (0..=self.level).rev() {
            while let Some(next) = self.forward(current, lvl) {
                current = Position::Node(next);
            }
        }
        match current {
            | Position::Head => None,
            | Position::Node(h) => Some(&self.nodes.get(h).value),
        }
    }

    /// Returns the element at `index` in sorted order.
    ///
    /// This walks the base level, so it is `O(index)`.
    #[instrument(level = "trace", skip(self))]
    pub fn at(&self, index: usize) -> Result<&T> {
        let handle = self.handle_at(index)?;
        Ok(&self.nodes.get(handle).value)
    }

    /// Like [`OrderedSkipList::at`], but `None` when out of range.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.at(index).ok()
    }

    /// Removes and returns the smallest element.
    pub fn pop_front(&mut self) -> Option<T> {
        let first = self.head[0]?;
        let node = self.nodes.take(first);
        // the first node is first on every level it reaches
        for lvl in 0..=node.level() {
            self.head[lvl] = node.forward[lvl];
        }
        self.shrink_level();
        self.len -= 1;
        self.version += 1;
        Some(node.value)
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self)
    }

    /// Returns a detached cursor over the list in ascending order.
    ///
    /// Unlike [`OrderedSkipList::iter`], the cursor doesn't borrow the list,
    /// so the list may be mutated while it is alive. Any such mutation
    /// invalidates the cursor and its next advance reports
    /// [`SkipListError::ConcurrentModification`].
    pub fn cursor(&self) -> Cursor {
        Cursor::new(self)
    }

    #[inline]
    fn forward(&self, at: Position, lvl: usize) -> Option<Handle> {
        match at {
            | Position::Head => self.head[lvl],
            | Position::Node(h) => self.nodes.get(h).forward[lvl],
        }
    }

    #[inline]
    fn set_forward(&mut self, at: Position, lvl: usize, link: Option<Handle>) {
        match at {
            | Position::Head => self.head[lvl] = link,
            | Position::Node(h) => self.nodes.get_mut(h).forward[lvl] = link,
        }
    }

    fn handle_at(&self, index: usize) -> Result<Handle> {
        let out_of_range = SkipListError::IndexOutOfRange {
            index,
            len: self.len,
        };
        if index >= self.len {
            return Err(out_of_range);
        }

        let mut current = self.head[0];
        for _ in 0..index {
            current = current.and_then(|h| self.nodes.get(h).next());
        }
        current.ok_or(out_of_range)
    }

    fn shrink_level(&mut self) {
        let before = self.level;
        while self.level > 0 && self.head[self.level].is_none() {
            self.level -= 1;
        }
        if self.level != before {
            trace!(from = before, to = self.level, "lowered skiplist level");
        }
    }

    /// Unlinks `candidate` along the `update` trail and hands back its value.
    fn unlink(&mut self, candidate: Handle, update: &[Position]) -> T {
        for (lvl, &prev) in update.iter().enumerate() {
            if self.forward(prev, lvl) != Some(candidate) {
                break;
            }
            let next = self.nodes.get(candidate).forward[lvl];
            self.set_forward(prev, lvl, next);
        }

        let node = self.nodes.take(candidate);
        self.shrink_level();
        self.len -= 1;
        self.version += 1;
        node.value
    }

    /// Checks every structural invariant, panicking on the first violation.
    #[cfg(test)]
    pub(crate) fn check(&self)
    where
        T: PartialOrd,
    {
        use std::collections::HashMap;

        assert_eq!(self.head.len(), self.max_level() + 1);
        assert!(self.level <= self.max_level());
        assert!(self.head[self.level + 1..].iter().all(Option::is_none));
        if self.level > 0 {
            assert!(self.head[self.level].is_some(), "level {} is empty", self.level);
        }

        let mut rank = HashMap::new();
        let mut current = self.head[0];
        let mut prev: Option<&T> = None;
        while let Some(h) = current {
            assert!(rank.len() < self.len, "base chain is longer than len");
            let node = self.nodes.get(h);
            if let Some(prev) = prev {
                assert!(!is_less(&node.value, prev), "base chain is not sorted");
            }
            rank.insert(h, rank.len());
            prev = Some(&node.value);
            current = node.next();
        }
        assert_eq!(rank.len(), self.len);
        assert_eq!(self.nodes.len(), self.len);

        for lvl in 1..=self.level {
            let mut last = None;
            let mut current = self.head[lvl];
            while let Some(h) = current {
                let node = self.nodes.get(h);
                assert!(node.level() >= lvl);
                let here = rank[&h];
                if let Some(last) = last {
                    assert!(here > last, "level {} skips backwards", lvl);
                }
                last = Some(here);
                current = node.forward[lvl];
            }
        }
    }
}

impl<T: PartialOrd> OrderedSkipList<T> {
    /// Walks from the head down to level 0, stopping on each level at the last
    /// node whose value is less than `value`. `visit` sees that node for every
    /// level, top first. Returns the first node that isn't less than `value`.
    fn walk<F>(&self, value: &T, mut visit: F) -> Option<Handle>
    where
        F: FnMut(usize, Position),
    {
        let mut current = Position::Head;
        for lvl in (0..=self.level).rev() {
            while let Some(next) = self.forward(current, lvl) {
                if !is_less(&self.nodes.get(next).value, value) {
                    break;
                }
                current = Position::Node(next);
            }
            visit(lvl, current);
        }
        self.forward(current, 0)
    }

    /// Inserts `value`, keeping the list sorted. Duplicates are allowed.
    #[instrument(level = "debug", skip_all, fields(len = self.len, level = self.level))]
    pub fn insert(&mut self, value: T) -> Result<()> {
        ensure_ordered(&value)?;

        let mut update = vec![Position::Head; self.max_level() + 1];
        self.walk(&value, |lvl, at| update[lvl] = at);

        let node_level = self.level_generator.random();
        debug_assert!(node_level <= self.max_level());
        if node_level > self.level {
            // nothing has reached these levels yet, so the head precedes us
            for at in &mut update[self.level + 1..=node_level] {
                *at = Position::Head;
            }
            trace!(from = self.level, to = node_level, "raised skiplist level");
            self.level = node_level;
        }

        let handle = self.nodes.alloc(SkipNode::new(value, node_level));
        for (lvl, &prev) in update[..=node_level].iter().enumerate() {
            let next = self.forward(prev, lvl);
            self.nodes.get_mut(handle).forward[lvl] = next;
            self.set_forward(prev, lvl, Some(handle));
        }

        self.len += 1;
        self.version += 1;
        debug_assert_eq!(self.nodes.len(), self.len);
        Ok(())
    }

    /// Removes one element equal to `value`. Returns whether anything was
    /// removed; a missing value is not an error.
    #[instrument(level = "debug", skip_all, fields(len = self.len, level = self.level))]
    pub fn remove(&mut self, value: &T) -> Result<bool> {
        ensure_ordered(value)?;

        let mut update = vec![Position::Head; self.level + 1];
        let candidate = self
            .walk(value, |lvl, at| update[lvl] = at)
            .filter(|&h| is_equal(&self.nodes.get(h).value, value));

        match candidate {
            | Some(candidate) => {
                self.unlink(candidate, &update);
                Ok(true)
            },
            | None => {
                trace!("value not present");
                Ok(false)
            },
        }
    }

    /// Removes and returns the element at `index` in sorted order.
    #[instrument(level = "debug", skip(self), fields(len = self.len))]
    pub fn remove_at(&mut self, index: usize) -> Result<T> {
        let target = self.handle_at(index)?;

        let mut update = vec![Position::Head; self.level + 1];
        let candidate = self
            .walk(&self.nodes.get(target).value, |lvl, at| update[lvl] = at)
            .expect("an indexed node is reachable by its own value");

        Ok(self.unlink(candidate, &update))
    }

    #[instrument(level = "trace", skip_all)]
    pub fn contains(&self, value: &T) -> bool {
        if ensure_ordered(value).is_err() {
            return false;
        }
        self.walk(value, |_, _| {})
            .is_some_and(|h| is_equal(&self.nodes.get(h).value, value))
    }

    /// Position of the first element equal to `value` in sorted order.
    pub fn index_of(&self, value: &T) -> Option<usize> {
        self.iter().position(|v| is_equal(v, value))
    }

    /// Clones every element, in ascending order, into `buffer` starting at
    /// `offset`. Slots outside the copied range are left untouched.
    pub fn copy_to(&self, buffer: &mut [T], offset: usize) -> Result<()>
    where
        T: Clone,
    {
        if offset > buffer.len() {
            return Err(SkipListError::IndexOutOfRange {
                index: offset,
                len: buffer.len(),
            });
        }
        let available = buffer.len() - offset;
        if available < self.len {
            return Err(SkipListError::InsufficientCapacity {
                needed: self.len,
                available,
            });
        }

        for (slot, value) in buffer[offset..].iter_mut().zip(self.iter()) {
            slot.clone_from(value);
        }
        Ok(())
    }
}

impl<T> Default for OrderedSkipList<T> {
    fn default() -> Self {
        Self::with_config(SkipListConfig::default()).expect("default skiplist configuration is valid")
    }
}

impl<T: fmt::Debug> fmt::Debug for OrderedSkipList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> ops::Index<usize> for OrderedSkipList<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        match self.at(index) {
            | Ok(value) => value,
            | Err(e) => panic!("{}", e),
        }
    }
}

impl<T: PartialOrd> Extend<T> for OrderedSkipList<T> {
    /// # Panics
    ///
    /// Panics if an element cannot be ordered.
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            if let Err(e) = self.insert(value) {
                debug!(error = %e, "refusing to extend with an unordered value");
                panic!("{}", e);
            }
        }
    }
}

impl<T: PartialOrd> FromIterator<T> for OrderedSkipList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = OrderedSkipList::default();
        list.extend(iter);
        list
    }
}

impl<'a, T> IntoIterator for &'a OrderedSkipList<T> {
    type IntoIter = Iter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T> IntoIterator for OrderedSkipList<T> {
    type IntoIter = IntoIter<T>;
    type Item = T;

    fn into_iter(self) -> IntoIter<T> {
        IntoIter::new(self)
    }
}

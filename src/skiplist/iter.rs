// Copyright (c) Sienna Satterwhite, CesiumDB Contributors
// SPDX-License-Identifier: GPL-3.0-only WITH Classpath-exception-2.0

use std::iter::FusedIterator;

use tracing::{
    debug,
    instrument,
};

use crate::{
    errs::{
        Result,
        SkipListError,
    },
    skiplist::{
        arena::Handle,
        ordered_skiplist::OrderedSkipList,
    },
};

/// Borrowing iterator over a list in ascending order.
///
/// The shared borrow keeps the list from being mutated while this is alive.
/// Use [`Cursor`] to iterate without holding a borrow.
pub struct Iter<'a, T> {
    list: &'a OrderedSkipList<T>,
    next: Option<Handle>,
    remaining: usize,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(list: &'a OrderedSkipList<T>) -> Self {
        Iter {
            list,
            next: list.head[0],
            remaining: list.len,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.list.nodes.get(self.next?);
        self.next = node.next();
        self.remaining -= 1;
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum CursorState {
    Active,
    Exhausted,
    Invalidated { found: u64 },
}

/// A detached, forward-only position in a list.
///
/// A cursor remembers the list's version when it was created. Every
/// [`Cursor::advance`] first compares that snapshot against the live list; if
/// the list was mutated in between, the advance fails with
/// [`SkipListError::ConcurrentModification`] and the cursor stays invalid for
/// good. That check runs on every advance, including after the end has been
/// reached; until then an exhausted cursor keeps returning `Ok(None)`. Neither
/// can be rewound; ask the list for a fresh cursor instead.
///
/// Advancing against any list other than the one that created the cursor
/// fails with [`SkipListError::ForeignCursor`].
///
/// ```
/// use cesium_skiplist::{OrderedSkipList, SkipListError};
///
/// let mut list: OrderedSkipList<u32> = [3, 1, 2].into_iter().collect();
/// let mut cursor = list.cursor();
/// assert_eq!(cursor.advance(&list), Ok(Some(&1)));
///
/// list.insert(4).unwrap();
/// assert!(matches!(
///     cursor.advance(&list),
///     Err(SkipListError::ConcurrentModification { .. })
/// ));
/// ```
#[derive(Clone, Debug)]
pub struct Cursor {
    next: Option<Handle>,
    list_id: u64,
    version: u64,
    state: CursorState,
}

impl Cursor {
    pub(crate) fn new<T>(list: &OrderedSkipList<T>) -> Self {
        Cursor {
            next: list.head[0],
            list_id: list.id,
            version: list.version,
            state: CursorState::Active,
        }
    }

    /// The list version this cursor was created against.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Whether the cursor is exhausted or invalidated.
    pub fn is_terminal(&self) -> bool {
        self.state != CursorState::Active
    }

    /// Moves to the next element and returns it, or `Ok(None)` once the end is
    /// reached.
    #[instrument(level = "trace", skip_all, fields(version = self.version))]
    pub fn advance<'a, T>(&mut self, list: &'a OrderedSkipList<T>) -> Result<Option<&'a T>> {
        if let CursorState::Invalidated { found } = self.state {
            return Err(self.modified(found));
        }
        if list.id != self.list_id {
            return Err(SkipListError::ForeignCursor);
        }

        // checked even once exhausted, so a drained cursor still notices
        if list.version != self.version {
            debug!(
                expected = self.version,
                found = list.version,
                "cursor invalidated by a concurrent modification"
            );
            return Err(self.invalidate(list.version));
        }
        if self.state == CursorState::Exhausted {
            return Ok(None);
        }

        let Some(handle) = self.next else {
            self.state = CursorState::Exhausted;
            return Ok(None);
        };
        match list.nodes.try_get(handle) {
            | Some(node) => {
                self.next = node.next();
                Ok(Some(&node.value))
            },
            | None => Err(self.invalidate(list.version)),
        }
    }

    fn invalidate(&mut self, found: u64) -> SkipListError {
        self.state = CursorState::Invalidated { found };
        self.next = None;
        self.modified(found)
    }

    fn modified(&self, found: u64) -> SkipListError {
        SkipListError::ConcurrentModification {
            expected: self.version,
            found,
        }
    }
}

/// Owning iterator, yielding elements in ascending order.
pub struct IntoIter<T> {
    list: OrderedSkipList<T>,
}

impl<T> IntoIter<T> {
    pub(crate) fn new(list: OrderedSkipList<T>) -> Self {
        IntoIter { list }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.list.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.list.len(), Some(self.list.len()))
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{
        config::SkipListConfig,
        errs::SkipListError,
        skiplist::ordered_skiplist::OrderedSkipList,
    };

    fn list_of(values: &[i64]) -> OrderedSkipList<i64> {
        let mut list = OrderedSkipList::with_config(SkipListConfig::default().with_seed(9)).unwrap();
        list.extend(values.iter().copied());
        list
    }

    #[test]
    fn test_iter_is_sorted_and_sized() {
        let list = list_of(&[5, 1, 3, 3, 9]);
        let mut iter = list.iter();
        assert_eq!(iter.len(), 5);
        assert_eq!(iter.next(), Some(&1));
        assert_eq!(iter.size_hint(), (4, Some(4)));
        assert_eq!(iter.copied().collect::<Vec<_>>(), vec![3, 3, 5, 9]);

        let mut count = 0;
        for _ in &list {
            count += 1;
        }
        assert_eq!(count, list.len());
    }

    #[test]
    fn test_cursor_walks_everything() {
        let list = list_of(&[4, 2, 8, 6]);
        let mut cursor = list.cursor();
        let mut seen = Vec::new();
        while let Some(v) = cursor.advance(&list).unwrap() {
            seen.push(*v);
        }
        assert_eq!(seen, vec![2, 4, 6, 8]);
        assert!(cursor.is_terminal());
        assert_eq!(cursor.advance(&list), Ok(None));
    }

    #[test]
    fn test_cursor_on_empty_list() {
        let list = list_of(&[]);
        let mut cursor = list.cursor();
        assert_eq!(cursor.advance(&list), Ok(None));
        assert_eq!(cursor.advance(&list), Ok(None));
    }

    #[test]
    fn test_cursor_invalidated_by_insert() {
        let mut list = list_of(&[1, 2, 3]);
        let mut cursor = list.cursor();
        assert_eq!(cursor.advance(&list), Ok(Some(&1)));

        list.insert(10).unwrap();
        assert_eq!(
            cursor.advance(&list),
            Err(SkipListError::ConcurrentModification {
                expected: 3,
                found: 4
            })
        );
        assert!(cursor.is_terminal());
    }

    #[test]
    fn test_cursor_invalidated_by_remove_and_clear() {
        let mut list = list_of(&[1, 2, 3]);
        let mut cursor = list.cursor();
        assert_eq!(list.remove(&2), Ok(true));
        assert!(matches!(
            cursor.advance(&list),
            Err(SkipListError::ConcurrentModification { .. })
        ));

        let mut cursor = list.cursor();
        list.clear();
        assert!(matches!(
            cursor.advance(&list),
            Err(SkipListError::ConcurrentModification { .. })
        ));
    }

    #[test]
    fn test_invalidated_cursor_stays_invalid() {
        let mut list = list_of(&[1, 2]);
        let mut cursor = list.cursor();
        list.insert(0).unwrap();
        assert!(cursor.advance(&list).is_err());

        // even with the list back at a consistent state, the cursor is done
        assert_eq!(list.remove(&0), Ok(true));
        assert_eq!(
            cursor.advance(&list),
            Err(SkipListError::ConcurrentModification {
                expected: 2,
                found: 3
            })
        );

        let mut fresh = list.cursor();
        assert_eq!(fresh.advance(&list), Ok(Some(&1)));
    }

    #[test]
    fn test_exhausted_cursor_sees_later_mutation() {
        let mut list = list_of(&[1]);
        let mut cursor = list.cursor();
        assert_eq!(cursor.advance(&list), Ok(Some(&1)));
        assert_eq!(cursor.advance(&list), Ok(None));
        assert_eq!(cursor.advance(&list), Ok(None));

        list.insert(2).unwrap();
        assert_eq!(
            cursor.advance(&list),
            Err(SkipListError::ConcurrentModification {
                expected: 1,
                found: 2
            })
        );
        assert!(cursor.advance(&list).is_err());
    }

    #[test]
    fn test_exhausted_cursor_on_empty_list_sees_clear() {
        let mut list = list_of(&[]);
        let mut cursor = list.cursor();
        assert_eq!(cursor.advance(&list), Ok(None));

        list.clear();
        assert!(matches!(
            cursor.advance(&list),
            Err(SkipListError::ConcurrentModification { .. })
        ));
    }

    #[test]
    fn test_cursor_refuses_other_list() {
        let a = list_of(&[1, 2, 3]);
        let b = list_of(&[7, 8, 9]);
        assert_eq!(a.version(), b.version());

        let mut cursor = a.cursor();
        assert_eq!(cursor.advance(&b), Err(SkipListError::ForeignCursor));
        // the cursor is still good for its own list
        assert_eq!(cursor.advance(&a), Ok(Some(&1)));
        assert_eq!(cursor.advance(&b), Err(SkipListError::ForeignCursor));
        assert_eq!(cursor.advance(&a), Ok(Some(&2)));
    }

    #[test]
    fn test_failed_mutations_do_not_invalidate() {
        let mut list: OrderedSkipList<f64> = [1.0, 2.0].into_iter().collect();
        let mut cursor = list.cursor();
        assert_eq!(list.insert(f64::NAN), Err(SkipListError::NullValue));
        assert_eq!(list.remove(&7.0), Ok(false));
        assert!(list.remove_at(9).is_err());
        assert_eq!(cursor.advance(&list), Ok(Some(&1.0)));
    }

    #[test]
    fn test_into_iter_drains_in_order() {
        let list = list_of(&[7, 3, 5]);
        let mut iter = list.into_iter();
        assert_eq!(iter.len(), 3);
        assert_eq!(iter.next(), Some(3));
        assert_eq!(iter.collect::<Vec<_>>(), vec![5, 7]);
    }
}

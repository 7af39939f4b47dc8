// Copyright (c) Sienna Satterwhite, CesiumDB Contributors
// SPDX-License-Identifier: GPL-3.0-only WITH Classpath-exception-2.0

use std::num::NonZeroUsize;

/// An index into an [`Arena`]. Zero is reserved so `Option<Handle>` costs no
/// more than a `usize`, which keeps forward-link arrays compact.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub(crate) struct Handle(NonZeroUsize);

impl Handle {
    #[inline]
    pub(crate) fn from_index(index: usize) -> Self {
        match NonZeroUsize::new(index.wrapping_add(1)) {
            | Some(raw) => Self(raw),
            | None => panic!("`Handle::from_index()` - `index` overflows a handle!"),
        }
    }

    #[inline]
    pub(crate) const fn to_index(self) -> usize {
        self.0.get() - 1
    }
}

/// Slot storage for skiplist nodes. Freed slots are recycled, so a handle is
/// only meaningful until the node it names is taken.
#[derive(Debug)]
pub(crate) struct Arena<T> {
    slots: Vec<Option<T>>,
    free: Vec<Handle>,
}

impl<T> Arena<T> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub(crate) fn alloc(&mut self, element: T) -> Handle {
        match self.free.pop() {
            | Some(h) => {
                self.slots[h.to_index()] = Some(element);
                h
            },
            | None => {
                self.slots.push(Some(element));
                Handle::from_index(self.slots.len() - 1)
            },
        }
    }

    #[inline]
    pub(crate) fn get(&self, handle: Handle) -> &T {
        self.slots[handle.to_index()]
            .as_ref()
            .expect("`Arena::get()` - `handle` is invalid!")
    }

    /// Like [`Arena::get`], but tolerates handles that were never issued by
    /// this arena or whose slot has since been freed.
    #[inline]
    pub(crate) fn try_get(&self, handle: Handle) -> Option<&T> {
        self.slots.get(handle.to_index()).and_then(Option::as_ref)
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, handle: Handle) -> &mut T {
        self.slots[handle.to_index()]
            .as_mut()
            .expect("`Arena::get_mut()` - `handle` is invalid!")
    }

    pub(crate) fn take(&mut self, handle: Handle) -> T {
        let element = self.slots[handle.to_index()]
            .take()
            .expect("`Arena::take()` - `handle` is invalid!");
        self.free.push(handle);
        element
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }
}

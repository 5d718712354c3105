// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A stack that can never be popped below its base entry.

use smallvec::SmallVec;

/// Inline capacity before the stack spills to the heap.
const INLINE_DEPTH: usize = 8;

/// Stack of saved states above a permanent base.
///
/// Used for canvas save/restore and for the text style stack. The base entry
/// is always present, so [`top`](Self::top) never fails and unmatched pops
/// are no-ops.
///
/// ```
/// use stipple_imaging::ScopedStack;
///
/// let mut stack = ScopedStack::new(1_u32);
/// assert_eq!(stack.push(2), 1);
/// assert_eq!(*stack.top(), 2);
/// assert_eq!(stack.pop(), Some(2));
/// assert_eq!(stack.pop(), None);
/// assert_eq!(*stack.top(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct ScopedStack<T> {
    base: T,
    entries: SmallVec<[T; INLINE_DEPTH]>,
}

impl<T> ScopedStack<T> {
    /// Create a stack holding only `base`.
    pub fn new(base: T) -> Self {
        Self {
            base,
            entries: SmallVec::new(),
        }
    }

    /// The innermost entry.
    pub fn top(&self) -> &T {
        self.entries.last().unwrap_or(&self.base)
    }

    /// Mutable access to the innermost entry.
    pub fn top_mut(&mut self) -> &mut T {
        self.entries.last_mut().unwrap_or(&mut self.base)
    }

    /// The base entry.
    pub fn base(&self) -> &T {
        &self.base
    }

    /// Push an entry and return the depth before the push.
    pub fn push(&mut self, value: T) -> usize {
        let depth = self.depth();
        self.entries.push(value);
        depth
    }

    /// Pop the innermost pushed entry. The base is never popped.
    pub fn pop(&mut self) -> Option<T> {
        self.entries.pop()
    }

    /// Number of entries above the base.
    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    /// Pop until at most `depth` entries remain above the base, returning the
    /// popped entries innermost first.
    pub fn pop_to(&mut self, depth: usize) -> impl Iterator<Item = T> + '_ {
        let keep = depth.min(self.entries.len());
        self.entries.drain(keep..).rev()
    }

    /// Drop every pushed entry and replace the base.
    pub fn reset(&mut self, base: T) {
        self.entries.clear();
        self.base = base;
    }

    /// Iterate from the base to the innermost entry.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        core::iter::once(&self.base).chain(self.entries.iter())
    }
}

impl<T: Clone> ScopedStack<T> {
    /// Push a copy of the innermost entry and return the depth before the
    /// push.
    pub fn push_copy(&mut self) -> usize {
        let top = self.top().clone();
        self.push(top)
    }
}

impl<T: Default> Default for ScopedStack<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

//! Firing cursor
//!
//! Tracks the position of an in-flight pass over a list that callbacks may
//! grow or shrink while the pass runs. All index bookkeeping for reentrant
//! `add`/`remove`/`empty` lives here so the dispatcher never adjusts indices
//! by hand.
//!
//! The cursor guarantees that, whatever mutation happens between two calls
//! to [`FiringCursor::advance`], no callback that was scheduled for the pass
//! is skipped and none is invoked twice.

/// Position of a running pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FiringCursor {
    /// Index of the next callback to invoke
    next: usize,
    /// One past the last index included in this pass
    bound: usize,
}

impl FiringCursor {
    /// Start a pass at `start` over a list currently `len` long
    pub(crate) fn new(start: usize, len: usize) -> Self {
        Self {
            next: start.min(len),
            bound: len,
        }
    }

    /// Take the index of the next callback to run, if any remain
    pub(crate) fn advance(&mut self) -> Option<usize> {
        if self.next < self.bound {
            let index = self.next;
            self.next += 1;
            Some(index)
        } else {
            None
        }
    }

    /// The list grew to `len`; include the new entries in this pass
    pub(crate) fn extend_to(&mut self, len: usize) {
        self.bound = self.bound.max(len);
    }

    /// The entry at `index` was removed from the list
    pub(crate) fn removed(&mut self, index: usize) {
        if index < self.bound {
            self.bound -= 1;
        }
        // Already-run entries shift down, so the next one does too.
        if index < self.next {
            self.next -= 1;
        }
    }

    /// The list was emptied; nothing is left to run
    pub(crate) fn clear(&mut self) {
        self.next = 0;
        self.bound = 0;
    }
}

//! A contiguous grow-doubling buffer shared by all array/object assemblies
//! within a single parse. Each nesting level records the offset at which
//! its children begin (via [`ScratchBuffer::mark`]); on container close the
//! children are block-copied into an exact-sized, heap-allocated array via
//! [`ScratchBuffer::take_since`], and the scratch length is truncated back
//! to the recorded offset. The buffer itself is retained between parses
//! (see [`ScratchBuffer::clear`]) to amortize allocations; growth follows
//! `Vec`'s own doubling strategy, so no custom growth code is needed here.

pub struct ScratchBuffer<T> {
    buf: Vec<T>,
}

impl<T> ScratchBuffer<T> {
    pub fn new() -> Self {
        ScratchBuffer { buf: Vec::new() }
    }

    /// Record the current length as the start of a new nesting level.
    #[inline]
    pub fn mark(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn push(&mut self, value: T) {
        self.buf.push(value);
    }

    /// Move everything staged since `mark` into a new exact-sized boxed
    /// slice, truncating the scratch buffer back to `mark`. LIFO: callers
    /// must close nesting levels in the reverse order they were opened.
    pub fn take_since(&mut self, mark: usize) -> Box<[T]> {
        debug_assert!(mark <= self.buf.len());
        let tail = self.buf.split_off(mark);
        tail.into_boxed_slice()
    }

    /// Discard everything staged since `mark` without materializing it —
    /// used to release partially assembled state when a parse fails.
    pub fn truncate_to(&mut self, mark: usize) {
        self.buf.truncate(mark);
    }

    /// Reset to empty while keeping the underlying allocation, so the next
    /// parse on this context reuses the capacity.
    pub fn clear(&mut self) {
        self.buf.clear();
    }
}

impl<T> Default for ScratchBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

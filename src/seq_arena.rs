//! Append-only sequence storage.
//!
//! Grounded on the original's `sequences[MAX_NODES]` array of owned
//! `char*` buffers (one entry per S record, plus one per buffer allocated
//! by bluntify's unit bridges or unify's concatenation fallback). This
//! crate keeps the same "many small owned buffers, referenced by handle"
//! shape but drops the raw-pointer arithmetic: a [`SeqHandle`] is a
//! `(buffer index, start, len)` triple, and sub-slicing a node's sequence
//! (shrinking from either end) is just adjusting `start`/`len` -- no copy,
//! no reallocation, as spec.md §3 requires.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeqHandle {
    buf: usize,
    start: usize,
    len: usize,
}

impl SeqHandle {
    pub fn len(&self) -> usize {
        self.len
    }
}

#[derive(Debug, Default)]
pub struct SeqArena {
    buffers: Vec<Vec<u8>>,
}

impl SeqArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy `bytes` into a fresh owned buffer and return a handle spanning
    /// all of it.
    pub fn alloc(&mut self, bytes: &[u8]) -> SeqHandle {
        self.alloc_owned(bytes.to_vec())
    }

    /// Take ownership of an already-built buffer (used when a caller has
    /// just concatenated bytes and would otherwise copy them twice).
    pub fn alloc_owned(&mut self, bytes: Vec<u8>) -> SeqHandle {
        let len = bytes.len();
        let buf = self.buffers.len();
        self.buffers.push(bytes);
        SeqHandle { buf, start: 0, len }
    }

    pub fn slice(&self, handle: SeqHandle) -> &[u8] {
        &self.buffers[handle.buf][handle.start..handle.start + handle.len]
    }

    /// Re-slice `handle` to the sub-range `[from, to)` of its *current*
    /// window. O(1): only the handle's start/len change.
    pub fn narrow(&self, handle: SeqHandle, from: usize, to: usize) -> SeqHandle {
        assert!(from <= to && to <= handle.len, "narrow out of bounds");
        SeqHandle {
            buf: handle.buf,
            start: handle.start + from,
            len: to - from,
        }
    }

    /// The single byte immediately past the end of `handle`'s window, if
    /// the underlying buffer has one (used by bluntify's even-k unit
    /// bridges, which read the base at the original, pre-trim position
    /// `sequence_len`).
    pub fn byte_after(&self, handle: SeqHandle) -> Option<u8> {
        let buf = &self.buffers[handle.buf];
        buf.get(handle.start + handle.len).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_and_slice_roundtrip() {
        let mut arena = SeqArena::new();
        let h = arena.alloc(b"ACGTA");
        assert_eq!(arena.slice(h), b"ACGTA");
    }

    #[test]
    fn narrow_is_non_copying_subslice() {
        let mut arena = SeqArena::new();
        let h = arena.alloc(b"ACGTACGT");
        let mid = arena.narrow(h, 2, 6);
        assert_eq!(arena.slice(mid), b"GTAC");
    }

    #[test]
    fn byte_after_reads_past_the_window() {
        let mut arena = SeqArena::new();
        let h = arena.alloc(b"ACGT");
        let trimmed = arena.narrow(h, 0, 3);
        assert_eq!(arena.byte_after(trimmed), Some(b'T'));
        assert_eq!(arena.byte_after(h), None);
    }
}

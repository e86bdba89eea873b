use super::TransferRecord;
use crate::error::{NoveltyError, Result};
use std::collections::VecDeque;

/// Fixed-length window over the source addresses of a record stream.
#[derive(Debug, Clone)]
pub struct SlidingWindow {
    seq_len: usize,
    addresses: VecDeque<u64>,
}

impl SlidingWindow {
    pub fn new(seq_len: usize) -> Result<Self> {
        if seq_len == 0 {
            return Err(NoveltyError::InvalidSequenceLength(seq_len));
        }
        Ok(Self {
            seq_len,
            addresses: VecDeque::with_capacity(seq_len),
        })
    }

    pub fn seq_len(&self) -> usize {
        self.seq_len
    }

    /// Push the record's source address, evicting the oldest one when the
    /// window is already full.
    ///
    /// Returns the window contents once it holds exactly `seq_len`
    /// addresses, i.e. for every record from the `seq_len`-th on.
    pub fn feed(&mut self, record: &TransferRecord) -> Option<Sequence<'_>> {
        if self.addresses.len() == self.seq_len {
            self.addresses.pop_front();
        }
        self.addresses.push_back(record.source);

        if self.addresses.len() < self.seq_len {
            return None;
        }
        let (head, tail) = self.addresses.as_slices();
        Some(Sequence { head, tail })
    }

    pub fn reset(&mut self) {
        self.addresses.clear();
    }
}

/// A completed window, oldest address first.
///
/// Borrowed straight from the ring buffer, so it may be split in two
/// slices.
#[derive(Debug, Clone, Copy)]
pub struct Sequence<'a> {
    head: &'a [u64],
    tail: &'a [u64],
}

impl<'a> Sequence<'a> {
    pub fn len(&self) -> usize {
        self.head.len() + self.tail.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = u64> + 'a {
        self.head.iter().chain(self.tail.iter()).copied()
    }

    pub fn to_vec(&self) -> Vec<u64> {
        self.iter().collect()
    }

    /// Canonical set key: every address as 8 little-endian bytes.
    ///
    /// Fixed width means two distinct tuples of equal length never encode to
    /// the same bytes. `out` is cleared first so callers can reuse one
    /// buffer for a whole trace.
    pub fn write_key(&self, out: &mut Vec<u8>) {
        out.clear();
        out.reserve(self.len() * 8);
        for address in self.iter() {
            out.extend_from_slice(&address.to_le_bytes());
        }
    }
}

impl PartialEq for Sequence<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl Eq for Sequence<'_> {}

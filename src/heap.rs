//! Bounded min-heap of training candidates.
//!
//! Training keeps the best `capacity` candidates seen so far: the heap root is always the
//! weakest retained candidate, so a newcomer only needs to be compared against it and, if it
//! ranks higher, replaces it.

use std::cmp::Ordering;

use crate::Symbol;

/// A candidate for inclusion in a symbol table.
///
/// This is really only useful for the selection step of training.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    /// The symbol that would be added to the table.
    pub symbol: Symbol,
    /// Estimated number of bytes saved by assigning the symbol a code.
    pub gain: u64,
}

impl Candidate {
    /// Create a new candidate.
    pub fn new(symbol: Symbol, gain: u64) -> Self {
        Self { symbol, gain }
    }
}

impl Ord for Candidate {
    /// Candidates rank by gain, then by length. Remaining ties go to the symbol that sorts first,
    /// which makes the order total and selection independent of insertion order.
    fn cmp(&self, other: &Self) -> Ordering {
        (self.gain, self.symbol.len())
            .cmp(&(other.gain, other.symbol.len()))
            .then_with(|| other.symbol.cmp(&self.symbol))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// An array-backed binary min-heap holding at most `capacity` candidates.
#[derive(Clone, Debug)]
pub struct CandidateHeap {
    entries: Vec<Candidate>,
    capacity: usize,
}

impl CandidateHeap {
    /// Create an empty heap that retains at most `capacity` candidates.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Number of retained candidates.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no candidate is retained.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of retained candidates.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The lowest-ranked retained candidate.
    pub fn peek_min(&self) -> Option<&Candidate> {
        self.entries.first()
    }

    /// Offer a candidate to the heap.
    ///
    /// While below capacity every candidate is kept. Once full, the candidate replaces the current
    /// minimum only if it ranks strictly higher.
    ///
    /// # Returns
    ///
    /// True if the candidate was retained.
    pub fn push(&mut self, candidate: Candidate) -> bool {
        if self.entries.len() < self.capacity {
            self.entries.push(candidate);
            self.sift_up(self.entries.len() - 1);
            return true;
        }

        match self.entries.first_mut() {
            Some(min) if candidate > *min => {
                *min = candidate;
                self.sift_down(0);
                true
            }
            _ => false,
        }
    }

    /// Remove and return the lowest-ranked candidate.
    pub fn pop_min(&mut self) -> Option<Candidate> {
        if self.entries.is_empty() {
            return None;
        }

        let min = self.entries.swap_remove(0);
        if !self.entries.is_empty() {
            self.sift_down(0);
        }
        Some(min)
    }

    /// Drain the heap, returning candidates from lowest to highest rank.
    pub fn into_sorted_vec(mut self) -> Vec<Candidate> {
        let mut sorted = Vec::with_capacity(self.entries.len());
        while let Some(candidate) = self.pop_min() {
            sorted.push(candidate);
        }
        sorted
    }

    fn sift_up(&mut self, mut idx: usize) {
        while idx > 0 {
            let parent = (idx - 1) / 2;
            if self.entries[idx] >= self.entries[parent] {
                break;
            }
            self.entries.swap(idx, parent);
            idx = parent;
        }
    }

    fn sift_down(&mut self, mut idx: usize) {
        let len = self.entries.len();
        loop {
            let left = 2 * idx + 1;
            let right = left + 1;
            let mut smallest = idx;

            if left < len && self.entries[left] < self.entries[smallest] {
                smallest = left;
            }
            if right < len && self.entries[right] < self.entries[smallest] {
                smallest = right;
            }
            if smallest == idx {
                break;
            }
            self.entries.swap(idx, smallest);
            idx = smallest;
        }
    }
}

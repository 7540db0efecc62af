// Bounded, deduplicated list of suggestion candidates

use hashbrown::HashSet;
use ispell_core::charset::Ichar;

/// Returned once the possibility list has reached its capacity.
///
/// Generators propagate it with `?` to stop early; the strategy swallows it
/// and the caller simply receives a full list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("possibility list is full")]
pub struct CapacityExceeded;

/// Candidate corrections in the order they were found.
#[derive(Debug, Clone)]
pub struct PossibilityList {
    items: Vec<Vec<Ichar>>,
    seen: HashSet<Vec<Ichar>>,
    capacity: usize,
    max_len: usize,
}

impl PossibilityList {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity.min(ispell_core::enums::MAX_POSSIBLE)),
            seen: HashSet::new(),
            capacity,
            max_len: 0,
        }
    }

    /// Add `candidate` unless an identical one is already listed.
    ///
    /// Fails without adding when the list is already full, and also after
    /// adding the entry that fills it.
    pub fn insert(&mut self, candidate: Vec<Ichar>) -> Result<(), CapacityExceeded> {
        if self.is_full() {
            return Err(CapacityExceeded);
        }
        if self.seen.contains(&candidate) {
            return Ok(());
        }
        self.max_len = self.max_len.max(candidate.len());
        self.seen.insert(candidate.clone());
        self.items.push(candidate);
        if self.is_full() { Err(CapacityExceeded) } else { Ok(()) }
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Length of the longest candidate inserted so far.
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    pub fn as_slice(&self) -> &[Vec<Ichar>] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<Vec<Ichar>> {
        self.items
    }
}

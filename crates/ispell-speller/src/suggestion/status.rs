// Per-call suggestion state: the typed word and the growing possibility list

use ispell_core::charset::Ichar;

use super::possibilities::{CapacityExceeded, PossibilityList};

/// State threaded through every generator of one suggestion run.
///
/// Owned by a single call, so concurrent suggestion runs never share
/// scratch state.
#[derive(Debug)]
pub struct SuggestionStatus<'a> {
    /// The misspelled word as typed, in internal codes.
    word: &'a [Ichar],
    possibilities: PossibilityList,
    /// Accept candidates that only validate as compounds.
    suggest_compounds: bool,
}

impl<'a> SuggestionStatus<'a> {
    pub fn new(word: &'a [Ichar], capacity: usize) -> Self {
        Self { word, possibilities: PossibilityList::new(capacity), suggest_compounds: true }
    }

    pub fn with_compounds(mut self, suggest_compounds: bool) -> Self {
        self.suggest_compounds = suggest_compounds;
        self
    }

    pub fn word(&self) -> &'a [Ichar] {
        self.word
    }

    pub fn suggest_compounds(&self) -> bool {
        self.suggest_compounds
    }

    pub fn insert(&mut self, candidate: Vec<Ichar>) -> Result<(), CapacityExceeded> {
        self.possibilities.insert(candidate)
    }

    pub fn is_full(&self) -> bool {
        self.possibilities.is_full()
    }

    pub fn suggestion_count(&self) -> usize {
        self.possibilities.len()
    }

    pub fn possibilities(&self) -> &PossibilityList {
        &self.possibilities
    }

    pub fn into_possibilities(self) -> PossibilityList {
        self.possibilities
    }
}

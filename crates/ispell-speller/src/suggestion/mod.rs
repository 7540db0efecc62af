// Suggestion generation
//
// Produces correction candidates for a misspelled word by applying single
// edits (insertion, transposition, deletion, substitution, word split) and
// validating each candidate through the speller.
//
//   - `possibilities`: the bounded, deduplicated candidate list
//   - `status`: per-call state shared by the generators
//   - `generators`: one `SuggestionGenerator` per edit class
//   - `strategy`: the fixed stage order

pub mod generators;
pub mod possibilities;
pub mod status;
pub mod strategy;

pub use generators::SuggestionGenerator;
pub use possibilities::{CapacityExceeded, PossibilityList};
pub use status::SuggestionStatus;
pub use strategy::{SuggestionStrategy, ispell_strategy};

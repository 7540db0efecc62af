// Word validation: affix matching, capitalization and compounds

pub mod capitals;
pub mod compound;
pub mod hits;
pub mod lookup;

use ispell_core::charset::Ichar;
use ispell_core::enums::AffixFlags;
use ispell_hash::Dictionary;

pub use hits::{Hit, HitList};
pub use lookup::{Lookup, LookupOptions};

/// Trait for word validators.
///
/// `is_valid` takes the word as typed (internal codes, original case) and
/// returns every decomposition it accepted. Suggestion generators only see
/// this trait, so instrumented validators can be substituted in tests.
pub trait Speller {
    /// The dictionary the validator reads from.
    fn dictionary(&self) -> &Dictionary;

    /// Collect the root and affix decompositions of `word` allowed by `opts`.
    fn is_valid(&self, word: &[Ichar], opts: LookupOptions) -> HitList;

    /// True if `word` splits into valid compound parts.
    fn compound_check(&self, word: &[Ichar], prefix_opts: AffixFlags) -> bool {
        compound::compound_check(self, word, prefix_opts)
    }
}

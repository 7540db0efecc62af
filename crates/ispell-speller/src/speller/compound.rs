// Run-together compound word recognition

use ispell_core::case::{CapType, classify};
use ispell_core::charset::Ichar;
use ispell_core::enums::{AffixFlags, CompoundPolicy};

use super::capitals::cap_ok;
use super::hits::HitList;
use super::{LookupOptions, Speller};

/// True if `word` splits into two or more valid parts under the
/// dictionary's compound policy.
///
/// Each part must be at least the dictionary's minimum compound length. The
/// left part is looked up with `prefix_opts` for its prefixes and may take
/// compound-only suffixes; the right part may take compound-only prefixes
/// and is itself allowed to be a compound. Under the controlled policy every
/// part's root must carry the compound flag.
pub fn compound_check<S: Speller + ?Sized>(speller: &S, word: &[Ichar], prefix_opts: AffixFlags) -> bool {
    let dict = speller.dictionary();
    let policy = dict.compound_policy();
    if policy == CompoundPolicy::Never {
        return false;
    }
    let mut search = CompoundSearch {
        speller,
        word,
        min: dict.compound_min(),
        required_bit: match policy {
            CompoundPolicy::Controlled => dict.compound_mask(),
            _ => None,
        },
        tails: vec![None; word.len()],
    };
    search.check_from(0, prefix_opts)
}

/// State of one `compound_check` call.
struct CompoundSearch<'a, S: ?Sized> {
    speller: &'a S,
    word: &'a [Ichar],
    min: usize,
    required_bit: Option<u32>,
    /// Whether the tail starting at each offset is a compound, once known.
    tails: Vec<Option<bool>>,
}

impl<S: Speller + ?Sized> CompoundSearch<'_, S> {
    fn joinable(&self, hits: &HitList, part: Option<&[Ichar]>) -> bool {
        let dict = self.speller.dictionary();
        hits.iter().any(|hit| {
            self.required_bit.is_none_or(|bit| dict.entry(hit.root).mask() & bit != 0)
                && part.is_none_or(|w| cap_ok(dict, w, hit))
        })
    }

    /// Compound check of a right part, which takes compound-only prefixes.
    fn tail(&mut self, start: usize) -> bool {
        if let Some(known) = self.tails[start] {
            return known;
        }
        let result = self.check_from(start, AffixFlags::COMPOUND_ONLY);
        self.tails[start] = Some(result);
        result
    }

    fn check_from(&mut self, start: usize, prefix_opts: AffixFlags) -> bool {
        let (speller, word): (&S, &[Ichar]) = (self.speller, self.word);
        let word = &word[start..];
        if word.len() < 2 * self.min {
            return false;
        }
        let tables = speller.dictionary().tables();
        let left_opts = LookupOptions::ALL.with_affix_options(prefix_opts, AffixFlags::COMPOUND_ONLY);
        let right_opts = LookupOptions::ALL.with_affix_options(AffixFlags::COMPOUND_ONLY, AffixFlags::NONE);
        for split in self.min..=word.len() - self.min {
            let (left, right) = word.split_at(split);
            if !self.joinable(&speller.is_valid(left, left_opts), Some(left)) {
                continue;
            }
            let right_ok =
                self.joinable(&speller.is_valid(right, right_opts), None) || self.tail(start + split);
            if !right_ok {
                continue;
            }
            let right_cap = classify(right, tables);
            let caps_agree = match classify(left, tables) {
                CapType::AllCaps => right_cap == CapType::AllCaps,
                _ => right_cap == CapType::AnyCase,
            };
            log::trace!("compound split at {}, capitalization agrees: {caps_agree}", start + split);
            return caps_agree;
        }
        false
    }
}

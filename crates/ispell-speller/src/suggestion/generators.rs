// Individual suggestion generators: each applies one class of edit to the
// typed word and validates the candidates through the speller.

use ispell_core::charset::{CharTables, Ichar};
use ispell_core::enums::{AffixFlags, CompoundPolicy, MAX_WORD_LEN};

use super::possibilities::CapacityExceeded;
use super::status::SuggestionStatus;
use crate::speller::capitals::case_forms;
use crate::speller::{LookupOptions, Speller};

const SPACE: Ichar = b' ' as Ichar;
const HYPHEN: Ichar = b'-' as Ichar;

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// One stage of the suggestion pipeline.
pub trait SuggestionGenerator: Send + Sync {
    /// Short stage name used in trace logging.
    fn name(&self) -> &'static str;

    /// Add every candidate this stage finds for `status.word()`.
    ///
    /// Returns `Err(CapacityExceeded)` as soon as the possibility list fills.
    fn generate(&self, speller: &dyn Speller, status: &mut SuggestionStatus<'_>) -> Result<(), CapacityExceeded>;
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Validate `candidate` and insert its correctly cased forms.
///
/// A candidate with no hits may still be offered as a compound, recased to
/// the typed word's simple pattern.
pub fn suggest_for_buffer(
    speller: &dyn Speller,
    status: &mut SuggestionStatus<'_>,
    candidate: &[Ichar],
) -> Result<(), CapacityExceeded> {
    let dict = speller.dictionary();
    let hits = speller.is_valid(candidate, LookupOptions::ALL);
    if !hits.is_empty() {
        for form in case_forms(dict, candidate, status.word(), &hits) {
            status.insert(form)?;
        }
        return Ok(());
    }
    if status.suggest_compounds()
        && dict.compound_policy() != CompoundPolicy::Never
        && speller.compound_check(candidate, AffixFlags::NONE)
    {
        status.insert(simple_case(dict.tables(), candidate, status.word()))?;
    }
    Ok(())
}

/// `word` in the simple case pattern of `pattern`: all capitals,
/// capitalized, or lowercase.
fn simple_case(tables: &CharTables, word: &[Ichar], pattern: &[Ichar]) -> Vec<Ichar> {
    let mut out = word.to_vec();
    if !pattern.iter().any(|&c| tables.is_lower(c)) {
        tables.upcase(&mut out);
        return out;
    }
    tables.lowcase(&mut out);
    if pattern.first().is_some_and(|&c| tables.is_upper(c)) {
        if let Some(first) = out.first_mut() {
            *first = tables.to_upper(*first);
        }
    }
    out
}

// =========================================================================
// Individual generators
// =========================================================================

// ---------------------------------------------------------------------------
// WrongCapital
// ---------------------------------------------------------------------------

/// The word exists but was typed with the wrong capitalization.
pub struct WrongCapital;

impl SuggestionGenerator for WrongCapital {
    fn name(&self) -> &'static str {
        "wrong capital"
    }

    fn generate(&self, speller: &dyn Speller, status: &mut SuggestionStatus<'_>) -> Result<(), CapacityExceeded> {
        let word = status.word();
        let hits = speller.is_valid(word, LookupOptions::ALL);
        if hits.is_empty() {
            return Ok(());
        }
        let dict = speller.dictionary();
        let upper = dict.tables().to_uppercase(word);
        for form in case_forms(dict, &upper, word, &hits) {
            status.insert(form)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MissingLetter
// ---------------------------------------------------------------------------

/// Insert each try character at each gap, including both ends.
///
/// Boundary characters are never inserted at the start or end.
pub struct MissingLetter;

impl SuggestionGenerator for MissingLetter {
    fn name(&self) -> &'static str {
        "missing letter"
    }

    fn generate(&self, speller: &dyn Speller, status: &mut SuggestionStatus<'_>) -> Result<(), CapacityExceeded> {
        let word = status.word();
        let tables = speller.dictionary().tables();
        let n = word.len();
        let mut buffer = Vec::with_capacity(n + 1);
        for i in 0..=n {
            for &c in speller.dictionary().try_chars() {
                if (i == 0 || i == n) && tables.is_boundary_char(c) {
                    continue;
                }
                buffer.clear();
                buffer.extend_from_slice(&word[..i]);
                buffer.push(c);
                buffer.extend_from_slice(&word[i..]);
                suggest_for_buffer(speller, status, &buffer)?;
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// TransposedLetter
// ---------------------------------------------------------------------------

/// Swap each pair of adjacent characters.
pub struct TransposedLetter;

impl SuggestionGenerator for TransposedLetter {
    fn name(&self) -> &'static str {
        "transposed letter"
    }

    fn generate(&self, speller: &dyn Speller, status: &mut SuggestionStatus<'_>) -> Result<(), CapacityExceeded> {
        let word = status.word();
        let mut buffer = word.to_vec();
        for i in 1..word.len() {
            if word[i - 1] == word[i] {
                continue;
            }
            buffer.swap(i - 1, i);
            suggest_for_buffer(speller, status, &buffer)?;
            buffer.swap(i - 1, i);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// ExtraLetter
// ---------------------------------------------------------------------------

/// Delete one character at each position.
///
/// Deleting the second of two equal neighbours gives the same candidate as
/// deleting the first, so it is skipped.
pub struct ExtraLetter;

impl SuggestionGenerator for ExtraLetter {
    fn name(&self) -> &'static str {
        "extra letter"
    }

    fn generate(&self, speller: &dyn Speller, status: &mut SuggestionStatus<'_>) -> Result<(), CapacityExceeded> {
        let word = status.word();
        if word.len() < 2 {
            return Ok(());
        }
        let mut buffer = Vec::with_capacity(word.len() - 1);
        for i in 0..word.len() {
            if i > 0 && word[i] == word[i - 1] {
                continue;
            }
            buffer.clear();
            buffer.extend_from_slice(&word[..i]);
            buffer.extend_from_slice(&word[i + 1..]);
            suggest_for_buffer(speller, status, &buffer)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// WrongLetter
// ---------------------------------------------------------------------------

/// Replace each character with every other try character.
///
/// Works on the uppercased word; boundary characters are never substituted
/// at the first or last position.
pub struct WrongLetter;

impl SuggestionGenerator for WrongLetter {
    fn name(&self) -> &'static str {
        "wrong letter"
    }

    fn generate(&self, speller: &dyn Speller, status: &mut SuggestionStatus<'_>) -> Result<(), CapacityExceeded> {
        let dict = speller.dictionary();
        let tables = dict.tables();
        let mut buffer = tables.to_uppercase(status.word());
        let n = buffer.len();
        for i in 0..n {
            let original = buffer[i];
            for &c in dict.try_chars() {
                if c == original || ((i == 0 || i + 1 == n) && tables.is_boundary_char(c)) {
                    continue;
                }
                buffer[i] = c;
                let result = suggest_for_buffer(speller, status, &buffer);
                buffer[i] = original;
                result?;
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MissingSpace
// ---------------------------------------------------------------------------

/// Split the word in two; if both halves are words, offer them joined by a
/// space and by a hyphen, in every legal capitalization of each half.
pub struct MissingSpace;

impl SuggestionGenerator for MissingSpace {
    fn name(&self) -> &'static str {
        "missing space"
    }

    fn generate(&self, speller: &dyn Speller, status: &mut SuggestionStatus<'_>) -> Result<(), CapacityExceeded> {
        let word = status.word();
        let n = word.len();
        if n < 3 || n >= MAX_WORD_LEN - 1 {
            return Ok(());
        }
        let dict = speller.dictionary();
        for split in 1..n {
            let (first, second) = word.split_at(split);
            let first_hits = speller.is_valid(first, LookupOptions::ALL);
            if first_hits.is_empty() {
                continue;
            }
            let second_hits = speller.is_valid(second, LookupOptions::ALL);
            if second_hits.is_empty() {
                continue;
            }
            let first_forms = case_forms(dict, first, first, &first_hits);
            let second_forms = case_forms(dict, second, second, &second_hits);
            for a in &first_forms {
                for b in &second_forms {
                    for joiner in [SPACE, HYPHEN] {
                        let mut joined = Vec::with_capacity(a.len() + b.len() + 1);
                        joined.extend_from_slice(a);
                        joined.push(joiner);
                        joined.extend_from_slice(b);
                        status.insert(joined)?;
                    }
                }
            }
        }
        Ok(())
    }
}

// =========================================================================
// Tests
// =========================================================================

// Suggestion strategy: runs the generator stages in their fixed order

use ispell_core::enums::CompoundPolicy;

use super::generators::*;
use super::status::SuggestionStatus;
use crate::speller::Speller;

/// An ordered pipeline of generators sharing one possibility list.
///
/// Every stage runs in turn, even when earlier stages already found
/// candidates, until the list is full.
pub struct SuggestionStrategy {
    generators: Vec<Box<dyn SuggestionGenerator>>,
}

impl SuggestionStrategy {
    pub fn new(generators: Vec<Box<dyn SuggestionGenerator>>) -> Self {
        Self { generators }
    }

    pub fn generator_count(&self) -> usize {
        self.generators.len()
    }

    /// Stage names in execution order.
    pub fn stage_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.generators.iter().map(|g| g.name())
    }

    pub fn generate(&self, speller: &dyn Speller, status: &mut SuggestionStatus<'_>) {
        for generator in &self.generators {
            if status.is_full() {
                break;
            }
            let result = generator.generate(speller, status);
            log::trace!("{}: {} possibilities", generator.name(), status.suggestion_count());
            if result.is_err() {
                log::trace!("possibility list full after {}", generator.name());
                break;
            }
        }
    }
}

/// The classic ispell pipeline.
///
/// Omission and transposition run before deletion and substitution. The
/// missing-space stage is left out when the dictionary already accepts any
/// run-together words, since those candidates would validate as compounds.
pub fn ispell_strategy(policy: CompoundPolicy) -> SuggestionStrategy {
    let mut generators: Vec<Box<dyn SuggestionGenerator>> = vec![
        Box::new(WrongCapital),
        Box::new(MissingLetter),
        Box::new(TransposedLetter),
        Box::new(ExtraLetter),
        Box::new(WrongLetter),
    ];
    if policy != CompoundPolicy::Anytime {
        generators.push(Box::new(MissingSpace));
    }
    SuggestionStrategy::new(generators)
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    use crate::speller::{HitList, Lookup, LookupOptions};
    use crate::test_support::{chars, dict_from, text};
    use ispell_core::charset::Ichar;
    use ispell_hash::Dictionary;

    /// Counts validation calls made through it.
    struct CountingSpeller<'d> {
        inner: Lookup<'d>,
        calls: Cell<usize>,
    }

    impl Speller for CountingSpeller<'_> {
        fn dictionary(&self) -> &Dictionary {
            self.inner.dictionary()
        }

        fn is_valid(&self, word: &[Ichar], opts: LookupOptions) -> HitList {
            self.calls.set(self.calls.get() + 1);
            self.inner.is_valid(word, opts)
        }
    }

    fn suggest(d: &Dictionary, word: &str, capacity: usize) -> Vec<String> {
        let typed = chars(word);
        let mut status = SuggestionStatus::new(&typed, capacity);
        ispell_strategy(d.compound_policy()).generate(&Lookup::new(d), &mut status);
        status.possibilities().as_slice().iter().map(|w| text(w)).collect()
    }

    fn sample() -> Dictionary {
        dict_from(|b| {
            b.words(["hello", "help", "form", "from", "fro", "forum", "the", "cat"]);
        })
    }

    #[test]
    fn stage_order_is_fixed() {
        let names: Vec<_> = ispell_strategy(CompoundPolicy::Never).stage_names().collect();
        assert_eq!(
            names,
            vec!["wrong capital", "missing letter", "transposed letter", "extra letter", "wrong letter", "missing space"]
        );
        assert_eq!(ispell_strategy(CompoundPolicy::Anytime).generator_count(), 5);
        assert_eq!(ispell_strategy(CompoundPolicy::Controlled).generator_count(), 6);
    }

    #[test]
    fn helllo_suggests_hello() {
        assert_eq!(suggest(&sample(), "helllo", 100), vec!["hello"]);
    }

    #[test]
    fn omission_and_transposition_come_first() {
        // Omission finds FORM and FROM before substitution finds FRO
        let d = sample();
        let found = suggest(&d, "frm", 100);
        assert_eq!(found, vec!["form", "from", "fro"]);
        let found = suggest(&d, "fomr", 100);
        assert_eq!(found[0], "form");
        let found = suggest(&d, "forom", 100);
        // Deletion finds FROM and FORM, substitution finds FORUM
        let forum = found.iter().position(|w| w == "forum").unwrap();
        let form = found.iter().position(|w| w == "form").unwrap();
        assert!(form < forum);
    }

    #[test]
    fn later_stages_still_run_after_hits() {
        let found = suggest(&sample(), "frmo", 100);
        assert_eq!(found, vec!["from", "fro"]);
    }

    #[test]
    fn missing_space_runs_last() {
        let found = suggest(&sample(), "thecat", 100);
        assert_eq!(found, vec!["the cat", "the-cat"]);
    }

    #[test]
    fn capacity_stops_generation() {
        let d = sample();
        let found = suggest(&d, "frm", 1);
        assert_eq!(found, vec!["form"]);

        let typed = chars("frm");
        let counting = CountingSpeller { inner: Lookup::new(&d), calls: Cell::new(0) };
        let mut status = SuggestionStatus::new(&typed, 1);
        ispell_strategy(d.compound_policy()).generate(&counting, &mut status);
        let limited = counting.calls.get();

        let counting = CountingSpeller { inner: Lookup::new(&d), calls: Cell::new(0) };
        let mut status = SuggestionStatus::new(&typed, 100);
        ispell_strategy(d.compound_policy()).generate(&counting, &mut status);
        assert!(limited < counting.calls.get());
    }

    #[test]
    fn suggestions_are_repeatable() {
        let d = sample();
        assert_eq!(suggest(&d, "hlep", 100), suggest(&d, "hlep", 100));
    }
}

// SpellChecker: top-level handle over one loaded dictionary.
//
// Owns the shared dictionary, the narrow encoding used to talk to it and
// the caller's options. Lookup engines are created per call, so the handle
// itself holds no mutable scratch state and can be shared across threads.

use std::path::Path;
use std::sync::Arc;

use ispell_core::charset::Ichar;
use ispell_core::encoding::{Latin1, NarrowEncoding};
use ispell_core::enums::{AffixFlags, MAX_WORD_LEN};
use ispell_hash::{Dictionary, LoadError};

use crate::config::{CheckerOptions, DictionaryLocator};
use crate::speller::capitals::cap_ok;
use crate::speller::{Hit, Lookup, LookupOptions, Speller};
#[cfg(feature = "suggest")]
use crate::suggestion::{SuggestionStatus, SuggestionStrategy, ispell_strategy};

/// How [`SpellChecker::acceptance`] found a word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Acceptance {
    /// The word is a dictionary root.
    Root,
    /// The word is a root with affixes; holds the root as stored.
    Affixed { root: String },
    /// The word is a run-together compound of valid words.
    Compound,
}

/// Spell checker over one ispell hash dictionary.
pub struct SpellChecker {
    dict: Arc<Dictionary>,
    encoding: Arc<dyn NarrowEncoding>,
    options: CheckerOptions,
    #[cfg(feature = "suggest")]
    strategy: SuggestionStrategy,
}

impl SpellChecker {
    /// Wrap an already loaded dictionary, using Latin-1 and default options.
    pub fn new(dict: Arc<Dictionary>) -> Self {
        Self {
            #[cfg(feature = "suggest")]
            strategy: ispell_strategy(dict.compound_policy()),
            dict,
            encoding: Arc::new(Latin1),
            options: CheckerOptions::default(),
        }
    }

    /// Load a hash file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let dict = Dictionary::load(path)?;
        Ok(Self::new(Arc::new(dict)))
    }

    /// Load the hash file `locator` finds for a language tag such as `en_US`.
    pub fn for_language(tag: &str, locator: &DictionaryLocator) -> Result<Self, LoadError> {
        let path = locator.locate(tag).ok_or_else(|| {
            LoadError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no dictionary for {tag} in {} search paths", locator.search_paths().len()),
            ))
        })?;
        Self::open(path)
    }

    pub fn with_options(mut self, options: CheckerOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &CheckerOptions {
        &self.options
    }

    pub fn set_max_suggestions(&mut self, value: usize) {
        self.options.max_suggestions = value;
    }

    /// Replace the encoding used to convert words to and from the dictionary.
    pub fn set_encoding(&mut self, encoding: impl NarrowEncoding + 'static) {
        self.encoding = Arc::new(encoding);
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dict
    }

    /// A second handle sharing this checker's dictionary, encoding and options.
    pub fn share(&self) -> Self {
        Self {
            #[cfg(feature = "suggest")]
            strategy: ispell_strategy(self.dict.compound_policy()),
            dict: Arc::clone(&self.dict),
            encoding: Arc::clone(&self.encoding),
            options: self.options.clone(),
        }
    }

    /// Internal codes for `word`, or `None` if it cannot be checked.
    fn encode(&self, word: &str) -> Option<Vec<Ichar>> {
        let bytes = match self.encoding.encode(word) {
            Ok(b) => b,
            Err(e) => {
                log::trace!("{word:?}: {e}");
                return None;
            }
        };
        let ichars = self.dict.tables().bytes_to_ichars(&bytes);
        if ichars.is_empty() || ichars.len() >= MAX_WORD_LEN {
            return None;
        }
        Some(ichars)
    }

    fn decode(&self, word: &[Ichar]) -> String {
        self.encoding.decode(&self.dict.tables().ichars_to_bytes(word))
    }

    /// Check whether a word is correctly spelled.
    pub fn check(&self, word: &str) -> bool {
        let Some(w) = self.encode(word) else {
            return false;
        };
        let lookup = Lookup::new(&self.dict);
        if !lookup.is_valid(&w, LookupOptions::FIRST).is_empty() {
            return true;
        }
        self.options.accept_compounds && lookup.compound_check(&w, AffixFlags::NONE)
    }

    /// Like [`check`](Self::check), but reports how the word was accepted.
    ///
    /// A bare root wins over any affixed decomposition.
    pub fn acceptance(&self, word: &str) -> Option<Acceptance> {
        let w = self.encode(word)?;
        let lookup = Lookup::new(&self.dict);
        let hits = lookup.is_valid(&w, LookupOptions::ALL);
        let mut legal = hits.iter().filter(|hit| cap_ok(&self.dict, &w, hit)).peekable();
        if let Some(first) = legal.peek().copied() {
            if legal.any(|hit| hit.prefix.is_none() && hit.suffix.is_none()) {
                return Some(Acceptance::Root);
            }
            let root = self.dict.entry(first.root).word().unwrap_or_default();
            return Some(Acceptance::Affixed { root: self.decode(root) });
        }
        (self.options.accept_compounds && lookup.compound_check(&w, AffixFlags::NONE))
            .then_some(Acceptance::Compound)
    }

    /// Generate corrections for a word, in stage order.
    #[cfg(feature = "suggest")]
    pub fn suggest(&self, word: &str) -> Vec<String> {
        let Some(w) = self.encode(word) else {
            return Vec::new();
        };
        let lookup = Lookup::new(&self.dict);
        let mut status = SuggestionStatus::new(&w, self.options.possibility_capacity)
            .with_compounds(self.options.suggest_compounds);
        self.strategy.generate(&lookup, &mut status);
        status
            .into_possibilities()
            .into_vec()
            .into_iter()
            .take(self.options.max_suggestions)
            .map(|s| self.decode(&s))
            .collect()
    }

    /// Every distinct root and affix decomposition of a word whose
    /// capitalization is legal, rendered as `PREFIX+ROOT+SUFFIX`.
    ///
    /// Affixes that strip characters from the root show them after a `-`,
    /// as in `CRY-Y+IES`.
    pub fn analyze(&self, word: &str) -> Vec<String> {
        let Some(w) = self.encode(word) else {
            return Vec::new();
        };
        let hits = Lookup::new(&self.dict).is_valid(&w, LookupOptions::ALL);
        hits.iter()
            .filter(|hit| cap_ok(&self.dict, &w, hit))
            .map(|hit| self.describe(hit))
            .collect()
    }

    fn describe(&self, hit: &Hit) -> String {
        let mut out = String::new();
        if let Some(id) = hit.prefix {
            let p = self.dict.prefix(id);
            out.push_str(&self.decode(&p.append));
            if !p.strip.is_empty() {
                out.push('-');
                out.push_str(&self.decode(&p.strip));
            }
            out.push('+');
        }
        let root = self.dict.entry(hit.root).word().unwrap_or_default();
        out.push_str(&self.decode(root));
        if let Some(id) = hit.suffix {
            let s = self.dict.suffix(id);
            if !s.strip.is_empty() {
                out.push('-');
                out.push_str(&self.decode(&s.strip));
            }
            out.push('+');
            out.push_str(&self.decode(&s.append));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::dict_from;
    use ispell_core::encoding::EncodingError;
    use ispell_core::enums::CompoundPolicy;
    use ispell_hash::AffixRule;

    fn checker() -> SpellChecker {
        let dict = dict_from(|b| {
            b.compounds(CompoundPolicy::Controlled, 3, Some('Z'))
                .suffix(AffixRule::new('D', "", "ED", ".").cross_product())
                .suffix(AffixRule::new('Y', "Y", "IES", "[^AEIOU]Y"))
                .prefix(AffixRule::new('R', "", "RE", ".").cross_product())
                .words(["walk/DR", "cry/Y", "hello", "sun/Z", "shine/Z", "caf\u{e9}"]);
        });
        SpellChecker::new(Arc::new(dict))
    }

    #[test]
    fn check_accepts_roots_affixes_and_compounds() {
        let c = checker();
        assert!(c.check("hello"));
        assert!(c.check("Hello"));
        assert!(c.check("rewalked"));
        assert!(c.check("cries"));
        assert!(c.check("sunshine"));
        assert!(!c.check("helllo"));
        assert!(!c.check(""));
    }

    #[test]
    fn compounds_can_be_disabled() {
        let c = checker().with_options(CheckerOptions { accept_compounds: false, ..Default::default() });
        assert!(!c.check("sunshine"));
        assert!(c.check("sun"));
    }

    #[test]
    fn unencodable_and_overlong_words_are_rejected() {
        let c = checker();
        assert!(!c.check("hell\u{0151}"));
        assert!(c.check("caf\u{e9}"));
        assert!(!c.check(&"a".repeat(MAX_WORD_LEN)));
    }

    #[cfg(feature = "suggest")]
    #[test]
    fn suggest_truncates_to_max_suggestions() {
        let mut c = checker();
        assert_eq!(c.suggest("helllo"), vec!["hello"]);
        assert_eq!(c.suggest("walkde"), vec!["walked"]);
        c.set_max_suggestions(0);
        assert!(c.suggest("helllo").is_empty());
    }

    #[cfg(feature = "suggest")]
    #[test]
    fn suggest_decodes_through_the_encoding() {
        let c = checker();
        assert_eq!(c.suggest("cafe\u{e9}"), vec!["caf\u{e9}"]);
    }

    #[test]
    fn analyze_lists_decompositions() {
        let c = checker();
        assert_eq!(c.analyze("walked"), vec!["WALK+ED"]);
        assert_eq!(c.analyze("rewalked"), vec!["RE+WALK+ED"]);
        assert_eq!(c.analyze("cries"), vec!["CRY-Y+IES"]);
        assert_eq!(c.analyze("hello"), vec!["HELLO"]);
        assert!(c.analyze("walks").is_empty());
    }

    #[test]
    fn acceptance_reports_how_a_word_was_found() {
        let c = checker();
        assert_eq!(c.acceptance("hello"), Some(Acceptance::Root));
        assert_eq!(c.acceptance("HELLO"), Some(Acceptance::Root));
        assert_eq!(c.acceptance("rewalked"), Some(Acceptance::Affixed { root: "WALK".into() }));
        assert_eq!(c.acceptance("cries"), Some(Acceptance::Affixed { root: "CRY".into() }));
        assert_eq!(c.acceptance("sunshine"), Some(Acceptance::Compound));
        assert_eq!(c.acceptance("helllo"), None);
        for word in ["hello", "walked", "sunshine", "walks", "hELLO"] {
            assert_eq!(c.acceptance(word).is_some(), c.check(word), "{word}");
        }
    }

    #[test]
    fn checkers_share_one_dictionary() {
        let c = checker();
        let other = c.share();
        assert!(std::ptr::eq(c.dictionary(), other.dictionary()));
        let handle = std::thread::spawn(move || other.check("walked"));
        assert!(handle.join().unwrap());
    }

    /// Latin-1 except that byte 0xE9 stands for U+0151 instead of U+00E9.
    struct Remapped;

    impl NarrowEncoding for Remapped {
        fn encode(&self, text: &str) -> Result<Vec<u8>, EncodingError> {
            text.chars()
                .map(|c| match c {
                    '\u{151}' => Ok(0xE9),
                    '\u{e9}' => Err(EncodingError::Unrepresentable(c)),
                    _ => u8::try_from(c as u32).map_err(|_| EncodingError::Unrepresentable(c)),
                })
                .collect()
        }

        fn decode(&self, bytes: &[u8]) -> String {
            Latin1.decode(bytes).replace('\u{e9}', "\u{151}")
        }
    }

    #[test]
    fn shared_handle_keeps_encoding_and_options() {
        let mut c = checker().with_options(CheckerOptions { accept_compounds: false, ..Default::default() });
        c.set_encoding(Remapped);
        let other = c.share();
        assert!(c.check("caf\u{151}"));
        assert!(other.check("caf\u{151}"));
        assert!(!other.check("caf\u{e9}"));
        assert!(!other.check("sunshine"));
        #[cfg(feature = "suggest")]
        assert_eq!(other.suggest("cafe\u{151}"), vec!["caf\u{151}"]);
    }

    #[test]
    fn missing_language_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let locator = DictionaryLocator::with_paths([dir.path().to_path_buf()]);
        match SpellChecker::for_language("en_US", &locator) {
            Err(LoadError::IoError(e)) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn for_language_opens_located_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut b = ispell_hash::DictionaryBuilder::default();
        b.words(["colour"]);
        b.write_to(dir.path().join("british.hash")).unwrap();
        let locator = DictionaryLocator::with_paths([dir.path().to_path_buf()]);
        let c = SpellChecker::for_language("en-GB", &locator).unwrap();
        assert!(c.check("colour"));
    }
}

// End-to-end scenarios: dictionaries written to disk, loaded and queried
// through the public API.

use std::path::{Path, PathBuf};

use ispell_core::charset::Ichar;
use ispell_core::enums::{AffixFlags, CompoundPolicy};
use ispell_hash::{AffixRule, Dictionary, DictionaryBuilder, LoadError};
use ispell_speller::{CheckerOptions, Lookup, LookupOptions, SpellChecker, Speller};

fn chars(s: &str) -> Vec<Ichar> {
    s.bytes().map(Ichar::from).collect()
}

fn write(dir: &Path, name: &str, configure: impl FnOnce(&mut DictionaryBuilder)) -> PathBuf {
    let mut builder = DictionaryBuilder::default();
    configure(&mut builder);
    let path = dir.join(name);
    builder.write_to(&path).unwrap();
    path
}

fn english(dir: &Path) -> PathBuf {
    write(dir, "english.hash", |b| {
        b.suffix(AffixRule::new('D', "", "ED", "[^E]").cross_product())
            .suffix(AffixRule::new('D', "E", "ED", "E").cross_product())
            .suffix(AffixRule::new('S', "", "S", "[^SXZHY]").cross_product())
            .suffix(AffixRule::new('S', "Y", "IES", "[^AEIOU]Y").cross_product())
            .suffix(AffixRule::new('G', "", "ING", ".").cross_product())
            .prefix(AffixRule::new('U', "", "UN", ".").cross_product())
            .words([
                "hello", "walk/DG", "talk/SDG", "love/DS", "cry/S", "do/U", "tie/SU",
                "Paris", "NASA", "McDonald", "form", "from", "the", "cat/S", "dog/S",
            ]);
    })
}

#[test]
fn hello_in_every_legal_case() {
    let dir = tempfile::tempdir().unwrap();
    let checker = SpellChecker::open(english(dir.path())).unwrap();
    assert!(checker.check("hello"));
    assert!(checker.check("Hello"));
    assert!(checker.check("HELLO"));
    assert!(!checker.check("hELLO"));
    assert!(!checker.check("helllo"));
}

#[test]
fn helllo_suggests_hello() {
    let dir = tempfile::tempdir().unwrap();
    let checker = SpellChecker::open(english(dir.path())).unwrap();
    assert_eq!(checker.suggest("helllo"), vec!["hello"]);
    assert_eq!(checker.suggest("Helllo"), vec!["Hello"]);
    assert_eq!(checker.suggest("HELLLO"), vec!["HELLO"]);
}

#[test]
fn suffix_stripping_honours_flags() {
    let dir = tempfile::tempdir().unwrap();
    let path = english(dir.path());
    let dict = Dictionary::load(&path).unwrap();
    let lookup = Lookup::new(&dict);

    let hits = lookup.is_valid(&chars("WALKED"), LookupOptions::FIRST);
    assert_eq!(hits.len(), 1);
    let hit = hits.as_slice()[0];
    let suffix = dict.suffix(hit.suffix.unwrap());
    assert_eq!(&suffix.append[..], &chars("ED")[..]);
    assert!(suffix.allowed_by(dict.entry(hit.root).mask()));

    assert!(lookup.is_valid(&chars("WALKS"), LookupOptions::FIRST).is_empty());
}

#[test]
fn affix_conditions_select_the_right_rule() {
    let dir = tempfile::tempdir().unwrap();
    let checker = SpellChecker::open(english(dir.path())).unwrap();
    assert!(checker.check("loved"));
    assert!(!checker.check("loveed"));
    assert!(checker.check("cries"));
    assert!(!checker.check("crys"));
    assert!(checker.check("talks"));
    assert!(checker.check("untie"));
    assert!(checker.check("unties"));
    assert!(!checker.check("undos"));
}

#[test]
fn capitalized_and_follow_case_roots() {
    let dir = tempfile::tempdir().unwrap();
    let checker = SpellChecker::open(english(dir.path())).unwrap();
    assert!(checker.check("Paris"));
    assert!(checker.check("PARIS"));
    assert!(!checker.check("paris"));
    assert!(checker.check("NASA"));
    assert!(!checker.check("Nasa"));
    assert!(checker.check("McDonald"));
    assert!(!checker.check("Mcdonald"));
    assert_eq!(checker.suggest("paris"), vec!["Paris"]);
    assert_eq!(checker.suggest("mcdonald"), vec!["McDonald"]);
}

#[test]
fn controlled_compounds() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "compound.hash", |b| {
        b.compounds(CompoundPolicy::Controlled, 3, Some('Z')).words(["sun/Z", "shine/Z", "sushi"]);
    });
    let dict = Dictionary::load(&path).unwrap();
    let lookup = Lookup::new(&dict);
    assert!(lookup.compound_check(&chars("SUNSHINE"), AffixFlags::NONE));
    assert!(!lookup.compound_check(&chars("SUSHI"), AffixFlags::NONE));

    let checker = SpellChecker::open(&path).unwrap();
    assert!(checker.check("sunshine"));
    assert!(checker.check("sushi"));
    assert!(!checker.check("sushisun"));
}

#[test]
fn bad_magic_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = english(dir.path());
    let mut data = std::fs::read(&path).unwrap();
    data[0] ^= 0xFF;
    std::fs::write(&path, &data).unwrap();

    match Dictionary::load(&path) {
        Err(LoadError::BadMagic { expected, found }) => {
            assert_eq!(expected, 0x9602);
            assert_ne!(found, expected);
        }
        other => panic!("expected BadMagic, got {:?}", other.map(|_| ())),
    }
    assert!(matches!(SpellChecker::open(&path), Err(LoadError::BadMagic { .. })));
}

#[test]
fn suggestions_are_repeatable_distinct_and_bounded() {
    let dir = tempfile::tempdir().unwrap();
    let checker = SpellChecker::open(english(dir.path())).unwrap().with_options(CheckerOptions {
        max_suggestions: 100,
        possibility_capacity: 4,
        ..Default::default()
    });
    for word in ["hlelo", "wlak", "fomr", "thecat", "tlak", "cta"] {
        let first = checker.suggest(word);
        assert_eq!(first, checker.suggest(word), "{word}");
        assert!(first.len() <= 4, "{word}: {first:?}");
        let mut distinct = first.clone();
        distinct.sort();
        distinct.dedup();
        assert_eq!(distinct.len(), first.len(), "{word}: {first:?}");
    }
}

#[test]
fn omission_and_transposition_rank_before_insertion_and_substitution() {
    let dir = tempfile::tempdir().unwrap();
    let checker = SpellChecker::open(english(dir.path())).unwrap();
    // "ct": omission gives CAT; "dgo": transposition gives DOG
    let found = checker.suggest("ct");
    assert_eq!(found[0], "cat");
    let found = checker.suggest("dgo");
    assert_eq!(found[0], "dog");
    let found = checker.suggest("fomr");
    let form = found.iter().position(|w| w == "form").unwrap();
    let from = found.iter().position(|w| w == "from");
    assert_eq!(form, 0);
    assert!(from.is_none_or(|i| i > form));
}

#[test]
fn missing_space_splits_run_together_words() {
    let dir = tempfile::tempdir().unwrap();
    let checker = SpellChecker::open(english(dir.path())).unwrap();
    assert_eq!(checker.suggest("thecat"), vec!["the cat", "the-cat"]);
}

// Root lookup and prefix/suffix stripping

use std::ops::ControlFlow;

use ispell_core::charset::Ichar;
use ispell_core::enums::{AffixFlags, CompoundPolicy};
use ispell_hash::{AffixEntry, AffixId, Dictionary};

use super::capitals::cap_ok;
use super::hits::{Hit, HitList};
use super::Speller;

/// Options for one [`Speller::is_valid`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LookupOptions {
    /// Accept a root even when its mask lacks the affix flag.
    pub ignore_flags: bool,
    /// Collect every decomposition instead of stopping at the first
    /// capitalization-consistent one. Hits are then recorded without
    /// checking capitalization.
    pub all_hits: bool,
    /// Options for prefix matching (`COMPOUND_ONLY` admits compound-only prefixes).
    pub prefix: AffixFlags,
    /// Options for suffix matching.
    pub suffix: AffixFlags,
}

impl LookupOptions {
    /// Stop at the first capitalization-consistent hit.
    pub const FIRST: LookupOptions = LookupOptions {
        ignore_flags: false,
        all_hits: false,
        prefix: AffixFlags::NONE,
        suffix: AffixFlags::NONE,
    };

    /// Collect every hit regardless of capitalization.
    pub const ALL: LookupOptions = LookupOptions { all_hits: true, ..Self::FIRST };

    pub fn with_affix_options(mut self, prefix: AffixFlags, suffix: AffixFlags) -> Self {
        self.prefix = prefix;
        self.suffix = suffix;
        self
    }

    /// True once `hits` is enough to stop searching.
    fn satisfied(&self, hits: &HitList) -> bool {
        !hits.is_empty() && !self.all_hits && !self.ignore_flags
    }
}

/// The lookup engine over one dictionary.
///
/// Holds no mutable state; every call builds its own hit list, so one
/// `Lookup` may serve any number of threads.
#[derive(Debug, Clone, Copy)]
pub struct Lookup<'d> {
    dict: &'d Dictionary,
}

/// Per-call state threaded through the affix walks.
struct Search<'w> {
    /// The word as typed.
    word: &'w [Ichar],
    opts: LookupOptions,
    hits: HitList,
}

impl<'d> Lookup<'d> {
    pub fn new(dict: &'d Dictionary) -> Self {
        Self { dict }
    }

    /// Record a hit if capitalization allows it; break if that ends the search.
    fn record(&self, search: &mut Search<'_>, hit: Hit) -> ControlFlow<()> {
        if search.opts.all_hits || cap_ok(self.dict, search.word, &hit) {
            search.hits.push(hit);
            if !search.opts.all_hits {
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }

    /// True if an affix with `flags` is admissible under lookup options `opts`.
    fn affix_admissible(&self, flags: AffixFlags, opts: AffixFlags) -> bool {
        if flags.contains(AffixFlags::COMPOUND_ONLY) && !opts.contains(AffixFlags::COMPOUND_ONLY) {
            return false;
        }
        !(self.dict.compound_policy() == CompoundPolicy::Controlled
            && flags.compound_only_differs(opts))
    }

    /// Try every prefix whose append string could start `upper`.
    fn check_prefixes(&self, search: &mut Search<'_>, upper: &[Ichar]) -> ControlFlow<()> {
        let opts = search.opts;
        self.dict.prefix_index().walk(upper, |run| {
            for &id in run {
                self.check_prefix(search, upper, id)?;
            }
            if opts.satisfied(&search.hits) {
                return ControlFlow::Break(());
            }
            ControlFlow::Continue(())
        })
    }

    fn check_prefix(&self, search: &mut Search<'_>, upper: &[Ichar], id: AffixId) -> ControlFlow<()> {
        let entry = self.dict.prefix(id);
        if !self.affix_admissible(entry.flags, search.opts.prefix) {
            return ControlFlow::Continue(());
        }
        let Some(root) = strip_prefix(entry, upper) else {
            return ControlFlow::Continue(());
        };
        if !entry.prefix_conditions_hold(&root) {
            return ControlFlow::Continue(());
        }
        if let Some(dent) = self.dict.lookup(&root) {
            let mask = self.dict.entry(dent).mask();
            if search.opts.ignore_flags || entry.allowed_by(mask) {
                let hit = Hit { root: dent, prefix: Some(id), suffix: None };
                self.record(search, hit)?;
            }
        }
        if entry.is_cross_product() {
            let suffix_opts = search.opts.suffix | AffixFlags::CROSS_PRODUCT;
            self.check_suffixes(search, &root, suffix_opts, Some(id))?;
        }
        ControlFlow::Continue(())
    }

    /// Try every suffix whose append string could end `upper`.
    ///
    /// With `CROSS_PRODUCT` in `opts`, `upper` has already lost the prefix
    /// `prefix` and only cross-product suffixes are considered.
    fn check_suffixes(
        &self,
        search: &mut Search<'_>,
        upper: &[Ichar],
        opts: AffixFlags,
        prefix: Option<AffixId>,
    ) -> ControlFlow<()> {
        let lookup_opts = search.opts;
        self.dict.suffix_index().walk(upper, |run| {
            for &id in run {
                self.check_suffix(search, upper, id, opts, prefix)?;
            }
            if lookup_opts.satisfied(&search.hits) {
                return ControlFlow::Break(());
            }
            ControlFlow::Continue(())
        })
    }

    fn check_suffix(
        &self,
        search: &mut Search<'_>,
        upper: &[Ichar],
        id: AffixId,
        opts: AffixFlags,
        prefix: Option<AffixId>,
    ) -> ControlFlow<()> {
        let entry = self.dict.suffix(id);
        let cross = opts.contains(AffixFlags::CROSS_PRODUCT);
        if cross && !entry.is_cross_product() {
            return ControlFlow::Continue(());
        }
        if !self.affix_admissible(entry.flags, opts) {
            return ControlFlow::Continue(());
        }
        let Some(root) = strip_suffix(entry, upper) else {
            return ControlFlow::Continue(());
        };
        if !entry.suffix_conditions_hold(&root) {
            return ControlFlow::Continue(());
        }
        let Some(dent) = self.dict.lookup(&root) else {
            return ControlFlow::Continue(());
        };
        let mask = self.dict.entry(dent).mask();
        let prefix_ok = match prefix {
            Some(p) if cross => self.dict.prefix(p).allowed_by(mask),
            _ => true,
        };
        if search.opts.ignore_flags || (entry.allowed_by(mask) && prefix_ok) {
            let hit = Hit { root: dent, prefix, suffix: Some(id) };
            self.record(search, hit)?;
        }
        ControlFlow::Continue(())
    }
}

/// Candidate root for `upper` with prefix `entry` removed and its strip
/// string restored, or `None` if the prefix cannot apply.
fn strip_prefix(entry: &AffixEntry, upper: &[Ichar]) -> Option<Vec<Ichar>> {
    let rest = upper.strip_prefix(&entry.append[..])?;
    if rest.is_empty() || rest.len() + entry.strip.len() < entry.num_conds {
        return None;
    }
    let mut root = Vec::with_capacity(entry.strip.len() + rest.len());
    root.extend_from_slice(&entry.strip);
    root.extend_from_slice(rest);
    Some(root)
}

/// Candidate root for `upper` with suffix `entry` removed and its strip
/// string restored.
fn strip_suffix(entry: &AffixEntry, upper: &[Ichar]) -> Option<Vec<Ichar>> {
    let rest = upper.strip_suffix(&entry.append[..])?;
    if rest.is_empty() || rest.len() + entry.strip.len() < entry.num_conds {
        return None;
    }
    let mut root = Vec::with_capacity(rest.len() + entry.strip.len());
    root.extend_from_slice(rest);
    root.extend_from_slice(&entry.strip);
    Some(root)
}

impl Speller for Lookup<'_> {
    fn dictionary(&self) -> &Dictionary {
        self.dict
    }

    fn is_valid(&self, word: &[Ichar], opts: LookupOptions) -> HitList {
        let mut search = Search { word, opts, hits: HitList::new() };
        let upper = self.dict.tables().to_uppercase(word);

        if let Some(root) = self.dict.lookup(&upper) {
            if self.record(&mut search, Hit::root(root)).is_break() || opts.satisfied(&search.hits) {
                return search.hits;
            }
        }

        if self.check_prefixes(&mut search, &upper).is_continue() {
            let _ = self.check_suffixes(&mut search, &upper, opts.suffix, None);
        }
        search.hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{chars, dict_from};
    use ispell_hash::{AffixRule, DictionaryBuilder};

    fn walk_dict() -> Dictionary {
        dict_from(|b| {
            b.suffix(AffixRule::new('D', "", "ED", ".").cross_product())
                .suffix(AffixRule::new('S', "", "S", ".").cross_product())
                .suffix(AffixRule::new('Y', "Y", "IES", "[^AEIOU]Y"))
                .prefix(AffixRule::new('R', "", "RE", ".").cross_product())
                .prefix(AffixRule::new('U', "", "UN", "."))
                .words(["walk/DR", "talk/S", "cry/Y", "play/Y", "do/RU", "hello", "Paris/S", "NASA"]);
        })
    }

    fn valid(d: &Dictionary, w: &str) -> bool {
        !Lookup::new(d).is_valid(&chars(w), LookupOptions::FIRST).is_empty()
    }

    #[test]
    fn bare_roots_in_any_legal_case() {
        let d = walk_dict();
        assert!(valid(&d, "hello"));
        assert!(valid(&d, "Hello"));
        assert!(valid(&d, "HELLO"));
        assert!(!valid(&d, "helllo"));
    }

    #[test]
    fn suffix_with_flag_is_accepted() {
        let d = walk_dict();
        let hits = Lookup::new(&d).is_valid(&chars("WALKED"), LookupOptions::FIRST);
        assert_eq!(hits.len(), 1);
        let hit = hits.as_slice()[0];
        assert!(hit.prefix.is_none());
        let suffix = d.suffix(hit.suffix.unwrap());
        assert_eq!(&suffix.append[..], &chars("ED")[..]);
        assert_eq!(suffix.flag_bit, u32::from(b'D' - b'A'));
    }

    #[test]
    fn suffix_without_flag_is_rejected() {
        let d = walk_dict();
        assert!(!valid(&d, "WALKS"));
        assert!(valid(&d, "TALKS"));
        assert!(!valid(&d, "TALKED"));
    }

    #[test]
    fn strip_and_conditions() {
        let d = walk_dict();
        assert!(valid(&d, "cries"));
        // "play" ends in a vowel before Y, so -Y,IES does not apply
        assert!(!valid(&d, "plaies"));
    }

    #[test]
    fn prefix_and_cross_product() {
        let d = walk_dict();
        assert!(valid(&d, "redo"));
        assert!(valid(&d, "undo"));
        assert!(valid(&d, "rewalk"));
        assert!(valid(&d, "rewalked"));
        // TALK does not take RE
        assert!(!valid(&d, "retalks"));
    }

    #[test]
    fn capitalization_is_enforced_on_affixed_forms() {
        let d = walk_dict();
        assert!(valid(&d, "Paris"));
        assert!(valid(&d, "Pariss"));
        assert!(!valid(&d, "paris"));
        assert!(!valid(&d, "pariss"));
        assert!(!valid(&d, "nasa"));
        assert!(valid(&d, "NASA"));
    }

    #[test]
    fn all_hits_ignores_case() {
        let d = walk_dict();
        let hits = Lookup::new(&d).is_valid(&chars("paris"), LookupOptions::ALL);
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn ignore_flags_accepts_any_root() {
        let d = walk_dict();
        let opts = LookupOptions { ignore_flags: true, ..LookupOptions::ALL };
        assert!(!Lookup::new(&d).is_valid(&chars("WALKS"), opts).is_empty());
    }

    #[test]
    fn characters_outside_the_tables_do_not_match() {
        let d = walk_dict();
        let mut w = chars("walke");
        w.push(9000);
        assert!(Lookup::new(&d).is_valid(&w, LookupOptions::FIRST).is_empty());
    }

    #[test]
    fn compound_only_affixes_need_compound_options() {
        let d = dict_from(|b: &mut DictionaryBuilder| {
            b.suffix(AffixRule::new('C', "", "S", ".").compound_only()).word("sun/C");
        });
        let lookup = Lookup::new(&d);
        assert!(lookup.is_valid(&chars("SUNS"), LookupOptions::FIRST).is_empty());
        let compound = LookupOptions::FIRST.with_affix_options(AffixFlags::NONE, AffixFlags::COMPOUND_ONLY);
        assert!(!lookup.is_valid(&chars("SUNS"), compound).is_empty());
    }
}

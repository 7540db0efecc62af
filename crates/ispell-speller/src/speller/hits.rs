// Hit records: one root/affix decomposition of a surface word

use ispell_core::enums::MAX_HITS;
use ispell_hash::{AffixId, Dictionary, EntryId};

/// One way a surface word decomposes into a root plus optional affixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hit {
    pub root: EntryId,
    pub prefix: Option<AffixId>,
    pub suffix: Option<AffixId>,
}

impl Hit {
    /// A bare root match with no affixes.
    pub fn root(root: EntryId) -> Self {
        Self { root, prefix: None, suffix: None }
    }

    /// `(strip, append)` lengths of the prefix, or zeros.
    pub fn prefix_lens(&self, dict: &Dictionary) -> (usize, usize) {
        self.prefix.map_or((0, 0), |id| {
            let p = dict.prefix(id);
            (p.strip.len(), p.append.len())
        })
    }

    /// `(strip, append)` lengths of the suffix, or zeros.
    pub fn suffix_lens(&self, dict: &Dictionary) -> (usize, usize) {
        self.suffix.map_or((0, 0), |id| {
            let s = dict.suffix(id);
            (s.strip.len(), s.append.len())
        })
    }

    /// True if `mask` allows every affix this hit uses.
    pub fn affixes_allowed_by(&self, dict: &Dictionary, mask: u32) -> bool {
        self.prefix.is_none_or(|id| dict.prefix(id).allowed_by(mask))
            && self.suffix.is_none_or(|id| dict.suffix(id).allowed_by(mask))
    }
}

/// Bounded list of distinct hits collected by one lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HitList {
    hits: Vec<Hit>,
}

impl HitList {
    pub fn new() -> Self {
        Self { hits: Vec::with_capacity(MAX_HITS) }
    }

    /// Record a hit. Duplicates and hits beyond [`MAX_HITS`] are dropped;
    /// returns whether the hit was added.
    pub fn push(&mut self, hit: Hit) -> bool {
        if self.hits.len() >= MAX_HITS || self.hits.contains(&hit) {
            return false;
        }
        self.hits.push(hit);
        true
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Hit> {
        self.hits.iter()
    }

    pub fn as_slice(&self) -> &[Hit] {
        &self.hits
    }
}

impl<'a> IntoIterator for &'a HitList {
    type Item = &'a Hit;
    type IntoIter = std::slice::Iter<'a, Hit>;

    fn into_iter(self) -> Self::IntoIter {
        self.hits.iter()
    }
}

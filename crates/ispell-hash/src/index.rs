// Self-splitting affix lookup index

use std::ops::ControlFlow;

use ispell_core::charset::Ichar;
use ispell_core::enums::MAX_SEARCH;

use crate::affix::{AffixEntry, AffixId, AffixKind};
use crate::{LoadError, try_vec};

/// One slot of an index table.
#[derive(Debug, Default)]
pub enum IndexSlot {
    #[default]
    Empty,
    /// Affixes sharing the key path so far, in table order.
    Leaf(Vec<AffixId>),
    /// Child table indexed by the next key character; slot 0 holds affixes
    /// whose key ended at this depth.
    Node(Box<[IndexSlot]>),
}

impl IndexSlot {
    /// Child slot for key character `c`, if this slot is a node.
    pub fn probe(&self, c: Ichar) -> Option<&IndexSlot> {
        match self {
            IndexSlot::Node(children) => children.get(c as usize),
            _ => None,
        }
    }

    /// Affixes whose key ended at this node.
    fn ended_here(&self) -> Option<&[AffixId]> {
        match self.probe(0) {
            Some(IndexSlot::Leaf(run)) => Some(run),
            _ => None,
        }
    }
}

/// Index over prefix or suffix entries keyed by the affix string.
///
/// Prefixes are keyed from their first character forward, suffixes from
/// their last character backward. A leaf holding [`MAX_SEARCH`] or more
/// distinct affixes is split into a child table on the next key character.
#[derive(Debug)]
pub struct AffixIndex {
    kind: AffixKind,
    root: IndexSlot,
}

fn new_table(code_count: usize) -> Result<Box<[IndexSlot]>, LoadError> {
    let mut slots = try_vec("affix index", code_count)?;
    slots.resize_with(code_count, IndexSlot::default);
    Ok(slots.into_boxed_slice())
}

/// Key character `depth` of an affix, or `None` once the affix is exhausted.
fn key_char(entry: &AffixEntry, kind: AffixKind, depth: usize) -> Option<Ichar> {
    let a = &entry.append;
    match kind {
        AffixKind::Prefix => a.get(depth).copied(),
        AffixKind::Suffix => a.len().checked_sub(depth + 1).map(|i| a[i]),
    }
}

impl AffixIndex {
    /// Build the index for `entries`, which must already be sorted.
    pub fn build(
        entries: &[AffixEntry],
        kind: AffixKind,
        code_count: usize,
    ) -> Result<Self, LoadError> {
        let mut index = AffixIndex { kind, root: IndexSlot::Node(new_table(code_count.max(1))?) };
        for i in 0..entries.len() {
            let id = AffixId(i as u32);
            let mut root = std::mem::take(&mut index.root);
            index.insert(&mut root, entries, id, 0, false, code_count)?;
            index.root = root;
        }
        Ok(index)
    }

    fn insert(
        &self,
        slot: &mut IndexSlot,
        entries: &[AffixEntry],
        id: AffixId,
        depth: usize,
        via_zero: bool,
        code_count: usize,
    ) -> Result<(), LoadError> {
        let entry = &entries[id.index()];
        match slot {
            IndexSlot::Node(children) => match key_char(entry, self.kind, depth) {
                None => self.insert(&mut children[0], entries, id, depth, true, code_count),
                Some(c) => match children.get_mut(c as usize) {
                    Some(child) => self.insert(child, entries, id, depth + 1, false, code_count),
                    None => {
                        log::warn!("affix {} uses character code {c} outside the table", id.0);
                        Ok(())
                    }
                },
            },
            IndexSlot::Empty => {
                *slot = IndexSlot::Leaf(vec![id]);
                Ok(())
            }
            IndexSlot::Leaf(run) => {
                run.push(id);
                let split = !via_zero
                    && run.len() >= MAX_SEARCH
                    && entries[run[0].index()].append != entry.append;
                if split {
                    let run = std::mem::take(run);
                    *slot = IndexSlot::Node(new_table(code_count)?);
                    for moved in run {
                        self.insert(slot, entries, moved, depth, false, code_count)?;
                    }
                }
                Ok(())
            }
        }
    }

    pub fn kind(&self) -> AffixKind {
        self.kind
    }

    /// Top-level slot for the first (prefix) or last (suffix) character of a word.
    pub fn probe(&self, c: Ichar) -> Option<&IndexSlot> {
        self.root.probe(c)
    }

    /// Visit every candidate run for `word`, most general first.
    ///
    /// Runs are visited in index order: empty affixes, then for each key
    /// character consumed, the run of affixes that ended there, then the
    /// final leaf reached. Stops early when `visit` breaks.
    pub fn walk<F>(&self, word: &[Ichar], mut visit: F) -> ControlFlow<()>
    where
        F: FnMut(&[AffixId]) -> ControlFlow<()>,
    {
        if let Some(run) = self.root.ended_here() {
            visit(run)?;
        }

        let mut keys: Box<dyn Iterator<Item = Ichar>> = match self.kind {
            AffixKind::Prefix => Box::new(word.iter().copied()),
            AffixKind::Suffix => Box::new(word.iter().rev().copied()),
        };
        let Some(mut slot) = keys.next().and_then(|c| self.probe(c)) else {
            return ControlFlow::Continue(());
        };
        loop {
            match slot {
                IndexSlot::Empty => return ControlFlow::Continue(()),
                IndexSlot::Leaf(run) => return visit(run),
                IndexSlot::Node(_) => {
                    let Some(c) = keys.next() else {
                        return ControlFlow::Continue(());
                    };
                    if let Some(run) = slot.ended_here() {
                        visit(run)?;
                    }
                    match slot.probe(c) {
                        Some(next) => slot = next,
                        None => return ControlFlow::Continue(()),
                    }
                }
            }
        }
    }

    /// Number of child tables, including the root.
    pub fn node_count(&self) -> usize {
        fn count(slot: &IndexSlot) -> usize {
            match slot {
                IndexSlot::Node(children) => 1 + children.iter().map(count).sum::<usize>(),
                _ => 0,
            }
        }
        count(&self.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ispell_core::enums::{AffixFlags, CHAR_SPACE, SET_SIZE};

    fn chars(s: &str) -> Vec<Ichar> {
        s.bytes().map(|b| b as Ichar).collect()
    }

    fn entry(append: &str) -> AffixEntry {
        AffixEntry {
            strip: Box::new([]),
            append: chars(append).into(),
            flag_bit: 0,
            flags: AffixFlags::NONE,
            num_conds: 0,
            conds: vec![0; CHAR_SPACE].into(),
        }
    }

    fn collect(index: &AffixIndex, word: &str, entries: &[AffixEntry]) -> Vec<String> {
        let mut seen = Vec::new();
        let _ = index.walk(&chars(word), |run| {
            for id in run {
                seen.push(String::from_utf8(entries[id.index()].append.iter().map(|&c| c as u8).collect()).unwrap());
            }
            ControlFlow::Continue(())
        });
        seen
    }

    #[test]
    fn suffix_walk_finds_matching_endings() {
        let entries: Vec<_> = ["", "S", "ED", "ING"].into_iter().map(entry).collect();
        let index = AffixIndex::build(&entries, AffixKind::Suffix, SET_SIZE).unwrap();
        let found = collect(&index, "WALKED", &entries);
        assert!(found.contains(&String::new()));
        assert!(found.contains(&"ED".to_string()));
        assert!(!found.contains(&"S".to_string()));
    }

    #[test]
    fn crowded_leaf_splits_on_next_character() {
        let entries: Vec<_> = ["ES", "IES", "NESS", "S", "LESS"].into_iter().map(entry).collect();
        let index = AffixIndex::build(&entries, AffixKind::Suffix, SET_SIZE).unwrap();
        assert!(index.node_count() > 1);
        let found = collect(&index, "KINDNESS", &entries);
        assert!(found.contains(&"NESS".to_string()));
        assert!(found.contains(&"S".to_string()));
        assert!(!found.contains(&"ES".to_string()));
        assert!(!found.contains(&"IES".to_string()));
    }

    #[test]
    fn identical_affixes_do_not_split() {
        let entries: Vec<_> = ["S", "S", "S", "S", "S"].into_iter().map(entry).collect();
        let index = AffixIndex::build(&entries, AffixKind::Suffix, SET_SIZE).unwrap();
        assert_eq!(index.node_count(), 1);
        assert_eq!(collect(&index, "CATS", &entries).len(), 5);
    }

    #[test]
    fn prefix_walk_keys_forward() {
        let entries: Vec<_> = ["RE", "UN", "PRE"].into_iter().map(entry).collect();
        let index = AffixIndex::build(&entries, AffixKind::Prefix, SET_SIZE).unwrap();
        assert_eq!(collect(&index, "REDO", &entries), vec!["RE".to_string()]);
        assert!(collect(&index, "DO", &entries).is_empty());
    }

    #[test]
    fn walk_stops_when_visitor_breaks() {
        let entries: Vec<_> = ["", "S"].into_iter().map(entry).collect();
        let index = AffixIndex::build(&entries, AffixKind::Suffix, SET_SIZE).unwrap();
        let mut visits = 0;
        let flow = index.walk(&chars("CATS"), |_| {
            visits += 1;
            ControlFlow::Break(())
        });
        assert!(flow.is_break());
        assert_eq!(visits, 1);
    }

    #[test]
    fn probe_returns_leaf_or_child_table() {
        let entries: Vec<_> = ["ES", "IES", "NESS", "S", "LESS", "ED"].into_iter().map(entry).collect();
        let index = AffixIndex::build(&entries, AffixKind::Suffix, SET_SIZE).unwrap();
        let s = index.probe(b'S' as Ichar).unwrap();
        assert!(matches!(s, IndexSlot::Node(_)));
        assert!(matches!(s.probe(b'E' as Ichar), Some(IndexSlot::Node(_)) | Some(IndexSlot::Leaf(_))));
        match index.probe(b'D' as Ichar) {
            Some(IndexSlot::Leaf(run)) => assert_eq!(run.len(), 1),
            other => panic!("expected a leaf, got {other:?}"),
        }
        assert!(matches!(index.probe(b'Q' as Ichar), Some(IndexSlot::Empty)));
        assert!(index.probe(9000).is_none());
    }
}

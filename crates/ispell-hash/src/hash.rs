// Bucket hash for dictionary words

use ispell_core::charset::{CharTables, Ichar};

/// Left-rotation applied per character after the seed.
pub const HASH_SHIFT: u32 = 5;

/// Seed width of the hash, fixed when the dictionary was built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashWidth {
    /// Seed from 4 characters shifted by 8 bits each.
    Narrow,
    /// Seed from 2 characters shifted by 16 bits each.
    Wide,
}

impl HashWidth {
    fn seed(self) -> (usize, u32) {
        match self {
            HashWidth::Narrow => (4, 8),
            HashWidth::Wide => (2, 16),
        }
    }
}

/// Hash `word` into `0..table_size`.
///
/// Characters are folded to uppercase first, so every case form of a word
/// lands in the same bucket.
pub fn hash(word: &[Ichar], table_size: usize, width: HashWidth, tables: &CharTables) -> usize {
    if table_size == 0 {
        return 0;
    }
    let (seed_chars, seed_shift) = width.seed();
    let mut chars = word.iter().map(|&c| u32::from(tables.to_upper(c)));
    let mut h: u32 = 0;
    for c in chars.by_ref().take(seed_chars) {
        h = (h << seed_shift) | c;
    }
    for c in chars {
        h = h.rotate_left(HASH_SHIFT) ^ c;
    }
    (h % table_size as u32) as usize
}

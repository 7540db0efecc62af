// Engine-wide constants, compound policy and affix option flags

// ---------------------------------------------------------------------------
// Character space
// ---------------------------------------------------------------------------

/// Number of raw byte codes in the internal character space.
pub const SET_SIZE: usize = 256;

/// Maximum number of multi-byte "string characters" a dictionary may define.
///
/// A hash file declaring a different value is rejected at load time.
pub const MAX_STRING_CHARS: usize = 128;

/// Maximum byte length of one string character (excluding the terminator).
pub const MAX_STRING_CHAR_LEN: usize = 10;

/// Size of every classification table: raw bytes plus synthetic string-character codes.
pub const CHAR_SPACE: usize = SET_SIZE + MAX_STRING_CHARS;

// ---------------------------------------------------------------------------
// Buffer and list limits
// ---------------------------------------------------------------------------

/// Longest word the engine accepts from callers.
pub const INPUT_WORD_LEN: usize = 100;

/// Longest affix string.
pub const MAX_AFFIX_LEN: usize = 20;

/// Words of this many internal characters or more are never checked.
pub const MAX_WORD_LEN: usize = INPUT_WORD_LEN + MAX_AFFIX_LEN;

/// Capacity of the hit list collected by one lookup.
pub const MAX_HITS: usize = 10;

/// Maximum number of capitalization variants generated per hit list.
pub const MAX_CAPS: usize = 10;

/// Default capacity of the possibility list.
pub const MAX_POSSIBLE: usize = 100;

/// An affix index slot with this many entries is split into a child table.
pub const MAX_SEARCH: usize = 4;

/// Maximum number of adjacency conditions per affix (one bit each in `conds`).
pub const MAX_CONDITIONS: usize = 8;

// ---------------------------------------------------------------------------
// Dictionary entry mask layout
// ---------------------------------------------------------------------------

/// Width of the per-entry mask in bits.
pub const MASK_BITS: u32 = 32;

/// First bit above the affix flags; affix flags occupy bits `0..FLAG_BASE`.
pub const FLAG_BASE: u32 = MASK_BITS - 6;

/// Entry was referenced while building (kept for format compatibility).
pub const USED: u32 = 1 << FLAG_BASE;

/// Entry must be kept by dictionary maintenance tools.
pub const KEEP: u32 = 1 << (FLAG_BASE + 1);

/// Bits holding the capitalization type.
pub const CAP_TYPE_MASK: u32 = 3 << (FLAG_BASE + 2);

/// Set on every entry of a capitalization chain except the last.
pub const MORE_VARIANTS: u32 = 1 << (FLAG_BASE + 4);

/// Number of distinct affix flags that fit in the mask.
pub const AFFIX_FLAG_COUNT: u32 = FLAG_BASE;

// ---------------------------------------------------------------------------
// Compound policy
// ---------------------------------------------------------------------------

/// How a dictionary treats run-together compound words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompoundPolicy {
    /// Compound words are never accepted.
    Never,
    /// Any two (or more) valid words may be run together.
    Anytime,
    /// Only roots carrying the dictionary's compound flag may be joined,
    /// and compound-only affixes must match the compound context exactly.
    Controlled,
}

impl CompoundPolicy {
    /// Decode the on-disk policy byte. Unknown values are treated as `Never`.
    pub fn from_byte(b: u8) -> Self {
        match b {
            1 => CompoundPolicy::Anytime,
            2 => CompoundPolicy::Controlled,
            _ => CompoundPolicy::Never,
        }
    }

    pub fn to_byte(self) -> u8 {
        match self {
            CompoundPolicy::Never => 0,
            CompoundPolicy::Anytime => 1,
            CompoundPolicy::Controlled => 2,
        }
    }
}

// ---------------------------------------------------------------------------
// Affix flags
// ---------------------------------------------------------------------------

/// Small bitset carried by each affix entry and used as lookup options.
///
/// As an affix attribute, `CROSS_PRODUCT` means the affix may combine with an
/// affix on the opposite end of the word and `COMPOUND_ONLY` restricts it to
/// compound parts. As a lookup option, the same bits request cross-product
/// suffix matching and compound-only affix matching respectively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AffixFlags(u8);

impl AffixFlags {
    pub const NONE: AffixFlags = AffixFlags(0);
    pub const CROSS_PRODUCT: AffixFlags = AffixFlags(1 << 0);
    pub const COMPOUND_ONLY: AffixFlags = AffixFlags(1 << 1);

    pub const fn from_bits(bits: u8) -> Self {
        AffixFlags(bits & 0x03)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, other: AffixFlags) -> bool {
        self.0 & other.0 == other.0 && other.0 != 0
    }

    pub const fn union(self, other: AffixFlags) -> Self {
        AffixFlags(self.0 | other.0)
    }

    /// True if `self` and `other` disagree on the compound-only bit.
    pub const fn compound_only_differs(self, other: AffixFlags) -> bool {
        (self.0 ^ other.0) & Self::COMPOUND_ONLY.0 != 0
    }
}

impl std::ops::BitOr for AffixFlags {
    type Output = AffixFlags;

    fn bitor(self, rhs: AffixFlags) -> AffixFlags {
        self.union(rhs)
    }
}

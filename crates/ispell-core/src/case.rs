// Capitalization type detection and mask encoding

use crate::charset::{CharTables, Ichar};
use crate::enums::{CAP_TYPE_MASK, FLAG_BASE};

/// Capitalization pattern of a word or dictionary variant.
///
/// The discriminants are the values stored in the capitalization bits of a
/// dictionary entry mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CapType {
    /// All letters lowercase: "hello". As a dictionary type: any case accepted.
    AnyCase = 0,
    /// No lowercase letters: "HELLO".
    AllCaps = 1,
    /// Only the first letter uppercase: "Hello".
    Capitalized = 2,
    /// Any other mix: "McDonald", "iPod". As a dictionary type: the stored
    /// exemplar's case must be followed literally.
    FollowCase = 3,
}

impl CapType {
    /// Extract the capitalization type from an entry mask.
    pub fn from_mask(mask: u32) -> Self {
        match (mask & CAP_TYPE_MASK) >> (FLAG_BASE + 2) {
            0 => CapType::AnyCase,
            1 => CapType::AllCaps,
            2 => CapType::Capitalized,
            _ => CapType::FollowCase,
        }
    }

    /// The mask bits encoding this capitalization type.
    pub fn mask_bits(self) -> u32 {
        (self as u32) << (FLAG_BASE + 2)
    }
}

/// Classify the capitalization pattern of `word`.
///
/// A word with no lowercase letters is `AllCaps` (this includes words with
/// no letters at all). Otherwise, uppercase letters appearing after a
/// lowercase one make it `FollowCase`; if every uppercase letter precedes
/// the first lowercase one, a single leading capital is `Capitalized`, more
/// than one is `FollowCase`, and none at all is `AnyCase`.
pub fn classify(word: &[Ichar], tables: &CharTables) -> CapType {
    let Some(first_lower) = word.iter().position(|&c| tables.is_lower(c)) else {
        return CapType::AllCaps;
    };
    if word[first_lower..].iter().any(|&c| tables.is_upper(c)) {
        return CapType::FollowCase;
    }
    match word.first() {
        Some(&c) if tables.is_upper(c) => {
            if word[1..].iter().any(|&c| tables.is_upper(c)) {
                CapType::FollowCase
            } else {
                CapType::Capitalized
            }
        }
        _ => CapType::AnyCase,
    }
}

/// True if `region` contains no letter of the wrong case: no lowercase
/// letters when `upper` is set, no uppercase letters otherwise.
pub fn region_has_case(region: &[Ichar], upper: bool, tables: &CharTables) -> bool {
    if upper {
        !region.iter().any(|&c| tables.is_lower(c))
    } else {
        !region.iter().any(|&c| tables.is_upper(c))
    }
}

/// Force every letter of `region` to the given case.
pub fn set_region_case(region: &mut [Ichar], upper: bool, tables: &CharTables) {
    if upper {
        tables.upcase(region);
    } else {
        tables.lowcase(region);
    }
}

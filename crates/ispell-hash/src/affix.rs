// In-memory affix entries and their adjacency conditions

use ispell_core::charset::Ichar;
use ispell_core::enums::AffixFlags;

/// Which end of the word an affix attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AffixKind {
    Prefix,
    Suffix,
}

/// Index of an affix within its (prefix or suffix) table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AffixId(pub u32);

impl AffixId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One prefix or suffix rule.
///
/// Applying the rule to a root removes `strip` from the attached end and
/// adds `append`. Both strings are stored uppercase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AffixEntry {
    pub strip: Box<[Ichar]>,
    pub append: Box<[Ichar]>,
    /// Mask bit a root must carry to accept this affix.
    pub flag_bit: u32,
    pub flags: AffixFlags,
    /// Number of condition positions tested against the root.
    pub num_conds: usize,
    /// Per-character condition bits, indexed by internal code.
    pub conds: Box<[u8]>,
}

impl AffixEntry {
    #[inline]
    pub fn is_cross_product(&self) -> bool {
        self.flags.contains(AffixFlags::CROSS_PRODUCT)
    }

    #[inline]
    pub fn is_compound_only(&self) -> bool {
        self.flags.contains(AffixFlags::COMPOUND_ONLY)
    }

    /// The mask bit for this affix's flag.
    #[inline]
    pub fn flag_mask(&self) -> u32 {
        1u32.checked_shl(self.flag_bit).unwrap_or(0)
    }

    /// True if `mask` carries this affix's flag.
    #[inline]
    pub fn allowed_by(&self, mask: u32) -> bool {
        mask & self.flag_mask() != 0
    }

    #[inline]
    fn condition_holds(&self, position: usize, c: Ichar) -> bool {
        self.conds
            .get(c as usize)
            .is_some_and(|bits| bits & (1 << position) != 0)
    }

    /// Test the conditions against the leading characters of a candidate root.
    pub fn prefix_conditions_hold(&self, root: &[Ichar]) -> bool {
        root.len() >= self.num_conds
            && root[..self.num_conds]
                .iter()
                .enumerate()
                .all(|(i, &c)| self.condition_holds(i, c))
    }

    /// Test the conditions against the trailing characters of a candidate root.
    ///
    /// Condition `num_conds - 1` applies to the last character.
    pub fn suffix_conditions_hold(&self, root: &[Ichar]) -> bool {
        root.len() >= self.num_conds
            && root[root.len() - self.num_conds..]
                .iter()
                .enumerate()
                .all(|(i, &c)| self.condition_holds(i, c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ispell_core::enums::CHAR_SPACE;

    fn chars(s: &str) -> Vec<Ichar> {
        s.bytes().map(|b| b as Ichar).collect()
    }

    // Suffix "-Y,IED" style: root must end in a non-vowel then Y
    fn ied_suffix() -> AffixEntry {
        let mut conds = vec![0u8; CHAR_SPACE];
        for c in b'A'..=b'Z' {
            if !b"AEIOU".contains(&c) {
                conds[c as usize] |= 1 << 0;
            }
        }
        conds[b'Y' as usize] |= 1 << 1;
        AffixEntry {
            strip: chars("Y").into(),
            append: chars("IED").into(),
            flag_bit: 3,
            flags: AffixFlags::CROSS_PRODUCT,
            num_conds: 2,
            conds: conds.into(),
        }
    }

    #[test]
    fn suffix_conditions_read_from_the_end() {
        let e = ied_suffix();
        assert!(e.suffix_conditions_hold(&chars("CRY")));
        assert!(!e.suffix_conditions_hold(&chars("PLAY")));
        assert!(!e.suffix_conditions_hold(&chars("Y")));
    }

    #[test]
    fn prefix_conditions_read_from_the_start() {
        let mut e = ied_suffix();
        e.num_conds = 1;
        assert!(e.prefix_conditions_hold(&chars("CAT")));
        assert!(!e.prefix_conditions_hold(&chars("APE")));
    }

    #[test]
    fn flags_and_mask() {
        let e = ied_suffix();
        assert!(e.is_cross_product());
        assert!(!e.is_compound_only());
        assert!(e.allowed_by(0b1000));
        assert!(!e.allowed_by(0b0100));
    }

    #[test]
    fn out_of_range_characters_fail_conditions() {
        let e = ied_suffix();
        assert!(!e.suffix_conditions_hold(&[9999, b'Y' as Ichar]));
    }
}

// Fixed-size on-disk entry and affix records

use bytemuck::{Pod, Zeroable};
use ispell_core::enums::CHAR_SPACE;

use crate::bytes::ByteReader;
use crate::{LoadError, try_vec};

/// Sentinel for "no link" and "no string" in record fields.
pub const NO_LINK: u32 = 0xFFFF_FFFF;

/// One hash table slot (12 bytes).
///
/// - `next`: index of the next entry in the chain, or [`NO_LINK`]
/// - `word`: offset of the NUL-terminated word in the string blob, or [`NO_LINK`]
/// - `mask`: affix flags, capitalization type and variant bit
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct RawEntry {
    pub next: u32,
    pub word: u32,
    pub mask: u32,
}

impl RawEntry {
    /// An unoccupied slot.
    pub const EMPTY: RawEntry = RawEntry { next: NO_LINK, word: NO_LINK, mask: 0 };

    /// Convert from file byte order to native.
    pub fn from_le(self) -> Self {
        Self {
            next: u32::from_le(self.next),
            word: u32::from_le(self.word),
            mask: u32::from_le(self.mask),
        }
    }

    /// Convert from native byte order to file order.
    pub fn to_le(self) -> Self {
        Self {
            next: self.next.to_le(),
            word: self.word.to_le(),
            mask: self.mask.to_le(),
        }
    }
}

/// One prefix or suffix record (404 bytes).
///
/// `strip` and `affix` are string blob offsets ([`NO_LINK`] when empty),
/// `conds[c]` holds one bit per condition position that character `c`
/// satisfies.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct RawAffix {
    pub strip: u32,
    pub affix: u32,
    pub flag_bit: i16,
    pub strip_len: i16,
    pub affix_len: i16,
    pub num_conds: i16,
    pub flag_flags: i16,
    pub conds: [u8; CHAR_SPACE],
    pub _padding: [u8; 2],
}

impl RawAffix {
    pub fn from_le(self) -> Self {
        Self {
            strip: u32::from_le(self.strip),
            affix: u32::from_le(self.affix),
            flag_bit: i16::from_le(self.flag_bit),
            strip_len: i16::from_le(self.strip_len),
            affix_len: i16::from_le(self.affix_len),
            num_conds: i16::from_le(self.num_conds),
            flag_flags: i16::from_le(self.flag_flags),
            ..self
        }
    }

    pub fn to_le(self) -> Self {
        Self {
            strip: self.strip.to_le(),
            affix: self.affix.to_le(),
            flag_bit: self.flag_bit.to_le(),
            strip_len: self.strip_len.to_le(),
            affix_len: self.affix_len.to_le(),
            num_conds: self.num_conds.to_le(),
            flag_flags: self.flag_flags.to_le(),
            ..self
        }
    }
}

/// Size of a serialized [`RawEntry`].
pub const ENTRY_SIZE: usize = size_of::<RawEntry>();

/// Size of a serialized [`RawAffix`].
pub const AFFIX_SIZE: usize = size_of::<RawAffix>();

/// Read `count` records of `T` from `r` into an aligned vector.
///
/// The source bytes may not be aligned for a zero-copy cast, so the records
/// are copied into zeroed storage first.
pub(crate) fn read_records<T: Pod>(
    r: &mut ByteReader<'_>,
    table: &'static str,
    count: usize,
) -> Result<Vec<T>, LoadError> {
    let byte_len = count
        .checked_mul(size_of::<T>())
        .ok_or(LoadError::OutOfMemory { table, entries: count })?;
    let src = r.take(byte_len)?;
    let mut records: Vec<T> = try_vec(table, count)?;
    records.resize(count, T::zeroed());
    bytemuck::cast_slice_mut::<T, u8>(&mut records).copy_from_slice(src);
    Ok(records)
}

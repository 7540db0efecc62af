// Hash file header: layout constants, parsing, validation and serialization

use ispell_core::charset::{CharTables, StringChar};
use ispell_core::enums::{
    CHAR_SPACE, CompoundPolicy, MAX_STRING_CHAR_LEN, MAX_STRING_CHARS, MAX_WORD_LEN, SET_SIZE,
};

use crate::LoadError;
use crate::bytes::{ByteReader, ByteWriter};
use crate::hash::HashWidth;

/// Leading and trailing magic number of every hash file.
pub const MAGIC: u16 = 0x9602;

/// Size in bytes of the serialized header, including trailing padding.
pub const HEADER_SIZE: usize = 6608;

/// `compile_options` bit selecting the 4-character (8-bit) hash seed.
pub const COMPILE_NARROW_HASH: u16 = 1 << 0;

const NR_CHARS_LEN: usize = 5;
const TEX_CHARS_LEN: usize = 13;
/// Byte width of one string-character slot (text plus NUL terminator).
const STRING_CHAR_SLOT: usize = MAX_STRING_CHAR_LEN + 1;

/// Parsed hash file header.
///
/// Table counts are kept as `usize` after validation; the character tables
/// are decoded straight into [`CharTables`].
#[derive(Debug, Clone)]
pub struct HashHeader {
    pub compile_options: u16,
    pub max_slen: i16,
    /// Minimum length of each compound part.
    pub compound_min: i16,
    /// Mask bit marking roots allowed in controlled compounds, or negative for none.
    pub compound_bit: i16,
    /// Byte size of the string blob.
    pub string_size: usize,
    pub lstring_size: i32,
    /// Number of entry slots in the hash table.
    pub tbl_size: usize,
    /// Number of suffix records.
    pub stbl_size: usize,
    /// Number of prefix records.
    pub ptbl_size: usize,
    pub sort_val: i32,
    pub nstr_char_type: i32,
    pub str_type_start: i32,
    pub nr_chars: [u8; NR_CHARS_LEN],
    pub tex_chars: [u8; TEX_CHARS_LEN],
    pub compound_policy: CompoundPolicy,
    pub def_hard_flag: u8,
    pub flag_marker: u8,
    pub tables: CharTables,
}

impl HashHeader {
    pub fn hash_width(&self) -> HashWidth {
        if self.compile_options & COMPILE_NARROW_HASH != 0 {
            HashWidth::Narrow
        } else {
            HashWidth::Wide
        }
    }

    /// The compound mask bit, if the dictionary declares one.
    pub fn compound_mask(&self) -> Option<u32> {
        u32::try_from(self.compound_bit)
            .ok()
            .filter(|&bit| bit < 32)
            .map(|bit| 1u32 << bit)
    }

    /// Minimum compound part length, never less than one.
    pub fn compound_min(&self) -> usize {
        usize::try_from(self.compound_min).unwrap_or(0).max(1)
    }
}

fn count(value: i32, field: &str) -> Result<usize, LoadError> {
    usize::try_from(value)
        .map_err(|_| LoadError::IncompatibleFormat(format!("negative {field}: {value}")))
}

fn read_u16_table(r: &mut ByteReader<'_>) -> Result<Vec<u16>, LoadError> {
    let mut v = Vec::with_capacity(CHAR_SPACE);
    for _ in 0..CHAR_SPACE {
        v.push(r.u16()?);
    }
    Ok(v)
}

fn read_bool_table(r: &mut ByteReader<'_>, len: usize) -> Result<Vec<bool>, LoadError> {
    Ok(r.take(len)?.iter().map(|&b| b != 0).collect())
}

/// Parse and validate the header at the start of `data`.
pub fn parse_header(data: &[u8]) -> Result<HashHeader, LoadError> {
    let mut r = ByteReader::new(data, "header");

    let magic = r.u16()?;
    if magic != MAGIC {
        return Err(LoadError::BadMagic { expected: MAGIC, found: magic });
    }
    let compile_options = r.u16()?;
    let max_slen = r.i16()?;
    let max_string_chars = r.i16()?;
    let max_string_char_len = r.i16()?;
    let compound_min = r.i16()?;
    let compound_bit = r.i16()?;

    if max_string_chars as usize != MAX_STRING_CHARS {
        return Err(LoadError::IncompatibleFormat(format!(
            "file built with {max_string_chars} string characters, expected {MAX_STRING_CHARS}"
        )));
    }
    if max_string_char_len as usize != MAX_STRING_CHAR_LEN {
        return Err(LoadError::IncompatibleFormat(format!(
            "file built with string characters of {max_string_char_len} bytes, expected {MAX_STRING_CHAR_LEN}"
        )));
    }

    let string_size = count(r.i32()?, "string size")?;
    let lstring_size = r.i32()?;
    let tbl_size = count(r.i32()?, "table size")?;
    let stbl_size = count(r.i32()?, "suffix table size")?;
    let ptbl_size = count(r.i32()?, "prefix table size")?;
    let sort_val = r.i32()?;
    let nstr_chars = count(r.i32()?, "string character count")?;
    let nstr_char_type = r.i32()?;
    let str_type_start = r.i32()?;

    if tbl_size == 0 {
        return Err(LoadError::IncompatibleFormat("empty hash table".into()));
    }
    if nstr_chars > MAX_STRING_CHARS {
        return Err(LoadError::IncompatibleFormat(format!(
            "{nstr_chars} string characters declared, at most {MAX_STRING_CHARS} supported"
        )));
    }

    let mut nr_chars = [0u8; NR_CHARS_LEN];
    nr_chars.copy_from_slice(r.take(NR_CHARS_LEN)?);
    let mut tex_chars = [0u8; TEX_CHARS_LEN];
    tex_chars.copy_from_slice(r.take(TEX_CHARS_LEN)?);
    let compound_policy = CompoundPolicy::from_byte(r.u8()?);
    let def_hard_flag = r.u8()?;
    let flag_marker = r.u8()?;

    r.set_section("character tables");
    let sort_order = read_u16_table(&mut r)?;
    let lower_conv = read_u16_table(&mut r)?;
    let upper_conv = read_u16_table(&mut r)?;
    let word_chars = read_bool_table(&mut r, CHAR_SPACE)?;
    let upper_chars = read_bool_table(&mut r, CHAR_SPACE)?;
    let lower_chars = read_bool_table(&mut r, CHAR_SPACE)?;
    let boundary_chars = read_bool_table(&mut r, CHAR_SPACE)?;
    let string_starts = read_bool_table(&mut r, SET_SIZE)?;

    r.set_section("string characters");
    let mut texts = Vec::with_capacity(MAX_STRING_CHARS);
    for _ in 0..MAX_STRING_CHARS {
        let slot = r.take(STRING_CHAR_SLOT)?;
        let end = slot.iter().position(|&b| b == 0).unwrap_or(slot.len());
        texts.push(slot[..end].to_vec());
    }
    let mut dups = Vec::with_capacity(MAX_STRING_CHARS);
    for _ in 0..MAX_STRING_CHARS {
        dups.push(r.u32()?);
    }
    let mut dup_nos = Vec::with_capacity(MAX_STRING_CHARS);
    for _ in 0..MAX_STRING_CHARS {
        dup_nos.push(r.i32()?);
    }
    let mut string_chars = Vec::with_capacity(nstr_chars);
    for (i, bytes) in texts.into_iter().take(nstr_chars).enumerate() {
        let canonical = dups[i];
        if canonical as usize >= nstr_chars {
            return Err(LoadError::IncompatibleFormat(format!(
                "string character {i} names duplicate target {canonical}"
            )));
        }
        string_chars.push(StringChar { bytes, canonical: canonical as u16, dup_no: dup_nos[i] });
    }

    r.set_section("header");
    let magic2 = r.u16()?;
    if magic2 != MAGIC {
        return Err(LoadError::BadMagic { expected: MAGIC, found: magic2 });
    }

    let tables = CharTables {
        sort_order,
        lower_conv,
        upper_conv,
        word_chars,
        upper_chars,
        lower_chars,
        boundary_chars,
        string_starts,
        string_chars,
    };

    Ok(HashHeader {
        compile_options,
        max_slen,
        compound_min,
        compound_bit,
        string_size,
        lstring_size,
        tbl_size,
        stbl_size,
        ptbl_size,
        sort_val,
        nstr_char_type,
        str_type_start,
        nr_chars,
        tex_chars,
        compound_policy,
        def_hard_flag,
        flag_marker,
        tables,
    })
}

fn to_i32(value: usize) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

/// Serialize `header` into `w`, padded to [`HEADER_SIZE`].
pub(crate) fn write_header(header: &HashHeader, w: &mut ByteWriter) {
    let start = w.len();
    let t = &header.tables;

    w.u16(MAGIC);
    w.u16(header.compile_options);
    w.i16(header.max_slen);
    w.i16(MAX_STRING_CHARS as i16);
    w.i16(MAX_STRING_CHAR_LEN as i16);
    w.i16(header.compound_min);
    w.i16(header.compound_bit);

    w.i32(to_i32(header.string_size));
    w.i32(header.lstring_size);
    w.i32(to_i32(header.tbl_size));
    w.i32(to_i32(header.stbl_size));
    w.i32(to_i32(header.ptbl_size));
    w.i32(header.sort_val);
    w.i32(to_i32(t.string_chars.len()));
    w.i32(header.nstr_char_type);
    w.i32(header.str_type_start);

    w.bytes(&header.nr_chars);
    w.bytes(&header.tex_chars);
    w.u8(header.compound_policy.to_byte());
    w.u8(header.def_hard_flag);
    w.u8(header.flag_marker);

    for table in [&t.sort_order, &t.lower_conv, &t.upper_conv] {
        for i in 0..CHAR_SPACE {
            w.u16(table.get(i).copied().unwrap_or(i as u16));
        }
    }
    for (table, len) in [
        (&t.word_chars, CHAR_SPACE),
        (&t.upper_chars, CHAR_SPACE),
        (&t.lower_chars, CHAR_SPACE),
        (&t.boundary_chars, CHAR_SPACE),
        (&t.string_starts, SET_SIZE),
    ] {
        for i in 0..len {
            w.u8(u8::from(table.get(i).copied().unwrap_or(false)));
        }
    }

    for i in 0..MAX_STRING_CHARS {
        let mut slot = [0u8; STRING_CHAR_SLOT];
        if let Some(sc) = t.string_chars.get(i) {
            let n = sc.bytes.len().min(MAX_STRING_CHAR_LEN);
            slot[..n].copy_from_slice(&sc.bytes[..n]);
        }
        w.bytes(&slot);
    }
    for i in 0..MAX_STRING_CHARS {
        w.u32(t.string_chars.get(i).map_or(0, |sc| sc.canonical as u32));
    }
    for i in 0..MAX_STRING_CHARS {
        w.i32(t.string_chars.get(i).map_or(0, |sc| sc.dup_no));
    }

    w.u16(MAGIC);
    w.align(4);
    debug_assert_eq!(w.len() - start, HEADER_SIZE);
}

/// Default header values for a freshly built dictionary.
pub(crate) fn new_header(tables: CharTables) -> HashHeader {
    HashHeader {
        compile_options: 0,
        max_slen: MAX_WORD_LEN as i16,
        compound_min: 1,
        compound_bit: -1,
        string_size: 0,
        lstring_size: 0,
        tbl_size: 0,
        stbl_size: 0,
        ptbl_size: 0,
        sort_val: 0,
        nstr_char_type: 0,
        str_type_start: 0,
        nr_chars: [0; NR_CHARS_LEN],
        tex_chars: [0; TEX_CHARS_LEN],
        compound_policy: CompoundPolicy::Never,
        def_hard_flag: 0,
        flag_marker: b'/',
        tables,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_header() -> HashHeader {
        let mut tables = CharTables::ascii();
        tables.add_string_char_pair(b"ss", b"SS").unwrap();
        let mut header = new_header(tables);
        header.tbl_size = 7;
        header.stbl_size = 2;
        header.ptbl_size = 1;
        header.string_size = 40;
        header.compound_policy = CompoundPolicy::Controlled;
        header.compound_min = 3;
        header.compound_bit = 25;
        header
    }

    fn serialize(header: &HashHeader) -> Vec<u8> {
        let mut w = ByteWriter::new();
        write_header(header, &mut w);
        w.into_inner()
    }

    #[test]
    fn header_is_fixed_size() {
        assert_eq!(serialize(&sample_header()).len(), HEADER_SIZE);
    }

    #[test]
    fn parse_written_header() {
        let bytes = serialize(&sample_header());
        let header = parse_header(&bytes).unwrap();
        assert_eq!(header.tbl_size, 7);
        assert_eq!(header.stbl_size, 2);
        assert_eq!(header.ptbl_size, 1);
        assert_eq!(header.string_size, 40);
        assert_eq!(header.compound_policy, CompoundPolicy::Controlled);
        assert_eq!(header.compound_min(), 3);
        assert_eq!(header.compound_mask(), Some(1 << 25));
        assert_eq!(header.hash_width(), HashWidth::Wide);
        assert_eq!(header.tables.string_chars.len(), 2);
        assert_eq!(header.tables.string_chars[1].bytes, b"SS");
        assert_eq!(header.tables.to_upper(b'q' as u16), b'Q' as u16);
        assert!(header.tables.string_starts[b's' as usize]);
    }

    #[test]
    fn field_offsets_follow_c_layout() {
        let bytes = serialize(&sample_header());
        // tblsize is the third i32 after the five i16 fields
        assert_eq!(i32::from_le_bytes(bytes[24..28].try_into().unwrap()), 7);
        // compoundflag follows nrchars and texchars
        assert_eq!(bytes[52 + 5 + 13], 2);
        // sortorder starts at 74
        assert_eq!(u16::from_le_bytes([bytes[74 + 2 * 65], bytes[75 + 2 * 65]]), 65);
        // magic2 sits just before the trailing padding
        assert_eq!(u16::from_le_bytes([bytes[6604], bytes[6605]]), MAGIC);
    }

    #[test]
    fn bad_leading_magic() {
        let mut bytes = serialize(&sample_header());
        bytes[0] = 0x03;
        match parse_header(&bytes) {
            Err(LoadError::BadMagic { expected, found }) => {
                assert_eq!(expected, MAGIC);
                assert_eq!(found, 0x9603);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn bad_trailing_magic() {
        let mut bytes = serialize(&sample_header());
        bytes[6604] = 0;
        assert!(matches!(parse_header(&bytes), Err(LoadError::BadMagic { .. })));
    }

    #[test]
    fn wrong_string_char_limit_is_incompatible() {
        let mut bytes = serialize(&sample_header());
        bytes[6..8].copy_from_slice(&64i16.to_le_bytes());
        assert!(matches!(parse_header(&bytes), Err(LoadError::IncompatibleFormat(_))));
    }

    #[test]
    fn truncated_header_is_unexpected_eof() {
        let bytes = serialize(&sample_header());
        match parse_header(&bytes[..3000]) {
            Err(LoadError::IoError(e)) => assert_eq!(e.kind(), std::io::ErrorKind::UnexpectedEof),
            other => panic!("unexpected {other:?}"),
        }
    }
}

// Character classification tables and the string-character layer
//
// Every word handled by the engine is a sequence of `Ichar` codes: raw bytes
// of the dictionary's narrow encoding (0..256) plus synthetic codes for the
// multi-byte "string characters" the dictionary defines (256..256+n). All
// classification and case-mapping tables are indexed by that code space.

use crate::enums::{CHAR_SPACE, MAX_STRING_CHARS, MAX_STRING_CHAR_LEN, SET_SIZE};

/// Internal character code.
pub type Ichar = u16;

/// Errors raised while defining character tables by hand.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CharsetError {
    #[error("too many string characters (limit {MAX_STRING_CHARS})")]
    TooManyStringChars,
    #[error("string character {0:?} is longer than {MAX_STRING_CHAR_LEN} bytes")]
    StringCharTooLong(Vec<u8>),
    #[error("string character must be at least two bytes: {0:?}")]
    StringCharTooShort(Vec<u8>),
    #[error("code {0} is not a canonical string character")]
    UndefinedStringChar(Ichar),
}

/// One multi-byte string character declared by a dictionary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringChar {
    /// Byte sequence in the narrow encoding.
    pub bytes: Vec<u8>,
    /// Index of the canonical string character this one duplicates
    /// (its own index when it is canonical).
    pub canonical: u16,
    /// Duplicate number; 0 marks the canonical spelling.
    pub dup_no: i32,
}

/// The classification tables carried in a dictionary header.
///
/// All `Vec` tables have exactly `CHAR_SPACE` entries except `string_starts`,
/// which is indexed by raw byte and has `SET_SIZE` entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharTables {
    pub sort_order: Vec<u16>,
    pub lower_conv: Vec<Ichar>,
    pub upper_conv: Vec<Ichar>,
    pub word_chars: Vec<bool>,
    pub upper_chars: Vec<bool>,
    pub lower_chars: Vec<bool>,
    pub boundary_chars: Vec<bool>,
    pub string_starts: Vec<bool>,
    pub string_chars: Vec<StringChar>,
}

impl Default for CharTables {
    fn default() -> Self {
        Self::identity()
    }
}

impl CharTables {
    /// Tables with identity case mapping and no word or boundary characters.
    pub fn identity() -> Self {
        let codes: Vec<Ichar> = (0..CHAR_SPACE as Ichar).collect();
        Self {
            sort_order: codes.clone(),
            lower_conv: codes.clone(),
            upper_conv: codes,
            word_chars: vec![false; CHAR_SPACE],
            upper_chars: vec![false; CHAR_SPACE],
            lower_chars: vec![false; CHAR_SPACE],
            boundary_chars: vec![false; CHAR_SPACE],
            string_starts: vec![false; SET_SIZE],
            string_chars: Vec::new(),
        }
    }

    /// English-style tables: `a`-`z` / `A`-`Z` letters and `'` as a boundary character.
    pub fn ascii() -> Self {
        let mut tables = Self::identity();
        for (lower, upper) in (b'a'..=b'z').zip(b'A'..=b'Z') {
            tables.set_letter_pair(lower as Ichar, upper as Ichar);
        }
        tables.set_boundary_char(b'\'' as Ichar);
        tables
    }

    /// Declare `lower`/`upper` as a case pair of word characters.
    pub fn set_letter_pair(&mut self, lower: Ichar, upper: Ichar) {
        let (l, u) = (lower as usize, upper as usize);
        if l >= CHAR_SPACE || u >= CHAR_SPACE {
            return;
        }
        self.word_chars[l] = true;
        self.word_chars[u] = true;
        self.lower_chars[l] = true;
        self.upper_chars[u] = true;
        self.lower_conv[l] = lower;
        self.lower_conv[u] = lower;
        self.upper_conv[l] = upper;
        self.upper_conv[u] = upper;
    }

    pub fn set_boundary_char(&mut self, c: Ichar) {
        if let Some(slot) = self.boundary_chars.get_mut(c as usize) {
            *slot = true;
        }
    }

    /// Define an uppercase/lowercase pair of string characters and return
    /// their codes `(lower, upper)`.
    pub fn add_string_char_pair(
        &mut self,
        lower: &[u8],
        upper: &[u8],
    ) -> Result<(Ichar, Ichar), CharsetError> {
        if self.string_chars.len() + 2 > MAX_STRING_CHARS {
            return Err(CharsetError::TooManyStringChars);
        }
        for bytes in [lower, upper] {
            if bytes.len() > MAX_STRING_CHAR_LEN {
                return Err(CharsetError::StringCharTooLong(bytes.to_vec()));
            }
            if bytes.len() < 2 {
                return Err(CharsetError::StringCharTooShort(bytes.to_vec()));
            }
        }
        let mut codes = [0 as Ichar; 2];
        for (slot, bytes) in codes.iter_mut().zip([lower, upper]) {
            let index = self.string_chars.len();
            self.string_chars.push(StringChar {
                bytes: bytes.to_vec(),
                canonical: index as u16,
                dup_no: 0,
            });
            self.string_starts[bytes[0] as usize] = true;
            *slot = (SET_SIZE + index) as Ichar;
        }
        self.set_letter_pair(codes[0], codes[1]);
        Ok((codes[0], codes[1]))
    }

    /// Declare `bytes` as an alternate spelling of the string character
    /// `code`. Input written this way reads as `code`; output always uses the
    /// canonical spelling.
    pub fn add_string_char_spelling(&mut self, bytes: &[u8], code: Ichar) -> Result<(), CharsetError> {
        let Some(canonical) = (code as usize).checked_sub(SET_SIZE) else {
            return Err(CharsetError::UndefinedStringChar(code));
        };
        if canonical >= self.string_chars.len() || self.string_chars[canonical].dup_no != 0 {
            return Err(CharsetError::UndefinedStringChar(code));
        }
        if self.string_chars.len() + 1 > MAX_STRING_CHARS {
            return Err(CharsetError::TooManyStringChars);
        }
        if bytes.len() > MAX_STRING_CHAR_LEN {
            return Err(CharsetError::StringCharTooLong(bytes.to_vec()));
        }
        if bytes.len() < 2 {
            return Err(CharsetError::StringCharTooShort(bytes.to_vec()));
        }
        let dup_no = self
            .string_chars
            .iter()
            .filter(|sc| sc.canonical as usize == canonical)
            .count() as i32;
        self.string_chars.push(StringChar {
            bytes: bytes.to_vec(),
            canonical: canonical as u16,
            dup_no,
        });
        self.string_starts[bytes[0] as usize] = true;
        Ok(())
    }

    /// Number of codes actually used: raw bytes plus declared string characters.
    pub fn code_count(&self) -> usize {
        SET_SIZE + self.string_chars.len()
    }

    /// True if `c` indexes the classification tables.
    #[inline]
    pub fn in_range(&self, c: Ichar) -> bool {
        (c as usize) < CHAR_SPACE
    }

    #[inline]
    pub fn to_upper(&self, c: Ichar) -> Ichar {
        self.upper_conv.get(c as usize).copied().unwrap_or(c)
    }

    #[inline]
    pub fn to_lower(&self, c: Ichar) -> Ichar {
        self.lower_conv.get(c as usize).copied().unwrap_or(c)
    }

    #[inline]
    pub fn is_upper(&self, c: Ichar) -> bool {
        self.upper_chars.get(c as usize).copied().unwrap_or(false)
    }

    #[inline]
    pub fn is_lower(&self, c: Ichar) -> bool {
        self.lower_chars.get(c as usize).copied().unwrap_or(false)
    }

    #[inline]
    pub fn is_word_char(&self, c: Ichar) -> bool {
        self.word_chars.get(c as usize).copied().unwrap_or(false)
    }

    #[inline]
    pub fn is_boundary_char(&self, c: Ichar) -> bool {
        self.boundary_chars.get(c as usize).copied().unwrap_or(false)
    }

    pub fn upcase(&self, word: &mut [Ichar]) {
        for c in word.iter_mut() {
            *c = self.to_upper(*c);
        }
    }

    pub fn lowcase(&self, word: &mut [Ichar]) {
        for c in word.iter_mut() {
            *c = self.to_lower(*c);
        }
    }

    pub fn to_uppercase(&self, word: &[Ichar]) -> Vec<Ichar> {
        word.iter().map(|&c| self.to_upper(c)).collect()
    }

    /// Candidate characters for insertion and substitution during suggestion:
    /// every uppercase-invariant word character plus every boundary
    /// character, in ascending code order.
    pub fn try_chars(&self) -> Vec<Ichar> {
        (0..self.code_count() as Ichar)
            .filter(|&c| {
                (self.is_word_char(c) && self.to_upper(c) == c) || self.is_boundary_char(c)
            })
            .collect()
    }

    /// Longest declared spelling of a string character starting at `bytes[0]`.
    ///
    /// Alternate spellings fold into the code of their canonical form. Returns
    /// that code and the number of bytes consumed.
    fn match_string_char(&self, bytes: &[u8]) -> Option<(Ichar, usize)> {
        let mut best: Option<(Ichar, usize)> = None;
        for sc in &self.string_chars {
            if !bytes.starts_with(&sc.bytes) {
                continue;
            }
            if best.is_none_or(|(_, len)| sc.bytes.len() > len) {
                best = Some(((SET_SIZE + sc.canonical as usize) as Ichar, sc.bytes.len()));
            }
        }
        best
    }

    /// Convert a narrow byte string into internal codes, folding string
    /// characters into their synthetic codes.
    pub fn bytes_to_ichars(&self, bytes: &[u8]) -> Vec<Ichar> {
        let mut out = Vec::with_capacity(bytes.len());
        let mut i = 0;
        while i < bytes.len() {
            let b = bytes[i];
            if self.string_starts[b as usize] {
                if let Some((code, len)) = self.match_string_char(&bytes[i..]) {
                    out.push(code);
                    i += len;
                    continue;
                }
            }
            out.push(b as Ichar);
            i += 1;
        }
        out
    }

    /// Convert internal codes back into a narrow byte string.
    ///
    /// Codes beyond the declared string characters are dropped.
    pub fn ichars_to_bytes(&self, word: &[Ichar]) -> Vec<u8> {
        let mut out = Vec::with_capacity(word.len());
        for &c in word {
            if (c as usize) < SET_SIZE {
                out.push(c as u8);
                continue;
            }
            match self.string_chars.get(c as usize - SET_SIZE) {
                Some(sc) => out.extend_from_slice(&sc.bytes),
                None => log::warn!("dropping undefined string character code {c}"),
            }
        }
        out
    }
}

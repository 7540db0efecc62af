// Dictionary construction and serialization

use std::path::Path;

use hashbrown::HashMap;
use ispell_core::case::{CapType, classify};
use ispell_core::charset::{CharTables, Ichar};
use ispell_core::encoding::{EncodingError, Latin1, NarrowEncoding};
use ispell_core::enums::{
    AffixFlags, CHAR_SPACE, CompoundPolicy, MAX_AFFIX_LEN, MAX_CONDITIONS,
    MAX_WORD_LEN, MORE_VARIANTS,
};

use crate::bytes::ByteWriter;
use crate::format::{COMPILE_NARROW_HASH, new_header, write_header};
use crate::hash::{HashWidth, hash};
use crate::record::{NO_LINK, RawAffix, RawEntry};

/// Error type for dictionary construction.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("I/O error writing dictionary: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid affix flag {0:?}: expected A-Z")]
    InvalidFlag(char),
    #[error("invalid condition pattern {pattern:?}: {reason}")]
    InvalidCondition { pattern: String, reason: &'static str },
    #[error("condition pattern {0:?} has more than {MAX_CONDITIONS} positions")]
    TooManyConditions(String),
    #[error(transparent)]
    Encoding(#[from] EncodingError),
    #[error("empty root word")]
    EmptyWord,
    #[error("word {0:?} is too long")]
    WordTooLong(String),
    #[error("affix string {0:?} is longer than {MAX_AFFIX_LEN} characters")]
    AffixTooLong(String),
    #[error("dictionary too large: {0} entries")]
    TooManyEntries(usize),
}

/// A prefix or suffix rule as written in an affix file.
///
/// `conditions` uses ispell syntax: one position per literal character,
/// `.` for any character, or a bracketed class such as `[^AEIOU]`.
#[derive(Debug, Clone)]
pub struct AffixRule {
    flag: char,
    strip: String,
    append: String,
    conditions: String,
    flags: AffixFlags,
}

impl AffixRule {
    pub fn new(flag: char, strip: &str, append: &str, conditions: &str) -> Self {
        Self {
            flag,
            strip: strip.to_string(),
            append: append.to_string(),
            conditions: conditions.to_string(),
            flags: AffixFlags::NONE,
        }
    }

    /// Allow the affix to combine with one on the opposite end.
    pub fn cross_product(mut self) -> Self {
        self.flags = self.flags | AffixFlags::CROSS_PRODUCT;
        self
    }

    /// Restrict the affix to compound parts.
    pub fn compound_only(mut self) -> Self {
        self.flags = self.flags | AffixFlags::COMPOUND_ONLY;
        self
    }
}

fn flag_bit(flag: char) -> Result<u32, BuildError> {
    match flag {
        'A'..='Z' => Ok(flag as u32 - 'A' as u32),
        _ => Err(BuildError::InvalidFlag(flag)),
    }
}

struct Variant {
    cap: CapType,
    word: Vec<Ichar>,
    mask: u32,
}

struct Root {
    upper: Vec<Ichar>,
    variants: Vec<Variant>,
}

impl Root {
    fn needs_header(&self) -> bool {
        self.variants.len() > 1 || self.variants.iter().any(|v| v.cap == CapType::FollowCase)
    }

    /// On-disk records for this root: chain head first.
    fn records(&self) -> Vec<(Option<&[Ichar]>, u32)> {
        if !self.needs_header() {
            let v = &self.variants[0];
            return vec![(Some(&self.upper[..]), v.mask | v.cap.mask_bits())];
        }
        let union = self.variants.iter().fold(0, |m, v| m | v.mask);
        let mut out = vec![(Some(&self.upper[..]), union | CapType::AllCaps.mask_bits() | MORE_VARIANTS)];
        let last = self.variants.len() - 1;
        for (i, v) in self.variants.iter().enumerate() {
            let word = (v.cap == CapType::FollowCase).then_some(&v.word[..]);
            let more = if i < last { MORE_VARIANTS } else { 0 };
            out.push((word, v.mask | v.cap.mask_bits() | more));
        }
        out
    }
}

struct BuiltAffix {
    strip: Vec<Ichar>,
    append: Vec<Ichar>,
    flag_bit: u32,
    flags: AffixFlags,
    num_conds: usize,
    conds: Vec<u8>,
}

/// Append a NUL-terminated string to the blob and return its offset.
fn push_string(blob: &mut Vec<u8>, bytes: &[u8]) -> u32 {
    let offset = blob.len() as u32;
    blob.extend_from_slice(bytes);
    blob.push(0);
    offset
}

/// Smallest prime not below `n`.
fn next_prime(n: usize) -> usize {
    let is_prime = |k: usize| k >= 2 && (2..).take_while(|d| d * d <= k).all(|d| k % d != 0);
    (n.max(2)..).find(|&k| is_prime(k)).unwrap_or(n)
}

/// Builds binary hash dictionaries from root words and affix rules.
///
/// ```no_run
/// use ispell_hash::{AffixRule, DictionaryBuilder};
/// use ispell_core::CharTables;
///
/// let mut builder = DictionaryBuilder::new(CharTables::ascii());
/// builder
///     .suffix(AffixRule::new('S', "", "S", ".").cross_product())
///     .words(["cat/S", "dog/S", "Paris"]);
/// builder.write_to("tiny.hash").unwrap();
/// ```
pub struct DictionaryBuilder {
    tables: CharTables,
    encoding: Box<dyn NarrowEncoding>,
    hash_width: HashWidth,
    compound_policy: CompoundPolicy,
    compound_min: usize,
    compound_flag: Option<char>,
    prefixes: Vec<AffixRule>,
    suffixes: Vec<AffixRule>,
    words: Vec<String>,
}

impl Default for DictionaryBuilder {
    fn default() -> Self {
        Self::new(CharTables::ascii())
    }
}

impl DictionaryBuilder {
    pub fn new(tables: CharTables) -> Self {
        Self {
            tables,
            encoding: Box::new(Latin1),
            hash_width: HashWidth::Wide,
            compound_policy: CompoundPolicy::Never,
            compound_min: 1,
            compound_flag: None,
            prefixes: Vec::new(),
            suffixes: Vec::new(),
            words: Vec::new(),
        }
    }

    /// Use a different narrow encoding for words and affix strings.
    pub fn encoding(&mut self, encoding: impl NarrowEncoding + 'static) -> &mut Self {
        self.encoding = Box::new(encoding);
        self
    }

    pub fn hash_width(&mut self, width: HashWidth) -> &mut Self {
        self.hash_width = width;
        self
    }

    /// Set the compound policy, minimum part length and, for controlled
    /// compounds, the flag letter marking roots allowed in compounds.
    pub fn compounds(&mut self, policy: CompoundPolicy, min: usize, flag: Option<char>) -> &mut Self {
        self.compound_policy = policy;
        self.compound_min = min.max(1);
        self.compound_flag = flag;
        self
    }

    pub fn prefix(&mut self, rule: AffixRule) -> &mut Self {
        self.prefixes.push(rule);
        self
    }

    pub fn suffix(&mut self, rule: AffixRule) -> &mut Self {
        self.suffixes.push(rule);
        self
    }

    /// Add a root in `word/FLAGS` form.
    pub fn word(&mut self, line: &str) -> &mut Self {
        self.words.push(line.to_string());
        self
    }

    pub fn words<'a>(&mut self, lines: impl IntoIterator<Item = &'a str>) -> &mut Self {
        self.words.extend(lines.into_iter().map(str::to_string));
        self
    }

    fn ichars(&self, text: &str) -> Result<Vec<Ichar>, BuildError> {
        Ok(self.tables.bytes_to_ichars(&self.encoding.encode(text)?))
    }

    fn narrow(&self, word: &[Ichar]) -> Vec<u8> {
        self.tables.ichars_to_bytes(word)
    }

    /// Mark `c` and its case partners as members of `set`.
    fn mark(&self, set: &mut [bool], c: Ichar) {
        for code in [c, self.tables.to_upper(c), self.tables.to_lower(c)] {
            if let Some(slot) = set.get_mut(code as usize) {
                *slot = true;
            }
        }
    }

    fn parse_conditions(&self, pattern: &str) -> Result<(usize, Vec<u8>), BuildError> {
        let invalid = |reason| BuildError::InvalidCondition { pattern: pattern.to_string(), reason };
        let chars = self.ichars(pattern)?;
        let is = |c: Ichar, b: u8| c == b as Ichar;
        let mut conds = vec![0u8; CHAR_SPACE];
        let mut position = 0;
        let mut i = 0;
        while i < chars.len() {
            let c = chars[i];
            if is(c, b' ') || is(c, b'\t') {
                i += 1;
                continue;
            }
            if position >= MAX_CONDITIONS {
                return Err(BuildError::TooManyConditions(pattern.to_string()));
            }
            let mut set = vec![false; CHAR_SPACE];
            let mut negate = false;
            if is(c, b'.') {
                set.fill(true);
                i += 1;
            } else if is(c, b'[') {
                let close = chars[i + 1..]
                    .iter()
                    .position(|&x| is(x, b']'))
                    .map(|p| p + i + 1)
                    .ok_or_else(|| invalid("unterminated character class"))?;
                let mut body = &chars[i + 1..close];
                if body.first().is_some_and(|&x| is(x, b'^')) {
                    negate = true;
                    body = &body[1..];
                }
                if body.is_empty() {
                    return Err(invalid("empty character class"));
                }
                let mut j = 0;
                while j < body.len() {
                    if j + 2 < body.len() && is(body[j + 1], b'-') {
                        let (lo, hi) = (body[j], body[j + 2]);
                        if lo > hi {
                            return Err(invalid("reversed range"));
                        }
                        for code in lo..=hi {
                            self.mark(&mut set, code);
                        }
                        j += 3;
                    } else {
                        self.mark(&mut set, body[j]);
                        j += 1;
                    }
                }
                i = close + 1;
            } else {
                self.mark(&mut set, c);
                i += 1;
            }
            let bit = 1u8 << position;
            for (slot, &member) in conds.iter_mut().zip(&set) {
                if member != negate {
                    *slot |= bit;
                }
            }
            position += 1;
        }
        Ok((position, conds))
    }

    fn build_affix(&self, rule: &AffixRule) -> Result<BuiltAffix, BuildError> {
        let text = |s: &str| -> Result<Vec<Ichar>, BuildError> {
            let mut chars = self.ichars(s)?;
            if chars.len() > MAX_AFFIX_LEN {
                return Err(BuildError::AffixTooLong(s.to_string()));
            }
            self.tables.upcase(&mut chars);
            Ok(chars)
        };
        let (num_conds, conds) = self.parse_conditions(&rule.conditions)?;
        Ok(BuiltAffix {
            strip: text(&rule.strip)?,
            append: text(&rule.append)?,
            flag_bit: flag_bit(rule.flag)?,
            flags: rule.flags,
            num_conds,
            conds,
        })
    }

    fn collect_roots(&self) -> Result<Vec<Root>, BuildError> {
        let mut roots: Vec<Root> = Vec::new();
        let mut by_upper: HashMap<Vec<Ichar>, usize> = HashMap::new();
        for line in &self.words {
            let (text, flags) = line.split_once('/').unwrap_or((line.as_str(), ""));
            let word = self.ichars(text)?;
            if word.is_empty() {
                return Err(BuildError::EmptyWord);
            }
            if word.len() >= MAX_WORD_LEN {
                return Err(BuildError::WordTooLong(text.to_string()));
            }
            let mut mask = 0u32;
            for flag in flags.chars() {
                mask |= 1 << flag_bit(flag)?;
            }
            let cap = classify(&word, &self.tables);
            let upper = self.tables.to_uppercase(&word);

            let ri = *by_upper.entry(upper.clone()).or_insert_with(|| {
                roots.push(Root { upper, variants: Vec::new() });
                roots.len() - 1
            });
            let root = &mut roots[ri];
            match root
                .variants
                .iter_mut()
                .find(|v| v.cap == cap && (cap != CapType::FollowCase || v.word == word))
            {
                Some(v) => v.mask |= mask,
                None => root.variants.push(Variant { cap, word, mask }),
            }
        }
        Ok(roots)
    }

    /// Serialize the dictionary into hash file bytes.
    pub fn build(&self) -> Result<Vec<u8>, BuildError> {
        let roots = self.collect_roots()?;
        let mut suffixes = self
            .suffixes
            .iter()
            .map(|r| self.build_affix(r))
            .collect::<Result<Vec<_>, _>>()?;
        let mut prefixes = self
            .prefixes
            .iter()
            .map(|r| self.build_affix(r))
            .collect::<Result<Vec<_>, _>>()?;
        suffixes.sort_by(|a, b| a.append.iter().rev().cmp(b.append.iter().rev()));
        prefixes.sort_by(|a, b| a.append.cmp(&b.append));

        let records: Vec<Vec<(Option<&[Ichar]>, u32)>> = roots.iter().map(Root::records).collect();
        let total: usize = records.iter().map(Vec::len).sum();
        let size = next_prime((total * 4).div_ceil(3).max(3));
        if i32::try_from(size).is_err() {
            return Err(BuildError::TooManyEntries(total));
        }

        // Chain heads go to their own bucket when free, everything else
        // fills the remaining slots in order.
        let buckets: Vec<usize> = roots
            .iter()
            .map(|r| hash(&r.upper, size, self.hash_width, &self.tables))
            .collect();
        let mut taken = vec![false; size];
        let mut slots: Vec<Vec<usize>> = records.iter().map(|r| vec![usize::MAX; r.len()]).collect();
        for (ri, &h) in buckets.iter().enumerate() {
            if !taken[h] {
                taken[h] = true;
                slots[ri][0] = h;
            }
        }
        let mut free = (0..size).filter(|&s| !taken[s]).collect::<Vec<_>>().into_iter();
        for root_slots in &mut slots {
            for slot in root_slots.iter_mut().filter(|s| **s == usize::MAX) {
                *slot = free.next().ok_or(BuildError::TooManyEntries(total))?;
            }
        }

        let mut chains: HashMap<usize, Vec<usize>> = HashMap::new();
        let mut bucket_order = Vec::new();
        for (ri, &h) in buckets.iter().enumerate() {
            chains
                .entry(h)
                .or_insert_with(|| {
                    bucket_order.push(h);
                    Vec::new()
                })
                .push(ri);
        }

        let mut table = vec![RawEntry::EMPTY; size];
        let mut blob = Vec::new();
        for h in &bucket_order {
            let members = &chains[h];
            for (k, &ri) in members.iter().enumerate() {
                let after = members.get(k + 1).map_or(NO_LINK, |&next| slots[next][0] as u32);
                for (j, &(word, mask)) in records[ri].iter().enumerate() {
                    let next = slots[ri].get(j + 1).map_or(after, |&s| s as u32);
                    let word = match word {
                        Some(w) => push_string(&mut blob, &self.narrow(w)),
                        None => NO_LINK,
                    };
                    table[slots[ri][j]] = RawEntry { next, word, mask };
                }
            }
        }

        let mut raw_affixes = Vec::with_capacity(suffixes.len() + prefixes.len());
        for a in suffixes.iter().chain(&prefixes) {
            let mut conds = [0u8; CHAR_SPACE];
            conds.copy_from_slice(&a.conds);
            let mut text = |s: &[Ichar]| if s.is_empty() { NO_LINK } else { push_string(&mut blob, &self.narrow(s)) };
            raw_affixes.push(RawAffix {
                strip: text(&a.strip),
                affix: text(&a.append),
                flag_bit: a.flag_bit as i16,
                strip_len: a.strip.len() as i16,
                affix_len: a.append.len() as i16,
                num_conds: a.num_conds as i16,
                flag_flags: i16::from(a.flags.bits()),
                conds,
                _padding: [0; 2],
            });
        }

        let mut header = new_header(self.tables.clone());
        if self.hash_width == HashWidth::Narrow {
            header.compile_options |= COMPILE_NARROW_HASH;
        }
        header.compound_policy = self.compound_policy;
        header.compound_min = self.compound_min.min(i16::MAX as usize) as i16;
        header.compound_bit = match self.compound_flag {
            Some(flag) => flag_bit(flag)? as i16,
            None => -1,
        };
        header.string_size = blob.len();
        header.tbl_size = size;
        header.stbl_size = suffixes.len();
        header.ptbl_size = prefixes.len();

        let mut w = ByteWriter::new();
        write_header(&header, &mut w);
        w.bytes(&blob);
        for e in &table {
            w.bytes(bytemuck::bytes_of(&e.to_le()));
        }
        for a in &raw_affixes {
            w.bytes(bytemuck::bytes_of(&a.to_le()));
        }

        log::debug!(
            "built dictionary: {} roots, {} records in {} slots, {} suffixes, {} prefixes",
            roots.len(),
            total,
            size,
            suffixes.len(),
            prefixes.len()
        );
        Ok(w.into_inner())
    }

    /// Build and write the dictionary to `path`.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<(), BuildError> {
        std::fs::write(path, self.build()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::Dictionary;
    use crate::format::parse_header;

    fn chars(s: &str) -> Vec<Ichar> {
        s.bytes().map(|b| b as Ichar).collect()
    }

    #[test]
    fn flag_letters_map_to_bits() {
        assert_eq!(flag_bit('A').unwrap(), 0);
        assert_eq!(flag_bit('Z').unwrap(), 25);
        assert!(matches!(flag_bit('a'), Err(BuildError::InvalidFlag('a'))));
    }

    #[test]
    fn next_prime_values() {
        assert_eq!(next_prime(0), 2);
        assert_eq!(next_prime(8), 11);
        assert_eq!(next_prime(13), 13);
    }

    #[test]
    fn condition_any_and_literal() {
        let b = DictionaryBuilder::default();
        let (n, conds) = b.parse_conditions(". E").unwrap();
        assert_eq!(n, 2);
        assert_eq!(conds[b'Q' as usize], 0b01);
        assert_eq!(conds[b'E' as usize], 0b11);
        assert_eq!(conds[b'e' as usize], 0b11);
    }

    #[test]
    fn condition_negated_class_and_range() {
        let b = DictionaryBuilder::default();
        let (n, conds) = b.parse_conditions("[^AEIOU]Y").unwrap();
        assert_eq!(n, 2);
        assert_eq!(conds[b'R' as usize] & 1, 1);
        assert_eq!(conds[b'A' as usize] & 1, 0);
        assert_eq!(conds[b'Y' as usize], 0b11);

        let (n, conds) = b.parse_conditions("[A-C]").unwrap();
        assert_eq!(n, 1);
        assert_eq!(conds[b'B' as usize], 1);
        assert_eq!(conds[b'D' as usize], 0);
    }

    #[test]
    fn condition_errors() {
        let b = DictionaryBuilder::default();
        assert!(matches!(b.parse_conditions("[AB"), Err(BuildError::InvalidCondition { .. })));
        assert!(matches!(b.parse_conditions("[^]"), Err(BuildError::InvalidCondition { .. })));
        assert!(matches!(b.parse_conditions("ABCDEFGHI"), Err(BuildError::TooManyConditions(_))));
        let (n, _) = b.parse_conditions("").unwrap();
        assert_eq!(n, 0);
    }

    #[test]
    fn duplicate_roots_merge_flags() {
        let mut b = DictionaryBuilder::default();
        b.words(["walk/S", "walk/D", "WALK"]);
        let roots = b.collect_roots().unwrap();
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].variants.len(), 2);
        assert_eq!(roots[0].variants[0].mask, (1 << 18) | (1 << 3));
        assert_eq!(roots[0].variants[1].cap, CapType::AllCaps);
    }

    #[test]
    fn invalid_input_is_reported() {
        let mut b = DictionaryBuilder::default();
        b.word("cat/s");
        assert!(matches!(b.build(), Err(BuildError::InvalidFlag('s'))));

        let mut b = DictionaryBuilder::default();
        b.word("/S");
        assert!(matches!(b.build(), Err(BuildError::EmptyWord)));

        let mut b = DictionaryBuilder::default();
        b.word("caf\u{0101}");
        assert!(matches!(b.build(), Err(BuildError::Encoding(_))));

        let mut b = DictionaryBuilder::default();
        let long = "a".repeat(130);
        b.word(&long);
        assert!(matches!(b.build(), Err(BuildError::WordTooLong(_))));
    }

    #[test]
    fn table_is_prime_and_roomy() {
        let mut b = DictionaryBuilder::default();
        b.words(["one", "two", "three", "four", "five", "six"]);
        let header = parse_header(&b.build().unwrap()).unwrap();
        assert!(header.tbl_size >= 8);
        assert!((2..header.tbl_size).all(|d| header.tbl_size % d != 0));
    }

    #[test]
    fn compound_settings_reach_the_header() {
        let mut b = DictionaryBuilder::default();
        b.compounds(CompoundPolicy::Controlled, 3, Some('Z')).word("sun/Z");
        let d = Dictionary::from_bytes(&b.build().unwrap()).unwrap();
        assert_eq!(d.compound_policy(), CompoundPolicy::Controlled);
        assert_eq!(d.compound_min(), 3);
        assert_eq!(d.compound_mask(), Some(1 << 25));
        let sun = d.entry(d.lookup(&chars("SUN")).unwrap());
        assert_ne!(sun.mask() & (1 << 25), 0);
    }

    #[test]
    fn narrow_hash_round_trips() {
        let mut b = DictionaryBuilder::default();
        b.hash_width(HashWidth::Narrow).words(["alpha", "beta", "gamma"]);
        let d = Dictionary::from_bytes(&b.build().unwrap()).unwrap();
        assert!(d.lookup(&chars("GAMMA")).is_some());
    }

    #[test]
    fn write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.hash");
        let mut b = DictionaryBuilder::default();
        b.word("hello");
        b.write_to(&path).unwrap();
        assert!(Dictionary::load(&path).unwrap().lookup(&chars("HELLO")).is_some());
    }
}

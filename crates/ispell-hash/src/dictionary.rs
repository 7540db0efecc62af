// Dictionary loading, offset fix-up and bucket lookup

use std::path::Path;

use ispell_core::case::CapType;
use ispell_core::charset::{CharTables, Ichar};
use ispell_core::enums::{AFFIX_FLAG_COUNT, AffixFlags, CHAR_SPACE, CompoundPolicy, MAX_CONDITIONS, MORE_VARIANTS};

use crate::affix::{AffixEntry, AffixId, AffixKind};
use crate::bytes::ByteReader;
use crate::format::{HEADER_SIZE, HashHeader, parse_header};
use crate::hash::{HashWidth, hash};
use crate::index::AffixIndex;
use crate::record::{NO_LINK, RawAffix, RawEntry, read_records};
use crate::{LoadError, try_vec};

/// Index of an entry in the dictionary arena (equal to its hash slot).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(pub u32);

impl EntryId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A root word or one of its capitalization variants.
#[derive(Debug, Clone)]
pub struct DictEntry {
    word: Option<Box<[Ichar]>>,
    mask: u32,
    next: Option<EntryId>,
    next_root: Option<EntryId>,
    variants: Box<[EntryId]>,
    is_variant: bool,
}

impl DictEntry {
    /// Stored word text. Chain heads hold the uppercase form; variants
    /// other than `FollowCase` ones carry no text.
    #[inline]
    pub fn word(&self) -> Option<&[Ichar]> {
        self.word.as_deref()
    }

    #[inline]
    pub fn mask(&self) -> u32 {
        self.mask
    }

    #[inline]
    pub fn cap_type(&self) -> CapType {
        CapType::from_mask(self.mask)
    }

    /// True if another variant of the same root follows this entry.
    #[inline]
    pub fn has_more_variants(&self) -> bool {
        self.mask & MORE_VARIANTS != 0
    }

    /// Raw chain successor, as stored in the file.
    #[inline]
    pub fn next(&self) -> Option<EntryId> {
        self.next
    }

    /// Next distinct root in the same bucket, skipping this root's variants.
    #[inline]
    pub fn next_root(&self) -> Option<EntryId> {
        self.next_root
    }

    /// True for the case variants that follow a variant header.
    #[inline]
    pub fn is_variant(&self) -> bool {
        self.is_variant
    }

    /// Capitalization variants following a variant header, in chain order.
    #[inline]
    pub fn variants(&self) -> &[EntryId] {
        &self.variants
    }
}

/// A loaded hash dictionary.
///
/// Immutable after loading; share it across threads behind an `Arc`.
#[derive(Debug)]
pub struct Dictionary {
    header: HashHeader,
    hash_width: HashWidth,
    entries: Vec<DictEntry>,
    suffixes: Vec<AffixEntry>,
    prefixes: Vec<AffixEntry>,
    suffix_index: AffixIndex,
    prefix_index: AffixIndex,
    try_chars: Vec<Ichar>,
}

/// NUL-terminated string at `offset` in the blob, or `None` for [`NO_LINK`].
fn blob_string<'a>(blob: &'a [u8], offset: u32, what: &str) -> Result<Option<&'a [u8]>, LoadError> {
    if offset == NO_LINK {
        return Ok(None);
    }
    let tail = blob.get(offset as usize..).ok_or_else(|| {
        LoadError::IncompatibleFormat(format!("{what} offset {offset} beyond string blob of {} bytes", blob.len()))
    })?;
    let end = tail.iter().position(|&b| b == 0).ok_or_else(|| {
        LoadError::IncompatibleFormat(format!("{what} at offset {offset} is not terminated"))
    })?;
    Ok(Some(&tail[..end]))
}

impl Dictionary {
    /// Load a hash file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let data = std::fs::read(path.as_ref())?;
        Self::from_bytes(&data)
    }

    /// Parse a complete hash file image.
    pub fn from_bytes(data: &[u8]) -> Result<Self, LoadError> {
        let header = parse_header(data)?;
        let mut r = ByteReader::new(data, "string blob");
        r.take(HEADER_SIZE)?;
        let blob = r.take(header.string_size)?;

        r.set_section("entry table");
        let raw_entries: Vec<RawEntry> = read_records(&mut r, "entry table", header.tbl_size)?;
        r.set_section("affix table");
        let raw_suffixes: Vec<RawAffix> = read_records(&mut r, "suffix table", header.stbl_size)?;
        let raw_prefixes: Vec<RawAffix> = read_records(&mut r, "prefix table", header.ptbl_size)?;

        let tables = &header.tables;
        let entries = fix_up_entries(&raw_entries, blob, tables)?;
        let suffixes = convert_affixes(&raw_suffixes, blob, tables, "suffix")?;
        let prefixes = convert_affixes(&raw_prefixes, blob, tables, "prefix")?;

        let code_count = tables.code_count();
        let suffix_index = AffixIndex::build(&suffixes, AffixKind::Suffix, code_count)?;
        let prefix_index = AffixIndex::build(&prefixes, AffixKind::Prefix, code_count)?;
        let try_chars = tables.try_chars();
        let hash_width = header.hash_width();

        log::debug!(
            "loaded dictionary: {} slots, {} suffixes, {} prefixes, {} string chars, compounds {:?}, index nodes {}/{}",
            entries.len(),
            suffixes.len(),
            prefixes.len(),
            tables.string_chars.len(),
            header.compound_policy,
            suffix_index.node_count(),
            prefix_index.node_count(),
        );

        Ok(Dictionary {
            header,
            hash_width,
            entries,
            suffixes,
            prefixes,
            suffix_index,
            prefix_index,
            try_chars,
        })
    }

    pub fn header(&self) -> &HashHeader {
        &self.header
    }

    pub fn tables(&self) -> &CharTables {
        &self.header.tables
    }

    pub fn compound_policy(&self) -> CompoundPolicy {
        self.header.compound_policy
    }

    /// Minimum length of each compound part.
    pub fn compound_min(&self) -> usize {
        self.header.compound_min()
    }

    /// Mask bit that marks roots usable in controlled compounds.
    pub fn compound_mask(&self) -> Option<u32> {
        self.header.compound_mask()
    }

    /// Characters tried for insertion and substitution during suggestion.
    pub fn try_chars(&self) -> &[Ichar] {
        &self.try_chars
    }

    /// Number of hash table slots.
    pub fn slot_count(&self) -> usize {
        self.entries.len()
    }

    /// Bucket of a word.
    pub fn hash(&self, word: &[Ichar]) -> usize {
        hash(word, self.entries.len(), self.hash_width, self.tables())
    }

    /// First entry of a bucket's chain, or `None` for an empty slot.
    pub fn lookup_bucket(&self, bucket: usize) -> Option<EntryId> {
        self.entries
            .get(bucket)
            .filter(|e| e.word.is_some() && !e.is_variant)
            .map(|_| EntryId(bucket as u32))
    }

    /// Find the root whose stored (uppercase) word equals `upper_word`.
    pub fn lookup(&self, upper_word: &[Ichar]) -> Option<EntryId> {
        let mut cur = self.lookup_bucket(self.hash(upper_word));
        while let Some(id) = cur {
            let e = &self.entries[id.index()];
            if e.word() == Some(upper_word) {
                return Some(id);
            }
            cur = e.next_root;
        }
        None
    }

    #[inline]
    pub fn entry(&self, id: EntryId) -> &DictEntry {
        &self.entries[id.index()]
    }

    /// The entries to test for capitalization: the variants of a variant
    /// header, or the entry itself otherwise.
    pub fn case_chain(&self, id: EntryId) -> impl Iterator<Item = EntryId> + '_ {
        let head = self.entry(id);
        let own = head.variants.is_empty().then_some(id);
        own.into_iter().chain(head.variants.iter().copied())
    }

    pub fn suffix(&self, id: AffixId) -> &AffixEntry {
        &self.suffixes[id.index()]
    }

    pub fn prefix(&self, id: AffixId) -> &AffixEntry {
        &self.prefixes[id.index()]
    }

    pub fn suffixes(&self) -> &[AffixEntry] {
        &self.suffixes
    }

    pub fn prefixes(&self) -> &[AffixEntry] {
        &self.prefixes
    }

    pub fn suffix_index(&self) -> &AffixIndex {
        &self.suffix_index
    }

    pub fn prefix_index(&self) -> &AffixIndex {
        &self.prefix_index
    }
}

/// Resolve blob offsets and chain links into an arena.
///
/// Variant chains are attached to their header and `next_root` skips them,
/// so bucket walks only see root entries.
fn fix_up_entries(raw: &[RawEntry], blob: &[u8], tables: &CharTables) -> Result<Vec<DictEntry>, LoadError> {
    let n = raw.len();
    let mut entries: Vec<DictEntry> = try_vec("entry table", n)?;
    for (i, rec) in raw.iter().map(|r| r.from_le()).enumerate() {
        let word = match blob_string(blob, rec.word, "word")? {
            Some([]) => {
                log::warn!("entry {i} has an empty word; treating the slot as empty");
                None
            }
            Some(bytes) => Some(tables.bytes_to_ichars(bytes).into_boxed_slice()),
            None => None,
        };
        let next = match rec.next {
            NO_LINK => None,
            link if (link as usize) < n => Some(EntryId(link)),
            link => {
                return Err(LoadError::IncompatibleFormat(format!(
                    "entry {i} links to slot {link} of {n}"
                )));
            }
        };
        entries.push(DictEntry {
            word,
            mask: rec.mask,
            next,
            next_root: next,
            variants: Box::new([]),
            is_variant: false,
        });
    }

    let mut is_variant = vec![false; n];
    for e in &entries {
        if let (true, Some(next)) = (e.has_more_variants(), e.next) {
            is_variant[next.index()] = true;
        }
    }

    for (e, &variant) in entries.iter_mut().zip(&is_variant) {
        e.is_variant = variant;
    }

    for i in 0..n {
        if is_variant[i] || !entries[i].has_more_variants() {
            continue;
        }
        let mut variants = Vec::new();
        let mut cur = i;
        while entries[cur].has_more_variants() {
            let next = entries[cur].next.ok_or_else(|| {
                LoadError::IncompatibleFormat(format!("variant chain of entry {i} ends early"))
            })?;
            variants.push(next);
            if variants.len() > n {
                return Err(LoadError::IncompatibleFormat(format!("variant chain of entry {i} loops")));
            }
            cur = next.index();
        }
        entries[i].next_root = entries[cur].next;
        entries[i].variants = variants.into_boxed_slice();
    }

    // Every root chain must terminate.
    for i in 0..n {
        let mut cur = entries[i].next_root;
        let mut steps = 0;
        while let Some(id) = cur {
            steps += 1;
            if steps > n {
                return Err(LoadError::IncompatibleFormat(format!("entry chain from slot {i} loops")));
            }
            cur = entries[id.index()].next_root;
        }
    }

    Ok(entries)
}

fn convert_affixes(
    raw: &[RawAffix],
    blob: &[u8],
    tables: &CharTables,
    what: &'static str,
) -> Result<Vec<AffixEntry>, LoadError> {
    let mut out = try_vec(what, raw.len())?;
    for (i, rec) in raw.iter().map(|r| r.from_le()).enumerate() {
        let text = |offset: u32| -> Result<Box<[Ichar]>, LoadError> {
            let bytes = blob_string(blob, offset, what)?.unwrap_or(&[]);
            let mut chars = tables.bytes_to_ichars(bytes);
            tables.upcase(&mut chars);
            Ok(chars.into_boxed_slice())
        };
        let flag_bit = u32::try_from(rec.flag_bit)
            .ok()
            .filter(|&b| b < AFFIX_FLAG_COUNT)
            .ok_or_else(|| LoadError::IncompatibleFormat(format!("{what} {i} has flag bit {}", rec.flag_bit)))?;
        let num_conds = usize::try_from(rec.num_conds)
            .ok()
            .filter(|&c| c <= MAX_CONDITIONS)
            .ok_or_else(|| LoadError::IncompatibleFormat(format!("{what} {i} has {} conditions", rec.num_conds)))?;
        out.push(AffixEntry {
            strip: text(rec.strip)?,
            append: text(rec.affix)?,
            flag_bit,
            flags: AffixFlags::from_bits(rec.flag_flags as u8),
            num_conds,
            conds: Box::from(&rec.conds[..CHAR_SPACE]),
        });
    }
    Ok(out)
}

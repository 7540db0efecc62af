//! ispell hash dictionary store.
//!
//! This crate loads the binary hash file produced by `buildhash`-style tools
//! into an immutable, shareable [`Dictionary`], builds the prefix and suffix
//! affix indexes, and can write new hash files with [`DictionaryBuilder`].
//!
//! # Architecture
//!
//! - [`format`] -- header layout, magic numbers and validation
//! - [`record`] -- fixed-size on-disk entry and affix records
//! - [`hash`] -- the bucket hash function
//! - [`affix`] -- in-memory affix entries and adjacency conditions
//! - [`index`] -- the self-splitting affix lookup index
//! - [`dictionary`] -- loading, offset fix-up and bucket lookup
//! - [`builder`] -- dictionary construction and serialization

pub mod affix;
pub mod builder;
pub mod dictionary;
pub mod format;
pub mod hash;
pub mod index;
pub mod record;

mod bytes;

pub use affix::{AffixEntry, AffixId, AffixKind};
pub use builder::{AffixRule, BuildError, DictionaryBuilder};
pub use dictionary::{DictEntry, Dictionary, EntryId};
pub use hash::HashWidth;

/// Error type for dictionary loading.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file could not be read, or ended before a section was complete.
    #[error("I/O error reading dictionary: {0}")]
    IoError(#[from] std::io::Error),
    /// The leading or trailing magic number did not match.
    #[error("bad magic number: expected {expected:#06x}, found {found:#06x}")]
    BadMagic { expected: u16, found: u16 },
    /// The file was built with incompatible constants or is internally inconsistent.
    #[error("incompatible dictionary format: {0}")]
    IncompatibleFormat(String),
    /// A table could not be allocated.
    #[error("out of memory allocating {table} ({entries} entries)")]
    OutOfMemory { table: &'static str, entries: usize },
}

impl LoadError {
    pub(crate) fn truncated(section: &str, expected: usize, actual: usize) -> Self {
        LoadError::IoError(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            format!("{section} truncated: expected {expected} bytes, got {actual}"),
        ))
    }
}

/// Allocate an empty vector with room for `count` items, mapping allocation
/// failure to [`LoadError::OutOfMemory`].
pub(crate) fn try_vec<T>(table: &'static str, count: usize) -> Result<Vec<T>, LoadError> {
    let mut v = Vec::new();
    v.try_reserve_exact(count)
        .map_err(|_| LoadError::OutOfMemory { table, entries: count })?;
    Ok(v)
}

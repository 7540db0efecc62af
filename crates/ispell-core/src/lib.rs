//! Shared building blocks for the ispell hash-dictionary engine.
//!
//! - [`charset`] -- internal character codes and the dictionary's
//!   classification tables, including multi-byte string characters
//! - [`case`] -- capitalization types and their mask encoding
//! - [`encoding`] -- UTF-8 to narrow-byte conversion boundary
//! - [`enums`] -- constants, compound policy and affix option flags

pub mod case;
pub mod charset;
pub mod encoding;
pub mod enums;

pub use case::{CapType, classify};
pub use charset::{CharTables, Ichar};

//! Spell checking and suggestion engine for ispell hash dictionaries.
//!
//! # Architecture
//!
//! - [`speller`] -- root lookup with prefix/suffix stripping, capitalization
//!   reconciliation and compound words, behind the [`Speller`] trait
//! - [`suggestion`] -- the staged correction generator and its bounded
//!   possibility list (feature `suggest`)
//! - [`config`] -- [`CheckerOptions`] and hash file discovery
//! - [`checker`] -- [`SpellChecker`], the handle applications use
//!
//! ```no_run
//! use ispell_speller::{DictionaryLocator, SpellChecker};
//!
//! let locator = DictionaryLocator::new(None);
//! let checker = SpellChecker::for_language("en_US", &locator)?;
//! if !checker.check("helllo") {
//!     println!("{:?}", checker.suggest("helllo"));
//! }
//! # Ok::<(), ispell_hash::LoadError>(())
//! ```

pub mod checker;
pub mod config;
pub mod speller;
#[cfg(feature = "suggest")]
pub mod suggestion;

pub use checker::{Acceptance, SpellChecker};
pub use config::{CheckerOptions, DictionaryLocator};
pub use ispell_hash::LoadError;
pub use speller::{Hit, HitList, Lookup, LookupOptions, Speller};

// Checker options and dictionary file discovery

use std::path::{Path, PathBuf};

use ispell_core::enums::MAX_POSSIBLE;
use serde::{Deserialize, Serialize};

/// Environment variable naming an extra dictionary directory.
pub const DICT_PATH_ENV: &str = "ISPELL_DICT_PATH";

/// Options controlling [`crate::SpellChecker`] behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckerOptions {
    /// Number of suggestions returned to the caller.
    pub max_suggestions: usize,
    /// Number of candidates collected before generation stops.
    pub possibility_capacity: usize,
    /// Accept run-together words the dictionary's compound policy allows.
    pub accept_compounds: bool,
    /// Offer compound words as suggestions.
    pub suggest_compounds: bool,
}

impl Default for CheckerOptions {
    fn default() -> Self {
        Self {
            max_suggestions: 10,
            possibility_capacity: MAX_POSSIBLE,
            accept_compounds: true,
            suggest_compounds: true,
        }
    }
}

/// Well-known hash file names by language tag.
const LANGUAGE_FILES: &[(&str, &str)] = &[
    ("en_US", "american.hash"),
    ("en_GB", "british.hash"),
    ("en_CA", "canadian.hash"),
    ("de_DE", "deutsch.hash"),
    ("de_CH", "swiss.hash"),
    ("fr_FR", "francais.hash"),
    ("nl_NL", "nederlands.hash"),
    ("es_ES", "espanol.hash"),
    ("it_IT", "italian.hash"),
    ("sv_SE", "svenska.hash"),
    ("pt_PT", "portugues.hash"),
    ("da_DK", "dansk.hash"),
    ("pl_PL", "polish.hash"),
    ("cs_CZ", "czech.hash"),
    ("fi_FI", "finnish.hash"),
];

/// Finds hash files for a language tag.
///
/// Search order:
/// 1. explicit directory (if given)
/// 2. `ISPELL_DICT_PATH` environment variable
/// 3. `~/.ispell`
/// 4. `/usr/lib/ispell`, `/usr/share/ispell`, `/usr/local/lib/ispell`
#[derive(Debug, Clone, Default)]
pub struct DictionaryLocator {
    search_paths: Vec<PathBuf>,
}

impl DictionaryLocator {
    /// Locator using the standard search order.
    pub fn new(dict_path: Option<&Path>) -> Self {
        let mut paths = Vec::new();
        if let Some(p) = dict_path {
            paths.push(p.to_path_buf());
        }
        if let Ok(env_path) = std::env::var(DICT_PATH_ENV) {
            paths.push(PathBuf::from(env_path));
        }
        if let Some(home) = home_dir() {
            paths.push(home.join(".ispell"));
        }
        paths.push(PathBuf::from("/usr/lib/ispell"));
        paths.push(PathBuf::from("/usr/share/ispell"));
        paths.push(PathBuf::from("/usr/local/lib/ispell"));
        Self { search_paths: paths }
    }

    /// Locator searching exactly `paths`, in order.
    pub fn with_paths(paths: impl IntoIterator<Item = PathBuf>) -> Self {
        Self { search_paths: paths.into_iter().collect() }
    }

    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    /// File names tried for `tag`, most specific first.
    ///
    /// `en-US` and `en_US` are equivalent. Unknown tags fall back to
    /// `<tag>.hash`, then to the bare language subtag.
    pub fn candidate_names(tag: &str) -> Vec<String> {
        let tag = tag.replace('-', "_");
        let lang = tag.split('_').next().unwrap_or(&tag).to_string();
        let mut names = Vec::new();
        let mut push = |name: String| {
            if !names.contains(&name) {
                names.push(name);
            }
        };
        if let Some(file) = mapped_file(&tag) {
            push(file.to_string());
        }
        push(format!("{tag}.hash"));
        if let Some(file) = mapped_file(&lang) {
            push(file.to_string());
        }
        push(format!("{lang}.hash"));
        names
    }

    /// First existing hash file for `tag` in the search paths.
    pub fn locate(&self, tag: &str) -> Option<PathBuf> {
        let names = Self::candidate_names(tag);
        for dir in &self.search_paths {
            for name in &names {
                let path = dir.join(name);
                if path.is_file() {
                    log::debug!("found dictionary for {tag} at {}", path.display());
                    return Some(path);
                }
            }
        }
        None
    }
}

/// Hash file for a full tag, or for a bare language when exactly one
/// region is known for it.
fn mapped_file(tag: &str) -> Option<&'static str> {
    if let Some((_, file)) = LANGUAGE_FILES.iter().find(|(t, _)| *t == tag) {
        return Some(*file);
    }
    let mut regional = LANGUAGE_FILES.iter().filter(|(t, _)| t.split('_').next() == Some(tag));
    match (regional.next(), regional.next()) {
        (Some((_, file)), None) => Some(*file),
        _ => None,
    }
}

fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(PathBuf::from)
}

// ispell-cli: argument parsing, word input and pipe-mode responses shared by
// the command-line tools.

use std::fmt;
use std::io::{self, BufRead};
use std::path::Path;
use std::process;

use ispell_speller::{Acceptance, DictionaryLocator, SpellChecker};

/// Language used when neither `--lang` nor `LANG` names one.
const DEFAULT_LANGUAGE: &str = "en_US";

/// Short spellings of options that take a value.
const SHORT_OPTIONS: &[(&str, &str)] = &[("-d", "dict-path"), ("-l", "lang"), ("-n", "max-suggestions")];

/// Options every tool accepts with a value.
const COMMON_VALUED: &[&str] = &["dict-path", "lang"];

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

/// Parsed arguments: valued options, switches and the remaining words.
///
/// Options are stored under their long name without dashes. A lone `--`
/// ends option parsing.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CommandLine {
    values: Vec<(String, String)>,
    switches: Vec<String>,
    pub words: Vec<String>,
}

impl CommandLine {
    /// Parse `args`. `valued` lists the tool's own options that take a value,
    /// in addition to `dict-path` and `lang`.
    pub fn parse<I>(args: I, valued: &[&str]) -> Result<Self, String>
    where
        I: IntoIterator<Item = String>,
    {
        let takes_value = |name: &str| COMMON_VALUED.contains(&name) || valued.contains(&name);
        let mut cmd = CommandLine::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            if arg == "--" {
                cmd.words.extend(args.by_ref());
                break;
            }
            let name = if let Some(long) = arg.strip_prefix("--") {
                long.to_string()
            } else if let Some(&(_, long)) = SHORT_OPTIONS.iter().find(|(short, _)| *short == arg) {
                long.to_string()
            } else if arg.len() > 1 && arg.starts_with('-') {
                arg[1..].to_string()
            } else {
                cmd.words.push(arg);
                continue;
            };

            if let Some((key, value)) = name.split_once('=') {
                if !takes_value(key) {
                    return Err(format!("--{key} does not take a value"));
                }
                cmd.values.push((key.to_string(), value.to_string()));
            } else if takes_value(&name) {
                let value = args.next().ok_or_else(|| format!("--{name} requires a value"))?;
                cmd.values.push((name, value));
            } else {
                cmd.switches.push(name);
            }
        }
        Ok(cmd)
    }

    /// Last value given for option `name`.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.values.iter().rev().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
    }

    /// Value of `name` parsed as a number.
    pub fn number(&self, name: &str) -> Result<Option<usize>, String> {
        self.value(name)
            .map(|v| v.parse().map_err(|_| format!("--{name}: {v:?} is not a number")))
            .transpose()
    }

    /// True if any of the given switch names was present (`h` matches `-h`).
    pub fn switch(&self, names: &[&str]) -> bool {
        self.switches.iter().any(|s| names.contains(&s.as_str()))
    }

    pub fn wants_help(&self) -> bool {
        self.switch(&["h", "help"])
    }

    /// Open the checker the `dict-path` and `lang` options select.
    pub fn checker(&self) -> Result<SpellChecker, String> {
        load_checker(self.value("dict-path"), self.value("lang"))
    }
}

/// Open a checker for a hash file or a language.
///
/// A `dict_path` naming a file is opened directly. A directory is searched
/// first for the language's hash file, followed by the standard locations
/// (`ISPELL_DICT_PATH`, `~/.ispell`, the system ispell directories).
pub fn load_checker(dict_path: Option<&str>, language: Option<&str>) -> Result<SpellChecker, String> {
    if let Some(p) = dict_path.map(Path::new).filter(|p| p.is_file()) {
        return SpellChecker::open(p).map_err(|e| format!("failed to load {}: {e}", p.display()));
    }

    let language = language.map(str::to_string).unwrap_or_else(default_language);
    let locator = DictionaryLocator::new(dict_path.map(Path::new));
    match locator.locate(&language) {
        Some(path) => {
            log::info!("using {}", path.display());
            SpellChecker::open(&path).map_err(|e| format!("failed to load {}: {e}", path.display()))
        }
        None => Err(format!(
            "could not find a dictionary for {language} (tried {}) in any of the search paths:\n{}",
            DictionaryLocator::candidate_names(&language).join(", "),
            locator
                .search_paths()
                .iter()
                .map(|p| format!("  - {}", p.display()))
                .collect::<Vec<_>>()
                .join("\n")
        )),
    }
}

/// Language tag from the `LANG` environment variable, without encoding suffix.
fn default_language() -> String {
    std::env::var("LANG")
        .ok()
        .and_then(|l| l.split('.').next().map(str::to_string))
        .filter(|l| !l.is_empty() && l != "C" && l != "POSIX")
        .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string())
}

// ---------------------------------------------------------------------------
// Word input
// ---------------------------------------------------------------------------

/// One item of tool input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input<'a> {
    /// A word and its character offset within the input line.
    Word { text: &'a str, offset: usize },
    /// All words of one input line have been delivered.
    EndOfLine,
}

/// Words of `line` with their character offsets.
///
/// A word is a run of alphanumeric characters, apostrophes and hyphens;
/// apostrophes and hyphens at either end are not part of it.
pub fn words_in_line(line: &str) -> Vec<(usize, &str)> {
    let is_word_char = |c: char| c.is_alphanumeric() || c == '\'' || c == '-';
    let mut words = Vec::new();
    let mut start: Option<(usize, usize)> = None;
    let mut chars = line.char_indices().enumerate().peekable();
    while let Some((n, (byte, c))) = chars.next() {
        if is_word_char(c) {
            start.get_or_insert((n, byte));
        }
        let at_end = chars.peek().is_none_or(|(_, (_, next))| !is_word_char(*next));
        if let (true, Some((first_char, first_byte))) = (at_end, start) {
            let raw = &line[first_byte..byte + c.len_utf8()];
            let trimmed = raw.trim_start_matches(['\'', '-']);
            let offset = first_char + raw[..raw.len() - trimmed.len()].chars().count();
            let trimmed = trimmed.trim_end_matches(['\'', '-']);
            if !trimmed.is_empty() {
                words.push((offset, trimmed));
            }
            start = None;
        }
    }
    words
}

/// Feed every word of `reader` to `visit`, line by line.
pub fn read_words<R, F>(reader: R, mut visit: F) -> io::Result<()>
where
    R: BufRead,
    F: FnMut(Input<'_>) -> io::Result<()>,
{
    for line in reader.lines() {
        let line = line?;
        for (offset, text) in words_in_line(&line) {
            visit(Input::Word { text, offset })?;
        }
        visit(Input::EndOfLine)?;
    }
    Ok(())
}

/// Feed the words given on the command line to `visit`, or the words of
/// standard input when there are none.
pub fn for_each_word<F>(words: &[String], mut visit: F) -> io::Result<()>
where
    F: FnMut(Input<'_>) -> io::Result<()>,
{
    if words.is_empty() {
        return read_words(io::stdin().lock(), visit);
    }
    for word in words {
        visit(Input::Word { text: word, offset: 0 })?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// The answer for one word, printed in ispell's pipe-mode syntax.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// `*`
    Correct,
    /// `+ ROOT`
    Affixed(String),
    /// `-`
    Compound,
    /// `& word count offset: s1, s2`
    Suggestions { word: String, offset: usize, suggestions: Vec<String> },
    /// `# word offset`
    NoSuggestions { word: String, offset: usize },
}

impl Response {
    /// Check `word`, collecting suggestions for it when it is misspelled and
    /// `suggest` is set.
    pub fn for_word(checker: &SpellChecker, word: &str, offset: usize, suggest: bool) -> Self {
        match checker.acceptance(word) {
            Some(Acceptance::Root) => Response::Correct,
            Some(Acceptance::Affixed { root }) => Response::Affixed(root),
            Some(Acceptance::Compound) => Response::Compound,
            None => {
                let suggestions = if suggest { checker.suggest(word) } else { Vec::new() };
                let word = word.to_string();
                if suggestions.is_empty() {
                    Response::NoSuggestions { word, offset }
                } else {
                    Response::Suggestions { word, offset, suggestions }
                }
            }
        }
    }

    pub fn is_misspelled(&self) -> bool {
        matches!(self, Response::Suggestions { .. } | Response::NoSuggestions { .. })
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Response::Correct => f.write_str("*"),
            Response::Affixed(root) => write!(f, "+ {root}"),
            Response::Compound => f.write_str("-"),
            Response::Suggestions { word, offset, suggestions } => {
                write!(f, "& {word} {} {offset}: {}", suggestions.len(), suggestions.join(", "))
            }
            Response::NoSuggestions { word, offset } => write!(f, "# {word} {offset}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Process helpers
// ---------------------------------------------------------------------------

/// Install the logger; `RUST_LOG` controls verbosity.
pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
}

/// Print an error message and exit with code 1.
pub fn fatal(msg: &str) -> ! {
    eprintln!("error: {msg}");
    process::exit(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn tiny_checker() -> SpellChecker {
        let mut b = ispell_hash::DictionaryBuilder::default();
        b.compounds(ispell_core::enums::CompoundPolicy::Anytime, 3, None)
            .suffix(ispell_hash::AffixRule::new('D', "", "ED", "."))
            .words(["hello", "walk/D", "sun", "shine"]);
        let bytes = b.build().unwrap();
        SpellChecker::new(std::sync::Arc::new(ispell_hash::Dictionary::from_bytes(&bytes).unwrap()))
    }

    #[test]
    fn parses_values_switches_and_words() {
        let cmd = CommandLine::parse(
            args(&["-d", "/x", "--lang=de_DE", "-n", "3", "--no-compounds", "Haus", "-h"]),
            &["max-suggestions"],
        )
        .unwrap();
        assert_eq!(cmd.value("dict-path"), Some("/x"));
        assert_eq!(cmd.value("lang"), Some("de_DE"));
        assert_eq!(cmd.number("max-suggestions"), Ok(Some(3)));
        assert!(cmd.switch(&["no-compounds"]));
        assert!(cmd.wants_help());
        assert_eq!(cmd.words, args(&["Haus"]));
    }

    #[test]
    fn double_dash_ends_options() {
        let cmd = CommandLine::parse(args(&["--", "-s", "word"]), &[]).unwrap();
        assert_eq!(cmd.words, args(&["-s", "word"]));
        assert!(!cmd.wants_help());
    }

    #[test]
    fn option_errors() {
        assert!(CommandLine::parse(args(&["--lang"]), &[]).unwrap_err().contains("requires a value"));
        assert!(CommandLine::parse(args(&["--help=yes"]), &[]).is_err());
        let cmd = CommandLine::parse(args(&["-n", "many"]), &["max-suggestions"]).unwrap();
        assert!(cmd.number("max-suggestions").is_err());
    }

    #[test]
    fn words_in_line_trims_edges_and_keeps_offsets() {
        assert_eq!(
            words_in_line("Hello, world's 'quoted' -- re-entry"),
            vec![(0, "Hello"), (7, "world's"), (16, "quoted"), (27, "re-entry")]
        );
        assert_eq!(words_in_line("caf\u{e9} ok"), vec![(0, "caf\u{e9}"), (5, "ok")]);
        assert!(words_in_line(" -- ' ").is_empty());
    }

    #[test]
    fn read_words_marks_line_ends() {
        let mut seen = Vec::new();
        read_words("one two\n\nthree\n".as_bytes(), |input| {
            seen.push(match input {
                Input::Word { text, offset } => format!("{text}@{offset}"),
                Input::EndOfLine => "|".to_string(),
            });
            Ok(())
        })
        .unwrap();
        assert_eq!(seen, vec!["one@0", "two@4", "|", "|", "three@0", "|"]);
    }

    #[test]
    fn responses_use_pipe_mode_syntax() {
        let c = tiny_checker();
        assert_eq!(Response::for_word(&c, "Hello", 0, true).to_string(), "*");
        assert_eq!(Response::for_word(&c, "walked", 0, true).to_string(), "+ WALK");
        assert_eq!(Response::for_word(&c, "sunshine", 0, true).to_string(), "-");
        assert_eq!(Response::for_word(&c, "helllo", 6, true).to_string(), "& helllo 1 6: hello");
        assert_eq!(Response::for_word(&c, "helllo", 6, false).to_string(), "# helllo 6");
        assert_eq!(Response::for_word(&c, "qqqq", 2, true).to_string(), "# qqqq 2");
        assert!(Response::for_word(&c, "qqqq", 0, true).is_misspelled());
    }

    #[test]
    fn loads_a_hash_file_directly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.hash");
        let mut b = ispell_hash::DictionaryBuilder::default();
        b.words(["hello"]);
        b.write_to(&path).unwrap();
        let checker = load_checker(path.to_str(), None).unwrap();
        assert!(checker.check("hello"));
    }

    #[test]
    fn loads_a_language_from_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut b = ispell_hash::DictionaryBuilder::default();
        b.words(["colour"]);
        b.write_to(dir.path().join("british.hash")).unwrap();
        let cmd = CommandLine::parse(args(&["-d", dir.path().to_str().unwrap(), "-l", "en_GB"]), &[]).unwrap();
        assert!(cmd.checker().unwrap().check("colour"));
    }

    #[test]
    fn missing_language_lists_search_paths() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_checker(dir.path().to_str(), Some("xx_YY")).err().unwrap();
        assert!(err.contains("xx_YY.hash"));
        assert!(err.contains(&dir.path().display().to_string()));
    }
}

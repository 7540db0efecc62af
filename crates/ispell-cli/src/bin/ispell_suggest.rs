// ispell-suggest: list misspelled words with their corrections.
//
// Correctly spelled words produce no output. Each misspelled word is
// printed on its own line, followed by a tab and its suggestions separated
// by spaces when there are any.
//
// Usage:
//   ispell-suggest [-d DICT_PATH] [-l LANG] [-n N] [--unique] [WORD...]

use std::io::{self, Write};

use hashbrown::HashSet;
use ispell_cli::{CommandLine, Input, Response};

const USAGE: &str = "\
ispell-suggest: list misspelled words and corrections.

Usage: ispell-suggest [OPTIONS] [WORD...]

Reads words from the arguments, or from standard input when there are none.

Options:
  -d, --dict-path PATH       Hash file, or directory containing hash files
  -l, --lang TAG             Language tag such as en_US (default: from LANG)
  -n, --max-suggestions N    Suggestions per misspelled word (default: 10)
  -u, --unique               Report each misspelled word once
  -h, --help                 Print this help";

fn main() {
    ispell_cli::init_logging();
    let cmd = CommandLine::parse(std::env::args().skip(1), &["max-suggestions"])
        .unwrap_or_else(|e| ispell_cli::fatal(&e));
    if cmd.wants_help() {
        println!("{USAGE}");
        return;
    }

    let mut checker = cmd.checker().unwrap_or_else(|e| ispell_cli::fatal(&e));
    if let Some(n) = cmd.number("max-suggestions").unwrap_or_else(|e| ispell_cli::fatal(&e)) {
        checker.set_max_suggestions(n);
    }
    let unique = cmd.switch(&["u", "unique"]);

    let mut reported = HashSet::new();
    let mut out = io::BufWriter::new(io::stdout().lock());
    let result = ispell_cli::for_each_word(&cmd.words, |input| {
        let Input::Word { text, offset } = input else {
            return Ok(());
        };
        if unique && reported.contains(text) {
            return Ok(());
        }
        match Response::for_word(&checker, text, offset, true) {
            Response::Suggestions { word, suggestions, .. } => {
                writeln!(out, "{word}\t{}", suggestions.join(" "))?;
            }
            Response::NoSuggestions { word, .. } => writeln!(out, "{word}")?,
            _ => return Ok(()),
        }
        if unique {
            reported.insert(text.to_string());
        }
        Ok(())
    });
    if let Err(e) = result.and_then(|()| out.flush()) {
        ispell_cli::fatal(&format!("i/o error: {e}"));
    }
}

// ispell-check: ispell pipe-mode checker.
//
// Prints a version banner, then one response per word and an empty line
// after each input line:
//   *                         word found
//   + ROOT                    word found through affixes of ROOT
//   -                         word found as a compound
//   & word N offset: s1, s2   misspelled, N suggestions
//   # word offset             misspelled, no suggestions
//
// Usage:
//   ispell-check [-d DICT_PATH] [-l LANG] [-n N] [--terse] [--no-compounds] [WORD...]

use std::io::{self, Write};

use ispell_cli::{CommandLine, Input, Response};
use ispell_speller::CheckerOptions;

const USAGE: &str = "\
ispell-check: check spelling in ispell pipe mode.

Usage: ispell-check [OPTIONS] [WORD...]

Words given as arguments are checked one by one; otherwise every line of
standard input is split into words and answered, followed by an empty line.

Options:
  -d, --dict-path PATH       Hash file, or directory containing hash files
  -l, --lang TAG             Language tag such as en_US (default: from LANG)
  -n, --max-suggestions N    Suggestions per misspelled word
  -t, --terse                Print nothing for correctly spelled words
      --no-suggest           Report misspellings with '#' only
      --no-compounds         Reject run-together compound words
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
    let mut options = CheckerOptions {
        accept_compounds: !cmd.switch(&["no-compounds"]),
        ..checker.options().clone()
    };
    if let Some(n) = cmd.number("max-suggestions").unwrap_or_else(|e| ispell_cli::fatal(&e)) {
        options.max_suggestions = n;
    }
    checker = checker.with_options(options);
    let terse = cmd.switch(&["t", "terse"]);
    let suggest = !cmd.switch(&["no-suggest"]);

    let mut out = io::BufWriter::new(io::stdout().lock());
    let result = writeln!(out, "@(#) ispell-check {}", env!("CARGO_PKG_VERSION")).and_then(|()| {
        ispell_cli::for_each_word(&cmd.words, |input| match input {
            Input::Word { text, offset } => {
                let response = Response::for_word(&checker, text, offset, suggest);
                if terse && !response.is_misspelled() {
                    return Ok(());
                }
                writeln!(out, "{response}")
            }
            Input::EndOfLine => writeln!(out),
        })
    });
    if let Err(e) = result.and_then(|()| out.flush()) {
        ispell_cli::fatal(&format!("i/o error: {e}"));
    }
}

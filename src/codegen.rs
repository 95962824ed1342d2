/*!
Generates source code for scanners from DFAs.

A generated scanner is a single function that implements the longest-prefix
matching discipline of [`DFA::find_longest_prefix`]: it walks the DFA from
its start state, remembers how much input it had consumed the last time it
was in an accepting state, stops as soon as no transition exists and returns
that length. Unlike `find_longest_prefix`, a scanner reports "no match" and
"matched the empty prefix" the same way, as `0`.

Two languages are supported:

* [`Language::C`] emits `unsigned long scan_<name>(const char *s)`, with one
label per state and a `switch` over the current byte. Scanning stops at the
terminating NUL, since byte `0` never has a transition.
* [`Language::Rust`] emits `pub fn scan_<name>(haystack: &[u8]) -> usize`, a
loop over a `match` on the current state and byte.

Minimizing the DFA first (the default for [`DFA::new`]) gives the smallest
scanner.

# Example

```
use scanner_automata::{codegen::{self, Language}, dfa::DFA};

let dfa = DFA::new("[0-9]+")?;
let mut code = String::new();
codegen::write_scanner(&dfa, "digits", Language::Rust, &mut code)?;
assert!(code.starts_with("pub fn scan_digits(haystack: &[u8]) -> usize {"));
assert!(code.contains("(1, b'0'..=b'9') => 2,"));

# Ok::<(), Box<dyn std::error::Error>>(())
```
*/

use core::fmt::Write;

use crate::{dfa::DFA, util::id::StateID};

/// The language of a generated scanner.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Language {
    /// A C function, suitable for collecting many scanners in one `.c` file.
    C,
    /// A Rust function, suitable for collecting many scanners in one module.
    Rust,
}

impl Language {
    /// The conventional file extension for source files in this language.
    pub fn extension(&self) -> &'static str {
        match *self {
            Language::C => "c",
            Language::Rust => "rs",
        }
    }
}

impl core::str::FromStr for Language {
    type Err = UnknownLanguageError;

    fn from_str(s: &str) -> Result<Language, UnknownLanguageError> {
        match s {
            "c" | "C" => Ok(Language::C),
            "rust" | "Rust" | "rs" => Ok(Language::Rust),
            unk => Err(UnknownLanguageError { given: unk.to_string() }),
        }
    }
}

/// The error returned when parsing an unrecognized [`Language`] name.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnknownLanguageError {
    given: String,
}

impl std::error::Error for UnknownLanguageError {}

impl core::fmt::Display for UnknownLanguageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "unrecognized language '{}' (must be 'c' or 'rust')",
            self.given,
        )
    }
}

/// Write a scanner function for the given DFA.
///
/// The function is named `scan_<name>`. Callers must ensure that the name
/// makes that a valid identifier in the target language.
pub fn write_scanner<W: Write>(
    dfa: &DFA,
    name: &str,
    lang: Language,
    wtr: W,
) -> core::fmt::Result {
    match lang {
        Language::C => write_c(dfa, name, wtr),
        Language::Rust => write_rust(dfa, name, wtr),
    }
}

fn write_c<W: Write>(dfa: &DFA, name: &str, mut wtr: W) -> core::fmt::Result {
    writeln!(wtr, "unsigned long scan_{}(const char *s) {{", name)?;
    writeln!(wtr, "  unsigned long last_accepting = 0;")?;
    writeln!(wtr, "  unsigned char c;")?;
    writeln!(wtr, "  unsigned long count = 0;")?;
    for sid in 1..dfa.state_len() {
        let sid = StateID::new_unchecked(sid);
        writeln!(wtr, "s_{}:", sid)?;
        if dfa.is_match_state(sid) {
            writeln!(wtr, "  last_accepting = count;")?;
        }
        let row = match dfa.transitions().row(sid) {
            None => {
                writeln!(wtr, "  goto s_out;")?;
                continue;
            }
            Some(row) => row,
        };
        writeln!(wtr, "  c = s[count++];")?;
        writeln!(wtr, "  switch (c) {{")?;
        for t in row.transitions() {
            writeln!(wtr, "    case {}: goto s_{};", t.byte, t.next)?;
        }
        writeln!(wtr, "    default: goto s_out;")?;
        writeln!(wtr, "  }}")?;
    }
    writeln!(wtr, "s_out:")?;
    writeln!(wtr, "  return last_accepting;")?;
    writeln!(wtr, "}}")
}

fn write_rust<W: Write>(
    dfa: &DFA,
    name: &str,
    mut wtr: W,
) -> core::fmt::Result {
    writeln!(wtr, "pub fn scan_{}(haystack: &[u8]) -> usize {{", name)?;
    writeln!(wtr, "    let mut state: usize = 1;")?;
    writeln!(wtr, "    let mut last_accepting = 0;")?;
    writeln!(wtr, "    let mut count = 0;")?;
    writeln!(wtr, "    loop {{")?;
    let accepting: Vec<String> =
        dfa.accepting_states().iter().map(|id| id.to_string()).collect();
    if !accepting.is_empty() {
        let states = accepting.join(" | ");
        writeln!(wtr, "        if matches!(state, {}) {{", states)?;
        writeln!(wtr, "            last_accepting = count;")?;
        writeln!(wtr, "        }}")?;
    }
    writeln!(wtr, "        let byte = match haystack.get(count) {{")?;
    writeln!(wtr, "            Some(&byte) => byte,")?;
    writeln!(wtr, "            None => break,")?;
    writeln!(wtr, "        }};")?;
    writeln!(wtr, "        count += 1;")?;
    writeln!(wtr, "        state = match (state, byte) {{")?;
    for row in dfa.transitions().rows() {
        for range in row.ranges() {
            let (id, start) = (row.id(), RustByte(range.start));
            write!(wtr, "            ({}, {}", id, start)?;
            if range.start != range.end {
                write!(wtr, "..={}", RustByte(range.end))?;
            }
            writeln!(wtr, ") => {},", range.next)?;
        }
    }
    writeln!(wtr, "            _ => break,")?;
    writeln!(wtr, "        }};")?;
    writeln!(wtr, "    }}")?;
    writeln!(wtr, "    last_accepting")?;
    writeln!(wtr, "}}")
}

/// Formats a byte as a Rust byte literal.
struct RustByte(u8);

impl core::fmt::Display for RustByte {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "b'")?;
        for b in core::ascii::escape_default(self.0) {
            write!(f, "{}", char::from(b))?;
        }
        write!(f, "'")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scanner(pattern: &str, lang: Language) -> String {
        let dfa = DFA::new(pattern).unwrap();
        let mut code = String::new();
        write_scanner(&dfa, "test", lang, &mut code).unwrap();
        code
    }

    #[test]
    fn c_scanner() {
        let expected = "\
unsigned long scan_test(const char *s) {
  unsigned long last_accepting = 0;
  unsigned char c;
  unsigned long count = 0;
s_1:
  c = s[count++];
  switch (c) {
    case 97: goto s_2;
    case 98: goto s_2;
    default: goto s_out;
  }
s_2:
  last_accepting = count;
  goto s_out;
s_out:
  return last_accepting;
}
";
        assert_eq!(expected, scanner("a|b", Language::C));
    }

    #[test]
    fn rust_scanner() {
        let expected = "\
pub fn scan_test(haystack: &[u8]) -> usize {
    let mut state: usize = 1;
    let mut last_accepting = 0;
    let mut count = 0;
    loop {
        if matches!(state, 1 | 2) {
            last_accepting = count;
        }
        let byte = match haystack.get(count) {
            Some(&byte) => byte,
            None => break,
        };
        count += 1;
        state = match (state, byte) {
            (1, b'\\'') => 2,
            (2, b'\\'') => 2,
            (2, b'a'..=b'c') => 2,
            _ => break,
        };
    }
    last_accepting
}
";
        assert_eq!(expected, scanner("('[a-c]*)*", Language::Rust));
    }

    #[test]
    fn language_names() {
        assert_eq!(Ok(Language::C), "c".parse::<Language>());
        assert_eq!(Ok(Language::Rust), "rust".parse::<Language>());
        assert!("go".parse::<Language>().is_err());
        assert_eq!("rs", Language::Rust.extension());
    }
}

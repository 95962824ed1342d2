/*!
This crate compiles small regular expressions into minimal deterministic
finite automata, and DFAs into standalone scanner functions.

The pipeline has three stages, each producing a new immutable automaton:

1. [`nfa::thompson::Compiler`] turns a pattern into a Thompson NFA.
2. Subset construction turns the NFA into a [`dfa::DFA`].
3. Partition refinement turns that DFA into the minimal DFA for the same
language.

The [`dfa::Builder`] runs all three stages. The [`dot`] module renders any of
the automata as a Graphviz graph, and the [`codegen`] module emits a C or
Rust function implementing a longest-prefix scan with a DFA.

# Example

```
use scanner_automata::dfa::DFA;

let dfa = DFA::new(r"(ab)+")?;
assert!(dfa.is_match(b"abab"));
assert!(!dfa.is_match(b"aba"));
assert_eq!(Some(4), dfa.find_longest_prefix(b"ababa"));

# Ok::<(), Box<dyn std::error::Error>>(())
```

# Pattern syntax

The pattern language is deliberately small. It has literal bytes, the escapes
`\n`, `\t`, `\s` (space) and `\` followed by any meta character, grouping
with `(...)`, the postfix repetition operators `*` and `+`, inclusive byte
ranges written exactly as `[x-y]`, and alternation with `|`, which has the
lowest precedence. See [`nfa::thompson::Compiler`] for details.

There are no Unicode classes, no counted repetition, no anchors, no captures
and no lookaround. The alphabet is the 255 non-zero byte values; byte `0` is
reserved for epsilon transitions.

# Crate features

* **logging** - When enabled, the `log` crate is used to emit messages about
the size of each automaton built and the progress of minimization.
*/

#![deny(missing_debug_implementations)]

#[cfg(not(any(
    target_pointer_width = "16",
    target_pointer_width = "32",
    target_pointer_width = "64"
)))]
compile_error!("scanner-automata currently not supported on non-{16,32,64}");

pub use crate::dfa::DFA;

#[macro_use]
mod macros;

pub mod codegen;
pub mod dfa;
pub mod dot;
pub mod nfa;
pub mod util;

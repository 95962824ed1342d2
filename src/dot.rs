/*!
Writes automata as Graphviz `dot` graphs.

The output is meant for inspecting automata by eye (e.g., `dot -Tsvg`), so
runs of consecutive bytes leading to the same state are drawn as a single edge
labelled with a range such as `0-9`.

```
use scanner_automata::{dfa::DFA, dot};

let dfa = DFA::new("[0-9]+")?;
let mut out = String::new();
dot::write_dfa(&dfa, &mut out)?;
assert!(out.contains(r#"d1 -> d2 [label = "0-9"];"#));

# Ok::<(), Box<dyn std::error::Error>>(())
```
*/

use core::fmt::Write;

use crate::{
    dfa::DFA,
    nfa::thompson::{EPSILON, NFA},
    util::transitions::{ByteRange, TransitionTable},
};

/// Write the given NFA as a `dot` graph.
///
/// The start state is drawn as a box and the accepting state as a double
/// circle. Epsilon transitions are dashed.
pub fn write_nfa<W: Write>(nfa: &NFA, mut wtr: W) -> core::fmt::Result {
    writeln!(wtr, "digraph {{")?;
    writeln!(wtr, "  node [shape = circle]")?;
    writeln!(wtr, "  d{} [shape = box];", nfa.start())?;
    writeln!(wtr, "  d{} [shape = doublecircle];", nfa.end())?;
    write_edges(nfa.transitions(), &mut wtr)?;
    writeln!(wtr, "}}")
}

/// Write the given DFA as a `dot` graph.
///
/// The start state is drawn as a square (or an `Msquare` when it also
/// accepts) and every other accepting state as a double circle. The error
/// state is omitted.
pub fn write_dfa<W: Write>(dfa: &DFA, mut wtr: W) -> core::fmt::Result {
    writeln!(wtr, "digraph {{")?;
    writeln!(wtr, "  node [shape = circle]")?;
    let start = dfa.start();
    let shape = if dfa.is_match_state(start) { "Msquare" } else { "square" };
    writeln!(wtr, "  d{} [shape = {}];", start, shape)?;
    for id in dfa.accepting_states().iter().filter(|&id| id != start) {
        writeln!(wtr, "  d{} [shape = doublecircle];", id)?;
    }
    write_edges(dfa.transitions(), &mut wtr)?;
    writeln!(wtr, "}}")
}

fn write_edges<W: Write>(
    table: &TransitionTable,
    wtr: &mut W,
) -> core::fmt::Result {
    for row in table.rows() {
        for range in row.ranges() {
            if range.start == EPSILON {
                writeln!(
                    wtr,
                    "  d{} -> d{} [label = \"ε\", style = dashed];",
                    row.id(),
                    range.next,
                )?;
            } else {
                writeln!(
                    wtr,
                    "  d{} -> d{} [label = \"{}\"];",
                    row.id(),
                    range.next,
                    label(&range),
                )?;
            }
        }
    }
    Ok(())
}

/// Returns the label of a range, escaped for use in a quoted `dot` string.
fn label(range: &ByteRange) -> String {
    let mut label = String::new();
    for ch in range.to_string().chars() {
        if ch == '"' || ch == '\\' {
            label.push('\\');
        }
        label.push(ch);
    }
    label
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nfa_graph() {
        let nfa = NFA::new("a*").unwrap();
        let mut got = String::new();
        write_nfa(&nfa, &mut got).unwrap();
        let expected = r#"digraph {
  node [shape = circle]
  d3 [shape = box];
  d4 [shape = doublecircle];
  d1 -> d2 [label = "a"];
  d2 -> d1 [label = "ε", style = dashed];
  d2 -> d4 [label = "ε", style = dashed];
  d3 -> d1 [label = "ε", style = dashed];
  d3 -> d4 [label = "ε", style = dashed];
}
"#;
        assert_eq!(expected, got);
    }

    #[test]
    fn dfa_graph_with_accepting_start() {
        let dfa = DFA::new(r#"(x|")*"#).unwrap();
        let mut got = String::new();
        write_dfa(&dfa, &mut got).unwrap();
        let expected = r#"digraph {
  node [shape = circle]
  d1 [shape = Msquare];
  d1 -> d1 [label = "\\\""];
  d1 -> d1 [label = "x"];
}
"#;
        assert_eq!(expected, got);
    }
}

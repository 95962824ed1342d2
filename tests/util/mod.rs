use quickcheck::{Arbitrary, Gen};
use scanner_automata::{dfa::DFA, util::id::StateID};

/// The bytes that random patterns are built from and random inputs are
/// drawn from.
pub const ALPHABET: &[u8] = b"abc";

/// A randomly generated pattern over `ALPHABET`.
///
/// Every pattern compiles. Sub-expressions are always parenthesized when
/// they are combined, so the structure generated is the structure parsed.
#[derive(Clone, Debug)]
pub struct Pattern(pub String);

impl Arbitrary for Pattern {
    fn arbitrary(g: &mut Gen) -> Pattern {
        Pattern(expr(g, 4))
    }
}

fn expr(g: &mut Gen, depth: u32) -> String {
    let choice = if depth == 0 { 0 } else { u8::arbitrary(g) % 8 };
    match choice {
        0 | 1 => {
            let atoms = ["a", "b", "c", "[a-b]", "[b-c]"];
            g.choose(&atoms).unwrap().to_string()
        }
        2 | 3 => format!("{}{}", expr(g, depth - 1), expr(g, depth - 1)),
        4 => format!("({}|{})", expr(g, depth - 1), expr(g, depth - 1)),
        5 => format!("({})*", expr(g, depth - 1)),
        6 => format!("({})+", expr(g, depth - 1)),
        _ => "()".to_string(),
    }
}

/// Returns every string over `ALPHABET` with at most `max_len` bytes.
pub fn all_inputs(max_len: usize) -> Vec<Vec<u8>> {
    let mut inputs = vec![vec![]];
    let mut last = vec![vec![]];
    for _ in 0..max_len {
        let mut next = vec![];
        for prefix in &last {
            for &byte in ALPHABET {
                let mut input = prefix.clone();
                input.push(byte);
                next.push(input);
            }
        }
        inputs.extend(next.iter().cloned());
        last = next;
    }
    inputs
}

/// Returns true if and only if the two DFAs are the same up to renumbering
/// of their states.
///
/// Both DFAs are walked in lockstep from their start states, building a
/// one-to-one mapping between their states as it goes.
pub fn isomorphic(a: &DFA, b: &DFA) -> bool {
    if a.state_len() != b.state_len() {
        return false;
    }
    let mut a_to_b: Vec<Option<StateID>> = vec![None; a.state_len()];
    let mut b_seen = vec![false; b.state_len()];
    a_to_b[a.start().as_usize()] = Some(b.start());
    b_seen[b.start().as_usize()] = true;
    let mut stack = vec![(a.start(), b.start())];
    while let Some((x, y)) = stack.pop() {
        if a.is_match_state(x) != b.is_match_state(y) {
            return false;
        }
        for byte in 1..=255u8 {
            let (nx, ny) = (a.next_state(x, byte), b.next_state(y, byte));
            if nx.is_zero() || ny.is_zero() {
                if nx.is_zero() != ny.is_zero() {
                    return false;
                }
                continue;
            }
            match a_to_b[nx.as_usize()] {
                Some(mapped) if mapped != ny => return false,
                Some(_) => {}
                None => {
                    if b_seen[ny.as_usize()] {
                        return false;
                    }
                    a_to_b[nx.as_usize()] = Some(ny);
                    b_seen[ny.as_usize()] = true;
                    stack.push((nx, ny));
                }
            }
        }
    }
    true
}

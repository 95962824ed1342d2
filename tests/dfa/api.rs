use std::error::Error;

use scanner_automata::{
    codegen::{self, Language},
    dfa::{self, DFA},
    dot,
    nfa::thompson::{self, ErrorKind},
    util::id::StateID,
};

#[test]
fn scenario_literal() -> Result<(), Box<dyn Error>> {
    let dfa = DFA::new("a")?;
    assert!(dfa.is_match(b"a"));
    for &no in &["", "aa", "b"] {
        assert!(!dfa.is_match(no.as_bytes()), "{:?}", no);
    }
    Ok(())
}

#[test]
fn scenario_star() -> Result<(), Box<dyn Error>> {
    let dfa = DFA::new("ab*c")?;
    for &yes in &["ac", "abc", "abbbc"] {
        assert!(dfa.is_match(yes.as_bytes()), "{:?}", yes);
    }
    for &no in &["a", "abcc", "bc"] {
        assert!(!dfa.is_match(no.as_bytes()), "{:?}", no);
    }
    Ok(())
}

// A single scan reports only the first token. Scanning the rest of the input
// is a separate call.
#[test]
fn scenario_alternation_scan() -> Result<(), Box<dyn Error>> {
    let dfa = DFA::new("a|b")?;
    assert!(dfa.is_match(b"a"));
    assert!(dfa.is_match(b"b"));
    assert_eq!(Some(1), dfa.find_longest_prefix(b"ba"));
    assert_eq!(Some(1), dfa.find_longest_prefix(&b"ba"[1..]));
    Ok(())
}

#[test]
fn scenario_plus() -> Result<(), Box<dyn Error>> {
    let dfa = DFA::new("(ab)+")?;
    for &yes in &["ab", "abab"] {
        assert!(dfa.is_match(yes.as_bytes()), "{:?}", yes);
    }
    for &no in &["", "a", "aba"] {
        assert!(!dfa.is_match(no.as_bytes()), "{:?}", no);
    }
    Ok(())
}

#[test]
fn scenario_digits() -> Result<(), Box<dyn Error>> {
    let dfa = DFA::new("[0-9][0-9]*")?;
    // The error state, the start state and the accepting loop.
    assert_eq!(3, dfa.state_len());
    assert_eq!(1, dfa.accepting_states().len());
    assert_eq!(Some(2), dfa.find_longest_prefix(b"42x"));
    Ok(())
}

#[test]
fn error_state_is_dead() -> Result<(), Box<dyn Error>> {
    for &pattern in &["a", "(a|b)*abb", "[a-z]+|[0-9]+", ""] {
        let dfa = DFA::new(pattern)?;
        assert_eq!(StateID::new_unchecked(1), dfa.start());
        assert!(!dfa.is_match_state(StateID::ZERO));
        assert!(dfa.transitions().row(StateID::ZERO).is_none());
        for byte in 0..=255u8 {
            assert_eq!(StateID::ZERO, dfa.next_state(StateID::ZERO, byte));
        }
        // Byte 0 is reserved and never matched.
        assert_eq!(StateID::ZERO, dfa.next_state(dfa.start(), 0));
    }
    Ok(())
}

#[test]
fn from_nfa_matches_pattern() -> Result<(), Box<dyn Error>> {
    let nfa = thompson::NFA::new("(x|y)+z")?;
    let naive = DFA::from_nfa(&nfa)?;
    let minimal = DFA::new("(x|y)+z")?;
    assert!(naive.state_len() > minimal.state_len());
    for &input in &["xz", "yxyz", "z", "xyx", ""] {
        let input = input.as_bytes();
        assert_eq!(nfa.is_match(input), naive.is_match(input));
        assert_eq!(nfa.is_match(input), minimal.is_match(input));
    }
    Ok(())
}

#[test]
fn compile_errors_are_reported() {
    let err = DFA::new("a(b").unwrap_err();
    let nfa_err = err.nfa_error().unwrap();
    assert_eq!(&ErrorKind::UnclosedGroup { offset: 1 }, nfa_err.kind());
    assert_eq!(None, err.state_limit());
    assert!(err.source().is_some());

    let err = DFA::new("ab|[z-a]").unwrap_err();
    assert_eq!(
        &ErrorKind::InvalidClassRange { offset: 3, start: b'z', end: b'a' },
        err.nfa_error().unwrap().kind(),
    );
}

#[test]
fn state_limit_is_enforced() -> Result<(), Box<dyn Error>> {
    // Subset construction needs 5 states for "abc", counting the error
    // state.
    let mut builder = dfa::Builder::new();
    builder.configure(dfa::Config::new().state_limit(Some(4)));
    let err = builder.build("abc").unwrap_err();
    assert_eq!(Some(4), err.state_limit());
    assert!(err.nfa_error().is_none());
    assert!(err.to_string().contains("4"));

    builder.configure(dfa::Config::new().state_limit(Some(5)));
    assert!(builder.build("abc")?.is_match(b"abc"));
    Ok(())
}

#[test]
fn nfa_size_limit_is_enforced() {
    let mut builder = dfa::Builder::new();
    builder.thompson(thompson::Config::new().size_limit(Some(3)));
    let err = builder.build("ab").unwrap_err();
    assert_eq!(
        &ErrorKind::TooManyStates { limit: 3 },
        err.nfa_error().unwrap().kind(),
    );
}

#[test]
fn dot_and_codegen_agree_on_states() -> Result<(), Box<dyn Error>> {
    let dfa = DFA::new("[a-z]([a-z]|[0-9])*")?;

    let mut graph = String::new();
    dot::write_dfa(&dfa, &mut graph)?;
    assert!(graph.starts_with("digraph {\n"));
    assert!(graph.ends_with("}\n"));
    assert!(graph.contains("d1 [shape = square];"));
    assert!(graph.contains(r#"d1 -> d2 [label = "a-z"];"#));

    let mut code = String::new();
    codegen::write_scanner(&dfa, "ident", Language::C, &mut code)?;
    for id in 1..dfa.state_len() {
        assert!(code.contains(&format!("s_{}:", id)), "missing state {}", id);
    }
    assert!(!code.contains("s_0:"));
    Ok(())
}

use scanner_automata::{
    nfa::thompson::{Compiler, Config, ErrorKind, EPSILON, NFA},
    util::id::StateID,
};

fn kind(pattern: &str) -> ErrorKind {
    Compiler::new().build(pattern).unwrap_err().kind().clone()
}

#[test]
fn debug_lists_every_state() {
    let nfa = NFA::new("ab").unwrap();
    let expected = "\
thompson::NFA(
^000001: a => 2
 000002: ε => 3
 000003: b => 4
*000004:
)
";
    assert_eq!(expected, format!("{:?}", nfa));
}

#[test]
fn start_set_follows_epsilons() {
    let nfa = NFA::new("a*").unwrap();
    let start = nfa.start_set();
    let got: Vec<usize> = start.iter().map(|id| id.as_usize()).collect();
    assert_eq!(vec![1, 3, 4], got);
    assert!(nfa.is_match_set(&start));
    assert!(nfa.next(&start, EPSILON).is_empty());
}

#[test]
fn ids_are_dense() {
    let nfa = NFA::new("(a|b)+c").unwrap();
    let mut used = vec![false; nfa.state_len()];
    for (id, t) in nfa.transitions().iter() {
        used[id.as_usize()] = true;
        used[t.next.as_usize()] = true;
    }
    assert!(!used[0]);
    assert!(used[1..].iter().all(|&yes| yes));
    assert_ne!(StateID::ZERO, nfa.start());
    assert_ne!(nfa.start(), nfa.end());
}

#[test]
fn error_offsets() {
    assert_eq!(
        ErrorKind::UnknownEscape { offset: 2, byte: b'q' },
        kind(r"ab\q"),
    );
    assert_eq!(ErrorKind::TrailingEscape { offset: 2 }, kind(r"ab\"));
    assert_eq!(ErrorKind::UnclosedGroup { offset: 1 }, kind("x((a)"));
    assert_eq!(ErrorKind::UnopenedGroup { offset: 1 }, kind("a)"));
    assert_eq!(ErrorKind::UnopenedClass { offset: 2 }, kind("ab]"));
    assert_eq!(ErrorKind::MalformedClass { offset: 1 }, kind("a[bc]"));
    assert_eq!(ErrorKind::ClassEscape { offset: 3 }, kind(r"[a-\]"));
    assert_eq!(
        ErrorKind::MissingRepetitionOperand { offset: 1, op: b'+' },
        kind("(+a)"),
    );
    assert_eq!(
        ErrorKind::MissingRepetitionOperand { offset: 5, op: b'*' },
        kind("ab(c|*)"),
    );
    assert_eq!(ErrorKind::NulByte { offset: 1 }, kind("a\u{0}"));
}

#[test]
fn errors_display_offsets() {
    let err = Compiler::new().build("ab)").unwrap_err();
    assert!(err.to_string().contains('2'), "{}", err);
}

#[test]
fn size_limit() {
    let mut compiler = Compiler::new();
    compiler.configure(Config::new().size_limit(Some(7)));
    // Two states per literal and two more for the star.
    assert!(compiler.build("a*b").is_ok());
    assert_eq!(
        &ErrorKind::TooManyStates { limit: 7 },
        compiler.build("a*bc").unwrap_err().kind(),
    );
}

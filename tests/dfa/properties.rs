use quickcheck::{quickcheck, TestResult};
use scanner_automata::{
    dfa::{self, DFA},
    nfa::thompson::NFA,
    util::id::StateID,
};

use crate::util::{all_inputs, isomorphic, Pattern};

/// Every input of up to this many bytes is checked against each pattern.
const MAX_INPUT_LEN: usize = 4;

fn naive(nfa: &NFA) -> DFA {
    DFA::from_nfa(nfa).unwrap()
}

fn build(pattern: &Pattern) -> Option<(NFA, DFA, DFA)> {
    let nfa = NFA::new(&pattern.0).ok()?;
    let naive = naive(&nfa);
    let minimal = dfa::Builder::new().build_from_nfa(&nfa).ok()?;
    Some((nfa, naive, minimal))
}

quickcheck! {
    fn prop_pipeline_preserves_language(pattern: Pattern) -> TestResult {
        let (nfa, naive, minimal) = match build(&pattern) {
            None => return TestResult::error(format!("{:?}", pattern)),
            Some(automata) => automata,
        };
        for input in all_inputs(MAX_INPUT_LEN) {
            let expected = nfa.is_match(&input);
            if naive.is_match(&input) != expected
                || minimal.is_match(&input) != expected
            {
                return TestResult::failed();
            }
            if naive.find_longest_prefix(&input)
                != minimal.find_longest_prefix(&input)
            {
                return TestResult::failed();
            }
        }
        TestResult::passed()
    }

    fn prop_minimization_shrinks(pattern: Pattern) -> bool {
        let (_, naive, minimal) = build(&pattern).unwrap();
        minimal.state_len() <= naive.state_len()
    }

    fn prop_minimization_is_idempotent(pattern: Pattern) -> bool {
        let (_, _, minimal) = build(&pattern).unwrap();
        isomorphic(&minimal, &minimal.minimize())
    }

    fn prop_determinization_is_deterministic(pattern: Pattern) -> bool {
        let nfa = NFA::new(&pattern.0).unwrap();
        isomorphic(&naive(&nfa), &naive(&nfa))
    }

    // Minimal DFAs are unique, so equivalent patterns must yield the same
    // automaton no matter how differently their NFAs are shaped.
    fn prop_equivalent_patterns_minimize_alike(pattern: Pattern) -> bool {
        let p = &pattern.0;
        let dfa = DFA::new(p).unwrap();
        let variants = [
            format!("({})", p),
            format!("({})|({})", p, p),
            format!("({})()", p),
        ];
        variants
            .iter()
            .all(|variant| isomorphic(&dfa, &DFA::new(variant).unwrap()))
    }

    fn prop_epsilon_closure_is_idempotent(pattern: Pattern) -> bool {
        let nfa = NFA::new(&pattern.0).unwrap();
        let mut all_ok = true;
        for id in 1..nfa.state_len() {
            let mut set = nfa.new_state_set();
            set.insert(StateID::must(id));
            let once = nfa.epsilon_closure(&set);
            all_ok &= once.contains(StateID::must(id));
            all_ok &= nfa.epsilon_closure(&once) == once;
        }
        all_ok
    }
}

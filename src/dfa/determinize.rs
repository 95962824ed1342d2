use std::{collections::HashMap, rc::Rc};

use crate::{
    dfa::{error::Error, DFA},
    nfa::thompson::NFA,
    util::{id::StateID, state_set::StateSet, transitions::TransitionTable},
};

/// A builder for configuring and running subset construction.
#[derive(Clone, Debug, Default)]
pub(crate) struct Config {
    state_limit: Option<usize>,
}

impl Config {
    /// Create a new determinizer. The determinizer may be configured before
    /// calling `run`.
    pub fn new() -> Config {
        Config::default()
    }

    /// The maximum number of states the DFA may have, including the error
    /// state. When `None`, the only limit is what a `StateID` can represent.
    pub fn state_limit(&mut self, limit: Option<usize>) -> &mut Config {
        self.state_limit = limit;
        self
    }

    /// Run subset construction on the given NFA and return the resulting
    /// DFA. The DFA returned is never minimal in general.
    pub fn run(&self, nfa: &NFA) -> Result<DFA, Error> {
        // Index 0 is the error state. It corresponds to the empty subset,
        // but is never looked up in the cache: an empty subset never gets a
        // transition in the first place.
        let error = Rc::new(nfa.new_state_set());
        Runner {
            limit: self
                .state_limit
                .map_or(StateID::LIMIT, |n| n.min(StateID::LIMIT)),
            nfa,
            builder_states: vec![error],
            cache: HashMap::new(),
            table: TransitionTable::new(),
        }
        .run()
    }
}

/// The actual implementation of subset construction.
///
/// Each DFA state is identified by the set of NFA states it represents. Two
/// DFA states are the same exactly when their sets are bit-for-bit equal.
#[derive(Debug)]
struct Runner<'a> {
    /// The maximum number of DFA states, including the error state.
    limit: usize,
    /// The NFA we're converting into a DFA.
    nfa: &'a NFA,
    /// The canonical home of each DFA state's NFA subset, indexed by DFA
    /// state ID. The first entry is the error state.
    builder_states: Vec<Rc<StateSet>>,
    /// A map from NFA subsets to the DFA states already built for them. This
    /// shares its sets with `builder_states`.
    cache: HashMap<Rc<StateSet>, StateID>,
    /// The transitions of the DFA we're building.
    table: TransitionTable,
}

impl<'a> Runner<'a> {
    fn run(mut self) -> Result<DFA, Error> {
        let start = self.nfa.start_set();
        let (start_id, _) = self.cached_state(start)?;
        assert_eq!(1, start_id.as_usize(), "start state must have ID 1");

        let mut uncompiled = vec![start_id];
        while let Some(dfa_id) = uncompiled.pop() {
            let set = Rc::clone(&self.builder_states[dfa_id.as_usize()]);
            for byte in 1..=255 {
                let next = self.nfa.next(&set, byte);
                if next.is_empty() {
                    continue;
                }
                let closure = self.nfa.epsilon_closure(&next);
                let (next_id, is_new) = self.cached_state(closure)?;
                self.table.insert(dfa_id, byte, next_id);
                if is_new {
                    uncompiled.push(next_id);
                }
            }
        }

        let state_len = self.builder_states.len();
        let mut accepting = StateSet::new(state_len);
        for (i, set) in self.builder_states.iter().enumerate() {
            if self.nfa.is_match_set(set) {
                accepting.insert(StateID::new_unchecked(i));
            }
        }
        debug!(
            "determinized NFA with {} states into DFA with {} states \
             ({} accepting)",
            self.nfa.state_len() - 1,
            state_len - 1,
            accepting.len(),
        );
        Ok(DFA::from_parts(self.table, state_len, accepting))
    }

    /// Return the DFA state for the given NFA subset, adding a new state
    /// when the subset hasn't been seen before. The boolean returned is true
    /// only when a new state was added.
    fn cached_state(
        &mut self,
        set: StateSet,
    ) -> Result<(StateID, bool), Error> {
        if let Some(&id) = self.cache.get(&set) {
            return Ok((id, false));
        }
        let index = self.builder_states.len();
        if index >= self.limit {
            return Err(Error::too_many_states(self.limit));
        }
        let id = StateID::new_unchecked(index);
        let set = Rc::new(set);
        self.builder_states.push(Rc::clone(&set));
        self.cache.insert(set, id);
        Ok((id, true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nfa::thompson::EPSILON;

    fn dfa(pattern: &str) -> DFA {
        Config::new().run(&NFA::new(pattern).unwrap()).unwrap()
    }

    #[test]
    fn single_literal() {
        let dfa = dfa("a");
        assert_eq!(3, dfa.state_len());
        assert_eq!(StateID::must(2), dfa.next_state(dfa.start(), b'a'));
        assert_eq!(StateID::ZERO, dfa.next_state(dfa.start(), b'b'));
        assert!(!dfa.is_match_state(dfa.start()));
        assert!(dfa.is_match_state(StateID::must(2)));
        // Byte 0 is reserved for epsilon transitions.
        assert_eq!(StateID::ZERO, dfa.next_state(dfa.start(), EPSILON));
    }

    #[test]
    fn no_transitions_out_of_error_state() {
        let dfa = dfa("a*b|c");
        assert!(dfa.transitions().row(StateID::ZERO).is_none());
        assert!(!dfa.is_match_state(StateID::ZERO));
    }

    #[test]
    fn subsets_are_shared() {
        // Both 'a' and 'b' lead to the same subset of NFA states.
        let dfa = dfa("[a-b]c");
        let (a, b) = (
            dfa.next_state(dfa.start(), b'a'),
            dfa.next_state(dfa.start(), b'b'),
        );
        assert_eq!(a, b);
        assert_eq!(4, dfa.state_len());
    }

    #[test]
    fn state_limit() {
        let nfa = NFA::new("abc").unwrap();
        let err = Config::new().state_limit(Some(4)).run(&nfa).unwrap_err();
        assert_eq!(Some(4), err.state_limit());
        assert!(Config::new().state_limit(Some(5)).run(&nfa).is_ok());
    }
}

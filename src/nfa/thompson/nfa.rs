use crate::{
    nfa::thompson::{compiler::Compiler, error::Error},
    util::{
        escape::DebugByte, id::StateID, state_set::StateSet,
        transitions::TransitionTable,
    },
};

/// The trigger byte reserved for epsilon transitions.
///
/// A transition on this byte consumes no input. Since the byte is reserved,
/// it can never be matched, and patterns may not contain it.
pub const EPSILON: u8 = 0;

/// A Thompson NFA with a single start state and a single accepting state.
///
/// An NFA is built from a pattern via a [`Compiler`] (or [`NFA::new`]). Once
/// built it is immutable. It is usually only an intermediate step toward
/// building a [`DFA`](crate::dfa::DFA), but it can also be executed directly
/// via [`NFA::is_match`], which simulates it by tracking the set of all
/// active states.
///
/// Every state ID in an NFA is in the range `1..state_len()`. The ID `0` is
/// never used.
///
/// # Example
///
/// ```
/// use scanner_automata::nfa::thompson::NFA;
///
/// let nfa = NFA::new("ab*c")?;
/// assert!(nfa.is_match(b"abbbc"));
/// assert!(!nfa.is_match(b"abcc"));
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone)]
pub struct NFA {
    table: TransitionTable,
    start: StateID,
    end: StateID,
    state_len: usize,
}

impl NFA {
    /// Compile the given pattern into an NFA using the default configuration.
    pub fn new(pattern: &str) -> Result<NFA, Error> {
        Compiler::new().build(pattern)
    }

    pub(crate) fn from_parts(
        table: TransitionTable,
        start: StateID,
        end: StateID,
    ) -> NFA {
        let max = table
            .max_id()
            .into_iter()
            .chain([start, end].iter().copied())
            .max()
            .unwrap_or(StateID::ZERO);
        NFA { table, start, end, state_len: max.as_usize() + 1 }
    }

    /// Returns the starting state of this NFA.
    pub fn start(&self) -> StateID {
        self.start
    }

    /// Returns the single accepting state of this NFA.
    pub fn end(&self) -> StateID {
        self.end
    }

    /// Returns one more than the largest state ID in this NFA.
    ///
    /// This is the capacity needed by any [`StateSet`] holding states from
    /// this NFA.
    pub fn state_len(&self) -> usize {
        self.state_len
    }

    /// Returns the transitions of this NFA. Epsilon transitions are the ones
    /// triggered by [`EPSILON`].
    pub fn transitions(&self) -> &TransitionTable {
        &self.table
    }

    /// Returns true if and only if the given state is the accepting state.
    pub fn is_match_state(&self, id: StateID) -> bool {
        id == self.end
    }

    /// Returns true if and only if the given set contains the accepting
    /// state.
    pub fn is_match_set(&self, set: &StateSet) -> bool {
        set.contains(self.end)
    }

    /// Returns a new empty set whose capacity fits every state in this NFA.
    pub fn new_state_set(&self) -> StateSet {
        StateSet::new(self.state_len)
    }

    /// Returns the epsilon closure of the start state.
    pub fn start_set(&self) -> StateSet {
        let mut set = self.new_state_set();
        set.insert(self.start);
        self.epsilon_closure(&set)
    }

    /// Returns the set of all states reachable from any state in `set` by
    /// following zero or more epsilon transitions.
    ///
    /// The given set must have been created with a capacity of at least
    /// `state_len()`.
    pub fn epsilon_closure(&self, set: &StateSet) -> StateSet {
        let mut closure = set.clone();
        let mut stack: Vec<StateID> = set.iter().collect();
        while let Some(id) = stack.pop() {
            for t in self.table.find_all(id, EPSILON) {
                if closure.insert(t.next) {
                    stack.push(t.next);
                }
            }
        }
        closure
    }

    /// Returns the set of states reachable from any state in `set` by
    /// consuming `byte`. Epsilon transitions are not followed.
    ///
    /// The result is always empty when `byte` is [`EPSILON`].
    pub fn next(&self, set: &StateSet, byte: u8) -> StateSet {
        let mut next = StateSet::new(set.capacity());
        if byte == EPSILON {
            return next;
        }
        for id in set.iter() {
            for t in self.table.find_all(id, byte) {
                next.insert(t.next);
            }
        }
        next
    }

    /// Returns true if and only if this NFA accepts the entire haystack.
    pub fn is_match(&self, haystack: &[u8]) -> bool {
        let mut set = self.start_set();
        for &byte in haystack {
            set = self.epsilon_closure(&self.next(&set, byte));
            if set.is_empty() {
                return false;
            }
        }
        self.is_match_set(&set)
    }
}

impl core::fmt::Debug for NFA {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "thompson::NFA(")?;
        for sid in 1..self.state_len {
            let sid = StateID::new_unchecked(sid);
            let status = if sid == self.start {
                '^'
            } else if sid == self.end {
                '*'
            } else {
                ' '
            };
            write!(f, "{}{:06?}:", status, sid.as_usize())?;
            if let Some(row) = self.table.row(sid) {
                for (i, t) in row.transitions().iter().enumerate() {
                    let sep = if i == 0 { " " } else { ", " };
                    if t.byte == EPSILON {
                        write!(f, "{}ε => {}", sep, t.next)?;
                    } else {
                        let byte = DebugByte(t.byte);
                        write!(f, "{}{:?} => {}", sep, byte, t.next)?;
                    }
                }
            }
            writeln!(f, "")?;
        }
        writeln!(f, ")")?;
        Ok(())
    }
}

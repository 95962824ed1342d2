/*!
Provides deterministic finite automata built from Thompson NFAs.

A [`DFA`] is built in two steps. First, subset construction turns an NFA into
an equivalent DFA whose states are sets of NFA states. Second, and only when
enabled (it is by default), partition refinement merges states that no input
can tell apart, producing the unique minimal DFA for the pattern's language.

Every DFA follows the same numbering conventions:

* State `0` is the error (or "dead") state. It has no transitions and never
accepts. A transition lookup that finds nothing yields it.
* State `1` is the start state.
* Every other state is reachable from the start state.

# Example

```
use scanner_automata::dfa::DFA;

let dfa = DFA::new("[0-9][0-9]*")?;
// The error state, the start state and one accepting state that loops on
// every digit.
assert_eq!(3, dfa.state_len());
assert_eq!(Some(2), dfa.find_longest_prefix(b"42x"));
assert_eq!(None, dfa.find_longest_prefix(b"x42"));

# Ok::<(), Box<dyn std::error::Error>>(())
```
*/

pub use self::error::Error;

use crate::{
    nfa::thompson,
    util::{
        id::StateID, state_set::StateSet, transitions::TransitionTable,
    },
};

mod determinize;
mod error;
mod minimize;

/// The configuration used for building a [`DFA`].
#[derive(Clone, Debug, Default)]
pub struct Config {
    // As with the NFA configuration, every knob is optional so that
    // configurations can be layered on top of one another. See 'overwrite'.
    minimize: Option<bool>,
    state_limit: Option<Option<usize>>,
}

impl Config {
    /// Return a new default DFA configuration.
    pub fn new() -> Config {
        Config::default()
    }

    /// Whether to minimize the DFA after subset construction.
    ///
    /// Minimization is typically the most expensive step, but the DFAs built
    /// from the patterns supported here are usually small. A minimal DFA is
    /// what a scanner generator wants, since each state becomes code.
    ///
    /// This is enabled by default.
    pub fn minimize(mut self, yes: bool) -> Config {
        self.minimize = Some(yes);
        self
    }

    /// Set a limit on the number of DFA states created during subset
    /// construction, including the error state.
    ///
    /// Subset construction can create exponentially many states in the size
    /// of the NFA. When this limit is exceeded, building fails with an error
    /// instead.
    ///
    /// By default there is no limit.
    ///
    /// # Example
    ///
    /// ```
    /// use scanner_automata::dfa::{Builder, Config};
    ///
    /// let result = Builder::new()
    ///     .configure(Config::new().state_limit(Some(3)))
    ///     .build("abc");
    /// assert_eq!(Some(3), result.unwrap_err().state_limit());
    /// ```
    pub fn state_limit(mut self, limit: Option<usize>) -> Config {
        self.state_limit = Some(limit);
        self
    }

    /// Returns whether this configuration has minimization enabled.
    pub fn get_minimize(&self) -> bool {
        self.minimize.unwrap_or(true)
    }

    /// Returns the configured state limit, if any.
    pub fn get_state_limit(&self) -> Option<usize> {
        self.state_limit.unwrap_or(None)
    }

    /// Overwrite the default configuration such that the options in `o` are
    /// always used. If an option in `o` is not set, then the corresponding
    /// option in `self` is used.
    pub(crate) fn overwrite(self, o: Config) -> Config {
        Config {
            minimize: o.minimize.or(self.minimize),
            state_limit: o.state_limit.or(self.state_limit),
        }
    }
}

/// A builder for constructing a DFA from a pattern.
///
/// This builder permits configuring options for both the DFA
/// ([`Config`]) and the NFA it is built from ([`thompson::Config`]).
///
/// # Example
///
/// ```
/// use scanner_automata::{
///     dfa::{Builder, Config},
///     nfa::thompson,
/// };
///
/// let nfa = thompson::NFA::new("a+b")?;
/// let naive = Builder::new()
///     .configure(Config::new().minimize(false))
///     .build_from_nfa(&nfa)?;
/// let minimal = Builder::new().build_from_nfa(&nfa)?;
/// assert!(minimal.state_len() < naive.state_len());
/// assert!(naive.is_match(b"aab"));
/// assert!(minimal.is_match(b"aab"));
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug)]
pub struct Builder {
    config: Config,
    thompson: thompson::Compiler,
}

impl Builder {
    /// Create a new DFA builder with the default configuration.
    pub fn new() -> Builder {
        Builder {
            config: Config::default(),
            thompson: thompson::Compiler::new(),
        }
    }

    /// Build a DFA from the given pattern.
    ///
    /// If there was a problem compiling the pattern, then an error is
    /// returned.
    pub fn build(&self, pattern: &str) -> Result<DFA, Error> {
        self.build_bytes(pattern.as_bytes())
    }

    /// Build a DFA from the given pattern, which need not be valid UTF-8.
    pub fn build_bytes(&self, pattern: &[u8]) -> Result<DFA, Error> {
        let nfa = self.thompson.build_bytes(pattern).map_err(Error::nfa)?;
        self.build_from_nfa(&nfa)
    }

    /// Build a DFA from the given NFA.
    pub fn build_from_nfa(&self, nfa: &thompson::NFA) -> Result<DFA, Error> {
        let dfa = determinize::Config::new()
            .state_limit(self.config.get_state_limit())
            .run(nfa)?;
        if self.config.get_minimize() {
            Ok(dfa.minimize())
        } else {
            Ok(dfa)
        }
    }

    /// Apply the given DFA configuration options to this builder.
    pub fn configure(&mut self, config: Config) -> &mut Builder {
        self.config = self.config.clone().overwrite(config);
        self
    }

    /// Set the NFA configuration used when building a DFA from a pattern.
    pub fn thompson(&mut self, config: thompson::Config) -> &mut Builder {
        self.thompson.configure(config);
        self
    }
}

impl Default for Builder {
    fn default() -> Builder {
        Builder::new()
    }
}

/// A deterministic finite automaton over bytes.
///
/// A DFA is immutable once built. Each stage of the pipeline (subset
/// construction, minimization) produces a fresh DFA.
///
/// Byte `0` never has a transition in any DFA built by this crate, since it
/// is reserved for epsilon transitions in the NFA the DFA was built from.
#[derive(Clone)]
pub struct DFA {
    table: TransitionTable,
    state_len: usize,
    accepting: StateSet,
}

impl DFA {
    /// Build a minimal DFA from the given pattern using the default
    /// configuration.
    pub fn new(pattern: &str) -> Result<DFA, Error> {
        Builder::new().build(pattern)
    }

    /// Build a DFA from the given NFA via subset construction only. The DFA
    /// returned is not minimized.
    pub fn from_nfa(nfa: &thompson::NFA) -> Result<DFA, Error> {
        Builder::new()
            .configure(Config::new().minimize(false))
            .build_from_nfa(nfa)
    }

    pub(crate) fn from_parts(
        table: TransitionTable,
        state_len: usize,
        accepting: StateSet,
    ) -> DFA {
        assert!(state_len >= 2, "DFA must have error and start states");
        assert!(table.row(StateID::ZERO).is_none(), "error state is dead");
        assert!(!accepting.contains(StateID::ZERO), "error state rejects");
        DFA { table, state_len, accepting }
    }

    /// Returns the start state, which is always `1`.
    pub fn start(&self) -> StateID {
        StateID::new_unchecked(1)
    }

    /// Returns the number of states in this DFA, including the error state.
    pub fn state_len(&self) -> usize {
        self.state_len
    }

    /// Returns true if and only if the given state accepts.
    pub fn is_match_state(&self, id: StateID) -> bool {
        self.accepting.contains(id)
    }

    /// Returns the state reached from `current` on `byte`. When there is no
    /// transition, this returns the error state `0`.
    pub fn next_state(&self, current: StateID, byte: u8) -> StateID {
        self.table.find(current, byte)
    }

    /// Returns the set of accepting states.
    pub fn accepting_states(&self) -> &StateSet {
        &self.accepting
    }

    /// Returns the transitions of this DFA.
    pub fn transitions(&self) -> &TransitionTable {
        &self.table
    }

    /// Returns true if and only if this DFA accepts the entire haystack.
    pub fn is_match(&self, haystack: &[u8]) -> bool {
        let mut state = self.start();
        for &byte in haystack {
            state = self.next_state(state, byte);
            if state.is_zero() {
                return false;
            }
        }
        self.is_match_state(state)
    }

    /// Returns the length of the longest prefix of the haystack that this
    /// DFA accepts, or `None` if it accepts no prefix at all.
    ///
    /// This walks the DFA from the start state, remembering the position of
    /// the most recent accepting state seen, and stops as soon as it reaches
    /// the error state. A return value of `Some(0)` means that only the
    /// empty prefix is accepted.
    ///
    /// # Example
    ///
    /// ```
    /// use scanner_automata::dfa::DFA;
    ///
    /// let dfa = DFA::new("a|b")?;
    /// assert_eq!(Some(1), dfa.find_longest_prefix(b"ba"));
    ///
    /// let dfa = DFA::new("(ab)*")?;
    /// assert_eq!(Some(4), dfa.find_longest_prefix(b"ababa"));
    /// assert_eq!(Some(0), dfa.find_longest_prefix(b"ba"));
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn find_longest_prefix(&self, haystack: &[u8]) -> Option<usize> {
        let mut state = self.start();
        let mut last_match =
            if self.is_match_state(state) { Some(0) } else { None };
        for (i, &byte) in haystack.iter().enumerate() {
            state = self.next_state(state, byte);
            if state.is_zero() {
                break;
            }
            if self.is_match_state(state) {
                last_match = Some(i + 1);
            }
        }
        last_match
    }

    /// Return the minimal DFA equivalent to this one.
    ///
    /// Minimizing a DFA that is already minimal yields a DFA with the same
    /// number of states.
    pub fn minimize(&self) -> DFA {
        minimize::Minimizer::new(self).run()
    }
}

impl core::fmt::Debug for DFA {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "dfa::DFA(")?;
        for sid in 0..self.state_len {
            let sid = StateID::new_unchecked(sid);
            let status = if sid.is_zero() {
                'D'
            } else if self.is_match_state(sid) {
                '*'
            } else {
                ' '
            };
            let start = if sid == self.start() { '>' } else { ' ' };
            write!(f, "{}{}{:06?}:", status, start, sid.as_usize())?;
            if let Some(row) = self.table.row(sid) {
                for (i, range) in row.ranges().enumerate() {
                    let sep = if i == 0 { " " } else { ", " };
                    write!(f, "{}{} => {}", sep, range, range.next)?;
                }
            }
            writeln!(f, "")?;
        }
        writeln!(f, ")")?;
        Ok(())
    }
}

use crate::nfa;

/// An error that occurred during the construction of a DFA.
///
/// This error does not provide many introspection capabilities. There are
/// generally only two things you can do with it:
///
/// * Obtain a human readable message via its `std::fmt::Display` impl.
/// * Access an underlying [`nfa::thompson::Error`] type from its `source`
/// method via the `std::error::Error` trait. This error only occurs when
/// building a DFA directly from a pattern string.
///
/// The [`Error::nfa_error`] and [`Error::state_limit`] accessors give
/// programmatic access to the same information.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Error {
    kind: ErrorKind,
}

/// The kind of error that occurred during the construction of a DFA.
#[derive(Clone, Debug, Eq, PartialEq)]
enum ErrorKind {
    /// An error that occurred while compiling the pattern into an NFA as a
    /// precursor step before a DFA is built.
    NFA(nfa::thompson::Error),
    /// An error that occurs if too many states are produced while building
    /// a DFA.
    TooManyStates {
        /// The limit that was exceeded.
        limit: usize,
    },
}

impl Error {
    /// Return the kind of this error.
    fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// If this error occurred while compiling the pattern, then return the
    /// underlying NFA error.
    pub fn nfa_error(&self) -> Option<&nfa::thompson::Error> {
        match *self.kind() {
            ErrorKind::NFA(ref err) => Some(err),
            ErrorKind::TooManyStates { .. } => None,
        }
    }

    /// If this error occurred because the DFA needed too many states, then
    /// return the limit that was exceeded.
    pub fn state_limit(&self) -> Option<usize> {
        match *self.kind() {
            ErrorKind::NFA(_) => None,
            ErrorKind::TooManyStates { limit } => Some(limit),
        }
    }

    pub(crate) fn nfa(err: nfa::thompson::Error) -> Error {
        Error { kind: ErrorKind::NFA(err) }
    }

    pub(crate) fn too_many_states(limit: usize) -> Error {
        Error { kind: ErrorKind::TooManyStates { limit } }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self.kind() {
            ErrorKind::NFA(ref err) => Some(err),
            ErrorKind::TooManyStates { .. } => None,
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.kind() {
            ErrorKind::NFA(_) => write!(f, "error building NFA"),
            ErrorKind::TooManyStates { limit } => {
                write!(f, "number of DFA states exceeds limit of {}", limit)
            }
        }
    }
}

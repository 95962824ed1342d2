/// An error that can occur during the construction of a Thompson NFA.
///
/// Most errors are syntax errors in the pattern. Each of those carries the
/// absolute byte offset into the pattern at which the problem was detected.
/// The only other kind of error occurs when a configured state limit is
/// exceeded.
///
/// A human readable message is available via the `std::fmt::Display` impl.
/// The specific problem can be inspected via [`Error::kind`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Error {
    kind: ErrorKind,
}

/// The kind of error that occurred during the construction of a Thompson NFA.
///
/// This enum is non-exhaustive. Adding new variants is not considered a
/// breaking change.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// A `\` was followed by a byte that has no escape.
    UnknownEscape {
        /// The offset of the `\`.
        offset: usize,
        /// The byte following the `\`.
        byte: u8,
    },
    /// The pattern ended immediately after a `\`.
    TrailingEscape {
        /// The offset of the `\`.
        offset: usize,
    },
    /// A `(` has no matching `)`.
    UnclosedGroup {
        /// The offset of the `(`.
        offset: usize,
    },
    /// A `)` has no matching `(`.
    UnopenedGroup {
        /// The offset of the `)`.
        offset: usize,
    },
    /// A `]` appeared outside of a `[x-y]` class.
    UnopenedClass {
        /// The offset of the `]`.
        offset: usize,
    },
    /// A `[` was not followed by exactly `x-y]`.
    MalformedClass {
        /// The offset of the `[`.
        offset: usize,
    },
    /// A class range whose start is greater than its end.
    InvalidClassRange {
        /// The offset of the `[`.
        offset: usize,
        /// The first bound of the range.
        start: u8,
        /// The second bound of the range.
        end: u8,
    },
    /// A `\` was used as a class bound. Escapes are not supported inside
    /// classes.
    ClassEscape {
        /// The offset of the `\`.
        offset: usize,
    },
    /// A `*` or `+` with nothing before it to repeat.
    MissingRepetitionOperand {
        /// The offset of the operator.
        offset: usize,
        /// The operator itself, either `*` or `+`.
        op: u8,
    },
    /// The pattern contains a NUL byte, which is reserved for epsilon
    /// transitions and can never be matched.
    NulByte {
        /// The offset of the NUL byte.
        offset: usize,
    },
    /// The NFA needed more states than permitted.
    TooManyStates {
        /// The limit on the number of states.
        limit: usize,
    },
}

impl Error {
    /// Return the kind of this error.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub(crate) fn unknown_escape(offset: usize, byte: u8) -> Error {
        Error { kind: ErrorKind::UnknownEscape { offset, byte } }
    }

    pub(crate) fn trailing_escape(offset: usize) -> Error {
        Error { kind: ErrorKind::TrailingEscape { offset } }
    }

    pub(crate) fn unclosed_group(offset: usize) -> Error {
        Error { kind: ErrorKind::UnclosedGroup { offset } }
    }

    pub(crate) fn unopened_group(offset: usize) -> Error {
        Error { kind: ErrorKind::UnopenedGroup { offset } }
    }

    pub(crate) fn unopened_class(offset: usize) -> Error {
        Error { kind: ErrorKind::UnopenedClass { offset } }
    }

    pub(crate) fn malformed_class(offset: usize) -> Error {
        Error { kind: ErrorKind::MalformedClass { offset } }
    }

    pub(crate) fn invalid_class_range(
        offset: usize,
        start: u8,
        end: u8,
    ) -> Error {
        Error { kind: ErrorKind::InvalidClassRange { offset, start, end } }
    }

    pub(crate) fn class_escape(offset: usize) -> Error {
        Error { kind: ErrorKind::ClassEscape { offset } }
    }

    pub(crate) fn missing_repetition_operand(offset: usize, op: u8) -> Error {
        Error { kind: ErrorKind::MissingRepetitionOperand { offset, op } }
    }

    pub(crate) fn nul_byte(offset: usize) -> Error {
        Error { kind: ErrorKind::NulByte { offset } }
    }

    pub(crate) fn too_many_states(limit: usize) -> Error {
        Error { kind: ErrorKind::TooManyStates { limit } }
    }
}

impl std::error::Error for Error {}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        use crate::util::escape::DebugByte;

        match *self.kind() {
            ErrorKind::UnknownEscape { offset, byte } => write!(
                f,
                "unrecognized escape sequence '\\{:?}' at offset {}",
                DebugByte(byte),
                offset,
            ),
            ErrorKind::TrailingEscape { offset } => write!(
                f,
                "pattern ends with an incomplete escape at offset {}",
                offset,
            ),
            ErrorKind::UnclosedGroup { offset } => {
                write!(f, "unclosed group opened at offset {}", offset)
            }
            ErrorKind::UnopenedGroup { offset } => write!(
                f,
                "unopened group: found ')' at offset {} without a \
                 matching '('",
                offset,
            ),
            ErrorKind::UnopenedClass { offset } => write!(
                f,
                "found ']' at offset {} outside of a character class",
                offset,
            ),
            ErrorKind::MalformedClass { offset } => write!(
                f,
                "malformed character class at offset {} \
                 (expected the form [x-y])",
                offset,
            ),
            ErrorKind::InvalidClassRange { offset, start, end } => write!(
                f,
                "invalid character class range [{:?}-{:?}] at offset {}: \
                 start must not be greater than end",
                DebugByte(start),
                DebugByte(end),
                offset,
            ),
            ErrorKind::ClassEscape { offset } => write!(
                f,
                "escape sequences are not supported in character classes \
                 (offset {})",
                offset,
            ),
            ErrorKind::MissingRepetitionOperand { offset, op } => write!(
                f,
                "repetition operator '{}' at offset {} has nothing \
                 to repeat",
                char::from(op),
                offset,
            ),
            ErrorKind::NulByte { offset } => write!(
                f,
                "pattern contains a NUL byte at offset {}, \
                 which can never be matched",
                offset,
            ),
            ErrorKind::TooManyStates { limit } => write!(
                f,
                "number of NFA states exceeds limit of {}",
                limit,
            ),
        }
    }
}

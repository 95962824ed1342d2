use crate::nfa::thompson::{
    builder::{Builder, Fragment},
    error::Error,
    nfa::{EPSILON, NFA},
};

/// The configuration used for compiling a Thompson NFA from a pattern.
#[derive(Clone, Debug, Default)]
pub struct Config {
    // All knobs are optional so that one configuration can be merged on top
    // of another without defaults clobbering explicitly set values. See the
    // 'overwrite' method.
    size_limit: Option<Option<usize>>,
}

impl Config {
    /// Return a new default Thompson NFA compiler configuration.
    pub fn new() -> Config {
        Config::default()
    }

    /// Set a limit on the total number of states in the NFA.
    ///
    /// When the limit is exceeded, compilation fails with a
    /// [`ErrorKind::TooManyStates`](crate::nfa::thompson::ErrorKind) error.
    ///
    /// By default there is no limit beyond what a
    /// [`StateID`](crate::util::id::StateID) can represent.
    ///
    /// # Example
    ///
    /// ```
    /// use scanner_automata::nfa::thompson::{Compiler, Config};
    ///
    /// // Each literal byte needs two states, and each concatenation is free.
    /// let mut compiler = Compiler::new();
    /// compiler.configure(Config::new().size_limit(Some(6)));
    /// assert!(compiler.build("abc").is_ok());
    /// assert!(compiler.build("abcd").is_err());
    /// ```
    pub fn size_limit(mut self, limit: Option<usize>) -> Config {
        self.size_limit = Some(limit);
        self
    }

    /// Returns the configured state limit, if any.
    pub fn get_size_limit(&self) -> Option<usize> {
        self.size_limit.unwrap_or(None)
    }

    /// Overwrite the default configuration such that the options in `o` are
    /// always used. If an option in `o` is not set, then the corresponding
    /// option in `self` is used.
    pub(crate) fn overwrite(self, o: Config) -> Config {
        Config { size_limit: o.size_limit.or(self.size_limit) }
    }
}

/// A compiler from patterns to Thompson NFAs.
///
/// The pattern language is deliberately small:
///
/// * Any byte other than a meta character matches itself.
/// * `\n`, `\t` and `\s` match a newline, a tab and a space. A `\` followed by
/// any of the meta characters `(`, `)`, `*`, `+`, `[`, `]`, `\` or `|` matches
/// that character literally.
/// * `[x-y]` matches any single byte in the inclusive range `x` through `y`.
/// * `(...)` groups.
/// * `e*` matches zero or more `e`, and `e+` one or more `e`. Both apply to
/// the single literal, class or group immediately preceding them.
/// * `a|b` matches either `a` or `b`. It has the lowest precedence, so
/// `ab|cd` is the same as `(ab)|(cd)`.
///
/// An empty pattern, an empty group or an empty side of `|` match the empty
/// string.
///
/// # Example
///
/// ```
/// use scanner_automata::nfa::thompson::Compiler;
///
/// let nfa = Compiler::new().build(r"(ab)+|\s")?;
/// assert!(nfa.is_match(b"abab"));
/// assert!(nfa.is_match(b" "));
/// assert!(!nfa.is_match(b"aba"));
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug)]
pub struct Compiler {
    config: Config,
}

impl Compiler {
    /// Create a new compiler with the default configuration.
    pub fn new() -> Compiler {
        Compiler { config: Config::default() }
    }

    /// Apply the given configuration options to this compiler.
    pub fn configure(&mut self, config: Config) -> &mut Compiler {
        self.config = self.config.clone().overwrite(config);
        self
    }

    /// Compile the given pattern into an NFA.
    pub fn build(&self, pattern: &str) -> Result<NFA, Error> {
        self.build_bytes(pattern.as_bytes())
    }

    /// Compile the given pattern, which need not be valid UTF-8, into an
    /// NFA.
    pub fn build_bytes(&self, pattern: &[u8]) -> Result<NFA, Error> {
        let mut parser = Parser {
            pattern,
            builder: Builder::new(self.config.get_size_limit()),
        };
        let frag = parser.parse(0, pattern.len())?;
        let nfa = parser.builder.finish(frag);
        debug!(
            "compiled NFA with {} states from {} byte pattern",
            nfa.state_len() - 1,
            pattern.len(),
        );
        Ok(nfa)
    }
}

impl Default for Compiler {
    fn default() -> Compiler {
        Compiler::new()
    }
}

/// A recursive descent parser that emits NFA fragments as it goes.
///
/// Every position it reports is an absolute offset into the full pattern,
/// even when parsing the inside of a group or the right side of `|`.
#[derive(Debug)]
struct Parser<'p> {
    pattern: &'p [u8],
    builder: Builder,
}

/// The concatenation built so far at one level of the parser.
///
/// The most recent item is kept apart from the rest so that a following `*`
/// or `+` can be applied to it alone.
#[derive(Debug, Default)]
struct Concat {
    prefix: Option<Fragment>,
    last: Option<Fragment>,
}

impl<'p> Parser<'p> {
    /// Parse `pattern[start..end]` into a single fragment.
    fn parse(&mut self, start: usize, end: usize) -> Result<Fragment, Error> {
        let mut concat = Concat::default();
        let mut at = start;
        while at < end {
            let byte = self.pattern[at];
            match byte {
                b'|' => {
                    let left = self.finish(concat)?;
                    let right = self.parse(at + 1, end)?;
                    return self.builder.alternate(left, right);
                }
                b'*' | b'+' => {
                    let frag = concat.last.take().ok_or_else(|| {
                        Error::missing_repetition_operand(at, byte)
                    })?;
                    concat.last = Some(if byte == b'*' {
                        self.builder.star(frag)?
                    } else {
                        self.builder.plus(frag)?
                    });
                    at += 1;
                }
                b'(' => {
                    let close = self.find_close(at, end)?;
                    let group = self.parse(at + 1, close)?;
                    self.push(&mut concat, group);
                    at = close + 1;
                }
                b')' => return Err(Error::unopened_group(at)),
                b'[' => {
                    let (lo, hi) = self.class(at, end)?;
                    let frag = self.builder.range(lo, hi)?;
                    self.push(&mut concat, frag);
                    at += 5;
                }
                b']' => return Err(Error::unopened_class(at)),
                b'\\' => {
                    let lit = self.escape(at, end)?;
                    let frag = self.builder.literal(lit)?;
                    self.push(&mut concat, frag);
                    at += 2;
                }
                EPSILON => return Err(Error::nul_byte(at)),
                _ => {
                    let frag = self.builder.literal(byte)?;
                    self.push(&mut concat, frag);
                    at += 1;
                }
            }
        }
        self.finish(concat)
    }

    /// Add a new item to the end of a concatenation.
    fn push(&self, concat: &mut Concat, frag: Fragment) {
        if let Some(last) = concat.last.take() {
            let prefix = concat.prefix.take();
            concat.prefix = Some(self.builder.concat(prefix, last));
        }
        concat.last = Some(frag);
    }

    /// Turn a concatenation into a single fragment. An empty concatenation
    /// matches the empty string.
    fn finish(&mut self, concat: Concat) -> Result<Fragment, Error> {
        match concat.last {
            None => self.builder.empty(),
            Some(last) => Ok(self.builder.concat(concat.prefix, last)),
        }
    }

    /// Find the `)` matching the `(` at `open`, without looking at or past
    /// `end`. Escaped bytes and the bodies of classes are skipped.
    fn find_close(&self, open: usize, end: usize) -> Result<usize, Error> {
        let mut depth = 0usize;
        let mut at = open;
        while at < end {
            match self.pattern[at] {
                b'\\' => {
                    at += 2;
                    continue;
                }
                b'[' if self.is_class(at, end) => {
                    at += 5;
                    continue;
                }
                b'(' => depth += 1,
                b')' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(at);
                    }
                }
                _ => {}
            }
            at += 1;
        }
        Err(Error::unclosed_group(open))
    }

    /// Returns true if `pattern[at..end]` starts with something shaped like
    /// `[x-y]`.
    fn is_class(&self, at: usize, end: usize) -> bool {
        at + 4 < end
            && self.pattern[at] == b'['
            && self.pattern[at + 2] == b'-'
            && self.pattern[at + 4] == b']'
    }

    /// Parse the class starting at the `[` at `at` and return its inclusive
    /// bounds.
    fn class(&self, at: usize, end: usize) -> Result<(u8, u8), Error> {
        if !self.is_class(at, end) {
            return Err(Error::malformed_class(at));
        }
        let (lo, hi) = (self.pattern[at + 1], self.pattern[at + 3]);
        for &(offset, bound) in &[(at + 1, lo), (at + 3, hi)] {
            if bound == b'\\' {
                return Err(Error::class_escape(offset));
            }
            if bound == EPSILON {
                return Err(Error::nul_byte(offset));
            }
        }
        if lo > hi {
            return Err(Error::invalid_class_range(at, lo, hi));
        }
        Ok((lo, hi))
    }

    /// Parse the escape whose `\` is at `at` and return the literal byte it
    /// denotes.
    fn escape(&self, at: usize, end: usize) -> Result<u8, Error> {
        if at + 1 >= end {
            return Err(Error::trailing_escape(at));
        }
        match self.pattern[at + 1] {
            b'n' => Ok(b'\n'),
            b't' => Ok(b'\t'),
            b's' => Ok(b' '),
            b @ b'(' | b @ b')' | b @ b'*' | b @ b'+' => Ok(b),
            b @ b'[' | b @ b']' | b @ b'\\' | b @ b'|' => Ok(b),
            b => Err(Error::unknown_escape(at, b)),
        }
    }
}

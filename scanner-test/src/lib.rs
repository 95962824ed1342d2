/*!
A small harness for running TOML encoded pattern tests against the stages of
the scanner-automata pipeline.

Each test names a pattern, an input and the expected outcome of matching the
entire input. A test may also give the expected length of the longest
accepted prefix of the input, and may say that the pattern must fail to
compile:

```toml
[[tests]]
name = "digits"
regex = "[0-9][0-9]*"
input = "123x"
match = false
longest = 3

[[tests]]
name = "unclosed"
regex = "(ab"
input = ""
match = false
compiles = false
```

When no prefix is accepted at all, write `longest = false`.
*/

pub extern crate bstr;

use std::borrow::Borrow;
use std::collections::HashSet;
use std::convert::TryFrom;

use anyhow::{bail, Context, Result};
use bstr::{BStr, BString, ByteSlice, ByteVec};
use serde::Deserialize;

mod escape;

const ENV_SCANNER_TEST: &str = "SCANNER_TEST";
const ENV_SCANNER_TEST_VERBOSE: &str = "SCANNER_TEST_VERBOSE";

/// A collection of pattern tests.
#[derive(Clone, Debug, Deserialize)]
pub struct ScannerTests {
    tests: Vec<ScannerTest>,
    #[serde(skip)]
    seen: HashSet<String>,
}

/// A single test: a pattern, an input and what matching should report.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScannerTest {
    #[serde(skip)]
    group: String,
    #[serde(default)]
    name: String,
    #[serde(skip)]
    full_name: String,
    regex: BString,
    input: BString,
    #[serde(rename = "match")]
    is_match: Option<bool>,
    longest: Option<Longest>,
    #[serde(default = "default_true")]
    compiles: bool,
    #[serde(default)]
    unescape: bool,
}

/// The expected length of the longest accepted prefix of an input.
///
/// `None` means that not even the empty prefix is accepted.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
#[serde(try_from = "LongestFormat")]
pub struct Longest(pub Option<usize>);

#[derive(Deserialize)]
#[serde(untagged)]
enum LongestFormat {
    Len(usize),
    Bool(bool),
}

impl TryFrom<LongestFormat> for Longest {
    type Error = String;

    fn try_from(format: LongestFormat) -> Result<Longest, String> {
        match format {
            LongestFormat::Len(len) => Ok(Longest(Some(len))),
            LongestFormat::Bool(false) => Ok(Longest(None)),
            LongestFormat::Bool(true) => Err(
                "'longest' must be a prefix length or 'false'".to_string(),
            ),
        }
    }
}

impl ScannerTests {
    /// Create a new empty collection of pattern tests.
    pub fn new() -> ScannerTests {
        ScannerTests { tests: vec![], seen: HashSet::new() }
    }

    /// Load all of the TOML encoded tests in `data` into this collection.
    /// The given group name is assigned to all loaded tests.
    pub fn load_slice(&mut self, group_name: &str, data: &[u8]) -> Result<()> {
        let mut index = 1;
        let mut tests: ScannerTests =
            toml::from_slice(data).context("error decoding TOML")?;
        for t in &mut tests.tests {
            t.group = group_name.to_string();
            if t.name.is_empty() {
                t.name = format!("{}", index);
                index += 1;
            }
            t.full_name = format!("{}/{}", t.group, t.name);
            if t.unescape {
                t.input = BString::from(escape::unescape(&t.input));
            }
            t.validate().with_context(|| {
                format!("error loading test '{}'", t.full_name())
            })?;
            if self.seen.contains(t.full_name()) {
                bail!("found duplicate tests for name '{}'", t.full_name());
            }
            self.seen.insert(t.full_name().to_string());
        }
        self.tests.extend(tests.tests);
        Ok(())
    }

    /// Return an iterator over all tests that have been loaded, in the order
    /// in which they were loaded.
    pub fn iter(&self) -> ScannerTestsIter<'_> {
        ScannerTestsIter { it: self.tests.iter() }
    }
}

impl Default for ScannerTests {
    fn default() -> ScannerTests {
        ScannerTests::new()
    }
}

impl ScannerTest {
    fn test(&self, regex: &CompiledRegex) -> Vec<TestResult> {
        match regex.match_regex {
            None => vec![TestResult::skip()],
            Some(ref match_regex) => match_regex(self),
        }
    }

    fn validate(&self) -> Result<()> {
        let is_match = match self.is_match {
            None => bail!("'match' must be present"),
            Some(is_match) => is_match,
        };
        if !self.compiles && is_match {
            bail!("a pattern that does not compile cannot match");
        }
        if let Some(Longest(Some(len))) = self.longest {
            if len > self.input.len() {
                bail!(
                    "'longest' is {} but the input is only {} bytes",
                    len,
                    self.input.len(),
                );
            }
            if is_match != (len == self.input.len()) {
                bail!(
                    "'match' must be true exactly when 'longest' is the \
                     length of the input"
                );
            }
        } else if self.longest.is_some() && is_match {
            bail!("'longest = false' contradicts 'match = true'");
        }
        Ok(())
    }

    /// Return the group name of this test, which is usually the stem of the
    /// file it was loaded from.
    pub fn group(&self) -> &str {
        &self.group
    }

    /// Return the name of this test. When the test doesn't name itself, its
    /// name is its 1-based position among the unnamed tests of its group.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Return the full name of this test, which is `{group}/{name}`.
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Return the pattern under test.
    pub fn regex(&self) -> &BStr {
        self.regex.as_bstr()
    }

    /// Return the input to match.
    pub fn input(&self) -> &BStr {
        self.input.as_bstr()
    }

    /// Returns true if and only if the pattern should accept the entire
    /// input.
    pub fn is_match(&self) -> bool {
        self.is_match.unwrap_or(false)
    }

    /// Returns the expected longest accepted prefix, if this test gives
    /// one.
    pub fn longest(&self) -> Option<Longest> {
        self.longest
    }

    /// Returns true if and only if the pattern is expected to compile.
    pub fn compiles(&self) -> bool {
        self.compiles
    }
}

/// A pattern that has been compiled by the implementation under test and is
/// ready to be matched against a `ScannerTest`'s input.
pub struct CompiledRegex {
    match_regex: Option<Box<dyn Fn(&ScannerTest) -> Vec<TestResult>>>,
}

impl CompiledRegex {
    /// Provide a closure that runs a match with the compiled pattern. The
    /// closure is given the same `ScannerTest` that the pattern was compiled
    /// from.
    pub fn compiled<F: Fn(&ScannerTest) -> Vec<TestResult> + 'static>(
        match_regex: F,
    ) -> CompiledRegex {
        CompiledRegex { match_regex: Some(Box::new(match_regex)) }
    }

    /// Indicate that the test should be skipped.
    pub fn skip() -> CompiledRegex {
        CompiledRegex { match_regex: None }
    }
}

impl std::fmt::Debug for CompiledRegex {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let status = match self.match_regex {
            None => "Skip",
            Some(_) => "Run(...)",
        };
        f.debug_struct("CompiledRegex").field("match_regex", &status).finish()
    }
}

/// The outcome of one way of matching a test's input.
///
/// A single compiled pattern may be checked several ways (for example, with
/// an NFA simulation and with a DFA), in which case each result should be
/// given a distinct name.
#[derive(Clone, Debug)]
pub struct TestResult {
    name: String,
    kind: TestResultKind,
}

#[derive(Clone, Debug)]
enum TestResultKind {
    IsMatch(bool),
    Longest(Option<usize>),
    Skip,
    /// No result is available, e.g., the pattern failed to compile.
    None,
}

impl TestResult {
    /// A result reporting whether the entire input was accepted.
    pub fn is_match(yes: bool) -> TestResult {
        TestResult { name: "".to_string(), kind: TestResultKind::IsMatch(yes) }
    }

    /// A result reporting the length of the longest accepted prefix.
    pub fn longest(len: Option<usize>) -> TestResult {
        TestResult { name: "".to_string(), kind: TestResultKind::Longest(len) }
    }

    /// A result saying this way of matching was skipped.
    pub fn skip() -> TestResult {
        TestResult { name: "".to_string(), kind: TestResultKind::Skip }
    }

    /// A result with no outcome.
    pub fn none() -> TestResult {
        TestResult { name: "".to_string(), kind: TestResultKind::None }
    }

    /// Give a name to this result. It is included in the report if the test
    /// fails.
    pub fn name(mut self, name: &str) -> TestResult {
        self.name = name.to_string();
        self
    }
}

/// A runner for executing pattern tests from within a `#[test]` function.
///
/// Typical usage is to call `test_iter` with every loaded test and then
/// `assert`, which panics with a report of every failure.
///
/// ### Skipping tests
///
/// If the `SCANNER_TEST` environment variable is set, then it may contain a
/// comma separated list of substrings. Each one whitelists tests whose full
/// name contains it, unless it starts with a `-`, in which case it
/// blacklists them instead. When there is at least one whitelisted
/// substring, a test must match one to run. The last substring a test's name
/// matches takes precedence.
#[derive(Debug)]
pub struct TestRunner {
    include: Vec<IncludePattern>,
    results: ScannerTestResults,
}

#[derive(Debug)]
struct IncludePattern {
    blacklist: bool,
    substring: BString,
}

impl TestRunner {
    /// Create a new runner, reading whitelisted and blacklisted substrings
    /// from the `SCANNER_TEST` environment variable.
    ///
    /// If there was a problem reading the environment variable, then an
    /// error is returned.
    pub fn new() -> Result<TestRunner> {
        let mut runner = TestRunner {
            include: vec![],
            results: ScannerTestResults::new(),
        };
        for substring in read_env(ENV_SCANNER_TEST)?.split(',') {
            let substring = substring.trim();
            if substring.is_empty() {
                continue;
            }
            if let Some(blacklisted) = substring.strip_prefix('-') {
                runner.blacklist(blacklisted);
            } else {
                runner.whitelist(substring);
            }
        }
        Ok(runner)
    }

    /// Assert that every test run has either passed or been skipped.
    ///
    /// If `SCANNER_TEST_VERBOSE` is set to `1`, then the name of every test
    /// run is printed along with its outcome.
    pub fn assert(&mut self) {
        self.results.assert();
    }

    /// Whitelist the given substring.
    pub fn whitelist(&mut self, substring: &str) -> &mut TestRunner {
        self.include.push(IncludePattern {
            blacklist: false,
            substring: BString::from(substring),
        });
        self
    }

    /// Blacklist the given substring.
    pub fn blacklist(&mut self, substring: &str) -> &mut TestRunner {
        self.include.push(IncludePattern {
            blacklist: true,
            substring: BString::from(substring),
        });
        self
    }

    /// Run all of the given tests, skipping those excluded by the whitelist
    /// and blacklist.
    pub fn test_iter<I, T>(
        &mut self,
        it: I,
        mut compile: impl FnMut(
            &ScannerTest,
            &[u8],
        )
            -> Result<CompiledRegex, Box<dyn std::error::Error>>,
    ) -> &mut TestRunner
    where
        I: IntoIterator<Item = T>,
        T: Borrow<ScannerTest>,
    {
        for test in it {
            let test = test.borrow();
            if self.should_skip(test) {
                self.results.skip(test, &TestResult::none());
                continue;
            }
            self.test(test, |regex| compile(test, regex));
        }
        self
    }

    /// Run a single test, ignoring the whitelist and blacklist.
    ///
    /// A failure is only reported when `assert` is called.
    pub fn test(
        &mut self,
        test: &ScannerTest,
        mut compile: impl FnMut(
            &[u8],
        )
            -> Result<CompiledRegex, Box<dyn std::error::Error>>,
    ) -> &mut TestRunner {
        let compiled = match safe(|| compile(test.regex().as_bytes())) {
            Err(msg) => {
                self.results.fail(
                    test,
                    &TestResult::skip(),
                    FailureKind::UnexpectedPanicCompile(msg),
                );
                return self;
            }
            Ok(Ok(compiled)) => compiled,
            Ok(Err(err)) => {
                if !test.compiles() {
                    self.results.pass(test, &TestResult::none());
                } else {
                    self.results.fail(
                        test,
                        &TestResult::skip(),
                        FailureKind::CompileError { err },
                    );
                }
                return self;
            }
        };
        if !test.compiles() {
            self.results.fail(
                test,
                &TestResult::skip(),
                FailureKind::NoCompileError,
            );
            return self;
        }
        let results = match safe(|| test.test(&compiled)) {
            Ok(results) => results,
            Err(msg) => {
                self.results.fail(
                    test,
                    &TestResult::skip(),
                    FailureKind::UnexpectedPanicSearch(msg),
                );
                return self;
            }
        };
        for result in results.iter() {
            match result.kind {
                TestResultKind::None => {}
                TestResultKind::Skip => {
                    self.results.skip(test, result);
                }
                TestResultKind::IsMatch(yes) => {
                    if yes != test.is_match() {
                        self.results.fail(test, result, FailureKind::IsMatch);
                    } else {
                        self.results.pass(test, result);
                    }
                }
                TestResultKind::Longest(got) => match test.longest() {
                    Some(Longest(expected)) if expected != got => {
                        self.results.fail(
                            test,
                            result,
                            FailureKind::Longest { got },
                        );
                    }
                    Some(_) => self.results.pass(test, result),
                    // Without an expected prefix length, the result must
                    // still agree with 'match'.
                    None if test.is_match()
                        != (got == Some(test.input().len())) =>
                    {
                        self.results.fail(test, result, FailureKind::IsMatch);
                    }
                    None => self.results.pass(test, result),
                },
            }
        }
        self
    }

    fn should_skip(&self, test: &ScannerTest) -> bool {
        if self.include.is_empty() {
            return false;
        }
        let mut skip = self.include.iter().any(|pat| !pat.blacklist);
        for pat in &self.include {
            if test.full_name().as_bytes().contains_str(&pat.substring) {
                skip = pat.blacklist;
            }
        }
        skip
    }
}

#[derive(Debug)]
struct ScannerTestResults {
    pass: Vec<ScannerTestResult>,
    fail: Vec<ScannerTestFailure>,
    skip: Vec<ScannerTestResult>,
}

#[derive(Debug)]
struct ScannerTestResult {
    test: ScannerTest,
    result: TestResult,
}

#[derive(Debug)]
struct ScannerTestFailure {
    test: ScannerTest,
    result: TestResult,
    kind: FailureKind,
}

#[derive(Debug)]
enum FailureKind {
    /// The entire input was accepted when it shouldn't have been, or the
    /// other way around.
    IsMatch,
    /// The longest accepted prefix was not the expected one.
    Longest { got: Option<usize> },
    /// The pattern compiled but was expected to fail.
    NoCompileError,
    /// The pattern failed to compile but was expected to compile.
    CompileError { err: Box<dyn std::error::Error> },
    UnexpectedPanicCompile(String),
    UnexpectedPanicSearch(String),
}

impl ScannerTestResults {
    fn new() -> ScannerTestResults {
        ScannerTestResults { pass: vec![], fail: vec![], skip: vec![] }
    }

    fn pass(&mut self, test: &ScannerTest, result: &TestResult) {
        self.pass.push(ScannerTestResult {
            test: test.clone(),
            result: result.clone(),
        });
    }

    fn fail(
        &mut self,
        test: &ScannerTest,
        result: &TestResult,
        kind: FailureKind,
    ) {
        self.fail.push(ScannerTestFailure {
            test: test.clone(),
            result: result.clone(),
            kind,
        });
    }

    fn skip(&mut self, test: &ScannerTest, result: &TestResult) {
        self.skip.push(ScannerTestResult {
            test: test.clone(),
            result: result.clone(),
        });
    }

    fn assert(&self) {
        if read_env(ENV_SCANNER_TEST_VERBOSE).map_or(false, |s| s == "1") {
            self.verbose();
        }
        if self.fail.is_empty() {
            return;
        }
        let failures = self
            .fail
            .iter()
            .map(|f| f.to_string())
            .collect::<Vec<String>>()
            .join("\n\n");
        panic!(
            "found {} failures:\n{}\n{}\n{}\n\n\
             Set the SCANNER_TEST environment variable to filter tests, \n\
             e.g., SCANNER_TEST=foo,-foo2 runs every test whose name \n\
             contains foo but not foo2\n\n",
            self.fail.len(),
            "~".repeat(79),
            failures.trim(),
            "~".repeat(79),
        )
    }

    fn verbose(&self) {
        println!("{}", "~".repeat(79));
        for t in &self.skip {
            println!("skip: {}", full_name(&t.test, &t.result));
        }
        for t in &self.pass {
            println!("pass: {}", full_name(&t.test, &t.result));
        }
        for t in &self.fail {
            println!("FAIL: {}", full_name(&t.test, &t.result));
        }
        println!(
            "\npassed: {}, skipped: {}, failed: {}",
            self.pass.len(),
            self.skip.len(),
            self.fail.len()
        );
        println!("{}", "~".repeat(79));
    }
}

fn full_name(test: &ScannerTest, result: &TestResult) -> String {
    if result.name.is_empty() {
        test.full_name().to_string()
    } else {
        format!("{} ({})", test.full_name(), result.name)
    }
}

impl std::fmt::Display for ScannerTestFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{}: {}\n\
             pattern:     {}\n\
             input:       {}",
            full_name(&self.test, &self.result),
            self.kind.fmt(&self.test)?,
            escape::escape(self.test.regex()),
            escape::escape(self.test.input()),
        )
    }
}

impl FailureKind {
    fn fmt(&self, test: &ScannerTest) -> Result<String, std::fmt::Error> {
        use std::fmt::Write;

        let mut buf = String::new();
        match *self {
            FailureKind::IsMatch => {
                if test.is_match() {
                    write!(buf, "expected match, but none found")?;
                } else {
                    write!(buf, "expected no match, but found a match")?;
                }
            }
            FailureKind::Longest { got } => {
                write!(
                    buf,
                    "expected longest prefix {:?}, but got {:?}",
                    test.longest().and_then(|Longest(len)| len),
                    got,
                )?;
            }
            FailureKind::NoCompileError => {
                write!(buf, "expected pattern to NOT compile, but it did")?;
            }
            FailureKind::CompileError { ref err } => {
                write!(buf, "expected pattern to compile, failed: {}", err)?;
            }
            FailureKind::UnexpectedPanicCompile(ref msg) => {
                write!(buf, "got unexpected panic while compiling:\n{}", msg)?;
            }
            FailureKind::UnexpectedPanicSearch(ref msg) => {
                write!(buf, "got unexpected panic while searching:\n{}", msg)?;
            }
        }
        Ok(buf)
    }
}

/// An iterator over pattern tests.
#[derive(Debug)]
pub struct ScannerTestsIter<'a> {
    it: std::slice::Iter<'a, ScannerTest>,
}

impl<'a> Iterator for ScannerTestsIter<'a> {
    type Item = &'a ScannerTest;

    fn next(&mut self) -> Option<&'a ScannerTest> {
        self.it.next()
    }
}

/// Read the environment variable given. If it doesn't exist, then return an
/// empty string. Otherwise, check that it is valid UTF-8.
fn read_env(var: &str) -> Result<String> {
    let val = match std::env::var_os(var) {
        None => return Ok("".to_string()),
        Some(val) => val,
    };
    let val = val.into_string().map_err(|os| {
        anyhow::anyhow!(
            "invalid UTF-8 in env var {}={:?}",
            var,
            Vec::from_os_str_lossy(&os)
        )
    })?;
    Ok(val)
}

fn safe<T, F>(fun: F) -> Result<T, String>
where
    F: FnOnce() -> T,
{
    use std::panic;

    panic::catch_unwind(panic::AssertUnwindSafe(fun)).map_err(|any_err| {
        // panic and assert produce &str or String
        if let Some(&s) = any_err.downcast_ref::<&str>() {
            s.to_owned()
        } else if let Some(s) = any_err.downcast_ref::<String>() {
            s.to_owned()
        } else {
            "UNABLE TO SHOW RESULT OF PANIC.".to_owned()
        }
    })
}

fn default_true() -> bool {
    true
}

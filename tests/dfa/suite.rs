use scanner_automata::{
    dfa::{self, DFA},
    nfa::thompson,
};

use {
    bstr::ByteSlice,
    sct::{CompiledRegex, ScannerTest, TestResult, TestRunner},
};

use crate::{suite, Result};

/// Runs the test suite with the default configuration, which minimizes.
#[test]
fn minimal() -> Result<()> {
    let builder = dfa::Builder::new();
    TestRunner::new()?.test_iter(suite()?.iter(), compiler(builder)).assert();
    Ok(())
}

/// Runs the test suite on the DFAs straight out of subset construction.
#[test]
fn naive() -> Result<()> {
    let mut builder = dfa::Builder::new();
    builder.configure(dfa::Config::new().minimize(false));
    TestRunner::new()?.test_iter(suite()?.iter(), compiler(builder)).assert();
    Ok(())
}

/// Runs the test suite with a state limit that no test pattern reaches.
#[test]
fn generous_limits() -> Result<()> {
    let mut builder = dfa::Builder::new();
    builder
        .configure(dfa::Config::new().state_limit(Some(1_000)))
        .thompson(thompson::Config::new().size_limit(Some(1_000)));
    TestRunner::new()?.test_iter(suite()?.iter(), compiler(builder)).assert();
    Ok(())
}

/// Runs the test suite on DFAs that were minimized a second time.
#[test]
fn minimized_twice() -> Result<()> {
    let compiler = |_: &ScannerTest, regex: &[u8]| -> Result<CompiledRegex> {
        let dfa = dfa::Builder::new().build_bytes(regex)?.minimize();
        Ok(CompiledRegex::compiled(move |test| run_test(&dfa, test)))
    };
    TestRunner::new()?.test_iter(suite()?.iter(), compiler).assert();
    Ok(())
}

fn compiler(
    builder: dfa::Builder,
) -> impl FnMut(&ScannerTest, &[u8]) -> Result<CompiledRegex> {
    move |_, regex| {
        let dfa = builder.build_bytes(regex)?;
        Ok(CompiledRegex::compiled(move |test| run_test(&dfa, test)))
    }
}

fn run_test(dfa: &DFA, test: &ScannerTest) -> Vec<TestResult> {
    let input = test.input().as_bytes();
    vec![
        TestResult::is_match(dfa.is_match(input)).name("is_match"),
        TestResult::longest(dfa.find_longest_prefix(input))
            .name("find_longest_prefix"),
    ]
}

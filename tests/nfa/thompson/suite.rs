use scanner_automata::nfa::thompson::{self, NFA};

use {
    bstr::ByteSlice,
    sct::{CompiledRegex, ScannerTest, TestResult, TestRunner},
};

use crate::{suite, Result};

/// Runs the test suite against a direct simulation of the NFA.
#[test]
fn simulation() -> Result<()> {
    let compiler = thompson::Compiler::new();
    let compile = |_: &ScannerTest, regex: &[u8]| -> Result<CompiledRegex> {
        let nfa = compiler.build_bytes(regex)?;
        Ok(CompiledRegex::compiled(move |test| run_test(&nfa, test)))
    };
    TestRunner::new()?.test_iter(suite()?.iter(), compile).assert();
    Ok(())
}

fn run_test(nfa: &NFA, test: &ScannerTest) -> Vec<TestResult> {
    let is_match = nfa.is_match(test.input().as_bytes());
    vec![TestResult::is_match(is_match).name("is_match")]
}

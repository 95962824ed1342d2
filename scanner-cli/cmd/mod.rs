use crate::args;

mod compile;
mod debug;
mod scan;

const USAGE: &'static str = "\
A tool for compiling small regular expressions into scanners.

USAGE:
    scanner-cli <command> ...

COMMANDS:
    compile  Generate scanner functions from files of named patterns.
    debug    Print the debug representation of an automaton.
    scan     Print the longest prefix of each input matched by a pattern.
";

pub fn run(p: &mut lexopt::Parser) -> anyhow::Result<()> {
    let cmd = args::next_as_command(USAGE, p)?;
    match &*cmd {
        "compile" => compile::run(p),
        "debug" => debug::run(p),
        "scan" => scan::run(p),
        unk => anyhow::bail!("unrecognized command '{}'", unk),
    }
}

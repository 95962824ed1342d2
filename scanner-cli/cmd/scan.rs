use std::io::{stdout, Write};

use bstr::ByteSlice;

use crate::{
    config::{common, configure, dfa, positional, thompson},
    escape,
    util::{self, Table},
};

pub fn run(p: &mut lexopt::Parser) -> anyhow::Result<()> {
    const USAGE: &'static str = "\
Prints the length of the longest prefix of each input that the given pattern
matches, or 'none' when no prefix matches.

Inputs may use the escapes \\n, \\r, \\t, \\0, \\\\ and \\xNN to write
arbitrary bytes.

USAGE:
    scanner-cli scan <pattern> <input> ...

TIP:
    use -h for short docs and --help for long docs

OPTIONS:
%options%
";

    let mut common = common::Config::default();
    let mut thompson = thompson::Config::default();
    let mut dfa = dfa::Config::default();
    let mut positional = positional::Config::default();
    configure(
        p,
        USAGE,
        &mut [&mut common, &mut thompson, &mut dfa, &mut positional],
    )?;
    let values = positional.at_least_one("pattern")?;
    anyhow::ensure!(values.len() >= 2, "expected at least one <input>");
    let (pattern, inputs) = (&values[0], &values[1..]);

    let builder = dfa.builder(&thompson, true);
    let (dfa, time) = util::timeitr(|| builder.build(pattern))?;
    if common.verbose {
        let mut table = Table::empty();
        table.add("build time", time);
        table.add("minimal dfa states", dfa.state_len());
        table.print(stdout())?;
        writeln!(stdout(), "")?;
    }
    let mut out = stdout();
    for input in inputs.iter() {
        let haystack = escape::unescape(input);
        log::debug!("scanning {:?}", haystack.as_bstr());
        match dfa.find_longest_prefix(&haystack) {
            None if common.quiet => writeln!(out, "none")?,
            Some(len) if common.quiet => writeln!(out, "{}", len)?,
            None => writeln!(out, "{}: none", input)?,
            Some(len) => {
                let matched = haystack[..len].as_bstr();
                writeln!(out, "{}: {} {:?}", input, len, matched)?
            }
        }
    }
    Ok(())
}

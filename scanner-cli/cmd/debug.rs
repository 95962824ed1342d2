use std::io::{stdout, Write};

use crate::{
    args,
    config::{common, configure, dfa, positional, thompson},
    util::{self, Table},
};

pub fn run(p: &mut lexopt::Parser) -> anyhow::Result<()> {
    const USAGE: &'static str = "\
Prints the debug representation of the automata built from a pattern.

USAGE:
    scanner-cli debug <command> ...

COMMANDS:
    dfa      Print the debug representation of a DFA before minimization.
    minimal  Print the debug representation of a minimal DFA.
    nfa      Print the debug representation of a Thompson NFA.
";

    let cmd = args::next_as_command(USAGE, p)?;
    match &*cmd {
        "dfa" => run_dfa(p),
        "minimal" => run_minimal(p),
        "nfa" => run_nfa(p),
        unk => anyhow::bail!("unrecognized command '{}'", unk),
    }
}

fn run_nfa(p: &mut lexopt::Parser) -> anyhow::Result<()> {
    const USAGE: &'static str = "\
Prints the debug representation of a Thompson NFA.

The start state is marked with '^' and the accepting state with '*'.

USAGE:
    scanner-cli debug nfa <pattern>

TIP:
    use -h for short docs and --help for long docs

OPTIONS:
%options%
";

    let mut common = common::Config::default();
    let mut thompson = thompson::Config::default();
    let mut positional = positional::Config::default();
    configure(p, USAGE, &mut [&mut common, &mut thompson, &mut positional])?;
    let pattern = pattern(&positional)?;

    let mut table = Table::empty();
    let (nfa, time) = util::timeitr(|| thompson.compiler().build(&pattern))?;
    table.add("compile nfa time", time);
    table.add("nfa states", nfa.state_len());
    table.print(stdout())?;
    if !common.quiet {
        writeln!(stdout(), "\n{:?}", nfa)?;
    }
    Ok(())
}

fn run_dfa(p: &mut lexopt::Parser) -> anyhow::Result<()> {
    const USAGE: &'static str = "\
Prints the debug representation of a DFA built by subset construction,
without minimizing it.

State 0 is the error state and is never printed. The start state is marked
with '^' and accepting states with '*'.

USAGE:
    scanner-cli debug dfa <pattern>

TIP:
    use -h for short docs and --help for long docs

OPTIONS:
%options%
";

    run_any_dfa(p, USAGE, false)
}

fn run_minimal(p: &mut lexopt::Parser) -> anyhow::Result<()> {
    const USAGE: &'static str = "\
Prints the debug representation of the minimal DFA for a pattern.

State 0 is the error state and is never printed. The start state is always
state 1 and is marked with '^'. Accepting states are marked with '*'.

USAGE:
    scanner-cli debug minimal <pattern>

TIP:
    use -h for short docs and --help for long docs

OPTIONS:
%options%
";

    run_any_dfa(p, USAGE, true)
}

fn run_any_dfa(
    p: &mut lexopt::Parser,
    usage: &str,
    minimize: bool,
) -> anyhow::Result<()> {
    let mut common = common::Config::default();
    let mut thompson = thompson::Config::default();
    let mut dfa = dfa::Config::default();
    let mut positional = positional::Config::default();
    configure(
        p,
        usage,
        &mut [&mut common, &mut thompson, &mut dfa, &mut positional],
    )?;
    let pattern = pattern(&positional)?;

    let mut table = Table::empty();
    let (nfa, time) = util::timeitr(|| thompson.compiler().build(&pattern))?;
    table.add("compile nfa time", time);
    table.add("nfa states", nfa.state_len());
    let builder = dfa.builder(&thompson, false);
    let (naive, time) = util::timeitr(|| builder.build_from_nfa(&nfa))?;
    table.add("determinize time", time);
    table.add("dfa states", naive.state_len());
    let dfa = if minimize {
        let (minimal, time) = util::timeit(|| naive.minimize());
        table.add("minimize time", time);
        table.add("minimal dfa states", minimal.state_len());
        minimal
    } else {
        naive
    };
    table.add("accepting states", dfa.accepting_states().len());
    table.print(stdout())?;
    if !common.quiet {
        writeln!(stdout(), "\n{:?}", dfa)?;
    }
    Ok(())
}

fn pattern(positional: &positional::Config) -> anyhow::Result<String> {
    let mut values = positional.exactly(&["pattern"])?;
    Ok(values.remove(0))
}

use lexopt::{Arg, Parser};

use crate::{args::Usage, config::Configurable};

/// Flags shared by every command.
#[derive(Debug, Default)]
pub struct Config {
    pub quiet: bool,
    pub verbose: bool,
}

impl Configurable for Config {
    fn configure(
        &mut self,
        _: &mut Parser,
        arg: &mut Arg,
    ) -> anyhow::Result<bool> {
        match *arg {
            Arg::Short('q') | Arg::Long("quiet") => {
                self.quiet = true;
            }
            Arg::Long("verbose") => {
                self.verbose = true;
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn usage(&self) -> &[Usage] {
        const USAGES: &'static [Usage] = &[
            Usage::new(
                "-q, --quiet",
                "Suppress some output.",
                r#"
Suppresses some (but not all) output. Which output is suppressed depends on
the command. For example, 'scanner-cli debug' only prints the table of sizes
and timings, and not the automaton itself.
"#,
            ),
            Usage::new(
                "--verbose",
                "Add more output.",
                r#"
Expands output beyond the normal amount. For example, 'scanner-cli compile'
prints the size of every automaton it builds.
"#,
            ),
        ];
        USAGES
    }
}

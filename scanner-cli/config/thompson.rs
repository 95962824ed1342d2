use lexopt::{Arg, Parser};

use scanner_automata::nfa::thompson;

use crate::{
    args::{self, Usage},
    config::Configurable,
};

/// Flags for building Thompson NFAs.
#[derive(Debug, Default)]
pub struct Config {
    thompson: thompson::Config,
}

impl Config {
    /// Returns the NFA configuration built from the flags given.
    pub fn thompson(&self) -> thompson::Config {
        self.thompson.clone()
    }

    /// Returns an NFA compiler using the flags given.
    pub fn compiler(&self) -> thompson::Compiler {
        let mut compiler = thompson::Compiler::new();
        compiler.configure(self.thompson());
        compiler
    }
}

impl Configurable for Config {
    fn configure(
        &mut self,
        p: &mut Parser,
        arg: &mut Arg,
    ) -> anyhow::Result<bool> {
        match *arg {
            Arg::Long("nfa-size-limit") => {
                let limit = args::parse_maybe(p, "--nfa-size-limit")?;
                self.thompson = self.thompson.clone().size_limit(limit);
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn usage(&self) -> &[Usage] {
        const USAGES: &'static [Usage] = &[Usage::new(
            "--nfa-size-limit <n|none>",
            "Limit the number of NFA states.",
            r#"
Sets a limit on the number of states in the Thompson NFA built from a pattern.
A pattern whose NFA exceeds this limit fails to compile.

When set to 'none' (the default), there is no limit.
"#,
        )];
        USAGES
    }
}

use lexopt::{Arg, Parser};

use scanner_automata::dfa;

use crate::{
    args::{self, Usage},
    config::{thompson, Configurable},
};

/// Flags for building DFAs.
#[derive(Debug, Default)]
pub struct Config {
    dfa: dfa::Config,
}

impl Config {
    /// Returns a DFA builder using these flags and the NFA flags given.
    ///
    /// Whether the builder minimizes is decided by the caller.
    pub fn builder(
        &self,
        thompson: &thompson::Config,
        minimize: bool,
    ) -> dfa::Builder {
        let mut builder = dfa::Builder::new();
        builder
            .configure(self.dfa.clone().minimize(minimize))
            .thompson(thompson.thompson());
        builder
    }
}

impl Configurable for Config {
    fn configure(
        &mut self,
        p: &mut Parser,
        arg: &mut Arg,
    ) -> anyhow::Result<bool> {
        match *arg {
            Arg::Long("state-limit") => {
                let limit = args::parse_maybe(p, "--state-limit")?;
                self.dfa = self.dfa.clone().state_limit(limit);
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn usage(&self) -> &[Usage] {
        const USAGES: &'static [Usage] = &[Usage::new(
            "--state-limit <n|none>",
            "Limit the number of DFA states.",
            r#"
Sets a limit on the number of states that subset construction may create,
including the error state. A pattern whose DFA exceeds this limit fails to
compile.

When set to 'none' (the default), there is no limit.
"#,
        )];
        USAGES
    }
}

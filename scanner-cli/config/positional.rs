use lexopt::{Arg, Parser, ValueExt};

use crate::{args::Usage, config::Configurable};

/// Collects every positional argument, in order.
#[derive(Debug, Default)]
pub struct Config {
    values: Vec<String>,
}

impl Config {
    /// Returns one positional argument per name given, or an error naming
    /// what was expected.
    pub fn exactly(&self, names: &[&str]) -> anyhow::Result<Vec<String>> {
        anyhow::ensure!(
            self.values.len() == names.len(),
            "expected {} positional argument(s) <{}>, but got {}",
            names.len(),
            names.join("> <"),
            self.values.len(),
        );
        Ok(self.values.clone())
    }

    /// Returns at least one positional argument, or an error naming what was
    /// expected.
    pub fn at_least_one(&self, name: &str) -> anyhow::Result<&[String]> {
        anyhow::ensure!(
            !self.values.is_empty(),
            "expected at least one <{}> argument",
            name,
        );
        Ok(&self.values)
    }
}

impl Configurable for Config {
    fn configure(
        &mut self,
        _: &mut Parser,
        arg: &mut Arg,
    ) -> anyhow::Result<bool> {
        match *arg {
            Arg::Value(ref mut v) => {
                self.values.push(std::mem::take(v).string()?);
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn usage(&self) -> &[Usage] {
        &[]
    }
}

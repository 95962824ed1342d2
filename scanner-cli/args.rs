use std::{
    fmt::{Debug, Display},
    str::FromStr,
};

use {
    anyhow::Context,
    lexopt::{Arg, Parser, ValueExt},
};

/// Parses the next argument as a command name and returns it.
///
/// When the next argument is `-h/--help` or missing altogether, the given
/// usage is returned as an error so that it gets printed.
pub fn next_as_command(usage: &str, p: &mut Parser) -> anyhow::Result<String> {
    let usage = usage.trim();
    let arg = match p.next()? {
        Some(arg) => arg,
        None => anyhow::bail!("{}", usage),
    };
    let cmd = match arg {
        Arg::Value(cmd) => cmd.string()?,
        Arg::Short('h') | Arg::Long("help") => anyhow::bail!("{}", usage),
        arg => return Err(arg.unexpected().into()),
    };
    Ok(cmd)
}

/// Parses the next flag value into `T`, permitting the string `none` to mean
/// an absent value. Error messages include the given flag name.
pub fn parse_maybe<T>(
    p: &mut Parser,
    flag_name: &'static str,
) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    <T as FromStr>::Err: Display + Debug + Send + Sync + 'static,
{
    let value = parse_str(p, flag_name)?;
    if value == "none" {
        return Ok(None);
    }
    match value.parse() {
        Err(err) => Err(anyhow::Error::msg(err).context(flag_name)),
        Ok(parsed) => Ok(Some(parsed)),
    }
}

/// Parses the next flag value into `T`. Error messages include the given
/// flag name.
pub fn parse<T>(p: &mut Parser, flag_name: &'static str) -> anyhow::Result<T>
where
    T: FromStr,
    <T as FromStr>::Err: Display + Debug + Send + Sync + 'static,
{
    let value = parse_str(p, flag_name)?;
    value
        .parse()
        .map_err(|err| anyhow::Error::msg(err).context(flag_name))
}

fn parse_str(
    p: &mut Parser,
    flag_name: &'static str,
) -> anyhow::Result<String> {
    let osv = p.value().context(flag_name)?;
    match osv.into_string() {
        Ok(value) => Ok(value),
        Err(osv) => {
            let err = lexopt::Error::NonUnicodeValue(osv);
            Err(anyhow::Error::from(err).context(flag_name))
        }
    }
}

/// The documentation of a single flag.
///
/// `Usage::short` and `Usage::long` format a slice of usages for the OPTIONS
/// section of a command's help output.
#[derive(Clone, Copy, Debug)]
pub struct Usage {
    /// The format of the flag, for example, '-l, --language <lang>'.
    pub format: &'static str,
    /// A description that fits on one line along with the format.
    pub short: &'static str,
    /// A longer description, possibly several paragraphs.
    pub long: &'static str,
}

impl Usage {
    pub const fn new(
        format: &'static str,
        short: &'static str,
        long: &'static str,
    ) -> Usage {
        Usage { format, short, long }
    }

    /// Format a two column table of flag formats and short descriptions.
    pub fn short(usages: &[Usage]) -> String {
        const MIN_SPACE: usize = 2;

        let mut result = String::new();
        let max_len = match usages.iter().map(|u| u.format.len()).max() {
            None => return result,
            Some(len) => len,
        };
        for usage in usages.iter() {
            let padlen = MIN_SPACE + (max_len - usage.format.len());
            let padding = " ".repeat(padlen);
            result.push_str(&format!(
                "    {}{}{}\n",
                usage.format, padding, usage.short
            ));
        }
        result
    }

    /// Format each flag followed by its long description, wrapped and
    /// indented beneath it.
    pub fn long(usages: &[Usage]) -> String {
        let wrap_opts = textwrap::Options::new(79)
            .initial_indent("        ")
            .subsequent_indent("        ");
        let mut result = String::new();
        for (i, usage) in usages.iter().enumerate() {
            if i > 0 {
                result.push('\n');
            }
            result.push_str("    ");
            result.push_str(usage.format);
            result.push('\n');
            for (i, paragraph) in usage.long.trim().split("\n\n").enumerate() {
                if i > 0 {
                    result.push('\n');
                }
                let flattened = paragraph.replace("\n", " ");
                for line in textwrap::wrap(&flattened, &wrap_opts) {
                    result.push_str(&line);
                    result.push('\n');
                }
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const USAGES: &[Usage] = &[
        Usage::new("-q, --quiet", "Be quiet.", "Suppress output."),
        Usage::new("--state-limit <n>", "Limit states.", "A\nlimit.\n\nMore."),
    ];

    #[test]
    fn short_aligns_descriptions() {
        let got = Usage::short(USAGES);
        let expected = "    -q, --quiet        Be quiet.
    --state-limit <n>  Limit states.
";
        assert_eq!(expected, got);
    }

    #[test]
    fn long_wraps_paragraphs() {
        let got = Usage::long(USAGES);
        let expected = "    -q, --quiet
        Suppress output.

    --state-limit <n>
        A limit.

        More.
";
        assert_eq!(expected, got);
    }

    #[test]
    fn parse_none() {
        let mut p = Parser::from_args(&["--limit", "none", "--limit", "5"]);
        assert!(p.next().unwrap().is_some());
        let limit: Option<usize> = parse_maybe(&mut p, "--limit").unwrap();
        assert_eq!(None, limit);
        assert!(p.next().unwrap().is_some());
        let limit: Option<usize> = parse_maybe(&mut p, "--limit").unwrap();
        assert_eq!(Some(5), limit);
    }
}

use std::{
    collections::HashSet,
    io::{stdout, Write},
    path::Path,
};

use {
    anyhow::Context,
    lexopt::{Arg, Parser},
    scanner_automata::{
        codegen::{self, Language},
        dfa::DFA,
        dot,
        nfa::thompson::NFA,
    },
};

use crate::{
    args::{self, Usage},
    config::{common, configure, dfa, positional, thompson, Configurable},
    util::{self, Table},
};

pub fn run(p: &mut Parser) -> anyhow::Result<()> {
    const USAGE: &'static str = "\
Generates one scanner function for every named pattern in each file given.

Each non-blank line of a file is an identifier made of ASCII letters and
digits, followed by whitespace and then a pattern that runs to the end of the
line. Trailing whitespace is ignored, so use \\s to end a pattern with a space.
For example:

    digits  [0-9]+
    ident   [a-z]([a-z]|[0-9])*

The scanners for FILE are written to FILE.c (or FILE.rs with '-l rust'). Each
one is named scan_<identifier> and returns the length of the longest prefix of
its input matched by the pattern, or 0 when there is none.

Lines that are malformed or whose pattern fails to compile are reported and
skipped. The command fails when any line was skipped.

USAGE:
    scanner-cli compile <file> ...

TIP:
    use -h for short docs and --help for long docs

OPTIONS:
%options%
";

    let mut common = common::Config::default();
    let mut output = Output::default();
    let mut thompson = thompson::Config::default();
    let mut dfa = dfa::Config::default();
    let mut files = positional::Config::default();
    configure(
        p,
        USAGE,
        &mut [
            &mut common,
            &mut output,
            &mut thompson,
            &mut dfa,
            &mut files,
        ],
    )?;

    let batch = Batch { common, output, thompson, dfa };
    let mut failed = 0;
    for file in files.at_least_one("file")?.iter() {
        failed += batch.compile_file(file)?;
    }
    anyhow::ensure!(failed == 0, "{} line(s) could not be compiled", failed);
    Ok(())
}

/// Flags controlling which files are written.
#[derive(Debug)]
struct Output {
    code: bool,
    graph: bool,
    all_graphs: bool,
    language: Language,
}

impl Default for Output {
    fn default() -> Output {
        Output {
            code: true,
            graph: false,
            all_graphs: false,
            language: Language::C,
        }
    }
}

impl Configurable for Output {
    fn configure(
        &mut self,
        p: &mut Parser,
        arg: &mut Arg,
    ) -> anyhow::Result<bool> {
        match *arg {
            Arg::Short('n') | Arg::Long("no-code") => {
                self.code = false;
            }
            Arg::Short('g') | Arg::Long("graph") => {
                self.graph = true;
            }
            Arg::Short('a') | Arg::Long("all-graphs") => {
                self.graph = true;
                self.all_graphs = true;
            }
            Arg::Short('l') | Arg::Long("language") => {
                self.language = args::parse(p, "-l/--language")?;
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn usage(&self) -> &[Usage] {
        const USAGES: &'static [Usage] = &[
            Usage::new(
                "-a, --all-graphs",
                "Write dot graphs of every automaton.",
                r#"
In addition to the graph written by -g/--graph, write FILE_NAME.nfa.dot with
the Thompson NFA and FILE_NAME.naive.dot with the DFA before minimization.
"#,
            ),
            Usage::new(
                "-g, --graph",
                "Write a dot graph of each minimal DFA.",
                r#"
Write a Graphviz dot graph of the minimal DFA for each pattern to
FILE_NAME.dot, where FILE is the input file and NAME is the identifier of
the pattern.
"#,
            ),
            Usage::new(
                "-l, --language <c|rust>",
                "The language of generated scanners.",
                r#"
Sets the language of the generated scanners. With 'c' (the default), scanners
take a NUL terminated string and are written to FILE.c. With 'rust', scanners
take a byte slice and are written to FILE.rs.
"#,
            ),
            Usage::new(
                "-n, --no-code",
                "Do not write generated code.",
                r#"
Do not write any generated code. Patterns are still compiled, so this is
useful for checking a file or for writing graphs only.
"#,
            ),
        ];
        USAGES
    }
}

/// A named pattern read from one line of an input file.
#[derive(Debug, Eq, PartialEq)]
struct Rule<'a> {
    name: &'a str,
    pattern: &'a str,
}

/// Parse a single line of an input file.
///
/// Blank lines yield `None`.
fn parse_rule(line: &str) -> anyhow::Result<Option<Rule<'_>>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let end = line
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(line.len());
    let (name, rest) = line.split_at(end);
    if name.is_empty() {
        anyhow::bail!("expected an identifier of ASCII letters and digits");
    }
    if rest.is_empty() {
        anyhow::bail!("missing pattern after identifier '{}'", name);
    }
    if !rest.starts_with(char::is_whitespace) {
        anyhow::bail!(
            "identifier '{}{}' may only contain ASCII letters and digits",
            name,
            rest.split(char::is_whitespace).next().unwrap_or(""),
        );
    }
    Ok(Some(Rule { name, pattern: rest.trim_start() }))
}

/// The automata built for one rule.
#[derive(Debug)]
struct Automata {
    nfa: NFA,
    naive: DFA,
    minimal: DFA,
}

#[derive(Debug)]
struct Batch {
    common: common::Config,
    output: Output,
    thompson: thompson::Config,
    dfa: dfa::Config,
}

impl Batch {
    /// Compile every rule in the given file, writing the requested outputs.
    /// Returns the number of lines that failed.
    ///
    /// Problems with individual lines are reported on stderr. Only a failure
    /// to read or write a file is returned as an error.
    fn compile_file(&self, file: &str) -> anyhow::Result<usize> {
        let contents = std::fs::read_to_string(file)
            .with_context(|| format!("failed to read {}", file))?;
        let mut code = String::new();
        let mut seen = HashSet::new();
        let mut failed = 0;
        for (i, line) in contents.lines().enumerate() {
            let lineno = i + 1;
            let rule = match parse_rule(line) {
                Ok(None) => continue,
                Ok(Some(rule)) => rule,
                Err(err) => {
                    eprintln!("{}:{}: {}", file, lineno, err);
                    failed += 1;
                    continue;
                }
            };
            if !seen.insert(rule.name) {
                eprintln!(
                    "{}:{}: duplicate identifier '{}'",
                    file, lineno, rule.name,
                );
                failed += 1;
                continue;
            }
            let automata = match self.build(&rule) {
                Ok(automata) => automata,
                Err(err) => {
                    eprintln!(
                        "{}:{}: failed to compile '{}': {}",
                        file, lineno, rule.name, err,
                    );
                    failed += 1;
                    continue;
                }
            };
            if self.output.code {
                if !code.is_empty() {
                    code.push('\n');
                }
                codegen::write_scanner(
                    &automata.minimal,
                    rule.name,
                    self.output.language,
                    &mut code,
                )?;
            }
            self.write_graphs(file, rule.name, &automata)?;
        }
        if self.output.code {
            let ext = self.output.language.extension();
            write_file(&format!("{}.{}", file, ext), &code)?;
        }
        Ok(failed)
    }

    fn build(&self, rule: &Rule<'_>) -> anyhow::Result<Automata> {
        let mut table = Table::empty();
        let compiler = self.thompson.compiler();
        let (nfa, time) = util::timeitr(|| compiler.build(rule.pattern))?;
        table.add("compile nfa time", time);
        table.add("nfa states", nfa.state_len());

        let builder = self.dfa.builder(&self.thompson, false);
        let (naive, time) = util::timeitr(|| builder.build_from_nfa(&nfa))?;
        table.add("determinize time", time);
        table.add("dfa states", naive.state_len());

        let (minimal, time) = util::timeit(|| naive.minimize());
        table.add("minimize time", time);
        table.add("minimal dfa states", minimal.state_len());
        log::debug!(
            "compiled '{}': {} NFA states, {} DFA states, {} minimal",
            rule.name,
            nfa.state_len(),
            naive.state_len(),
            minimal.state_len(),
        );
        if self.common.verbose {
            writeln!(stdout(), "{}:", rule.name)?;
            table.print(stdout())?;
        }
        Ok(Automata { nfa, naive, minimal })
    }

    fn write_graphs(
        &self,
        file: &str,
        name: &str,
        automata: &Automata,
    ) -> anyhow::Result<()> {
        if self.output.all_graphs {
            let mut graph = String::new();
            dot::write_nfa(&automata.nfa, &mut graph)?;
            write_file(&format!("{}_{}.nfa.dot", file, name), &graph)?;

            let mut graph = String::new();
            dot::write_dfa(&automata.naive, &mut graph)?;
            write_file(&format!("{}_{}.naive.dot", file, name), &graph)?;
        }
        if self.output.graph {
            let mut graph = String::new();
            dot::write_dfa(&automata.minimal, &mut graph)?;
            write_file(&format!("{}_{}.dot", file, name), &graph)?;
        }
        Ok(())
    }
}

fn write_file(path: &str, contents: &str) -> anyhow::Result<()> {
    log::debug!("writing {}", path);
    std::fs::write(Path::new(path), contents)
        .with_context(|| format!("failed to write {}", path))
}

//! Command-line parsing.

use std::path::PathBuf;

use crate::CliError;

/// A parsed `objxc` invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Export {
        graph: PathBuf,
        config: Option<PathBuf>,
        output: Option<PathBuf>,
    },
    Symbols {
        graph: PathBuf,
        config: Option<PathBuf>,
    },
    Entry {
        module: Option<String>,
        function: Option<String>,
        launcher: bool,
    },
    Demangle(String),
    Help,
    Version,
}

impl Command {
    /// Parse the arguments after the program name.
    pub fn parse(args: &[String]) -> Result<Command, CliError> {
        let Some((command, rest)) = args.split_first() else {
            return Ok(Command::Help);
        };
        match command.as_str() {
            "export" => {
                let mut options = Options::parse(rest, &["--config", "-o", "--output"])?;
                options.only_flags(&[])?;
                let graph = options.single_positional("export <graph.json>")?;
                Ok(Command::Export {
                    graph: PathBuf::from(graph),
                    config: options.take("--config").map(PathBuf::from),
                    output: options
                        .take("-o")
                        .or_else(|| options.take("--output"))
                        .map(PathBuf::from),
                })
            }
            "symbols" => {
                let mut options = Options::parse(rest, &["--config"])?;
                options.only_flags(&[])?;
                let graph = options.single_positional("symbols <graph.json>")?;
                Ok(Command::Symbols {
                    graph: PathBuf::from(graph),
                    config: options.take("--config").map(PathBuf::from),
                })
            }
            "entry" => {
                let options = Options::parse(rest, &[])?;
                options.only_flags(&["--launcher"])?;
                if options.positional.len() > 2 {
                    return Err(CliError::usage(
                        "usage: objxc entry [<module>] [<function>] [--launcher]",
                    ));
                }
                let mut positional = options.positional.into_iter();
                Ok(Command::Entry {
                    module: positional.next(),
                    function: positional.next(),
                    launcher: !options.flags.is_empty(),
                })
            }
            "demangle" => match rest {
                [symbol] => Ok(Command::Demangle(symbol.clone())),
                _ => Err(CliError::usage("usage: objxc demangle <symbol>")),
            },
            "help" | "--help" | "-h" => Ok(Command::Help),
            "version" | "--version" | "-V" => Ok(Command::Version),
            other => Err(CliError::usage(format!("unknown command `{other}`"))),
        }
    }
}

/// Positional arguments, valued options and bare flags.
#[derive(Default)]
struct Options {
    positional: Vec<String>,
    values: Vec<(String, String)>,
    flags: Vec<String>,
}

impl Options {
    /// `valued` lists the options that take the following argument as
    /// their value. `--name=value` is accepted for those too.
    fn parse(args: &[String], valued: &[&str]) -> Result<Options, CliError> {
        let mut options = Options::default();
        let mut args = args.iter();
        while let Some(arg) = args.next() {
            if let Some((name, value)) = arg.split_once('=').filter(|(n, _)| valued.contains(n)) {
                options.values.push((name.to_string(), value.to_string()));
            } else if valued.contains(&arg.as_str()) {
                let Some(value) = args.next() else {
                    return Err(CliError::usage(format!("missing value for `{arg}`")));
                };
                options.values.push((arg.clone(), value.clone()));
            } else if arg.starts_with('-') && arg.len() > 1 {
                options.flags.push(arg.clone());
            } else {
                options.positional.push(arg.clone());
            }
        }
        Ok(options)
    }

    fn take(&mut self, name: &str) -> Option<String> {
        let index = self.values.iter().rposition(|(n, _)| n == name)?;
        Some(self.values.remove(index).1)
    }

    fn only_flags(&self, allowed: &[&str]) -> Result<(), CliError> {
        match self.flags.iter().find(|f| !allowed.contains(&f.as_str())) {
            Some(flag) => Err(CliError::usage(format!("unknown option `{flag}`"))),
            None => Ok(()),
        }
    }

    fn single_positional(&mut self, usage: &str) -> Result<String, CliError> {
        match self.positional.len() {
            1 => Ok(self.positional.remove(0)),
            _ => Err(CliError::usage(format!("usage: objxc {usage}"))),
        }
    }
}

//! objxc command-line tool.

use objxc::commands::{demangle_output, entry_output, run_export, run_symbols};
use objxc::{init_tracing, CliError, Command};

fn main() {
    init_tracing();
    let args: Vec<String> = std::env::args().skip(1).collect();

    let command = match Command::parse(&args) {
        Ok(command) => command,
        Err(err) => {
            eprintln!("error: {err}");
            eprintln!();
            eprint!("{USAGE}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run(command) {
        match err.code() {
            Some(code) => eprintln!("error[{code}]: {err}"),
            None => eprintln!("error: {err}"),
        }
        std::process::exit(1);
    }
}

fn run(command: Command) -> Result<(), CliError> {
    match command {
        Command::Export {
            graph,
            config,
            output,
        } => {
            let export = run_export(&graph, config.as_deref(), output.as_deref())?;
            for warning in &export.warnings {
                eprintln!("{warning}");
            }
            if output.is_none() {
                print!("{}", export.header);
            }
        }
        Command::Symbols { graph, config } => {
            print!("{}", run_symbols(&graph, config.as_deref())?);
        }
        Command::Entry {
            module,
            function,
            launcher,
        } => {
            print!(
                "{}",
                entry_output(module.as_deref(), function.as_deref(), launcher)
            );
        }
        Command::Demangle(symbol) => println!("{}", demangle_output(&symbol)),
        Command::Help => print!("{USAGE}"),
        Command::Version => println!("objxc {}", env!("CARGO_PKG_VERSION")),
    }
    Ok(())
}

const USAGE: &str = "\
objxc - Objective-C header exporter

Usage: objxc <command> [options]

Commands:
  export <graph.json>     Export the graph as one Objective-C header
  symbols <graph.json>    List the resolved type names
  entry [module] [fn]     Print the mangled entry symbol
  demangle <symbol>       Decode an entry symbol
  help                    Show this help message
  version                 Show version information

Options:
  --config <objx.toml>    Export configuration (export, symbols)
  -o, --output <file.h>   Write the header to a file instead of stdout
  --launcher              Print the C launcher instead of the symbol (entry)

Logging:
  OBJX_LOG=objx_mangle=debug objxc export graph.json

Examples:
  objxc export graph.json --config objx.toml -o Shared.h
  objxc entry app main --launcher > launcher.c
  objxc demangle '_objx_app$main'
";

//! ink-equations CLI entry point.

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use log::LevelFilter;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

use ink_equations::{EngineConfig, EngineError, Result, recognize_document};

/// Handwritten math ink (JSON strokes) to a LaTeX-like equation.
#[derive(Parser, Debug)]
#[command(
    name = "ink-equations",
    about = "Handwritten math ink (JSON strokes) to a LaTeX-like equation"
)]
struct Cli {
    /// Input JSON ink document (reads from stdin if not provided)
    input: Option<String>,

    /// Write output to this file instead of stdout
    #[arg(short = 'o', long = "output")]
    output: Option<String>,

    /// Largest number of strokes grouped into one symbol
    #[arg(long = "max-symbol-strokes")]
    max_symbol_strokes: Option<usize>,

    /// Log candidate paths, partitions and grammar passes
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long = "log-level", default_value = "warn")]
    log_level: LevelFilter,

    /// Print one line per symbol with its links instead of the equation
    #[arg(long = "tree")]
    tree: bool,
}

fn main() {
    let cli = Cli::parse();

    let log_config = ConfigBuilder::new().set_time_level(LevelFilter::Off).build();
    if let Err(e) = TermLogger::init(
        cli.log_level,
        log_config,
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ) {
        eprintln!("error: cannot set up logging: {}", e);
        process::exit(1);
    }

    let text = match read_input(cli.input.as_deref()) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    };

    let mut config = EngineConfig::new().verbose(cli.verbose);
    if let Some(max) = cli.max_symbol_strokes {
        config = config.with_max_traces_in_symbol(max);
    }

    let recognizer = match recognize_document(&text, &config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    };
    let rendered = if cli.tree {
        recognizer.tree()
    } else {
        format!("{}\n", recognizer.equation())
    };

    if let Err(e) = write_output(cli.output.as_deref(), &rendered) {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

/// Read the ink document from `path`, or from stdin if not given.
fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path).map_err(|source| EngineError::Io {
            action: "read",
            path: PathBuf::from(path),
            source,
        }),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .map_err(|source| EngineError::Io {
                    action: "read",
                    path: PathBuf::from("<stdin>"),
                    source,
                })?;
            Ok(buf)
        }
    }
}

/// Write `rendered` to `path`, or to stdout if not given.
fn write_output(path: Option<&str>, rendered: &str) -> Result<()> {
    match path {
        Some(path) => fs::write(path, rendered).map_err(|source| EngineError::Io {
            action: "write",
            path: PathBuf::from(path),
            source,
        }),
        None => {
            let mut stdout = io::stdout();
            stdout
                .write_all(rendered.as_bytes())
                .and_then(|()| stdout.flush())
                .map_err(|source| EngineError::Io {
                    action: "write",
                    path: PathBuf::from("<stdout>"),
                    source,
                })
        }
    }
}

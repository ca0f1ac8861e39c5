//! Decoder generator binary.
//!
//! Writes the generated 6502 dispatch function (or a JSON dump of the
//! decoder table) to stdout or a file.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use m6502_decoder::{DecoderError, DecoderTable, GeneratorConfig, InvalidOpcodePolicy, emit};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Rust,
    Json,
}

// ---------------------------------------------------------------------------
// CLI argument parsing
// ---------------------------------------------------------------------------

struct CliArgs {
    out: Option<PathBuf>,
    format: Format,
    config: GeneratorConfig,
    verbose: bool,
}

fn usage() {
    eprintln!("Usage: m6502-decoder-gen [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --out <file>         Write output to a file [default: stdout]");
    eprintln!("  --format <fmt>       rust or json [default: rust]");
    eprintln!("  --policy <policy>    Invalid opcode policy: jam or nop [default: jam]");
    eprintln!("  --no-comments        Omit per-opcode mnemonic comments");
    eprintln!("  --verbose            Log table construction details");
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        out: None,
        format: Format::Rust,
        config: GeneratorConfig::default(),
        verbose: false,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--out" | "-o" => {
                i += 1;
                cli.out = args.get(i).map(PathBuf::from);
            }
            "--format" => {
                i += 1;
                cli.format = match args.get(i).map(String::as_str) {
                    Some("rust") => Format::Rust,
                    Some("json") => Format::Json,
                    other => {
                        eprintln!("Unknown format: {}", other.unwrap_or("<missing>"));
                        usage();
                        process::exit(1);
                    }
                };
            }
            "--policy" => {
                i += 1;
                let parsed = args
                    .get(i)
                    .map_or(Ok(InvalidOpcodePolicy::default()), |s| s.parse());
                match parsed {
                    Ok(policy) => cli.config.invalid_policy = policy,
                    Err(e) => {
                        eprintln!("{e}");
                        process::exit(1);
                    }
                }
            }
            "--no-comments" => {
                cli.config.comments = false;
            }
            "--verbose" | "-v" => {
                cli.verbose = true;
            }
            "--help" | "-h" => {
                usage();
                process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {other}");
                usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    cli
}

fn run(cli: &CliArgs) -> Result<(), DecoderError> {
    let table = DecoderTable::build()?;
    let output = match cli.format {
        Format::Rust => emit::render_rust(&table, &cli.config),
        Format::Json => emit::render_json(&table)?,
    };

    match &cli.out {
        Some(path) => {
            fs::write(path, &output)?;
            log::info!("wrote {} bytes to {}", output.len(), path.display());
        }
        None => io::stdout().lock().write_all(output.as_bytes())?,
    }
    Ok(())
}

fn main() {
    let cli = parse_args();

    let level = if cli.verbose {
        log::Level::Debug
    } else {
        log::Level::Warn
    };
    if let Err(e) = simple_logger::init_with_level(level) {
        eprintln!("Logger error: {e}");
    }

    if let Err(e) = run(&cli) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

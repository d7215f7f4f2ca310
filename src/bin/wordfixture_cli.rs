//! wordfixture CLI - builds hash-map fixtures from word lists
//!
//! `wordfixture-cli [--source <path>] [--target <path>]` encodes; the
//! `inspect` and `verify` subcommands read fixtures back.
//! Outputs JSON to stdout, logs to stderr
//! Returns 2 when input data is rejected, 1 on any other failure,
//! including a bad command line

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;

use wordfixture::{inspect, EncoderConfig, FixtureEncoder, FixtureError, LengthMode};

#[derive(Parser)]
#[command(name = "wordfixture-cli", version)]
#[command(about = "Convert newline-delimited word lists into binary hash-map fixtures")]
struct Cli {
    /// Defaults to `encode`
    #[command(subcommand)]
    command: Option<Commands>,

    /// Word list to read [default: assets/lang-english.txt]
    #[arg(short, long, global = true)]
    source: Option<PathBuf>,

    /// Fixture to write or check [default: assets/data.bin]
    #[arg(short, long, global = true)]
    target: Option<PathBuf>,

    #[arg(short, long, global = true, value_enum)]
    length_mode: Option<LengthModeArg>,

    /// JSON config file; flags given on the command line take precedence
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode the word list into a fixture
    Encode,

    /// Decode a fixture and print a summary
    Inspect {
        /// Fixture to read
        #[arg(short, long)]
        fixture: PathBuf,
    },

    /// Check that the target fixture is the encoding of the source word list
    Verify,
}

#[derive(Clone, Copy, ValueEnum)]
enum LengthModeArg {
    /// Length prefix equals the record size
    Exact,
    /// Length prefix counts the stripped newline
    Legacy,
}

impl From<LengthModeArg> for LengthMode {
    fn from(arg: LengthModeArg) -> Self {
        match arg {
            LengthModeArg::Exact => LengthMode::Exact,
            LengthModeArg::Legacy => LengthMode::Legacy,
        }
    }
}

fn main() -> ExitCode {
    // clap would exit with 2 on usage errors, which is our rejected-data code.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };
    init_logging(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => match EncoderConfig::load_from_file(path) {
            Ok(c) => c,
            Err(e) => return fail(&e),
        },
        None => EncoderConfig::default(),
    };
    if let Some(source) = cli.source {
        config.source = source;
    }
    if let Some(target) = cli.target {
        config.target = target;
    }
    if let Some(mode) = cli.length_mode {
        config.length_mode = mode.into();
    }

    match cli.command.unwrap_or(Commands::Encode) {
        Commands::Encode => match FixtureEncoder::new(config).run() {
            Ok(report) => print_json(&serde_json::json!({
                "success": true,
                "report": report,
            })),
            Err(e) => fail(&e),
        },

        Commands::Inspect { fixture } => match inspect(&fixture, config.length_mode) {
            Ok(summary) => print_json(&serde_json::json!({
                "success": true,
                "summary": summary,
            })),
            Err(e) => fail(&e),
        },

        Commands::Verify => {
            let (source, target) = (config.source.clone(), config.target.clone());
            match FixtureEncoder::new(config).verify(&source, &target) {
                Ok(summary) => print_json(&serde_json::json!({
                    "success": true,
                    "verified": true,
                    "summary": summary,
                })),
                Err(e) => fail(&e),
            }
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn print_json<T: Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(s) => {
            println!("{}", s);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("failed to serialize output: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn fail(err: &FixtureError) -> ExitCode {
    tracing::error!(kind = err.kind(), "{}", err);
    let output = serde_json::json!({
        "success": false,
        "kind": err.kind(),
        "error": err.to_string(),
    });
    println!("{}", output);
    ExitCode::from(err.exit_code())
}

//! CLI entry point for the SIMP simulator binary.

use std::env;
use std::ffi::OsString;
use std::io;
use std::path::PathBuf;

use simp_core::{CoreConfig, StopReason};
use simp_sim::{run_simulation, SimPaths, SIM_PATH_COUNT};
#[cfg(test)]
use tempfile as _;
use thiserror as _;
use tracing::info;
use tracing_subscriber::EnvFilter;

const USAGE_TEXT: &str = "\
Usage: simp-sim <imemin> <dmemin> <diskin> <irq2in> <dmemout> <regout> <trace>
                <hwregtrace> <cycles> <leds> <display7seg> <diskout>
                <monitor.txt> <monitor.yuv> [options]

Options:
  --max-cycles <n>  Stop after <n> cycles even if the program never halts
  -h, --help        Show this help message

Logging goes to stderr and is filtered with RUST_LOG.

Examples:
  simp-sim imemin.txt dmemin.txt diskin.txt irq2in.txt dmemout.txt regout.txt \\
      trace.txt hwregtrace.txt cycles.txt leds.txt display7seg.txt diskout.txt \\
      monitor.txt monitor.yuv
";

const DEFAULT_LOG_DIRECTIVES: &str = "simp_core=info,simp_sim=info";

#[derive(Debug, PartialEq, Eq)]
struct RunArgs {
    paths: SimPaths,
    max_cycles: Option<u64>,
}

#[derive(Debug)]
enum ParseResult {
    Run(Box<RunArgs>),
    Help,
}

#[allow(clippy::while_let_on_iterator)]
fn parse_args(mut args: impl Iterator<Item = OsString>) -> Result<ParseResult, String> {
    let mut positional: Vec<PathBuf> = Vec::with_capacity(SIM_PATH_COUNT);
    let mut max_cycles: Option<u64> = None;

    while let Some(arg) = args.next() {
        if arg == "--help" || arg == "-h" {
            return Ok(ParseResult::Help);
        }

        if arg == "--max-cycles" {
            let value = args
                .next()
                .ok_or_else(|| "missing value for --max-cycles".to_string())?;
            let text = value.to_string_lossy();
            let limit = text
                .parse::<u64>()
                .map_err(|_| format!("invalid cycle count: {text}"))?;
            max_cycles = Some(limit);
            continue;
        }

        if arg.to_string_lossy().starts_with('-') {
            return Err(format!("unknown option: {}", arg.to_string_lossy()));
        }

        positional.push(PathBuf::from(arg));
    }

    let count = positional.len();
    let paths: [PathBuf; SIM_PATH_COUNT] = positional
        .try_into()
        .map_err(|_| format!("expected {SIM_PATH_COUNT} file paths, got {count}"))?;

    Ok(ParseResult::Run(Box::new(RunArgs {
        paths: SimPaths::from_array(paths),
        max_cycles,
    })))
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_DIRECTIVES));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(args: &RunArgs) -> Result<(), i32> {
    let config = CoreConfig {
        max_cycles: args.max_cycles,
        ..CoreConfig::default()
    };

    match run_simulation(&args.paths, &config) {
        Ok(outcome) => {
            if outcome.stop == StopReason::CycleLimit {
                info!(cycles = outcome.cycles, "stopped at cycle limit");
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("error: {e}");
            Err(1)
        }
    }
}

fn main() {
    let exit_code = match parse_args(env::args_os().skip(1)) {
        Ok(ParseResult::Help) => {
            println!("{USAGE_TEXT}");
            0
        }
        Ok(ParseResult::Run(args)) => {
            init_logging();
            match run(&args) {
                Ok(()) => 0,
                Err(code) => code,
            }
        }
        Err(error) => {
            eprintln!("error: {error}");
            eprintln!("{USAGE_TEXT}");
            1
        }
    };

    std::process::exit(exit_code);
}

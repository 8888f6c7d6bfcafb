use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use zkasm_asm::{
    field::{from_u64, to_u64},
    init_logger, Assembler, FunctionTable, MFibonacci, MainArtifacts, TraceLength,
};
use zkasm_verifier::{ensure_valid, verify_main, verify_mfibonacci};

/// Value returned by the default free-input functions.
const DEFAULT_FREE_INPUT: u64 = 7;

#[derive(Parser, Debug)]
#[command(name = "zkasm", about = "Compile, execute and check zkASM state machines", version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a zkASM program on the main state machine.
    Run {
        /// Path to the `.zkasm` source.
        file: PathBuf,

        /// Number of rows, a power of two.
        #[arg(short = 'n', long, default_value_t = TraceLength::DEFAULT.get(), value_parser = parse_trace_length)]
        trace_length: usize,

        /// Binds a free-input function to a constant, as `NAME=VALUE`.
        #[arg(long = "free-input", value_parser = parse_binding)]
        free_inputs: Vec<(String, u64)>,
    },
    /// Run the mFibonacci machine.
    Mfib {
        #[arg(long, default_value_t = 1)]
        a0: u64,

        #[arg(long, default_value_t = 2)]
        b0: u64,

        #[arg(short = 'n', long, default_value_t = TraceLength::DEFAULT.get(), value_parser = parse_trace_length)]
        trace_length: usize,
    },
}

fn parse_trace_length(s: &str) -> Result<usize, String> {
    let n = s
        .parse::<usize>()
        .map_err(|e| format!("invalid trace length {s}: {e}"))?;
    TraceLength::new(n).map(TraceLength::get).map_err(|e| e.to_string())
}

fn parse_binding(s: &str) -> Result<(String, u64), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got {s}"))?;
    let value = value
        .trim()
        .parse::<u64>()
        .map_err(|e| format!("invalid value for {name}: {e}"))?;
    Ok((name.trim().to_string(), value))
}

fn run(file: PathBuf, trace_length: usize, free_inputs: Vec<(String, u64)>) -> Result<()> {
    let trace_len = TraceLength::new(trace_length)?;
    let program = Assembler::from_file(&file)
        .with_context(|| format!("failed to assemble {}", file.display()))?;
    info!(steps = program.len(), labels = program.labels().len(), "compiled program");

    let default = from_u64(DEFAULT_FREE_INPUT);
    let table = free_inputs
        .into_iter()
        .fold(FunctionTable::simple_sm(default, default), |table, (name, value)| {
            table.with_constant(&name, from_u64(value))
        });

    for step in program.steps() {
        if let Some(name) = step.free_input_function() {
            if !table.contains(name) {
                warn!(line = step.line, name, "free input has no function, it reads as zero");
            }
        }
    }

    let artifacts = MainArtifacts::build(&program, trace_len, &table)?;
    let violations = verify_main(&artifacts.constants, &artifacts.rom, &artifacts.trace)?;
    for violation in &violations {
        eprintln!("{violation}");
    }
    ensure_valid(&violations).context("the execution trace does not satisfy the identities")?;

    println!("{}", to_u64(artifacts.trace.result()));
    Ok(())
}

fn mfib(a0: u64, b0: u64, trace_length: usize) -> Result<()> {
    let trace_len = TraceLength::new(trace_length)?;
    let inputs = [from_u64(a0), from_u64(b0)];
    let (machine, out) = MFibonacci::execute(trace_len, inputs);
    let is_last = MFibonacci::is_last(trace_len);

    let violations = verify_mfibonacci(&is_last, &machine, inputs, out)?;
    ensure_valid(&violations).context("the execution trace does not satisfy the identities")?;

    println!("{}", to_u64(out));
    Ok(())
}

fn main() -> Result<()> {
    init_logger();
    let args = Args::parse();

    match args.command {
        Command::Run {
            file,
            trace_length,
            free_inputs,
        } => run(file, trace_length, free_inputs),
        Command::Mfib {
            a0,
            b0,
            trace_length,
        } => mfib(a0, b0, trace_length),
    }
}

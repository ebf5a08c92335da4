use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use ls8_cli::loader;
use ls8_core::runtime::disasm;
use ls8_core::{Cpu, MachineOptions};

/// Exit status for a program file that cannot be read or parsed.
const EXIT_LOAD_ERROR: u8 = 2;
/// Exit status for a fatal error while executing.
const EXIT_RUNTIME_ERROR: u8 = 1;

#[derive(Parser)]
#[command(name = "ls8")]
#[command(about = "LS-8 byte-code emulator")]
struct Args {
    /// Program file, one binary byte per line.
    program: PathBuf,

    /// Print a state trace line to stderr before every instruction.
    #[arg(short, long)]
    trace: bool,

    /// Print the disassembled program instead of running it.
    #[arg(short, long)]
    disasm: bool,
}

fn main() -> ExitCode {
    env_logger::init();

    let args = Args::parse();

    let program = match loader::load_file(&args.program) {
        Ok(program) => program,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            return ExitCode::from(EXIT_LOAD_ERROR);
        }
    };

    let result = if args.disasm {
        print_disassembly(&program)
    } else {
        execute(&args, &program)
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ERROR: {:#}", e);
            ExitCode::from(EXIT_RUNTIME_ERROR)
        }
    }
}

fn execute(args: &Args, program: &[u8]) -> anyhow::Result<()> {
    let mut cpu = Cpu::with_options(MachineOptions { trace: args.trace });

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let result = cpu
        .run_with(program, &mut out)
        .with_context(|| format!("executing {}", args.program.display()));

    out.flush()?;
    result
}

fn print_disassembly(program: &[u8]) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for line in disasm::disassemble(program, program.len()) {
        writeln!(out, "{}", line)?;
    }

    Ok(())
}

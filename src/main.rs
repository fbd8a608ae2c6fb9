//! A COW interpreter in Rust.
//!
//! Compiles a COW source file and executes it in a sandboxed virtual
//! machine.
//!
//! # Usage
//! ```text
//! cowvm [OPTIONS] <file.cow>
//! ```
//!
//! # Arguments
//! - `file.cow`: Source file to execute
//!
//! # Options
//! - `-O, --optimize`: Coalesce increment and decrement runs at compile time
//! - `-m, --memory <cells>`: Initial tape size in cells
//! - `-s, --safe`: Apply the sandbox resource ceilings
//! - `--max-steps <n>` / `--max-output <n>`: Individual ceilings (0 = unlimited)
//! - `-d, --debug`: Step interactively, printing machine state
//! - `-q, --quiet`: Suppress progress logging

use crate::errors::CowError;
use crate::io::Console;
use crate::limits::Limits;
use crate::parser::{compile_source, compile_source_optimized, render_parse_error};
use crate::utils::log;
use crate::vm::{CowVm, DEFAULT_TAPE_CELLS, Status};
use std::env;
use std::fs;
use std::io::Write;
use std::process;
use std::str::FromStr;

mod errors;
mod io;
mod isa;
mod limits;
mod parser;
mod program;
mod utils;
mod vm;

fn main() {
    log::start_clock();
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        print_usage(&args[0]);
        process::exit(if args.len() < 2 { 1 } else { 0 });
    }

    let mut path: Option<&str> = None;
    let mut optimize = false;
    let mut safe = false;
    let mut debug = false;
    let mut quiet = false;
    let mut memory: Option<usize> = None;
    let mut max_steps: Option<u64> = None;
    let mut max_output: Option<u64> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_usage(&args[0]);
                process::exit(0);
            }
            "-O" | "--optimize" => {
                optimize = true;
                i += 1;
            }
            "-s" | "--safe" => {
                safe = true;
                i += 1;
            }
            "-d" | "--debug" => {
                debug = true;
                i += 1;
            }
            "-q" | "--quiet" => {
                quiet = true;
                i += 1;
            }
            "-m" | "--memory" => {
                memory = Some(parse_count(&args, &mut i, "--memory"));
                i += 1;
            }
            "--max-steps" => {
                max_steps = Some(parse_count(&args, &mut i, "--max-steps"));
                i += 1;
            }
            "--max-output" => {
                max_output = Some(parse_count(&args, &mut i, "--max-output"));
                i += 1;
            }
            other if !other.starts_with('-') && path.is_none() => {
                path = Some(other);
                i += 1;
            }
            other => {
                eprintln!("Unexpected argument: {}\n", other);
                print_usage(&args[0]);
                process::exit(1);
            }
        }
    }

    let Some(path) = path else {
        eprintln!("Missing source file\n");
        print_usage(&args[0]);
        process::exit(1);
    };

    let source = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            error!("cannot read '{}': {}", path, e);
            process::exit(1);
        }
    };

    let compiled = if optimize {
        compile_source_optimized(&source)
    } else {
        compile_source(&source)
    };
    let program = match compiled {
        Ok(program) => program,
        Err(e) => {
            eprint!("{}", render_parse_error(&source, &e));
            process::exit(1);
        }
    };

    let mut limits = if safe {
        Limits::sandboxed()
    } else {
        Limits::unlimited()
    };
    if let Some(steps) = max_steps {
        limits.max_steps = steps;
    }
    if let Some(bytes) = max_output {
        limits.max_output = bytes;
    }

    let tape_cells = memory.unwrap_or(DEFAULT_TAPE_CELLS);
    if limits.max_tape > 0 && tape_cells > limits.max_tape {
        warn!(
            "initial tape of {} cells clamped to the {}-cell ceiling",
            tape_cells, limits.max_tape
        );
    }

    if !quiet {
        info!("loaded {} instructions from '{}'", program.len(), path);
    }

    let mut vm = CowVm::with_config(limits, tape_cells);
    vm.load(program);

    let result = if debug {
        debug_loop(&mut vm)
    } else {
        vm.run(&mut Console)
    };
    if let Err(e) = result {
        error!("{}", e);
        process::exit(1);
    }
    if !quiet && vm.status() == Status::Halted {
        info!("halted after {} steps", vm.steps_executed());
    }
}

/// Interactive stepper: prints the machine state before each command.
fn debug_loop(vm: &mut CowVm) -> Result<(), CowError> {
    let mut io = Console;
    let stdin = std::io::stdin();
    while vm.status() != Status::Halted {
        let register = match vm.register() {
            Some(value) => value.to_string(),
            None => "-".into(),
        };
        print!(
            "[pc {} | cell {} @ {}/{} | register {} | steps {}] > ",
            vm.program_counter(),
            vm.current_cell(),
            vm.memory_pointer(),
            vm.tape_len(),
            register,
            vm.steps_executed()
        );
        let _ = std::io::stdout().flush();

        let mut line = String::new();
        match stdin.read_line(&mut line) {
            Ok(0) => return vm.run(&mut io),
            Ok(_) => {}
            Err(e) => {
                return Err(CowError::InputFailed {
                    reason: e.to_string(),
                });
            }
        }
        match line.trim() {
            "" | "s" | "step" => vm.step(&mut io)?,
            "r" | "run" => vm.run(&mut io)?,
            "reset" => vm.reset(),
            "q" | "quit" => return Ok(()),
            other => println!("unknown command '{}' (enter, run, reset, quit)", other),
        }
    }
    Ok(())
}

/// Parses the numeric argument following `flag`.
fn parse_count<T: FromStr>(args: &[String], i: &mut usize, flag: &str) -> T {
    *i += 1;
    if *i >= args.len() {
        eprintln!("{} requires an argument", flag);
        process::exit(1);
    }
    match args[*i].parse() {
        Ok(value) => value,
        Err(_) => {
            eprintln!("Invalid count for {}: {}", flag, args[*i]);
            process::exit(1);
        }
    }
}

const USAGE: &str = "\
COW Interpreter

USAGE:
    {program} [OPTIONS] <file.cow>

ARGS:
    <file.cow>    COW source file to execute

OPTIONS:
    -O, --optimize        Coalesce increment and decrement runs at compile time
    -m, --memory <cells>  Initial tape size in cells (default 30000)
    -s, --safe            Apply the sandbox ceilings (steps, tape, output)
        --max-steps <n>   Fail after n executed instructions (0 = unlimited)
        --max-output <n>  Fail after n output bytes (0 = unlimited)
    -d, --debug           Step interactively, printing machine state
    -q, --quiet           Suppress progress logging
    -h, --help            Print this help message

DEBUGGER:
    enter    execute one instruction
    run      execute to completion
    reset    return the machine to its loaded state
    quit     leave the debugger

EXAMPLES:
    # Run a demo until its step budget runs out
    {program} --max-steps 100 demos/fib.cow

    # Step through a countdown under the sandbox
    {program} -s -d demos/countdown.cow
";

/// Prints usage information to stderr.
fn print_usage(program: &str) {
    eprintln!("{}", USAGE.replace("{program}", program));
}

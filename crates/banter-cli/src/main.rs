use std::{
    io::{self, BufRead, Write},
    process::ExitCode,
};

use banter::Vm;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 {
        // File execution mode: evaluate the whole file as one program.
        let path = &args[1];
        let source = match std::fs::read_to_string(path) {
            Ok(source) => source,
            Err(error) => {
                eprintln!("error reading {path}: {error}");
                return ExitCode::FAILURE;
            }
        };
        let mut vm = Vm::workspace();
        return match evaluate_line(&mut vm, &source) {
            Ok(()) => ExitCode::SUCCESS,
            Err(()) => ExitCode::FAILURE,
        };
    }

    // Interactive mode: one program per line, evaluated in a workspace vm
    // so assignments persist between lines. EOF (Ctrl-D) or an interrupt
    // ends the session.
    let mut vm = Vm::workspace();
    println!("banter: type an expression, Ctrl-D to quit");

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let Ok(line) = line else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }
        let _ = evaluate_line(&mut vm, &line);
        let _ = io::stdout().flush();
    }

    ExitCode::SUCCESS
}

/// Evaluates one source snippet and prints its polymorphic result.
fn evaluate_line(vm: &mut Vm, source: &str) -> Result<(), ()> {
    match vm.run(source) {
        Ok(Some(result)) => {
            println!(">>> {result}");
            Ok(())
        }
        Ok(None) => {
            println!(">>> nil");
            Ok(())
        }
        Err(error) => {
            eprintln!("{error}");
            Err(())
        }
    }
}

use crate::cli::commands::{HELP, Outcome, ShellState};
use crate::config::SimConfig;
use anyhow::Result;
use rustyline::{Editor, error::ReadlineError};
use tracing::debug;

pub fn run_shell(config: SimConfig) -> Result<()> {
    let mut state = ShellState::new(config)?;
    let mut rl = Editor::<()>::new()?;

    println!("memsim: memory management simulator. Type 'help' for commands.");
    loop {
        match rl.readline("memsim> ") {
            Ok(line) if line.trim().is_empty() => continue,
            Ok(line) => {
                rl.add_history_entry(line.as_str());
                match state.run_line(&line) {
                    Ok(Outcome::Continue(out)) => print!("{}", out),
                    Ok(Outcome::Exit) => break,
                    Err(e) => {
                        debug!(error = ?e, "command failed");
                        println!("Error: {:#}", e);
                    }
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }
    Ok(())
}

pub fn print_help() {
    println!("{}", HELP);
}

//! Interactive read-dispatch-print loop

use crate::bot::{GOODBYE, Reply, StockAgent};
use agent_core::Context;
use std::io::{self, BufRead, Write};

/// Prompt printed before each line of input
pub const PROMPT: &str = ">> ";

/// Read commands from `input` until `exit` or end of input
///
/// Each command runs to completion before the next line is read. Blank
/// lines are skipped without reaching the agent.
pub async fn run_repl<R: BufRead, W: Write>(
    agent: &StockAgent,
    mut input: R,
    mut output: W,
    context: &mut Context,
) -> io::Result<()> {
    writeln!(output, "Welcome to the Stock Agent powered by Yahoo Finance!")?;
    writeln!(
        output,
        "Type 'help' to see available commands or 'exit' to quit."
    )?;

    loop {
        write!(output, "{PROMPT}")?;
        output.flush()?;

        let mut line = String::new();
        match input.read_line(&mut line) {
            Ok(0) => {
                writeln!(output, "\n{GOODBYE}")?;
                break;
            }
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                tracing::warn!(error = %e, "Skipping unreadable input line");
                writeln!(output, "Could not read that line: {e}")?;
                continue;
            }
            Err(e) => return Err(e),
        }

        if line.trim().is_empty() {
            continue;
        }

        match agent.dispatch(&line, context).await {
            Reply::Message(text) => writeln!(output, "{text}")?,
            Reply::Exit => {
                writeln!(output, "{GOODBYE}")?;
                break;
            }
        }
    }

    Ok(())
}

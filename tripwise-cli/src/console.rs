use crate::app::call_agent;
use crate::config::IdentityConfig;
use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tripwise_runner::Runner;

/// Interactive loop over one session. A failed turn is reported and the
/// loop keeps going, so the user can retry.
pub async fn run_console(runner: &Runner, identity: &IdentityConfig) -> Result<()> {
    let mut rl = DefaultEditor::new()?;

    println!("Tripwise Console");
    println!("Session: {}/{}/{}", runner.app_name(), identity.user_id, identity.session_id);
    println!("Tell me where you'd like to go. Ctrl+C to exit.\n");

    loop {
        match rl.readline("User -> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                rl.add_history_entry(line)?;

                match call_agent(runner, identity, line).await {
                    Ok(answer) => println!("\nAgent -> {answer}\n"),
                    Err(e) => eprintln!("\nError: {e:#}\n"),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("Interrupted");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("EOF");
                break;
            }
            Err(err) => {
                eprintln!("Error: {err}");
                break;
            }
        }
    }

    Ok(())
}

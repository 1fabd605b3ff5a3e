//! Interactive loop: read stdin, run a turn, print the reply, repeat until EOF or quit.
//!
//! Used by `run -i`. Every turn shares one `thread_id`, so the in-memory checkpointer keeps
//! the conversation (and a verified customer) between turns.

use std::io::Write;

use tokio::io::{AsyncBufReadExt, BufReader};

use cli::{run_turn, Turn};
use concierge::GraphRegistry;

fn is_quit_command(line: &str) -> bool {
    matches!(line.trim(), "quit" | "exit" | "/quit")
}

/// Exits on EOF (Ctrl+D) or `quit`/`exit`/`/quit`. A failed turn is reported and the loop
/// continues.
pub async fn run_repl_loop(
    registry: &GraphRegistry,
    base: &Turn,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut reader = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let line = match reader.next_line().await? {
            None => break,
            Some(s) if s.trim().is_empty() => continue,
            Some(s) if is_quit_command(&s) => break,
            Some(s) => s,
        };

        let turn = Turn {
            message: line,
            ..base.clone()
        };
        match run_turn(registry, &turn).await {
            Ok(reply) => println!("{}", reply),
            Err(e) => eprintln!("error: {}", e),
        }
    }
    Ok(())
}

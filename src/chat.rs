// Terminal chat: the same dispatcher as the web UI, one query per line.

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::info;

use crate::catalog::normalize_query;
use crate::dispatcher::QueryDispatcher;

const PROMPT: &str = "You: ";

fn is_exit_command(line: &str) -> bool {
    matches!(normalize_query(line).as_str(), "exit" | "quit")
}

// A catalog entry keyed on an exit word is still answerable.
fn ends_session(dispatcher: &QueryDispatcher, line: &str) -> bool {
    is_exit_command(line) && dispatcher.catalog().lookup(&normalize_query(line)).is_none()
}

/// Reads queries from `input` until EOF or `exit`/`quit` (unless the catalog
/// answers that word), writing each reply to `output`.
/// Returns the number of queries answered.
pub async fn run_chat_session<R, W>(
    dispatcher: &QueryDispatcher,
    input: R,
    mut output: W,
) -> Result<usize>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    let mut answered = 0;

    loop {
        output.write_all(PROMPT.as_bytes()).await?;
        output.flush().await?;

        let Some(line) = lines.next_line().await.context("Failed to read query")? else {
            break;
        };
        if ends_session(dispatcher, &line) {
            break;
        }

        let result = dispatcher.dispatch(Some(&line)).await;
        output
            .write_all(format!("Assistant: {}\n", result.reply.trim_end()).as_bytes())
            .await?;
        answered += 1;
    }

    output.write_all(b"\nGoodbye!\n").await?;
    output.flush().await?;
    Ok(answered)
}

pub async fn run_interactive_chat(dispatcher: &QueryDispatcher) -> Result<()> {
    info!("Starting interactive chat session...");
    println!("AI-Powered Placement Assistant. Type 'exit' to leave.");
    let answered = run_chat_session(
        dispatcher,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    )
    .await?;
    info!(answered, "Chat session finished.");
    Ok(())
}

//! Terminal chat loop for trying an agent without the web frontend

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::agents::{InvocationBridge, InvocationOutcome};

/// Chat over stdin/stdout until `exit`, `quit` or end of input.
pub async fn run(bridge: InvocationBridge) -> anyhow::Result<()> {
    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();
    run_with(bridge, stdin, stdout).await
}

/// Same loop as [`run`] over arbitrary streams.
pub async fn run_with<R, W>(bridge: InvocationBridge, reader: R, mut writer: W) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();

    writer
        .write_all(b"Agent ready. Type 'exit' to quit.\n")
        .await?;

    loop {
        writer.write_all(b"You: ").await?;
        writer.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();

        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            break;
        }

        let reply = match bridge.invoke(input.to_string()).await {
            InvocationOutcome::Success { text } => format!("Bot: {}\n", text),
            InvocationOutcome::Failure { message, .. } => format!("Bot: [Error] {}\n", message),
        };
        writer.write_all(reply.as_bytes()).await?;
    }

    writer.write_all(b"\nBye.\n").await?;
    writer.flush().await?;
    Ok(())
}

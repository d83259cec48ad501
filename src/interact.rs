//! Operator acknowledgment.
//!
//! A few steps pause for the person running the tool (after the meeting
//! list, after the connect URL). Non-interactive runs never block.

use std::io::IsTerminal;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

#[async_trait]
pub trait Operator: Send + Sync {
    /// Show `prompt` and wait until the operator continues.
    async fn acknowledge(&self, prompt: &str) -> std::io::Result<()>;
}

/// Waits for Enter on stdin, but only when stdin is a terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinOperator;

#[async_trait]
impl Operator for StdinOperator {
    async fn acknowledge(&self, prompt: &str) -> std::io::Result<()> {
        if !std::io::stdin().is_terminal() {
            log::debug!("stdin is not a terminal, skipping prompt: {}", prompt);
            return Ok(());
        }

        let mut stdout = tokio::io::stdout();
        stdout.write_all(prompt.as_bytes()).await?;
        stdout.flush().await?;

        let mut line = String::new();
        BufReader::new(tokio::io::stdin())
            .read_line(&mut line)
            .await?;
        Ok(())
    }
}

/// Never blocks.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopOperator;

#[async_trait]
impl Operator for NoopOperator {
    async fn acknowledge(&self, _prompt: &str) -> std::io::Result<()> {
        Ok(())
    }
}

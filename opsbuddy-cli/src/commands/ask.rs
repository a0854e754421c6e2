use anyhow::{bail, Result};
use opsbuddy_core::{Dispatcher, OpsBuddyConfig};
use tracing::debug;

use crate::render::print_reply;

pub async fn handle_ask_command(config: &OpsBuddyConfig, text: &str, format: &str) -> Result<()> {
    let text = text.trim();
    if text.is_empty() {
        bail!("Nothing to ask: the question is empty");
    }

    let dispatcher = Dispatcher::from_config(config)?;
    let reply = dispatcher.dispatch(text).await;
    debug!(mode = %dispatcher.mode(), severity = %reply.severity, "Answered one-shot question");

    if format == "json" {
        let output = serde_json::json!({
            "query": text,
            "mode": dispatcher.mode().to_string(),
            "content": reply.content,
            "severity": reply.severity,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_reply(&reply);
    }

    Ok(())
}

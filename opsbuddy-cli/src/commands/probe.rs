use anyhow::Result;
use colored::Colorize;
use opsbuddy_core::{BackendClient, OpsBuddyConfig};

pub async fn handle_probe_command(config: &OpsBuddyConfig, format: &str) -> Result<()> {
    let client = BackendClient::new(&config.backend)?;
    let status = client.probe().await;

    if format == "json" {
        let output = serde_json::json!({
            "backend_url": client.base_url(),
            "connected": status.is_connected(),
            "status": status.to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{}", "Backend Probe".cyan().bold());
    println!("{}", "═".repeat(40).dimmed());
    println!("  {:<10} {}", "URL:".bold(), client.base_url());
    if status.is_connected() {
        println!("  {:<10} {}", "Status:".bold(), status.to_string().green());
    } else {
        println!("  {:<10} {}", "Status:".bold(), status.to_string().yellow());
        println!();
        println!(
            "  {}",
            "Fallback questions will use the language model or offline analysis.".dimmed()
        );
    }

    Ok(())
}

//! `dlp status` command implementation
//!
//! Shows server health and the indexed-record count.

use colored::Colorize;

use crate::api::ApiClient;
use crate::error::Result;

/// Show server health and index statistics
pub async fn run(server_url: Option<String>) -> Result<()> {
    let client = ApiClient::from_env(server_url)?;

    match client.health_check().await? {
        Some(health) => {
            println!("{}", "Server:".cyan().bold());
            println!("  Status:   {}", "healthy".green());
            println!(
                "  Database: {}",
                health["database"].as_str().unwrap_or("unknown")
            );
            println!(
                "  Index:    {}",
                health["index"].as_str().unwrap_or("unknown")
            );
        },
        None => {
            println!("{}", "Server:".cyan().bold());
            println!("  Status:   {}", "unreachable".red());
            return Ok(());
        },
    }

    match client.statistics(None).await {
        Ok(count) => {
            println!();
            println!("{}", "Index:".cyan().bold());
            println!("  Records:  {count}");
        },
        Err(e) => {
            println!();
            println!("  Statistics unavailable: {e}");
        },
    }

    Ok(())
}

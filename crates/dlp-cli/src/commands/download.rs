//! `dlp download` command implementations

use colored::Colorize;
use std::time::Duration;

use dlp_common::types::{DownloadJobView, JobStatus};

use crate::api::ApiClient;
use crate::error::{CliError, Result};

/// Poll interval while waiting for a job to finish.
const POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Polling budget before giving up on --wait.
const MAX_POLLS: u32 = 150;

/// Request a PDF derivative, optionally waiting for completion
pub async fn request(
    server_url: Option<String>,
    pi: String,
    log_id: Option<String>,
    email: Option<String>,
    wait: bool,
) -> Result<()> {
    let client = ApiClient::from_env(server_url)?;

    let job = client
        .request_download(&pi, log_id.as_deref(), email.as_deref())
        .await?;
    print_job(&job);

    if !wait || job.status.is_terminal() {
        return Ok(());
    }

    println!();
    println!("Waiting for job to finish...");

    for _ in 0..MAX_POLLS {
        tokio::time::sleep(POLL_INTERVAL).await;
        let job = client.get_download(&job.identifier).await?;

        if job.status.is_terminal() {
            print_job(&job);
            return Ok(());
        }
    }

    Err(CliError::Timeout(job.identifier))
}

/// Poll one download job
pub async fn get(server_url: Option<String>, identifier: String) -> Result<()> {
    let client = ApiClient::from_env(server_url)?;
    let job = client.get_download(&identifier).await?;
    print_job(&job);
    Ok(())
}

/// Fetch a finished derivative to a local file
pub async fn fetch(
    server_url: Option<String>,
    identifier: String,
    output: Option<String>,
) -> Result<()> {
    let client = ApiClient::from_env(server_url)?;

    let bytes = client.fetch_download(&identifier).await?;
    let path = output.unwrap_or_else(|| format!("{identifier}.pdf"));
    tokio::fs::write(&path, &bytes).await?;

    println!("Saved {} bytes to {}", bytes.len(), path.green());
    Ok(())
}

/// List download jobs
pub async fn list(server_url: Option<String>, status: Option<String>) -> Result<()> {
    let client = ApiClient::from_env(server_url)?;

    let page = client.list_downloads(status.as_deref()).await?;
    let items = page["items"].as_array().cloned().unwrap_or_default();

    if items.is_empty() {
        println!("No download jobs found.");
        return Ok(());
    }

    println!("{}", "Download Jobs:".cyan().bold());
    println!();
    for item in &items {
        let job: DownloadJobView = serde_json::from_value(item.clone())?;
        print_job(&job);
        println!();
    }

    if let Some(total) = page["pagination"]["total"].as_i64() {
        println!("Total: {total}");
    }

    Ok(())
}

fn print_job(job: &DownloadJobView) {
    let status = match job.status {
        JobStatus::Ready => job.status.to_string().green(),
        JobStatus::Error => job.status.to_string().red(),
        _ => job.status.to_string().yellow(),
    };

    println!("{}", job.identifier.bold());
    println!("  Record:   {}", job.pi);
    if let Some(ref log_id) = job.log_id {
        println!("  Division: {log_id}");
    }
    println!("  Status:   {status}");
    if let Some(position) = job.queue_position {
        if position > 0 {
            println!("  Queue:    position {position}");
        }
    }
    if let Some(ref message) = job.message {
        println!("  Message:  {message}");
    }
}

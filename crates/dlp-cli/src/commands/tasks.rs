//! `dlp tasks` command implementations

use colored::Colorize;
use uuid::Uuid;

use dlp_common::types::{RecordTaskView, TaskState};

use crate::api::ApiClient;
use crate::error::Result;

/// Get one record task
pub async fn get(server_url: Option<String>, id: Uuid) -> Result<()> {
    let client = ApiClient::from_env(server_url)?;
    let task = client.get_task(&id).await?;
    print_task(&task);
    Ok(())
}

/// List record tasks
pub async fn list(
    server_url: Option<String>,
    task_type: Option<String>,
    status: Option<String>,
) -> Result<()> {
    let client = ApiClient::from_env(server_url)?;

    let page = client
        .list_tasks(task_type.as_deref(), status.as_deref())
        .await?;
    let items = page["items"].as_array().cloned().unwrap_or_default();

    if items.is_empty() {
        println!("No record tasks found.");
        return Ok(());
    }

    println!("{}", "Record Tasks:".cyan().bold());
    println!();
    for item in &items {
        let task: RecordTaskView = serde_json::from_value(item.clone())?;
        print_task(&task);
        println!();
    }

    Ok(())
}

fn print_task(task: &RecordTaskView) {
    let status = match task.status {
        TaskState::Done => task.status.to_string().green(),
        TaskState::Failed => task.status.to_string().red(),
        _ => task.status.to_string().yellow(),
    };

    println!("{}", task.id.to_string().bold());
    println!("  Type:    {}", task.task_type);
    if let Some(ref pi) = task.pi {
        println!("  Record:  {pi}");
    }
    println!("  Status:  {status}");
    if let Some(ref message) = task.message {
        println!("  Message: {message}");
    }
    println!("  Created: {}", task.created_at);
}

//! `dlp query` command implementation

use crate::api::ApiClient;
use crate::error::Result;

/// Post a raw query to the search index and print the matching documents
pub async fn run(
    server_url: Option<String>,
    query: String,
    count: i64,
    fields: Vec<String>,
    sort: Vec<String>,
    order: String,
) -> Result<()> {
    let client = ApiClient::from_env(server_url)?;

    let docs = client.query(&query, count, &fields, &sort, &order).await?;

    if docs.is_empty() {
        println!("No documents matched.");
        return Ok(());
    }

    println!("{}", serde_json::to_string_pretty(&docs)?);
    Ok(())
}

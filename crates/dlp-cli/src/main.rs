//! DLP CLI - Main entry point

use clap::Parser;
use dlp_cli::{Cli, Commands, DownloadCommand, TasksCommand};
use dlp_common::logging::{init_logging, LogConfig, LogLevel};
use std::process;
use tracing::error;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    // Handle markdown help generation
    if cli.markdown_help {
        println!("{}", clap_markdown::help_markdown::<Cli>());
        return;
    }

    // Ensure a command is provided
    if cli.command.is_none() {
        eprintln!("Error: A subcommand is required");
        eprintln!();
        eprintln!("For more information, try '--help'.");
        process::exit(2);
    }

    // Initialize logging based on verbose flag; LOG_* environment variables
    // take precedence
    let mut log_config = LogConfig::default().with_file_prefix("dlp-cli");
    log_config.level = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Warn
    };
    let log_config = log_config.clone().with_env_overrides().unwrap_or(log_config);

    // The CLI should work even when logging cannot be set up
    let _ = init_logging(&log_config);

    // Execute command
    if let Err(e) = execute_command(cli).await {
        error!(error = %e, "Command failed");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Execute the CLI command
async fn execute_command(cli: Cli) -> dlp_cli::Result<()> {
    // Command is guaranteed to exist at this point (checked in main)
    let Some(command) = cli.command else {
        unreachable!("Command should have been validated in main");
    };
    let server_url = cli.server_url;

    match command {
        Commands::Status => dlp_cli::commands::status::run(server_url).await,

        Commands::Query {
            query,
            count,
            fields,
            sort,
            order,
        } => dlp_cli::commands::query::run(server_url, query, count, fields, sort, order).await,

        Commands::Download { command } => match command {
            DownloadCommand::Request {
                pi,
                log_id,
                email,
                wait,
            } => dlp_cli::commands::download::request(server_url, pi, log_id, email, wait).await,
            DownloadCommand::Get { identifier } => {
                dlp_cli::commands::download::get(server_url, identifier).await
            }
            DownloadCommand::Fetch { identifier, output } => {
                dlp_cli::commands::download::fetch(server_url, identifier, output).await
            }
            DownloadCommand::List { status } => {
                dlp_cli::commands::download::list(server_url, status).await
            }
        },

        Commands::Tasks { command } => match command {
            TasksCommand::Get { id } => dlp_cli::commands::tasks::get(server_url, id).await,
            TasksCommand::List { task_type, status } => {
                dlp_cli::commands::tasks::list(server_url, task_type, status).await
            }
        },
    }
}

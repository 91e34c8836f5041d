//! DLP CLI Library
//!
//! Operator command line for the DLP server: server status, raw index
//! queries, and download-job management.

pub mod api;
pub mod commands;
pub mod error;

pub use error::{CliError, Result};

use clap::{Parser, Subcommand};

/// DLP - digitized-document delivery platform CLI
#[derive(Parser)]
#[command(name = "dlp")]
#[command(about = "Operator CLI for the DLP server", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Server base URL (overrides DLP_SERVER_URL)
    #[arg(long, global = true)]
    pub server_url: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print help as markdown (for documentation generation)
    #[arg(long, hide = true)]
    pub markdown_help: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Top-level commands
#[derive(Subcommand)]
pub enum Commands {
    /// Show server health and index statistics
    Status,

    /// Post a raw query to the search index
    Query {
        /// The index query, e.g. 'ISWORK:true'
        query: String,

        /// Maximum number of rows to return
        #[arg(short, long, default_value_t = 10)]
        count: i64,

        /// Fields to include in each document
        #[arg(short, long)]
        fields: Vec<String>,

        /// Sort field (may be given multiple times)
        #[arg(short, long)]
        sort: Vec<String>,

        /// Sort order: asc or desc
        #[arg(long, default_value = "asc")]
        order: String,
    },

    /// Manage PDF download jobs
    Download {
        #[command(subcommand)]
        command: DownloadCommand,
    },

    /// Inspect background record tasks
    Tasks {
        #[command(subcommand)]
        command: TasksCommand,
    },
}

/// Download job subcommands
#[derive(Subcommand)]
pub enum DownloadCommand {
    /// Request a PDF derivative for a record (idempotent)
    Request {
        /// Persistent identifier of the record
        pi: String,

        /// Logical division id; omit for the whole record
        #[arg(long)]
        log_id: Option<String>,

        /// Observer email notified when the derivative is ready
        #[arg(long)]
        email: Option<String>,

        /// Poll until the job finishes
        #[arg(long)]
        wait: bool,
    },

    /// Poll one download job by identifier
    Get {
        /// Job identifier (hash)
        identifier: String,
    },

    /// Fetch a finished derivative to a local file
    Fetch {
        /// Job identifier (hash)
        identifier: String,

        /// Output file path
        #[arg(short, long)]
        output: Option<String>,
    },

    /// List download jobs
    List {
        /// Filter by status (INITIALIZED, WAITING, READY, ERROR)
        #[arg(long)]
        status: Option<String>,
    },
}

/// Record task subcommands
#[derive(Subcommand)]
pub enum TasksCommand {
    /// Get one task by id
    Get {
        /// Task id (UUID)
        id: uuid::Uuid,
    },

    /// List tasks
    List {
        /// Filter by type (DELETE_RECORD, PRERENDER_PDF, INDEX_USAGE)
        #[arg(long)]
        task_type: Option<String>,

        /// Filter by state (QUEUED, RUNNING, DONE, FAILED)
        #[arg(long)]
        status: Option<String>,
    },
}

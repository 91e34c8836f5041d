//! Expired-job sweep
//!
//! Cron-driven cleanup: removes download-job rows whose TTL has elapsed
//! since their last request, together with their derivative files.

use apalis::prelude::*;

use crate::db::download_jobs;

use super::messages::SweepTick;
use super::{fail, WorkerContext};

/// Process one sweep tick
pub async fn process(tick: SweepTick, ctx: Data<WorkerContext>) -> Result<(), Error> {
    let rows = match download_jobs::delete_expired(&ctx.db).await {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!("expired-job sweep failed: {e}");
            return Err(fail(e));
        },
    };

    if rows.is_empty() {
        tracing::trace!(at = %tick.0, "sweep found no expired download jobs");
        return Ok(());
    }

    let mut files_removed = 0usize;
    for row in &rows {
        let path = ctx
            .config
            .downloads
            .download_dir
            .join(&row.kind)
            .join(format!("{}.{}", row.identifier, row.kind));

        match tokio::fs::remove_file(&path).await {
            Ok(()) => files_removed += 1,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {},
            Err(e) => {
                tracing::warn!(identifier = %row.identifier, "failed to remove derivative: {e}");
            },
        }
    }

    tracing::info!(
        jobs = rows.len(),
        files = files_removed,
        "expired download jobs swept"
    );

    Ok(())
}

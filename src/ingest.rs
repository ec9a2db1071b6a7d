use std::path::PathBuf;

use anyhow::{Context, Result};
use reqwest::Client;
use sqlx::PgPool;
use tokio::{sync::mpsc, task, time::Instant};
use tracing::{info, warn};

use crate::fetch;
use crate::pg;
use crate::process::{self, TripRecord};

/// Everything one run needs besides the database pool.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub year: u16,
    pub month: u8,
    pub target_table: String,
    pub chunk_size: usize,
    pub download_dir: PathBuf,
}

/// Ingest one month of trip data. The first chunk replaces the destination
/// table; every chunk is appended. Returns the number of rows loaded.
pub async fn run(pool: &PgPool, cfg: RunConfig) -> Result<u64> {
    let url = fetch::urls::tripdata_url(cfg.year, cfg.month);
    info!(%url, "ingesting {}-{:02}", cfg.year, cfg.month);

    let client = Client::new();
    let archive = fetch::archives::download_archive(&client, &url, &cfg.download_dir).await?;

    // Decode on the blocking pool and insert chunks as they arrive. The
    // depth-1 channel keeps at most one chunk buffered ahead of the writer.
    let (tx, mut rx) = mpsc::channel::<Vec<TripRecord>>(1);
    let chunk_size = cfg.chunk_size;
    let decode_path = archive.clone();
    let decoder = task::spawn_blocking(move || -> Result<u64> {
        let mut reader = process::open_archive(&decode_path, chunk_size)?;
        while let Some(chunk) = reader.next_chunk()? {
            if tx.blocking_send(chunk).is_err() {
                // receiver gone; the writer's error surfaces on the other side
                break;
            }
        }
        Ok(reader.total_rows())
    });

    let mut first = true;
    let mut inserted: u64 = 0;
    while let Some(chunk) = rx.recv().await {
        if first {
            pg::replace_table(pool, &cfg.target_table).await?;
            info!(table = %cfg.target_table, "table created");
            first = false;
        }
        let start = Instant::now();
        let rows = pg::append_chunk(pool, &cfg.target_table, &chunk).await?;
        inserted += rows;
        info!(rows, total = inserted, elapsed = ?start.elapsed(), "chunk inserted");
    }

    let decoded = decoder.await.context("decoder task panicked")??;
    if decoded != inserted {
        warn!(decoded, inserted, "row count mismatch between decode and insert");
    }

    if let Err(e) = tokio::fs::remove_file(&archive).await {
        warn!("failed to delete {}: {}", archive.display(), e);
    } else {
        info!("deleted archive {}", archive.display());
    }

    if first {
        info!("source contained no rows; nothing loaded");
    } else {
        let count = pg::count_rows(pool, &cfg.target_table).await?;
        info!(count, table = %cfg.target_table, "load complete");
    }

    Ok(inserted)
}

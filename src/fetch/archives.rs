use anyhow::{Context, Result};
use futures_util::StreamExt;
use reqwest::Client;
use std::path::{Path, PathBuf};
use tokio::{fs, io::AsyncWriteExt, time::Instant};
use tracing::info;
use url::Url;

/// Download the archive at `url_str` and save it under `dest_dir` using the
/// original filename. Returns the full path of the saved file.
pub async fn download_archive(
    client: &Client,
    url_str: &str,
    dest_dir: impl AsRef<Path>,
) -> Result<PathBuf> {
    let dest_dir = dest_dir.as_ref();
    let url = Url::parse(url_str)?;
    let filename = url
        .path_segments()
        .and_then(|segments| segments.last())
        .filter(|name| !name.is_empty())
        .unwrap_or("download.csv.gz");
    let dest_path = dest_dir.join(filename);

    if let Some(parent) = dest_path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let start = Instant::now();
    let resp = client.get(url.as_str()).send().await?.error_for_status()?;

    let mut file = fs::File::create(&dest_path)
        .await
        .with_context(|| format!("creating {}", dest_path.display()))?;
    let mut stream = resp.bytes_stream();
    let mut bytes_written: u64 = 0;
    while let Some(piece) = stream.next().await {
        let piece = piece?;
        file.write_all(&piece).await?;
        bytes_written += piece.len() as u64;
    }
    file.flush().await?;

    info!(
        bytes = bytes_written,
        elapsed = ?start.elapsed(),
        "downloaded {}",
        dest_path.display()
    );
    Ok(dest_path)
}

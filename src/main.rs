use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use taxiloader::{ingest, pg};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// Load one month of NYC yellow-taxi trip records into PostgreSQL.
#[derive(Parser)]
#[command(name = "taxiloader", version)]
#[command(about = "Load one month of NYC yellow-taxi trip records into PostgreSQL")]
struct Cli {
    /// Database user
    #[arg(long, default_value = "root")]
    pg_user: String,

    /// Database password
    #[arg(long, default_value = "root")]
    pg_pass: String,

    /// Database host
    #[arg(long, default_value = "localhost")]
    pg_host: String,

    /// Database port
    #[arg(long, default_value_t = 5432)]
    pg_port: u16,

    /// Database name
    #[arg(long, default_value = "ny_taxi")]
    pg_db: String,

    /// Year of the archive to load
    #[arg(long, default_value_t = 2021)]
    year: u16,

    /// Month of the archive to load
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=12))]
    month: u8,

    /// Destination table
    #[arg(long, default_value = "yellow_taxi_data")]
    target_table: String,

    /// Rows per chunk
    #[arg(long, default_value_t = 100_000)]
    chunk_size: usize,

    /// Directory the archive is downloaded into
    #[arg(long, default_value = "downloads")]
    download_dir: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ─── init logging ────────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    // ─── connect destination ─────────────────────────────────────────
    let opts = pg::DbOpts {
        user: cli.pg_user,
        password: cli.pg_pass,
        host: cli.pg_host,
        port: cli.pg_port,
        dbname: cli.pg_db,
    };
    let pool = pg::connect(&opts).await?;

    // ─── run the pipeline ────────────────────────────────────────────
    let total = ingest::run(
        &pool,
        ingest::RunConfig {
            year: cli.year,
            month: cli.month,
            target_table: cli.target_table,
            chunk_size: cli.chunk_size,
            download_dir: cli.download_dir,
        },
    )
    .await?;

    info!(rows = total, "all done");
    Ok(())
}

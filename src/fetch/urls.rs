// src/fetch/urls.rs

/// Monthly yellow-taxi archives, mirrored as GitHub release assets.
pub const DATASET_PREFIX: &str =
    "https://github.com/DataTalksClub/nyc-tlc-data/releases/download/yellow/";

/// Build the archive URL for one month of trip data.
pub fn tripdata_url(year: u16, month: u8) -> String {
    format!(
        "{}yellow_tripdata_{}-{:02}.csv.gz",
        DATASET_PREFIX, year, month
    )
}

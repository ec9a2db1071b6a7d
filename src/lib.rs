//! Loader for the NYC TLC yellow-taxi trip-record dataset.
//!
//! Downloads one month of the published `.csv.gz` archive, decodes it in
//! fixed-size row chunks against the fixed column layout, and loads it into
//! a PostgreSQL table (replace on the first chunk, append thereafter).

pub mod fetch;
pub mod ingest;
pub mod pg;
pub mod process;
pub mod schema;

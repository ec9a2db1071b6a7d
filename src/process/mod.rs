pub mod chunk;
pub mod date_parser;
pub mod record;

pub use chunk::{open_archive, ChunkedTripReader};
pub use record::TripRecord;

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::{ensure, Context, Result};
use flate2::read::GzDecoder;

use crate::process::record::TripRecord;
use crate::schema;

/// Streaming reader that yields trip rows in bounded chunks.
///
/// The header is read and checked against the fixed column layout once, on
/// construction; a row that fails to decode ends the run.
pub struct ChunkedTripReader<R: Read> {
    reader: csv::Reader<R>,
    chunk_rows: usize,
    total_rows: u64,
}

impl<R: Read> ChunkedTripReader<R> {
    pub fn new(source: R, chunk_rows: usize) -> Result<Self> {
        ensure!(chunk_rows > 0, "chunk size must be nonzero");
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(source);
        let header = reader.headers().context("reading CSV header")?;
        schema::check_header(header)?;
        Ok(Self {
            reader,
            chunk_rows,
            total_rows: 0,
        })
    }

    /// Read up to `chunk_rows` rows; `None` once the source is exhausted.
    pub fn next_chunk(&mut self) -> Result<Option<Vec<TripRecord>>> {
        let mut rows = Vec::with_capacity(self.chunk_rows);
        for result in self.reader.deserialize::<TripRecord>() {
            let row = result.with_context(|| {
                format!("decoding data row {}", self.total_rows + rows.len() as u64 + 1)
            })?;
            rows.push(row);
            if rows.len() >= self.chunk_rows {
                break;
            }
        }
        if rows.is_empty() {
            return Ok(None);
        }
        self.total_rows += rows.len() as u64;
        Ok(Some(rows))
    }

    /// Rows yielded so far.
    pub fn total_rows(&self) -> u64 {
        self.total_rows
    }
}

/// Open a gzipped monthly archive as a chunked reader.
pub fn open_archive(
    path: &Path,
    chunk_rows: usize,
) -> Result<ChunkedTripReader<GzDecoder<BufReader<File>>>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    ChunkedTripReader::new(GzDecoder::new(BufReader::new(file)), chunk_rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::TRIP_COLUMNS;
    use anyhow::Result;
    use flate2::{write::GzEncoder, Compression};
    use std::io::{Cursor, Write};

    fn header() -> String {
        TRIP_COLUMNS
            .iter()
            .map(|(name, _)| *name)
            .collect::<Vec<_>>()
            .join(",")
    }

    fn sample_csv(rows: usize) -> String {
        let mut csv = header();
        csv.push('\n');
        for i in 0..rows {
            csv.push_str(&format!(
                "1,2021-01-01 00:30:{:02},2021-01-01 00:40:{:02},1,2.10,1,N,142,43,2,\
                 8.0,3.0,0.5,0.0,0.0,0.3,11.8,2.5\n",
                i % 60,
                i % 60
            ));
        }
        csv
    }

    #[test]
    fn chunks_are_bounded_with_remainder_last() -> Result<()> {
        let mut reader = ChunkedTripReader::new(Cursor::new(sample_csv(5)), 2)?;
        assert_eq!(reader.next_chunk()?.unwrap().len(), 2);
        assert_eq!(reader.next_chunk()?.unwrap().len(), 2);
        assert_eq!(reader.next_chunk()?.unwrap().len(), 1);
        assert!(reader.next_chunk()?.is_none());
        assert_eq!(reader.total_rows(), 5);
        Ok(())
    }

    #[test]
    fn header_only_source_yields_no_chunks() -> Result<()> {
        let mut reader = ChunkedTripReader::new(Cursor::new(sample_csv(0)), 100)?;
        assert!(reader.next_chunk()?.is_none());
        assert_eq!(reader.total_rows(), 0);
        Ok(())
    }

    #[test]
    fn unexpected_header_is_rejected() {
        let data = "a,b,c\n1,2,3\n";
        assert!(ChunkedTripReader::new(Cursor::new(data), 10).is_err());
    }

    #[test]
    fn zero_chunk_size_is_rejected() {
        assert!(ChunkedTripReader::new(Cursor::new(sample_csv(1)), 0).is_err());
    }

    #[test]
    fn reads_a_gzipped_archive() -> Result<()> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(sample_csv(3).as_bytes())?;
        let gz = encoder.finish()?;

        let tmp = tempfile::NamedTempFile::new()?;
        std::fs::write(tmp.path(), &gz)?;

        let mut reader = open_archive(tmp.path(), 2)?;
        let mut total = 0;
        while let Some(chunk) = reader.next_chunk()? {
            total += chunk.len();
        }
        assert_eq!(total, 3);
        Ok(())
    }
}

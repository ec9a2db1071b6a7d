use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer};

use crate::process::date_parser::parse_naive_datetime;

/// One yellow-taxi trip row as published in the monthly CSV. Every field is
/// nullable; empty CSV fields decode to `None`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TripRecord {
    #[serde(rename = "VendorID")]
    pub vendor_id: Option<i64>,
    #[serde(
        rename = "tpep_pickup_datetime",
        deserialize_with = "naive_datetime_opt"
    )]
    pub pickup_datetime: Option<NaiveDateTime>,
    #[serde(
        rename = "tpep_dropoff_datetime",
        deserialize_with = "naive_datetime_opt"
    )]
    pub dropoff_datetime: Option<NaiveDateTime>,
    pub passenger_count: Option<i64>,
    pub trip_distance: Option<f64>,
    #[serde(rename = "RatecodeID")]
    pub ratecode_id: Option<i64>,
    pub store_and_fwd_flag: Option<String>,
    #[serde(rename = "PULocationID")]
    pub pu_location_id: Option<i64>,
    #[serde(rename = "DOLocationID")]
    pub do_location_id: Option<i64>,
    pub payment_type: Option<i64>,
    pub fare_amount: Option<f64>,
    pub extra: Option<f64>,
    pub mta_tax: Option<f64>,
    pub tip_amount: Option<f64>,
    pub tolls_amount: Option<f64>,
    pub improvement_surcharge: Option<f64>,
    pub total_amount: Option<f64>,
    pub congestion_surcharge: Option<f64>,
}

/// Decode an optional timestamp field, mapping empty to `None` and anything
/// the fixed-layout parser rejects to a decode error.
fn naive_datetime_opt<'de, D>(de: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(de)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => parse_naive_datetime(s)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{}'", s))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::TRIP_COLUMNS;

    fn header() -> String {
        TRIP_COLUMNS
            .iter()
            .map(|(name, _)| *name)
            .collect::<Vec<_>>()
            .join(",")
    }

    fn read_one(row: &str) -> csv::Result<TripRecord> {
        let data = format!("{}\n{}\n", header(), row);
        let mut reader = csv::Reader::from_reader(data.as_bytes());
        reader.deserialize().next().unwrap()
    }

    #[test]
    fn decodes_a_full_row() {
        let row = read_one(
            "1,2021-01-01 00:30:10,2021-01-01 00:36:12,1,2.10,1,N,142,43,2,\
             8.0,3.0,0.5,0.0,0.0,0.3,11.8,2.5",
        )
        .unwrap();
        assert_eq!(row.vendor_id, Some(1));
        assert_eq!(
            row.pickup_datetime.unwrap(),
            parse_naive_datetime("2021-01-01 00:30:10").unwrap()
        );
        assert_eq!(row.trip_distance, Some(2.10));
        assert_eq!(row.store_and_fwd_flag.as_deref(), Some("N"));
        assert_eq!(row.congestion_surcharge, Some(2.5));
    }

    #[test]
    fn empty_fields_decode_to_none() {
        let row = read_one(&",".repeat(TRIP_COLUMNS.len() - 1)).unwrap();
        assert_eq!(row.vendor_id, None);
        assert_eq!(row.pickup_datetime, None);
        assert_eq!(row.store_and_fwd_flag, None);
        assert_eq!(row.total_amount, None);
    }

    #[test]
    fn malformed_timestamp_is_an_error() {
        let result = read_one(
            "1,not-a-date,2021-01-01 00:36:12,1,2.10,1,N,142,43,2,\
             8.0,3.0,0.5,0.0,0.0,0.3,11.8,2.5",
        );
        assert!(result.is_err());
    }
}

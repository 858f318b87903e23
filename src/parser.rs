//! CSV loaders for the menu catalog and per-person rating series.
//!
//! Both formats carry a header row, which is skipped without validation.
//! Any malformed row aborts the load.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use tracing::debug;

use crate::error::ReportError;
use crate::model::{Catalog, Item, Rating};
use crate::stats::MAX_SCALE;

const CATALOG_FIELDS: usize = 2;
const RATING_FIELDS: usize = 4;

/// Date layout used in rating files.
const DATE_FORMAT: &str = "%Y%m%d";

/// Opens and parses the catalog at `path`.
pub fn load_catalog(path: &Path) -> Result<Catalog, ReportError> {
    let file = File::open(path).map_err(|e| ReportError::io(path, e))?;
    read_catalog(file, &path.display().to_string())
}

/// Parses `(number, name)` records into a [`Catalog`], keeping file order.
#[tracing::instrument(skip(rdr))]
pub fn read_catalog<R: Read>(rdr: R, origin: &str) -> Result<Catalog, ReportError> {
    let mut items = Vec::new();

    for (line, record) in read_records(rdr, origin, CATALOG_FIELDS)? {
        let number = parse_int(origin, line, "item number", &record[0])?;
        items.push(Item::new(number, &record[1]));
    }

    debug!(items = items.len(), "Catalog loaded");
    Ok(Catalog::new(items))
}

/// Opens and parses one person's rating series at `path`.
pub fn load_ratings(path: &Path) -> Result<Vec<Rating>, ReportError> {
    let file = File::open(path).map_err(|e| ReportError::io(path, e))?;
    read_ratings(file, &path.display().to_string())
}

/// Parses `(number, date, value, max)` records in file order.
///
/// The order is the person's visit order and must not be changed by callers.
#[tracing::instrument(skip(rdr))]
pub fn read_ratings<R: Read>(rdr: R, origin: &str) -> Result<Vec<Rating>, ReportError> {
    let mut ratings = Vec::new();

    for (line, record) in read_records(rdr, origin, RATING_FIELDS)? {
        let number = parse_int(origin, line, "item number", &record[0])?;
        let date = parse_date(origin, line, &record[1])?;
        let value = parse_float(origin, line, "value", &record[2])?;
        let max = parse_float(origin, line, "max", &record[3])?;
        if max > MAX_SCALE {
            return Err(invalid(
                origin,
                line,
                "max",
                &record[3],
                format!("rating scale above {MAX_SCALE}"),
            ));
        }

        ratings.push(Rating::new(number, date, value, max));
    }

    debug!(ratings = ratings.len(), "Rating series loaded");
    Ok(ratings)
}

/// Reads every data record, checking the field count of each.
fn read_records<R: Read>(
    rdr: R,
    origin: &str,
    expected: usize,
) -> Result<Vec<(u64, StringRecord)>, ReportError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true) // field counts are checked below
        .from_reader(rdr);

    let mut records = Vec::new();

    for result in reader.records() {
        let record = result.map_err(|source| ReportError::Csv {
            origin: origin.to_string(),
            source,
        })?;
        let line = record.position().map_or(0, |p| p.line());

        if record.len() != expected {
            return Err(ReportError::MalformedRecord {
                origin: origin.to_string(),
                line,
                expected,
                found: record.len(),
            });
        }

        records.push((line, record));
    }

    Ok(records)
}

fn parse_int(origin: &str, line: u64, field: &'static str, raw: &str) -> Result<i64, ReportError> {
    raw.parse()
        .map_err(|e: std::num::ParseIntError| invalid(origin, line, field, raw, e.to_string()))
}

fn parse_float(origin: &str, line: u64, field: &'static str, raw: &str) -> Result<f64, ReportError> {
    raw.parse()
        .map_err(|e: std::num::ParseFloatError| invalid(origin, line, field, raw, e.to_string()))
}

/// An empty token means the visit date is unknown.
fn parse_date(origin: &str, line: u64, raw: &str) -> Result<Option<NaiveDate>, ReportError> {
    if raw.is_empty() {
        return Ok(None);
    }

    if raw.len() != 8 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid(origin, line, "date", raw, "expected YYYYMMDD".to_string()));
    }

    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map(Some)
        .map_err(|e| invalid(origin, line, "date", raw, e.to_string()))
}

fn invalid(origin: &str, line: u64, field: &'static str, raw: &str, reason: String) -> ReportError {
    ReportError::InvalidField {
        origin: origin.to_string(),
        line,
        field,
        value: raw.to_string(),
        reason,
    }
}

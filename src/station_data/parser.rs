//! Parsing of the fixed-width station data text format.
//!
//! A station file opens with free-text metadata lines (one of which carries
//! the coordinates), then two column-header lines, then whitespace-aligned
//! data rows:
//!
//! ```text
//! Ballypatrick Forest
//! Location 3147E 4296N, Lat 55.181 Lon -6.153, 156 metres amsl
//!    yyyy  mm      tmax    tmin      af    rain     sun
//!               degC    degC    days      mm   hours
//!    1961   1      6.3     1.8       9   114.6    47.0
//! ```
//!
//! Column boundaries are not published anywhere, so they are inferred from
//! the whitespace alignment of the leading data rows.

use crate::station_data::error::StationDataError;
use crate::types::{MonthlyRecord, StationDataset};
use log::warn;
use regex::Regex;
use std::fmt::Display;
use std::str::FromStr;
use std::sync::LazyLock;

/// Coordinates appear on a metadata line as signed decimals after the "Lat"
/// and "Lon" labels.
static LAT_LON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Lat\s+(-?\d+\.\d+).*Lon\s+(-?\d+\.\d+)").expect("hard-coded pattern compiles")
});

/// Number of leading data rows sampled when inferring column boundaries.
const INFER_ROWS: usize = 200;

/// Column labels from the first header line, used in parse warnings.
const COLUMNS: [&str; 7] = ["yyyy", "mm", "tmax", "tmin", "af", "rain", "sun"];

/// Parses the raw text of a station data file.
///
/// The returned dataset carries no station name; the caller tags it once the
/// name is known.
///
/// # Errors
///
/// [`StationDataError::MissingUnitsHeader`] when the `degC` units line does
/// not follow the `yyyy` column-header line (or the file ends before it):
/// the layout has changed, or the text is not a station data file at all.
/// Individual fields that fail numeric conversion are logged and left
/// absent, never failing the whole file.
pub fn parse_station_text(text: &str) -> Result<StationDataset, StationDataError> {
    let mut lines = text.lines();
    let mut latitude = None;
    let mut longitude = None;

    // Header scan. Coordinates may sit on any line before the column
    // headers; the last match wins.
    for line in lines.by_ref() {
        if line.trim_start().starts_with("yyyy") {
            break;
        }
        if let Some(captures) = LAT_LON.captures(line) {
            latitude = captures[1].parse().ok();
            longitude = captures[2].parse().ok();
        }
    }

    // Second column-header line, the structural sanity check. Reaching the
    // end of input here means the yyyy marker never appeared either.
    let units = lines.next().ok_or(StationDataError::MissingUnitsHeader)?;
    if !units.contains("degC") {
        return Err(StationDataError::MissingUnitsHeader);
    }

    let rows: Vec<&str> = lines.filter(|line| !line.trim().is_empty()).collect();
    let spans = infer_column_spans(&rows, INFER_ROWS);

    let records = rows
        .iter()
        .filter_map(|row| parse_row(row, &spans))
        .collect();

    Ok(StationDataset {
        station: String::new(),
        latitude,
        longitude,
        records,
    })
}

/// One data row against the inferred spans. Rows without a parseable year or
/// month cannot become a record and are skipped with a warning; every other
/// conversion failure just leaves that field absent.
fn parse_row(row: &str, spans: &[(usize, usize)]) -> Option<MonthlyRecord> {
    let field = |index: usize| {
        spans
            .get(index)
            .map_or("", |&(start, end)| slice_span(row, start, end))
    };

    let Some(year) = convert_field::<i32>(field(0), COLUMNS[0]) else {
        warn!("skipping row without a parseable year: {:?}", row.trim());
        return None;
    };
    let Some(month) = convert_field::<u32>(field(1), COLUMNS[1]) else {
        warn!("skipping row without a parseable month: {:?}", row.trim());
        return None;
    };

    Some(MonthlyRecord {
        station: String::new(),
        year,
        month,
        max_temp_c: convert_field(field(2), COLUMNS[2]),
        min_temp_c: convert_field(field(3), COLUMNS[3]),
        air_frost_days: convert_field(field(4), COLUMNS[4]),
        rainfall_mm: convert_field(field(5), COLUMNS[5]),
        sunshine_hours: convert_field(field(6), COLUMNS[6]),
    })
}

/// The boundary where a field's parse failure is logged and discarded into
/// "absent". Partial rows must not abort an otherwise-valid multi-decade
/// file.
fn convert_field<T: FromStr>(raw: &str, column: &str) -> Option<T>
where
    T::Err: Display,
{
    match parse_field(raw) {
        Ok(value) => value,
        Err(e) => {
            warn!(
                "{}: cannot parse {:?}: {}, treating as missing",
                column, raw, e
            );
            None
        }
    }
}

/// Best-effort numeric conversion for one raw field value.
///
/// Trailing provisional/accumulated markers (`*`, `a`, `$`) are stripped
/// before conversion. An empty result or a missing-value sentinel (`-`,
/// `--`, `---`) is `Ok(None)`; anything else must parse as `T`.
fn parse_field<T: FromStr>(raw: &str) -> Result<Option<T>, T::Err> {
    let cleaned = raw.trim().trim_end_matches(['a', '*', '$']).trim();
    if matches!(cleaned, "" | "-" | "--" | "---") {
        return Ok(None);
    }
    cleaned.parse().map(Some)
}

/// Infers column boundaries from whitespace alignment.
///
/// Samples up to `sample` leading rows; a character position belongs to a
/// column when any sampled row has a non-space character there (rows shorter
/// than the position count as space). Spans are the contiguous runs of such
/// positions. Later rows wider than the sample are truncated at the last
/// span, like any other overflow past an inferred column.
fn infer_column_spans(rows: &[&str], sample: usize) -> Vec<(usize, usize)> {
    let sampled = &rows[..rows.len().min(sample)];
    let width = sampled.iter().map(|row| row.len()).max().unwrap_or(0);

    let mut filled = vec![false; width];
    for row in sampled {
        for (i, byte) in row.bytes().enumerate() {
            if !byte.is_ascii_whitespace() {
                filled[i] = true;
            }
        }
    }

    let mut spans = Vec::new();
    let mut start = None;
    for (i, &occupied) in filled.iter().enumerate() {
        match (occupied, start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                spans.push((s, i));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        spans.push((s, width));
    }
    spans
}

/// Slices a row by an inferred span, tolerating rows shorter than the span.
fn slice_span(row: &str, start: usize, end: usize) -> &str {
    let end = end.min(row.len());
    if start >= end {
        return "";
    }
    row.get(start..end).unwrap_or("")
}

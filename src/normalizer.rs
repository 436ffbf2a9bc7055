// 🧹 Row Normalizer - CSV record → normalized location row
// Columns are matched by header name; malformed cells degrade to blanks, never errors.

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

// ============================================================================
// RAW ROW (as exported from the sheet)
// ============================================================================

/// One record of the sheet export. Every column is optional: a missing column
/// and an empty cell both read as `None`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRow {
    #[serde(rename = "Código", default)]
    pub code: Option<String>,

    #[serde(rename = "Nome", default)]
    pub city: Option<String>,

    #[serde(rename = "Estado", default)]
    pub state: Option<String>,

    #[serde(rename = "País", default)]
    pub country: Option<String>,

    #[serde(rename = "Latitude", default)]
    pub latitude: Option<String>,

    #[serde(rename = "Longitude", default)]
    pub longitude: Option<String>,
}

/// Decode delimited text with a header row into raw rows
pub fn parse_rows(csv_text: &str) -> Result<Vec<RawRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(csv_text.as_bytes());

    let mut rows = Vec::new();
    for (index, result) in rdr.deserialize().enumerate() {
        let row: RawRow =
            result.with_context(|| format!("Failed to decode CSV record {}", index + 1))?;
        rows.push(row);
    }

    Ok(rows)
}

// ============================================================================
// NORMALIZED ROW
// ============================================================================

/// A row that has all three names; coordinates are textual numeric literals
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationRow {
    pub city: String,
    pub state: String,
    pub country: String,
    pub code: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
}

/// Trim and uppercase; missing text is blank
pub fn normalize_text(value: Option<&str>) -> String {
    value.map(|v| v.trim().to_uppercase()).unwrap_or_default()
}

/// Decimal comma → decimal point, then trim. Not validated: `"abc"` stays `"abc"`.
pub fn normalize_decimal(value: Option<&str>) -> Option<String> {
    let value = value?;
    if value.is_empty() {
        return None;
    }
    let cleaned = value.replace(',', ".").trim().to_string();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

pub fn normalize_code(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// `None` means the row is skipped: city, state and country names are all required
pub fn normalize_row(raw: &RawRow) -> Option<LocationRow> {
    let city = normalize_text(raw.city.as_deref());
    let state = normalize_text(raw.state.as_deref());
    let country = normalize_text(raw.country.as_deref());

    if city.is_empty() || state.is_empty() || country.is_empty() {
        debug!(?raw, "skipping row without city/state/country");
        return None;
    }

    Some(LocationRow {
        city,
        state,
        country,
        code: normalize_code(raw.code.as_deref()),
        latitude: normalize_decimal(raw.latitude.as_deref()),
        longitude: normalize_decimal(raw.longitude.as_deref()),
    })
}

use std::io::Read;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::db::Database;
use crate::models::{NewSample, normalize_tags, validate_body_fat_pct, validate_weight_kg};
use crate::units::{WeightUnit, to_kg};

/// A single row parsed from a weight spreadsheet export.
#[derive(Debug, Clone)]
pub struct CsvRow {
    pub line: usize,
    pub date: String,
    pub weight: String,
    pub unit: Option<String>,
    pub body_fat_pct: Option<f64>,
    pub notes: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportSummary {
    pub rows_parsed: usize,
    pub samples_imported: usize,
    pub skipped: usize,
    pub dry_run: bool,
}

fn field(record: &csv::StringRecord, idx: Option<usize>) -> &str {
    idx.and_then(|i| record.get(i)).unwrap_or("")
}

/// Parse a weight CSV from any reader.
///
/// Required columns: `Date`, `Weight`. Optional: `Unit`, `Body Fat`, `Notes`,
/// `Tags` (`;`-separated). Header matching is case-insensitive.
pub fn parse_samples_csv<R: Read>(reader: R) -> Result<Vec<CsvRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers().context("Failed to read CSV headers")?.clone();

    let col =
        |name: &str| -> Option<usize> { headers.iter().position(|h| h.eq_ignore_ascii_case(name)) };

    let idx_date = col("Date").context("Missing required column: Date")?;
    let idx_weight = col("Weight").context("Missing required column: Weight")?;
    let idx_unit = col("Unit");
    let idx_fat = col("Body Fat").or_else(|| col("Body Fat (%)"));
    let idx_notes = col("Notes");
    let idx_tags = col("Tags");

    let mut rows = Vec::new();

    for (line_num, result) in rdr.records().enumerate() {
        let line = line_num + 2;
        let record = result.with_context(|| format!("Failed to parse CSV row {line}"))?;

        let date = field(&record, Some(idx_date)).to_string();
        let weight = field(&record, Some(idx_weight)).to_string();
        if date.is_empty() || weight.is_empty() {
            continue; // skip blank rows
        }

        let unit = Some(field(&record, idx_unit).to_string()).filter(|u| !u.is_empty());
        let body_fat_pct = field(&record, idx_fat).trim_end_matches('%').trim().parse::<f64>().ok();
        let tags = field(&record, idx_tags)
            .split(';')
            .map(str::to_string)
            .collect();

        rows.push(CsvRow {
            line,
            date,
            weight,
            unit,
            body_fat_pct,
            notes: field(&record, idx_notes).to_string(),
            tags,
        });
    }

    Ok(rows)
}

/// Parse an import timestamp.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM[:SS]`, `YYYY-MM-DD` and `M/D/YYYY`.
/// Dates and naive times are read in `tz`; date-only values are placed at
/// local midnight.
pub fn parse_timestamp<Tz: TimeZone>(value: &str, tz: &Tz) -> Result<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.with_timezone(&Utc));
    }
    let naive = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            ["%Y-%m-%d", "%m/%d/%Y"]
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        });
    let Some(naive) = naive else {
        bail!("Cannot parse date: '{value}'");
    };
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|ts| ts.with_timezone(&Utc))
        .with_context(|| format!("'{value}' does not exist in the local time zone"))
}

fn row_to_sample<Tz: TimeZone>(
    row: &CsvRow,
    user_id: &str,
    default_unit: WeightUnit,
    tz: &Tz,
) -> Result<NewSample> {
    let unit = match &row.unit {
        Some(u) => u.parse::<WeightUnit>()?,
        None => default_unit,
    };
    let weight: f64 = row
        .weight
        .parse()
        .with_context(|| format!("Invalid weight '{}'", row.weight))?;
    let weight_kg = to_kg(weight, unit);
    validate_weight_kg(weight_kg)?;
    if let Some(pct) = row.body_fat_pct {
        validate_body_fat_pct(pct)?;
    }

    let mut sample = NewSample::new(user_id, weight_kg, parse_timestamp(&row.date, tz)?);
    sample.body_fat_pct = row.body_fat_pct;
    sample.tags = normalize_tags(&row.tags);
    sample.notes.clone_from(&row.notes);
    Ok(sample)
}

/// Validate parsed rows and store them. Invalid rows are skipped and counted,
/// never partially written.
pub fn import_samples<Tz: TimeZone>(
    db: &Database,
    user_id: &str,
    rows: &[CsvRow],
    default_unit: WeightUnit,
    tz: &Tz,
    dry_run: bool,
) -> Result<ImportSummary> {
    let mut summary = ImportSummary {
        rows_parsed: rows.len(),
        dry_run,
        ..ImportSummary::default()
    };

    for row in rows {
        let sample = match row_to_sample(row, user_id, default_unit, tz) {
            Ok(s) => s,
            Err(e) => {
                warn!(line = row.line, error = %e, "skipping import row");
                summary.skipped += 1;
                continue;
            }
        };
        if !dry_run {
            db.insert_sample(&sample)?;
        }
        summary.samples_imported += 1;
    }

    info!(
        imported = summary.samples_imported,
        skipped = summary.skipped,
        dry_run,
        "csv import finished"
    );
    Ok(summary)
}

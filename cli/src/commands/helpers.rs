use anyhow::{Context, Result, bail};
use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::Serialize;

use weighin_core::goal::TrackStatus;

pub(crate) fn parse_date(date_str: Option<String>) -> Result<NaiveDate> {
    match date_str {
        None => Ok(Local::now().date_naive()),
        Some(s) => match s.as_str() {
            "today" => Ok(Local::now().date_naive()),
            "yesterday" => Ok(Local::now().date_naive() - chrono::Duration::days(1)),
            "tomorrow" => Ok(Local::now().date_naive() + chrono::Duration::days(1)),
            _ => NaiveDate::parse_from_str(&s, "%Y-%m-%d").with_context(|| {
                format!("Invalid date '{s}'. Use YYYY-MM-DD or today/yesterday/tomorrow")
            }),
        },
    }
}

/// Parse `HH:MM` or `HH:MM:SS`.
pub(crate) fn parse_time(s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .with_context(|| format!("Invalid time '{s}'. Use HH:MM or HH:MM:SS"))
}

/// Resolve a local date and time of day to an instant. Missing parts default
/// to the current local date/time.
pub(crate) fn resolve_timestamp<Tz: TimeZone>(
    tz: &Tz,
    date: Option<NaiveDate>,
    time: Option<NaiveTime>,
) -> Result<DateTime<Utc>> {
    if date.is_none() && time.is_none() {
        return Ok(Utc::now());
    }
    let now = Utc::now().with_timezone(tz).naive_local();
    let naive = date
        .unwrap_or(now.date())
        .and_time(time.unwrap_or(now.time()));
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|ts| ts.with_timezone(&Utc))
        .with_context(|| format!("{naive} does not exist in the local time zone"))
}

/// Parse `YYYY-MM`. `None` means the current month.
pub(crate) fn parse_month(s: Option<&str>) -> Result<(i32, u32)> {
    let Some(s) = s else {
        let today = Local::now().date_naive();
        return Ok((today.year(), today.month()));
    };
    let (year, month) = s
        .split_once('-')
        .with_context(|| format!("Invalid month '{s}'. Use YYYY-MM"))?;
    let year: i32 = year
        .parse()
        .with_context(|| format!("Invalid year in '{s}'"))?;
    let month: u32 = month
        .parse()
        .with_context(|| format!("Invalid month in '{s}'"))?;
    if !(1..=12).contains(&month) {
        bail!("Month must be between 1 and 12, got {month}");
    }
    Ok((year, month))
}

pub(crate) fn status_label(status: TrackStatus) -> &'static str {
    match status {
        TrackStatus::OnTrack => "on track",
        TrackStatus::OffTrack => "off track",
        TrackStatus::Neutral => "",
    }
}

pub(crate) fn json_error(message: &str) -> String {
    #[derive(Serialize)]
    struct CliError<'a> {
        error: &'a str,
    }
    serde_json::to_string(&CliError { error: message })
        .unwrap_or_else(|_| format!("{{\"error\":\"{message}\"}}"))
}

pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let end = s.char_indices().nth(max - 3).map_or(s.len(), |(i, _)| i);
        format!("{}...", &s[..end])
    }
}

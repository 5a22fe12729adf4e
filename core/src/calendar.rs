//! Calendar bucketing: Sunday-anchored weeks, calendar months and years.
//!
//! Every boundary used by the aggregators is computed here. All arithmetic is
//! checked; a boundary that cannot be represented comes back as `None` and the
//! caller renders an empty bucket instead of failing.

use chrono::{DateTime, Datelike, Days, Month, NaiveDate, TimeZone, Utc};
use serde::Serialize;

pub const DAYS_PER_WEEK: u64 = 7;

/// Half-open interval `[start, end)` of local calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    #[must_use]
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// The Sunday-aligned week containing `date`.
    #[must_use]
    pub fn week_of(date: NaiveDate) -> Option<Self> {
        let start = week_start(date)?;
        let end = start.checked_add_days(Days::new(DAYS_PER_WEEK))?;
        Some(Self { start, end })
    }

    #[must_use]
    pub fn month(year: i32, month: u32) -> Option<Self> {
        let start = NaiveDate::from_ymd_opt(year, month, 1)?;
        let end = if month == 12 {
            NaiveDate::from_ymd_opt(year.checked_add(1)?, 1, 1)?
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)?
        };
        Some(Self { start, end })
    }

    /// The calendar month containing `date`.
    #[must_use]
    pub fn month_of(date: NaiveDate) -> Option<Self> {
        Self::month(date.year(), date.month())
    }

    #[must_use]
    pub fn year(year: i32) -> Option<Self> {
        let start = NaiveDate::from_ymd_opt(year, 1, 1)?;
        let end = NaiveDate::from_ymd_opt(year.checked_add(1)?, 1, 1)?;
        Some(Self { start, end })
    }

    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }

    /// Last day inside the range (the inclusive end).
    #[must_use]
    pub fn last_day(&self) -> Option<NaiveDate> {
        self.end.pred_opt()
    }

    #[must_use]
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// The week immediately before this one, by calendar date.
    #[must_use]
    pub fn previous_week(&self) -> Option<Self> {
        let start = self.start.checked_sub_days(Days::new(DAYS_PER_WEEK))?;
        Some(Self {
            start,
            end: self.start,
        })
    }

    /// The smallest range covering both `self` and `other`.
    #[must_use]
    pub fn extend(&self, other: &DateRange) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Every Sunday-aligned week overlapping this range, in order.
    ///
    /// The first week may start before `start`; no week starts on or after
    /// `end`.
    #[must_use]
    pub fn weeks(&self) -> Vec<DateRange> {
        let mut weeks = Vec::new();
        if self.start >= self.end {
            return weeks;
        }
        let Some(mut current) = DateRange::week_of(self.start) else {
            return weeks;
        };
        while current.start < self.end {
            weeks.push(current);
            let Some(next_end) = current.end.checked_add_days(Days::new(DAYS_PER_WEEK)) else {
                break;
            };
            current = DateRange {
                start: current.end,
                end: next_end,
            };
        }
        weeks
    }
}

/// Sunday on or before `date`.
#[must_use]
pub fn week_start(date: NaiveDate) -> Option<NaiveDate> {
    let offset = date.weekday().num_days_from_sunday();
    date.checked_sub_days(Days::new(u64::from(offset)))
}

/// Calendar day of `timestamp` in the given time zone.
#[must_use]
pub fn local_day<Tz: TimeZone>(timestamp: &DateTime<Utc>, tz: &Tz) -> NaiveDate {
    timestamp.with_timezone(tz).date_naive()
}

/// 1-based row of `date` in a Sunday-first calendar grid of its month.
#[must_use]
pub fn week_of_month(date: NaiveDate) -> u32 {
    let first = date.with_day(1).unwrap_or(date);
    (date.day0() + first.weekday().num_days_from_sunday()) / 7 + 1
}

#[must_use]
pub fn month_name(date: NaiveDate) -> &'static str {
    u8::try_from(date.month())
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map_or("", |m| m.name())
}

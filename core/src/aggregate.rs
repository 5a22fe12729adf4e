//! Weekly, monthly and yearly weight aggregation.
//!
//! All three views share one pipeline: dedupe to one reading per local day,
//! slice the sorted readings by Sunday-aligned week, average each slice.
//! Averages are rounded to 2 decimals; deltas are taken between rounded
//! averages, rounded to 3 decimals and then to 2 for output.
//!
//! The single-week view always produces a row, even with no samples. The
//! month and year views drop empty weeks.

use chrono::{NaiveDate, TimeZone, Utc};
use serde::Serialize;
use tracing::debug;

use crate::calendar::{DateRange, month_name, week_of_month};
use crate::dedupe::{Reading, daily_readings, dedupe};
use crate::models::Sample;

pub const AVERAGE_DECIMALS: i32 = 2;
pub const DELTA_WORKING_DECIMALS: i32 = 3;

/// Aggregate for a single Sunday-aligned week.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklySummary {
    pub label: String,
    /// `None` only when the week boundary could not be computed.
    pub week: Option<DateRange>,
    pub average: Option<f64>,
    pub sample_count: usize,
    pub previous_average: Option<f64>,
    pub delta: Option<f64>,
}

impl WeeklySummary {
    fn empty(label: String, week: Option<DateRange>) -> Self {
        Self {
            label,
            week,
            average: None,
            sample_count: 0,
            previous_average: None,
            delta: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthWeek {
    /// Calendar position of the week within the month, starting at 1.
    pub number: u32,
    #[serde(flatten)]
    pub summary: WeeklySummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyView {
    pub year: i32,
    pub month: u32,
    pub weeks: Vec<MonthWeek>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearWeek {
    pub month_name: String,
    pub week_of_month: u32,
    #[serde(flatten)]
    pub summary: WeeklySummary,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeekDelta {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub delta: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearlyView {
    pub year: i32,
    pub weeks: Vec<YearWeek>,
    pub deltas: Vec<WeekDelta>,
    pub cut_weeks: usize,
    pub gain_weeks: usize,
    pub has_data: bool,
}

impl YearlyView {
    fn empty(year: i32) -> Self {
        Self {
            year,
            weeks: Vec::new(),
            deltas: Vec::new(),
            cut_weeks: 0,
            gain_weeks: 0,
            has_data: false,
        }
    }
}

/// Round half away from zero to `decimals` places.
#[must_use]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round() / factor
}

/// Signed change from `previous` to `current`; positive means weight went up.
#[must_use]
pub fn delta(current: f64, previous: f64) -> f64 {
    round_to(
        round_to(current - previous, DELTA_WORKING_DECIMALS),
        AVERAGE_DECIMALS,
    )
}

/// Rounded mean, kept inside the readings' min..max. Rounding to 2 decimals
/// could otherwise step past a bound that has more decimals.
#[allow(clippy::cast_precision_loss)]
fn mean(readings: &[Reading]) -> Option<f64> {
    if readings.is_empty() {
        return None;
    }
    let total: f64 = readings.iter().map(|r| r.weight_kg).sum();
    let (lo, hi) = readings
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), r| {
            (lo.min(r.weight_kg), hi.max(r.weight_kg))
        });
    let average = round_to(total / readings.len() as f64, AVERAGE_DECIMALS);
    Some(if lo <= hi { average.clamp(lo, hi) } else { average })
}

/// Readings whose day falls in `range`. `readings` must be sorted by day.
fn in_range<'a>(readings: &'a [Reading], range: &DateRange) -> &'a [Reading] {
    let lo = readings.partition_point(|r| r.day < range.start);
    let hi = readings.partition_point(|r| r.day < range.end);
    &readings[lo..hi]
}

fn delta_between(current: Option<f64>, previous: Option<f64>) -> Option<f64> {
    match (current, previous) {
        (Some(c), Some(p)) => Some(delta(c, p)),
        _ => None,
    }
}

/// Pure aggregation over an already-fetched set of samples.
///
/// Local days are resolved in the engine's time zone. The engine holds no
/// state besides the zone, so re-running it on refreshed input is always safe.
#[derive(Debug, Clone)]
pub struct TrendEngine<Tz: TimeZone = Utc> {
    tz: Tz,
}

impl Default for TrendEngine<Utc> {
    fn default() -> Self {
        Self::new(Utc)
    }
}

impl<Tz: TimeZone> TrendEngine<Tz> {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    pub fn time_zone(&self) -> &Tz {
        &self.tz
    }

    #[must_use]
    pub fn dedupe(&self, samples: &[Sample]) -> Vec<Sample> {
        dedupe(samples, &self.tz)
    }

    /// Summary for the week containing `date`, compared against the week
    /// exactly seven days earlier.
    ///
    /// Always returns a row; an empty week has `sample_count == 0` and no
    /// average.
    #[must_use]
    pub fn week(&self, samples: &[Sample], date: NaiveDate) -> WeeklySummary {
        let Some(week) = DateRange::week_of(date) else {
            return WeeklySummary::empty(format!("Week of {date}"), None);
        };
        let label = format!("Week of {}", week.start);
        let readings = daily_readings(samples, &self.tz);

        let current = in_range(&readings, &week);
        let average = mean(current);
        let previous_average = week
            .previous_week()
            .and_then(|prev| mean(in_range(&readings, &prev)));

        WeeklySummary {
            label,
            week: Some(week),
            average,
            sample_count: current.len(),
            previous_average,
            delta: delta_between(average, previous_average),
        }
    }

    /// Weeks overlapping the given month, each compared with the calendar
    /// week before it.
    ///
    /// Boundary weeks take samples from the neighbouring months, so `samples`
    /// should span the previous, target and next month. Empty weeks are left
    /// out.
    #[must_use]
    pub fn month(&self, samples: &[Sample], year: i32, month: u32) -> MonthlyView {
        let mut view = MonthlyView {
            year,
            month,
            weeks: Vec::new(),
        };
        let Some(range) = DateRange::month(year, month) else {
            return view;
        };
        let readings = daily_readings(samples, &self.tz);

        for (number, week) in (1..).zip(range.weeks()) {
            let current = in_range(&readings, &week);
            let Some(average) = mean(current) else {
                continue;
            };
            let previous_average = week
                .previous_week()
                .and_then(|prev| mean(in_range(&readings, &prev)));

            view.weeks.push(MonthWeek {
                number,
                summary: WeeklySummary {
                    label: format!("Week {number}"),
                    week: Some(week),
                    average: Some(average),
                    sample_count: current.len(),
                    previous_average,
                    delta: delta_between(Some(average), previous_average),
                },
            });
        }

        debug!(year, month, weeks = view.weeks.len(), "aggregated month");
        view
    }

    /// Non-empty weeks of a calendar year, each compared with the previous
    /// non-empty week.
    ///
    /// Gaps are skipped: a week's delta is against whichever week with data
    /// came before it, however far back.
    #[must_use]
    pub fn year(&self, samples: &[Sample], year: i32) -> YearlyView {
        let Some(range) = DateRange::year(year) else {
            return YearlyView::empty(year);
        };
        let readings = daily_readings(samples, &self.tz);

        let mut view = YearlyView::empty(year);
        let mut previous: Option<(NaiveDate, f64)> = None;

        for week in range.weeks() {
            let current = in_range(&readings, &week);
            let Some(average) = mean(current) else {
                continue;
            };
            let label_day = week.start.max(range.start);
            let month = month_name(label_day);
            let nth = week_of_month(label_day);

            let change = previous.map(|(from, prev_avg)| {
                let d = delta(average, prev_avg);
                view.deltas.push(WeekDelta {
                    from,
                    to: week.start,
                    delta: d,
                });
                d
            });

            view.weeks.push(YearWeek {
                month_name: month.to_string(),
                week_of_month: nth,
                summary: WeeklySummary {
                    label: format!("{month} W{nth}"),
                    week: Some(week),
                    average: Some(average),
                    sample_count: current.len(),
                    previous_average: previous.map(|(_, p)| p),
                    delta: change,
                },
            });
            previous = Some((week.start, average));
        }

        view.cut_weeks = view.deltas.iter().filter(|d| d.delta < 0.0).count();
        view.gain_weeks = view.deltas.iter().filter(|d| d.delta > 0.0).count();
        view.has_data = view.weeks.len() >= 2;

        debug!(
            year,
            weeks = view.weeks.len(),
            cut = view.cut_weeks,
            gain = view.gain_weeks,
            "aggregated year"
        );
        view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::{WeightUnit, convert};
    use chrono::{Duration, FixedOffset};
    use std::collections::BTreeSet;

    const EPS: f64 = 1e-9;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn sample_at(id: i64, date: NaiveDate, hour: u32, kg: f64) -> Sample {
        let timestamp = Utc.from_utc_datetime(&date.and_hms_opt(hour, 0, 0).unwrap());
        Sample {
            id,
            uuid: format!("uuid-{id}"),
            user_id: "local".to_string(),
            weight_kg: kg,
            body_fat_pct: None,
            timestamp,
            tags: BTreeSet::new(),
            notes: String::new(),
            created_at: timestamp,
        }
    }

    fn samples(entries: &[(NaiveDate, f64)]) -> Vec<Sample> {
        (1..)
            .zip(entries)
            .map(|(id, &(date, kg))| sample_at(id, date, 8, kg))
            .collect()
    }

    #[test]
    fn test_round_to() {
        assert!((round_to(70.456, 2) - 70.46).abs() < EPS);
        assert!((round_to(-0.7000000000000028, 3) - -0.7).abs() < EPS);
        assert!((round_to(2.5, 0) - 3.0).abs() < EPS);
        assert!((round_to(-2.5, 0) - -3.0).abs() < EPS);
    }

    #[test]
    fn test_week_average_two_samples() {
        let engine = TrendEngine::default();
        let data = samples(&[(d(2024, 1, 7), 70.0), (d(2024, 1, 8), 71.0)]);

        let summary = engine.week(&data, d(2024, 1, 7));
        assert_eq!(summary.sample_count, 2);
        assert!((summary.average.unwrap() - 70.5).abs() < EPS);
        assert_eq!(summary.label, "Week of 2024-01-07");
        assert!(summary.previous_average.is_none());
        assert!(summary.delta.is_none());
    }

    #[test]
    fn test_week_normalises_to_sunday() {
        let engine = TrendEngine::default();
        let data = samples(&[(d(2024, 1, 7), 70.0), (d(2024, 1, 8), 71.0)]);

        let summary = engine.week(&data, d(2024, 1, 10));
        assert_eq!(summary.week.unwrap().start, d(2024, 1, 7));
        assert_eq!(summary.sample_count, 2);
    }

    #[test]
    fn test_week_delta_against_previous_week() {
        let engine = TrendEngine::default();
        let data = samples(&[
            (d(2024, 1, 1), 70.0),
            (d(2024, 1, 3), 71.0),
            (d(2024, 1, 8), 69.8),
        ]);

        let summary = engine.week(&data, d(2024, 1, 8));
        assert!((summary.previous_average.unwrap() - 70.5).abs() < EPS);
        assert!((summary.average.unwrap() - 69.8).abs() < EPS);
        assert!((summary.delta.unwrap() - -0.7).abs() < EPS);
    }

    #[test]
    fn test_week_previous_is_strict_seven_day_window() {
        let engine = TrendEngine::default();
        // Data two weeks back does not count as "previous"
        let data = samples(&[(d(2023, 12, 26), 72.0), (d(2024, 1, 9), 71.0)]);

        let summary = engine.week(&data, d(2024, 1, 9));
        assert!(summary.previous_average.is_none());
        assert!(summary.delta.is_none());
    }

    #[test]
    fn test_empty_week_still_returns_row() {
        let engine = TrendEngine::default();
        let data = samples(&[(d(2024, 1, 1), 70.0)]);

        let summary = engine.week(&data, d(2024, 1, 8));
        assert_eq!(summary.sample_count, 0);
        assert!(summary.average.is_none());
        assert!((summary.previous_average.unwrap() - 70.0).abs() < EPS);
        assert!(summary.delta.is_none());
    }

    #[test]
    fn test_week_dedupes_same_day() {
        let engine = TrendEngine::default();
        let day = d(2024, 3, 1);
        let mut morning = sample_at(1, day, 8, 80.0);
        let mut evening = sample_at(2, day, 20, 79.5);
        morning.created_at = morning.timestamp;
        evening.created_at = evening.timestamp;

        let summary = engine.week(&[morning, evening], day);
        assert_eq!(summary.sample_count, 1);
        assert!((summary.average.unwrap() - 79.5).abs() < EPS);
    }

    #[test]
    fn test_week_uses_engine_time_zone() {
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        let engine = TrendEngine::new(tokyo);
        // 2024-01-06 20:00 UTC is Sunday 2024-01-07 05:00 in Tokyo
        let data = vec![sample_at(1, d(2024, 1, 6), 20, 70.0)];

        assert_eq!(engine.week(&data, d(2024, 1, 7)).sample_count, 1);
        assert_eq!(TrendEngine::default().week(&data, d(2024, 1, 7)).sample_count, 0);
    }

    #[test]
    fn test_delta_is_antisymmetric() {
        let pairs = [(70.5, 69.8), (80.12, 80.13), (65.0, 65.0), (99.99, 100.01)];
        for (a, b) in pairs {
            assert!((delta(a, b) + delta(b, a)).abs() < EPS, "{a} {b}");
        }
    }

    #[test]
    fn test_delta_rounds_float_noise() {
        let change = delta(69.8, 70.5);
        assert!((change - -0.7).abs() < EPS);
        assert_eq!(format!("{change:.2}"), "-0.70");
    }

    #[test]
    fn test_average_within_bounds() {
        let engine = TrendEngine::default();
        let weights = [70.1, 72.3, 71.8, 69.9, 70.0, 73.4, 71.1];
        let start = d(2024, 5, 5);
        let entries: Vec<(NaiveDate, f64)> = (0..)
            .zip(weights)
            .map(|(i, kg)| (start + Duration::days(i), kg))
            .collect();

        let avg = engine.week(&samples(&entries), start).average.unwrap();
        assert!(avg >= 69.9 && avg <= 73.4);
    }

    #[test]
    fn test_average_within_bounds_for_pound_entries() {
        let engine = TrendEngine::default();
        let to_kg = |lbs: f64| convert(lbs, WeightUnit::Lbs, WeightUnit::Kg);

        // 150 lbs is 68.0388555 kg; a plain 2-decimal round gives 68.04
        let single = samples(&[(d(2024, 1, 8), to_kg(150.0))]);
        let avg = engine.week(&single, d(2024, 1, 8)).average.unwrap();
        assert!((avg - to_kg(150.0)).abs() < EPS);

        let pounds = [150.0, 151.3, 149.7, 150.9, 152.2];
        let start = d(2024, 5, 5);
        let entries: Vec<(NaiveDate, f64)> = (0..)
            .zip(pounds)
            .map(|(i, lbs)| (start + Duration::days(i), to_kg(lbs)))
            .collect();
        let (lo, hi) = (to_kg(149.7), to_kg(152.2));

        let avg = engine.week(&samples(&entries), start).average.unwrap();
        assert!(avg >= lo && avg <= hi, "{avg} outside {lo}..{hi}");

        let view = engine.month(&samples(&entries), 2024, 5);
        for week in &view.weeks {
            let avg = week.summary.average.unwrap();
            assert!(avg >= lo && avg <= hi, "{avg} outside {lo}..{hi}");
        }
    }

    #[test]
    fn test_views_count_each_reading_once() {
        let engine = TrendEngine::default();
        let start = d(2024, 1, 1);
        let mut entries: Vec<(NaiveDate, f64)> =
            (0..60).map(|i| (start + Duration::days(i), 70.0)).collect();
        // Same-day repeats collapse before bucketing
        entries.push((d(2024, 1, 10), 70.5));
        entries.push((d(2024, 2, 14), 69.5));
        let data = samples(&entries);
        let readings = engine.dedupe(&data).len();
        assert_eq!(readings, 60);

        let year = engine.year(&data, 2024);
        let counted: usize = year.weeks.iter().map(|w| w.summary.sample_count).sum();
        assert_eq!(counted, readings);

        // February 2024 walks Jan 28 .. Mar 2; data runs Jan 1 .. Feb 29
        let month = engine.month(&data, 2024, 2);
        let counted: usize = month.weeks.iter().map(|w| w.summary.sample_count).sum();
        assert_eq!(counted, 4 + 29);
        let counts: Vec<usize> = month.weeks.iter().map(|w| w.summary.sample_count).collect();
        assert_eq!(counts, vec![7, 7, 7, 7, 5]);
    }

    #[test]
    fn test_week_unresolvable_boundary_is_empty() {
        let engine = TrendEngine::default();
        for date in [NaiveDate::MIN, NaiveDate::MAX] {
            let summary = engine.week(&[], date);
            assert!(summary.week.is_none());
            assert_eq!(summary.sample_count, 0);
            assert!(summary.average.is_none());
            assert!(summary.delta.is_none());
        }
    }

    #[test]
    fn test_month_february_leap_year_boundary_weeks() {
        let engine = TrendEngine::default();
        let data = samples(&[
            (d(2024, 1, 30), 71.0), // late January, first boundary week
            (d(2024, 2, 1), 70.0),
            (d(2024, 2, 6), 70.4),
            (d(2024, 2, 13), 70.2),
            (d(2024, 2, 20), 69.9),
            (d(2024, 2, 29), 69.5),
            (d(2024, 3, 1), 69.7), // early March, last boundary week
            (d(2024, 3, 5), 69.0), // week entirely in March
        ]);

        let view = engine.month(&data, 2024, 2);
        assert_eq!(view.weeks.len(), 5);
        let starts: Vec<NaiveDate> = view
            .weeks
            .iter()
            .map(|w| w.summary.week.unwrap().start)
            .collect();
        assert_eq!(starts[0], d(2024, 1, 28));
        assert_eq!(starts[4], d(2024, 2, 25));
        assert!(starts.iter().all(|s| *s < d(2024, 3, 1)));

        let first = &view.weeks[0].summary;
        assert_eq!(first.sample_count, 2);
        assert!((first.average.unwrap() - 70.5).abs() < EPS);

        let last = &view.weeks[4].summary;
        assert_eq!(last.sample_count, 2);
        assert!((last.average.unwrap() - 69.6).abs() < EPS);
        assert!((last.delta.unwrap() - -0.3).abs() < EPS);
    }

    #[test]
    fn test_month_omits_empty_weeks_and_keeps_numbers() {
        let engine = TrendEngine::default();
        let data = samples(&[(d(2024, 2, 6), 70.4), (d(2024, 2, 20), 69.9)]);

        let view = engine.month(&data, 2024, 2);
        let numbers: Vec<u32> = view.weeks.iter().map(|w| w.number).collect();
        assert_eq!(numbers, vec![2, 4]);
        // Preceding calendar weeks are empty, so no deltas
        assert!(view.weeks.iter().all(|w| w.summary.delta.is_none()));
    }

    #[test]
    fn test_month_first_week_compares_with_previous_month() {
        let engine = TrendEngine::default();
        let data = samples(&[(d(2024, 1, 23), 72.0), (d(2024, 2, 2), 71.5)]);

        let view = engine.month(&data, 2024, 2);
        assert_eq!(view.weeks.len(), 1);
        let first = &view.weeks[0].summary;
        assert!((first.previous_average.unwrap() - 72.0).abs() < EPS);
        assert!((first.delta.unwrap() - -0.5).abs() < EPS);
    }

    #[test]
    fn test_month_with_no_samples_is_empty() {
        let engine = TrendEngine::default();
        let view = engine.month(&[], 2024, 2);
        assert!(view.weeks.is_empty());
    }

    #[test]
    fn test_month_invalid_is_empty() {
        let engine = TrendEngine::default();
        let data = samples(&[(d(2024, 2, 6), 70.4)]);
        assert!(engine.month(&data, 2024, 13).weeks.is_empty());
    }

    #[test]
    fn test_year_two_sparse_weeks() {
        let engine = TrendEngine::default();
        // 2023 starts on a Sunday: week 3 starts Jan 15, week 40 starts Oct 1
        let data = samples(&[
            (d(2023, 1, 16), 72.0),
            (d(2023, 1, 18), 71.0),
            (d(2023, 10, 3), 70.0),
        ]);

        let view = engine.year(&data, 2023);
        assert!(view.has_data);
        assert_eq!(view.weeks.len(), 2);
        assert_eq!(view.deltas.len(), 1);
        assert!(view.cut_weeks + view.gain_weeks <= 1);
        assert_eq!(view.cut_weeks, 1);

        let delta = view.deltas[0];
        assert_eq!(delta.from, d(2023, 1, 15));
        assert_eq!(delta.to, d(2023, 10, 1));
        assert!((delta.delta - -1.5).abs() < EPS);

        assert_eq!(view.weeks[0].month_name, "January");
        assert_eq!(view.weeks[0].week_of_month, 3);
        assert_eq!(view.weeks[1].month_name, "October");
        assert_eq!(view.weeks[1].week_of_month, 1);
        assert!(view.weeks[0].summary.delta.is_none());
        assert!((view.weeks[1].summary.previous_average.unwrap() - 71.5).abs() < EPS);
    }

    #[test]
    fn test_year_single_week_has_no_data() {
        let engine = TrendEngine::default();
        let view = engine.year(&samples(&[(d(2023, 6, 6), 70.0)]), 2023);
        assert!(!view.has_data);
        assert_eq!(view.weeks.len(), 1);
        assert!(view.deltas.is_empty());
        assert_eq!(view.cut_weeks + view.gain_weeks, 0);
    }

    #[test]
    fn test_year_counts_cut_gain_and_ignores_flat() {
        let engine = TrendEngine::default();
        let data = samples(&[
            (d(2023, 3, 7), 80.0),
            (d(2023, 3, 14), 79.0), // cut
            (d(2023, 3, 21), 79.0), // flat
            (d(2023, 3, 28), 79.4), // gain
            (d(2023, 4, 11), 78.0), // cut, skipping an empty week
        ]);

        let view = engine.year(&data, 2023);
        assert_eq!(view.deltas.len(), 4);
        assert_eq!(view.cut_weeks, 2);
        assert_eq!(view.gain_weeks, 1);
        assert!((view.deltas[3].delta - -1.4).abs() < EPS);
    }

    #[test]
    fn test_year_first_week_straddles_new_year() {
        let engine = TrendEngine::default();
        // 2024-01-01 is a Monday; its week starts 2023-12-31
        let data = samples(&[(d(2023, 12, 31), 75.0), (d(2024, 1, 2), 74.0)]);

        let view = engine.year(&data, 2024);
        assert_eq!(view.weeks.len(), 1);
        let week = &view.weeks[0];
        assert_eq!(week.summary.week.unwrap().start, d(2023, 12, 31));
        assert_eq!(week.month_name, "January");
        assert_eq!(week.week_of_month, 1);
        assert_eq!(week.summary.sample_count, 2);
    }

    #[test]
    fn test_year_last_week_starts_on_or_before_dec_31() {
        let engine = TrendEngine::default();
        // 2023-12-31 is a Sunday; its week is the last one of 2023
        let data = samples(&[(d(2023, 12, 31), 75.0), (d(2024, 1, 6), 74.0)]);

        let view = engine.year(&data, 2023);
        assert_eq!(view.weeks.len(), 1);
        assert_eq!(view.weeks[0].summary.week.unwrap().start, d(2023, 12, 31));
        assert_eq!(view.weeks[0].summary.sample_count, 2);
    }

    #[test]
    fn test_empty_week_asymmetry() {
        let engine = TrendEngine::default();
        let data = samples(&[(d(2024, 2, 6), 70.4)]);

        let week = engine.week(&data, d(2024, 2, 13));
        assert_eq!(week.sample_count, 0);
        assert!(week.average.is_none());

        let month = engine.month(&data, 2024, 2);
        assert!(
            month
                .weeks
                .iter()
                .all(|w| w.summary.week.unwrap().start != d(2024, 2, 11))
        );
        let year = engine.year(&data, 2024);
        assert!(year.weeks.iter().all(|w| w.summary.sample_count > 0));
    }

    #[test]
    fn test_aggregation_is_idempotent() {
        let engine = TrendEngine::default();
        let data = samples(&[(d(2024, 2, 6), 70.4), (d(2024, 2, 20), 69.9)]);
        assert_eq!(engine.month(&data, 2024, 2), engine.month(&data, 2024, 2));
        assert_eq!(engine.year(&data, 2024), engine.year(&data, 2024));
    }
}

use std::collections::BTreeMap;

use chrono::{NaiveDate, TimeZone};
use tracing::debug;

use crate::calendar::local_day;
use crate::models::Sample;

/// One surviving weight per local day, as the aggregators consume it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Reading {
    pub day: NaiveDate,
    pub weight_kg: f64,
}

/// Keep at most one sample per local calendar day.
///
/// The sample with the latest `created_at` wins; equal `created_at` values
/// are resolved by input order, later entries winning. Output is ordered by
/// day.
#[must_use]
pub fn dedupe<Tz: TimeZone>(samples: &[Sample], tz: &Tz) -> Vec<Sample> {
    let mut by_day: BTreeMap<NaiveDate, &Sample> = BTreeMap::new();
    for sample in samples {
        let day = local_day(&sample.timestamp, tz);
        by_day
            .entry(day)
            .and_modify(|kept| {
                if sample.created_at >= kept.created_at {
                    *kept = sample;
                }
            })
            .or_insert(sample);
    }

    let collapsed = samples.len() - by_day.len();
    if collapsed > 0 {
        debug!(collapsed, kept = by_day.len(), "collapsed same-day samples");
    }

    by_day.into_values().cloned().collect()
}

/// Deduplicated readings sorted by day.
pub(crate) fn daily_readings<Tz: TimeZone>(samples: &[Sample], tz: &Tz) -> Vec<Reading> {
    dedupe(samples, tz)
        .iter()
        .map(|s| Reading {
            day: local_day(&s.timestamp, tz),
            weight_kg: s.weight_kg,
        })
        .collect()
}

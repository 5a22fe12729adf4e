use std::path::Path;

use anyhow::Result;
use chrono::{NaiveDate, TimeZone, Utc};

use crate::aggregate::{MonthlyView, TrendEngine, WeeklySummary, YearlyView};
use crate::calendar::DateRange;
use crate::db::Database;
use crate::goal::{Goal, GoalDirection};
use crate::import::{self, ImportSummary};
use crate::models::{NewSample, Sample, validate_weight_kg};
use crate::units::WeightUnit;

const DISPLAY_UNIT_KEY: &str = "display_unit";
const GOAL_DIRECTION_KEY: &str = "goal_direction";
const GOAL_WEIGHT_KEY: &str = "goal_weight_kg";

/// Storage collaborator the trend views pull samples from.
///
/// May be asked for overlapping ranges; the engine dedupes whatever comes
/// back, so returning a sample twice is harmless.
pub trait SampleSource {
    fn fetch_samples(&self, user_id: &str, range: DateRange) -> Result<Vec<Sample>>;
}

impl SampleSource for Database {
    fn fetch_samples(&self, user_id: &str, range: DateRange) -> Result<Vec<Sample>> {
        self.samples_in_range(user_id, range)
    }
}

/// Samples for the week containing `date` and the week before it.
pub fn fetch_week_context<S: SampleSource + ?Sized>(
    source: &S,
    user_id: &str,
    date: NaiveDate,
) -> Result<Vec<Sample>> {
    let Some(week) = DateRange::week_of(date) else {
        return Ok(Vec::new());
    };
    let range = week.previous_week().map_or(week, |prev| prev.extend(&week));
    source.fetch_samples(user_id, range)
}

/// Samples for the previous, target and next month, fetched separately.
pub fn fetch_month_context<S: SampleSource + ?Sized>(
    source: &S,
    user_id: &str,
    year: i32,
    month: u32,
) -> Result<Vec<Sample>> {
    let Some(target) = DateRange::month(year, month) else {
        return Ok(Vec::new());
    };
    let previous = target.start.pred_opt().and_then(DateRange::month_of);
    let next = DateRange::month_of(target.end);

    let mut samples = Vec::new();
    for range in [previous, Some(target), next].into_iter().flatten() {
        samples.extend(source.fetch_samples(user_id, range)?);
    }
    Ok(samples)
}

/// Samples for every week the yearly view walks, including the partial weeks
/// at either end.
pub fn fetch_year_context<S: SampleSource + ?Sized>(
    source: &S,
    user_id: &str,
    year: i32,
) -> Result<Vec<Sample>> {
    let Some(weeks) = DateRange::year(year).as_ref().map(DateRange::weeks) else {
        return Ok(Vec::new());
    };
    match (weeks.first(), weeks.last()) {
        (Some(first), Some(last)) => source.fetch_samples(user_id, first.extend(last)),
        _ => Ok(Vec::new()),
    }
}

pub struct WeighinService<Tz: TimeZone = Utc> {
    db: Database,
    engine: TrendEngine<Tz>,
}

impl WeighinService<Utc> {
    pub fn new(db_path: &str) -> Result<Self> {
        let db = Database::open(Path::new(db_path))?;
        Ok(Self::with_time_zone(db, Utc))
    }

    pub fn new_in_memory() -> Result<Self> {
        let db = Database::open_in_memory()?;
        Ok(Self::with_time_zone(db, Utc))
    }
}

impl<Tz: TimeZone> WeighinService<Tz> {
    pub fn with_time_zone(db: Database, tz: Tz) -> Self {
        Self {
            db,
            engine: TrendEngine::new(tz),
        }
    }

    pub fn engine(&self) -> &TrendEngine<Tz> {
        &self.engine
    }

    /// Today in the service's time zone.
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(self.engine.time_zone()).date_naive()
    }

    // --- Samples ---

    pub fn log_sample(&self, sample: &NewSample) -> Result<Sample> {
        self.db.insert_sample(sample)
    }

    pub fn get_sample(&self, id: i64) -> Result<Sample> {
        self.db.get_sample(id)
    }

    pub fn list_samples(&self, user_id: &str, limit: Option<i64>) -> Result<Vec<Sample>> {
        self.db.list_samples(user_id, limit)
    }

    pub fn delete_sample(&self, id: i64) -> Result<()> {
        self.db.delete_sample(id)
    }

    // --- Trend views ---

    pub fn weekly_summary(&self, user_id: &str, date: NaiveDate) -> Result<WeeklySummary> {
        let samples = fetch_week_context(&self.db, user_id, date)?;
        Ok(self.engine.week(&samples, date))
    }

    pub fn monthly_view(&self, user_id: &str, year: i32, month: u32) -> Result<MonthlyView> {
        let samples = fetch_month_context(&self.db, user_id, year, month)?;
        Ok(self.engine.month(&samples, year, month))
    }

    pub fn yearly_view(&self, user_id: &str, year: i32) -> Result<YearlyView> {
        let samples = fetch_year_context(&self.db, user_id, year)?;
        Ok(self.engine.year(&samples, year))
    }

    // --- Preferences ---

    pub fn set_display_unit(&self, user_id: &str, unit: WeightUnit) -> Result<()> {
        self.db.set_setting(user_id, DISPLAY_UNIT_KEY, unit.as_str())
    }

    pub fn display_unit(&self, user_id: &str) -> Result<WeightUnit> {
        match self.db.get_setting(user_id, DISPLAY_UNIT_KEY)? {
            Some(v) => v.parse(),
            None => Ok(WeightUnit::default()),
        }
    }

    pub fn set_goal(&self, user_id: &str, goal: &Goal) -> Result<()> {
        if let Some(kg) = goal.target_weight_kg {
            validate_weight_kg(kg)?;
        }
        self.db
            .set_setting(user_id, GOAL_DIRECTION_KEY, goal.direction.as_str())?;
        match goal.target_weight_kg {
            Some(kg) => self.db.set_setting(user_id, GOAL_WEIGHT_KEY, &kg.to_string()),
            None => self.db.delete_setting(user_id, GOAL_WEIGHT_KEY).map(|_| ()),
        }
    }

    pub fn goal(&self, user_id: &str) -> Result<Goal> {
        let direction = match self.db.get_setting(user_id, GOAL_DIRECTION_KEY)? {
            Some(v) => v.parse::<GoalDirection>()?,
            None => GoalDirection::Unset,
        };
        let target_weight_kg = match self.db.get_setting(user_id, GOAL_WEIGHT_KEY)? {
            Some(v) => Some(v.parse::<f64>()?),
            None => None,
        };
        Ok(Goal {
            direction,
            target_weight_kg,
        })
    }

    pub fn clear_goal(&self, user_id: &str) -> Result<bool> {
        let direction = self.db.delete_setting(user_id, GOAL_DIRECTION_KEY)?;
        let weight = self.db.delete_setting(user_id, GOAL_WEIGHT_KEY)?;
        Ok(direction || weight)
    }

    // --- CSV import ---

    /// Import a weight CSV. Rows without a `Unit` column use the user's
    /// display unit.
    pub fn import_csv(&self, user_id: &str, csv_data: &str, dry_run: bool) -> Result<ImportSummary> {
        let rows = import::parse_samples_csv(csv_data.as_bytes())?;
        let unit = self.display_unit(user_id)?;
        import::import_samples(
            &self.db,
            user_id,
            &rows,
            unit,
            self.engine.time_zone(),
            dry_run,
        )
    }
}

pub mod aggregate;
pub mod calendar;
pub mod db;
pub mod dedupe;
pub mod format;
pub mod goal;
pub mod import;
pub mod models;
pub mod service;
pub mod units;

pub use aggregate::{MonthlyView, TrendEngine, WeeklySummary, YearlyView};
pub use calendar::DateRange;
pub use goal::{Goal, GoalDirection, TrackStatus, classify};
pub use models::{NewSample, Sample};
pub use service::{SampleSource, WeighinService};
pub use units::WeightUnit;

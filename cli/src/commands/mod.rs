mod goal;
mod helpers;
mod import;
mod trends;
mod weight;

use chrono::Local;

use weighin_core::service::WeighinService;

/// The CLI always buckets by the machine's local time zone.
pub(crate) type Service = WeighinService<Local>;

pub(crate) use goal::{cmd_goal_clear, cmd_goal_set, cmd_goal_show, cmd_unit_set, cmd_unit_show};
pub(crate) use import::cmd_import;
pub(crate) use trends::{cmd_month, cmd_week, cmd_year};
pub(crate) use weight::{LogArgs, cmd_delete, cmd_history, cmd_log};

use anyhow::Result;
use chrono::Datelike;
use std::process;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use weighin_core::aggregate::WeeklySummary;
use weighin_core::format::{format_delta, format_weight};
use weighin_core::goal::{Goal, classify};
use weighin_core::units::WeightUnit;

use super::Service;
use super::helpers::{parse_date, parse_month, status_label};

#[derive(Tabled)]
struct TrendRow {
    #[tabled(rename = "Week")]
    label: String,
    #[tabled(rename = "Starts")]
    starts: String,
    #[tabled(rename = "Days")]
    days: usize,
    #[tabled(rename = "Average")]
    average: String,
    #[tabled(rename = "Change")]
    delta: String,
    #[tabled(rename = "")]
    status: String,
}

fn trend_row(summary: &WeeklySummary, unit: WeightUnit, goal: &Goal) -> TrendRow {
    TrendRow {
        label: summary.label.clone(),
        starts: summary
            .week
            .map(|w| w.start.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
        days: summary.sample_count,
        average: format_weight(summary.average, unit),
        delta: format_delta(summary.delta, unit),
        status: status_label(classify(summary.delta, goal.direction)).to_string(),
    }
}

/// Distance to the target weight; `remaining_kg` is target minus current.
fn target_message(remaining_kg: f64, unit: WeightUnit) -> String {
    if remaining_kg < 0.0 {
        format!("{} to lose", format_weight(Some(-remaining_kg), unit))
    } else if remaining_kg > 0.0 {
        format!("{} to gain", format_weight(Some(remaining_kg), unit))
    } else {
        "At target".to_string()
    }
}

fn print_trend_table(rows: &[TrendRow]) {
    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(2..5)).with(Alignment::right()))
        .to_string();
    println!("{table}");
}

pub(crate) fn cmd_week(svc: &Service, user: &str, date: Option<String>, json: bool) -> Result<()> {
    let date = parse_date(date)?;
    let summary = svc.weekly_summary(user, date)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    let unit = svc.display_unit(user)?;
    let goal = svc.goal(user)?;
    print_trend_table(&[trend_row(&summary, unit, &goal)]);

    if let Some(remaining) = summary.average.and_then(|a| goal.remaining_kg(a)) {
        println!("  {}", target_message(remaining, unit));
    }

    Ok(())
}

pub(crate) fn cmd_month(svc: &Service, user: &str, month: Option<&str>, json: bool) -> Result<()> {
    let (year, month) = parse_month(month)?;
    let view = svc.monthly_view(user, year, month)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }
    if view.weeks.is_empty() {
        eprintln!("No weigh-ins for {year}-{month:02}");
        process::exit(2);
    }

    let unit = svc.display_unit(user)?;
    let goal = svc.goal(user)?;
    println!("=== {year}-{month:02} ===\n");
    let rows: Vec<TrendRow> = view
        .weeks
        .iter()
        .map(|w| trend_row(&w.summary, unit, &goal))
        .collect();
    print_trend_table(&rows);

    Ok(())
}

pub(crate) fn cmd_year(svc: &Service, user: &str, year: Option<i32>, json: bool) -> Result<()> {
    let year = year.unwrap_or_else(|| svc.today().year());
    let view = svc.yearly_view(user, year)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }
    if !view.has_data {
        eprintln!("Not enough weigh-ins in {year} to show a trend (need two weeks)");
        process::exit(2);
    }

    let unit = svc.display_unit(user)?;
    let goal = svc.goal(user)?;
    println!("=== {year} ===\n");
    let rows: Vec<TrendRow> = view
        .weeks
        .iter()
        .map(|w| trend_row(&w.summary, unit, &goal))
        .collect();
    print_trend_table(&rows);

    let cut = view.cut_weeks;
    let gain = view.gain_weeks;
    println!("\n  Weeks down: {cut}  Weeks up: {gain}");

    Ok(())
}

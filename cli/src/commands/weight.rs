use anyhow::Result;
use chrono::Local;
use std::process;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use weighin_core::format::format_weight;
use weighin_core::models::NewSample;
use weighin_core::units::{WeightUnit, to_kg};

use super::Service;
use super::helpers::{json_error, parse_date, parse_time, resolve_timestamp, truncate};

pub(crate) struct LogArgs {
    pub value: f64,
    pub unit: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub body_fat: Option<f64>,
    pub tags: Vec<String>,
    pub notes: Option<String>,
}

pub(crate) fn cmd_log(svc: &Service, user: &str, args: LogArgs, json: bool) -> Result<()> {
    let unit = match args.unit.as_deref() {
        Some(u) => u.parse::<WeightUnit>()?,
        None => svc.display_unit(user)?,
    };
    let weight_kg = to_kg(args.value, unit);
    if unit != WeightUnit::Kg && !json {
        eprintln!("Converting {:.1} {unit} → {weight_kg:.2} kg", args.value);
    }

    let date = args.date.map(|d| parse_date(Some(d))).transpose()?;
    let time = args.time.as_deref().map(parse_time).transpose()?;
    let timestamp = resolve_timestamp(svc.engine().time_zone(), date, time)?;

    let mut sample = NewSample::new(user, weight_kg, timestamp);
    sample.body_fat_pct = args.body_fat;
    sample.tags = weighin_core::models::normalize_tags(&args.tags);
    sample.notes = args.notes.unwrap_or_default();

    let result = svc.log_sample(&sample)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        let local = result.timestamp.with_timezone(&Local);
        println!(
            "Logged {} for {} (id {})",
            format_weight(Some(result.weight_kg), unit),
            local.format("%Y-%m-%d %H:%M"),
            result.id
        );
        if let Some(pct) = result.body_fat_pct {
            println!("  Body fat: {pct:.1}%");
        }
        if !result.tags.is_empty() {
            let tags: Vec<&str> = result.tags.iter().map(String::as_str).collect();
            println!("  Tags: {}", tags.join(", "));
        }
        if !result.notes.is_empty() {
            println!("  Notes: {}", result.notes);
        }
    }

    Ok(())
}

pub(crate) fn cmd_history(svc: &Service, user: &str, limit: Option<u32>, json: bool) -> Result<()> {
    let samples = svc.list_samples(user, limit.map(i64::from))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&samples)?);
        return Ok(());
    }
    if samples.is_empty() {
        eprintln!("No weigh-ins found. Use `weighin log <weight>` to record one.");
        process::exit(2);
    }

    #[derive(Tabled)]
    struct SampleRow {
        #[tabled(rename = "ID")]
        id: i64,
        #[tabled(rename = "When")]
        when: String,
        #[tabled(rename = "Weight")]
        weight: String,
        #[tabled(rename = "Body fat")]
        body_fat: String,
        #[tabled(rename = "Tags")]
        tags: String,
        #[tabled(rename = "Notes")]
        notes: String,
    }

    let unit = svc.display_unit(user)?;
    let rows: Vec<SampleRow> = samples
        .iter()
        .map(|s| SampleRow {
            id: s.id,
            when: s
                .timestamp
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M")
                .to_string(),
            weight: format_weight(Some(s.weight_kg), unit),
            body_fat: s.body_fat_pct.map_or("-".into(), |v| format!("{v:.1}%")),
            tags: s.tags.iter().cloned().collect::<Vec<_>>().join(","),
            notes: truncate(&s.notes, 30),
        })
        .collect();

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(2..4)).with(Alignment::right()))
        .to_string();
    println!("{table}");

    Ok(())
}

pub(crate) fn cmd_delete(svc: &Service, id: i64, json: bool) -> Result<()> {
    if let Err(e) = svc.delete_sample(id) {
        if json {
            println!("{}", json_error(&format!("{e:#}")));
            process::exit(2);
        }
        return Err(e);
    }

    if json {
        println!("{}", serde_json::json!({ "deleted": id }));
    } else {
        println!("Deleted weigh-in {id}");
    }

    Ok(())
}

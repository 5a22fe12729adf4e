use anyhow::Result;

use weighin_core::format::format_weight;
use weighin_core::goal::{Goal, GoalDirection};
use weighin_core::units::{WeightUnit, to_kg};

use super::Service;

pub(crate) fn cmd_goal_set(
    svc: &Service,
    user: &str,
    direction: &str,
    target: Option<f64>,
    unit: Option<&str>,
    json: bool,
) -> Result<()> {
    let direction: GoalDirection = direction.parse()?;
    let unit = match unit {
        Some(u) => u.parse::<WeightUnit>()?,
        None => svc.display_unit(user)?,
    };
    let goal = Goal {
        direction,
        target_weight_kg: target.map(|t| to_kg(t, unit)),
    };
    svc.set_goal(user, &goal)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&goal)?);
    } else {
        print!("Goal set: {direction}");
        if goal.target_weight_kg.is_some() {
            print!(" (target {})", format_weight(goal.target_weight_kg, unit));
        }
        println!();
    }

    Ok(())
}

pub(crate) fn cmd_goal_show(svc: &Service, user: &str, json: bool) -> Result<()> {
    let goal = svc.goal(user)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&goal)?);
    } else if goal.direction == GoalDirection::Unset && goal.target_weight_kg.is_none() {
        eprintln!("No goal set. Use `weighin goal set <gain|loss|maintain>` to set one.");
    } else {
        let unit = svc.display_unit(user)?;
        print!("Goal: {}", goal.direction);
        if goal.target_weight_kg.is_some() {
            print!("  Target: {}", format_weight(goal.target_weight_kg, unit));
        }
        println!();
    }

    Ok(())
}

pub(crate) fn cmd_goal_clear(svc: &Service, user: &str, json: bool) -> Result<()> {
    let cleared = svc.clear_goal(user)?;

    if json {
        println!("{}", serde_json::json!({ "cleared": cleared }));
    } else if cleared {
        println!("Goal cleared");
    } else {
        println!("No goal to clear");
    }

    Ok(())
}

pub(crate) fn cmd_unit_set(svc: &Service, user: &str, unit: &str, json: bool) -> Result<()> {
    let unit: WeightUnit = unit.parse()?;
    svc.set_display_unit(user, unit)?;

    if json {
        println!("{}", serde_json::json!({ "display_unit": unit }));
    } else {
        println!("Display unit set to {unit}");
    }

    Ok(())
}

pub(crate) fn cmd_unit_show(svc: &Service, user: &str, json: bool) -> Result<()> {
    let unit = svc.display_unit(user)?;

    if json {
        println!("{}", serde_json::json!({ "display_unit": unit }));
    } else {
        println!("{unit}");
    }

    Ok(())
}

use std::fmt;
use std::str::FromStr;

use anyhow::bail;
use serde::{Deserialize, Serialize};

/// Weekly change (kg) still considered on track while maintaining.
pub const MAINTAIN_TOLERANCE_KG: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalDirection {
    Gain,
    Loss,
    Maintain,
    #[default]
    Unset,
}

impl GoalDirection {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            GoalDirection::Gain => "gain",
            GoalDirection::Loss => "loss",
            GoalDirection::Maintain => "maintain",
            GoalDirection::Unset => "unset",
        }
    }
}

impl fmt::Display for GoalDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GoalDirection {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "gain" | "bulk" => Ok(GoalDirection::Gain),
            "loss" | "lose" | "cut" => Ok(GoalDirection::Loss),
            "maintain" | "maintenance" => Ok(GoalDirection::Maintain),
            "unset" | "none" => Ok(GoalDirection::Unset),
            _ => bail!("Invalid goal '{s}'. Use gain, loss, or maintain"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackStatus {
    OnTrack,
    OffTrack,
    Neutral,
}

/// Map a signed weekly delta to on/off track for the user's goal.
#[must_use]
pub fn classify(delta: Option<f64>, goal: GoalDirection) -> TrackStatus {
    let Some(delta) = delta else {
        return TrackStatus::Neutral;
    };
    let on_track = match goal {
        GoalDirection::Loss => delta <= 0.0,
        GoalDirection::Gain => delta >= 0.0,
        GoalDirection::Maintain => delta.abs() <= MAINTAIN_TOLERANCE_KG,
        GoalDirection::Unset => return TrackStatus::Neutral,
    };
    if on_track {
        TrackStatus::OnTrack
    } else {
        TrackStatus::OffTrack
    }
}

/// A user's goal: direction plus an optional target weight.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Goal {
    pub direction: GoalDirection,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_weight_kg: Option<f64>,
}

impl Goal {
    /// Kilograms left to reach the target from `current_kg`; negative when
    /// the target is below the current weight.
    #[must_use]
    pub fn remaining_kg(&self, current_kg: f64) -> Option<f64> {
        self.target_weight_kg.map(|target| target - current_kg)
    }
}

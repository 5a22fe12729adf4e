use std::fmt;
use std::str::FromStr;

use anyhow::bail;
use serde::{Deserialize, Serialize};

pub const LBS_PER_KG: f64 = 2.204_622_62;
pub const KG_PER_LB: f64 = 0.453_592_37;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    #[default]
    Kg,
    Lbs,
}

impl WeightUnit {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            WeightUnit::Kg => "kg",
            WeightUnit::Lbs => "lbs",
        }
    }
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WeightUnit {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "kg" | "kgs" | "kilogram" | "kilograms" => Ok(WeightUnit::Kg),
            "lb" | "lbs" | "pound" | "pounds" => Ok(WeightUnit::Lbs),
            _ => bail!("Invalid unit '{s}'. Use 'kg' or 'lbs'"),
        }
    }
}

/// Convert a mass between units. Identity when `from == to`.
#[must_use]
pub fn convert(value: f64, from: WeightUnit, to: WeightUnit) -> f64 {
    match (from, to) {
        (WeightUnit::Kg, WeightUnit::Lbs) => value * LBS_PER_KG,
        (WeightUnit::Lbs, WeightUnit::Kg) => value * KG_PER_LB,
        _ => value,
    }
}

/// Kilograms for an entered weight, rounded to 2 decimals for storage.
#[must_use]
pub fn to_kg(value: f64, unit: WeightUnit) -> f64 {
    (convert(value, unit, WeightUnit::Kg) * 100.0).round() / 100.0
}

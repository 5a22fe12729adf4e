use std::collections::BTreeSet;

use anyhow::{Result, bail};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A logged body-weight observation. Weight is always stored in kilograms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub id: i64,
    pub uuid: String,
    pub user_id: String,
    pub weight_kg: f64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub body_fat_pct: Option<f64>,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewSample {
    pub user_id: String,
    pub weight_kg: f64,
    pub body_fat_pct: Option<f64>,
    pub timestamp: DateTime<Utc>,
    pub tags: BTreeSet<String>,
    pub notes: String,
}

impl NewSample {
    pub fn new(user_id: &str, weight_kg: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            user_id: user_id.to_string(),
            weight_kg,
            body_fat_pct: None,
            timestamp,
            tags: BTreeSet::new(),
            notes: String::new(),
        }
    }

    /// Reject samples the aggregation engine must never see.
    pub fn validate(&self) -> Result<()> {
        if self.user_id.trim().is_empty() {
            bail!("user_id must not be empty");
        }
        validate_weight_kg(self.weight_kg)?;
        if let Some(pct) = self.body_fat_pct {
            validate_body_fat_pct(pct)?;
        }
        if self.tags.iter().any(|t| t.trim().is_empty()) {
            bail!("Tags must not be empty");
        }
        Ok(())
    }
}

pub fn validate_weight_kg(weight_kg: f64) -> Result<()> {
    if !weight_kg.is_finite() || weight_kg <= 0.0 {
        bail!("Weight must be greater than 0");
    }
    Ok(())
}

pub fn validate_body_fat_pct(pct: f64) -> Result<()> {
    if !pct.is_finite() || !(0.0..=100.0).contains(&pct) {
        bail!("Body fat must be between 0 and 100 percent");
    }
    Ok(())
}

/// Normalize user-entered tags: trimmed, lowercased, blanks dropped.
#[must_use]
pub fn normalize_tags<I, S>(tags: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tags.into_iter()
        .map(|t| t.as_ref().trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

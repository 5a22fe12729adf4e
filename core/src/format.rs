//! Display formatting. The only place a kg value is converted to the user's
//! preferred unit.

use crate::units::{WeightUnit, convert};

/// Shown in place of a missing average or delta.
pub const PLACEHOLDER: &str = "-";

/// Replace `-0.0` with `0.0` so it never renders as "-0.00".
#[must_use]
pub fn no_neg_zero(v: f64) -> f64 {
    if v == 0.0 { 0.0 } else { v }
}

#[must_use]
pub fn format_weight(weight_kg: Option<f64>, unit: WeightUnit) -> String {
    match weight_kg {
        Some(kg) => {
            let v = no_neg_zero(convert(kg, WeightUnit::Kg, unit));
            format!("{v:.2} {unit}")
        }
        None => PLACEHOLDER.to_string(),
    }
}

/// Signed delta with two decimals, e.g. `+0.40 kg` or `-0.70 kg`.
#[must_use]
pub fn format_delta(delta_kg: Option<f64>, unit: WeightUnit) -> String {
    match delta_kg {
        Some(kg) => {
            let v = no_neg_zero(convert(kg, WeightUnit::Kg, unit));
            format!("{v:+.2} {unit}")
        }
        None => PLACEHOLDER.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_weight() {
        assert_eq!(format_weight(Some(70.5), WeightUnit::Kg), "70.50 kg");
        assert_eq!(format_weight(Some(100.0), WeightUnit::Lbs), "220.46 lbs");
        assert_eq!(format_weight(Some(70.54), WeightUnit::Kg), "70.54 kg");
        assert_eq!(format_weight(Some(70.45), WeightUnit::Kg), "70.45 kg");
        assert_eq!(format_weight(None, WeightUnit::Kg), "-");
    }

    #[test]
    fn test_format_delta() {
        assert_eq!(format_delta(Some(-0.7), WeightUnit::Kg), "-0.70 kg");
        assert_eq!(format_delta(Some(0.4), WeightUnit::Kg), "+0.40 kg");
        assert_eq!(format_delta(Some(-0.0), WeightUnit::Kg), "+0.00 kg");
        assert_eq!(format_delta(Some(1.0), WeightUnit::Lbs), "+2.20 lbs");
        assert_eq!(format_delta(None, WeightUnit::Lbs), "-");
    }

    #[test]
    fn test_no_neg_zero() {
        assert_eq!(no_neg_zero(-0.0).to_bits(), 0.0_f64.to_bits());
        assert_eq!(no_neg_zero(5.0), 5.0);
        assert_eq!(no_neg_zero(-3.0), -3.0);
    }
}

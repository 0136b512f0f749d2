//! Reference brackets and the coefficient interpolation.

use serde::{Deserialize, Serialize};

use crate::error::BracketError;

/// Grams of feed per unit of `feeding_amount / coefficient`.
pub const DOSAGE_DIVISOR: f64 = 500.0;

/// One weight-range × temperature-range row of the reference table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeedBracket {
    pub weight_range: String,
    pub t_range: String,
    /// Lower weight bound in grams.
    pub weight_min: f64,
    /// Upper weight bound in grams.
    pub weight_max: f64,
    /// Lower water temperature bound in °C.
    pub t_min: f64,
    /// Upper water temperature bound in °C.
    pub t_max: f64,
    pub coe_min: f64,
    pub coe_max: f64,
    /// Feed conversion ratio. Carried for display only.
    pub fcr: f64,
}

impl FeedBracket {
    /// Storage key: `{weight_range}/{t_range}`.
    pub fn table_key(&self) -> String {
        table_key(&self.weight_range, &self.t_range)
    }

    /// Reject brackets the interpolation cannot use.
    ///
    /// Equal (or inverted) bounds on either axis would divide by zero,
    /// so they are refused before the row ever reaches the store.
    pub fn validate(&self) -> Result<(), BracketError> {
        for key in [&self.weight_range, &self.t_range] {
            if key.trim().is_empty() || key.contains('/') {
                return Err(BracketError::InvalidKey(key.clone()));
            }
        }

        let key = self.table_key();
        let fields = [
            ("weight_min", self.weight_min),
            ("weight_max", self.weight_max),
            ("t_min", self.t_min),
            ("t_max", self.t_max),
            ("coe_min", self.coe_min),
            ("coe_max", self.coe_max),
            ("fcr", self.fcr),
        ];
        if let Some((field, _)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(BracketError::NonFinite { key, field });
        }

        if self.weight_min >= self.weight_max {
            return Err(BracketError::DegenerateWeightRange {
                key,
                min: self.weight_min,
                max: self.weight_max,
            });
        }
        if self.t_min >= self.t_max {
            return Err(BracketError::DegenerateTemperatureRange {
                key,
                min: self.t_min,
                max: self.t_max,
            });
        }
        Ok(())
    }

    /// Coefficient along the temperature axis. Not clamped.
    pub fn temperature_coefficient(&self, temperature: f64) -> f64 {
        lerp(self.coe_min, self.coe_max, self.t_min, self.t_max, temperature)
    }

    /// Coefficient along the weight axis. Not clamped.
    pub fn weight_coefficient(&self, weight: f64) -> f64 {
        lerp(
            self.coe_min,
            self.coe_max,
            self.weight_min,
            self.weight_max,
            weight,
        )
    }

    /// Mean of the two per-axis coefficients.
    ///
    /// Inputs outside the bracket extrapolate linearly past
    /// `[coe_min, coe_max]`.
    pub fn coefficient(&self, weight: f64, temperature: f64) -> f64 {
        (self.temperature_coefficient(temperature) + self.weight_coefficient(weight)) / 2.0
    }

    /// True when both inputs fall inside the bracket bounds.
    pub fn contains(&self, weight: f64, temperature: f64) -> bool {
        (self.weight_min..=self.weight_max).contains(&weight)
            && (self.t_min..=self.t_max).contains(&temperature)
    }
}

/// Build the `{weight_range}/{t_range}` key used by the store.
pub fn table_key(weight_range: &str, t_range: &str) -> String {
    format!("{weight_range}/{t_range}")
}

fn lerp(out_min: f64, out_max: f64, in_min: f64, in_max: f64, x: f64) -> f64 {
    out_min + (out_max - out_min) * (x - in_min) / (in_max - in_min)
}

/// Feed dosage for a desired feeding amount, rounded to one decimal.
///
/// Rounding is applied to the exact binary value with ties to even, so
/// `0.25` becomes `0.2` and a stored `0.3499..` stays `0.3`.
pub fn dosage(feeding_amount: f64, coefficient: f64) -> Result<f64, BracketError> {
    if coefficient == 0.0 || !coefficient.is_finite() {
        return Err(BracketError::ZeroCoefficient(coefficient));
    }
    let raw = feeding_amount / coefficient / DOSAGE_DIVISOR;
    Ok(format!("{raw:.1}").parse().unwrap_or(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bracket() -> FeedBracket {
        FeedBracket {
            weight_range: "100-200".to_string(),
            t_range: "20-30".to_string(),
            weight_min: 100.0,
            weight_max: 200.0,
            t_min: 20.0,
            t_max: 30.0,
            coe_min: 1.0,
            coe_max: 2.0,
            fcr: 1.2,
        }
    }

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn midpoint_example() {
        let b = bracket();
        assert_close(b.temperature_coefficient(25.0), 1.5);
        assert_close(b.weight_coefficient(150.0), 1.5);
        assert_close(b.coefficient(150.0, 25.0), 1.5);
    }

    #[test]
    fn lower_corner_is_coe_min() {
        let b = bracket();
        assert_close(b.coefficient(b.weight_min, b.t_min), b.coe_min);
    }

    #[test]
    fn upper_corner_is_coe_max() {
        let b = bracket();
        assert_close(b.coefficient(b.weight_max, b.t_max), b.coe_max);
    }

    #[test]
    fn flat_bracket_ignores_inputs() {
        let mut b = bracket();
        b.coe_max = b.coe_min;
        for (w, t) in [(100.0, 20.0), (130.0, 27.5), (200.0, 30.0)] {
            assert_close(b.coefficient(w, t), b.coe_min);
        }
    }

    #[test]
    fn axes_move_proportionally() {
        let b = bracket();
        let quarter = b.weight_coefficient(125.0) - b.coe_min;
        let half = b.weight_coefficient(150.0) - b.coe_min;
        assert_close(half, 2.0 * quarter);

        let quarter = b.temperature_coefficient(22.5) - b.coe_min;
        let half = b.temperature_coefficient(25.0) - b.coe_min;
        assert_close(half, 2.0 * quarter);
    }

    #[test]
    fn out_of_range_extrapolates() {
        let b = bracket();
        assert_close(b.weight_coefficient(300.0), 3.0);
        assert_close(b.temperature_coefficient(10.0), 0.0);
        assert!(!b.contains(300.0, 25.0));
        assert!(b.contains(150.0, 25.0));
    }

    #[test]
    fn validate_accepts_well_formed() {
        assert!(bracket().validate().is_ok());
    }

    #[test]
    fn validate_rejects_degenerate_weight() {
        let mut b = bracket();
        b.weight_max = b.weight_min;
        assert!(matches!(
            b.validate(),
            Err(BracketError::DegenerateWeightRange { .. })
        ));
    }

    #[test]
    fn validate_rejects_inverted_temperature() {
        let mut b = bracket();
        b.t_min = 35.0;
        assert!(matches!(
            b.validate(),
            Err(BracketError::DegenerateTemperatureRange { .. })
        ));
    }

    #[test]
    fn validate_rejects_nan() {
        let mut b = bracket();
        b.coe_max = f64::NAN;
        assert_eq!(
            b.validate(),
            Err(BracketError::NonFinite {
                key: "100-200/20-30".to_string(),
                field: "coe_max",
            })
        );
    }

    #[test]
    fn validate_rejects_bad_keys() {
        let mut b = bracket();
        b.t_range = "20/30".to_string();
        assert!(matches!(b.validate(), Err(BracketError::InvalidKey(_))));

        let mut b = bracket();
        b.weight_range = "  ".to_string();
        assert!(matches!(b.validate(), Err(BracketError::InvalidKey(_))));
    }

    #[test]
    fn dosage_rounds_to_one_decimal() {
        // 1000 / 1.5 / 500 = 1.333..
        assert_close(dosage(1000.0, 1.5).unwrap(), 1.3);
        // 2000 / 1.6 / 500 = 2.5
        assert_close(dosage(2000.0, 1.6).unwrap(), 2.5);
    }

    #[test]
    fn dosage_rounds_ties_to_even() {
        // 250 / 2 / 500 = 0.25, an exact tie.
        assert_eq!(dosage(250.0, 2.0).unwrap(), 0.2);
        // 350 / 2 / 500 is stored just below 0.35.
        assert_eq!(dosage(350.0, 2.0).unwrap(), 0.3);
        assert_eq!(dosage(750.0, 2.0).unwrap(), 0.8);
    }

    #[test]
    fn dosage_rejects_zero_coefficient() {
        assert_eq!(dosage(100.0, 0.0), Err(BracketError::ZeroCoefficient(0.0)));
    }
}

//! View types for dashboard template rendering.
//!
//! These types carry pre-formatted strings so templates stay simple.

use std::collections::BTreeSet;

use fishfeed_core::FeedBracket;
use fishfeed_store::Coefficient;

// ── Bracket Table ───────────────────────────────────────────────

pub struct BracketRow {
    pub weight_range: String,
    pub t_range: String,
    pub weight_bounds: String,
    pub t_bounds: String,
    pub coe_bounds: String,
    pub fcr: String,
}

impl BracketRow {
    pub fn from_bracket(b: &FeedBracket) -> Self {
        Self {
            weight_range: b.weight_range.clone(),
            t_range: b.t_range.clone(),
            weight_bounds: format!("{} – {} g", trim_float(b.weight_min), trim_float(b.weight_max)),
            t_bounds: format!("{} – {} °C", trim_float(b.t_min), trim_float(b.t_max)),
            coe_bounds: format!("{} – {}", trim_float(b.coe_min), trim_float(b.coe_max)),
            fcr: trim_float(b.fcr),
        }
    }
}

/// Options for the two range selects on the calculator form.
pub struct RangeOptions {
    pub weight_ranges: Vec<String>,
    pub t_ranges: Vec<String>,
}

impl RangeOptions {
    pub fn from_brackets(brackets: &[FeedBracket]) -> Self {
        let weight_ranges: BTreeSet<&str> =
            brackets.iter().map(|b| b.weight_range.as_str()).collect();
        let t_ranges: BTreeSet<&str> = brackets.iter().map(|b| b.t_range.as_str()).collect();
        Self {
            weight_ranges: weight_ranges.into_iter().map(String::from).collect(),
            t_ranges: t_ranges.into_iter().map(String::from).collect(),
        }
    }
}

// ── Calculation Result ──────────────────────────────────────────

pub struct ResultView {
    pub bracket_key: String,
    pub coefficient: String,
    pub temperature_coefficient: String,
    pub weight_coefficient: String,
    pub amount: String,
    pub in_range: bool,
}

impl ResultView {
    pub fn new(coe: &Coefficient, amount: f64) -> Self {
        Self {
            bracket_key: coe.bracket.table_key(),
            coefficient: format!("{:.4}", coe.value),
            temperature_coefficient: format!("{:.4}", coe.temperature_coefficient),
            weight_coefficient: format!("{:.4}", coe.weight_coefficient),
            amount: format!("{amount:.1}"),
            in_range: coe.in_range,
        }
    }
}

// ── Prediction Result ───────────────────────────────────────────

pub struct PredictionView {
    pub amount: String,
    pub temper: String,
    pub size: String,
    pub y_pred: String,
}

impl PredictionView {
    pub fn new(amount: f64, temper: f64, size: f64, y_pred: f64) -> Self {
        Self {
            amount: trim_float(amount),
            temper: trim_float(temper),
            size: trim_float(size),
            y_pred: format!("{y_pred:.4}"),
        }
    }
}

/// `12.0` → `"12"`, `12.5` → `"12.5"`.
pub fn trim_float(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{v:.0}")
    } else {
        v.to_string()
    }
}

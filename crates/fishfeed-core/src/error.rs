//! Errors raised by bracket validation and dosage arithmetic.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum BracketError {
    #[error("bracket {key}: weight_min ({min}) must be below weight_max ({max})")]
    DegenerateWeightRange { key: String, min: f64, max: f64 },

    #[error("bracket {key}: t_min ({min}) must be below t_max ({max})")]
    DegenerateTemperatureRange { key: String, min: f64, max: f64 },

    #[error("bracket {key}: field {field} is not a finite number")]
    NonFinite { key: String, field: &'static str },

    #[error("invalid bracket key {0:?}: must be non-empty and contain no '/'")]
    InvalidKey(String),

    #[error("coefficient {0} cannot be used to derive a dosage")]
    ZeroCoefficient(f64),
}

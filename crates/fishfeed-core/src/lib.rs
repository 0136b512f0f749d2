//! fishfeed-core — domain types and arithmetic for the feeding calculator.
//!
//! A [`FeedBracket`] is one row of the reference table: a weight range
//! crossed with a temperature range, plus the coefficient bounds that
//! apply inside it. The coefficient for a fish is the mean of two linear
//! interpolations (one per axis) into `[coe_min, coe_max]`.

pub mod bracket;
pub mod config;
pub mod error;
pub mod seed;

pub use bracket::{DOSAGE_DIVISOR, FeedBracket, dosage};
pub use config::FishfeedConfig;
pub use error::BracketError;
pub use seed::BracketSeed;

//! fishfeed-model — the feed prediction model.
//!
//! The network is trained elsewhere and exported as JSON: a list of dense
//! layers in `nn.Linear` layout (`weights` is `out × in`) with an
//! activation per layer. This crate only evaluates it.
//!
//! [`ModelHandle`] is the process-wide entry point: cheap to clone, loads
//! the weights at most once, and hands out a shared read-only model.

pub mod error;
pub mod handle;
pub mod network;

pub use error::ModelError;
pub use handle::ModelHandle;
pub use network::{Activation, FeedModel};

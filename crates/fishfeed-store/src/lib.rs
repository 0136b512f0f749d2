//! fishfeed-store — read-mostly reference data for the feeding calculator.
//!
//! Backed by [redb](https://docs.rs/redb). Each [`FeedBracket`] is
//! JSON-serialized into a `&[u8]` value keyed by `{weight_range}/{t_range}`,
//! so a coefficient lookup is a single point read.
//!
//! `BracketStore` is `Clone` + `Send` + `Sync` (backed by `Arc<Database>`)
//! and is handed to request handlers explicitly. Every operation opens its
//! own transaction and drops it before returning.
//!
//! [`FeedBracket`]: fishfeed_core::FeedBracket

pub mod error;
pub mod store;
pub mod tables;

pub use error::{StoreError, StoreResult};
pub use store::{BracketStore, Coefficient};

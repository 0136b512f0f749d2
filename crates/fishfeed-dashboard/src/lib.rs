//! fishfeed-dashboard — server-rendered web UI for the feeding calculator.
//!
//! Provides axum route handlers that render Askama templates. Form posts
//! sent by htmx (`HX-Request` header) get an HTML fragment back; plain
//! form posts get the whole page re-rendered with the result in place.
//!
//! # Routes
//!
//! | Route | Handler |
//! |---|---|
//! | `GET /` | Coefficient calculator |
//! | `GET /feed/` | Model prediction form |
//! | `POST /calculate/` | Coefficient + dosage |
//! | `POST /predict/` | Model prediction |

pub mod actions;
pub mod counters;
pub mod pages;
pub mod views;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use fishfeed_model::ModelHandle;
use fishfeed_store::BracketStore;

pub use counters::RequestCounters;

/// Shared state for dashboard handlers.
#[derive(Clone)]
pub struct DashboardState {
    pub store: BracketStore,
    pub model: ModelHandle,
    pub counters: Arc<RequestCounters>,
}

impl DashboardState {
    pub fn new(store: BracketStore, model: ModelHandle) -> Self {
        Self {
            store,
            model,
            counters: Arc::new(RequestCounters::default()),
        }
    }
}

/// Build the dashboard router.
pub fn dashboard_router(state: DashboardState) -> Router {
    Router::new()
        .route("/", get(pages::index))
        .route("/feed/", get(pages::predict_page))
        .route("/calculate/", post(actions::calculate))
        .route("/predict/", post(actions::predict))
        .with_state(state)
}

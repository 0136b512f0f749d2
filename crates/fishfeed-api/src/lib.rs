//! fishfeed-api — JSON API for the feeding calculator.
//!
//! Provides axum route handlers over the bracket store and the prediction
//! model, and assembles them with the dashboard into one router.
//!
//! # API Routes
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | GET | `/api/v1/brackets` | List reference brackets |
//! | GET | `/api/v1/brackets/:weight_range/:t_range` | Get one bracket |
//! | POST | `/api/v1/coefficient` | Interpolate a coefficient and dosage |
//! | POST | `/api/v1/predict` | Run the prediction model |
//! | GET | `/healthz` | Liveness |
//! | GET | `/metrics` | Prometheus exposition |

pub mod handlers;
pub mod prometheus;

use axum::Router;
use axum::routing::{get, post};
use fishfeed_dashboard::DashboardState;

/// Shared state for API handlers. Same handles as the dashboard.
pub type ApiState = DashboardState;

/// Build the complete router (JSON API + dashboard + metrics).
pub fn build_router(state: DashboardState) -> Router {
    let api_routes = Router::new()
        .route("/brackets", get(handlers::list_brackets))
        .route("/brackets/{weight_range}/{t_range}", get(handlers::get_bracket))
        .route("/coefficient", post(handlers::compute_coefficient))
        .route("/predict", post(handlers::predict))
        .with_state(state.clone());

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/healthz", get(handlers::healthz).with_state(state.clone()))
        .route("/metrics", get(handlers::prometheus_metrics).with_state(state.clone()))
        .merge(fishfeed_dashboard::dashboard_router(state))
}

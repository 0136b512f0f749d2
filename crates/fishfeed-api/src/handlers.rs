//! JSON API handlers.
//!
//! Each handler reads via `BracketStore` or `ModelHandle` and returns the
//! `{ success, data, error }` envelope.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::{debug, warn};

use fishfeed_core::bracket::table_key;
use fishfeed_core::dosage;
use fishfeed_dashboard::RequestCounters;
use fishfeed_store::{Coefficient, StoreError};

use crate::ApiState;

/// Response wrapper for consistent API format.
#[derive(serde::Serialize)]
struct ApiResponse<T: serde::Serialize> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T: serde::Serialize> ApiResponse<T> {
    fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            error: None,
        })
    }
}

fn error_response(msg: &str, status: StatusCode) -> Response {
    (
        status,
        Json(ApiResponse::<()> {
            success: false,
            data: None,
            error: Some(msg.to_string()),
        }),
    )
        .into_response()
}

fn store_error(state: &ApiState, e: StoreError) -> Response {
    match e {
        StoreError::NotFound(key) => {
            RequestCounters::bump(&state.counters.not_found);
            error_response(
                &format!("feeding schedule not found: {key}"),
                StatusCode::NOT_FOUND,
            )
        }
        e => {
            warn!(error = %e, "store error");
            error_response(&e.to_string(), StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

fn bad_request(state: &ApiState, msg: &str) -> Response {
    RequestCounters::bump(&state.counters.bad_requests);
    error_response(msg, StatusCode::BAD_REQUEST)
}

// ── Brackets ───────────────────────────────────────────────────

/// GET /api/v1/brackets
pub async fn list_brackets(State(state): State<ApiState>) -> Response {
    match state.store.list_brackets() {
        Ok(brackets) => ApiResponse::ok(brackets).into_response(),
        Err(e) => store_error(&state, e),
    }
}

/// GET /api/v1/brackets/:weight_range/:t_range
pub async fn get_bracket(
    State(state): State<ApiState>,
    Path((weight_range, t_range)): Path<(String, String)>,
) -> Response {
    match state.store.get_bracket(&weight_range, &t_range) {
        Ok(Some(bracket)) => ApiResponse::ok(bracket).into_response(),
        Ok(None) => store_error(
            &state,
            StoreError::NotFound(table_key(&weight_range, &t_range)),
        ),
        Err(e) => store_error(&state, e),
    }
}

// ── Coefficient ────────────────────────────────────────────────

#[derive(Debug, serde::Deserialize, serde::Serialize)]
pub struct CoefficientRequest {
    pub weight: f64,
    pub temperature: f64,
    pub weight_range: String,
    pub t_range: String,
    /// When present, the dosage for this amount is derived as well.
    #[serde(default)]
    pub feeding_amount: Option<f64>,
}

#[derive(Debug, serde::Serialize)]
pub struct CoefficientResponse {
    #[serde(flatten)]
    pub coefficient: Coefficient,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dosage: Option<f64>,
}

/// POST /api/v1/coefficient
pub async fn compute_coefficient(
    State(state): State<ApiState>,
    req: Result<Json<CoefficientRequest>, JsonRejection>,
) -> Response {
    let req = match req {
        Ok(Json(req)) => req,
        Err(rejection) => return bad_request(&state, &rejection.body_text()),
    };
    let amount_ok = req.feeding_amount.is_none_or(f64::is_finite);
    if !req.weight.is_finite() || !req.temperature.is_finite() || !amount_ok {
        return bad_request(&state, "numeric inputs must be finite");
    }

    let coefficient = match state.store.compute_coefficient(
        req.weight,
        req.temperature,
        &req.weight_range,
        &req.t_range,
    ) {
        Ok(c) => c,
        Err(e) => return store_error(&state, e),
    };

    let dosage = match req.feeding_amount {
        Some(amount) => match dosage(amount, coefficient.value) {
            Ok(d) => Some(d),
            Err(e) => return error_response(&e.to_string(), StatusCode::UNPROCESSABLE_ENTITY),
        },
        None => None,
    };
    RequestCounters::bump(&state.counters.calculations);
    debug!(coefficient = coefficient.value, ?dosage, "coefficient served");

    ApiResponse::ok(CoefficientResponse {
        coefficient,
        dosage,
    })
    .into_response()
}

// ── Prediction ─────────────────────────────────────────────────

#[derive(Debug, serde::Deserialize, serde::Serialize)]
pub struct PredictRequest {
    pub amount: f64,
    pub temper: f64,
    pub size: f64,
}

/// POST /api/v1/predict
pub async fn predict(
    State(state): State<ApiState>,
    req: Result<Json<PredictRequest>, JsonRejection>,
) -> Response {
    let req = match req {
        Ok(Json(req)) => req,
        Err(rejection) => return bad_request(&state, &rejection.body_text()),
    };

    let model = match state.model.get().await {
        Ok(model) => model,
        Err(e) => {
            RequestCounters::bump(&state.counters.model_unavailable);
            return error_response(
                &format!("prediction model unavailable: {e}"),
                StatusCode::SERVICE_UNAVAILABLE,
            );
        }
    };
    match model.predict(req.amount, req.temper, req.size) {
        Ok(y_pred) => {
            RequestCounters::bump(&state.counters.predictions);
            ApiResponse::ok(serde_json::json!({ "y_pred": y_pred })).into_response()
        }
        Err(e) => bad_request(&state, &e.to_string()),
    }
}

// ── Health & metrics ───────────────────────────────────────────

/// GET /healthz
pub async fn healthz(State(state): State<ApiState>) -> Response {
    match state.store.count() {
        Ok(brackets) => ApiResponse::ok(serde_json::json!({
            "status": "ok",
            "brackets": brackets,
            "model_loaded": state.model.is_loaded(),
        }))
        .into_response(),
        Err(e) => store_error(&state, e),
    }
}

/// GET /metrics
pub async fn prometheus_metrics(State(state): State<ApiState>) -> impl IntoResponse {
    let brackets = state
        .store
        .count()
        .inspect_err(|e| warn!(error = %e, "bracket count unavailable for metrics"))
        .ok();
    let body = crate::prometheus::render_prometheus(
        &state.counters.snapshot(),
        brackets,
        state.model.is_loaded(),
    );
    (
        StatusCode::OK,
        [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
        body,
    )
}

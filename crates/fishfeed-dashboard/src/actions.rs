//! Dashboard form endpoints.
//!
//! htmx posts (`HX-Request` header present) get a fragment for swapping
//! into the result panel; plain posts get the full page back.

use askama::Template;
use axum::extract::rejection::FormRejection;
use axum::extract::{Form, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use tracing::{debug, info, warn};

use fishfeed_core::dosage;
use fishfeed_store::StoreError;

use crate::DashboardState;
use crate::counters::RequestCounters;
use crate::pages::{IndexTemplate, PredictTemplate, render};
use crate::views::{PredictionView, ResultView};

fn is_htmx(headers: &HeaderMap) -> bool {
    headers.contains_key("hx-request")
}

#[derive(Template)]
#[template(path = "_partials/result.html")]
struct ResultPartial {
    outcome: ResultView,
}

#[derive(Template)]
#[template(path = "_partials/x_result.html")]
struct PredictionPartial {
    prediction: PredictionView,
}

#[derive(Template)]
#[template(path = "_partials/error.html")]
struct ErrorPartial {
    message: String,
}

// ── Calculate ───────────────────────────────────────────────────

#[derive(Debug, serde::Deserialize)]
pub struct CalculateForm {
    pub weight: f64,
    pub temperature: f64,
    pub weight_range: String,
    pub t_range: String,
    pub feeding_amount: f64,
}

pub async fn calculate(
    State(state): State<DashboardState>,
    headers: HeaderMap,
    form: Result<Form<CalculateForm>, FormRejection>,
) -> Response {
    let htmx = is_htmx(&headers);
    let fail = |status: StatusCode, message: String| {
        if htmx {
            (status, render(ErrorPartial { message })).into_response()
        } else {
            let page = IndexTemplate::build(&state, None, Some(message));
            (status, render(page)).into_response()
        }
    };

    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            RequestCounters::bump(&state.counters.bad_requests);
            debug!(error = %rejection, "rejected calculate form");
            return fail(StatusCode::BAD_REQUEST, rejection.body_text());
        }
    };
    if ![form.weight, form.temperature, form.feeding_amount]
        .iter()
        .all(|v| v.is_finite())
    {
        RequestCounters::bump(&state.counters.bad_requests);
        return fail(
            StatusCode::BAD_REQUEST,
            "weight, temperature and feeding amount must be finite numbers".to_string(),
        );
    }

    info!(
        weight = form.weight,
        temperature = form.temperature,
        weight_range = %form.weight_range,
        t_range = %form.t_range,
        feeding_amount = form.feeding_amount,
        "calculate"
    );

    let coe = match state.store.compute_coefficient(
        form.weight,
        form.temperature,
        &form.weight_range,
        &form.t_range,
    ) {
        Ok(coe) => coe,
        Err(StoreError::NotFound(key)) => {
            RequestCounters::bump(&state.counters.not_found);
            return fail(
                StatusCode::NOT_FOUND,
                format!("Feeding schedule not found for {key}"),
            );
        }
        Err(e) => {
            warn!(error = %e, "coefficient lookup failed");
            return fail(StatusCode::INTERNAL_SERVER_ERROR, e.to_string());
        }
    };

    let amount = match dosage(form.feeding_amount, coe.value) {
        Ok(amount) => amount,
        Err(e) => return fail(StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
    };
    RequestCounters::bump(&state.counters.calculations);

    let outcome = ResultView::new(&coe, amount);
    if htmx {
        render(ResultPartial { outcome }).into_response()
    } else {
        render(IndexTemplate::build(&state, Some(outcome), None)).into_response()
    }
}

// ── Predict ─────────────────────────────────────────────────────

#[derive(Debug, serde::Deserialize)]
pub struct PredictForm {
    pub amount: f64,
    pub temper: f64,
    pub size: f64,
}

pub async fn predict(
    State(state): State<DashboardState>,
    headers: HeaderMap,
    form: Result<Form<PredictForm>, FormRejection>,
) -> Response {
    let htmx = is_htmx(&headers);
    let fail = |status: StatusCode, message: String| {
        if htmx {
            (status, render(ErrorPartial { message })).into_response()
        } else {
            let page = PredictTemplate::build(&state, None, Some(message));
            (status, render(page)).into_response()
        }
    };

    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            RequestCounters::bump(&state.counters.bad_requests);
            return fail(StatusCode::BAD_REQUEST, rejection.body_text());
        }
    };

    info!(amount = form.amount, temper = form.temper, size = form.size, "predict");

    let model = match state.model.get().await {
        Ok(model) => model,
        Err(e) => {
            RequestCounters::bump(&state.counters.model_unavailable);
            warn!(error = %e, "prediction model unavailable");
            return fail(
                StatusCode::SERVICE_UNAVAILABLE,
                format!("Prediction model unavailable: {e}"),
            );
        }
    };
    let y_pred = match model.predict(form.amount, form.temper, form.size) {
        Ok(y) => y,
        Err(e) => {
            RequestCounters::bump(&state.counters.bad_requests);
            return fail(StatusCode::BAD_REQUEST, e.to_string());
        }
    };
    RequestCounters::bump(&state.counters.predictions);
    debug!(y_pred, "prediction");

    let prediction = PredictionView::new(form.amount, form.temper, form.size, y_pred);
    if htmx {
        render(PredictionPartial { prediction }).into_response()
    } else {
        render(PredictTemplate::build(&state, Some(prediction), None)).into_response()
    }
}

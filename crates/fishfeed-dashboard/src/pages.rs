//! Dashboard page handlers.
//!
//! Each handler reads the bracket store, builds view types, and renders
//! an Askama template. Form handlers live in `actions.rs` and re-use the
//! page templates for non-htmx submissions.

use askama::Template;
use axum::extract::State;
use axum::response::Html;
use tracing::warn;

use crate::DashboardState;
use crate::views::*;

pub(crate) fn render<T: Template>(tmpl: T) -> Html<String> {
    Html(tmpl.render().unwrap_or_else(|e| {
        format!("<pre>Template error: {e}</pre>")
    }))
}

// ── Calculator ──────────────────────────────────────────────────

#[derive(Template)]
#[template(path = "index.html")]
pub(crate) struct IndexTemplate {
    pub active_page: &'static str,
    pub brackets: Vec<BracketRow>,
    pub options: RangeOptions,
    pub result: Option<ResultView>,
    pub error: Option<String>,
}

impl IndexTemplate {
    pub(crate) fn build(
        state: &DashboardState,
        result: Option<ResultView>,
        error: Option<String>,
    ) -> Self {
        let brackets = state.store.list_brackets().unwrap_or_else(|e| {
            warn!(error = %e, "failed to list brackets");
            Vec::new()
        });
        Self {
            active_page: "calculate",
            options: RangeOptions::from_brackets(&brackets),
            brackets: brackets.iter().map(BracketRow::from_bracket).collect(),
            result,
            error,
        }
    }
}

pub async fn index(State(state): State<DashboardState>) -> Html<String> {
    render(IndexTemplate::build(&state, None, None))
}

// ── Predictor ───────────────────────────────────────────────────

#[derive(Template)]
#[template(path = "predict.html")]
pub(crate) struct PredictTemplate {
    pub active_page: &'static str,
    pub model_loaded: bool,
    pub prediction: Option<PredictionView>,
    pub error: Option<String>,
}

impl PredictTemplate {
    pub(crate) fn build(
        state: &DashboardState,
        prediction: Option<PredictionView>,
        error: Option<String>,
    ) -> Self {
        Self {
            active_page: "predict",
            model_loaded: state.model.is_loaded(),
            prediction,
            error,
        }
    }
}

pub async fn predict_page(State(state): State<DashboardState>) -> Html<String> {
    render(PredictTemplate::build(&state, None, None))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;
    use fishfeed_core::FeedBracket;
    use fishfeed_model::ModelHandle;
    use fishfeed_store::BracketStore;

    fn test_state() -> DashboardState {
        let store = BracketStore::open_in_memory().unwrap();
        DashboardState::new(store, ModelHandle::new("/nonexistent/model.json"))
    }

    #[tokio::test]
    async fn index_renders_empty_store() {
        let state = test_state();
        let resp = index(State(state)).await;
        assert!(resp.0.contains("<form"));
        let resp = resp.into_response();
        assert_eq!(resp.status(), 200);
    }

    #[tokio::test]
    async fn index_lists_brackets() {
        let state = test_state();
        state
            .store
            .put_bracket(&FeedBracket {
                weight_range: "50-100".to_string(),
                t_range: "25-30".to_string(),
                weight_min: 50.0,
                weight_max: 100.0,
                t_min: 25.0,
                t_max: 30.0,
                coe_min: 1.8,
                coe_max: 2.4,
                fcr: 1.0,
            })
            .unwrap();

        let Html(body) = index(State(state)).await;
        assert!(body.contains("50-100"));
        assert!(body.contains("25-30"));
    }

    #[tokio::test]
    async fn predict_page_renders() {
        let state = test_state();
        let Html(body) = predict_page(State(state)).await;
        assert!(body.contains("name=\"temper\""));
    }
}

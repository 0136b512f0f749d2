//! Prometheus text exposition for the request counters.

use fishfeed_dashboard::counters::CounterSnapshot;

/// Render counters and store gauges in Prometheus text format.
///
/// `brackets` is `None` when the store could not be read; the gauge is
/// then omitted rather than reported as zero.
pub fn render_prometheus(
    counters: &CounterSnapshot,
    brackets: Option<usize>,
    model_loaded: bool,
) -> String {
    let mut out = String::new();

    let series: [(&str, &str, u64); 5] = [
        (
            "fishfeed_calculations_total",
            "Coefficient calculations served.",
            counters.calculations,
        ),
        (
            "fishfeed_predictions_total",
            "Model predictions served.",
            counters.predictions,
        ),
        (
            "fishfeed_not_found_total",
            "Calculations with no matching bracket.",
            counters.not_found,
        ),
        (
            "fishfeed_bad_requests_total",
            "Requests rejected for malformed input.",
            counters.bad_requests,
        ),
        (
            "fishfeed_model_unavailable_total",
            "Predictions refused because the model could not be loaded.",
            counters.model_unavailable,
        ),
    ];
    for (name, help, value) in series {
        out.push_str(&format!("# HELP {name} {help}\n"));
        out.push_str(&format!("# TYPE {name} counter\n"));
        out.push_str(&format!("{name} {value}\n"));
    }

    if let Some(brackets) = brackets {
        out.push_str("# HELP fishfeed_brackets Reference brackets loaded.\n");
        out.push_str("# TYPE fishfeed_brackets gauge\n");
        out.push_str(&format!("fishfeed_brackets {brackets}\n"));
    }

    out.push_str("# HELP fishfeed_model_loaded Whether the prediction model is in memory.\n");
    out.push_str("# TYPE fishfeed_model_loaded gauge\n");
    out.push_str(&format!("fishfeed_model_loaded {}\n", u8::from(model_loaded)));

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_all_series() {
        let snapshot = CounterSnapshot {
            calculations: 3,
            predictions: 1,
            not_found: 2,
            bad_requests: 0,
            model_unavailable: 0,
        };
        let text = render_prometheus(&snapshot, Some(12), true);
        assert!(text.contains("fishfeed_calculations_total 3\n"));
        assert!(text.contains("fishfeed_not_found_total 2\n"));
        assert!(text.contains("# TYPE fishfeed_predictions_total counter\n"));
        assert!(text.contains("fishfeed_brackets 12\n"));
        assert!(text.contains("fishfeed_model_loaded 1\n"));
    }

    #[test]
    fn unreadable_store_omits_bracket_gauge() {
        let snapshot = CounterSnapshot {
            calculations: 0,
            predictions: 0,
            not_found: 0,
            bad_requests: 0,
            model_unavailable: 0,
        };
        let text = render_prometheus(&snapshot, None, false);
        assert!(!text.contains("fishfeed_brackets"));
        assert!(text.contains("fishfeed_model_loaded 0\n"));
    }
}

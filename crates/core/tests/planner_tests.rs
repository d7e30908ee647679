// ═══════════════════════════════════════════════════════════════════
// Planner & Provider Tests — HTTP contract helpers, SalesPlanner facade
// ═══════════════════════════════════════════════════════════════════

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use reqwest::StatusCode;

use adspend_planner_core::errors::CoreError;
use adspend_planner_core::models::budget::BudgetAllocation;
use adspend_planner_core::models::chart::InsightKind;
use adspend_planner_core::models::settings::{Settings, DEFAULT_HISTORY_KEY};
use adspend_planner_core::providers::http::{parse_response, status_error, HttpPredictionProvider};
use adspend_planner_core::providers::traits::PredictionProvider;
use adspend_planner_core::storage::memory::MemoryStore;
use adspend_planner_core::telemetry::init_tracing;
use adspend_planner_core::SalesPlanner;

// ═══════════════════════════════════════════════════════════════════
// Mock Providers
// ═══════════════════════════════════════════════════════════════════

/// Predicts `tv * 0.05 + radio * 0.1 + newspaper * 0.01` and counts calls.
struct LinearMockProvider {
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl PredictionProvider for LinearMockProvider {
    fn name(&self) -> &str {
        "LinearMock"
    }

    async fn predict(&self, budgets: &BudgetAllocation) -> Result<f64, CoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(budgets.tv * 0.05 + budgets.radio * 0.1 + budgets.newspaper * 0.01)
    }
}

/// A mock that always reports the model as still loading.
struct LoadingMockProvider;

#[async_trait]
impl PredictionProvider for LoadingMockProvider {
    fn name(&self) -> &str {
        "LoadingMock"
    }

    async fn predict(&self, _budgets: &BudgetAllocation) -> Result<f64, CoreError> {
        Err(CoreError::ModelUnavailable)
    }
}

fn planner_with_mock(store: Arc<MemoryStore>) -> (SalesPlanner<Arc<MemoryStore>>, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let provider = LinearMockProvider {
        calls: calls.clone(),
    };
    let planner = SalesPlanner::new(Settings::default(), store, Box::new(provider)).unwrap();
    (planner, calls)
}

// ═══════════════════════════════════════════════════════════════════
// HTTP provider helpers
// ═══════════════════════════════════════════════════════════════════

mod http_provider {
    use super::*;

    #[test]
    fn predict_url_joins_base() {
        let p = HttpPredictionProvider::new("http://localhost:8000");
        assert_eq!(p.predict_url(), "http://localhost:8000/predict");
    }

    #[test]
    fn predict_url_trims_trailing_slash() {
        let p = HttpPredictionProvider::new("https://api.example.com/v1/");
        assert_eq!(p.predict_url(), "https://api.example.com/v1/predict");
    }

    #[test]
    fn from_settings_uses_base_url() {
        let settings = Settings {
            api_base_url: "http://10.0.0.2:9000".into(),
            ..Settings::default()
        };
        let p = HttpPredictionProvider::from_settings(&settings);
        assert_eq!(p.predict_url(), "http://10.0.0.2:9000/predict");
        assert_eq!(p.name(), "PredictionApi");
    }

    #[test]
    fn service_unavailable_means_model_loading() {
        let err = status_error(StatusCode::SERVICE_UNAVAILABLE, r#"{"detail":"Model is not loaded."}"#);
        assert!(matches!(err, CoreError::ModelUnavailable));
    }

    #[test]
    fn other_statuses_are_api_errors() {
        let err = status_error(StatusCode::INTERNAL_SERVER_ERROR, "boom");
        match err {
            CoreError::Api { provider, message } => {
                assert_eq!(provider, "PredictionApi");
                assert!(message.contains("500"));
                assert!(message.contains("boom"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn empty_body_still_reports_status() {
        let err = status_error(StatusCode::UNPROCESSABLE_ENTITY, "  ");
        assert!(err.to_string().contains("422"));
    }

    #[test]
    fn parses_prediction() {
        assert_eq!(parse_response(r#"{"predicted_sales": 15.75}"#).unwrap(), 15.75);
    }

    #[test]
    fn rejects_malformed_body() {
        let err = parse_response("<html>oops</html>").unwrap_err();
        assert!(matches!(err, CoreError::Api { .. }));
        let err = parse_response(r#"{"sales": 1.0}"#).unwrap_err();
        assert!(err.to_string().contains("Failed to parse prediction response"));
    }

    #[tokio::test]
    async fn unreachable_backend_is_network_error() {
        // Port 9 (discard) on localhost is almost never listening.
        let p = HttpPredictionProvider::new("http://127.0.0.1:9");
        let err = p.predict(&BudgetAllocation::new(1.0, 1.0, 1.0)).await.unwrap_err();
        assert!(matches!(err, CoreError::Network(_)), "got {err:?}");
    }
}

// ═══════════════════════════════════════════════════════════════════
// SalesPlanner facade
// ═══════════════════════════════════════════════════════════════════

mod sales_planner {
    use super::*;

    #[test]
    fn rejects_invalid_settings() {
        let settings = Settings {
            history_capacity: 0,
            ..Settings::default()
        };
        let err = SalesPlanner::new(settings, MemoryStore::new(), Box::new(LoadingMockProvider))
            .unwrap_err();
        assert!(matches!(err, CoreError::Config(_)));
    }

    #[test]
    fn allocation_chart_delegates_to_chart_model() {
        let (planner, _) = planner_with_mock(Arc::new(MemoryStore::new()));
        let chart = planner.allocation_chart(&BudgetAllocation::new(300.0, 100.0, 100.0));
        assert_eq!(chart.insight.kind, InsightKind::TvDominant);
        assert_eq!(chart.total, 500.0);
    }

    #[test]
    fn allocation_chart_from_form_coerces_input() {
        let (planner, _) = planner_with_mock(Arc::new(MemoryStore::new()));
        let chart = planner.allocation_chart_from_form("", "abc", "");
        assert_eq!(chart.total, 0.0);
        assert_eq!(chart.insight.kind, InsightKind::NoBudget);
    }

    #[tokio::test]
    async fn successful_prediction_is_recorded() {
        let (mut planner, calls) = planner_with_mock(Arc::new(MemoryStore::new()));
        let budgets = BudgetAllocation::new(100.0, 20.0, 10.0);
        let prediction = planner.predict(budgets).await.unwrap();

        assert!((prediction - 7.1).abs() < 1e-9);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(planner.history().len(), 1);
        let last = planner.last_prediction().unwrap();
        assert_eq!(last.budgets, budgets);
        assert_eq!(last.prediction, prediction);
    }

    #[tokio::test]
    async fn failed_prediction_leaves_history_untouched() {
        let store = Arc::new(MemoryStore::new());
        let mut planner =
            SalesPlanner::new(Settings::default(), store.clone(), Box::new(LoadingMockProvider))
                .unwrap();
        let err = planner.predict(BudgetAllocation::new(1.0, 2.0, 3.0)).await.unwrap_err();
        assert!(matches!(err, CoreError::ModelUnavailable));
        assert!(planner.history().is_empty());
        assert!(!store.contains(DEFAULT_HISTORY_KEY));
    }

    #[tokio::test]
    async fn form_validation_runs_before_the_provider() {
        let (mut planner, calls) = planner_with_mock(Arc::new(MemoryStore::new()));
        let err = planner.predict_from_form("100", "", "5").await.unwrap_err();
        assert_eq!(err.to_string(), "Validation failed: Please fill in all fields.");
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let ok = planner.predict_from_form("100", "20", "10").await.unwrap();
        assert!((ok - 7.1).abs() < 1e-9);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn history_is_bounded_through_the_facade() {
        let (mut planner, _) = planner_with_mock(Arc::new(MemoryStore::new()));
        for i in 0..15 {
            planner
                .predict(BudgetAllocation::new(i as f64, 0.0, 0.0))
                .await
                .unwrap();
        }
        assert_eq!(planner.history().len(), 10);
        assert_eq!(planner.history()[0].budgets.tv, 14.0);
        assert_eq!(planner.history()[9].budgets.tv, 5.0);
    }

    #[tokio::test]
    async fn history_survives_planner_restart() {
        let store = Arc::new(MemoryStore::new());
        {
            let (mut planner, _) = planner_with_mock(store.clone());
            planner.predict(BudgetAllocation::new(10.0, 10.0, 10.0)).await.unwrap();
        }
        let (planner, _) = planner_with_mock(store);
        assert_eq!(planner.history().len(), 1);
    }

    #[test]
    fn record_and_clear() {
        let store = Arc::new(MemoryStore::new());
        let (mut planner, _) = planner_with_mock(store.clone());
        let id = planner
            .record_prediction(12.0, BudgetAllocation::new(1.0, 2.0, 3.0))
            .id;
        assert_eq!(planner.last_prediction().unwrap().id, id);

        planner.clear_history();
        assert!(planner.history().is_empty());
        assert!(!store.contains(DEFAULT_HISTORY_KEY));

        let (reopened, _) = planner_with_mock(store);
        assert!(reopened.history().is_empty());
    }

    #[test]
    fn history_view_labels_entries() {
        let (mut planner, _) = planner_with_mock(Arc::new(MemoryStore::new()));
        planner.record_prediction(9.5, BudgetAllocation::new(1.0, 1.0, 1.0));
        let view = planner.history_view(Utc::now() + Duration::minutes(3));
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].recency, "3m ago");
        assert_eq!(view[0].prediction_label, "$9.50k");
    }

    #[test]
    fn ephemeral_and_debug() {
        let planner = SalesPlanner::ephemeral(Settings::default()).unwrap();
        let debug = format!("{planner:?}");
        assert!(debug.contains("SalesPlanner"));
        assert!(debug.contains("PredictionApi"));
        assert_eq!(planner.settings(), &Settings::default());
    }

    #[test]
    fn open_dir_persists_to_files() {
        let tmp = tempfile::tempdir().unwrap();
        {
            let mut planner = SalesPlanner::open_dir(Settings::default(), tmp.path()).unwrap();
            planner.record_prediction(4.2, BudgetAllocation::new(5.0, 5.0, 5.0));
        }
        assert!(tmp.path().join("predictionHistory.json").exists());
        let planner = SalesPlanner::open_dir(Settings::default(), tmp.path()).unwrap();
        assert_eq!(planner.history().len(), 1);
        assert_eq!(planner.history()[0].prediction, 4.2);
    }

    #[test]
    fn into_store_returns_persisted_state() {
        let (mut planner, _) = planner_with_mock(Arc::new(MemoryStore::new()));
        planner.record_prediction(1.0, BudgetAllocation::new(1.0, 0.0, 0.0));
        let store = planner.into_store();
        assert!(store.contains(DEFAULT_HISTORY_KEY));
    }
}

// ═══════════════════════════════════════════════════════════════════
// Telemetry
// ═══════════════════════════════════════════════════════════════════

mod telemetry {
    use super::*;

    #[test]
    fn init_tracing_is_idempotent() {
        let _ = init_tracing();
        assert!(!init_tracing());
    }
}

pub mod errors;
pub mod models;
pub mod providers;
pub mod services;
pub mod storage;
pub mod telemetry;

use chrono::{DateTime, Utc};
use models::{
    budget::BudgetAllocation,
    chart::AllocationChart,
    prediction::{HistoryEntry, PredictionRecord},
    settings::Settings,
};
use providers::{http::HttpPredictionProvider, traits::PredictionProvider};
use services::{chart_service::ChartService, history_service::PredictionHistoryLog};
use storage::{memory::MemoryStore, traits::KeyValueStore};
use tracing::{info, warn};

use errors::CoreError;

/// Main entry point for the ad-spend planner core library.
/// Holds the chart model, the prediction history and the prediction backend.
#[must_use]
pub struct SalesPlanner<S: KeyValueStore> {
    settings: Settings,
    chart_service: ChartService,
    history: PredictionHistoryLog<S>,
    provider: Box<dyn PredictionProvider>,
}

impl<S: KeyValueStore> std::fmt::Debug for SalesPlanner<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SalesPlanner")
            .field("provider", &self.provider.name())
            .field("history", &self.history.len())
            .field("settings", &self.settings)
            .finish()
    }
}

impl<S: KeyValueStore> SalesPlanner<S> {
    /// Build a planner over `store` with an explicit prediction provider.
    /// Persisted history under `settings.history_key` is loaded immediately.
    pub fn new(
        settings: Settings,
        store: S,
        provider: Box<dyn PredictionProvider>,
    ) -> Result<Self, CoreError> {
        settings.validate()?;
        let chart_service = ChartService::with_settings(&settings);
        let history = PredictionHistoryLog::with_settings(store, &settings);
        Ok(Self {
            settings,
            chart_service,
            history,
            provider,
        })
    }

    /// Build a planner that talks to the HTTP backend at `settings.api_base_url`.
    pub fn with_http_provider(settings: Settings, store: S) -> Result<Self, CoreError> {
        let provider = HttpPredictionProvider::from_settings(&settings);
        Self::new(settings, store, Box::new(provider))
    }

    // ── Allocation Chart ────────────────────────────────────────────

    /// Segments, ring geometry and insight for an allocation.
    pub fn allocation_chart(&self, budgets: &BudgetAllocation) -> AllocationChart {
        self.chart_service.compute_segments(budgets)
    }

    /// Chart for raw form fields; unparseable fields count as 0.
    pub fn allocation_chart_from_form(
        &self,
        tv: &str,
        radio: &str,
        newspaper: &str,
    ) -> AllocationChart {
        let budgets = BudgetAllocation::from_form_lenient(tv, radio, newspaper);
        self.chart_service.compute_segments(&budgets)
    }

    // ── Predictions ─────────────────────────────────────────────────

    /// Ask the provider for a prediction and record it on success.
    /// On failure the history is left untouched.
    pub async fn predict(&mut self, budgets: BudgetAllocation) -> Result<f64, CoreError> {
        match self.provider.predict(&budgets).await {
            Ok(prediction) => {
                info!(provider = self.provider.name(), prediction, "prediction received");
                self.history.append(prediction, budgets);
                Ok(prediction)
            }
            Err(e) => {
                warn!(provider = self.provider.name(), error = %e, "prediction failed");
                Err(e)
            }
        }
    }

    /// Validate raw form fields, then predict.
    pub async fn predict_from_form(
        &mut self,
        tv: &str,
        radio: &str,
        newspaper: &str,
    ) -> Result<f64, CoreError> {
        let budgets = BudgetAllocation::from_form_strict(tv, radio, newspaper)?;
        self.predict(budgets).await
    }

    /// Record a prediction obtained outside this planner.
    pub fn record_prediction(
        &mut self,
        prediction: f64,
        budgets: BudgetAllocation,
    ) -> &PredictionRecord {
        self.history.append(prediction, budgets)
    }

    // ── History ─────────────────────────────────────────────────────

    /// Past predictions, newest first.
    #[must_use]
    pub fn history(&self) -> &[PredictionRecord] {
        self.history.records()
    }

    /// Past predictions labeled for display relative to `now`.
    #[must_use]
    pub fn history_view(&self, now: DateTime<Utc>) -> Vec<HistoryEntry> {
        self.history.entries(now)
    }

    /// Most recent prediction, if any.
    #[must_use]
    pub fn last_prediction(&self) -> Option<&PredictionRecord> {
        self.history.latest()
    }

    /// Remove all history, including the persisted copy.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    // ── Settings ────────────────────────────────────────────────────

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Hand back the underlying store.
    pub fn into_store(self) -> S {
        self.history.into_store()
    }
}

impl SalesPlanner<MemoryStore> {
    /// Planner whose history lives only as long as the process.
    pub fn ephemeral(settings: Settings) -> Result<Self, CoreError> {
        Self::with_http_provider(settings, MemoryStore::new())
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl SalesPlanner<storage::file::FileStore> {
    /// Planner persisting its history as JSON files under `dir` (native only).
    pub fn open_dir(
        settings: Settings,
        dir: impl AsRef<std::path::Path>,
    ) -> Result<Self, CoreError> {
        let store = storage::file::FileStore::open(dir)?;
        Self::with_http_provider(settings, store)
    }
}

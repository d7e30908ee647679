use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Default storage key for the prediction history.
pub const DEFAULT_HISTORY_KEY: &str = "predictionHistory";

/// Default number of records kept in the prediction history.
pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

/// Default radius of the donut ring (SVG user units).
pub const DEFAULT_CHART_RADIUS: f64 = 70.0;

/// Default base URL of the prediction backend.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

/// Percentage thresholds for the chart insight rules.
///
/// Shares are compared after rounding to one decimal place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightPolicy {
    /// TV share at or above this is "TV-dominant"
    pub tv_dominant_pct: f64,

    /// Radio share at or above this is "radio-strong"
    pub radio_strong_pct: f64,

    /// Largest minus smallest share below this is "balanced"
    pub balanced_spread_pct: f64,
}

impl Default for InsightPolicy {
    fn default() -> Self {
        Self {
            tv_dominant_pct: 60.0,
            radio_strong_pct: 40.0,
            balanced_spread_pct: 30.0,
        }
    }
}

/// Runtime configuration for the planner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub chart_radius: f64,

    pub insight: InsightPolicy,

    /// Maximum number of history records kept (newest win)
    pub history_capacity: usize,

    /// Key the history is persisted under
    pub history_key: String,

    /// Base URL of the prediction backend (without `/predict`)
    pub api_base_url: String,

    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            chart_radius: DEFAULT_CHART_RADIUS,
            insight: InsightPolicy::default(),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            history_key: DEFAULT_HISTORY_KEY.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl Settings {
    /// Parse settings from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let settings: Settings = serde_json::from_str(json)
            .map_err(|e| CoreError::Config(format!("Failed to parse settings: {e}")))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Apply `ADSPEND_API_URL` and `ADSPEND_HISTORY_CAPACITY` from the environment.
    pub fn with_env_overrides(self) -> Result<Self, CoreError> {
        self.with_overrides_from(|name| std::env::var(name).ok())
    }

    /// Same as [`Settings::with_env_overrides`] with an injectable lookup.
    pub fn with_overrides_from(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, CoreError> {
        if let Some(url) = lookup("ADSPEND_API_URL") {
            self.api_base_url = url.trim().to_string();
        }
        if let Some(raw) = lookup("ADSPEND_HISTORY_CAPACITY") {
            self.history_capacity = raw.trim().parse().map_err(|_| {
                CoreError::Config(format!(
                    "ADSPEND_HISTORY_CAPACITY must be a positive integer, got '{raw}'"
                ))
            })?;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if !self.chart_radius.is_finite() || self.chart_radius <= 0.0 {
            return Err(CoreError::Config(format!(
                "chart_radius must be a positive number, got {}",
                self.chart_radius
            )));
        }
        if self.history_capacity == 0 {
            return Err(CoreError::Config("history_capacity must be at least 1".into()));
        }
        if self.history_key.trim().is_empty() {
            return Err(CoreError::Config("history_key must not be empty".into()));
        }
        if !(self.api_base_url.starts_with("http://") || self.api_base_url.starts_with("https://")) {
            return Err(CoreError::Config(format!(
                "api_base_url must start with http:// or https://, got '{}'",
                self.api_base_url
            )));
        }
        let thresholds = [
            ("tv_dominant_pct", self.insight.tv_dominant_pct),
            ("radio_strong_pct", self.insight.radio_strong_pct),
            ("balanced_spread_pct", self.insight.balanced_spread_pct),
        ];
        for (name, value) in thresholds {
            if !(0.0..=100.0).contains(&value) {
                return Err(CoreError::Config(format!(
                    "insight.{name} must be within 0..=100, got {value}"
                )));
            }
        }
        Ok(())
    }
}

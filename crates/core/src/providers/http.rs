use async_trait::async_trait;
use reqwest::{Client, StatusCode};
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;
use tracing::{debug, warn};

use crate::errors::CoreError;
use crate::models::budget::BudgetAllocation;
use crate::models::prediction::{PredictionRequest, PredictionResponse};
use crate::models::settings::Settings;
use super::traits::PredictionProvider;

const PROVIDER_NAME: &str = "PredictionApi";

/// HTTP client for the prediction backend.
///
/// - **Endpoint**: `POST {base_url}/predict`
/// - **Body**: `{"tv": f64, "radio": f64, "newspaper": f64}`
/// - **Response**: `{"predicted_sales": f64}`
/// - **503**: the backend is still loading its model
pub struct HttpPredictionProvider {
    client: Client,
    base_url: String,
}

impl HttpPredictionProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, 30)
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::with_timeout(settings.api_base_url.clone(), settings.request_timeout_secs)
    }

    #[cfg_attr(target_arch = "wasm32", allow(unused_variables))]
    fn with_timeout(base_url: impl Into<String>, timeout_secs: u64) -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(timeout_secs));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            base_url: base_url.into(),
        }
    }

    /// Full URL of the predict endpoint.
    pub fn predict_url(&self) -> String {
        format!("{}/predict", self.base_url.trim_end_matches('/'))
    }
}

/// Map a non-success status from the backend to an error.
pub fn status_error(status: StatusCode, body: &str) -> CoreError {
    if status == StatusCode::SERVICE_UNAVAILABLE {
        return CoreError::ModelUnavailable;
    }
    let detail = body.trim();
    let message = if detail.is_empty() {
        format!("HTTP {status}")
    } else {
        format!("HTTP {status}: {detail}")
    };
    CoreError::Api {
        provider: PROVIDER_NAME.into(),
        message,
    }
}

/// Parse a `/predict` response body.
pub fn parse_response(body: &str) -> Result<f64, CoreError> {
    let resp: PredictionResponse = serde_json::from_str(body).map_err(|e| CoreError::Api {
        provider: PROVIDER_NAME.into(),
        message: format!("Failed to parse prediction response: {e}"),
    })?;
    if !resp.predicted_sales.is_finite() {
        return Err(CoreError::Api {
            provider: PROVIDER_NAME.into(),
            message: "Prediction is not a finite number".into(),
        });
    }
    Ok(resp.predicted_sales)
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl PredictionProvider for HttpPredictionProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn predict(&self, budgets: &BudgetAllocation) -> Result<f64, CoreError> {
        let url = self.predict_url();
        let request = PredictionRequest::from(budgets);
        debug!(url = %url, tv = request.tv, radio = request.radio, newspaper = request.newspaper, "requesting prediction");

        let resp = self.client.post(&url).json(&request).send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            warn!(status = %status, "prediction request rejected");
            return Err(status_error(status, &body));
        }
        parse_response(&body)
    }
}

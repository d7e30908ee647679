use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::budget::BudgetAllocation;

/// Abstraction over the external sales-prediction model.
///
/// The planner only needs one request/response: an allocation in, a
/// predicted sales figure (in thousands) out. Retries are the caller's call.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait PredictionProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Predict sales for `budgets`.
    async fn predict(&self, budgets: &BudgetAllocation) -> Result<f64, CoreError>;
}

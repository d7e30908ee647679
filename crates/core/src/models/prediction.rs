use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::budget::BudgetAllocation;

/// One past prediction with the allocation that produced it.
///
/// `id` is the creation time in Unix milliseconds (bumped when two records
/// share a millisecond), so sorting by id is sorting by creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub id: i64,

    /// Predicted sales, in thousands
    pub prediction: f64,

    pub budgets: BudgetAllocation,

    /// Creation time, persisted as ISO-8601
    pub date: DateTime<Utc>,
}

impl PredictionRecord {
    pub fn new(id: i64, prediction: f64, budgets: BudgetAllocation, date: DateTime<Utc>) -> Self {
        Self {
            id,
            prediction,
            budgets,
            date,
        }
    }
}

/// A record prepared for display in the history panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub record: PredictionRecord,

    /// e.g. "5m ago", "Just now", "Jan 5, 03:07 PM"
    pub recency: String,

    /// e.g. "$12.34k"
    pub prediction_label: String,

    /// One tag per channel in `Channel::ALL` order, e.g. `"TV: $1,500"`
    pub budget_labels: [String; 3],
}

// ── Prediction backend wire types ───────────────────────────────────

/// Body of `POST /predict`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub tv: f64,
    pub radio: f64,
    pub newspaper: f64,
}

impl From<&BudgetAllocation> for PredictionRequest {
    fn from(b: &BudgetAllocation) -> Self {
        Self {
            tv: b.tv,
            radio: b.radio,
            newspaper: b.newspaper,
        }
    }
}

/// Successful response of `POST /predict`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub predicted_sales: f64,
}

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::errors::CoreError;
use crate::models::budget::{BudgetAllocation, Channel};
use crate::models::prediction::{HistoryEntry, PredictionRecord};
use crate::models::settings::Settings;
use crate::services::format::{format_amount, format_prediction, format_recency};
use crate::storage::traits::KeyValueStore;

/// Bounded, persisted log of past predictions, newest first.
///
/// - `append` prepends and truncates to `capacity` before persisting.
/// - `clear` empties the log and removes the persisted key entirely.
/// - Storage failures are logged and swallowed: a bad read yields an empty
///   log, a failed write leaves the in-memory log updated.
///
/// `append` is a read-modify-write, so mutation requires `&mut self`. Hosts
/// sharing a log across threads wrap it in a `Mutex`.
pub struct PredictionHistoryLog<S: KeyValueStore> {
    store: S,
    key: String,
    capacity: usize,
    records: Vec<PredictionRecord>,
    /// Highest id handed out or loaded; keeps ids strictly increasing.
    last_id: i64,
}

impl<S: KeyValueStore> std::fmt::Debug for PredictionHistoryLog<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PredictionHistoryLog")
            .field("key", &self.key)
            .field("capacity", &self.capacity)
            .field("records", &self.records.len())
            .field("last_id", &self.last_id)
            .finish()
    }
}

impl<S: KeyValueStore> PredictionHistoryLog<S> {
    /// Open the log with default settings, loading whatever is persisted.
    pub fn new(store: S) -> Self {
        Self::with_settings(store, &Settings::default())
    }

    /// Open the log using `settings.history_key` and `settings.history_capacity`.
    pub fn with_settings(store: S, settings: &Settings) -> Self {
        let key = settings.history_key.clone();
        let capacity = settings.history_capacity.max(1);
        let records = read_records(&store, &key, capacity);
        let last_id = records.iter().map(|r| r.id).max().unwrap_or(0);
        debug!(key = %key, loaded = records.len(), "prediction history opened");
        Self {
            store,
            key,
            capacity,
            records,
            last_id,
        }
    }

    /// Read the persisted history. Missing or malformed data yields an empty list.
    pub fn load(&self) -> Vec<PredictionRecord> {
        read_records(&self.store, &self.key, self.capacity)
    }

    /// Replace the in-memory log with what is currently persisted.
    pub fn reload(&mut self) {
        self.records = self.load();
        if let Some(max) = self.records.iter().map(|r| r.id).max() {
            self.last_id = self.last_id.max(max);
        }
    }

    /// Record a prediction made now.
    pub fn append(&mut self, prediction: f64, budgets: BudgetAllocation) -> &PredictionRecord {
        self.append_at(prediction, budgets, Utc::now())
    }

    /// Record a prediction with an explicit creation time.
    pub fn append_at(
        &mut self,
        prediction: f64,
        budgets: BudgetAllocation,
        now: DateTime<Utc>,
    ) -> &PredictionRecord {
        if !prediction.is_finite() {
            warn!(prediction, "recording a non-finite prediction; it will not survive a reload");
        }
        let id = self.next_id(now);
        self.records
            .insert(0, PredictionRecord::new(id, prediction, budgets, now));
        self.records.truncate(self.capacity);
        self.persist();
        &self.records[0]
    }

    /// Empty the log and delete its persisted copy.
    pub fn clear(&mut self) {
        self.records.clear();
        if let Err(e) = self.store.remove(&self.key) {
            warn!(key = %self.key, error = %e, "failed to remove persisted prediction history");
        }
    }

    /// Records, newest first.
    #[must_use]
    pub fn records(&self) -> &[PredictionRecord] {
        &self.records
    }

    /// Most recent record, if any.
    #[must_use]
    pub fn latest(&self) -> Option<&PredictionRecord> {
        self.records.first()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Records labeled for display, relative to `now`.
    #[must_use]
    pub fn entries(&self, now: DateTime<Utc>) -> Vec<HistoryEntry> {
        self.records
            .iter()
            .map(|record| HistoryEntry {
                recency: format_recency(record.date, now).to_string(),
                prediction_label: format_prediction(record.prediction),
                budget_labels: Channel::ALL.map(|channel| {
                    let amount = format_amount(record.budgets.get(channel));
                    format!("{}: {amount}", channel.short_label())
                }),
                record: record.clone(),
            })
            .collect()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Give the store back, e.g. to reopen the log later.
    pub fn into_store(self) -> S {
        self.store
    }

    // ── Internal ────────────────────────────────────────────────────

    fn next_id(&mut self, now: DateTime<Utc>) -> i64 {
        let candidate = now.timestamp_millis();
        let id = if candidate > self.last_id {
            candidate
        } else {
            // Saturates on absurd persisted ids instead of overflowing.
            self.last_id.saturating_add(1)
        };
        self.last_id = id;
        id
    }

    fn persist(&self) {
        if let Err(e) = self.write_records() {
            warn!(key = %self.key, error = %e, "failed to persist prediction history");
        }
    }

    fn write_records(&self) -> Result<(), CoreError> {
        let bytes = serde_json::to_vec(&self.records)
            .map_err(|e| CoreError::Serialization(e.to_string()))?;
        self.store.set(&self.key, &bytes)
    }
}

fn read_records<S: KeyValueStore>(store: &S, key: &str, capacity: usize) -> Vec<PredictionRecord> {
    let bytes = match store.get(key) {
        Ok(Some(bytes)) => bytes,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!(key = %key, error = %e, "failed to read prediction history, starting empty");
            return Vec::new();
        }
    };
    // Decode element-wise so one bad record does not discard the rest.
    let raw = match serde_json::from_slice::<Vec<serde_json::Value>>(&bytes) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(key = %key, error = %e, "persisted prediction history is malformed, starting empty");
            return Vec::new();
        }
    };
    let total = raw.len();
    let mut records: Vec<PredictionRecord> = raw
        .into_iter()
        .filter_map(|value| serde_json::from_value(value).ok())
        .collect();
    if records.len() < total {
        warn!(key = %key, skipped = total - records.len(), "skipped unreadable prediction records");
    }

    // Newest first by creation id; older writers may have stored more.
    records.sort_by(|a, b| b.id.cmp(&a.id));
    records.truncate(capacity);
    records
}

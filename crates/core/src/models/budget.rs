use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// One of the three advertising media a budget is split across.
///
/// Order and colors are fixed for the whole lifetime of the app so the
/// donut chart and the legend always line up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    Tv,
    Radio,
    Newspaper,
}

impl Channel {
    /// Fixed layout order: TV, Radio, Newspaper.
    pub const ALL: [Channel; 3] = [Channel::Tv, Channel::Radio, Channel::Newspaper];

    /// Human-readable label used in the legend.
    pub fn label(&self) -> &'static str {
        match self {
            Channel::Tv => "TV",
            Channel::Radio => "Radio",
            Channel::Newspaper => "Newspaper",
        }
    }

    /// Compact label for history cards ("News" instead of "Newspaper").
    pub fn short_label(&self) -> &'static str {
        match self {
            Channel::Newspaper => "News",
            other => other.label(),
        }
    }

    /// Stroke / legend color (CSS hex).
    pub fn color(&self) -> &'static str {
        match self {
            Channel::Tv => "#6366F1",
            Channel::Radio => "#10B981",
            Channel::Newspaper => "#F59E0B",
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Budget magnitudes for the three channels.
///
/// Callers guarantee finite, non-negative values. Use the `from_form_*`
/// constructors to get there from raw form input.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BudgetAllocation {
    pub tv: f64,
    pub radio: f64,
    pub newspaper: f64,
}

impl BudgetAllocation {
    pub fn new(tv: f64, radio: f64, newspaper: f64) -> Self {
        Self { tv, radio, newspaper }
    }

    /// Sum of all three channels. May be 0.
    pub fn total(&self) -> f64 {
        self.tv + self.radio + self.newspaper
    }

    /// Budget for a single channel.
    pub fn get(&self, channel: Channel) -> f64 {
        match channel {
            Channel::Tv => self.tv,
            Channel::Radio => self.radio,
            Channel::Newspaper => self.newspaper,
        }
    }

    /// Parse raw form fields for live chart updates.
    ///
    /// Never fails: blank, non-numeric, non-finite and negative inputs all
    /// become 0.
    pub fn from_form_lenient(tv: &str, radio: &str, newspaper: &str) -> Self {
        Self {
            tv: coerce_field(tv),
            radio: coerce_field(radio),
            newspaper: coerce_field(newspaper),
        }
    }

    /// Parse raw form fields for submission to the prediction backend.
    ///
    /// Every field must be filled with a finite, non-negative number.
    pub fn from_form_strict(tv: &str, radio: &str, newspaper: &str) -> Result<Self, CoreError> {
        if [tv, radio, newspaper].iter().any(|f| f.trim().is_empty()) {
            return Err(CoreError::ValidationError("Please fill in all fields.".into()));
        }
        Ok(Self {
            tv: parse_field(Channel::Tv, tv)?,
            radio: parse_field(Channel::Radio, radio)?,
            newspaper: parse_field(Channel::Newspaper, newspaper)?,
        })
    }
}

fn coerce_field(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => v,
        _ => 0.0,
    }
}

fn parse_field(channel: Channel, raw: &str) -> Result<f64, CoreError> {
    let value: f64 = raw.trim().parse().map_err(|_| {
        CoreError::ValidationError(format!("{channel} budget '{raw}' is not a number"))
    })?;
    if !value.is_finite() {
        return Err(CoreError::ValidationError(format!(
            "{channel} budget must be a finite number"
        )));
    }
    if value < 0.0 {
        return Err(CoreError::ValidationError(format!(
            "{channel} budget must not be negative (got {value})"
        )));
    }
    // "-0" parses to -0.0
    Ok(if value == 0.0 { 0.0 } else { value })
}

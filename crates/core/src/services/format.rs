use chrono::{DateTime, Utc};

const MS_PER_MINUTE: i64 = 60_000;
const MS_PER_HOUR: i64 = 3_600_000;
const MS_PER_DAY: i64 = 86_400_000;

/// Coarse, human-readable age of a record relative to a reference time.
///
/// Each bucket counts whole elapsed units (floored), so exactly 60 minutes
/// lands in `Hours(1)`, not `Minutes(60)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recency {
    /// Less than one minute (or a timestamp in the future)
    JustNow,
    /// 1..=59 minutes
    Minutes(i64),
    /// 1..=23 hours
    Hours(i64),
    /// 1..=6 days
    Days(i64),
    /// A week or older: shown as an absolute date.
    /// Rendered in UTC; hosts wanting local time convert before display.
    Date(DateTime<Utc>),
}

impl std::fmt::Display for Recency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Recency::JustNow => write!(f, "Just now"),
            Recency::Minutes(n) => write!(f, "{n}m ago"),
            Recency::Hours(n) => write!(f, "{n}h ago"),
            Recency::Days(n) => write!(f, "{n}d ago"),
            Recency::Date(date) => write!(f, "{}", date.format("%b %-d, %I:%M %p")),
        }
    }
}

/// Bucket `date` relative to `now`.
pub fn format_recency(date: DateTime<Utc>, now: DateTime<Utc>) -> Recency {
    let elapsed_ms = (now - date).num_milliseconds();

    let minutes = elapsed_ms.div_euclid(MS_PER_MINUTE);
    if minutes < 1 {
        return Recency::JustNow;
    }
    if minutes < 60 {
        return Recency::Minutes(minutes);
    }

    let hours = elapsed_ms.div_euclid(MS_PER_HOUR);
    if hours < 24 {
        return Recency::Hours(hours);
    }

    let days = elapsed_ms.div_euclid(MS_PER_DAY);
    if days < 7 {
        return Recency::Days(days);
    }

    Recency::Date(date)
}

/// Format a budget amount: `1500.0` → `"$1,500"`, `12.5` → `"$12.5"`.
///
/// At most two decimals, trailing zeros trimmed.
pub fn format_amount(value: f64) -> String {
    if !value.is_finite() {
        return "$0".to_string();
    }
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let frac = cents % 100;

    let mut out = String::new();
    if value < 0.0 && cents > 0 {
        out.push('-');
    }
    out.push('$');
    out.push_str(&group_thousands(whole));
    if frac > 0 {
        let digits = format!("{frac:02}");
        out.push('.');
        out.push_str(digits.trim_end_matches('0'));
    }
    out
}

/// Format a predicted sales figure (in thousands): `12.345` → `"$12.35k"`.
pub fn format_prediction(value: f64) -> String {
    if !value.is_finite() {
        return "$0.00k".to_string();
    }
    let rounded = (value * 100.0).round() / 100.0;
    if rounded < 0.0 {
        format!("-${:.2}k", rounded.abs())
    } else {
        format!("${:.2}k", rounded.abs())
    }
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

use std::f64::consts::PI;

use crate::models::budget::{BudgetAllocation, Channel};
use crate::models::chart::{AllocationChart, ChannelSegment, Insight, RadialSegment};
use crate::models::settings::{Settings, DEFAULT_CHART_RADIUS};
use crate::services::insight::{InsightRules, Shares};

/// Generates chart-ready data for the budget allocation donut.
///
/// All numbers are computed here; the frontend only renders.
/// Chart data includes:
/// - Per-channel share of the total, rounded to one decimal
/// - Stroke dash geometry so the three arcs form one continuous ring
/// - A single qualitative insight picked from an ordered rule table
#[derive(Debug, Clone)]
pub struct ChartService {
    radius: f64,
    insights: InsightRules,
}

impl ChartService {
    pub fn new() -> Self {
        Self {
            radius: DEFAULT_CHART_RADIUS,
            insights: InsightRules::default(),
        }
    }

    pub fn with_settings(settings: &Settings) -> Self {
        Self {
            radius: settings.chart_radius,
            insights: InsightRules::new(settings.insight.clone()),
        }
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn circumference(&self) -> f64 {
        2.0 * PI * self.radius
    }

    pub fn insight_rules(&self) -> &InsightRules {
        &self.insights
    }

    /// Compute segments, ring geometry and insight for an allocation.
    ///
    /// Pure and infallible. A zero total yields all-zero segments and the
    /// "set a budget" insight instead of dividing by zero. Rounded shares are
    /// not nudged back to 100.
    pub fn compute_segments(&self, allocation: &BudgetAllocation) -> AllocationChart {
        let total = allocation.total();
        let channel_segments = Channel::ALL.map(|channel| channel_segment(allocation, channel, total));

        let circumference = self.circumference();
        let mut consumed = 0.0;
        let radial_segments = channel_segments.clone().map(|segment| {
            let arc_length = segment.percent / 100.0 * circumference;
            let gap_length = circumference - arc_length;
            let radial = RadialSegment {
                dash_array: format!("{arc_length} {gap_length}"),
                // 0.0 - x keeps the first offset at +0.0
                offset: 0.0 - consumed,
                arc_length,
                gap_length,
                segment,
            };
            consumed += arc_length;
            radial
        });

        let shares = Shares {
            tv: channel_segments[0].percent,
            radio: channel_segments[1].percent,
            newspaper: channel_segments[2].percent,
            total,
        };
        let insight = Insight::from(self.insights.select(&shares));

        AllocationChart {
            channel_segments,
            radial_segments,
            total: if total > 0.0 { total } else { 0.0 },
            circumference,
            insight,
        }
    }
}

impl Default for ChartService {
    fn default() -> Self {
        Self::new()
    }
}

fn channel_segment(allocation: &BudgetAllocation, channel: Channel, total: f64) -> ChannelSegment {
    let (value, percent) = if total > 0.0 {
        let value = allocation.get(channel);
        (value, round1(value / total * 100.0))
    } else {
        (0.0, 0.0)
    };
    ChannelSegment {
        channel,
        name: channel.label().to_string(),
        value,
        percent,
        color: channel.color().to_string(),
    }
}

/// Round to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

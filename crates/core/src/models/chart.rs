use serde::{Deserialize, Serialize};

use super::budget::Channel;

/// A channel's proportional share of the total budget.
///
/// Computed by the chart service, rendered as-is by the frontend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelSegment {
    pub channel: Channel,

    /// Legend label ("TV", "Radio", "Newspaper")
    pub name: String,

    /// Budget for this channel (0 when the total is 0)
    pub value: f64,

    /// Share of the total, rounded to one decimal place
    pub percent: f64,

    /// CSS hex color bound to the channel
    pub color: String,
}

/// A `ChannelSegment` laid out as one arc of an SVG donut ring.
///
/// Rendered as a stroked circle with `stroke-dasharray = dash_array` and
/// `stroke-dashoffset = offset`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadialSegment {
    #[serde(flatten)]
    pub segment: ChannelSegment,

    /// Drawn length of the arc
    pub arc_length: f64,

    /// Remainder of the circumference after the arc
    pub gap_length: f64,

    /// `"<arc_length> <gap_length>"`
    pub dash_array: String,

    /// Negated cumulative arc length of all earlier segments
    pub offset: f64,
}

impl RadialSegment {
    /// Arc position where this segment starts (positive, along the ring).
    pub fn start(&self) -> f64 {
        -self.offset
    }

    /// Arc position where this segment ends.
    pub fn end(&self) -> f64 {
        -self.offset + self.arc_length
    }
}

/// Which qualitative message the chart shows beneath the legend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InsightKind {
    /// Total budget is zero
    NoBudget,
    TvDominant,
    RadioStrong,
    Balanced,
    /// None of the specific rules matched
    Mixed,
}

impl InsightKind {
    pub fn message(&self) -> &'static str {
        match self {
            InsightKind::NoBudget => "Set a budget to see insights.",
            InsightKind::TvDominant => {
                "TV advertising dominates your budget. Consider diversifying for broader reach."
            }
            InsightKind::RadioStrong => {
                "Radio has strong allocation. Great for local market penetration."
            }
            InsightKind::Balanced => {
                "Your budget is well-distributed across channels for balanced exposure."
            }
            InsightKind::Mixed => {
                "Your budget leans on a single channel. Compare forecasts to find a stronger mix."
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub message: String,
}

impl From<InsightKind> for Insight {
    fn from(kind: InsightKind) -> Self {
        Self {
            kind,
            message: kind.message().to_string(),
        }
    }
}

/// Everything the donut chart, its legend and the insight box need.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationChart {
    /// One entry per channel in `Channel::ALL` order
    pub channel_segments: [ChannelSegment; 3],

    /// Same order as `channel_segments`
    pub radial_segments: [RadialSegment; 3],

    pub total: f64,

    /// Circumference of the ring the arcs are drawn on
    pub circumference: f64,

    pub insight: Insight,
}

impl AllocationChart {
    pub fn segment(&self, channel: Channel) -> &ChannelSegment {
        &self.channel_segments[channel_index(channel)]
    }

    pub fn radial(&self, channel: Channel) -> &RadialSegment {
        &self.radial_segments[channel_index(channel)]
    }
}

fn channel_index(channel: Channel) -> usize {
    match channel {
        Channel::Tv => 0,
        Channel::Radio => 1,
        Channel::Newspaper => 2,
    }
}

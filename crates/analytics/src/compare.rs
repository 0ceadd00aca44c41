//! Diffs two aggregate bundles into signed change classifications.

use serde::Serialize;

use crate::aggregate::AggregateBundle;
use crate::error::AnalyticsError;

/// Change classification for a single metric between two windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Flat,
}

/// Account-health verdict derived from the conversion-cost direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Improving,
    Worsening,
    Neutral,
}

impl Trend {
    pub fn label(self) -> &'static str {
        match self {
            Self::Improving => "improving",
            Self::Worsening => "worsening",
            Self::Neutral => "neutral",
        }
    }
}

/// The metrics tracked by every comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Spend,
    Impressions,
    Clicks,
    Reach,
    Conversions,
    Ctr,
    Cpc,
    ConversionCost,
}

impl Metric {
    pub const ALL: [Self; 8] = [
        Self::Spend,
        Self::Impressions,
        Self::Clicks,
        Self::Reach,
        Self::Conversions,
        Self::Ctr,
        Self::Cpc,
        Self::ConversionCost,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Spend => "Spend",
            Self::Impressions => "Impressions",
            Self::Clicks => "Clicks",
            Self::Reach => "Reach",
            Self::Conversions => "Conversions",
            Self::Ctr => "CTR",
            Self::Cpc => "CPC",
            Self::ConversionCost => "Cost per conversion",
        }
    }
}

/// One metric's movement between the two windows.
///
/// `percent_change` is a magnitude; `direction` carries the sign.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricChange {
    pub metric: Metric,
    pub percent_change: f64,
    pub direction: Direction,
}

/// The full outcome of comparing two windows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonResult {
    pub current: AggregateBundle,
    pub previous: AggregateBundle,
    pub changes: Vec<MetricChange>,
    pub overall_trend: Trend,
}

impl ComparisonResult {
    pub fn change(&self, metric: Metric) -> Option<&MetricChange> {
        self.changes.iter().find(|c| c.metric == metric)
    }
}

/// Compare two bundles metric by metric.
///
/// Fails with [`AnalyticsError::IncompatibleBundles`] when one bundle holds
/// per-day averages and the other absolute totals. The overall trend comes
/// from the conversion-cost direction alone: cheaper conversions mean an
/// improving account, pricier ones a worsening account.
pub fn compare(
    current: &AggregateBundle,
    previous: &AggregateBundle,
) -> Result<ComparisonResult, AnalyticsError> {
    if current.per_day != previous.per_day {
        return Err(AnalyticsError::IncompatibleBundles(
            "cannot compare per-day averages against absolute totals".to_string(),
        ));
    }

    let changes: Vec<MetricChange> = Metric::ALL
        .iter()
        .map(|&metric| {
            let (percent_change, direction) =
                percent_change(current.metric_value(metric), previous.metric_value(metric));
            MetricChange {
                metric,
                percent_change,
                direction,
            }
        })
        .collect();

    let cost_direction = changes
        .iter()
        .find(|c| c.metric == Metric::ConversionCost)
        .map(|c| c.direction)
        .unwrap_or(Direction::Flat);
    let overall_trend = match cost_direction {
        Direction::Down => Trend::Improving,
        Direction::Up => Trend::Worsening,
        Direction::Flat => Trend::Neutral,
    };

    Ok(ComparisonResult {
        current: current.clone(),
        previous: previous.clone(),
        changes,
        overall_trend,
    })
}

impl AggregateBundle {
    /// Value for one tracked metric; absent conversion cost reads as zero.
    pub fn metric_value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Spend => self.spend,
            Metric::Impressions => self.impressions,
            Metric::Clicks => self.clicks,
            Metric::Reach => self.reach,
            Metric::Conversions => self.conversions,
            Metric::Ctr => self.ctr,
            Metric::Cpc => self.cpc,
            Metric::ConversionCost => self.conversion_cost.unwrap_or(0.0),
        }
    }
}

/// Percentage change with the zero-previous guard.
///
/// A zero previous value never produces Down: the change is flat when the
/// current value is also zero, and pegged at 100% up otherwise. Direction is
/// Flat exactly when the percentage is zero.
fn percent_change(current: f64, previous: f64) -> (f64, Direction) {
    if previous == 0.0 {
        if current == 0.0 {
            (0.0, Direction::Flat)
        } else {
            (100.0, Direction::Up)
        }
    } else {
        let pct = ((current - previous) / previous * 100.0).abs();
        let direction = if pct == 0.0 {
            Direction::Flat
        } else if current > previous {
            Direction::Up
        } else {
            Direction::Down
        };
        (pct, direction)
    }
}

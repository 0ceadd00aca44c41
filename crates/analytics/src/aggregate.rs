//! Reduces raw per-day records into one aggregate bundle.

use serde::Serialize;

use adpulse_core::{DateRange, RawInsightRecord};

use crate::error::AnalyticsError;

/// Action-type prefix identifying pixel-custom conversions.
pub const CUSTOM_CONVERSION_PREFIX: &str = "offsite_conversion.fb_pixel_custom.";

/// Fallback action types counted when no custom conversion type exists.
pub const LEAD_ACTION_TYPES: [&str; 2] = ["lead", "offsite_conversion.fb_pixel_lead"];

/// Summed and derived metrics for one comparison window.
///
/// Created fresh per comparison run and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateBundle {
    pub spend: f64,
    pub impressions: f64,
    pub clicks: f64,
    pub reach: f64,
    pub conversions: f64,
    /// clicks / impressions × 100; zero when there were no impressions.
    pub ctr: f64,
    /// spend / clicks; zero when there were no clicks.
    pub cpc: f64,
    /// spend / conversions; absent when there were no conversions.
    pub conversion_cost: Option<f64>,
    /// Totals are per-day averages rather than absolute sums.
    pub per_day: bool,
}

/// Reduce `records` into one bundle for `window`.
///
/// With `normalize` set, every total is divided by the window's day count
/// before the derived ratios are computed. Fails with
/// [`AnalyticsError::InvalidWindow`] when the window covers less than one
/// day. Totals never go negative.
pub fn aggregate(
    records: &[RawInsightRecord],
    window: &DateRange,
    normalize: bool,
) -> Result<AggregateBundle, AnalyticsError> {
    let day_count = window.day_count();
    if day_count < 1 {
        return Err(AnalyticsError::InvalidWindow {
            start: window.start,
            end: window.end,
        });
    }

    let mut spend = 0.0;
    let mut impressions = 0u64;
    let mut clicks = 0u64;
    let mut reach = 0u64;
    for record in records {
        spend += record.spend;
        impressions += record.impressions;
        clicks += record.clicks;
        reach += record.reach;
    }
    let spend = spend.max(0.0);
    let conversions = extract_conversions(records).max(0.0);

    let divisor = if normalize { day_count as f64 } else { 1.0 };
    let spend = spend / divisor;
    let impressions = impressions as f64 / divisor;
    let clicks = clicks as f64 / divisor;
    let reach = reach as f64 / divisor;
    let conversions = conversions / divisor;

    let ctr = if impressions > 0.0 {
        clicks / impressions * 100.0
    } else {
        0.0
    };
    let cpc = if clicks > 0.0 { spend / clicks } else { 0.0 };
    let conversion_cost = (conversions > 0.0).then(|| spend / conversions);

    Ok(AggregateBundle {
        spend,
        impressions,
        clicks,
        reach,
        conversions,
        ctr,
        cpc,
        conversion_cost,
        per_day: normalize,
    })
}

/// Total conversions under the two-pass extraction policy.
///
/// Pass 1: the first pixel-custom action type found in record order wins,
/// and its values are summed across *all* records; other custom types are
/// ignored. Pass 2: when no custom type exists anywhere, the lead-style
/// fallback types are summed instead.
pub fn extract_conversions(records: &[RawInsightRecord]) -> f64 {
    match find_custom_action_type(records) {
        Some(action_type) => sum_action_type(records, action_type),
        None => sum_lead_fallback(records),
    }
}

/// First pixel-custom action type in record order, if any.
fn find_custom_action_type(records: &[RawInsightRecord]) -> Option<&str> {
    records
        .iter()
        .flat_map(|r| &r.conversions)
        .find(|c| c.action_type.starts_with(CUSTOM_CONVERSION_PREFIX))
        .map(|c| c.action_type.as_str())
}

/// Sum of values for one exact action type across all records.
fn sum_action_type(records: &[RawInsightRecord], action_type: &str) -> f64 {
    records
        .iter()
        .flat_map(|r| &r.conversions)
        .filter(|c| c.action_type == action_type)
        .map(|c| c.value)
        .sum()
}

/// Sum of the lead-style fallback action types across all records.
fn sum_lead_fallback(records: &[RawInsightRecord]) -> f64 {
    records
        .iter()
        .flat_map(|r| &r.conversions)
        .filter(|c| LEAD_ACTION_TYPES.contains(&c.action_type.as_str()))
        .map(|c| c.value)
        .sum()
}

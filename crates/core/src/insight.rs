use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One conversion entry on a raw insight row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionAction {
    /// Platform action type (e.g., `"lead"`,
    /// `"offsite_conversion.fb_pixel_custom.Purchase"`).
    pub action_type: String,
    pub value: f64,
}

impl ConversionAction {
    pub fn new(action_type: impl Into<String>, value: f64) -> Self {
        Self {
            action_type: action_type.into(),
            value,
        }
    }
}

/// One row of platform metrics for one day/object.
///
/// Produced externally by the ads data source; consumed read-only.
/// `date_start ≤ date_stop` holds for well-formed rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawInsightRecord {
    pub spend: f64,
    pub impressions: u64,
    pub clicks: u64,
    pub reach: u64,
    pub date_start: NaiveDate,
    pub date_stop: NaiveDate,
    #[serde(default)]
    pub conversions: Vec<ConversionAction>,
}

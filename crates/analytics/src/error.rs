use chrono::NaiveDate;
use thiserror::Error;

/// Input errors from the analytics pipeline.
///
/// All variants are fail-fast programmer/input errors; none are retried.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnalyticsError {
    #[error("unsupported period kind: {0}")]
    UnsupportedPeriodKind(String),

    #[error("invalid aggregation window: {start}..{end}")]
    InvalidWindow { start: NaiveDate, end: NaiveDate },

    #[error("incompatible bundles: {0}")]
    IncompatibleBundles(String),
}

//! Period resolution, aggregation, and comparison for ad performance digests.
//!
//! This crate provides:
//! - [`resolve`] for mapping a [`ComparisonKind`] to two date windows
//! - [`aggregate`] for reducing raw per-day records into an [`AggregateBundle`]
//! - [`compare`] for diffing two bundles into a [`ComparisonResult`]
//!
//! Everything here is a pure function of its inputs; no I/O, no clocks.

pub mod aggregate;
pub mod compare;
pub mod error;
pub mod period;

pub use aggregate::{aggregate, AggregateBundle};
pub use compare::{compare, ComparisonResult, Direction, Metric, MetricChange, Trend};
pub use error::AnalyticsError;
pub use period::{resolve, ComparisonKind, ComparisonWindows};

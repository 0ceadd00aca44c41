//! Per-user timezone-aware recurring job scheduling.
//!
//! One [`JobScheduler`] instance owns the process-wide table of active
//! digest jobs, keyed by user. Each job fires daily at the user's
//! configured local time; replacing a spec atomically tears down the prior
//! job, so no two live jobs ever share a user.
//!
//! The scheduler is explicitly constructed and dependency-injected; there
//! is no global instance. Lifecycle: construct, [`JobScheduler::restore`]
//! to replay persisted specs, `upsert`/`disable` as settings change,
//! [`JobScheduler::shutdown`] on teardown.

mod core;
pub mod error;
pub mod handler;
pub mod spec;
pub mod store;

#[cfg(test)]
mod tests;

pub use self::core::JobScheduler;
pub use error::SchedulerError;
pub use handler::FireHandler;
pub use spec::RecurringJobSpec;
pub use store::{SettingsStore, StoreError};

//! [`JobScheduler`] — owns the table of active per-user recurring jobs.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use chrono_tz::Tz;
use cron::Schedule;
use tokio::sync::{Mutex, Notify};
use tracing::{debug, error, info, warn};

use adpulse_core::UserId;

use crate::error::SchedulerError;
use crate::handler::FireHandler;
use crate::spec::RecurringJobSpec;
use crate::store::SettingsStore;

/// One installed job: its spec plus the handle needed to tear it down.
struct JobEntry {
    spec: RecurringJobSpec,
    cancel: Arc<Notify>,
}

/// Owns all active recurring digest jobs, keyed by user.
///
/// Construct exactly one instance per process and hand it to whatever
/// drives settings changes; there is no global. Replacing a spec removes
/// the prior job under the table lock before installing the new one, so
/// readers never observe two jobs for the same user.
///
/// Known limitation: neither [`disable`](Self::disable) nor
/// [`shutdown`](Self::shutdown) interrupts a fire body that is already
/// running; they only stop future fires.
pub struct JobScheduler {
    jobs: Mutex<HashMap<UserId, JobEntry>>,
    handler: Arc<dyn FireHandler>,
    store: Arc<dyn SettingsStore>,
    stopped: AtomicBool,
}

impl JobScheduler {
    pub fn new(handler: Arc<dyn FireHandler>, store: Arc<dyn SettingsStore>) -> Self {
        Self {
            jobs: Mutex::new(HashMap::new()),
            handler,
            store,
            stopped: AtomicBool::new(false),
        }
    }

    /// Install or replace the job for `spec.user_id`.
    ///
    /// Validates the fire time, the timezone against the IANA database, and
    /// the user against the settings store. Any prior job for the user is
    /// removed before the new one is installed; calling twice with the same
    /// spec leaves exactly one active job. A disabled spec only tears down.
    pub async fn upsert(&self, spec: RecurringJobSpec) -> Result<(), SchedulerError> {
        if self.stopped.load(Ordering::SeqCst) {
            return Err(SchedulerError::ShutDown);
        }
        if spec.fire_hour > 23 || spec.fire_minute > 59 {
            return Err(SchedulerError::InvalidFireTime {
                hour: spec.fire_hour,
                minute: spec.fire_minute,
            });
        }
        let tz: Tz = spec
            .timezone_name
            .parse()
            .map_err(|_| SchedulerError::InvalidTimezone(spec.timezone_name.clone()))?;
        if !self.store.user_exists(spec.user_id).await? {
            return Err(SchedulerError::UnknownUser(spec.user_id));
        }
        let schedule = Schedule::from_str(&spec.cron_expression()).map_err(|_| {
            SchedulerError::InvalidFireTime {
                hour: spec.fire_hour,
                minute: spec.fire_minute,
            }
        })?;

        let mut jobs = self.jobs.lock().await;
        if let Some(old) = jobs.remove(&spec.user_id) {
            old.cancel.notify_one();
            debug!(user_id = spec.user_id, "replaced existing job");
        }
        if !spec.enabled {
            info!(user_id = spec.user_id, "spec disabled, job removed");
            return Ok(());
        }

        let cancel = Arc::new(Notify::new());
        tokio::spawn(run_job(
            spec.user_id,
            tz,
            schedule,
            cancel.clone(),
            self.handler.clone(),
        ));
        info!(
            user_id = spec.user_id,
            timezone = %spec.timezone_name,
            hour = spec.fire_hour,
            minute = spec.fire_minute,
            "job scheduled"
        );
        jobs.insert(spec.user_id, JobEntry { spec, cancel });
        Ok(())
    }

    /// Remove the job for `user_id` if present.
    ///
    /// Returns whether a job was removed; absence is not an error.
    pub async fn disable(&self, user_id: UserId) -> bool {
        let mut jobs = self.jobs.lock().await;
        match jobs.remove(&user_id) {
            Some(entry) => {
                entry.cancel.notify_one();
                info!(user_id, "job removed");
                true
            }
            None => {
                debug!(user_id, "disable for user with no job");
                false
            }
        }
    }

    /// Invoke the fire callback for `user_id` right now.
    ///
    /// Operational/test hook: runs the same callback a live trigger would,
    /// with today's date in the job's timezone.
    pub async fn fire_now(&self, user_id: UserId) -> Result<(), SchedulerError> {
        let spec = {
            let jobs = self.jobs.lock().await;
            jobs.get(&user_id).map(|entry| entry.spec.clone())
        }
        .ok_or(SchedulerError::JobNotFound(user_id))?;

        let tz: Tz = spec
            .timezone_name
            .parse()
            .map_err(|_| SchedulerError::InvalidTimezone(spec.timezone_name.clone()))?;
        let today = Utc::now().with_timezone(&tz).date_naive();
        self.handler
            .on_fire(user_id, today)
            .await
            .map_err(|e| SchedulerError::FireFailed(e.to_string()))
    }

    /// Replay `upsert` for every enabled spec in the settings store.
    ///
    /// Called once on process start to re-seed the in-memory job table.
    /// Specs that fail validation are logged and skipped rather than
    /// aborting the replay. Returns the number of jobs installed.
    pub async fn restore(&self) -> Result<usize, SchedulerError> {
        let specs = self.store.enabled_specs().await?;
        let mut installed = 0;
        for spec in specs {
            let user_id = spec.user_id;
            match self.upsert(spec).await {
                Ok(()) => installed += 1,
                Err(e) => warn!(user_id, error = %e, "skipping persisted spec"),
            }
        }
        info!(installed, "restored jobs from settings store");
        Ok(installed)
    }

    /// Stop accepting new fires and cancel every pending one.
    ///
    /// Idempotent. Does not wait for fire bodies already running; those
    /// finish in their own tasks.
    pub async fn shutdown(&self) {
        if self.stopped.swap(true, Ordering::SeqCst) {
            return;
        }
        let mut jobs = self.jobs.lock().await;
        for (user_id, entry) in jobs.drain() {
            entry.cancel.notify_one();
            debug!(user_id, "job cancelled on shutdown");
        }
        info!("scheduler shut down");
    }

    /// Consistent snapshot of all installed specs.
    pub async fn jobs(&self) -> Vec<RecurringJobSpec> {
        self.jobs
            .lock()
            .await
            .values()
            .map(|entry| entry.spec.clone())
            .collect()
    }

    /// The installed spec for one user, if any.
    pub async fn job(&self, user_id: UserId) -> Option<RecurringJobSpec> {
        self.jobs
            .lock()
            .await
            .get(&user_id)
            .map(|entry| entry.spec.clone())
    }

    /// Number of installed jobs.
    pub async fn len(&self) -> usize {
        self.jobs.lock().await.len()
    }

    /// Whether no jobs are installed.
    pub async fn is_empty(&self) -> bool {
        self.jobs.lock().await.is_empty()
    }
}

/// Per-job loop: sleep until the next occurrence in the job's timezone,
/// fire, repeat. Exits when cancelled.
///
/// The fire body runs in its own task so a panic or error is contained:
/// it is logged and the loop keeps the job scheduled.
async fn run_job(
    user_id: UserId,
    tz: Tz,
    schedule: Schedule,
    cancel: Arc<Notify>,
    handler: Arc<dyn FireHandler>,
) {
    loop {
        let now = Utc::now().with_timezone(&tz);
        let Some(next) = schedule.after(&now).next() else {
            warn!(user_id, "cron schedule yields no further occurrences");
            break;
        };
        let wait = (next - now).to_std().unwrap_or(std::time::Duration::ZERO);
        debug!(user_id, wait_secs = wait.as_secs(), "sleeping until next fire");

        tokio::select! {
            _ = cancel.notified() => {
                debug!(user_id, "job loop cancelled");
                break;
            }
            _ = tokio::time::sleep(wait) => {
                let today = Utc::now().with_timezone(&tz).date_naive();
                let body = {
                    let handler = handler.clone();
                    tokio::spawn(async move { handler.on_fire(user_id, today).await })
                };
                match body.await {
                    Ok(Ok(())) => debug!(user_id, "fire completed"),
                    Ok(Err(e)) => warn!(user_id, error = %e, "fire failed; job stays scheduled"),
                    Err(e) => error!(user_id, error = %e, "fire panicked; job stays scheduled"),
                }
            }
        }
    }
}

//! Tests for the job scheduler.

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use anyhow::bail;
    use chrono::NaiveDate;

    use adpulse_core::UserId;

    use crate::error::SchedulerError;
    use crate::handler::FireHandler;
    use crate::spec::RecurringJobSpec;
    use crate::store::{SettingsStore, StoreError};
    use crate::JobScheduler;

    struct MockHandler {
        fires: AtomicUsize,
        should_fail: bool,
    }

    impl MockHandler {
        fn ok() -> Arc<Self> {
            Arc::new(Self {
                fires: AtomicUsize::new(0),
                should_fail: false,
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                fires: AtomicUsize::new(0),
                should_fail: true,
            })
        }
    }

    #[async_trait::async_trait]
    impl FireHandler for MockHandler {
        async fn on_fire(&self, _user_id: UserId, _today: NaiveDate) -> anyhow::Result<()> {
            self.fires.fetch_add(1, Ordering::SeqCst);
            if self.should_fail {
                bail!("mock fire failure");
            }
            Ok(())
        }
    }

    struct MockStore {
        users: Vec<UserId>,
        specs: Vec<RecurringJobSpec>,
    }

    impl MockStore {
        fn with_users(users: Vec<UserId>) -> Arc<Self> {
            Arc::new(Self {
                users,
                specs: Vec::new(),
            })
        }
    }

    #[async_trait::async_trait]
    impl SettingsStore for MockStore {
        async fn user_exists(&self, user_id: UserId) -> Result<bool, StoreError> {
            Ok(self.users.contains(&user_id))
        }

        async fn enabled_specs(&self) -> Result<Vec<RecurringJobSpec>, StoreError> {
            Ok(self.specs.clone())
        }
    }

    fn make_spec(user_id: UserId, hour: u8, minute: u8, tz: &str, enabled: bool) -> RecurringJobSpec {
        RecurringJobSpec {
            user_id,
            fire_hour: hour,
            fire_minute: minute,
            timezone_name: tz.to_string(),
            enabled,
        }
    }

    // -- upsert ------------------------------------------------------------

    #[tokio::test]
    async fn upsert_installs_job() {
        let sched = JobScheduler::new(MockHandler::ok(), MockStore::with_users(vec![1]));
        assert!(sched.is_empty().await);

        sched
            .upsert(make_spec(1, 9, 0, "Europe/Berlin", true))
            .await
            .unwrap();

        assert_eq!(sched.len().await, 1);
        assert_eq!(sched.job(1).await.unwrap().fire_hour, 9);
    }

    #[tokio::test]
    async fn upsert_same_spec_twice_keeps_one_job() {
        let sched = JobScheduler::new(MockHandler::ok(), MockStore::with_users(vec![1]));
        let spec = make_spec(1, 9, 0, "UTC", true);

        sched.upsert(spec.clone()).await.unwrap();
        sched.upsert(spec.clone()).await.unwrap();

        assert_eq!(sched.len().await, 1);
        assert_eq!(sched.job(1).await, Some(spec));
    }

    #[tokio::test]
    async fn upsert_replaces_prior_spec() {
        let sched = JobScheduler::new(MockHandler::ok(), MockStore::with_users(vec![1]));

        sched.upsert(make_spec(1, 8, 0, "UTC", true)).await.unwrap();
        sched
            .upsert(make_spec(1, 19, 30, "UTC", true))
            .await
            .unwrap();

        assert_eq!(sched.len().await, 1);
        let job = sched.job(1).await.unwrap();
        assert_eq!(job.fire_hour, 19);
        assert_eq!(job.fire_minute, 30);
    }

    #[tokio::test]
    async fn invalid_timezone_rejected_and_prior_job_untouched() {
        let sched = JobScheduler::new(MockHandler::ok(), MockStore::with_users(vec![1]));
        sched.upsert(make_spec(1, 8, 0, "UTC", true)).await.unwrap();

        let err = sched
            .upsert(make_spec(1, 9, 0, "Mars/OlympusMons", true))
            .await
            .unwrap_err();
        assert!(matches!(err, SchedulerError::InvalidTimezone(_)));

        // The earlier job is still installed, unchanged.
        let job = sched.job(1).await.unwrap();
        assert_eq!(job.fire_hour, 8);
        assert_eq!(job.timezone_name, "UTC");
    }

    #[tokio::test]
    async fn unknown_user_is_rejected() {
        let sched = JobScheduler::new(MockHandler::ok(), MockStore::with_users(vec![1]));
        let err = sched
            .upsert(make_spec(42, 9, 0, "UTC", true))
            .await
            .unwrap_err();
        assert!(matches!(err, SchedulerError::UnknownUser(42)));
        assert!(sched.is_empty().await);
    }

    #[tokio::test]
    async fn out_of_range_fire_time_is_rejected() {
        let sched = JobScheduler::new(MockHandler::ok(), MockStore::with_users(vec![1]));
        let err = sched
            .upsert(make_spec(1, 24, 0, "UTC", true))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SchedulerError::InvalidFireTime { hour: 24, minute: 0 }
        ));
    }

    #[tokio::test]
    async fn disabled_spec_tears_down_job() {
        let sched = JobScheduler::new(MockHandler::ok(), MockStore::with_users(vec![1]));
        sched.upsert(make_spec(1, 8, 0, "UTC", true)).await.unwrap();

        sched
            .upsert(make_spec(1, 8, 0, "UTC", false))
            .await
            .unwrap();

        assert!(sched.is_empty().await);
    }

    // -- disable -----------------------------------------------------------

    #[tokio::test]
    async fn disable_removes_job() {
        let sched = JobScheduler::new(MockHandler::ok(), MockStore::with_users(vec![1]));
        sched.upsert(make_spec(1, 8, 0, "UTC", true)).await.unwrap();

        assert!(sched.disable(1).await);
        assert!(sched.is_empty().await);
    }

    #[tokio::test]
    async fn disable_absent_user_is_noop() {
        let sched = JobScheduler::new(MockHandler::ok(), MockStore::with_users(vec![]));
        assert!(!sched.disable(99).await);
    }

    // -- fire_now ----------------------------------------------------------

    #[tokio::test]
    async fn fire_now_invokes_handler() {
        let handler = MockHandler::ok();
        let sched = JobScheduler::new(handler.clone(), MockStore::with_users(vec![1]));
        sched.upsert(make_spec(1, 8, 0, "UTC", true)).await.unwrap();

        sched.fire_now(1).await.unwrap();
        assert_eq!(handler.fires.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn fire_now_without_job_errors() {
        let sched = JobScheduler::new(MockHandler::ok(), MockStore::with_users(vec![1]));
        let err = sched.fire_now(1).await.unwrap_err();
        assert!(matches!(err, SchedulerError::JobNotFound(1)));
    }

    #[tokio::test]
    async fn handler_failure_surfaces_but_keeps_job() {
        let handler = MockHandler::failing();
        let sched = JobScheduler::new(handler.clone(), MockStore::with_users(vec![1]));
        sched.upsert(make_spec(1, 8, 0, "UTC", true)).await.unwrap();

        let err = sched.fire_now(1).await.unwrap_err();
        assert!(matches!(err, SchedulerError::FireFailed(_)));
        assert_eq!(handler.fires.load(Ordering::SeqCst), 1);
        assert!(sched.job(1).await.is_some());
    }

    // -- restore -----------------------------------------------------------

    #[tokio::test]
    async fn restore_replays_enabled_specs_and_skips_invalid() {
        let store = Arc::new(MockStore {
            users: vec![1, 2],
            specs: vec![
                make_spec(1, 8, 0, "UTC", true),
                make_spec(2, 9, 15, "Asia/Manila", true),
                make_spec(3, 9, 0, "UTC", true), // unknown user, skipped
            ],
        });
        let sched = JobScheduler::new(MockHandler::ok(), store);

        let installed = sched.restore().await.unwrap();
        assert_eq!(installed, 2);
        assert_eq!(sched.len().await, 2);
        assert!(sched.job(3).await.is_none());
    }

    // -- shutdown ----------------------------------------------------------

    #[tokio::test]
    async fn shutdown_clears_jobs_and_rejects_upserts() {
        let sched = JobScheduler::new(MockHandler::ok(), MockStore::with_users(vec![1]));
        sched.upsert(make_spec(1, 8, 0, "UTC", true)).await.unwrap();

        sched.shutdown().await;
        assert!(sched.is_empty().await);

        let err = sched
            .upsert(make_spec(1, 8, 0, "UTC", true))
            .await
            .unwrap_err();
        assert!(matches!(err, SchedulerError::ShutDown));
    }

    #[tokio::test]
    async fn shutdown_is_idempotent() {
        let sched = JobScheduler::new(MockHandler::ok(), MockStore::with_users(vec![]));
        sched.shutdown().await;
        sched.shutdown().await;
    }
}

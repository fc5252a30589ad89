//! Activity poller
//!
//! A freshly created system activity is not queryable right away. The poller
//! re-queries on a coarse interval while the platform answers "Resource not
//! found", and stops on the first successful answer or on any other error.
//! Transport hiccups never reach this loop: the executor retries them on its
//! own, much shorter, schedule.

use std::sync::Arc;
use std::time::Duration;

use scanbridge_domain::constants::{DEFAULT_POLL_INTERVAL_SECS, DEFAULT_POLL_MAX_ATTEMPTS};
use scanbridge_domain::{ActivityStatus, PollError, PollSettings};
use tracing::{debug, info, warn};

use super::ports::ActivityStatusSource;

/// Attempt budget and spacing of the poll loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_POLL_MAX_ATTEMPTS,
            interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
        }
    }
}

impl From<PollSettings> for PollPolicy {
    fn from(settings: PollSettings) -> Self {
        Self { max_attempts: settings.max_attempts, interval: settings.interval() }
    }
}

/// States of the poll loop.
#[derive(Debug, Clone, PartialEq)]
pub enum PollState {
    /// About to issue query number `attempt` (1-based).
    Querying { attempt: u32 },
    /// Query `attempt` reported the activity as not visible yet.
    NotYetVisible { attempt: u32, last_error: String },
    /// Final outcome; no further queries.
    Terminal(Result<ActivityStatus, PollError>),
    /// Budget spent while the activity stayed invisible.
    Exhausted { attempts: u32, last_error: Option<String> },
}

/// Polls a system activity until it is visible or the budget is spent.
pub struct ActivityPoller {
    source: Arc<dyn ActivityStatusSource>,
    policy: PollPolicy,
}

impl ActivityPoller {
    pub fn new(source: Arc<dyn ActivityStatusSource>, policy: PollPolicy) -> Self {
        Self { source, policy }
    }

    pub fn policy(&self) -> PollPolicy {
        self.policy
    }

    /// Query `activity_id` until a terminal outcome.
    ///
    /// The returned status is whatever the platform reported on the first
    /// successful query; its `status` field is not interpreted here.
    ///
    /// # Errors
    /// - [`PollError::Query`] on the first error that is not a visibility
    ///   miss.
    /// - [`PollError::Timeout`] when every attempt reported the activity as
    ///   not found.
    pub async fn poll_until_terminal(&self, activity_id: &str) -> Result<ActivityStatus, PollError> {
        let mut state = if self.policy.max_attempts == 0 {
            PollState::Exhausted { attempts: 0, last_error: None }
        } else {
            PollState::Querying { attempt: 1 }
        };

        loop {
            state = match state {
                PollState::Querying { attempt } => self.query(activity_id, attempt).await,
                PollState::NotYetVisible { attempt, last_error } => {
                    info!(
                        activity_id,
                        attempt,
                        retry_in_secs = self.policy.interval.as_secs(),
                        error = %last_error,
                        "system activity not visible yet, retrying"
                    );
                    tokio::time::sleep(self.policy.interval).await;
                    PollState::Querying { attempt: attempt + 1 }
                }
                PollState::Terminal(outcome) => return outcome,
                PollState::Exhausted { attempts, last_error } => {
                    warn!(activity_id, attempts, "system activity never became visible");
                    return Err(PollError::Timeout { attempts, last_error });
                }
            };
        }
    }

    async fn query(&self, activity_id: &str, attempt: u32) -> PollState {
        debug!(activity_id, attempt, max_attempts = self.policy.max_attempts, "querying system activity");

        match self.source.system_activity(activity_id).await {
            Ok(status) => {
                info!(activity_id, attempt, status = %status.status, "system activity retrieved");
                PollState::Terminal(Ok(status))
            }
            Err(err) if err.is_resource_not_found() => {
                let last_error = err.to_string();
                if attempt < self.policy.max_attempts {
                    PollState::NotYetVisible { attempt, last_error }
                } else {
                    PollState::Exhausted { attempts: attempt, last_error: Some(last_error) }
                }
            }
            Err(err) => {
                warn!(activity_id, attempt, error = %err, "system activity query failed");
                PollState::Terminal(Err(PollError::Query(err)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use scanbridge_domain::{QueryError, TransportError};
    use tokio::time::Instant;

    use super::*;

    /// Replays scripted answers and records every query.
    struct ScriptedSource {
        answers: Mutex<VecDeque<Result<ActivityStatus, QueryError>>>,
        calls: Mutex<Vec<(String, Instant)>>,
    }

    impl ScriptedSource {
        fn new(answers: Vec<Result<ActivityStatus, QueryError>>) -> Arc<Self> {
            Arc::new(Self {
                answers: Mutex::new(answers.into()),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<(String, Instant)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ActivityStatusSource for ScriptedSource {
        async fn system_activity(&self, activity_id: &str) -> Result<ActivityStatus, QueryError> {
            self.calls.lock().unwrap().push((activity_id.to_string(), Instant::now()));
            self.answers
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(QueryError::Decode("script exhausted".into())))
        }
    }

    fn status(value: &str) -> ActivityStatus {
        ActivityStatus {
            id: "a1".into(),
            status: value.into(),
            status_info: None,
            result: None,
            context: None,
        }
    }

    fn not_found() -> Result<ActivityStatus, QueryError> {
        Err(QueryError::ApiErrors(vec!["Resource not found".into()]))
    }

    fn poller(source: Arc<ScriptedSource>) -> ActivityPoller {
        ActivityPoller::new(source, PollPolicy::default())
    }

    #[test]
    fn default_policy_is_five_attempts_ten_seconds_apart() {
        let policy = PollPolicy::default();
        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.interval, Duration::from_secs(10));
        assert_eq!(PollPolicy::from(PollSettings::default()), policy);
    }

    #[tokio::test(start_paused = true)]
    async fn returns_status_on_first_success() {
        let source = ScriptedSource::new(vec![Ok(status("SUCCESS"))]);
        let started = Instant::now();

        let result = poller(source.clone()).poll_until_terminal("a1").await.unwrap();

        assert_eq!(result.status, "SUCCESS");
        assert_eq!(source.calls().len(), 1);
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn succeeds_on_third_attempt_without_further_queries() {
        let source = ScriptedSource::new(vec![
            not_found(),
            not_found(),
            Ok(status("IN_PROGRESS")),
            Ok(status("SUCCESS")),
        ]);

        let result = poller(source.clone()).poll_until_terminal("a1").await.unwrap();

        assert_eq!(result.status, "IN_PROGRESS");
        let calls = source.calls();
        assert_eq!(calls.len(), 3);
        assert!(calls.iter().all(|(id, _)| id == "a1"));
        assert_eq!(calls[1].1 - calls[0].1, Duration::from_secs(10));
        assert_eq!(calls[2].1 - calls[1].1, Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn times_out_after_five_not_found_answers() {
        let source = ScriptedSource::new((0..6).map(|_| not_found()).collect());
        let started = Instant::now();

        let err = poller(source.clone()).poll_until_terminal("a1").await.unwrap_err();

        assert_eq!(source.calls().len(), 5);
        assert_eq!(started.elapsed(), Duration::from_secs(40));
        match err {
            PollError::Timeout { attempts, last_error } => {
                assert_eq!(attempts, 5);
                assert!(last_error.unwrap().contains("Resource not found"));
            }
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn other_api_errors_stop_immediately() {
        let source = ScriptedSource::new(vec![
            not_found(),
            Err(QueryError::ApiErrors(vec!["Unauthorized".into()])),
            Ok(status("SUCCESS")),
        ]);

        let err = poller(source.clone()).poll_until_terminal("a1").await.unwrap_err();

        assert_eq!(source.calls().len(), 2);
        assert_eq!(err, PollError::Query(QueryError::ApiErrors(vec!["Unauthorized".into()])));
    }

    #[tokio::test(start_paused = true)]
    async fn transport_failures_are_not_visibility_misses() {
        let source = ScriptedSource::new(vec![Err(QueryError::Transport(
            TransportError::RetriesExhausted { status: 503, attempts: 3 },
        ))]);
        let started = Instant::now();

        let err = poller(source.clone()).poll_until_terminal("a1").await.unwrap_err();

        assert!(matches!(err, PollError::Query(QueryError::Transport(_))));
        assert_eq!(source.calls().len(), 1);
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_budget_never_queries() {
        let source = ScriptedSource::new(vec![Ok(status("SUCCESS"))]);
        let policy = PollPolicy { max_attempts: 0, interval: Duration::from_secs(10) };

        let err = ActivityPoller::new(source.clone(), policy)
            .poll_until_terminal("a1")
            .await
            .unwrap_err();

        assert_eq!(err, PollError::Timeout { attempts: 0, last_error: None });
        assert!(source.calls().is_empty());
    }
}

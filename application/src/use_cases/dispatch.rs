//! Dispatcher
//!
//! Fans creation commands out over a bounded worker pool. Each worker pulls
//! the next command from a shared queue and runs that command's full
//! attempt-then-maybe-retry loop before taking another, so at most
//! `concurrency_limit` commands are in flight at any instant.
//!
//! Terminal outcomes flow back over a channel to the task that called
//! [`Dispatcher::run`], which is the only place the report is mutated.

use crate::config::DispatchParams;
use crate::ports::create_client::CreateClient;
use crate::ports::progress::{NoProgress, ReconcileProgressNotifier};
use megaverse_domain::{
    CommandReport, CommandStatus, CreateCommand, Position, ReconciliationReport, RetryAction,
    RetryPolicy,
};
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinSet;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Bounded-concurrency executor for creation commands
pub struct Dispatcher<C: CreateClient + 'static> {
    client: Arc<C>,
    params: DispatchParams,
    cancel: CancellationToken,
}

impl<C: CreateClient + 'static> Dispatcher<C> {
    pub fn new(client: Arc<C>, params: DispatchParams) -> Self {
        Self {
            client,
            params,
            cancel: CancellationToken::new(),
        }
    }

    /// Use an externally owned cancellation token.
    ///
    /// Cancelling stops new attempts from starting; in-flight network calls
    /// run to completion.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn params(&self) -> &DispatchParams {
        &self.params
    }

    /// Execute every command and collect the outcomes.
    pub async fn run(&self, commands: Vec<CreateCommand>) -> ReconciliationReport {
        self.run_with_progress(commands, &NoProgress).await
    }

    /// Execute every command, reporting each terminal outcome as it arrives.
    pub async fn run_with_progress(
        &self,
        commands: Vec<CreateCommand>,
        progress: &dyn ReconcileProgressNotifier,
    ) -> ReconciliationReport {
        let total = commands.len();
        let workers = self.params.concurrency_limit.max(1).min(total);
        info!(
            "Dispatching {} commands over {} workers",
            total, workers
        );
        progress.on_dispatch_start(total);

        let expected = commands.clone();
        let queue = Arc::new(Mutex::new(VecDeque::from(commands)));
        let (tx, mut rx) = mpsc::unbounded_channel::<CommandReport>();

        let mut join_set = JoinSet::new();
        for worker in 0..workers {
            let client = Arc::clone(&self.client);
            let queue = Arc::clone(&queue);
            let tx = tx.clone();
            let policy = self.params.retry.clone();
            let spacing = self.params.min_request_spacing;
            let cancel = self.cancel.clone();

            join_set.spawn(async move {
                let mut pacer = RequestPacer::new(spacing);
                loop {
                    let next = queue.lock().await.pop_front();
                    let Some(command) = next else {
                        break;
                    };
                    let outcome =
                        execute_command(client.as_ref(), &policy, &mut pacer, &cancel, command)
                            .await;
                    if tx.send(outcome).is_err() {
                        break;
                    }
                }
                debug!("Worker {} finished", worker);
            });
        }
        drop(tx);

        let mut report = ReconciliationReport::new();
        let mut seen = HashSet::with_capacity(total);
        while let Some(outcome) = rx.recv().await {
            if !seen.insert(outcome.position()) {
                warn!("Duplicate outcome for {} ignored", outcome.position());
                continue;
            }
            progress.on_command_complete(&outcome);
            report.record(outcome);
        }

        while let Some(result) = join_set.join_next().await {
            if let Err(e) = result {
                warn!("Worker join error: {}", e);
            }
        }

        // A worker that panicked mid-command never reported it.
        for command in lost_commands(&expected, &seen) {
            warn!("No outcome for {}; recording as abandoned", command);
            let outcome = CommandReport::new(
                command,
                CommandStatus::Abandoned {
                    reason: "worker terminated before completion".to_string(),
                },
                0,
            );
            progress.on_command_complete(&outcome);
            report.record(outcome);
        }

        info!(
            "Dispatch finished: {} succeeded, {} rejected, {} abandoned, {} cancelled",
            report.succeeded(),
            report.rejected(),
            report.abandoned(),
            report.cancelled()
        );
        progress.on_dispatch_complete(&report);
        report
    }
}

fn lost_commands(expected: &[CreateCommand], seen: &HashSet<Position>) -> Vec<CreateCommand> {
    expected
        .iter()
        .filter(|c| !seen.contains(&c.position))
        .copied()
        .collect()
}

/// Run one command's retry loop to a terminal outcome.
///
/// Cancellation is honoured between attempts only: once a request has been
/// issued its result is classified as usual.
pub async fn execute_command<C: CreateClient + ?Sized>(
    client: &C,
    policy: &RetryPolicy,
    pacer: &mut RequestPacer,
    cancel: &CancellationToken,
    command: CreateCommand,
) -> CommandReport {
    let mut attempt = 0u32;
    loop {
        if cancel.is_cancelled() || !pacer.wait(cancel).await {
            return CommandReport::new(command, CommandStatus::Cancelled, attempt);
        }

        attempt += 1;
        pacer.mark();
        let result = client.create(&command).await;

        match policy.next_action(attempt, &result) {
            RetryAction::Stop(status) => {
                if status.is_success() {
                    debug!(
                        row = command.position.row,
                        column = command.position.column,
                        attempt,
                        "Created {}",
                        command
                    );
                } else {
                    warn!(
                        row = command.position.row,
                        column = command.position.column,
                        attempt,
                        "Failed to create {}: {:?}",
                        command,
                        status
                    );
                }
                return CommandReport::new(command, status, attempt);
            }
            RetryAction::WaitThen(delay) => {
                warn!(
                    row = command.position.row,
                    column = command.position.column,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "Retrying {} after {:?}",
                    command,
                    result
                );
                if !sleep_unless_cancelled(delay, cancel).await {
                    return CommandReport::new(command, CommandStatus::Cancelled, attempt);
                }
            }
        }
    }
}

/// Enforces a minimum gap between requests issued from one worker slot.
#[derive(Debug, Clone)]
pub struct RequestPacer {
    spacing: Option<Duration>,
    last_request: Option<Instant>,
}

impl RequestPacer {
    pub fn new(spacing: Option<Duration>) -> Self {
        Self {
            spacing,
            last_request: None,
        }
    }

    /// Wait until the next request may be issued.
    ///
    /// Returns `false` if cancelled while waiting.
    pub async fn wait(&self, cancel: &CancellationToken) -> bool {
        match (self.spacing, self.last_request) {
            (Some(spacing), Some(last)) => {
                let ready_at = last + spacing;
                let now = Instant::now();
                if ready_at <= now {
                    return true;
                }
                sleep_unless_cancelled(ready_at - now, cancel).await
            }
            _ => true,
        }
    }

    pub fn mark(&mut self) {
        self.last_request = Some(Instant::now());
    }
}

/// Sleep for `delay`; returns `false` if cancelled first.
pub(crate) async fn sleep_unless_cancelled(delay: Duration, cancel: &CancellationToken) -> bool {
    tokio::select! {
        _ = cancel.cancelled() => false,
        _ = tokio::time::sleep(delay) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use megaverse_domain::{AttemptResult, SoloonColor};
    use std::collections::HashMap;
    use std::sync::Mutex as StdMutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Scripted client: per-position result sequences, `Success` once exhausted.
    #[derive(Default)]
    struct ScriptedClient {
        scripts: StdMutex<HashMap<Position, VecDeque<AttemptResult>>>,
        calls: StdMutex<HashMap<Position, u32>>,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
        latency: Duration,
    }

    impl ScriptedClient {
        fn with_latency(latency: Duration) -> Self {
            Self {
                latency,
                ..Default::default()
            }
        }

        fn script(self, position: Position, results: Vec<AttemptResult>) -> Self {
            self.scripts
                .lock()
                .unwrap()
                .insert(position, results.into());
            self
        }

        fn calls(&self, position: Position) -> u32 {
            self.calls
                .lock()
                .unwrap()
                .get(&position)
                .copied()
                .unwrap_or(0)
        }
    }

    #[async_trait]
    impl CreateClient for ScriptedClient {
        async fn create(&self, command: &CreateCommand) -> AttemptResult {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            *self
                .calls
                .lock()
                .unwrap()
                .entry(command.position)
                .or_insert(0) += 1;

            if !self.latency.is_zero() {
                tokio::time::sleep(self.latency).await;
            }

            let result = self
                .scripts
                .lock()
                .unwrap()
                .get_mut(&command.position)
                .and_then(|s| s.pop_front())
                .unwrap_or(AttemptResult::Success);
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            result
        }
    }

    fn fast_params(concurrency: usize) -> DispatchParams {
        DispatchParams::default()
            .with_concurrency_limit(concurrency)
            .with_retry(RetryPolicy::new(5, Duration::from_millis(1)))
    }

    fn grid(n: usize) -> Vec<CreateCommand> {
        (0..n).map(|i| CreateCommand::polyanet(i / 10, i % 10)).collect()
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrency_limit_respected() {
        let client = Arc::new(ScriptedClient::with_latency(Duration::from_millis(5)));
        let dispatcher = Dispatcher::new(Arc::clone(&client), fast_params(3));

        let report = dispatcher.run(grid(25)).await;

        assert_eq!(report.total(), 25);
        assert_eq!(report.succeeded(), 25);
        let max = client.max_in_flight.load(Ordering::SeqCst);
        assert!(max <= 3, "max in flight was {}", max);
        assert!(max >= 1);
    }

    #[tokio::test]
    async fn test_empty_command_set() {
        let client = Arc::new(ScriptedClient::default());
        let dispatcher = Dispatcher::new(client, fast_params(10));
        let report = dispatcher.run(vec![]).await;
        assert_eq!(report.total(), 0);
    }

    #[tokio::test]
    async fn test_rate_limited_three_times_then_success() {
        let pos = Position::new(0, 0);
        let client = Arc::new(ScriptedClient::default().script(
            pos,
            vec![
                AttemptResult::RateLimited,
                AttemptResult::RateLimited,
                AttemptResult::RateLimited,
                AttemptResult::Success,
            ],
        ));
        let dispatcher = Dispatcher::new(Arc::clone(&client), fast_params(2));

        let report = dispatcher.run(vec![CreateCommand::polyanet(0, 0)]).await;

        assert_eq!(report.succeeded(), 1);
        assert_eq!(report.outcomes()[0].attempts, 4);
        assert_eq!(client.calls(pos), 4);
    }

    #[tokio::test]
    async fn test_failures_isolated_from_siblings() {
        let rejected = Position::new(0, 1);
        let exhausted = Position::new(0, 2);
        let client = Arc::new(
            ScriptedClient::default()
                .script(
                    rejected,
                    vec![AttemptResult::PermanentFailure("400 Bad Request".into())],
                )
                .script(
                    exhausted,
                    vec![AttemptResult::TransientFailure("503".into()); 10],
                ),
        );
        let dispatcher = Dispatcher::new(Arc::clone(&client), fast_params(4));

        let report = dispatcher
            .run(vec![
                CreateCommand::polyanet(0, 0),
                CreateCommand::soloon(0, 1, SoloonColor::Blue),
                CreateCommand::polyanet(0, 2),
                CreateCommand::polyanet(0, 3),
            ])
            .await;

        assert_eq!(report.total(), 4);
        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.rejected(), 1);
        assert_eq!(report.abandoned(), 1);
        assert_eq!(client.calls(rejected), 1);
        assert_eq!(client.calls(exhausted), 5);

        let failed: Vec<_> = report.failures().iter().map(|o| o.position()).collect();
        assert_eq!(failed, vec![rejected, exhausted]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_waits_exponential_schedule() {
        let pos = Position::new(1, 1);
        let client = Arc::new(
            ScriptedClient::default()
                .script(pos, vec![AttemptResult::TransientFailure("502".into()); 5]),
        );
        let dispatcher = Dispatcher::new(
            client,
            DispatchParams::default().with_retry(RetryPolicy::default()),
        );

        let started = Instant::now();
        let report = dispatcher.run(vec![CreateCommand::polyanet(1, 1)]).await;

        assert_eq!(report.abandoned(), 1);
        // 2 + 4 + 8 + 16 seconds of backoff
        assert!(started.elapsed() >= Duration::from_secs(30));
    }

    #[tokio::test(start_paused = true)]
    async fn test_min_request_spacing_per_slot() {
        let client = Arc::new(ScriptedClient::default());
        let params = fast_params(1).with_min_request_spacing(Some(Duration::from_secs(10)));
        let dispatcher = Dispatcher::new(client, params);

        let started = Instant::now();
        let report = dispatcher.run(grid(3)).await;

        assert_eq!(report.succeeded(), 3);
        assert!(started.elapsed() >= Duration::from_secs(20));
    }

    #[tokio::test]
    async fn test_cancelled_before_start_reports_every_command() {
        let client = Arc::new(ScriptedClient::default());
        let cancel = CancellationToken::new();
        cancel.cancel();
        let dispatcher =
            Dispatcher::new(Arc::clone(&client), fast_params(2)).with_cancellation(cancel);

        let report = dispatcher.run(grid(5)).await;

        assert_eq!(report.total(), 5);
        assert_eq!(report.cancelled(), 5);
        assert_eq!(client.calls(Position::new(0, 0)), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_backoff_stops_future_attempts() {
        let pos = Position::new(0, 0);
        let client = Arc::new(
            ScriptedClient::default().script(pos, vec![AttemptResult::RateLimited; 5]),
        );
        let cancel = CancellationToken::new();
        let dispatcher = Dispatcher::new(
            Arc::clone(&client),
            DispatchParams::default().with_retry(RetryPolicy::new(5, Duration::from_secs(60))),
        )
        .with_cancellation(cancel.clone());

        let trigger = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            cancel.cancel();
        });
        let report = dispatcher.run(vec![CreateCommand::polyanet(0, 0)]).await;
        trigger.await.unwrap();

        assert_eq!(report.cancelled(), 1);
        assert_eq!(report.outcomes()[0].attempts, 1);
        assert_eq!(client.calls(pos), 1);
    }

    #[tokio::test]
    async fn test_pacer_without_spacing_never_waits() {
        let mut pacer = RequestPacer::new(None);
        let cancel = CancellationToken::new();
        pacer.mark();
        assert!(pacer.wait(&cancel).await);
    }
}

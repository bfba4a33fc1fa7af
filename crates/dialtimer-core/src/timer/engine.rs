//! Countdown engine implementation.
//!
//! Each countdown runs as a task on the current tokio runtime and reports
//! through the callbacks passed to [`CountdownEngine::start`]. Only one
//! countdown is meaningful at a time: starting a new one cancels the last.
//!
//! ## State Transitions
//!
//! ```text
//! Created -> Ticking -> Done
//!               \-> Cancelled
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = CountdownEngine::new();
//! let handle = engine.start(3_000, |ms| println!("{ms}"), || println!("done"));
//! // later
//! engine.cancel(handle);
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(1_000);

/// Identifies one started countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CountdownHandle(u64);

impl CountdownHandle {
    pub fn id(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountdownState {
    /// Nothing started yet.
    Created,
    Ticking,
    Done,
    Cancelled,
}

struct ActiveCountdown {
    handle: CountdownHandle,
    token: CancellationToken,
    done: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

/// Starts and cancels countdowns.
pub struct CountdownEngine {
    period: Duration,
    next_id: u64,
    current: Option<ActiveCountdown>,
}

impl CountdownEngine {
    pub fn new() -> Self {
        Self::with_period(DEFAULT_TICK_INTERVAL)
    }

    /// Engine ticking every `period` instead of once per second.
    pub fn with_period(period: Duration) -> Self {
        Self {
            // A zero period would spin; fall back to one millisecond.
            period: period.max(Duration::from_millis(1)),
            next_id: 1,
            current: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// State of the most recently started countdown.
    pub fn state(&self) -> CountdownState {
        match &self.current {
            None => CountdownState::Created,
            Some(active) if active.token.is_cancelled() => CountdownState::Cancelled,
            Some(active) if active.done.load(Ordering::Acquire) => CountdownState::Done,
            Some(_) => CountdownState::Ticking,
        }
    }

    /// The handle whose callbacks may still fire.
    pub fn active(&self) -> Option<CountdownHandle> {
        self.current
            .as_ref()
            .filter(|a| !a.token.is_cancelled() && !a.done.load(Ordering::Acquire))
            .map(|a| a.handle)
    }

    pub fn is_active(&self, handle: CountdownHandle) -> bool {
        self.active() == Some(handle)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start a countdown of `total_ms`.
    ///
    /// `on_tick` receives the remaining milliseconds at every period
    /// boundary, the last call reporting `0`. `on_finish` fires once after
    /// that. Any previously started countdown is cancelled first.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start<T, F>(&mut self, total_ms: u64, on_tick: T, on_finish: F) -> CountdownHandle
    where
        T: FnMut(u64) + Send + 'static,
        F: FnOnce() + Send + 'static,
    {
        if let Some(previous) = self.active() {
            self.cancel(previous);
        }

        let handle = CountdownHandle(self.next_id);
        self.next_id += 1;

        let token = CancellationToken::new();
        let done = Arc::new(AtomicBool::new(false));
        let task = tokio::spawn(run_countdown(
            Duration::from_millis(total_ms),
            self.period,
            token.clone(),
            done.clone(),
            on_tick,
            on_finish,
        ));
        tracing::debug!(countdown = handle.id(), total_ms, "countdown started");

        self.current = Some(ActiveCountdown {
            handle,
            token,
            done,
            task,
        });
        handle
    }

    /// Cancel `handle`. Returns `false` if it was not the active countdown.
    ///
    /// After this returns no callback of `handle` runs again.
    pub fn cancel(&mut self, handle: CountdownHandle) -> bool {
        let Some(active) = self.current.as_ref() else {
            return false;
        };
        if active.handle != handle || !self.is_active(handle) {
            return false;
        }
        active.token.cancel();
        active.task.abort();
        tracing::debug!(countdown = handle.id(), "countdown cancelled");
        true
    }
}

impl Default for CountdownEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for CountdownEngine {
    fn drop(&mut self) {
        if let Some(active) = self.current.take() {
            active.token.cancel();
            active.task.abort();
        }
    }
}

async fn run_countdown<T, F>(
    total: Duration,
    period: Duration,
    token: CancellationToken,
    done: Arc<AtomicBool>,
    mut on_tick: T,
    on_finish: F,
) where
    T: FnMut(u64),
    F: FnOnce(),
{
    let started = Instant::now();
    let deadline = started + total;
    let mut boundary = started;

    loop {
        boundary = (boundary + period).min(deadline);
        tokio::select! {
            _ = token.cancelled() => return,
            _ = sleep_until(boundary) => {}
        }
        if token.is_cancelled() {
            return;
        }

        // Skip boundaries missed while the runtime was stalled.
        let now = Instant::now();
        while boundary < deadline && (boundary + period).min(deadline) <= now {
            boundary = (boundary + period).min(deadline);
        }

        // Report as of the boundary so wake-up jitter never shaves a second.
        let remaining = deadline.saturating_duration_since(boundary);
        on_tick(remaining.as_millis() as u64);
        if remaining.is_zero() {
            break;
        }
    }

    if token.is_cancelled() {
        return;
    }
    done.store(true, Ordering::Release);
    tracing::debug!("countdown finished");
    on_finish();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;

    fn recorder() -> (Arc<Mutex<Vec<u64>>>, Arc<AtomicUsize>) {
        (Arc::new(Mutex::new(Vec::new())), Arc::new(AtomicUsize::new(0)))
    }

    fn start_recorded(
        engine: &mut CountdownEngine,
        total_ms: u64,
        ticks: &Arc<Mutex<Vec<u64>>>,
        finishes: &Arc<AtomicUsize>,
    ) -> CountdownHandle {
        let ticks = ticks.clone();
        let finishes = finishes.clone();
        engine.start(
            total_ms,
            move |ms| ticks.lock().unwrap().push(ms),
            move || {
                finishes.fetch_add(1, Ordering::SeqCst);
            },
        )
    }

    #[tokio::test(start_paused = true)]
    async fn three_seconds_ticks_down_then_finishes_once() {
        let mut engine = CountdownEngine::new();
        let (ticks, finishes) = recorder();
        assert_eq!(engine.state(), CountdownState::Created);

        let handle = start_recorded(&mut engine, 3_000, &ticks, &finishes);
        assert!(engine.is_active(handle));
        assert_eq!(engine.state(), CountdownState::Ticking);

        tokio::time::sleep(Duration::from_secs(10)).await;

        assert_eq!(*ticks.lock().unwrap(), vec![2_000, 1_000, 0]);
        assert_eq!(finishes.load(Ordering::SeqCst), 1);
        assert_eq!(engine.state(), CountdownState::Done);
        assert!(!engine.is_active(handle));
    }

    #[tokio::test(start_paused = true)]
    async fn partial_second_ends_exactly_at_deadline() {
        let mut engine = CountdownEngine::new();
        let (ticks, finishes) = recorder();
        start_recorded(&mut engine, 2_500, &ticks, &finishes);

        tokio::time::sleep(Duration::from_secs(5)).await;

        assert_eq!(*ticks.lock().unwrap(), vec![1_500, 500, 0]);
        assert_eq!(finishes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_duration_ticks_zero_and_finishes() {
        let mut engine = CountdownEngine::new();
        let (ticks, finishes) = recorder();
        start_recorded(&mut engine, 0, &ticks, &finishes);

        tokio::time::sleep(Duration::from_millis(10)).await;

        assert_eq!(*ticks.lock().unwrap(), vec![0]);
        assert_eq!(finishes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_right_after_start_suppresses_everything() {
        let mut engine = CountdownEngine::new();
        let (ticks, finishes) = recorder();
        let handle = start_recorded(&mut engine, 3_000, &ticks, &finishes);

        assert!(engine.cancel(handle));
        tokio::time::sleep(Duration::from_secs(10)).await;

        assert!(ticks.lock().unwrap().is_empty());
        assert_eq!(finishes.load(Ordering::SeqCst), 0);
        assert_eq!(engine.state(), CountdownState::Cancelled);
        // second cancel is a no-op
        assert!(!engine.cancel(handle));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_mid_countdown_stops_ticks() {
        let mut engine = CountdownEngine::new();
        let (ticks, finishes) = recorder();
        let handle = start_recorded(&mut engine, 5_000, &ticks, &finishes);

        tokio::time::sleep(Duration::from_millis(2_500)).await;
        assert!(engine.cancel(handle));
        tokio::time::sleep(Duration::from_secs(10)).await;

        assert_eq!(*ticks.lock().unwrap(), vec![4_000, 3_000]);
        assert_eq!(finishes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn new_start_supersedes_previous_countdown() {
        let mut engine = CountdownEngine::new();
        let (old_ticks, old_finishes) = recorder();
        let (new_ticks, new_finishes) = recorder();

        let first = start_recorded(&mut engine, 2_000, &old_ticks, &old_finishes);
        tokio::time::sleep(Duration::from_millis(1_500)).await;
        let second = start_recorded(&mut engine, 2_000, &new_ticks, &new_finishes);

        assert_ne!(first, second);
        assert!(!engine.is_active(first));
        assert!(!engine.cancel(first));

        tokio::time::sleep(Duration::from_secs(10)).await;

        assert_eq!(*old_ticks.lock().unwrap(), vec![1_000]);
        assert_eq!(old_finishes.load(Ordering::SeqCst), 0);
        assert_eq!(*new_ticks.lock().unwrap(), vec![1_000, 0]);
        assert_eq!(new_finishes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn custom_period_changes_cadence() {
        let mut engine = CountdownEngine::with_period(Duration::from_millis(500));
        let (ticks, finishes) = recorder();
        start_recorded(&mut engine, 1_500, &ticks, &finishes);

        tokio::time::sleep(Duration::from_secs(3)).await;

        assert_eq!(*ticks.lock().unwrap(), vec![1_000, 500, 0]);
        assert_eq!(finishes.load(Ordering::SeqCst), 1);
    }
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Coalescing dispatcher
//!
//! Collapses a burst of submissions into one delayed execution. Every
//! submission restarts the quiescence window and replaces the work that will
//! run. All callers that submitted during a cycle observe the same outcome.

use std::fmt::Display;
use std::future::{Future, IntoFuture};
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;
use tokio::time::Instant;

/// Errors observed by every caller of a coalesced cycle
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("work failed: {0}")]
    Failed(String),
    #[error("work panicked: {0}")]
    Panicked(String),
    #[error("cycle ended without a result")]
    Abandoned,
}

type WorkFuture<T> = Pin<Box<dyn Future<Output = Result<T, DispatchError>> + Send>>;
type BoxedWork<T> = Box<dyn FnOnce() -> WorkFuture<T> + Send>;
type Outcome<T> = Option<Result<T, DispatchError>>;

struct DispatchState<T> {
    /// Last submitted work; replaced by every submission
    pending: Option<BoxedWork<T>>,
    last_submit: Instant,
    /// Present while a cycle is waiting or executing
    in_flight: Option<watch::Receiver<Outcome<T>>>,
}

/// Debounces submissions into a single delayed execution.
///
/// Must be used from within a Tokio runtime: the first submission of a cycle
/// spawns the task that waits out the interval and runs the work.
pub struct CoalescingDispatcher<T> {
    interval: Duration,
    state: Arc<Mutex<DispatchState<T>>>,
}

impl<T> CoalescingDispatcher<T> {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            state: Arc::new(Mutex::new(DispatchState {
                pending: None,
                last_submit: Instant::now(),
                in_flight: None,
            })),
        }
    }

    /// Quiescence window that must pass after the last submission
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Whether a cycle is currently waiting or executing
    pub fn is_pending(&self) -> bool {
        lock(&self.state).in_flight.is_some()
    }
}

impl<T> CoalescingDispatcher<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Submit work, superseding any work not yet started in the active cycle.
    ///
    /// Returns a handle that resolves to the outcome of whichever work the
    /// cycle finally runs. Never blocks the caller.
    pub fn submit<F, Fut, E>(&self, work: F) -> Coalesced<T>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        E: Display + Send + 'static,
    {
        let boxed: BoxedWork<T> = Box::new(move || {
            Box::pin(async move {
                work()
                    .await
                    .map_err(|e| DispatchError::Failed(e.to_string()))
            })
        });

        let rx = {
            let mut state = lock(&self.state);
            state.pending = Some(boxed);
            state.last_submit = Instant::now();

            if let Some(rx) = &state.in_flight {
                tracing::trace!("submission coalesced into active cycle");
                return Coalesced { rx: rx.clone() };
            }

            let (tx, rx) = watch::channel(None);
            state.in_flight = Some(rx.clone());
            tokio::spawn(run_cycle(Arc::clone(&self.state), self.interval, tx));
            rx
        };

        tracing::trace!(interval_ms = self.interval.as_millis() as u64, "cycle started");
        Coalesced { rx }
    }
}

impl CoalescingDispatcher<()> {
    /// Fire-and-forget variant for synchronous actions
    pub fn debounce<F>(&self, action: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let _ = self.submit(move || async move {
            action();
            Ok::<(), std::convert::Infallible>(())
        });
    }
}

impl<T> Clone for CoalescingDispatcher<T> {
    fn clone(&self) -> Self {
        Self {
            interval: self.interval,
            state: Arc::clone(&self.state),
        }
    }
}

/// Wait out the quiescence window, then run the latest work once.
async fn run_cycle<T>(
    state: Arc<Mutex<DispatchState<T>>>,
    interval: Duration,
    tx: watch::Sender<Outcome<T>>,
) where
    T: Clone + Send + Sync + 'static,
{
    let first_deadline = deadline_after(lock(&state).last_submit, interval);
    let sleep = tokio::time::sleep_until(first_deadline);
    tokio::pin!(sleep);

    let work = loop {
        sleep.as_mut().await;

        // A submission during the sleep moves the deadline out
        let wake = {
            let mut guard = lock(&state);
            let deadline = deadline_after(guard.last_submit, interval);
            if Instant::now() >= deadline {
                Ok(guard.pending.take())
            } else {
                Err(deadline)
            }
        };

        match wake {
            Ok(work) => break work,
            Err(deadline) => sleep.as_mut().reset(deadline),
        }
    };

    let outcome = match work {
        Some(work) => match tokio::spawn(work()).await {
            Ok(result) => result,
            Err(e) if e.is_panic() => Err(DispatchError::Panicked(panic_message(e.into_panic()))),
            Err(_) => Err(DispatchError::Abandoned),
        },
        None => Err(DispatchError::Abandoned),
    };

    if let Err(e) = &outcome {
        tracing::debug!(error = %e, "coalesced work failed");
    }

    {
        let mut guard = lock(&state);
        guard.in_flight = None;
        guard.pending = None;
    }
    let _ = tx.send(Some(outcome));
}

/// Roughly 30 years; stands in for deadlines past what `Instant` can hold
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

fn deadline_after(last_submit: Instant, interval: Duration) -> Instant {
    last_submit
        .checked_add(interval)
        .or_else(|| last_submit.checked_add(FAR_FUTURE))
        .unwrap_or(last_submit)
}

/// Best-effort text of a panic payload
pub fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn lock<T>(state: &Mutex<DispatchState<T>>) -> MutexGuard<'_, DispatchState<T>> {
    state.lock().unwrap_or_else(|e| e.into_inner())
}

/// Shared outcome of one dispatch cycle; await it to get the result.
pub struct Coalesced<T> {
    rx: watch::Receiver<Outcome<T>>,
}

impl<T> Coalesced<T> {
    /// Whether both handles observe the same cycle
    pub fn same_cycle(&self, other: &Coalesced<T>) -> bool {
        self.rx.same_channel(&other.rx)
    }

    pub fn is_settled(&self) -> bool {
        self.rx.borrow().is_some()
    }
}

impl<T> IntoFuture for Coalesced<T>
where
    T: Clone + Send + Sync + 'static,
{
    type Output = Result<T, DispatchError>;
    type IntoFuture = Pin<Box<dyn Future<Output = Self::Output> + Send>>;

    fn into_future(mut self) -> Self::IntoFuture {
        Box::pin(async move {
            match self.rx.wait_for(Option::is_some).await {
                Ok(outcome) => (*outcome).clone().unwrap_or(Err(DispatchError::Abandoned)),
                Err(_) => Err(DispatchError::Abandoned),
            }
        })
    }
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! UI execution contexts
//!
//! Displaying a resource is UI-affine. Controllers hand the final display
//! step to a [`UiContext`] instead of running it on a background task.

use std::panic::AssertUnwindSafe;
use tokio::sync::mpsc;

type UiAction = Box<dyn FnOnce() + Send + 'static>;

/// Runs actions on the UI-owning execution context, in submission order
pub trait UiContext: Clone + Send + Sync + 'static {
    fn run<F>(&self, action: F)
    where
        F: FnOnce() + Send + 'static;
}

/// Runs actions immediately on the calling thread.
///
/// For hosts without a dedicated UI thread, and for tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct InlineUiContext;

impl UiContext for InlineUiContext {
    fn run<F>(&self, action: F)
    where
        F: FnOnce() + Send + 'static,
    {
        action();
    }
}

/// Serializes actions onto a single dedicated task.
///
/// Actions run one at a time in FIFO order. A panicking action is logged and
/// does not stop later actions from running.
#[derive(Clone, Debug)]
pub struct TaskUiContext {
    tx: mpsc::UnboundedSender<UiAction>,
}

impl TaskUiContext {
    /// Spawn the UI task on the current Tokio runtime
    pub fn spawn() -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<UiAction>();
        tokio::spawn(async move {
            while let Some(action) = rx.recv().await {
                if std::panic::catch_unwind(AssertUnwindSafe(action)).is_err() {
                    tracing::error!("ui action panicked");
                }
            }
            tracing::debug!("ui context closed");
        });
        Self { tx }
    }
}

impl UiContext for TaskUiContext {
    fn run<F>(&self, action: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if self.tx.send(Box::new(action)).is_err() {
            tracing::warn!("ui context closed, action dropped");
        }
    }
}

#[cfg(test)]
#[path = "ui_tests.rs"]
mod tests;

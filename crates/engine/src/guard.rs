// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Guarded execution
//!
//! Runs work that must never unwind into the caller. Failures are logged with
//! the acting context label and handed back as [`ControllerError`].

use crate::error::ControllerError;
use preload_core::panic_message;
use std::future::Future;
use std::panic::AssertUnwindSafe;

/// Run `f`, converting a panic into an error
pub fn catch<T>(context: &'static str, f: impl FnOnce() -> T) -> Result<T, ControllerError> {
    std::panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
        let err = ControllerError::Panicked {
            context,
            message: panic_message(payload),
        };
        tracing::error!(context, error = %err, "unexpected failure");
        err
    })
}

/// Run `fut` on its own task, converting a panic or cancellation into an error
pub async fn run_async<T, Fut>(context: &'static str, fut: Fut) -> Result<T, ControllerError>
where
    Fut: Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    match tokio::spawn(fut).await {
        Ok(value) => Ok(value),
        Err(e) => {
            let message = if e.is_panic() {
                panic_message(e.into_panic())
            } else {
                "task cancelled".to_string()
            };
            let err = ControllerError::Panicked { context, message };
            tracing::error!(context, error = %err, "unexpected failure");
            Err(err)
        }
    }
}

#[cfg(test)]
#[path = "guard_tests.rs"]
mod tests;

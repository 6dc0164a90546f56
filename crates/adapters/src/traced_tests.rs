// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::provider::{FakeProvider, FakeResource};
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

/// A writer that captures log output for testing
#[derive(Clone, Default)]
struct CapturedLogs {
    logs: Arc<Mutex<Vec<u8>>>,
}

impl CapturedLogs {
    fn new() -> Self {
        Self::default()
    }

    fn contents(&self) -> String {
        let logs = self.logs.lock().unwrap();
        String::from_utf8_lossy(&logs).to_string()
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.logs.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run a closure with captured tracing output
fn with_tracing<F, R>(f: F) -> (String, R)
where
    F: FnOnce() -> R,
{
    let logs = CapturedLogs::new();
    let logs_clone = logs.clone();

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_writer(logs_clone)
        .with_ansi(false)
        .without_time()
        .finish();

    let result = tracing::subscriber::with_default(subscriber, f);
    (logs.contents(), result)
}

fn sink() -> ResourceEvents {
    let (tx, _rx) = ResourceEvents::channel();
    ResourceEvents::new(1, tx)
}

// =============================================================================
// Precondition validation tests
// =============================================================================

#[test]
fn traced_create_rejects_empty_unit_id() {
    let fake = FakeProvider::new();
    let traced = TracedProvider::new(fake.clone());

    let err = traced.create("  ", sink()).unwrap_err();

    assert!(
        err.to_string().contains("unit id is empty"),
        "Expected error about unit id, got: {}",
        err
    );
    assert!(fake.calls().is_empty(), "inner provider should not be called");
}

// =============================================================================
// Tracing output verification tests
// =============================================================================

#[test]
fn traced_create_logs_span_and_completion() {
    let traced = TracedProvider::new(FakeProvider::new());

    let (logs, result) = with_tracing(|| traced.create("interstitial", sink()));

    assert_eq!(result.unwrap(), FakeResource(1));
    assert!(logs.contains("provider.create"), "missing span: {}", logs);
    assert!(logs.contains("interstitial"), "missing unit id: {}", logs);
    assert!(logs.contains("resource created"), "missing completion: {}", logs);
    assert!(logs.contains("elapsed_ms"), "missing timing: {}", logs);
}

#[test]
fn traced_create_logs_failure() {
    let fake = FakeProvider::new();
    fake.fail_next_create("no fill");
    let traced = TracedProvider::new(fake);

    let (logs, result) = with_tracing(|| traced.create("interstitial", sink()));

    assert!(result.is_err());
    assert!(logs.contains("ERROR"), "missing error level: {}", logs);
    assert!(logs.contains("create failed"), "missing message: {}", logs);
    assert!(logs.contains("no fill"), "missing reason: {}", logs);
}

#[test]
fn traced_show_failure_is_a_warning() {
    let fake = FakeProvider::new();
    let traced = TracedProvider::new(fake.clone());
    let resource = traced.create("interstitial", sink()).unwrap();

    let (logs, result) = with_tracing(|| traced.show(&resource));

    assert!(result.is_err());
    assert!(logs.contains("WARN"), "missing warn level: {}", logs);
    assert!(logs.contains("provider.show"), "missing span: {}", logs);
}

#[test]
fn traced_delegates_every_call() {
    let fake = FakeProvider::new();
    let traced = TracedProvider::new(fake.clone());

    let resource = traced.create("interstitial", sink()).unwrap();
    traced.load(&resource).unwrap();
    fake.set_ready(resource, true);
    assert!(traced.is_ready(&resource));
    traced.show(&resource).unwrap();

    assert_eq!(fake.create_count(), 1);
    assert_eq!(fake.load_count(), 1);
    assert_eq!(fake.show_count(), 1);
    assert!(traced.inner().instance(resource).unwrap().shown);
}

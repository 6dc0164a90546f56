// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced provider wrapper for consistent observability

use crate::provider::{ProviderError, ResourceEvents, ResourceProvider};

/// Wrapper that adds tracing to any ResourceProvider
#[derive(Clone)]
pub struct TracedProvider<P> {
    inner: P,
}

impl<P> TracedProvider<P> {
    pub fn new(inner: P) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }
}

impl<P: ResourceProvider> ResourceProvider for TracedProvider<P> {
    type Handle = P::Handle;

    fn create(&self, unit_id: &str, events: ResourceEvents) -> Result<P::Handle, ProviderError> {
        let span = tracing::info_span!("provider.create", unit_id, generation = events.generation());
        let _guard = span.enter();

        // Precondition: the provider needs something to look up
        if unit_id.trim().is_empty() {
            tracing::error!("empty unit id");
            return Err(ProviderError::CreateFailed {
                unit_id: unit_id.to_string(),
                reason: "unit id is empty".to_string(),
            });
        }

        let start = std::time::Instant::now();
        let result = self.inner.create(unit_id, events);
        let elapsed = start.elapsed();

        match &result {
            Ok(handle) => tracing::info!(
                ?handle,
                elapsed_ms = elapsed.as_millis() as u64,
                "resource created"
            ),
            Err(e) => tracing::error!(
                elapsed_ms = elapsed.as_millis() as u64,
                error = %e,
                "create failed"
            ),
        }

        result
    }

    fn load(&self, handle: &P::Handle) -> Result<(), ProviderError> {
        let span = tracing::info_span!("provider.load", ?handle);
        let _guard = span.enter();

        let result = self.inner.load(handle);
        match &result {
            Ok(()) => tracing::info!("load started"),
            Err(e) => tracing::error!(error = %e, "load failed"),
        }

        result
    }

    fn show(&self, handle: &P::Handle) -> Result<(), ProviderError> {
        let span = tracing::info_span!("provider.show", ?handle);
        let _guard = span.enter();

        let start = std::time::Instant::now();
        let result = self.inner.show(handle);
        let elapsed = start.elapsed();

        // show() failing is recoverable; the controller reloads
        match &result {
            Ok(()) => tracing::info!(elapsed_ms = elapsed.as_millis() as u64, "shown"),
            Err(e) => tracing::warn!(error = %e, "show failed"),
        }

        result
    }

    fn is_ready(&self, handle: &P::Handle) -> bool {
        let ready = self.inner.is_ready(handle);
        tracing::trace!(?handle, ready, "checked");
        ready
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;

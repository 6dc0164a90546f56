// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! No-op provider for builds where resources are disabled.

use super::{ProviderError, ResourceEvents, ResourceProvider};

/// Provider that never produces a resource.
///
/// Every show request settles immediately without displaying anything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpProvider;

impl NoOpProvider {
    pub fn new() -> Self {
        Self
    }
}

impl ResourceProvider for NoOpProvider {
    type Handle = ();

    fn create(&self, unit_id: &str, _events: ResourceEvents) -> Result<(), ProviderError> {
        Err(ProviderError::Unavailable(format!(
            "resources disabled ({})",
            unit_id
        )))
    }

    fn load(&self, _handle: &()) -> Result<(), ProviderError> {
        Ok(())
    }

    fn show(&self, _handle: &()) -> Result<(), ProviderError> {
        Ok(())
    }

    fn is_ready(&self, _handle: &()) -> bool {
        false
    }
}

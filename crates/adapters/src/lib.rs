// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for the external resource provider and the UI context

pub mod provider;
pub mod traced;
pub mod ui;

pub use provider::{
    InstanceEvent, InstanceEventReceiver, NoOpProvider, ProviderError, ResourceEvent,
    ResourceEvents, ResourceProvider,
};
pub use traced::TracedProvider;
pub use ui::{InlineUiContext, TaskUiContext, UiContext};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use provider::{FakeInstance, FakeProvider, FakeResource, ProviderCall};

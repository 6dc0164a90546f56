// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resource provider adapters
//!
//! A provider creates, loads and shows single-use resources, and reports each
//! instance's lifecycle through the [`ResourceEvents`] sink it was given when
//! the instance was created.

mod noop;

pub use noop::NoOpProvider;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeInstance, FakeProvider, FakeResource, ProviderCall};

use thiserror::Error;
use tokio::sync::mpsc;

/// Errors from provider operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("create failed for {unit_id}: {reason}")]
    CreateFailed { unit_id: String, reason: String },
    #[error("load failed: {0}")]
    LoadFailed(String),
    #[error("show failed: {0}")]
    ShowFailed(String),
    #[error("provider unavailable: {0}")]
    Unavailable(String),
}

/// Lifecycle notification for one resource instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceEvent {
    Loaded,
    LoadFailed { reason: String },
    ShowFailed { reason: String },
    Dismissed,
}

impl ResourceEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ResourceEvent::Loaded => "resource:loaded",
            ResourceEvent::LoadFailed { .. } => "resource:load_failed",
            ResourceEvent::ShowFailed { .. } => "resource:show_failed",
            ResourceEvent::Dismissed => "resource:dismissed",
        }
    }
}

/// An event tagged with the instance that raised it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceEvent {
    pub generation: u64,
    pub event: ResourceEvent,
}

/// Receiving side of every instance's event sink
pub type InstanceEventReceiver = mpsc::UnboundedReceiver<InstanceEvent>;

/// Event sink bound to a single resource instance.
///
/// Handed to the provider exactly once, when the instance is created. Safe to
/// use from any thread; delivery is asynchronous.
#[derive(Clone, Debug)]
pub struct ResourceEvents {
    generation: u64,
    tx: mpsc::UnboundedSender<InstanceEvent>,
}

impl ResourceEvents {
    pub fn new(generation: u64, tx: mpsc::UnboundedSender<InstanceEvent>) -> Self {
        Self { generation, tx }
    }

    /// Channel for sinks created with [`ResourceEvents::new`]
    pub fn channel() -> (mpsc::UnboundedSender<InstanceEvent>, InstanceEventReceiver) {
        mpsc::unbounded_channel()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Deliver an event; returns false if nobody is listening any more
    pub fn emit(&self, event: ResourceEvent) -> bool {
        self.tx
            .send(InstanceEvent {
                generation: self.generation,
                event,
            })
            .is_ok()
    }

    pub fn loaded(&self) -> bool {
        self.emit(ResourceEvent::Loaded)
    }

    pub fn load_failed(&self, reason: impl Into<String>) -> bool {
        self.emit(ResourceEvent::LoadFailed {
            reason: reason.into(),
        })
    }

    pub fn show_failed(&self, reason: impl Into<String>) -> bool {
        self.emit(ResourceEvent::ShowFailed {
            reason: reason.into(),
        })
    }

    pub fn dismissed(&self) -> bool {
        self.emit(ResourceEvent::Dismissed)
    }
}

/// Capability for creating, loading and showing single-use resources.
///
/// `load` and `show` only start the work; outcomes arrive later through the
/// instance's [`ResourceEvents`]. Implementations must not call back into
/// their caller synchronously.
pub trait ResourceProvider: Clone + Send + Sync + 'static {
    type Handle: Clone + Send + Sync + std::fmt::Debug + 'static;

    /// Create a resource for `unit_id` and attach its event sink
    fn create(&self, unit_id: &str, events: ResourceEvents)
        -> Result<Self::Handle, ProviderError>;

    /// Start loading the resource
    fn load(&self, handle: &Self::Handle) -> Result<(), ProviderError>;

    /// Display the resource; must run on the UI context
    fn show(&self, handle: &Self::Handle) -> Result<(), ProviderError>;

    /// Whether the resource has finished loading and can be shown
    fn is_ready(&self, handle: &Self::Handle) -> bool;
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Observable controller state

use std::fmt;

/// Lifecycle state of the controller's resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceState {
    /// No resource held
    Idle,
    /// Resource created, load outstanding
    Loading,
    /// Resource loaded and waiting to be shown
    Ready,
    /// A show request owns the resource
    Showing,
}

impl fmt::Display for ResourceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceState::Idle => write!(f, "idle"),
            ResourceState::Loading => write!(f, "loading"),
            ResourceState::Ready => write!(f, "ready"),
            ResourceState::Showing => write!(f, "showing"),
        }
    }
}

/// Why a show request settled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettleReason {
    /// Nothing was held when the show was requested
    NoResource,
    /// The resource was still not ready after the grace period
    NotReady,
    /// Normal end of display
    Dismissed,
    ShowFailed(String),
    /// The load the show was waiting on failed
    LoadFailed(String),
    /// Unexpected failure inside the show flow
    Error(String),
}

impl SettleReason {
    /// Whether the resource was actually on screen before settling
    pub fn was_displayed(&self) -> bool {
        matches!(self, SettleReason::Dismissed)
    }
}

impl fmt::Display for SettleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettleReason::NoResource => write!(f, "no resource"),
            SettleReason::NotReady => write!(f, "not ready after grace period"),
            SettleReason::Dismissed => write!(f, "dismissed"),
            SettleReason::ShowFailed(reason) => write!(f, "show failed: {}", reason),
            SettleReason::LoadFailed(reason) => write!(f, "load failed: {}", reason),
            SettleReason::Error(message) => write!(f, "error: {}", message),
        }
    }
}

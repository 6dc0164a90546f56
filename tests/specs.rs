//! Behavioral specifications for preload.
//!
//! These tests drive the public API of the workspace crates end to end with a
//! fake provider and verify the observable call sequence and callbacks.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

#[path = "specs/prelude.rs"]
mod prelude;

// lifecycle/
#[path = "specs/lifecycle/cycle.rs"]
mod lifecycle_cycle;
#[path = "specs/lifecycle/disabled.rs"]
mod lifecycle_disabled;

// dispatch/
#[path = "specs/dispatch/coalescing.rs"]
mod dispatch_coalescing;

// config/
#[path = "specs/config/settings.rs"]
mod config_settings;

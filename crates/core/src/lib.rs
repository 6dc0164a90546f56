// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! preload-core: shared building blocks
//!
//! - Coalescing (debounce) dispatcher
//! - Controller configuration
//! - Tracing subscriber setup

pub mod config;
pub mod dispatch;
pub mod logging;

pub use config::{ConfigError, ControllerConfig, Settings, DEFAULT_GRACE_PERIOD};
pub use dispatch::{panic_message, Coalesced, CoalescingDispatcher, DispatchError};
pub use logging::{LogConfig, LoggingError};

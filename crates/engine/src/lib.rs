// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Resource lifecycle engine

mod controller;
mod error;
pub mod guard;
mod state;

pub use controller::ResourceController;
pub use error::ControllerError;
pub use state::{ResourceState, SettleReason};

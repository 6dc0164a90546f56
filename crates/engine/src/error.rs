// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the resource controller

use preload_adapters::ProviderError;
use preload_core::ConfigError;
use thiserror::Error;

/// Errors that can occur in the controller
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("unexpected failure in {context}: {message}")]
    Panicked {
        context: &'static str,
        message: String,
    },
}

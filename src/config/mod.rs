// ABOUTME: Configuration management module for server settings loaded from the environment
// ABOUTME: Re-exports ServerConfig and its per-component sections
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration module for the `BiteWise` server
//!
//! All settings come from environment variables (optionally preloaded from a
//! `.env` file). See [`environment::ServerConfig::from_env`] for the full list.

/// Environment and server configuration
pub mod environment;

pub use environment::{LlmSettings, ServerConfig, UsdaSettings};

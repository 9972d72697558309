// ABOUTME: Main library entry point for the BiteWise nutrition resolution service
// ABOUTME: Resolves food labels to macros via catalog, cache, and USDA tiers and aggregates meals
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # `BiteWise`
//!
//! Nutrition resolution engine and HTTP service. A food label from an image
//! detector or a free-text question becomes a portion-scaled macro record
//! through an ordered chain of sources:
//!
//! 1. the local [`catalog::FoodCatalog`] (curated plus cache-enriched records)
//! 2. cached USDA responses ([`cache::CacheStore`])
//! 3. the USDA `FoodData` Central API ([`external::UsdaClient`])
//! 4. a fixed default record
//!
//! ## Architecture
//!
//! - **Cache**: file-per-key and in-memory LRU backends behind one trait
//! - **Resolver**: [`resolver::MacroResolver`] with pluggable strategies
//! - **Meal analysis**: portions from bounding boxes, aggregation, meal naming
//! - **Chat**: macro Q&A, optional OpenAI-compatible completion, keyword tips
//! - **Routes**: axum routers sharing [`resources::ServerResources`]

/// Provider response cache with file and in-memory backends
pub mod cache;

/// Curated and cache-enriched food table
pub mod catalog;

/// Nutrition assistant for chat messages
pub mod chat;

/// Environment configuration
pub mod config;

/// Application constants
pub mod constants;

/// Detection batches and meal analysis
pub mod detection;

/// Unified error handling
pub mod errors;

/// External API clients
pub mod external;

/// Chat completion providers
pub mod llm;

/// Structured logging setup
pub mod logging;

/// Meal aggregation
pub mod meal;

/// Local and remote search result merging
pub mod merger;

/// Shared data models
pub mod models;

/// Portion estimation from bounding boxes
pub mod portion;

/// Free-text food and quantity parsing
pub mod query;

/// Tiered macro resolution
pub mod resolver;

/// Shared server resources
pub mod resources;

/// HTTP routes
pub mod routes;

/// Rounding and naming helpers
pub mod utils;

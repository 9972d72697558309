// ABOUTME: External API client modules (USDA FoodData Central)
// ABOUTME: Provides the remote nutrition provider used by the resolution engine

// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! External API Clients

pub mod usda_client;

// Re-export commonly used types
pub use usda_client::{
    macros_from_nutrients, FoodNutrient, NutritionProvider, UsdaClient, UsdaClientConfig,
};

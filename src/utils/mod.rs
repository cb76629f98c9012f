//! Utility functions and helpers.

/// Logger setup
pub mod logger;

//! # AMM Model
//!
//! The pool bonding-curve model and the exchange graph built from it.
//! Everything here is pure and CPU-bound: pricing goes through immutable
//! direction-bound views, and reserves only change via an explicit execute.

/// Tradable token value type
pub mod asset;
/// Exchange graph over asset symbols
pub mod graph;
/// Pools, swap legs, and swap simulation
pub mod pool;
/// Snapshot records from the external data fetcher
pub mod snapshot;

//! # Arbitrage Engine
//!
//! Candidate cycle enumeration, optimal trade sizing, and transaction
//! scoring. The catalog fixes the set of cycles once; every evaluation step
//! then scores all of them against fresh reserves and picks the single best
//! fiat-valued candidate.

/// Cycle enumeration, canonicalization, and the persisted cycle cache
pub mod catalog;
/// Scoring of cycles and selection of the best transaction
pub mod scorer;
/// Optimal trade-size solver
pub mod solver;
/// Shared test constructors
#[cfg(test)]
pub(crate) mod test_helpers;
/// The executable candidate type
pub mod transaction;

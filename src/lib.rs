/*!
 * # Skim - AMM Cycle Arbitrage Detection
 *
 * Skim detects profitable circular trades across a network of
 * automated-market-maker liquidity pools and picks the single most
 * profitable one to execute.
 *
 * ## Core Features
 *
 * - **Bonding-curve model**: constant-product and stableswap pricing with
 *   side-effect-free swap simulation
 * - **Exchange graph**: adjacency over asset symbols with per-edge pool
 *   enumeration and aggregate cycle rates
 * - **Cycle catalog**: one-time enumeration of candidate cycles, filtered
 *   by priority assets and persisted between runs
 * - **Optimal sizing**: exact closed form for equal-weight paths, numeric
 *   search for the rest
 * - **Scoring**: fiat-valued ranking of every candidate and deterministic
 *   selection of the winner
 *
 * Fetching live reserves, signing, and broadcasting are external
 * collaborators; the engine is a pure batch computation over a reserve
 * snapshot.
 *
 * ## Module Structure
 *
 * - `amm`: pool model and exchange graph
 * - `arb`: cycle catalog, solver, and transaction scorer
 * - `config`: engine settings and the starter-asset table
 * - `utils`: logging and other helpers
 */

/// Pool model and exchange graph
pub mod amm;
/// Cycle catalog, optimal sizing, and scoring
pub mod arb;
/// Configuration management for the engine
pub mod config;
/// Utility functions and helpers
pub mod utils;

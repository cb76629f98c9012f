//! Configuration files for the detection engine.
//!
//! Two JSON files live in a config directory: `config.json` with the
//! engine settings and `starters.json` mapping each priority asset to its
//! fiat price and input cap.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use eyre::{Result, WrapErr};
use serde::Deserialize;

use crate::arb::scorer::AssignmentMode;
use crate::arb::solver::SolverSettings;

/// Default platform name used for the cycle cache.
fn default_platform() -> String {
    "osmosis".to_string()
}

/// Default pause between evaluation steps.
const fn default_step_interval_secs() -> u64 {
    1
}

/// Default budget for one evaluation step.
const fn default_step_timeout_secs() -> u64 {
    60
}

/// Engine settings, from `config.json`.
#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    /// Platform name, keys the persisted cycle cache
    #[serde(default = "default_platform")]
    pub platform: String,
    /// Fiat profit a candidate must exceed to be considered
    pub minimum_dollars_delta: f64,
    /// Pause between evaluation steps
    #[serde(default = "default_step_interval_secs")]
    pub step_interval_secs: u64,
    /// Budget for one evaluation step; a slower step is abandoned
    #[serde(default = "default_step_timeout_secs")]
    pub step_timeout_secs: u64,
    /// Numeric optimizer tolerances
    #[serde(default)]
    pub solver: SolverSettings,
    /// Pool assignment enumeration mode
    #[serde(default)]
    pub assignment_mode: AssignmentMode,
}

impl Config {
    /// Loads `config.json` from the config directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join("config.json");
        let raw = fs::read_to_string(&path)
            .wrap_err_with(|| format!("cannot read config {}", path.display()))?;
        serde_json::from_str(&raw).wrap_err_with(|| format!("cannot parse {}", path.display()))
    }
}

/// Price and risk data for one priority asset.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct Starter {
    /// Current fiat price of the asset
    pub current_price: f64,
    /// Cap applied to a chosen transaction's input before hand-off
    pub maximum_input: f64,
}

/// Loads `starters.json` from the config directory.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_starters(dir: &Path) -> Result<HashMap<String, Starter>> {
    let path = dir.join("starters.json");
    let raw = fs::read_to_string(&path)
        .wrap_err_with(|| format!("cannot read starters {}", path.display()))?;
    serde_json::from_str(&raw).wrap_err_with(|| format!("cannot parse {}", path.display()))
}

/// The priority ordering derived from the starter table.
///
/// JSON object ordering is not reliable, so the ordering is the sorted
/// symbol list, which keeps cycle canonicalization deterministic.
#[must_use]
pub fn priority_order(starters: &HashMap<String, Starter>) -> Vec<String> {
    let mut priorities: Vec<String> = starters.keys().cloned().collect();
    priorities.sort();
    priorities
}

//! Pool snapshot records, the boundary between the external data fetcher
//! and the core model.
//!
//! The fetching collaborator writes a JSON array of [`PoolRecord`]s once per
//! step; the core re-reads it and rebuilds the graph from scratch. Records
//! with degenerate data (drained reserves, bad fees) are rejected here so
//! they never enter the graph.

use std::fs;
use std::path::Path;

use eyre::{Result, WrapErr};
use serde::Deserialize;

use super::asset::Asset;
use super::pool::{Pool, PoolId, PoolKind};

/// Default pool weight when the snapshot omits one.
const fn default_weight() -> f64 {
    1.0
}

/// Default decimal precision when the snapshot omits one.
const fn default_decimals() -> u32 {
    6
}

/// One pool as supplied by the external data fetcher.
#[derive(Debug, Deserialize)]
pub struct PoolRecord {
    /// Pool identifier
    pub id: String,
    /// Symbol of the first asset
    pub asset_1: String,
    /// Symbol of the second asset
    pub asset_2: String,
    /// On-chain denom of the first asset
    #[serde(default)]
    pub chain_id_1: String,
    /// On-chain denom of the second asset
    #[serde(default)]
    pub chain_id_2: String,
    /// Swap fee in `[0, 1)`
    pub swap_fee: f64,
    /// Reserve of the first asset
    pub reserve_1: f64,
    /// Reserve of the second asset
    pub reserve_2: f64,
    /// Weight of the first asset
    #[serde(default = "default_weight")]
    pub weight_1: f64,
    /// Weight of the second asset
    #[serde(default = "default_weight")]
    pub weight_2: f64,
    /// Decimal precision of the first asset
    #[serde(default = "default_decimals")]
    pub decimals_1: u32,
    /// Decimal precision of the second asset
    #[serde(default = "default_decimals")]
    pub decimals_2: u32,
    /// Bonding curve family
    #[serde(default)]
    pub pool_type: PoolKind,
}

impl TryFrom<PoolRecord> for Pool {
    type Error = eyre::Error;

    fn try_from(record: PoolRecord) -> Result<Self> {
        let asset_1 = Asset::new(&record.asset_1, &record.chain_id_1, record.reserve_1)?
            .with_weight(record.weight_1)?
            .with_decimals(record.decimals_1);
        let asset_2 = Asset::new(&record.asset_2, &record.chain_id_2, record.reserve_2)?
            .with_weight(record.weight_2)?
            .with_decimals(record.decimals_2);
        Self::new(
            PoolId(record.id),
            asset_1,
            asset_2,
            record.swap_fee,
            record.pool_type,
        )
    }
}

/// Reads a snapshot file and converts every record through pool validation.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if any record
/// fails validation. A snapshot with bad data is rejected wholesale rather
/// than silently thinned.
pub fn load_pools(path: &Path) -> Result<Vec<Pool>> {
    let raw = fs::read_to_string(path)
        .wrap_err_with(|| format!("cannot read pool snapshot {}", path.display()))?;
    let records: Vec<PoolRecord> = serde_json::from_str(&raw)
        .wrap_err_with(|| format!("cannot parse pool snapshot {}", path.display()))?;
    records.into_iter().map(Pool::try_from).collect()
}

use eyre::{bail, Result};

/// A tradable token as it appears on one side of a pool.
///
/// Two assets are the same token within one graph iff their `symbol` matches.
/// The reserve is the pool-side balance of this token, not a wallet balance.
#[derive(Clone, Debug, PartialEq)]
pub struct Asset {
    /// Ticker symbol, the asset's identity within a graph
    pub symbol: String,
    /// On-chain denomination (e.g. an IBC denom), carried for the executor
    pub chain_id: String,
    /// Pool-side reserve of this asset
    pub reserve: f64,
    /// Pool weight of this asset
    pub weight: f64,
    /// Decimal precision of the on-chain representation
    pub decimals: u32,
}

impl Asset {
    /// Creates an asset with the default weight (1) and precision (6).
    ///
    /// # Errors
    ///
    /// Returns an error if `reserve` is not a positive finite number. A pool
    /// with a drained side prices every trade at infinity or zero, so such
    /// data must never enter the graph.
    pub fn new(symbol: &str, chain_id: &str, reserve: f64) -> Result<Self> {
        if !reserve.is_finite() || reserve <= 0.0 {
            bail!("Asset {symbol} has non-positive reserve {reserve}");
        }
        Ok(Self {
            symbol: symbol.to_string(),
            chain_id: chain_id.to_string(),
            reserve,
            weight: 1.0,
            decimals: 6,
        })
    }

    /// Sets the pool weight.
    ///
    /// # Errors
    ///
    /// Returns an error if `weight` is not a positive finite number.
    pub fn with_weight(mut self, weight: f64) -> Result<Self> {
        if !weight.is_finite() || weight <= 0.0 {
            bail!("Asset {} has non-positive weight {weight}", self.symbol);
        }
        self.weight = weight;
        Ok(self)
    }

    /// Sets the decimal precision.
    #[must_use]
    pub const fn with_decimals(mut self, decimals: u32) -> Self {
        self.decimals = decimals;
        self
    }
}

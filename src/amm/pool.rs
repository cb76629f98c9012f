//! Liquidity pools and direction-bound swap legs.
//!
//! A [`Pool`] is the bidirectional market between two assets. All pricing
//! goes through a [`SwapLeg`], an immutable view of the pool bound to one
//! trade direction, so concurrent cycle evaluation never shares mutable
//! state. Only [`Pool::execute`] touches reserves.

use std::fmt::{self, Debug};

use derive_more::Display;
use eyre::{bail, Result};
use serde::Deserialize;

use super::asset::Asset;

/// The bonding curve family a pool prices trades with.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolKind {
    /// Weighted constant-product curve (`x^wx * y^wy = k`)
    #[default]
    #[serde(alias = "xyk")]
    ConstantProduct,
    /// Stableswap pair, priced here as a capped linear approximation
    Stable,
}

/// Unique identifier of a pool within one graph.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Deserialize)]
#[display("{_0}")]
pub struct PoolId(pub String);

impl Debug for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PoolId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// A liquidity pair between two assets with a swap fee.
#[derive(Clone, Debug)]
pub struct Pool {
    /// Pool identifier
    pub id: PoolId,
    /// First side of the pair
    pub asset_1: Asset,
    /// Second side of the pair
    pub asset_2: Asset,
    /// Swap fee, in `[0, 1)`
    pub fee: f64,
    /// Bonding curve family
    pub kind: PoolKind,
}

impl Pool {
    /// Creates a pool after validating the pair.
    ///
    /// # Errors
    ///
    /// Returns an error if both sides carry the same symbol or the fee is
    /// outside `[0, 1)`. Reserve validity is enforced by [`Asset::new`].
    pub fn new(id: PoolId, asset_1: Asset, asset_2: Asset, fee: f64, kind: PoolKind) -> Result<Self> {
        if asset_1.symbol == asset_2.symbol {
            bail!("Pool {id} pairs {} with itself", asset_1.symbol);
        }
        if !fee.is_finite() || !(0.0..1.0).contains(&fee) {
            bail!("Pool {id} has fee {fee} outside [0, 1)");
        }
        Ok(Self {
            id,
            asset_1,
            asset_2,
            fee,
            kind,
        })
    }

    /// The fee retention factor `r = 1 - fee`.
    #[must_use]
    pub fn retention(&self) -> f64 {
        1.0 - self.fee
    }

    /// Binds the pool to the direction that sources from `source`.
    ///
    /// This is a pure selection: it copies the current reserves into an
    /// immutable [`SwapLeg`] and never touches the pool.
    ///
    /// # Errors
    ///
    /// Returns an error if `source` is neither side of the pair. A correctly
    /// built graph never produces such a request, so this is an
    /// internal-consistency failure rather than a recoverable condition.
    pub fn leg(&self, source: &str) -> Result<SwapLeg> {
        let (src, dst) = if source == self.asset_1.symbol {
            (&self.asset_1, &self.asset_2)
        } else if source == self.asset_2.symbol {
            (&self.asset_2, &self.asset_1)
        } else {
            bail!(
                "Pool {} cannot source from {source}: pair is {}/{}",
                self.id,
                self.asset_1.symbol,
                self.asset_2.symbol
            );
        };
        Ok(SwapLeg {
            pool_id: self.id.clone(),
            kind: self.kind,
            from: src.symbol.clone(),
            to: dst.symbol.clone(),
            i: src.reserve,
            o: dst.reserve,
            wi: src.weight,
            wo: dst.weight,
            r: self.retention(),
        })
    }

    /// Executes a swap against this pool, mutating both reserves.
    ///
    /// This is the only mutating path and is called at most once per chosen
    /// transaction, after external confirmation. Scoring never calls it.
    ///
    /// # Errors
    ///
    /// Returns an error if `amount_in` is negative or `source` is neither
    /// side of the pair.
    pub fn execute(&mut self, source: &str, amount_in: f64) -> Result<f64> {
        if amount_in < 0.0 {
            bail!("Pool {} asked to execute negative amount {amount_in}", self.id);
        }
        let amount_out = self.leg(source)?.simulate(amount_in);
        if source == self.asset_1.symbol {
            self.asset_1.reserve += amount_in;
            self.asset_2.reserve -= amount_out;
        } else {
            self.asset_2.reserve += amount_in;
            self.asset_1.reserve -= amount_out;
        }
        Ok(amount_out)
    }
}

/// An immutable, direction-bound view of a pool.
///
/// `i`/`wi` are the reserve and weight on the input side, `o`/`wo` on the
/// output side, `r` the fee retention. Legs are cheap to clone and safe to
/// evaluate from parallel workers because they share nothing with the pool.
#[derive(Clone, Debug)]
pub struct SwapLeg {
    /// Pool this leg was cut from
    pub pool_id: PoolId,
    /// Bonding curve family of that pool
    pub kind: PoolKind,
    /// Symbol of the input asset
    pub from: String,
    /// Symbol of the output asset
    pub to: String,
    /// Input-side reserve
    pub i: f64,
    /// Output-side reserve
    pub o: f64,
    /// Input-side weight
    pub wi: f64,
    /// Output-side weight
    pub wo: f64,
    /// Fee retention `1 - fee`
    pub r: f64,
}

impl SwapLeg {
    /// The log marginal exchange rate at zero trade size.
    ///
    /// Used to rank parallel pools on one edge without simulating a swap;
    /// summing per-hop values composes rates because they are logarithms.
    #[must_use]
    pub fn change(&self) -> f64 {
        match self.kind {
            PoolKind::ConstantProduct => {
                (self.o / self.i).ln() + (self.wi / self.wo).ln() + self.r.ln()
            }
            PoolKind::Stable => (self.wi / self.wo).ln() + self.r.ln(),
        }
    }

    /// Simulated swap output for `amount_in`, without touching reserves.
    ///
    /// Defined for `amount_in >= 0` only; callers reject negative amounts.
    #[must_use]
    pub fn simulate(&self, amount_in: f64) -> f64 {
        match self.kind {
            PoolKind::ConstantProduct => {
                // Weighted constant-product invariant; reduces to the classic
                // xyk curve when wi == wo.
                self.o * (1.0 - (self.i / (self.i + amount_in * self.r)).powf(self.wi / self.wo))
            }
            // Linear approximation capped at the available output reserve
            PoolKind::Stable => self.o.min(amount_in * (self.wi / self.wo) * self.r),
        }
    }

    /// Whether this leg is an equal-weight constant-product hop, the only
    /// shape the closed-form optimal-amount solver can fold.
    #[must_use]
    pub fn is_balanced_xyk(&self) -> bool {
        self.kind == PoolKind::ConstantProduct && (self.wi - self.wo).abs() < f64::EPSILON
    }
}

/// Feeds `amount_in` through an ordered leg path, each output becoming the
/// next input, and returns the final output.
#[must_use]
pub fn simulate_path(legs: &[SwapLeg], amount_in: f64) -> f64 {
    legs.iter().fold(amount_in, |amount, leg| leg.simulate(amount))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arb::test_helpers::*;

    #[test]
    fn test_new_rejects_self_pair() {
        let a = asset("OSMO", 100.0);
        let b = asset("OSMO", 200.0);
        assert!(Pool::new(PoolId::from("P1"), a, b, 0.003, PoolKind::ConstantProduct).is_err());
    }

    #[test]
    fn test_new_rejects_bad_fee() {
        for fee in [-0.1, 1.0, 1.5, f64::NAN] {
            let a = asset("OSMO", 100.0);
            let b = asset("ATOM", 200.0);
            assert!(Pool::new(PoolId::from("P1"), a, b, fee, PoolKind::ConstantProduct).is_err());
        }
    }

    #[test]
    fn test_leg_invalid_source() {
        let pool = xyk("P1", "A", 100.0, "B", 200.0, 0.003);
        let err = pool.leg("C").unwrap_err();
        assert!(err.to_string().contains("cannot source from C"));
    }

    #[test]
    fn test_leg_is_pure_selection() {
        let pool = xyk("P1", "A", 100.0, "B", 200.0, 0.003);
        let forward = pool.leg("A").unwrap();
        let reverse = pool.leg("B").unwrap();
        assert!((forward.i - 100.0).abs() < f64::EPSILON);
        assert!((forward.o - 200.0).abs() < f64::EPSILON);
        assert!((reverse.i - 200.0).abs() < f64::EPSILON);
        assert!((reverse.o - 100.0).abs() < f64::EPSILON);
        // Selecting a direction twice is idempotent and leaves reserves alone
        let again = pool.leg("A").unwrap();
        assert!((again.i - forward.i).abs() < f64::EPSILON);
        assert!((pool.asset_1.reserve - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_simulate_zero_in_zero_out() {
        let pool = xyk("P1", "A", 1_000_000.0, "B", 2_000_000.0, 0.003);
        assert!(pool.leg("A").unwrap().simulate(0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_simulate_reference_value() {
        // i = 1_000_000, o = 2_000_000, fee = 0.003:
        // out = 2_000_000 * (1 - 1_000_000 / 1_009_970) = 19_742.37...
        let pool = xyk("P1", "A", 1_000_000.0, "B", 2_000_000.0, 0.003);
        let out = pool.leg("A").unwrap().simulate(10_000.0);
        let expected = 2_000_000.0 * (1.0 - 1_000_000.0 / 1_009_970.0);
        assert!((out - expected).abs() / expected < 1e-3);
    }

    #[test]
    fn test_simulate_strictly_increasing() {
        let leg = xyk("P1", "A", 1_000_000.0, "B", 2_000_000.0, 0.003)
            .leg("A")
            .unwrap();
        let mut last = 0.0;
        for amount_in in [1.0, 10.0, 100.0, 1_000.0, 10_000.0, 100_000.0, 1_000_000.0] {
            let out = leg.simulate(amount_in);
            assert!(out > last, "output must grow with input at {amount_in}");
            last = out;
        }
    }

    #[test]
    fn test_simulate_stable_is_capped() {
        let pool = stable("P1", "A", 1_000.0, "B", 500.0, 0.0);
        let leg = pool.leg("A").unwrap();
        assert!((leg.simulate(100.0) - 100.0).abs() < f64::EPSILON);
        // Output can never exceed the output-side reserve
        assert!((leg.simulate(10_000.0) - 500.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_change_of_stable_ignores_reserves() {
        let leg = stable("P1", "A", 1_000.0, "B", 500.0, 0.003).leg("A").unwrap();
        assert!((leg.change() - 0.997_f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn test_execute_mutates_reserves() {
        let mut pool = xyk("P1", "A", 1_000_000.0, "B", 2_000_000.0, 0.003);
        let out = pool.execute("A", 10_000.0).unwrap();
        assert!((pool.asset_1.reserve - 1_010_000.0).abs() < f64::EPSILON);
        assert!((pool.asset_2.reserve - (2_000_000.0 - out)).abs() < 1e-9);
    }

    #[test]
    fn test_execute_rejects_negative_amount() {
        let mut pool = xyk("P1", "A", 100.0, "B", 200.0, 0.003);
        assert!(pool.execute("A", -1.0).is_err());
    }

    #[test]
    fn test_round_trip_never_profits_with_fee() {
        let mut pool = xyk("P1", "A", 1_000_000.0, "B", 2_000_000.0, 0.003);
        let amount_in = 10_000.0;
        let out = pool.execute("A", amount_in).unwrap();
        let back = pool.execute("B", out).unwrap();
        assert!(back < amount_in, "round trip returned {back} for {amount_in}");
    }

    #[test]
    fn test_simulate_path_composes() {
        let p1 = xyk("P1", "A", 1_000_000.0, "B", 2_000_000.0, 0.0);
        let p2 = xyk("P2", "B", 2_000_000.0, "C", 1_000_000.0, 0.0);
        let legs = vec![p1.leg("A").unwrap(), p2.leg("B").unwrap()];
        let direct = legs[1].simulate(legs[0].simulate(5_000.0));
        assert!((simulate_path(&legs, 5_000.0) - direct).abs() < f64::EPSILON);
    }
}

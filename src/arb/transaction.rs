//! The executable candidate produced by a scoring pass.

use std::cmp::Ordering;
use std::fmt::{self, Debug, Display};

use crate::amm::pool::SwapLeg;
use crate::arb::catalog::Cycle;

/// One fully evaluated arbitrage candidate: a cycle, the pool assignment
/// chosen for it, and the profit at the optimal input.
///
/// Candidates are created fresh from current reserves every step, never
/// persisted, and totally ordered by `dollars_delta` — the sole selection
/// criterion.
#[derive(Clone)]
pub struct Transaction {
    /// The canonical asset cycle this candidate trades
    pub cycle: Cycle,
    /// Direction-bound legs, one per hop
    pub legs: Vec<SwapLeg>,
    /// The cycle's start (and profit) asset
    pub from_asset: String,
    /// Optimal input amount in `from_asset` units
    pub best_input: f64,
    /// Output minus input, in `from_asset` units
    pub delta: f64,
    /// Profit converted to fiat via the starter price table
    pub dollars_delta: f64,
    /// Sum of per-hop log rates at zero size
    pub change: f64,
}

impl PartialEq for Transaction {
    fn eq(&self, other: &Self) -> bool {
        self.dollars_delta == other.dollars_delta
    }
}

impl PartialOrd for Transaction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.dollars_delta.partial_cmp(&other.dollars_delta)
    }
}

impl Debug for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Transaction(dollars_delta={}, cycle={:?}, amount_in={})",
            self.dollars_delta, self.cycle, self.best_input
        )
    }
}

impl Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = self
            .legs
            .iter()
            .map(|leg| format!("{} =={}==> ", leg.from, leg.pool_id))
            .collect::<String>();
        write!(
            f,
            "{path}{} | in {:.3} {} | +${:.4}",
            self.from_asset, self.best_input, self.from_asset, self.dollars_delta
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arb::test_helpers::*;

    fn candidate(dollars_delta: f64) -> Transaction {
        Transaction {
            cycle: syms(&["A", "B", "A"]),
            legs: vec![
                xyk("P1", "A", 100.0, "B", 200.0, 0.0).leg("A").unwrap(),
                xyk("P2", "B", 150.0, "A", 100.0, 0.0).leg("B").unwrap(),
            ],
            from_asset: "A".to_string(),
            best_input: 10.0,
            delta: dollars_delta,
            dollars_delta,
            change: 0.1,
        }
    }

    #[test]
    fn test_ordering_is_by_dollars_delta_alone() {
        let small = candidate(1.0);
        let large = candidate(2.0);
        assert!(small < large);
        assert_eq!(small, candidate(1.0));
    }

    #[test]
    fn test_display_names_the_path() {
        let rendered = format!("{}", candidate(1.5));
        assert!(rendered.contains("A ==P1==> B ==P2==> A"));
    }
}

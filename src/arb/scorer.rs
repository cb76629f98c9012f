//! Scoring of candidate cycles and selection of the best transaction.

use std::collections::HashMap;

use log::{debug, warn};
use serde::Deserialize;

use crate::amm::graph::ExchangeGraph;
use crate::amm::pool::{simulate_path, SwapLeg};
use crate::arb::catalog::Cycle;
use crate::arb::solver::{optimal_amount, SolverSettings};
use crate::arb::transaction::Transaction;
use crate::config::Starter;

/// How pool assignments are enumerated for a cycle.
///
/// Exhaustive enumeration is combinatorially expensive on edges with many
/// parallel pools, so binding each hop to its best marginal rate is the
/// default and the full Cartesian walk an explicit opt-in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentMode {
    /// Each hop bound to its maximum-change pool
    #[default]
    BestRate,
    /// Every Cartesian assignment across parallel pools
    Exhaustive,
}

/// Evaluates every candidate cycle against current reserves and picks the
/// maximum fiat-profit transaction.
#[derive(Clone)]
pub struct TransactionScorer {
    /// Price and input-cap table for the priority assets
    pub starters: HashMap<String, Starter>,
    /// Fiat profit a candidate must exceed to survive
    pub minimum_dollars_delta: f64,
    /// Numeric-fallback tolerances
    pub solver: SolverSettings,
    /// Assignment enumeration mode
    pub mode: AssignmentMode,
}

impl TransactionScorer {
    /// Scores all cycles and returns the best surviving candidate.
    ///
    /// Selection is deterministic: candidates are compared by strict
    /// `dollars_delta` maximum and ties keep the first one encountered.
    /// Returns `None` when nothing survives — an expected outcome, not a
    /// failure.
    #[must_use]
    pub fn best_transaction(&self, graph: &ExchangeGraph, cycles: &[Cycle]) -> Option<Transaction> {
        let mut best: Option<Transaction> = None;
        for cycle in cycles {
            for candidate in self.score_cycle(graph, cycle) {
                best = match best {
                    Some(current) if candidate.dollars_delta <= current.dollars_delta => {
                        Some(current)
                    }
                    _ => Some(candidate),
                };
            }
        }
        best
    }

    /// All surviving candidates for one cycle.
    fn score_cycle(&self, graph: &ExchangeGraph, cycle: &[String]) -> Vec<Transaction> {
        // A positive aggregate rate is necessary for any assignment to
        // profit, so it gates the expensive simulation work.
        let Some((change, best_legs)) = graph.compute_cycle(cycle) else {
            return Vec::new();
        };
        if change <= 0.0 {
            return Vec::new();
        }

        let assignments = match self.mode {
            AssignmentMode::BestRate => vec![best_legs],
            AssignmentMode::Exhaustive => graph.all_assignments(cycle).unwrap_or_default(),
        };

        assignments
            .into_iter()
            .filter_map(|legs| self.score_assignment(cycle, legs, change))
            .collect()
    }

    /// Evaluates one pool assignment; `None` when it does not survive.
    fn score_assignment(
        &self,
        cycle: &[String],
        legs: Vec<SwapLeg>,
        change: f64,
    ) -> Option<Transaction> {
        let from_asset = legs.first()?.from.clone();
        let Some(starter) = self.starters.get(&from_asset) else {
            warn!("no starter price for {from_asset}, skipping {cycle:?}");
            return None;
        };

        // None = optimizer non-convergence: the amount is untrusted, skip
        let best_input = optimal_amount(&legs, &self.solver)?;
        if best_input <= 0.0 {
            return None;
        }

        let output = simulate_path(&legs, best_input);
        let delta = output - best_input;
        let dollars_delta = starter.current_price * delta;
        if dollars_delta <= self.minimum_dollars_delta {
            debug!("cycle {cycle:?} below profit threshold: ${dollars_delta:.6}");
            return None;
        }

        Some(Transaction {
            cycle: cycle.to_vec(),
            legs,
            from_asset,
            best_input,
            delta,
            dollars_delta,
            change,
        })
    }
}

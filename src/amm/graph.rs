//! The multi-asset exchange graph built from a pool snapshot.

use std::collections::HashMap;

use itertools::Itertools;
use log::warn;

use super::pool::{Pool, PoolId, SwapLeg};

/// Adjacency structure over asset symbols.
///
/// Rebuilt wholesale from fresh reserve data every evaluation step; cycle
/// topology is cached separately because it changes far less often than
/// reserves.
pub struct ExchangeGraph {
    /// All pools by id
    pub pools: HashMap<PoolId, Pool>,
    /// For each asset symbol, the pools leaving it and their counterparties
    pub edges: HashMap<String, Vec<(PoolId, String)>>,
}

impl ExchangeGraph {
    /// Builds the graph, adding both directed edges per pool.
    #[must_use]
    pub fn new(pools: Vec<Pool>) -> Self {
        let mut graph = Self {
            pools: HashMap::with_capacity(pools.len()),
            edges: HashMap::new(),
        };
        for pool in pools {
            graph.add_pool(pool);
        }
        graph
    }

    /// Inserts one pool and its two directed edges.
    fn add_pool(&mut self, pool: Pool) {
        let symbol_1 = pool.asset_1.symbol.clone();
        let symbol_2 = pool.asset_2.symbol.clone();
        self.edges
            .entry(symbol_1.clone())
            .or_default()
            .push((pool.id.clone(), symbol_2.clone()));
        self.edges
            .entry(symbol_2)
            .or_default()
            .push((pool.id.clone(), symbol_1));
        self.pools.insert(pool.id.clone(), pool);
    }

    /// Number of distinct assets in the graph.
    #[must_use]
    pub fn num_assets(&self) -> usize {
        self.edges.len()
    }

    /// Number of pools in the graph.
    #[must_use]
    pub fn num_pools(&self) -> usize {
        self.pools.len()
    }

    /// Every pool on the `from -> to` edge, bound to that direction.
    #[must_use]
    pub fn legs_between(&self, from: &str, to: &str) -> Vec<SwapLeg> {
        self.edges.get(from).map_or_else(Vec::new, |links| {
            links
                .iter()
                .filter(|(_, counterparty)| counterparty == to)
                .filter_map(|(pool_id, _)| {
                    // The pool was indexed under `from`, so the leg exists
                    self.pools.get(pool_id).and_then(|p| p.leg(from).ok())
                })
                .collect()
        })
    }

    /// Aggregate zero-size rate of a cycle, with the best leg per hop.
    ///
    /// Per hop picks the maximum-`change` pool among all pools on that edge
    /// (a cheap pre-filter before swap simulation) and sums the maxima. A
    /// positive sum certifies a profitable zero-size trade, which is
    /// necessary but not sufficient for real profit once slippage bites.
    ///
    /// Returns `None` when some hop has no pool, which means the cycle cache
    /// is stale versus current topology; the cycle is skipped with a warning
    /// rather than failing the step.
    #[must_use]
    pub fn compute_cycle(&self, cycle: &[String]) -> Option<(f64, Vec<SwapLeg>)> {
        let path = close(cycle)?;
        let mut change = 0.0;
        let mut legs = Vec::with_capacity(path.len() - 1);
        for hop in path.windows(2) {
            let candidates = self.legs_between(hop[0], hop[1]);
            let best = candidates.into_iter().reduce(|best, leg| {
                if leg.change() > best.change() {
                    leg
                } else {
                    best
                }
            });
            let Some(best) = best else {
                warn!(
                    "no pool connects {} -> {}: cycle cache is stale, skipping {cycle:?}",
                    hop[0], hop[1]
                );
                return None;
            };
            change += best.change();
            legs.push(best);
        }
        Some((change, legs))
    }

    /// Every distinct pool assignment for a cycle: the Cartesian product of
    /// per-hop pool choices across parallel pools.
    ///
    /// The best-marginal-rate pool is not always the best pool at a real
    /// trade size, so the exhaustive scorer walks all of these. Returns
    /// `None` on a missing edge, same policy as [`Self::compute_cycle`].
    #[must_use]
    pub fn all_assignments(&self, cycle: &[String]) -> Option<Vec<Vec<SwapLeg>>> {
        let path = close(cycle)?;
        let mut per_hop = Vec::with_capacity(path.len() - 1);
        for hop in path.windows(2) {
            let candidates = self.legs_between(hop[0], hop[1]);
            if candidates.is_empty() {
                warn!(
                    "no pool connects {} -> {}: cycle cache is stale, skipping {cycle:?}",
                    hop[0], hop[1]
                );
                return None;
            }
            per_hop.push(candidates);
        }
        Some(
            per_hop
                .into_iter()
                .map(Vec::into_iter)
                .multi_cartesian_product()
                .collect(),
        )
    }
}

/// Closes an open cycle by repeating its first symbol; rejects degenerate
/// cycles of fewer than two distinct hops.
fn close(cycle: &[String]) -> Option<Vec<&str>> {
    if cycle.len() < 2 {
        warn!("degenerate cycle {cycle:?} ignored");
        return None;
    }
    let mut path: Vec<&str> = cycle.iter().map(String::as_str).collect();
    let first = path[0];
    if *path.last()? != first {
        path.push(first);
    }
    Some(path)
}

//! Enumeration, canonicalization, and persistence of candidate cycles.
//!
//! Pool topology changes far less often than reserves do, so the cycle set
//! is computed once, persisted through an injected [`CycleStore`], and
//! reloaded on later runs unless regeneration is requested.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::PathBuf;

use eyre::{Result, WrapErr};
use log::info;

use crate::amm::graph::ExchangeGraph;

/// An ordered sequence of asset symbols; stored closed (first == last).
pub type Cycle = Vec<String>;

/// Persistence capability for the cycle cache, injected so tests can fake it.
pub trait CycleStore {
    /// Loads the cached cycle list for a platform, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if a cache exists but cannot be read or parsed.
    fn load(&self, platform: &str) -> Result<Option<Vec<Cycle>>>;

    /// Persists the cycle list for a platform.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache cannot be written.
    fn save(&self, platform: &str, cycles: &[Cycle]) -> Result<()>;
}

/// File-backed store: one JSON file per platform under a root directory.
pub struct JsonCycleStore {
    /// Directory holding one subdirectory per platform
    root: PathBuf,
}

impl JsonCycleStore {
    /// Creates a store rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path of the cycle file for a platform.
    fn path(&self, platform: &str) -> PathBuf {
        self.root.join(platform).join("cycles.json")
    }
}

impl CycleStore for JsonCycleStore {
    fn load(&self, platform: &str) -> Result<Option<Vec<Cycle>>> {
        let path = self.path(platform);
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&path)
            .wrap_err_with(|| format!("cannot read cycle cache {}", path.display()))?;
        let cycles = serde_json::from_str(&raw)
            .wrap_err_with(|| format!("cannot parse cycle cache {}", path.display()))?;
        Ok(Some(cycles))
    }

    fn save(&self, platform: &str, cycles: &[Cycle]) -> Result<()> {
        let path = self.path(platform);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(&path, serde_json::to_string(cycles)?)
            .wrap_err_with(|| format!("cannot write cycle cache {}", path.display()))?;
        Ok(())
    }
}

/// The fixed set of candidate cycles scored every step.
pub struct CycleCatalog {
    /// Canonical, priority-filtered cycles
    pub cycles: Vec<Cycle>,
}

impl CycleCatalog {
    /// Enumerates, canonicalizes, and filters cycles from the current graph.
    ///
    /// Cycles containing no priority asset are discarded; the rest are
    /// rotated to start at the first priority asset found (iterating the
    /// priority list in order) and stored closed. Enumeration iterates
    /// sorted structures, so the same graph and priority ordering always
    /// produce the same catalog.
    #[must_use]
    pub fn build(graph: &ExchangeGraph, priorities: &[String]) -> Self {
        // Parallel pools collapse to one symbol edge for enumeration
        let mut adjacency: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
        for pool in graph.pools.values() {
            let (a, b) = (pool.asset_1.symbol.as_str(), pool.asset_2.symbol.as_str());
            adjacency.entry(a).or_default().insert(b);
            adjacency.entry(b).or_default().insert(a);
        }

        let mut cycles = Vec::new();
        for cycle in simple_cycles(&adjacency) {
            let (rotated, from_asset) = rotate_cycle(&cycle, priorities);
            if priorities.contains(&from_asset) {
                let mut closed = rotated;
                closed.push(from_asset);
                cycles.push(closed);
            }
        }
        Self { cycles }
    }

    /// Loads the cached catalog, or builds and saves a fresh one when the
    /// cache is absent or `regenerate` is set.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails to load or save.
    pub fn load_or_build(
        store: &dyn CycleStore,
        platform: &str,
        graph: &ExchangeGraph,
        priorities: &[String],
        regenerate: bool,
    ) -> Result<Self> {
        if !regenerate {
            if let Some(cycles) = store.load(platform)? {
                info!("loaded {} cached cycles for {platform}", cycles.len());
                return Ok(Self { cycles });
            }
        }
        let catalog = Self::build(graph, priorities);
        store.save(platform, &catalog.cycles)?;
        info!("enumerated {} cycles for {platform}", catalog.cycles.len());
        Ok(catalog)
    }

    /// Number of cycles in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cycles.len()
    }

    /// Whether the catalog holds no cycles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cycles.is_empty()
    }
}

/// Enumerates all simple directed cycles of the symbol digraph, produced as
/// open symbol sequences.
///
/// For each start node in sorted order, a depth-first search visits only
/// nodes ordered at or after the start, emitting a cycle whenever an edge
/// returns to the start. Restricting each search to its start's suffix of
/// the node order yields every simple cycle exactly once.
fn simple_cycles<'a>(adjacency: &BTreeMap<&'a str, BTreeSet<&'a str>>) -> Vec<Vec<String>> {
    let mut cycles = Vec::new();
    for start in adjacency.keys().copied() {
        let mut path = vec![start];
        let mut on_path = BTreeSet::from([start]);
        dfs(adjacency, start, start, &mut path, &mut on_path, &mut cycles);
    }
    cycles
}

/// One step of the cycle-enumeration search rooted at `start`.
fn dfs<'a>(
    adjacency: &BTreeMap<&'a str, BTreeSet<&'a str>>,
    start: &'a str,
    current: &'a str,
    path: &mut Vec<&'a str>,
    on_path: &mut BTreeSet<&'a str>,
    cycles: &mut Vec<Vec<String>>,
) {
    let Some(neighbors) = adjacency.get(current) else {
        return;
    };
    for &next in neighbors {
        if next == start {
            if path.len() >= 2 {
                cycles.push(path.iter().map(ToString::to_string).collect());
            }
        } else if next > start && !on_path.contains(next) {
            path.push(next);
            on_path.insert(next);
            dfs(adjacency, start, next, path, on_path, cycles);
            path.pop();
            on_path.remove(next);
        }
    }
}

/// Rotates an open cycle so it starts at the first priority asset present,
/// returning the rotated cycle and its start asset. A cycle containing no
/// priority asset is returned unrotated with its current start.
#[must_use]
pub fn rotate_cycle(cycle: &[String], priorities: &[String]) -> (Vec<String>, String) {
    let from_asset = priorities.iter().find(|p| cycle.contains(p));
    let Some(from_asset) = from_asset else {
        return (cycle.to_vec(), cycle[0].clone());
    };
    // find() above guarantees the position exists
    let pivot = cycle
        .iter()
        .position(|s| s == from_asset)
        .unwrap_or_default();
    let mut rotated = cycle[pivot..].to_vec();
    rotated.extend_from_slice(&cycle[..pivot]);
    (rotated, from_asset.clone())
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use super::*;
    use crate::arb::test_helpers::*;

    /// In-memory store fake.
    #[derive(Default)]
    struct MemoryCycleStore {
        cycles: RefCell<HashMap<String, Vec<Cycle>>>,
        saves: RefCell<u32>,
    }

    impl CycleStore for MemoryCycleStore {
        fn load(&self, platform: &str) -> Result<Option<Vec<Cycle>>> {
            Ok(self.cycles.borrow().get(platform).cloned())
        }

        fn save(&self, platform: &str, cycles: &[Cycle]) -> Result<()> {
            *self.saves.borrow_mut() += 1;
            self.cycles
                .borrow_mut()
                .insert(platform.to_string(), cycles.to_vec());
            Ok(())
        }
    }

    fn triangle() -> crate::amm::graph::ExchangeGraph {
        crate::amm::graph::ExchangeGraph::new(vec![
            xyk("P1", "A", 100.0, "B", 200.0, 0.003),
            xyk("P2", "B", 100.0, "C", 200.0, 0.003),
            xyk("P3", "C", 100.0, "A", 200.0, 0.003),
        ])
    }

    #[test]
    fn test_rotate_cycle_to_priority() {
        let (rotated, from_asset) = rotate_cycle(&syms(&["B", "C", "A"]), &syms(&["A"]));
        assert_eq!(rotated, syms(&["A", "B", "C"]));
        assert_eq!(from_asset, "A");
    }

    #[test]
    fn test_rotate_cycle_priority_list_order_wins() {
        // Both X and A are present; priorities name A first
        let (rotated, from_asset) = rotate_cycle(&syms(&["X", "B", "A"]), &syms(&["A", "X"]));
        assert_eq!(from_asset, "A");
        assert_eq!(rotated, syms(&["A", "X", "B"]));
    }

    #[test]
    fn test_rotate_cycle_without_priority_is_unchanged() {
        let (rotated, from_asset) = rotate_cycle(&syms(&["B", "C", "D"]), &syms(&["A"]));
        assert_eq!(rotated, syms(&["B", "C", "D"]));
        assert_eq!(from_asset, "B");
    }

    #[test]
    fn test_build_stores_canonical_closed_cycles() {
        let catalog = CycleCatalog::build(&triangle(), &syms(&["A"]));
        assert!(catalog.cycles.contains(&syms(&["A", "B", "C", "A"])));
        for cycle in &catalog.cycles {
            assert_eq!(cycle.first(), cycle.last());
            assert_eq!(cycle[0], "A");
        }
    }

    #[test]
    fn test_build_excludes_cycles_without_priority() {
        // B <-> C round trips never touch A and must be dropped
        let catalog = CycleCatalog::build(&triangle(), &syms(&["A"]));
        assert!(!catalog.cycles.iter().any(|c| !c.contains(&"A".to_string())));
        // With every asset a priority, the B/C two-cycle survives
        let catalog = CycleCatalog::build(&triangle(), &syms(&["A", "B", "C"]));
        assert!(catalog.cycles.contains(&syms(&["B", "C", "B"])));
    }

    #[test]
    fn test_build_includes_two_cycles_between_parallel_pools() {
        let graph = crate::amm::graph::ExchangeGraph::new(vec![
            xyk("P1", "A", 100.0, "B", 200.0, 0.0),
            xyk("P2", "A", 100.0, "B", 150.0, 0.0),
        ]);
        let catalog = CycleCatalog::build(&graph, &syms(&["A"]));
        assert_eq!(catalog.cycles, vec![syms(&["A", "B", "A"])]);
    }

    #[test]
    fn test_build_is_deterministic() {
        let first = CycleCatalog::build(&triangle(), &syms(&["A"]));
        let second = CycleCatalog::build(&triangle(), &syms(&["A"]));
        assert_eq!(first.cycles, second.cycles);
    }

    #[test]
    fn test_load_or_build_prefers_cache() {
        let store = MemoryCycleStore::default();
        store
            .save("osmosis", &[syms(&["A", "B", "A"])])
            .unwrap();
        let catalog =
            CycleCatalog::load_or_build(&store, "osmosis", &triangle(), &syms(&["A"]), false)
                .unwrap();
        assert_eq!(catalog.cycles, vec![syms(&["A", "B", "A"])]);
        assert_eq!(*store.saves.borrow(), 1);
    }

    #[test]
    fn test_load_or_build_regenerates_on_request() {
        let store = MemoryCycleStore::default();
        store.save("osmosis", &[syms(&["A", "B", "A"])]).unwrap();
        let catalog =
            CycleCatalog::load_or_build(&store, "osmosis", &triangle(), &syms(&["A"]), true)
                .unwrap();
        assert!(catalog.cycles.contains(&syms(&["A", "B", "C", "A"])));
        assert_eq!(*store.saves.borrow(), 2);
    }

    #[test]
    fn test_json_store_round_trip() {
        let dir = std::env::temp_dir().join(format!("skim-cycles-{}", std::process::id()));
        let store = JsonCycleStore::new(&dir);
        assert!(store.load("osmosis").unwrap().is_none());
        let cycles = vec![syms(&["A", "B", "C", "A"]), syms(&["A", "C", "A"])];
        store.save("osmosis", &cycles).unwrap();
        assert_eq!(store.load("osmosis").unwrap(), Some(cycles));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}

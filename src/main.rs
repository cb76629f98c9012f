//! Operational driver: load configuration, build the cycle catalog, then
//! repeatedly rebuild the graph from a fresh snapshot and score it.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use dotenv::dotenv;
use eyre::Result;
use log::{debug, error, info, warn};

use skim::amm::graph::ExchangeGraph;
use skim::amm::snapshot::load_pools;
use skim::arb::catalog::{CycleCatalog, JsonCycleStore};
use skim::arb::scorer::{AssignmentMode, TransactionScorer};
use skim::arb::transaction::Transaction;
use skim::config::{load_starters, priority_order, Config, Starter};
use skim::utils::logger::setup_logger;

/// Command-line interface of the detection engine.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding config.json and starters.json
    #[arg(long, default_value = "config")]
    config_dir: PathBuf,

    /// Pool snapshot file written by the external data fetcher
    #[arg(long, default_value = "input_data/pools.json")]
    snapshot: PathBuf,

    /// Directory holding the persisted cycle cache
    #[arg(long, default_value = "input_data/dynamic")]
    cycle_cache_dir: PathBuf,

    /// Re-enumerate cycles instead of loading the cache
    #[arg(long)]
    regenerate_cycles: bool,

    /// Evaluate every Cartesian pool assignment per cycle
    #[arg(long)]
    exhaustive: bool,

    /// Run a single evaluation step and exit
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    setup_logger()?;
    let cli = Cli::parse();

    let config = Config::load(&cli.config_dir)?;
    let starters = load_starters(&cli.config_dir)?;
    let priorities = priority_order(&starters);

    let graph = ExchangeGraph::new(load_pools(&cli.snapshot)?);
    info!(
        "model built: {} assets, {} pools",
        graph.num_assets(),
        graph.num_pools()
    );

    let store = JsonCycleStore::new(&cli.cycle_cache_dir);
    let catalog = CycleCatalog::load_or_build(
        &store,
        &config.platform,
        &graph,
        &priorities,
        cli.regenerate_cycles,
    )?;
    info!("{} candidate cycles", catalog.len());

    let mode = if cli.exhaustive {
        AssignmentMode::Exhaustive
    } else {
        config.assignment_mode
    };
    let scorer = TransactionScorer {
        starters: starters.clone(),
        minimum_dollars_delta: config.minimum_dollars_delta,
        solver: config.solver,
        mode,
    };

    loop {
        run_step(&cli.snapshot, &scorer, &catalog, &starters, &config).await;
        if cli.once {
            break;
        }
        tokio::time::sleep(Duration::from_secs(config.step_interval_secs)).await;
    }
    Ok(())
}

/// Runs one evaluation step under the configured timeout and reports the
/// outcome. Step failures are logged, never fatal to the loop.
async fn run_step(
    snapshot: &Path,
    scorer: &TransactionScorer,
    catalog: &CycleCatalog,
    starters: &HashMap<String, Starter>,
    config: &Config,
) {
    let snapshot = snapshot.to_path_buf();
    let scorer = scorer.clone();
    let cycles = catalog.cycles.clone();

    let step = tokio::task::spawn_blocking(move || -> Result<Option<Transaction>> {
        debug!("starting a new step");
        let graph = ExchangeGraph::new(load_pools(&snapshot)?);
        Ok(scorer.best_transaction(&graph, &cycles))
    });

    match tokio::time::timeout(Duration::from_secs(config.step_timeout_secs), step).await {
        Err(_) => warn!("step exceeded {}s budget, abandoned", config.step_timeout_secs),
        Ok(Err(join_error)) => error!("step task failed: {join_error}"),
        Ok(Ok(Err(step_error))) => error!("step failed: {step_error}"),
        Ok(Ok(Ok(None))) => debug!("no good transaction"),
        Ok(Ok(Ok(Some(transaction)))) => {
            info!("a transaction was found: {transaction}");
            emit(&transaction, starters);
        }
    }
}

/// Hands the chosen candidate to the external command builder as a JSON
/// line on stdout, with the input clamped to the starter's cap.
fn emit(transaction: &Transaction, starters: &HashMap<String, Starter>) {
    let amount_in = clamp_amount_in(transaction, starters);
    let order = serde_json::json!({
        "cycle": transaction.cycle,
        "pools": transaction
            .legs
            .iter()
            .map(|leg| leg.pool_id.to_string())
            .collect::<Vec<_>>(),
        "from_asset": transaction.from_asset,
        "amount_in": amount_in,
        "expected_delta": transaction.delta,
        "dollars_delta": transaction.dollars_delta,
    });
    println!("{order}");
}

/// The transaction input capped at the starter's `maximum_input`. Risk
/// limits beyond this cap belong to the external broadcaster.
fn clamp_amount_in(transaction: &Transaction, starters: &HashMap<String, Starter>) -> f64 {
    starters
        .get(&transaction.from_asset)
        .map_or(transaction.best_input, |starter| {
            transaction.best_input.min(starter.maximum_input)
        })
}

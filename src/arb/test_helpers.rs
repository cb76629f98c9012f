//! Shared constructor helpers for tests across the crate.

use std::collections::HashMap;

use crate::amm::asset::Asset;
use crate::amm::pool::{Pool, PoolId, PoolKind};
use crate::config::Starter;

#[allow(clippy::unwrap_used)]
pub fn asset(symbol: &str, reserve: f64) -> Asset {
    Asset::new(symbol, &symbol.to_lowercase(), reserve).unwrap()
}

#[allow(clippy::unwrap_used)]
pub fn xyk(
    id: &str,
    symbol_1: &str,
    reserve_1: f64,
    symbol_2: &str,
    reserve_2: f64,
    fee: f64,
) -> Pool {
    Pool::new(
        PoolId::from(id),
        asset(symbol_1, reserve_1),
        asset(symbol_2, reserve_2),
        fee,
        PoolKind::ConstantProduct,
    )
    .unwrap()
}

#[allow(clippy::unwrap_used)]
#[allow(clippy::too_many_arguments)]
pub fn weighted_xyk(
    id: &str,
    symbol_1: &str,
    reserve_1: f64,
    weight_1: f64,
    symbol_2: &str,
    reserve_2: f64,
    weight_2: f64,
    fee: f64,
) -> Pool {
    Pool::new(
        PoolId::from(id),
        asset(symbol_1, reserve_1).with_weight(weight_1).unwrap(),
        asset(symbol_2, reserve_2).with_weight(weight_2).unwrap(),
        fee,
        PoolKind::ConstantProduct,
    )
    .unwrap()
}

#[allow(clippy::unwrap_used)]
pub fn stable(
    id: &str,
    symbol_1: &str,
    reserve_1: f64,
    symbol_2: &str,
    reserve_2: f64,
    fee: f64,
) -> Pool {
    Pool::new(
        PoolId::from(id),
        asset(symbol_1, reserve_1),
        asset(symbol_2, reserve_2),
        fee,
        PoolKind::Stable,
    )
    .unwrap()
}

pub fn syms(symbols: &[&str]) -> Vec<String> {
    symbols.iter().map(ToString::to_string).collect()
}

pub fn starters(entries: &[(&str, f64, f64)]) -> HashMap<String, Starter> {
    entries
        .iter()
        .map(|(symbol, current_price, maximum_input)| {
            (
                symbol.to_string(),
                Starter {
                    current_price: *current_price,
                    maximum_input: *maximum_input,
                },
            )
        })
        .collect()
}

//! Optimal trade-size solver for a direction-bound pool path.
//!
//! Two implementations of one interface, selected by inspecting the path:
//! an exact closed form when every hop is an equal-weight constant-product
//! pool, and a derivative-free golden-section search otherwise. The split
//! keeps the fast path exact and isolates floating-point search to the
//! genuinely non-algebraic cases.

use log::warn;
use serde::Deserialize;

use crate::amm::pool::{simulate_path, SwapLeg};

/// Tolerances and iteration budget for the numeric fallback.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct SolverSettings {
    /// Absolute tolerance on the input amount
    pub x_tol: f64,
    /// Absolute tolerance on the objective value
    pub f_tol: f64,
    /// Iteration budget; exhaustion means non-convergence
    pub max_iters: u32,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            x_tol: 1e-6,
            f_tol: 1e-9,
            max_iters: 200,
        }
    }
}

/// The input amount maximizing `simulate_path(legs, x) - x` over `x >= 0`.
///
/// Returns `None` when the numeric fallback fails to converge within its
/// budget, in which case the candidate must be skipped rather than acted on.
/// A `Some` value at or below zero means the path is simply not profitable,
/// a normal outcome.
#[must_use]
pub fn optimal_amount(legs: &[SwapLeg], settings: &SolverSettings) -> Option<f64> {
    if legs.is_empty() {
        return Some(0.0);
    }
    if legs.iter().all(SwapLeg::is_balanced_xyk) {
        Some(closed_form(legs))
    } else {
        golden_section(legs, settings)
    }
}

/// Exact optimum for a path of equal-weight constant-product hops.
///
/// Folds hops 2..n into one equivalent pool: composing hop k with input
/// reserve `i_k`, output reserve `o_k`, retention `r_k` into the running
/// equivalent `(i_eq, o_eq)` gives
///
/// ```text
/// i_eq' = i_eq * i_k / (i_k + r_k * o_eq)
/// o_eq' = r_k * o_eq * o_k / (i_k + r_k * o_eq)
/// ```
///
/// after which the single-pool profit-maximizing trade size applies, with
/// the first hop's retention:
///
/// ```text
/// x* = (sqrt(i_eq * o_eq * r_1) - i_eq) / r_1
/// ```
fn closed_form(legs: &[SwapLeg]) -> f64 {
    let r_1 = legs[0].r;
    let mut i_eq = legs[0].i;
    let mut o_eq = legs[0].o;
    for leg in &legs[1..] {
        let denominator = leg.i + leg.r * o_eq;
        i_eq = (i_eq * leg.i) / denominator;
        o_eq = (leg.r * o_eq * leg.o) / denominator;
    }
    ((i_eq * o_eq * r_1).sqrt() - i_eq) / r_1
}

/// Inverse golden ratio, the interval reduction factor per iteration.
#[allow(clippy::unreadable_literal)]
const INV_PHI: f64 = 0.6180339887498949;

/// Derivative-free minimization of `g(x) = x - simulate_path(legs, x)` by
/// golden-section search on `[0, i_1]`, the first hop's input reserve (the
/// profit optimum always lies well inside one reserve depth).
///
/// Returns the minimizer clipped to `>= 0`, or `None` when the iteration
/// budget runs out before either tolerance is met.
fn golden_section(legs: &[SwapLeg], settings: &SolverSettings) -> Option<f64> {
    let objective = |x: f64| x - simulate_path(legs, x);

    let mut lo = 0.0;
    let mut hi = legs[0].i;
    let mut left = hi - INV_PHI * (hi - lo);
    let mut right = lo + INV_PHI * (hi - lo);
    let mut f_left = objective(left);
    let mut f_right = objective(right);

    for _ in 0..settings.max_iters {
        if hi - lo <= settings.x_tol || (f_left - f_right).abs() <= settings.f_tol {
            return Some(f64::midpoint(lo, hi).max(0.0));
        }
        if f_left < f_right {
            hi = right;
            right = left;
            f_right = f_left;
            left = hi - INV_PHI * (hi - lo);
            f_left = objective(left);
        } else {
            lo = left;
            left = right;
            f_left = f_right;
            right = lo + INV_PHI * (hi - lo);
            f_right = objective(right);
        }
    }
    warn!(
        "optimizer failed to converge after {} iterations on path {:?}",
        settings.max_iters,
        legs.iter().map(|l| &l.pool_id).collect::<Vec<_>>()
    );
    None
}

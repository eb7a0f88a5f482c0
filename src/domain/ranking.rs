//! Ranking: evaluate a candidate batch and keep the best routes.

use super::entities::{ResolvedCoords, RouteCandidate};
use super::evaluation::{evaluate_route, EvalContext, RouteResult};

/// How many routes a scan reports by default.
pub const DEFAULT_TOP_N: usize = 5;

/// Evaluate every candidate. Rejections stay in the output so callers
/// can count them; ordering is the input ordering.
pub fn evaluate_candidates(
    ctx: &EvalContext<'_>,
    reference: &ResolvedCoords,
    candidates: &[RouteCandidate],
) -> Vec<RouteResult> {
    candidates
        .iter()
        .map(|candidate| evaluate_route(ctx, reference, candidate))
        .collect()
}

/// Keep the viable results, sort them best-first and truncate to `top_n`.
///
/// Order: credits/hour descending, ties by lower cycle time, then by
/// mine-system name so equal routes rank deterministically. A short or
/// empty list is a valid outcome, never padded.
pub fn rank_routes(results: Vec<RouteResult>, top_n: usize) -> Vec<RouteResult> {
    let mut viable: Vec<RouteResult> = results.into_iter().filter(RouteResult::is_viable).collect();

    viable.sort_by(|a, b| {
        let (a_cph, a_cycle) = sort_key(a);
        let (b_cph, b_cycle) = sort_key(b);
        b_cph
            .total_cmp(&a_cph)
            .then(a_cycle.total_cmp(&b_cycle))
            .then_with(|| a.mine_system.cmp(&b.mine_system))
    });

    viable.truncate(top_n);
    viable
}

fn sort_key(result: &RouteResult) -> (f64, f64) {
    result
        .metrics()
        .map(|m| (m.credits_per_hour, m.plan.cycle_time_min()))
        .unwrap_or((f64::NEG_INFINITY, f64::INFINITY))
}

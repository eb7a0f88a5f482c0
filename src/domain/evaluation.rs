//! Route evaluator: one candidate in, one terminal result out.
//!
//! Every outcome is a [`RouteResult`] carrying either the full metrics
//! or a tagged rejection; nothing here returns an error, so the ranker
//! needs no special-case handling.

use std::time::SystemTime;

use thiserror::Error;

use super::cost_time::{self, CostTimePlan};
use super::economics::{self, SaleEconomics, TaxTable};
use super::entities::{
    GameConfig, MiningMode, PadSize, ResolvedCoords, RouteCandidate, ShipProfile,
};
use super::freshness::{FreshnessPolicy, RecordKind};

/// Why a candidate was dropped. Per-candidate and non-fatal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum RejectReason {
    #[error("stale {} record", .0.label())]
    StaleData(RecordKind),
    #[error("hotspot and buyer commodities differ")]
    CommodityMismatch,
    #[error("station reports zero demand")]
    ZeroDemand,
    #[error("loadout cannot produce a positive mining rate")]
    ConfigurationError,
    #[error("landing pad too small for this ship")]
    PadSizeMismatch,
    #[error("no coordinates known for a candidate location")]
    UnresolvedLocation,
}

/// Full breakdown for a viable route.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RouteMetrics {
    pub unit_price: f64,
    pub demand: u32,
    pub pad: PadSize,
    pub plan: CostTimePlan,
    pub sale: SaleEconomics,
    pub credits_per_hour: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub enum RouteOutcome {
    Viable(RouteMetrics),
    Rejected(RejectReason),
}

/// Terminal, immutable record of one evaluation. Ranked or discarded,
/// never updated.
#[derive(Clone, Debug, PartialEq)]
pub struct RouteResult {
    pub commodity: String,
    pub mine_system: String,
    pub mine_ring: String,
    pub sell_system: String,
    pub sell_station: String,
    pub outcome: RouteOutcome,
}

impl RouteResult {
    pub fn is_viable(&self) -> bool {
        matches!(self.outcome, RouteOutcome::Viable(_))
    }

    pub fn metrics(&self) -> Option<&RouteMetrics> {
        match &self.outcome {
            RouteOutcome::Viable(metrics) => Some(metrics),
            RouteOutcome::Rejected(_) => None,
        }
    }

    pub fn rejection(&self) -> Option<RejectReason> {
        match &self.outcome {
            RouteOutcome::Viable(_) => None,
            RouteOutcome::Rejected(reason) => Some(*reason),
        }
    }
}

/// Everything an evaluation needs besides the candidate itself.
/// `now` is explicit so identical inputs give identical results.
#[derive(Clone, Copy, Debug)]
pub struct EvalContext<'a> {
    pub ship: &'a ShipProfile,
    pub config: &'a GameConfig,
    pub tax: &'a TaxTable,
    pub policy: &'a FreshnessPolicy,
    pub mode: MiningMode,
    pub now: SystemTime,
}

/// Evaluate one candidate. Checks short-circuit in order: commodity
/// match, location resolution, freshness of all three records, pad
/// size, loadout sanity, then the actual cost and revenue math.
pub fn evaluate_route(
    ctx: &EvalContext<'_>,
    reference: &ResolvedCoords,
    candidate: &RouteCandidate,
) -> RouteResult {
    let hotspot = &candidate.hotspot;
    let buyer = &candidate.buyer;

    let result = |outcome: RouteOutcome| RouteResult {
        commodity: hotspot.commodity.clone(),
        mine_system: hotspot.system.clone(),
        mine_ring: hotspot.ring.clone(),
        sell_system: buyer.system.clone(),
        sell_station: buyer.station.clone(),
        outcome,
    };
    let reject = |reason: RejectReason| result(RouteOutcome::Rejected(reason));

    if hotspot.commodity != buyer.commodity {
        return reject(RejectReason::CommodityMismatch);
    }

    let (Some(mine_coords), Some(buyer_coords)) = (hotspot.coords, buyer.coords) else {
        return reject(RejectReason::UnresolvedLocation);
    };

    // A route is fresh only if all three input records pass the gate.
    if !ctx
        .policy
        .is_fresh(ctx.now, reference.resolved_at, RecordKind::Coordinates)
    {
        return reject(RejectReason::StaleData(RecordKind::Coordinates));
    }
    if !ctx
        .policy
        .is_fresh(ctx.now, hotspot.updated_at, RecordKind::Hotspot)
    {
        return reject(RejectReason::StaleData(RecordKind::Hotspot));
    }
    if !ctx
        .policy
        .is_fresh(ctx.now, buyer.updated_at, RecordKind::Price)
    {
        return reject(RejectReason::StaleData(RecordKind::Price));
    }

    if !buyer.pad.fits(ctx.ship.pad_size) {
        return reject(RejectReason::PadSizeMismatch);
    }

    let dist_to_mine = reference.coords.distance_to(&mine_coords);
    let dist_to_sell = mine_coords.distance_to(&buyer_coords);

    let Some(plan) = cost_time::plan(ctx.ship, ctx.config, ctx.mode, dist_to_mine, dist_to_sell)
    else {
        return reject(RejectReason::ConfigurationError);
    };

    let Some(sale) = economics::sale_economics(
        ctx.ship.cargo_tons,
        buyer.unit_price,
        buyer.demand,
        plan.limpets_needed,
        ctx.config,
        ctx.tax,
    ) else {
        return reject(RejectReason::ZeroDemand);
    };

    let credits_per_hour = economics::credits_per_hour(sale.net_profit, plan.cycle_time_min());

    result(RouteOutcome::Viable(RouteMetrics {
        unit_price: buyer.unit_price,
        demand: buyer.demand,
        pad: buyer.pad,
        plan,
        sale,
        credits_per_hour,
    }))
}

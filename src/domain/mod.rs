//! Domain logic for mining route evaluation lives here.

pub mod cost_time;
pub mod economics;
pub mod entities;
pub mod evaluation;
pub mod freshness;
pub mod ranking;

pub use economics::{TaxBand, TaxTable};
pub use entities::{
    BuyerOffer, CommodityRef, Coords, GameConfig, Hotspot, MiningMode, PadSize, ResolvedCoords,
    RouteCandidate, ShipProfile, LASER_MINING_COMMODITIES,
};
pub use evaluation::{
    evaluate_route, EvalContext, RejectReason, RouteMetrics, RouteOutcome, RouteResult,
};
pub use freshness::{FreshnessPolicy, RecordKind, ABSOLUTE_MAX_AGE};
pub use ranking::{evaluate_candidates, rank_routes, DEFAULT_TOP_N};

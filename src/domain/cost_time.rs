//! Cost & time model: the physical and temporal cost of one route.
//!
//! Everything here is a pure function of the ship loadout, the game
//! constants and the leg distances. Misconfigured loadouts yield `None`
//! instead of dividing by zero.

use super::entities::{GameConfig, MiningMode, ShipProfile};

/// Complete time/consumption breakdown for one candidate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CostTimePlan {
    pub dist_to_mine_ly: f64,
    pub dist_to_sell_ly: f64,
    pub total_ly: f64,
    /// Both legs, jumps plus docking overhead.
    pub travel_min: f64,
    /// Theoretical extraction time for a full hold, prospector applied.
    pub extraction_min: f64,
    /// Extraction time inflated by downtime and the mode multiplier.
    pub realistic_mining_min: f64,
    /// Bottleneck rate before the prospector bonus, tons per minute.
    pub effective_rate_tpm: f64,
    /// Limpets consumed per hold, losses included. Cost driver only.
    pub limpets_needed: f64,
}

impl CostTimePlan {
    /// Mining plus travel, in minutes. Strictly positive by construction.
    pub fn cycle_time_min(&self) -> f64 {
        self.realistic_mining_min + self.travel_min
    }
}

/// The slower of extraction and collection capacity, tons per minute.
/// Collection is the binding constraint when it is slower than the lasers.
pub fn effective_rate_tpm(ship: &ShipProfile, cfg: &GameConfig) -> f64 {
    let laser_capacity = ship.num_lasers as f64 * cfg.laser_mining_rate_per_laser;
    let collection_capacity = ship.collector_controllers as f64 * cfg.limpet_collection_rate;
    laser_capacity.min(collection_capacity)
}

/// Travel time for a single leg: jumps rounded up, plus docking overhead.
pub fn travel_time_min(dist_ly: f64, ship: &ShipProfile, cfg: &GameConfig) -> f64 {
    let num_jumps = if dist_ly > 0.0 {
        (dist_ly / ship.jump_range_ly).ceil()
    } else {
        0.0
    };
    num_jumps * ship.jump_time_min + cfg.docking_overhead_min
}

/// Limpets consumed filling the hold, inflated by the loss rate.
pub fn limpets_needed(ship: &ShipProfile, cfg: &GameConfig) -> f64 {
    ship.cargo_tons as f64 * cfg.limpets_per_ton * (1.0 + cfg.limpet_loss_rate)
}

/// Build the full plan for one candidate, or `None` when the loadout or
/// constants cannot produce a positive mining time.
pub fn plan(
    ship: &ShipProfile,
    cfg: &GameConfig,
    mode: MiningMode,
    dist_to_mine_ly: f64,
    dist_to_sell_ly: f64,
) -> Option<CostTimePlan> {
    let effective_rate = effective_rate_tpm(ship, cfg);
    if effective_rate <= 0.0
        || ship.cargo_tons == 0
        || ship.jump_range_ly <= 0.0
        || cfg.prospector_bonus <= 0.0
        || cfg.mining_downtime_factor <= 0.0
        || cfg.time_multiplier(mode) <= 0.0
    {
        return None;
    }

    let extraction_min = ship.cargo_tons as f64 / (effective_rate * cfg.prospector_bonus);
    let realistic_mining_min =
        extraction_min / cfg.mining_downtime_factor * cfg.time_multiplier(mode);

    let travel_min =
        travel_time_min(dist_to_mine_ly, ship, cfg) + travel_time_min(dist_to_sell_ly, ship, cfg);

    Some(CostTimePlan {
        dist_to_mine_ly,
        dist_to_sell_ly,
        total_ly: dist_to_mine_ly + dist_to_sell_ly,
        travel_min,
        extraction_min,
        realistic_mining_min,
        effective_rate_tpm: effective_rate,
        limpets_needed: limpets_needed(ship, cfg),
    })
}

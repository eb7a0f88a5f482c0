use std::fmt;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

/// Galactic position in light-years.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coords {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Coords {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// 3D Euclidean distance in light-years.
    pub fn distance_to(&self, other: &Coords) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

/// Coordinates together with the moment they were resolved.
/// The resolution time is what the freshness check inspects.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedCoords {
    pub coords: Coords,
    pub resolved_at: SystemTime,
}

impl ResolvedCoords {
    pub fn new(coords: Coords, resolved_at: SystemTime) -> Self {
        Self {
            coords,
            resolved_at,
        }
    }
}

/// Landing pad size, ordered by capacity. `Unknown` is a data gap and
/// never triggers a pad rejection on its own.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PadSize {
    Small,
    Medium,
    Large,
    #[default]
    Unknown,
}

impl PadSize {
    /// True when a ship needing `required` can land here.
    pub fn fits(&self, required: PadSize) -> bool {
        match (self, required) {
            (PadSize::Unknown, _) | (_, PadSize::Unknown) => true,
            (available, needed) => *available >= needed,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PadSize::Small => "S",
            PadSize::Medium => "M",
            PadSize::Large => "L",
            PadSize::Unknown => "?",
        }
    }
}

impl fmt::Display for PadSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How the session is flown; selects the realistic time multiplier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum MiningMode {
    /// Following published hotspot maps.
    Mapped,
    /// Random prospecting inside hotspots. Typical gameplay.
    #[default]
    Unmapped,
    /// Still learning the loop.
    Beginner,
}

impl MiningMode {
    pub fn label(&self) -> &'static str {
        match self {
            MiningMode::Mapped => "mapped",
            MiningMode::Unmapped => "unmapped",
            MiningMode::Beginner => "beginner",
        }
    }
}

impl fmt::Display for MiningMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Immutable ship loadout for the whole run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShipProfile {
    pub name: String,
    pub cargo_tons: u32,
    pub jump_range_ly: f64,
    pub jump_time_min: f64,
    pub collector_controllers: u32,
    pub num_lasers: u32,
    pub pad_size: PadSize,
    pub ship_value: f64,
}

impl Default for ShipProfile {
    /// The MU-18A Asp Miner loadout.
    fn default() -> Self {
        Self {
            name: "MU-18A Asp Miner".to_string(),
            cargo_tons: 96,
            jump_range_ly: 26.87,
            jump_time_min: 1.5,
            collector_controllers: 2,
            num_lasers: 2,
            pad_size: PadSize::Medium,
            ship_value: 21_598_088.0,
        }
    }
}

/// Named game-mechanics constants. All tunable; defaults reflect
/// community-verified values for an A-rated medium-laser loadout.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub limpet_cost: f64,
    pub limpets_per_ton: f64,

    /// Tons per minute per medium mining laser.
    pub laser_mining_rate_per_laser: f64,
    /// Tons per minute per collector controller.
    pub limpet_collection_rate: f64,

    /// Yield multiplier from an A-rated prospector limpet.
    pub prospector_bonus: f64,

    /// Fraction of nominal time actually spent extracting; the rest is
    /// lost to repositioning.
    pub mining_downtime_factor: f64,
    /// Fraction of limpets destroyed or expired per hold.
    pub limpet_loss_rate: f64,

    /// Fixed docking/undocking overhead per travel leg, in minutes.
    pub docking_overhead_min: f64,

    // Gameplay overhead multipliers: prospecting, positioning and
    // fragment collection on top of pure extraction.
    pub time_multiplier_mapped: f64,
    pub time_multiplier_unmapped: f64,
    pub time_multiplier_beginner: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            limpet_cost: 101.0,
            limpets_per_ton: 1.0,
            laser_mining_rate_per_laser: 2.5,
            limpet_collection_rate: 2.8,
            prospector_bonus: 3.5,
            mining_downtime_factor: 0.85,
            limpet_loss_rate: 0.10,
            docking_overhead_min: 5.0,
            time_multiplier_mapped: 2.0,
            time_multiplier_unmapped: 3.5,
            time_multiplier_beginner: 5.0,
        }
    }
}

impl GameConfig {
    pub fn time_multiplier(&self, mode: MiningMode) -> f64 {
        match mode {
            MiningMode::Mapped => self.time_multiplier_mapped,
            MiningMode::Unmapped => self.time_multiplier_unmapped,
            MiningMode::Beginner => self.time_multiplier_beginner,
        }
    }
}

/// A ring location where a commodity can be laser-mined.
/// Produced by the EDTools client; read-only to the evaluation core.
#[derive(Clone, Debug, PartialEq)]
pub struct Hotspot {
    pub system: String,
    /// Absent when the source row carried no position.
    pub coords: Option<Coords>,
    pub commodity: String,
    pub ring: String,
    pub updated_at: SystemTime,
}

/// A station buying a commodity at a known price and demand.
#[derive(Clone, Debug, PartialEq)]
pub struct BuyerOffer {
    pub system: String,
    pub station: String,
    pub coords: Option<Coords>,
    pub commodity: String,
    pub unit_price: f64,
    pub demand: u32,
    pub pad: PadSize,
    pub updated_at: SystemTime,
}

/// The unit of evaluation: one hotspot paired with one buyer.
#[derive(Clone, Debug, PartialEq)]
pub struct RouteCandidate {
    pub hotspot: Hotspot,
    pub buyer: BuyerOffer,
}

impl RouteCandidate {
    pub fn new(hotspot: Hotspot, buyer: BuyerOffer) -> Self {
        Self { hotspot, buyer }
    }
}

/// A laser-mineable commodity and its EDTools lookup id.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CommodityRef {
    pub name: &'static str,
    pub edtools_id: u32,
}

/// Commodities worth laser-mining, with their EDTools ids.
pub const LASER_MINING_COMMODITIES: &[CommodityRef] = &[
    CommodityRef { name: "Platinum", edtools_id: 46 },
    CommodityRef { name: "Osmium", edtools_id: 97 },
    CommodityRef { name: "Painite", edtools_id: 83 },
    CommodityRef { name: "LTD", edtools_id: 276 },
    CommodityRef { name: "Rhodplumsite", edtools_id: 343 },
    CommodityRef { name: "Serendibite", edtools_id: 344 },
    CommodityRef { name: "Monazite", edtools_id: 345 },
];

//! Scan orchestration: resolve the reference system, pull live hotspot
//! and buyer data per commodity, and rank the resulting candidates.
//!
//! A failed fetch for one commodity degrades to a logged warning and a
//! smaller candidate set. The only fatal condition is an unresolvable
//! reference system, since every distance depends on it.

use std::time::SystemTime;

use thiserror::Error;
use tracing::{info, warn};

use crate::domain::{
    evaluate_candidates, rank_routes, BuyerOffer, EvalContext, FreshnessPolicy, GameConfig,
    Hotspot, MiningMode, RouteCandidate, RouteResult, ShipProfile, TaxTable,
    LASER_MINING_COMMODITIES,
};
use crate::infra::{EdsmClient, EdsmError, EdtoolsClient};

/// Buyers below this unit price are not worth evaluating.
pub const DEFAULT_MIN_PRICE: f64 = 100_000.0;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("could not resolve coordinates for reference system {system}")]
    UnresolvedReferenceSystem {
        system: String,
        #[source]
        source: EdsmError,
    },
}

pub struct MiningScanner {
    edsm: EdsmClient,
    edtools: EdtoolsClient,
    ship: ShipProfile,
    config: GameConfig,
    tax: TaxTable,
    policy: FreshnessPolicy,
    mode: MiningMode,
    min_price: f64,
}

impl MiningScanner {
    pub fn new(edsm: EdsmClient, edtools: EdtoolsClient) -> Self {
        Self {
            edsm,
            edtools,
            ship: ShipProfile::default(),
            config: GameConfig::default(),
            tax: TaxTable::default(),
            policy: FreshnessPolicy::default(),
            mode: MiningMode::default(),
            min_price: DEFAULT_MIN_PRICE,
        }
    }

    pub fn with_ship(mut self, ship: ShipProfile) -> Self {
        self.ship = ship;
        self
    }

    pub fn with_config(mut self, config: GameConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_mode(mut self, mode: MiningMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_min_price(mut self, min_price: f64) -> Self {
        self.min_price = min_price;
        self
    }

    pub fn ship(&self) -> &ShipProfile {
        &self.ship
    }

    pub fn mode(&self) -> MiningMode {
        self.mode
    }

    /// Run one full scan and return the top `top_n` viable routes.
    pub async fn scan(
        &self,
        reference_system: &str,
        top_n: usize,
    ) -> Result<Vec<RouteResult>, ScanError> {
        let reference = self
            .edsm
            .resolve_coordinates(reference_system)
            .await
            .map_err(|source| ScanError::UnresolvedReferenceSystem {
                system: reference_system.to_string(),
                source,
            })?;
        info!(system = reference_system, "reference system located");

        // One clock reading per batch keeps the whole scan consistent.
        let now = SystemTime::now();
        let ctx = EvalContext {
            ship: &self.ship,
            config: &self.config,
            tax: &self.tax,
            policy: &self.policy,
            mode: self.mode,
            now,
        };

        let mut results = Vec::new();
        for commodity in LASER_MINING_COMMODITIES {
            let hotspots = match self.edtools.fetch_hotspots(commodity).await {
                Ok(hotspots) => hotspots,
                Err(error) => {
                    warn!(commodity = commodity.name, %error, "hotspot fetch failed, skipping");
                    continue;
                }
            };
            if hotspots.is_empty() {
                info!(commodity = commodity.name, "no hotspots found");
                continue;
            }

            let buyers = match self.edtools.fetch_buyers(commodity).await {
                Ok(buyers) => buyers,
                Err(error) => {
                    warn!(commodity = commodity.name, %error, "buyer fetch failed, skipping");
                    continue;
                }
            };
            let buyers: Vec<BuyerOffer> = buyers
                .into_iter()
                .filter(|buyer| buyer.unit_price >= self.min_price)
                .collect();
            if buyers.is_empty() {
                info!(commodity = commodity.name, "no buyers above the price floor");
                continue;
            }

            info!(
                commodity = commodity.name,
                hotspots = hotspots.len(),
                buyers = buyers.len(),
                "evaluating candidates"
            );
            let candidates = build_candidates(&hotspots, &buyers);
            results.extend(evaluate_candidates(&ctx, &reference, &candidates));
        }

        let rejected = results.iter().filter(|r| !r.is_viable()).count();
        info!(
            evaluated = results.len(),
            rejected,
            "scan complete, ranking survivors"
        );

        Ok(rank_routes(results, top_n))
    }
}

/// Cartesian product of hotspots and buyers for one commodity.
pub fn build_candidates(hotspots: &[Hotspot], buyers: &[BuyerOffer]) -> Vec<RouteCandidate> {
    let mut candidates = Vec::with_capacity(hotspots.len() * buyers.len());
    for hotspot in hotspots {
        for buyer in buyers {
            candidates.push(RouteCandidate::new(hotspot.clone(), buyer.clone()));
        }
    }
    candidates
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, SystemTime};

    use super::*;
    use crate::domain::{Coords, PadSize};

    fn now() -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000)
    }

    fn hotspot(system: &str) -> Hotspot {
        Hotspot {
            system: system.to_string(),
            coords: Some(Coords::new(10.0, 0.0, 0.0)),
            commodity: "Platinum".to_string(),
            ring: "A Ring".to_string(),
            updated_at: now(),
        }
    }

    fn buyer(station: &str) -> BuyerOffer {
        BuyerOffer {
            system: "Chamunda".to_string(),
            station: station.to_string(),
            coords: Some(Coords::new(20.0, 0.0, 0.0)),
            commodity: "Platinum".to_string(),
            unit_price: 250_000.0,
            demand: 10_000,
            pad: PadSize::Large,
            updated_at: now(),
        }
    }

    #[test]
    fn candidates_are_the_cartesian_product() {
        let hotspots = vec![hotspot("A"), hotspot("B")];
        let buyers = vec![buyer("X"), buyer("Y"), buyer("Z")];
        let candidates = build_candidates(&hotspots, &buyers);
        assert_eq!(candidates.len(), 6);
        assert!(candidates
            .iter()
            .any(|c| c.hotspot.system == "B" && c.buyer.station == "Z"));
    }

    #[test]
    fn empty_sides_yield_no_candidates() {
        assert!(build_candidates(&[], &[buyer("X")]).is_empty());
        assert!(build_candidates(&[hotspot("A")], &[]).is_empty());
    }
}

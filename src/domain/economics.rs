//! Economics model: turns a filled hold into realized profit.

use serde::{Deserialize, Serialize};

use super::entities::GameConfig;

/// One bulk-tax band: the rate charged once the sale consumes at least
/// `threshold_fraction` of the station's demand.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TaxBand {
    pub threshold_fraction: f64,
    pub rate: f64,
}

/// Ordered bulk-sale tax bands over the demand fraction `cargo / demand`.
/// The applied rate is that of the highest band whose threshold the sale
/// reaches. Band values are configuration, not business logic; only the
/// existence of an escalation at the 25 % demand mark is load-bearing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TaxTable {
    bands: Vec<TaxBand>,
}

impl Default for TaxTable {
    fn default() -> Self {
        Self::new(vec![
            TaxBand { threshold_fraction: 0.0, rate: 0.0 },
            TaxBand { threshold_fraction: 0.25, rate: 0.10 },
            TaxBand { threshold_fraction: 0.50, rate: 0.25 },
            TaxBand { threshold_fraction: 1.0, rate: 0.40 },
        ])
    }
}

impl TaxTable {
    /// Bands are kept sorted by threshold so lookup is a simple scan.
    pub fn new(mut bands: Vec<TaxBand>) -> Self {
        bands.sort_by(|a, b| a.threshold_fraction.total_cmp(&b.threshold_fraction));
        Self { bands }
    }

    pub fn bands(&self) -> &[TaxBand] {
        &self.bands
    }

    /// Rate for a sale consuming `demand_fraction` of station demand.
    /// A sale exactly at a threshold falls into that band.
    pub fn rate_for(&self, demand_fraction: f64) -> f64 {
        self.bands
            .iter()
            .take_while(|band| band.threshold_fraction <= demand_fraction)
            .last()
            .map(|band| band.rate)
            .unwrap_or(0.0)
    }
}

/// Revenue and cost breakdown for selling one full hold.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SaleEconomics {
    pub gross_revenue: f64,
    pub demand_fraction: f64,
    pub tax_rate: f64,
    pub tax_amount: f64,
    pub limpet_cost: f64,
    pub net_profit: f64,
}

/// Compute the sale breakdown, or `None` when the station has no demand
/// (revenue against zero demand is meaningless, not zero).
pub fn sale_economics(
    cargo_tons: u32,
    unit_price: f64,
    demand: u32,
    limpets_needed: f64,
    cfg: &GameConfig,
    tax: &TaxTable,
) -> Option<SaleEconomics> {
    if demand == 0 {
        return None;
    }

    let tons = cargo_tons as f64;
    let gross_revenue = tons * unit_price;
    let demand_fraction = tons / demand as f64;
    let tax_rate = tax.rate_for(demand_fraction);
    let tax_amount = gross_revenue * tax_rate;
    let limpet_cost = limpets_needed * cfg.limpet_cost;

    Some(SaleEconomics {
        gross_revenue,
        demand_fraction,
        tax_rate,
        tax_amount,
        limpet_cost,
        net_profit: gross_revenue - tax_amount - limpet_cost,
    })
}

/// Net profit over the full cycle, in credits per hour.
/// Callers guarantee a positive cycle time (see the cost/time model).
pub fn credits_per_hour(net_profit: f64, cycle_time_min: f64) -> f64 {
    net_profit / (cycle_time_min / 60.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_has_escalation_at_quarter_demand() {
        let table = TaxTable::default();
        assert_eq!(table.rate_for(0.24), 0.0);
        assert_eq!(table.rate_for(0.25), 0.10);
    }

    #[test]
    fn both_sides_of_every_default_boundary() {
        let table = TaxTable::default();
        let eps = 1e-9;
        for (threshold, below, at) in [
            (0.25, 0.0, 0.10),
            (0.50, 0.10, 0.25),
            (1.0, 0.25, 0.40),
        ] {
            assert_eq!(table.rate_for(threshold - eps), below);
            assert_eq!(table.rate_for(threshold), at);
        }
    }

    #[test]
    fn fraction_above_top_band_keeps_top_rate() {
        let table = TaxTable::default();
        assert_eq!(table.rate_for(3.0), 0.40);
    }

    #[test]
    fn bands_are_sorted_on_construction() {
        let table = TaxTable::new(vec![
            TaxBand { threshold_fraction: 0.5, rate: 0.2 },
            TaxBand { threshold_fraction: 0.0, rate: 0.0 },
        ]);
        assert_eq!(table.rate_for(0.1), 0.0);
        assert_eq!(table.rate_for(0.6), 0.2);
    }

    #[test]
    fn zero_demand_yields_no_economics() {
        let cfg = GameConfig::default();
        assert!(sale_economics(96, 285_432.0, 0, 105.6, &cfg, &TaxTable::default()).is_none());
    }

    #[test]
    fn net_profit_subtracts_tax_and_limpets() {
        let cfg = GameConfig::default();
        // 96 t into 15 823 demand is ~0.6 % of demand: zero-tax band.
        let sale =
            sale_economics(96, 285_432.0, 15_823, 105.6, &cfg, &TaxTable::default()).unwrap();
        assert_eq!(sale.tax_rate, 0.0);
        assert!((sale.gross_revenue - 96.0 * 285_432.0).abs() < 1e-6);
        assert!((sale.limpet_cost - 105.6 * 101.0).abs() < 1e-9);
        assert!((sale.net_profit - (sale.gross_revenue - sale.limpet_cost)).abs() < 1e-6);
    }

    #[test]
    fn taxed_sale_loses_the_band_rate() {
        let cfg = GameConfig::default();
        // 96 t into 200 demand is 48 % of demand: 10 % band.
        let sale = sale_economics(96, 1_000.0, 200, 0.0, &cfg, &TaxTable::default()).unwrap();
        assert_eq!(sale.tax_rate, 0.10);
        assert!((sale.tax_amount - 9_600.0).abs() < 1e-9);
        assert!((sale.net_profit - 86_400.0).abs() < 1e-9);
    }

    #[test]
    fn credits_per_hour_scales_with_cycle_time() {
        assert!((credits_per_hour(1_000_000.0, 60.0) - 1_000_000.0).abs() < 1e-9);
        assert!((credits_per_hour(1_000_000.0, 30.0) - 2_000_000.0).abs() < 1e-9);
    }
}

//! Thin asynchronous client for the EDTools miner API.
//!
//! Provides typed accessors for mining hotspots and commodity buyers.
//! Payloads are permissive: rows missing coordinates or timestamps are
//! kept and flagged through the domain types (absent coords, epoch-old
//! timestamps) so the evaluator can reject them with a reason instead
//! of the client dropping them silently.

use std::time::{Duration, SystemTime};

use reqwest::{Client, Url};
use serde::Deserialize;
use thiserror::Error;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::debug;

use crate::domain::{BuyerOffer, CommodityRef, Coords, Hotspot, PadSize};
use crate::infra::cache::{TtlCache, BUYER_TTL, HOTSPOT_TTL};
use crate::infra::retry::{with_retry, DEFAULT_ATTEMPTS, DEFAULT_BASE_DELAY};

const DEFAULT_BASE_URL: &str = "https://edtools.cc/";
const USER_AGENT: &str = "mining-route-scanner/1.0";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum EdtoolsError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("http request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("api error: {0}")]
    Api(String),
}

#[derive(Clone)]
pub struct EdtoolsClient {
    http: Client,
    base_url: Url,
    hotspots: TtlCache<String, Vec<Hotspot>>,
    buyers: TtlCache<u32, Vec<BuyerOffer>>,
}

impl EdtoolsClient {
    pub fn new() -> Result<Self, EdtoolsError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base: &str) -> Result<Self, EdtoolsError> {
        let base_url = Url::parse(base)?;
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_url,
            hotspots: TtlCache::new(HOTSPOT_TTL),
            buyers: TtlCache::new(BUYER_TTL),
        })
    }

    /// Ring hotspots for one commodity. An empty list means "no known
    /// sites", not an error.
    pub async fn fetch_hotspots(
        &self,
        commodity: &CommodityRef,
    ) -> Result<Vec<Hotspot>, EdtoolsError> {
        let payload = self
            .hotspots
            .get_or_fetch(commodity.name.to_string(), || {
                with_retry(DEFAULT_ATTEMPTS, DEFAULT_BASE_DELAY, || {
                    self.fetch_hotspot_rows(commodity)
                })
            })
            .await?;
        debug!(
            commodity = commodity.name,
            count = payload.value.len(),
            status = ?payload.status,
            "fetched hotspots"
        );
        Ok(payload.value)
    }

    /// Stations currently buying one commodity.
    pub async fn fetch_buyers(
        &self,
        commodity: &CommodityRef,
    ) -> Result<Vec<BuyerOffer>, EdtoolsError> {
        let payload = self
            .buyers
            .get_or_fetch(commodity.edtools_id, || {
                with_retry(DEFAULT_ATTEMPTS, DEFAULT_BASE_DELAY, || {
                    self.fetch_buyer_rows(commodity)
                })
            })
            .await?;
        debug!(
            commodity = commodity.name,
            count = payload.value.len(),
            status = ?payload.status,
            "fetched buyers"
        );
        Ok(payload.value)
    }

    async fn fetch_hotspot_rows(
        &self,
        commodity: &CommodityRef,
    ) -> Result<Vec<Hotspot>, EdtoolsError> {
        let mut url = self.base_url.join("miner")?;
        url.query_pairs_mut()
            .append_pair("a", "r")
            .append_pair("n", commodity.name);

        let value: serde_json::Value = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(parse_hotspots(value, commodity.name, SystemTime::now()))
    }

    async fn fetch_buyer_rows(
        &self,
        commodity: &CommodityRef,
    ) -> Result<Vec<BuyerOffer>, EdtoolsError> {
        let mut url = self.base_url.join("miner")?;
        url.query_pairs_mut()
            .append_pair("a", "p")
            .append_pair("cid", &commodity.edtools_id.to_string());

        let value: serde_json::Value = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(parse_buyers(value, commodity.name, SystemTime::now()))
    }
}

#[derive(Debug, Deserialize)]
struct CoordsDto {
    x: f64,
    y: f64,
    z: f64,
}

impl From<CoordsDto> for Coords {
    fn from(dto: CoordsDto) -> Self {
        Coords::new(dto.x, dto.y, dto.z)
    }
}

#[derive(Debug, Deserialize)]
struct HotspotDto {
    #[serde(alias = "system", default)]
    name: Option<String>,
    #[serde(default)]
    coords: Option<CoordsDto>,
    #[serde(alias = "ring_name", alias = "body", default)]
    ring: Option<String>,
    #[serde(alias = "updated_at", alias = "upd", default)]
    updated: Option<String>,
}

impl HotspotDto {
    fn into_hotspot(self, commodity: &str, now: SystemTime) -> Hotspot {
        Hotspot {
            system: self.name.unwrap_or_else(|| "Unknown".to_string()),
            coords: self.coords.map(Coords::from),
            commodity: commodity.to_string(),
            ring: self.ring.unwrap_or_else(|| "?".to_string()),
            // Hotspot rows rarely carry an update time; they describe
            // ring geology, which only changes with game updates.
            updated_at: parse_timestamp_str(self.updated.as_deref()).unwrap_or(now),
        }
    }
}

#[derive(Debug, Deserialize)]
struct BuyerDto {
    #[serde(default)]
    system: Option<String>,
    #[serde(default)]
    station: Option<String>,
    #[serde(default)]
    coords: Option<CoordsDto>,
    #[serde(default)]
    price: Option<f64>,
    #[serde(default)]
    demand: Option<u32>,
    #[serde(default)]
    pad: Option<String>,
    #[serde(default)]
    ago_sec: Option<u64>,
}

impl BuyerDto {
    fn into_offer(self, commodity: &str, now: SystemTime) -> BuyerOffer {
        // A row without an age claim is treated as ancient so the
        // freshness gate rejects it rather than trusting it blindly.
        let updated_at = match self.ago_sec {
            Some(ago) => now
                .checked_sub(Duration::from_secs(ago))
                .unwrap_or(SystemTime::UNIX_EPOCH),
            None => SystemTime::UNIX_EPOCH,
        };

        BuyerOffer {
            system: self.system.unwrap_or_else(|| "Unknown".to_string()),
            station: self.station.unwrap_or_else(|| "Unknown".to_string()),
            coords: self.coords.map(Coords::from),
            commodity: commodity.to_string(),
            unit_price: self.price.unwrap_or(0.0),
            demand: self.demand.unwrap_or(0),
            pad: parse_pad(self.pad.as_deref()),
            updated_at,
        }
    }
}

/// EDTools answers either a bare array or a `{ "data": [...] }` wrapper.
fn rows(value: serde_json::Value) -> Vec<serde_json::Value> {
    #[derive(Deserialize)]
    struct Wrapper {
        data: Vec<serde_json::Value>,
    }

    if let Ok(entries) = serde_json::from_value::<Vec<serde_json::Value>>(value.clone()) {
        return entries;
    }
    if let Ok(wrapper) = serde_json::from_value::<Wrapper>(value) {
        return wrapper.data;
    }
    Vec::new()
}

fn parse_hotspots(value: serde_json::Value, commodity: &str, now: SystemTime) -> Vec<Hotspot> {
    rows(value)
        .into_iter()
        .filter_map(|row| serde_json::from_value::<HotspotDto>(row).ok())
        .map(|dto| dto.into_hotspot(commodity, now))
        .collect()
}

fn parse_buyers(value: serde_json::Value, commodity: &str, now: SystemTime) -> Vec<BuyerOffer> {
    rows(value)
        .into_iter()
        .filter_map(|row| serde_json::from_value::<BuyerDto>(row).ok())
        .map(|dto| dto.into_offer(commodity, now))
        .collect()
}

fn parse_pad(raw: Option<&str>) -> PadSize {
    match raw.map(str::trim) {
        Some("S") | Some("s") => PadSize::Small,
        Some("M") | Some("m") => PadSize::Medium,
        Some("L") | Some("l") => PadSize::Large,
        _ => PadSize::Unknown,
    }
}

fn parse_timestamp_str(raw: Option<&str>) -> Option<SystemTime> {
    let value = raw?;
    let dt = OffsetDateTime::parse(value, &Rfc3339).ok()?;
    if dt.unix_timestamp() < 0 {
        return None;
    }
    SystemTime::UNIX_EPOCH
        .checked_add(Duration::from_secs(dt.unix_timestamp() as u64))
        .and_then(|time| time.checked_add(Duration::from_nanos(dt.nanosecond() as u64)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000)
    }

    #[test]
    fn parses_hotspot_rows_from_bare_array() {
        let value = serde_json::json!([
            {
                "name": "Coalsack Sector",
                "coords": { "x": 42.3, "y": 0.0, "z": 0.0 },
                "ring": "A 2 A Ring"
            },
            { "name": "Ringless" }
        ]);
        let hotspots = parse_hotspots(value, "Platinum", now());
        assert_eq!(hotspots.len(), 2);
        assert_eq!(hotspots[0].system, "Coalsack Sector");
        assert_eq!(hotspots[0].commodity, "Platinum");
        assert_eq!(hotspots[0].coords, Some(Coords::new(42.3, 0.0, 0.0)));
        assert_eq!(hotspots[1].coords, None);
    }

    #[test]
    fn parses_buyer_rows_from_data_wrapper() {
        let value = serde_json::json!({
            "data": [{
                "system": "Chamunda",
                "station": "Nadiradze Port",
                "coords": { "x": 61.0, "y": 0.0, "z": 0.0 },
                "price": 285432.0,
                "demand": 15823,
                "pad": "L",
                "ago_sec": 600
            }]
        });
        let buyers = parse_buyers(value, "Platinum", now());
        assert_eq!(buyers.len(), 1);
        let buyer = &buyers[0];
        assert_eq!(buyer.station, "Nadiradze Port");
        assert_eq!(buyer.unit_price, 285_432.0);
        assert_eq!(buyer.demand, 15_823);
        assert_eq!(buyer.pad, PadSize::Large);
        assert_eq!(buyer.updated_at, now() - Duration::from_secs(600));
    }

    #[test]
    fn buyer_without_age_claim_is_ancient() {
        let value = serde_json::json!([{ "system": "Chamunda", "price": 1000.0 }]);
        let buyers = parse_buyers(value, "Platinum", now());
        assert_eq!(buyers[0].updated_at, SystemTime::UNIX_EPOCH);
    }

    #[test]
    fn unknown_pad_codes_map_to_unknown() {
        assert_eq!(parse_pad(Some("L")), PadSize::Large);
        assert_eq!(parse_pad(Some("m")), PadSize::Medium);
        assert_eq!(parse_pad(Some("XL")), PadSize::Unknown);
        assert_eq!(parse_pad(None), PadSize::Unknown);
    }

    #[test]
    fn rfc3339_hotspot_timestamps_are_honored() {
        let value = serde_json::json!([{
            "name": "Coalsack Sector",
            "upd": "2023-11-14T22:13:20Z"
        }]);
        let hotspots = parse_hotspots(value, "Platinum", now());
        assert_eq!(
            hotspots[0].updated_at,
            SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000)
        );
    }

    #[test]
    fn malformed_payload_yields_no_rows() {
        assert!(parse_hotspots(serde_json::json!("nope"), "Platinum", now()).is_empty());
        assert!(parse_buyers(serde_json::json!(42), "Platinum", now()).is_empty());
    }
}

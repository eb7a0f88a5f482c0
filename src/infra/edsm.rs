//! Thin asynchronous client for the EDSM systems API.
//!
//! Resolves system names to galactic coordinates, behind a 10-minute
//! cache and the shared retry policy.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::domain::{Coords, ResolvedCoords};
use crate::infra::cache::{TtlCache, COORDINATES_TTL};
use crate::infra::retry::{with_retry, DEFAULT_ATTEMPTS, DEFAULT_BASE_DELAY};

const DEFAULT_BASE_URL: &str = "https://www.edsm.net/api-v1/";
const USER_AGENT: &str = "mining-route-scanner/1.0";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum EdsmError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("http request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("could not resolve coordinates for {0}")]
    Unresolved(String),
}

#[derive(Clone)]
pub struct EdsmClient {
    http: Client,
    base_url: Url,
    cache: TtlCache<String, Coords>,
}

impl EdsmClient {
    pub fn new() -> Result<Self, EdsmError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base: &str) -> Result<Self, EdsmError> {
        let base_url = Url::parse(base)?;
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_url,
            cache: TtlCache::new(COORDINATES_TTL),
        })
    }

    /// Resolve a system name to coordinates. The returned record carries
    /// the time the coordinates were actually fetched, which may predate
    /// the call when the cache answers.
    pub async fn resolve_coordinates(&self, system: &str) -> Result<ResolvedCoords, EdsmError> {
        let payload = self
            .cache
            .get_or_fetch(system.to_string(), || {
                with_retry(DEFAULT_ATTEMPTS, DEFAULT_BASE_DELAY, || {
                    self.fetch_coordinates(system)
                })
            })
            .await?;
        debug!(system, status = ?payload.status, "resolved coordinates");
        Ok(ResolvedCoords::new(payload.value, payload.fetched_at))
    }

    async fn fetch_coordinates(&self, system: &str) -> Result<Coords, EdsmError> {
        let mut url = self.base_url.join("system")?;
        url.query_pairs_mut()
            .append_pair("coords", "1")
            .append_pair("sysname", system);

        let response = self.http.get(url).send().await?.error_for_status()?;
        let value: serde_json::Value = response.json().await?;

        parse_system_coords(value).ok_or_else(|| EdsmError::Unresolved(system.to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct SystemDto {
    #[serde(default)]
    coords: Option<CoordsDto>,
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

/// EDSM answers either a bare system object or a one-element array.
fn parse_system_coords(value: serde_json::Value) -> Option<Coords> {
    if let Ok(dto) = serde_json::from_value::<SystemDto>(value.clone()) {
        if let Some(coords) = dto.coords {
            return Some(coords.into());
        }
    }

    if let Ok(list) = serde_json::from_value::<Vec<SystemDto>>(value) {
        return list.into_iter().find_map(|dto| dto.coords.map(Coords::from));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_object_payload() {
        let value = serde_json::json!({
            "name": "Sol",
            "coords": { "x": 0.0, "y": 0.0, "z": 0.0 }
        });
        assert_eq!(parse_system_coords(value), Some(Coords::new(0.0, 0.0, 0.0)));
    }

    #[test]
    fn parses_single_element_array_payload() {
        let value = serde_json::json!([
            { "name": "Deciat", "coords": { "x": 122.625, "y": -0.8125, "z": -47.28125 } }
        ]);
        assert_eq!(
            parse_system_coords(value),
            Some(Coords::new(122.625, -0.8125, -47.28125))
        );
    }

    #[test]
    fn missing_coords_is_unresolved() {
        assert_eq!(parse_system_coords(serde_json::json!({ "name": "Sol" })), None);
        assert_eq!(parse_system_coords(serde_json::json!([])), None);
        assert_eq!(parse_system_coords(serde_json::json!(null)), None);
    }
}

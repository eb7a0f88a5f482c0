//! Freshness gate: decides whether a data record is still usable.

use std::time::{Duration, SystemTime};

/// No record is usable past this age, regardless of its kind.
pub const ABSOLUTE_MAX_AGE: Duration = Duration::from_secs(12 * 60 * 60);

/// The three record kinds the gate distinguishes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordKind {
    Coordinates,
    Hotspot,
    Price,
}

impl RecordKind {
    pub fn label(&self) -> &'static str {
        match self {
            RecordKind::Coordinates => "coordinates",
            RecordKind::Hotspot => "hotspot",
            RecordKind::Price => "price",
        }
    }
}

/// Per-kind maximum record ages. Each threshold is clamped by
/// [`ABSOLUTE_MAX_AGE`]; the defaults make the ceiling the binding
/// constraint for every kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FreshnessPolicy {
    pub coordinates_max_age: Duration,
    pub hotspot_max_age: Duration,
    pub price_max_age: Duration,
}

impl Default for FreshnessPolicy {
    fn default() -> Self {
        Self {
            coordinates_max_age: ABSOLUTE_MAX_AGE,
            hotspot_max_age: ABSOLUTE_MAX_AGE,
            price_max_age: ABSOLUTE_MAX_AGE,
        }
    }
}

impl FreshnessPolicy {
    pub fn max_age(&self, kind: RecordKind) -> Duration {
        let configured = match kind {
            RecordKind::Coordinates => self.coordinates_max_age,
            RecordKind::Hotspot => self.hotspot_max_age,
            RecordKind::Price => self.price_max_age,
        };
        configured.min(ABSOLUTE_MAX_AGE)
    }

    /// True when the record is young enough to use. Deterministic for a
    /// given `now`; a timestamp from the future counts as fresh.
    pub fn is_fresh(&self, now: SystemTime, timestamp: SystemTime, kind: RecordKind) -> bool {
        is_fresh(now, timestamp, self.max_age(kind))
    }
}

/// Age check against a single threshold. No side effects.
pub fn is_fresh(now: SystemTime, timestamp: SystemTime, max_age: Duration) -> bool {
    match now.duration_since(timestamp) {
        Ok(age) => age <= max_age,
        // Clock skew: the record claims to be from the future.
        Err(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000)
    }

    #[test]
    fn record_within_threshold_is_fresh() {
        let ts = now() - Duration::from_secs(60);
        assert!(is_fresh(now(), ts, Duration::from_secs(120)));
    }

    #[test]
    fn record_past_threshold_is_stale() {
        let ts = now() - Duration::from_secs(121);
        assert!(!is_fresh(now(), ts, Duration::from_secs(120)));
    }

    #[test]
    fn exact_threshold_age_still_passes() {
        let ts = now() - Duration::from_secs(120);
        assert!(is_fresh(now(), ts, Duration::from_secs(120)));
    }

    #[test]
    fn future_timestamp_counts_as_fresh() {
        let ts = now() + Duration::from_secs(30);
        assert!(is_fresh(now(), ts, Duration::from_secs(0)));
    }

    #[test]
    fn ceiling_clamps_generous_kind_threshold() {
        let policy = FreshnessPolicy {
            hotspot_max_age: Duration::from_secs(48 * 60 * 60),
            ..FreshnessPolicy::default()
        };
        let thirteen_hours_old = now() - Duration::from_secs(13 * 60 * 60);
        assert!(!policy.is_fresh(now(), thirteen_hours_old, RecordKind::Hotspot));
    }

    #[test]
    fn kinds_use_independent_thresholds() {
        let policy = FreshnessPolicy {
            price_max_age: Duration::from_secs(2 * 60),
            ..FreshnessPolicy::default()
        };
        let five_minutes_old = now() - Duration::from_secs(5 * 60);
        assert!(!policy.is_fresh(now(), five_minutes_old, RecordKind::Price));
        assert!(policy.is_fresh(now(), five_minutes_old, RecordKind::Hotspot));
        assert!(policy.is_fresh(now(), five_minutes_old, RecordKind::Coordinates));
    }
}

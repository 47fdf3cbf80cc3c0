//! Dashboard statistics: the optional-field wire snapshot and its resolved form.
//!
//! DESIGN
//! ======
//! The server may omit any field (or send `null`). `StatsSnapshot` keeps that
//! shape verbatim; `StatsSnapshot::resolve` is the single place where missing
//! fields are filled from a canonical default record, one field at a time.
//! Views only ever see `DashboardStats`, which has no optional fields.
//!
//! Decoding is per field: a value of the wrong shape (a string, a negative
//! or fractional count, a non-object `api_usage`) reads as absent for that
//! field alone and never fails the snapshot as a whole.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// =============================================================================
// WIRE SNAPSHOT
// =============================================================================

/// Stats as returned by `GET /api/admin/stats`. Every field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_users: Option<u64>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub active_users_7d: Option<u64>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub insights_today: Option<u64>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub notifications_sent_today: Option<u64>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_transactions: Option<u64>,
    #[serde(default, deserialize_with = "lenient_api_usage")]
    pub api_usage: Option<ApiUsageSnapshot>,
}

/// Nested `api_usage` object of the wire snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiUsageSnapshot {
    #[serde(default, deserialize_with = "lenient_cost")]
    pub estimated_cost: Option<f64>,
}

// =============================================================================
// LENIENT FIELD DECODING
// =============================================================================

/// 2^64, the first float past `u64::MAX`.
const U64_LIMIT: f64 = 18_446_744_073_709_551_616.0;

fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(count_from))
}

fn lenient_cost<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(Value::as_f64).filter(|c| c.is_finite()))
}

fn lenient_api_usage<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<ApiUsageSnapshot>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

/// A non-negative whole number, whether sent as `3` or `3.0`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::float_cmp)]
fn count_from(value: &Value) -> Option<u64> {
    if let Some(n) = value.as_u64() {
        return Some(n);
    }
    let f = value.as_f64()?;
    if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f < U64_LIMIT {
        Some(f as u64)
    } else {
        None
    }
}

impl StatsSnapshot {
    /// Merge against `defaults`, taking each field from the snapshot when
    /// present and from `defaults` otherwise.
    #[must_use]
    pub fn resolve(&self, defaults: &DashboardStats) -> DashboardStats {
        let estimated_cost = self
            .api_usage
            .as_ref()
            .and_then(|u| u.estimated_cost)
            .filter(|c| c.is_finite())
            .unwrap_or(defaults.api_usage.estimated_cost);

        DashboardStats {
            total_users: self.total_users.unwrap_or(defaults.total_users),
            active_users_7d: self.active_users_7d.unwrap_or(defaults.active_users_7d),
            insights_today: self.insights_today.unwrap_or(defaults.insights_today),
            notifications_sent_today: self
                .notifications_sent_today
                .unwrap_or(defaults.notifications_sent_today),
            total_transactions: self.total_transactions.unwrap_or(defaults.total_transactions),
            api_usage: ApiUsage { estimated_cost },
        }
    }
}

// =============================================================================
// RESOLVED STATS
// =============================================================================

/// Fully-populated stats, safe to render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DashboardStats {
    pub total_users: u64,
    pub active_users_7d: u64,
    pub insights_today: u64,
    pub notifications_sent_today: u64,
    pub total_transactions: u64,
    pub api_usage: ApiUsage,
}

/// Resolved `api_usage` block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApiUsage {
    /// Estimated API spend in dollars.
    pub estimated_cost: f64,
}

impl DashboardStats {
    /// The canonical all-zero record used for missing fields and failed loads.
    pub const FALLBACK: Self = Self {
        total_users: 0,
        active_users_7d: 0,
        insights_today: 0,
        notifications_sent_today: 0,
        total_transactions: 0,
        api_usage: ApiUsage { estimated_cost: 0.0 },
    };
}

impl Default for DashboardStats {
    fn default() -> Self {
        Self::FALLBACK
    }
}

impl From<StatsSnapshot> for DashboardStats {
    fn from(snapshot: StatsSnapshot) -> Self {
        snapshot.resolve(&Self::FALLBACK)
    }
}

#[cfg(test)]
#[path = "stats_test.rs"]
mod tests;

//! Stats dashboard view: loader wiring and card rendering.
//!
//! The dashboard is the one protected view in the console. It mounts a
//! `ViewDataLoader<DashboardStats>` over `GET /api/admin/stats` and renders
//! four cards from whatever the loader exposes: the indicator while loading,
//! resolved stats once loaded, the all-zero fallback after a failure.

use std::fmt::Write;
use std::sync::Arc;

use crate::net::api::AdminApi;
use crate::state::loader::{FetchFailure, ViewDataLoader, ViewState};
use crate::state::stats::DashboardStats;

pub const LOADING_TEXT: &str = "Loading stats...";

/// Build the dashboard loader for a session token.
pub fn stats_loader<A>(api: Arc<A>, token: String) -> ViewDataLoader<DashboardStats>
where
    A: AdminApi + 'static,
{
    ViewDataLoader::new("dashboard", DashboardStats::FALLBACK, move || {
        let api = Arc::clone(&api);
        let token = token.clone();
        async move {
            api.stats(&token)
                .await
                .map(DashboardStats::from)
                .map_err(FetchFailure::from)
        }
    })
}

// =============================================================================
// CARDS
// =============================================================================

/// One headline metric with its caption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatCard {
    pub title: &'static str,
    pub value: String,
    pub caption: String,
}

/// The four headline cards, in display order.
#[must_use]
pub fn cards(stats: &DashboardStats) -> [StatCard; 4] {
    [
        StatCard {
            title: "Total Users",
            value: stats.total_users.to_string(),
            caption: format!("{} active in last 7 days", stats.active_users_7d),
        },
        StatCard {
            title: "AI Insights Today",
            value: stats.insights_today.to_string(),
            caption: format!("{} API cost", format_cost(stats.api_usage.estimated_cost)),
        },
        StatCard {
            title: "Notifications",
            value: stats.notifications_sent_today.to_string(),
            caption: "Sent today".to_owned(),
        },
        StatCard {
            title: "Transactions",
            value: format_thousands(stats.total_transactions),
            caption: "All time".to_owned(),
        },
    ]
}

/// Render a dashboard view state as plain text.
#[must_use]
pub fn render(view: &ViewState<DashboardStats>) -> String {
    let stats = match view {
        ViewState::Loading => return LOADING_TEXT.to_owned(),
        ViewState::Ready(stats) => stats,
    };

    let mut out = String::new();
    for card in cards(stats) {
        let _ = writeln!(out, "{:<18} {:>12}  {}", card.title, card.value, card.caption);
    }
    out
}

/// Dollar amount with three decimals, e.g. `$0.000`.
#[must_use]
pub fn format_cost(cost: f64) -> String {
    format!("${cost:.3}")
}

/// Integer with comma thousands separators, e.g. `1,234,567`.
#[must_use]
pub fn format_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod tests;

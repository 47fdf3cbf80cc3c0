use super::*;

fn decode(json: &str) -> StatsSnapshot {
    serde_json::from_str(json).unwrap()
}

#[test]
fn empty_object_resolves_to_fallback() {
    let stats = DashboardStats::from(decode("{}"));
    assert_eq!(stats, DashboardStats::FALLBACK);
}

#[test]
fn single_field_defaults_the_rest() {
    let stats = DashboardStats::from(decode(r#"{"total_users":120}"#));
    assert_eq!(stats.total_users, 120);
    assert_eq!(stats.active_users_7d, 0);
    assert_eq!(stats.insights_today, 0);
    assert_eq!(stats.notifications_sent_today, 0);
    assert_eq!(stats.total_transactions, 0);
    assert!(stats.api_usage.estimated_cost.abs() < f64::EPSILON);
}

#[test]
fn each_field_defaults_independently() {
    let stats = DashboardStats::from(decode(
        r#"{"active_users_7d":7,"notifications_sent_today":null,"total_transactions":9001}"#,
    ));
    assert_eq!(stats.total_users, 0);
    assert_eq!(stats.active_users_7d, 7);
    assert_eq!(stats.notifications_sent_today, 0);
    assert_eq!(stats.total_transactions, 9001);
}

#[test]
fn nested_api_usage_defaults_when_inner_field_missing() {
    let stats = DashboardStats::from(decode(r#"{"api_usage":{}}"#));
    assert!(stats.api_usage.estimated_cost.abs() < f64::EPSILON);

    let stats = DashboardStats::from(decode(r#"{"api_usage":{"estimated_cost":1.2345}}"#));
    assert!((stats.api_usage.estimated_cost - 1.2345).abs() < f64::EPSILON);
}

#[test]
fn full_snapshot_is_taken_verbatim() {
    let stats = DashboardStats::from(decode(
        r#"{
            "total_users": 5,
            "active_users_7d": 4,
            "insights_today": 3,
            "notifications_sent_today": 2,
            "total_transactions": 1,
            "api_usage": { "estimated_cost": 0.5 }
        }"#,
    ));
    assert_eq!(
        stats,
        DashboardStats {
            total_users: 5,
            active_users_7d: 4,
            insights_today: 3,
            notifications_sent_today: 2,
            total_transactions: 1,
            api_usage: ApiUsage { estimated_cost: 0.5 },
        }
    );
}

#[test]
fn resolve_uses_supplied_defaults() {
    let defaults = DashboardStats { total_users: 99, ..DashboardStats::FALLBACK };
    let stats = decode(r#"{"insights_today":1}"#).resolve(&defaults);
    assert_eq!(stats.total_users, 99);
    assert_eq!(stats.insights_today, 1);
}

#[test]
fn unknown_fields_are_ignored() {
    let stats = DashboardStats::from(decode(r#"{"total_users":1,"new_metric":42}"#));
    assert_eq!(stats.total_users, 1);
}

// =============================================================================
// Lenient per-field decoding
// =============================================================================

#[test]
fn whole_float_count_is_accepted() {
    let stats = DashboardStats::from(decode(r#"{"total_users":120,"insights_today":3.0}"#));
    assert_eq!(stats.total_users, 120);
    assert_eq!(stats.insights_today, 3);
}

#[test]
fn fractional_count_defaults_only_that_field() {
    let stats = DashboardStats::from(decode(r#"{"total_users":120,"insights_today":2.5}"#));
    assert_eq!(stats.total_users, 120);
    assert_eq!(stats.insights_today, 0);
}

#[test]
fn negative_count_defaults_only_that_field() {
    let stats = DashboardStats::from(decode(r#"{"total_users":120,"active_users_7d":-1}"#));
    assert_eq!(stats.total_users, 120);
    assert_eq!(stats.active_users_7d, 0);
}

#[test]
fn string_count_defaults_only_that_field() {
    let stats = DashboardStats::from(decode(r#"{"total_users":120,"total_transactions":"lots"}"#));
    assert_eq!(stats.total_users, 120);
    assert_eq!(stats.total_transactions, 0);
}

#[test]
fn malformed_api_usage_defaults_only_cost() {
    let stats = DashboardStats::from(decode(r#"{"total_users":120,"api_usage":"n/a"}"#));
    assert_eq!(stats.total_users, 120);
    assert!(stats.api_usage.estimated_cost.abs() < f64::EPSILON);

    let stats = DashboardStats::from(decode(
        r#"{"notifications_sent_today":4,"api_usage":{"estimated_cost":"0.2"}}"#,
    ));
    assert_eq!(stats.notifications_sent_today, 4);
    assert!(stats.api_usage.estimated_cost.abs() < f64::EPSILON);
}

#[test]
fn integer_cost_is_accepted() {
    let stats = DashboardStats::from(decode(r#"{"api_usage":{"estimated_cost":2}}"#));
    assert!((stats.api_usage.estimated_cost - 2.0).abs() < f64::EPSILON);
}

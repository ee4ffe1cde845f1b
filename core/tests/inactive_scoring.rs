use qmseg_core::{config::VariantConfig, inactive::InactiveRule, item::Item};

fn inactive_item(status: &str, age_days: f64) -> Item {
    Item {
        item_id: "9001".into(),
        status: status.into(),
        department: Some("Kaffe".into()),
        item_type: Some("Bønner".into()),
        volume: 0.0,
        monetary_value: 0.0,
        activity_count: 0,
        age_days,
    }
}

#[test]
fn discontinued_wins_regardless_of_age() {
    let rule = VariantConfig::coffee().inactive;
    assert_eq!(rule.score(&inactive_item("Er udgået", 500.0)), 0);
    assert_eq!(rule.score(&inactive_item("Er udgået", 3.0)), 0);
}

#[test]
fn coffee_rule_splits_stale_and_fresh_at_90_days() {
    let rule = VariantConfig::coffee().inactive;
    assert_eq!(rule.score(&inactive_item("Aktiv", 95.0)), 1);
    assert_eq!(rule.score(&inactive_item("Aktiv", 50.0)), 2);
    // Strictly greater than the threshold is stale.
    assert_eq!(rule.score(&inactive_item("Aktiv", 90.0)), 2);
}

#[test]
fn status_blind_variant_ignores_discontinued() {
    let rule = VariantConfig::coffee_by_department().inactive;
    assert_eq!(rule.score(&inactive_item("Er udgået", 500.0)), 0);
    assert_eq!(rule.score(&inactive_item("Er udgået", 10.0)), 1);
    assert_eq!(rule.score(&inactive_item("Aktiv", 95.0)), 0);
}

#[test]
fn status_match_is_exact() {
    let rule = InactiveRule {
        discontinued_statuses: vec!["Er udgået".into()],
        discontinued_code: Some(0),
        age_threshold_days: 30.0,
        stale_code: 1,
        fresh_code: 2,
    };
    assert_eq!(rule.score(&inactive_item("er udgået", 10.0)), 2);
    assert_eq!(rule.codes(), vec![0, 1, 2]);
}

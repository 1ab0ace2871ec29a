use std::collections::BTreeMap;

use axum_cafe_api::config::LoyaltyConfig;
use axum_cafe_api::dto::products::CustomizationInput;
use axum_cafe_api::models::OrderStatus;
use axum_cafe_api::services::gift_card_service::generate_code;
use axum_cafe_api::services::loyalty_service::redemption_code;
use axum_cafe_api::services::product_service::resolve_price_impact;
use uuid::Uuid;

#[test]
fn order_status_round_trips_through_strings() {
    for status in OrderStatus::ALL {
        let parsed: OrderStatus = status.as_str().parse().unwrap();
        assert_eq!(parsed, status);
    }
    assert!("shipped".parse::<OrderStatus>().is_err());
}

#[test]
fn only_pending_and_processing_are_active() {
    assert!(OrderStatus::Pending.is_active());
    assert!(OrderStatus::Processing.is_active());
    assert!(!OrderStatus::Completed.is_active());
    assert!(!OrderStatus::Cancelled.is_active());
}

#[test]
fn gift_card_codes_are_short_and_uppercase() {
    let code = generate_code();
    assert_eq!(code.len(), 8);
    assert!(code.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
}

#[test]
fn redemption_codes_carry_the_reward_and_user() {
    let user_id = Uuid::new_v4();
    let code = redemption_code(3, user_id);
    assert!(code.starts_with("REWARD3-"));
    assert!(code.contains(&user_id.simple().to_string()[..8]));
}

#[test]
fn default_rewards_catalog_is_fixed() {
    let config = LoyaltyConfig::default();
    assert_eq!(config.points_per_currency_unit, 10);
    assert_eq!(config.rewards.len(), 4);
    assert_eq!(config.find_reward(1).unwrap().points_required, 100);
    assert!(config.find_reward(99).is_none());
}

#[test]
fn empty_price_impact_defaults_to_zero_deltas() {
    let input = CustomizationInput {
        name: "Size".into(),
        options: vec!["Small".into(), "Large".into()],
        price_impact: BTreeMap::new(),
    };
    let impact = resolve_price_impact(&input).unwrap();
    assert_eq!(impact.get("Small"), Some(&0));
    assert_eq!(impact.get("Large"), Some(&0));
}

#[test]
fn mismatched_price_impact_keys_are_rejected() {
    let mut price_impact = BTreeMap::new();
    price_impact.insert("Medium".to_string(), 50);

    let input = CustomizationInput {
        name: "Size".into(),
        options: vec!["Small".into(), "Large".into()],
        price_impact,
    };
    assert!(resolve_price_impact(&input).is_err());
}

#[test]
fn customizations_need_at_least_one_option() {
    let input = CustomizationInput {
        name: "Size".into(),
        options: vec![],
        price_impact: BTreeMap::new(),
    };
    assert!(resolve_price_impact(&input).is_err());
}

use axum_cafe_api::services::order_service::points_discount;

// Fixed rate: 10 points = 1 currency unit of discount. Amounts in cents.
const RATE: i64 = 10;

#[test]
fn discount_caps_at_the_balance() {
    // $10.00 cart, 35 points in the bank: all 35 points apply for $3.50 off.
    let (points_to_use, discount) = points_discount(1000, 35, RATE);
    assert_eq!(points_to_use, 35);
    assert_eq!(discount, 350);
    assert_eq!(1000 - discount, 650);
}

#[test]
fn discount_caps_at_the_order_total() {
    // A huge balance can never push the total below zero.
    let (points_to_use, discount) = points_discount(1000, 10_000, RATE);
    assert_eq!(points_to_use, 100);
    assert_eq!(discount, 1000);
}

#[test]
fn zero_balance_gets_no_discount() {
    assert_eq!(points_discount(1000, 0, RATE), (0, 0));
}

#[test]
fn zero_total_gets_no_discount() {
    assert_eq!(points_discount(0, 500, RATE), (0, 0));
}

#[test]
fn sub_unit_totals_floor_the_redeemable_points() {
    // $6.57 cart: at most floor(65.7) = 65 points can be applied.
    let (points_to_use, discount) = points_discount(657, 1_000, RATE);
    assert_eq!(points_to_use, 65);
    assert_eq!(discount, 650);
    assert!(657 - discount >= 0);
}

#[test]
fn exact_balance_drains_to_zero() {
    let (points_to_use, discount) = points_discount(2000, 200, RATE);
    assert_eq!(points_to_use, 200);
    assert_eq!(discount, 2000);
}

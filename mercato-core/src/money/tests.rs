use super::*;

fn d(s: &str) -> Decimal {
    s.parse().unwrap()
}

#[test]
fn test_service_fee_rate() {
    assert_eq!(SERVICE_FEE_RATE, d("0.045"));
}

#[test]
fn test_service_fee_on_round_subtotal() {
    assert_eq!(service_fee(d("100.00")), d("4.5"));
    assert_eq!(round_money(service_fee(d("100.00"))), d("4.50"));
}

#[test]
fn test_service_fee_exact_before_rounding() {
    // 149.99 * 0.045 = 6.74955
    let fee = service_fee(d("149.99"));
    assert_eq!(fee, d("6.74955"));
    assert_eq!(round_money(fee), d("6.75"));
}

#[test]
fn test_tax_is_always_zero() {
    assert!(tax(d("0")).is_zero());
    assert!(tax(d("999.99")).is_zero());
}

#[test]
fn test_round_money_half_away_from_zero() {
    assert_eq!(round_money(d("10.005")), d("10.01"));
    assert_eq!(round_money(d("10.004")), d("10.00"));
    assert_eq!(round_money(d("-10.005")), d("-10.01"));
}

#[test]
fn test_percentage_of() {
    assert_eq!(percentage_of(d("250"), d("10")), d("25"));
    assert_eq!(percentage_of(d("99.99"), d("33")), d("32.9967"));
}

#[test]
fn test_f64_conversions() {
    assert_eq!(to_decimal(12.5), d("12.5"));
    assert_eq!(to_decimal(f64::NAN), Decimal::ZERO);
    assert_eq!(to_f64(d("6.74955")), 6.75);
}

#[test]
fn test_format_money() {
    assert_eq!(format_money(d("4.5")), "4.50");
    assert_eq!(format_money(d("6.74955")), "6.75");
    assert_eq!(format_money(Decimal::ZERO), "0.00");
}

#[test]
fn test_parse_money() {
    assert_eq!(parse_money(" 2.99 ").unwrap(), d("2.99"));
    let err = parse_money("abc").unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidPrice);
}

#[test]
fn test_validate_price_bounds() {
    assert!(validate_price(d("0"), "price").is_ok());
    assert!(validate_price(d("12.50"), "price").is_ok());
    assert!(validate_price(MAX_PRICE, "price").is_ok());

    let err = validate_price(d("-0.01"), "price").unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidPrice);

    let err = validate_price(d("1000000.01"), "price").unwrap_err();
    assert!(err.message.contains("exceeds maximum"));
}

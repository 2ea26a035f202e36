use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::HashMap;

use crate::domain::catalog::Product;
use crate::domain::promo::DiscountEffect;

use super::errors::OrderError;
use super::value_objects::{OrderItem, OrderPricing};

// ============================================================================
// Order Pricing - exact decimal arithmetic
// ============================================================================
//
// subtotal = sum(price * quantity), then the discount effect, then a single
// rounding step to currency precision. Invariant: subtotal = discount + total.
//
// ============================================================================

pub const CURRENCY_DP: u32 = 2;

fn to_currency(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(CURRENCY_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// The only validation failure raised after catalog lookups: prices are
/// needed to detect it.
fn overflow() -> OrderError {
    OrderError::Validation(vec![
        "priced order exceeds the supported amount range".to_string(),
    ])
}

/// Sum of price x quantity over every requested line.
///
/// `products` must hold a match for every item; resolution guarantees that.
pub fn subtotal(items: &[OrderItem], products: &HashMap<&str, &Product>) -> Result<Decimal, OrderError> {
    items.iter().try_fold(Decimal::ZERO, |acc, item| {
        let product = products
            .get(item.product_id.as_str())
            .ok_or_else(|| OrderError::ProductNotFound(vec![item.product_id.clone()]))?;

        product
            .price
            .checked_mul(Decimal::from(item.quantity))
            .and_then(|line| acc.checked_add(line))
            .ok_or_else(overflow)
    })
}

/// Apply an optional discount to an exact subtotal.
pub fn price(
    subtotal: Decimal,
    effect: Option<&DiscountEffect>,
    coupon_code: Option<String>,
) -> Result<OrderPricing, OrderError> {
    let subtotal = to_currency(subtotal);

    let total = match effect {
        None => subtotal,
        Some(DiscountEffect::PercentOff(percent)) => {
            let keep = (Decimal::ONE_HUNDRED - *percent) / Decimal::ONE_HUNDRED;
            to_currency(subtotal.checked_mul(keep).ok_or_else(overflow)?)
        }
        Some(DiscountEffect::AmountOff(amount)) => {
            to_currency(subtotal.checked_sub(*amount).ok_or_else(overflow)?)
        }
    };
    // 0 <= total <= subtotal whatever effect was passed in.
    let total = total.clamp(Decimal::ZERO, subtotal.max(Decimal::ZERO));

    Ok(OrderPricing {
        subtotal,
        discount: subtotal - total,
        total,
        coupon_code,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn menu() -> Vec<Product> {
        vec![
            Product::new("1", "Chicken Waffle", dec!(9.99), "mains"),
            Product::new("2", "Lemonade", dec!(2.50), "drinks"),
            Product::new("3", "Fries", dec!(0.10), "sides"),
        ]
    }

    fn index(products: &[Product]) -> HashMap<&str, &Product> {
        products.iter().map(|p| (p.id.as_str(), p)).collect()
    }

    #[test]
    fn test_subtotal_is_exact() {
        let products = menu();
        let items = vec![
            OrderItem::new("1", 2),
            OrderItem::new("2", 1),
            OrderItem::new("1", 1),
        ];

        assert_eq!(subtotal(&items, &index(&products)).unwrap(), dec!(32.47));
    }

    #[test]
    fn test_no_binary_float_drift() {
        let products = menu();
        let items: Vec<_> = (0..10).map(|_| OrderItem::new("3", 3)).collect();

        // 0.1 * 30 in f64 accumulates to 3.0000000000000004
        assert_eq!(subtotal(&items, &index(&products)).unwrap(), dec!(3.00));
    }

    #[test]
    fn test_subtotal_overflow_is_reported() {
        let products = vec![Product::new("1", "Gold Waffle", Decimal::MAX, "mains")];
        let items = vec![OrderItem::new("1", 2)];

        match subtotal(&items, &index(&products)) {
            Err(OrderError::Validation(violations)) => {
                assert_eq!(violations, vec!["priced order exceeds the supported amount range"]);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_ten_percent_off() {
        let pricing = price(dec!(19.98), Some(&DiscountEffect::PercentOff(dec!(10))), Some("SAVE10".into())).unwrap();

        assert_eq!(pricing.total, dec!(17.98));
        assert_eq!(pricing.discount, dec!(2.00));
        assert_eq!(pricing.subtotal, pricing.discount + pricing.total);
        assert_eq!(pricing.coupon_code.as_deref(), Some("SAVE10"));
    }

    #[test]
    fn test_percent_rounding_is_midpoint_away_from_zero() {
        let pricing = price(dec!(0.05), Some(&DiscountEffect::PercentOff(dec!(10))), None).unwrap();
        assert_eq!(pricing.total, dec!(0.05));

        let pricing = price(dec!(0.15), Some(&DiscountEffect::PercentOff(dec!(10))), None).unwrap();
        assert_eq!(pricing.total, dec!(0.14));
    }

    #[test]
    fn test_amount_off_never_goes_negative() {
        let pricing = price(dec!(12.00), Some(&DiscountEffect::AmountOff(dec!(5))), None).unwrap();
        assert_eq!(pricing.total, dec!(7.00));

        let pricing = price(dec!(3.00), Some(&DiscountEffect::AmountOff(dec!(5))), None).unwrap();
        assert_eq!(pricing.total, dec!(0));
        assert_eq!(pricing.discount, dec!(3.00));
    }

    #[test]
    fn test_out_of_range_effects_stay_within_subtotal() {
        let pricing = price(dec!(10.00), Some(&DiscountEffect::PercentOff(dec!(150))), None).unwrap();
        assert_eq!(pricing.total, dec!(0));
        assert_eq!(pricing.discount, dec!(10.00));

        let pricing = price(dec!(10.00), Some(&DiscountEffect::PercentOff(dec!(-20))), None).unwrap();
        assert_eq!(pricing.total, dec!(10.00));
        assert_eq!(pricing.discount, dec!(0));

        let pricing = price(dec!(10.00), Some(&DiscountEffect::AmountOff(dec!(-5))), None).unwrap();
        assert_eq!(pricing.total, dec!(10.00));
        assert_eq!(pricing.discount, dec!(0));
    }

    #[test]
    fn test_full_discount() {
        let pricing = price(dec!(8.40), Some(&DiscountEffect::PercentOff(dec!(100))), None).unwrap();
        assert_eq!(pricing.total, dec!(0));
        assert_eq!(pricing.discount, dec!(8.40));
    }

    #[test]
    fn test_no_discount_keeps_subtotal() {
        let pricing = price(dec!(4.5), None, None).unwrap();
        assert_eq!(pricing.total, dec!(4.50));
        assert_eq!(pricing.discount, Decimal::ZERO);
    }
}

//! Order history aggregation

use rust_decimal::Decimal;
use serde::Serialize;
use shared::models::{OrderRecord, ServiceType};
use std::collections::BTreeMap;

use crate::money::round_money;

/// Spend per service vertical
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ServiceSpend {
    pub orders: usize,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_spent: Decimal,
}

/// Aggregates over a user's order history
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OrderSummary {
    /// All orders, cancelled included
    pub order_count: usize,
    pub cancelled_count: usize,
    /// Sum over non-cancelled orders
    #[serde(with = "rust_decimal::serde::float")]
    pub total_spent: Decimal,
    /// `total_spent` / non-cancelled orders, zero without any
    #[serde(with = "rust_decimal::serde::float")]
    pub average_order_value: Decimal,
    pub by_service: BTreeMap<ServiceType, ServiceSpend>,
}

pub fn summarize_orders(orders: &[OrderRecord]) -> OrderSummary {
    let mut summary = OrderSummary {
        order_count: orders.len(),
        ..Default::default()
    };

    for order in orders {
        if order.status.is_cancelled() {
            summary.cancelled_count += 1;
            continue;
        }
        summary.total_spent += order.total_amount;
        let spend = summary.by_service.entry(order.service_type).or_default();
        spend.orders += 1;
        spend.total_spent += order.total_amount;
    }

    let counted = summary.order_count - summary.cancelled_count;
    if counted > 0 {
        summary.average_order_value = round_money(summary.total_spent / Decimal::from(counted));
    }
    summary.total_spent = round_money(summary.total_spent);
    summary
}

//! Flattening of platform order documents into relational rows.

use crate::domain::order::{Order, cents_to_units, strip_email_suffix};
use crate::domain::order_item::{OrderItem, line_total};
use crate::vtex::{ApiOrderItem, OrderDetail, OrderSummary, Total};

/// Cost components of an order, in currency units.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CostBreakdown {
    pub items: f64,
    pub discounts: f64,
    pub shipping: f64,
}

/// Pick the `Items`, `Discounts` and `Shipping` totals; absent keys count as 0.
pub fn cost_breakdown(totals: &[Total]) -> CostBreakdown {
    let cents = |key: &str| {
        totals
            .iter()
            .find(|total| total.id == key)
            .map(|total| total.value)
            .unwrap_or_default()
    };

    CostBreakdown {
        items: cents_to_units(cents("Items")),
        discounts: cents_to_units(cents("Discounts")),
        shipping: cents_to_units(cents("Shipping")),
    }
}

/// Merge an order summary with its detail document into an [`Order`] row.
pub fn order_from_api(summary: &OrderSummary, detail: &OrderDetail) -> Order {
    let costs = cost_breakdown(&detail.totals);
    let profile = detail.client_profile_data.clone().unwrap_or_default();
    let address = detail
        .shipping_data
        .as_ref()
        .and_then(|shipping| shipping.address.clone())
        .unwrap_or_default();

    Order {
        order_id: summary.order_id.clone(),
        creation_date: summary.creation_date.naive_utc(),
        client_name: summary.client_name.clone().unwrap_or_default(),
        total_value: cents_to_units(summary.total_value),
        payment_names: summary.payment_names.clone().unwrap_or_default(),
        status: summary.status.clone().unwrap_or_default(),
        status_description: summary.status_description.clone().unwrap_or_default(),
        sales_channel: summary.sales_channel.clone().unwrap_or_default(),
        origin: summary.origin.clone().unwrap_or_default(),
        order_is_complete: summary.order_is_complete,
        total_items: summary.total_items,
        hostname: summary.hostname.clone().unwrap_or_default(),
        last_change: summary.last_change.map(|changed| changed.naive_utc()),
        item_values: costs.items,
        discount_value: costs.discounts,
        shipping_value: costs.shipping,
        coupon: detail
            .marketing_data
            .as_ref()
            .and_then(|marketing| marketing.coupon.clone()),
        client_email: strip_email_suffix(profile.email.as_deref().unwrap_or_default()),
        client_id: profile.document,
        state: address.state.unwrap_or_default(),
        city: address.city.unwrap_or_default(),
    }
}

/// Stamp a platform line item with its parent order.
pub fn item_from_api(item: &ApiOrderItem, order_id: &str) -> OrderItem {
    OrderItem {
        id: item.id.clone(),
        unique_id: item.unique_id.clone(),
        product_id: item.product_id.clone(),
        order_id: order_id.to_string(),
        ean: item.ean.clone().unwrap_or_default(),
        quantity: item.quantity,
        seller: item.seller.clone(),
        name: item.name.clone(),
        ref_id: item.ref_id.clone(),
        price: item.price,
        selling_price: item.selling_price,
        seller_sku: item.seller_sku.clone(),
        measurement_unit: item.measurement_unit.clone(),
        is_gift: item.is_gift,
        total_price: line_total(item.selling_price, item.quantity),
    }
}

use serde::{Deserialize, Serialize};

/// One row of `VTEX_OrderItems`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: String,
    /// Globally unique line item identifier.
    pub unique_id: String,
    pub product_id: String,
    pub order_id: String,
    pub ean: String,
    pub quantity: i32,
    /// Seller code; `None` when the seller could not be mapped.
    pub seller: Option<String>,
    pub name: String,
    pub ref_id: Option<String>,
    pub price: f64,
    pub selling_price: f64,
    pub seller_sku: String,
    pub measurement_unit: String,
    pub is_gift: bool,
    pub total_price: f64,
}

/// Price of a line: unit selling price times quantity.
pub fn line_total(selling_price: f64, quantity: i32) -> f64 {
    selling_price * f64::from(quantity)
}

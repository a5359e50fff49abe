use diesel::prelude::*;

use crate::domain::order_item::OrderItem as DomainOrderItem;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::vtex_order_items)]
#[diesel(primary_key(unique_id))]
pub struct OrderItem {
    pub id: String,
    pub unique_id: String,
    pub product_id: String,
    pub order_id: String,
    pub ean: String,
    pub quantity: i32,
    pub seller: Option<String>,
    pub name: String,
    pub ref_id: Option<String>,
    pub price: f64,
    pub selling_price: f64,
    pub seller_sku: String,
    pub measurement_unit: String,
    pub is_gift: i32,
    pub total_price: f64,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::vtex_order_items)]
pub struct NewOrderItem<'a> {
    pub id: &'a str,
    pub unique_id: &'a str,
    pub product_id: &'a str,
    pub order_id: &'a str,
    pub ean: &'a str,
    pub quantity: i32,
    pub seller: Option<&'a str>,
    pub name: &'a str,
    pub ref_id: Option<&'a str>,
    pub price: f64,
    pub selling_price: f64,
    pub seller_sku: &'a str,
    pub measurement_unit: &'a str,
    pub is_gift: i32,
    pub total_price: f64,
}

impl From<OrderItem> for DomainOrderItem {
    fn from(value: OrderItem) -> Self {
        Self {
            id: value.id,
            unique_id: value.unique_id,
            product_id: value.product_id,
            order_id: value.order_id,
            ean: value.ean,
            quantity: value.quantity,
            seller: value.seller,
            name: value.name,
            ref_id: value.ref_id,
            price: value.price,
            selling_price: value.selling_price,
            seller_sku: value.seller_sku,
            measurement_unit: value.measurement_unit,
            is_gift: value.is_gift != 0,
            total_price: value.total_price,
        }
    }
}

impl<'a> From<&'a DomainOrderItem> for NewOrderItem<'a> {
    fn from(value: &'a DomainOrderItem) -> Self {
        Self {
            id: &value.id,
            unique_id: &value.unique_id,
            product_id: &value.product_id,
            order_id: &value.order_id,
            ean: &value.ean,
            quantity: value.quantity,
            seller: value.seller.as_deref(),
            name: &value.name,
            ref_id: value.ref_id.as_deref(),
            price: value.price,
            selling_price: value.selling_price,
            seller_sku: &value.seller_sku,
            measurement_unit: &value.measurement_unit,
            is_gift: i32::from(value.is_gift),
            total_price: value.total_price,
        }
    }
}

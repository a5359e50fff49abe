use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::order::Order as DomainOrder;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::vtex_orders)]
#[diesel(primary_key(order_id))]
pub struct Order {
    pub order_id: String,
    pub creation_date: NaiveDateTime,
    pub client_name: String,
    pub total_value: f64,
    pub payment_names: String,
    pub status: String,
    pub status_description: String,
    pub sales_channel: String,
    pub origin: String,
    pub order_is_complete: i32,
    pub total_items: i32,
    pub hostname: String,
    pub last_change: Option<NaiveDateTime>,
    pub item_values: f64,
    pub discount_value: f64,
    pub shipping_value: f64,
    pub coupon: Option<String>,
    pub client_email: String,
    pub client_id: Option<String>,
    pub state: String,
    pub city: String,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::vtex_orders)]
pub struct NewOrder<'a> {
    pub order_id: &'a str,
    pub creation_date: NaiveDateTime,
    pub client_name: &'a str,
    pub total_value: f64,
    pub payment_names: &'a str,
    pub status: &'a str,
    pub status_description: &'a str,
    pub sales_channel: &'a str,
    pub origin: &'a str,
    pub order_is_complete: i32,
    pub total_items: i32,
    pub hostname: &'a str,
    pub last_change: Option<NaiveDateTime>,
    pub item_values: f64,
    pub discount_value: f64,
    pub shipping_value: f64,
    pub coupon: Option<&'a str>,
    pub client_email: &'a str,
    pub client_id: Option<&'a str>,
    pub state: &'a str,
    pub city: &'a str,
}

impl From<Order> for DomainOrder {
    fn from(value: Order) -> Self {
        Self {
            order_id: value.order_id,
            creation_date: value.creation_date,
            client_name: value.client_name,
            total_value: value.total_value,
            payment_names: value.payment_names,
            status: value.status,
            status_description: value.status_description,
            sales_channel: value.sales_channel,
            origin: value.origin,
            order_is_complete: value.order_is_complete != 0,
            total_items: value.total_items,
            hostname: value.hostname,
            last_change: value.last_change,
            item_values: value.item_values,
            discount_value: value.discount_value,
            shipping_value: value.shipping_value,
            coupon: value.coupon,
            client_email: value.client_email,
            client_id: value.client_id,
            state: value.state,
            city: value.city,
        }
    }
}

impl<'a> From<&'a DomainOrder> for NewOrder<'a> {
    fn from(value: &'a DomainOrder) -> Self {
        Self {
            order_id: &value.order_id,
            creation_date: value.creation_date,
            client_name: &value.client_name,
            total_value: value.total_value,
            payment_names: &value.payment_names,
            status: &value.status,
            status_description: &value.status_description,
            sales_channel: &value.sales_channel,
            origin: &value.origin,
            order_is_complete: i32::from(value.order_is_complete),
            total_items: value.total_items,
            hostname: &value.hostname,
            last_change: value.last_change,
            item_values: value.item_values,
            discount_value: value.discount_value,
            shipping_value: value.shipping_value,
            coupon: value.coupon.as_deref(),
            client_email: &value.client_email,
            client_id: value.client_id.as_deref(),
            state: &value.state,
            city: &value.city,
        }
    }
}

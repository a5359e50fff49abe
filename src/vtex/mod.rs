//! Client for the VTEX order management (OMS) REST API.
//!
//! Only two endpoints are consumed: the paginated order list filtered by
//! creation date and the full order document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod client;
pub mod convert;

#[cfg(test)]
pub mod mock;

pub use client::VtexClient;

/// Timestamp layout used in `creationDate` range filters.
pub const FILTER_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

pub type ApiResult<T> = Result<T, ApiError>;

/// Failures reported by [`OrdersApi`] implementations.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected response {status} {reason}: {body}")]
    Status {
        status: u16,
        reason: String,
        body: String,
    },
    #[error("invalid credential header: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}

/// Read-only access to remote orders.
pub trait OrdersApi {
    /// Fetch one page of order summaries matching `creation_date_filter`.
    fn list_orders(
        &self,
        creation_date_filter: &str,
        page: u32,
        per_page: u32,
    ) -> ApiResult<OrderListResponse>;

    /// Fetch the full document for a single order.
    fn get_order_detail(&self, order_id: &str) -> ApiResult<OrderDetail>;
}

/// Build the `f_creationDate` expression covering `[start, end]`.
pub fn creation_date_filter(start: DateTime<Utc>, end: DateTime<Utc>) -> String {
    format!(
        "creationDate:[{} TO {}]",
        start.format(FILTER_TIMESTAMP_FORMAT),
        end.format(FILTER_TIMESTAMP_FORMAT)
    )
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderListResponse {
    #[serde(default)]
    pub list: Vec<OrderSummary>,
    pub paging: Paging,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paging {
    #[serde(default)]
    pub total: u32,
    pub pages: u32,
    pub current_page: u32,
    #[serde(default)]
    pub per_page: u32,
}

/// Abbreviated order returned by the list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub order_id: String,
    pub creation_date: DateTime<Utc>,
    #[serde(default)]
    pub client_name: Option<String>,
    /// Order total in cents.
    #[serde(default)]
    pub total_value: f64,
    #[serde(default)]
    pub payment_names: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub status_description: Option<String>,
    #[serde(default)]
    pub sales_channel: Option<String>,
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(default)]
    pub order_is_complete: bool,
    #[serde(default)]
    pub total_items: i32,
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default)]
    pub last_change: Option<DateTime<Utc>>,
}

/// Full order document returned by `GET /oms/pvt/orders/{orderId}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    #[serde(default)]
    pub totals: Vec<Total>,
    #[serde(default)]
    pub marketing_data: Option<MarketingData>,
    #[serde(default)]
    pub client_profile_data: Option<ClientProfileData>,
    #[serde(default)]
    pub shipping_data: Option<ShippingData>,
    #[serde(default)]
    pub items: Vec<ApiOrderItem>,
}

/// One entry of the cost breakdown, value in cents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Total {
    pub id: String,
    #[serde(default)]
    pub value: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarketingData {
    #[serde(default)]
    pub coupon: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientProfileData {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub document: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShippingData {
    #[serde(default)]
    pub address: Option<Address>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiOrderItem {
    pub id: String,
    pub unique_id: String,
    #[serde(default)]
    pub product_id: String,
    #[serde(default)]
    pub ean: Option<String>,
    #[serde(default)]
    pub quantity: i32,
    #[serde(default)]
    pub seller: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub ref_id: Option<String>,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub selling_price: f64,
    #[serde(default)]
    pub seller_sku: String,
    #[serde(default)]
    pub measurement_unit: String,
    #[serde(default)]
    pub is_gift: bool,
}

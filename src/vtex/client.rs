use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;

use crate::config::VtexConfig;
use crate::vtex::{ApiError, ApiResult, OrderDetail, OrderListResponse, OrdersApi};

const APP_KEY_HEADER: &str = "x-vtex-api-appkey";
const APP_TOKEN_HEADER: &str = "x-vtex-api-apptoken";

/// Blocking HTTP client authenticated with an app key/token pair.
///
/// Requests are sent once; there is no retry or backoff.
pub struct VtexClient {
    base_url: String,
    client: Client,
}

impl VtexClient {
    pub fn new(config: &VtexConfig) -> ApiResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            HeaderName::from_static(APP_KEY_HEADER),
            HeaderValue::from_str(&config.app_key)?,
        );
        let mut token = HeaderValue::from_str(&config.app_token)?;
        token.set_sensitive(true);
        headers.insert(HeaderName::from_static(APP_TOKEN_HEADER), token);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            base_url: config.base_url(),
            client,
        })
    }

    fn decode<T: DeserializeOwned>(response: Response, what: &str) -> ApiResult<T> {
        let status = response.status();
        if status == StatusCode::OK {
            return Ok(response.json::<T>()?);
        }

        let reason = status.canonical_reason().unwrap_or_default().to_string();
        let body = response.text().unwrap_or_default();
        log::error!(
            "Failed to fetch {what} from API. Status Code: {} - Reason: {reason} - Error: {body}",
            status.as_u16()
        );
        Err(ApiError::Status {
            status: status.as_u16(),
            reason,
            body,
        })
    }
}

impl OrdersApi for VtexClient {
    fn list_orders(
        &self,
        creation_date_filter: &str,
        page: u32,
        per_page: u32,
    ) -> ApiResult<OrderListResponse> {
        let url = format!("{}/oms/pvt/orders", self.base_url);
        let page = page.to_string();
        let per_page = per_page.to_string();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("f_creationDate", creation_date_filter),
                ("page", page.as_str()),
                ("per_page", per_page.as_str()),
            ])
            .send()
            .inspect_err(|e| log::error!("Failed to fetch orders from API: {e}"))?;

        Self::decode(response, "orders")
    }

    fn get_order_detail(&self, order_id: &str) -> ApiResult<OrderDetail> {
        let url = format!("{}/oms/pvt/orders/{order_id}", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .inspect_err(|e| log::error!("Failed to fetch order {order_id} from API: {e}"))?;

        Self::decode(response, "order details")
    }
}

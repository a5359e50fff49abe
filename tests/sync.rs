use std::cell::RefCell;
use std::collections::HashMap;

use chrono::{TimeZone, Utc};
use serde_json::json;

use vtex_orders_etl::repository::{DieselRepository, OrderReader, OrderWriter};
use vtex_orders_etl::services::ServiceError;
use vtex_orders_etl::services::sync::run_sync;
use vtex_orders_etl::vtex::{
    ApiError, ApiResult, OrderDetail, OrderListResponse, OrderSummary, OrdersApi, Paging,
};

mod common;

use common::{at, sample_order};

/// In-memory order source serving fixed pages and details.
#[derive(Default)]
struct StubApi {
    pages: Vec<Vec<OrderSummary>>,
    details: HashMap<String, OrderDetail>,
    filters: RefCell<Vec<String>>,
}

impl StubApi {
    fn with_orders(orders: &[(&str, &str)]) -> Self {
        let mut api = StubApi::default();
        let mut page = Vec::new();
        for (order_id, created) in orders {
            page.push(summary(order_id, created));
            api.details.insert(order_id.to_string(), detail(order_id));
        }
        api.pages.push(page);
        api
    }
}

impl OrdersApi for StubApi {
    fn list_orders(
        &self,
        creation_date_filter: &str,
        page: u32,
        per_page: u32,
    ) -> ApiResult<OrderListResponse> {
        self.filters
            .borrow_mut()
            .push(creation_date_filter.to_string());
        let list = self
            .pages
            .get(page as usize - 1)
            .cloned()
            .unwrap_or_default();
        Ok(OrderListResponse {
            paging: Paging {
                total: list.len() as u32,
                pages: self.pages.len() as u32,
                current_page: page,
                per_page,
            },
            list,
        })
    }

    fn get_order_detail(&self, order_id: &str) -> ApiResult<OrderDetail> {
        self.details
            .get(order_id)
            .cloned()
            .ok_or_else(|| ApiError::Status {
                status: 404,
                reason: "Not Found".to_string(),
                body: String::new(),
            })
    }
}

fn summary(order_id: &str, created: &str) -> OrderSummary {
    serde_json::from_value(json!({
        "orderId": order_id,
        "creationDate": created,
        "clientName": "Ana Souza",
        "totalValue": 15500,
        "paymentNames": "Pix",
        "status": "invoiced",
        "statusDescription": "Faturado",
        "salesChannel": "1",
        "origin": "Marketplace",
        "orderIsComplete": true,
        "totalItems": 1,
        "hostname": "store"
    }))
    .expect("valid summary")
}

fn detail(order_id: &str) -> OrderDetail {
    serde_json::from_value(json!({
        "totals": [
            {"id": "Items", "value": 15000},
            {"id": "Shipping", "value": 500}
        ],
        "clientProfileData": {
            "email": "ana@example.com-5f1c2d",
            "document": "12345678900"
        },
        "shippingData": {"address": {"state": "SP", "city": "Campinas"}},
        "items": [{
            "id": "0",
            "uniqueId": format!("{order_id}-item-0"),
            "productId": "77",
            "quantity": 3,
            "seller": "1",
            "name": "Shampoo",
            "price": 5000,
            "sellingPrice": 5000,
            "sellerSku": "77",
            "measurementUnit": "un",
            "isGift": false
        }]
    }))
    .expect("valid detail")
}

#[test]
fn test_sync_requires_existing_watermark() {
    let test_db = common::TestDb::new("test_sync_requires_watermark.db");
    let repo = DieselRepository::new(test_db.pool());
    let api = StubApi::default();

    let err = run_sync(&repo, &api, Utc::now(), 100).unwrap_err();

    assert!(matches!(err, ServiceError::MissingWatermark));
    assert!(api.filters.borrow().is_empty());
}

#[test]
fn test_sync_inserts_new_orders_and_skips_known_ones() {
    let test_db = common::TestDb::new("test_sync_inserts_new_orders.db");
    let repo = DieselRepository::new(test_db.pool());
    repo.append_batch(&[sample_order("1000-01", at(1, 10, 0))], &[])
        .unwrap();

    let api = StubApi::with_orders(&[
        ("1000-01", "2024-05-01T10:00:00Z"),
        ("1001-01", "2024-05-01T11:15:00Z"),
    ]);
    let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 45).unwrap();

    let report = run_sync(&repo, &api, now, 100).unwrap();

    assert_eq!(
        api.filters.borrow()[0],
        "creationDate:[2024-05-01T10:00:00.000000Z TO 2024-05-01T12:00:00.000000Z]"
    );
    assert_eq!(report.orders_fetched, 2);
    assert_eq!(report.written.orders_inserted, 1);
    assert_eq!(report.written.orders_failed, 1);
    assert_eq!(report.written.items_inserted, 2);

    let order = repo.get_order_by_id("1001-01").unwrap().unwrap();
    assert_eq!(order.total_value, 155.0);
    assert_eq!(order.item_values, 150.0);
    assert_eq!(order.shipping_value, 5.0);
    assert_eq!(order.discount_value, 0.0);
    assert_eq!(order.client_email, "ana@example.com");

    let items = repo.list_order_items("1001-01").unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].total_price, 15000.0);

    assert_eq!(repo.latest_creation_date().unwrap(), Some(at(1, 11, 15)));
}

#[test]
fn test_sync_skips_orders_without_detail() {
    let test_db = common::TestDb::new("test_sync_skips_missing_detail.db");
    let repo = DieselRepository::new(test_db.pool());
    repo.append_batch(&[sample_order("1000-01", at(1, 10, 0))], &[])
        .unwrap();

    let mut api = StubApi::with_orders(&[
        ("1001-01", "2024-05-01T11:00:00Z"),
        ("1002-01", "2024-05-01T11:30:00Z"),
    ]);
    api.details.remove("1001-01");
    let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();

    let report = run_sync(&repo, &api, now, 100).unwrap();

    assert_eq!(report.orders_skipped, 1);
    assert!(repo.get_order_by_id("1001-01").unwrap().is_none());
    assert!(repo.list_order_items("1001-01").unwrap().is_empty());
    assert!(repo.get_order_by_id("1002-01").unwrap().is_some());
    assert_eq!(repo.count_orders().unwrap(), 2);
}

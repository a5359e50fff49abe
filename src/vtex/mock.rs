use mockall::mock;

use super::{ApiResult, OrderDetail, OrderListResponse, OrdersApi};

mock! {
    pub OrdersApi {}

    impl OrdersApi for OrdersApi {
        fn list_orders(&self, creation_date_filter: &str, page: u32, per_page: u32) -> ApiResult<OrderListResponse>;
        fn get_order_detail(&self, order_id: &str) -> ApiResult<OrderDetail>;
    }
}

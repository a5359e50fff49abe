use chrono::NaiveDateTime;
use mockall::mock;

use super::{OrderReader, OrderWriter, WriteReport};
use crate::domain::{order::Order, order_item::OrderItem};
use crate::repository::errors::RepositoryResult;

mock! {
    pub OrderReader {}

    impl OrderReader for OrderReader {
        fn latest_creation_date(&self) -> RepositoryResult<Option<NaiveDateTime>>;
        fn get_order_by_id(&self, order_id: &str) -> RepositoryResult<Option<Order>>;
        fn list_order_items(&self, order_id: &str) -> RepositoryResult<Vec<OrderItem>>;
        fn count_orders(&self) -> RepositoryResult<usize>;
        fn count_order_items(&self) -> RepositoryResult<usize>;
    }
}

mock! {
    pub OrderWriter {}

    impl OrderWriter for OrderWriter {
        fn store_synced(&self, orders: &[Order], items: &[OrderItem]) -> RepositoryResult<WriteReport>;
        fn append_batch(&self, orders: &[Order], items: &[OrderItem]) -> RepositoryResult<(usize, usize)>;
    }
}

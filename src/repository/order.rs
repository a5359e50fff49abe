use chrono::NaiveDateTime;
use diesel::dsl::max;
use diesel::prelude::*;

use crate::{
    domain::{order::Order as DomainOrder, order_item::OrderItem as DomainOrderItem},
    models::{
        order::{NewOrder as DbNewOrder, Order as DbOrder},
        order_item::{NewOrderItem as DbNewOrderItem, OrderItem as DbOrderItem},
    },
    repository::{
        DieselRepository, OrderReader, OrderWriter, WriteReport,
        errors::{RepositoryError, RepositoryResult},
    },
};

impl OrderReader for DieselRepository {
    fn latest_creation_date(&self) -> RepositoryResult<Option<NaiveDateTime>> {
        use crate::schema::vtex_orders;

        let latest = self.fetch::<_, Option<NaiveDateTime>>(
            vtex_orders::table.select(max(vtex_orders::creation_date)),
        )?;

        Ok(latest.into_iter().next().flatten())
    }

    fn get_order_by_id(&self, order_id: &str) -> RepositoryResult<Option<DomainOrder>> {
        use crate::schema::vtex_orders;

        let order = self
            .fetch::<_, DbOrder>(
                vtex_orders::table
                    .filter(vtex_orders::order_id.eq(order_id))
                    .select(DbOrder::as_select())
                    .limit(1),
            )?
            .pop();

        Ok(order.map(Into::into))
    }

    fn list_order_items(&self, order_id: &str) -> RepositoryResult<Vec<DomainOrderItem>> {
        use crate::schema::vtex_order_items;

        let items = self.fetch::<_, DbOrderItem>(
            vtex_order_items::table
                .filter(vtex_order_items::order_id.eq(order_id))
                .order(vtex_order_items::id.asc())
                .select(DbOrderItem::as_select()),
        )?;

        Ok(items.into_iter().map(Into::into).collect())
    }

    fn count_orders(&self) -> RepositoryResult<usize> {
        use crate::schema::vtex_orders;

        let total = self
            .fetch::<_, i64>(vtex_orders::table.count())?
            .pop()
            .unwrap_or_default();

        Ok(total as usize)
    }

    fn count_order_items(&self) -> RepositoryResult<usize> {
        use crate::schema::vtex_order_items;

        let total = self
            .fetch::<_, i64>(vtex_order_items::table.count())?
            .pop()
            .unwrap_or_default();

        Ok(total as usize)
    }
}

impl OrderWriter for DieselRepository {
    fn store_synced(
        &self,
        orders: &[DomainOrder],
        items: &[DomainOrderItem],
    ) -> RepositoryResult<WriteReport> {
        use crate::schema::{vtex_order_items, vtex_orders};

        self.transaction(|conn| {
            let mut report = WriteReport::default();

            for order in orders {
                log::debug!("Inserting order: {}", order.order_id);
                let db_new: DbNewOrder = order.into();

                // Nested transactions are savepoints: a failed row rolls back alone.
                let inserted = conn.transaction::<_, RepositoryError, _>(|conn| {
                    Ok(diesel::insert_into(vtex_orders::table)
                        .values(&db_new)
                        .execute(conn)?)
                });

                match inserted {
                    Ok(_) => report.orders_inserted += 1,
                    Err(e) => {
                        log::error!("Failed to insert order: {}. Error: {e}", order.order_id);
                        report.orders_failed += 1;
                    }
                }
            }

            log::info!("Inserted {} orders into the database", report.orders_inserted);

            for item in items {
                log::debug!("Inserting order item: {}", item.unique_id);
                let db_new: DbNewOrderItem = item.into();

                let inserted = conn.transaction::<_, RepositoryError, _>(|conn| {
                    Ok(diesel::insert_into(vtex_order_items::table)
                        .values(&db_new)
                        .execute(conn)?)
                });

                match inserted {
                    Ok(_) => report.items_inserted += 1,
                    Err(e) => {
                        log::error!(
                            "Failed to insert order item: {}. Error: {e}",
                            item.unique_id
                        );
                        report.items_failed += 1;
                    }
                }
            }

            log::info!(
                "Inserted {} order items into the database",
                report.items_inserted
            );

            Ok(report)
        })
    }

    fn append_batch(
        &self,
        orders: &[DomainOrder],
        items: &[DomainOrderItem],
    ) -> RepositoryResult<(usize, usize)> {
        use crate::schema::{vtex_order_items, vtex_orders};

        self.transaction(|conn| {
            let mut orders_inserted: usize = 0;
            for order in orders {
                let db_new: DbNewOrder = order.into();
                orders_inserted += diesel::insert_into(vtex_orders::table)
                    .values(&db_new)
                    .execute(conn)?;
            }

            let mut items_inserted: usize = 0;
            for item in items {
                let db_new: DbNewOrderItem = item.into();
                items_inserted += diesel::insert_into(vtex_order_items::table)
                    .values(&db_new)
                    .execute(conn)?;
            }

            Ok((orders_inserted, items_inserted))
        })
    }
}

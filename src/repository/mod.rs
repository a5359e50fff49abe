use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::query_dsl::LoadQuery;
use diesel::query_dsl::methods::ExecuteDsl;
use diesel::sqlite::SqliteConnection;

use crate::db::{DbConnection, DbPool};
use crate::domain::{order::Order, order_item::OrderItem};
use crate::repository::errors::{RepositoryError, RepositoryResult};

pub mod errors;
pub mod order;

#[cfg(test)]
pub mod mock;

#[derive(Clone)]
/// Diesel-backed repository implementation that wraps an r2d2 pool.
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository using the provided connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }

    /// Run `f` inside a transaction on a pooled connection.
    ///
    /// Commits when `f` returns `Ok` and rolls back otherwise. The connection
    /// goes back to the pool in both cases.
    pub fn transaction<T, F>(&self, f: F) -> RepositoryResult<T>
    where
        F: FnOnce(&mut SqliteConnection) -> RepositoryResult<T>,
    {
        let mut pooled = self.conn()?;
        let conn: &mut SqliteConnection = &mut pooled;
        conn.transaction::<T, RepositoryError, _>(f)
    }

    /// Load every row produced by `query`.
    pub fn fetch<'q, Q, U>(&self, query: Q) -> RepositoryResult<Vec<U>>
    where
        Q: RunQueryDsl<SqliteConnection> + LoadQuery<'q, SqliteConnection, U>,
    {
        self.transaction(|conn| Ok(query.load(conn)?))
    }

    /// Run a statement that returns no rows, yielding the affected row count.
    pub fn execute<Q>(&self, query: Q) -> RepositoryResult<usize>
    where
        Q: RunQueryDsl<SqliteConnection> + ExecuteDsl<SqliteConnection>,
    {
        self.transaction(|conn| Ok(query.execute(conn)?))
    }
}

/// Outcome of writing a sync run, with per-row failures counted rather than raised.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteReport {
    pub orders_inserted: usize,
    pub orders_failed: usize,
    pub items_inserted: usize,
    pub items_failed: usize,
}

impl WriteReport {
    pub fn failures(&self) -> usize {
        self.orders_failed + self.items_failed
    }
}

/// Read-only operations over order records.
///
/// The sync only needs [`latest_creation_date`](Self::latest_creation_date).
/// The lookups and counts serve inspection of stored data and the tests.
pub trait OrderReader {
    /// Most recent `creationDate` stored, the lower bound of the next sync.
    fn latest_creation_date(&self) -> RepositoryResult<Option<NaiveDateTime>>;
    fn get_order_by_id(&self, order_id: &str) -> RepositoryResult<Option<Order>>;
    fn list_order_items(&self, order_id: &str) -> RepositoryResult<Vec<OrderItem>>;
    fn count_orders(&self) -> RepositoryResult<usize>;
    fn count_order_items(&self) -> RepositoryResult<usize>;
}

/// Write operations over order records. Rows are only ever inserted.
pub trait OrderWriter {
    /// Insert synced rows in one transaction, isolating each row's failure.
    fn store_synced(&self, orders: &[Order], items: &[OrderItem])
    -> RepositoryResult<WriteReport>;
    /// Insert imported rows all-or-nothing, returning `(orders, items)` inserted.
    fn append_batch(
        &self,
        orders: &[Order],
        items: &[OrderItem],
    ) -> RepositoryResult<(usize, usize)>;
}

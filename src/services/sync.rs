//! Incremental pull of new orders from the platform into the database.
//!
//! One run reads the newest stored `creationDate` (the watermark), lists every
//! order created between it and the current minute, fetches each order's
//! detail, and writes the flattened rows in a single transaction.

use std::fs::{File, OpenOptions, TryLockError};
use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, DurationRound, NaiveDateTime, TimeDelta, Utc};

use crate::domain::{order::Order, order_item::OrderItem};
use crate::repository::{OrderReader, OrderWriter, WriteReport};
use crate::services::{ServiceError, ServiceResult};
use crate::vtex::convert::{item_from_api, order_from_api};
use crate::vtex::{OrderSummary, OrdersApi, creation_date_filter};

/// Summary of one sync run.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncReport {
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    pub pages_fetched: u32,
    pub pages_failed: u32,
    pub orders_fetched: usize,
    /// Orders dropped because their detail could not be fetched.
    pub orders_skipped: usize,
    pub written: WriteReport,
}

/// Exclusive claim on the sync for the lifetime of the holder.
///
/// Backed by an OS file lock, so a crashed process never leaves it stale.
#[derive(Debug)]
pub struct SyncLock {
    _file: File,
}

impl SyncLock {
    /// Lock `path`, failing with [`ServiceError::SyncInProgress`] when another
    /// holder already has it.
    pub fn acquire(path: &Path) -> ServiceResult<Self> {
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(path)?;

        match file.try_lock() {
            Ok(()) => Ok(Self { _file: file }),
            Err(TryLockError::WouldBlock) => {
                log::error!("Another sync process holds {}", path.display());
                Err(ServiceError::SyncInProgress(path.display().to_string()))
            }
            Err(TryLockError::Error(e)) => Err(e.into()),
        }
    }
}

/// Time to wait after a run that took `elapsed` so runs start on fixed
/// `interval` marks. An overrunning run skips the marks it missed.
pub fn next_run_delay(interval: Duration, elapsed: Duration) -> Duration {
    if interval.is_zero() {
        return Duration::ZERO;
    }
    let into_slot = elapsed.as_nanos() % interval.as_nanos();
    // `into_slot` < `interval`, so it fits the u64 nanosecond range of `interval`.
    interval - Duration::from_nanos(into_slot as u64)
}

/// Upper bound of the sync window: `now` truncated to the minute.
pub fn window_end(now: DateTime<Utc>) -> DateTime<Utc> {
    now.duration_trunc(TimeDelta::minutes(1)).unwrap_or(now)
}

/// Page through the order list for `filter`.
///
/// Pages are requested one after another. A failed page is logged and
/// skipped; when the first page fails the page count is unknown and the
/// result is empty. Returns the summaries plus `(fetched, failed)` page counts.
pub fn fetch_order_summaries<A>(
    api: &A,
    filter: &str,
    per_page: u32,
) -> (Vec<OrderSummary>, u32, u32)
where
    A: OrdersApi + ?Sized,
{
    let first = match api.list_orders(filter, 1, per_page) {
        Ok(first) => first,
        Err(e) => {
            log::error!("Failed to fetch orders: {e}");
            return (Vec::new(), 0, 1);
        }
    };

    let mut summaries = first.list;
    let mut current_page = first.paging.current_page;
    let total_pages = first.paging.pages;
    let mut fetched = 1;
    let mut failed = 0;

    while current_page < total_pages {
        current_page += 1;
        match api.list_orders(filter, current_page, per_page) {
            Ok(page) => {
                summaries.extend(page.list);
                fetched += 1;
            }
            Err(e) => {
                log::error!("Failed to fetch orders page {current_page}: {e}");
                failed += 1;
            }
        }
    }

    (summaries, fetched, failed)
}

/// Execute one incremental sync run.
///
/// Returns [`ServiceError::MissingWatermark`] without touching the API when
/// the orders table is empty; the table has to be backfilled first.
pub fn run_sync<R, A>(
    repo: &R,
    api: &A,
    now: DateTime<Utc>,
    per_page: u32,
) -> ServiceResult<SyncReport>
where
    R: OrderReader + OrderWriter + ?Sized,
    A: OrdersApi + ?Sized,
{
    let watermark: NaiveDateTime = match repo.latest_creation_date()? {
        Some(watermark) => watermark,
        None => {
            log::error!("No previous sync found. Backfill the orders table before syncing");
            return Err(ServiceError::MissingWatermark);
        }
    };

    let window_start = watermark.and_utc();
    let window_end = window_end(now);
    let filter = creation_date_filter(window_start, window_end);

    log::info!("Fetching orders from {window_start} to {window_end}");

    let (summaries, pages_fetched, pages_failed) =
        fetch_order_summaries(api, &filter, per_page);

    let mut orders: Vec<Order> = Vec::with_capacity(summaries.len());
    let mut items: Vec<OrderItem> = Vec::new();
    let mut orders_skipped = 0;

    for summary in &summaries {
        let detail = match api.get_order_detail(&summary.order_id) {
            Ok(detail) => detail,
            Err(e) => {
                log::error!(
                    "Failed to fetch order details for order: {} - ignoring... ({e})",
                    summary.order_id
                );
                orders_skipped += 1;
                continue;
            }
        };

        let order = order_from_api(summary, &detail);
        items.extend(
            detail
                .items
                .iter()
                .map(|item| item_from_api(item, &order.order_id)),
        );
        orders.push(order);
    }

    log::info!(
        "Fetched {} orders and {} order items from VTEX",
        orders.len(),
        items.len()
    );

    let written = if orders.is_empty() && items.is_empty() {
        log::info!("Inserted 0 orders into the database");
        WriteReport::default()
    } else {
        repo.store_synced(&orders, &items)?
    };

    if written.failures() > 0 {
        log::warn!(
            "{} orders and {} order items failed to insert",
            written.orders_failed,
            written.items_failed
        );
    }

    Ok(SyncReport {
        window_start,
        window_end,
        pages_fetched,
        pages_failed,
        orders_fetched: summaries.len(),
        orders_skipped,
        written,
    })
}

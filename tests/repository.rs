use diesel::prelude::*;

use vtex_orders_etl::repository::errors::RepositoryError;
use vtex_orders_etl::repository::{DieselRepository, OrderReader, OrderWriter, WriteReport};
use vtex_orders_etl::schema::vtex_orders;

mod common;

use common::{at, sample_item, sample_order};

#[test]
fn test_latest_creation_date_tracks_newest_order() {
    let test_db = common::TestDb::new("test_latest_creation_date.db");
    let repo = DieselRepository::new(test_db.pool());

    assert_eq!(repo.latest_creation_date().unwrap(), None);

    let orders = [
        sample_order("1001-01", at(1, 10, 0)),
        sample_order("1003-01", at(3, 8, 15)),
        sample_order("1002-01", at(2, 23, 59)),
    ];
    repo.append_batch(&orders, &[]).unwrap();

    assert_eq!(repo.latest_creation_date().unwrap(), Some(at(3, 8, 15)));
}

#[test]
fn test_store_synced_round_trips_rows() {
    let test_db = common::TestDb::new("test_store_synced_round_trips.db");
    let repo = DieselRepository::new(test_db.pool());

    let order = sample_order("1001-01", at(1, 10, 0));
    let items = [
        sample_item("1001-01", "1", "u-2"),
        sample_item("1001-01", "0", "u-1"),
    ];

    let report = repo.store_synced(&[order.clone()], &items).unwrap();
    assert_eq!(
        report,
        WriteReport {
            orders_inserted: 1,
            orders_failed: 0,
            items_inserted: 2,
            items_failed: 0,
        }
    );

    let stored = repo.get_order_by_id("1001-01").unwrap().unwrap();
    assert_eq!(stored, order);
    assert!(repo.get_order_by_id("missing").unwrap().is_none());

    let stored_items = repo.list_order_items("1001-01").unwrap();
    assert_eq!(stored_items.len(), 2);
    assert_eq!(stored_items[0].id, "0");
    assert_eq!(stored_items[0].seller.as_deref(), Some("1"));
    assert!(!stored_items[0].is_gift);
}

#[test]
fn test_store_synced_isolates_duplicate_rows() {
    let test_db = common::TestDb::new("test_store_synced_duplicates.db");
    let repo = DieselRepository::new(test_db.pool());

    repo.store_synced(
        &[sample_order("1001-01", at(1, 10, 0))],
        &[sample_item("1001-01", "0", "u-1")],
    )
    .unwrap();

    let report = repo
        .store_synced(
            &[
                sample_order("1001-01", at(1, 10, 0)),
                sample_order("1002-01", at(1, 11, 0)),
            ],
            &[
                sample_item("1001-01", "0", "u-1"),
                sample_item("1002-01", "0", "u-2"),
            ],
        )
        .unwrap();

    assert_eq!(report.orders_inserted, 1);
    assert_eq!(report.orders_failed, 1);
    assert_eq!(report.items_inserted, 1);
    assert_eq!(report.items_failed, 1);
    assert_eq!(repo.count_orders().unwrap(), 2);
    assert_eq!(repo.count_order_items().unwrap(), 2);
}

#[test]
fn test_append_batch_is_all_or_nothing() {
    let test_db = common::TestDb::new("test_append_batch_all_or_nothing.db");
    let repo = DieselRepository::new(test_db.pool());

    let inserted = repo
        .append_batch(
            &[sample_order("1001-01", at(1, 10, 0))],
            &[sample_item("1001-01", "0", "u-1")],
        )
        .unwrap();
    assert_eq!(inserted, (1, 1));

    let err = repo
        .append_batch(
            &[
                sample_order("1002-01", at(1, 11, 0)),
                sample_order("1001-01", at(1, 10, 0)),
            ],
            &[sample_item("1002-01", "0", "u-2")],
        )
        .expect_err("duplicate order id must fail the batch");
    assert!(matches!(err, RepositoryError::ConstraintViolation(_)));

    assert_eq!(repo.count_orders().unwrap(), 1);
    assert_eq!(repo.count_order_items().unwrap(), 1);
    assert!(repo.get_order_by_id("1002-01").unwrap().is_none());
}

#[test]
fn test_fetch_and_execute_run_arbitrary_queries() {
    let test_db = common::TestDb::new("test_fetch_and_execute.db");
    let repo = DieselRepository::new(test_db.pool());

    repo.append_batch(
        &[
            sample_order("1001-01", at(1, 10, 0)),
            sample_order("1002-01", at(2, 10, 0)),
        ],
        &[],
    )
    .unwrap();

    let ids: Vec<String> = repo
        .fetch(
            vtex_orders::table
                .filter(vtex_orders::creation_date.gt(at(1, 12, 0)))
                .select(vtex_orders::order_id),
        )
        .unwrap();
    assert_eq!(ids, vec!["1002-01".to_string()]);

    let updated = repo
        .execute(
            diesel::update(vtex_orders::table.filter(vtex_orders::order_id.eq("1001-01")))
                .set(vtex_orders::status.eq("canceled")),
        )
        .unwrap();
    assert_eq!(updated, 1);

    let order = repo.get_order_by_id("1001-01").unwrap().unwrap();
    assert_eq!(order.status, "canceled");
}

#[test]
fn test_transaction_rolls_back_on_error() {
    let test_db = common::TestDb::new("test_transaction_rollback.db");
    let repo = DieselRepository::new(test_db.pool());

    repo.append_batch(&[sample_order("1001-01", at(1, 10, 0))], &[])
        .unwrap();
    let result: Result<(), RepositoryError> = repo.transaction(|conn| {
        diesel::delete(vtex_orders::table).execute(conn)?;
        Err(RepositoryError::NotFound)
    });
    assert!(matches!(result, Err(RepositoryError::NotFound)));
    assert_eq!(repo.count_orders().unwrap(), 1);
}

#[test]
fn test_items_do_not_require_a_stored_order() {
    let test_db = common::TestDb::new("test_items_without_order.db");
    let repo = DieselRepository::new(test_db.pool());

    let report = repo
        .store_synced(&[], &[sample_item("9999-01", "0", "u-orphan")])
        .unwrap();

    assert_eq!(report.items_inserted, 1);
    assert_eq!(report.items_failed, 0);
    assert!(repo.get_order_by_id("9999-01").unwrap().is_none());
    assert_eq!(repo.list_order_items("9999-01").unwrap().len(), 1);
}

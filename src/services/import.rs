//! Batch import of exported order spreadsheets.
//!
//! Every supported file in a directory is loaded, projected onto the order
//! and order item tables, appended to the database and then moved into a
//! `PROCESSED` sub-directory so later runs do not see it again.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::domain::order::{Order, PAYMENT_NAMES_MAX_LEN, STATE_CODE_LEN, truncate_chars};
use crate::domain::order_item::OrderItem;
use crate::repository::OrderWriter;
use crate::services::{ServiceError, ServiceResult};
use crate::sheet::{
    SheetError, SheetFormat, SheetResult, Table, load_table, parse_integer, parse_number,
    parse_timestamp,
};

/// Sub-directory that receives files once they are imported.
pub const PROCESSED_DIR: &str = "PROCESSED";

/// Measurement unit written for every imported item.
const DEFAULT_MEASUREMENT_UNIT: &str = "un";

// Source headers shared by both projections.
const ORDER: &str = "Order";
const TOTAL_ITEMS: &str = "TotalItems";

// Order headers.
const CREATION_DATE: &str = "Creation Date";
const CLIENT_NAME: &str = "Client Name";
const CLIENT_LAST_NAME: &str = "Client Last Name";
const TOTAL_VALUE: &str = "Total Value";
const PAYMENT_SYSTEM_NAME: &str = "Payment System Name";
const STATUS: &str = "Status";
const SALES_CHANNEL: &str = "SalesChannel";
const ORIGIN: &str = "Origin";
const HOST: &str = "Host";
const LAST_CHANGE_DATE: &str = "Last Change Date";
const DISCOUNTS_TOTALS: &str = "Discounts Totals";
const SHIPPING_VALUE: &str = "Shipping Value";
const COUPON: &str = "Coupon";
const EMAIL: &str = "Email";
const CLIENT_DOCUMENT: &str = "Client Document";
const UF: &str = "UF";
const CITY: &str = "City";

// Item headers.
const SEQUENCE: &str = "Sequence";
const ID_SKU: &str = "ID_SKU";
const QUANTITY_SKU: &str = "Quantity_SKU";
const SELLER_NAME: &str = "Seller Name";
const SKU_NAME: &str = "SKU Name";
const REFERENCE_CODE: &str = "Reference Code";
const SKU_VALUE: &str = "SKU Value";
const SKU_SELLING_PRICE: &str = "SKU Selling Price";
const SKU_TOTAL_PRICE: &str = "SKU Total Price";

/// Translation of the seller display name found in exports to its code.
#[derive(Debug, Clone)]
pub struct SellerMapping {
    name: String,
    code: String,
}

impl SellerMapping {
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
        }
    }

    /// Code for `seller`, or `None` when it is not the configured seller.
    pub fn code_for(&self, seller: &str) -> Option<String> {
        (seller == self.name).then(|| self.code.clone())
    }
}

/// Totals for one importer run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub files_imported: usize,
    pub files_skipped: usize,
    pub orders_inserted: usize,
    pub items_inserted: usize,
}

/// Import every supported file directly inside `dir`, in file-name order.
///
/// Unsupported files are skipped with a warning. The first failing file stops
/// the run; files imported before it stay imported and archived.
pub fn import_directory<R>(
    repo: &R,
    dir: &Path,
    sellers: &SellerMapping,
) -> ServiceResult<ImportReport>
where
    R: OrderWriter + ?Sized,
{
    let mut files: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    let mut report = ImportReport::default();

    for path in files {
        if SheetFormat::from_path(&path).is_none() {
            log::warn!("File {} is not supported", path.display());
            report.files_skipped += 1;
            continue;
        }

        let (orders, items) = import_file(repo, &path, sellers)?;
        report.files_imported += 1;
        report.orders_inserted += orders;
        report.items_inserted += items;
    }

    log::info!(
        "Imported {} files ({} orders, {} order items), skipped {}",
        report.files_imported,
        report.orders_inserted,
        report.items_inserted,
        report.files_skipped
    );

    Ok(report)
}

/// Load, project and append a single file, then archive it.
///
/// Returns the number of `(orders, items)` inserted.
pub fn import_file<R>(
    repo: &R,
    path: &Path,
    sellers: &SellerMapping,
) -> ServiceResult<(usize, usize)>
where
    R: OrderWriter + ?Sized,
{
    let sheet_error = |source: SheetError| ServiceError::Sheet {
        path: path.display().to_string(),
        source,
    };

    log::info!("Reading the file {}", path.display());
    let mut table = load_table(path).map_err(sheet_error)?;
    add_total_items(&mut table).map_err(sheet_error)?;

    log::info!("Processing the orders");
    let orders = project_orders(&table).map_err(sheet_error)?;

    log::info!("Processing the order items");
    let items = project_items(&table, sellers).map_err(sheet_error)?;

    log::info!(
        "Inserting {} orders and {} order items into the database",
        orders.len(),
        items.len()
    );
    let inserted = repo.append_batch(&orders, &items)?;

    let archived = archive_file(path)?;
    log::info!(
        "Finished processing the file {}, moved to {}",
        path.display(),
        archived.display()
    );

    Ok(inserted)
}

/// Move `path` into the `PROCESSED` directory next to it, creating it if needed.
pub fn archive_file(path: &Path) -> ServiceResult<PathBuf> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let processed = parent.join(PROCESSED_DIR);
    fs::create_dir_all(&processed)?;

    let file_name = path.file_name().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("{} has no file name", path.display()),
        )
    })?;
    let target = processed.join(file_name);
    fs::rename(path, &target)?;

    Ok(target)
}

/// Set the `TotalItems` column of every row to the number of rows sharing its order.
pub fn add_total_items(table: &mut Table) -> SheetResult<()> {
    let order_column = table.column(ORDER).ok_or(SheetError::MissingColumn(ORDER))?;

    let mut counts: HashMap<String, usize> = HashMap::new();
    for row in 0..table.len() {
        *counts
            .entry(table.cell(row, Some(order_column)).to_string())
            .or_default() += 1;
    }

    let total_column = match table.column(TOTAL_ITEMS) {
        Some(index) => index,
        None => {
            table.headers.push(TOTAL_ITEMS.to_string());
            table.headers.len() - 1
        }
    };

    for row in table.rows.iter_mut() {
        let order_id = row.get(order_column).map(|v| v.trim()).unwrap_or_default();
        let count = counts.get(order_id).copied().unwrap_or_default().to_string();
        if row.len() <= total_column {
            row.resize(total_column + 1, String::new());
        }
        row[total_column] = count;
    }

    Ok(())
}

/// Project the table onto order rows, keeping the first row of each order.
pub fn project_orders(table: &Table) -> SheetResult<Vec<Order>> {
    let order_column = table.column(ORDER).ok_or(SheetError::MissingColumn(ORDER))?;
    let column = |name: &str| table.column(name);

    let creation_date = column(CREATION_DATE);
    let client_name = column(CLIENT_NAME);
    let client_last_name = column(CLIENT_LAST_NAME);
    let total_value = column(TOTAL_VALUE);
    let payment_names = column(PAYMENT_SYSTEM_NAME);
    let status = column(STATUS);
    let sales_channel = column(SALES_CHANNEL);
    let origin = column(ORIGIN);
    let total_items = column(TOTAL_ITEMS);
    let hostname = column(HOST);
    let last_change = column(LAST_CHANGE_DATE);
    let discount_value = column(DISCOUNTS_TOTALS);
    let shipping_value = column(SHIPPING_VALUE);
    let coupon = column(COUPON);
    let email = column(EMAIL);
    let client_document = column(CLIENT_DOCUMENT);
    let state = column(UF);
    let city = column(CITY);

    let mut seen: HashSet<&str> = HashSet::new();
    let mut orders = Vec::new();

    for row in 0..table.len() {
        let line = row + 2;
        let order_id = table.cell(row, Some(order_column));
        if order_id.is_empty() || !seen.insert(order_id) {
            continue;
        }

        let created = parse_timestamp(table.cell(row, creation_date), line, CREATION_DATE)?
            .ok_or_else(|| SheetError::InvalidDate {
                row: line,
                column: CREATION_DATE,
                value: String::new(),
            })?;

        let total = parse_number(table.cell(row, total_value), line, TOTAL_VALUE)?;
        let discount = parse_number(table.cell(row, discount_value), line, DISCOUNTS_TOTALS)?;
        let shipping = parse_number(table.cell(row, shipping_value), line, SHIPPING_VALUE)?;

        orders.push(Order {
            order_id: order_id.to_string(),
            creation_date: created,
            client_name: join_name(table.cell(row, client_name), table.cell(row, client_last_name)),
            total_value: total,
            payment_names: truncate_chars(table.cell(row, payment_names), PAYMENT_NAMES_MAX_LEN),
            status: table.cell(row, status).to_string(),
            status_description: String::new(),
            sales_channel: table.cell(row, sales_channel).to_string(),
            origin: table.cell(row, origin).to_string(),
            order_is_complete: true,
            total_items: parse_integer(table.cell(row, total_items), line, TOTAL_ITEMS)?,
            hostname: table.cell(row, hostname).to_string(),
            last_change: parse_timestamp(table.cell(row, last_change), line, LAST_CHANGE_DATE)?,
            item_values: total - discount - shipping,
            discount_value: discount,
            shipping_value: shipping,
            coupon: non_empty(table.cell(row, coupon)),
            client_email: table.cell(row, email).to_string(),
            client_id: non_empty(strip_float_artifact(table.cell(row, client_document))),
            state: truncate_chars(table.cell(row, state), STATE_CODE_LEN),
            city: table.cell(row, city).to_string(),
        });
    }

    Ok(orders)
}

/// Project every row onto an order item with a freshly generated unique id.
pub fn project_items(table: &Table, sellers: &SellerMapping) -> SheetResult<Vec<OrderItem>> {
    let order_column = table.column(ORDER).ok_or(SheetError::MissingColumn(ORDER))?;
    let column = |name: &str| table.column(name);

    let sequence = column(SEQUENCE);
    let product_id = column(ID_SKU);
    let quantity = column(QUANTITY_SKU);
    let seller = column(SELLER_NAME);
    let name = column(SKU_NAME);
    let ref_id = column(REFERENCE_CODE);
    let price = column(SKU_VALUE);
    let selling_price = column(SKU_SELLING_PRICE);
    let total_price = column(SKU_TOTAL_PRICE);

    let mut unmapped: BTreeSet<&str> = BTreeSet::new();
    let mut items = Vec::with_capacity(table.len());

    for row in 0..table.len() {
        let line = row + 2;
        let order_id = table.cell(row, Some(order_column));
        if order_id.is_empty() {
            continue;
        }

        let seller_name = table.cell(row, seller);
        let seller_code = sellers.code_for(seller_name);
        if seller_code.is_none() {
            unmapped.insert(seller_name);
        }

        let product = table.cell(row, product_id);
        items.push(OrderItem {
            id: table.cell(row, sequence).to_string(),
            unique_id: Uuid::new_v4().to_string(),
            product_id: product.to_string(),
            order_id: order_id.to_string(),
            ean: String::new(),
            quantity: parse_integer(table.cell(row, quantity), line, QUANTITY_SKU)?,
            seller: seller_code,
            name: table.cell(row, name).to_string(),
            ref_id: non_empty(table.cell(row, ref_id)),
            price: parse_number(table.cell(row, price), line, SKU_VALUE)?,
            selling_price: parse_number(table.cell(row, selling_price), line, SKU_SELLING_PRICE)?,
            seller_sku: product.to_string(),
            measurement_unit: DEFAULT_MEASUREMENT_UNIT.to_string(),
            is_gift: false,
            total_price: parse_number(table.cell(row, total_price), line, SKU_TOTAL_PRICE)?,
        });
    }

    for name in unmapped {
        log::warn!("Seller `{name}` has no seller code; its items are stored without one");
    }

    Ok(items)
}

fn join_name(first: &str, last: &str) -> String {
    match (first.is_empty(), last.is_empty()) {
        (false, false) => format!("{first} {last}"),
        (false, true) => first.to_string(),
        _ => last.to_string(),
    }
}

/// Drop the `.0` a numeric document id picks up when stored as a float.
fn strip_float_artifact(value: &str) -> &str {
    value.strip_suffix(".0").unwrap_or(value)
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

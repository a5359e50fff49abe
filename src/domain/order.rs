use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Maximum stored length of the payment method names.
pub const PAYMENT_NAMES_MAX_LEN: usize = 64;
/// Length of a Brazilian state code.
pub const STATE_CODE_LEN: usize = 2;

/// One row of `VTEX_Orders`, keyed by the platform order id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: String,
    pub creation_date: NaiveDateTime,
    pub client_name: String,
    /// Order total in currency units.
    pub total_value: f64,
    pub payment_names: String,
    pub status: String,
    pub status_description: String,
    pub sales_channel: String,
    pub origin: String,
    pub order_is_complete: bool,
    /// Number of line items in the order.
    pub total_items: i32,
    pub hostname: String,
    pub last_change: Option<NaiveDateTime>,
    pub item_values: f64,
    pub discount_value: f64,
    pub shipping_value: f64,
    pub coupon: Option<String>,
    pub client_email: String,
    /// Client document number.
    pub client_id: Option<String>,
    pub state: String,
    pub city: String,
}

/// Convert an amount in cents to currency units.
pub fn cents_to_units(cents: f64) -> f64 {
    cents / 100.0
}

/// Recover the real address from the platform's masked email.
///
/// The platform stores `address-suffix`; everything from the last `-` on is
/// dropped. Values without a `-`, or whose trailing segment still contains the
/// `@` (a hyphenated address with no suffix), are returned unchanged.
pub fn strip_email_suffix(raw: &str) -> String {
    match raw.rsplit_once('-') {
        Some((address, suffix)) if !suffix.contains('@') => address.to_string(),
        _ => raw.to_string(),
    }
}

/// Keep at most `max` characters of `value`.
pub fn truncate_chars(value: &str, max: usize) -> String {
    value.chars().take(max).collect()
}

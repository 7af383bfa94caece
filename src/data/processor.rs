//! Order Filter Module
//! Normalizes the uploaded order sheet and picks the orders delivered on two
//! "days ago" dates.

use chrono::{Days, NaiveDate};
use polars::prelude::*;
use thiserror::Error;

/// Required input columns, matched exactly.
pub const PHONE_COLUMN: &str = "phone_number";
pub const NAME_COLUMN: &str = "customer_name";
pub const DATE_COLUMN: &str = "delivery_status_date";
pub const REQUIRED_COLUMNS: [&str; 3] = [PHONE_COLUMN, NAME_COLUMN, DATE_COLUMN];

/// Output column holding "20" + normalized phone number.
pub const ORDER_CODE_COLUMN: &str = "order_code";
pub const ORDER_CODE_PREFIX: &str = "20";

pub const DATE_FORMAT: &str = "%Y-%m-%d";
const DATE_PREFIX_LEN: usize = 10;

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Missing required column '{0}'")]
    Schema(String),
    #[error("Row {row}: cannot parse delivery date from '{value}'")]
    DateParse { row: usize, value: String },
    #[error("{days} days before {today} is outside the supported calendar")]
    DateOutOfRange { today: NaiveDate, days: u32 },
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Spellings of an empty date cell once a sheet has been through a
/// dataframe-to-text round trip.
const MISSING_DATE_MARKERS: [&str; 4] = ["nan", "NaN", "NaT", "None"];

/// One uploaded row after normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedOrder {
    pub order_code: String,
    pub customer_name: String,
    /// `None` for an order without a delivery date; it never matches a target.
    pub delivery_status_date: Option<NaiveDate>,
}

impl NormalizedOrder {
    /// Normalize a single raw row. `row` is the 0-based data row, used only
    /// for error reporting.
    pub fn from_raw(
        row: usize,
        phone_number: &str,
        customer_name: &str,
        delivery_status_date: &str,
    ) -> Result<Self, ProcessorError> {
        let delivery_status_date = if is_missing_date(delivery_status_date) {
            None
        } else {
            let date = parse_delivery_date(delivery_status_date).ok_or_else(|| {
                ProcessorError::DateParse {
                    row,
                    value: delivery_status_date.to_string(),
                }
            })?;
            Some(date)
        };

        Ok(Self {
            order_code: format!("{}{}", ORDER_CODE_PREFIX, normalize_phone(phone_number)),
            customer_name: first_name(customer_name).to_string(),
            delivery_status_date,
        })
    }
}

/// Strip the first two characters of a phone number that starts with "2".
pub fn normalize_phone(phone: &str) -> String {
    if phone.starts_with('2') {
        phone.chars().skip(2).collect()
    } else {
        phone.to_string()
    }
}

/// First whitespace-delimited token, or "" for a blank name.
pub fn first_name(name: &str) -> &str {
    name.split_whitespace().next().unwrap_or("")
}

/// Blank cells and null spellings mean "not delivered yet", not a bad date.
pub fn is_missing_date(raw: &str) -> bool {
    let trimmed = raw.trim();
    trimmed.is_empty() || MISSING_DATE_MARKERS.contains(&trimmed)
}

/// Calendar date from the first ten characters of `raw` (`YYYY-MM-DD`).
pub fn parse_delivery_date(raw: &str) -> Option<NaiveDate> {
    let prefix: String = raw.chars().take(DATE_PREFIX_LEN).collect();
    NaiveDate::parse_from_str(&prefix, DATE_FORMAT).ok()
}

/// `today` minus `days` calendar days.
pub fn days_ago(today: NaiveDate, days: u32) -> Result<NaiveDate, ProcessorError> {
    today
        .checked_sub_days(Days::new(u64::from(days)))
        .ok_or(ProcessorError::DateOutOfRange { today, days })
}

/// Orders delivered on a single date.
#[derive(Debug, Clone)]
pub struct DeliveredTable {
    pub date: NaiveDate,
    /// Columns: [order_code, customer_name]
    pub table: DataFrame,
}

impl DeliveredTable {
    /// Heading shown above the table.
    pub fn label(&self) -> String {
        format!("Delivered on {}", self.date.format(DATE_FORMAT))
    }

    pub fn row_count(&self) -> usize {
        self.table.height()
    }
}

/// Result of one filter run.
#[derive(Debug, Clone)]
pub struct DeliveryReport {
    pub latest: DeliveredTable,
    pub old: DeliveredTable,
}

/// Normalization and date filtering over the uploaded order sheet.
pub struct OrderFilter;

impl OrderFilter {
    /// Normalize every row, aborting on the first bad one.
    pub fn normalize(df: &DataFrame) -> Result<Vec<NormalizedOrder>, ProcessorError> {
        for name in REQUIRED_COLUMNS {
            if df.get_column_index(name).is_none() {
                return Err(ProcessorError::Schema(name.to_string()));
            }
        }

        let phones = text_column(df, PHONE_COLUMN)?;
        let names = text_column(df, NAME_COLUMN)?;
        let dates = text_column(df, DATE_COLUMN)?;

        phones
            .iter()
            .zip(&names)
            .zip(&dates)
            .enumerate()
            .map(|(row, ((phone, name), date))| NormalizedOrder::from_raw(row, phone, name, date))
            .collect()
    }

    /// Project the orders delivered on `date` to [order_code, customer_name],
    /// keeping input order.
    pub fn select_delivered(
        orders: &[NormalizedOrder],
        date: NaiveDate,
    ) -> Result<DataFrame, ProcessorError> {
        let mut order_codes: Vec<String> = Vec::new();
        let mut customer_names: Vec<String> = Vec::new();

        for order in orders.iter().filter(|o| o.delivery_status_date == Some(date)) {
            order_codes.push(order.order_code.clone());
            customer_names.push(order.customer_name.clone());
        }

        let df = DataFrame::new(vec![
            Column::new(ORDER_CODE_COLUMN.into(), order_codes),
            Column::new(NAME_COLUMN.into(), customer_names),
        ])?;

        Ok(df)
    }

    /// Build the latest/old delivered tables relative to `today`.
    pub fn filter_orders(
        df: &DataFrame,
        old_days_ago: u32,
        latest_days_ago: u32,
        today: NaiveDate,
    ) -> Result<DeliveryReport, ProcessorError> {
        let orders = Self::normalize(df)?;

        let old_date = days_ago(today, old_days_ago)?;
        let latest_date = days_ago(today, latest_days_ago)?;

        let report = DeliveryReport {
            latest: DeliveredTable {
                date: latest_date,
                table: Self::select_delivered(&orders, latest_date)?,
            },
            old: DeliveredTable {
                date: old_date,
                table: Self::select_delivered(&orders, old_date)?,
            },
        };

        tracing::debug!(
            rows = orders.len(),
            latest = report.latest.row_count(),
            old = report.old.row_count(),
            "filtered delivered orders"
        );

        Ok(report)
    }
}

/// Text values of a column; nulls become "".
pub fn text_column(df: &DataFrame, name: &str) -> Result<Vec<String>, PolarsError> {
    let column = df.column(name)?.cast(&DataType::String)?;
    let values = column
        .str()?
        .into_iter()
        .map(|v| v.unwrap_or_default().to_string())
        .collect();
    Ok(values)
}

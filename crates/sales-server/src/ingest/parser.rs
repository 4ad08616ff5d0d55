//! Record parser
//!
//! Maps a raw CSV record onto a [`SalesRecord`] using the column positions
//! taken from the header row. Column order in the file is irrelevant and
//! unknown columns are ignored.

use std::{collections::HashMap, str::FromStr};

use csv_async::StringRecord;
use sqlx::types::BigDecimal;

use super::error::{MissingCause, ParseError};
use super::models::SalesRecord;

pub const COL_ORDER_ID: &str = "Order ID";
pub const COL_PRODUCT_ID: &str = "Product ID";
pub const COL_CUSTOMER_ID: &str = "Customer ID";
pub const COL_PRODUCT_NAME: &str = "Product Name";
pub const COL_CATEGORY: &str = "Category";
pub const COL_REGION: &str = "Region";
pub const COL_SALE_DATE: &str = "Date of Sale";
pub const COL_QUANTITY: &str = "Quantity Sold";
pub const COL_UNIT_PRICE: &str = "Unit Price";
pub const COL_DISCOUNT: &str = "Discount";
pub const COL_SHIPPING_COST: &str = "Shipping Cost";
pub const COL_PAYMENT_METHOD: &str = "Payment Method";
pub const COL_CUSTOMER_NAME: &str = "Customer Name";
pub const COL_CUSTOMER_EMAIL: &str = "Customer Email";
pub const COL_CUSTOMER_ADDRESS: &str = "Customer Address";

/// Columns every source file must name in its header
pub const REQUIRED_COLUMNS: [&str; 15] = [
    COL_ORDER_ID,
    COL_PRODUCT_ID,
    COL_CUSTOMER_ID,
    COL_PRODUCT_NAME,
    COL_CATEGORY,
    COL_REGION,
    COL_SALE_DATE,
    COL_QUANTITY,
    COL_UNIT_PRICE,
    COL_DISCOUNT,
    COL_SHIPPING_COST,
    COL_PAYMENT_METHOD,
    COL_CUSTOMER_NAME,
    COL_CUSTOMER_EMAIL,
    COL_CUSTOMER_ADDRESS,
];

/// Column name to field position, built once from the header row
///
/// A name that appears twice in the header maps to its last position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnIndex {
    positions: HashMap<String, usize>,
}

impl ColumnIndex {
    pub fn from_header(header: &StringRecord) -> Self {
        let positions = header
            .iter()
            .enumerate()
            .map(|(i, name)| (name.to_string(), i))
            .collect();
        Self { positions }
    }

    pub fn position(&self, column: &str) -> Option<usize> {
        self.positions.get(column).copied()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Required columns the header does not name, in declaration order
    pub fn missing_columns(&self) -> Vec<&'static str> {
        REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|c| !self.positions.contains_key(*c))
            .collect()
    }
}

/// Parse one record into a typed [`SalesRecord`]
pub fn parse_record(record: &StringRecord, columns: &ColumnIndex) -> Result<SalesRecord, ParseError> {
    let field = |column| column_value(record, columns, column);

    let order_id = field(COL_ORDER_ID)?.to_string();
    let product_id = field(COL_PRODUCT_ID)?.to_string();
    let customer_id = field(COL_CUSTOMER_ID)?.to_string();
    let product_name = field(COL_PRODUCT_NAME)?.to_string();
    let category = field(COL_CATEGORY)?.to_string();
    let region = field(COL_REGION)?.to_string();

    let raw_date = field(COL_SALE_DATE)?;
    let sale_date = sales_common::dates::parse_date(raw_date)
        .map_err(|_| ParseError::invalid("sale date", raw_date, "expected YYYY-MM-DD"))?;

    let raw_quantity = field(COL_QUANTITY)?;
    let quantity = raw_quantity
        .parse::<i32>()
        .map_err(|e| ParseError::invalid("quantity", raw_quantity, e))?;

    let unit_price = parse_decimal("unit price", field(COL_UNIT_PRICE)?)?;
    let discount = parse_decimal("discount", field(COL_DISCOUNT)?)?;
    let shipping_cost = parse_decimal("shipping cost", field(COL_SHIPPING_COST)?)?;

    Ok(SalesRecord {
        order_id,
        product_id,
        customer_id,
        product_name,
        category,
        region,
        sale_date,
        quantity,
        unit_price,
        discount,
        shipping_cost,
        payment_method: field(COL_PAYMENT_METHOD)?.to_string(),
        customer_name: field(COL_CUSTOMER_NAME)?.to_string(),
        customer_email: field(COL_CUSTOMER_EMAIL)?.to_string(),
        customer_address: field(COL_CUSTOMER_ADDRESS)?.to_string(),
    })
}

fn column_value<'r>(
    record: &'r StringRecord,
    columns: &ColumnIndex,
    column: &'static str,
) -> Result<&'r str, ParseError> {
    let position = columns.position(column).ok_or(ParseError::MissingColumn {
        column,
        cause: MissingCause::NotInHeader,
    })?;
    record.get(position).ok_or(ParseError::MissingColumn {
        column,
        cause: MissingCause::RecordTooShort {
            position,
            len: record.len(),
        },
    })
}

fn parse_decimal(field: &'static str, value: &str) -> Result<BigDecimal, ParseError> {
    BigDecimal::from_str(value).map_err(|e| ParseError::invalid(field, value, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn header() -> StringRecord {
        StringRecord::from(REQUIRED_COLUMNS.to_vec())
    }

    fn row(overrides: &[(&str, &str)]) -> StringRecord {
        let mut values = vec![
            "O1",
            "P1",
            "C1",
            "Widget",
            "Tools",
            "West",
            "2024-03-15",
            "2",
            "10.50",
            "0.1",
            "4.99",
            "Credit Card",
            "Ada Lovelace",
            "ada@example.com",
            "1 Analytical Way",
        ];
        for (column, value) in overrides {
            let i = REQUIRED_COLUMNS.iter().position(|c| c == column).unwrap();
            values[i] = *value;
        }
        StringRecord::from(values)
    }

    #[test]
    fn test_parse_valid_record() {
        let columns = ColumnIndex::from_header(&header());
        let record = parse_record(&row(&[]), &columns).unwrap();

        assert_eq!(record.order_id, "O1");
        assert_eq!(record.region, "West");
        assert_eq!(record.sale_date, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        assert_eq!(record.quantity, 2);
        assert_eq!(record.unit_price, BigDecimal::from_str("10.50").unwrap());
        assert_eq!(record.discount, BigDecimal::from_str("0.1").unwrap());
        assert_eq!(record.customer_address, "1 Analytical Way");
    }

    #[test]
    fn test_column_order_is_irrelevant() {
        let mut names: Vec<&str> = REQUIRED_COLUMNS.to_vec();
        names.reverse();
        names.push("Notes");
        let columns = ColumnIndex::from_header(&StringRecord::from(names));

        let mut values: Vec<String> = row(&[]).iter().map(str::to_string).collect();
        values.reverse();
        values.push("ignored".to_string());

        let record = parse_record(&StringRecord::from(values), &columns).unwrap();
        assert_eq!(record.product_id, "P1");
        assert_eq!(record.payment_method, "Credit Card");
    }

    #[test]
    fn test_duplicate_header_uses_last_position() {
        let columns = ColumnIndex::from_header(&StringRecord::from(vec!["Region", "x", "Region"]));
        assert_eq!(columns.position("Region"), Some(2));
        assert_eq!(columns.len(), 2);
    }

    #[test]
    fn test_missing_column_in_header() {
        let names: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|c| *c != COL_REGION)
            .collect();
        let columns = ColumnIndex::from_header(&StringRecord::from(names));
        assert_eq!(columns.missing_columns(), vec![COL_REGION]);

        let err = parse_record(&row(&[]), &columns).unwrap_err();
        assert_eq!(
            err,
            ParseError::MissingColumn {
                column: COL_REGION,
                cause: MissingCause::NotInHeader
            }
        );
    }

    #[test]
    fn test_short_record() {
        let columns = ColumnIndex::from_header(&header());
        let short = StringRecord::from(vec!["O1", "P1", "C1"]);

        let err = parse_record(&short, &columns).unwrap_err();
        assert_eq!(
            err,
            ParseError::MissingColumn {
                column: COL_PRODUCT_NAME,
                cause: MissingCause::RecordTooShort { position: 3, len: 3 }
            }
        );
    }

    #[test]
    fn test_invalid_quantity() {
        let columns = ColumnIndex::from_header(&header());
        let err = parse_record(&row(&[(COL_QUANTITY, "abc")]), &columns).unwrap_err();

        assert!(matches!(err, ParseError::InvalidFormat { field: "quantity", .. }));
        assert!(err.to_string().starts_with("invalid quantity 'abc'"));
    }

    #[test]
    fn test_invalid_dates() {
        let columns = ColumnIndex::from_header(&header());
        for value in ["2024/03/15", "2024-3-15", "2024-02-30", "15-03-2024"] {
            let err = parse_record(&row(&[(COL_SALE_DATE, value)]), &columns).unwrap_err();
            assert!(
                matches!(err, ParseError::InvalidFormat { field: "sale date", .. }),
                "{value} should be rejected"
            );
        }
    }

    #[test]
    fn test_invalid_decimals() {
        let columns = ColumnIndex::from_header(&header());

        let err = parse_record(&row(&[(COL_UNIT_PRICE, "ten")]), &columns).unwrap_err();
        assert!(matches!(err, ParseError::InvalidFormat { field: "unit price", .. }));

        let err = parse_record(&row(&[(COL_DISCOUNT, "n/a")]), &columns).unwrap_err();
        assert!(matches!(err, ParseError::InvalidFormat { field: "discount", .. }));

        let err = parse_record(&row(&[(COL_SHIPPING_COST, "4,99")]), &columns).unwrap_err();
        assert!(matches!(err, ParseError::InvalidFormat { field: "shipping cost", .. }));
    }

    #[test]
    fn test_discount_range_is_not_validated() {
        let columns = ColumnIndex::from_header(&header());
        let record = parse_record(&row(&[(COL_DISCOUNT, "1.5")]), &columns).unwrap();
        assert_eq!(record.discount, BigDecimal::from_str("1.5").unwrap());
    }
}

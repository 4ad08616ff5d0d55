//! CSV fixtures
//!
//! [`Sale`] builds one source line with sensible defaults; [`write_csv`]
//! writes a header plus lines to a temporary file that lives as long as the
//! returned handle.

use std::io::Write;

use sales_server::ingest::parser::REQUIRED_COLUMNS;
use tempfile::NamedTempFile;

/// One source record, every field kept as raw text
#[derive(Debug, Clone)]
pub struct Sale {
    pub order_id: String,
    pub product_id: String,
    pub customer_id: String,
    pub product_name: String,
    pub category: String,
    pub region: String,
    pub sale_date: String,
    pub quantity: String,
    pub unit_price: String,
    pub discount: String,
    pub shipping_cost: String,
    pub payment_method: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_address: String,
}

impl Sale {
    pub fn new(order_id: &str, product_id: &str) -> Self {
        Self {
            order_id: order_id.to_string(),
            product_id: product_id.to_string(),
            customer_id: "C1".to_string(),
            product_name: format!("Product {}", product_id),
            category: "Electronics".to_string(),
            region: "West".to_string(),
            sale_date: "2024-01-15".to_string(),
            quantity: "1".to_string(),
            unit_price: "10.00".to_string(),
            discount: "0".to_string(),
            shipping_cost: "5.00".to_string(),
            payment_method: "Credit Card".to_string(),
            customer_name: "Ada Lovelace".to_string(),
            customer_email: "ada@example.com".to_string(),
            customer_address: "12 Analytical Row, London".to_string(),
        }
    }

    pub fn customer(mut self, id: &str, name: &str) -> Self {
        self.customer_id = id.to_string();
        self.customer_name = name.to_string();
        self
    }

    pub fn product_name(mut self, name: &str) -> Self {
        self.product_name = name.to_string();
        self
    }

    pub fn category(mut self, category: &str) -> Self {
        self.category = category.to_string();
        self
    }

    pub fn region(mut self, region: &str) -> Self {
        self.region = region.to_string();
        self
    }

    pub fn date(mut self, date: &str) -> Self {
        self.sale_date = date.to_string();
        self
    }

    pub fn quantity(mut self, quantity: &str) -> Self {
        self.quantity = quantity.to_string();
        self
    }

    pub fn price(mut self, unit_price: &str) -> Self {
        self.unit_price = unit_price.to_string();
        self
    }

    pub fn discount(mut self, discount: &str) -> Self {
        self.discount = discount.to_string();
        self
    }

    pub fn payment(mut self, method: &str) -> Self {
        self.payment_method = method.to_string();
        self
    }

    /// Fields in [`REQUIRED_COLUMNS`] order
    pub fn fields(&self) -> [&str; 15] {
        [
            &self.order_id,
            &self.product_id,
            &self.customer_id,
            &self.product_name,
            &self.category,
            &self.region,
            &self.sale_date,
            &self.quantity,
            &self.unit_price,
            &self.discount,
            &self.shipping_cost,
            &self.payment_method,
            &self.customer_name,
            &self.customer_email,
            &self.customer_address,
        ]
    }

    pub fn to_line(&self) -> String {
        csv_line(&self.fields())
    }
}

/// Quote every field so embedded commas survive
pub fn csv_line(fields: &[&str]) -> String {
    fields
        .iter()
        .map(|f| format!("\"{}\"", f.replace('"', "\"\"")))
        .collect::<Vec<_>>()
        .join(",")
}

pub fn header_line() -> String {
    REQUIRED_COLUMNS.join(",")
}

/// Write raw text to a temporary `.csv` file
pub fn write_raw(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".csv")
        .tempfile()
        .expect("Failed to create temp file");
    file.write_all(contents.as_bytes())
        .expect("Failed to write fixture");
    file.flush().expect("Failed to flush fixture");
    file
}

/// Write the standard header followed by `sales`
pub fn write_csv(sales: &[Sale]) -> NamedTempFile {
    let mut contents = header_line();
    contents.push('\n');
    for sale in sales {
        contents.push_str(&sale.to_line());
        contents.push('\n');
    }
    write_raw(&contents)
}

/// Three lines, two orders: O1 has two items, O2 has one
pub fn two_order_sales() -> Vec<Sale> {
    vec![
        Sale::new("O1", "P1").quantity("2").price("10.00").discount("0.1"),
        Sale::new("O1", "P2")
            .category("Books")
            .quantity("1")
            .price("25.00"),
        Sale::new("O2", "P1")
            .customer("C2", "Grace Hopper")
            .region("East")
            .date("2024-02-20")
            .quantity("3")
            .price("10.00")
            .payment("PayPal"),
    ]
}

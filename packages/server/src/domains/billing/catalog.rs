//! The plans PlankPort sells. Prices are in cents.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingInterval {
    Month,
    Year,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Product {
    pub id: &'static str,
    pub price_id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub mode: &'static str,
    pub price: i64,
    pub currency: &'static str,
    pub interval: Option<BillingInterval>,
}

pub static PRODUCTS: [Product; 4] = [
    Product {
        id: "prod_SmyYbKMwD2n6U0",
        price_id: "price_1RrObjJqCJQV0KJv2AVmT6Q7",
        name: "PlankPort - Agency Plan (Yearly)",
        description: "PlankPort software agency plan yearly fee. Visit PlankPort at https://plankport.com",
        mode: "subscription",
        price: 286800,
        currency: "cad",
        interval: Some(BillingInterval::Year),
    },
    Product {
        id: "prod_SmyY5ixbKPiadi",
        price_id: "price_1RrOb0JqCJQV0KJvvLVh5ZDo",
        name: "PlankPort - Startup Plan (Yearly)",
        description: "PlankPort software startup plan yearly fee. Visit PlankPort at https://plankport.com",
        mode: "subscription",
        price: 94800,
        currency: "cad",
        interval: Some(BillingInterval::Year),
    },
    Product {
        id: "prod_SmyXiVU9k3fonx",
        price_id: "price_1RrOaKJqCJQV0KJvKrfVmjkZ",
        name: "PlankPort - Agency Plan (Monthly)",
        description: "PlankPort software agency plan monthly fee. Visit PlankPort at https://plankport.com",
        mode: "subscription",
        price: 29900,
        currency: "cad",
        interval: Some(BillingInterval::Month),
    },
    Product {
        id: "prod_SmyWSYT0pfVkJL",
        price_id: "price_1RrOZeJqCJQV0KJvZpYUsHvf",
        name: "PlankPort - Startup Plan (Monthly)",
        description: "PlankPort software startup plan monthly fee. Visit PlankPort at https://plankport.com",
        mode: "subscription",
        price: 9900,
        currency: "cad",
        interval: Some(BillingInterval::Month),
    },
];

pub fn product_by_price_id(price_id: &str) -> Option<&'static Product> {
    PRODUCTS.iter().find(|p| p.price_id == price_id)
}

/// en-CA currency formatting with a whole-dollar amount's `.00` dropped
/// ("$2,868", "$12.50", "US$99").
pub fn format_price(cents: i64, currency: &str) -> String {
    let code = currency.to_ascii_uppercase();
    let symbol = match code.as_str() {
        "CAD" => "$".to_string(),
        "USD" => "US$".to_string(),
        "EUR" => "€".to_string(),
        "GBP" => "£".to_string(),
        other => format!("{}\u{a0}", other),
    };

    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    let dollars = group_thousands(abs / 100);
    let formatted = format!("{}{}{}.{:02}", sign, symbol, dollars, abs % 100);

    match formatted.strip_suffix(".00") {
        Some(whole) => whole.to_string(),
        None => formatted,
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

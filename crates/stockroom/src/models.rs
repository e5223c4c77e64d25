//! Record types of the inventory backend.
//!
//! Field names follow the backend's camelCase JSON. Every model is queryable
//! through `stockroom_query::Record`; most derive it, [`Sale`] implements it by
//! hand to expose its nested `seller.name` and `customer.name`.

use serde::{Deserialize, Deserializer, Serialize};
use stockroom_macros::Record;
use stockroom_query::{Number, RecordDate, Value};

use crate::summary::StockStatus;

/// A product held in inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Record)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    #[record(Text, optional, rename = "_id")]
    pub id: Option<String>,

    #[record(Text, rename = "productId")]
    pub product_id: String,

    #[record(Text)]
    pub name: String,

    #[serde(default)]
    #[record(Text)]
    pub category: String,

    #[serde(deserialize_with = "number_or_text")]
    #[record(Number, rename = "buyingPrice")]
    pub buying_price: f64,

    #[record(Number)]
    pub quantity: u32,

    #[serde(default)]
    #[record(Text)]
    pub unit: String,

    #[serde(default)]
    #[record(Number, rename = "thresholdValue")]
    pub threshold_value: u32,

    #[serde(default)]
    #[record(Date, optional, rename = "expiryDate")]
    pub expiry_date: Option<String>,

    #[serde(default)]
    #[record(Text, rename = "supplierName")]
    pub supplier_name: String,

    #[serde(default)]
    #[record(Text, rename = "contactNumber")]
    pub contact_number: String,

    #[serde(default)]
    #[record(Date, optional, rename = "createdAt")]
    pub created_at: Option<String>,

    #[serde(default)]
    #[record(Date, optional, rename = "updatedAt")]
    pub updated_at: Option<String>,
}

impl Product {
    pub fn stock_status(&self) -> StockStatus {
        StockStatus::of(self.quantity, self.threshold_value)
    }

    /// Quantity times buying price.
    pub fn stock_value(&self) -> f64 {
        f64::from(self.quantity) * self.buying_price
    }
}

/// A purchase order placed with a supplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Record)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    #[record(Text, optional, rename = "_id")]
    pub id: Option<String>,

    #[record(Text, rename = "productName")]
    pub product_name: String,

    #[record(Text, rename = "productId")]
    pub product_id: String,

    #[serde(default)]
    #[record(Text)]
    pub category: String,

    #[serde(deserialize_with = "number_or_text")]
    #[record(Number, rename = "orderValue")]
    pub order_value: f64,

    #[record(Number)]
    pub quantity: u32,

    #[serde(default)]
    #[record(Text)]
    pub unit: String,

    #[serde(default, deserialize_with = "number_or_text")]
    #[record(Number, rename = "buyingPrice")]
    pub buying_price: f64,

    #[serde(default)]
    #[record(Date, optional, rename = "deliveryDate")]
    pub delivery_date: Option<String>,

    #[serde(default)]
    #[record(Text)]
    pub status: String,

    #[serde(default)]
    #[record(Date, optional, rename = "createdAt")]
    pub created_at: Option<String>,
}

/// Seller or customer on a sale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Party {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// One product line of a sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    #[serde(default)]
    pub product_id: String,
    pub name: String,
    pub quantity: u32,
    #[serde(deserialize_with = "number_or_text")]
    pub price: f64,
}

/// A completed sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub seller: Party,
    #[serde(default)]
    pub customer: Party,
    #[serde(default)]
    pub cart: Vec<LineItem>,
    #[serde(deserialize_with = "number_or_text")]
    pub total_amount: f64,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Sale {
    pub const FIELDS: &'static [&'static str] = &[
        "_id",
        "seller.name",
        "customer.name",
        "items",
        "totalAmount",
        "createdAt",
    ];

    /// Total units across the cart.
    pub fn item_count(&self) -> u32 {
        self.cart.iter().map(|line| line.quantity).sum()
    }
}

impl stockroom_query::Record for Sale {
    fn field_value(&self, field: &str) -> Value<'_> {
        match field {
            "_id" => self.id.as_deref().into(),
            "seller.name" => Value::Text(&self.seller.name),
            "customer.name" => Value::Text(&self.customer.name),
            "items" => Value::Number(Number::from(self.item_count())),
            "totalAmount" => Value::Number(Number::from(self.total_amount)),
            "createdAt" => self.created_at.as_ref().and_then(|d| d.record_date()).into(),
            _ => Value::None,
        }
    }

    fn field_names() -> Option<&'static [&'static str]> {
        Some(Self::FIELDS)
    }
}

/// A store branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Record)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    #[record(Text, optional, rename = "_id")]
    pub id: Option<String>,

    #[record(Text)]
    pub name: String,

    #[serde(default)]
    #[record(Text)]
    pub branch: String,

    #[serde(default)]
    #[record(Text)]
    pub address: String,

    #[serde(default)]
    #[record(Text)]
    pub contact: String,
}

/// A supplier and the product it delivers.
///
/// The backend keeps the supplier form's own field names, so several of them
/// are not camelCase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Record)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    #[record(Text, optional, rename = "_id")]
    pub id: Option<String>,

    #[record(Text, rename = "supplierName")]
    pub supplier_name: String,

    #[serde(default)]
    #[record(Text)]
    pub email: String,

    #[serde(default)]
    #[record(Text)]
    pub contact: String,

    #[serde(rename = "ProductName", default)]
    #[record(Text, rename = "ProductName")]
    pub product_name: String,

    #[serde(default)]
    #[record(Text)]
    pub category: String,

    #[serde(rename = "BuyingPrice", default, deserialize_with = "number_or_text")]
    #[record(Number, rename = "BuyingPrice")]
    pub buying_price: f64,

    /// `Taking Return` or `Not Taking Return`.
    #[serde(rename = "Type", default)]
    #[record(Text, rename = "Type")]
    pub supply_type: String,

    #[serde(default, deserialize_with = "number_or_text")]
    #[record(Number, rename = "onTheWay")]
    pub on_the_way: f64,
}

impl Supplier {
    pub fn takes_returns(&self) -> bool {
        self.supply_type.eq_ignore_ascii_case("Taking Return")
    }
}

/// Accepts `12.5` as well as `"12.5"`, the backend sends both.
fn number_or_text<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("invalid number: {:?}", s))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use stockroom_query::Record;

    fn rice() -> Product {
        serde_json::from_value(json!({
            "_id": "64f1",
            "productId": "P-001",
            "name": "Rice",
            "category": "Grains",
            "buyingPrice": "20.5",
            "quantity": 4,
            "unit": "kg",
            "thresholdValue": 5,
            "expiryDate": "2025-03-01",
            "createdAt": "2024-05-01T10:00:00.000Z"
        }))
        .unwrap()
    }

    #[test]
    fn product_from_backend_json() {
        let p = rice();
        assert_eq!(p.id.as_deref(), Some("64f1"));
        assert_eq!(p.buying_price, 20.5);
        assert_eq!(p.supplier_name, "");
        assert_eq!(p.updated_at, None);
        assert_eq!(p.stock_status(), StockStatus::LowStock);
        assert_eq!(p.stock_value(), 82.0);
    }

    #[test]
    fn product_fields() {
        let p = rice();
        assert_eq!(p.field_value(Product::PRODUCT_ID), Value::Text("P-001"));
        assert_eq!(
            p.field_value(Product::CREATED_AT),
            Value::Date(chrono::NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())
        );
        assert_eq!(p.field_value(Product::UPDATED_AT), Value::None);
        assert!(Product::FIELDS.contains(&"thresholdValue"));
    }

    #[test]
    fn product_serializes_camel_case() {
        let value = serde_json::to_value(rice()).unwrap();
        assert_eq!(value["productId"], "P-001");
        assert_eq!(value["buyingPrice"], 20.5);
        assert_eq!(value["_id"], "64f1");
    }

    #[test]
    fn invalid_number_text_is_rejected() {
        let err = serde_json::from_value::<Order>(json!({
            "productName": "Oil",
            "productId": "P-2",
            "orderValue": "lots",
            "quantity": 1
        }))
        .unwrap_err();
        assert!(err.to_string().contains("invalid number"));
    }

    #[test]
    fn supplier_from_form_fields() {
        let supplier: Supplier = serde_json::from_value(json!({
            "_id": "s1",
            "supplierName": "Acme Grains",
            "email": "sales@acme.test",
            "contact": "555-0101",
            "ProductName": "Rice",
            "category": "Grains",
            "BuyingPrice": "18",
            "Type": "Taking Return"
        }))
        .unwrap();

        assert_eq!(supplier.buying_price, 18.0);
        assert_eq!(supplier.on_the_way, 0.0);
        assert!(supplier.takes_returns());
        assert_eq!(supplier.field_value(Supplier::PRODUCT_NAME), Value::Text("Rice"));
        assert_eq!(supplier.field_value("Type"), Value::Text("Taking Return"));

        let value = serde_json::to_value(&supplier).unwrap();
        assert_eq!(value["ProductName"], "Rice");
        assert_eq!(value["BuyingPrice"], 18.0);
        assert_eq!(value["onTheWay"], 0.0);
    }

    #[test]
    fn sale_nested_fields() {
        let sale: Sale = serde_json::from_value(json!({
            "seller": {"name": "Mia"},
            "customer": {"name": "Leo", "email": "leo@example.com"},
            "cart": [
                {"productId": "P-1", "name": "Rice", "quantity": 2, "price": 10},
                {"productId": "P-2", "name": "Oil", "quantity": 1, "price": "4.5"}
            ],
            "totalAmount": "24.50",
            "createdAt": "2024-05-03T00:00:00.000Z"
        }))
        .unwrap();

        assert_eq!(sale.field_value("seller.name"), Value::Text("Mia"));
        assert_eq!(sale.field_value("customer.name"), Value::Text("Leo"));
        assert_eq!(sale.field_value("items"), Value::Number(Number::U64(3)));
        assert_eq!(sale.field_value("totalAmount"), Value::Number(Number::F64(24.5)));
        assert_eq!(sale.field_value("_id"), Value::None);
        assert_eq!(Sale::field_names(), Some(Sale::FIELDS));
    }
}

//! # Wire Types
//!
//! The server's JSON shapes, and their conversion to and from core records.
//!
//! ## Casing Boundary
//! ```text
//! ┌──────────────────────────┐          ┌──────────────────────────────────┐
//! │  till-core (snake_case)  │          │  server JSON                     │
//! │                          │          │                                  │
//! │  Product.id              │ ◄──────► │  productId     (number|string)   │
//! │  retail_price_cents 1999 │ ◄──────► │  retailPrice   19.99             │
//! │  image_url               │ ◄──────► │  imageURL                        │
//! │  created_at              │ ◄──────► │  creationDate                    │
//! │  updated_at              │ ◄──────► │  updationDate                    │
//! │                          │          │                                  │
//! │  Salesperson.id          │ ◄──────► │  salespersonID                   │
//! │  created_at / updated_at │ ◄──────► │  enteredDate / updatedDate       │
//! │                          │          │                                  │
//! │  Sale.id / line_items    │ ◄──────► │  saleId / saleItems[]            │
//! │  discount_bps 1250       │ ◄──────► │  discount 12.5                   │
//! └──────────────────────────┘          └──────────────────────────────────┘
//! ```
//!
//! Nothing outside this module knows the server's field names.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use till_core::pricing::DiscountRate;
use till_core::{Money, Product, Record, Sale, SaleLineItem, Salesperson};

// =============================================================================
// Resource Mapping
// =============================================================================

/// A core record that the server exposes as a REST resource.
pub trait RemoteResource: Record {
    /// The server's JSON shape for this record.
    type Wire: Serialize + DeserializeOwned + Send;

    /// Path segment under the base URL.
    const PATH: &'static str;

    fn to_wire(&self) -> Self::Wire;

    fn from_wire(wire: Self::Wire) -> Self;
}

// =============================================================================
// Field Codecs
// =============================================================================

/// Ids arrive as numbers or strings; they are kept as strings.
fn de_id<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    match Value::deserialize(d)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(de::Error::custom(format!("expected id, got {other}"))),
    }
}

/// Numeric ids go back out as numbers.
fn ser_id<S: Serializer>(id: &str, s: S) -> Result<S::Ok, S::Error> {
    match id.parse::<i64>() {
        Ok(n) if !id.starts_with('0') || id == "0" => s.serialize_i64(n),
        _ => s.serialize_str(id),
    }
}

/// Decimal amounts arrive as numbers (19.99) or strings ("19.99").
fn de_money<'de, D: Deserializer<'de>>(d: D) -> Result<Money, D::Error> {
    match Value::deserialize(d)? {
        Value::Number(n) => n
            .as_f64()
            .map(Money::from_major_f64)
            .ok_or_else(|| de::Error::custom("amount out of range")),
        Value::String(s) => s.parse::<Money>().map_err(de::Error::custom),
        Value::Null => Ok(Money::zero()),
        other => Err(de::Error::custom(format!("expected amount, got {other}"))),
    }
}

fn ser_money<S: Serializer>(money: &Money, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(money.to_major_f64())
}

fn de_percent<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    match Value::deserialize(d)? {
        Value::Number(n) => n.as_f64().ok_or_else(|| de::Error::custom("discount out of range")),
        Value::String(s) => s.trim().parse::<f64>().map_err(de::Error::custom),
        Value::Null => Ok(0.0),
        other => Err(de::Error::custom(format!("expected discount, got {other}"))),
    }
}

/// Timestamps with an offset, or naive server-local times taken as UTC.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|naive| naive.and_utc())
        })
}

fn de_timestamp<'de, D: Deserializer<'de>>(d: D) -> Result<Option<DateTime<Utc>>, D::Error> {
    let raw: Option<String> = Option::deserialize(d)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => parse_timestamp(text)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("invalid timestamp '{text}'"))),
    }
}

fn non_empty(text: Option<String>) -> Option<String> {
    text.filter(|t| !t.trim().is_empty())
}

// =============================================================================
// Product
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductWire {
    #[serde(rename = "productId", default, deserialize_with = "de_id", serialize_with = "ser_id")]
    pub product_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub code: String,
    #[serde(rename = "costPrice", default, deserialize_with = "de_money", serialize_with = "ser_money")]
    pub cost_price: Money,
    #[serde(rename = "retailPrice", default, deserialize_with = "de_money", serialize_with = "ser_money")]
    pub retail_price: Money,
    #[serde(rename = "imageURL", default)]
    pub image_url: Option<String>,
    #[serde(rename = "creationDate", default, deserialize_with = "de_timestamp")]
    pub creation_date: Option<DateTime<Utc>>,
    #[serde(rename = "updationDate", default, deserialize_with = "de_timestamp")]
    pub updation_date: Option<DateTime<Utc>>,
}

impl RemoteResource for Product {
    type Wire = ProductWire;
    const PATH: &'static str = "products";

    fn to_wire(&self) -> ProductWire {
        ProductWire {
            product_id: self.id.clone(),
            name: self.name.clone(),
            code: self.code.clone(),
            cost_price: self.cost_price(),
            retail_price: self.retail_price(),
            image_url: self.image_url.clone(),
            creation_date: Some(self.created_at),
            updation_date: self.updated_at,
        }
    }

    fn from_wire(wire: ProductWire) -> Product {
        Product {
            id: wire.product_id,
            name: wire.name,
            code: wire.code,
            cost_price_cents: wire.cost_price.cents(),
            retail_price_cents: wire.retail_price.cents(),
            image_url: non_empty(wire.image_url),
            created_at: wire.creation_date.unwrap_or_default(),
            updated_at: wire.updation_date,
        }
    }
}

// =============================================================================
// Salesperson
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalespersonWire {
    #[serde(rename = "salespersonID", default, deserialize_with = "de_id", serialize_with = "ser_id")]
    pub salesperson_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub code: String,
    #[serde(rename = "enteredDate", default, deserialize_with = "de_timestamp")]
    pub entered_date: Option<DateTime<Utc>>,
    #[serde(rename = "updatedDate", default, deserialize_with = "de_timestamp")]
    pub updated_date: Option<DateTime<Utc>>,
}

impl RemoteResource for Salesperson {
    type Wire = SalespersonWire;
    const PATH: &'static str = "salespersons";

    fn to_wire(&self) -> SalespersonWire {
        SalespersonWire {
            salesperson_id: self.id.clone(),
            name: self.name.clone(),
            code: self.code.clone(),
            entered_date: Some(self.created_at),
            updated_date: self.updated_at,
        }
    }

    fn from_wire(wire: SalespersonWire) -> Salesperson {
        Salesperson {
            id: wire.salesperson_id,
            name: wire.name,
            code: wire.code,
            created_at: wire.entered_date.unwrap_or_default(),
            updated_at: wire.updated_date,
        }
    }
}

// =============================================================================
// Sale
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleItemWire {
    #[serde(rename = "productId", default, deserialize_with = "de_id", serialize_with = "ser_id")]
    pub product_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub code: String,
    #[serde(rename = "retailPrice", default, deserialize_with = "de_money", serialize_with = "ser_money")]
    pub retail_price: Money,
    #[serde(default)]
    pub quantity: f64,
    /// Percentage, e.g. `12.5`.
    #[serde(default, deserialize_with = "de_percent")]
    pub discount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleWire {
    #[serde(rename = "saleId", default, deserialize_with = "de_id", serialize_with = "ser_id")]
    pub sale_id: String,
    #[serde(rename = "salespersonId", default, deserialize_with = "de_id", serialize_with = "ser_id")]
    pub salesperson_id: String,
    #[serde(default)]
    pub comments: Option<String>,
    #[serde(default, deserialize_with = "de_money", serialize_with = "ser_money")]
    pub total: Money,
    #[serde(rename = "creationDate", default, deserialize_with = "de_timestamp")]
    pub creation_date: Option<DateTime<Utc>>,
    #[serde(rename = "updatedDate", default, deserialize_with = "de_timestamp")]
    pub updated_date: Option<DateTime<Utc>>,
    #[serde(rename = "saleItems", default)]
    pub sale_items: Vec<SaleItemWire>,
}

impl SaleItemWire {
    fn from_line(line: &SaleLineItem) -> Self {
        SaleItemWire {
            product_id: line.product_id.clone(),
            name: line.name.clone(),
            code: line.code.clone(),
            retail_price: line.unit_price(),
            quantity: line.quantity as f64,
            discount: line.discount().percent(),
        }
    }

    /// Server values are taken as stored; out-of-range lines are reported by
    /// validation when the sale is next edited, not silently repaired here.
    fn into_line(self) -> SaleLineItem {
        SaleLineItem {
            product_id: self.product_id,
            name: self.name,
            code: self.code,
            unit_price_cents: self.retail_price.cents(),
            quantity: self.quantity.round() as i64,
            discount_bps: DiscountRate::from_percent(self.discount).bps(),
        }
    }
}

impl RemoteResource for Sale {
    type Wire = SaleWire;
    const PATH: &'static str = "sales";

    fn to_wire(&self) -> SaleWire {
        SaleWire {
            sale_id: self.id.clone(),
            salesperson_id: self.salesperson_id.clone(),
            comments: self.comments.clone(),
            total: self.total(),
            creation_date: Some(self.created_at),
            updated_date: self.updated_at,
            sale_items: self.line_items.iter().map(SaleItemWire::from_line).collect(),
        }
    }

    fn from_wire(wire: SaleWire) -> Sale {
        Sale {
            id: wire.sale_id,
            created_at: wire.creation_date.unwrap_or_default(),
            updated_at: wire.updated_date,
            salesperson_id: wire.salesperson_id,
            comments: non_empty(wire.comments),
            line_items: wire.sale_items.into_iter().map(SaleItemWire::into_line).collect(),
            total_cents: wire.total.cents(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_product_from_server_json() {
        let raw = json!({
            "productId": 42,
            "name": "Cola",
            "code": "BEV-001",
            "costPrice": 0.8,
            "retailPrice": "1.50",
            "imageURL": "",
            "creationDate": "2024-03-10T14:30:00",
            "updationDate": null
        });
        let wire: ProductWire = serde_json::from_value(raw).unwrap();
        let product = Product::from_wire(wire);

        assert_eq!(product.id, "42");
        assert_eq!(product.cost_price_cents, 80);
        assert_eq!(product.retail_price_cents, 150);
        assert_eq!(product.image_url, None);
        assert_eq!(
            product.created_at,
            Utc.with_ymd_and_hms(2024, 3, 10, 14, 30, 0).unwrap()
        );
        assert!(product.updated_at.is_none());
    }

    #[test]
    fn test_product_to_wire_casing() {
        let product = Product {
            id: "7".into(),
            name: "Cola".into(),
            code: "BEV-001".into(),
            cost_price_cents: 80,
            retail_price_cents: 150,
            image_url: Some("https://img/cola.png".into()),
            created_at: Utc.with_ymd_and_hms(2024, 3, 10, 14, 30, 0).unwrap(),
            updated_at: None,
        };
        let value = serde_json::to_value(product.to_wire()).unwrap();

        assert_eq!(value["productId"], json!(7));
        assert_eq!(value["retailPrice"], json!(1.5));
        assert_eq!(value["imageURL"], json!("https://img/cola.png"));
        assert_eq!(value["updationDate"], Value::Null);
    }

    #[test]
    fn test_uuid_ids_stay_strings() {
        let sp = Salesperson {
            id: "0a1b-uuid".into(),
            name: "Ayesha".into(),
            code: "SP-01".into(),
            created_at: Utc::now(),
            updated_at: None,
        };
        let value = serde_json::to_value(sp.to_wire()).unwrap();
        assert_eq!(value["salespersonID"], json!("0a1b-uuid"));
        assert!(value.get("enteredDate").is_some());
    }

    #[test]
    fn test_sale_items_round_discount_and_price() {
        let raw = json!({
            "saleId": "s-9",
            "salespersonId": 3,
            "comments": "walk-in",
            "total": 36.0,
            "creationDate": "2024-03-10T14:30:00Z",
            "saleItems": [
                {"productId": 1, "name": "Cola", "code": "BEV-001",
                 "retailPrice": 20.0, "quantity": 2, "discount": 10}
            ]
        });
        let sale = Sale::from_wire(serde_json::from_value(raw).unwrap());

        assert_eq!(sale.salesperson_id, "3");
        assert_eq!(sale.total_cents, 3600);
        assert_eq!(sale.line_items[0].discount_bps, 1000);
        assert_eq!(sale.line_items[0].quantity, 2);
        assert_eq!(sale.line_items[0].amount().cents(), 3600);
    }

    #[test]
    fn test_bad_timestamp_is_rejected() {
        let raw = json!({"salespersonID": 1, "enteredDate": "yesterday"});
        assert!(serde_json::from_value::<SalespersonWire>(raw).is_err());
    }
}

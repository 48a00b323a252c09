//! # Domain Types
//!
//! Core records used throughout Till POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────────┐   │
//! │  │    Product      │   │  Salesperson    │   │        Sale         │   │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────────  │   │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)          │   │
//! │  │  code (locked)  │   │  code (locked)  │   │  salesperson_id ────┼─► │
//! │  │  name           │   │  name           │   │  comments           │   │
//! │  │  cost / retail  │   └─────────────────┘   │  total_cents        │   │
//! │  │  image_url      │                         │  line_items[]       │   │
//! │  └────────┬────────┘                         └──────────┬──────────┘   │
//! │           │ snapshot on pick                            │              │
//! │           └──────────────────►  SaleLineItem  ◄─────────┘              │
//! │                                 product_id, name, code,                │
//! │                                 unit_price, quantity, discount         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Semantics
//! A line item copies the product's name, code and retail price at the moment
//! it is picked. Editing or deleting the product later never rewrites a sale.
//!
//! ## Dual-Key Identity Pattern
//! Products and salespersons have:
//! - `id`: UUID v4 (or the server's id), used for references
//! - `code`: human-readable business key, unique and immutable after creation

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::listing::SortKey;
use crate::money::Money;
use crate::pricing::{line_amount, DiscountRate};

// =============================================================================
// Record Trait
// =============================================================================

/// Behaviour shared by every stored collection.
///
/// Stores, list views and the blob repository are written once against this
/// trait rather than once per record type.
pub trait Record: Clone + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Human name of the entity, used in messages ("Product", "Sale").
    const ENTITY: &'static str;

    /// Key of the JSON array in the local blob store.
    const STORAGE_KEY: &'static str;

    fn id(&self) -> &str;

    fn created_at(&self) -> DateTime<Utc>;

    fn updated_at(&self) -> Option<DateTime<Utc>>;

    /// Case-insensitive substring match. `needle` is already lowercased.
    fn matches(&self, needle: &str) -> bool;

    /// Orders two records by the given key, ascending.
    fn compare_by(&self, other: &Self, key: SortKey) -> Ordering;
}

fn contains_lower(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

fn by_created<R: Record>(a: &R, b: &R) -> Ordering {
    a.created_at().cmp(&b.created_at())
}

fn by_updated<R: Record>(a: &R, b: &R) -> Ordering {
    a.updated_at()
        .cmp(&b.updated_at())
        .then_with(|| by_created(a, b))
}

fn by_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

// =============================================================================
// Product
// =============================================================================

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Unique identifier.
    pub id: String,

    /// Display name shown in lists and copied onto sale lines.
    pub name: String,

    /// Business code, unique (case-insensitive) and locked after creation.
    pub code: String,

    /// Purchase cost in cents.
    pub cost_price_cents: i64,

    /// Selling price in cents.
    pub retail_price_cents: i64,

    /// Optional picture for the catalog.
    pub image_url: Option<String>,

    /// When the product was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// When the product was last changed; `None` until the first real edit.
    #[ts(as = "Option<String>")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Returns the retail price as Money.
    #[inline]
    pub fn retail_price(&self) -> Money {
        Money::from_cents(self.retail_price_cents)
    }

    /// Returns the cost price as Money.
    #[inline]
    pub fn cost_price(&self) -> Money {
        Money::from_cents(self.cost_price_cents)
    }
}

impl Record for Product {
    const ENTITY: &'static str = "Product";
    const STORAGE_KEY: &'static str = "products";

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    fn matches(&self, needle: &str) -> bool {
        contains_lower(&self.name, needle) || contains_lower(&self.code, needle)
    }

    fn compare_by(&self, other: &Self, key: SortKey) -> Ordering {
        match key {
            SortKey::Created => by_created(self, other),
            SortKey::Updated => by_updated(self, other),
            SortKey::Name => by_text(&self.name, &other.name),
            SortKey::Code => by_text(&self.code, &other.code),
            SortKey::Amount => self.retail_price_cents.cmp(&other.retail_price_cents),
        }
    }
}

// =============================================================================
// Salesperson
// =============================================================================

/// A member of the sales roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Salesperson {
    pub id: String,
    pub name: String,
    /// Locked after creation.
    pub code: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "Option<String>")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Record for Salesperson {
    const ENTITY: &'static str = "Salesperson";
    const STORAGE_KEY: &'static str = "salespersons";

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    fn matches(&self, needle: &str) -> bool {
        contains_lower(&self.name, needle) || contains_lower(&self.code, needle)
    }

    fn compare_by(&self, other: &Self, key: SortKey) -> Ordering {
        match key {
            SortKey::Created | SortKey::Amount => by_created(self, other),
            SortKey::Updated => by_updated(self, other),
            SortKey::Name => by_text(&self.name, &other.name),
            SortKey::Code => by_text(&self.code, &other.code),
        }
    }
}

// =============================================================================
// Sale Line Item
// =============================================================================

/// One product entry within a sale.
///
/// Name, code and unit price are snapshots taken when the product was picked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleLineItem {
    /// The product this line was picked from. May no longer exist.
    pub product_id: String,

    /// Product name at the time of sale.
    pub name: String,

    /// Product code at the time of sale.
    pub code: String,

    /// Retail price at the time of sale, in cents.
    pub unit_price_cents: i64,

    /// Quantity sold (at least 1 once coerced).
    pub quantity: i64,

    /// Discount in basis points (1000 = 10%).
    pub discount_bps: u32,
}

impl SaleLineItem {
    /// Snapshots a product as a new line with quantity 1 and no discount.
    pub fn from_product(product: &Product) -> Self {
        Self {
            product_id: product.id.clone(),
            name: product.name.clone(),
            code: product.code.clone(),
            unit_price_cents: product.retail_price_cents,
            quantity: 1,
            discount_bps: 0,
        }
    }

    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    #[inline]
    pub fn discount(&self) -> DiscountRate {
        DiscountRate::from_bps(self.discount_bps)
    }

    /// Discounted amount for this line, rounded to cents and floored at zero.
    pub fn amount(&self) -> Money {
        line_amount(self.unit_price(), self.quantity, self.discount())
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A recorded sale.
///
/// ## Invariant
/// `total_cents` always equals the sum of the line amounts. It is computed by
/// [`crate::pricing::validate_sale`] and stored so lists can sort by it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Sale {
    pub id: String,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "Option<String>")]
    pub updated_at: Option<DateTime<Utc>>,

    /// Who made the sale. The salesperson may since have been deleted.
    pub salesperson_id: String,

    pub comments: Option<String>,

    pub line_items: Vec<SaleLineItem>,

    pub total_cents: i64,
}

impl Sale {
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// Number of units across all lines.
    pub fn item_count(&self) -> i64 {
        self.line_items.iter().map(|item| item.quantity).sum()
    }
}

impl Record for Sale {
    const ENTITY: &'static str = "Sale";
    const STORAGE_KEY: &'static str = "salesRecords";

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    fn matches(&self, needle: &str) -> bool {
        self.comments
            .as_deref()
            .is_some_and(|c| contains_lower(c, needle))
            || contains_lower(&self.salesperson_id, needle)
            || contains_lower(&self.id, needle)
            || self.total().to_string().contains(needle)
    }

    fn compare_by(&self, other: &Self, key: SortKey) -> Ordering {
        match key {
            SortKey::Created => by_created(self, other),
            SortKey::Updated => by_updated(self, other),
            SortKey::Name => by_text(&self.salesperson_id, &other.salesperson_id),
            SortKey::Code => by_text(&self.id, &other.id),
            SortKey::Amount => self.total_cents.cmp(&other.total_cents),
        }
    }
}

// =============================================================================
// Inputs
// =============================================================================

/// User-entered product fields, before an id or timestamps exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductInput {
    pub name: String,
    pub code: String,
    pub image_url: Option<String>,
    pub cost_price: Money,
    pub retail_price: Money,
}

/// User-entered salesperson fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalespersonInput {
    pub name: String,
    pub code: String,
}

// =============================================================================
// Unit Tests
// =============================================================================

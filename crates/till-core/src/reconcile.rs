//! # Reconciliation
//!
//! Rules for creating records and for applying edits to stored ones.
//!
//! ## Edit Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  stored record + edited fields                                          │
//! │          │                                                              │
//! │          ▼                                                              │
//! │  validate fields (names, prices, lines, total)                          │
//! │          │                                                              │
//! │          ▼                                                              │
//! │  compare with stored ── all equal ──► Change::Unchanged (no write)      │
//! │          │                                                              │
//! │          │ something differs                                            │
//! │          ▼                                                              │
//! │  Change::Updated(record)                                                │
//! │    id, code, created_at copied from stored                              │
//! │    updated_at = now                                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Codes are locked: an edit carries no code at all, so there is nothing to
//! compare or overwrite.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::CoreResult;
use crate::money::Money;
use crate::pricing::validate_sale;
use crate::types::{Product, ProductInput, Sale, SaleLineItem, Salesperson, SalespersonInput};
use crate::validation::{
    validate_code, validate_comments, validate_image_url, validate_name, validate_price,
};

// =============================================================================
// Change
// =============================================================================

/// Outcome of applying an edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change<T> {
    /// Every compared field equals the stored value. Nothing should be written.
    Unchanged,
    /// The record to persist.
    Updated(T),
}

impl<T> Change<T> {
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Change::Unchanged)
    }

    pub fn into_updated(self) -> Option<T> {
        match self {
            Change::Unchanged => None,
            Change::Updated(record) => Some(record),
        }
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Product
// =============================================================================

/// Editable product fields. The code is not among them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductEdit {
    pub name: String,
    pub image_url: Option<String>,
    pub cost_price: Money,
    pub retail_price: Money,
}

impl Product {
    /// Builds a new product from validated input.
    ///
    /// Code uniqueness is checked by the caller against the collection.
    pub fn create(input: ProductInput, now: DateTime<Utc>) -> CoreResult<Product> {
        Ok(Product {
            id: new_id(),
            name: validate_name("Product name", &input.name)?,
            code: validate_code("Product code", &input.code)?,
            cost_price_cents: validate_price("Cost price", input.cost_price)?.cents(),
            retail_price_cents: validate_price("Retail price", input.retail_price)?.cents(),
            image_url: validate_image_url(input.image_url.as_deref())?,
            created_at: now,
            updated_at: None,
        })
    }

    /// Applies an edit. Name, image, cost and retail price are compared.
    pub fn apply_edit(&self, edit: ProductEdit, now: DateTime<Utc>) -> CoreResult<Change<Product>> {
        let name = validate_name("Product name", &edit.name)?;
        let image_url = validate_image_url(edit.image_url.as_deref())?;
        let cost = validate_price("Cost price", edit.cost_price)?.cents();
        let retail = validate_price("Retail price", edit.retail_price)?.cents();

        if name == self.name
            && image_url == self.image_url
            && cost == self.cost_price_cents
            && retail == self.retail_price_cents
        {
            return Ok(Change::Unchanged);
        }

        Ok(Change::Updated(Product {
            name,
            image_url,
            cost_price_cents: cost,
            retail_price_cents: retail,
            updated_at: Some(now),
            ..self.clone()
        }))
    }
}

// =============================================================================
// Salesperson
// =============================================================================

impl Salesperson {
    /// Builds a new salesperson from validated input.
    pub fn create(input: SalespersonInput, now: DateTime<Utc>) -> CoreResult<Salesperson> {
        Ok(Salesperson {
            id: new_id(),
            name: validate_name("Salesperson name", &input.name)?,
            code: validate_code("Salesperson code", &input.code)?,
            created_at: now,
            updated_at: None,
        })
    }

    /// Renames a salesperson. Only the name is editable.
    pub fn apply_edit(&self, name: &str, now: DateTime<Utc>) -> CoreResult<Change<Salesperson>> {
        let name = validate_name("Salesperson name", name)?;
        if name == self.name {
            return Ok(Change::Unchanged);
        }
        Ok(Change::Updated(Salesperson {
            name,
            updated_at: Some(now),
            ..self.clone()
        }))
    }
}

// =============================================================================
// Sale
// =============================================================================

/// Editable sale fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleEdit {
    pub salesperson_id: String,
    pub comments: Option<String>,
    pub line_items: Vec<SaleLineItem>,
}

impl Sale {
    /// Validates a new sale and computes its total.
    pub fn create(edit: SaleEdit, now: DateTime<Utc>) -> CoreResult<Sale> {
        let total = validate_sale(&edit.salesperson_id, &edit.line_items)?;
        Ok(Sale {
            id: new_id(),
            created_at: now,
            updated_at: None,
            salesperson_id: edit.salesperson_id.trim().to_string(),
            comments: validate_comments(edit.comments.as_deref())?,
            line_items: edit.line_items,
            total_cents: total.cents(),
        })
    }

    /// Applies an edit to a stored sale.
    ///
    /// The update goes through only if the total, salesperson, comments or
    /// line items (deep, in order) differ from what is stored.
    pub fn apply_edit(&self, edit: SaleEdit, now: DateTime<Utc>) -> CoreResult<Change<Sale>> {
        let total = validate_sale(&edit.salesperson_id, &edit.line_items)?;
        let salesperson_id = edit.salesperson_id.trim().to_string();
        let comments = validate_comments(edit.comments.as_deref())?;

        if total.cents() == self.total_cents
            && salesperson_id == self.salesperson_id
            && comments == self.comments
            && edit.line_items == self.line_items
        {
            return Ok(Change::Unchanged);
        }

        Ok(Change::Updated(Sale {
            id: self.id.clone(),
            created_at: self.created_at,
            updated_at: Some(now),
            salesperson_id,
            comments,
            line_items: edit.line_items,
            total_cents: total.cents(),
        }))
    }

    /// The stored fields as an edit, for loading a sale into a draft.
    pub fn to_edit(&self) -> SaleEdit {
        SaleEdit {
            salesperson_id: self.salesperson_id.clone(),
            comments: self.comments.clone(),
            line_items: self.line_items.clone(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, 14, 30, 0).unwrap()
    }

    fn cola() -> Product {
        Product::create(
            ProductInput {
                name: "Cola".into(),
                code: "BEV-001".into(),
                image_url: None,
                cost_price: Money::from_cents(80),
                retail_price: Money::from_cents(150),
            },
            t0(),
        )
        .unwrap()
    }

    fn sale() -> Sale {
        let mut line = SaleLineItem::from_product(&cola());
        line.quantity = 2;
        Sale::create(
            SaleEdit {
                salesperson_id: "sp-1".into(),
                comments: Some("first".into()),
                line_items: vec![line],
            },
            t0(),
        )
        .unwrap()
    }

    #[test]
    fn test_create_product_fills_identity() {
        let product = cola();
        assert!(Uuid::parse_str(&product.id).is_ok());
        assert_eq!(product.created_at, t0());
        assert!(product.updated_at.is_none());
    }

    #[test]
    fn test_create_product_rejects_negative_price() {
        let err = Product::create(
            ProductInput {
                name: "Cola".into(),
                code: "BEV-001".into(),
                image_url: None,
                cost_price: Money::from_cents(-1),
                retail_price: Money::from_cents(150),
            },
            t0(),
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn test_product_noop_edit_is_unchanged() {
        let product = cola();
        let edit = ProductEdit {
            name: " Cola ".into(),
            image_url: Some("".into()),
            cost_price: product.cost_price(),
            retail_price: product.retail_price(),
        };
        assert!(product.apply_edit(edit, t0() + Duration::hours(1)).unwrap().is_unchanged());
    }

    #[test]
    fn test_product_edit_keeps_code_and_created_at() {
        let product = cola();
        let later = t0() + Duration::days(2);
        let edit = ProductEdit {
            name: "Cola Zero".into(),
            image_url: None,
            cost_price: product.cost_price(),
            retail_price: Money::from_cents(175),
        };
        let updated = product.apply_edit(edit, later).unwrap().into_updated().unwrap();

        assert_eq!(updated.id, product.id);
        assert_eq!(updated.code, "BEV-001");
        assert_eq!(updated.created_at, t0());
        assert_eq!(updated.updated_at, Some(later));
        assert_eq!(updated.retail_price_cents, 175);
    }

    #[test]
    fn test_salesperson_rename() {
        let sp = Salesperson::create(
            SalespersonInput {
                name: "Ayesha".into(),
                code: "SP-01".into(),
            },
            t0(),
        )
        .unwrap();

        assert!(sp.apply_edit("Ayesha", t0()).unwrap().is_unchanged());
        let renamed = sp.apply_edit("Ayesha K", t0()).unwrap().into_updated().unwrap();
        assert_eq!(renamed.code, "SP-01");
        assert!(renamed.updated_at.is_some());
    }

    #[test]
    fn test_sale_identical_edit_is_unchanged() {
        let stored = sale();
        let change = stored.apply_edit(stored.to_edit(), t0() + Duration::hours(3)).unwrap();
        assert_eq!(change, Change::Unchanged);
    }

    #[test]
    fn test_sale_comment_change_updates() {
        let stored = sale();
        let later = t0() + Duration::hours(3);
        let mut edit = stored.to_edit();
        edit.comments = Some("second".into());

        let updated = stored.apply_edit(edit, later).unwrap().into_updated().unwrap();
        assert_eq!(updated.id, stored.id);
        assert_eq!(updated.created_at, stored.created_at);
        assert_eq!(updated.updated_at, Some(later));
        assert_eq!(updated.comments.as_deref(), Some("second"));
    }

    #[test]
    fn test_sale_reordered_lines_count_as_change() {
        let mut stored = sale();
        let mut other = SaleLineItem::from_product(&cola());
        other.product_id = "p-2".into();
        stored.line_items.push(other);
        stored.total_cents = 450;

        let mut edit = stored.to_edit();
        edit.line_items.reverse();
        assert!(!stored.apply_edit(edit, t0()).unwrap().is_unchanged());
    }

    #[test]
    fn test_sale_edit_still_validates() {
        let stored = sale();
        let mut edit = stored.to_edit();
        edit.line_items.clear();
        assert!(matches!(
            stored.apply_edit(edit, t0()),
            Err(CoreError::EmptySale)
        ));
    }
}

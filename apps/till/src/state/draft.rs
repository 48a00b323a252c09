//! # Sale Draft
//!
//! The sale being put together before it is saved.
//!
//! ## Draft Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Sale Draft Operations                                │
//! │                                                                         │
//! │  Cashier Action           Draft Method            Line Change           │
//! │  ──────────────           ────────────            ───────────           │
//! │                                                                         │
//! │  Pick product ───────────► add_product() ───────► push or qty + 1       │
//! │                                                                         │
//! │  Type quantity ──────────► set_quantity() ──────► qty = coerced         │
//! │                                                                         │
//! │  Type discount ──────────► set_discount() ──────► discount = clamped    │
//! │                                                                         │
//! │  Click remove ───────────► remove() ────────────► lines.remove(i)       │
//! │                                                                         │
//! │  Open a saved sale ──────► from_sale() ─────────► lines = sale lines    │
//! │                                                                         │
//! │  Save ───────────────────► into_edit() ─────────► SaleEdit for core     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Lines hold snapshots: a product edited or deleted after it was picked does
//! not change the draft.

use serde::Serialize;
use till_core::pricing::{coerce_discount, coerce_quantity, sale_total, validate_line_items};
use till_core::{
    CoreError, CoreResult, LineItemError, Money, Product, Sale, SaleEdit, SaleLineItem,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SaleDraft {
    pub salesperson_id: Option<String>,
    pub comments: Option<String>,
    lines: Vec<SaleLineItem>,
}

impl SaleDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a saved sale for editing.
    pub fn from_sale(sale: &Sale) -> Self {
        SaleDraft {
            salesperson_id: Some(sale.salesperson_id.clone()),
            comments: sale.comments.clone(),
            lines: sale.line_items.clone(),
        }
    }

    pub fn lines(&self) -> &[SaleLineItem] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Finds a line by product id or, ignoring case, by its snapshot code.
    pub fn line(&self, key: &str) -> Option<&SaleLineItem> {
        self.position(key).map(|i| &self.lines[i])
    }

    fn position(&self, key: &str) -> Option<usize> {
        let key = key.trim();
        self.lines
            .iter()
            .position(|l| l.product_id == key || l.code.eq_ignore_ascii_case(key))
    }

    fn position_or_err(&self, key: &str) -> CoreResult<usize> {
        self.position(key)
            .ok_or_else(|| CoreError::LineNotFound(key.to_string()))
    }

    /// Adds a product, or bumps the quantity of its existing line.
    ///
    /// ## Behavior
    /// - New product: snapshot line, quantity 1, no discount
    /// - Already present: quantity + 1, price and discount untouched
    pub fn add_product(&mut self, product: &Product) -> &SaleLineItem {
        let index = match self.lines.iter().position(|l| l.product_id == product.id) {
            Some(i) => {
                self.lines[i].quantity = self.lines[i].quantity.saturating_add(1);
                i
            }
            None => {
                self.lines.push(SaleLineItem::from_product(product));
                self.lines.len() - 1
            }
        };
        &self.lines[index]
    }

    /// Sets a line's quantity. Returns the warning if the input was coerced.
    pub fn set_quantity(&mut self, key: &str, input: f64) -> CoreResult<Option<&'static str>> {
        let index = self.position_or_err(key)?;
        let coerced = coerce_quantity(input);
        self.lines[index].quantity = coerced.value;
        Ok(coerced.adjustment)
    }

    /// Sets a line's discount percentage. Returns the warning if clamped.
    pub fn set_discount(&mut self, key: &str, input: f64) -> CoreResult<Option<&'static str>> {
        let index = self.position_or_err(key)?;
        let coerced = coerce_discount(input);
        self.lines[index].discount_bps = coerced.value.bps();
        Ok(coerced.adjustment)
    }

    pub fn remove(&mut self, key: &str) -> CoreResult<SaleLineItem> {
        let index = self.position_or_err(key)?;
        Ok(self.lines.remove(index))
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn total(&self) -> Money {
        sale_total(&self.lines)
    }

    /// Row problems that would block saving, all of them.
    pub fn errors(&self) -> Vec<LineItemError> {
        validate_line_items(&self.lines)
    }

    pub fn into_edit(self) -> SaleEdit {
        SaleEdit {
            salesperson_id: self.salesperson_id.unwrap_or_default(),
            comments: self.comments,
            line_items: self.lines,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn product(code: &str, retail_cents: i64) -> Product {
        Product {
            id: format!("id-{code}"),
            name: format!("Item {code}"),
            code: code.to_string(),
            cost_price_cents: 0,
            retail_price_cents: retail_cents,
            image_url: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn test_add_same_product_increments() {
        let mut draft = SaleDraft::new();
        let p = product("A-1", 10000);

        draft.add_product(&p);
        draft.add_product(&p);

        assert_eq!(draft.lines().len(), 1);
        assert_eq!(draft.lines()[0].quantity, 2);
        assert_eq!(draft.total(), Money::from_cents(20000));
    }

    #[test]
    fn test_increment_at_max_quantity_saturates() {
        let mut draft = SaleDraft::new();
        let p = product("A-1", 10000);
        draft.add_product(&p);
        draft.set_quantity("A-1", 1e300).unwrap();
        assert_eq!(draft.lines()[0].quantity, i64::MAX);

        draft.add_product(&p);
        assert_eq!(draft.lines()[0].quantity, i64::MAX);
        assert_eq!(draft.total(), Money::from_cents(i64::MAX));
        assert_eq!(draft.errors().len(), 1);
    }

    #[test]
    fn test_quantity_and_discount_coercion() {
        let mut draft = SaleDraft::new();
        draft.add_product(&product("A-1", 10000));

        assert!(draft.set_quantity("A-1", -3.0).unwrap().is_some());
        assert_eq!(draft.lines()[0].quantity, 1);

        assert!(draft.set_discount("a-1", 150.0).unwrap().is_some());
        assert_eq!(draft.lines()[0].discount_bps, 10_000);
        assert_eq!(draft.total(), Money::zero());

        assert_eq!(draft.set_quantity("id-A-1", 2.0).unwrap(), None);
        assert_eq!(draft.set_discount("A-1", 10.0).unwrap(), None);
        assert_eq!(draft.total(), Money::from_cents(18000));
    }

    #[test]
    fn test_two_lines_total() {
        let mut draft = SaleDraft::new();
        for code in ["A-1", "B-2"] {
            draft.add_product(&product(code, 10000));
            draft.set_quantity(code, 2.0).unwrap();
            draft.set_discount(code, 10.0).unwrap();
        }
        assert_eq!(draft.total(), Money::from_cents(36000));
    }

    #[test]
    fn test_unknown_line() {
        let mut draft = SaleDraft::new();
        assert!(matches!(
            draft.set_quantity("nope", 1.0),
            Err(CoreError::LineNotFound(_))
        ));
        assert!(draft.remove("nope").is_err());
    }

    #[test]
    fn test_snapshot_survives_product_change() {
        let mut draft = SaleDraft::new();
        let mut p = product("A-1", 500);
        draft.add_product(&p);

        p.retail_price_cents = 900;
        p.name = "Renamed".into();

        assert_eq!(draft.lines()[0].unit_price_cents, 500);
        assert_eq!(draft.lines()[0].name, "Item A-1");
    }

    #[test]
    fn test_round_trip_through_sale() {
        let mut draft = SaleDraft::new();
        draft.salesperson_id = Some("sp-1".into());
        draft.comments = Some("walk-in".into());
        draft.add_product(&product("A-1", 300));

        let sale = Sale::create(draft.clone().into_edit(), Utc::now()).unwrap();
        let reopened = SaleDraft::from_sale(&sale);

        assert_eq!(reopened, draft);
        assert!(reopened.errors().is_empty());
    }
}

//! # Listing
//!
//! Search, sort, paginate and summarize in-memory collections.
//!
//! ## Pipeline
//! ```text
//! all records ──► filter (search) ──► sort (key, direction) ──► page N
//!                  case-insensitive     stable                  1-based
//! ```
//!
//! Views never mutate the collection. They are recomputed from the store's
//! cache on every call.

use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Product, Record};
use crate::DEFAULT_PAGE_SIZE;

// =============================================================================
// Sorting
// =============================================================================

/// Column a list is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Created,
    Updated,
    Name,
    Code,
    /// Retail price for products, total for sales.
    Amount,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "created" | "date" => Ok(SortKey::Created),
            "updated" => Ok(SortKey::Updated),
            "name" | "salesperson" => Ok(SortKey::Name),
            "code" | "id" => Ok(SortKey::Code),
            "amount" | "price" | "total" => Ok(SortKey::Amount),
            other => Err(format!("unknown sort key '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    /// Newest first is the default view.
    #[default]
    Descending,
}

// =============================================================================
// Query & Page
// =============================================================================

/// What a list view asks for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
    pub sort: SortKey,
    pub direction: SortDirection,
    /// 1-based. Pages past the end show the last page.
    pub page: usize,
    pub per_page: usize,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            search: None,
            sort: SortKey::Created,
            direction: SortDirection::Descending,
            page: 1,
            per_page: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of a list view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub per_page: usize,
    /// Matches after filtering, across all pages.
    pub total_items: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// 1-based index of the first item on this page, 0 when empty.
    pub fn first_index(&self) -> usize {
        if self.items.is_empty() {
            0
        } else {
            (self.page - 1) * self.per_page + 1
        }
    }
}

impl ListQuery {
    /// Runs the filter, sort and paginate pipeline over a collection.
    ///
    /// ## Example
    /// ```rust
    /// use till_core::listing::ListQuery;
    /// use till_core::Product;
    ///
    /// let products: Vec<Product> = Vec::new();
    /// let page = ListQuery::default().apply(&products);
    /// assert_eq!(page.total_pages, 1);
    /// assert!(page.is_empty());
    /// ```
    pub fn apply<R: Record>(&self, records: &[R]) -> Page<R> {
        let needle = self
            .search
            .as_deref()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());

        let mut matched: Vec<&R> = records
            .iter()
            .filter(|r| needle.as_deref().map_or(true, |n| r.matches(n)))
            .collect();

        matched.sort_by(|a, b| {
            let ord = a.compare_by(b, self.sort);
            match self.direction {
                SortDirection::Ascending => ord,
                SortDirection::Descending => ord.reverse(),
            }
        });

        let per_page = self.per_page.max(1);
        let total_items = matched.len();
        let total_pages = total_items.div_ceil(per_page).max(1);
        let page = self.page.clamp(1, total_pages);

        let items = matched
            .into_iter()
            .skip((page - 1) * per_page)
            .take(per_page)
            .cloned()
            .collect();

        Page {
            items,
            page,
            per_page,
            total_items,
            total_pages,
        }
    }
}

// =============================================================================
// Summary Stats
// =============================================================================

/// Headline numbers shown above each list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CollectionStats {
    pub total: usize,
    /// Created within the last 30 days.
    pub recent: usize,
    /// Edited at least once.
    pub updated: usize,
    /// Additions in the last 7 days divided by 7, rounded.
    pub weekly_average: usize,
}

impl CollectionStats {
    pub fn compute<R: Record>(records: &[R], now: DateTime<Utc>) -> Self {
        let month_ago = now - Duration::days(30);
        let week_ago = now - Duration::days(7);

        let recent = records.iter().filter(|r| r.created_at() >= month_ago).count();
        let this_week = records.iter().filter(|r| r.created_at() >= week_ago).count();
        let updated = records.iter().filter(|r| r.updated_at().is_some()).count();

        Self {
            total: records.len(),
            recent,
            updated,
            weekly_average: (this_week as f64 / 7.0).round() as usize,
        }
    }
}

// =============================================================================
// Product Picker
// =============================================================================

/// Finds the product a cashier most likely meant.
///
/// ## Rules
/// 1. A product whose code equals the text (ignoring case) wins outright.
/// 2. Otherwise the newest product whose name or code contains the text.
pub fn pick_product<'a>(products: &'a [Product], text: &str) -> Option<&'a Product> {
    let needle = text.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }

    if let Some(exact) = products.iter().find(|p| p.code.to_lowercase() == needle) {
        return Some(exact);
    }

    products
        .iter()
        .filter(|p| p.matches(&needle))
        .max_by_key(|p| p.created_at)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, day, 12, 0, 0).unwrap()
    }

    fn product(code: &str, name: &str, price: i64, day: u32) -> Product {
        Product {
            id: format!("id-{code}"),
            name: name.to_string(),
            code: code.to_string(),
            cost_price_cents: 0,
            retail_price_cents: price,
            image_url: None,
            created_at: at(day),
            updated_at: None,
        }
    }

    fn catalog() -> Vec<Product> {
        (1..=12)
            .map(|n| product(&format!("P-{n:02}"), &format!("Item {n}"), n as i64 * 100, n))
            .collect()
    }

    #[test]
    fn test_default_is_newest_first() {
        let page = ListQuery::default().apply(&catalog());
        assert_eq!(page.items[0].code, "P-12");
        assert_eq!(page.items.len(), 10);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.first_index(), 1);
    }

    #[test]
    fn test_second_page_and_overflow() {
        let query = ListQuery {
            page: 2,
            ..Default::default()
        };
        let page = query.apply(&catalog());
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.first_index(), 11);

        let beyond = ListQuery {
            page: 9,
            ..Default::default()
        };
        assert_eq!(beyond.apply(&catalog()).page, 2);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let query = ListQuery {
            search: Some("  ITEM 1".into()),
            sort: SortKey::Code,
            direction: SortDirection::Ascending,
            ..Default::default()
        };
        let page = query.apply(&catalog());
        let codes: Vec<_> = page.items.iter().map(|p| p.code.as_str()).collect();
        assert_eq!(codes, vec!["P-01", "P-10", "P-11", "P-12"]);
    }

    #[test]
    fn test_sort_by_amount_ascending() {
        let query = ListQuery {
            sort: SortKey::Amount,
            direction: SortDirection::Ascending,
            per_page: 5,
            ..Default::default()
        };
        let page = query.apply(&catalog());
        assert_eq!(page.items[0].retail_price_cents, 100);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn test_stats() {
        let mut items = catalog();
        items[0].updated_at = Some(at(20));
        let stats = CollectionStats::compute(&items, at(12) + Duration::hours(1));

        assert_eq!(stats.total, 12);
        assert_eq!(stats.recent, 12);
        assert_eq!(stats.updated, 1);
        // created on days 6..=12 fall in the last 7 days: 7 / 7 = 1
        assert_eq!(stats.weekly_average, 1);
    }

    #[test]
    fn test_pick_exact_code_wins() {
        let mut items = catalog();
        items.push(product("COLA", "Cola", 150, 1));
        items.push(product("COLA-Z", "Cola Zero", 160, 20));
        assert_eq!(pick_product(&items, "cola").unwrap().code, "COLA");
    }

    #[test]
    fn test_pick_newest_partial_match() {
        let mut items = catalog();
        items.push(product("C-1", "Cola", 150, 1));
        items.push(product("C-2", "Cola Zero", 160, 20));
        assert_eq!(pick_product(&items, "col").unwrap().code, "C-2");
        assert!(pick_product(&items, "   ").is_none());
        assert!(pick_product(&items, "juice").is_none());
    }

    #[test]
    fn test_sort_key_parse() {
        assert_eq!("Total".parse::<SortKey>().unwrap(), SortKey::Amount);
        assert!("bogus".parse::<SortKey>().is_err());
    }
}

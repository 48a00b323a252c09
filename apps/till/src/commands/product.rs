//! # Product Commands
//!
//! Catalog maintenance. Codes are checked for duplicates before anything is
//! written and cannot be changed afterwards.
//!
//! ## Edit Flow
//! ```text
//! edit_product("BEV-001", patch)
//!      │
//!      ▼
//! refresh catalog ──► find by id or code ──► merge patch over stored fields
//!      │
//!      ▼
//! Product::apply_edit
//!      ├── Unchanged  ──► Info "No Changes!"          (no write)
//!      └── Updated    ──► store.update ──► "Updated!"
//! ```

use chrono::Utc;
use tracing::{debug, info};

use till_core::validation::ensure_unique_code;
use till_core::{
    Change, CollectionStats, CoreError, ListQuery, Money, Page, Product, ProductEdit,
    ProductInput,
};

use crate::error::ApiError;
use crate::notice::{Notice, Reply};
use crate::state::App;

/// Fields to change on a product. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductPatch {
    pub name: Option<String>,
    /// `Some("")` removes the image.
    pub image_url: Option<String>,
    pub cost_price: Option<Money>,
    pub retail_price: Option<Money>,
}

/// Finds a product by id, or by code ignoring case.
pub fn find_product<'a>(products: &'a [Product], key: &str) -> Option<&'a Product> {
    let key = key.trim();
    products
        .iter()
        .find(|p| p.id == key)
        .or_else(|| products.iter().find(|p| p.code.eq_ignore_ascii_case(key)))
}

pub async fn list_products(app: &mut App, query: &ListQuery) -> Result<Page<Product>, ApiError> {
    app.products.refresh().await?;
    let page = app.products.list(query);
    debug!(
        total = page.total_items,
        page = page.page,
        "Listed products"
    );
    Ok(page)
}

pub async fn add_product(app: &mut App, input: ProductInput) -> Result<Reply<Product>, ApiError> {
    app.products.refresh().await?;

    let product = Product::create(input, Utc::now())?;
    ensure_unique_code(
        "Product code",
        &product.code,
        app.products.items().iter().map(|p| p.code.as_str()),
    )?;

    let stored = app.products.create(product).await?;
    info!(code = %stored.code, "Product added");
    Ok(Reply::new(stored).with_notice(Notice::success("Success!", "Product added successfully")))
}

pub async fn edit_product(
    app: &mut App,
    key: &str,
    patch: ProductPatch,
) -> Result<Reply<Product>, ApiError> {
    app.products.refresh().await?;
    let current = find_product(app.products.items(), key)
        .cloned()
        .ok_or_else(|| CoreError::ProductNotFound(key.to_string()))?;

    let edit = ProductEdit {
        name: patch.name.unwrap_or_else(|| current.name.clone()),
        image_url: match patch.image_url {
            Some(url) => Some(url),
            None => current.image_url.clone(),
        },
        cost_price: patch.cost_price.unwrap_or_else(|| current.cost_price()),
        retail_price: patch.retail_price.unwrap_or_else(|| current.retail_price()),
    };

    match current.apply_edit(edit, Utc::now())? {
        Change::Unchanged => {
            debug!(code = %current.code, "Product edit changed nothing");
            Ok(Reply::new(current).with_notice(Notice::no_changes("product")))
        }
        Change::Updated(updated) => {
            let stored = app.products.update(updated).await?;
            info!(code = %stored.code, "Product updated");
            Ok(Reply::new(stored)
                .with_notice(Notice::success("Updated!", "Product updated successfully")))
        }
    }
}

/// Deletes a product. Sales that include it keep their snapshot lines.
pub async fn delete_product(app: &mut App, key: &str) -> Result<Reply<Product>, ApiError> {
    app.products.refresh().await?;
    let target = find_product(app.products.items(), key)
        .cloned()
        .ok_or_else(|| CoreError::ProductNotFound(key.to_string()))?;

    app.products.delete(&target.id).await?;
    info!(code = %target.code, "Product deleted");
    Ok(Reply::new(target).with_notice(Notice::success("Deleted!", "Product has been deleted.")))
}

pub async fn product_stats(app: &mut App) -> Result<CollectionStats, ApiError> {
    app.products.refresh().await?;
    Ok(app.products.stats(Utc::now()))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_app;
    use crate::error::ErrorCode;

    fn input(code: &str) -> ProductInput {
        ProductInput {
            name: "Cola".into(),
            code: code.into(),
            image_url: None,
            cost_price: Money::from_cents(80),
            retail_price: Money::from_cents(150),
        }
    }

    #[tokio::test]
    async fn test_duplicate_code_rejected_before_write() {
        let mut app = test_app().await;
        add_product(&mut app, input("BEV-001")).await.unwrap();
        let writes = app.products.mutations();

        let err = add_product(&mut app, input("bev-001")).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::DuplicateCode);
        assert_eq!(app.products.mutations(), writes);
        assert_eq!(app.products.items().len(), 1);
    }

    #[tokio::test]
    async fn test_identical_edit_is_a_no_op() {
        let mut app = test_app().await;
        add_product(&mut app, input("BEV-001")).await.unwrap();
        let writes = app.products.mutations();

        let reply = edit_product(
            &mut app,
            "BEV-001",
            ProductPatch {
                name: Some("  Cola ".into()),
                retail_price: Some(Money::from_cents(150)),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert!(reply.is_unchanged());
        assert_eq!(app.products.mutations(), writes);
        assert!(reply.value.updated_at.is_none());
    }

    #[tokio::test]
    async fn test_edit_stamps_updated_and_keeps_code() {
        let mut app = test_app().await;
        let created = add_product(&mut app, input("BEV-001")).await.unwrap().value;

        let reply = edit_product(
            &mut app,
            &created.id,
            ProductPatch {
                retail_price: Some(Money::from_cents(175)),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(reply.notice.unwrap().title, "Updated!");
        assert_eq!(reply.value.code, "BEV-001");
        assert_eq!(reply.value.created_at, created.created_at);
        assert!(reply.value.updated_at.is_some());
        assert_eq!(reply.value.retail_price_cents, 175);
    }

    #[tokio::test]
    async fn test_delete_unknown_product() {
        let mut app = test_app().await;
        let err = delete_product(&mut app, "NOPE").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}

//! # Sale Commands
//!
//! Recording, editing and inspecting sales.
//!
//! ## Record Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Sale Lifecycle                                  │
//! │                                                                         │
//! │  record_sale(request)                                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  resolve salesperson (id or code)                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SaleDraft ◄── each --item: pick product, set qty / discount           │
//! │       │         (coercions become warnings, not errors)                 │
//! │       ▼                                                                 │
//! │  Sale::create ── all row errors at once ──► ApiError "Validation Errors!"│
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  store.create ──► "Success!"                                            │
//! │                                                                         │
//! │  edit_sale(id, patch)                                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SaleDraft::from_sale ──► apply patch ──► Sale::apply_edit              │
//! │                                              ├── Unchanged ──► Info     │
//! │                                              └── Updated ────► write    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};

use till_core::{
    pick_product, Change, CollectionStats, CoreError, CoreResult, ListQuery, Page, Product, Sale,
    Salesperson,
};

use crate::commands::salesperson::find_salesperson;
use crate::commands::ItemSpec;
use crate::error::ApiError;
use crate::notice::{Notice, Reply};
use crate::state::{App, SaleDraft};

/// A new sale as typed by the cashier.
#[derive(Debug, Clone, Default)]
pub struct SaleRequest {
    /// Salesperson id or code.
    pub salesperson: String,
    pub items: Vec<ItemSpec>,
    pub comments: Option<String>,
}

/// Changes to a saved sale. Empty means "save as is".
#[derive(Debug, Clone, Default)]
pub struct SalePatch {
    pub salesperson: Option<String>,
    /// `Some("")` clears the comments.
    pub comments: Option<String>,
    /// Lines to add or adjust.
    pub items: Vec<ItemSpec>,
    /// Lines to drop, by code or product id.
    pub remove: Vec<String>,
}

/// A sale plus what is needed to show its header.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaleDetail {
    pub sale: Sale,
    /// The salesperson's name, or `ID: <id>` when they are gone.
    pub salesperson: String,
}

/// A page of sales with the roster used to name salespeople.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaleListing {
    pub page: Page<Sale>,
    #[serde(skip)]
    pub roster: Vec<Salesperson>,
}

fn resolve_salesperson(roster: &[Salesperson], key: &str) -> CoreResult<String> {
    if key.trim().is_empty() {
        return Err(CoreError::MissingSalesperson);
    }
    find_salesperson(roster, key)
        .map(|s| s.id.clone())
        .ok_or_else(|| CoreError::SalespersonNotFound(key.trim().to_string()))
}

/// `name` if the salesperson still exists, else `ID: <id>`.
pub fn salesperson_label(roster: &[Salesperson], id: &str) -> String {
    roster
        .iter()
        .find(|s| s.id == id)
        .map(|s| s.name.clone())
        .unwrap_or_else(|| format!("ID: {}", id))
}

/// Applies one `--item` to a draft.
///
/// A line already in the draft (matched by code or product id) is adjusted in
/// place, or bumped by one when no quantity or discount is given. Anything
/// else goes through the product picker.
fn apply_item(
    draft: &mut SaleDraft,
    catalog: &[Product],
    spec: &ItemSpec,
    warnings: &mut Vec<Notice>,
) -> CoreResult<()> {
    let existing = draft
        .line(&spec.product)
        .map(|line| (line.product_id.clone(), line.quantity));

    let key = match existing {
        Some((id, quantity)) => {
            if spec.quantity.is_none() && spec.discount.is_none() {
                draft.set_quantity(&id, quantity.saturating_add(1) as f64)?;
            }
            id
        }
        None => {
            let product = pick_product(catalog, &spec.product)
                .ok_or_else(|| CoreError::ProductNotFound(spec.product.clone()))?;
            debug!(code = %product.code, text = %spec.product, "Picked product");
            draft.add_product(product);
            product.id.clone()
        }
    };

    if let Some(quantity) = spec.quantity {
        if let Some(reason) = draft.set_quantity(&key, quantity)? {
            warnings.push(Notice::warning("Invalid Quantity!", reason));
        }
    }
    if let Some(discount) = spec.discount {
        if let Some(reason) = draft.set_discount(&key, discount)? {
            warnings.push(Notice::warning("Invalid Discount!", reason));
        }
    }
    Ok(())
}

/// Lists sales. The roster is loaded best-effort for display names.
pub async fn list_sales(app: &mut App, query: &ListQuery) -> Result<SaleListing, ApiError> {
    app.sales.refresh().await?;
    if let Err(e) = app.salespersons.refresh().await {
        warn!(error = %e, "Salesperson names unavailable");
    }
    Ok(SaleListing {
        page: app.sales.list(query),
        roster: app.salespersons.items().to_vec(),
    })
}

pub async fn show_sale(app: &mut App, id: &str) -> Result<SaleDetail, ApiError> {
    app.sales.refresh().await?;
    let sale = app
        .sales
        .get(id.trim())
        .cloned()
        .ok_or_else(|| CoreError::SaleNotFound(id.to_string()))?;

    if let Err(e) = app.salespersons.refresh().await {
        warn!(error = %e, "Salesperson names unavailable");
    }
    let salesperson = salesperson_label(app.salespersons.items(), &sale.salesperson_id);

    Ok(SaleDetail { sale, salesperson })
}

pub async fn record_sale(app: &mut App, request: SaleRequest) -> Result<Reply<Sale>, ApiError> {
    app.salespersons.refresh().await?;
    app.products.refresh().await?;

    let mut draft = SaleDraft::new();
    draft.salesperson_id = Some(resolve_salesperson(
        app.salespersons.items(),
        &request.salesperson,
    )?);
    draft.comments = request.comments;

    let mut warnings = Vec::new();
    for spec in &request.items {
        apply_item(&mut draft, app.products.items(), spec, &mut warnings)?;
    }

    let sale = Sale::create(draft.into_edit(), Utc::now())?;
    let stored = app.sales.create(sale).await?;
    info!(id = %stored.id, total = %stored.total(), "Sale recorded");

    Ok(Reply::new(stored)
        .with_notice(Notice::success(
            "Success!",
            "Sale record has been saved successfully.",
        ))
        .with_warnings(warnings))
}

pub async fn edit_sale(app: &mut App, id: &str, patch: SalePatch) -> Result<Reply<Sale>, ApiError> {
    app.sales.refresh().await?;
    let current = app
        .sales
        .get(id.trim())
        .cloned()
        .ok_or_else(|| CoreError::SaleNotFound(id.to_string()))?;

    let mut draft = SaleDraft::from_sale(&current);

    if let Some(key) = &patch.salesperson {
        app.salespersons.refresh().await?;
        draft.salesperson_id = Some(resolve_salesperson(app.salespersons.items(), key)?);
    }
    if let Some(comments) = patch.comments {
        draft.comments = Some(comments);
    }
    for key in &patch.remove {
        draft.remove(key)?;
    }

    let mut warnings = Vec::new();
    if !patch.items.is_empty() {
        app.products.refresh().await?;
        for spec in &patch.items {
            apply_item(&mut draft, app.products.items(), spec, &mut warnings)?;
        }
    }

    match current.apply_edit(draft.into_edit(), Utc::now())? {
        Change::Unchanged => {
            debug!(id = %current.id, "Sale edit changed nothing");
            Ok(Reply::new(current)
                .with_notice(Notice::no_changes("sale record"))
                .with_warnings(warnings))
        }
        Change::Updated(updated) => {
            let stored = app.sales.update(updated).await?;
            info!(id = %stored.id, total = %stored.total(), "Sale updated");
            Ok(Reply::new(stored)
                .with_notice(Notice::success(
                    "Updated!",
                    "Sale record has been updated successfully.",
                ))
                .with_warnings(warnings))
        }
    }
}

pub async fn delete_sale(app: &mut App, id: &str) -> Result<Reply<Sale>, ApiError> {
    app.sales.refresh().await?;
    let target = app
        .sales
        .get(id.trim())
        .cloned()
        .ok_or_else(|| CoreError::SaleNotFound(id.to_string()))?;

    app.sales.delete(&target.id).await?;
    info!(id = %target.id, "Sale deleted");
    Ok(Reply::new(target).with_notice(Notice::success("Deleted!", "Sale record has been deleted.")))
}

pub async fn sale_stats(app: &mut App) -> Result<CollectionStats, ApiError> {
    app.sales.refresh().await?;
    Ok(app.sales.stats(Utc::now()))
}

// =============================================================================
// Unit Tests
// =============================================================================

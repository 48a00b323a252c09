//! # till-core: Pure Business Logic for Till POS
//!
//! This crate is the **heart** of Till POS. It contains the catalog, roster
//! and sale-ledger records together with the rules that govern them, as pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Till POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     CLI (apps/till)                             │   │
//! │  │    product add ──► sale record ──► sale edit ──► sale show     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ till-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌──────────┐ ┌────────┐  │   │
//! │  │   │  types  │ │ pricing │ │reconcile│ │validation│ │listing │  │   │
//! │  │   │ Product │ │ amounts │ │ Change  │ │  codes   │ │ Page   │  │   │
//! │  │   │  Sale   │ │ coerce  │ │ no-op?  │ │  names   │ │ Stats  │  │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └──────────┘ └────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                 │                                 │                     │
//! │  ┌──────────────▼──────────────┐   ┌──────────────▼──────────────┐     │
//! │  │  till-db (local blob store) │   │  till-remote (REST client)  │     │
//! │  └─────────────────────────────┘   └─────────────────────────────┘     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain records (Product, Salesperson, Sale, SaleLineItem)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`pricing`] - Line amounts, totals, input coercion, sale validation
//! - [`reconcile`] - Create/edit rules and no-op detection
//! - [`listing`] - Search, sort, paginate and summarize collections
//! - [`validation`] - Field validation for user-entered values
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use till_core::money::Money;
//! use till_core::pricing::{line_amount, DiscountRate};
//!
//! // 100.00 × 2 at 10% off
//! let amount = line_amount(Money::from_cents(10_000), 2, DiscountRate::from_bps(1000));
//! assert_eq!(amount.cents(), 18_000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod listing;
pub mod money;
pub mod pricing;
pub mod reconcile;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, LineItemError, LineItemProblem, ValidationError};
pub use listing::{pick_product, CollectionStats, ListQuery, Page, SortDirection, SortKey};
pub use money::Money;
pub use pricing::DiscountRate;
pub use reconcile::{Change, ProductEdit, SaleEdit};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of a product or salesperson code.
pub const MAX_CODE_LEN: usize = 50;

/// Maximum length of a display name.
pub const MAX_NAME_LEN: usize = 200;

/// Maximum length of sale comments.
pub const MAX_COMMENTS_LEN: usize = 1000;

/// Page sizes offered by list views.
pub const PAGE_SIZES: [usize; 4] = [5, 10, 25, 50];

/// Default page size for list views.
pub const DEFAULT_PAGE_SIZE: usize = 10;

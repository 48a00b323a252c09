//! # till-db: Local Blob Store for Till POS
//!
//! The local persistence backend. Each collection lives as a single JSON
//! array under a fixed key, the same shape a browser would keep in local
//! storage, held in one SQLite table.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Till POS Data Flow                               │
//! │                                                                         │
//! │  Store<Product>::create (apps/till)                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     till-db (THIS CRATE)                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │ BlobRepository │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │◄───│  load / save   │    │  (embedded)  │  │   │
//! │  │   │  SqlitePool   │    │  remove / keys │    │ 001_kv.sql   │  │   │
//! │  │   └───────────────┘    └────────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  kv_store: products → [...], salespersons → [...], salesRecords → [...]│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use till_db::{Database, DbConfig};
//! use till_core::Product;
//!
//! let db = Database::new(DbConfig::new("till.db")).await?;
//! let products: Vec<Product> = db.blobs().load_collection().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::blob::BlobRepository;

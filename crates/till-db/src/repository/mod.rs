//! # Repository Module
//!
//! ## Repository Pattern
//! ```text
//! Store<Sale> (apps/till)
//!      │
//!      │  db.blobs().load_collection::<Sale>()
//!      ▼
//! BlobRepository
//! ├── load / save          (any key, any serde type)
//! ├── load_collection      (Record::STORAGE_KEY)
//! ├── save_collection
//! ├── remove
//! └── keys
//!      │
//!      ▼
//! kv_store table
//! ```
//!
//! ## Available Repositories
//!
//! - [`blob::BlobRepository`] - Whole-collection JSON blobs by key

pub mod blob;

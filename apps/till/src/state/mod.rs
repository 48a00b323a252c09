//! # Application State
//!
//! ```text
//! ┌──────────────────┐ ┌────────────────────┐ ┌──────────────────┐
//! │  Store<Product>  │ │ Store<Salesperson> │ │   Store<Sale>    │
//! └────────┬─────────┘ └─────────┬──────────┘ └────────┬─────────┘
//!          └───────────── one Persistence ─────────────┘
//!
//! TillConfig      display and backend settings
//! SaleDraft       built per command from a saved sale or from scratch
//! ```

pub mod config;
pub mod draft;
pub mod store;

pub use config::{Backend, TillConfig};
pub use draft::SaleDraft;
pub use store::{Persistence, Store, StoreError};

use tracing::info;

use till_core::{Product, Sale, Salesperson};
use till_db::{Database, DbConfig};
use till_remote::RestClient;

use crate::error::ApiError;

/// Everything a command needs.
#[derive(Debug)]
pub struct App {
    pub config: TillConfig,
    pub products: Store<Product>,
    pub salespersons: Store<Salesperson>,
    pub sales: Store<Sale>,
    db: Option<Database>,
}

impl App {
    /// Opens the configured backend.
    pub async fn open(config: TillConfig) -> Result<App, ApiError> {
        match config.storage.backend {
            Backend::Local => {
                let path = config.database_path();
                info!(?path, "Opening local blob store");
                let db_config = DbConfig::new(path).connect_timeout(config.timeout());
                let db = Database::new(db_config).await?;
                let backend = Persistence::Local(db.blobs());
                let mut app = App::with_backend(config, backend);
                app.db = Some(db);
                Ok(app)
            }
            Backend::Remote => {
                info!(url = %config.remote.base_url, "Using REST backend");
                let client = RestClient::new(
                    &config.remote.base_url,
                    config.timeout(),
                    config.remote.accept_invalid_certs,
                )?;
                Ok(App::with_backend(config, Persistence::Remote(client)))
            }
        }
    }

    pub fn with_backend(config: TillConfig, backend: Persistence) -> App {
        App {
            config,
            products: Store::new(backend.clone()),
            salespersons: Store::new(backend.clone()),
            sales: Store::new(backend),
            db: None,
        }
    }

    /// Closes the database pool, if this app opened one.
    pub async fn close(self) {
        if let Some(db) = self.db {
            db.close().await;
        }
    }
}

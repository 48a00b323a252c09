//! # Collection Store
//!
//! One cached collection (products, salespersons or sales) over either
//! persistence backend.
//!
//! ## Backend Behaviour
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Store<R> Operations                                  │
//! │                                                                         │
//! │  Local (blob store)                 Remote (REST)                       │
//! │  ──────────────────                 ─────────────                       │
//! │  refresh: load array under key      refresh: GET {resource}             │
//! │  create:  load, push, save          create:  POST, push response        │
//! │  update:  load, replace, save       update:  PUT, replace with response │
//! │  delete:  load, remove, save        delete:  DELETE, drop from cache    │
//! │                                                                         │
//! │  Cache afterwards = what was        Cache afterwards = old cache        │
//! │  written                            reconciled with the response        │
//! │                                                                         │
//! │  Failed refresh  → cache emptied                                        │
//! │  Failed mutation → cache untouched                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, warn};

use till_core::{CollectionStats, ListQuery, Page, Record};
use till_db::{BlobRepository, DbError};
use till_remote::{RemoteError, RemoteResource, RestClient};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Db(#[from] DbError),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Where a store reads and writes.
#[derive(Debug, Clone)]
pub enum Persistence {
    Local(BlobRepository),
    Remote(RestClient),
}

impl Persistence {
    pub fn describe(&self) -> String {
        match self {
            Persistence::Local(_) => "local blob store".to_string(),
            Persistence::Remote(client) => format!("server {}", client.base_url()),
        }
    }
}

/// A cached collection of one record type.
#[derive(Debug)]
pub struct Store<R: RemoteResource> {
    backend: Persistence,
    items: Vec<R>,
    mutations: u64,
}

impl<R: RemoteResource> Store<R> {
    pub fn new(backend: Persistence) -> Self {
        Store {
            backend,
            items: Vec::new(),
            mutations: 0,
        }
    }

    /// Reloads the cache from the backend.
    pub async fn refresh(&mut self) -> StoreResult<&[R]> {
        let loaded = match &self.backend {
            Persistence::Local(blobs) => blobs.load_collection::<R>().await.map_err(StoreError::from),
            Persistence::Remote(client) => client.list::<R>().await.map_err(StoreError::from),
        };

        match loaded {
            Ok(items) => {
                debug!(entity = R::ENTITY, count = items.len(), "Collection refreshed");
                self.items = items;
                Ok(&self.items)
            }
            Err(e) => {
                warn!(entity = R::ENTITY, error = %e, "Refresh failed, clearing cache");
                self.items.clear();
                Err(e)
            }
        }
    }

    pub fn items(&self) -> &[R] {
        &self.items
    }

    pub fn backend(&self) -> &Persistence {
        &self.backend
    }

    pub fn get(&self, id: &str) -> Option<&R> {
        self.items.iter().find(|r| r.id() == id)
    }

    /// Like [`Store::get`], but a missing id is an error.
    pub fn require(&self, id: &str) -> StoreResult<&R> {
        self.get(id).ok_or_else(|| StoreError::NotFound {
            entity: R::ENTITY,
            id: id.to_string(),
        })
    }

    pub fn list(&self, query: &ListQuery) -> Page<R> {
        query.apply(&self.items)
    }

    pub fn stats(&self, now: DateTime<Utc>) -> CollectionStats {
        CollectionStats::compute(&self.items, now)
    }

    /// Writes performed through this store since it was opened.
    pub fn mutations(&self) -> u64 {
        self.mutations
    }

    /// Adds a record that already carries its id and creation time.
    ///
    /// The server may assign its own id; the returned record is what was
    /// actually stored.
    pub async fn create(&mut self, record: R) -> StoreResult<R> {
        let stored = match &self.backend {
            Persistence::Local(blobs) => {
                let mut items: Vec<R> = blobs.load_collection().await?;
                items.push(record.clone());
                blobs.save_collection(&items).await?;
                self.items = items;
                record
            }
            Persistence::Remote(client) => {
                let created = client.create(&record).await?;
                self.items.push(created.clone());
                created
            }
        };

        self.mutations += 1;
        debug!(entity = R::ENTITY, id = stored.id(), "Record created");
        Ok(stored)
    }

    /// Replaces the record with the same id.
    pub async fn update(&mut self, record: R) -> StoreResult<R> {
        let stored = match &self.backend {
            Persistence::Local(blobs) => {
                let mut items: Vec<R> = blobs.load_collection().await?;
                let slot = items
                    .iter_mut()
                    .find(|r| r.id() == record.id())
                    .ok_or_else(|| StoreError::NotFound {
                        entity: R::ENTITY,
                        id: record.id().to_string(),
                    })?;
                *slot = record.clone();
                blobs.save_collection(&items).await?;
                self.items = items;
                record
            }
            Persistence::Remote(client) => {
                let updated = client.update(&record).await?;
                match self.items.iter_mut().find(|r| r.id() == record.id()) {
                    Some(slot) => *slot = updated.clone(),
                    None => self.items.push(updated.clone()),
                }
                updated
            }
        };

        self.mutations += 1;
        debug!(entity = R::ENTITY, id = stored.id(), "Record updated");
        Ok(stored)
    }

    /// Removes the record with `id`.
    pub async fn delete(&mut self, id: &str) -> StoreResult<()> {
        match &self.backend {
            Persistence::Local(blobs) => {
                let mut items: Vec<R> = blobs.load_collection().await?;
                let before = items.len();
                items.retain(|r| r.id() != id);
                if items.len() == before {
                    return Err(StoreError::NotFound {
                        entity: R::ENTITY,
                        id: id.to_string(),
                    });
                }
                blobs.save_collection(&items).await?;
                self.items = items;
            }
            Persistence::Remote(client) => {
                client.delete::<R>(id).await?;
                self.items.retain(|r| r.id() != id);
            }
        }

        self.mutations += 1;
        debug!(entity = R::ENTITY, id = %id, "Record deleted");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use till_core::{Money, Product, ProductInput, Sale};
    use till_db::{Database, DbConfig};

    async fn local() -> (Database, Persistence) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let backend = Persistence::Local(db.blobs());
        (db, backend)
    }

    fn product(code: &str) -> Product {
        Product::create(
            ProductInput {
                name: format!("Item {code}"),
                code: code.to_string(),
                image_url: None,
                cost_price: Money::from_cents(100),
                retail_price: Money::from_cents(250),
            },
            Utc::now(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_local_create_update_delete() {
        let (db, backend) = local().await;
        let mut store: Store<Product> = Store::new(backend);

        let cola = store.create(product("BEV-001")).await.unwrap();
        store.create(product("SNK-001")).await.unwrap();
        assert_eq!(store.items().len(), 2);

        let mut renamed = cola.clone();
        renamed.name = "Cola Zero".into();
        store.update(renamed).await.unwrap();

        let persisted: Vec<Product> = db.blobs().load_collection().await.unwrap();
        assert_eq!(persisted.len(), 2);
        assert_eq!(persisted[0].name, "Cola Zero");

        store.delete(&cola.id).await.unwrap();
        assert!(store.get(&cola.id).is_none());
        assert_eq!(store.mutations(), 4);
    }

    #[tokio::test]
    async fn test_local_unknown_id_is_not_found() {
        let (_db, backend) = local().await;
        let mut store: Store<Product> = Store::new(backend);

        let err = store.delete("missing").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { entity: "Product", .. }));

        let err = store.update(product("X-1")).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
        assert_eq!(store.mutations(), 0);
    }

    #[tokio::test]
    async fn test_other_writers_are_seen_on_next_write() {
        let (db, backend) = local().await;
        let mut store: Store<Product> = Store::new(backend);
        store.create(product("A-1")).await.unwrap();

        db.blobs()
            .save_collection(&[product("A-1"), product("B-2")])
            .await
            .unwrap();
        store.create(product("C-3")).await.unwrap();

        assert_eq!(store.items().len(), 3);
    }

    #[tokio::test]
    async fn test_corrupt_blob_empties_cache() {
        let (db, backend) = local().await;
        let mut store: Store<Sale> = Store::new(backend);
        db.blobs().save("salesRecords", &["not a sale"]).await.unwrap();

        assert!(store.refresh().await.is_err());
        assert!(store.items().is_empty());
    }

    #[tokio::test]
    async fn test_local_backend_description() {
        let (_db, backend) = local().await;
        let store: Store<Product> = Store::new(backend);
        assert_eq!(store.backend().describe(), "local blob store");
    }

    #[tokio::test]
    async fn test_unreachable_server_refresh_empties_cache() {
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let client = RestClient::new(
            &format!("http://127.0.0.1:{port}/api"),
            Duration::from_secs(2),
            false,
        )
        .unwrap();
        let mut store: Store<Product> = Store::new(Persistence::Remote(client));
        assert!(store
            .backend()
            .describe()
            .starts_with(&format!("server http://127.0.0.1:{port}/api")));

        let err = store.refresh().await.unwrap_err();
        assert!(matches!(err, StoreError::Remote(_)));
        assert!(store.items().is_empty());

        let before = store.items().len();
        assert!(store.create(product("A-1")).await.is_err());
        assert_eq!(store.items().len(), before);
        assert_eq!(store.mutations(), 0);
    }
}

//! # till-remote: REST Backend for Till POS
//!
//! A thin client for the store server. Every call is one request; the caller
//! decides what to do with its cache afterwards.
//!
//! ## Request Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  RestClient::list::<Product>()    GET    {base}/products               │
//! │  RestClient::create(&product)     POST   {base}/products/add           │
//! │  RestClient::update(&product)     PUT    {base}/products/update/{id}   │
//! │  RestClient::delete::<Product>(id) DELETE {base}/products/delete/{id}  │
//! │                                                                         │
//! │  Same shape for salespersons and sales.                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`client`] - The HTTP client
//! - [`wire`] - Server JSON shapes and their conversion to core records
//! - [`error`] - Transport errors and their user-facing messages

pub mod client;
pub mod error;
pub mod wire;

pub use client::RestClient;
pub use error::{RemoteError, RemoteResult};
pub use wire::RemoteResource;

/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "https://localhost:7078/api";

//! Asynchronous client for the Firepower Device Manager (FDM) REST API.
//!
//! [`FtdClient`] owns the session (bearer token and expiry) and sends every
//! call through one dispatcher. Creates go through [`duplicate`], which decides
//! what a name collision means according to a [`DuplicatePolicy`].
//!
//! ```no_run
//! use ftd_client::{DuplicatePolicy, FtdClient, NetworkObject};
//! use ftd_core::config::FtdClientConfig;
//!
//! # async fn run() -> ftd_client::Result<()> {
//! let config = FtdClientConfig::new("ftd.example.com")?
//!     .with_tls_verify(false)
//!     .with_password_grant("admin", "Admin123");
//! let client = FtdClient::connect(config).await?;
//!
//! let mut web = NetworkObject::host("web01", "10.0.0.10");
//! client
//!     .create_network_object(&mut web, DuplicatePolicy::Replace)
//!     .await?;
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]

pub mod auth;
pub mod client;
pub mod crud;
pub mod duplicate;
pub mod models;
pub mod network;
pub mod policy;
pub mod port;

pub use client::{ApiRequest, Dispatch, FtdClient, FtdClientBuilder};
pub use ftd_core::{CreateOutcome, DuplicatePolicy, Error, Protocol, Reference};
pub use models::{
    AccessPolicy, AccessRule, DefaultAction, EventLogAction, Links, NetworkObject,
    NetworkObjectGroup, NetworkSubType, ObjectGroup, PortObject, PortObjectGroup, RuleAction,
};

/// Convenient result alias that reuses the shared FDM error type.
pub type Result<T> = ftd_core::Result<T>;

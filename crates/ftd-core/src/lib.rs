//! # ftd-core
//!
//! Core types and utilities for working with the Firepower Device Manager
//! (FDM) REST API.
//!
//! This crate is transport-free: it defines the error taxonomy, the wire
//! envelopes, object identity and the configuration consumed by `ftd-client`.
//!
//! ## Modules
//!
//! - [`error`] - Error taxonomy and structured API errors
//! - [`envelope`] - Error-body parsing and the list envelope
//! - [`reference`] - Object identity, references and the [`Resource`] trait
//! - [`types`] - Endpoints, type tags, duplicate policy and protocols
//! - [`query`] - `filter` / `limit` query parameters
//! - [`config`] - Client and grant configuration
//! - [`client`] - HTTP tuning and per-call options

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod query;
pub mod reference;
pub mod types;

// Re-export commonly used types
pub use error::{ApiError, ApiMessage, Error, Result};
pub use reference::{project, ObjectMeta, Reference, Resource};
pub use types::{CreateOutcome, DuplicatePolicy, Protocol};

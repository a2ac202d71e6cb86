//! Invoice intake backend.
//!
//! Accepts scanned invoices, converts them into structured records through two
//! external conversion services and serves the stored records back over HTTP.

pub mod auth;
pub mod config;
pub mod context;
pub mod conversion;
pub mod error;
pub mod ingestion;
pub mod query;
pub mod services;
pub mod store;

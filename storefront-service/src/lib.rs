//! Storefront catalog service
//!
//! A REST backend over Postgres for users, categories, and products,
//! built around one generic paginated-listing contract: every collection
//! is served through the same validated page request, storage-side page
//! statistics, and uniform response envelope.

pub mod config;
pub mod database;
pub mod error;
pub mod files;
pub mod handlers;
pub mod listing;
pub mod models;
pub mod observability;
pub mod repository;
pub mod server;
pub mod state;

pub use error::{Error, Result};

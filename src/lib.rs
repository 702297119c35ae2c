//! Item listing service for a gifting marketplace.
//!
//! Authenticated users create items, anyone can view them (each view is
//! counted), and owners soft-delete them. State lives in SQLite; see
//! [`services::item_service::ItemService`] for the operations.

pub mod config;
pub mod db;
pub mod errors;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

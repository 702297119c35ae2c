//! Core data models for the item service.
//!
//! Items are the only records this service writes. Users and categories are
//! owned by other services and are only read here, to populate responses and
//! derive the item's search text.

pub mod category;
pub mod item;
pub mod photo;
pub mod user;

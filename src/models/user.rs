//! Read-only view of a user account.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// An account that owns or requests items.
///
/// Users are managed elsewhere; this service reads them to copy the owner's
/// location onto new items, build search text and populate fetched items.
#[derive(Serialize, Deserialize, Clone, FromRow, Debug)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub name: String,
    pub surname: String,
    pub company: Option<String>,
    pub location: Option<String>,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

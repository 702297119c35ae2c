//! Item categories and subcategories.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A category row. Subcategories are categories with a `parent_id`.
#[derive(Serialize, Deserialize, Clone, FromRow, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub parent_id: Option<Uuid>,
}

/// The projection of a category embedded in a fetched item: id and name only.
#[derive(Serialize, Deserialize, Clone, FromRow, Debug, PartialEq, Eq)]
pub struct CategoryRef {
    pub id: Uuid,
    pub name: String,
}

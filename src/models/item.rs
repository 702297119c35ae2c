//! Represents an item listing offered by a user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;

use super::{category::CategoryRef, photo::Photo, user::User};

/// Maximum title length in characters, after trimming.
pub const TITLE_MAX_LEN: usize = 30;

/// Maximum description length in characters, after trimming.
pub const DESCRIPTION_MAX_LEN: usize = 500;

/// Physical condition of a listed item.
#[derive(Serialize, Deserialize, sqlx::Type, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Condition {
    Unused,
    Used,
    Defective,
}

impl Condition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::Unused => "unused",
            Condition::Used => "used",
            Condition::Defective => "defective",
        }
    }
}

impl FromStr for Condition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unused" => Ok(Condition::Unused),
            "used" => Ok(Condition::Used),
            "defective" => Ok(Condition::Defective),
            other => Err(format!("unknown condition `{}`", other)),
        }
    }
}

/// Where an item is in the gifting flow.
#[derive(Serialize, Deserialize, sqlx::Type, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum ItemStatus {
    #[default]
    Active,
    Inactive,
    #[serde(rename = "in progress")]
    #[sqlx(rename = "in progress")]
    InProgress,
}

/// A persisted item row.
///
/// References to the owner, requester and categories are stored by id only;
/// [`ItemView`] is the populated form returned by the fetch endpoints.
#[derive(Serialize, Deserialize, Clone, FromRow, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: Uuid,

    pub title: String,
    pub condition: Condition,
    pub description: String,

    /// Ordered photos, stored as a JSON array column.
    #[sqlx(json)]
    pub photos: Vec<Photo>,

    #[serde(rename = "category")]
    pub category_id: Uuid,
    #[serde(rename = "subcategory")]
    pub subcategory_id: Uuid,

    /// Owner of the listing.
    #[serde(rename = "user")]
    pub user_id: Uuid,
    /// User who asked for the item, set by the gifting flow.
    #[serde(rename = "itemRequester")]
    pub item_requester_id: Option<Uuid>,

    pub status: ItemStatus,
    pub viewed: i64,
    pub seen: bool,
    /// Soft-delete marker. Rows are never physically removed.
    pub deleted: bool,
    pub archived: Option<DateTime<Utc>>,
    pub gifted_date: Option<DateTime<Utc>>,

    pub latest_message_date: Option<DateTime<Utc>>,
    pub unread_messages_counter: i64,
    pub commented_by_user: bool,
    pub commented_by_item_requester: bool,

    /// Denormalized free-text blob, written once at creation.
    pub search: String,
    /// Copied from the owner at creation.
    pub location: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An item with its owner and categories expanded.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ItemView {
    pub id: Uuid,
    pub title: String,
    pub condition: Condition,
    pub description: String,
    pub photos: Vec<Photo>,
    pub category: Option<CategoryRef>,
    pub subcategory: Option<CategoryRef>,
    pub user: Option<User>,
    pub item_requester: Option<Uuid>,
    pub status: ItemStatus,
    pub viewed: i64,
    pub seen: bool,
    pub deleted: bool,
    pub archived: Option<DateTime<Utc>>,
    pub gifted_date: Option<DateTime<Utc>>,
    pub latest_message_date: Option<DateTime<Utc>>,
    pub unread_messages_counter: i64,
    pub commented_by_user: bool,
    pub commented_by_item_requester: bool,
    pub search: String,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ItemView {
    /// Combine an item row with the records its references point at.
    ///
    /// Any reference that no longer resolves is rendered as `null`.
    pub fn populate(
        item: Item,
        user: Option<User>,
        category: Option<CategoryRef>,
        subcategory: Option<CategoryRef>,
    ) -> Self {
        Self {
            id: item.id,
            title: item.title,
            condition: item.condition,
            description: item.description,
            photos: item.photos,
            category,
            subcategory,
            user,
            item_requester: item.item_requester_id,
            status: item.status,
            viewed: item.viewed,
            seen: item.seen,
            deleted: item.deleted,
            archived: item.archived,
            gifted_date: item.gifted_date,
            latest_message_date: item.latest_message_date,
            unread_messages_counter: item.unread_messages_counter,
            commented_by_user: item.commented_by_user,
            commented_by_item_requester: item.commented_by_item_requester,
            search: item.search,
            location: item.location,
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}

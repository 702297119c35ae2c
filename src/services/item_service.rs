//! ItemService — item lifecycle operations backed by SQLite. Items are the
//! only rows written here; users and categories are read to validate
//! references, derive the search text and populate fetched items.

use crate::{
    models::{
        category::{Category, CategoryRef},
        item::{Condition, DESCRIPTION_MAX_LEN, Item, ItemView, TITLE_MAX_LEN},
        photo::Photo,
        user::User,
    },
    services::search_index::{SearchFields, build_search_string},
};
use chrono::Utc;
use sqlx::{SqlitePool, types::Json};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

const ITEM_COLUMNS: &str = "id, title, condition, description, photos, category_id, \
     subcategory_id, user_id, item_requester_id, status, viewed, seen, deleted, archived, \
     gifted_date, latest_message_date, unread_messages_counter, commented_by_user, \
     commented_by_item_requester, search, location, created_at, updated_at";

#[derive(Debug, Error)]
pub enum ItemError {
    #[error("missing required parameters")]
    MissingParameters,
    #[error("not acceptable: {0}")]
    NotAcceptable(String),
    #[error("item not found")]
    NotFound,
    #[error("{entity} `{id}` does not exist")]
    InvalidReference { entity: &'static str, id: String },
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

pub type ItemResult<T> = Result<T, ItemError>;

/// Raw create-item input, before any validation.
///
/// Body fields and query ids are collected here as the client sent them so
/// presence and size checks run in a fixed order.
#[derive(Debug, Default, Clone)]
pub struct CreateItemParams {
    pub title: Option<String>,
    pub condition: Option<String>,
    pub description: Option<String>,
    pub photos: Option<Vec<Photo>>,
    pub category_id: Option<String>,
    pub subcategory_id: Option<String>,
}

/// Create-item input that passed [`CreateItemParams::validate`].
#[derive(Debug, Clone)]
pub struct ValidItem {
    pub title: String,
    pub condition: Condition,
    pub description: String,
    pub photos: Vec<Photo>,
    pub category_id: Uuid,
    pub subcategory_id: Uuid,
}

impl CreateItemParams {
    /// Check presence, then sizes, then reference id syntax.
    ///
    /// Empty condition, description and id strings count as absent. An empty
    /// title is present but too short. An empty photo list is accepted.
    pub fn validate(self) -> ItemResult<ValidItem> {
        let (
            Some(title),
            Some(condition),
            Some(description),
            Some(category_id),
            Some(subcategory_id),
            Some(photos),
        ) = (
            self.title,
            non_empty(self.condition),
            non_empty(self.description),
            non_empty(self.category_id),
            non_empty(self.subcategory_id),
            self.photos,
        )
        else {
            return Err(ItemError::MissingParameters);
        };

        let title = title.trim().to_string();
        let description = description.trim().to_string();
        let title_len = title.chars().count();
        if title_len == 0 || title_len > TITLE_MAX_LEN {
            return Err(ItemError::NotAcceptable(format!(
                "title must be between 1 and {} characters",
                TITLE_MAX_LEN
            )));
        }
        if description.chars().count() > DESCRIPTION_MAX_LEN {
            return Err(ItemError::NotAcceptable(format!(
                "description must be at most {} characters",
                DESCRIPTION_MAX_LEN
            )));
        }
        let condition = condition
            .trim()
            .parse::<Condition>()
            .map_err(ItemError::NotAcceptable)?;

        Ok(ValidItem {
            title,
            condition,
            description,
            photos,
            category_id: parse_reference("category", &category_id)?,
            subcategory_id: parse_reference("subcategory", &subcategory_id)?,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_reference(entity: &'static str, raw: &str) -> ItemResult<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| ItemError::InvalidReference {
        entity,
        id: raw.to_string(),
    })
}

/// A malformed item id can never match a row, so it is reported as missing.
fn parse_item_id(raw: &str) -> ItemResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ItemError::NotFound)
}

/// ItemService provides the item lifecycle:
/// - Create an item (validate, resolve owner and categories, derive search text)
/// - Fetch an item (atomically count the view, populate references)
/// - Soft-delete an item (flag only, the row stays retrievable)
#[derive(Clone)]
pub struct ItemService {
    /// Shared SQLite connection pool.
    pub db: Arc<SqlitePool>,
}

impl ItemService {
    pub fn new(db: Arc<SqlitePool>) -> Self {
        Self { db }
    }

    async fn fetch_user(&self, id: Uuid) -> ItemResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, name, surname, company, location, email, created_at, updated_at
             FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&*self.db)
        .await?;
        Ok(user)
    }

    async fn fetch_category(&self, id: Uuid) -> ItemResult<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT id, name, parent_id FROM categories WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&*self.db)
        .await?;
        Ok(category)
    }

    async fn fetch_category_ref(&self, id: Uuid) -> ItemResult<Option<CategoryRef>> {
        let category =
            sqlx::query_as::<_, CategoryRef>("SELECT id, name FROM categories WHERE id = ?")
                .bind(id)
                .fetch_optional(&*self.db)
                .await?;
        Ok(category)
    }

    /// Create a new item owned by `owner_id`.
    ///
    /// The owner, category and subcategory are looked up concurrently and all
    /// must exist. The owner's location is copied onto the item here, before
    /// the insert.
    #[instrument(name = "item_service::create_item", skip(self, params), fields(owner_id = %owner_id))]
    pub async fn create_item(&self, owner_id: Uuid, params: CreateItemParams) -> ItemResult<Item> {
        let input = params.validate()?;

        let (owner, category, subcategory) = tokio::try_join!(
            self.fetch_user(owner_id),
            self.fetch_category(input.category_id),
            self.fetch_category(input.subcategory_id),
        )?;
        let owner = owner.ok_or_else(|| ItemError::InvalidReference {
            entity: "user",
            id: owner_id.to_string(),
        })?;
        let category = category.ok_or_else(|| ItemError::InvalidReference {
            entity: "category",
            id: input.category_id.to_string(),
        })?;
        let subcategory = subcategory.ok_or_else(|| ItemError::InvalidReference {
            entity: "subcategory",
            id: input.subcategory_id.to_string(),
        })?;

        let search = build_search_string(
            &owner,
            SearchFields {
                title: &input.title,
                condition: input.condition,
                description: &input.description,
            },
            &category,
            &subcategory,
        );
        let location = owner.location.clone();
        let now = Utc::now();

        let sql = format!(
            "INSERT INTO items (
                id, title, condition, description, photos, category_id, subcategory_id,
                user_id, deleted, search, location, created_at, updated_at
             ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, 0, ?, ?, ?, ?)
             RETURNING {}",
            ITEM_COLUMNS
        );
        let item = sqlx::query_as::<_, Item>(&sql)
            .bind(Uuid::new_v4())
            .bind(&input.title)
            .bind(input.condition)
            .bind(&input.description)
            .bind(Json(&input.photos))
            .bind(category.id)
            .bind(subcategory.id)
            .bind(owner.id)
            .bind(&search)
            .bind(location)
            .bind(now)
            .bind(now)
            .fetch_one(&*self.db)
            .await?;

        info!(item_id = %item.id, "created item");
        Ok(item)
    }

    /// Count a view of the item and return it with references populated.
    ///
    /// The increment and the read of the updated row are one statement, so
    /// concurrent fetches never lose a view. Soft-deleted items are still
    /// returned.
    #[instrument(name = "item_service::get_item", skip(self))]
    pub async fn get_item(&self, item_id: &str) -> ItemResult<ItemView> {
        let id = parse_item_id(item_id)?;

        let sql = format!(
            "UPDATE items SET viewed = viewed + 1, updated_at = ? WHERE id = ? RETURNING {}",
            ITEM_COLUMNS
        );
        let item = sqlx::query_as::<_, Item>(&sql)
            .bind(Utc::now())
            .bind(id)
            .fetch_optional(&*self.db)
            .await?
            .ok_or_else(|| {
                warn!("item not found");
                ItemError::NotFound
            })?;

        let (user, category, subcategory) = tokio::try_join!(
            self.fetch_user(item.user_id),
            self.fetch_category_ref(item.category_id),
            self.fetch_category_ref(item.subcategory_id),
        )?;

        debug!(viewed = item.viewed, "counted item view");
        Ok(ItemView::populate(item, user, category, subcategory))
    }

    /// Soft-delete an item by setting its `deleted` flag.
    ///
    /// Idempotent: deleting an already deleted item succeeds again.
    #[instrument(name = "item_service::delete_item", skip(self))]
    pub async fn delete_item(&self, item_id: &str) -> ItemResult<Item> {
        let id = parse_item_id(item_id)?;

        let sql = format!(
            "UPDATE items SET deleted = 1, updated_at = ? WHERE id = ? RETURNING {}",
            ITEM_COLUMNS
        );
        let item = sqlx::query_as::<_, Item>(&sql)
            .bind(Utc::now())
            .bind(id)
            .fetch_optional(&*self.db)
            .await?
            .ok_or_else(|| {
                warn!("item not found");
                ItemError::NotFound
            })?;

        info!("soft-deleted item");
        Ok(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_params() -> CreateItemParams {
        CreateItemParams {
            title: Some("Chair".into()),
            condition: Some("used".into()),
            description: Some("Wooden chair".into()),
            photos: Some(vec![]),
            category_id: Some(Uuid::new_v4().to_string()),
            subcategory_id: Some(Uuid::new_v4().to_string()),
        }
    }

    #[test]
    fn valid_params_pass() {
        let item = valid_params().validate().unwrap();
        assert_eq!(item.title, "Chair");
        assert_eq!(item.condition, Condition::Used);
        assert!(item.photos.is_empty());
    }

    #[test]
    fn each_absent_field_is_missing_parameters() {
        let cases: [fn(&mut CreateItemParams); 6] = [
            |p| p.title = None,
            |p| p.condition = None,
            |p| p.description = None,
            |p| p.photos = None,
            |p| p.category_id = None,
            |p| p.subcategory_id = None,
        ];
        for strip in cases {
            let mut params = valid_params();
            strip(&mut params);
            assert!(matches!(
                params.validate(),
                Err(ItemError::MissingParameters)
            ));
        }
    }

    #[test]
    fn empty_description_counts_as_absent() {
        let mut params = valid_params();
        params.description = Some(String::new());
        assert!(matches!(
            params.validate(),
            Err(ItemError::MissingParameters)
        ));
    }

    #[test]
    fn missing_wins_over_too_long() {
        let mut params = valid_params();
        params.title = Some("x".repeat(31));
        params.photos = None;
        assert!(matches!(
            params.validate(),
            Err(ItemError::MissingParameters)
        ));
    }

    #[test]
    fn title_bounds_are_enforced() {
        let too_long = "x".repeat(31);
        for title in ["", "   ", too_long.as_str()] {
            let mut params = valid_params();
            params.title = Some(title.to_string());
            assert!(matches!(
                params.validate(),
                Err(ItemError::NotAcceptable(_))
            ));
        }

        let mut params = valid_params();
        params.title = Some("x".repeat(30));
        assert!(params.validate().is_ok());
    }

    #[test]
    fn lengths_count_characters_not_bytes() {
        let mut params = valid_params();
        params.title = Some("č".repeat(30));
        params.description = Some("ž".repeat(500));
        assert!(params.validate().is_ok());
    }

    #[test]
    fn description_over_limit_is_not_acceptable() {
        let mut params = valid_params();
        params.description = Some("d".repeat(501));
        assert!(matches!(
            params.validate(),
            Err(ItemError::NotAcceptable(_))
        ));
    }

    #[test]
    fn unknown_condition_is_not_acceptable() {
        let mut params = valid_params();
        params.condition = Some("brand new".into());
        assert!(matches!(
            params.validate(),
            Err(ItemError::NotAcceptable(_))
        ));
    }

    #[test]
    fn malformed_category_id_is_invalid_reference() {
        let mut params = valid_params();
        params.subcategory_id = Some("5e7dc3cc6c758b22b9849ed7".into());
        match params.validate() {
            Err(ItemError::InvalidReference { entity, .. }) => assert_eq!(entity, "subcategory"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn malformed_item_id_is_not_found() {
        assert!(matches!(parse_item_id("nope"), Err(ItemError::NotFound)));
    }
}

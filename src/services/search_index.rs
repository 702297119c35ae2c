//! Builds the denormalized `search` text stored on every item.
//!
//! The blob lets clients run plain substring queries over owner, item and
//! category fields without a dedicated search engine. It is computed once
//! when the item is created; nothing refreshes it afterwards, so any future
//! edit path for title, description or categories must call
//! [`build_search_string`] again.

use crate::models::{category::Category, item::Condition, user::User};

/// The item fields that feed the search text.
#[derive(Debug, Clone, Copy)]
pub struct SearchFields<'a> {
    pub title: &'a str,
    pub condition: Condition,
    pub description: &'a str,
}

/// Concatenate owner, item and category fields, then append their slug.
///
/// Order: username, name, surname, company, location, title, condition,
/// description, category name, subcategory name. Missing optional owner
/// fields are skipped rather than rendered as placeholders.
///
/// The slug is joined with a space. Rows written by the legacy service carry
/// the slug glued directly to the last word, so the formats differ.
pub fn build_search_string(
    owner: &User,
    item: SearchFields<'_>,
    category: &Category,
    subcategory: &Category,
) -> String {
    let parts = [
        Some(owner.username.as_str()),
        Some(owner.name.as_str()),
        Some(owner.surname.as_str()),
        owner.company.as_deref(),
        owner.location.as_deref(),
        Some(item.title),
        Some(item.condition.as_str()),
        Some(item.description),
        Some(category.name.as_str()),
        Some(subcategory.name.as_str()),
    ];

    let plain = parts
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    let slugged = slug::slugify(&plain);
    if slugged.is_empty() {
        plain
    } else {
        format!("{} {}", plain, slugged)
    }
}

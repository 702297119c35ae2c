//! Photos embedded in an item listing.

use serde::{Deserialize, Serialize};

/// A pre-processed image attached to an item.
///
/// Photos have no lifecycle of their own; they are persisted as an ordered
/// JSON array on the parent item row. The upload pipeline does not guarantee
/// any field, so every one is optional and omitted from output when absent.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    /// Name of the file as uploaded by the client.
    #[serde(
        default,
        rename = "originalname",
        skip_serializing_if = "Option::is_none"
    )]
    pub original_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mimetype: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<Thumbnail>,
}

/// Thumbnail generated upstream for a [`Photo`].
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Thumbnail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(
        default,
        rename = "originalname",
        skip_serializing_if = "Option::is_none"
    )]
    pub original_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mimetype: Option<String>,
}

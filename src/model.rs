use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Stored value of a wishlist item. The id is not part of the record: the
/// collection node maps store-assigned keys to these values, and records
/// written by other clients may omit fields, so everything defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemRecord {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type", default)]
    pub item_type: String,
    #[serde(default)]
    pub priority: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub url: String,
    #[serde(rename = "createdAt", default)]
    pub created_at: String,
    #[serde(rename = "updatedAt", default)]
    pub updated_at: String,
}

/// What the API returns: the store key plus the record it points at,
/// serialized flat as `{"id": ..., "title": ..., ...}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WishlistItem {
    pub id: String,
    #[serde(flatten)]
    pub record: ItemRecord,
}

/// Form payload shared by the add and edit endpoints. Required fields are
/// plain strings so the Form extractor rejects requests missing them
/// before any of this code runs.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemForm {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub item_type: String,
    pub priority: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub url: String,
}

/// Trimmed, normalized input ready to be stamped into a record.
#[derive(Debug, Clone)]
pub struct ItemInput {
    pub title: String,
    pub description: String,
    pub item_type: String,
    pub priority: String,
    pub price: String,
    pub url: String,
}

impl ItemForm {
    /// Trims every field and lowercases `priority`. Required fields that
    /// are empty after trimming are rejected with a message naming the
    /// field.
    pub fn validate(self) -> Result<ItemInput, String> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err("title must not be empty".to_string());
        }

        let item_type = self.item_type.trim().to_string();
        if item_type.is_empty() {
            return Err("type must not be empty".to_string());
        }

        let priority = self.priority.trim().to_lowercase();
        if priority.is_empty() {
            return Err("priority must not be empty".to_string());
        }

        Ok(ItemInput {
            title,
            description: self.description.trim().to_string(),
            item_type,
            priority,
            price: self.price.trim().to_string(),
            url: self.url.trim().to_string(),
        })
    }
}

impl ItemRecord {
    pub fn from_input(input: ItemInput, created_at: String, updated_at: String) -> Self {
        ItemRecord {
            title: input.title,
            description: input.description,
            item_type: input.item_type,
            priority: input.priority,
            price: input.price,
            url: input.url,
            created_at,
            updated_at,
        }
    }
}

/// Current UTC time as RFC 3339 with microseconds, e.g.
/// `2026-08-21T10:30:45.123456Z`. Lexicographic order matches time order.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Rank derived from the priority field, used only for ordering and never
/// persisted. Anything outside high/medium/low (including absent or empty
/// priorities on foreign records) sorts below low.
pub fn priority_rank(priority: &str) -> u8 {
    match priority.trim().to_lowercase().as_str() {
        "high" => 3,
        "medium" => 2,
        "low" => 1,
        _ => 0,
    }
}

/// Display order: highest rank first; within a rank, oldest `createdAt`
/// first, then id, so the output is deterministic for a given collection
/// state even though the store hands the collection back unordered.
pub fn sort_by_priority(mut items: Vec<WishlistItem>) -> Vec<WishlistItem> {
    items.sort_by(|a, b| {
        priority_rank(&b.record.priority)
            .cmp(&priority_rank(&a.record.priority))
            .then_with(|| a.record.created_at.cmp(&b.record.created_at))
            .then_with(|| a.id.cmp(&b.id))
    });
    items
}

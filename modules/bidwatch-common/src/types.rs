use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// --- Items ---

/// A tracked auction listing in its canonical shape, regardless of source.
///
/// Adapters produce items without an `id`; the store assigns one on insert and
/// it never changes afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    /// Listing detail page. Adapter dispatch key and fetch cache key.
    pub source_url: String,
    #[serde(default)]
    pub image_url: String,
    /// Seller page URL or opaque seller identifier. Items sharing it are grouped.
    #[serde(default)]
    pub seller_ref: String,
    #[serde(default)]
    pub my_bid: f64,
    #[serde(default)]
    pub current_bid: f64,
    /// User-supplied market value. Ranking key for the seller grouping.
    #[serde(default)]
    pub reference_value: f64,
    pub closes_at: DateTime<Utc>,
    #[serde(default)]
    pub archived: bool,
}

impl Item {
    /// Copy with the id cleared, i.e. the shape adapters emit.
    pub fn without_id(&self) -> Item {
        Item {
            id: None,
            ..self.clone()
        }
    }
}

/// One dashboard row: the seller's highest-valued item, with the seller's
/// remaining items attached in closing order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupedItem {
    #[serde(flatten)]
    pub primary: Item,
    /// Display name when the seller is in the known-seller registry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seller_name: Option<String>,
    /// `None` when the seller has a single item; never `Some(vec![])`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_items: Option<Vec<Item>>,
}

impl GroupedItem {
    pub fn secondary_count(&self) -> usize {
        self.secondary_items.as_ref().map_or(0, Vec::len)
    }
}

/// Selects active or archived items from a store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemFilter {
    #[serde(default)]
    pub archived: bool,
}

impl ItemFilter {
    pub fn active() -> Self {
        Self { archived: false }
    }

    pub fn archived() -> Self {
        Self { archived: true }
    }

    pub fn matches(&self, item: &Item) -> bool {
        item.archived == self.archived
    }
}

// The whole item collection plus the id counter. Both stores mutate one of
// these; the file store also serializes it.

use bidwatch_common::{Item, ItemFilter};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub next_id: i64,
    pub items: Vec<Item>,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            next_id: 1,
            items: Vec::new(),
        }
    }
}

/// A record from the older bare-array data file, under its original field
/// names. Current names are accepted as aliases.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyItem {
    #[serde(default)]
    id: Option<i64>,
    #[serde(default)]
    name: String,
    #[serde(alias = "sourceUrl")]
    url: String,
    #[serde(default)]
    image_url: String,
    #[serde(default, alias = "sellerRef")]
    seller_url: String,
    #[serde(default, alias = "myBid")]
    bid: f64,
    #[serde(default)]
    current_bid: Option<f64>,
    #[serde(default, alias = "referenceValue")]
    market: f64,
    #[serde(alias = "closesAt")]
    date: String,
    #[serde(default)]
    archived: Option<bool>,
}

impl LegacyItem {
    fn into_item(self, index: usize) -> Result<Item> {
        let closes_at = parse_legacy_date(&self.date).ok_or_else(|| StoreError::LegacyRecord {
            index,
            reason: format!("unparseable date {:?}", self.date),
        })?;

        Ok(Item {
            id: self.id,
            name: self.name,
            source_url: self.url,
            image_url: self.image_url,
            seller_ref: self.seller_url,
            my_bid: self.bid,
            current_bid: self.current_bid.unwrap_or(0.0),
            reference_value: self.market,
            closes_at,
            archived: self.archived.unwrap_or(false),
        })
    }
}

/// RFC 3339, or the `datetime-local` and date-only forms a browser form posts.
/// Naive values are taken as UTC.
fn parse_legacy_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc())
}

impl Document {
    /// Parse a data file. A JSON array is read as the legacy format and
    /// anything else as the current document, so a parse error always
    /// describes the shape the file claims to be.
    pub fn from_json(raw: &str) -> Result<Self> {
        let trimmed = raw.trim_start();
        if trimmed.is_empty() {
            return Ok(Self::default());
        }
        let doc = if trimmed.starts_with('[') {
            Self::from_legacy(serde_json::from_str(raw)?)?
        } else {
            serde_json::from_str::<Document>(raw)?
        };
        Ok(doc.normalized())
    }

    fn from_legacy(records: Vec<LegacyItem>) -> Result<Self> {
        let items = records
            .into_iter()
            .enumerate()
            .map(|(index, record)| record.into_item(index))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { next_id: 1, items })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Keep `next_id` ahead of every stored id and give id-less records one.
    fn normalized(mut self) -> Self {
        let max_id = self.items.iter().filter_map(|i| i.id).max().unwrap_or(0);
        self.next_id = self.next_id.max(max_id + 1);
        for item in self.items.iter_mut().filter(|i| i.id.is_none()) {
            item.id = Some(self.next_id);
            self.next_id += 1;
        }
        self
    }

    pub fn list(&self, filter: ItemFilter) -> Vec<Item> {
        self.items.iter().filter(|i| filter.matches(i)).cloned().collect()
    }

    pub fn get(&self, id: i64) -> Result<Item> {
        self.items
            .iter()
            .find(|i| i.id == Some(id))
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    pub fn insert(&mut self, mut item: Item) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        item.id = Some(id);
        self.items.push(item);
        id
    }

    pub fn update(&mut self, item: Item) -> Result<()> {
        let id = item.id.ok_or(StoreError::MissingId)?;
        let slot = self.slot_mut(id)?;
        *slot = item;
        Ok(())
    }

    pub fn modify(&mut self, id: i64, edit: impl FnOnce(&mut Item)) -> Result<Item> {
        let slot = self.slot_mut(id)?;
        edit(slot);
        slot.id = Some(id);
        Ok(slot.clone())
    }

    pub fn delete(&mut self, id: i64) -> Result<()> {
        let index = self
            .items
            .iter()
            .position(|i| i.id == Some(id))
            .ok_or(StoreError::NotFound(id))?;
        self.items.remove(index);
        Ok(())
    }

    pub fn set_archived(&mut self, id: i64, archived: bool) -> Result<()> {
        self.slot_mut(id)?.archived = archived;
        Ok(())
    }

    fn slot_mut(&mut self, id: i64) -> Result<&mut Item> {
        self.items
            .iter_mut()
            .find(|i| i.id == Some(id))
            .ok_or(StoreError::NotFound(id))
    }
}

use async_trait::async_trait;
use bidwatch_common::{Item, ItemFilter};
use tokio::sync::RwLock;

use crate::document::Document;
use crate::error::Result;
use crate::{ItemEdit, ItemStore};

/// Non-persistent store, for tests and throwaway runs.
#[derive(Default)]
pub struct MemoryStore {
    doc: RwLock<Document>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: impl IntoIterator<Item = Item>) -> Self {
        let mut doc = Document::default();
        for item in items {
            doc.insert(item);
        }
        Self {
            doc: RwLock::new(doc),
        }
    }
}

#[async_trait]
impl ItemStore for MemoryStore {
    async fn list(&self, filter: ItemFilter) -> Result<Vec<Item>> {
        Ok(self.doc.read().await.list(filter))
    }

    async fn get(&self, id: i64) -> Result<Item> {
        self.doc.read().await.get(id)
    }

    async fn insert(&self, item: Item) -> Result<i64> {
        Ok(self.doc.write().await.insert(item))
    }

    async fn update(&self, item: Item) -> Result<()> {
        self.doc.write().await.update(item)
    }

    async fn modify(&self, id: i64, edit: ItemEdit) -> Result<Item> {
        self.doc.write().await.modify(id, edit)
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.doc.write().await.delete(id)
    }

    async fn set_archived(&self, id: i64, archived: bool) -> Result<()> {
        self.doc.write().await.set_archived(id, archived)
    }
}

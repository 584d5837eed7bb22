//! Item store backed by a single JSON document on disk.
//!
//! The whole document is held in memory and rewritten after every mutation.
//! Writes go to a sibling temp file that is then renamed over the target, so a
//! crash mid-write leaves the previous version intact.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bidwatch_common::{Item, ItemFilter};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::document::Document;
use crate::error::Result;
use crate::{ItemEdit, ItemStore};

pub struct JsonFileStore {
    path: PathBuf,
    doc: Mutex<Document>,
}

impl JsonFileStore {
    /// Load the store at `path`, creating the file and its parent directory
    /// when missing.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let doc = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => Document::from_json(&raw)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let doc = Document::default();
                write_document(&path, &doc).await?;
                doc
            }
            Err(e) => return Err(e.into()),
        };

        info!(
            path = %path.display(),
            items = doc.items.len(),
            next_id = doc.next_id,
            "Opened item store"
        );
        Ok(Self {
            path,
            doc: Mutex::new(doc),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apply `op` to the document and persist it. The in-memory copy is only
    /// replaced once the write succeeds.
    async fn mutate<T>(&self, op: impl FnOnce(&mut Document) -> Result<T>) -> Result<T> {
        let mut doc = self.doc.lock().await;
        let mut next = doc.clone();
        let out = op(&mut next)?;
        write_document(&self.path, &next).await?;
        *doc = next;
        Ok(out)
    }
}

async fn write_document(path: &Path, doc: &Document) -> Result<()> {
    let raw = doc.to_json()?;
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, raw).await?;
    tokio::fs::rename(&tmp, path).await?;
    debug!(path = %path.display(), items = doc.items.len(), "Item store written");
    Ok(())
}

#[async_trait]
impl ItemStore for JsonFileStore {
    async fn list(&self, filter: ItemFilter) -> Result<Vec<Item>> {
        Ok(self.doc.lock().await.list(filter))
    }

    async fn get(&self, id: i64) -> Result<Item> {
        self.doc.lock().await.get(id)
    }

    async fn insert(&self, item: Item) -> Result<i64> {
        self.mutate(|doc| Ok(doc.insert(item))).await
    }

    async fn update(&self, item: Item) -> Result<()> {
        self.mutate(|doc| doc.update(item)).await
    }

    async fn modify(&self, id: i64, edit: ItemEdit) -> Result<Item> {
        self.mutate(|doc| doc.modify(id, edit)).await
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.mutate(|doc| doc.delete(id)).await
    }

    async fn set_archived(&self, id: i64, archived: bool) -> Result<()> {
        self.mutate(|doc| doc.set_archived(id, archived)).await
    }
}

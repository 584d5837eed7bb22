pub mod document;
pub mod error;
pub mod json_file;
pub mod memory;

pub use error::{Result, StoreError};
pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use bidwatch_common::{Item, ItemFilter};

/// In-place edit applied by [`ItemStore::modify`].
pub type ItemEdit = Box<dyn FnOnce(&mut Item) + Send>;

/// Persistence for tracked items.
///
/// Ids are assigned by the store on insert, are unique, and are never reused
/// after a delete.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Items matching `filter`, in insertion order.
    async fn list(&self, filter: ItemFilter) -> Result<Vec<Item>>;

    async fn get(&self, id: i64) -> Result<Item>;

    /// Persist `item` under a fresh id. Any id on the input is ignored.
    async fn insert(&self, item: Item) -> Result<i64>;

    /// Replace the stored item with the same id.
    async fn update(&self, item: Item) -> Result<()>;

    /// Read, edit and write back one item as a single step, so no other
    /// mutation can land between the read and the write. The edit cannot
    /// change the id. Returns the stored result.
    async fn modify(&self, id: i64, edit: ItemEdit) -> Result<Item>;

    async fn delete(&self, id: i64) -> Result<()>;

    async fn set_archived(&self, id: i64, archived: bool) -> Result<()>;
}

//! Grocery list domain: the item store and its blob persistence.

pub mod storage;
pub mod store;

pub use storage::{load_items, save_items, BlobStore, FileBlobStore};
pub use store::ItemStore;

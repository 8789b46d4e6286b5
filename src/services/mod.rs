// Service exports
pub mod appwrite;
pub mod memory;
pub mod store;

pub use appwrite::{AppwriteCollections, AppwriteStore};
pub use memory::MemoryStore;
pub use store::{RecordFilter, RecordStore, StoreError};

pub mod kv_store;

pub use kv_store::{keys, FileStore, JsonStoreExt, KeyValueStore, MemoryStore};

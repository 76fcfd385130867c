mod json_file_store;
mod memory_store;
mod store_factory;

pub use json_file_store::JsonFileStore;
pub use memory_store::MemoryStore;
pub use store_factory::KeyValueStoreFactory;

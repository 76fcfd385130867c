mod http_document_store;
mod memory_document_store;

pub use http_document_store::HttpDocumentStore;
pub use memory_document_store::MemoryDocumentStore;

mod assistant_directory;
mod document_store;
mod key_value_store;
mod response_generator;

pub use assistant_directory::{AssistantDirectory, AssistantDirectoryError};
pub use document_store::{DocumentStore, DocumentStoreError};
pub use key_value_store::{KeyValueStore, StorageError};
pub use response_generator::{GenerationError, ReplyRequest, ReplyTokenStream, ResponseGenerator};

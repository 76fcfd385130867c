pub mod catalog;
pub mod documents;
pub mod llm;
pub mod observability;
pub mod proxy;
pub mod storage;

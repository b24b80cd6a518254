//! Whole-document JSON persistence.
//!
//! Each registry owns one named document (`afk`, `deleted`, `lock`). Reads
//! return the full document and writes replace it atomically; [`Document`]
//! serializes every load-mutate-save cycle for its name.

pub mod document;
pub mod error;
pub mod store;
pub mod store_file;
pub mod store_memory;

pub use {
    document::Document,
    error::{Error, Result},
    store::DocumentStore,
    store_file::FileDocumentStore,
    store_memory::InMemoryDocumentStore,
};

//! Persistence trait for named documents.

use async_trait::async_trait;

use crate::Result;

/// Load-all/save-all storage for named JSON documents.
///
/// There are no partial reads or writes: callers load the whole document,
/// mutate their copy and save it back. Use [`crate::Document`] rather than
/// calling these directly so that cycles on one name never interleave.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// `None` when the document has never been written.
    async fn load(&self, name: &str) -> Result<Option<serde_json::Value>>;

    /// Replace the document wholesale. Readers see either the old or the new
    /// document, never a mix.
    async fn save(&self, name: &str, document: &serde_json::Value) -> Result<()>;

    /// Delete the document. Removing a missing document is not an error.
    async fn remove(&self, name: &str) -> Result<()>;

    /// Names of all stored documents, sorted.
    async fn names(&self) -> Result<Vec<String>>;
}

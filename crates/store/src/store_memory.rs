//! In-memory store for tests.

use std::{collections::BTreeMap, sync::Mutex};

use async_trait::async_trait;

use crate::{Result, store::DocumentStore};

/// In-memory store backed by a `BTreeMap`. No persistence.
#[derive(Default)]
pub struct InMemoryDocumentStore {
    documents: Mutex<BTreeMap<String, serde_json::Value>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn load(&self, name: &str) -> Result<Option<serde_json::Value>> {
        let documents = self.documents.lock().unwrap_or_else(|e| e.into_inner());
        Ok(documents.get(name).cloned())
    }

    async fn save(&self, name: &str, document: &serde_json::Value) -> Result<()> {
        let mut documents = self.documents.lock().unwrap_or_else(|e| e.into_inner());
        documents.insert(name.to_string(), document.clone());
        Ok(())
    }

    async fn remove(&self, name: &str) -> Result<()> {
        let mut documents = self.documents.lock().unwrap_or_else(|e| e.into_inner());
        documents.remove(name);
        Ok(())
    }

    async fn names(&self) -> Result<Vec<String>> {
        let documents = self.documents.lock().unwrap_or_else(|e| e.into_inner());
        Ok(documents.keys().cloned().collect())
    }
}

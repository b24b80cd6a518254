use {
    clap::ValueEnum,
    warden_registry::{lock, presence, snipe},
    warden_store::DocumentStore,
};

/// Documents the bot keeps in its data directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DocumentName {
    /// Away statuses (`afk.json`).
    Afk,
    /// Recently deleted messages per channel (`deleted.json`).
    Deleted,
    /// Locked channels (`lock.json`).
    Lock,
}

impl DocumentName {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Afk => presence::DOCUMENT,
            Self::Deleted => snipe::DOCUMENT,
            Self::Lock => lock::DOCUMENT,
        }
    }
}

/// Pretty JSON of one document, or the list of stored documents when no
/// name is given.
pub async fn inspect(
    store: &dyn DocumentStore,
    document: Option<DocumentName>,
) -> anyhow::Result<String> {
    let Some(document) = document else {
        let names = store.names().await?;
        if names.is_empty() {
            return Ok("No documents stored.".into());
        }
        return Ok(names.join("\n"));
    };

    match store.load(document.as_str()).await? {
        Some(value) => Ok(serde_json::to_string_pretty(&value)?),
        None => Ok(format!("Document '{}' is empty.", document.as_str())),
    }
}

pub async fn reset(store: &dyn DocumentStore, document: DocumentName) -> anyhow::Result<String> {
    let name = document.as_str();
    if store.load(name).await?.is_none() {
        return Ok(format!("Document '{name}' was already empty."));
    }
    store.remove(name).await?;
    Ok(format!("Deleted document '{name}'."))
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, warden_store::FileDocumentStore};

    #[tokio::test]
    async fn inspect_and_reset() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileDocumentStore::new(tmp.path().to_path_buf());

        assert_eq!(inspect(&store, None).await.unwrap(), "No documents stored.");
        assert_eq!(
            inspect(&store, Some(DocumentName::Afk)).await.unwrap(),
            "Document 'afk' is empty."
        );

        store
            .save(
                "afk",
                &serde_json::json!({"1": {"status": null, "timestamp": "2025-01-01T00:00:00Z"}}),
            )
            .await
            .unwrap();
        assert_eq!(inspect(&store, None).await.unwrap(), "afk");
        assert!(
            inspect(&store, Some(DocumentName::Afk))
                .await
                .unwrap()
                .contains("\"status\": null")
        );

        assert_eq!(
            reset(&store, DocumentName::Afk).await.unwrap(),
            "Deleted document 'afk'."
        );
        assert_eq!(
            reset(&store, DocumentName::Afk).await.unwrap(),
            "Document 'afk' was already empty."
        );
    }

    #[test]
    fn names_match_registry_documents() {
        assert_eq!(DocumentName::Afk.as_str(), "afk");
        assert_eq!(DocumentName::Deleted.as_str(), "deleted");
        assert_eq!(DocumentName::Lock.as_str(), "lock");
    }
}

//! JSON file-backed document store with atomic writes.

use std::path::{Path, PathBuf};

use {async_trait::async_trait, tokio::fs, tracing::debug};

use crate::{Error, Result, store::DocumentStore};

/// One pretty-printed `<name>.json` file per document under `base_dir`.
pub struct FileDocumentStore {
    base_dir: PathBuf,
}

impl FileDocumentStore {
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn path_for(&self, name: &str) -> Result<PathBuf> {
        validate_name(name)?;
        Ok(self.base_dir.join(format!("{name}.json")))
    }

    /// Atomic write: write to temp, rename over target, keep `.bak`.
    async fn atomic_write(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        fs::create_dir_all(&self.base_dir).await?;
        let tmp = path.with_extension("json.tmp");

        fs::write(&tmp, bytes).await?;

        if fs::try_exists(path).await.unwrap_or(false) {
            let bak = path.with_extension("json.bak");
            let _ = fs::copy(path, &bak).await;
        }

        fs::rename(&tmp, path).await?;
        Ok(())
    }
}

/// Document names become file names, so only `[A-Za-z0-9_-]` is accepted.
fn validate_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(Error::invalid_name(name))
    }
}

#[async_trait]
impl DocumentStore for FileDocumentStore {
    async fn load(&self, name: &str) -> Result<Option<serde_json::Value>> {
        let path = self.path_for(name)?;
        let data = match fs::read_to_string(&path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let value = serde_json::from_str(&data).map_err(|e| Error::malformed(name, e))?;
        Ok(Some(value))
    }

    async fn save(&self, name: &str, document: &serde_json::Value) -> Result<()> {
        let path = self.path_for(name)?;
        let json = serde_json::to_string_pretty(document)?;
        self.atomic_write(&path, json.as_bytes()).await?;
        debug!(document = name, path = %path.display(), "saved document");
        Ok(())
    }

    async fn remove(&self, name: &str) -> Result<()> {
        let path = self.path_for(name)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn names(&self) -> Result<Vec<String>> {
        let mut entries = match fs::read_dir(&self.base_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let file_name = entry.file_name().to_string_lossy().to_string();
            if let Some(name) = file_name.strip_suffix(".json")
                && validate_name(name).is_ok()
            {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}

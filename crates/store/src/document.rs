//! Typed, serialized access to one named document.

use std::{marker::PhantomData, sync::Arc};

use {
    serde::{Serialize, de::DeserializeOwned},
    tokio::sync::Mutex,
};

use crate::{Error, Result, store::DocumentStore};

/// Handle to the document `name` in a [`DocumentStore`], decoded as `T`.
///
/// Every operation holds the handle's mutex for the whole load-mutate-save
/// cycle, so two updates through the same handle can never lose each other's
/// writes. Share one handle per document name (wrap the owner in an `Arc`).
pub struct Document<T> {
    name: String,
    store: Arc<dyn DocumentStore>,
    cycle: Mutex<()>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Document<T>
where
    T: Serialize + DeserializeOwned + Default + Clone + PartialEq + Send + Sync,
{
    pub fn new(store: Arc<dyn DocumentStore>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            store,
            cycle: Mutex::new(()),
            _marker: PhantomData,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    async fn load_locked(&self) -> Result<T> {
        match self.store.load(&self.name).await? {
            Some(value) => {
                serde_json::from_value(value).map_err(|e| Error::malformed(&self.name, e))
            },
            None => Ok(T::default()),
        }
    }

    async fn save_locked(&self, value: &T) -> Result<()> {
        let json = serde_json::to_value(value)?;
        self.store.save(&self.name, &json).await
    }

    /// Snapshot of the current document; the default value on first use.
    pub async fn read(&self) -> Result<T> {
        let _cycle = self.cycle.lock().await;
        self.load_locked().await
    }

    /// Load, apply `f`, and save if `f` changed the document.
    ///
    /// Returns whatever `f` returns. Nothing is written when the value is
    /// unchanged, and nothing is written when loading fails.
    pub async fn update<R, F>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&mut T) -> R + Send,
        R: Send,
    {
        let _cycle = self.cycle.lock().await;
        let current = self.load_locked().await?;
        let mut next = current.clone();
        let out = f(&mut next);
        if next != current {
            self.save_locked(&next).await?;
        }
        Ok(out)
    }

    /// Overwrite the document with `value`.
    pub async fn replace(&self, value: T) -> Result<()> {
        let _cycle = self.cycle.lock().await;
        self.save_locked(&value).await
    }
}

//! Recently deleted messages, newest first, capped per channel.

use std::{collections::BTreeMap, sync::Arc};

use {
    chrono::{DateTime, Utc},
    serde::{Deserialize, Serialize},
    tracing::debug,
    warden_channels::{Capability, ChatPlatform, DeletedMessage, Guard, Notice},
    warden_common::time::Elapsed,
    warden_store::{Document, DocumentStore},
};

use crate::Result;

/// Document name in the store.
pub const DOCUMENT: &str = "deleted";

/// Entries kept per channel unless configured otherwise.
pub const DEFAULT_CAPACITY: usize = 10;

/// Clearing a channel's history is a moderator action.
pub const CLEAR_GUARD: Guard = Guard::actor(Capability::ManageMessages);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletedEntry {
    pub author: String,
    pub author_id: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    pub content: String,
    /// When the deletion was observed.
    #[serde(with = "warden_common::time::timestamp")]
    pub timestamp: DateTime<Utc>,
}

/// Channel id → entries, newest first.
pub type DeletedDocument = BTreeMap<String, Vec<DeletedEntry>>;

/// Result of looking up one page of a channel's history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnipeView {
    Empty,
    InvalidPage {
        total: usize,
    },
    Entry {
        entry: DeletedEntry,
        page: usize,
        total: usize,
        elapsed: Elapsed,
    },
}

impl SnipeView {
    pub fn into_notice(self, actor_id: &str) -> Notice {
        match self {
            Self::Empty => Notice::NoDeletedMessages {
                actor_id: actor_id.to_string(),
            },
            Self::InvalidPage { total } => Notice::InvalidPage {
                actor_id: actor_id.to_string(),
                total,
            },
            Self::Entry {
                entry,
                page,
                total,
                elapsed,
            } => Notice::DeletedMessage {
                author: entry.author,
                avatar_url: entry.avatar_url,
                content: entry.content,
                elapsed,
                page,
                total,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearOutcome {
    NothingToClear,
    Cleared { removed: usize },
}

impl ClearOutcome {
    pub fn into_notice(self, actor_id: &str) -> Notice {
        match self {
            Self::NothingToClear => Notice::NothingToClear {
                actor_id: actor_id.to_string(),
            },
            Self::Cleared { removed } => Notice::SnipeCleared {
                actor_id: actor_id.to_string(),
                removed,
            },
        }
    }
}

pub struct SnipeRegistry {
    document: Document<DeletedDocument>,
    capacity: usize,
}

impl SnipeRegistry {
    /// `capacity` is clamped to at least one entry per channel.
    pub fn new(store: Arc<dyn DocumentStore>, capacity: usize) -> Self {
        Self {
            document: Document::new(store, DOCUMENT),
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Push a deletion to the front of its channel's list, dropping the oldest
    /// entries beyond capacity. Bot messages and messages with empty text
    /// (attachment-only) are skipped; returns whether the deletion was recorded.
    pub async fn record_deletion(
        &self,
        message: &DeletedMessage,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        if message.author.bot || message.content.is_empty() {
            return Ok(false);
        }

        let entry = DeletedEntry {
            author: message.author.name.clone(),
            author_id: message.author.id.clone(),
            avatar_url: message.author.avatar_url.clone(),
            content: message.content.clone(),
            timestamp: now,
        };
        let capacity = self.capacity;
        let channel_id = message.channel_id.clone();
        let kept = self
            .document
            .update(move |doc| {
                let entries = doc.entry(channel_id).or_default();
                entries.insert(0, entry);
                entries.truncate(capacity);
                entries.len()
            })
            .await?;
        debug!(channel_id = %message.channel_id, kept, "recorded deleted message");
        Ok(true)
    }

    /// Entry at 1-indexed `page`, where page 1 is the most recent deletion.
    pub async fn show(
        &self,
        channel_id: &str,
        page: i64,
        now: DateTime<Utc>,
    ) -> Result<SnipeView> {
        let mut doc = self.document.read().await?;
        let entries = doc.remove(channel_id).unwrap_or_default();
        let total = entries.len();
        if total == 0 {
            return Ok(SnipeView::Empty);
        }

        let index = usize::try_from(page)
            .ok()
            .and_then(|p| p.checked_sub(1))
            .filter(|&i| i < total);
        let Some(index) = index else {
            return Ok(SnipeView::InvalidPage { total });
        };

        let entry = entries.into_iter().nth(index);
        Ok(match entry {
            Some(entry) => SnipeView::Entry {
                elapsed: Elapsed::between(entry.timestamp, now),
                entry,
                page: index + 1,
                total,
            },
            None => SnipeView::InvalidPage { total },
        })
    }

    pub async fn entries(&self, channel_id: &str) -> Result<Vec<DeletedEntry>> {
        Ok(self
            .document
            .read()
            .await?
            .remove(channel_id)
            .unwrap_or_default())
    }

    /// Drop the channel's whole history in one write.
    pub async fn clear(&self, channel_id: &str) -> Result<ClearOutcome> {
        let removed = self
            .document
            .update(|doc| doc.remove(channel_id).map(|entries| entries.len()))
            .await?;
        Ok(match removed {
            Some(removed) if removed > 0 => {
                debug!(channel_id, removed, "cleared deleted messages");
                ClearOutcome::Cleared { removed }
            },
            _ => ClearOutcome::NothingToClear,
        })
    }

    /// [`Self::clear`] on behalf of `actor_id`, who must pass [`CLEAR_GUARD`].
    pub async fn clear_as(
        &self,
        platform: &dyn ChatPlatform,
        guild_id: u64,
        actor_id: &str,
        channel_id: &str,
    ) -> Result<ClearOutcome> {
        CLEAR_GUARD.check(platform, guild_id, actor_id).await?;
        self.clear(channel_id).await
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {
        super::*,
        chrono::{Duration, TimeZone},
        rstest::rstest,
        warden_channels::Author,
        warden_store::InMemoryDocumentStore,
    };

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn registry() -> (SnipeRegistry, Arc<InMemoryDocumentStore>) {
        let store = Arc::new(InMemoryDocumentStore::new());
        (SnipeRegistry::new(store.clone(), DEFAULT_CAPACITY), store)
    }

    fn deleted(channel: &str, content: &str) -> DeletedMessage {
        DeletedMessage {
            channel_id: channel.into(),
            author: Author {
                id: "7".into(),
                name: "alice".into(),
                avatar_url: Some("https://cdn/7.png".into()),
                bot: false,
            },
            content: content.into(),
        }
    }

    #[tokio::test]
    async fn test_capacity_keeps_newest_ten() {
        let (registry, _) = registry();
        for i in 0..15 {
            let recorded = registry
                .record_deletion(&deleted("c1", &format!("msg {i}")), t0() + Duration::seconds(i))
                .await
                .unwrap();
            assert!(recorded);
        }

        let entries = registry.entries("c1").await.unwrap();
        assert_eq!(entries.len(), 10);
        let contents: Vec<_> = entries.iter().map(|e| e.content.as_str()).collect();
        let expected: Vec<_> = (5..15).rev().map(|i| format!("msg {i}")).collect();
        assert_eq!(contents, expected);
    }

    #[tokio::test]
    async fn test_channels_are_independent() {
        let (registry, _) = registry();
        registry.record_deletion(&deleted("c1", "a"), t0()).await.unwrap();
        registry.record_deletion(&deleted("c2", "b"), t0()).await.unwrap();

        assert_eq!(registry.entries("c1").await.unwrap().len(), 1);
        assert_eq!(registry.entries("c2").await.unwrap()[0].content, "b");
    }

    #[tokio::test]
    async fn test_skips_bots_and_empty_content() {
        let (registry, store) = registry();
        let mut bot = deleted("c1", "beep");
        bot.author.bot = true;
        assert!(!registry.record_deletion(&bot, t0()).await.unwrap());
        assert!(!registry
            .record_deletion(&deleted("c1", ""), t0())
            .await
            .unwrap());
        assert!(store.load(DOCUMENT).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_records_whitespace_only_content() {
        let (registry, _) = registry();
        assert!(registry
            .record_deletion(&deleted("c1", "   "), t0())
            .await
            .unwrap());
        assert_eq!(registry.entries("c1").await.unwrap()[0].content, "   ");
    }

    #[tokio::test]
    async fn test_show_pages() {
        let (registry, _) = registry();
        registry.record_deletion(&deleted("c1", "first"), t0()).await.unwrap();
        registry
            .record_deletion(&deleted("c1", "second"), t0() + Duration::seconds(30))
            .await
            .unwrap();

        let now = t0() + Duration::seconds(95);
        let view = registry.show("c1", 1, now).await.unwrap();
        let SnipeView::Entry {
            entry,
            page,
            total,
            elapsed,
        } = view
        else {
            panic!("expected entry, got {view:?}");
        };
        assert_eq!(entry.content, "second");
        assert_eq!((page, total), (1, 2));
        assert_eq!(elapsed, Elapsed::from_secs(65));

        let view = registry.show("c1", 2, now).await.unwrap();
        assert!(matches!(view, SnipeView::Entry { ref entry, page: 2, .. } if entry.content == "first"));
    }

    #[rstest]
    #[case(0)]
    #[case(-1)]
    #[case(3)]
    #[case(i64::MAX)]
    #[tokio::test]
    async fn test_show_rejects_out_of_range(#[case] page: i64) {
        let (registry, _) = registry();
        registry.record_deletion(&deleted("c1", "a"), t0()).await.unwrap();
        registry.record_deletion(&deleted("c1", "b"), t0()).await.unwrap();

        assert_eq!(
            registry.show("c1", page, t0()).await.unwrap(),
            SnipeView::InvalidPage { total: 2 }
        );
    }

    #[tokio::test]
    async fn test_clear_then_show_is_empty() {
        let (registry, _) = registry();
        registry.record_deletion(&deleted("c1", "a"), t0()).await.unwrap();
        registry.record_deletion(&deleted("c1", "b"), t0()).await.unwrap();
        registry.record_deletion(&deleted("c2", "keep"), t0()).await.unwrap();

        assert_eq!(
            registry.clear("c1").await.unwrap(),
            ClearOutcome::Cleared { removed: 2 }
        );
        assert_eq!(registry.show("c1", 1, t0()).await.unwrap(), SnipeView::Empty);
        assert_eq!(
            registry.clear("c1").await.unwrap(),
            ClearOutcome::NothingToClear
        );
        assert_eq!(registry.entries("c2").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_document_shape() {
        let (registry, store) = registry();
        registry.record_deletion(&deleted("c1", "oops"), t0()).await.unwrap();

        let raw = store.load(DOCUMENT).await.unwrap().unwrap();
        assert_eq!(
            raw,
            serde_json::json!({"c1": [{
                "author": "alice",
                "author_id": "7",
                "avatar_url": "https://cdn/7.png",
                "content": "oops",
                "timestamp": "2025-06-01T12:00:00Z",
            }]})
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_deletions_are_all_recorded() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let registry = Arc::new(SnipeRegistry::new(store, 100));

        let tasks = (0..40).map(|i| {
            let registry = Arc::clone(&registry);
            tokio::spawn(async move {
                registry
                    .record_deletion(&deleted("c1", &format!("m{i}")), t0())
                    .await
            })
        });
        for joined in futures::future::join_all(tasks).await {
            assert!(joined.unwrap().unwrap());
        }

        assert_eq!(registry.entries("c1").await.unwrap().len(), 40);
    }

    #[test]
    fn test_capacity_is_at_least_one() {
        let registry = SnipeRegistry::new(Arc::new(InMemoryDocumentStore::new()), 0);
        assert_eq!(registry.capacity(), 1);
    }
}

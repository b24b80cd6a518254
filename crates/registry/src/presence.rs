//! Away status per user.
//!
//! A user marks themselves away with an optional status. Messages that reply
//! to or mention them get an "is AFK" notice; the next message they write
//! themselves gets a welcome back and clears the entry.

use std::{collections::BTreeMap, sync::Arc};

use {
    chrono::{DateTime, Utc},
    serde::{Deserialize, Serialize},
    tracing::debug,
    warden_channels::{InboundMessage, Notice},
    warden_common::time::Elapsed,
    warden_store::{Document, DocumentStore},
};

use crate::Result;

/// Document name in the store.
pub const DOCUMENT: &str = "afk";

/// Shown when a user went away without a status.
pub const DEFAULT_STATUS: &str = "AFK";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceEntry {
    /// `None` when no status text was given.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(with = "warden_common::time::timestamp")]
    pub timestamp: DateTime<Utc>,
}

impl PresenceEntry {
    pub fn status_text(&self) -> &str {
        self.status.as_deref().unwrap_or(DEFAULT_STATUS)
    }
}

/// User id → presence entry.
pub type PresenceDocument = BTreeMap<String, PresenceEntry>;

/// What an incoming message should trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresenceDecision {
    Nothing,
    /// The message replied to or mentioned an away user.
    Away {
        user_id: String,
        entry: PresenceEntry,
        elapsed: Elapsed,
    },
    /// The author was away and is now back; their entry has been removed.
    WelcomeBack {
        user_id: String,
        entry: PresenceEntry,
        elapsed: Elapsed,
    },
}

impl PresenceDecision {
    pub fn into_notice(self) -> Option<Notice> {
        match self {
            Self::Nothing => None,
            Self::Away {
                user_id,
                entry,
                elapsed,
            } => Some(Notice::Away {
                user_id,
                status: entry.status_text().to_string(),
                elapsed,
            }),
            Self::WelcomeBack {
                user_id, elapsed, ..
            } => Some(Notice::WelcomeBack { user_id, elapsed }),
        }
    }
}

pub struct PresenceRegistry {
    document: Document<PresenceDocument>,
}

impl PresenceRegistry {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            document: Document::new(store, DOCUMENT),
        }
    }

    /// Mark `user_id` away, replacing any previous entry. Blank status text
    /// counts as no status.
    pub async fn set_away(
        &self,
        user_id: &str,
        status: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<PresenceEntry> {
        let status = status
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        let entry = PresenceEntry {
            status,
            timestamp: now,
        };
        let stored = entry.clone();
        self.document
            .update(move |doc| doc.insert(user_id.to_string(), stored))
            .await?;
        debug!(user_id, status = entry.status_text(), "presence set");
        Ok(entry)
    }

    pub async fn get(&self, user_id: &str) -> Result<Option<PresenceEntry>> {
        Ok(self.document.read().await?.remove(user_id))
    }

    /// Remove and return the entry, if any. Concurrent callers for the same
    /// user see the entry at most once.
    pub async fn remove(&self, user_id: &str) -> Result<Option<PresenceEntry>> {
        Ok(self.document.update(|doc| doc.remove(user_id)).await?)
    }

    pub async fn all(&self) -> Result<PresenceDocument> {
        Ok(self.document.read().await?)
    }

    /// Decide what `message` triggers, in order: the replied-to author is
    /// away, the first away user among the mentions, the author is back.
    ///
    /// `replied_author` is the resolved author of the replied-to message; the
    /// caller passes `None` when there is no reply or it could not be resolved.
    /// Bot messages never trigger anything and cause no lookups.
    pub async fn on_incoming_message(
        &self,
        message: &InboundMessage,
        replied_author: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<PresenceDecision> {
        if message.author.bot {
            return Ok(PresenceDecision::Nothing);
        }

        let author_id = message.author.id.as_str();
        let decision = self
            .document
            .update(|doc| {
                let referenced = replied_author
                    .into_iter()
                    .chain(message.mentions.iter().map(String::as_str))
                    .find_map(|id| doc.get(id).map(|entry| (id, entry.clone())));
                if let Some((user_id, entry)) = referenced {
                    return PresenceDecision::Away {
                        user_id: user_id.to_string(),
                        elapsed: Elapsed::between(entry.timestamp, now),
                        entry,
                    };
                }

                match doc.remove(author_id) {
                    Some(entry) => PresenceDecision::WelcomeBack {
                        user_id: author_id.to_string(),
                        elapsed: Elapsed::between(entry.timestamp, now),
                        entry,
                    },
                    None => PresenceDecision::Nothing,
                }
            })
            .await?;

        if matches!(decision, PresenceDecision::WelcomeBack { .. }) {
            debug!(user_id = %author_id, "presence cleared on return");
        }
        Ok(decision)
    }
}

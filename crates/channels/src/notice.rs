//! User-facing results and their text rendering.

use std::collections::HashMap;

use warden_common::time::Elapsed;

use crate::platform::{Capability, Subject};

/// A named glyph position in notice text that deployments may customise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Approve,
    Warn,
}

impl Slot {
    pub fn key(self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Warn => "warn",
        }
    }

    fn fallback(self) -> &'static str {
        match self {
            Self::Approve => "✅",
            Self::Warn => "❌",
        }
    }
}

/// Custom emoji ids per slot, with plain fallbacks.
#[derive(Debug, Clone, Default)]
pub struct Glyphs {
    custom: HashMap<String, String>,
}

impl Glyphs {
    pub fn new(custom: HashMap<String, String>) -> Self {
        Self { custom }
    }

    pub fn glyph(&self, slot: Slot) -> String {
        match self.custom.get(slot.key()).filter(|id| !id.trim().is_empty()) {
            Some(id) => format!("<:custom:{id}>"),
            None => slot.fallback().to_string(),
        }
    }
}

/// Visual weight of a notice; platforms map it to a colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Warning,
    Muted,
    Archive,
}

/// Reaction placed on a command message instead of replying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reaction {
    Locked,
    Unlocked,
}

impl Reaction {
    pub fn emoji(self) -> &'static str {
        match self {
            Self::Locked => "🔒",
            Self::Unlocked => "🔓",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    AwaySet {
        user_id: String,
        status: String,
    },
    Away {
        user_id: String,
        status: String,
        elapsed: Elapsed,
    },
    WelcomeBack {
        user_id: String,
        elapsed: Elapsed,
    },
    DeletedMessage {
        author: String,
        avatar_url: Option<String>,
        content: String,
        elapsed: Elapsed,
        page: usize,
        total: usize,
    },
    NoDeletedMessages {
        actor_id: String,
    },
    InvalidPage {
        actor_id: String,
        total: usize,
    },
    SnipeFailed,
    SnipeCleared {
        actor_id: String,
        removed: usize,
    },
    NothingToClear {
        actor_id: String,
    },
    MissingPermission {
        actor_id: String,
        subject: Subject,
        capability: Capability,
    },
    CommandFailed {
        actor_id: String,
    },
}

/// Platform-neutral rendering of a [`Notice`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedNotice {
    pub description: String,
    /// Author line (name, icon url), used for archived messages.
    pub author: Option<(String, Option<String>)>,
    pub footer: Option<String>,
    pub tone: Tone,
}

impl RenderedNotice {
    fn text(description: String, tone: Tone) -> Self {
        Self {
            description,
            author: None,
            footer: None,
            tone,
        }
    }
}

impl Notice {
    pub fn render(&self, glyphs: &Glyphs) -> RenderedNotice {
        match self {
            Self::AwaySet { user_id, status } => RenderedNotice::text(
                format!(
                    "{} <@{user_id}>: You're now AFK with the status: **{status}**",
                    glyphs.glyph(Slot::Approve)
                ),
                Tone::Success,
            ),
            Self::Away {
                user_id,
                status,
                elapsed,
            } => RenderedNotice::text(
                format!("💤 <@{user_id}> is AFK: **{status}** - {}", elapsed.ago()),
                Tone::Muted,
            ),
            Self::WelcomeBack { user_id, elapsed } => RenderedNotice::text(
                format!(
                    "👋 <@{user_id}>: Welcome back, you were away for **{}**",
                    elapsed.away_for()
                ),
                Tone::Muted,
            ),
            Self::DeletedMessage {
                author,
                avatar_url,
                content,
                elapsed,
                page,
                total,
            } => RenderedNotice {
                description: content.clone(),
                author: Some((author.clone(), avatar_url.clone())),
                footer: Some(format!(
                    "Deleted {} ago • {page}/{total}",
                    elapsed.compact()
                )),
                tone: Tone::Archive,
            },
            Self::NoDeletedMessages { actor_id } => RenderedNotice::text(
                format!("🔍 <@{actor_id}>: No deleted messages found!"),
                Tone::Warning,
            ),
            Self::InvalidPage { actor_id, total } => RenderedNotice::text(
                format!("🔍 <@{actor_id}>: Invalid page number. Valid pages: 1-{total}"),
                Tone::Warning,
            ),
            Self::SnipeFailed => RenderedNotice::text(
                "🔍 An error occurred while retrieving the deleted message.".into(),
                Tone::Warning,
            ),
            Self::SnipeCleared { actor_id, removed } => RenderedNotice::text(
                format!(
                    "{} <@{actor_id}>: Cleared **{removed}** deleted message(s)",
                    glyphs.glyph(Slot::Approve)
                ),
                Tone::Success,
            ),
            Self::NothingToClear { actor_id } => RenderedNotice::text(
                format!("🔍 <@{actor_id}>: No deleted messages to clear!"),
                Tone::Warning,
            ),
            Self::MissingPermission {
                actor_id,
                subject,
                capability,
            } => {
                let who = match subject {
                    Subject::Member(_) => "You're",
                    Subject::Bot => "I'm",
                };
                RenderedNotice::text(
                    format!(
                        "{} <@{actor_id}>: {who} **missing** permission: `{capability}`",
                        glyphs.glyph(Slot::Warn)
                    ),
                    Tone::Warning,
                )
            },
            Self::CommandFailed { actor_id } => RenderedNotice::text(
                format!("{} <@{actor_id}>: An error occurred", glyphs.glyph(Slot::Warn)),
                Tone::Warning,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use {super::*, rstest::rstest};

    fn custom() -> Glyphs {
        Glyphs::new(HashMap::from([
            ("approve".to_string(), "111".to_string()),
            ("warn".to_string(), " ".to_string()),
        ]))
    }

    #[test]
    fn glyph_fallbacks() {
        let glyphs = Glyphs::default();
        assert_eq!(glyphs.glyph(Slot::Approve), "✅");
        assert_eq!(glyphs.glyph(Slot::Warn), "❌");
    }

    #[test]
    fn glyph_custom_and_blank() {
        let glyphs = custom();
        assert_eq!(glyphs.glyph(Slot::Approve), "<:custom:111>");
        assert_eq!(glyphs.glyph(Slot::Warn), "❌");
    }

    #[rstest]
    #[case(45, "💤 <@7> is AFK: **brb** - 45 seconds ago")]
    #[case(125, "💤 <@7> is AFK: **brb** - 2 minutes and 5 seconds ago")]
    fn away_text(#[case] secs: u64, #[case] expected: &str) {
        let notice = Notice::Away {
            user_id: "7".into(),
            status: "brb".into(),
            elapsed: Elapsed::from_secs(secs),
        };
        let rendered = notice.render(&Glyphs::default());
        assert_eq!(rendered.description, expected);
        assert_eq!(rendered.tone, Tone::Muted);
    }

    #[test]
    fn away_set_uses_approve_slot() {
        let notice = Notice::AwaySet {
            user_id: "7".into(),
            status: "AFK".into(),
        };
        assert_eq!(
            notice.render(&custom()).description,
            "<:custom:111> <@7>: You're now AFK with the status: **AFK**"
        );
    }

    #[test]
    fn welcome_back_text() {
        let notice = Notice::WelcomeBack {
            user_id: "7".into(),
            elapsed: Elapsed::from_secs(30),
        };
        assert_eq!(
            notice.render(&Glyphs::default()).description,
            "👋 <@7>: Welcome back, you were away for **0 minutes and 30 seconds**"
        );
    }

    #[test]
    fn deleted_message_layout() {
        let notice = Notice::DeletedMessage {
            author: "alice".into(),
            avatar_url: Some("https://cdn/a.png".into()),
            content: "oops".into(),
            elapsed: Elapsed::from_secs(61),
            page: 2,
            total: 3,
        };
        let rendered = notice.render(&Glyphs::default());
        assert_eq!(rendered.description, "oops");
        assert_eq!(
            rendered.author,
            Some(("alice".to_string(), Some("https://cdn/a.png".to_string())))
        );
        assert_eq!(rendered.footer.as_deref(), Some("Deleted 1m 1s ago • 2/3"));
        assert_eq!(rendered.tone, Tone::Archive);
    }

    #[rstest]
    #[case(Subject::Member("7".into()), "❌ <@7>: You're **missing** permission: `manage_channels`")]
    #[case(Subject::Bot, "❌ <@7>: I'm **missing** permission: `manage_channels`")]
    fn missing_permission_text(#[case] subject: Subject, #[case] expected: &str) {
        let notice = Notice::MissingPermission {
            actor_id: "7".into(),
            subject,
            capability: Capability::ManageChannels,
        };
        assert_eq!(notice.render(&Glyphs::default()).description, expected);
    }

    #[test]
    fn invalid_page_text() {
        let notice = Notice::InvalidPage {
            actor_id: "7".into(),
            total: 4,
        };
        assert_eq!(
            notice.render(&Glyphs::default()).description,
            "🔍 <@7>: Invalid page number. Valid pages: 1-4"
        );
    }

    #[test]
    fn command_failure_text_is_fixed() {
        let notice = Notice::CommandFailed {
            actor_id: "7".into(),
        };
        let rendered = notice.render(&Glyphs::default());
        assert_eq!(rendered.description, "❌ <@7>: An error occurred");
        assert_eq!(rendered.tone, Tone::Warning);
    }

    #[test]
    fn reactions() {
        assert_eq!(Reaction::Locked.emoji(), "🔒");
        assert_eq!(Reaction::Unlocked.emoji(), "🔓");
    }
}

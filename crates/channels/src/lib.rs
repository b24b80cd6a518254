//! Chat platform abstraction.
//!
//! The registries never talk to Discord directly: inbound events arrive as
//! the plain types in [`platform`], capability checks and permission changes
//! go through the [`ChatPlatform`] trait, and user-facing results leave as
//! [`Notice`] values that a platform crate renders.

pub mod error;
pub mod guard;
pub mod notice;
pub mod platform;

pub use {
    error::{Error, Result},
    guard::{Guard, GuardError},
    notice::{Glyphs, Notice, Reaction, RenderedNotice, Slot, Tone},
    platform::{
        Author, Capability, ChannelRef, ChatPlatform, DeletedMessage, InboundMessage,
        ReplyReference, Subject,
    },
};

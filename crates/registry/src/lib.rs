//! The three persisted registries and the event router that drives them.
//!
//! - [`presence`]: away status, mention notices, one-shot welcome back
//! - [`snipe`]: newest-first ring buffer of deleted messages per channel
//! - [`lock`]: channels whose `send_messages` permission was revoked
//!
//! Each registry owns exactly one [`warden_store::Document`], so every
//! read-modify-write cycle on it is serialized.

pub mod commands;
pub mod error;
pub mod lock;
pub mod presence;
pub mod router;
pub mod snipe;

pub use {
    commands::Command,
    error::{Error, Result},
    lock::LockRegistry,
    presence::PresenceRegistry,
    router::{EventRouter, Reply},
    snipe::SnipeRegistry,
};

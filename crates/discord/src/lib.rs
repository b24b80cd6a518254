//! Discord front end for warden.
//!
//! Connects to the gateway with serenity, converts gateway events into the
//! platform-neutral types of `warden-channels`, feeds them to the
//! [`warden_registry::EventRouter`], and renders its replies as embeds and
//! reactions.

pub mod bot;
pub mod error;
pub mod handler;
pub mod outbound;
pub mod platform;
pub mod recent;

pub use {
    bot::run,
    error::{Error, Result},
    handler::WardenHandler,
    platform::SerenityPlatform,
};

//! Protocol driver for LEGO Powered Up, Boost and Control+ hubs
//!
//! The BLE connection itself lives behind [`HubLink`]. A [`Hub`] writes
//! commands through it, turns notification chunks into [`HubEvent`]s and
//! tracks which motor commands are still running.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod commands;
pub mod config;
pub mod devices;
pub mod dispatcher;
pub mod hub;
pub mod link;
pub mod protocol;

pub use commands::{Button, ButtonState, Color};
pub use devices::DeviceType;
pub use hub::{
    Advertisement, Completion, CompletionError, Hub, HubConfig, HubError, HubEvent, HubKind,
    HubVariant,
};
pub use link::{HubLink, LinkError};
pub use protocol::{HubProperty, Version};

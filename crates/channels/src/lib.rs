//! Messaging platform connectors.
//!
//! Each connector implements [`MessagingPlatform`] and pumps inbound
//! messages into a shared [`courier_chat::Dispatcher`]. Connectors run
//! concurrently; one platform failing to start never takes the others
//! down.

pub mod console;
pub mod platform;

pub use {
    console::ConsolePlatform,
    platform::{MessagingPlatform, run_platforms},
};

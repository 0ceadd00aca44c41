//! Digest rendering and delivery.
//!
//! This crate provides:
//! - `DigestRenderer` for turning comparison results into user-facing text
//! - tag-aware chunking that keeps every emitted chunk well-formed
//! - `ChatTransport` trait for pluggable chat delivery
//! - Telegram transport implementation

pub mod chunk;
pub mod render;
pub mod telegram;
pub mod traits;

pub use chunk::chunk;
pub use render::{DigestRenderer, RenderError};
pub use telegram::TelegramTransport;
pub use traits::{ChatTransport, TransportError};

//! Text helpers consumed by the engine: permission checks, emote segments,
//! date and duration formatting, markup stripping and cheermote rendering.

pub mod cheermotes;
pub mod emotes;
pub mod format;
pub mod markup;
pub mod permissions;

pub use cheermotes::{CheermoteRenderer, PlainCheermotes};

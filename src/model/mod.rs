//! Data models for the ecosort session.

mod category;
mod chat;
mod frame;

pub use category::{CategoryInfo, CategoryKey, ParseCategoryError, lookup};
pub use chat::{ChatMessage, Sender, Transcript};
pub use frame::{EncodedImage, FrameEncoder};

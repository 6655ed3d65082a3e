//! Dispute letter drafting: a deterministic template drafter for offline use
//! and an LLM drafter for generative letters.

mod generator;
pub mod prompt;
mod template;

#[cfg(feature = "http")]
pub mod claude;

pub use generator::{GenerationError, LetterGenerator};
pub use template::{TemplateDrafter, draft_letter};

#[cfg(feature = "http")]
pub use claude::ClaudeDrafter;

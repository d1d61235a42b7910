//! Extractors for the supported export schemas.
//!
//! Each extractor implements [`Extractor`](crate::parser::Extractor) and is
//! normally obtained through [`create_extractor`](crate::parser::create_extractor).
//!
//! # Available Extractors
//!
//! - [`ChatGptExtractor`] - ChatGPT `conversations.json` (`mapping` tree)
//! - [`ClaudeExtractor`] - Claude `conversations.json` (`chat_messages` list)
//! - [`GenericExtractor`] - best-effort walk for anything else
//!
//! With the `fragments` feature, [`recover_fragments`] scans split archive
//! pieces that are not valid JSON.

mod chatgpt;
mod claude;
#[cfg(feature = "fragments")]
mod fragments;
mod generic;

pub use chatgpt::ChatGptExtractor;
pub use claude::ClaudeExtractor;
#[cfg(feature = "fragments")]
pub use fragments::recover_fragments;
pub use generic::GenericExtractor;

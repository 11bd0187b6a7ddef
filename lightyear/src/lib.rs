//! Lightyear: a document-aware chat assistant backend.
//!
//! Uploaded files are reduced to plain text, folded into a conversation and
//! forwarded with a fixed persona to a hosted Gemini model.

pub mod api;
pub mod config;
pub mod conversation;
pub mod error;
pub mod llm;
pub mod models;
pub mod processing;

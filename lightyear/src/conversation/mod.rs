//! Conversation assembly and per-session state.
//!
//! [`Conversation`] is the pure, append-only turn list; [`ChatSession`] wraps
//! one behind an async mutex so that only one send runs at a time, and
//! [`SessionStore`] keeps sessions in memory for the lifetime of the process.

mod assembler;
mod session;

pub use assembler::{upstream_contents, upstream_role, Conversation, FALLBACK_REPLY};
pub use session::{ChatSession, SendOutcome, SessionId, SessionStore};

pub mod chat;
pub mod common;
pub mod sessions;
pub mod upload;

pub use chat::*;
pub use common::*;
pub use sessions::*;
pub use upload::*;

pub mod chat;
pub mod health;
pub mod sessions;
pub mod upload;

pub use health::health_check;

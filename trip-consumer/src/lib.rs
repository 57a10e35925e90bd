pub mod config;
pub mod consumer;
pub mod content;
pub mod dispatch;
pub mod error;
pub mod kafka;
pub mod sink;

pub mod chat_handler;
pub mod cors;
pub mod error;
pub mod health_handler;

mod chat_test;
mod common;
mod health_test;

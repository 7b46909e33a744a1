// src/ai/mod.rs
pub mod connector;
pub mod dish;
pub mod upload_client;

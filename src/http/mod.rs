// src/http/mod.rs
//! HTTP transport layer.

pub mod client;

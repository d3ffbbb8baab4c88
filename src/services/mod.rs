// src/services/mod.rs
//! Protocol operations: discovery, redirect construction, verification.

pub mod discovery;
pub mod redirect;
pub mod verifier;

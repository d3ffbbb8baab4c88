// src/models/mod.rs
//! Data structures for the wire formats the protocol consumes.

pub mod xrds;

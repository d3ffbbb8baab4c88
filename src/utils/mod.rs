// src/utils/mod.rs
//! Helper functions shared across the protocol pipeline.

pub mod kv_form;
pub mod normalize;

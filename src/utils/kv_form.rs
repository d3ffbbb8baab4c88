// src/utils/kv_form.rs
//! Key-Value Form parsing for OpenID direct responses.
//!
//! Direct verification responses are plain text, one `key:value` pair per line
//! (OpenID Authentication 2.0, section 4.1.1) - not XML, not JSON.

use std::collections::HashMap;

/// Parses a Key-Value Form body into a map.
///
/// Each line is split on the first `:` only, so values may themselves contain
/// colons (URLs commonly do). Lines without a colon are ignored. Later
/// duplicate keys overwrite earlier ones.
///
/// # Arguments
/// * `corpus` - The raw response body text
pub fn key_value_form(corpus: &str) -> HashMap<String, String> {
    let mut fields = HashMap::new();
    for line in corpus.split('\n') {
        if let Some((key, value)) = line.split_once(':') {
            fields.insert(key.to_string(), value.to_string());
        }
    }
    fields
}

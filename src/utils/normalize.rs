// src/utils/normalize.rs
//! Identifier normalization for OpenID 2.0 discovery.
//!
//! Turns the raw identifier a user types into a canonical, dereferenceable
//! URL, following section 7.2 of the OpenID Authentication 2.0 specification:
//! XRI canonicalization, default scheme, fragment stripping.

use crate::error::OpenIdError;

/// XRI global context symbols from section 2.2.1 of XRI Syntax 2.0; an
/// identifier starting with one of these is treated as an XRI.
const XRI_GLOBAL_CONTEXT_SYMBOLS: &str = "=@+$!(";

/// Public XRI resolution proxy used to dereference XRIs over HTTP.
const XRI_PROXY_BASE: &str = "http://xri.net/";

/// Normalizes a user-supplied identifier into a dereferenceable URL.
///
/// Steps, applied in order:
/// 1. A leading `xri://` scheme is stripped, so XRIs are used in canonical form.
/// 2. If the first remaining character is an XRI global context symbol, the
///    identifier is treated as an XRI and routed through the `xri.net` proxy.
/// 3. Otherwise, `http://` is prepended unless the identifier already has an
///    `http://` or `https://` scheme.
/// 4. A fragment part is stripped together with the `#` delimiter.
///
/// # Arguments
/// * `identifier` - The claimed identifier as entered by the end user
///
/// # Errors
/// Returns [`OpenIdError::EmptyIdentifier`] if the identifier is empty, or
/// empty once the `xri://` prefix has been stripped.
pub fn normalize_identifier(identifier: &str) -> Result<String, OpenIdError> {
    let identifier = identifier.strip_prefix("xri://").unwrap_or(identifier);

    let first = identifier
        .chars()
        .next()
        .ok_or(OpenIdError::EmptyIdentifier)?;

    let mut normalized = if XRI_GLOBAL_CONTEXT_SYMBOLS.contains(first) {
        format!("{XRI_PROXY_BASE}{identifier}")
    } else if !identifier.starts_with("http://") && !identifier.starts_with("https://") {
        format!("http://{identifier}")
    } else {
        identifier.to_string()
    };

    if let Some(index) = normalized.find('#') {
        normalized.truncate(index);
    }

    Ok(normalized)
}

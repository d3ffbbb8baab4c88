// src/error.rs
//! Error types for the OpenID relying-party client.
//!
//! One variant per failure kind the protocol pipeline can produce, split along
//! the taxonomy the crate exposes to callers:
//! - input errors (`EmptyIdentifier`)
//! - transport errors (`Transport`, tagged with the URI of the failing hop)
//! - protocol errors (`DiscoveryFailed`, `DiscoveryLoopExceeded`,
//!   `NoEndpointDiscovered`, `NoOpEndpoint`, `IncorrectMode`,
//!   `NamespaceMismatch`)
//! - parsing errors (`HtmlParse`; malformed XRDS XML is tolerated instead and
//!   never surfaces here)

use thiserror::Error;

/// Errors returned by the discovery, redirect and verification entry points.
///
/// Callers of [`crate::verify`] must check the error value before trusting a
/// negative `granted` flag: a protocol failure and a definitive rejection both
/// leave `granted` false, and only the error distinguishes them.
#[derive(Debug, Error)]
pub enum OpenIdError {
    /// The supplied identifier was empty (or empty after `xri://` stripping).
    #[error("openid: identifier is empty")]
    EmptyIdentifier,

    /// A discovery response was neither an XRDS document nor a redirection to
    /// one. The declared content type and raw body are kept for diagnostics.
    #[error("openid: could not locate Yadis document (content type {content_type:?})")]
    DiscoveryFailed {
        /// Declared `Content-Type` of the terminal response.
        content_type: String,
        /// Raw response body, useful when logging the failure.
        body: String,
    },

    /// The Yadis redirect chain exceeded the configured hop budget.
    #[error("openid: discovery redirect chain exceeded {0} hops")]
    DiscoveryLoopExceeded(usize),

    /// Discovery completed but the XRDS document named no operator endpoint.
    #[error("openid: no operator endpoint discovered for the identifier")]
    NoEndpointDiscovered,

    /// The assertion carried no `openid.op_endpoint` parameter.
    #[error("openid: no op endpoint provided")]
    NoOpEndpoint,

    /// The assertion's `openid.mode` was not `id_res`.
    #[error("openid: incorrect mode")]
    IncorrectMode,

    /// The verification response's `ns` field was not the OpenID 2.0 namespace.
    #[error("openid: ns in verification response was not 'http://specs.openid.net/auth/2.0'")]
    NamespaceMismatch,

    /// A GET or POST failed at the HTTP layer.
    #[error("openid: transport failure contacting {uri}")]
    Transport {
        /// URI of the hop that failed.
        uri: String,
        #[source]
        source: reqwest::Error,
    },

    /// The HTML page could not be scanned for the Yadis meta tag.
    #[error("openid: malformed HTML while searching for Yadis meta tag")]
    HtmlParse(#[from] quick_xml::Error),
}

impl OpenIdError {
    /// Wraps a reqwest error together with the URI of the hop that produced it.
    pub(crate) fn transport(uri: &str, source: reqwest::Error) -> Self {
        OpenIdError::Transport {
            uri: uri.to_string(),
            source,
        }
    }
}

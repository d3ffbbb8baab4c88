// src/lib.rs
//! # OpenID 2.0 Relying-Party Client
//!
//! Client side of the OpenID 2.0 authentication handshake:
//! 1. **Discovery**: resolve a user-supplied identifier into an operator
//!    endpoint and claimed identity (Yadis content negotiation + XRDS).
//! 2. **Redirect**: build the `checkid_setup` URL handing the user off to the
//!    operator.
//! 3. **Verification**: confirm an inbound assertion via the operator's
//!    `check_authentication` direct verification endpoint.
//!
//! XRI-based identifiers work through the public `xri.net` proxy, but are not
//! independently verified and are only supported as the input identifier.
//!
//! ## Example: building the redirect
//! ```no_run
//! let url = openid_rp::redirect_uri("http://steamcommunity.com/openid", "http://localhost", "/")?;
//! # Ok::<(), openid_rp::OpenIdError>(())
//! ```
//!
//! ## Example: verifying the returned assertion
//! ```no_run
//! # let query_pairs: Vec<(String, String)> = vec![];
//! match openid_rp::verify(&query_pairs) {
//!     Ok(result) if result.granted => println!("id: {}", result.claimed_id),
//!     Ok(_) => println!("assertion rejected by the operator"),
//!     Err(e) => eprintln!("verification failed: {e}"),
//! }
//! ```
//!
//! All operations are blocking; each call is independent and reentrant, so
//! concurrent callers with distinct inputs are safe. Nothing is cached
//! between calls.

use std::sync::Arc;

use once_cell::sync::Lazy;

// Module declarations (organized by functional domain)
mod error; // Typed error taxonomy
mod http; // Blocking transport layer
mod models; // Wire-format data structures
mod services; // Discovery, redirect, verification
mod utils; // Normalization and response parsing

pub use crate::error::OpenIdError;
pub use crate::http::client::{FetchedDocument, HttpTransport, Transport};
pub use crate::models::xrds::{extract_endpoints, ResolvedEndpoint, ServiceDescriptor};
pub use crate::services::discovery::{Discovery, DEFAULT_MAX_HOPS, XRDS_MIME};
pub use crate::services::redirect::{build_redirect, IDENTIFIER_SELECT, OPENID_NS};
pub use crate::services::verifier::{VerificationResult, Verifier};
pub use crate::utils::normalize::normalize_identifier;

/// Shared default transport for the convenience entry points: one pooled
/// blocking client, initialized on first use and reused across calls.
static DEFAULT_TRANSPORT: Lazy<Arc<HttpTransport>> = Lazy::new(|| Arc::new(HttpTransport::new()));

/// Computes the URL the user should be redirected to for an OpenID request.
///
/// # Arguments
/// * `identifier` - The URI the user claims their OpenID is located at
/// * `realm` - Where the identity will be used, e.g. `http://example.com`
/// * `return_path` - The operator returns the user to `realm + return_path`
///
/// Runs the full pipeline: identifier normalization, Yadis/XRDS discovery,
/// endpoint extraction, redirect construction.
///
/// # Errors
/// - [`OpenIdError::EmptyIdentifier`] for a malformed identifier
/// - [`OpenIdError::Transport`] if any discovery hop fails on the wire
/// - [`OpenIdError::DiscoveryFailed`] / [`OpenIdError::DiscoveryLoopExceeded`]
///   when no discovery document can be located
/// - [`OpenIdError::NoEndpointDiscovered`] when the XRDS document names no
///   operator endpoint
pub fn redirect_uri(identifier: &str, realm: &str, return_path: &str) -> Result<String, OpenIdError> {
    let transport: Arc<dyn Transport> = DEFAULT_TRANSPORT.clone();
    redirect_uri_with(transport, identifier, realm, return_path)
}

/// [`redirect_uri`] with an injected transport, for callers that need custom
/// HTTP behavior or deterministic tests.
pub fn redirect_uri_with(
    transport: Arc<dyn Transport>,
    identifier: &str,
    realm: &str,
    return_path: &str,
) -> Result<String, OpenIdError> {
    let normalized = normalize_identifier(identifier)?;
    let document = Discovery::new(transport).discover(&normalized)?;
    let resolved = extract_endpoints(&document);

    if resolved.op_endpoint.is_empty() {
        return Err(OpenIdError::NoEndpointDiscovered);
    }

    Ok(build_redirect(
        &resolved.op_endpoint,
        &resolved.claimed_id,
        realm,
        return_path,
    ))
}

/// Verifies an inbound OpenID assertion by direct verification.
///
/// # Arguments
/// * `params` - The query parameters received on the return endpoint, as
///   key/value pairs in query order
///
/// Returns the grant decision and the claimed identity. Callers must check
/// the error before treating a missing grant as a definitive rejection: on
/// error the assertion was neither confirmed nor rejected.
pub fn verify(params: &[(String, String)]) -> Result<VerificationResult, OpenIdError> {
    let transport: Arc<dyn Transport> = DEFAULT_TRANSPORT.clone();
    Verifier::new(transport).verify(params)
}

#[cfg(test)]
mod tests {
    use super::*;

    const XRDS_BODY: &str = r#"<xrds:XRDS xmlns:xrds="xri://$xrds" xmlns="xri://$xrd*($v*2.0)">
  <XRD>
    <Service priority="0">
      <Type>http://specs.openid.net/auth/2.0/server</Type>
      <URI>https://op.example/auth</URI>
    </Service>
    <Service priority="0">
      <Type>http://specs.openid.net/auth/2.0/signon</Type>
      <URI>https://user.example/id</URI>
    </Service>
  </XRD>
</xrds:XRDS>"#;

    #[test]
    fn test_end_to_end_redirect_over_real_http() {
        let _m = mockito::mock("GET", "/openid")
            .match_header("Accept", "application/xrds+xml")
            .with_status(200)
            .with_header("Content-Type", "application/xrds+xml")
            .with_body(XRDS_BODY)
            .create();

        let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new());
        let identifier = format!("{}/openid", mockito::server_url());
        let url = redirect_uri_with(transport, &identifier, "https://rp.example", "/cb").unwrap();

        assert!(url.starts_with("https://op.example/auth?"));
        assert!(url.contains("openid.claimed_id=https%3A%2F%2Fuser.example%2Fid"));
        assert!(url.contains("openid.mode=checkid_setup"));
        assert!(url.contains("openid.return_to=https%3A%2F%2Frp.example%2Fcb"));
    }

    #[test]
    fn test_yadis_header_chain_over_real_http() {
        let _redirecting = mockito::mock("GET", "/yadis-start")
            .with_status(200)
            .with_header("Content-Type", "text/plain")
            .with_header(
                "X-Xrds-Location",
                &format!("{}/yadis-xrds", mockito::server_url()),
            )
            .with_body("")
            .create();
        let _terminal = mockito::mock("GET", "/yadis-xrds")
            .with_status(200)
            .with_header("Content-Type", "application/xrds+xml")
            .with_body(XRDS_BODY)
            .create();

        let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new());
        let identifier = format!("{}/yadis-start", mockito::server_url());
        let url = redirect_uri_with(transport, &identifier, "https://rp.example", "/cb").unwrap();

        assert!(url.starts_with("https://op.example/auth?"));
    }

    #[test]
    fn test_missing_operator_endpoint_is_an_explicit_error() {
        let _m = mockito::mock("GET", "/no-op")
            .with_status(200)
            .with_header("Content-Type", "application/xrds+xml")
            .with_body(
                r#"<XRDS><XRD><Service>
                     <Type>http://specs.openid.net/auth/2.0/signon</Type>
                     <URI>https://user.example/id</URI>
                   </Service></XRD></XRDS>"#,
            )
            .create();

        let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new());
        let identifier = format!("{}/no-op", mockito::server_url());
        let err = redirect_uri_with(transport, &identifier, "https://rp.example", "/cb").unwrap_err();

        assert!(matches!(err, OpenIdError::NoEndpointDiscovered));
    }

    #[test]
    fn test_malformed_identifier_fails_before_discovery() {
        let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new());
        let err = redirect_uri_with(transport, "", "https://rp.example", "/cb").unwrap_err();
        assert!(matches!(err, OpenIdError::EmptyIdentifier));
    }
}

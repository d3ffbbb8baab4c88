// src/models/xrds.rs
//! XRDS discovery document model and service-endpoint extraction.
//!
//! An XRDS (Extensible Resource Descriptor Sequence) document lists the
//! services an identifier supports. For OpenID 2.0 exactly two service types
//! matter here: the operator endpoint (`…/auth/2.0/server`) and the sign-on
//! service carrying the claimed identity (`…/auth/2.0/signon`).

use serde::Deserialize;

/// Service type prefix naming an OpenID operator (OP) endpoint.
pub const OP_ENDPOINT_TYPE: &str = "http://specs.openid.net/auth/2.0/server";

/// Service type prefix naming an OpenID sign-on service.
pub const SIGNON_TYPE: &str = "http://specs.openid.net/auth/2.0/signon";

/// One `<Service>` entry of an XRDS document.
///
/// All fields default when absent so that partial entries do not make the
/// whole document unparseable.
#[derive(Debug, Deserialize, Default)]
pub struct ServiceDescriptor {
    /// The service type URIs. Real provider documents routinely list several
    /// per service (the role type plus protocol extensions such as AX).
    #[serde(rename = "Type", default)]
    pub service_types: Vec<String>,

    /// The service URI.
    #[serde(rename = "URI", default)]
    pub uri: String,

    /// XRDS selection priority. Parsed for completeness but never consulted:
    /// endpoint selection keeps the last matching entry in document order.
    #[serde(rename = "@priority", default)]
    pub priority: Option<u32>,
}

/// One `<XRD>` element wrapping a sequence of services.
#[derive(Debug, Deserialize, Default)]
struct Xrd {
    #[serde(rename = "Service", default)]
    service: Vec<ServiceDescriptor>,
}

/// Root `<XRDS>` element.
#[derive(Debug, Deserialize, Default)]
struct XrdsDocument {
    #[serde(rename = "XRD", default)]
    xrd: Vec<Xrd>,
}

/// The outcome of discovery: operator endpoint and claimed identity URIs.
///
/// Either field may be empty - the extractor is best-effort and absence of an
/// endpoint is judged by the caller, not here.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ResolvedEndpoint {
    /// URI of the operator's authentication endpoint.
    pub op_endpoint: String,
    /// URI of the claimed identity, empty when the document names none.
    pub claimed_id: String,
}

/// Extracts the operator endpoint and claimed identity from an XRDS document.
///
/// Services are evaluated in document order and the last entry of each role
/// wins, overwriting any earlier match; `priority` attributes are ignored for
/// selection. A service fills a role when any of its type URIs has the role's
/// prefix, so versioned subtypes and extension types listed alongside the
/// role still match.
///
/// Never fails: a document that does not unmarshal yields two empty strings,
/// matching the tolerant, best-effort nature of discovery documents.
pub fn extract_endpoints(document: &str) -> ResolvedEndpoint {
    let parsed: XrdsDocument = match quick_xml::de::from_str(document) {
        Ok(parsed) => parsed,
        Err(e) => {
            log::debug!("XRDS document did not unmarshal, extracting nothing: {e}");
            return ResolvedEndpoint::default();
        }
    };

    let mut resolved = ResolvedEndpoint::default();
    for service in parsed.xrd.iter().flat_map(|xrd| xrd.service.iter()) {
        if has_type_prefix(service, OP_ENDPOINT_TYPE) {
            resolved.op_endpoint = service.uri.clone();
        } else if has_type_prefix(service, SIGNON_TYPE) {
            resolved.claimed_id = service.uri.clone();
        }
    }
    resolved
}

/// True when any of the service's type URIs starts with `prefix`.
fn has_type_prefix(service: &ServiceDescriptor, prefix: &str) -> bool {
    service
        .service_types
        .iter()
        .any(|service_type| service_type.starts_with(prefix))
}

// src/services/discovery.rs
//! Yadis discovery engine.
//!
//! Resolves a normalized identifier URL to an XRDS document by following the
//! Yadis content-negotiation chain: ask for XRDS directly, fall back to the
//! `X-Xrds-Location` response header, fall back to an HTML
//! `<meta http-equiv="X-XRDS-Location">` tag. Each fallback redirects to a new
//! URL and the chain restarts there, up to a fixed hop budget.

use std::sync::Arc;

use crate::error::OpenIdError;
use crate::http::client::Transport;

/// MIME type of an XRDS document, also sent as the discovery `Accept` header.
pub const XRDS_MIME: &str = "application/xrds+xml";

/// Default bound on the Yadis redirect chain. The protocol's common case is at
/// most header -> HTML -> XRDS, so this leaves generous headroom while still
/// failing closed on redirect loops.
pub const DEFAULT_MAX_HOPS: usize = 8;

/// Discovery engine resolving identifiers to XRDS documents.
pub struct Discovery {
    /// Transport used for each discovery GET
    transport: Arc<dyn Transport>,
    /// Maximum number of fetches before the chain is abandoned
    max_hops: usize,
}

impl Discovery {
    /// Creates a discovery engine with the default hop budget.
    ///
    /// # Arguments
    /// * `transport` - Shared transport used for every hop of the chain
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Discovery {
            transport,
            max_hops: DEFAULT_MAX_HOPS,
        }
    }

    /// Creates a discovery engine with an explicit hop budget.
    pub fn with_max_hops(transport: Arc<dyn Transport>, max_hops: usize) -> Self {
        Discovery {
            transport,
            max_hops,
        }
    }

    /// Resolves `uri` to the text of its XRDS document.
    ///
    /// Each hop issues a GET with `Accept: application/xrds+xml` and
    /// classifies the response:
    /// - an `application/xrds+xml` content type terminates the chain;
    /// - a non-empty `X-Xrds-Location` header redirects the chain;
    /// - a `text/html` body is scanned for the Yadis meta tag, whose `content`
    ///   attribute redirects the chain;
    /// - anything else fails with [`OpenIdError::DiscoveryFailed`], carrying
    ///   the raw body for diagnostics.
    ///
    /// # Errors
    /// - [`OpenIdError::Transport`] if any hop's GET fails
    /// - [`OpenIdError::HtmlParse`] if an HTML body cannot be scanned
    /// - [`OpenIdError::DiscoveryFailed`] if a response is neither an XRDS
    ///   document nor a redirection to one
    /// - [`OpenIdError::DiscoveryLoopExceeded`] once the hop budget runs out
    pub fn discover(&self, uri: &str) -> Result<String, OpenIdError> {
        let mut target = uri.to_string();

        for hop in 0..self.max_hops {
            log::debug!("discovery hop {hop}: fetching {target}");
            let document = self.transport.get(&target, XRDS_MIME)?;

            if document.content_type.starts_with(XRDS_MIME) {
                return Ok(document.body);
            }

            if let Some(location) = document.xrds_location {
                log::debug!("discovery redirected by X-Xrds-Location to {location}");
                target = location;
                continue;
            }

            if document.content_type.starts_with("text/html") {
                if let Some(location) = find_meta_location(&document.body)? {
                    log::debug!("discovery redirected by HTML meta tag to {location}");
                    target = location;
                    continue;
                }
            }

            return Err(OpenIdError::DiscoveryFailed {
                content_type: document.content_type,
                body: document.body,
            });
        }

        log::warn!("discovery for {uri} abandoned after {} hops", self.max_hops);
        Err(OpenIdError::DiscoveryLoopExceeded(self.max_hops))
    }
}

/// Scans an HTML page for `<meta http-equiv="X-XRDS-Location" content="...">`
/// and returns the content attribute of the first match.
///
/// The scan is lenient about the tag-soup nature of real HTML (mismatched end
/// tags are ignored, void elements need no closing slash) but a body the
/// reader cannot tokenize at all is a hard error.
fn find_meta_location(html: &str) -> Result<Option<String>, OpenIdError> {
    use quick_xml::events::Event;
    use quick_xml::Reader;

    let mut reader = Reader::from_str(html);
    reader.config_mut().check_end_names = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e) | Event::Empty(e)) => {
                if !e.local_name().as_ref().eq_ignore_ascii_case(b"meta") {
                    continue;
                }

                let mut http_equiv = None;
                let mut content = None;
                for attr in e.attributes().flatten() {
                    let key = std::str::from_utf8(attr.key.as_ref()).unwrap_or("");
                    let value = attr.unescape_value().unwrap_or_default();
                    if key.eq_ignore_ascii_case("http-equiv") {
                        http_equiv = Some(value.to_string());
                    } else if key.eq_ignore_ascii_case("content") {
                        content = Some(value.to_string());
                    }
                }

                let is_yadis = http_equiv
                    .as_deref()
                    .map(|v| v.eq_ignore_ascii_case("X-XRDS-Location"))
                    .unwrap_or(false);
                if is_yadis {
                    if let Some(location) = content {
                        return Ok(Some(location));
                    }
                }
            }
            Ok(Event::Eof) => return Ok(None),
            Err(e) => return Err(OpenIdError::HtmlParse(e)),
            _ => {}
        }
    }
}

// src/services/verifier.rs
//! Direct verification of OpenID assertions.
//!
//! When the operator redirects the user back with an assertion, the relying
//! party must not trust the browser-relayed parameters alone. This module
//! re-posts the assertion to the operator's endpoint in
//! `check_authentication` mode (OpenID Authentication 2.0, section 11.4.2)
//! and interprets the Key-Value Form answer.

use std::sync::Arc;

use serde::Serialize;

use crate::error::OpenIdError;
use crate::http::client::Transport;
use crate::services::redirect::OPENID_NS;
use crate::utils::kv_form::key_value_form;

/// Outcome of a successful verification round trip.
///
/// `granted` being false with no error means the operator definitively
/// rejected the assertion; errors mean the verification itself failed.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct VerificationResult {
    /// Whether the operator confirmed the assertion as valid.
    pub granted: bool,
    /// The claimed identity taken from the original assertion parameters.
    pub claimed_id: String,
}

/// Verification client performing the server-to-server confirmation call.
pub struct Verifier {
    /// Transport used for the single verification POST
    transport: Arc<dyn Transport>,
}

impl Verifier {
    /// Creates a verifier over the given transport.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Verifier { transport }
    }

    /// Verifies an inbound assertion by direct verification.
    ///
    /// # Arguments
    /// * `params` - The query parameters received on the return endpoint, in
    ///   order; for repeated keys the first value is read
    ///
    /// # Process Flow
    /// 1. `openid.op_endpoint` must be present and non-empty, checked before
    ///    any network I/O
    /// 2. `openid.mode` must be exactly `id_res`
    /// 3. A copy of the parameters with mode rewritten to
    ///    `check_authentication` is form-encoded and POSTed to the endpoint
    /// 4. The Key-Value Form response must carry the OpenID 2.0 `ns`
    /// 5. `granted` is true iff `is_valid` equals `true`; the claimed identity
    ///    is read from the original, pre-mutation parameters
    ///
    /// Every call performs a fresh round trip: direct verification is
    /// single-use per assertion and results are never cached.
    ///
    /// # Errors
    /// [`OpenIdError::NoOpEndpoint`], [`OpenIdError::IncorrectMode`],
    /// [`OpenIdError::Transport`] or [`OpenIdError::NamespaceMismatch`].
    pub fn verify(&self, params: &[(String, String)]) -> Result<VerificationResult, OpenIdError> {
        let endpoint = get_param(params, "openid.op_endpoint")
            .filter(|value| !value.is_empty())
            .ok_or(OpenIdError::NoOpEndpoint)?
            .to_string();

        if get_param(params, "openid.mode") != Some("id_res") {
            return Err(OpenIdError::IncorrectMode);
        }

        let mut direct: Vec<(String, String)> = params.to_vec();
        for (key, value) in &mut direct {
            if key == "openid.mode" {
                *value = "check_authentication".to_string();
            }
        }

        let body = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(direct.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .finish();

        let response = self.transport.post_form(&endpoint, body)?;
        let fields = key_value_form(&response);

        if fields.get("ns").map(String::as_str) != Some(OPENID_NS) {
            log::warn!("verification response from {endpoint} carried wrong or missing ns");
            return Err(OpenIdError::NamespaceMismatch);
        }

        let granted = fields.get("is_valid").map(String::as_str) == Some("true");
        let claimed_id = get_param(params, "openid.claimed_id")
            .unwrap_or("")
            .to_string();

        Ok(VerificationResult {
            granted,
            claimed_id,
        })
    }
}

/// Returns the first value for `key`, as multi-valued query collections do.
fn get_param<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

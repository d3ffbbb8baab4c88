// src/services/redirect.rs
//! Redirect URL construction for the `checkid_setup` handoff.
//!
//! Pure string construction: combines the discovered operator endpoint and
//! claimed identity with the caller's realm and return path. No network I/O.

/// Namespace URI identifying OpenID Authentication 2.0 messages.
pub const OPENID_NS: &str = "http://specs.openid.net/auth/2.0";

/// Sentinel claimed identity asking the operator to select the identifier.
pub const IDENTIFIER_SELECT: &str = "http://specs.openid.net/auth/2.0/identifier_select";

/// Builds the URL the user agent is redirected to for authentication.
///
/// # Arguments
/// * `op_endpoint` - Discovered operator authentication endpoint
/// * `claimed_id` - Discovered claimed identity; when empty, the
///   `identifier_select` sentinel is substituted
/// * `realm` - The realm the user is authenticating to, e.g. `http://example.com`
/// * `return_path` - Path under the realm the operator returns the user to
///
/// The query string carries `openid.claimed_id` and `openid.identity` (both
/// the claimed identity), `openid.realm`, `openid.return_to` (realm plus
/// return path), `openid.mode=checkid_setup` and `openid.ns`, all URL-encoded.
/// It is appended with `?`, or with `&` if the endpoint already has a query
/// component.
pub fn build_redirect(op_endpoint: &str, claimed_id: &str, realm: &str, return_path: &str) -> String {
    let claimed = if claimed_id.is_empty() {
        IDENTIFIER_SELECT
    } else {
        claimed_id
    };

    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("openid.claimed_id", claimed)
        .append_pair("openid.identity", claimed)
        .append_pair("openid.realm", realm)
        .append_pair("openid.return_to", &format!("{realm}{return_path}"))
        .append_pair("openid.mode", "checkid_setup")
        .append_pair("openid.ns", OPENID_NS)
        .finish();

    let join = if op_endpoint.contains('?') { '&' } else { '?' };
    format!("{op_endpoint}{join}{query}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Decodes the query component back into a key/value map.
    fn query_pairs(redirect: &str) -> HashMap<String, String> {
        let query = redirect.split_once('?').map(|(_, q)| q).unwrap_or("");
        url::form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect()
    }

    #[test]
    fn test_builds_exact_parameter_set() {
        let redirect = build_redirect(
            "https://op.example/auth",
            "https://user.example/id",
            "https://rp.example",
            "/cb",
        );

        assert!(redirect.starts_with("https://op.example/auth?"));
        assert!(redirect.contains("openid.claimed_id=https%3A%2F%2Fuser.example%2Fid"));
        assert!(redirect.contains("openid.ns=http%3A%2F%2Fspecs.openid.net%2Fauth%2F2.0"));

        let pairs = query_pairs(&redirect);
        let expected: HashMap<String, String> = [
            ("openid.claimed_id", "https://user.example/id"),
            ("openid.identity", "https://user.example/id"),
            ("openid.realm", "https://rp.example"),
            ("openid.return_to", "https://rp.example/cb"),
            ("openid.mode", "checkid_setup"),
            ("openid.ns", "http://specs.openid.net/auth/2.0"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        assert_eq!(pairs, expected);
    }

    #[test]
    fn test_endpoint_with_existing_query_joins_with_ampersand() {
        let redirect = build_redirect(
            "https://op.example/auth?foo=bar",
            "https://user.example/id",
            "https://rp.example",
            "/cb",
        );

        assert!(redirect.starts_with("https://op.example/auth?foo=bar&openid."));
        // Only the original query's separator, not a second one
        assert_eq!(redirect.matches('?').count(), 1);
    }

    #[test]
    fn test_empty_claimed_identity_uses_identifier_select() {
        let redirect = build_redirect("https://op.example/auth", "", "https://rp.example", "/cb");

        let pairs = query_pairs(&redirect);
        assert_eq!(
            pairs.get("openid.claimed_id").map(String::as_str),
            Some(IDENTIFIER_SELECT)
        );
        assert_eq!(
            pairs.get("openid.identity").map(String::as_str),
            Some(IDENTIFIER_SELECT)
        );
    }
}

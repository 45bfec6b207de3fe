//! Outbound user-agent construction.
//!
//! Wikimedia's User-Agent policy asks bulk clients to identify the tool, its
//! version, the HTTP backend, and ideally a way to contact the operator.

use tracing::warn;

const TOOL_NAME: &str = "wikidata-indexer";
// No version suffix: reqwest's version is not knowable at compile time and a
// hardcoded one would go stale on dependency bumps.
const HTTP_BACKEND: &str = "reqwest";
const RUNTIME: &str = "rust";

/// Build the user-agent string sent with every Wikidata request.
///
/// With contact information:
/// `wikidata-indexer/0.1.0 (ops@example.org) reqwest rust`
///
/// Without it, the parenthesized section is omitted and a warning is logged,
/// since anonymous bulk clients are more likely to be blocked.
pub fn build_user_agent(contact: Option<&str>) -> String {
    let tool = format!("{}/{}", TOOL_NAME, env!("CARGO_PKG_VERSION"));

    match contact {
        Some(contact) => {
            let contact = sanitize_contact(contact);
            format!("{} ({}) {} {}", tool, contact, HTTP_BACKEND, RUNTIME)
        }
        None => {
            warn!(
                "No operator contact configured; consider setting one to improve \
                 the User-Agent header for Wikidata requests"
            );
            format!("{} {} {}", tool, HTTP_BACKEND, RUNTIME)
        }
    }
}

/// Sanitize a contact string for use inside a header value: spaces become
/// underscores, and strings containing `%` or non-ASCII characters are
/// percent-encoded wholesale.
fn sanitize_contact(contact: &str) -> String {
    let underscored = contact.replace(' ', "_");

    if underscored.contains('%') || !underscored.is_ascii() {
        urlencoding::encode(&underscored).into_owned()
    } else {
        underscored
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_agent_with_contact() {
        let ua = build_user_agent(Some("ops@example.org"));
        assert!(ua.starts_with("wikidata-indexer/"));
        assert!(ua.contains("(ops@example.org)"));
        assert!(ua.contains("reqwest"));
        assert!(!ua.contains("reqwest/"));
    }

    #[test]
    fn test_user_agent_without_contact() {
        let ua = build_user_agent(None);
        assert!(!ua.contains('('));
        assert!(ua.contains("rust"));
    }

    #[test]
    fn test_contact_spaces_become_underscores() {
        assert_eq!(sanitize_contact("jane doe"), "jane_doe");
    }

    #[test]
    fn test_non_ascii_contact_is_percent_encoded() {
        let sanitized = sanitize_contact("jörg@example.org");
        assert!(sanitized.is_ascii());
        assert!(sanitized.contains("%C3%B6"));
    }

    #[test]
    fn test_percent_containing_contact_is_encoded() {
        let sanitized = sanitize_contact("50%_ops");
        assert!(!sanitized.contains("%_"));
        assert!(sanitized.contains("%25"));
    }
}

//! Best-effort board id derivation for error attribution.
//!
//! The board id is never used for access control. It is looked up from the
//! request first, then the process environment, then from hostnames that
//! embed it (`webapi<24 hex chars>`).

use std::sync::LazyLock;

use regex::Regex;

/// Query parameter carrying an explicit board id.
pub const BOARD_ID_QUERY_PARAM: &str = "boardId";

/// Request header carrying an explicit board id.
pub const BOARD_ID_HEADER: &str = "x-board-id";

/// Hostnames of deployed services embed the board id after this prefix.
pub const BOARD_ID_HOST_PATTERN: &str = r"(?i)webapi([a-f0-9]{24})";

static BOARD_ID_HOST_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(BOARD_ID_HOST_PATTERN).expect("valid regex"));

/// Every place a board id may be found, in lookup order.
#[derive(Debug, Default, Clone, Copy)]
pub struct BoardIdSources<'a> {
    /// Value of the `boardId` query parameter.
    pub query: Option<&'a str>,
    /// Value of the `X-Board-Id` header.
    pub header: Option<&'a str>,
    /// Value of the `BOARD_ID` environment variable.
    pub env: Option<&'a str>,
    /// The request's `Host` header.
    pub host: Option<&'a str>,
    /// The configured telemetry endpoint URL.
    pub endpoint_url: Option<&'a str>,
}

impl BoardIdSources<'_> {
    /// Return the first board id found, or `None`.
    ///
    /// Empty explicit values are skipped.
    pub fn resolve(&self) -> Option<String> {
        [self.query, self.header, self.env]
            .into_iter()
            .flatten()
            .find(|v| !v.is_empty())
            .map(str::to_string)
            .or_else(|| self.host.and_then(board_id_from_host))
            .or_else(|| self.endpoint_url.and_then(board_id_from_host))
    }
}

/// Extract the 24-character hex board id embedded in a hostname or URL.
pub fn board_id_from_host(value: &str) -> Option<String> {
    BOARD_ID_HOST_RE
        .captures(value)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEX: &str = "69626b9aa83a298b692f8150";

    #[test]
    fn query_wins_over_everything() {
        let sources = BoardIdSources {
            query: Some("from-query"),
            header: Some("from-header"),
            env: Some("from-env"),
            host: Some("webapi69626b9aa83a298b692f8150.up.railway.app"),
            endpoint_url: None,
        };
        assert_eq!(sources.resolve().as_deref(), Some("from-query"));
    }

    #[test]
    fn empty_query_falls_through_to_header() {
        let sources = BoardIdSources {
            query: Some(""),
            header: Some("from-header"),
            ..Default::default()
        };
        assert_eq!(sources.resolve().as_deref(), Some("from-header"));
    }

    #[test]
    fn env_used_when_request_has_nothing() {
        let sources = BoardIdSources {
            env: Some("from-env"),
            ..Default::default()
        };
        assert_eq!(sources.resolve().as_deref(), Some("from-env"));
    }

    #[test]
    fn host_pattern_match() {
        let host = format!("webapi{HEX}.up.railway.app");
        let sources = BoardIdSources {
            host: Some(&host),
            ..Default::default()
        };
        assert_eq!(sources.resolve().as_deref(), Some(HEX));
    }

    #[test]
    fn host_pattern_is_case_insensitive() {
        let host = format!("WEBAPI{}.example.com", HEX.to_uppercase());
        assert_eq!(board_id_from_host(&host), Some(HEX.to_uppercase()));
    }

    #[test]
    fn hyphenated_host_does_not_match() {
        let host = format!("webapi-{HEX}.up.railway.app");
        assert_eq!(board_id_from_host(&host), None);
    }

    #[test]
    fn short_token_does_not_match() {
        assert_eq!(board_id_from_host("webapiabc123.up.railway.app"), None);
    }

    #[test]
    fn endpoint_url_is_last_resort() {
        let endpoint = format!("https://webapi{HEX}.example.com/errors");
        let sources = BoardIdSources {
            host: Some("localhost:3000"),
            endpoint_url: Some(&endpoint),
            ..Default::default()
        };
        assert_eq!(sources.resolve().as_deref(), Some(HEX));
    }

    #[test]
    fn nothing_found() {
        let sources = BoardIdSources {
            host: Some("localhost:3000"),
            endpoint_url: Some("https://errors.example.com/report"),
            ..Default::default()
        };
        assert_eq!(sources.resolve(), None);
    }
}

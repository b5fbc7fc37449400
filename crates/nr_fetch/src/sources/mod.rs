pub mod gnews;

pub use gnews::GNewsClient;

/// Common helpers for turning loosely typed API payloads into articles
pub(crate) mod utils {
    use chrono::{DateTime, Utc};
    use tracing::debug;

    /// `None` for absent or blank strings, which the API uses interchangeably.
    pub fn non_empty(value: Option<String>) -> Option<String> {
        value.filter(|v| !v.trim().is_empty())
    }

    pub fn text_or(value: Option<String>, placeholder: &str) -> String {
        non_empty(value).unwrap_or_else(|| placeholder.to_string())
    }

    /// Parse an ISO-8601 timestamp, substituting `now` when it is missing or
    /// malformed.
    pub fn published_at_or(value: Option<String>, now: DateTime<Utc>) -> DateTime<Utc> {
        match non_empty(value) {
            Some(raw) => match DateTime::parse_from_rfc3339(raw.trim()) {
                Ok(parsed) => parsed.with_timezone(&Utc),
                Err(e) => {
                    debug!("Unparsable publishedAt {:?} ({}), using current time", raw, e);
                    now
                }
            },
            None => now,
        }
    }
}

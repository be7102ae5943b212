use serde::Deserialize;

/// The query string for `GET /talker/search`.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// The substring to match names against, case-sensitively. Missing or
    /// empty matches every talker.
    #[serde(default)]
    pub q: Option<String>,
}

//! Logs-explorer link model.
//!
//! Defines the `LogsLink` structure describing a Datadog logs-explorer view.

use crate::time::TimeRange;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A structured representation of a Datadog logs-explorer view.
///
/// Every attribute maps to one query parameter of the encoded URL; attributes
/// left at their zero value are omitted from the URL, except booleans which
/// are always rendered. Query parameters with no corresponding attribute
/// survive a decode in [`extra_params`](Self::extra_params) and are re-encoded
/// verbatim.
///
/// # Example
///
/// ```
/// use shared::models::LogsLink;
///
/// let link = LogsLink::new("https://acme.datadoghq.com")
///     .with_query("status:error service:api")
///     .with_columns(["host", "service"]);
///
/// assert!(!link.live);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LogsLink {
    /// Base URL of the Datadog site, e.g. `https://acme.datadoghq.com`.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub base_url: String,

    /// Free-text search query. This is the `query` query key.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub query: String,

    /// Visualization mode. This is the `viz` query key.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub visualize_as: String,

    /// The group-into clause. This is the `agg_m` query key.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub group_into: String,

    /// Source of the group-into clause. This is the `agg_m_source` query key.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub group_into_source: String,

    /// The group-by clause. This is the `agg_q` query key.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub group_by: String,

    /// Source of the group-by clause. This is the `agg_q_source` query key.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub group_by_source: String,

    /// Aggregation type (e.g. count, avg). This is the `agg_t` query key.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub agg_type: String,

    /// Storage tier to query. This is the `storage` query key.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub storage: String,

    /// Behavior for possibly-missing fields. This is the `x_missing` query key.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub missing: String,

    /// Field path used for log clustering. This is the
    /// `clustering_pattern_field_path` query key.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub clustering_pattern_field_path: String,

    /// Message display mode. This is the `messageDisplay` query key; the
    /// historical `message_display` spelling is accepted on decode.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub message_display: String,

    /// Sort order of the log stream. This is the `stream_sort` query key.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub stream_sort: String,

    /// Whether the view tails live logs instead of a fixed range. This is the
    /// `live` query key. Defaults to `false` so explicit time ranges are
    /// honored unless a caller opts into live tailing.
    pub live: bool,

    /// Number of top entries to show. This is the `top_n` query key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_n: Option<i64>,

    /// Ordering of the top entries. This is the `top_o` query key.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub top_o: String,

    /// Columns to display, in order. This is the `cols` query key, rendered as
    /// a single comma-joined value.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<String>,

    /// Refresh mode of the view. This is the `refresh_mode` query key.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub refresh_mode: String,

    /// Start of the time range: epoch milliseconds or a relative expression
    /// such as `now-1h`. This is the `from_ts` query key.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub from_ts: String,

    /// End of the time range: epoch milliseconds or a relative expression.
    /// This is the `to_ts` query key.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub to_ts: String,

    /// Attribution flag used by Datadog for tracking. This is the `fromUser`
    /// query key.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub from_user: String,

    /// Query parameters with no registered attribute, preserved verbatim for
    /// lossless round-tripping.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub extra_params: BTreeMap<String, String>,
}

impl LogsLink {
    /// Creates a new logs link for the given Datadog site.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Sets the search query.
    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    /// Sets the display columns.
    #[must_use]
    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the time range. `live` keeps its `false` default, so the explicit
    /// range is honored unless the caller also calls [`with_live`](Self::with_live).
    #[must_use]
    pub fn with_time_range(mut self, range: &TimeRange) -> Self {
        self.from_ts.clone_from(&range.from_ts);
        self.to_ts.clone_from(&range.to_ts);
        self
    }

    /// Sets the live-tail flag.
    #[must_use]
    pub fn with_live(mut self, live: bool) -> Self {
        self.live = live;
        self
    }

    /// Adds an unregistered query parameter, emitted verbatim on encode.
    #[must_use]
    pub fn with_extra_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_params.insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::TimeRange;

    #[test]
    fn test_new_defaults() {
        let link = LogsLink::new("https://acme.datadoghq.com");

        assert_eq!(link.base_url, "https://acme.datadoghq.com");
        assert!(!link.live);
        assert!(link.query.is_empty());
        assert!(link.top_n.is_none());
        assert!(link.extra_params.is_empty());
    }

    #[test]
    fn test_time_bounded_link_is_not_live() {
        let range = TimeRange {
            from_ts: "1733527200000".to_string(),
            to_ts: "1733528400000".to_string(),
        };
        let link = LogsLink::new("https://acme.datadoghq.com").with_time_range(&range);

        assert_eq!(link.from_ts, "1733527200000");
        assert_eq!(link.to_ts, "1733528400000");
        assert!(!link.live);
    }

    #[test]
    fn test_with_columns() {
        let link = LogsLink::new("https://acme.datadoghq.com").with_columns(["host", "service"]);
        assert_eq!(link.columns, vec!["host", "service"]);
    }

    #[test]
    fn test_deserialize_partial_file() {
        let json = r#"{"baseUrl": "https://acme.datadoghq.com", "query": "status:error"}"#;
        let link: LogsLink = serde_json::from_str(json).unwrap();

        assert_eq!(link.query, "status:error");
        assert!(!link.live);
        assert!(link.columns.is_empty());
    }

    #[test]
    fn test_serialize_skips_empty_fields() {
        let link = LogsLink::new("https://acme.datadoghq.com");
        let json = serde_json::to_string(&link).unwrap();

        assert!(json.contains("\"baseUrl\""));
        assert!(json.contains("\"live\":false"));
        assert!(!json.contains("\"query\""));
        assert!(!json.contains("\"extraParams\""));
    }
}

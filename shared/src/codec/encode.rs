//! Link encoder.
//!
//! Turns a structured link into the literal URL the Datadog web UI
//! understands. Query keys are emitted in byte-lexicographic order so the
//! same link always renders the same bytes.

use super::registry::{FieldKind, FieldSpec, LOGS_FIELDS, TRACE_FIELDS};
use super::{DecodedLink, LinkCodec};
use crate::models::{LinkValidationError, LogsLink, TraceLink};
use crate::time::TimeError;
use std::collections::BTreeMap;
use thiserror::Error;
use url::form_urlencoded;

/// Errors that can occur while encoding a link.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// A time-range attribute could not be resolved to an absolute time.
    #[error("could not convert {field} to an absolute time")]
    Time {
        /// The query key whose value failed to resolve.
        field: &'static str,
        /// The underlying resolver failure.
        #[source]
        source: TimeError,
    },

    /// The link failed validation.
    #[error(transparent)]
    Validation(#[from] LinkValidationError),
}

impl LinkCodec {
    /// Encodes a logs link as `<base>/logs?<query>`.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError::Time`] if `from_ts` or `to_ts` holds a relative
    /// expression that does not match the grammar.
    pub fn encode_logs(&self, link: &LogsLink) -> Result<String, EncodeError> {
        let params = self.render_fields(link, LOGS_FIELDS, &link.extra_params)?;
        Ok(format!("{}/logs?{}", link.base_url, encode_query(&params)))
    }

    /// Encodes a trace link as `<base>/apm/trace/<traceID>?<query>`.
    ///
    /// The trace ID is a path segment, never a query parameter.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError::Validation`] if the trace ID is empty.
    pub fn encode_trace(&self, link: &TraceLink) -> Result<String, EncodeError> {
        link.validate_link()?;
        let params = self.render_fields(link, TRACE_FIELDS, &link.extra_params)?;
        Ok(format!(
            "{}/apm/trace/{}?{}",
            link.base_url,
            link.trace_id,
            encode_query(&params)
        ))
    }

    /// Encodes either link variant.
    ///
    /// # Errors
    ///
    /// Propagates the variant's encoding failure.
    pub fn encode(&self, link: &DecodedLink) -> Result<String, EncodeError> {
        match link {
            DecodedLink::Logs(link) => self.encode_logs(link),
            DecodedLink::Trace(link) => self.encode_trace(link),
        }
    }

    fn render_fields<T>(
        &self,
        link: &T,
        fields: &[FieldSpec<T>],
        extra: &BTreeMap<String, String>,
    ) -> Result<BTreeMap<String, String>, EncodeError> {
        let mut params = BTreeMap::new();

        for spec in fields {
            let Some(value) = (spec.get)(link) else {
                continue;
            };
            let value = if spec.kind == FieldKind::Time {
                self.resolver
                    .resolve(&value)
                    .map_err(|source| EncodeError::Time {
                        field: spec.key,
                        source,
                    })?
            } else {
                value
            };
            params.insert(spec.key.to_string(), value);
        }

        // Registered fields own their key; an extra param never overrides one.
        for (key, value) in extra {
            params
                .entry(key.clone())
                .or_insert_with(|| value.clone());
        }

        Ok(params)
    }
}

/// Builds a logs-explorer URL from raw query parameters.
///
/// The parameters are emitted as-is, sorted by key, with the same escaping as
/// [`LinkCodec::encode_logs`]. Useful when the caller assembles parameters
/// directly instead of going through [`LogsLink`].
#[must_use]
pub fn logs_url_from_params(base_url: &str, params: &BTreeMap<String, String>) -> String {
    format!("{base_url}/logs?{}", encode_query(params))
}

/// Renders a label map as a `name:"value"` search-query conjunction.
///
/// Labels are emitted in sorted order so the resulting query is
/// deterministic. The result is a plain query string; percent-encoding
/// happens when it is embedded in a URL.
///
/// # Example
///
/// ```
/// use std::collections::BTreeMap;
/// use shared::codec::search_query;
///
/// let labels = BTreeMap::from([
///     ("service".to_string(), "api".to_string()),
///     ("env".to_string(), "prod".to_string()),
/// ]);
///
/// assert_eq!(search_query(&labels), r#"env:"prod" service:"api""#);
/// ```
#[must_use]
pub fn search_query(labels: &BTreeMap<String, String>) -> String {
    labels
        .iter()
        .map(|(name, value)| format!("{name}:\"{value}\""))
        .collect::<Vec<_>>()
        .join(" ")
}

fn encode_query(params: &BTreeMap<String, String>) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    for (key, value) in params {
        query.append_pair(key, value);
    }
    query.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::RelativeTimeResolver;
    use chrono::{TimeZone, Utc};

    fn full_logs_link() -> LogsLink {
        LogsLink {
            base_url: "https://acme.datadoghq.com".to_string(),
            query: "status:error".to_string(),
            visualize_as: "pattern".to_string(),
            group_into: "count".to_string(),
            group_into_source: "base".to_string(),
            group_by: "status".to_string(),
            group_by_source: "base".to_string(),
            agg_type: "count".to_string(),
            storage: "flex_tier".to_string(),
            missing: "true".to_string(),
            clustering_pattern_field_path: "message".to_string(),
            message_display: "inline".to_string(),
            stream_sort: "desc".to_string(),
            live: false,
            top_n: Some(10),
            top_o: "top".to_string(),
            columns: vec!["host".to_string(), "service".to_string()],
            refresh_mode: "paused".to_string(),
            from_ts: "1736927929003".to_string(),
            to_ts: "1736949529003".to_string(),
            from_user: "true".to_string(),
            extra_params: BTreeMap::new(),
        }
    }

    #[test]
    fn test_encode_minimal_logs_link() {
        let codec = LinkCodec::default();
        let link = LogsLink::new("https://acme.datadoghq.com").with_query("status:error");

        assert_eq!(
            codec.encode_logs(&link).unwrap(),
            "https://acme.datadoghq.com/logs?live=false&query=status%3Aerror"
        );
    }

    #[test]
    fn test_encode_full_logs_link() {
        let codec = LinkCodec::default();

        assert_eq!(
            codec.encode_logs(&full_logs_link()).unwrap(),
            "https://acme.datadoghq.com/logs?\
             agg_m=count&agg_m_source=base&agg_q=status&agg_q_source=base&agg_t=count\
             &clustering_pattern_field_path=message&cols=host%2Cservice&fromUser=true\
             &from_ts=1736927929003&live=false&messageDisplay=inline&query=status%3Aerror\
             &refresh_mode=paused&storage=flex_tier&stream_sort=desc&to_ts=1736949529003\
             &top_n=10&top_o=top&viz=pattern&x_missing=true"
        );
    }

    #[test]
    fn test_encode_is_deterministic() {
        let codec = LinkCodec::default();
        let link = full_logs_link();

        assert_eq!(
            codec.encode_logs(&link).unwrap(),
            codec.encode_logs(&link).unwrap()
        );
    }

    #[test]
    fn test_encode_resolves_relative_times() {
        let reference = Utc.with_ymd_and_hms(2024, 12, 6, 23, 40, 0).unwrap();
        let codec = LinkCodec::new(RelativeTimeResolver::with_reference(reference));

        let mut link = LogsLink::new("https://acme.datadoghq.com");
        link.from_ts = "now-1h".to_string();
        link.to_ts = "now".to_string();

        let url = codec.encode_logs(&link).unwrap();
        let from = (reference.timestamp() - 3600) * 1000;
        let to = reference.timestamp() * 1000;

        assert_eq!(
            url,
            format!("https://acme.datadoghq.com/logs?from_ts={from}&live=false&to_ts={to}")
        );
    }

    #[test]
    fn test_encode_absolute_times_pass_through() {
        let codec = LinkCodec::default();
        let mut link = LogsLink::new("https://acme.datadoghq.com");
        link.from_ts = "1733527200000".to_string();
        link.to_ts = "1733528400000".to_string();

        assert_eq!(
            codec.encode_logs(&link).unwrap(),
            "https://acme.datadoghq.com/logs?from_ts=1733527200000&live=false&to_ts=1733528400000"
        );
    }

    #[test]
    fn test_encode_fails_on_bad_relative_time() {
        let codec = LinkCodec::default();
        let mut link = LogsLink::new("https://acme.datadoghq.com");
        link.from_ts = "now-1x".to_string();

        assert!(matches!(
            codec.encode_logs(&link),
            Err(EncodeError::Time {
                field: "from_ts",
                ..
            })
        ));
    }

    #[test]
    fn test_encode_emits_extra_params_verbatim() {
        let codec = LinkCodec::default();
        let link = LogsLink::new("https://acme.datadoghq.com")
            .with_query("status:error")
            .with_extra_param("aaa", "first")
            .with_extra_param("zz_custom", "last");

        assert_eq!(
            codec.encode_logs(&link).unwrap(),
            "https://acme.datadoghq.com/logs?aaa=first&live=false&query=status%3Aerror&zz_custom=last"
        );
    }

    #[test]
    fn test_registered_field_wins_over_extra_param() {
        let codec = LinkCodec::default();
        let link = LogsLink::new("https://acme.datadoghq.com")
            .with_query("status:error")
            .with_extra_param("query", "shadowed");

        assert_eq!(
            codec.encode_logs(&link).unwrap(),
            "https://acme.datadoghq.com/logs?live=false&query=status%3Aerror"
        );
    }

    #[test]
    fn test_encode_trace_link() {
        let codec = LinkCodec::default();
        let link = TraceLink::new("https://acme.datadoghq.com", "4815162342")
            .with_span_id("108")
            .with_graph_type("flamegraph");

        assert_eq!(
            codec.encode_trace(&link).unwrap(),
            "https://acme.datadoghq.com/apm/trace/4815162342?graphType=flamegraph&shouldShowLegend=false&spanID=108"
        );
    }

    #[test]
    fn test_encode_trace_rejects_empty_trace_id() {
        let codec = LinkCodec::default();
        let link = TraceLink::new("https://acme.datadoghq.com", "");

        assert!(matches!(
            codec.encode_trace(&link),
            Err(EncodeError::Validation(_))
        ));
    }

    #[test]
    fn test_encode_dispatches_on_variant() {
        let codec = LinkCodec::default();
        let logs = DecodedLink::Logs(LogsLink::new("https://acme.datadoghq.com"));
        let trace = DecodedLink::Trace(TraceLink::new("https://acme.datadoghq.com", "42"));

        assert!(codec.encode(&logs).unwrap().contains("/logs?"));
        assert!(codec.encode(&trace).unwrap().contains("/apm/trace/42?"));
    }

    #[test]
    fn test_logs_url_from_params() {
        let params = BTreeMap::from(
            [
                ("query", "service:foyle @contextId:01JEF30X8B9A8K5M7XGQMAPQ2Y"),
                ("from_ts", "1733527200000"),
                ("stream_sort", "desc"),
                ("viz", "stream"),
                ("to_ts", "1733528400000"),
                ("agg_m", "count"),
                ("agg_m_source", "base"),
                ("cols", "host,service"),
                ("fromUser", "true"),
                ("live", "false"),
                ("agg_t", "count"),
                ("messageDisplay", "inline"),
                ("refresh_mode", "sliding"),
                ("storage", "flex_tier"),
            ]
            .map(|(key, value)| (key.to_string(), value.to_string())),
        );

        assert_eq!(
            logs_url_from_params("https://datadoghq.com", &params),
            "https://datadoghq.com/logs?agg_m=count&agg_m_source=base&agg_t=count\
             &cols=host%2Cservice&fromUser=true&from_ts=1733527200000&live=false\
             &messageDisplay=inline&query=service%3Afoyle+%40contextId%3A01JEF30X8B9A8K5M7XGQMAPQ2Y\
             &refresh_mode=sliding&storage=flex_tier&stream_sort=desc&to_ts=1733528400000&viz=stream"
        );
    }

    #[test]
    fn test_search_query_orders_labels() {
        let labels = BTreeMap::from([
            ("service".to_string(), "feserver".to_string()),
            ("env".to_string(), "prod".to_string()),
        ]);

        assert_eq!(search_query(&labels), r#"env:"prod" service:"feserver""#);
    }

    #[test]
    fn test_search_query_empty_labels() {
        assert_eq!(search_query(&BTreeMap::new()), "");
    }
}

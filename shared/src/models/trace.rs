//! APM trace link model.
//!
//! Defines the `TraceLink` structure describing a Datadog APM trace view.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use validator::Validate;

/// A structured representation of a Datadog APM trace view.
///
/// The trace ID is embedded as the final path segment of the encoded URL
/// (`<base>/apm/trace/<traceID>`), never as a query parameter. All other
/// attributes map to query parameters.
///
/// # Example
///
/// ```
/// use shared::models::TraceLink;
///
/// let link = TraceLink::new("https://acme.datadoghq.com", "4815162342")
///     .with_span_id("108")
///     .with_graph_type("flamegraph");
///
/// assert!(link.validate_link().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct TraceLink {
    /// Base URL of the Datadog site, e.g. `https://acme.datadoghq.com`.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub base_url: String,

    /// The trace identifier, required and embedded in the URL path.
    #[validate(length(min = 1, message = "Trace ID cannot be empty"))]
    pub trace_id: String,

    /// Span to focus within the trace. This is the `spanID` query key.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub span_id: String,

    /// Graph type of the trace view. This is the `graphType` query key.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub graph_type: String,

    /// Tab selected in the side panel. This is the `panel_tab` query key.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub panel_tab: String,

    /// Whether the graph legend is shown. This is the `shouldShowLegend`
    /// query key.
    pub should_show_legend: bool,

    /// Sort order of the span list. This is the `sort` query key.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub sort: String,

    /// Hint for locating the trace in time. This is the `timeHint` query key.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub time_hint: String,

    /// Query parameters with no registered attribute, preserved verbatim for
    /// lossless round-tripping.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub extra_params: BTreeMap<String, String>,
}

/// Errors that can occur during link validation.
#[derive(Debug, Error)]
pub enum LinkValidationError {
    /// The trace ID is empty.
    #[error("Trace ID cannot be empty")]
    EmptyTraceId,

    /// Validation failed with details.
    #[error("Validation failed: {0}")]
    ValidationError(#[from] validator::ValidationErrors),
}

impl TraceLink {
    /// Creates a new trace link for the given Datadog site and trace ID.
    #[must_use]
    pub fn new(base_url: impl Into<String>, trace_id: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            trace_id: trace_id.into(),
            ..Self::default()
        }
    }

    /// Sets the focused span.
    #[must_use]
    pub fn with_span_id(mut self, span_id: impl Into<String>) -> Self {
        self.span_id = span_id.into();
        self
    }

    /// Sets the graph type.
    #[must_use]
    pub fn with_graph_type(mut self, graph_type: impl Into<String>) -> Self {
        self.graph_type = graph_type.into();
        self
    }

    /// Sets the legend visibility.
    #[must_use]
    pub fn with_legend(mut self, should_show_legend: bool) -> Self {
        self.should_show_legend = should_show_legend;
        self
    }

    /// Adds an unregistered query parameter, emitted verbatim on encode.
    #[must_use]
    pub fn with_extra_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_params.insert(key.into(), value.into());
        self
    }

    /// Validates the link.
    ///
    /// # Errors
    ///
    /// Returns an error if the trace ID is empty.
    pub fn validate_link(&self) -> Result<(), LinkValidationError> {
        if self.trace_id.is_empty() {
            return Err(LinkValidationError::EmptyTraceId);
        }
        self.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_defaults() {
        let link = TraceLink::new("https://acme.datadoghq.com", "4815162342");

        assert_eq!(link.base_url, "https://acme.datadoghq.com");
        assert_eq!(link.trace_id, "4815162342");
        assert!(!link.should_show_legend);
        assert!(link.extra_params.is_empty());
    }

    #[test]
    fn test_validation_success() {
        let link = TraceLink::new("https://acme.datadoghq.com", "4815162342");
        assert!(link.validate_link().is_ok());
    }

    #[test]
    fn test_validation_empty_trace_id() {
        let link = TraceLink::new("https://acme.datadoghq.com", "");
        assert!(matches!(
            link.validate_link(),
            Err(LinkValidationError::EmptyTraceId)
        ));
    }

    #[test]
    fn test_deserialize_partial_file() {
        let json = r#"{"baseUrl": "https://acme.datadoghq.com", "traceId": "abc", "spanId": "def"}"#;
        let link: TraceLink = serde_json::from_str(json).unwrap();

        assert_eq!(link.trace_id, "abc");
        assert_eq!(link.span_id, "def");
        assert!(!link.should_show_legend);
    }
}

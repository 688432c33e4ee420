//! Link decoder and router.
//!
//! Parses an arbitrary URL, routes on the path prefix to pick the link
//! variant, and maps query parameters back onto the structured link. Decoding
//! is best-effort per field: a registered parameter whose value fails
//! conversion is logged and left at its zero value (unless the codec is
//! strict), while structural failures such as an unparsable URL or an unknown
//! path abort the decode.

use super::registry::{
    canonical_key, find_field, FieldConversionError, FieldSpec, LOGS_ALIASES, LOGS_FIELDS,
    TRACE_ALIASES, TRACE_FIELDS,
};
use super::LinkCodec;
use crate::models::{LogsLink, TraceLink};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::warn;
use url::Url;

/// A decoded link, tagged by the variant the URL's path routed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DecodedLink {
    /// A logs-explorer view (`/logs` path).
    Logs(LogsLink),
    /// An APM trace view (`/apm/trace/<traceID>` path).
    Trace(TraceLink),
}

/// Errors that can occur while decoding a URL.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The input is not a syntactically valid URL.
    #[error("failed to parse URL '{url}'")]
    InvalidUrl {
        /// The offending input.
        url: String,
        /// The underlying parse failure.
        #[source]
        source: url::ParseError,
    },

    /// The URL's path matches neither known link variant.
    #[error("unsupported path '{path}': expected a /logs or /apm/trace link")]
    UnsupportedPath {
        /// The offending path.
        path: String,
    },

    /// A trace path carries no trace ID segment.
    #[error("missing trace ID in path '{path}'")]
    MissingTraceId {
        /// The offending path.
        path: String,
    },

    /// A registered parameter's value failed conversion (strict mode only).
    #[error("invalid value '{value}' for query parameter '{key}'")]
    FieldConversion {
        /// The query key whose value failed conversion.
        key: String,
        /// The offending value.
        value: String,
        /// The underlying conversion failure.
        #[source]
        source: FieldConversionError,
    },
}

impl LinkCodec {
    /// Decodes a URL into the link variant its path routes to.
    ///
    /// The base URL of the result is reconstructed as `scheme://host` only;
    /// the path is consumed by routing. Registered query parameters are
    /// converted to their field's type (first value wins on duplicates),
    /// unregistered ones are preserved verbatim in the link's `extra_params`.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::InvalidUrl`] for unparsable input,
    /// [`DecodeError::UnsupportedPath`] when the path matches neither
    /// variant, [`DecodeError::MissingTraceId`] for a bare trace path, and
    /// (in strict mode only) [`DecodeError::FieldConversion`] when a
    /// registered parameter's value fails conversion.
    pub fn decode(&self, input: &str) -> Result<DecodedLink, DecodeError> {
        let parsed = Url::parse(input).map_err(|source| DecodeError::InvalidUrl {
            url: input.to_string(),
            source,
        })?;
        let params = first_query_values(&parsed);
        let path = parsed.path();

        if path.starts_with("/logs") {
            let mut link = LogsLink::new(base_url_of(&parsed));
            let extra = self.assign_params(&mut link, LOGS_FIELDS, LOGS_ALIASES, &params)?;
            link.extra_params = extra;
            return Ok(DecodedLink::Logs(link));
        }

        if path.starts_with("/apm/trace") {
            let trace_id = trace_id_of(path);
            if trace_id.is_empty() {
                return Err(DecodeError::MissingTraceId {
                    path: path.to_string(),
                });
            }
            let mut link = TraceLink::new(base_url_of(&parsed), trace_id);
            let extra = self.assign_params(&mut link, TRACE_FIELDS, TRACE_ALIASES, &params)?;
            link.extra_params = extra;
            return Ok(DecodedLink::Trace(link));
        }

        Err(DecodeError::UnsupportedPath {
            path: path.to_string(),
        })
    }

    fn assign_params<T>(
        &self,
        link: &mut T,
        fields: &[FieldSpec<T>],
        aliases: &'static [(&'static str, &'static str)],
        params: &BTreeMap<String, String>,
    ) -> Result<BTreeMap<String, String>, DecodeError> {
        let mut extra = BTreeMap::new();

        for (key, value) in params {
            let canonical = canonical_key(aliases, key);
            if let Some(canonical) = canonical {
                // A historical spelling loses to the canonical key when both appear.
                if params.contains_key(canonical) {
                    continue;
                }
            }

            let effective = canonical.unwrap_or(key.as_str());
            match find_field(fields, effective) {
                Some(spec) => {
                    if let Err(source) = (spec.set)(link, value) {
                        if self.strict {
                            return Err(DecodeError::FieldConversion {
                                key: key.clone(),
                                value: value.clone(),
                                source,
                            });
                        }
                        warn!(
                            key = %key,
                            value = %value,
                            error = %source,
                            "ignoring query parameter that failed conversion"
                        );
                    }
                }
                None => {
                    extra.insert(key.clone(), value.clone());
                }
            }
        }

        Ok(extra)
    }
}

/// Reconstructs `scheme://host[:port]`, discarding the path.
fn base_url_of(parsed: &Url) -> String {
    let mut base = format!(
        "{}://{}",
        parsed.scheme(),
        parsed.host_str().unwrap_or_default()
    );
    if let Some(port) = parsed.port() {
        base.push_str(&format!(":{port}"));
    }
    base
}

/// Extracts the trace ID: the trailing path segment after the route prefix.
fn trace_id_of(path: &str) -> &str {
    path.strip_prefix("/apm/trace")
        .unwrap_or_default()
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default()
}

/// Collects query parameters, keeping the first value of any duplicated key.
fn first_query_values(parsed: &Url) -> BTreeMap<String, String> {
    let mut params = BTreeMap::new();
    for (key, value) in parsed.query_pairs() {
        params
            .entry(key.into_owned())
            .or_insert_with(|| value.into_owned());
    }
    params
}

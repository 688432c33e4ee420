//! Bidirectional codec between structured links and Datadog URLs.
//!
//! Encoding walks the field registry, resolves relative time expressions, and
//! serializes the query string with keys in lexicographic order so identical
//! links always produce byte-identical URLs. Decoding routes on the URL path
//! (`/logs` vs `/apm/trace/<traceID>`) and maps query parameters back onto a
//! structured link, preserving unrecognized parameters verbatim.
//!
//! # Example
//!
//! ```
//! use shared::codec::{DecodedLink, LinkCodec};
//! use shared::models::LogsLink;
//!
//! let codec = LinkCodec::default();
//! let link = LogsLink::new("https://acme.datadoghq.com").with_query("status:error");
//!
//! let url = codec.encode_logs(&link).unwrap();
//! let decoded = codec.decode(&url).unwrap();
//!
//! assert_eq!(decoded, DecodedLink::Logs(link));
//! ```

mod decode;
mod encode;
mod registry;

pub use decode::{DecodeError, DecodedLink};
pub use encode::{logs_url_from_params, search_query, EncodeError};
pub use registry::FieldConversionError;

use crate::time::RelativeTimeResolver;

/// Converts links to URLs and URLs back to links.
///
/// The codec owns the [`RelativeTimeResolver`] used for `from_ts`/`to_ts`
/// resolution; construct it once at startup and share it freely, every call
/// is read-only.
///
/// Decoding is best-effort per field: a registered query parameter whose
/// value fails conversion is logged and left at its zero value. Use
/// [`strict`](Self::strict) to turn such failures into hard errors instead.
#[derive(Debug, Clone, Default)]
pub struct LinkCodec {
    resolver: RelativeTimeResolver,
    strict: bool,
}

impl LinkCodec {
    /// Creates a codec using the given resolver for relative times.
    #[must_use]
    pub fn new(resolver: RelativeTimeResolver) -> Self {
        Self {
            resolver,
            strict: false,
        }
    }

    /// Makes per-field conversion failures fatal to a decode.
    #[must_use]
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

//! Ddlink Shared Library
//!
//! This crate contains the link models, the bidirectional URL codec, and the
//! time utilities used by the ddlink command-line tool.
//!
//! # Modules
//!
//! - [`models`] - Structured representations of Datadog deep links
//! - [`codec`] - Encoding links to URLs and decoding URLs back to links
//! - [`time`] - Relative-time resolution and time-range construction
//!
//! # Example
//!
//! ```
//! use shared::codec::LinkCodec;
//! use shared::models::LogsLink;
//!
//! let link = LogsLink::new("https://acme.datadoghq.com").with_query("status:error");
//!
//! let codec = LinkCodec::default();
//! let url = codec.encode_logs(&link).unwrap();
//! assert_eq!(
//!     url,
//!     "https://acme.datadoghq.com/logs?live=false&query=status%3Aerror"
//! );
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod codec;
pub mod models;
pub mod time;

/// Re-export common dependencies for convenience.
pub use chrono;
pub use serde;
pub use serde_json;
pub use url;

//! Structured representations of Datadog deep links.
//!
//! This module contains the value objects the codec converts to and from URLs.

pub mod logs;
pub mod trace;

pub use logs::LogsLink;
pub use trace::{LinkValidationError, TraceLink};

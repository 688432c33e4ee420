//! Field registry: static tables mapping link attributes to query keys.
//!
//! Each link variant has one table of `FieldSpec` records (canonical query
//! key, value kind, and a getter/setter pair) evaluated uniformly by the
//! encoder and decoder. The tables are the single source of truth for which
//! query parameters a link understands; anything not listed here survives a
//! decode in the link's `extra_params` map.

use crate::models::{LogsLink, TraceLink};
use thiserror::Error;

/// How a field's value converts between query-string text and its type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldKind {
    /// Plain string passthrough.
    Text,
    /// Base-10 integer.
    Integer,
    /// `true`/`false`.
    Boolean,
    /// Ordered list rendered as one comma-joined value.
    List,
    /// Time expression, passed through the relative-time resolver on encode.
    Time,
}

/// A query-parameter value that could not be converted to its field's type.
#[derive(Debug, Error)]
pub enum FieldConversionError {
    /// The value is not a base-10 integer.
    #[error("not a valid integer")]
    Integer(#[from] std::num::ParseIntError),

    /// The value is neither `true` nor `false`.
    #[error("not a valid boolean")]
    Boolean(#[from] std::str::ParseBoolError),
}

/// One registered field of a link variant.
pub(crate) struct FieldSpec<T> {
    /// Canonical query-parameter key.
    pub key: &'static str,
    /// Value kind, interpreted by the encoder and decoder.
    pub kind: FieldKind,
    /// Renders the field, or `None` when it holds its zero value.
    pub get: fn(&T) -> Option<String>,
    /// Assigns a decoded query-parameter value to the field.
    pub set: fn(&mut T, &str) -> Result<(), FieldConversionError>,
}

fn text(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn list(values: &[String]) -> Option<String> {
    if values.is_empty() {
        None
    } else {
        Some(values.join(","))
    }
}

pub(crate) static LOGS_FIELDS: &[FieldSpec<LogsLink>] = &[
    FieldSpec {
        key: "query",
        kind: FieldKind::Text,
        get: |link| text(&link.query),
        set: |link, value| {
            link.query = value.to_string();
            Ok(())
        },
    },
    FieldSpec {
        key: "viz",
        kind: FieldKind::Text,
        get: |link| text(&link.visualize_as),
        set: |link, value| {
            link.visualize_as = value.to_string();
            Ok(())
        },
    },
    FieldSpec {
        key: "agg_m",
        kind: FieldKind::Text,
        get: |link| text(&link.group_into),
        set: |link, value| {
            link.group_into = value.to_string();
            Ok(())
        },
    },
    FieldSpec {
        key: "agg_m_source",
        kind: FieldKind::Text,
        get: |link| text(&link.group_into_source),
        set: |link, value| {
            link.group_into_source = value.to_string();
            Ok(())
        },
    },
    FieldSpec {
        key: "agg_q",
        kind: FieldKind::Text,
        get: |link| text(&link.group_by),
        set: |link, value| {
            link.group_by = value.to_string();
            Ok(())
        },
    },
    FieldSpec {
        key: "agg_q_source",
        kind: FieldKind::Text,
        get: |link| text(&link.group_by_source),
        set: |link, value| {
            link.group_by_source = value.to_string();
            Ok(())
        },
    },
    FieldSpec {
        key: "agg_t",
        kind: FieldKind::Text,
        get: |link| text(&link.agg_type),
        set: |link, value| {
            link.agg_type = value.to_string();
            Ok(())
        },
    },
    FieldSpec {
        key: "storage",
        kind: FieldKind::Text,
        get: |link| text(&link.storage),
        set: |link, value| {
            link.storage = value.to_string();
            Ok(())
        },
    },
    FieldSpec {
        key: "x_missing",
        kind: FieldKind::Text,
        get: |link| text(&link.missing),
        set: |link, value| {
            link.missing = value.to_string();
            Ok(())
        },
    },
    FieldSpec {
        key: "clustering_pattern_field_path",
        kind: FieldKind::Text,
        get: |link| text(&link.clustering_pattern_field_path),
        set: |link, value| {
            link.clustering_pattern_field_path = value.to_string();
            Ok(())
        },
    },
    FieldSpec {
        key: "messageDisplay",
        kind: FieldKind::Text,
        get: |link| text(&link.message_display),
        set: |link, value| {
            link.message_display = value.to_string();
            Ok(())
        },
    },
    FieldSpec {
        key: "stream_sort",
        kind: FieldKind::Text,
        get: |link| text(&link.stream_sort),
        set: |link, value| {
            link.stream_sort = value.to_string();
            Ok(())
        },
    },
    FieldSpec {
        key: "live",
        kind: FieldKind::Boolean,
        get: |link| Some(link.live.to_string()),
        set: |link, value| {
            link.live = value.parse()?;
            Ok(())
        },
    },
    FieldSpec {
        key: "top_n",
        kind: FieldKind::Integer,
        get: |link| link.top_n.map(|n| n.to_string()),
        set: |link, value| {
            link.top_n = Some(value.parse()?);
            Ok(())
        },
    },
    FieldSpec {
        key: "top_o",
        kind: FieldKind::Text,
        get: |link| text(&link.top_o),
        set: |link, value| {
            link.top_o = value.to_string();
            Ok(())
        },
    },
    FieldSpec {
        key: "cols",
        kind: FieldKind::List,
        get: |link| list(&link.columns),
        set: |link, value| {
            if !value.is_empty() {
                link.columns = value.split(',').map(str::to_string).collect();
            }
            Ok(())
        },
    },
    FieldSpec {
        key: "refresh_mode",
        kind: FieldKind::Text,
        get: |link| text(&link.refresh_mode),
        set: |link, value| {
            link.refresh_mode = value.to_string();
            Ok(())
        },
    },
    FieldSpec {
        key: "from_ts",
        kind: FieldKind::Time,
        get: |link| text(&link.from_ts),
        set: |link, value| {
            link.from_ts = value.to_string();
            Ok(())
        },
    },
    FieldSpec {
        key: "to_ts",
        kind: FieldKind::Time,
        get: |link| text(&link.to_ts),
        set: |link, value| {
            link.to_ts = value.to_string();
            Ok(())
        },
    },
    FieldSpec {
        key: "fromUser",
        kind: FieldKind::Text,
        get: |link| text(&link.from_user),
        set: |link, value| {
            link.from_user = value.to_string();
            Ok(())
        },
    },
];

/// Historical key spellings accepted on decode. The canonical spelling wins
/// whenever both appear, and only the canonical spelling is emitted.
pub(crate) static LOGS_ALIASES: &[(&str, &str)] = &[("message_display", "messageDisplay")];

pub(crate) static TRACE_FIELDS: &[FieldSpec<TraceLink>] = &[
    FieldSpec {
        key: "spanID",
        kind: FieldKind::Text,
        get: |link| text(&link.span_id),
        set: |link, value| {
            link.span_id = value.to_string();
            Ok(())
        },
    },
    FieldSpec {
        key: "graphType",
        kind: FieldKind::Text,
        get: |link| text(&link.graph_type),
        set: |link, value| {
            link.graph_type = value.to_string();
            Ok(())
        },
    },
    FieldSpec {
        key: "panel_tab",
        kind: FieldKind::Text,
        get: |link| text(&link.panel_tab),
        set: |link, value| {
            link.panel_tab = value.to_string();
            Ok(())
        },
    },
    FieldSpec {
        key: "shouldShowLegend",
        kind: FieldKind::Boolean,
        get: |link| Some(link.should_show_legend.to_string()),
        set: |link, value| {
            link.should_show_legend = value.parse()?;
            Ok(())
        },
    },
    FieldSpec {
        key: "sort",
        kind: FieldKind::Text,
        get: |link| text(&link.sort),
        set: |link, value| {
            link.sort = value.to_string();
            Ok(())
        },
    },
    FieldSpec {
        key: "timeHint",
        kind: FieldKind::Text,
        get: |link| text(&link.time_hint),
        set: |link, value| {
            link.time_hint = value.to_string();
            Ok(())
        },
    },
];

pub(crate) static TRACE_ALIASES: &[(&str, &str)] = &[];

/// Looks up a field by its canonical query key.
pub(crate) fn find_field<'a, T>(fields: &'a [FieldSpec<T>], key: &str) -> Option<&'a FieldSpec<T>> {
    fields.iter().find(|spec| spec.key == key)
}

/// Resolves a historical key spelling to its canonical key.
pub(crate) fn canonical_key(
    aliases: &'static [(&'static str, &'static str)],
    key: &str,
) -> Option<&'static str> {
    aliases
        .iter()
        .find(|(alias, _)| *alias == key)
        .map(|(_, canonical)| *canonical)
}

//! Filter compiler: routes each descriptor into one of three clause buckets.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::warn;

/// Operator of a single filter descriptor.
///
/// Unknown wire values are kept as `Unsupported` so they can be reported and
/// skipped instead of failing the whole request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FilterKind {
    Contains,
    ContainsNot,
    Unsupported(String),
}

impl From<String> for FilterKind {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "contains" => Self::Contains,
            "contains_not" => Self::ContainsNot,
            _ => Self::Unsupported(raw),
        }
    }
}

impl From<FilterKind> for String {
    fn from(kind: FilterKind) -> Self {
        match kind {
            FilterKind::Contains => "contains".into(),
            FilterKind::ContainsNot => "contains_not".into(),
            FilterKind::Unsupported(raw) => raw,
        }
    }
}

/// One user-specified field/operator/value constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterDescriptor {
    pub field: String,
    pub filter: FilterKind,
    pub value: String,
}

impl FilterDescriptor {
    pub fn new(field: impl Into<String>, filter: FilterKind, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            filter,
            value: value.into(),
        }
    }
}

/// Output of [`compile_filters`].
///
/// `and_not_filters` holds positive clauses; the assembler negates them by
/// placing them under `must_not`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompiledFilters {
    pub and_filters: Vec<Value>,
    pub and_not_filters: Vec<Value>,
    pub or_filters: Vec<Value>,
}

impl CompiledFilters {
    pub fn is_empty(&self) -> bool {
        self.and_filters.is_empty() && self.and_not_filters.is_empty() && self.or_filters.is_empty()
    }
}

/// Phrase match of `value` against `field`.
pub fn contains_clause(descriptor: &FilterDescriptor) -> Value {
    json!({ "match_phrase": { descriptor.field.as_str(): descriptor.value } })
}

/// Negated phrase match, used inside the OR bucket.
pub fn not_contains_clause(descriptor: &FilterDescriptor) -> Value {
    json!({ "bool": { "must_not": [contains_clause(descriptor)] } })
}

/// Compile descriptors into AND / AND-NOT / OR buckets.
///
/// With `is_or` set, both operators land in `or_filters` (the negated one
/// wrapped in `must_not`). Otherwise `contains` goes to `and_filters` and
/// `contains_not` to `and_not_filters`. Unsupported operators are skipped.
pub fn compile_filters(descriptors: &[FilterDescriptor], is_or: bool) -> CompiledFilters {
    let mut compiled = CompiledFilters::default();

    for descriptor in descriptors {
        match (&descriptor.filter, is_or) {
            (FilterKind::Contains, true) => compiled.or_filters.push(contains_clause(descriptor)),
            (FilterKind::ContainsNot, true) => {
                compiled.or_filters.push(not_contains_clause(descriptor))
            }
            (FilterKind::Contains, false) => {
                compiled.and_filters.push(contains_clause(descriptor))
            }
            (FilterKind::ContainsNot, false) => {
                compiled.and_not_filters.push(contains_clause(descriptor))
            }
            (FilterKind::Unsupported(raw), _) => {
                warn!("Unsupported filter type {} on field {}", raw, descriptor.field);
            }
        }
    }

    compiled
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<FilterDescriptor> {
        vec![
            FilterDescriptor::new("title", FilterKind::Contains, "harbour"),
            FilterDescriptor::new("body", FilterKind::ContainsNot, "strike"),
            FilterDescriptor::new("author", FilterKind::Unsupported("starts_with".into()), "J"),
            FilterDescriptor::new("title", FilterKind::Contains, "harbour"),
        ]
    }

    #[test]
    fn test_and_mode_buckets() {
        let compiled = compile_filters(&sample(), false);
        assert_eq!(compiled.and_filters.len(), 2);
        assert_eq!(compiled.and_not_filters.len(), 1);
        assert!(compiled.or_filters.is_empty());
        assert_eq!(
            compiled.and_not_filters[0],
            json!({"match_phrase": {"body": "strike"}})
        );
    }

    #[test]
    fn test_or_mode_buckets() {
        let compiled = compile_filters(&sample(), true);
        assert!(compiled.and_filters.is_empty());
        assert!(compiled.and_not_filters.is_empty());
        assert_eq!(compiled.or_filters.len(), 3);
        assert_eq!(
            compiled.or_filters[1],
            json!({"bool": {"must_not": [{"match_phrase": {"body": "strike"}}]}})
        );
    }

    #[test]
    fn test_duplicates_are_kept() {
        let compiled = compile_filters(&sample(), false);
        assert_eq!(compiled.and_filters[0], compiled.and_filters[1]);
    }

    #[test]
    fn test_unsupported_never_emitted() {
        let only_bad = vec![FilterDescriptor::new(
            "author",
            FilterKind::Unsupported("regex".into()),
            ".*",
        )];
        assert!(compile_filters(&only_bad, false).is_empty());
        assert!(compile_filters(&only_bad, true).is_empty());
    }

    #[test]
    fn test_empty_input() {
        assert!(compile_filters(&[], true).is_empty());
        assert!(compile_filters(&[], false).is_empty());
    }

    #[test]
    fn test_kind_from_wire() {
        let d: FilterDescriptor =
            serde_json::from_str(r#"{"field": "f", "filter": "contains_not", "value": "v"}"#)
                .unwrap();
        assert_eq!(d.filter, FilterKind::ContainsNot);

        let d: FilterDescriptor =
            serde_json::from_str(r#"{"field": "f", "filter": "near", "value": "v"}"#).unwrap();
        assert_eq!(d.filter, FilterKind::Unsupported("near".into()));
        assert_eq!(serde_json::to_value(&d).unwrap()["filter"], "near");
    }
}

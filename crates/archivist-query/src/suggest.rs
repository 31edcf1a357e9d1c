//! Tag suggestions: prefix lookup plus a terms aggregation over one tag
//! category, filtered client-side.

use serde_json::{json, Value};

use crate::tags::TagType;

pub const MAX_SUGGESTIONS: usize = 25;
const AGGREGATION_SIZE: u64 = 1000;
const AGGREGATION_NAME: &str = "suggested_tags";

/// Search body for suggestions of `tag_type` starting with `prefix`.
pub fn suggestion_query(tag_type: TagType, prefix: &str) -> Value {
    let field = tag_type.field();
    json!({
        "query": {
            "prefix": {
                field.as_str(): { "value": prefix.to_lowercase() }
            }
        },
        "aggs": {
            AGGREGATION_NAME: {
                "terms": {
                    "field": format!("{}.keyword", field),
                    "size": AGGREGATION_SIZE,
                }
            }
        },
        "size": 0
    })
}

/// Pull bucket keys out of a suggestion response, keeping those that start
/// with `prefix` (case-insensitive), in bucket order, at most
/// [`MAX_SUGGESTIONS`].
pub fn collect_suggestions(response: &Value, prefix: &str) -> Vec<String> {
    let prefix = prefix.to_lowercase();
    response["aggregations"][AGGREGATION_NAME]["buckets"]
        .as_array()
        .map(|buckets| {
            buckets
                .iter()
                .filter_map(|b| b["key"].as_str())
                .filter(|key| key.to_lowercase().starts_with(&prefix))
                .take(MAX_SUGGESTIONS)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

//! Query assembler: combines compiled filter buckets with free text,
//! pagination and sorting into one search body.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::filter::{CompiledFilters, FilterDescriptor};

/// Page size used when a page number is given without a size.
pub const DEFAULT_PAGE_SIZE: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortDirective {
    pub field: String,
    #[serde(default = "default_order")]
    pub order: SortOrder,
}

fn default_order() -> SortOrder {
    SortOrder::Desc
}

/// Body of `POST /search`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterRequest {
    #[serde(default)]
    pub filters: Vec<FilterDescriptor>,
    /// Single combination mode for every descriptor in the request.
    #[serde(default)]
    pub is_or: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_text: Option<String>,
    /// Zero-based page number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<Vec<SortDirective>>,
}

/// Build the full search body for `request` from its compiled buckets.
///
/// AND clauses, the OR group and the free-text clause all sit under
/// `bool.must`; AND-NOT clauses sit under `bool.must_not`. With no clause at
/// all the query is `match_all`.
pub fn assemble_query(request: &FilterRequest, compiled: &CompiledFilters) -> Value {
    let mut must: Vec<Value> = compiled.and_filters.clone();

    if !compiled.or_filters.is_empty() {
        must.push(json!({
            "bool": {
                "should": compiled.or_filters,
                "minimum_should_match": 1,
            }
        }));
    }

    if let Some(text) = request.query_text.as_deref().map(str::trim) {
        if !text.is_empty() {
            must.push(json!({
                "simple_query_string": {
                    "query": text,
                    "default_operator": "and",
                }
            }));
        }
    }

    let query = if must.is_empty() && compiled.and_not_filters.is_empty() {
        json!({ "match_all": {} })
    } else {
        let mut bool_query = Map::new();
        if !must.is_empty() {
            bool_query.insert("must".into(), Value::Array(must));
        }
        if !compiled.and_not_filters.is_empty() {
            bool_query.insert(
                "must_not".into(),
                Value::Array(compiled.and_not_filters.clone()),
            );
        }
        json!({ "bool": bool_query })
    };

    let mut body = Map::new();
    body.insert("query".into(), query);

    let size = match (request.page, request.size) {
        (_, Some(size)) => Some(size),
        (Some(_), None) => Some(DEFAULT_PAGE_SIZE),
        (None, None) => None,
    };
    if let Some(size) = size {
        let page = request.page.unwrap_or(0);
        body.insert("from".into(), json!(page.saturating_mul(size)));
        body.insert("size".into(), json!(size));
    }

    if let Some(sort) = request.sort.as_ref().filter(|s| !s.is_empty()) {
        let directives: Vec<Value> = sort
            .iter()
            .map(|d| json!({ d.field.as_str(): { "order": d.order } }))
            .collect();
        body.insert("sort".into(), Value::Array(directives));
    }

    Value::Object(body)
}

/// Single-document lookup by `_id`.
pub fn resource_query(id: &str) -> Value {
    json!({ "query": { "match": { "_id": id } } })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{compile_filters, FilterKind};

    fn request(is_or: bool) -> FilterRequest {
        FilterRequest {
            filters: vec![
                FilterDescriptor::new("title", FilterKind::Contains, "harbour"),
                FilterDescriptor::new("body", FilterKind::ContainsNot, "strike"),
            ],
            is_or,
            ..Default::default()
        }
    }

    fn build(request: &FilterRequest) -> Value {
        assemble_query(request, &compile_filters(&request.filters, request.is_or))
    }

    #[test]
    fn test_empty_request_is_match_all() {
        let body = build(&FilterRequest::default());
        assert_eq!(body, json!({"query": {"match_all": {}}}));
    }

    #[test]
    fn test_and_mode_layout() {
        let body = build(&request(false));
        let bool_query = &body["query"]["bool"];
        assert_eq!(bool_query["must"], json!([{"match_phrase": {"title": "harbour"}}]));
        assert_eq!(bool_query["must_not"], json!([{"match_phrase": {"body": "strike"}}]));
    }

    #[test]
    fn test_or_mode_layout() {
        let body = build(&request(true));
        let must = body["query"]["bool"]["must"].as_array().unwrap();
        assert_eq!(must.len(), 1);
        assert_eq!(must[0]["bool"]["minimum_should_match"], 1);
        assert_eq!(must[0]["bool"]["should"].as_array().unwrap().len(), 2);
        assert!(body["query"]["bool"].get("must_not").is_none());
    }

    #[test]
    fn test_free_text_pagination_and_sort() {
        let mut req = request(false);
        req.query_text = Some("  dock workers ".into());
        req.page = Some(2);
        req.size = Some(25);
        req.sort = Some(vec![SortDirective {
            field: "date".into(),
            order: SortOrder::Asc,
        }]);
        let body = build(&req);

        let must = body["query"]["bool"]["must"].as_array().unwrap();
        assert_eq!(must[1]["simple_query_string"]["query"], "dock workers");
        assert_eq!(body["from"], 50);
        assert_eq!(body["size"], 25);
        assert_eq!(body["sort"], json!([{"date": {"order": "asc"}}]));
    }

    #[test]
    fn test_blank_text_only_is_match_all() {
        let req = FilterRequest {
            query_text: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(build(&req)["query"], json!({"match_all": {}}));
    }

    #[test]
    fn test_page_without_size_uses_default() {
        let req = FilterRequest {
            page: Some(3),
            ..Default::default()
        };
        let body = build(&req);
        assert_eq!(body["from"], 30);
        assert_eq!(body["size"], DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_wire_names() {
        let req: FilterRequest = serde_json::from_value(json!({
            "filters": [{"field": "title", "filter": "contains", "value": "x"}],
            "isOr": true,
            "queryText": "x",
        }))
        .unwrap();
        assert!(req.is_or);
        assert_eq!(req.query_text.as_deref(), Some("x"));
        assert!(req.page.is_none());
    }

    #[test]
    fn test_resource_query() {
        assert_eq!(
            resource_query("abc"),
            json!({"query": {"match": {"_id": "abc"}}})
        );
    }
}

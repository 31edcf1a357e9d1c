//! Tag mutation builder: partial-update bodies that add or remove one value
//! from a document's `tags.<type>` list.

use std::fmt;

use archivist_core::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// The four tag categories a document carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagType {
    Locations,
    People,
    Orgs,
    Other,
}

impl TagType {
    pub const ALL: [TagType; 4] = [Self::Locations, Self::People, Self::Orgs, Self::Other];

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "locations" => Some(Self::Locations),
            "people" => Some(Self::People),
            "orgs" => Some(Self::Orgs),
            "other" => Some(Self::Other),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Locations => "locations",
            Self::People => "people",
            Self::Orgs => "orgs",
            Self::Other => "other",
        }
    }

    /// Document field holding this category, e.g. `tags.people`.
    pub fn field(&self) -> String {
        format!("tags.{}", self.as_str())
    }
}

impl fmt::Display for TagType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated request to add or remove one tag on one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagMutation {
    pub tag_type: TagType,
    pub tag_value: String,
    pub resource_id: String,
}

impl TagMutation {
    /// Validate raw request fields.
    pub fn validate(
        tag_type: Option<&str>,
        tag_value: Option<&str>,
        resource_id: Option<&str>,
    ) -> Result<Self> {
        let tag_type = tag_type
            .and_then(TagType::parse)
            .ok_or_else(|| Error::Validation("unknown tag type".into()))?;
        let tag_value = match tag_value {
            Some(v) if !v.is_empty() => v.to_string(),
            _ => return Err(Error::Validation("tag value is empty".into())),
        };
        let resource_id = match resource_id {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => return Err(Error::Validation("resource id is missing".into())),
        };
        Ok(Self {
            tag_type,
            tag_value,
            resource_id,
        })
    }

    pub fn add_body(&self) -> Value {
        build_add_tag(self.tag_type, &self.tag_value)
    }

    pub fn remove_body(&self) -> Value {
        build_remove_tag(self.tag_type, &self.tag_value)
    }
}

const ADD_TAG_SCRIPT: &str = "\
if (ctx._source.tags == null) { ctx._source.tags = [:]; } \
if (ctx._source.tags[params.type] == null) { ctx._source.tags[params.type] = []; } \
if (!ctx._source.tags[params.type].contains(params.value)) { ctx._source.tags[params.type].add(params.value); }";

const REMOVE_TAG_SCRIPT: &str = "\
if (ctx._source.tags != null && ctx._source.tags[params.type] != null) { \
ctx._source.tags[params.type].removeIf(t -> t == params.value); }";

fn script_body(source: &str, tag_type: TagType, tag_value: &str) -> Value {
    json!({
        "script": {
            "source": source,
            "lang": "painless",
            "params": {
                "type": tag_type.as_str(),
                "value": tag_value,
            }
        }
    })
}

/// Append `tag_value` to `tags.<tag_type>` unless already present.
pub fn build_add_tag(tag_type: TagType, tag_value: &str) -> Value {
    script_body(ADD_TAG_SCRIPT, tag_type, tag_value)
}

/// Remove every `tag_value` entry from `tags.<tag_type>`; a no-op when absent.
pub fn build_remove_tag(tag_type: TagType, tag_value: &str) -> Value {
    script_body(REMOVE_TAG_SCRIPT, tag_type, tag_value)
}

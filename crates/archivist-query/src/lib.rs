//! Query building for the archive search gateway.
//!
//! Turns user-facing filter descriptions, tag edits and suggestion lookups
//! into Elasticsearch request bodies. Nothing here performs I/O.

pub mod filter;
pub mod query;
pub mod suggest;
pub mod tags;

pub use filter::{compile_filters, CompiledFilters, FilterDescriptor, FilterKind};
pub use query::{assemble_query, resource_query, FilterRequest, SortDirective, SortOrder};
pub use suggest::{collect_suggestions, suggestion_query, MAX_SUGGESTIONS};
pub use tags::{build_add_tag, build_remove_tag, TagMutation, TagType};

//! Load mapping generation and load query composition for moving Salesforce
//! data from a local staging database into an org.
//!
//! - [`mapping`] turns extract declarations into an ordered load mapping
//! - [`load`] composes the SQL that reads each object's staging rows
//! - [`sql`] models the staging database and the org schema

pub mod error;
pub mod load;
pub mod mapping;
pub mod sql;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::{CatalogMiss, MappingError, MappingResult};
pub use load::{compose_load_query, load_query_sql, LoadQueryConfig};
pub use mapping::{
    classify_and_filter_lookups, create_load_mapping, discover_dependencies, ClassifiedDeclaration,
    Declaration, DeclarationOrderer, DependencyEdge, DependencyOrderer, LoadStep, LoadingRule,
    MappingFile, MappingLookup, OrderedEdgeSet,
};

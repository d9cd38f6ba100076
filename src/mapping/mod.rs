//! Mapping generation from extract declarations
//!
//! The pipeline runs in three pure stages:
//! 1. [`classify_and_filter_lookups`] splits declared fields into plain
//!    fields and lookups, keeping only lookups into exported objects
//! 2. [`discover_dependencies`] folds the lookups into an ordered,
//!    deduplicated edge set
//! 3. [`build_mapping_steps`] emits one identity-mapped [`LoadStep`] per
//!    object
//!
//! The edge set and steps are then handed to a [`DependencyOrderer`], which
//! decides load order and lookup deferral.

pub mod classify;
pub mod declaration;
pub mod dependencies;
pub mod file;
pub mod step;

pub use classify::{classify, classify_and_filter_lookups, RECORD_TYPE_ID};
pub use declaration::{ClassifiedDeclaration, Declaration};
pub use dependencies::{discover_dependencies, DependencyEdge, OrderedEdgeSet};
pub use file::{create_load_mapping, DeclarationOrderer, DependencyOrderer, LoadingRule, MappingFile};
pub use step::{build_mapping_steps, LoadStep, MappingLookup};

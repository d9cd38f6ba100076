//! Staging database modeling and SQL generation
//!
//! This module holds everything that knows about the local staging
//! database and the org schema behind it:
//!
//! - [`schema`]: org schema describes (objects, fields, reference targets)
//! - [`metadata`]: the catalog of staging, id-mapping and record type tables
//! - [`query`]: load query plans and their rendering
//! - [`dialect`]: SQLite and PostgreSQL differences
//! - [`ddl`]: CREATE/DROP statements for a catalog
//!
//! # Example
//!
//! ```rust
//! use sfbulkmap::sql::{DdlGenerator, SqlDialect, StoreMetadata, TableDef};
//!
//! let catalog = StoreMetadata::new()
//!     .with_table(TableDef::new("Account").with_primary_key("id").with_column("Name"))
//!     .with_table(TableDef::id_mapping("Account"));
//!
//! let ddl = DdlGenerator::new(SqlDialect::Sqlite).generate_catalog(&catalog);
//! assert!(ddl.contains("CREATE TABLE \"Account_sf_ids\""));
//! ```

pub mod ddl;
pub mod dialect;
pub mod metadata;
pub mod query;
pub mod schema;
pub mod standard_objects;

// Re-export main types
pub use ddl::DdlGenerator;
pub use dialect::{get_dialect, PostgresDialect, SqlDialect, SqlDialectImpl, SqliteDialect};
pub use metadata::{id_table_name, StoreMetadata, TableDef};
pub use query::{AliasAllocator, Expr, Join, QueryPlan, TableRef};
pub use schema::{FieldDescribe, SObjectDescribe, SalesforceSchema, SchemaView};
pub use standard_objects::create_sales_cloud_schema;

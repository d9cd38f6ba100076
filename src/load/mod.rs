//! Load query composition
//!
//! A load query selects one object's staging rows and shapes them for
//! insertion into the destination org. The base query is extended by a
//! fixed pipeline of [`QueryExtender`]s:
//!
//! - [`LookupJoinExtender`] resolves insert-time lookups to new org ids
//! - [`RecordTypeExtender`] maps record type ids by developer name
//! - [`UserFilterExtender`] applies the mapping's filters
//! - [`PersonAccountExtender`] drops person-account contacts
//!
//! All outer joins are applied before any column or filter, so every
//! extender may refer to aliases introduced by any other.

pub mod extender;
pub mod filters;
pub mod lookups;
pub mod person_accounts;
pub mod record_types;

pub use extender::{build_query, QueryExtender};
pub use filters::UserFilterExtender;
pub use lookups::LookupJoinExtender;
pub use person_accounts::{PersonAccountExtender, IS_PERSON_ACCOUNT};
pub use record_types::RecordTypeExtender;

use log::{debug, info};

use crate::error::MappingResult;
use crate::mapping::LoadStep;
use crate::sql::dialect::{get_dialect, SqlDialect};
use crate::sql::metadata::{StoreMetadata, TableDef};
use crate::sql::query::{AliasAllocator, QueryPlan};

/// Settings for composing load queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadQueryConfig {
    /// Dialect of the staging database
    pub dialect: SqlDialect,
    /// Whether the destination org has person accounts enabled
    pub person_accounts_enabled: bool,
}

impl LoadQueryConfig {
    pub fn new(dialect: SqlDialect) -> Self {
        Self {
            dialect,
            ..Default::default()
        }
    }

    pub fn with_person_accounts(mut self, enabled: bool) -> Self {
        self.person_accounts_enabled = enabled;
        self
    }
}

/// Compose the query selecting `model`'s staging rows for `step`.
///
/// Fails without producing a query when a table the step needs is missing
/// from `metadata`, or a mapped column is missing from `model`.
pub fn compose_load_query(
    step: &LoadStep,
    metadata: &StoreMetadata,
    model: &TableDef,
    config: &LoadQueryConfig,
) -> MappingResult<QueryPlan> {
    let mut aliases = AliasAllocator::new();
    aliases.reserve(&model.name);

    let query = QueryPlan::base(step, model)?;

    let mut extenders: Vec<Box<dyn QueryExtender>> = vec![
        Box::new(LookupJoinExtender::new(step, metadata, model, &mut aliases)?),
        Box::new(RecordTypeExtender::new(step, metadata, model)?),
        Box::new(UserFilterExtender::new(step)),
    ];
    if step.sf_object == "Contact"
        && config.person_accounts_enabled
        && model.has_column(IS_PERSON_ACCOUNT)
    {
        extenders.push(Box::new(PersonAccountExtender::new(&step.sf_object, model)));
    }

    let query = build_query(query, &extenders);
    debug_assert!(
        query.undefined_aliases().is_empty(),
        "load query refers to undefined aliases: {:?}",
        query.undefined_aliases()
    );

    info!(
        "composed load query for {}: {} columns, {} joins, {} filters",
        step.sf_object,
        query.columns.len(),
        query.joins.len(),
        query.filters.len()
    );
    Ok(query)
}

/// [`compose_load_query`] rendered in the configured dialect
pub fn load_query_sql(
    step: &LoadStep,
    metadata: &StoreMetadata,
    model: &TableDef,
    config: &LoadQueryConfig,
) -> MappingResult<String> {
    let query = compose_load_query(step, metadata, model, config)?;
    let sql = query.to_sql(get_dialect(config.dialect).as_ref());
    debug!("{}", sql);
    Ok(sql)
}

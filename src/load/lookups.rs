//! Resolve insert-time lookups through the target objects' id-mapping tables

use log::debug;

use crate::error::MappingResult;
use crate::mapping::LoadStep;
use crate::sql::metadata::{
    id_table_name, StoreMetadata, TableDef, LEGACY_ID_COLUMN, NEW_ID_COLUMN,
};
use crate::sql::query::{AliasAllocator, Expr, Join, TableRef};

use super::extender::{fragment, QueryExtender};

/// Adds one resolved-id column and one outer join per non-deferred lookup.
///
/// Every lookup gets its own alias of the target's id-mapping table, so two
/// lookups into the same object (or a lookup back into the step's own
/// object) never share a table reference. The join is outer so rows with a
/// null lookup still load.
#[derive(Debug, Clone)]
pub struct LookupJoinExtender {
    columns: Option<Vec<Expr>>,
    joins: Option<Vec<Join>>,
}

impl LookupJoinExtender {
    pub fn new(
        step: &LoadStep,
        metadata: &StoreMetadata,
        model: &TableDef,
        aliases: &mut AliasAllocator,
    ) -> MappingResult<Self> {
        let mut columns = Vec::new();
        let mut joins = Vec::new();

        for (name, lookup) in step.insert_lookups() {
            let id_table = metadata.table(&id_table_name(&lookup.table))?;
            let key_field = lookup.key_field_in(name, model)?;
            let alias = aliases.next_alias();
            debug!(
                "lookup {}.{} -> {} as {}",
                step.sf_object, name, id_table.name, alias
            );

            columns.push(Expr::column(&alias, NEW_ID_COLUMN));
            joins.push(Join::new(
                TableRef::aliased(&id_table.name, &alias),
                Expr::column(&alias, LEGACY_ID_COLUMN)
                    .eq(Expr::column(&model.name, key_field).cast_text()),
            ));
        }

        Ok(Self {
            columns: fragment(columns),
            joins: fragment(joins),
        })
    }
}

impl QueryExtender for LookupJoinExtender {
    fn name(&self) -> &'static str {
        "lookups"
    }

    fn columns_to_add(&self) -> Option<&[Expr]> {
        self.columns.as_deref()
    }

    fn outer_joins_to_add(&self) -> Option<&[Join]> {
        self.joins.as_deref()
    }
}

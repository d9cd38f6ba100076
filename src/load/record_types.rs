//! Translate source-org record type ids to destination-org ids

use crate::error::{MappingError, MappingResult};
use crate::mapping::{LoadStep, RECORD_TYPE_ID};
use crate::sql::metadata::{
    StoreMetadata, TableDef, DEVELOPER_NAME_COLUMN, RECORD_TYPE_COLUMN, RECORD_TYPE_ID_COLUMN,
};
use crate::sql::query::{Expr, Join, TableRef};

use super::extender::{fragment, QueryExtender};

/// Maps `RecordTypeId` through the record type mapping tables by developer
/// name, and restricts rows to the step's record type when one is set.
#[derive(Debug, Clone)]
pub struct RecordTypeExtender {
    columns: Option<Vec<Expr>>,
    joins: Option<Vec<Join>>,
    filters: Option<Vec<Expr>>,
}

impl RecordTypeExtender {
    pub fn new(step: &LoadStep, metadata: &StoreMetadata, model: &TableDef) -> MappingResult<Self> {
        let mut columns = Vec::new();
        let mut joins = Vec::new();
        let mut filters = Vec::new();

        if let Some(rt_column) = step.fields.get(RECORD_TYPE_ID) {
            let source = record_type_table(metadata, step.source_record_type_table())?;
            let destination = record_type_table(metadata, step.destination_record_type_table())?;
            if !model.has_column(rt_column) {
                return Err(MappingError::UnknownColumn {
                    table: model.name.clone(),
                    column: rt_column.clone(),
                });
            }

            columns.push(Expr::column(&destination.name, RECORD_TYPE_ID_COLUMN));
            joins.push(Join::new(
                TableRef::new(&source.name),
                Expr::column(&source.name, RECORD_TYPE_ID_COLUMN)
                    .eq(Expr::column(&model.name, rt_column)),
            ));
            joins.push(Join::new(
                TableRef::new(&destination.name),
                Expr::column(&destination.name, DEVELOPER_NAME_COLUMN)
                    .eq(Expr::column(&source.name, DEVELOPER_NAME_COLUMN)),
            ));
        }

        if let Some(record_type) = &step.record_type {
            if model.has_column(RECORD_TYPE_COLUMN) {
                filters.push(
                    Expr::column(&model.name, RECORD_TYPE_COLUMN).eq(Expr::text(record_type)),
                );
            }
        }

        Ok(Self {
            columns: fragment(columns),
            joins: fragment(joins),
            filters: fragment(filters),
        })
    }
}

fn record_type_table(metadata: &StoreMetadata, name: String) -> MappingResult<&TableDef> {
    metadata
        .table(&name)
        .map_err(|source| MappingError::MissingRecordTypeMapping { table: name, source })
}

impl QueryExtender for RecordTypeExtender {
    fn name(&self) -> &'static str {
        "record_types"
    }

    fn columns_to_add(&self) -> Option<&[Expr]> {
        self.columns.as_deref()
    }

    fn filters_to_add(&self) -> Option<&[Expr]> {
        self.filters.as_deref()
    }

    fn outer_joins_to_add(&self) -> Option<&[Join]> {
        self.joins.as_deref()
    }
}

//! The query extender abstraction and the pipeline that applies extenders

use log::debug;

use crate::sql::query::{Expr, Join, QueryPlan};

/// Contributes columns, outer joins and filters to a load query.
///
/// Fragments are computed once, when the extender is built, and never
/// change afterwards. `None` means the extender has nothing to add.
pub trait QueryExtender {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    fn columns_to_add(&self) -> Option<&[Expr]> {
        None
    }

    fn filters_to_add(&self) -> Option<&[Expr]> {
        None
    }

    fn outer_joins_to_add(&self) -> Option<&[Join]> {
        None
    }
}

/// Apply extenders to a query: every extender's outer joins first, then
/// every extender's columns, then every extender's filters, each stage in
/// extender order. Columns and filters may reference aliases introduced by
/// any extender's joins.
pub fn build_query(mut query: QueryPlan, extenders: &[Box<dyn QueryExtender>]) -> QueryPlan {
    for extender in extenders {
        if let Some(joins) = extender.outer_joins_to_add() {
            debug!("{}: {} outer joins", extender.name(), joins.len());
            for join in joins {
                query.outer_join(join.clone());
            }
        }
    }

    for extender in extenders {
        if let Some(columns) = extender.columns_to_add() {
            debug!("{}: {} columns", extender.name(), columns.len());
            query.add_columns(columns.iter().cloned());
        }
    }

    for extender in extenders {
        if let Some(filters) = extender.filters_to_add() {
            debug!("{}: {} filters", extender.name(), filters.len());
            query.add_filters(filters.iter().cloned());
        }
    }

    query
}

/// `None` for an empty fragment
pub(crate) fn fragment<T>(items: Vec<T>) -> Option<Vec<T>> {
    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}

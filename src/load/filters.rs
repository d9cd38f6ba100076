//! User-declared row filters

use crate::mapping::LoadStep;
use crate::sql::query::Expr;

use super::extender::{fragment, QueryExtender};

/// Passes each mapping filter through as opaque SQL
#[derive(Debug, Clone)]
pub struct UserFilterExtender {
    filters: Option<Vec<Expr>>,
}

impl UserFilterExtender {
    pub fn new(step: &LoadStep) -> Self {
        Self {
            filters: fragment(step.filters.iter().map(Expr::raw).collect()),
        }
    }
}

impl QueryExtender for UserFilterExtender {
    fn name(&self) -> &'static str {
        "filters"
    }

    fn filters_to_add(&self) -> Option<&[Expr]> {
        self.filters.as_deref()
    }
}

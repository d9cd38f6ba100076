//! Keep person-account contacts out of Contact loads

use crate::sql::metadata::TableDef;
use crate::sql::query::Expr;

use super::extender::QueryExtender;

/// Staging column flagging person-account rows
pub const IS_PERSON_ACCOUNT: &str = "IsPersonAccount";

/// Person-account contacts are created by the org together with their
/// account, so a Contact load only inserts business contacts.
///
/// Only rows whose flag is case-insensitively `true` are dropped; null and
/// empty flags load as business contacts.
#[derive(Debug, Clone)]
pub struct PersonAccountExtender {
    filters: Vec<Expr>,
}

impl PersonAccountExtender {
    /// # Panics
    ///
    /// Panics when `sf_object` is not `Contact`; callers only build this
    /// extender for Contact steps.
    pub fn new(sf_object: &str, model: &TableDef) -> Self {
        assert_eq!(
            sf_object, "Contact",
            "person account filter only applies to Contact"
        );
        Self {
            filters: vec![is_business_contact(&model.name)],
        }
    }
}

fn is_business_contact(table: &str) -> Expr {
    let flag = Expr::column(table, IS_PERSON_ACCOUNT);
    flag.clone()
        .is_null()
        .or(flag.lower().not_eq(Expr::text("true")))
}

impl QueryExtender for PersonAccountExtender {
    fn name(&self) -> &'static str {
        "person_accounts"
    }

    fn filters_to_add(&self) -> Option<&[Expr]> {
        Some(&self.filters)
    }
}

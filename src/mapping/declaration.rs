//! Extract declarations and their lookup-classified form

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Which fields of one object to move from the extract side to the load side
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Declaration {
    pub sf_object: String,
    #[serde(default)]
    pub fields: Vec<String>,
    /// Record type developer name the extracted rows are restricted to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_type: Option<String>,
    /// Raw SQL predicates applied to staging rows at load time
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<String>,
}

impl Declaration {
    pub fn new<I, S>(sf_object: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            sf_object: sf_object.into(),
            fields: fields.into_iter().map(Into::into).collect(),
            record_type: None,
            filters: Vec::new(),
        }
    }

    pub fn with_record_type(mut self, record_type: impl Into<String>) -> Self {
        self.record_type = Some(record_type.into());
        self
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filters.push(filter.into());
        self
    }
}

/// A declaration whose fields have been split into plain fields and lookups.
///
/// Every target in `lookups` is an object exported by the same run; a lookup
/// with no exported target is not present at all.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClassifiedDeclaration {
    pub sf_object: String,
    /// Plain fields in declaration order
    pub fields: Vec<String>,
    /// Lookup field name -> exported target objects, in declaration order
    pub lookups: IndexMap<String, Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<String>,
}

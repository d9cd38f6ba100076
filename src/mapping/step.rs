//! Load steps: the per-object entries of a load mapping file

use heck::ToSnakeCase;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{MappingError, MappingResult};
use crate::sql::metadata::TableDef;

use super::declaration::ClassifiedDeclaration;

/// A lookup attached to a load step by the dependency orderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingLookup {
    /// The single object this lookup is resolved against
    pub table: String,
    /// Staging column holding the referenced row's legacy id, when it is
    /// not named after the lookup field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_field: Option<String>,
    /// Resolved in an update pass after all inserts instead of at insert time
    #[serde(default)]
    pub after: bool,
}

impl MappingLookup {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            key_field: None,
            after: false,
        }
    }

    pub fn with_key_field(mut self, key_field: impl Into<String>) -> Self {
        self.key_field = Some(key_field.into());
        self
    }

    pub fn deferred(mut self) -> Self {
        self.after = true;
        self
    }

    /// Find the staging column holding this lookup's value.
    ///
    /// Tries the explicit key field, then the lookup name, then the
    /// snake_case form of the first guess used by older staging databases.
    pub fn key_field_in(&self, name: &str, model: &TableDef) -> MappingResult<String> {
        let first = self.key_field.as_deref().unwrap_or(name).to_string();
        let mut guesses = vec![first.clone()];
        if self.key_field.is_some() {
            guesses.push(name.to_string());
        }
        guesses.push(first.to_snake_case());

        guesses
            .iter()
            .find(|guess| model.has_column(guess))
            .cloned()
            .ok_or_else(|| MappingError::UnknownLookupKeyField {
                table: model.name.clone(),
                field: name.to_string(),
                guesses,
            })
    }
}

/// One object's load instructions
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LoadStep {
    pub sf_object: String,
    /// Staging table, when it is not named after the object
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    /// Org field name -> staging column
    #[serde(default)]
    pub fields: IndexMap<String, String>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub lookups: IndexMap<String, MappingLookup>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_type: Option<String>,
}

impl LoadStep {
    pub fn new(sf_object: impl Into<String>) -> Self {
        Self {
            sf_object: sf_object.into(),
            ..Default::default()
        }
    }

    /// Map a field to the staging column of the same name
    pub fn with_field(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.fields.insert(name.clone(), name);
        self
    }

    pub fn with_lookup(mut self, name: impl Into<String>, lookup: MappingLookup) -> Self {
        self.lookups.insert(name.into(), lookup);
        self
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filters.push(filter.into());
        self
    }

    pub fn with_record_type(mut self, record_type: impl Into<String>) -> Self {
        self.record_type = Some(record_type.into());
        self
    }

    pub fn table_name(&self) -> &str {
        self.table.as_deref().unwrap_or(&self.sf_object)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Lookups resolved at insert time
    pub fn insert_lookups(&self) -> impl Iterator<Item = (&String, &MappingLookup)> {
        self.lookups.iter().filter(|(_, lookup)| !lookup.after)
    }

    /// Lookups patched in by a later update pass
    pub fn deferred_lookups(&self) -> impl Iterator<Item = (&String, &MappingLookup)> {
        self.lookups.iter().filter(|(_, lookup)| lookup.after)
    }

    /// Record type mapping table written by the extract step
    pub fn source_record_type_table(&self) -> String {
        format!("{}_rt_mapping", self.sf_object)
    }

    /// Record type mapping table describing the destination org
    pub fn destination_record_type_table(&self) -> String {
        format!("{}_rt_target_mapping", self.sf_object)
    }
}

impl From<&ClassifiedDeclaration> for LoadStep {
    fn from(decl: &ClassifiedDeclaration) -> Self {
        let fields = decl
            .fields
            .iter()
            .chain(decl.lookups.keys())
            .map(|name| (name.clone(), name.clone()))
            .collect();

        // Lookups are attached later by the orderer, once deferral is decided
        Self {
            sf_object: decl.sf_object.clone(),
            table: None,
            fields,
            lookups: IndexMap::new(),
            filters: decl.filters.clone(),
            record_type: decl.record_type.clone(),
        }
    }
}

/// One identity-mapped load step per classified declaration
pub fn build_mapping_steps(decls: &[ClassifiedDeclaration]) -> Vec<LoadStep> {
    decls.iter().map(LoadStep::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steps_carry_lookups_as_fields() {
        let mut decl = ClassifiedDeclaration {
            sf_object: "Contact".to_string(),
            fields: vec!["LastName".to_string()],
            ..Default::default()
        };
        decl.lookups
            .insert("AccountId".to_string(), vec!["Account".to_string()]);

        let steps = build_mapping_steps(&[decl]);
        let fields: Vec<_> = steps[0]
            .fields
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();

        assert_eq!(fields, [("LastName", "LastName"), ("AccountId", "AccountId")]);
        assert!(steps[0].lookups.is_empty());
    }

    #[test]
    fn test_record_type_tables() {
        let step = LoadStep::new("Account");
        assert_eq!(step.source_record_type_table(), "Account_rt_mapping");
        assert_eq!(
            step.destination_record_type_table(),
            "Account_rt_target_mapping"
        );
    }

    #[test]
    fn test_table_name_defaults_to_object() {
        let mut step = LoadStep::new("Account");
        assert_eq!(step.table_name(), "Account");
        step.table = Some("accounts".to_string());
        assert_eq!(step.table_name(), "accounts");
    }

    #[test]
    fn test_insert_and_deferred_lookups() {
        let step = LoadStep::new("Account")
            .with_lookup("ParentId", MappingLookup::new("Account").deferred())
            .with_lookup("OwnerId", MappingLookup::new("User"));

        let insert: Vec<_> = step.insert_lookups().map(|(n, _)| n.as_str()).collect();
        let deferred: Vec<_> = step.deferred_lookups().map(|(n, _)| n.as_str()).collect();
        assert_eq!(insert, ["OwnerId"]);
        assert_eq!(deferred, ["ParentId"]);
    }

    #[test]
    fn test_key_field_guesses() {
        let model = TableDef::new("Contact").with_columns(["id", "account_id", "Owner__c"]);

        let lookup = MappingLookup::new("Account");
        assert_eq!(lookup.key_field_in("AccountId", &model).unwrap(), "account_id");

        let legacy = TableDef::new("Contact").with_columns(["id", "http_server_id"]);
        let lookup = MappingLookup::new("Server__c");
        assert_eq!(lookup.key_field_in("HTTPServerId", &legacy).unwrap(), "http_server_id");

        let explicit = MappingLookup::new("User").with_key_field("Owner__c");
        assert_eq!(explicit.key_field_in("OwnerId", &model).unwrap(), "Owner__c");

        let err = MappingLookup::new("Contact")
            .key_field_in("ReportsToId", &model)
            .unwrap_err();
        assert_eq!(
            err,
            MappingError::UnknownLookupKeyField {
                table: "Contact".to_string(),
                field: "ReportsToId".to_string(),
                guesses: vec!["ReportsToId".to_string(), "reports_to_id".to_string()],
            }
        );
    }
}

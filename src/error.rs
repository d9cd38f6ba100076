//! Error types for mapping generation and load query composition

use thiserror::Error;

/// A table was requested from the store metadata catalog but is not there
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("table '{table}' not found in store metadata")]
pub struct CatalogMiss {
    pub table: String,
}

impl CatalogMiss {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
        }
    }
}

/// Errors that can occur while generating a mapping or composing a load query
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MappingError {
    #[error("Unknown SObject in schema: {0}")]
    UnknownObject(String),

    #[error("Field '{field}' on object '{object}' was not found in the org schema")]
    SchemaLookup { object: String, field: String },

    #[error(
        "A record type mapping table '{table}' was not found in your dataset. \
         Was it generated by the extract step? ({source})"
    )]
    MissingRecordTypeMapping {
        table: String,
        #[source]
        source: CatalogMiss,
    },

    #[error(transparent)]
    CatalogMiss(#[from] CatalogMiss),

    #[error("Column '{column}' not found on table '{table}'")]
    UnknownColumn { table: String, column: String },

    #[error(
        "Could not find a key field for lookup '{field}' on table '{table}' (tried: {})",
        .guesses.join(", ")
    )]
    UnknownLookupKeyField {
        table: String,
        field: String,
        guesses: Vec<String>,
    },

    #[error("Object '{0}' has more than one load step; declare each object once")]
    DuplicateStep(String),

    #[error("Invalid mapping file: {0}")]
    MappingFile(String),
}

/// Result type for mapping operations
pub type MappingResult<T> = Result<T, MappingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_record_type_message_names_table() {
        let err = MappingError::MissingRecordTypeMapping {
            table: "Account_rt_mapping".to_string(),
            source: CatalogMiss::new("Account_rt_mapping"),
        };
        let msg = err.to_string();
        assert!(msg.contains("Account_rt_mapping"));
        assert!(msg.contains("extract step"));
        assert!(msg.contains("not found in store metadata"));
    }

    #[test]
    fn test_catalog_miss_converts() {
        let err: MappingError = CatalogMiss::new("Account_sf_ids").into();
        assert_eq!(
            err.to_string(),
            "table 'Account_sf_ids' not found in store metadata"
        );
    }

    #[test]
    fn test_unknown_key_field_lists_guesses() {
        let err = MappingError::UnknownLookupKeyField {
            table: "Contact".to_string(),
            field: "AccountId".to_string(),
            guesses: vec!["AccountId".to_string(), "account_id".to_string()],
        };
        assert!(err.to_string().contains("AccountId, account_id"));
    }
}

//! Catalog of the tables in the local staging database

use indexmap::IndexMap;

use crate::error::CatalogMiss;
use crate::mapping::{LoadStep, RECORD_TYPE_ID};

/// Suffix of the per-object table mapping staging ids to inserted org ids
pub const ID_TABLE_SUFFIX: &str = "_sf_ids";
/// Legacy (staging-side) identifier column of an id-mapping table
pub const LEGACY_ID_COLUMN: &str = "id";
/// Identifier assigned by the destination org
pub const NEW_ID_COLUMN: &str = "sf_id";
/// Record type id column of both record type mapping tables
pub const RECORD_TYPE_ID_COLUMN: &str = "record_type_id";
/// Developer name column of both record type mapping tables
pub const DEVELOPER_NAME_COLUMN: &str = "developer_name";
/// Staging column holding a record's record type developer name
pub const RECORD_TYPE_COLUMN: &str = "record_type";

/// Name of the id-mapping table for a staging table
pub fn id_table_name(table: &str) -> String {
    format!("{}{}", table, ID_TABLE_SUFFIX)
}

/// A table (or model) in the staging database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDef {
    pub name: String,
    columns: Vec<String>,
    primary_key: Option<String>,
}

impl TableDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            primary_key: None,
        }
    }

    /// Add a column; adding an existing column is a no-op
    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        let column = column.into();
        if !self.has_column(&column) {
            self.columns.push(column);
        }
        self
    }

    pub fn with_columns<I, S>(self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        columns.into_iter().fold(self, |table, c| table.with_column(c))
    }

    /// Mark a column as primary key, adding it first if needed
    pub fn with_primary_key(mut self, column: impl Into<String>) -> Self {
        let column = column.into();
        if !self.has_column(&column) {
            self.columns.insert(0, column.clone());
        }
        self.primary_key = Some(column);
        self
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn primary_key(&self) -> Option<&str> {
        self.primary_key.as_deref()
    }

    /// Column identifying staging rows; `id` unless a primary key is set
    pub fn id_column(&self) -> &str {
        self.primary_key.as_deref().unwrap_or(LEGACY_ID_COLUMN)
    }

    /// Id-mapping table layout (`id` -> `sf_id`) for a staging table
    pub fn id_mapping(table: &str) -> Self {
        TableDef::new(id_table_name(table))
            .with_primary_key(LEGACY_ID_COLUMN)
            .with_column(NEW_ID_COLUMN)
    }

    /// Record type mapping table layout (`record_type_id`, `developer_name`)
    pub fn record_type_mapping(name: impl Into<String>) -> Self {
        TableDef::new(name)
            .with_primary_key(RECORD_TYPE_ID_COLUMN)
            .with_column(DEVELOPER_NAME_COLUMN)
    }
}

/// Table catalog keyed by table name, read-only once built
#[derive(Debug, Clone, Default)]
pub struct StoreMetadata {
    tables: IndexMap<String, TableDef>,
}

impl StoreMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive the catalog a load of these steps works against: one staging
    /// table and one id-mapping table per step, plus the record type mapping
    /// tables of steps that load `RecordTypeId`
    pub fn for_load(steps: &[LoadStep]) -> Self {
        let mut metadata = Self::new();

        for step in steps {
            let mut staging = TableDef::new(step.table_name())
                .with_primary_key(LEGACY_ID_COLUMN)
                .with_columns(step.fields.values())
                .with_columns(step.lookups.iter().map(|(name, lookup)| {
                    lookup.key_field.as_deref().unwrap_or(name.as_str())
                }));
            if step.record_type.is_some() {
                staging = staging.with_column(RECORD_TYPE_COLUMN);
            }
            metadata.add_table(staging);
            metadata.add_table(TableDef::id_mapping(step.table_name()));

            if step.fields.contains_key(RECORD_TYPE_ID) {
                metadata.add_table(TableDef::record_type_mapping(
                    step.source_record_type_table(),
                ));
                metadata.add_table(TableDef::record_type_mapping(
                    step.destination_record_type_table(),
                ));
            }
        }

        metadata
    }

    /// Register a table, replacing any table of the same name
    pub fn add_table(&mut self, table: TableDef) {
        self.tables.insert(table.name.clone(), table);
    }

    pub fn with_table(mut self, table: TableDef) -> Self {
        self.add_table(table);
        self
    }

    /// Look a table up by exact name
    pub fn table(&self, name: &str) -> Result<&TableDef, CatalogMiss> {
        self.tables.get(name).ok_or_else(|| CatalogMiss::new(name))
    }

    pub fn has_table(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// Tables in registration order
    pub fn tables(&self) -> impl Iterator<Item = &TableDef> {
        self.tables.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::MappingLookup;

    #[test]
    fn test_table_columns_deduplicate() {
        let table = TableDef::new("Contact")
            .with_primary_key("id")
            .with_columns(["LastName", "AccountId", "LastName"]);
        assert_eq!(table.columns(), ["id", "LastName", "AccountId"]);
        assert_eq!(table.id_column(), "id");
        assert!(table.has_column("AccountId"));
        assert!(!table.has_column("accountid"));
    }

    #[test]
    fn test_id_mapping_layout() {
        let table = TableDef::id_mapping("Account");
        assert_eq!(table.name, "Account_sf_ids");
        assert_eq!(table.columns(), ["id", "sf_id"]);
    }

    #[test]
    fn test_catalog_miss() {
        let metadata = StoreMetadata::new().with_table(TableDef::new("Account"));
        assert!(metadata.table("Account").is_ok());
        let miss = metadata.table("Account_sf_ids").unwrap_err();
        assert_eq!(miss.table, "Account_sf_ids");
    }

    #[test]
    fn test_for_load_builds_catalog() {
        let mut contact = LoadStep::new("Contact")
            .with_field("LastName")
            .with_field("RecordTypeId");
        contact.lookups.insert(
            "AccountId".to_string(),
            MappingLookup::new("Account"),
        );
        let steps = vec![LoadStep::new("Account").with_field("Name"), contact];

        let metadata = StoreMetadata::for_load(&steps);
        let names: Vec<_> = metadata.tables().map(|t| t.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "Account",
                "Account_sf_ids",
                "Contact",
                "Contact_sf_ids",
                "Contact_rt_mapping",
                "Contact_rt_target_mapping",
            ]
        );
        assert_eq!(
            metadata.table("Contact").unwrap().columns(),
            ["id", "LastName", "RecordTypeId", "AccountId"]
        );
    }
}

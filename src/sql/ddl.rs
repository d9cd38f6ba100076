//! DDL generation for the staging database catalog

use super::dialect::{get_dialect, SqlDialect, SqlDialectImpl};
use super::metadata::{StoreMetadata, TableDef};

/// Generator for SQL DDL (CREATE TABLE, etc.)
pub struct DdlGenerator {
    dialect: Box<dyn SqlDialectImpl>,
}

impl DdlGenerator {
    /// Create a new DDL generator for the specified dialect
    pub fn new(dialect: SqlDialect) -> Self {
        Self {
            dialect: get_dialect(dialect),
        }
    }

    /// Generate CREATE TABLE statement for a table.
    ///
    /// Every column uses the dialect's text type; staging data is loaded
    /// from CSV and compared as text.
    pub fn generate_table(&self, table: &TableDef) -> String {
        let columns: Vec<String> = table
            .columns()
            .iter()
            .map(|column| self.generate_column(table, column))
            .collect();

        format!(
            "CREATE TABLE {} (\n{}\n)",
            self.dialect.quote_identifier(&table.name),
            columns.join(",\n")
        )
    }

    /// Generate column definition
    fn generate_column(&self, table: &TableDef, column: &str) -> String {
        let mut col = format!(
            "    {} {}",
            self.dialect.quote_identifier(column),
            self.dialect.text_type()
        );

        if table.primary_key() == Some(column) {
            col.push_str(" PRIMARY KEY");
        }

        col
    }

    /// Generate complete DDL for a catalog, in registration order
    pub fn generate_catalog(&self, metadata: &StoreMetadata) -> String {
        let mut sql = String::new();

        for table in metadata.tables() {
            sql.push_str(&self.generate_table(table));
            sql.push_str(";\n\n");
        }

        sql
    }

    /// Generate DROP TABLE statement
    pub fn generate_drop_table(&self, table: &TableDef) -> String {
        let mut sql = format!(
            "DROP TABLE IF EXISTS {}",
            self.dialect.quote_identifier(&table.name)
        );
        if let Some(suffix) = self.dialect.drop_table_suffix() {
            sql.push(' ');
            sql.push_str(suffix);
        }
        sql
    }

    /// Generate DROP TABLE statements for a whole catalog, last table first
    pub fn generate_drop_catalog(&self, metadata: &StoreMetadata) -> String {
        let tables: Vec<_> = metadata.tables().collect();
        let mut sql = String::new();

        for table in tables.into_iter().rev() {
            sql.push_str(&self.generate_drop_table(table));
            sql.push_str(";\n");
        }

        sql
    }
}

//! SQL dialect abstraction for the local staging database (SQLite or PostgreSQL)

/// Supported SQL dialects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SqlDialect {
    #[default]
    Postgres,
    Sqlite,
}

/// Trait for dialect-specific SQL generation
pub trait SqlDialectImpl {
    /// Get the dialect type
    fn dialect(&self) -> SqlDialect;

    /// Quote an identifier (table/column/alias name)
    fn quote_identifier(&self, name: &str) -> String {
        format!("\"{}\"", name.replace('"', "\"\""))
    }

    /// Quote a string literal
    fn string_literal(&self, value: &str) -> String {
        format!("'{}'", value.replace('\'', "''"))
    }

    /// Column type used for every staging, id-mapping and record type column
    fn text_type(&self) -> &str;

    /// Coerce an expression to the text type of id-mapping keys
    fn cast_to_text(&self, expr: &str) -> String {
        format!("CAST({} AS {})", expr, self.text_type())
    }

    /// Lower-case a text expression
    fn lower(&self, expr: &str) -> String {
        format!("LOWER({})", expr)
    }

    /// Suffix for DROP TABLE so dependent objects go with the table
    fn drop_table_suffix(&self) -> Option<&str> {
        None
    }
}

/// PostgreSQL dialect implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresDialect;

impl SqlDialectImpl for PostgresDialect {
    fn dialect(&self) -> SqlDialect {
        SqlDialect::Postgres
    }

    fn text_type(&self) -> &str {
        "VARCHAR"
    }

    fn drop_table_suffix(&self) -> Option<&str> {
        Some("CASCADE")
    }
}

/// SQLite dialect implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteDialect;

impl SqlDialectImpl for SqliteDialect {
    fn dialect(&self) -> SqlDialect {
        SqlDialect::Sqlite
    }

    fn text_type(&self) -> &str {
        "TEXT"
    }
}

/// Get dialect implementation for a given dialect type
pub fn get_dialect(dialect: SqlDialect) -> Box<dyn SqlDialectImpl> {
    match dialect {
        SqlDialect::Postgres => Box::new(PostgresDialect),
        SqlDialect::Sqlite => Box::new(SqliteDialect),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_quoting() {
        let dialect = PostgresDialect;
        assert_eq!(dialect.quote_identifier("Account"), "\"Account\"");
        assert_eq!(
            dialect.quote_identifier("weird\"name"),
            "\"weird\"\"name\""
        );
    }

    #[test]
    fn test_string_literal_escaping() {
        let dialect = SqliteDialect;
        assert_eq!(dialect.string_literal("O'Brien"), "'O''Brien'");
    }

    #[test]
    fn test_text_cast() {
        assert_eq!(PostgresDialect.cast_to_text("x"), "CAST(x AS VARCHAR)");
        assert_eq!(SqliteDialect.cast_to_text("x"), "CAST(x AS TEXT)");
    }

    #[test]
    fn test_get_dialect() {
        assert_eq!(get_dialect(SqlDialect::Sqlite).dialect(), SqlDialect::Sqlite);
        assert_eq!(get_dialect(SqlDialect::Postgres).dialect(), SqlDialect::Postgres);
    }
}

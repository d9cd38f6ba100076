//! Load query plans: a staging-table SELECT extended with outer joins,
//! extra columns and filters, rendered to SQL per dialect

use std::collections::HashSet;

use crate::error::{MappingError, MappingResult};
use crate::mapping::{LoadStep, RECORD_TYPE_ID};

use super::dialect::SqlDialectImpl;
use super::metadata::TableDef;

/// Fields never selected from staging rows directly
const UNLOADED_FIELDS: [&str; 3] = ["Id", RECORD_TYPE_ID, "RecordType"];

/// A table in a FROM or JOIN clause
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRef {
    pub table: String,
    pub alias: String,
}

impl TableRef {
    /// Reference a table by its own name
    pub fn new(table: impl Into<String>) -> Self {
        let table = table.into();
        Self {
            alias: table.clone(),
            table,
        }
    }

    pub fn aliased(table: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            alias: alias.into(),
        }
    }

    fn to_sql(&self, dialect: &dyn SqlDialectImpl) -> String {
        if self.alias == self.table {
            dialect.quote_identifier(&self.table)
        } else {
            format!(
                "{} AS {}",
                dialect.quote_identifier(&self.table),
                dialect.quote_identifier(&self.alias)
            )
        }
    }
}

/// Column and predicate expressions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// `qualifier.column`, where qualifier is a table name or alias
    Column { qualifier: String, column: String },
    /// String literal
    Text(String),
    /// Opaque SQL passed through unparsed
    Raw(String),
    Eq(Box<Expr>, Box<Expr>),
    NotEq(Box<Expr>, Box<Expr>),
    IsNull(Box<Expr>),
    /// Always rendered in parentheses
    Or(Box<Expr>, Box<Expr>),
    Lower(Box<Expr>),
    /// Coercion to the text type used by id-mapping keys
    CastText(Box<Expr>),
}

impl Expr {
    pub fn column(qualifier: impl Into<String>, column: impl Into<String>) -> Self {
        Expr::Column {
            qualifier: qualifier.into(),
            column: column.into(),
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        Expr::Text(value.into())
    }

    pub fn raw(sql: impl Into<String>) -> Self {
        Expr::Raw(sql.into())
    }

    pub fn eq(self, other: Expr) -> Self {
        Expr::Eq(Box::new(self), Box::new(other))
    }

    pub fn not_eq(self, other: Expr) -> Self {
        Expr::NotEq(Box::new(self), Box::new(other))
    }

    pub fn is_null(self) -> Self {
        Expr::IsNull(Box::new(self))
    }

    pub fn or(self, other: Expr) -> Self {
        Expr::Or(Box::new(self), Box::new(other))
    }

    pub fn lower(self) -> Self {
        Expr::Lower(Box::new(self))
    }

    pub fn cast_text(self) -> Self {
        Expr::CastText(Box::new(self))
    }

    /// Table names or aliases this expression refers to. Raw SQL is opaque
    /// and reports none.
    pub fn qualifiers(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_qualifiers(&mut out);
        out
    }

    fn collect_qualifiers<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Expr::Column { qualifier, .. } => out.push(qualifier),
            Expr::Text(_) | Expr::Raw(_) => {}
            Expr::Eq(left, right) | Expr::NotEq(left, right) | Expr::Or(left, right) => {
                left.collect_qualifiers(out);
                right.collect_qualifiers(out);
            }
            Expr::IsNull(inner) | Expr::Lower(inner) | Expr::CastText(inner) => {
                inner.collect_qualifiers(out)
            }
        }
    }

    pub fn to_sql(&self, dialect: &dyn SqlDialectImpl) -> String {
        match self {
            Expr::Column { qualifier, column } => format!(
                "{}.{}",
                dialect.quote_identifier(qualifier),
                dialect.quote_identifier(column)
            ),
            Expr::Text(value) => dialect.string_literal(value),
            Expr::Raw(sql) => format!("({})", sql),
            Expr::Eq(left, right) => {
                format!("{} = {}", left.to_sql(dialect), right.to_sql(dialect))
            }
            Expr::NotEq(left, right) => {
                format!("{} <> {}", left.to_sql(dialect), right.to_sql(dialect))
            }
            Expr::IsNull(inner) => format!("{} IS NULL", inner.to_sql(dialect)),
            Expr::Or(left, right) => {
                format!("({} OR {})", left.to_sql(dialect), right.to_sql(dialect))
            }
            Expr::Lower(inner) => dialect.lower(&inner.to_sql(dialect)),
            Expr::CastText(inner) => dialect.cast_to_text(&inner.to_sql(dialect)),
        }
    }
}

/// A LEFT OUTER JOIN
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Join {
    pub table: TableRef,
    pub condition: Expr,
}

impl Join {
    pub fn new(table: TableRef, condition: Expr) -> Self {
        Self { table, condition }
    }
}

/// Hands out join aliases that never collide with reserved names
#[derive(Debug, Clone, Default)]
pub struct AliasAllocator {
    reserved: HashSet<String>,
    counter: u32,
}

impl AliasAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep `name` (e.g. the base table) from ever being handed out
    pub fn reserve(&mut self, name: impl Into<String>) {
        self.reserved.insert(name.into());
    }

    /// Generate next table alias
    pub fn next_alias(&mut self) -> String {
        loop {
            self.counter += 1;
            let alias = format!("t{}", self.counter);
            if self.reserved.insert(alias.clone()) {
                return alias;
            }
        }
    }
}

/// Query over one object's staging rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPlan {
    pub from: TableRef,
    pub columns: Vec<Expr>,
    pub joins: Vec<Join>,
    pub filters: Vec<Expr>,
    pub order_by: Vec<Expr>,
}

impl QueryPlan {
    /// Staging id followed by every directly loaded field column, in
    /// mapping order. Lookup fields are left to the lookup joins.
    pub fn base(step: &LoadStep, model: &TableDef) -> MappingResult<Self> {
        let from = TableRef::new(&model.name);
        let id = Expr::column(&from.alias, model.id_column());

        let mut columns = vec![id.clone()];
        for (name, column) in &step.fields {
            if UNLOADED_FIELDS.contains(&name.as_str()) || step.lookups.contains_key(name) {
                continue;
            }
            if !model.has_column(column) {
                return Err(MappingError::UnknownColumn {
                    table: model.name.clone(),
                    column: column.clone(),
                });
            }
            columns.push(Expr::column(&from.alias, column));
        }

        Ok(Self {
            from,
            columns,
            joins: Vec::new(),
            filters: Vec::new(),
            order_by: vec![id],
        })
    }

    pub fn outer_join(&mut self, join: Join) {
        self.joins.push(join);
    }

    pub fn add_columns(&mut self, columns: impl IntoIterator<Item = Expr>) {
        self.columns.extend(columns);
    }

    pub fn add_filters(&mut self, filters: impl IntoIterator<Item = Expr>) {
        self.filters.extend(filters);
    }

    /// Qualifiers used by a join condition, column or filter that no
    /// earlier FROM/JOIN introduces. Empty for a well-formed plan.
    pub fn undefined_aliases(&self) -> Vec<&str> {
        let mut known: HashSet<&str> = HashSet::from([self.from.alias.as_str()]);
        let mut undefined = Vec::new();

        for join in &self.joins {
            known.insert(&join.table.alias);
            undefined.extend(join.condition.qualifiers().into_iter().filter(|q| !known.contains(q)));
        }
        for expr in self.columns.iter().chain(&self.filters).chain(&self.order_by) {
            undefined.extend(expr.qualifiers().into_iter().filter(|q| !known.contains(q)));
        }

        undefined
    }

    pub fn to_sql(&self, dialect: &dyn SqlDialectImpl) -> String {
        let columns: Vec<String> = self.columns.iter().map(|c| c.to_sql(dialect)).collect();
        let mut sql = format!(
            "SELECT {}\nFROM {}",
            columns.join(", "),
            self.from.to_sql(dialect)
        );

        for join in &self.joins {
            sql.push_str(&format!(
                "\nLEFT OUTER JOIN {} ON {}",
                join.table.to_sql(dialect),
                join.condition.to_sql(dialect)
            ));
        }

        if !self.filters.is_empty() {
            let filters: Vec<String> = self.filters.iter().map(|f| f.to_sql(dialect)).collect();
            sql.push_str(&format!("\nWHERE {}", filters.join(" AND ")));
        }

        if !self.order_by.is_empty() {
            let order: Vec<String> = self.order_by.iter().map(|o| o.to_sql(dialect)).collect();
            sql.push_str(&format!("\nORDER BY {}", order.join(", ")));
        }

        sql
    }
}

//! Inter-table dependency discovery

use std::fmt;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use super::declaration::ClassifiedDeclaration;

/// `source_table.field_name` references a row in one of `target_tables`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DependencyEdge {
    pub source_table: String,
    pub target_tables: Vec<String>,
    pub field_name: String,
}

impl DependencyEdge {
    pub fn new<I, S>(
        source_table: impl Into<String>,
        target_tables: I,
        field_name: impl Into<String>,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            source_table: source_table.into(),
            target_tables: target_tables.into_iter().map(Into::into).collect(),
            field_name: field_name.into(),
        }
    }

    /// The field may point at more than one exported object type
    pub fn is_polymorphic(&self) -> bool {
        self.target_tables.len() > 1
    }

    /// The field may point back at its own table (e.g., Account.ParentId)
    pub fn is_self_reference(&self) -> bool {
        self.target_tables.iter().any(|t| *t == self.source_table)
    }
}

impl fmt::Display for DependencyEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{} -> {}",
            self.source_table,
            self.field_name,
            self.target_tables.join("|")
        )
    }
}

/// Deduplicated dependency edges in first-insertion order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderedEdgeSet {
    edges: IndexSet<DependencyEdge>,
}

impl OrderedEdgeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an edge; returns false (and keeps the original position) if an
    /// equal edge is already present
    pub fn insert(&mut self, edge: DependencyEdge) -> bool {
        self.edges.insert(edge)
    }

    pub fn contains(&self, edge: &DependencyEdge) -> bool {
        self.edges.contains(edge)
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DependencyEdge> {
        self.edges.iter()
    }

    /// Edges whose source is `table`
    pub fn edges_from<'a>(&'a self, table: &'a str) -> impl Iterator<Item = &'a DependencyEdge> {
        self.edges.iter().filter(move |e| e.source_table == table)
    }
}

/// Equal when both hold the same edges in the same order
impl PartialEq for OrderedEdgeSet {
    fn eq(&self, other: &Self) -> bool {
        self.edges.iter().eq(other.edges.iter())
    }
}

impl Eq for OrderedEdgeSet {}

impl Extend<DependencyEdge> for OrderedEdgeSet {
    fn extend<T: IntoIterator<Item = DependencyEdge>>(&mut self, iter: T) {
        for edge in iter {
            self.insert(edge);
        }
    }
}

impl FromIterator<DependencyEdge> for OrderedEdgeSet {
    fn from_iter<T: IntoIterator<Item = DependencyEdge>>(iter: T) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<'a> IntoIterator for &'a OrderedEdgeSet {
    type Item = &'a DependencyEdge;
    type IntoIter = indexmap::set::Iter<'a, DependencyEdge>;

    fn into_iter(self) -> Self::IntoIter {
        self.edges.iter()
    }
}

/// Look at all of the lookups in a set of declarations to determine what
/// depends on what
pub fn discover_dependencies(decls: &[ClassifiedDeclaration]) -> OrderedEdgeSet {
    decls
        .iter()
        .flat_map(|decl| {
            decl.lookups.iter().map(move |(field_name, targets)| {
                DependencyEdge::new(&decl.sf_object, targets, field_name)
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn classified(sf_object: &str, lookups: &[(&str, &[&str])]) -> ClassifiedDeclaration {
        ClassifiedDeclaration {
            sf_object: sf_object.to_string(),
            lookups: lookups
                .iter()
                .map(|(field, targets)| {
                    (field.to_string(), targets.iter().map(|t| t.to_string()).collect())
                })
                .collect::<IndexMap<_, _>>(),
            ..Default::default()
        }
    }

    #[test]
    fn test_edges_in_declaration_order() {
        let decls = vec![
            classified("Contact", &[("AccountId", &["Account"])]),
            classified("Opportunity", &[("AccountId", &["Account"]), ("ContactId", &["Contact"])]),
        ];
        let edges = discover_dependencies(&decls);
        let rendered: Vec<_> = edges.iter().map(|e| e.to_string()).collect();

        assert_eq!(
            rendered,
            [
                "Contact.AccountId -> Account",
                "Opportunity.AccountId -> Account",
                "Opportunity.ContactId -> Contact",
            ]
        );
    }

    #[test]
    fn test_duplicate_edges_collapse() {
        let decl = classified("Contact", &[("AccountId", &["Account"])]);
        let edges = discover_dependencies(&[decl.clone(), decl]);
        assert_eq!(edges.len(), 1);
    }

    #[test]
    fn test_reinsert_keeps_position() {
        let mut edges = OrderedEdgeSet::new();
        assert!(edges.insert(DependencyEdge::new("A", ["B"], "BId")));
        assert!(edges.insert(DependencyEdge::new("C", ["B"], "BId")));
        assert!(!edges.insert(DependencyEdge::new("A", ["B"], "BId")));

        let sources: Vec<_> = edges.iter().map(|e| e.source_table.as_str()).collect();
        assert_eq!(sources, ["A", "C"]);
    }

    #[test]
    fn test_ordered_equality() {
        let a: OrderedEdgeSet = [
            DependencyEdge::new("A", ["B"], "BId"),
            DependencyEdge::new("C", ["B"], "BId"),
        ]
        .into_iter()
        .collect();
        let b: OrderedEdgeSet = [
            DependencyEdge::new("C", ["B"], "BId"),
            DependencyEdge::new("A", ["B"], "BId"),
        ]
        .into_iter()
        .collect();
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn test_edge_kinds() {
        let parent = DependencyEdge::new("Account", ["Account"], "ParentId");
        assert!(parent.is_self_reference());
        assert!(!parent.is_polymorphic());

        let what = DependencyEdge::new("Task", ["Account", "Case"], "WhatId");
        assert!(what.is_polymorphic());
        assert!(!what.is_self_reference());
    }
}

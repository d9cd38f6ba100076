//! Lookup classification
//!
//! Splits each declaration's fields into plain fields and lookups, keeping
//! only lookup targets that are themselves part of the export.

use indexmap::IndexMap;
use log::debug;

use crate::error::{MappingError, MappingResult};
use crate::sql::schema::SchemaView;

use super::declaration::{ClassifiedDeclaration, Declaration};

/// Record types are remapped by developer name, never loaded as a lookup
pub const RECORD_TYPE_ID: &str = "RecordTypeId";

/// Classify every declaration against the set of objects they export.
///
/// The export set is the `sf_object` of every declaration in `decls`.
pub fn classify_and_filter_lookups<S>(
    decls: &[Declaration],
    schema: &S,
) -> MappingResult<Vec<ClassifiedDeclaration>>
where
    S: SchemaView + ?Sized,
{
    let exported: Vec<&str> = decls
        .iter()
        .map(|decl| decl.sf_object.as_str())
        .filter(|name| !name.is_empty())
        .collect();

    decls
        .iter()
        .map(|decl| classify(decl, schema, &exported))
        .collect()
}

/// Classify one declaration's fields.
///
/// A field whose every reference target lies outside `exported` is dropped:
/// it lands in neither `fields` nor `lookups`.
pub fn classify<S>(
    decl: &Declaration,
    schema: &S,
    exported: &[&str],
) -> MappingResult<ClassifiedDeclaration>
where
    S: SchemaView + ?Sized,
{
    if !schema.has_object(&decl.sf_object) {
        return Err(MappingError::UnknownObject(decl.sf_object.clone()));
    }

    let mut fields = Vec::new();
    let mut lookups = IndexMap::new();

    for field_name in &decl.fields {
        if field_name == RECORD_TYPE_ID {
            fields.push(field_name.clone());
            continue;
        }

        let info = schema
            .field_info(&decl.sf_object, field_name)
            .ok_or_else(|| MappingError::SchemaLookup {
                object: decl.sf_object.clone(),
                field: field_name.clone(),
            })?;

        if !info.is_relationship() {
            fields.push(field_name.clone());
            continue;
        }

        let targets: Vec<String> = info
            .reference_to
            .iter()
            .filter(|target| exported.contains(&target.as_str()))
            .cloned()
            .collect();

        if targets.is_empty() {
            debug!(
                "dropping lookup {}.{}: none of {:?} is exported",
                decl.sf_object, field_name, info.reference_to
            );
            continue;
        }

        lookups.insert(field_name.clone(), targets);
    }

    Ok(ClassifiedDeclaration {
        sf_object: decl.sf_object.clone(),
        fields,
        lookups,
        record_type: decl.record_type.clone(),
        filters: decl.filters.clone(),
    })
}

//! Salesforce org schema as seen by lookup classification

use std::collections::HashMap;

use serde::Deserialize;

/// Read access to per-field org schema information.
///
/// Lookup classification only needs to know, for each declared field,
/// which objects it references.
pub trait SchemaView {
    /// Whether the org schema describes this object at all
    fn has_object(&self, object: &str) -> bool;

    /// Describe of one field, `None` if the schema has no entry for it
    fn field_info(&self, object: &str, field: &str) -> Option<&FieldDescribe>;
}

/// Complete Salesforce org schema
#[derive(Debug, Clone, Default)]
pub struct SalesforceSchema {
    /// Map from SObject API name (case-insensitive key) to object description
    objects: HashMap<String, SObjectDescribe>,
}

impl SalesforceSchema {
    /// Create a new empty schema
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a schema from a JSON array of object describes:
    ///
    /// ```json
    /// [{"name": "Contact", "fields": [{"name": "AccountId", "referenceTo": ["Account"]}]}]
    /// ```
    pub fn from_describe_json(json: &str) -> Result<Self, serde_json::Error> {
        let describes: Vec<SObjectDescribe> = serde_json::from_str(json)?;
        let mut schema = Self::new();
        for object in describes {
            schema.add_object(object);
        }
        Ok(schema)
    }

    /// Add an SObject to the schema
    pub fn add_object(&mut self, object: SObjectDescribe) {
        self.objects.insert(object.name.to_lowercase(), object);
    }

    /// Get an SObject by API name (case-insensitive)
    pub fn get_object(&self, name: &str) -> Option<&SObjectDescribe> {
        self.objects.get(&name.to_lowercase())
    }

    /// Get all objects
    pub fn objects(&self) -> impl Iterator<Item = &SObjectDescribe> {
        self.objects.values()
    }
}

impl SchemaView for SalesforceSchema {
    fn has_object(&self, object: &str) -> bool {
        self.objects.contains_key(&object.to_lowercase())
    }

    fn field_info(&self, object: &str, field: &str) -> Option<&FieldDescribe> {
        self.get_object(object)?.get_field(field)
    }
}

/// Description of a Salesforce SObject
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "RawObjectDescribe")]
pub struct SObjectDescribe {
    /// API name (e.g., "Account", "Custom_Object__c")
    pub name: String,
    /// Map from field API name (case-insensitive) to field description
    fields: HashMap<String, FieldDescribe>,
}

#[derive(Deserialize)]
struct RawObjectDescribe {
    name: String,
    #[serde(default)]
    fields: Vec<FieldDescribe>,
}

impl From<RawObjectDescribe> for SObjectDescribe {
    fn from(raw: RawObjectDescribe) -> Self {
        let mut object = SObjectDescribe::new(raw.name);
        for field in raw.fields {
            object.add_field(field);
        }
        object
    }
}

impl SObjectDescribe {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: HashMap::new(),
        }
    }

    /// Add a field to the object
    pub fn add_field(&mut self, field: FieldDescribe) {
        self.fields.insert(field.name.to_lowercase(), field);
    }

    /// Builder form of [`SObjectDescribe::add_field`]
    pub fn with_field(mut self, field: FieldDescribe) -> Self {
        self.add_field(field);
        self
    }

    /// Get a field by API name (case-insensitive)
    pub fn get_field(&self, name: &str) -> Option<&FieldDescribe> {
        self.fields.get(&name.to_lowercase())
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldDescribe> {
        self.fields.values()
    }
}

/// Description of a Salesforce field
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldDescribe {
    /// API name (e.g., "AccountId", "Custom_Field__c")
    pub name: String,
    /// Objects this field references; empty for non-lookup fields
    #[serde(rename = "referenceTo", default)]
    pub reference_to: Vec<String>,
}

impl FieldDescribe {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reference_to: Vec::new(),
        }
    }

    /// Set this as a lookup field
    pub fn with_reference(mut self, reference_to: impl Into<String>) -> Self {
        self.reference_to = vec![reference_to.into()];
        self
    }

    /// Set this as a polymorphic lookup field
    pub fn with_polymorphic_reference<I, S>(mut self, reference_to: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reference_to = reference_to.into_iter().map(Into::into).collect();
        self
    }

    /// Check if this is a relationship field
    pub fn is_relationship(&self) -> bool {
        !self.reference_to.is_empty()
    }

    /// A lookup that may point at more than one object type (e.g., WhatId)
    pub fn is_polymorphic(&self) -> bool {
        self.reference_to.len() > 1
    }
}

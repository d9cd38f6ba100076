//! Tests for lookup classification, dependency discovery and mapping files

use pretty_assertions::assert_eq;
use sfbulkmap::mapping::{
    build_mapping_steps, classify_and_filter_lookups, create_load_mapping, discover_dependencies,
    Declaration, DeclarationOrderer, DependencyEdge, MappingFile, MappingLookup,
};
use sfbulkmap::sql::{create_sales_cloud_schema, FieldDescribe, SObjectDescribe, SalesforceSchema};
use sfbulkmap::MappingError;

/// Account, Contact and Task with self, cross and polymorphic lookups
fn create_test_schema() -> SalesforceSchema {
    let mut schema = SalesforceSchema::new();

    schema.add_object(
        SObjectDescribe::new("Account")
            .with_field(FieldDescribe::new("Id"))
            .with_field(FieldDescribe::new("Name"))
            .with_field(FieldDescribe::new("RecordTypeId").with_reference("RecordType"))
            .with_field(FieldDescribe::new("ParentId").with_reference("Account"))
            .with_field(FieldDescribe::new("OwnerId").with_polymorphic_reference(["User", "Group"])),
    );
    schema.add_object(
        SObjectDescribe::new("Contact")
            .with_field(FieldDescribe::new("Id"))
            .with_field(FieldDescribe::new("LastName"))
            .with_field(FieldDescribe::new("AccountId").with_reference("Account"))
            .with_field(FieldDescribe::new("ReportsToId").with_reference("Contact")),
    );
    schema.add_object(
        SObjectDescribe::new("Task")
            .with_field(FieldDescribe::new("Subject"))
            .with_field(
                FieldDescribe::new("WhatId")
                    .with_polymorphic_reference(["Account", "Opportunity", "Contact"]),
            ),
    );

    schema
}

#[test]
fn test_account_contact_example() {
    let schema = create_test_schema();
    let decls = vec![
        Declaration::new("Account", ["Name"]),
        Declaration::new("Contact", ["LastName", "AccountId"]),
    ];

    let classified = classify_and_filter_lookups(&decls, &schema).unwrap();
    let contact = &classified[1];
    assert_eq!(contact.fields, ["LastName"]);
    assert_eq!(contact.lookups.len(), 1);
    assert_eq!(contact.lookups["AccountId"], ["Account"]);

    let edges = discover_dependencies(&classified);
    let edges: Vec<_> = edges.iter().cloned().collect();
    assert_eq!(edges, [DependencyEdge::new("Contact", ["Account"], "AccountId")]);
}

#[test]
fn test_record_type_id_is_never_a_lookup() {
    let schema = create_test_schema();
    // RecordType is exported too, which would otherwise make this a lookup
    let mut with_rt = schema.clone();
    with_rt.add_object(SObjectDescribe::new("RecordType").with_field(FieldDescribe::new("Name")));
    let decls = vec![
        Declaration::new("RecordType", ["Name"]),
        Declaration::new("Account", ["Name", "RecordTypeId"]),
    ];

    let classified = classify_and_filter_lookups(&decls, &with_rt).unwrap();
    assert_eq!(classified[1].fields, ["Name", "RecordTypeId"]);
    assert!(classified[1].lookups.is_empty());
}

#[test]
fn test_unexported_lookups_are_dropped() {
    let schema = create_test_schema();
    let decls = vec![Declaration::new("Contact", ["LastName", "AccountId", "ReportsToId"])];

    let classified = classify_and_filter_lookups(&decls, &schema).unwrap();
    let contact = &classified[0];
    assert_eq!(contact.fields, ["LastName"]);
    assert_eq!(contact.lookups.keys().collect::<Vec<_>>(), ["ReportsToId"]);
    assert!(!contact.fields.iter().any(|f| f == "AccountId"));
}

#[test]
fn test_polymorphic_targets_are_filtered_in_schema_order() {
    let schema = create_test_schema();
    let decls = vec![
        Declaration::new("Contact", ["LastName"]),
        Declaration::new("Account", ["Name"]),
        Declaration::new("Task", ["Subject", "WhatId"]),
    ];

    let classified = classify_and_filter_lookups(&decls, &schema).unwrap();
    assert_eq!(classified[2].lookups["WhatId"], ["Account", "Contact"]);

    let edges = discover_dependencies(&classified);
    let edge = edges.iter().next().unwrap();
    assert!(edge.is_polymorphic());
    assert_eq!(edge.to_string(), "Task.WhatId -> Account|Contact");
}

#[test]
fn test_self_reference_edge() {
    let schema = create_test_schema();
    let decls = vec![Declaration::new("Account", ["Name", "ParentId"])];

    let classified = classify_and_filter_lookups(&decls, &schema).unwrap();
    let edges: Vec<_> = discover_dependencies(&classified).iter().cloned().collect();
    assert_eq!(edges, [DependencyEdge::new("Account", ["Account"], "ParentId")]);
    assert!(edges[0].is_self_reference());
}

#[test]
fn test_edge_discovery_is_idempotent() {
    let schema = create_test_schema();
    let decls = vec![
        Declaration::new("Account", ["Name", "ParentId"]),
        Declaration::new("Contact", ["LastName", "AccountId", "ReportsToId"]),
    ];
    let classified = classify_and_filter_lookups(&decls, &schema).unwrap();

    let first = discover_dependencies(&classified);
    let second = discover_dependencies(&classified);
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );

    // A repeated declaration contributes nothing new
    let mut doubled = classified.clone();
    doubled.extend(classified.iter().cloned());
    assert_eq!(discover_dependencies(&doubled), first);
    assert_eq!(first.len(), 3);
}

#[test]
fn test_unknown_field_fails_with_context() {
    let schema = create_test_schema();
    let decls = vec![Declaration::new("Contact", ["LastName", "Birthdate"])];

    let err = classify_and_filter_lookups(&decls, &schema).unwrap_err();
    assert_eq!(
        err,
        MappingError::SchemaLookup {
            object: "Contact".to_string(),
            field: "Birthdate".to_string(),
        }
    );
    assert!(err.to_string().contains("Birthdate"));
}

#[test]
fn test_unknown_object_fails() {
    let decls = vec![Declaration::new("Invoice__c", ["Name"])];
    let err = classify_and_filter_lookups(&decls, &create_test_schema()).unwrap_err();
    assert_eq!(err, MappingError::UnknownObject("Invoice__c".to_string()));
}

#[test]
fn test_steps_map_fields_to_themselves() {
    let schema = create_test_schema();
    let decls = vec![
        Declaration::new("Account", ["Name"]),
        Declaration::new("Contact", ["LastName", "AccountId"])
            .with_filter("LastName IS NOT NULL"),
    ];
    let classified = classify_and_filter_lookups(&decls, &schema).unwrap();

    let steps = build_mapping_steps(&classified);
    assert_eq!(steps.len(), 2);
    let contact = &steps[1];
    for (name, column) in &contact.fields {
        assert_eq!(name, column);
    }
    assert!(contact.has_field("AccountId"));
    assert!(contact.lookups.is_empty());
    assert_eq!(contact.filters, ["LastName IS NOT NULL"]);
}

#[test]
fn test_mapping_file_from_standard_objects() {
    let schema = create_sales_cloud_schema();
    let decls = vec![
        Declaration::new("Account", ["Name", "ParentId", "OwnerId", "RecordTypeId"]),
        Declaration::new("Contact", ["LastName", "AccountId"]),
        Declaration::new("Opportunity", ["Name", "StageName", "AccountId", "CampaignId"])
            .with_record_type("NewBusiness"),
    ];

    let mapping = create_load_mapping(&decls, &schema, &DeclarationOrderer, &[]).unwrap();
    let objects: Vec<_> = mapping.steps().map(|s| s.sf_object.as_str()).collect();
    assert_eq!(objects, ["Account", "Contact", "Opportunity"]);

    let account = mapping.get("Account").unwrap();
    assert!(!account.has_field("OwnerId"));
    assert!(account.has_field("RecordTypeId"));
    assert_eq!(account.lookups["ParentId"], MappingLookup::new("Account").deferred());

    let opportunity = mapping.get("Opportunity").unwrap();
    assert!(!opportunity.has_field("CampaignId"));
    assert_eq!(opportunity.record_type.as_deref(), Some("NewBusiness"));
    assert_eq!(opportunity.lookups["AccountId"], MappingLookup::new("Account"));

    let yaml = mapping.to_yaml().unwrap();
    assert_eq!(MappingFile::from_yaml(&yaml).unwrap(), mapping);
}

#[test]
fn test_mapping_is_stable_across_regenerations() {
    let schema = create_sales_cloud_schema();
    let decls = vec![
        Declaration::new("Account", ["Name", "ParentId"]),
        Declaration::new("Contact", ["LastName", "AccountId", "ReportsToId"]),
    ];

    let first = create_load_mapping(&decls, &schema, &DeclarationOrderer, &[])
        .unwrap()
        .to_yaml()
        .unwrap();
    let second = create_load_mapping(&decls, &schema, &DeclarationOrderer, &[])
        .unwrap()
        .to_yaml()
        .unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_failed_classification_produces_no_mapping() {
    let schema = create_sales_cloud_schema();
    let decls = vec![
        Declaration::new("Account", ["Name"]),
        Declaration::new("Contact", ["LastName", "NotAField__c"]),
    ];
    assert!(create_load_mapping(&decls, &schema, &DeclarationOrderer, &[]).is_err());
}

#[test]
fn test_schema_from_describe_json() {
    let json = r#"[
        {"name": "Account", "fields": [{"name": "Name"}]},
        {"name": "Contact", "fields": [
            {"name": "LastName", "referenceTo": []},
            {"name": "AccountId", "referenceTo": ["Account"], "relationshipName": "Account"}
        ]}
    ]"#;
    let schema = SalesforceSchema::from_describe_json(json).unwrap();
    let decls = vec![
        Declaration::new("Account", ["Name"]),
        Declaration::new("Contact", ["LastName", "AccountId"]),
    ];

    let classified = classify_and_filter_lookups(&decls, &schema).unwrap();
    assert_eq!(classified[1].lookups["AccountId"], ["Account"]);
}

//! Standard Salesforce object schema definitions
//!
//! Only the shape lookup classification cares about is modeled: each
//! object's fields and the objects its lookup fields reference.

use super::schema::{FieldDescribe, SObjectDescribe, SalesforceSchema};

/// Create a schema with common Sales Cloud standard objects
pub fn create_sales_cloud_schema() -> SalesforceSchema {
    let mut schema = SalesforceSchema::new();

    schema.add_object(create_user());
    schema.add_object(create_record_type());
    schema.add_object(create_account());
    schema.add_object(create_contact());
    schema.add_object(create_lead());
    schema.add_object(create_opportunity());
    schema.add_object(create_campaign());
    schema.add_object(create_case());
    schema.add_object(create_task());

    schema
}

/// Add standard system fields to an object
fn add_system_fields(obj: &mut SObjectDescribe) {
    obj.add_field(FieldDescribe::new("Id"));
    obj.add_field(FieldDescribe::new("CreatedById").with_reference("User"));
    obj.add_field(FieldDescribe::new("CreatedDate"));
    obj.add_field(FieldDescribe::new("LastModifiedById").with_reference("User"));
    obj.add_field(FieldDescribe::new("LastModifiedDate"));
    obj.add_field(FieldDescribe::new("IsDeleted"));
}

fn add_plain_fields(obj: &mut SObjectDescribe, names: &[&str]) {
    for name in names {
        obj.add_field(FieldDescribe::new(*name));
    }
}

/// Owner is polymorphic on objects that can be queue-owned
fn add_owner(obj: &mut SObjectDescribe) {
    obj.add_field(FieldDescribe::new("OwnerId").with_polymorphic_reference(["User", "Group"]));
}

fn add_record_type(obj: &mut SObjectDescribe) {
    obj.add_field(FieldDescribe::new("RecordTypeId").with_reference("RecordType"));
}

fn create_user() -> SObjectDescribe {
    let mut obj = SObjectDescribe::new("User");
    add_system_fields(&mut obj);
    add_plain_fields(
        &mut obj,
        &["Username", "FirstName", "LastName", "Email", "IsActive"],
    );
    obj.add_field(FieldDescribe::new("ManagerId").with_reference("User"));
    obj
}

fn create_record_type() -> SObjectDescribe {
    let mut obj = SObjectDescribe::new("RecordType");
    add_system_fields(&mut obj);
    add_plain_fields(&mut obj, &["Name", "DeveloperName", "SobjectType", "IsActive"]);
    obj
}

fn create_account() -> SObjectDescribe {
    let mut obj = SObjectDescribe::new("Account");
    add_system_fields(&mut obj);
    add_owner(&mut obj);
    add_record_type(&mut obj);
    add_plain_fields(
        &mut obj,
        &[
            "Name",
            "AccountNumber",
            "Type",
            "Industry",
            "AnnualRevenue",
            "NumberOfEmployees",
            "Phone",
            "Website",
            "BillingCity",
            "BillingCountry",
            "IsPersonAccount",
        ],
    );
    obj.add_field(FieldDescribe::new("ParentId").with_reference("Account"));
    obj
}

fn create_contact() -> SObjectDescribe {
    let mut obj = SObjectDescribe::new("Contact");
    add_system_fields(&mut obj);
    add_owner(&mut obj);
    add_record_type(&mut obj);
    add_plain_fields(
        &mut obj,
        &[
            "FirstName",
            "LastName",
            "Email",
            "Phone",
            "Title",
            "IsPersonAccount",
        ],
    );
    obj.add_field(FieldDescribe::new("AccountId").with_reference("Account"));
    obj.add_field(FieldDescribe::new("ReportsToId").with_reference("Contact"));
    obj
}

fn create_lead() -> SObjectDescribe {
    let mut obj = SObjectDescribe::new("Lead");
    add_system_fields(&mut obj);
    add_owner(&mut obj);
    add_plain_fields(
        &mut obj,
        &["FirstName", "LastName", "Company", "Status", "Email"],
    );
    obj.add_field(FieldDescribe::new("ConvertedAccountId").with_reference("Account"));
    obj.add_field(FieldDescribe::new("ConvertedContactId").with_reference("Contact"));
    obj
}

fn create_opportunity() -> SObjectDescribe {
    let mut obj = SObjectDescribe::new("Opportunity");
    add_system_fields(&mut obj);
    add_owner(&mut obj);
    add_record_type(&mut obj);
    add_plain_fields(&mut obj, &["Name", "Amount", "StageName", "CloseDate"]);
    obj.add_field(FieldDescribe::new("AccountId").with_reference("Account"));
    obj.add_field(FieldDescribe::new("CampaignId").with_reference("Campaign"));
    obj
}

fn create_campaign() -> SObjectDescribe {
    let mut obj = SObjectDescribe::new("Campaign");
    add_system_fields(&mut obj);
    add_owner(&mut obj);
    add_plain_fields(&mut obj, &["Name", "Type", "Status", "StartDate"]);
    obj.add_field(FieldDescribe::new("ParentId").with_reference("Campaign"));
    obj
}

fn create_case() -> SObjectDescribe {
    let mut obj = SObjectDescribe::new("Case");
    add_system_fields(&mut obj);
    add_owner(&mut obj);
    add_record_type(&mut obj);
    add_plain_fields(&mut obj, &["Subject", "Status", "Priority", "Origin"]);
    obj.add_field(FieldDescribe::new("AccountId").with_reference("Account"));
    obj.add_field(FieldDescribe::new("ContactId").with_reference("Contact"));
    obj.add_field(FieldDescribe::new("ParentId").with_reference("Case"));
    obj
}

fn create_task() -> SObjectDescribe {
    let mut obj = SObjectDescribe::new("Task");
    add_system_fields(&mut obj);
    add_owner(&mut obj);
    add_plain_fields(&mut obj, &["Subject", "Status", "ActivityDate"]);
    obj.add_field(
        FieldDescribe::new("WhatId")
            .with_polymorphic_reference(["Account", "Opportunity", "Case", "Campaign"]),
    );
    obj.add_field(FieldDescribe::new("WhoId").with_polymorphic_reference(["Contact", "Lead"]));
    obj
}

//! WebAssembly bindings
//!
//! This module provides JavaScript-friendly APIs for generating load
//! mappings and composing load queries.
//!
//! # Usage from JavaScript
//!
//! ```javascript
//! import init, { WasmSchema, buildMappingFile, composeLoadQuery } from 'sfbulkmap';
//!
//! await init();
//!
//! const schema = new WasmSchema();
//! schema.loadSalesCloud(); // Load standard objects
//!
//! const declarations = [
//!   { sf_object: 'Account', fields: ['Name', 'ParentId'] },
//!   { sf_object: 'Contact', fields: ['LastName', 'AccountId'] },
//! ];
//!
//! const mapping = buildMappingFile(declarations, schema);
//! if (mapping.success) {
//!   const query = composeLoadQuery(mapping.yaml, 'Contact', 'sqlite', false);
//!   console.log(query.sql);
//! } else {
//!   console.error(mapping.error);
//! }
//! ```

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::load::{load_query_sql, LoadQueryConfig};
use crate::mapping::{
    classify_and_filter_lookups, create_load_mapping, discover_dependencies, Declaration,
    DeclarationOrderer, MappingFile,
};
use crate::sql::dialect::SqlDialect;
use crate::sql::metadata::StoreMetadata;
use crate::sql::schema::{SalesforceSchema, SchemaView};

/// Helper to serialize values as plain JS objects (not Maps)
fn to_js_value<T: Serialize>(value: &T) -> JsValue {
    let serializer = serde_wasm_bindgen::Serializer::new().serialize_maps_as_objects(true);
    value.serialize(&serializer).unwrap_or(JsValue::NULL)
}

fn error_result(message: impl std::fmt::Display) -> JsValue {
    to_js_value(&serde_json::json!({
        "success": false,
        "error": message.to_string(),
    }))
}

fn parse_declarations(declarations: JsValue) -> Result<Vec<Declaration>, JsValue> {
    serde_wasm_bindgen::from_value(declarations)
        .map_err(|e| error_result(format!("Invalid declarations: {}", e)))
}

fn parse_dialect(dialect: &str) -> Result<SqlDialect, JsValue> {
    match dialect.to_lowercase().as_str() {
        "postgres" | "postgresql" => Ok(SqlDialect::Postgres),
        "sqlite" | "sqlite3" => Ok(SqlDialect::Sqlite),
        _ => Err(error_result(format!(
            "Unknown dialect '{}'. Use 'sqlite' or 'postgres'.",
            dialect
        ))),
    }
}

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Org schema for WASM
///
/// This is a JavaScript-friendly wrapper around [`SalesforceSchema`].
#[wasm_bindgen]
pub struct WasmSchema {
    inner: SalesforceSchema,
}

#[wasm_bindgen]
impl WasmSchema {
    /// Create a new empty schema
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmSchema {
        WasmSchema {
            inner: SalesforceSchema::new(),
        }
    }

    /// Load object describes from a JSON string
    ///
    /// Expected format:
    /// ```json
    /// [
    ///   { "name": "Contact", "fields": [{ "name": "AccountId", "referenceTo": ["Account"] }] }
    /// ]
    /// ```
    #[wasm_bindgen(js_name = loadFromJson)]
    pub fn load_from_json(&mut self, describes: &str) -> Result<(), JsValue> {
        let schema = SalesforceSchema::from_describe_json(describes)
            .map_err(|e| JsValue::from_str(&format!("Invalid JSON: {}", e)))?;
        for object in schema.objects() {
            self.inner.add_object(object.clone());
        }
        Ok(())
    }

    /// Get the standard Sales Cloud schema
    #[wasm_bindgen(js_name = loadSalesCloud)]
    pub fn load_sales_cloud(&mut self) {
        self.inner = crate::sql::standard_objects::create_sales_cloud_schema();
    }

    /// Check if an object exists in the schema
    #[wasm_bindgen(js_name = hasObject)]
    pub fn has_object(&self, name: &str) -> bool {
        self.inner.has_object(name)
    }
}

impl Default for WasmSchema {
    fn default() -> Self {
        Self::new()
    }
}

/// Split each declaration's fields into plain fields and lookups
///
/// Returns `{ success, declarations }` or `{ success: false, error }`.
#[wasm_bindgen(js_name = classifyLookups)]
pub fn classify_lookups(declarations: JsValue, schema: &WasmSchema) -> JsValue {
    let decls = match parse_declarations(declarations) {
        Ok(decls) => decls,
        Err(result) => return result,
    };

    match classify_and_filter_lookups(&decls, &schema.inner) {
        Ok(classified) => to_js_value(&serde_json::json!({
            "success": true,
            "declarations": classified,
        })),
        Err(e) => error_result(e),
    }
}

/// Discover the dependency edges between exported objects
///
/// Returns `{ success, edges }` where each edge has `source_table`,
/// `target_tables` and `field_name`.
#[wasm_bindgen(js_name = discoverDependencies)]
pub fn discover_dependencies_js(declarations: JsValue, schema: &WasmSchema) -> JsValue {
    let decls = match parse_declarations(declarations) {
        Ok(decls) => decls,
        Err(result) => return result,
    };

    match classify_and_filter_lookups(&decls, &schema.inner) {
        Ok(classified) => to_js_value(&serde_json::json!({
            "success": true,
            "edges": discover_dependencies(&classified),
        })),
        Err(e) => error_result(e),
    }
}

/// Build a load mapping file, keeping declaration order
///
/// Returns `{ success, yaml }`.
#[wasm_bindgen(js_name = buildMappingFile)]
pub fn build_mapping_file(declarations: JsValue, schema: &WasmSchema) -> JsValue {
    let decls = match parse_declarations(declarations) {
        Ok(decls) => decls,
        Err(result) => return result,
    };

    let yaml = create_load_mapping(&decls, &schema.inner, &DeclarationOrderer, &[])
        .and_then(|mapping| mapping.to_yaml());
    match yaml {
        Ok(yaml) => to_js_value(&serde_json::json!({
            "success": true,
            "yaml": yaml,
        })),
        Err(e) => error_result(e),
    }
}

/// Compose the load query for one step of a mapping file
///
/// The staging catalog is derived from the mapping itself. Returns
/// `{ success, sql }`.
#[wasm_bindgen(js_name = composeLoadQuery)]
pub fn compose_load_query_js(
    mapping_yaml: &str,
    sf_object: &str,
    dialect: &str,
    person_accounts: bool,
) -> JsValue {
    let dialect = match parse_dialect(dialect) {
        Ok(dialect) => dialect,
        Err(result) => return result,
    };
    let mapping = match MappingFile::from_yaml(mapping_yaml) {
        Ok(mapping) => mapping,
        Err(e) => return error_result(e),
    };
    let Some(step) = mapping.get(sf_object) else {
        return error_result(format!("No step for '{}' in mapping", sf_object));
    };

    let steps: Vec<_> = mapping.steps().cloned().collect();
    let metadata = StoreMetadata::for_load(&steps);
    let model = match metadata.table(step.table_name()) {
        Ok(model) => model,
        Err(e) => return error_result(e),
    };

    let config = LoadQueryConfig::new(dialect).with_person_accounts(person_accounts);
    match load_query_sql(step, &metadata, model, &config) {
        Ok(sql) => to_js_value(&serde_json::json!({
            "success": true,
            "sql": sql,
        })),
        Err(e) => error_result(e),
    }
}

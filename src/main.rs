use sfbulkmap::load::{load_query_sql, LoadQueryConfig};
use sfbulkmap::mapping::{
    classify_and_filter_lookups, create_load_mapping, discover_dependencies, Declaration,
    DeclarationOrderer,
};
use sfbulkmap::sql::{create_sales_cloud_schema, DdlGenerator, SqlDialect, StoreMetadata};
use sfbulkmap::MappingResult;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> MappingResult<()> {
    let schema = create_sales_cloud_schema();
    let declarations = vec![
        Declaration::new("Account", ["Name", "Industry", "ParentId", "OwnerId", "RecordTypeId"]),
        Declaration::new(
            "Contact",
            ["FirstName", "LastName", "Email", "AccountId", "ReportsToId", "IsPersonAccount"],
        ),
        Declaration::new("Opportunity", ["Name", "StageName", "CloseDate", "AccountId"])
            .with_filter("StageName != 'Closed Lost'"),
    ];

    println!("=== Load Mapping Demo ===\n");

    let classified = classify_and_filter_lookups(&declarations, &schema)?;
    println!("--- Dependencies ---");
    for edge in discover_dependencies(&classified).iter() {
        println!("  {}", edge);
    }

    let mapping = create_load_mapping(&declarations, &schema, &DeclarationOrderer, &[])?;
    println!("\n--- Mapping file ---");
    println!("{}", mapping.to_yaml()?);

    let steps: Vec<_> = mapping.steps().cloned().collect();
    let metadata = StoreMetadata::for_load(&steps);
    println!("--- Staging DDL ---");
    println!("{}", DdlGenerator::new(SqlDialect::Sqlite).generate_catalog(&metadata));

    let config = LoadQueryConfig::new(SqlDialect::Sqlite).with_person_accounts(true);
    println!("--- Load queries ---");
    for step in &steps {
        let model = metadata.table(step.table_name())?;
        println!("-- {}", step.sf_object);
        println!("{};\n", load_query_sql(step, &metadata, model, &config)?);
    }

    Ok(())
}

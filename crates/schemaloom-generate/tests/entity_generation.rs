use std::path::PathBuf;

use schemaloom_core::{Column, ForeignKey, Project, Schema, Table};
use schemaloom_generate::{
    CodeBuilder, GenerateOptions, GenerationError, Generator, GeneratorRegistry,
};

/// Minimal entity-class generator: one file per table, columns as fields,
/// foreign keys as navigation fields typed by the target class.
struct EntityGenerator;

impl Generator for EntityGenerator {
    fn name(&self) -> &str {
        "entities"
    }

    fn description(&self) -> &str {
        "emits one class per table"
    }

    fn generate(
        &self,
        project: &Project,
        options: &GenerateOptions,
    ) -> Result<(), GenerationError> {
        std::fs::create_dir_all(&options.out_dir)?;
        for (_, table) in project.tables() {
            let path = options.out_dir.join(format!("{}.cs", table.class_name));
            if path.exists() && !options.overwrite {
                return Err(GenerationError::Failed(format!(
                    "{} already exists",
                    path.display()
                )));
            }

            let mut code = CodeBuilder::new();
            code.push_line(format!("class {} {{", table.class_name));
            for column in &table.columns {
                code.push_line(format!("{} {};", column.database_type, column.field_name));
            }
            for key in &table.foreign_keys {
                let target = project.table(key.to_column.table);
                code.push_line(format!("{} {};", target.class_name, key.field_name));
            }
            code.push_line("}");
            std::fs::write(&path, code.to_string())?;
        }
        Ok(())
    }
}

fn catalog_fixture() -> Project {
    let mut project = Project::new("shop");
    let sales = project.add_schema(Schema::new("sales"));
    let orders = project.add_table(sales, Table::new("orders", "Order", "Orders"));
    project.add_column(orders, Column::new("id", "int", "Id"));
    let customer_ref = project.add_column(orders, Column::new("customer_id", "int", "CustomerId"));

    let crm = project.add_schema(Schema::new("crm"));
    let customers = project.add_table(crm, Table::new("customers", "Customer", "Customers"));
    let customer_id = project.add_column(customers, Column::new("id", "int", "Id"));

    project.add_foreign_key(
        orders,
        ForeignKey::new("fk_orders_customer", "Customer", customer_ref, customer_id),
    );
    project
}

fn scratch_dir(tag: &str) -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    std::env::temp_dir().join(format!("schemaloom_{tag}_{}_{nanos}", std::process::id()))
}

#[test]
fn generated_entities_match_the_golden_text() {
    let project = catalog_fixture();
    let mut registry = GeneratorRegistry::new();
    registry.register(Box::new(EntityGenerator));

    let options = GenerateOptions {
        out_dir: scratch_dir("entities"),
        overwrite: false,
    };
    let generator = registry.get("entities").expect("registered");
    generator.generate(&project, &options).expect("generate");

    let order = std::fs::read_to_string(options.out_dir.join("Order.cs")).expect("Order.cs");
    let expected = "class Order {\n\tint Id;\n\tint CustomerId;\n\tCustomer Customer;\n}\n";
    assert_eq!(order, expected);

    let customer =
        std::fs::read_to_string(options.out_dir.join("Customer.cs")).expect("Customer.cs");
    assert_eq!(customer, "class Customer {\n\tint Id;\n}\n");
}

#[test]
fn overwrite_is_required_to_replace_files() {
    let project = catalog_fixture();
    let generator = EntityGenerator;

    let mut options = GenerateOptions {
        out_dir: scratch_dir("overwrite"),
        overwrite: false,
    };
    generator.generate(&project, &options).expect("first run");

    let err = generator.generate(&project, &options).unwrap_err();
    assert!(matches!(err, GenerationError::Failed(_)));
    assert!(err.to_string().contains("already exists"));

    options.overwrite = true;
    generator.generate(&project, &options).expect("second run");
}

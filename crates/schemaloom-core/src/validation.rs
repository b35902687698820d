use std::collections::BTreeSet;

use crate::error::{Error, Result};
use crate::structure::Project;

/// Validate internal consistency of a project.
///
/// This checks:
/// - duplicate schema/table/column names
/// - foreign key endpoints point at columns that exist
/// - every key lives in the table of its `from_column`
///
/// The reader accepts documents that fail these checks (it resolves
/// ambiguous names by document order); callers that need a well-formed
/// project run this afterwards.
pub fn validate_project(project: &Project) -> Result<()> {
    let mut schema_names = BTreeSet::new();
    for schema in &project.schemas {
        if !schema_names.insert(schema.name.as_str()) {
            return Err(Error::InvalidStructure(format!(
                "duplicate schema name: {}",
                schema.name
            )));
        }

        let mut table_names = BTreeSet::new();
        for table in &schema.tables {
            if !table_names.insert(table.table_name.as_str()) {
                return Err(Error::InvalidStructure(format!(
                    "duplicate table name: {}.{}",
                    schema.name, table.table_name
                )));
            }

            let mut column_names = BTreeSet::new();
            for column in &table.columns {
                if !column_names.insert(column.column_name.as_str()) {
                    return Err(Error::InvalidStructure(format!(
                        "duplicate column name: {}.{}.{}",
                        schema.name, table.table_name, column.column_name
                    )));
                }
            }
        }
    }

    for (table_id, table) in project.tables() {
        for key in &table.foreign_keys {
            if project.get_column(key.from_column).is_none() {
                return Err(Error::InvalidStructure(format!(
                    "foreign key '{}': source column does not exist",
                    key.name
                )));
            }
            if project.get_column(key.to_column).is_none() {
                return Err(Error::InvalidStructure(format!(
                    "foreign key '{}': target column does not exist",
                    key.name
                )));
            }
            if key.from_column.table != table_id {
                return Err(Error::InvalidStructure(format!(
                    "foreign key '{}': owned by table '{}' but its source column lives in '{}'",
                    key.name,
                    table.table_name,
                    project.table(key.from_column.table).table_name
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::{Column, ColumnId, ForeignKey, Schema, Table};

    fn valid_project() -> Project {
        let mut project = Project::new("shop");
        let schema = project.add_schema(Schema::new("public"));
        let users = project.add_table(schema, Table::new("users", "User", "Users"));
        let user_id = project.add_column(users, Column::new("id", "int", "Id"));
        let orders = project.add_table(schema, Table::new("orders", "Order", "Orders"));
        let order_user = project.add_column(orders, Column::new("user_id", "int", "UserId"));
        project.add_foreign_key(
            orders,
            ForeignKey::new("fk_orders_user", "User", order_user, user_id),
        );
        project
    }

    #[test]
    fn accepts_a_consistent_project() {
        assert!(validate_project(&valid_project()).is_ok());
    }

    #[test]
    fn rejects_duplicate_schema_names() {
        let mut project = valid_project();
        project.add_schema(Schema::new("public"));
        let err = validate_project(&project).unwrap_err();
        assert!(err.to_string().contains("duplicate schema name: public"));
    }

    #[test]
    fn rejects_duplicate_table_names() {
        let mut project = valid_project();
        let schema = crate::structure::SchemaId(0);
        project.add_table(schema, Table::new("users", "User2", "Users2"));
        let err = validate_project(&project).unwrap_err();
        assert!(err.to_string().contains("duplicate table name: public.users"));
    }

    #[test]
    fn rejects_duplicate_column_names() {
        let mut project = valid_project();
        let users = project.tables().next().map(|(id, _)| id).unwrap();
        project.add_column(users, Column::new("id", "bigint", "Id2"));
        let err = validate_project(&project).unwrap_err();
        assert!(
            err.to_string()
                .contains("duplicate column name: public.users.id")
        );
    }

    #[test]
    fn rejects_dangling_endpoints() {
        let mut project = valid_project();
        let orders = project.tables().nth(1).map(|(id, _)| id).unwrap();
        let ghost = ColumnId {
            table: orders,
            index: 42,
        };
        let real = ColumnId {
            table: orders,
            index: 0,
        };
        project.add_foreign_key(orders, ForeignKey::new("fk_ghost", "Ghost", real, ghost));
        let err = validate_project(&project).unwrap_err();
        assert!(err.to_string().contains("fk_ghost"));
        assert!(err.to_string().contains("target column"));
    }

    #[test]
    fn rejects_keys_stored_in_the_wrong_table() {
        let mut project = valid_project();
        let users = project.tables().next().map(|(id, _)| id).unwrap();
        let orders = project.tables().nth(1).map(|(id, _)| id).unwrap();
        let order_user = ColumnId {
            table: orders,
            index: 0,
        };
        let user_id = ColumnId {
            table: users,
            index: 0,
        };
        // key sourced from `orders` but filed under `users`
        project.add_foreign_key(users, ForeignKey::new("fk_misfiled", "User", order_user, user_id));
        let err = validate_project(&project).unwrap_err();
        assert!(err.to_string().contains("fk_misfiled"));
        assert!(err.to_string().contains("owned by table 'users'"));
    }
}

//! Relative column names.
//!
//! A column is identified relative to a viewing table: by bare name inside
//! its own table, as `table.column` inside its own schema, and as
//! `schema.table.column` from anywhere else. This is the textual encoding of
//! every cross-table reference in the document format.

use crate::structure::{ColumnId, Project, TableId};

impl Project {
    /// Qualified name of `column` as seen from `viewing`.
    pub fn relative_name(&self, column: ColumnId, viewing: TableId) -> String {
        let name = &self.column(column).column_name;
        if column.table == viewing {
            return name.clone();
        }
        let table = self.table(column.table);
        if column.table.schema == viewing.schema {
            return format!("{}.{}", table.table_name, name);
        }
        let schema = self.schema(column.table.schema);
        format!("{}.{}.{}", schema.name, table.table_name, name)
    }

    /// First column of the project whose relative name, evaluated against
    /// `viewing`, equals `name`.
    ///
    /// Enumeration follows document order (schemas, then tables, then
    /// columns), so with duplicate names the earliest match wins; unique
    /// names per scope are assumed, not enforced.
    pub fn find_column_by_relative_name(&self, name: &str, viewing: TableId) -> Option<ColumnId> {
        self.columns()
            .find(|(id, _)| self.relative_name(*id, viewing) == name)
            .map(|(id, _)| id)
    }
}

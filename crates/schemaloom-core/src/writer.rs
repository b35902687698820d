//! Project → document lowering.
//!
//! Every entity becomes an element whose state lives in attributes.
//! Optional attributes are omitted rather than written empty: comments and
//! defaults only appear when non-empty, flags only when set, tags only when
//! the set is non-empty. Static fields are runtime-only and never leave
//! memory.

use std::collections::BTreeSet;

use crate::SOFTWARE;
use crate::document::{Document, Element};
use crate::structure::{Column, ForeignKey, Parameter, Project, Schema, Table};

/// Lower a project to its document form.
///
/// The output is lossless for everything the document format carries:
/// parsing it back with [`crate::reader::deserialize`] reproduces the
/// project, static fields aside.
pub fn serialize(project: &Project) -> Document {
    let mut root = Element::new("Project");
    root.push_attr("Software", SOFTWARE);
    root.push_attr("Name", &project.name);
    push_comment(&mut root, &project.comment);
    push_tags(&mut root, &project.tags);
    push_parameters(&mut root, &project.parameters);

    for schema in &project.schemas {
        root.push_child(serialize_schema(project, schema));
    }

    tracing::debug!(
        project = %project.name,
        schemas = project.schemas.len(),
        "serialized project"
    );
    Document::new(root)
}

fn serialize_schema(project: &Project, schema: &Schema) -> Element {
    let mut element = Element::new("Schema");
    element.push_attr("Name", &schema.name);
    push_comment(&mut element, &schema.comment);
    push_tags(&mut element, &schema.tags);
    push_parameters(&mut element, &schema.parameters);
    for table in &schema.tables {
        element.push_child(serialize_table(project, table));
    }
    element
}

fn serialize_table(project: &Project, table: &Table) -> Element {
    let mut element = Element::new("Table");
    element.push_attr("Name", &table.table_name);
    element.push_attr("ClassName", &table.class_name);
    element.push_attr("RepositoryName", &table.repository_name);
    push_comment(&mut element, &table.comment);
    push_tags(&mut element, &table.tags);
    push_parameters(&mut element, &table.parameters);
    for column in &table.columns {
        element.push_child(serialize_column(column));
    }
    for key in &table.foreign_keys {
        element.push_child(serialize_foreign_key(project, key));
    }
    element
}

fn serialize_column(column: &Column) -> Element {
    let mut element = Element::new("Column");
    element.push_attr("Name", &column.column_name);
    element.push_attr("DatabaseType", &column.database_type);
    element.push_attr("FieldName", &column.field_name);
    if !column.default.is_empty() {
        element.push_attr("Default", &column.default);
    }
    push_flag(&mut element, "PrimaryKey", column.primary_key);
    push_flag(&mut element, "Nullable", column.nullable);
    push_flag(&mut element, "AutoIncrement", column.auto_increment);
    push_comment(&mut element, &column.comment);
    push_tags(&mut element, &column.tags);
    push_parameters(&mut element, &column.parameters);
    element
}

/// Endpoints are written as names: `FromColumn` is the bare column name,
/// `ToColumn` the target's name relative to the source column's table.
fn serialize_foreign_key(project: &Project, key: &ForeignKey) -> Element {
    let mut element = Element::new("ForeignKey");
    element.push_attr("Name", &key.name);
    element.push_attr("FieldName", &key.field_name);
    element.push_attr("FromColumn", &project.column(key.from_column).column_name);
    element.push_attr(
        "ToColumn",
        project.relative_name(key.to_column, key.from_column.table),
    );
    push_flag(&mut element, "Virtual", key.is_virtual);
    push_flag(&mut element, "Reverse", key.is_reverse_key);
    push_comment(&mut element, &key.comment);
    push_tags(&mut element, &key.tags);
    push_parameters(&mut element, &key.parameters);
    element
}

fn push_comment(element: &mut Element, comment: &str) {
    if !comment.is_empty() {
        element.push_attr("Comment", comment);
    }
}

fn push_tags(element: &mut Element, tags: &BTreeSet<String>) {
    if !tags.is_empty() {
        let joined: Vec<&str> = tags.iter().map(String::as_str).collect();
        element.push_attr("Tags", joined.join(", "));
    }
}

fn push_flag(element: &mut Element, name: &str, value: bool) {
    if value {
        element.push_attr(name, "true");
    }
}

fn push_parameters(element: &mut Element, parameters: &[Parameter]) {
    for parameter in parameters {
        let mut child = Element::new("Parameter");
        child.push_attr("Name", &parameter.name);
        child.push_attr("Value", &parameter.value);
        element.push_child(child);
    }
}

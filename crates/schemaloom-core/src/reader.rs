//! Document → project raising.
//!
//! Runs in two passes. The first builds schemas, tables and columns and
//! buffers every `ForeignKey` element together with its owning table; the
//! second resolves the buffered keys by name. Splitting the passes lets a
//! key reference columns of tables that appear later in the document.
//!
//! Unknown elements and attributes are skipped, so documents written by
//! newer tools still load. Flags are recognized only as the literal value
//! `true`; anything else reads as unset.

use std::collections::BTreeSet;

use crate::document::{Document, Element};
use crate::error::{Error, Result};
use crate::structure::{Column, ColumnId, ForeignKey, Parameter, Project, Schema, Table, TableId};

/// Raise a parsed document back into a project.
pub fn deserialize(document: &Document) -> Result<Project> {
    let root = &document.root;
    if root.name != "Project" {
        return Err(Error::MalformedDocument(format!(
            "expected a <Project> root element, found <{}>",
            root.name
        )));
    }

    let mut project = Project::new(require(root, "Name")?);
    project.comment = read_comment(root);
    project.tags = read_tags(root);
    project.parameters = read_parameters(root)?;

    // first pass: structure, with foreign keys set aside in document order
    let mut deposit: Vec<(TableId, &Element)> = Vec::new();
    for schema_element in root.children_named("Schema") {
        let mut schema = Schema::new(require(schema_element, "Name")?);
        schema.comment = read_comment(schema_element);
        schema.tags = read_tags(schema_element);
        schema.parameters = read_parameters(schema_element)?;
        let schema_id = project.add_schema(schema);

        for table_element in schema_element.children_named("Table") {
            let table_id = project.add_table(schema_id, read_table(table_element)?);
            for key_element in table_element.children_named("ForeignKey") {
                deposit.push((table_id, key_element));
            }
        }
    }

    // second pass: every column exists now, resolve the keys
    for (owner, element) in deposit {
        let key = read_foreign_key(element, owner, &project)?;
        project.add_foreign_key(owner, key);
    }

    tracing::debug!(project = %project.name, "deserialized project");
    Ok(project)
}

fn read_table(element: &Element) -> Result<Table> {
    let mut table = Table::new(
        require(element, "Name")?,
        require(element, "ClassName")?,
        require(element, "RepositoryName")?,
    );
    table.comment = read_comment(element);
    table.tags = read_tags(element);
    table.parameters = read_parameters(element)?;
    for column_element in element.children_named("Column") {
        table.columns.push(read_column(column_element)?);
    }
    Ok(table)
}

fn read_column(element: &Element) -> Result<Column> {
    let mut column = Column::new(
        require(element, "Name")?,
        require(element, "DatabaseType")?,
        require(element, "FieldName")?,
    );
    column.default = element.attr("Default").unwrap_or_default().to_owned();
    column.primary_key = flag(element, "PrimaryKey");
    column.nullable = flag(element, "Nullable");
    column.auto_increment = flag(element, "AutoIncrement");
    column.comment = read_comment(element);
    column.tags = read_tags(element);
    column.parameters = read_parameters(element)?;
    Ok(column)
}

/// `FromColumn` resolves within the owning table; `ToColumn` is a relative
/// name resolved against the whole project, first match in document order.
fn read_foreign_key(element: &Element, owner: TableId, project: &Project) -> Result<ForeignKey> {
    let name = require(element, "Name")?;
    let table = project.table(owner);

    let from_name = require(element, "FromColumn")?;
    let from_index = table
        .columns
        .iter()
        .position(|column| column.column_name == from_name)
        .ok_or_else(|| {
            Error::UnresolvedReference(format!(
                "foreign key '{name}': table '{}' has no column '{from_name}'",
                table.table_name
            ))
        })?;
    let from_column = ColumnId {
        table: owner,
        index: from_index,
    };

    let to_name = require(element, "ToColumn")?;
    let to_column = project
        .find_column_by_relative_name(to_name, owner)
        .ok_or_else(|| {
            Error::UnresolvedReference(format!(
                "foreign key '{name}': no column matches '{to_name}' from table '{}'",
                table.table_name
            ))
        })?;

    let mut key = ForeignKey::new(name, require(element, "FieldName")?, from_column, to_column);
    key.is_virtual = flag(element, "Virtual");
    key.is_reverse_key = flag(element, "Reverse");
    key.comment = read_comment(element);
    key.tags = read_tags(element);
    key.parameters = read_parameters(element)?;
    Ok(key)
}

fn require<'a>(element: &'a Element, name: &str) -> Result<&'a str> {
    element.attr(name).ok_or_else(|| {
        Error::MalformedDocument(format!(
            "<{}> is missing the '{name}' attribute",
            element.name
        ))
    })
}

fn flag(element: &Element, name: &str) -> bool {
    element.attr(name) == Some("true")
}

fn read_comment(element: &Element) -> String {
    element.attr("Comment").unwrap_or_default().to_owned()
}

/// Tags are one attribute: comma-separated, whitespace-tolerant, duplicates
/// collapse into the set.
fn read_tags(element: &Element) -> BTreeSet<String> {
    element
        .attr("Tags")
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_owned)
        .collect()
}

fn read_parameters(element: &Element) -> Result<Vec<Parameter>> {
    element
        .children_named("Parameter")
        .map(|parameter| {
            Ok(Parameter::new(
                require(parameter, "Name")?,
                require(parameter, "Value")?,
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(text: &str) -> Project {
        let document = Document::parse(text).expect("parse");
        deserialize(&document).expect("deserialize")
    }

    #[test]
    fn reads_project_attributes_and_parameters() {
        let project = load(
            r#"<Project Software="anything" Name="shop" Comment="demo" Tags="a, b">
  <Parameter Name="dialect" Value="mysql" />
</Project>"#,
        );
        assert_eq!(project.name, "shop");
        assert_eq!(project.comment, "demo");
        assert_eq!(project.tags.len(), 2);
        assert_eq!(project.parameters, [Parameter::new("dialect", "mysql")]);
        assert!(project.schemas.is_empty());
    }

    #[test]
    fn resolves_forward_references() {
        // the key in `orders` points at a table that appears later
        let project = load(
            r#"<Project Name="shop">
  <Schema Name="sales">
    <Table Name="orders" ClassName="Order" RepositoryName="Orders">
      <Column Name="id" DatabaseType="int" FieldName="Id" PrimaryKey="true" />
      <Column Name="customer_id" DatabaseType="int" FieldName="CustomerId" />
      <ForeignKey Name="fk" FieldName="Customer" FromColumn="customer_id" ToColumn="customers.id" />
    </Table>
    <Table Name="customers" ClassName="Customer" RepositoryName="Customers">
      <Column Name="id" DatabaseType="int" FieldName="Id" PrimaryKey="true" />
    </Table>
  </Schema>
</Project>"#,
        );
        let key = &project.schemas[0].tables[0].foreign_keys[0];
        assert_eq!(project.column(key.from_column).column_name, "customer_id");
        assert_eq!(project.column(key.to_column).column_name, "id");
        assert_eq!(project.table(key.to_column.table).table_name, "customers");
    }

    #[test]
    fn flags_require_the_exact_literal_true() {
        let project = load(
            r#"<Project Name="p">
  <Schema Name="s">
    <Table Name="t" ClassName="T" RepositoryName="Ts">
      <Column Name="a" DatabaseType="int" FieldName="A" Nullable="True" />
      <Column Name="b" DatabaseType="int" FieldName="B" Nullable="true" />
    </Table>
  </Schema>
</Project>"#,
        );
        let columns = &project.schemas[0].tables[0].columns;
        assert!(!columns[0].nullable);
        assert!(columns[1].nullable);
    }

    #[test]
    fn tags_are_trimmed_and_deduplicated() {
        let project = load(r#"<Project Name="p" Tags=" a , b ,, a ," />"#);
        let tags: Vec<&str> = project.tags.iter().map(String::as_str).collect();
        assert_eq!(tags, ["a", "b"]);
    }

    #[test]
    fn unknown_elements_and_attributes_are_ignored() {
        let project = load(
            r#"<Project Name="p" Future="yes">
  <Audit When="now" />
  <Schema Name="s">
    <Widget />
  </Schema>
</Project>"#,
        );
        assert_eq!(project.schemas.len(), 1);
        assert!(project.schemas[0].tables.is_empty());
    }

    #[test]
    fn missing_required_attributes_are_malformed() {
        let document =
            Document::parse(r#"<Project Name="p"><Schema /></Project>"#).expect("parse");
        let err = deserialize(&document).unwrap_err();
        assert!(matches!(err, Error::MalformedDocument(_)));
        assert!(err.to_string().contains("'Name'"));
    }

    #[test]
    fn wrong_root_element_is_malformed() {
        let document = Document::parse("<Model />").expect("parse");
        let err = deserialize(&document).unwrap_err();
        assert!(err.to_string().contains("<Model>"));
    }

    #[test]
    fn dangling_from_column_is_unresolved() {
        let document = Document::parse(
            r#"<Project Name="p">
  <Schema Name="s">
    <Table Name="t" ClassName="T" RepositoryName="Ts">
      <Column Name="a" DatabaseType="int" FieldName="A" />
      <ForeignKey Name="fk" FieldName="F" FromColumn="missing" ToColumn="a" />
    </Table>
  </Schema>
</Project>"#,
        )
        .expect("parse");
        let err = deserialize(&document).unwrap_err();
        assert!(matches!(err, Error::UnresolvedReference(_)));
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn dangling_to_column_is_unresolved() {
        let document = Document::parse(
            r#"<Project Name="p">
  <Schema Name="s">
    <Table Name="t" ClassName="T" RepositoryName="Ts">
      <Column Name="a" DatabaseType="int" FieldName="A" />
      <ForeignKey Name="fk" FieldName="F" FromColumn="a" ToColumn="nowhere.at.all" />
    </Table>
  </Schema>
</Project>"#,
        )
        .expect("parse");
        let err = deserialize(&document).unwrap_err();
        assert!(matches!(err, Error::UnresolvedReference(_)));
        assert!(err.to_string().contains("nowhere.at.all"));
    }

    #[test]
    fn ambiguous_relative_names_pick_the_first_match_in_document_order() {
        // two tables named `dup`: the validator rejects this, but the
        // reader resolves by first match rather than failing
        let project = load(
            r#"<Project Name="p">
  <Schema Name="s">
    <Table Name="owner" ClassName="O" RepositoryName="Os">
      <Column Name="ref" DatabaseType="int" FieldName="Ref" />
      <ForeignKey Name="fk" FieldName="F" FromColumn="ref" ToColumn="dup.id" />
    </Table>
    <Table Name="dup" ClassName="D" RepositoryName="Ds">
      <Column Name="id" DatabaseType="int" FieldName="Id" />
    </Table>
    <Table Name="dup" ClassName="D2" RepositoryName="D2s">
      <Column Name="id" DatabaseType="int" FieldName="Id" />
    </Table>
  </Schema>
</Project>"#,
        );
        let key = &project.schemas[0].tables[0].foreign_keys[0];
        assert_eq!(key.to_column.table.index, 1);
        assert_eq!(project.table(key.to_column.table).class_name, "D");
    }
}

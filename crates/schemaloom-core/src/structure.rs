use std::collections::BTreeSet;

/// Handle to a schema within its owning project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SchemaId(pub usize);

/// Handle to a table: owning schema plus position in its table list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TableId {
    pub schema: SchemaId,
    pub index: usize,
}

/// Handle to a column: owning table plus position in its column list.
///
/// The `table` field doubles as the column's back-reference. Ids are only
/// meaningful for the project that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColumnId {
    pub table: TableId,
    pub index: usize,
}

/// Free-form name/value pair attached to an entity.
///
/// Parameters are an extension mechanism for plugins; the core stores and
/// round-trips them without interpreting names or values. Names are not
/// required to be unique and list order is preserved.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub value: String,
}

impl Parameter {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Root of a schema description graph.
///
/// Owns every entity below it; nothing in the graph outlives the project.
/// Schema order is document order and is preserved by serialization.
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub name: String,
    /// Free text; empty means absent.
    pub comment: String,
    pub schemas: Vec<Schema>,
    pub tags: BTreeSet<String>,
    pub parameters: Vec<Parameter>,
}

/// A database namespace holding tables.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    /// Unique within the project; the name resolver relies on this.
    pub name: String,
    pub comment: String,
    pub tables: Vec<Table>,
    pub tags: BTreeSet<String>,
    pub parameters: Vec<Parameter>,
}

/// A table with its columns, foreign keys and generation hints.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Database-side name, unique within the owning schema.
    pub table_name: String,
    /// Generated entity class name (opaque hint for plugins).
    pub class_name: String,
    /// Generated repository/collection name (opaque hint for plugins).
    pub repository_name: String,
    pub comment: String,
    pub columns: Vec<Column>,
    pub foreign_keys: Vec<ForeignKey>,
    /// Enumeration rows attached by the design tool; never serialized.
    pub static_fields: Vec<StaticField>,
    pub tags: BTreeSet<String>,
    pub parameters: Vec<Parameter>,
}

/// A table column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Database-side name, unique within the owning table.
    pub column_name: String,
    /// Generated field name (opaque hint for plugins).
    pub field_name: String,
    /// Database type string, not interpreted by the core.
    pub database_type: String,
    /// Default value expression; empty means no default.
    pub default: String,
    pub comment: String,
    pub nullable: bool,
    pub primary_key: bool,
    pub auto_increment: bool,
    pub tags: BTreeSet<String>,
    pub parameters: Vec<Parameter>,
}

/// A relationship between two columns anywhere in the project.
///
/// A key is owned by the table its `from_column` belongs to (containment in
/// `Table::foreign_keys`); `to_column` may point at any column of the
/// project, including one in another schema.
#[derive(Debug, Clone, PartialEq)]
pub struct ForeignKey {
    pub name: String,
    /// Generated navigation field name (opaque hint for plugins).
    pub field_name: String,
    pub comment: String,
    /// Declared relationship with no backing database constraint.
    pub is_virtual: bool,
    /// Synthesized inverse of another key, see [`ForeignKey::reversed`].
    pub is_reverse_key: bool,
    pub from_column: ColumnId,
    pub to_column: ColumnId,
    pub tags: BTreeSet<String>,
    pub parameters: Vec<Parameter>,
}

/// Fixed enumeration row of a table: plain id/name/comment record.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticField {
    pub id: String,
    pub name: String,
    pub comment: String,
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            comment: String::new(),
            schemas: Vec::new(),
            tags: BTreeSet::new(),
            parameters: Vec::new(),
        }
    }

    /// Append a schema and return its handle.
    pub fn add_schema(&mut self, schema: Schema) -> SchemaId {
        self.schemas.push(schema);
        SchemaId(self.schemas.len() - 1)
    }

    /// Append a table to a schema and return its handle.
    pub fn add_table(&mut self, schema: SchemaId, table: Table) -> TableId {
        let tables = &mut self.schemas[schema.0].tables;
        tables.push(table);
        TableId {
            schema,
            index: tables.len() - 1,
        }
    }

    /// Append a column to a table and return its handle.
    pub fn add_column(&mut self, table: TableId, column: Column) -> ColumnId {
        let columns = &mut self.schemas[table.schema.0].tables[table.index].columns;
        columns.push(column);
        ColumnId {
            table,
            index: columns.len() - 1,
        }
    }

    /// Append a foreign key to the table that owns it.
    pub fn add_foreign_key(&mut self, table: TableId, key: ForeignKey) {
        self.schemas[table.schema.0].tables[table.index]
            .foreign_keys
            .push(key);
    }

    /// Look up a schema. Panics if the id was not produced by this project.
    pub fn schema(&self, id: SchemaId) -> &Schema {
        &self.schemas[id.0]
    }

    /// Look up a table. Panics if the id was not produced by this project.
    pub fn table(&self, id: TableId) -> &Table {
        &self.schemas[id.schema.0].tables[id.index]
    }

    /// Look up a column. Panics if the id was not produced by this project.
    pub fn column(&self, id: ColumnId) -> &Column {
        &self.table(id.table).columns[id.index]
    }

    /// Mutable counterpart of [`Project::schema`].
    pub fn schema_mut(&mut self, id: SchemaId) -> &mut Schema {
        &mut self.schemas[id.0]
    }

    /// Mutable counterpart of [`Project::table`].
    pub fn table_mut(&mut self, id: TableId) -> &mut Table {
        &mut self.schemas[id.schema.0].tables[id.index]
    }

    /// Mutable counterpart of [`Project::column`].
    pub fn column_mut(&mut self, id: ColumnId) -> &mut Column {
        &mut self.table_mut(id.table).columns[id.index]
    }

    pub fn get_schema(&self, id: SchemaId) -> Option<&Schema> {
        self.schemas.get(id.0)
    }

    pub fn get_table(&self, id: TableId) -> Option<&Table> {
        self.get_schema(id.schema)?.tables.get(id.index)
    }

    pub fn get_column(&self, id: ColumnId) -> Option<&Column> {
        self.get_table(id.table)?.columns.get(id.index)
    }

    /// All tables of the project in document order.
    pub fn tables(&self) -> impl Iterator<Item = (TableId, &Table)> {
        self.schemas.iter().enumerate().flat_map(|(s, schema)| {
            schema.tables.iter().enumerate().map(move |(t, table)| {
                (
                    TableId {
                        schema: SchemaId(s),
                        index: t,
                    },
                    table,
                )
            })
        })
    }

    /// All columns of the project in document order.
    pub fn columns(&self) -> impl Iterator<Item = (ColumnId, &Column)> {
        self.tables().flat_map(|(table_id, table)| {
            table.columns.iter().enumerate().map(move |(c, column)| {
                (
                    ColumnId {
                        table: table_id,
                        index: c,
                    },
                    column,
                )
            })
        })
    }
}

impl Schema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            comment: String::new(),
            tables: Vec::new(),
            tags: BTreeSet::new(),
            parameters: Vec::new(),
        }
    }
}

impl Table {
    pub fn new(
        table_name: impl Into<String>,
        class_name: impl Into<String>,
        repository_name: impl Into<String>,
    ) -> Self {
        Self {
            table_name: table_name.into(),
            class_name: class_name.into(),
            repository_name: repository_name.into(),
            comment: String::new(),
            columns: Vec::new(),
            foreign_keys: Vec::new(),
            static_fields: Vec::new(),
            tags: BTreeSet::new(),
            parameters: Vec::new(),
        }
    }
}

impl Column {
    pub fn new(
        column_name: impl Into<String>,
        database_type: impl Into<String>,
        field_name: impl Into<String>,
    ) -> Self {
        Self {
            column_name: column_name.into(),
            field_name: field_name.into(),
            database_type: database_type.into(),
            default: String::new(),
            comment: String::new(),
            nullable: false,
            primary_key: false,
            auto_increment: false,
            tags: BTreeSet::new(),
            parameters: Vec::new(),
        }
    }
}

impl StaticField {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            comment: String::new(),
        }
    }
}

impl ForeignKey {
    pub fn new(
        name: impl Into<String>,
        field_name: impl Into<String>,
        from_column: ColumnId,
        to_column: ColumnId,
    ) -> Self {
        Self {
            name: name.into(),
            field_name: field_name.into(),
            comment: String::new(),
            is_virtual: false,
            is_reverse_key: false,
            from_column,
            to_column,
            tags: BTreeSet::new(),
            parameters: Vec::new(),
        }
    }

    /// The same relationship navigated from the referenced side.
    ///
    /// Swaps the endpoints, marks the result as a reverse key and copies
    /// everything else, including independent clones of the tag set and
    /// parameter list. The input is left untouched.
    pub fn reversed(&self) -> ForeignKey {
        ForeignKey {
            name: self.name.clone(),
            field_name: self.field_name.clone(),
            comment: self.comment.clone(),
            is_virtual: self.is_virtual,
            is_reverse_key: true,
            from_column: self.to_column,
            to_column: self.from_column,
            tags: self.tags.clone(),
            parameters: self.parameters.clone(),
        }
    }
}

//! Core model and document format for Schemaloom.
//!
//! This crate defines the in-memory description of a relational project
//! (schemas, tables, columns, foreign keys), the name resolver used to
//! reference columns across the project, and the lossless text format the
//! description travels in.

pub mod document;
pub mod error;
pub mod names;
pub mod reader;
pub mod structure;
pub mod validation;
pub mod writer;

pub use document::{Attribute, Document, Element, ParseError};
pub use error::{Error, Result};
pub use reader::deserialize;
pub use structure::{
    Column, ColumnId, ForeignKey, Parameter, Project, Schema, SchemaId, StaticField, Table,
    TableId,
};
pub use validation::validate_project;
pub use writer::serialize;

/// Value of the `Software` attribute stamped on serialized projects.
pub const SOFTWARE: &str = "schemaloom.dev";

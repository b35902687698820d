//! Plugin-facing surface for Schemaloom code generators.
//!
//! Hosts load a project description, pick generators out of the registry and
//! hand each one the project plus a [`GenerateOptions`]. [`CodeBuilder`] is
//! the line-oriented source emitter shared by generators.

pub mod builder;
pub mod errors;
pub mod generator;
pub mod settings;

pub use builder::CodeBuilder;
pub use errors::GenerationError;
pub use generator::{GenerateOptions, Generator, GeneratorRegistry};
pub use settings::{Editable, EditableProperty};

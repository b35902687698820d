use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use schemaloom_core::Project;

use crate::errors::GenerationError;

/// Options handed to every generator run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateOptions {
    /// Directory where generated sources are written.
    pub out_dir: PathBuf,
    /// Overwrite files that already exist.
    pub overwrite: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("out"),
            overwrite: false,
        }
    }
}

/// A code generation plugin.
///
/// Generators consume a finished project description and produce their
/// artifacts as side effects; the host only observes the error channel.
pub trait Generator {
    /// Unique name, used for registry lookup.
    fn name(&self) -> &str;
    /// One-line human description.
    fn description(&self) -> &str;
    fn generate(
        &self,
        project: &Project,
        options: &GenerateOptions,
    ) -> Result<(), GenerationError>;
}

/// Generators known to the host, looked up by name.
#[derive(Default)]
pub struct GeneratorRegistry {
    generators: Vec<Box<dyn Generator>>,
}

impl GeneratorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, generator: Box<dyn Generator>) {
        tracing::debug!(name = generator.name(), "registered generator");
        self.generators.push(generator);
    }

    pub fn get(&self, name: &str) -> Option<&dyn Generator> {
        self.generators
            .iter()
            .find(|generator| generator.name() == name)
            .map(|generator| generator.as_ref())
    }

    /// Registered generators in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Generator> {
        self.generators.iter().map(|generator| generator.as_ref())
    }
}

//! Settings of a growing-domain PDE modifier.

use crate::pde_error::PdeError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifierConfig {
    /// Directory snapshots are written into.
    pub output_directory: PathBuf,
    /// Name of the solved field; also the key in each cell's data store.
    pub dependent_variable: String,
}

impl ModifierConfig {
    pub fn new(output_directory: impl Into<PathBuf>, dependent_variable: impl Into<String>) -> Self {
        Self {
            output_directory: output_directory.into(),
            dependent_variable: dependent_variable.into(),
        }
    }

    /// Rejects variable names that cannot label a VTK field.
    pub fn validate(&self) -> Result<(), PdeError> {
        let name = &self.dependent_variable;
        if name.is_empty() {
            return Err(PdeError::InvalidConfig("dependent variable name is empty".into()));
        }
        if name.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(PdeError::InvalidConfig(format!(
                "dependent variable name {name:?} contains whitespace"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_variable_name() {
        assert!(ModifierConfig::new("out", "oxygen").validate().is_ok());
        assert!(ModifierConfig::new("out", "").validate().is_err());
        assert!(ModifierConfig::new("out", "nutrient level").validate().is_err());
    }
}

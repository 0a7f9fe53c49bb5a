use std::fs;
use std::path::Path;

use emod_core::errors::{EmodError, ErrorInfo};
use emod_schema::{ConfigNode, Schema};
use serde_json::{json, Value};

/// The per-run simulation task surface the experiment driver mutates:
/// schema-validated assignment onto `config.parameters`.
#[derive(Debug, Clone)]
pub struct SimTask {
    parameters: ConfigNode,
}

impl SimTask {
    /// Creates a task with every `SimulationConfig` parameter at its schema
    /// default.
    pub fn new(schema: &Schema) -> Result<Self, EmodError> {
        Ok(Self {
            parameters: schema.class_with_defaults("SimulationConfig")?,
        })
    }

    /// Assigns one config parameter. Undeclared parameters fail, exactly as
    /// for any other schema-backed node.
    pub fn set_parameter(
        &mut self,
        name: &str,
        value: impl Into<Value>,
    ) -> Result<&mut Self, EmodError> {
        self.parameters.set(name, value)?;
        Ok(self)
    }

    /// Reads back a parameter, if set.
    pub fn parameter(&self, name: &str) -> Option<&Value> {
        self.parameters.get(name)
    }

    /// Renders the simulator's `config.json` document.
    pub fn to_document(&self) -> Value {
        let mut parameters = self.parameters.to_value();
        if let Some(map) = parameters.as_object_mut() {
            map.remove("class");
        }
        json!({ "parameters": parameters })
    }

    /// Writes `config.json` as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), EmodError> {
        let path = path.as_ref();
        let rendered = serde_json::to_string_pretty(&self.to_document())
            .map_err(|err| EmodError::Io(ErrorInfo::new("task-encode", err.to_string())))?;
        fs::write(path, rendered).map_err(|err| {
            EmodError::Io(
                ErrorInfo::new("task-write", "failed to write config file")
                    .with_context("path", path.display().to_string())
                    .with_hint(err.to_string()),
            )
        })
    }
}

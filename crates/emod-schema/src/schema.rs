use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use emod_core::errors::{EmodError, ErrorInfo};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::node::ConfigNode;

/// Declaration of a single schema field: its default value and, for
/// enumerated fields, the permitted string choices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub default: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<String>>,
}

pub(crate) type ClassSpec = BTreeMap<String, FieldSpec>;

/// Read-only schema reference data, loaded once per process and shared
/// cheaply between every builder call.
#[derive(Debug, Clone)]
pub struct Schema {
    classes: Arc<BTreeMap<String, ClassSpec>>,
}

impl Schema {
    /// Parses a schema from an in-memory JSON document.
    pub fn from_value(value: Value) -> Result<Self, EmodError> {
        let classes: BTreeMap<String, ClassSpec> =
            serde_json::from_value(value).map_err(|err| {
                EmodError::Schema(
                    ErrorInfo::new("schema-parse", "schema document is malformed")
                        .with_hint(err.to_string()),
                )
            })?;
        Ok(Self {
            classes: Arc::new(classes),
        })
    }

    /// Loads a schema document from a JSON file on disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, EmodError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|err| {
            EmodError::Io(
                ErrorInfo::new("schema-read", "failed to read schema file")
                    .with_context("path", path.display().to_string())
                    .with_hint(err.to_string()),
            )
        })?;
        let value: Value = serde_json::from_str(&raw).map_err(|err| {
            EmodError::Schema(
                ErrorInfo::new("schema-parse", "schema file is not valid JSON")
                    .with_context("path", path.display().to_string())
                    .with_hint(err.to_string()),
            )
        })?;
        Self::from_value(value)
    }

    /// The minimal typhoid schema bundled with the toolkit, covering every
    /// class the builders construct. Real deployments load the schema
    /// published by their simulator binary instead.
    pub fn builtin() -> Self {
        let value: Value = serde_json::from_str(include_str!("../data/typhoid_schema.json"))
            .unwrap_or_else(|err| panic!("bundled schema is not valid JSON: {err}"));
        Self::from_value(value).unwrap_or_else(|err| panic!("bundled schema is malformed: {err}"))
    }

    /// Returns a node for `class_name` with every declared field present at
    /// its schema default.
    pub fn class_with_defaults(&self, class_name: &str) -> Result<ConfigNode, EmodError> {
        let spec = self.class_spec(class_name)?;
        let values: BTreeMap<String, Value> = spec
            .iter()
            .map(|(field, spec)| (field.clone(), spec.default.clone()))
            .collect();
        Ok(ConfigNode::new(class_name.to_string(), self.clone(), values))
    }

    /// Names of every class the schema declares, sorted.
    pub fn class_names(&self) -> Vec<&str> {
        self.classes.keys().map(String::as_str).collect()
    }

    pub(crate) fn class_spec(&self, class_name: &str) -> Result<&ClassSpec, EmodError> {
        self.classes.get(class_name).ok_or_else(|| {
            EmodError::Schema(
                ErrorInfo::new("schema-unknown-class", "class not declared by schema")
                    .with_context("class", class_name)
                    .with_hint(format!(
                        "known classes: {}",
                        self.class_names().join(", ")
                    )),
            )
        })
    }
}

use std::collections::BTreeMap;

use emod_core::errors::{EmodError, ErrorInfo};
use serde_json::Value;

use crate::schema::Schema;

/// A schema-validated configuration node: a mapping from declared field
/// names to values, plus the class name the schema declared it under.
///
/// Nodes are created through [`Schema::class_with_defaults`], mutated by
/// assignment, and serialized once into the surrounding document; nothing
/// holds onto a node after serialization.
#[derive(Debug, Clone)]
pub struct ConfigNode {
    class_name: String,
    schema: Schema,
    values: BTreeMap<String, Value>,
}

impl ConfigNode {
    pub(crate) fn new(class_name: String, schema: Schema, values: BTreeMap<String, Value>) -> Self {
        Self {
            class_name,
            schema,
            values,
        }
    }

    /// The schema class this node was constructed for.
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Assigns a declared field. Undeclared fields and enumerated fields
    /// assigned a value outside their choice set fail immediately.
    pub fn set(&mut self, field: &str, value: impl Into<Value>) -> Result<&mut Self, EmodError> {
        let value = value.into();
        let spec = self.schema.class_spec(&self.class_name)?;
        let field_spec = spec.get(field).ok_or_else(|| {
            EmodError::Schema(
                ErrorInfo::new("schema-unknown-field", "field not declared for class")
                    .with_context("class", self.class_name.clone())
                    .with_context("field", field)
                    .with_hint(format!(
                        "declared fields: {}",
                        spec.keys().cloned().collect::<Vec<_>>().join(", ")
                    )),
            )
        })?;
        if let (Some(choices), Some(text)) = (&field_spec.choices, value.as_str()) {
            if !choices.iter().any(|c| c == text) {
                return Err(EmodError::Schema(
                    ErrorInfo::new("schema-bad-choice", "value outside declared choice set")
                        .with_context("class", self.class_name.clone())
                        .with_context("field", field)
                        .with_context("value", text)
                        .with_hint(format!("choices: {}", choices.join(", "))),
                ));
            }
        }
        self.values.insert(field.to_string(), value);
        Ok(self)
    }

    /// Attaches another node as a nested sub-config (e.g. a waning effect).
    pub fn set_node(&mut self, field: &str, node: &ConfigNode) -> Result<&mut Self, EmodError> {
        let value = node.to_value();
        self.set(field, value)
    }

    /// Returns the current value of a field, if present.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    /// Serializes the node to a JSON object containing `"class"` plus every
    /// field. Keys are sorted, so the output is deterministic.
    pub fn to_value(&self) -> Value {
        let mut map = serde_json::Map::new();
        map.insert(
            "class".to_string(),
            Value::String(self.class_name.clone()),
        );
        for (field, value) in &self.values {
            map.insert(field.clone(), value.clone());
        }
        Value::Object(map)
    }
}

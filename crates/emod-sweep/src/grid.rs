use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One independent parameter axis of a sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridAxis {
    pub name: String,
    pub values: Vec<Value>,
}

impl GridAxis {
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

/// Expands the Cartesian product of the axes. The leftmost axis varies
/// slowest. An empty axis list yields an empty result (documented, not an
/// error), as does any axis with no values.
pub fn grid(axes: &[GridAxis]) -> Vec<BTreeMap<String, Value>> {
    if axes.is_empty() {
        return Vec::new();
    }
    let mut outputs = Vec::new();
    expand(axes, 0, BTreeMap::new(), &mut outputs);
    outputs
}

fn expand(
    axes: &[GridAxis],
    idx: usize,
    current: BTreeMap<String, Value>,
    outputs: &mut Vec<BTreeMap<String, Value>>,
) {
    if idx == axes.len() {
        outputs.push(current);
        return;
    }
    let axis = &axes[idx];
    for value in &axis.values {
        let mut next = current.clone();
        next.insert(axis.name.clone(), value.clone());
        expand(axes, idx + 1, next, outputs);
    }
}

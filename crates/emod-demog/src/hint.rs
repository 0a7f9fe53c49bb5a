use emod_core::errors::{EmodError, ErrorInfo};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

const DISTRIBUTION_TOLERANCE: f64 = 1e-6;

/// A named individual property (e.g. `"Region"`) with an initial categorical
/// distribution and optional per-route transmission-weight matrices.
///
/// Each matrix is |values| x |values|; row `i`, column `j` scales how
/// strongly a transmitting individual in category `i` exposes category `j`.
/// The matrices are forwarded verbatim to the simulator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HintProperty {
    pub property: String,
    pub values: Vec<String>,
    pub initial_distribution: Vec<f64>,
    #[serde(default)]
    pub transmission_matrix: Option<Vec<Vec<f64>>>,
    #[serde(default)]
    pub enviro_transmission_matrix: Option<Vec<Vec<f64>>>,
}

impl HintProperty {
    fn check_matrix(&self, route: &str, matrix: &[Vec<f64>]) -> Result<(), EmodError> {
        let n = self.values.len();
        if matrix.len() != n || matrix.iter().any(|row| row.len() != n) {
            return Err(EmodError::Demographics(
                ErrorInfo::new("hint-matrix-shape", "transmission matrix must be square over the value set")
                    .with_context("property", self.property.clone())
                    .with_context("route", route)
                    .with_context("values", n.to_string())
                    .with_context("rows", matrix.len().to_string()),
            ));
        }
        Ok(())
    }

    pub(crate) fn to_value(&self) -> Result<Value, EmodError> {
        if self.values.is_empty() {
            return Err(EmodError::Demographics(
                ErrorInfo::new("hint-no-values", "property needs at least one value")
                    .with_context("property", self.property.clone()),
            ));
        }
        if self.initial_distribution.len() != self.values.len() {
            return Err(EmodError::Demographics(
                ErrorInfo::new(
                    "hint-distribution-shape",
                    "initial distribution must cover every property value",
                )
                .with_context("property", self.property.clone())
                .with_context("values", self.values.len().to_string())
                .with_context("distribution", self.initial_distribution.len().to_string()),
            ));
        }
        let total: f64 = self.initial_distribution.iter().sum();
        if (total - 1.0).abs() > DISTRIBUTION_TOLERANCE {
            return Err(EmodError::Demographics(
                ErrorInfo::new("hint-distribution-sum", "initial distribution must sum to 1")
                    .with_context("property", self.property.clone())
                    .with_context("sum", total.to_string()),
            ));
        }
        if let Some(matrix) = &self.transmission_matrix {
            self.check_matrix("Contact", matrix)?;
        }
        if let Some(matrix) = &self.enviro_transmission_matrix {
            self.check_matrix("Environmental", matrix)?;
        }

        let mut entry = json!({
            "Property": self.property,
            "Values": self.values,
            "Initial_Distribution": self.initial_distribution,
        });
        let matrix = match (&self.transmission_matrix, &self.enviro_transmission_matrix) {
            (Some(contact), Some(enviro)) => Some(json!({
                "Route": "Multi",
                "Matrix": { "Contact": contact, "Environmental": enviro },
            })),
            (Some(contact), None) => Some(json!({
                "Route": "Contact",
                "Matrix": contact,
            })),
            (None, Some(enviro)) => Some(json!({
                "Route": "Environmental",
                "Matrix": enviro,
            })),
            (None, None) => None,
        };
        if let Some(matrix) = matrix {
            entry["TransmissionMatrix"] = matrix;
        }
        Ok(entry)
    }
}

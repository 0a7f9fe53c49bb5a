use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// A single demographics node: identity, location, and initial population.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub lat: f64,
    pub lon: f64,
    pub pop: u64,
    pub name: String,
    pub forced_id: u32,
}

impl Node {
    pub fn new(lat: f64, lon: f64, pop: u64, name: impl Into<String>, forced_id: u32) -> Self {
        Self {
            lat,
            lon,
            pop,
            name: name.into(),
            forced_id,
        }
    }

    /// Renders the per-node block of the demographics document.
    pub fn to_value(&self) -> Value {
        json!({
            "NodeID": self.forced_id,
            "NodeAttributes": {
                "Latitude": self.lat,
                "Longitude": self.lon,
                "InitialPopulation": self.pop,
                "FacilityName": self.name,
            },
        })
    }
}

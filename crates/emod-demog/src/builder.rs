use std::fs;
use std::path::Path;

use chrono::Utc;
use emod_core::errors::{EmodError, ErrorInfo};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::hint::HintProperty;
use crate::node::Node;

/// A demographics document under construction: an ordered node set plus the
/// shared default-attribute block applied to every node.
#[derive(Debug, Clone)]
pub struct Demographics {
    idref: String,
    nodes: Vec<Node>,
    individual_properties: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    lat: f64,
    lon: f64,
    pop: u64,
    #[serde(default)]
    node_id: Option<u32>,
    #[serde(default)]
    name: Option<String>,
}

impl Demographics {
    /// Builds a single-node document from explicit values.
    pub fn from_template_node(
        lat: f64,
        lon: f64,
        pop: u64,
        name: impl Into<String>,
        forced_id: u32,
    ) -> Self {
        Self {
            idref: "Gridded world grump2.5arcmin".to_string(),
            nodes: vec![Node::new(lat, lon, pop, name, forced_id)],
            individual_properties: Vec::new(),
        }
    }

    /// Builds a synthetic multi-node population. Node 1 is the urban node
    /// holding `(1 - frac_rural) * tot_pop`; the rural remainder is split
    /// across the other nodes by normalized exponential draws from a seeded
    /// generator, so the same seed reproduces the same population. Nodes sit
    /// on a 2.5-arcmin grid.
    pub fn from_params(
        tot_pop: u64,
        num_nodes: u32,
        frac_rural: f64,
        id_ref: impl Into<String>,
        seed: u64,
    ) -> Result<Self, EmodError> {
        if num_nodes == 0 {
            return Err(EmodError::Argument(ErrorInfo::new(
                "demog-num-nodes",
                "num_nodes must be at least 1",
            )));
        }
        if !(0.0..=1.0).contains(&frac_rural) {
            return Err(EmodError::Argument(
                ErrorInfo::new("demog-frac-rural", "frac_rural must be within [0, 1]")
                    .with_context("frac_rural", frac_rural.to_string()),
            ));
        }

        let grid_side = (num_nodes as f64).sqrt().ceil() as u32;
        let arcmin_2_5 = 2.5 / 60.0;
        let urban_pop = if num_nodes == 1 {
            tot_pop
        } else {
            ((1.0 - frac_rural) * tot_pop as f64).round() as u64
        };
        let rural_pop = tot_pop - urban_pop.min(tot_pop);

        // Exponential weights, normalized so the rural populations sum to
        // rural_pop up to integer rounding; the last node absorbs the
        // remainder to conserve the total.
        let mut rng = StdRng::seed_from_u64(seed);
        let rural_nodes = num_nodes.saturating_sub(1) as usize;
        let weights: Vec<f64> = (0..rural_nodes)
            .map(|_| -(1.0 - rng.gen::<f64>()).ln())
            .collect();
        let weight_sum: f64 = weights.iter().sum::<f64>().max(f64::MIN_POSITIVE);

        let mut nodes = Vec::with_capacity(num_nodes as usize);
        let mut assigned = 0u64;
        for idx in 0..num_nodes {
            let row = idx / grid_side;
            let col = idx % grid_side;
            let pop = if idx == 0 {
                urban_pop
            } else if idx == num_nodes - 1 {
                rural_pop - assigned
            } else {
                let share =
                    (weights[(idx - 1) as usize] / weight_sum * rural_pop as f64).round() as u64;
                let share = share.min(rural_pop - assigned);
                assigned += share;
                share
            };
            nodes.push(Node::new(
                row as f64 * arcmin_2_5,
                col as f64 * arcmin_2_5,
                pop,
                format!("Node{}", idx + 1),
                idx + 1,
            ));
        }

        Ok(Self {
            idref: id_ref.into(),
            nodes,
            individual_properties: Vec::new(),
        })
    }

    /// Imports nodes from a CSV with `lat`, `lon`, `pop` columns and an
    /// optional `node_id` column (row order is used when absent). Rows with
    /// population below `min_node_pop` are dropped with a logged notice;
    /// this is a deliberate soft filter, not an error.
    pub fn from_csv(
        path: impl AsRef<Path>,
        site: impl Into<String>,
        min_node_pop: u64,
    ) -> Result<Self, EmodError> {
        let path = path.as_ref();
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(path)
            .map_err(|err| {
                EmodError::Io(
                    ErrorInfo::new("demog-csv-open", "failed to open population CSV")
                        .with_context("path", path.display().to_string())
                        .with_hint(err.to_string()),
                )
            })?;

        let mut nodes = Vec::new();
        for (idx, result) in reader.deserialize::<CsvRow>().enumerate() {
            let row = result.map_err(|err| {
                EmodError::Io(
                    ErrorInfo::new("demog-csv-row", "malformed population CSV row")
                        .with_context("path", path.display().to_string())
                        .with_context("row", (idx + 1).to_string())
                        .with_hint(err.to_string()),
                )
            })?;
            let id = row.node_id.unwrap_or(idx as u32 + 1);
            if row.pop < min_node_pop {
                log::warn!(
                    "purged node {id}: population {} below threshold {min_node_pop}",
                    row.pop
                );
                continue;
            }
            let name = row.name.unwrap_or_else(|| id.to_string());
            nodes.push(Node::new(row.lat, row.lon, row.pop, name, id));
        }

        Ok(Self {
            idref: site.into(),
            nodes,
            individual_properties: Vec::new(),
        })
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn idref(&self) -> &str {
        &self.idref
    }

    /// Attaches a named individual property with an initial categorical
    /// distribution and optional HINT transmission-weight matrices. The
    /// distribution must cover every value and sum to 1.
    pub fn add_individual_property_and_hint(
        &mut self,
        property: &HintProperty,
    ) -> Result<&mut Self, EmodError> {
        let entry = property.to_value()?;
        self.individual_properties.push(entry);
        Ok(self)
    }

    /// Shared per-individual defaults, including the distribution flags the
    /// older typhoid binaries read unconditionally.
    fn default_individual_attributes() -> Value {
        json!({
            "AgeDistributionFlag": 1,
            "AgeDistribution1": 0,
            "AgeDistribution2": 18250,
            "RiskDistributionFlag": 0,
            "RiskDistribution1": 0,
            "RiskDistribution2": 0,
            "PrevalenceDistributionFlag": 0,
            "PrevalenceDistribution1": 0,
            "PrevalenceDistribution2": 0,
        })
    }

    /// Renders the demographics document. Node ids must be unique.
    pub fn to_document(&self) -> Result<Value, EmodError> {
        let mut seen = std::collections::BTreeSet::new();
        for node in &self.nodes {
            if !seen.insert(node.forced_id) {
                return Err(EmodError::Demographics(
                    ErrorInfo::new("demog-duplicate-id", "node ids must be unique")
                        .with_context("node_id", node.forced_id.to_string()),
                ));
            }
        }
        let nodes: Vec<Value> = self.nodes.iter().map(Node::to_value).collect();
        Ok(json!({
            "Metadata": {
                "DateCreated": Utc::now().to_rfc3339(),
                "Tool": "emod-demog",
                "IdReference": self.idref,
                "NodeCount": self.nodes.len(),
            },
            "Defaults": {
                "NodeAttributes": {},
                "IndividualAttributes": Self::default_individual_attributes(),
                "IndividualProperties": self.individual_properties,
            },
            "Nodes": nodes,
        }))
    }

    /// Writes the demographics document as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), EmodError> {
        let path = path.as_ref();
        let rendered = serde_json::to_string_pretty(&self.to_document()?)
            .map_err(|err| EmodError::Io(ErrorInfo::new("demog-encode", err.to_string())))?;
        fs::write(path, rendered).map_err(|err| {
            EmodError::Io(
                ErrorInfo::new("demog-write", "failed to write demographics file")
                    .with_context("path", path.display().to_string())
                    .with_hint(err.to_string()),
            )
        })?;
        log::info!("wrote demographics with {} nodes to {}", self.nodes.len(), path.display());
        Ok(())
    }
}

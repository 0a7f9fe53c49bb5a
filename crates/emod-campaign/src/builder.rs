use std::fs;
use std::path::Path;

use emod_core::errors::{EmodError, ErrorInfo};
use emod_schema::{ConfigNode, Schema};
use serde_json::{json, Value};

/// Accumulates campaign events and serializes the campaign document.
///
/// This is an explicit value passed through every builder call; there is no
/// process-wide "current campaign" singleton.
#[derive(Debug, Clone)]
pub struct CampaignBuilder {
    schema: Schema,
    campaign_name: String,
    events: Vec<Value>,
}

impl CampaignBuilder {
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            campaign_name: "Campaign".to_string(),
            events: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.campaign_name = name.into();
        self
    }

    /// The schema this campaign validates against.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Appends a composed campaign event. Events keep their insertion order
    /// in the output document.
    pub fn add(&mut self, event: &ConfigNode) -> Result<&mut Self, EmodError> {
        if event.class_name() != "CampaignEvent" {
            return Err(EmodError::Campaign(
                ErrorInfo::new("campaign-not-event", "only CampaignEvent nodes can be added")
                    .with_context("class", event.class_name()),
            ));
        }
        self.events.push(event.to_value());
        Ok(self)
    }

    pub fn events(&self) -> &[Value] {
        &self.events
    }

    /// Serializes the campaign document the simulator consumes.
    pub fn to_document(&self) -> Value {
        json!({
            "Campaign_Name": self.campaign_name,
            "Use_Defaults": 1,
            "Events": self.events,
        })
    }

    /// Writes the campaign document as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), EmodError> {
        let path = path.as_ref();
        let rendered = serde_json::to_string_pretty(&self.to_document())
            .map_err(|err| EmodError::Io(ErrorInfo::new("campaign-encode", err.to_string())))?;
        fs::write(path, rendered).map_err(|err| {
            EmodError::Io(
                ErrorInfo::new("campaign-write", "failed to write campaign file")
                    .with_context("path", path.display().to_string())
                    .with_hint(err.to_string()),
            )
        })?;
        log::info!("wrote campaign with {} events to {}", self.events.len(), path.display());
        Ok(())
    }
}

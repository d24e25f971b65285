//! Scene document serialization
//!
//! The document is plain JSON: `{ "objects": [...], "sketches": [...] }`.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use shaper_cad::Sketch;

use crate::object::{ObjectRecord, RecordOptions};
use crate::store::SceneStore;

/// Serializable snapshot of a whole scene
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDocument {
    pub objects: Vec<ObjectRecord>,
    #[serde(default)]
    pub sketches: Vec<Sketch>,
}

impl SceneDocument {
    /// Build a document from the store
    pub fn from_store(store: &SceneStore, options: RecordOptions) -> Self {
        Self {
            objects: store.records(options),
            sketches: store.list_sketches().to_vec(),
        }
    }

    /// Check ids, coordinates and sketch shapes
    pub fn validate(&self) -> Result<(), DocumentError> {
        let mut seen = HashSet::new();
        for record in &self.objects {
            if !seen.insert(record.id) {
                return Err(DocumentError::InvalidDocument(format!(
                    "duplicate object id {}",
                    record.id
                )));
            }
            if !record.transform().is_finite() {
                return Err(DocumentError::InvalidDocument(format!(
                    "object {} has a non-finite transform",
                    record.id
                )));
            }
            if let Some(source) = &record.extrusion {
                if !(source.height.is_finite() && source.height > 0.0) {
                    return Err(DocumentError::InvalidDocument(format!(
                        "object {} has invalid extrusion height {}",
                        record.id, source.height
                    )));
                }
            }
        }

        let mut seen = HashSet::new();
        for sketch in &self.sketches {
            if !seen.insert(sketch.id()) {
                return Err(DocumentError::InvalidDocument(format!(
                    "duplicate sketch id {}",
                    sketch.id()
                )));
            }
            sketch.validate().map_err(|e| {
                DocumentError::InvalidDocument(format!("sketch {}: {e}", sketch.id()))
            })?;
        }

        Ok(())
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> Result<String, DocumentError> {
        serde_json::to_string_pretty(self).map_err(|e| DocumentError::Serialize(e.to_string()))
    }

    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let document: SceneDocument = serde_json::from_str(json)
            .map_err(|e| DocumentError::InvalidDocument(e.to_string()))?;
        document.validate()?;
        Ok(document)
    }

    /// Serialize document to bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, DocumentError> {
        Ok(self.to_json()?.into_bytes())
    }

    /// Load document from bytes
    pub fn from_bytes(data: &[u8]) -> Result<Self, DocumentError> {
        let content =
            std::str::from_utf8(data).map_err(|e| DocumentError::InvalidDocument(e.to_string()))?;
        Self::from_json(content)
    }

    /// Save document to a file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), DocumentError> {
        let content = self.to_bytes()?;
        std::fs::write(path, content).map_err(|e| DocumentError::Io(e.to_string()))?;
        Ok(())
    }

    /// Load document from a file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let content = std::fs::read(path).map_err(|e| DocumentError::Io(e.to_string()))?;
        Self::from_bytes(&content)
    }
}

/// Document-related errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DocumentError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialize(String),
    #[error("Invalid document: {0}")]
    InvalidDocument(String),
}

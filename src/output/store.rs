//! JSON document store
//!
//! Layout under the configured data directory:
//!
//! ```text
//! <data-dir>/<format-code>/<season>/index.json                  manifest
//! <data-dir>/<format-code>/<season>/<date>-<event id>/index.json event
//! ```

use crate::config::OutputConfig;
use crate::model::{Event, EventList};
use crate::HarvestError;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

const DOCUMENT_NAME: &str = "index.json";

/// Writes event documents and the run manifest as compact JSON
#[derive(Debug, Clone)]
pub struct JsonStore {
    root: PathBuf,
}

impl JsonStore {
    pub fn new(config: &OutputConfig) -> Self {
        Self {
            root: Path::new(&config.data_dir)
                .join(&config.format_code)
                .join(&config.season),
        }
    }

    /// The season directory every document lives under
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn event_path(&self, event: &Event) -> PathBuf {
        self.root.join(event.slug()).join(DOCUMENT_NAME)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(DOCUMENT_NAME)
    }

    /// Writes one event document, creating its directory
    ///
    /// # Returns
    ///
    /// * `Ok(PathBuf)` - Where the document was written
    /// * `Err(HarvestError)` - Serialization or filesystem failure
    pub fn write_event(&self, event: &Event) -> Result<PathBuf, HarvestError> {
        let path = self.event_path(event);
        write_json(&path, event)?;
        Ok(path)
    }

    /// Writes the run manifest at the season root
    pub fn write_manifest(&self, manifest: &EventList) -> Result<PathBuf, HarvestError> {
        let path = self.manifest_path();
        write_json(&path, manifest)?;
        Ok(path)
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), HarvestError> {
    let bytes = serde_json::to_vec(value)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, bytes)?;
    Ok(())
}

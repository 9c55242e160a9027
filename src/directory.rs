//! Location directory backed by a JSON file of location records.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::error::UpstreamError;
use crate::traits::{Coordinate, LocationDirectory};

/// A saved place, as stored by the location service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip: String,
    pub coordinate: Coordinate,
}

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("failed to read locations file: {0}")]
    Io(#[from] io::Error),

    #[error("failed to parse locations file: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryLocationDirectory {
    locations: HashMap<String, LocationRecord>,
}

impl InMemoryLocationDirectory {
    pub fn from_records(records: impl IntoIterator<Item = LocationRecord>) -> Self {
        let locations = records
            .into_iter()
            .map(|record| (record.id.clone(), record))
            .collect();
        Self { locations }
    }

    /// Loads a JSON array of [`LocationRecord`]s.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, DirectoryError> {
        let raw = fs::read_to_string(path.as_ref())?;
        let records: Vec<LocationRecord> = serde_json::from_str(&raw)?;
        let directory = Self::from_records(records);
        info!(
            path = %path.as_ref().display(),
            locations = directory.len(),
            "loaded location directory"
        );
        Ok(directory)
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&LocationRecord> {
        self.locations.get(id)
    }
}

impl LocationDirectory for InMemoryLocationDirectory {
    fn resolve(&self, id: &str) -> Result<Coordinate, UpstreamError> {
        self.locations
            .get(id)
            .map(|record| record.coordinate)
            .ok_or_else(|| UpstreamError::UnknownLocation(id.to_string()))
    }
}

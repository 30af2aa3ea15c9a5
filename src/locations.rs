//! Location tree - the read-only country → state → city catalogue

use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A state (or province) and the cities inside it
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Region {
    pub name: String,
    #[serde(default)]
    pub cities: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Country {
    pub name: String,
    #[serde(default)]
    pub states: Vec<Region>,
}

/// Ordered list of countries supplied by the caller.
///
/// The widget only ever reads from it; lookups use exact name equality
/// and the first match wins.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct LocationTree(pub Vec<Country>);

#[derive(thiserror::Error, Debug)]
pub enum LocationsError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid location tree: {0}")]
    Parse(#[from] serde_json::Error),
}

const SAMPLE_LOCATIONS: &str = include_str!("../assets/locations.json");

impl LocationTree {
    pub fn new(countries: Vec<Country>) -> Self {
        Self(countries)
    }

    /// Tree bundled with the binary, used when no file is given
    pub fn sample() -> Self {
        Self::from_json(SAMPLE_LOCATIONS).unwrap_or_default()
    }

    pub fn from_json(json: &str) -> Result<Self, LocationsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, LocationsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| LocationsError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn countries(&self) -> &[Country] {
        &self.0
    }

    pub fn find_country(&self, name: &str) -> Option<&Country> {
        self.0.iter().find(|country| country.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// First region in `regions` named `name`
pub fn find_region<'a>(regions: &'a [Region], name: &str) -> Option<&'a Region> {
    regions.iter().find(|region| region.name == name)
}

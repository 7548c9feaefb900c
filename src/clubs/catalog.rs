use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name of the fallback club in the reference catalogs.
pub const DEFAULT_CLUB: &str = "Iron 9";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CatalogEntry {
    pub name: String,
    /// Maximum effective range in meters.
    pub max_range: f64,
    /// Only allowed for the first shot of a hole (typically the driver off the tee).
    #[serde(default)]
    pub first_segment_only: bool,
}

impl CatalogEntry {
    pub fn new(name: impl Into<String>, max_range: f64) -> Self {
        CatalogEntry {
            name: name.into(),
            max_range,
            first_segment_only: false,
        }
    }

    pub fn first_segment_only(mut self) -> Self {
        self.first_segment_only = true;
        self
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    #[error("catalog has no entries")]
    Empty,
    #[error("club {name:?} has invalid range {range}")]
    InvalidRange { name: String, range: f64 },
    #[error("club {0:?} appears more than once")]
    DuplicateName(String),
    #[error("default club {0:?} is not in the catalog")]
    UnknownDefault(String),
    #[error("default club {0:?} is restricted to the first shot")]
    FirstSegmentOnlyDefault(String),
    #[error("every club is restricted to the first shot")]
    NoLaterShotClub,
}

/// Validated set of clubs a player carries.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "CatalogConfig", into = "CatalogConfig")]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    default: Option<String>,
}

/// Unvalidated serialized form of a [`Catalog`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub entries: Vec<CatalogEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl Catalog {
    pub fn new(entries: Vec<CatalogEntry>, default: Option<String>) -> Result<Self, CatalogError> {
        if entries.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut seen = HashSet::new();
        for entry in &entries {
            if !entry.max_range.is_finite() || entry.max_range <= 0.0 {
                return Err(CatalogError::InvalidRange {
                    name: entry.name.clone(),
                    range: entry.max_range,
                });
            }
            if !seen.insert(entry.name.as_str()) {
                return Err(CatalogError::DuplicateName(entry.name.clone()));
            }
        }
        if entries.iter().all(|entry| entry.first_segment_only) {
            return Err(CatalogError::NoLaterShotClub);
        }
        if let Some(name) = &default {
            match entries.iter().find(|entry| &entry.name == name) {
                None => return Err(CatalogError::UnknownDefault(name.clone())),
                Some(entry) if entry.first_segment_only => {
                    return Err(CatalogError::FirstSegmentOnlyDefault(name.clone()))
                }
                Some(_) => {}
            }
        }
        Ok(Catalog { entries, default })
    }

    /// Golf de Béthemont bag.
    pub fn bethemont() -> Self {
        Catalog {
            entries: vec![
                CatalogEntry::new("Iron 9", 105.0),
                CatalogEntry::new("Iron 7", 128.0),
                CatalogEntry::new("Driver 3", 190.0).first_segment_only(),
            ],
            default: Some(DEFAULT_CLUB.to_string()),
        }
    }

    /// Golf d'Ilbarritz bag.
    pub fn ilbarritz() -> Self {
        Catalog {
            entries: vec![
                CatalogEntry::new("Iron 9", 90.0),
                CatalogEntry::new("Iron 7", 130.0),
                CatalogEntry::new("Driver 3", 190.0).first_segment_only(),
            ],
            default: Some(DEFAULT_CLUB.to_string()),
        }
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn get(&self, name: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    /// Longest range of any club. No shot in the graph may exceed it.
    pub fn max_range(&self) -> f64 {
        self.entries
            .iter()
            .map(|entry| entry.max_range)
            .fold(0.0, f64::max)
    }

    /// The named default club, if any. Never restricted to the first shot.
    pub fn default_entry(&self) -> Option<&CatalogEntry> {
        self.default.as_deref().and_then(|name| self.get(name))
    }

    /// Club used when nothing in the bag covers a distance: the named default,
    /// otherwise the shortest-range club.
    pub fn fallback(&self) -> &CatalogEntry {
        self.default_entry()
            .or_else(|| {
                self.entries
                    .iter()
                    .min_by(|a, b| a.max_range.total_cmp(&b.max_range))
            })
            .unwrap_or(&self.entries[0])
    }
}

impl TryFrom<CatalogConfig> for Catalog {
    type Error = CatalogError;

    fn try_from(config: CatalogConfig) -> Result<Self, Self::Error> {
        Catalog::new(config.entries, config.default)
    }
}

impl From<Catalog> for CatalogConfig {
    fn from(catalog: Catalog) -> Self {
        CatalogConfig {
            entries: catalog.entries,
            default: catalog.default,
        }
    }
}

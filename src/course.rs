//! Course presets: where the tee and hole are, which clubs are in the bag and
//! where the traced outlines live.

use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::clubs::catalog::Catalog;
use crate::data::{self, DataError};
use crate::geo::tiles::{self, DEFAULT_MOSAIC_TILES, MAX_ZOOM};
use crate::geo::BoundingBox;
use crate::planner::Course;
use crate::Point;

/// Lattice spacing in degrees used by the reference presets (about 55 m of latitude).
pub const DEFAULT_SPACING: f64 = 0.0005;

/// Imagery zoom level used by the reference presets.
pub const DEFAULT_ZOOM: u8 = 19;

#[derive(Debug, Error)]
pub enum PresetError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid preset file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unknown preset {0:?}")]
    Unknown(String),
    #[error("course data: {0}")]
    Data(#[from] DataError),
    #[error("preset {name:?} has zoom {zoom}, imagery stops at {}", MAX_ZOOM)]
    InvalidZoom { name: String, zoom: u8 },
}

fn default_spacing() -> f64 {
    DEFAULT_SPACING
}

fn default_zoom() -> u8 {
    DEFAULT_ZOOM
}

fn default_tiles() -> u32 {
    DEFAULT_MOSAIC_TILES
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CoursePreset {
    pub name: String,
    pub title: String,
    pub tee: Point,
    pub hole: Point,
    #[serde(default = "default_zoom")]
    pub zoom: u8,
    /// Tiles per side of the imagery mosaic; sets the planning area.
    #[serde(default = "default_tiles")]
    pub tiles: u32,
    #[serde(default = "default_spacing")]
    pub spacing: f64,
    pub catalog: Catalog,
    /// Relative paths are resolved against the data directory.
    pub obstacles_file: PathBuf,
    pub terrain_file: PathBuf,
}

static BUILTIN_PRESETS: Lazy<Vec<CoursePreset>> = Lazy::new(|| {
    vec![
        CoursePreset {
            name: "bethemont".into(),
            title: "Golf de Béthemont".into(),
            tee: Point::new(48.90891343931512, 1.9938896367494228),
            hole: Point::new(48.90665014147519, 1.991794617313395),
            zoom: DEFAULT_ZOOM,
            tiles: DEFAULT_MOSAIC_TILES,
            spacing: DEFAULT_SPACING,
            catalog: Catalog::bethemont(),
            obstacles_file: PathBuf::from("data/obstacles.txt"),
            terrain_file: PathBuf::from("data/terrain.txt"),
        },
        CoursePreset {
            name: "ilbarritz".into(),
            title: "Golf d'Ilbarritz".into(),
            tee: Point::new(43.46049913636801, -1.5757732009295526),
            hole: Point::new(43.46042123600998, -1.5719332568242161),
            zoom: DEFAULT_ZOOM,
            tiles: DEFAULT_MOSAIC_TILES,
            spacing: DEFAULT_SPACING,
            catalog: Catalog::ilbarritz(),
            obstacles_file: PathBuf::from("data-ilbarritz/obstacles.txt"),
            terrain_file: PathBuf::from("data-ilbarritz/terrain.txt"),
        },
    ]
});

pub fn builtin_presets() -> &'static [CoursePreset] {
    &BUILTIN_PRESETS
}

pub fn load_presets<P: AsRef<Path>>(path: P) -> Result<Vec<CoursePreset>, PresetError> {
    let bytes = fs::read(path)?;
    let presets: Vec<CoursePreset> = serde_json::from_slice(&bytes)?;
    if let Some(preset) = presets.iter().find(|preset| preset.zoom > MAX_ZOOM) {
        return Err(PresetError::InvalidZoom {
            name: preset.name.clone(),
            zoom: preset.zoom,
        });
    }
    Ok(presets)
}

pub fn find_preset<'a>(presets: &'a [CoursePreset], name: &str) -> Result<&'a CoursePreset, PresetError> {
    presets
        .iter()
        .find(|preset| preset.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| PresetError::Unknown(name.to_string()))
}

impl CoursePreset {
    /// Midpoint between tee and hole; the imagery is centered here.
    pub fn center(&self) -> Point {
        self.tee.midpoint(&self.hole)
    }

    /// Footprint of the imagery mosaic around the course.
    pub fn bounds(&self) -> BoundingBox {
        tiles::image_corners(self.center(), self.zoom, self.tiles, self.tiles).bounds()
    }

    /// Loads the outlines and assembles a plannable course. A missing or empty
    /// terrain file leaves the whole mosaic playable.
    pub fn course<P: AsRef<Path>>(&self, data_dir: P) -> Result<Course, PresetError> {
        let data_dir = data_dir.as_ref();
        let obstacles = data::read_obstacles(data_dir.join(&self.obstacles_file))?;

        let terrain_path = data_dir.join(&self.terrain_file);
        let terrain = if terrain_path.exists() {
            data::read_terrain(&terrain_path)?
        } else {
            log::warn!(
                "Terrain file {} not found, using the full imagery bounds",
                terrain_path.display()
            );
            None
        };

        Ok(Course {
            tee: self.tee,
            hole: self.hole,
            bounds: self.bounds(),
            spacing: self.spacing,
            obstacles,
            terrain,
            catalog: self.catalog.clone(),
        })
    }
}

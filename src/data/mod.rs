//! Obstacle and terrain outlines traced over the course imagery.
//!
//! One shape per line: `label,color,lat1,lon1,lat2,lon2,...`. Blank lines are
//! skipped.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::spatial::geometry::{GeometryError, Polygon};
use crate::Point;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: {reason}")]
    Malformed { line: usize, reason: String },
    #[error("invalid shape: {0}")]
    Geometry(#[from] GeometryError),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ShapeRecord {
    pub label: String,
    /// Drawing color used by the overlay renderer.
    pub color: String,
    pub points: Vec<Point>,
}

impl ShapeRecord {
    pub fn polygon(&self) -> Result<Polygon, GeometryError> {
        Polygon::new(self.points.clone())
    }
}

/// Parses one line. `line_no` is only used in error messages.
pub fn parse_shape_line(line: &str, line_no: usize) -> Result<Option<ShapeRecord>, DataError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let parts: Vec<&str> = line.split(',').map(str::trim).collect();
    if parts.len() < 2 {
        return Err(DataError::Malformed {
            line: line_no,
            reason: "expected label and color".into(),
        });
    }
    let coords = &parts[2..];
    if coords.len() % 2 != 0 {
        return Err(DataError::Malformed {
            line: line_no,
            reason: format!("odd number of coordinates ({})", coords.len()),
        });
    }

    let mut points = Vec::with_capacity(coords.len() / 2);
    for pair in coords.chunks(2) {
        let lat = parse_coord(pair[0], line_no)?;
        let lon = parse_coord(pair[1], line_no)?;
        points.push(Point::new(lat, lon));
    }

    Ok(Some(ShapeRecord {
        label: parts[0].to_string(),
        color: parts[1].to_string(),
        points,
    }))
}

fn parse_coord(raw: &str, line_no: usize) -> Result<f64, DataError> {
    raw.parse::<f64>().map_err(|e| DataError::Malformed {
        line: line_no,
        reason: format!("bad coordinate {raw:?}: {e}"),
    })
}

pub fn parse_shapes(text: &str) -> Result<Vec<ShapeRecord>, DataError> {
    let mut shapes = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        if let Some(shape) = parse_shape_line(line, idx + 1)? {
            if shape.points.is_empty() {
                log::warn!("Skipping shape {:?} on line {} without coordinates", shape.label, idx + 1);
                continue;
            }
            shapes.push(shape);
        }
    }
    Ok(shapes)
}

pub fn read_shapes<P: AsRef<Path>>(path: P) -> Result<Vec<ShapeRecord>, DataError> {
    let text = fs::read_to_string(path)?;
    parse_shapes(&text)
}

/// Obstacle polygons from a shapes file.
pub fn read_obstacles<P: AsRef<Path>>(path: P) -> Result<Vec<Polygon>, DataError> {
    let shapes = read_shapes(path)?;
    let polygons = shapes
        .iter()
        .map(|shape| shape.polygon())
        .collect::<Result<Vec<_>, _>>()?;
    log::debug!("Loaded {} obstacle polygons", polygons.len());
    Ok(polygons)
}

/// The terrain is the first shape in its file; `None` if the file has none.
pub fn read_terrain<P: AsRef<Path>>(path: P) -> Result<Option<Polygon>, DataError> {
    match read_shapes(path)?.first() {
        Some(shape) => Ok(Some(shape.polygon()?)),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_a_shape_line() {
        let shape = parse_shape_line("water,blue,48.1,1.9,48.2,1.9,48.2,2.0", 1)
            .expect("parse")
            .expect("shape");
        assert_eq!(shape.label, "water");
        assert_eq!(shape.color, "blue");
        assert_eq!(shape.points.len(), 3);
        assert_eq!(shape.points[1], Point::new(48.2, 1.9));
    }

    #[test]
    fn blank_lines_are_skipped() {
        assert_eq!(parse_shape_line("   ", 3).expect("parse"), None);
        let shapes = parse_shapes("\nbunker,sand,0,0,0,1,1,1\n\n").expect("parse");
        assert_eq!(shapes.len(), 1);
    }

    #[test]
    fn malformed_lines_report_their_number() {
        let err = parse_shapes("a,b,0,0,0,1,1,1\ntree,green,1.0,2.0,3.0").unwrap_err();
        assert!(matches!(err, DataError::Malformed { line: 2, .. }));
        let err = parse_shape_line("tree,green,1.0,north", 7).unwrap_err();
        assert!(err.to_string().starts_with("line 7: bad coordinate"));
    }

    #[test]
    fn reads_obstacles_and_terrain_files() {
        let mut obstacles = tempfile::NamedTempFile::new().expect("tmp");
        writeln!(obstacles, "water,blue,0,0,0,1,1,1,1,0").expect("write");
        writeln!(obstacles, "trees,green,2,2,2,3,3,3").expect("write");
        let polygons = read_obstacles(obstacles.path()).expect("obstacles");
        assert_eq!(polygons.len(), 2);
        assert_eq!(polygons[0].vertices().len(), 4);

        let mut terrain = tempfile::NamedTempFile::new().expect("tmp");
        writeln!(terrain, "fairway,white,-1,-1,-1,5,5,5,5,-1").expect("write");
        let polygon = read_terrain(terrain.path()).expect("terrain").expect("some");
        assert_eq!(polygon.vertices().len(), 4);

        let empty = tempfile::NamedTempFile::new().expect("tmp");
        assert_eq!(read_terrain(empty.path()).expect("terrain"), None);
    }

    #[test]
    fn degenerate_polygons_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().expect("tmp");
        writeln!(file, "line,red,0,0,1,1").expect("write");
        assert!(matches!(
            read_obstacles(file.path()),
            Err(DataError::Geometry(GeometryError::TooFewVertices(2)))
        ));
    }
}

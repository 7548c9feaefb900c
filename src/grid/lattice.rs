use thiserror::Error;

use crate::geo::BoundingBox;
use crate::Point;

/// Largest lattice `generate` will build. Far above any course at a sensible
/// spacing; the visibility build is quadratic in this number.
pub const MAX_NODES: u64 = 200_000;

/// Rejected grid parameters. Raised before any node is produced.
#[derive(Debug, Error, PartialEq)]
pub enum GridError {
    #[error("grid spacing must be strictly positive, got {0}")]
    InvalidSpacing(f64),
    #[error("empty latitude range [{min}, {max})")]
    EmptyLatitudeRange { min: f64, max: f64 },
    #[error("empty longitude range [{min}, {max})")]
    EmptyLongitudeRange { min: f64, max: f64 },
    #[error("grid bounds must be finite")]
    NonFinite,
    #[error("grid would have {count} nodes, more than the limit of {limit}")]
    TooManyNodes { count: u64, limit: u64 },
}

/// Checks the bounding box and spacing without generating anything.
pub fn validate(bounds: &BoundingBox, spacing: f64) -> Result<(), GridError> {
    let all = [
        bounds.lat_min,
        bounds.lat_max,
        bounds.lon_min,
        bounds.lon_max,
        spacing,
    ];
    if all.iter().any(|v| !v.is_finite()) {
        return Err(GridError::NonFinite);
    }
    if spacing <= 0.0 {
        return Err(GridError::InvalidSpacing(spacing));
    }
    if bounds.lat_min >= bounds.lat_max {
        return Err(GridError::EmptyLatitudeRange {
            min: bounds.lat_min,
            max: bounds.lat_max,
        });
    }
    if bounds.lon_min >= bounds.lon_max {
        return Err(GridError::EmptyLongitudeRange {
            min: bounds.lon_min,
            max: bounds.lon_max,
        });
    }
    let count = axis_len(bounds.lat_min, bounds.lat_max, spacing)
        .saturating_mul(axis_len(bounds.lon_min, bounds.lon_max, spacing));
    if count > MAX_NODES {
        return Err(GridError::TooManyNodes {
            count,
            limit: MAX_NODES,
        });
    }
    Ok(())
}

/// Upper estimate of the samples on one axis. Float-to-int casts saturate.
fn axis_len(min: f64, max: f64, spacing: f64) -> u64 {
    ((max - min) / spacing).ceil() as u64
}

/// Regular lattice over `bounds` at `spacing` degrees.
///
/// Both axes are half-open, so the maximum itself is never emitted. Rows run
/// south to north and each row runs west to east.
pub fn generate(bounds: &BoundingBox, spacing: f64) -> Result<Vec<Point>, GridError> {
    validate(bounds, spacing)?;

    let lats = axis(bounds.lat_min, bounds.lat_max, spacing);
    let lons = axis(bounds.lon_min, bounds.lon_max, spacing);

    let mut nodes = Vec::with_capacity(lats.len() * lons.len());
    for &lat in &lats {
        for &lon in &lons {
            nodes.push(Point::new(lat, lon));
        }
    }
    log::debug!(
        "Generated {} x {} grid ({} nodes) at spacing {}",
        lats.len(),
        lons.len(),
        nodes.len(),
        spacing
    );
    Ok(nodes)
}

fn axis(min: f64, max: f64, spacing: f64) -> Vec<f64> {
    let mut values = Vec::with_capacity(axis_len(min, max, spacing) as usize + 1);
    let mut i = 0u64;
    loop {
        let v = min + i as f64 * spacing;
        if v >= max {
            break;
        }
        values.push(v);
        i += 1;
    }
    values
}

/// Appends each of `required` that is not already present.
///
/// Existing duplicates in `nodes` are left alone.
pub fn ensure_included(nodes: &mut Vec<Point>, required: &[Point]) {
    for &p in required {
        if !nodes.contains(&p) {
            nodes.push(p);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_square_at_half_spacing() {
        let nodes = generate(&BoundingBox::new(0.0, 1.0, 0.0, 1.0), 0.5).expect("grid");
        assert_eq!(
            nodes,
            vec![
                Point::new(0.0, 0.0),
                Point::new(0.0, 0.5),
                Point::new(0.5, 0.0),
                Point::new(0.5, 0.5),
            ]
        );
    }

    #[test]
    fn uneven_step_stops_before_max() {
        let nodes = generate(&BoundingBox::new(0.0, 0.3, 0.0, 0.25), 0.1).expect("grid");
        // 0.0, 0.1, 0.2 on both axes; 0.30000000000000004 is past the bound.
        assert_eq!(nodes.len(), 9);
        assert!(nodes.iter().all(|p| p.lat < 0.3 && p.lon < 0.25));
    }

    #[test]
    fn rejects_bad_parameters() {
        let bounds = BoundingBox::new(0.0, 1.0, 0.0, 1.0);
        assert_eq!(generate(&bounds, 0.0), Err(GridError::InvalidSpacing(0.0)));
        assert_eq!(generate(&bounds, -0.1), Err(GridError::InvalidSpacing(-0.1)));
        assert!(matches!(
            generate(&BoundingBox::new(1.0, 1.0, 0.0, 1.0), 0.5),
            Err(GridError::EmptyLatitudeRange { .. })
        ));
        assert!(matches!(
            generate(&BoundingBox::new(0.0, 1.0, 2.0, 1.0), 0.5),
            Err(GridError::EmptyLongitudeRange { .. })
        ));
        assert_eq!(
            generate(&BoundingBox::new(0.0, f64::NAN, 0.0, 1.0), 0.5),
            Err(GridError::NonFinite)
        );
    }

    #[test]
    fn rejects_oversized_lattice_before_allocating() {
        let bounds = BoundingBox::new(0.0, 1.0, 0.0, 1.0);
        assert_eq!(
            generate(&bounds, 1e-5),
            Err(GridError::TooManyNodes {
                count: 10_000_000_000,
                limit: MAX_NODES,
            })
        );
        assert!(matches!(
            generate(&bounds, f64::MIN_POSITIVE),
            Err(GridError::TooManyNodes { count: u64::MAX, .. })
        ));
        // 400 x 400 sits under the cap.
        assert_eq!(generate(&bounds, 0.0025).map(|n| n.len()), Ok(160_000));
    }

    #[test]
    fn tee_and_hole_are_appended_once() {
        let mut nodes = generate(&BoundingBox::new(0.0, 1.0, 0.0, 1.0), 0.5).expect("grid");
        let tee = Point::new(0.0, 0.0);
        let hole = Point::new(0.9, 0.9);
        ensure_included(&mut nodes, &[tee, hole]);
        ensure_included(&mut nodes, &[tee, hole]);
        assert_eq!(nodes.len(), 5);
        assert_eq!(nodes.last(), Some(&hole));
    }
}

use serde::{Deserialize, Serialize};

use crate::clubs::catalog::{Catalog, CatalogEntry};
use crate::Point;

/// One shot of a planned hole.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PlannedSegment {
    pub start: Point,
    pub end: Point,
    pub club: CatalogEntry,
    /// Great-circle length in meters.
    pub length: f64,
}

/// Picks the shortest-range club that still covers `segment_length`.
///
/// First-segment-only clubs are skipped unless this is the first shot. When
/// nothing eligible reaches, the fallback is the named default, otherwise the
/// shortest eligible club. Clubs with equal range keep their catalog order.
pub fn select(segment_length: f64, is_first_segment: bool, catalog: &Catalog) -> &CatalogEntry {
    let mut eligible: Vec<&CatalogEntry> = catalog
        .entries()
        .iter()
        .filter(|entry| is_first_segment || !entry.first_segment_only)
        .collect();
    eligible.sort_by(|a, b| a.max_range.total_cmp(&b.max_range));

    if let Some(entry) = eligible
        .iter()
        .copied()
        .find(|entry| entry.max_range >= segment_length)
    {
        return entry;
    }
    catalog
        .default_entry()
        .or_else(|| eligible.first().copied())
        .unwrap_or_else(|| catalog.fallback())
}

/// Assigns a club to every consecutive pair of `path` points.
pub fn assign(path: &[Point], catalog: &Catalog) -> Vec<PlannedSegment> {
    path.windows(2)
        .enumerate()
        .map(|(i, pair)| {
            let (start, end) = (pair[0], pair[1]);
            let length = start.distance(&end);
            PlannedSegment {
                start,
                end,
                club: select(length, i == 0, catalog).clone(),
                length,
            }
        })
        .collect()
}

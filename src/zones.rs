//! Named facial regions as landmark-index polygons.
//!
//! Indices refer to the 468-point face mesh topology. Left and right are
//! the subject's own sides, so "left" regions appear on the right half of
//! an unmirrored frame.

use std::sync::OnceLock;

use serde::Serialize;

use crate::error::{Error, Result};

/// Landmark count of the face mesh topology every index here assumes.
pub const LANDMARK_COUNT: usize = 468;

/// Forehead center, top of the face.
pub const FOREHEAD_TOP: usize = 10;
/// Chin center, bottom of the face.
pub const CHIN_BOTTOM: usize = 152;
/// Outer face edge on the image-left side.
pub const FACE_LEFT: usize = 234;
/// Outer face edge on the image-right side.
pub const FACE_RIGHT: usize = 454;
/// Forehead pair used for roll.
pub const ROLL_LEFT: usize = 151;
pub const ROLL_RIGHT: usize = 337;

/// Outer face outline, forehead center clockwise around the jaw.
pub const FACE_CONTOUR: [usize; 36] = [
    10, 338, 297, 332, 284, 251, 389, 356, 454, 323, 361, 288, 397, 365, 379, 378, 400, 377, 152,
    148, 176, 149, 150, 136, 172, 58, 132, 93, 234, 127, 162, 21, 54, 103, 67, 109,
];

const STANDARD_ZONES: &[(&str, &[usize])] = &[
    (
        "forehead",
        &[
            109, 10, 338, 297, 332, 333, 334, 296, 336, 9, 107, 66, 105, 104, 103, 67,
        ],
    ),
    ("left_cheek", &[345, 346, 347, 330, 266, 425, 411, 352]),
    ("right_cheek", &[116, 117, 118, 101, 36, 205, 187, 123]),
    (
        "nose",
        &[168, 417, 465, 343, 294, 327, 326, 2, 97, 98, 64, 114, 245, 193],
    ),
    (
        "lips",
        &[
            61, 185, 40, 39, 37, 0, 267, 269, 270, 409, 291, 375, 321, 405, 314, 17, 84, 181, 91,
            146,
        ],
    ),
    ("chin", &[18, 313, 421, 400, 377, 152, 148, 176, 201, 83]),
    (
        "left_eye",
        &[
            263, 249, 390, 373, 374, 380, 381, 382, 362, 398, 384, 385, 386, 387, 388, 466,
        ],
    ),
    (
        "right_eye",
        &[
            33, 7, 163, 144, 145, 153, 154, 155, 133, 173, 157, 158, 159, 160, 161, 246,
        ],
    ),
    (
        "left_eyebrow",
        &[276, 283, 282, 295, 285, 336, 296, 334, 293, 300],
    ),
    ("right_eyebrow", &[46, 53, 52, 65, 55, 107, 66, 105, 63, 70]),
];

/// A named closed polygon over landmark indices. The last index connects
/// back to the first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Zone {
    pub name: String,
    pub indices: Vec<usize>,
}

/// Immutable zone lookup, shared read-only by every frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ZoneTable {
    zones: Vec<Zone>,
}

impl ZoneTable {
    /// Build a table, checking every index against the landmark cardinality.
    pub fn new(zones: Vec<Zone>, landmark_count: usize) -> Result<Self> {
        for zone in &zones {
            if let Some(&index) = zone.indices.iter().find(|&&i| i >= landmark_count) {
                return Err(Error::MissingLandmark {
                    index,
                    len: landmark_count,
                });
            }
        }
        let mut zones = zones;
        zones.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(Self { zones })
    }

    /// The built-in face mesh zones.
    pub fn standard() -> &'static ZoneTable {
        static TABLE: OnceLock<ZoneTable> = OnceLock::new();
        TABLE.get_or_init(|| {
            let mut zones: Vec<Zone> = STANDARD_ZONES
                .iter()
                .map(|(name, indices)| Zone {
                    name: (*name).to_string(),
                    indices: indices.to_vec(),
                })
                .collect();
            zones.sort_by(|a, b| a.name.cmp(&b.name));
            ZoneTable { zones }
        })
    }

    /// Look up a zone by name.
    pub fn get(&self, name: &str) -> Result<&Zone> {
        self.zones
            .binary_search_by(|z| z.name.as_str().cmp(name))
            .map(|i| &self.zones[i])
            .map_err(|_| Error::UnknownZone(name.to_string()))
    }

    /// Zones in name order.
    pub fn iter(&self) -> std::slice::Iter<'_, Zone> {
        self.zones.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.zones.iter().map(|z| z.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Highest landmark index any zone refers to.
    pub fn max_index(&self) -> Option<usize> {
        self.zones.iter().flat_map(|z| z.indices.iter().copied()).max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_table_fits_landmark_count() {
        let table = ZoneTable::standard();
        assert_eq!(table.len(), STANDARD_ZONES.len());
        assert!(table.max_index().unwrap() < LANDMARK_COUNT);
        assert!(FACE_CONTOUR.iter().all(|&i| i < LANDMARK_COUNT));
        for zone in table.iter() {
            assert!(zone.indices.len() >= 3, "zone {} is not a polygon", zone.name);
        }
    }

    #[test]
    fn lookup_by_name() {
        let table = ZoneTable::standard();
        assert_eq!(table.get("chin").unwrap().indices[0], 18);
        assert!(matches!(table.get("ears"), Err(Error::UnknownZone(_))));
    }

    #[test]
    fn names_are_sorted() {
        let names: Vec<_> = ZoneTable::standard().names().collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }

    #[test]
    fn custom_table_rejects_out_of_range_indices() {
        let zones = vec![Zone {
            name: "tri".to_string(),
            indices: vec![0, 1, 5],
        }];
        assert!(ZoneTable::new(zones.clone(), 6).is_ok());
        assert!(matches!(
            ZoneTable::new(zones, 5),
            Err(Error::MissingLandmark { index: 5, len: 5 })
        ));
    }
}

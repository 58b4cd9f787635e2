//! Point types decoded from placemark documents and classified for matching.

use geo::Point;
use serde::{Deserialize, Serialize};

/// Identifier given to placemarks whose name is empty after trimming.
pub const NO_NAME: &str = "(NO_NAME)";

/// Anything with a geographic position in decimal degrees.
pub trait Located {
    fn lat(&self) -> f64;
    fn lon(&self) -> f64;

    /// Position as a `geo` point (x = lon, y = lat)
    fn point(&self) -> Point<f64> {
        Point::new(self.lon(), self.lat())
    }
}

/// Anything keyed by a placemark identifier.
pub trait Identified {
    fn id(&self) -> &str;
}

/// Raw point placemark as produced by the KML parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Placemark name, trimmed; may be empty
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    /// Enclosing folder names joined with '/', outermost first
    pub group_label: String,
}

impl GeoPoint {
    pub fn new(name: impl Into<String>, lat: f64, lon: f64, group_label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lat,
            lon,
            group_label: group_label.into(),
        }
    }

    /// Identifier used for matching: the trimmed name, or [`NO_NAME`] when empty.
    pub fn identifier(&self) -> String {
        let trimmed = self.name.trim();
        if trimmed.is_empty() {
            NO_NAME.to_string()
        } else {
            trimmed.to_string()
        }
    }
}

/// A home-pass point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HpEntity {
    pub hp_id: String,
    pub lat: f64,
    pub lon: f64,
    pub group_label: String,
}

impl HpEntity {
    pub fn new(hp_id: impl Into<String>, lat: f64, lon: f64, group_label: impl Into<String>) -> Self {
        Self {
            hp_id: hp_id.into(),
            lat,
            lon,
            group_label: group_label.into(),
        }
    }

    pub fn from_point(point: &GeoPoint) -> Self {
        Self::new(point.identifier(), point.lat, point.lon, point.group_label.as_str())
    }
}

/// A termination (FAT) point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FatEntity {
    pub fat_id: String,
    pub lat: f64,
    pub lon: f64,
    pub group_label: String,
}

impl FatEntity {
    pub fn new(fat_id: impl Into<String>, lat: f64, lon: f64, group_label: impl Into<String>) -> Self {
        Self {
            fat_id: fat_id.into(),
            lat,
            lon,
            group_label: group_label.into(),
        }
    }

    pub fn from_point(point: &GeoPoint) -> Self {
        Self::new(point.identifier(), point.lat, point.lon, point.group_label.as_str())
    }
}

impl Located for GeoPoint {
    fn lat(&self) -> f64 {
        self.lat
    }

    fn lon(&self) -> f64 {
        self.lon
    }
}

impl Located for HpEntity {
    fn lat(&self) -> f64 {
        self.lat
    }

    fn lon(&self) -> f64 {
        self.lon
    }
}

impl Located for FatEntity {
    fn lat(&self) -> f64 {
        self.lat
    }

    fn lon(&self) -> f64 {
        self.lon
    }
}

impl Identified for HpEntity {
    fn id(&self) -> &str {
        &self.hp_id
    }
}

impl Identified for FatEntity {
    fn id(&self) -> &str {
        &self.fat_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_trims_name() {
        let p = GeoPoint::new("  HP-01 ", -6.2, 106.8, "AREA/HP");
        assert_eq!(p.identifier(), "HP-01");
    }

    #[test]
    fn test_identifier_placeholder_for_blank_name() {
        let p = GeoPoint::new("   ", -6.2, 106.8, "AREA/HP");
        assert_eq!(p.identifier(), NO_NAME);

        let hp = HpEntity::from_point(&p);
        assert_eq!(hp.hp_id, NO_NAME);
        assert_eq!(hp.group_label, "AREA/HP");
    }

    #[test]
    fn test_point_is_lon_lat() {
        let hp = HpEntity::new("HP1", -6.2, 106.8, "");
        let pt = hp.point();
        assert_eq!(pt.x(), 106.8);
        assert_eq!(pt.y(), -6.2);
    }
}

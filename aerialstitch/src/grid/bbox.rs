//! Geographic bounding box.

use super::GridError;
use crate::coord::{CoordError, GeoPoint};
use std::fmt;

/// Axis-aligned latitude/longitude rectangle.
///
/// Always satisfies `north > south` and `east > west`; boxes crossing the
/// antimeridian are not representable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    north: f64,
    south: f64,
    east: f64,
    west: f64,
}

impl BoundingBox {
    /// Creates a bounding box from its four edges in degrees.
    ///
    /// # Errors
    ///
    /// * `GridError::Coord` if any edge is NaN
    /// * `GridError::DegenerateBoundingBox` if the box has no area
    pub fn new(north: f64, south: f64, east: f64, west: f64) -> Result<Self, GridError> {
        for (lat, lon) in [(north, east), (south, west)] {
            if lat.is_nan() || lon.is_nan() {
                return Err(CoordError::InvalidCoordinate { lat, lon }.into());
            }
        }

        if north <= south {
            return Err(GridError::DegenerateBoundingBox(format!(
                "north ({}) must be greater than south ({})",
                north, south
            )));
        }
        if east <= west {
            return Err(GridError::DegenerateBoundingBox(format!(
                "east ({}) must be greater than west ({})",
                east, west
            )));
        }

        Ok(Self {
            north,
            south,
            east,
            west,
        })
    }

    pub fn north(&self) -> f64 {
        self.north
    }

    pub fn south(&self) -> f64 {
        self.south
    }

    pub fn east(&self) -> f64 {
        self.east
    }

    pub fn west(&self) -> f64 {
        self.west
    }

    pub fn north_east(&self) -> GeoPoint {
        GeoPoint::new(self.north, self.east)
    }

    pub fn south_west(&self) -> GeoPoint {
        GeoPoint::new(self.south, self.west)
    }

    /// Returns true if `point` lies inside or on the edge of the box.
    pub fn contains(&self, point: &GeoPoint) -> bool {
        (self.south..=self.north).contains(&point.lat)
            && (self.west..=self.east).contains(&point.lon)
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "N {:.6} S {:.6} E {:.6} W {:.6}",
            self.north, self.south, self.east, self.west
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_box() {
        let bbox = BoundingBox::new(42.062451, 42.049705, -87.668189, -87.686433).unwrap();
        assert_eq!(bbox.north(), 42.062451);
        assert_eq!(bbox.west(), -87.686433);
        assert_eq!(bbox.north_east(), GeoPoint::new(42.062451, -87.668189));
        assert_eq!(bbox.south_west(), GeoPoint::new(42.049705, -87.686433));
    }

    #[test]
    fn test_north_not_above_south_is_degenerate() {
        let result = BoundingBox::new(10.0, 10.0, 5.0, 4.0);
        assert!(matches!(result, Err(GridError::DegenerateBoundingBox(_))));

        let result = BoundingBox::new(9.0, 10.0, 5.0, 4.0);
        assert!(matches!(result, Err(GridError::DegenerateBoundingBox(_))));
    }

    #[test]
    fn test_east_not_right_of_west_is_degenerate() {
        let result = BoundingBox::new(10.0, 9.0, 4.0, 5.0);
        assert!(matches!(result, Err(GridError::DegenerateBoundingBox(_))));
    }

    #[test]
    fn test_nan_edge_is_invalid_coordinate() {
        let result = BoundingBox::new(f64::NAN, 9.0, 5.0, 4.0);
        assert!(matches!(
            result,
            Err(GridError::Coord(CoordError::InvalidCoordinate { .. }))
        ));
    }

    #[test]
    fn test_contains() {
        let bbox = BoundingBox::new(10.0, 0.0, 10.0, 0.0).unwrap();
        assert!(bbox.contains(&GeoPoint::new(5.0, 5.0)));
        assert!(bbox.contains(&GeoPoint::new(10.0, 0.0)));
        assert!(!bbox.contains(&GeoPoint::new(11.0, 5.0)));
    }

    #[test]
    fn test_display() {
        let bbox = BoundingBox::new(1.5, -1.5, 2.0, -2.0).unwrap();
        assert_eq!(
            bbox.to_string(),
            "N 1.500000 S -1.500000 E 2.000000 W -2.000000"
        );
    }
}

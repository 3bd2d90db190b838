use serde::{Deserialize, Serialize};

use rally_core::{AppError, AppResult};

/// Half-width in degrees of the proximity-search square.
///
/// This is a degree-space approximation (roughly 22 km at the equator),
/// not a great-circle radius. It governs which events a search returns,
/// so it must not be replaced by a spherical distance check.
pub const SEARCH_HALF_WIDTH_DEG: f64 = 0.2;

/// A validated latitude/longitude pair.
///
/// Coordinates are only ever produced by the geocoding gateway; callers
/// never supply them directly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

impl Coordinates {
    /// Creates a coordinate pair, rejecting values outside the valid
    /// latitude/longitude ranges or non-finite floats.
    pub fn new(latitude: f64, longitude: f64) -> AppResult<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(AppError::Validation(format!(
                "latitude {latitude} is outside [-90, 90]"
            )));
        }

        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(AppError::Validation(format!(
                "longitude {longitude} is outside [-180, 180]"
            )));
        }

        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Returns the latitude in degrees.
    #[must_use]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Returns the longitude in degrees.
    #[must_use]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// Axis-aligned rectangle in latitude/longitude space used as the coarse
/// proximity filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    min_latitude: f64,
    max_latitude: f64,
    min_longitude: f64,
    max_longitude: f64,
}

impl BoundingBox {
    /// Builds the square box of the given half-width centered on a point.
    ///
    /// Edges are clamped to valid coordinate ranges; the box never wraps
    /// the antimeridian.
    #[must_use]
    pub fn around(center: Coordinates, half_width: f64) -> Self {
        Self {
            min_latitude: (center.latitude() - half_width).max(-90.0),
            max_latitude: (center.latitude() + half_width).min(90.0),
            min_longitude: (center.longitude() - half_width).max(-180.0),
            max_longitude: (center.longitude() + half_width).min(180.0),
        }
    }

    /// Returns whether a point lies inside the box. Inclusive on all four
    /// edges.
    #[must_use]
    pub fn contains(&self, point: Coordinates) -> bool {
        point.latitude() >= self.min_latitude
            && point.latitude() <= self.max_latitude
            && point.longitude() >= self.min_longitude
            && point.longitude() <= self.max_longitude
    }

    /// Returns the southern edge.
    #[must_use]
    pub fn min_latitude(&self) -> f64 {
        self.min_latitude
    }

    /// Returns the northern edge.
    #[must_use]
    pub fn max_latitude(&self) -> f64 {
        self.max_latitude
    }

    /// Returns the western edge.
    #[must_use]
    pub fn min_longitude(&self) -> f64 {
        self.min_longitude
    }

    /// Returns the eastern edge.
    #[must_use]
    pub fn max_longitude(&self) -> f64 {
        self.max_longitude
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::{BoundingBox, Coordinates, SEARCH_HALF_WIDTH_DEG};

    fn point(latitude: f64, longitude: f64) -> Coordinates {
        Coordinates::new(latitude, longitude).unwrap_or_else(|_| panic!("test"))
    }

    #[test]
    fn latitude_out_of_range_is_rejected() {
        assert!(Coordinates::new(90.1, 0.0).is_err());
        assert!(Coordinates::new(-90.1, 0.0).is_err());
    }

    #[test]
    fn longitude_out_of_range_is_rejected() {
        assert!(Coordinates::new(0.0, 180.1).is_err());
        assert!(Coordinates::new(0.0, -180.1).is_err());
    }

    #[test]
    fn non_finite_values_are_rejected() {
        assert!(Coordinates::new(f64::NAN, 0.0).is_err());
        assert!(Coordinates::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn box_edges_are_inclusive() {
        let center = point(-34.6, -58.4);
        let bounding_box = BoundingBox::around(center, SEARCH_HALF_WIDTH_DEG);

        assert!(bounding_box.contains(point(bounding_box.min_latitude(), -58.4)));
        assert!(bounding_box.contains(point(bounding_box.max_latitude(), -58.4)));
        assert!(bounding_box.contains(point(-34.6, bounding_box.min_longitude())));
        assert!(bounding_box.contains(point(-34.6, bounding_box.max_longitude())));
    }

    #[test]
    fn points_just_outside_the_box_are_excluded() {
        let center = point(-34.6, -58.4);
        let bounding_box = BoundingBox::around(center, SEARCH_HALF_WIDTH_DEG);

        assert!(!bounding_box.contains(point(-34.81, -58.4)));
        assert!(!bounding_box.contains(point(-34.6, -58.19)));
        assert!(!bounding_box.contains(point(0.0, 0.0)));
    }

    #[test]
    fn box_is_clamped_at_the_poles() {
        let bounding_box = BoundingBox::around(point(89.9, 0.0), SEARCH_HALF_WIDTH_DEG);
        assert!((bounding_box.max_latitude() - 90.0).abs() < f64::EPSILON);
    }

    proptest! {
        #[test]
        fn points_well_inside_are_contained(
            center_lat in -89.0_f64..89.0,
            center_lon in -179.0_f64..179.0,
            offset_lat in -0.19_f64..0.19,
            offset_lon in -0.19_f64..0.19,
        ) {
            let center = point(center_lat, center_lon);
            let bounding_box = BoundingBox::around(center, SEARCH_HALF_WIDTH_DEG);
            prop_assert!(bounding_box.contains(point(center_lat + offset_lat, center_lon + offset_lon)));
        }

        #[test]
        fn points_well_outside_are_excluded(
            center_lat in -89.0_f64..89.0,
            center_lon in -179.0_f64..179.0,
            offset in 0.21_f64..0.5,
        ) {
            let center = point(center_lat, center_lon);
            let bounding_box = BoundingBox::around(center, SEARCH_HALF_WIDTH_DEG);
            prop_assert!(!bounding_box.contains(point(center_lat + offset, center_lon)));
            prop_assert!(!bounding_box.contains(point(center_lat, center_lon - offset)));
        }
    }
}

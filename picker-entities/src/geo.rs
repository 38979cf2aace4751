/// The fallback map center if neither the caller nor the device provides one.
pub const FALLBACK_CENTER: Coordinate = Coordinate::new(34.4346, 35.8362);

/// A geographical position in degrees.
///
/// The values are not range checked: whatever the map reports
/// or the caller passes is kept as is.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self::new(lat, lng)
    }
}

impl From<Coordinate> for (f64, f64) {
    fn from(c: Coordinate) -> Self {
        (c.lat, c.lng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_values_are_kept() {
        let c = Coordinate::new(123.0, -500.0);
        assert_eq!(c.lat, 123.0);
        assert_eq!(c.lng, -500.0);
        assert!(c.is_finite());
        assert!(!Coordinate::new(f64::NAN, 0.0).is_finite());
    }

    #[test]
    fn convert_from_and_into_tuple() {
        let c: Coordinate = (40.0, -70.0).into();
        assert_eq!(c, Coordinate::new(40.0, -70.0));
        assert_eq!(<(f64, f64)>::from(c), (40.0, -70.0));
    }
}

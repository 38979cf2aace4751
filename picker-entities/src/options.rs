use crate::geo::{Coordinate, FALLBACK_CENTER};

pub const DEFAULT_ZOOM: f64 = 15.0;

/// Options of the picker itself.
///
/// Read once during construction.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct PickerOptions {
    /// Ask the device for its location if no initial position is given.
    pub set_current_position: bool,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl Default for PickerOptions {
    fn default() -> Self {
        Self {
            set_current_position: true,
            lat: None,
            lng: None,
        }
    }
}

impl PickerOptions {
    pub fn with_position(lat: f64, lng: f64) -> Self {
        Self {
            lat: Some(lat),
            lng: Some(lng),
            ..Default::default()
        }
    }

    /// The latitude if it has been supplied.
    ///
    /// `NaN` (e.g. parsed from an empty form field) counts as missing,
    /// whereas `0.0` is a regular latitude.
    pub fn supplied_lat(&self) -> Option<f64> {
        self.lat.filter(|v| !v.is_nan())
    }

    /// The longitude if it has been supplied.
    pub fn supplied_lng(&self) -> Option<f64> {
        self.lng.filter(|v| !v.is_nan())
    }

    pub fn requests_current_position(&self) -> bool {
        self.set_current_position
            && self.supplied_lat().is_none()
            && self.supplied_lng().is_none()
    }
}

/// Defaults of the map that apply if the caller does not override them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapDefaults {
    pub center: Coordinate,
    pub zoom: f64,
}

impl Default for MapDefaults {
    fn default() -> Self {
        Self {
            center: FALLBACK_CENTER,
            zoom: DEFAULT_ZOOM,
        }
    }
}

/// Caller overrides that are passed through to the map component.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct MapOptions {
    pub center: Option<Coordinate>,
    pub zoom: Option<f64>,
    pub min_zoom: Option<f64>,
    pub max_zoom: Option<f64>,
}

/// The effective configuration the map is created with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapConfig {
    pub center: Coordinate,
    pub zoom: f64,
    pub min_zoom: Option<f64>,
    pub max_zoom: Option<f64>,
}

impl MapOptions {
    /// Merge these overrides over the defaults.
    ///
    /// The default center is built per component: a supplied `lat` or `lng`
    /// of the picker options replaces the matching component of
    /// `defaults.center`. Afterwards every override that is present
    /// replaces the default value as a whole.
    pub fn resolve(&self, picker: &PickerOptions, defaults: &MapDefaults) -> MapConfig {
        let default_center = Coordinate {
            lat: picker.supplied_lat().unwrap_or(defaults.center.lat),
            lng: picker.supplied_lng().unwrap_or(defaults.center.lng),
        };
        MapConfig {
            center: self.center.unwrap_or(default_center),
            zoom: self.zoom.unwrap_or(defaults.zoom),
            min_zoom: self.min_zoom,
            max_zoom: self.max_zoom,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_without_overrides() {
        let cfg = MapOptions::default().resolve(&PickerOptions::default(), &MapDefaults::default());
        assert_eq!(cfg.center, FALLBACK_CENTER);
        assert_eq!(cfg.zoom, DEFAULT_ZOOM);
        assert_eq!(cfg.min_zoom, None);
        assert_eq!(cfg.max_zoom, None);
    }

    #[test]
    fn overrides_win_over_defaults() {
        let overrides = [
            MapOptions {
                zoom: Some(3.0),
                ..Default::default()
            },
            MapOptions {
                center: Some(Coordinate::new(-1.5, 2.5)),
                ..Default::default()
            },
            MapOptions {
                center: Some(Coordinate::new(7.0, 8.0)),
                zoom: Some(18.0),
                min_zoom: Some(2.0),
                max_zoom: Some(19.0),
            },
        ];
        let defaults = MapDefaults::default();
        for o in overrides {
            let cfg = o.resolve(&PickerOptions::default(), &defaults);
            assert_eq!(cfg.zoom, o.zoom.unwrap_or(DEFAULT_ZOOM));
            assert_eq!(cfg.center, o.center.unwrap_or(FALLBACK_CENTER));
            assert_eq!(cfg.min_zoom, o.min_zoom);
            assert_eq!(cfg.max_zoom, o.max_zoom);
        }
    }

    #[test]
    fn picker_position_replaces_fallback_center() {
        let picker = PickerOptions::with_position(10.0, 20.0);
        let cfg = MapOptions::default().resolve(&picker, &MapDefaults::default());
        assert_eq!(cfg.center, Coordinate::new(10.0, 20.0));
    }

    #[test]
    fn map_center_override_wins_over_picker_position() {
        let picker = PickerOptions::with_position(10.0, 20.0);
        let map = MapOptions {
            center: Some(Coordinate::new(1.0, 2.0)),
            ..Default::default()
        };
        let cfg = map.resolve(&picker, &MapDefaults::default());
        assert_eq!(cfg.center, Coordinate::new(1.0, 2.0));
    }

    #[test]
    fn single_component_is_merged_into_fallback() {
        let picker = PickerOptions {
            lat: Some(10.0),
            ..Default::default()
        };
        let cfg = MapOptions::default().resolve(&picker, &MapDefaults::default());
        assert_eq!(cfg.center, Coordinate::new(10.0, FALLBACK_CENTER.lng));
    }

    #[test]
    fn nan_components_count_as_missing() {
        let picker = PickerOptions {
            lat: Some(f64::NAN),
            lng: None,
            ..Default::default()
        };
        assert!(picker.requests_current_position());
        let cfg = MapOptions::default().resolve(&picker, &MapDefaults::default());
        assert_eq!(cfg.center, FALLBACK_CENTER);
    }

    /// The equator and the prime meridian are valid positions,
    /// so a zero is not treated like a missing (falsy) value.
    #[test]
    fn zero_is_a_supplied_component_not_a_falsy_one() {
        let picker = PickerOptions::with_position(0.0, 0.0);
        assert!(!picker.requests_current_position());
        let cfg = MapOptions::default().resolve(&picker, &MapDefaults::default());
        assert_eq!(cfg.center, Coordinate::new(0.0, 0.0));
    }

    #[test]
    fn current_position_request_rules() {
        assert!(PickerOptions::default().requests_current_position());
        assert!(!PickerOptions::with_position(10.0, 20.0).requests_current_position());
        let only_lng = PickerOptions {
            lng: Some(20.0),
            ..Default::default()
        };
        assert!(!only_lng.requests_current_position());
        let disabled = PickerOptions {
            set_current_position: false,
            ..Default::default()
        };
        assert!(!disabled.requests_current_position());
    }

    #[test]
    fn configured_defaults_are_used() {
        let defaults = MapDefaults {
            center: Coordinate::new(52.5, 13.4),
            zoom: 11.0,
        };
        let cfg = MapOptions::default().resolve(&PickerOptions::default(), &defaults);
        assert_eq!(cfg.center, defaults.center);
        assert_eq!(cfg.zoom, 11.0);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialize_camel_case_options() {
        let picker: PickerOptions =
            serde_json::from_str(r#"{"setCurrentPosition":false,"lat":1.5}"#).unwrap();
        assert!(!picker.set_current_position);
        assert_eq!(picker.lat, Some(1.5));
        assert_eq!(picker.lng, None);

        let picker: PickerOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(picker, PickerOptions::default());

        let map: MapOptions =
            serde_json::from_str(r#"{"center":{"lat":1.0,"lng":2.0},"maxZoom":18}"#).unwrap();
        assert_eq!(map.center, Some(Coordinate::new(1.0, 2.0)));
        assert_eq!(map.max_zoom, Some(18.0));
        assert_eq!(map.zoom, None);
    }
}

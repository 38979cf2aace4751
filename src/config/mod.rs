use anyhow::{anyhow, bail, Result};
use picker_entities::{
    geo::Coordinate,
    options::{MapDefaults, MapOptions},
};

use crate::binding::Seed;

mod raw;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub map: Map,
    pub tiles: Tiles,
    pub picker: Picker,
    pub form: Form,
}

impl Config {
    /// Parse a TOML configuration.
    ///
    /// Missing sections are taken from the default configuration.
    pub fn from_toml_str(cfg_string: &str) -> Result<Self> {
        let raw_config: raw::Config = toml::from_str(cfg_string)?;
        Self::try_from(raw_config)
    }

    /// Parse an optional TOML configuration or fall back to the defaults.
    pub fn from_toml_str_or_default(cfg_string: Option<&str>) -> Result<Self> {
        match cfg_string.map(str::trim).filter(|s| !s.is_empty()) {
            Some(cfg_string) => Self::from_toml_str(cfg_string),
            None => {
                log::info!("No configuration found => load default configuration.");
                Ok(Self::default())
            }
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::try_from(raw::Config::default()).expect("Default configuration")
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Map {
    pub defaults: MapDefaults,
    pub min_zoom: Option<f64>,
    pub max_zoom: Option<f64>,
}

impl Map {
    /// The pass-through options without any center or zoom override.
    pub fn options(&self) -> MapOptions {
        MapOptions {
            min_zoom: self.min_zoom,
            max_zoom: self.max_zoom,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tiles {
    pub url: String,
    pub attribution: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Picker {
    pub set_current_position: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Form {
    /// Id of the map container element.
    pub container: String,
    pub lat_field: String,
    pub lng_field: String,
    pub seed: Seed,
}

fn non_empty_id(name: &str, id: String) -> Result<String> {
    let id = id.trim().to_owned();
    if id.is_empty() {
        return Err(anyhow!("Missing element id for '{name}'"));
    }
    Ok(id)
}

fn check_zoom(name: &str, zoom: Option<f64>) -> Result<Option<f64>> {
    match zoom {
        Some(z) if !z.is_finite() || z < 0.0 => bail!("Invalid {name}: {z}"),
        _ => Ok(zoom),
    }
}

impl TryFrom<raw::Config> for Config {
    type Error = anyhow::Error;
    fn try_from(from: raw::Config) -> Result<Self> {
        let raw::Config {
            map,
            tiles,
            picker,
            form,
        } = from;

        let raw::Map {
            center,
            zoom,
            min_zoom,
            max_zoom,
        } = map.unwrap_or_default();

        let center = Coordinate::new(center.lat, center.lng);
        if !center.is_finite() {
            bail!("Invalid map center: {center:?}");
        }
        let zoom = check_zoom("zoom", Some(zoom))?.unwrap_or_default();
        let min_zoom = check_zoom("min-zoom", min_zoom)?;
        let max_zoom = check_zoom("max-zoom", max_zoom)?;
        if let (Some(min), Some(max)) = (min_zoom, max_zoom) {
            if min > max {
                bail!("The min-zoom ({min}) is greater than the max-zoom ({max})");
            }
        }
        let map = Map {
            defaults: MapDefaults { center, zoom },
            min_zoom,
            max_zoom,
        };

        let raw::Tiles { url, attribution } = tiles.unwrap_or_default();
        if url.trim().is_empty() {
            bail!("Missing tile URL");
        }
        let tiles = Tiles { url, attribution };

        let raw::Picker {
            set_current_position,
        } = picker.unwrap_or_default();
        let picker = Picker {
            set_current_position,
        };

        let raw::Form {
            container,
            lat_field,
            lng_field,
            seed,
            zoom,
        } = form.unwrap_or_default();

        let seed = match seed {
            raw::SeedMode::Fields => Seed::Fields {
                zoom: check_zoom("form zoom", zoom)?,
            },
            raw::SeedMode::CurrentPosition => {
                if zoom.is_some() {
                    log::warn!("The form zoom is only used when seeding from fields");
                }
                Seed::CurrentPosition
            }
        };

        let form = Form {
            container: non_empty_id("container", container)?,
            lat_field: non_empty_id("lat-field", lat_field)?,
            lng_field: non_empty_id("lng-field", lng_field)?,
            seed,
        };

        Ok(Self {
            map,
            tiles,
            picker,
            form,
        })
    }
}

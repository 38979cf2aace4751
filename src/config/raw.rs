use serde::Deserialize;

const DEFAULT_CONFIG_FILE: &[u8] = include_bytes!("location-picker.default.toml");

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub map: Option<Map>,
    pub tiles: Option<Tiles>,
    pub picker: Option<Picker>,
    pub form: Option<Form>,
}

impl Default for Config {
    fn default() -> Self {
        let cfg_string = std::str::from_utf8(DEFAULT_CONFIG_FILE).expect("UTF-8 configuration");
        let cfg: Self = toml::from_str(cfg_string).expect("Default configuration");
        cfg
    }
}

#[derive(Clone, Copy, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Map {
    pub center: LatLng,
    pub zoom: f64,
    pub min_zoom: Option<f64>,
    pub max_zoom: Option<f64>,
}

impl Default for Map {
    fn default() -> Self {
        Config::default().map.expect("Map configuration")
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Tiles {
    pub url: String,
    pub attribution: String,
}

impl Default for Tiles {
    fn default() -> Self {
        Config::default().tiles.expect("Tiles configuration")
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Picker {
    pub set_current_position: bool,
}

impl Default for Picker {
    fn default() -> Self {
        Config::default().picker.expect("Picker configuration")
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Form {
    pub container: String,
    pub lat_field: String,
    pub lng_field: String,
    pub seed: SeedMode,
    pub zoom: Option<f64>,
}

impl Default for Form {
    fn default() -> Self {
        Config::default().form.expect("Form configuration")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SeedMode {
    Fields,
    CurrentPosition,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_default_config_from_file() {
        let cfg = Config::default();
        assert!(cfg.map.is_some());
        assert!(cfg.tiles.is_some());
        assert!(cfg.picker.is_some());
        assert!(cfg.form.is_some());
    }

    #[test]
    fn default_form_config() {
        let form = Form::default();
        assert_eq!(form.container, "map");
        assert_eq!(form.lat_field, "lat");
        assert_eq!(form.lng_field, "long");
        assert_eq!(form.seed, SeedMode::Fields);
        assert!(form.zoom.is_none());
    }

    #[test]
    fn parse_seed_modes() {
        #[derive(Deserialize)]
        struct Wrapper {
            seed: SeedMode,
        }
        let w: Wrapper = toml::from_str(r#"seed = "current-position""#).unwrap();
        assert_eq!(w.seed, SeedMode::CurrentPosition);
        assert!(toml::from_str::<Wrapper>(r#"seed = "somewhere""#).is_err());
    }
}

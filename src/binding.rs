use std::{fmt, rc::Rc};

use picker_core::{LocationPicker, MapHost, Platform};
use picker_entities::{geo::Coordinate, options::PickerOptions};

use crate::config::Config;

/// The input fields of a form, addressed by id.
pub trait FormFields {
    fn value(&self, id: &str) -> Option<String>;
    fn set_value(&self, id: &str, value: &str);
}

/// Where the initial map position comes from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Seed {
    /// Read the position from the form fields.
    Fields { zoom: Option<f64> },
    /// Ignore the form fields and ask the device.
    CurrentPosition,
}

/// Keeps a latitude and a longitude field in sync
/// with the position of a [`LocationPicker`].
pub struct FormBinding<H>
where
    H: MapHost + 'static,
{
    picker: Rc<LocationPicker<H>>,
    fields: Rc<dyn FormFields>,
    lat_field: String,
    lng_field: String,
}

impl<H> FormBinding<H>
where
    H: MapHost + 'static,
{
    pub fn bind(host: &H, platform: Platform, fields: Rc<dyn FormFields>, config: &Config) -> Self {
        let form = &config.form;
        let mut options = PickerOptions {
            set_current_position: config.picker.set_current_position,
            ..Default::default()
        };
        let mut map_options = config.map.options();
        match form.seed {
            Seed::Fields { zoom } => {
                options.lat = fields.value(&form.lat_field).as_deref().and_then(parse_float);
                options.lng = fields.value(&form.lng_field).as_deref().and_then(parse_float);
                map_options.zoom = zoom;
            }
            Seed::CurrentPosition => {}
        }
        log::debug!("Bind form fields with {options:?}");

        let picker = LocationPicker::builder(host, platform)
            .options(options)
            .map_options(map_options)
            .defaults(config.map.defaults)
            .build(form.container.as_str());
        let picker = Rc::new(picker);

        let binding = Self {
            picker,
            fields,
            lat_field: form.lat_field.clone(),
            lng_field: form.lng_field.clone(),
        };
        {
            let fields = Rc::clone(&binding.fields);
            let lat_field = binding.lat_field.clone();
            let lng_field = binding.lng_field.clone();
            binding.picker.on_settle(move |picker| {
                write_position(&*fields, &lat_field, &lng_field, picker.marker_position());
            });
        }
        binding
    }

    pub fn picker(&self) -> &Rc<LocationPicker<H>> {
        &self.picker
    }

    /// Write the current marker position into the form fields.
    pub fn sync_fields(&self) {
        write_position(
            &*self.fields,
            &self.lat_field,
            &self.lng_field,
            self.picker.marker_position(),
        );
    }
}

impl<H> fmt::Debug for FormBinding<H>
where
    H: MapHost + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormBinding")
            .field("lat_field", &self.lat_field)
            .field("lng_field", &self.lng_field)
            .field("marker_position", &self.picker.marker_position())
            .finish_non_exhaustive()
    }
}

fn write_position(fields: &dyn FormFields, lat_field: &str, lng_field: &str, pos: Coordinate) {
    log::debug!("Write position {pos:?} into form fields");
    fields.set_value(lat_field, &format_number(pos.lat));
    fields.set_value(lng_field, &format_number(pos.lng));
}

/// Number to text conversion as browsers do it for `input.value = x`.
///
/// Shortest round-trip digits, exponent notation below `1e-6` and from
/// `1e21` on, and no sign for a negative zero.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_owned();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_owned();
    }
    if value.is_nan() || (1e-6..1e21).contains(&value.abs()) {
        return value.to_string();
    }
    let text = format!("{value:e}");
    match text.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
        _ => text,
    }
}

/// Lenient number parsing of a form field value.
///
/// Leading whitespace is skipped and the longest numeric prefix is used,
/// so `"40.5°"` yields `40.5`. Returns `None` if there is no number at all.
pub fn parse_float(text: &str) -> Option<f64> {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let int_end = digits_from(end);
    let mut has_digits = int_end > end;
    end = int_end;
    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        if has_digits || frac_end > end + 1 {
            has_digits = true;
            end = frac_end;
        }
    }
    if !has_digits {
        return None;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }
    s[..end].parse().ok()
}

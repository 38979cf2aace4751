use std::{cell::RefCell, rc::Rc};

use futures::future::LocalBoxFuture;
use location_picker::{Config, FormBinding};
use picker_core::{Platform, TaskSpawner};
use wasm_bindgen::prelude::*;
use web_sys::Document;

mod api;
mod form;
mod geolocation;
mod host;

pub use self::{
    api::JsLocationPicker, form::DomFormFields, geolocation::BrowserGeolocator, host::WebHost,
};

/// Id of an optional `<script type="application/toml">` element
/// that contains the page configuration.
const CONFIG_ELEMENT_ID: &str = "location-picker-config";

thread_local! {
    static FORM_BINDING: RefCell<Option<FormBinding<WebHost>>> = const { RefCell::new(None) };
}

#[derive(Debug, Default)]
pub struct BrowserSpawner;

impl TaskSpawner for BrowserSpawner {
    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        wasm_bindgen_futures::spawn_local(task);
    }
}

#[must_use]
pub fn platform() -> Platform {
    Platform::new(Rc::new(BrowserGeolocator), Rc::new(BrowserSpawner))
}

pub fn document() -> Result<Document, JsError> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsError::new("No document available"))
}

/// Load the configuration embedded in the page or fall back to the defaults.
#[must_use]
pub fn page_config() -> Config {
    let cfg_string = document()
        .ok()
        .and_then(|d| d.get_element_by_id(CONFIG_ELEMENT_ID))
        .and_then(|e| e.text_content());
    Config::from_toml_str_or_default(cfg_string.as_deref()).unwrap_or_else(|err| {
        log::error!("Invalid page configuration: {err:#}");
        Config::default()
    })
}

#[wasm_bindgen(start)]
pub fn start() {
    _ = console_log::init_with_level(log::Level::Info);
    console_error_panic_hook::set_once();
    log::debug!("Location picker loaded");
}

/// Bind the configured form fields to a new location picker.
///
/// The form of a page is only bound once.
#[wasm_bindgen(js_name = bindForm)]
pub fn bind_form() -> Result<(), JsError> {
    if FORM_BINDING.with(|b| b.borrow().is_some()) {
        log::warn!("Form fields are already bound");
        return Ok(());
    }
    let document = document()?;
    let config = page_config();
    let host = WebHost::new(document.clone(), config.tiles.clone());
    let fields = Rc::new(DomFormFields::new(document));
    let binding = FormBinding::bind(&host, platform(), fields, &config);
    log::info!("Bound form fields to location picker: {binding:?}");
    FORM_BINDING.with(|b| b.replace(Some(binding)));
    Ok(())
}

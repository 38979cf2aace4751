//! The JavaScript interface of the picker.

use std::rc::Rc;

use js_sys::Function;
use picker_core::{ElementRef, LocationPicker};
use picker_entities::{
    geo::Coordinate,
    options::{MapOptions, PickerOptions},
};
use serde::de::DeserializeOwned;
use wasm_bindgen::{prelude::*, JsCast};
use web_sys::HtmlElement;

use crate::{document, host::WebHost, platform};

fn options_from_js<T>(value: JsValue) -> Result<T, JsError>
where
    T: DeserializeOwned + Default,
{
    if value.is_undefined() || value.is_null() {
        return Ok(T::default());
    }
    serde_wasm_bindgen::from_value(value).map_err(|err| JsError::new(&err.to_string()))
}

/// ```js
/// const lp = new LocationPicker('map', { lat: 40, lng: -70 }, { zoom: 18 });
/// lp.onSettle(() => console.log(lp.getMarkerPosition()));
/// ```
#[wasm_bindgen(js_name = LocationPicker)]
pub struct JsLocationPicker {
    inner: Rc<LocationPicker<WebHost>>,
}

#[wasm_bindgen(js_class = LocationPicker)]
impl JsLocationPicker {
    /// `element` is either an element or the id of an element.
    #[wasm_bindgen(constructor)]
    pub fn new(
        element: JsValue,
        options: JsValue,
        map_options: JsValue,
    ) -> Result<JsLocationPicker, JsError> {
        let options: PickerOptions = options_from_js(options)?;
        let map_options: MapOptions = options_from_js(map_options)?;
        let target = match element.dyn_into::<HtmlElement>() {
            Ok(element) => ElementRef::Element(element),
            Err(value) => ElementRef::Id(value.as_string().unwrap_or_default()),
        };
        let config = crate::page_config();
        let host = WebHost::new(document()?, config.tiles);
        let picker = LocationPicker::builder(&host, platform())
            .options(options)
            .map_options(map_options)
            .defaults(config.map.defaults)
            .build(target);
        Ok(Self {
            inner: Rc::new(picker),
        })
    }

    #[wasm_bindgen(js_name = getMarkerPosition)]
    pub fn marker_position(&self) -> Result<JsValue, JsError> {
        let pos: Coordinate = self.inner.marker_position();
        serde_wasm_bindgen::to_value(&pos).map_err(|err| JsError::new(&err.to_string()))
    }

    #[wasm_bindgen(js_name = setLocation)]
    pub fn set_location(&self, lat: f64, lng: f64) {
        self.inner.set_location(lat, lng);
    }

    #[wasm_bindgen(js_name = setCurrentPosition)]
    pub fn set_current_position(&self) {
        self.inner.set_current_position();
    }

    /// Calls `callback` every time the map has come to rest.
    #[wasm_bindgen(js_name = onSettle)]
    pub fn on_settle(&self, callback: Function) {
        self.inner.on_settle(move |_| {
            if let Err(err) = callback.call0(&JsValue::NULL) {
                log::warn!("Settle callback failed: {err:?}");
            }
        });
    }
}

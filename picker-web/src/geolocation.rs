use std::{cell::RefCell, rc::Rc};

use futures::{channel::oneshot, future, FutureExt};
use js_sys::{Function, Reflect};
use picker_core::{GeolocationError, Geolocator, PositionFuture};
use picker_entities::geo::Coordinate;
use wasm_bindgen::{prelude::*, JsCast};
use web_sys::Geolocation;

// https://developer.mozilla.org/en-US/docs/Web/API/GeolocationPositionError/code
const PERMISSION_DENIED: u16 = 1;
const POSITION_UNAVAILABLE: u16 = 2;
const TIMEOUT: u16 = 3;

/// `navigator.geolocation`
#[derive(Debug, Default)]
pub struct BrowserGeolocator;

fn geolocation() -> Option<Geolocation> {
    let navigator = web_sys::window()?.navigator();
    let value = Reflect::get(&navigator, &JsValue::from_str("geolocation")).ok()?;
    geolocation_from_value(value)
}

/// The getter of `web-sys` does not check the type of
/// `navigator.geolocation`, so an `undefined` value would pass.
fn geolocation_from_value(value: JsValue) -> Option<Geolocation> {
    if value.is_undefined() || value.is_null() {
        return None;
    }
    value.dyn_into::<Geolocation>().ok()
}

fn get_number(obj: &JsValue, key: &str) -> Option<f64> {
    Reflect::get(obj, &JsValue::from_str(key))
        .ok()
        .and_then(|v| v.as_f64())
}

fn coordinate_from_position(position: &JsValue) -> Result<Coordinate, GeolocationError> {
    let coords = Reflect::get(position, &JsValue::from_str("coords"))
        .map_err(|_| GeolocationError::Other("Position without coordinates".into()))?;
    match (get_number(&coords, "latitude"), get_number(&coords, "longitude")) {
        (Some(lat), Some(lng)) => Ok(Coordinate::new(lat, lng)),
        _ => Err(GeolocationError::Other("Invalid coordinates".into())),
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn error_from_js(err: &JsValue) -> GeolocationError {
    match get_number(err, "code").map(|c| c as u16) {
        Some(PERMISSION_DENIED) => GeolocationError::PermissionDenied,
        Some(POSITION_UNAVAILABLE) => GeolocationError::PositionUnavailable,
        Some(TIMEOUT) => GeolocationError::Timeout,
        _ => GeolocationError::Other(
            Reflect::get(err, &JsValue::from_str("message"))
                .ok()
                .and_then(|m| m.as_string())
                .unwrap_or_else(|| "unknown JS error".to_string()),
        ),
    }
}

impl Geolocator for BrowserGeolocator {
    fn is_supported(&self) -> bool {
        geolocation().is_some()
    }

    fn current_position(&self) -> PositionFuture {
        let Some(geolocation) = geolocation() else {
            return future::ready(Err(GeolocationError::Unsupported)).boxed_local();
        };
        let (tx, rx) = oneshot::channel();
        let tx = Rc::new(RefCell::new(Some(tx)));
        let send = move |result: Result<Coordinate, GeolocationError>| {
            if let Some(tx) = tx.borrow_mut().take() {
                // The receiver is gone if the request has been aborted.
                let _ = tx.send(result);
            }
        };
        let on_success = {
            let send = send.clone();
            Closure::once_into_js(move |position: JsValue| {
                send(coordinate_from_position(&position));
            })
        };
        let on_error = Closure::once_into_js(move |err: JsValue| {
            send(Err(error_from_js(&err)));
        });
        if let Err(err) = geolocation.get_current_position_with_error_callback(
            on_success.unchecked_ref::<Function>(),
            Some(on_error.unchecked_ref::<Function>()),
        ) {
            return future::ready(Err(error_from_js(&err))).boxed_local();
        }
        rx.map(|res| {
            res.unwrap_or_else(|_| Err(GeolocationError::Other("Request dropped".into())))
        })
        .boxed_local()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use js_sys::Object;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn missing_geolocation_is_not_supported() {
        assert!(geolocation_from_value(JsValue::UNDEFINED).is_none());
        assert!(geolocation_from_value(JsValue::NULL).is_none());
    }

    #[wasm_bindgen_test]
    fn foreign_object_is_not_a_geolocation() {
        assert!(geolocation_from_value(Object::new().into()).is_none());
    }

    #[wasm_bindgen_test]
    fn browser_geolocation_is_detected() {
        let navigator = web_sys::window().unwrap().navigator();
        let value = Reflect::get(&navigator, &JsValue::from_str("geolocation")).unwrap();
        assert_eq!(
            geolocation_from_value(value).is_some(),
            BrowserGeolocator.is_supported()
        );
    }
}

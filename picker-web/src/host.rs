use std::cell::RefCell;

use leaflet::{LatLng, TileLayer, TileLayerOptions};
use location_picker::config::Tiles;
use picker_core::{DomError, MapHost, MapWidget};
use picker_entities::{geo::Coordinate, options::MapConfig};
use wasm_bindgen::{prelude::*, JsCast};
use web_sys::{Document, HtmlElement};

/// The browser document with Leaflet as map component.
///
/// The map is rendered into the first child element of the container,
/// so the center marker can be appended there without being moved
/// around by the map panes.
pub struct WebHost {
    document: Document,
    tiles: Tiles,
}

impl WebHost {
    pub fn new(document: Document, tiles: Tiles) -> Self {
        Self { document, tiles }
    }

    fn create_div(&self) -> Result<HtmlElement, DomError> {
        self.document
            .create_element("div")
            .map_err(js_error)?
            .dyn_into::<HtmlElement>()
            .map_err(|_| DomError::Platform("Created element is not an HTML element".into()))
    }

    fn map_canvas(&self, container: &HtmlElement) -> Result<HtmlElement, DomError> {
        if let Some(child) = first_child(container) {
            return Ok(child);
        }
        log::debug!("Container has no child: create map canvas");
        let canvas = self.create_div()?;
        canvas.style().set_property("height", "100%").map_err(js_error)?;
        container.append_child(&canvas).map_err(js_error)?;
        Ok(canvas)
    }
}

fn first_child(container: &HtmlElement) -> Option<HtmlElement> {
    container
        .first_element_child()
        .and_then(|e| e.dyn_into::<HtmlElement>().ok())
}

fn js_error(err: JsValue) -> DomError {
    DomError::Platform(
        err.as_string()
            .unwrap_or_else(|| "unknown JS error".to_string()),
    )
}

/// Fired once panning or zooming has come to rest.
const SETTLE_EVENT: &str = "moveend";

fn map_options(config: &MapConfig) -> leaflet::MapOptions {
    let options = leaflet::MapOptions::default();
    if let Some(min_zoom) = config.min_zoom {
        options.set_min_zoom(min_zoom);
    }
    if let Some(max_zoom) = config.max_zoom {
        options.set_max_zoom(max_zoom);
    }
    options
}

fn lat_lng(pos: Coordinate) -> LatLng {
    LatLng::new(pos.lat, pos.lng)
}

impl MapHost for WebHost {
    type Element = HtmlElement;
    type Map = WebMap;

    fn element_by_id(&self, id: &str) -> Option<HtmlElement> {
        self.document
            .get_element_by_id(id)
            .and_then(|e| e.dyn_into::<HtmlElement>().ok())
    }

    fn create_map(&self, element: Option<&HtmlElement>, config: &MapConfig) -> WebMap {
        let canvas = match element.map(|e| self.map_canvas(e)) {
            Some(Ok(canvas)) => Some(canvas),
            Some(Err(err)) => {
                log::warn!("Unable to prepare map canvas: {err}");
                None
            }
            None => None,
        };
        let canvas = match canvas {
            Some(canvas) => canvas,
            // Detached, nobody will ever see this map.
            None => match self.create_div() {
                Ok(div) => div,
                Err(err) => {
                    log::error!("Unable to create detached map canvas: {err}");
                    return WebMap::detached(config.center);
                }
            },
        };
        let map = leaflet::Map::new_with_element(&canvas, &map_options(config));
        map.set_view(&lat_lng(config.center), config.zoom);
        let tile_options = TileLayerOptions::new();
        tile_options.set_attribution(self.tiles.attribution.clone());
        TileLayer::new_options(&self.tiles.url, &tile_options).add_to(&map);
        WebMap::leaflet(map)
    }

    fn add_class(&self, element: &HtmlElement, class: &str) {
        if let Err(err) = element.class_list().add_1(class) {
            log::warn!("Unable to add class '{class}': {}", js_error(err));
        }
    }

    fn append_overlay(&self, element: &HtmlElement, class: &str) -> Result<(), DomError> {
        let parent = first_child(element).ok_or(DomError::NoContainerChild)?;
        let node = self.create_div()?;
        node.class_list().add_1(class).map_err(js_error)?;
        parent.append_child(&node).map_err(js_error)?;
        Ok(())
    }
}

enum Backend {
    Leaflet {
        map: leaflet::Map,
        handlers: RefCell<Vec<Closure<dyn Fn()>>>,
    },
    Detached(RefCell<Coordinate>),
}

/// A Leaflet map handle.
pub struct WebMap {
    backend: Backend,
}

impl WebMap {
    fn leaflet(map: leaflet::Map) -> Self {
        Self {
            backend: Backend::Leaflet {
                map,
                handlers: RefCell::new(vec![]),
            },
        }
    }

    fn detached(center: Coordinate) -> Self {
        Self {
            backend: Backend::Detached(RefCell::new(center)),
        }
    }
}

impl Drop for WebMap {
    fn drop(&mut self) {
        if let Backend::Leaflet { map, handlers } = &self.backend {
            for closure in handlers.borrow().iter() {
                map.off(SETTLE_EVENT, closure.as_ref().unchecked_ref());
            }
        }
    }
}

impl MapWidget for WebMap {
    fn center(&self) -> Coordinate {
        match &self.backend {
            Backend::Leaflet { map, .. } => {
                let center = map.get_center();
                Coordinate::new(center.lat(), center.lng())
            }
            Backend::Detached(center) => *center.borrow(),
        }
    }

    fn set_center(&self, center: Coordinate) {
        match &self.backend {
            Backend::Leaflet { map, .. } => {
                map.set_view(&lat_lng(center), map.get_zoom());
            }
            Backend::Detached(current) => {
                *current.borrow_mut() = center;
            }
        }
    }

    fn on_settle(&self, handler: Box<dyn Fn()>) {
        match &self.backend {
            Backend::Leaflet { map, handlers } => {
                let closure = Closure::wrap(handler);
                map.on(SETTLE_EVENT, closure.as_ref().unchecked_ref());
                handlers.borrow_mut().push(closure);
            }
            Backend::Detached(_) => {
                log::debug!("Detached map never settles");
            }
        }
    }
}

//! In-memory gateways for testing.

use std::{
    cell::RefCell,
    collections::{HashMap, VecDeque},
    rc::Rc,
};

use futures::{channel::oneshot, future, FutureExt};
use picker_entities::{geo::Coordinate, options::MapConfig};

use crate::{
    error::{DomError, GeolocationError},
    gateways::{
        dom::MapHost,
        geolocation::{Geolocator, PositionFuture},
        map::MapWidget,
    },
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeElement {
    id: String,
}

impl FakeElement {
    pub fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Default)]
struct ContainerState {
    has_child: bool,
    classes: Vec<String>,
    overlays: Vec<String>,
}

/// A document with containers that are addressed by id.
#[derive(Debug, Default)]
pub struct FakeHost {
    containers: RefCell<HashMap<String, ContainerState>>,
}

impl FakeHost {
    /// Insert a container that already has a child node,
    /// just like a container after the map has been rendered into it.
    pub fn insert_container(&self, id: &str) -> FakeElement {
        self.insert(id, true)
    }

    pub fn insert_childless_container(&self, id: &str) -> FakeElement {
        self.insert(id, false)
    }

    fn insert(&self, id: &str, has_child: bool) -> FakeElement {
        let state = ContainerState {
            has_child,
            ..Default::default()
        };
        self.containers.borrow_mut().insert(id.to_owned(), state);
        FakeElement { id: id.to_owned() }
    }

    pub fn classes(&self, element: &FakeElement) -> Vec<String> {
        self.containers
            .borrow()
            .get(&element.id)
            .map(|c| c.classes.clone())
            .unwrap_or_default()
    }

    pub fn overlays(&self, element: &FakeElement) -> Vec<String> {
        self.containers
            .borrow()
            .get(&element.id)
            .map(|c| c.overlays.clone())
            .unwrap_or_default()
    }
}

impl MapHost for FakeHost {
    type Element = FakeElement;
    type Map = FakeMap;

    fn element_by_id(&self, id: &str) -> Option<FakeElement> {
        self.containers
            .borrow()
            .contains_key(id)
            .then(|| FakeElement { id: id.to_owned() })
    }

    fn create_map(&self, element: Option<&FakeElement>, config: &MapConfig) -> FakeMap {
        FakeMap::new(*config, element.map(|e| e.id.clone()))
    }

    fn add_class(&self, element: &FakeElement, class: &str) {
        if let Some(c) = self.containers.borrow_mut().get_mut(&element.id) {
            c.classes.push(class.to_owned());
        }
    }

    fn append_overlay(&self, element: &FakeElement, class: &str) -> Result<(), DomError> {
        let mut containers = self.containers.borrow_mut();
        let container = containers
            .get_mut(&element.id)
            .ok_or_else(|| DomError::Platform(format!("Unknown element '{}'", element.id)))?;
        if !container.has_child {
            return Err(DomError::NoContainerChild);
        }
        container.overlays.push(class.to_owned());
        Ok(())
    }
}

struct MapState {
    config: MapConfig,
    element_id: Option<String>,
    center: Coordinate,
    set_center_count: usize,
    settle_handlers: Vec<Rc<dyn Fn()>>,
}

/// A map that settles immediately after every center change.
#[derive(Clone)]
pub struct FakeMap {
    state: Rc<RefCell<MapState>>,
}

impl FakeMap {
    pub fn new(config: MapConfig, element_id: Option<String>) -> Self {
        let state = MapState {
            config,
            element_id,
            center: config.center,
            set_center_count: 0,
            settle_handlers: vec![],
        };
        Self {
            state: Rc::new(RefCell::new(state)),
        }
    }

    pub fn config(&self) -> MapConfig {
        self.state.borrow().config
    }

    pub fn element_id(&self) -> Option<String> {
        self.state.borrow().element_id.clone()
    }

    pub fn set_center_count(&self) -> usize {
        self.state.borrow().set_center_count
    }

    /// Simulate the user dragging the map without firing the settle event.
    pub fn drag_to(&self, center: Coordinate) {
        self.state.borrow_mut().center = center;
    }

    pub fn fire_settle(&self) {
        let handlers = self.state.borrow().settle_handlers.clone();
        for handler in handlers {
            handler();
        }
    }
}

impl MapWidget for FakeMap {
    fn center(&self) -> Coordinate {
        self.state.borrow().center
    }

    fn set_center(&self, center: Coordinate) {
        {
            let mut state = self.state.borrow_mut();
            state.center = center;
            state.set_center_count += 1;
        }
        self.fire_settle();
    }

    fn on_settle(&self, handler: Box<dyn Fn()>) {
        self.state.borrow_mut().settle_handlers.push(Rc::from(handler));
    }
}

type PositionResult = Result<Coordinate, GeolocationError>;

struct GeolocatorState {
    supported: bool,
    response: PositionResult,
    deferred: VecDeque<oneshot::Receiver<PositionResult>>,
    requests: usize,
}

#[derive(Clone)]
pub struct FakeGeolocator {
    state: Rc<RefCell<GeolocatorState>>,
}

/// Completes a deferred location request.
#[derive(Debug)]
pub struct PositionResolver {
    tx: oneshot::Sender<PositionResult>,
}

impl PositionResolver {
    pub fn resolve(self, result: PositionResult) {
        if self.tx.send(result).is_err() {
            log::debug!("Location request has already been dropped");
        }
    }
}

impl FakeGeolocator {
    fn with_state(supported: bool, response: PositionResult) -> Self {
        let state = GeolocatorState {
            supported,
            response,
            deferred: VecDeque::new(),
            requests: 0,
        };
        Self {
            state: Rc::new(RefCell::new(state)),
        }
    }

    pub fn succeeding(position: Coordinate) -> Self {
        Self::with_state(true, Ok(position))
    }

    pub fn failing(err: GeolocationError) -> Self {
        Self::with_state(true, Err(err))
    }

    pub fn unsupported() -> Self {
        Self::with_state(false, Err(GeolocationError::Unsupported))
    }

    /// A geolocator whose next request stays pending until it is resolved.
    pub fn deferred() -> (Self, PositionResolver) {
        let geolocator = Self::with_state(true, Err(GeolocationError::PositionUnavailable));
        let resolver = geolocator.defer_next();
        (geolocator, resolver)
    }

    pub fn defer_next(&self) -> PositionResolver {
        let (tx, rx) = oneshot::channel();
        self.state.borrow_mut().deferred.push_back(rx);
        PositionResolver { tx }
    }

    pub fn request_count(&self) -> usize {
        self.state.borrow().requests
    }
}

impl Geolocator for FakeGeolocator {
    fn is_supported(&self) -> bool {
        self.state.borrow().supported
    }

    fn current_position(&self) -> PositionFuture {
        let mut state = self.state.borrow_mut();
        state.requests += 1;
        match state.deferred.pop_front() {
            Some(rx) => rx
                .map(|res| {
                    res.unwrap_or_else(|_| Err(GeolocationError::Other("Request dropped".into())))
                })
                .boxed_local(),
            None => future::ready(state.response.clone()).boxed_local(),
        }
    }
}

use std::{
    cell::{Cell, RefCell},
    fmt,
    rc::{Rc, Weak},
};

use futures::{
    future::{abortable, AbortHandle},
    FutureExt,
};
use picker_entities::{
    geo::Coordinate,
    options::{MapDefaults, MapOptions, PickerOptions},
};

use crate::{
    error::GeolocationError,
    gateways::{
        dom::{ElementRef, MapHost},
        map::MapWidget,
        Platform,
    },
};

/// CSS class of the container element.
pub const CONTAINER_CLASS: &str = "location-picker";

/// CSS class of the overlay that marks the map center.
pub const MARKER_CLASS: &str = "centerMarker";

/// A fixed marker on top of the visual center of a map.
///
/// The marker never moves by itself: picking a location
/// means panning the map underneath it.
pub struct LocationPicker<H: MapHost> {
    element: Option<H::Element>,
    map: Rc<H::Map>,
    platform: Platform,
    pending_position: RefCell<Option<PendingRequest>>,
}

struct PendingRequest {
    handle: AbortHandle,
    finished: Rc<Cell<bool>>,
}

impl PendingRequest {
    fn is_pending(&self) -> bool {
        !self.handle.is_aborted() && !self.finished.get()
    }
}

impl<H: MapHost> LocationPicker<H> {
    pub fn builder(host: &H, platform: Platform) -> LocationPickerBuilder<'_, H> {
        LocationPickerBuilder {
            host,
            platform,
            options: PickerOptions::default(),
            map_options: MapOptions::default(),
            defaults: MapDefaults::default(),
        }
    }

    /// The container element, if it could be resolved.
    pub fn element(&self) -> Option<&H::Element> {
        self.element.as_ref()
    }

    pub fn map(&self) -> &H::Map {
        &self.map
    }

    pub fn marker_position(&self) -> Coordinate {
        self.map.center()
    }

    pub fn set_location(&self, lat: f64, lng: f64) {
        self.map.set_center(Coordinate::new(lat, lng));
    }

    /// Move the map to the location of the device.
    ///
    /// The request runs in the background. A request that is still pending
    /// is aborted first. Failures are logged and leave the map untouched.
    pub fn set_current_position(&self) {
        let geolocator = &self.platform.geolocator;
        if !geolocator.is_supported() {
            log::warn!("Unable to set current position: {}", GeolocationError::Unsupported);
            return;
        }
        let request = geolocator.current_position();
        let map = Rc::downgrade(&self.map);
        let finished = Rc::new(Cell::new(false));
        let task_finished = Rc::clone(&finished);
        let (task, handle) = abortable(async move {
            let result = request.await;
            task_finished.set(true);
            match result {
                Ok(pos) => {
                    let Some(map) = map.upgrade() else {
                        log::debug!("Map has been dropped, ignore current position");
                        return;
                    };
                    log::debug!("Move map to current position {pos:?}");
                    map.set_center(pos);
                }
                Err(err) => {
                    log::warn!("Could not determine the current position: {err}");
                }
            }
        });
        let pending = PendingRequest { handle, finished };
        if let Some(previous) = self.pending_position.replace(Some(pending)) {
            if previous.is_pending() {
                log::debug!("Abort previous position request");
            }
            previous.handle.abort();
        }
        log::debug!("Request current position");
        self.platform.spawner.spawn(
            task.map(|res| {
                if res.is_err() {
                    log::debug!("Position request aborted");
                }
            })
            .boxed_local(),
        );
    }

    pub fn has_pending_position_request(&self) -> bool {
        self.pending_position
            .borrow()
            .as_ref()
            .is_some_and(PendingRequest::is_pending)
    }

    pub fn cancel_current_position(&self) {
        if let Some(pending) = self.pending_position.take() {
            pending.handle.abort();
        }
    }
}

impl<H> LocationPicker<H>
where
    H: MapHost + 'static,
{
    /// Subscribe to the settle event of the map.
    ///
    /// The handler only holds a weak reference,
    /// so it does not keep the picker alive.
    pub fn on_settle<F>(self: &Rc<Self>, handler: F)
    where
        F: Fn(&Self) + 'static,
    {
        let picker = Rc::downgrade(self);
        self.map.on_settle(Box::new(move || {
            if let Some(picker) = Weak::upgrade(&picker) {
                handler(&picker);
            }
        }));
    }
}

impl<H: MapHost> Drop for LocationPicker<H> {
    fn drop(&mut self) {
        self.cancel_current_position();
    }
}

impl<H> fmt::Debug for LocationPicker<H>
where
    H: MapHost,
    H::Element: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocationPicker")
            .field("element", &self.element)
            .field("marker_position", &self.marker_position())
            .field("pending_position", &self.has_pending_position_request())
            .finish()
    }
}

#[derive(Debug)]
pub struct LocationPickerBuilder<'h, H> {
    host: &'h H,
    platform: Platform,
    options: PickerOptions,
    map_options: MapOptions,
    defaults: MapDefaults,
}

impl<H: MapHost> LocationPickerBuilder<'_, H> {
    pub fn options(mut self, options: PickerOptions) -> Self {
        self.options = options;
        self
    }

    pub fn map_options(mut self, map_options: MapOptions) -> Self {
        self.map_options = map_options;
        self
    }

    pub fn defaults(mut self, defaults: MapDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn build(self, target: impl Into<ElementRef<H::Element>>) -> LocationPicker<H> {
        let Self {
            host,
            platform,
            options,
            map_options,
            defaults,
        } = self;

        let element = match target.into() {
            ElementRef::Element(element) => Some(element),
            ElementRef::Id(id) => {
                let element = host.element_by_id(&id);
                if element.is_none() {
                    log::warn!("No element with id '{id}' found");
                }
                element
            }
        };

        let config = map_options.resolve(&options, &defaults);
        log::debug!("Create map with {config:?}");
        let map = Rc::new(host.create_map(element.as_ref(), &config));

        if let Some(element) = &element {
            host.add_class(element, CONTAINER_CLASS);
            if let Err(err) = host.append_overlay(element, MARKER_CLASS) {
                log::warn!("Unable to add center marker: {err}");
            }
        }

        let picker = LocationPicker {
            element,
            map,
            platform,
            pending_position: RefCell::new(None),
        };
        if options.requests_current_position() {
            picker.set_current_position();
        }
        picker
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::*;
    use futures::executor::LocalPool;
    use picker_entities::geo::FALLBACK_CENTER;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn setup(geolocator: FakeGeolocator) -> (FakeHost, LocalPool, Platform) {
        init_logger();
        let pool = LocalPool::new();
        let platform = Platform::new(Rc::new(geolocator), Rc::new(pool.spawner()));
        let host = FakeHost::default();
        host.insert_container("map");
        (host, pool, platform)
    }

    #[test]
    fn explicit_position_skips_location_request() {
        let geolocator = FakeGeolocator::succeeding(Coordinate::new(1.0, 2.0));
        let (host, mut pool, platform) = setup(geolocator.clone());
        let picker = LocationPicker::builder(&host, platform)
            .options(PickerOptions::with_position(10.0, 20.0))
            .build("map");
        pool.run_until_stalled();
        assert_eq!(geolocator.request_count(), 0);
        assert_eq!(picker.map().config().center, Coordinate::new(10.0, 20.0));
        assert_eq!(picker.marker_position(), Coordinate::new(10.0, 20.0));
    }

    #[test]
    fn default_options_move_map_to_current_position() {
        let geolocator = FakeGeolocator::succeeding(Coordinate::new(1.0, 2.0));
        let (host, mut pool, platform) = setup(geolocator.clone());
        let picker = LocationPicker::builder(&host, platform).build("map");
        assert_eq!(picker.marker_position(), FALLBACK_CENTER);
        assert!(picker.has_pending_position_request());

        pool.run_until_stalled();
        assert_eq!(geolocator.request_count(), 1);
        assert!(!picker.has_pending_position_request());
        assert_eq!(picker.marker_position(), Coordinate::new(1.0, 2.0));
    }

    #[test]
    fn disabled_current_position_never_requests_location() {
        let geolocator = FakeGeolocator::succeeding(Coordinate::new(1.0, 2.0));
        let (host, mut pool, platform) = setup(geolocator.clone());
        let options = PickerOptions {
            set_current_position: false,
            ..Default::default()
        };
        let picker = LocationPicker::builder(&host, platform)
            .options(options)
            .build("map");
        pool.run_until_stalled();
        assert_eq!(geolocator.request_count(), 0);
        assert_eq!(picker.marker_position(), FALLBACK_CENTER);
    }

    #[test]
    fn set_location_round_trip() {
        let (host, _pool, platform) = setup(FakeGeolocator::unsupported());
        let picker = LocationPicker::builder(&host, platform).build("map");
        picker.set_location(5.0, 6.0);
        assert_eq!(picker.marker_position(), Coordinate::new(5.0, 6.0));
    }

    #[test]
    fn failed_location_request_keeps_center() {
        let geolocator = FakeGeolocator::failing(GeolocationError::PermissionDenied);
        let (host, mut pool, platform) = setup(geolocator.clone());
        let picker = LocationPicker::builder(&host, platform)
            .options(PickerOptions {
                set_current_position: false,
                ..Default::default()
            })
            .build("map");
        picker.set_location(3.0, 4.0);
        picker.set_current_position();
        pool.run_until_stalled();
        assert_eq!(geolocator.request_count(), 1);
        assert_eq!(picker.marker_position(), Coordinate::new(3.0, 4.0));
        assert_eq!(picker.map().set_center_count(), 1);
    }

    #[test]
    fn unsupported_geolocation_keeps_center() {
        let geolocator = FakeGeolocator::unsupported();
        let (host, mut pool, platform) = setup(geolocator.clone());
        let picker = LocationPicker::builder(&host, platform).build("map");
        pool.run_until_stalled();
        assert_eq!(geolocator.request_count(), 0);
        assert!(!picker.has_pending_position_request());
        assert_eq!(picker.marker_position(), FALLBACK_CENTER);
    }

    #[test]
    fn dropping_the_picker_cancels_pending_request() {
        let (geolocator, resolver) = FakeGeolocator::deferred();
        let (host, mut pool, platform) = setup(geolocator);
        let picker = LocationPicker::builder(&host, platform).build("map");
        let map = picker.map().clone();
        pool.run_until_stalled();
        assert!(picker.has_pending_position_request());

        drop(picker);
        resolver.resolve(Ok(Coordinate::new(1.0, 2.0)));
        pool.run_until_stalled();
        assert_eq!(map.center(), FALLBACK_CENTER);
        assert_eq!(map.set_center_count(), 0);
    }

    #[test]
    fn cancel_pending_request() {
        let (geolocator, resolver) = FakeGeolocator::deferred();
        let (host, mut pool, platform) = setup(geolocator);
        let picker = LocationPicker::builder(&host, platform).build("map");
        picker.cancel_current_position();
        assert!(!picker.has_pending_position_request());
        resolver.resolve(Ok(Coordinate::new(1.0, 2.0)));
        pool.run_until_stalled();
        assert_eq!(picker.marker_position(), FALLBACK_CENTER);
    }

    #[test]
    fn newer_request_supersedes_pending_one() {
        let (geolocator, first) = FakeGeolocator::deferred();
        let (host, mut pool, platform) = setup(geolocator.clone());
        let picker = LocationPicker::builder(&host, platform).build("map");
        let second = geolocator.defer_next();
        picker.set_current_position();
        assert_eq!(geolocator.request_count(), 2);

        second.resolve(Ok(Coordinate::new(5.0, 5.0)));
        first.resolve(Ok(Coordinate::new(9.0, 9.0)));
        pool.run_until_stalled();
        assert_eq!(picker.marker_position(), Coordinate::new(5.0, 5.0));
    }

    #[test]
    fn container_and_marker_are_tagged() {
        let (host, _pool, platform) = setup(FakeGeolocator::unsupported());
        let picker = LocationPicker::builder(&host, platform).build("map");
        let element = picker.element().expect("container element");
        assert_eq!(element.id(), "map");
        assert!(host.classes(element).contains(&CONTAINER_CLASS.to_string()));
        assert_eq!(host.overlays(element), vec![MARKER_CLASS.to_string()]);
    }

    #[test]
    fn build_from_element_reference() {
        let (host, _pool, platform) = setup(FakeGeolocator::unsupported());
        let element = host.insert_container("other");
        let picker = LocationPicker::builder(&host, platform).build(ElementRef::Element(element));
        assert_eq!(picker.element().map(FakeElement::id), Some("other"));
    }

    #[test]
    fn missing_element_gives_unbound_picker() {
        let (host, _pool, platform) = setup(FakeGeolocator::unsupported());
        let picker = LocationPicker::builder(&host, platform).build("does-not-exist");
        assert!(picker.element().is_none());
        assert!(picker.map().element_id().is_none());
        picker.set_location(5.0, 6.0);
        assert_eq!(picker.marker_position(), Coordinate::new(5.0, 6.0));
    }

    #[test]
    fn container_without_child_still_builds() {
        init_logger();
        let pool = LocalPool::new();
        let platform = Platform::new(
            Rc::new(FakeGeolocator::unsupported()),
            Rc::new(pool.spawner()),
        );
        let host = FakeHost::default();
        host.insert_childless_container("map");
        let picker = LocationPicker::builder(&host, platform).build("map");
        let element = picker.element().expect("container element");
        assert!(host.overlays(element).is_empty());
        assert!(host.classes(element).contains(&CONTAINER_CLASS.to_string()));
    }

    #[test]
    fn settle_handler_sees_new_center() {
        let (host, _pool, platform) = setup(FakeGeolocator::unsupported());
        let picker = Rc::new(LocationPicker::builder(&host, platform).build("map"));
        let seen = Rc::new(RefCell::new(Vec::new()));
        {
            let seen = Rc::clone(&seen);
            picker.on_settle(move |p| seen.borrow_mut().push(p.marker_position()));
        }
        picker.set_location(41.0, -71.0);
        assert_eq!(*seen.borrow(), vec![Coordinate::new(41.0, -71.0)]);
    }

    #[test]
    fn settle_handler_does_not_keep_picker_alive() {
        let (host, _pool, platform) = setup(FakeGeolocator::unsupported());
        let picker = Rc::new(LocationPicker::builder(&host, platform).build("map"));
        picker.on_settle(|_| {});
        let weak = Rc::downgrade(&picker);
        let map = picker.map().clone();
        drop(picker);
        assert!(weak.upgrade().is_none());
        map.fire_settle();
    }
}

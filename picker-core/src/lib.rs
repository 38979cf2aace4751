//! The marker adapter and the gateways it talks to.
//!
//! Nothing in here knows about a browser: the DOM, the map component,
//! the geolocation service and the task executor are all reached through
//! the traits in [`gateways`].

pub mod error;
pub mod gateways;
pub mod picker;

#[cfg(any(test, feature = "fakes"))]
pub mod fakes;

pub use self::{
    error::{DomError, GeolocationError},
    gateways::{
        dom::{ElementRef, MapHost},
        geolocation::{Geolocator, PositionFuture},
        map::MapWidget,
        spawn::TaskSpawner,
        Platform,
    },
    picker::{LocationPicker, LocationPickerBuilder, CONTAINER_CLASS, MARKER_CLASS},
};

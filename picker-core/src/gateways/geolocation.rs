use futures::future::LocalBoxFuture;
use picker_entities::geo::Coordinate;

use crate::error::GeolocationError;

pub type PositionFuture = LocalBoxFuture<'static, Result<Coordinate, GeolocationError>>;

pub trait Geolocator {
    fn is_supported(&self) -> bool;

    // TODO: accept request options (high accuracy, maximum age) once a caller needs them
    fn current_position(&self) -> PositionFuture;
}

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GeolocationError {
    #[error("Geolocation is not supported")]
    Unsupported,
    #[error("Permission to access the location was denied")]
    PermissionDenied,
    #[error("The position is unavailable")]
    PositionUnavailable,
    #[error("The location request timed out")]
    Timeout,
    #[error("{0}")]
    Other(String),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DomError {
    #[error("The container has no child node to attach the marker to")]
    NoContainerChild,
    #[error("{0}")]
    Platform(String),
}

use picker_entities::options::MapConfig;

use super::map::MapWidget;
use crate::error::DomError;

/// Either the container element itself or its id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementRef<E> {
    Element(E),
    Id(String),
}

impl<E> From<&str> for ElementRef<E> {
    fn from(id: &str) -> Self {
        Self::Id(id.to_owned())
    }
}

impl<E> From<String> for ElementRef<E> {
    fn from(id: String) -> Self {
        Self::Id(id)
    }
}

/// The document that hosts the map.
pub trait MapHost {
    type Element: Clone;
    type Map: MapWidget + 'static;

    fn element_by_id(&self, id: &str) -> Option<Self::Element>;

    /// Instantiate the map component.
    ///
    /// Without an element the host has to come up with a detached map,
    /// construction never fails.
    fn create_map(&self, element: Option<&Self::Element>, config: &MapConfig) -> Self::Map;

    fn add_class(&self, element: &Self::Element, class: &str);

    /// Append a fixed overlay node with the given class
    /// to the first child of the container.
    fn append_overlay(&self, element: &Self::Element, class: &str) -> Result<(), DomError>;
}

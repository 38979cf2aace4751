use picker_entities::geo::Coordinate;

/// An interactive map component.
///
/// Implementations are handles, so all methods take `&self`.
pub trait MapWidget {
    fn center(&self) -> Coordinate;

    fn set_center(&self, center: Coordinate);

    /// Called every time panning or zooming came to rest.
    fn on_settle(&self, handler: Box<dyn Fn()>);
}

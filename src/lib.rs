pub mod catalogue;
pub mod render;
pub mod request;
pub mod routing;
pub mod shared;
pub mod snapshot;

pub mod prelude {
    pub use crate::catalogue::Catalogue;
    pub use crate::render::{MapRenderer, settings::RenderSettings};
    pub use crate::request::{Document, handler};
    pub use crate::routing::{RoutingSettings, TransportRouter};
    pub use crate::shared::geo::Coordinate;
    pub use crate::snapshot::Snapshot;
}

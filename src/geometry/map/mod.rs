// This interior module is private; we reexport its contents.
#[allow(clippy::module_inception)]
mod map;
#[cfg(feature = "map-render")]
mod render;
mod traversable;

pub mod tile;

#[cfg(feature = "map-render")]
pub use map::RenderError;
pub use map::{GridMap, Inflation, Map, MapConversionErr};
#[cfg(feature = "map-render")]
pub use render::{Animation, Style};
pub use traversable::Traversable;

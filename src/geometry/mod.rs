pub mod cell;
pub mod map;

pub use cell::Cell;
pub use map::{tile, GridMap, Inflation, Map, MapConversionErr, Traversable};

//! Best-first (A*) search over an occupancy grid.
//!
//! [`HeuristicField`] is derived once per goal; [`Searcher`] runs the search and
//! yields an [`Outcome`]. [`Map::navigate`] ties the two together for one-off queries.

mod frontier;
mod heuristic;
mod path;
mod searcher;

pub use frontier::Frontier;
pub use heuristic::{HeuristicField, Metric};
pub use path::{Path, Predecessors};
pub use searcher::{CostField, Outcome, Searcher};

use crate::geometry::{Cell, Map, Traversable};

/// Which end of a route a cell was supplied for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, parse_display::Display)]
#[display(style = "lowercase")]
pub enum Endpoint {
    Start,
    Goal,
}

/// A search could not be set up from the inputs supplied.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SearchError {
    #[error("grid must have at least one row and one column")]
    EmptyGrid,
    #[error("{endpoint} {cell} lies outside the grid: rows must be < {height}, columns < {width}")]
    OutOfBounds {
        endpoint: Endpoint,
        cell: Cell,
        height: usize,
        width: usize,
    },
    #[error("heuristic field covers a {field_height}x{field_width} grid, but the map is {height}x{width}")]
    HeuristicMismatch {
        field_height: usize,
        field_width: usize,
        height: usize,
        width: usize,
    },
}

impl<Tile> Map<Tile>
where
    Tile: Clone + Into<Traversable>,
{
    /// Find a minimum-cost route between the given cells using A*.
    // https://en.wikipedia.org/wiki/A*_search_algorithm#Pseudocode
    pub fn navigate(&self, start: Cell, goal: Cell, metric: Metric) -> Result<Outcome, SearchError> {
        let heuristic = HeuristicField::for_map(self, goal, metric)?;
        Ok(Searcher::new(self, &heuristic, start)?.run())
    }
}

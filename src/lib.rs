//! Route planning over occupancy grids.
//!
//! A grid producer hands over a [`planner::Snapshot`] each cycle; the [`planner::Planner`]
//! finds a minimum-cost route with A* and [`guidance`] turns it into movement directives.

pub mod config;
pub mod geometry;
pub mod guidance;
pub mod input;
pub mod planner;
pub mod search;

pub use config::Config;
pub use geometry::{Cell, GridMap};
pub use guidance::{Announcer, Directive};
pub use input::parse_grid;
pub use planner::{Plan, Planner, Snapshot};
pub use search::{Metric, Outcome, Path, SearchError};

use super::{Endpoint, Frontier, HeuristicField, Path, Predecessors, SearchError};
use crate::geometry::{Cell, Map, Traversable};
use bitvec::{bitvec, vec::BitVec};

/// Best known cost to reach each cell from the start.
///
/// Cells not yet reached have no cost at all, rather than an infinite one.
#[derive(Debug, Clone)]
pub struct CostField {
    costs: Vec<Option<f64>>,
    width: usize,
}

impl CostField {
    pub fn new(height: usize, width: usize) -> CostField {
        CostField {
            costs: vec![None; height * width],
            width,
        }
    }

    fn index(&self, cell: Cell) -> usize {
        cell.row * self.width + cell.col
    }

    pub fn get(&self, cell: Cell) -> Option<f64> {
        self.costs[self.index(cell)]
    }

    pub fn set(&mut self, cell: Cell, cost: f64) {
        let idx = self.index(cell);
        self.costs[idx] = Some(cost);
    }

    /// `true` if `candidate` beats the best known cost to `cell`, or `cell` has not been reached.
    pub fn improves(&self, cell: Cell, candidate: f64) -> bool {
        self.get(cell).map_or(true, |known| candidate < known)
    }
}

/// Result of a completed search.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The goal was reached; this is a minimum-cost route to it.
    Found(Path),
    /// Every cell reachable from the start was explored without meeting the goal.
    NoPath,
    /// The iteration cap was reached before the search concluded.
    TimedOut { iterations: usize },
}

impl Outcome {
    pub fn path(&self) -> Option<&Path> {
        match self {
            Outcome::Found(path) => Some(path),
            _ => None,
        }
    }

    pub fn into_path(self) -> Option<Path> {
        match self {
            Outcome::Found(path) => Some(path),
            _ => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Outcome::Found(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Running,
    Succeeded,
    Failed,
    CapReached,
}

/// Working state of a single search. Built fresh for every run and consumed by it.
struct Search<'a, Tile> {
    map: &'a Map<Tile>,
    heuristic: &'a HeuristicField,
    start: Cell,
    costs: CostField,
    frontier: Frontier,
    explored: BitVec,
    predecessors: Predecessors,
    expansions: usize,
    limit: Option<usize>,
}

impl<'a, Tile> Search<'a, Tile>
where
    Tile: Clone + Into<Traversable>,
{
    fn new(
        map: &'a Map<Tile>,
        heuristic: &'a HeuristicField,
        start: Cell,
        limit: Option<usize>,
    ) -> Self {
        let (height, width) = (map.height(), map.width());
        let mut costs = CostField::new(height, width);
        let mut frontier = Frontier::new(height, width);
        costs.set(start, 0.0);
        frontier.push(start, heuristic[start]);

        Search {
            map,
            heuristic,
            start,
            costs,
            frontier,
            explored: bitvec!(0; height * width),
            predecessors: Predecessors::new(height, width),
            expansions: 0,
            limit,
        }
    }

    fn is_explored(&self, cell: Cell) -> bool {
        self.explored[cell.row * self.map.width() + cell.col]
    }

    /// Pop one cell and expand it.
    ///
    /// The cap applies to expansions only: a popped goal always succeeds.
    fn step(&mut self) -> State {
        let goal = self.heuristic.goal();
        let metric = self.heuristic.metric();

        let current = loop {
            match self.frontier.pop() {
                None => return State::Failed,
                // stale entry left behind by a priority decrease
                Some((cell, _)) if self.is_explored(cell) => continue,
                Some((cell, _)) => break cell,
            }
        };

        if current == goal {
            return State::Succeeded;
        }
        if self.limit.map_or(false, |limit| self.expansions >= limit) {
            return State::CapReached;
        }

        self.explored
            .set(current.row * self.map.width() + current.col, true);
        self.expansions += 1;

        // the current cell was reached before it was queued
        let current_cost = self.costs.get(current).unwrap_or_default();

        for neighbor in self.map.open_neighbors(current) {
            if self.is_explored(neighbor) {
                continue;
            }
            let tentative = current_cost + metric.step_cost(current, neighbor);
            if self.costs.improves(neighbor, tentative) {
                if self.frontier.contains(neighbor) {
                    log::trace!("{neighbor}: cost lowered to {tentative}");
                }
                self.costs.set(neighbor, tentative);
                self.predecessors.record(neighbor, current);
                self.frontier
                    .push(neighbor, tentative + self.heuristic[neighbor]);
            }
        }

        State::Running
    }

    fn finish(self) -> Path {
        let goal = self.heuristic.goal();
        let cost = self.costs.get(goal).unwrap_or_default();
        Path::new(self.predecessors.reconstruct(goal, self.start), cost)
    }
}

/// A* search from a start cell to the goal of a [`HeuristicField`].
///
/// Inputs are validated on construction; after that, [`Searcher::run`] cannot fail,
/// only conclude with one of the [`Outcome`]s. Each run owns its own cost field,
/// frontier, explored set and predecessor links, so a `Searcher` may be run any
/// number of times, from any number of threads.
#[derive(Debug, Clone, Copy)]
pub struct Searcher<'a, Tile> {
    map: &'a Map<Tile>,
    heuristic: &'a HeuristicField,
    start: Cell,
    limit: Option<usize>,
}

impl<'a, Tile> Searcher<'a, Tile>
where
    Tile: Clone + Into<Traversable>,
{
    /// Prepare a search over `map` from `start` to the heuristic's goal.
    ///
    /// Fails if the map is empty, if the heuristic was built for different
    /// dimensions, or if `start` lies outside the map.
    pub fn new(
        map: &'a Map<Tile>,
        heuristic: &'a HeuristicField,
        start: Cell,
    ) -> Result<Searcher<'a, Tile>, SearchError> {
        if map.is_empty() {
            return Err(SearchError::EmptyGrid);
        }
        if !heuristic.fits(map) {
            return Err(SearchError::HeuristicMismatch {
                field_height: heuristic.height(),
                field_width: heuristic.width(),
                height: map.height(),
                width: map.width(),
            });
        }
        if !map.in_bounds(start) {
            return Err(SearchError::OutOfBounds {
                endpoint: Endpoint::Start,
                cell: start,
                height: map.height(),
                width: map.width(),
            });
        }

        Ok(Searcher {
            map,
            heuristic,
            start,
            limit: None,
        })
    }

    /// Give up after expanding `max_iterations` cells.
    pub fn with_limit(mut self, max_iterations: usize) -> Self {
        self.limit = Some(max_iterations);
        self
    }

    pub fn start(&self) -> Cell {
        self.start
    }

    pub fn goal(&self) -> Cell {
        self.heuristic.goal()
    }

    /// Run the search to completion.
    pub fn run(&self) -> Outcome {
        let goal = self.goal();

        // An agent cannot stand in, nor arrive at, an obstacle.
        for (endpoint, cell) in [(Endpoint::Start, self.start), (Endpoint::Goal, goal)] {
            if !self.map.is_free(cell) {
                log::debug!("{endpoint} {cell} is blocked; no path");
                return Outcome::NoPath;
            }
        }

        let mut search = Search::new(self.map, self.heuristic, self.start, self.limit);
        loop {
            match search.step() {
                State::Running => {}
                State::Succeeded => {
                    log::debug!(
                        "reached {goal} from {} after {} expansions",
                        self.start,
                        search.expansions
                    );
                    return Outcome::Found(search.finish());
                }
                State::Failed => {
                    log::debug!(
                        "frontier exhausted after {} expansions; {goal} unreachable from {}",
                        search.expansions,
                        self.start
                    );
                    return Outcome::NoPath;
                }
                State::CapReached => {
                    log::warn!(
                        "search from {} to {goal} hit the iteration cap after {} expansions",
                        self.start,
                        search.expansions
                    );
                    return Outcome::TimedOut {
                        iterations: search.expansions,
                    };
                }
            }
        }
    }
}

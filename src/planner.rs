//! One planning cycle: from a grid snapshot to a route.

use crate::{
    config::SearchConfig,
    geometry::{Cell, GridMap, Inflation},
    search::{HeuristicField, Outcome, SearchError, Searcher},
};

/// What the occupancy-grid producer delivers each cycle.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub grid: GridMap,
    /// Where the agent stands. Defaults to row 0, centre column.
    pub start: Option<Cell>,
    /// The producer's preferred goal, if it found one.
    pub target: Option<Cell>,
    /// The producer judged the agent to be too close to a wall ahead.
    pub facing_wall: bool,
}

impl Snapshot {
    pub fn new(grid: GridMap) -> Snapshot {
        Snapshot {
            grid,
            start: None,
            target: None,
            facing_wall: false,
        }
    }

    pub fn with_start(mut self, start: Cell) -> Self {
        self.start = Some(start);
        self
    }

    pub fn with_target(mut self, target: Cell) -> Self {
        self.target = Some(target);
        self
    }

    pub fn facing_wall(mut self, facing_wall: bool) -> Self {
        self.facing_wall = facing_wall;
        self
    }
}

/// The result of planning over one snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    pub start: Cell,
    pub goal: Cell,
    pub outcome: Outcome,
    pub facing_wall: bool,
}

/// Plans a route for each snapshot it is handed.
///
/// The heuristic field is kept between calls and rebuilt only when the grid
/// dimensions, goal, or metric change. Everything else is built fresh per search.
#[derive(Debug, Default)]
pub struct Planner {
    config: SearchConfig,
    heuristic: Option<HeuristicField>,
}

impl Planner {
    pub fn new(config: SearchConfig) -> Planner {
        Planner {
            config,
            heuristic: None,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// The goal for a snapshot: its target, else the configured goal, else the far row, centre column.
    pub fn goal_for(&self, snapshot: &Snapshot) -> Cell {
        snapshot
            .target
            .or(self.config.goal)
            .unwrap_or_else(|| snapshot.grid.default_goal())
    }

    /// Grow the snapshot's obstacles without closing over its start or the goal it would plan to.
    pub fn inflate(&self, snapshot: &Snapshot, inflation: Inflation) -> GridMap {
        let grid = &snapshot.grid;
        let start = snapshot.start.unwrap_or_else(|| grid.default_start());
        grid.inflate(inflation, &[start, self.goal_for(snapshot)])
    }

    fn heuristic_for(&mut self, grid: &GridMap, goal: Cell) -> Result<&HeuristicField, SearchError> {
        let metric = self.config.metric;
        let field = match self.heuristic.take() {
            Some(field) if field.matches(grid.height(), grid.width(), goal, metric) => {
                log::debug!("reusing heuristic field for goal {goal}");
                field
            }
            _ => HeuristicField::for_map(grid, goal, metric)?,
        };
        Ok(self.heuristic.insert(field))
    }

    /// Plan a route across the snapshot.
    ///
    /// Errors only when the start or goal lies outside the grid, or the grid is empty.
    /// An unreachable goal is a successful plan whose outcome is [`Outcome::NoPath`].
    pub fn plan(&mut self, snapshot: &Snapshot) -> Result<Plan, SearchError> {
        let grid = &snapshot.grid;
        let start = snapshot.start.unwrap_or_else(|| grid.default_start());
        let goal = self.goal_for(snapshot);
        let max_iterations = self.config.max_iterations;

        let heuristic = self.heuristic_for(grid, goal)?;
        let mut searcher = Searcher::new(grid, heuristic, start)?;
        if let Some(limit) = max_iterations {
            searcher = searcher.with_limit(limit);
        }
        let outcome = searcher.run();

        match &outcome {
            Outcome::Found(path) => log::info!(
                "planned {} steps from {start} to {goal}, cost {:.3}",
                path.steps(),
                path.cost()
            ),
            Outcome::NoPath => {
                let mut reachable = 0_usize;
                grid.reachable_from(start, |_, _| {
                    reachable += 1;
                    false
                });
                log::warn!("no path from {start} to {goal}; {reachable} cells reachable from the start")
            }
            Outcome::TimedOut { iterations } => {
                log::warn!("gave up planning from {start} to {goal} after {iterations} iterations")
            }
        }

        Ok(Plan {
            start,
            goal,
            outcome,
            facing_wall: snapshot.facing_wall,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{geometry::tile::Occupancy, search::Metric};

    #[test]
    fn goal_precedence() {
        let grid = GridMap::new(6, 5);
        let mut planner = Planner::default();
        let snapshot = Snapshot::new(grid.clone());
        assert_eq!(planner.goal_for(&snapshot), Cell::new(5, 2));

        planner.config.goal = Some(Cell::new(4, 0));
        assert_eq!(planner.goal_for(&snapshot), Cell::new(4, 0));

        let targeted = snapshot.with_target(Cell::new(3, 4));
        assert_eq!(planner.goal_for(&targeted), Cell::new(3, 4));
    }

    #[test]
    fn reuses_heuristic_until_goal_changes() {
        let mut planner = Planner::default();
        let snapshot = Snapshot::new(GridMap::new(5, 5));

        planner.plan(&snapshot).unwrap();
        let first = planner.heuristic.clone().unwrap();
        assert_eq!(first.goal(), Cell::new(4, 2));

        planner.plan(&snapshot).unwrap();
        assert_eq!(planner.heuristic.as_ref(), Some(&first));

        let retargeted = snapshot.with_target(Cell::new(4, 0));
        let plan = planner.plan(&retargeted).unwrap();
        assert_eq!(plan.goal, Cell::new(4, 0));
        assert_eq!(planner.heuristic.as_ref().unwrap().goal(), Cell::new(4, 0));
    }

    #[test]
    fn fresh_grid_each_cycle() {
        let mut planner = Planner::new(SearchConfig {
            metric: Metric::Euclidean,
            ..SearchConfig::default()
        });
        let open = GridMap::new(3, 3);
        assert!(planner.plan(&Snapshot::new(open.clone())).unwrap().outcome.is_found());

        let mut walled = open;
        for col in 0..3 {
            walled[Cell::new(1, col)] = Occupancy::Blocked;
        }
        let plan = planner.plan(&Snapshot::new(walled)).unwrap();
        assert_eq!(plan.outcome, Outcome::NoPath);
    }

    #[test]
    fn inflation_leaves_the_endpoints_open() {
        let mut grid = GridMap::new(5, 5);
        grid[Cell::new(4, 3)] = Occupancy::Blocked;
        grid[Cell::new(1, 2)] = Occupancy::Blocked;
        let mut snapshot = Snapshot::new(grid);
        let planner = Planner::default();

        snapshot.grid = planner.inflate(&snapshot, Inflation::Orthogonal);
        assert!(!snapshot.grid[Cell::new(0, 2)].is_blocked());
        assert!(!snapshot.grid[Cell::new(4, 2)].is_blocked());
        assert!(snapshot.grid[Cell::new(1, 1)].is_blocked());

        let plan = Planner::default().plan(&snapshot).unwrap();
        assert!(plan.outcome.is_found());
    }

    #[test]
    fn inflation_spares_the_target() {
        let mut grid = GridMap::new(5, 5);
        grid[Cell::new(3, 1)] = Occupancy::Blocked;
        let snapshot = Snapshot::new(grid).with_target(Cell::new(3, 0));
        let inflated = Planner::default().inflate(&snapshot, Inflation::Diagonal);
        assert!(!inflated[Cell::new(3, 0)].is_blocked());
        assert!(inflated[Cell::new(2, 0)].is_blocked());
    }

    #[test]
    fn out_of_bounds_target_is_rejected() {
        let mut planner = Planner::default();
        let snapshot = Snapshot::new(GridMap::new(3, 3)).with_target(Cell::new(0, 3));
        assert!(matches!(
            planner.plan(&snapshot),
            Err(SearchError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn iteration_cap_applies() {
        let mut planner = Planner::new(SearchConfig {
            max_iterations: Some(1),
            ..SearchConfig::default()
        });
        let plan = planner.plan(&Snapshot::new(GridMap::new(5, 5))).unwrap();
        assert_eq!(plan.outcome, Outcome::TimedOut { iterations: 1 });
    }
}

use super::SearchError;
use crate::geometry::{Cell, Map};
use std::ops::Index;

/// Movement model for the search.
///
/// A metric fixes both the cost of a single step and the heuristic estimate of
/// the remaining distance, so the two can never disagree. Both heuristics are
/// admissible and consistent for their own step costs.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    serde::Serialize,
    serde::Deserialize,
    parse_display::Display,
    parse_display::FromStr,
)]
#[serde(rename_all = "lowercase")]
#[display(style = "lowercase")]
pub enum Metric {
    /// Every step costs 1; the heuristic is Chebyshev distance.
    #[default]
    Diagonal,
    /// Orthogonal steps cost 1 and diagonal steps cost `√2`; the heuristic is
    /// Euclidean distance.
    Euclidean,
}

impl Metric {
    /// Cost of a single step between two neighboring cells.
    #[inline]
    pub fn step_cost(self, from: Cell, to: Cell) -> f64 {
        debug_assert!(from.is_neighbor_of(to), "{from} -> {to} is not a single step");
        match self {
            Metric::Diagonal => 1.0,
            Metric::Euclidean if from.is_diagonal_to(to) => std::f64::consts::SQRT_2,
            Metric::Euclidean => 1.0,
        }
    }

    /// Lower bound on the cost of travelling between two cells.
    #[inline]
    pub fn distance(self, a: Cell, b: Cell) -> f64 {
        let (drow, dcol) = a.delta(b);
        match self {
            Metric::Diagonal => drow.max(dcol) as f64,
            Metric::Euclidean => (drow as f64).hypot(dcol as f64),
        }
    }
}

/// Per-cell estimate of the remaining cost to a fixed goal.
///
/// Built once per `(dimensions, goal, metric)`; it holds no per-search state, so a
/// single field can be shared by any number of concurrent searches toward the same goal.
#[derive(Clone, Debug, PartialEq)]
pub struct HeuristicField {
    height: usize,
    width: usize,
    goal: Cell,
    metric: Metric,
    values: Vec<f64>,
}

impl HeuristicField {
    /// Compute the estimate for every cell of a `height × width` grid.
    pub fn new(
        height: usize,
        width: usize,
        goal: Cell,
        metric: Metric,
    ) -> Result<HeuristicField, SearchError> {
        if height == 0 || width == 0 {
            return Err(SearchError::EmptyGrid);
        }
        if goal.row >= height || goal.col >= width {
            return Err(SearchError::OutOfBounds {
                endpoint: super::Endpoint::Goal,
                cell: goal,
                height,
                width,
            });
        }

        let mut values = Vec::with_capacity(height * width);
        for row in 0..height {
            for col in 0..width {
                values.push(metric.distance(Cell::new(row, col), goal));
            }
        }

        Ok(HeuristicField {
            height,
            width,
            goal,
            metric,
            values,
        })
    }

    /// Compute the estimate for every cell of `map`.
    pub fn for_map<Tile>(
        map: &Map<Tile>,
        goal: Cell,
        metric: Metric,
    ) -> Result<HeuristicField, SearchError> {
        Self::new(map.height(), map.width(), goal, metric)
    }

    pub fn goal(&self) -> Cell {
        self.goal
    }

    pub fn metric(&self) -> Metric {
        self.metric
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// `true` when this field covers exactly the cells of `map`.
    pub fn fits<Tile>(&self, map: &Map<Tile>) -> bool {
        self.height == map.height() && self.width == map.width()
    }

    /// `true` when this field can be reused for the given dimensions, goal, and metric.
    pub fn matches(&self, height: usize, width: usize, goal: Cell, metric: Metric) -> bool {
        self.height == height && self.width == width && self.goal == goal && self.metric == metric
    }

    /// The estimate at `cell`, if it lies within the field.
    #[inline]
    pub fn get(&self, cell: Cell) -> Option<f64> {
        (cell.row < self.height && cell.col < self.width)
            .then(|| self.values[cell.row * self.width + cell.col])
    }
}

impl Index<Cell> for HeuristicField {
    type Output = f64;

    /// Panics if the cell lies outside the field.
    fn index(&self, cell: Cell) -> &f64 {
        assert!(
            cell.row < self.height && cell.col < self.width,
            "cell {} outside {}x{} heuristic field",
            cell,
            self.height,
            self.width
        );
        &self.values[cell.row * self.width + cell.col]
    }
}

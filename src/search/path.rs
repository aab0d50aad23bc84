use crate::geometry::Cell;

/// For each cell reached so far, the cell it was reached from on the best known route.
#[derive(Debug, Clone)]
pub struct Predecessors {
    links: Vec<Option<Cell>>,
    width: usize,
}

impl Predecessors {
    /// No links, over a `height × width` grid.
    pub fn new(height: usize, width: usize) -> Predecessors {
        Predecessors {
            links: vec![None; height * width],
            width,
        }
    }

    fn index(&self, cell: Cell) -> usize {
        cell.row * self.width + cell.col
    }

    /// Record that the best known route to `cell` arrives from `from`.
    pub fn record(&mut self, cell: Cell, from: Cell) {
        let idx = self.index(cell);
        self.links[idx] = Some(from);
    }

    pub fn get(&self, cell: Cell) -> Option<Cell> {
        self.links[self.index(cell)]
    }

    /// Walk the links back from `goal` to `start` and return the route in travel order.
    ///
    /// The result begins at `start`, ends at `goal`, and has at least one cell.
    ///
    /// ## Panics
    ///
    /// If the links contain a cycle, or if the chain from `goal` ends somewhere
    /// other than `start`. Either means the search that produced them is broken.
    pub fn reconstruct(&self, goal: Cell, start: Cell) -> Vec<Cell> {
        let mut route = vec![goal];
        let mut current = goal;
        while let Some(previous) = self.get(current) {
            assert!(
                route.len() <= self.links.len(),
                "predecessor chain from {goal} contains a cycle"
            );
            route.push(previous);
            current = previous;
        }
        assert_eq!(
            current, start,
            "predecessor chain from {goal} does not end at the start"
        );
        route.reverse();
        route
    }
}

/// A route from start to goal, inclusive, with its total cost.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    cells: Vec<Cell>,
    cost: f64,
}

impl Path {
    pub(crate) fn new(cells: Vec<Cell>, cost: f64) -> Path {
        debug_assert!(!cells.is_empty());
        Path { cells, cost }
    }

    /// Total step cost under the metric the search used.
    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn into_cells(self) -> Vec<Cell> {
        self.cells
    }

    pub fn start(&self) -> Cell {
        self.cells[0]
    }

    pub fn goal(&self) -> Cell {
        self.cells[self.cells.len() - 1]
    }

    /// Number of cells, both endpoints included.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always `false`: a path holds at least its start.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of steps taken.
    pub fn steps(&self) -> usize {
        self.cells.len() - 1
    }

    /// The column of each cell, in travel order.
    pub fn columns(&self) -> impl '_ + Iterator<Item = usize> {
        self.cells.iter().map(|cell| cell.col)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Cell> {
        self.cells.iter()
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a Cell;
    type IntoIter = std::slice::Iter<'a, Cell>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reconstructs_in_travel_order() {
        let mut links = Predecessors::new(4, 4);
        let start = Cell::new(0, 2);
        links.record(Cell::new(1, 2), start);
        links.record(Cell::new(2, 1), Cell::new(1, 2));
        links.record(Cell::new(3, 1), Cell::new(2, 1));
        assert_eq!(
            links.reconstruct(Cell::new(3, 1), start),
            vec![start, Cell::new(1, 2), Cell::new(2, 1), Cell::new(3, 1)]
        );
    }

    #[test]
    fn start_equal_to_goal_is_one_cell() {
        let links = Predecessors::new(2, 2);
        let cell = Cell::new(1, 1);
        assert_eq!(links.reconstruct(cell, cell), vec![cell]);
    }

    #[test]
    #[should_panic(expected = "cycle")]
    fn cycle_is_a_defect() {
        let mut links = Predecessors::new(2, 2);
        links.record(Cell::new(0, 0), Cell::new(1, 1));
        links.record(Cell::new(1, 1), Cell::new(0, 0));
        links.reconstruct(Cell::new(1, 1), Cell::new(0, 1));
    }

    #[test]
    #[should_panic(expected = "does not end at the start")]
    fn detached_chain_is_a_defect() {
        let mut links = Predecessors::new(2, 2);
        links.record(Cell::new(1, 1), Cell::new(1, 0));
        links.reconstruct(Cell::new(1, 1), Cell::new(0, 0));
    }

    #[test]
    fn path_accessors() {
        let path = Path::new(vec![Cell::new(0, 1), Cell::new(1, 0), Cell::new(2, 1)], 2.0);
        assert_eq!(path.start(), Cell::new(0, 1));
        assert_eq!(path.goal(), Cell::new(2, 1));
        assert_eq!(path.steps(), 2);
        assert_eq!(path.columns().collect::<Vec<_>>(), vec![1, 0, 1]);
    }
}

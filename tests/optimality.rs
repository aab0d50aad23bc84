//! Compare A* against an exhaustive Dijkstra baseline on small random grids.
//!
//! Run with: `cargo test --test optimality`

use proptest::prelude::*;
use std::{cmp::Ordering, collections::BinaryHeap};
use waypath::{
    geometry::{tile::Occupancy, Cell},
    search::{HeuristicField, Metric, Outcome, Searcher},
    GridMap,
};

const TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Entry {
    cost: f64,
    cell: Cell,
}

impl Eq for Entry {}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        other.cost.total_cmp(&self.cost)
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn step_cost(metric: Metric, drow: isize, dcol: isize) -> f64 {
    match metric {
        Metric::Euclidean if drow != 0 && dcol != 0 => std::f64::consts::SQRT_2,
        _ => 1.0,
    }
}

/// Exact cost from `source` to every free cell, `None` where unreachable.
fn dijkstra(map: &GridMap, source: Cell, metric: Metric) -> Vec<Option<f64>> {
    let (height, width) = (map.height(), map.width());
    let mut best: Vec<Option<f64>> = vec![None; height * width];
    if map[source].is_blocked() {
        return best;
    }
    let mut queue = BinaryHeap::new();
    best[source.row * width + source.col] = Some(0.0);
    queue.push(Entry {
        cost: 0.0,
        cell: source,
    });
    while let Some(Entry { cost, cell }) = queue.pop() {
        if best[cell.row * width + cell.col].map_or(false, |known| known < cost) {
            continue;
        }
        for drow in -1..=1_isize {
            for dcol in -1..=1_isize {
                if drow == 0 && dcol == 0 {
                    continue;
                }
                let row = cell.row as isize + drow;
                let col = cell.col as isize + dcol;
                if row < 0 || col < 0 || row >= height as isize || col >= width as isize {
                    continue;
                }
                let next = Cell::new(row as usize, col as usize);
                if map[next].is_blocked() {
                    continue;
                }
                let candidate = cost + step_cost(metric, drow, dcol);
                let slot = &mut best[next.row * width + next.col];
                if slot.map_or(true, |known| candidate < known) {
                    *slot = Some(candidate);
                    queue.push(Entry {
                        cost: candidate,
                        cell: next,
                    });
                }
            }
        }
    }
    best
}

fn metric() -> impl Strategy<Value = Metric> {
    prop_oneof![Just(Metric::Diagonal), Just(Metric::Euclidean)]
}

/// A grid of up to 12x12 with roughly a third of its cells blocked, plus two cells in it.
fn scenario() -> impl Strategy<Value = (GridMap, Cell, Cell)> {
    (1_usize..=12, 1_usize..=12).prop_flat_map(|(height, width)| {
        (
            proptest::collection::vec(proptest::bool::weighted(0.3), height * width),
            0..height,
            0..width,
            0..height,
            0..width,
        )
            .prop_map(move |(blocked, srow, scol, grow, gcol)| {
                let map = GridMap::procedural(height, width, |cell| {
                    Occupancy::from(blocked[cell.row * width + cell.col])
                });
                (map, Cell::new(srow, scol), Cell::new(grow, gcol))
            })
    })
}

proptest! {
    #[test]
    fn heuristic_never_overestimates((map, _start, goal) in scenario(), metric in metric()) {
        let field = HeuristicField::for_map(&map, goal, metric).unwrap();
        // step costs are symmetric, so distances from the goal are distances to it
        let exact = dijkstra(&map, goal, metric);
        for cell in map.cells() {
            if let Some(cost) = exact[cell.row * map.width() + cell.col] {
                prop_assert!(
                    field[cell] <= cost + TOLERANCE,
                    "h{} = {} exceeds true cost {}", cell, field[cell], cost
                );
            }
        }
    }

    #[test]
    fn finds_minimum_cost((map, start, goal) in scenario(), metric in metric()) {
        let field = HeuristicField::for_map(&map, goal, metric).unwrap();
        let outcome = Searcher::new(&map, &field, start).unwrap().run();
        let exact = if map[goal].is_blocked() {
            None
        } else {
            dijkstra(&map, start, metric)[goal.row * map.width() + goal.col]
        };

        match (outcome, exact) {
            (Outcome::Found(path), Some(cost)) => {
                prop_assert!((path.cost() - cost).abs() < TOLERANCE, "{} != {}", path.cost(), cost);
                prop_assert_eq!(path.start(), start);
                prop_assert_eq!(path.goal(), goal);

                let mut walked = 0.0;
                for (from, to) in path.cells().iter().zip(path.cells().iter().skip(1)) {
                    prop_assert!(from.is_neighbor_of(*to));
                    prop_assert!(!map[*to].is_blocked());
                    walked += metric.step_cost(*from, *to);
                }
                prop_assert!((walked - path.cost()).abs() < TOLERANCE);
            }
            (Outcome::NoPath, None) => {}
            (outcome, exact) => {
                prop_assert!(false, "search gave {:?}, baseline gave {:?}", outcome, exact);
            }
        }
    }

    #[test]
    fn identical_inputs_identical_routes((map, start, goal) in scenario(), metric in metric()) {
        let first = map.navigate(start, goal, metric).unwrap();
        let second = map.navigate(start, goal, metric).unwrap();
        prop_assert_eq!(first, second);
    }
}

//! Searches hold no shared mutable state, so one map and one heuristic field
//! can serve many threads at once.

use waypath::{
    geometry::{tile::Occupancy, Cell},
    search::{HeuristicField, Metric, Outcome, Searcher},
    GridMap,
};

fn maze() -> GridMap {
    // every third row is a wall with a single gap, alternating sides
    GridMap::procedural(15, 9, |cell| {
        let gap = if (cell.row / 3) % 2 == 0 { 8 } else { 0 };
        Occupancy::from(cell.row % 3 == 1 && cell.col != gap)
    })
}

#[test]
fn concurrent_searches_agree_with_sequential() {
    let map = maze();
    let goal = map.default_goal();
    let field = HeuristicField::for_map(&map, goal, Metric::Euclidean).unwrap();

    let starts: Vec<Cell> = (0..map.width()).map(|col| Cell::new(0, col)).collect();
    let sequential: Vec<Outcome> = starts
        .iter()
        .map(|&start| Searcher::new(&map, &field, start).unwrap().run())
        .collect();

    let concurrent: Vec<Outcome> = std::thread::scope(|scope| {
        let handles: Vec<_> = starts
            .iter()
            .map(|&start| {
                let (map, field) = (&map, &field);
                scope.spawn(move || Searcher::new(map, field, start).unwrap().run())
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect()
    });

    assert_eq!(sequential, concurrent);
    assert!(sequential.iter().all(Outcome::is_found));
}

#[test]
fn searches_toward_different_goals_do_not_interfere() {
    let map = maze();
    let goals = [Cell::new(14, 0), Cell::new(14, 4), Cell::new(14, 8)];

    let costs: Vec<f64> = std::thread::scope(|scope| {
        let handles: Vec<_> = goals
            .iter()
            .map(|&goal| {
                let map = &map;
                scope.spawn(move || {
                    let outcome = map
                        .navigate(map.default_start(), goal, Metric::Diagonal)
                        .unwrap();
                    outcome.path().map(|path| path.cost())
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap().unwrap())
            .collect()
    });

    for (goal, cost) in goals.iter().zip(&costs) {
        let alone = map
            .navigate(map.default_start(), *goal, Metric::Diagonal)
            .unwrap();
        assert_eq!(alone.path().map(|path| path.cost()), Some(*cost));
    }
}

//! Run with: `cargo test --test parse_grid`

use waypath::{
    geometry::{
        tile::{DisplayWidth, Marked},
        Cell, Map, MapConversionErr, Traversable,
    },
    input::parse_grid_str,
    search::Metric,
};

/// A terrain height; peaks of 9 cannot be crossed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, derive_more::FromStr)]
struct Height(u8);

impl DisplayWidth for Height {
    const DISPLAY_WIDTH: usize = 1;
}

impl From<Height> for Traversable {
    fn from(height: Height) -> Traversable {
        match height.0 {
            9 => Traversable::Obstructed,
            _ => Traversable::Free,
        }
    }
}

const HEIGHTS: &str = r"
2199943210
3987894921
9856789892
8767896789
9899965678
";

#[test]
fn routes_around_peaks() -> Result<(), MapConversionErr> {
    let map: Map<Height> = parse_grid_str(HEIGHTS)?;
    assert_eq!((map.height(), map.width()), (5, 10));

    let start = Cell::new(0, 0);
    let goal = Cell::new(4, 9);
    let outcome = map.navigate(start, goal, Metric::Diagonal).unwrap();
    let path = outcome.path().expect("a valley runs corner to corner");
    assert_eq!(path.start(), start);
    assert_eq!(path.goal(), goal);
    assert!(path.iter().all(|&cell| map[cell] != Height(9)));
    // one column per step the whole way across
    assert_eq!(path.cost(), 9.0);
    Ok(())
}

#[test]
fn peaks_are_never_neighbors() -> Result<(), MapConversionErr> {
    let map: Map<Height> = parse_grid_str(HEIGHTS)?;
    for cell in map.cells() {
        assert!(map.open_neighbors(cell).all(|neighbor| map[neighbor] != Height(9)));
    }
    Ok(())
}

fn find(map: &Map<Marked>, wanted: Marked) -> Option<Cell> {
    map.iter()
        .find(|&(_, &tile)| tile == wanted)
        .map(|(cell, _)| cell)
}

#[test]
fn drawn_map_with_endpoints() -> Result<(), MapConversionErr> {
    let map: Map<Marked> = parse_grid_str(
        r"
S..#.
.#.#.
.#...
...#G
",
    )?;
    let start = find(&map, Marked::Start).unwrap();
    let goal = find(&map, Marked::Goal).unwrap();
    assert_eq!((start, goal), (Cell::new(0, 0), Cell::new(3, 4)));

    let outcome = map.navigate(start, goal, Metric::Diagonal).unwrap();
    let path = outcome.path().unwrap();
    assert_eq!(path.cost(), 4.0);
    assert_eq!(
        path.cells(),
        &[
            Cell::new(0, 0),
            Cell::new(0, 1),
            Cell::new(1, 2),
            Cell::new(2, 3),
            Cell::new(3, 4),
        ]
    );
    Ok(())
}

#[test]
fn unknown_character_is_reported() {
    let err = parse_grid_str::<Marked>("S..\n.?.\n..G\n").unwrap_err();
    assert!(err.to_string().contains("line 2"), "{err}");
}

use super::{
    tile::{Marked, Occupancy},
    Traversable,
};
use crate::geometry::{
    cell::{NEIGHBOR_OFFSETS, ORTHOGONAL_OFFSETS},
    Cell,
};
use bitvec::bitvec;
use std::{
    collections::VecDeque,
    fmt, hash,
    ops::{Index, IndexMut},
};

#[cfg(feature = "map-render")]
use {
    super::{
        render::{n_pixels_for, pixel_height, pixel_width, render_cell, Encoder},
        tile::ToRgb,
        Animation, Style,
    },
    std::{path::Path, time::Duration},
};

/// A Map keeps track of a rectangular tile grid.
///
/// Cells are addressed `(row, col)`; row 0 is the first row of the input, which
/// by convention is the row the agent stands in. Storage is row-major.
///
/// Dimensions are always given rows first: `height`, then `width`.
///
/// ## Entry Points
///
/// - [`Map::new`] creates a map of default tiles.
/// - [`Map::try_from_rows`] validates a 2d array supplied by a grid producer.
/// - [`crate::input::parse_grid`] reads a map from a text file.
#[derive(Clone, Default)]
pub struct Map<Tile> {
    tiles: Vec<Tile>,
    width: usize,
    height: usize,
}

/// An occupancy grid: the map type the planner consumes.
pub type GridMap = Map<Occupancy>;

impl<Tile> Map<Tile> {
    /// Procedurally create a new `Map` from a function.
    pub fn procedural(height: usize, width: usize, procedure: impl Fn(Cell) -> Tile) -> Map<Tile> {
        let mut tiles = Vec::with_capacity(width * height);
        for row in 0..height {
            for col in 0..width {
                tiles.push(procedure(Cell::new(row, col)));
            }
        }
        Map {
            tiles,
            width,
            height,
        }
    }

    /// Width of this map (number of columns).
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height of this map (number of rows).
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Total number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Iterate over the cells and tiles of this map in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Cell, &Tile)> {
        let index2cell = self.make_index2cell();
        self.tiles
            .iter()
            .enumerate()
            .map(move |(idx, tile)| (index2cell(idx), tile))
    }

    /// Iterate over the cells of this map in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> {
        let index2cell = self.make_index2cell();
        (0..self.tiles.len()).map(index2cell)
    }

    /// `true` when a cell is legal within the bounds of this map.
    #[inline]
    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.row < self.height && cell.col < self.width
    }

    /// Make a function which returns `true` when the parameter is within the bounds of this map,
    /// without depending on the lifetime of `self`.
    pub fn make_in_bounds(&self) -> impl Fn(Cell) -> bool {
        let height = self.height;
        let width = self.width;

        move |cell| cell.row < height && cell.col < width
    }

    /// Convert an in-bounds cell into a 1d index into the tiles.
    ///
    /// Returns `None` for cells outside this map.
    #[inline]
    pub fn index_of(&self, cell: Cell) -> Option<usize> {
        self.in_bounds(cell)
            .then(|| cell.col + (cell.row * self.width))
    }

    /// convert a 1d index in the tiles into a 2d cell
    fn index2cell(&self, idx: usize) -> Cell {
        Cell::new(idx / self.width, idx % self.width)
    }

    /// make a function which converts a 1d index in the tiles into a cell without borrowing self
    fn make_index2cell(&self) -> impl Fn(usize) -> Cell {
        let width = self.width;
        move |idx| Cell::new(idx / width, idx % width)
    }

    /// Return an iterator of all legal cells adjacent to the given cell.
    ///
    /// This iterator will return up to 8 elements; it includes diagonals.
    /// Cells are produced in row-major offset order.
    pub fn adjacencies(&self, cell: Cell) -> impl Iterator<Item = Cell> {
        let in_bounds = self.make_in_bounds();
        NEIGHBOR_OFFSETS
            .into_iter()
            .filter_map(move |(drow, dcol)| cell.offset(drow, dcol))
            .filter(move |&cell| in_bounds(cell))
    }

    /// Return an iterator of all legal cells orthogonally adjacent to the given cell.
    ///
    /// This iterator will return up to 4 elements; it does not include diagonals.
    pub fn orthogonal_adjacencies(&self, cell: Cell) -> impl Iterator<Item = Cell> {
        let in_bounds = self.make_in_bounds();
        ORTHOGONAL_OFFSETS
            .into_iter()
            .filter_map(move |(drow, dcol)| cell.offset(drow, dcol))
            .filter(move |&cell| in_bounds(cell))
    }

    /// The conventional start cell: the agent's own row, centre column.
    #[inline]
    pub fn default_start(&self) -> Cell {
        Cell::new(0, self.width / 2)
    }

    /// The conventional goal cell: the far row, centre column.
    #[inline]
    pub fn default_goal(&self) -> Cell {
        Cell::new(self.height.saturating_sub(1), self.width / 2)
    }

    /// Get the tile at a cell, if the cell is in bounds.
    #[inline]
    pub fn get(&self, cell: Cell) -> Option<&Tile> {
        self.index_of(cell).map(|idx| &self.tiles[idx])
    }

    /// Convert the underlying tile type of a map.
    ///
    /// This produces a new map whose tiles are of a new underlying type.
    pub fn convert_tile_type<NewTile>(self) -> Map<NewTile>
    where
        Tile: Into<NewTile>,
    {
        let mut tiles = Vec::with_capacity(self.tiles.len());
        tiles.extend(self.tiles.into_iter().map(Into::into));
        Map {
            tiles,
            width: self.width,
            height: self.height,
        }
    }
}

impl<Tile: Clone + Default> Map<Tile> {
    /// Create a new map of the specified dimensions, filled with default tiles.
    #[inline]
    pub fn new(height: usize, width: usize) -> Map<Tile> {
        Map {
            tiles: vec![Tile::default(); width * height],
            width,
            height,
        }
    }
}

impl<Tile: Clone> Map<Tile> {
    /// Convert an input 2d array into a map.
    ///
    /// The outer slice holds rows; `source[0][0]` becomes cell `(0, 0)`.
    ///
    /// Fails if there are no rows, if the rows are empty, or if any row's length
    /// differs from the first row's.
    pub fn try_from_rows<Row>(source: &[Row]) -> Result<Map<Tile>, MapConversionErr>
    where
        Row: AsRef<[Tile]>,
    {
        let height = source.len();
        let width = source.first().map_or(0, |row| row.as_ref().len());
        if height == 0 || width == 0 {
            return Err(MapConversionErr::Empty);
        }

        if let Some((row, found)) = source
            .iter()
            .map(|row| row.as_ref().len())
            .enumerate()
            .find(|&(_, len)| len != width)
        {
            return Err(MapConversionErr::NotRectangular {
                row,
                expected: width,
                found,
            });
        }

        let mut tiles = Vec::with_capacity(width * height);
        for row in source.iter() {
            tiles.extend_from_slice(row.as_ref());
        }

        Ok(Map {
            tiles,
            width,
            height,
        })
    }
}

impl<Tile> fmt::Debug for Map<Tile> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Map")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

impl<Tile: hash::Hash> hash::Hash for Map<Tile> {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.width.hash(state);
        self.height.hash(state);
        self.tiles.hash(state);
    }
}

impl<Tile: PartialEq> PartialEq for Map<Tile> {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width && self.height == other.height && self.tiles == other.tiles
    }
}

impl<Tile: Eq> Eq for Map<Tile> {}

impl<Tile> Index<Cell> for Map<Tile> {
    type Output = Tile;

    /// Panics if the cell is out of bounds.
    fn index(&self, cell: Cell) -> &Tile {
        match self.index_of(cell) {
            Some(idx) => &self.tiles[idx],
            None => panic!(
                "cell {} out of bounds for {}x{} map",
                cell, self.height, self.width
            ),
        }
    }
}

impl<Tile> IndexMut<Cell> for Map<Tile> {
    /// Panics if the cell is out of bounds.
    fn index_mut(&mut self, cell: Cell) -> &mut Tile {
        match self.index_of(cell) {
            Some(idx) => &mut self.tiles[idx],
            None => panic!(
                "cell {} out of bounds for {}x{} map",
                cell, self.height, self.width
            ),
        }
    }
}

impl<Tile> fmt::Display for Map<Tile>
where
    Tile: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.tiles.chunks(self.width.max(1)) {
            for tile in row {
                write!(f, "{}", tile)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(feature = "map-render")]
impl<Tile> Map<Tile>
where
    Tile: ToRgb,
{
    /// Render this map as a [`gif::Frame`].
    pub(crate) fn render_frame(&self, style: Style) -> gif::Frame {
        // 3 subpixels per pixel; 1 each for r, g, b
        let width = self.width;
        let mut subpixels = vec![0; n_pixels_for(self.width, self.height) * 3];

        for (cell, tile) in self.iter() {
            render_cell(cell, tile, &mut subpixels, width, style)
        }

        gif::Frame::from_rgb(pixel_width(width), pixel_height(self.height), &subpixels)
    }

    fn make_gif_encoder(&self, output: &Path) -> Result<Encoder, RenderError> {
        let output = std::fs::File::create(output)?;
        let output = std::io::BufWriter::new(output);

        gif::Encoder::new(
            output,
            pixel_width(self.width),
            pixel_height(self.height),
            &[],
        )
        .map_err(Into::into)
    }

    /// Render this map as a still image into an output file.
    ///
    /// _Depends on the `map-render` feature._
    ///
    /// The output image is a gif under all circumstances. It is useful, though
    /// unenforced, that the output file name matches `*.gif`.
    pub fn render(&self, output: &Path, style: Style) -> Result<(), RenderError> {
        let mut output = self.make_gif_encoder(output)?;
        output.write_frame(&self.render_frame(style))?;
        Ok(())
    }

    /// Prepare an animation from this map.
    ///
    /// _Depends on the `map-render` feature._
    ///
    /// This returns an `Animation` object which can have frames added to it.
    /// This method does not automatically render this `Map` frame to the `Animation`.
    ///
    /// Frames whose dimensions differ from this Map's are rejected.
    ///
    /// The animation will loop infinitely, displaying each frame for
    /// `frame_duration`.
    pub fn prepare_animation(
        &self,
        output: &Path,
        frame_duration: Duration,
        style: Style,
    ) -> Result<Animation, RenderError> {
        let encoder = self.make_gif_encoder(output)?;
        Animation::new(encoder, frame_duration, style, self.height, self.width)
            .map_err(Into::into)
    }
}

/// An error which can arise during rendering.
///
/// _Depends on the `map-render` feature._
#[cfg(feature = "map-render")]
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("encoding gif")]
    Gif(#[from] gif::EncodingError),
    #[error("frame is {height}x{width} but the animation is {expected_height}x{expected_width}")]
    FrameSize {
        expected_height: usize,
        expected_width: usize,
        height: usize,
        width: usize,
    },
}

impl<Tile> Map<Tile>
where
    Tile: Clone + Into<Traversable>,
{
    /// Traversability of an in-bounds cell; out-of-bounds cells are obstructed.
    #[inline]
    pub fn traversable(&self, cell: Cell) -> Traversable {
        self.get(cell)
            .map_or(Traversable::Obstructed, |tile| tile.clone().into())
    }

    /// `true` when the cell is in bounds and free.
    #[inline]
    pub fn is_free(&self, cell: Cell) -> bool {
        self.traversable(cell).is_free()
    }

    /// The in-bounds, free cells among the 8 geometric neighbors of `cell`.
    ///
    /// Blocked and out-of-bounds neighbors are silently skipped. Cells are
    /// produced in row-major offset order.
    pub fn open_neighbors(&self, cell: Cell) -> impl '_ + Iterator<Item = Cell> {
        self.adjacencies(cell)
            .filter(move |&neighbor| self.is_free(neighbor))
    }

    /// Visit every free cell 8-connected to the initial cell, the initial cell included.
    ///
    /// If the initial cell is obstructed, nothing is visited.
    /// If the visitor ever returns true, processing halts and no further
    /// cells are visited.
    pub fn reachable_from(&self, cell: Cell, mut visit: impl FnMut(Cell, &Tile) -> bool) {
        let Some(start) = self.index_of(cell) else {
            return;
        };

        let mut visited = bitvec!(0; self.tiles.len());
        let mut queue = VecDeque::new();
        visited.set(start, true);
        queue.push_back(cell);

        while let Some(cell) = queue.pop_front() {
            if !self.is_free(cell) {
                continue;
            }

            if visit(cell, &self[cell]) {
                break;
            }

            for neighbor in self.adjacencies(cell) {
                // adjacencies are always in bounds
                let idx = neighbor.col + neighbor.row * self.width;
                if !visited[idx] {
                    visited.set(idx, true);
                    queue.push_back(neighbor);
                }
            }
        }
    }
}

/// How far [`GridMap::inflate`] grows each obstacle.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    parse_display::Display,
    parse_display::FromStr,
)]
#[display(style = "lowercase")]
pub enum Inflation {
    /// Block the four orthogonal neighbors of each obstacle.
    Orthogonal,
    /// Block all eight neighbors of each obstacle.
    Diagonal,
}

impl Map<Occupancy> {
    /// Produce a copy of this grid in which every obstacle has grown by one cell.
    ///
    /// This keeps the planned route a cell's width away from obstacles.
    /// Obstacles never grow into the `spare` cells, typically the start and goal;
    /// a spared cell which was already blocked stays blocked.
    pub fn inflate(&self, inflation: Inflation, spare: &[Cell]) -> GridMap {
        let mut inflated = self.clone();
        for (cell, _) in self.iter().filter(|(_, tile)| tile.is_blocked()) {
            let grown: Vec<Cell> = match inflation {
                Inflation::Orthogonal => self.orthogonal_adjacencies(cell).collect(),
                Inflation::Diagonal => self.adjacencies(cell).collect(),
            };
            for neighbor in grown.into_iter().filter(|neighbor| !spare.contains(neighbor)) {
                inflated[neighbor] = Occupancy::Blocked;
            }
        }
        inflated
    }

    /// Mark a route over a copy of this grid.
    ///
    /// The first cell of the route is marked as the start, the last as the goal.
    /// Cells outside the grid are ignored.
    pub fn overlay(&self, route: &[Cell]) -> Map<Marked> {
        let mut marked = self.clone().convert_tile_type::<Marked>();
        for &cell in route {
            if let Some(idx) = marked.index_of(cell) {
                marked.tiles[idx] = Marked::Route;
            }
        }
        if let (Some(&first), Some(&last)) = (route.first(), route.last()) {
            if marked.in_bounds(last) {
                marked[last] = Marked::Goal;
            }
            if marked.in_bounds(first) {
                marked[first] = Marked::Start;
            }
        }
        marked
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MapConversionErr {
    #[error("converting tile from {1:?} on line {2}")]
    TileConversion(
        #[source] Box<dyn 'static + std::error::Error + Send + Sync>,
        String,
        usize,
    ),
    #[error("map must have at least one row and one column")]
    Empty,
    #[error("map must be rectangular: row {row} has {found} cells, expected {expected}")]
    NotRectangular {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

//! Read occupancy grids from text.
//!
//! Each non-blank line is one row, first line first. Within a line, tiles may be
//! written back to back (`0010`) or separated by whitespace, commas, or brackets,
//! so a grid dumped as a nested list (`[0, 0, 1],`) reads the same as a compact one.

use crate::geometry::{tile::DisplayWidth, Map, MapConversionErr};
use lazy_static::lazy_static;
use regex::Regex;
use std::{
    fs::File,
    io::{prelude::*, BufReader, Cursor},
    path::Path,
    str::FromStr,
};

lazy_static! {
    static ref SEPARATOR: Regex = Regex::new(r"[\s,\[\]]+").unwrap();
}

/// Parse the file at the specified path into a map.
///
/// See also [`parse_grid_str`] for equivalent functionality for strings, useful for test data.
pub fn parse_grid<Tile>(path: &Path) -> Result<Map<Tile>, MapConversionErr>
where
    Tile: Clone + DisplayWidth + FromStr,
    <Tile as FromStr>::Err: 'static + std::error::Error + Send + Sync,
{
    let file = File::open(path)?;
    parse_grid_reader(BufReader::new(file))
}

/// Parse the provided data into a map.
pub fn parse_grid_str<Tile>(data: &str) -> Result<Map<Tile>, MapConversionErr>
where
    Tile: Clone + DisplayWidth + FromStr,
    <Tile as FromStr>::Err: 'static + std::error::Error + Send + Sync,
{
    parse_grid_reader(Cursor::new(data))
}

fn parse_row<Tile>(line: &str, line_number: usize) -> Result<Vec<Tile>, MapConversionErr>
where
    Tile: DisplayWidth + FromStr,
    <Tile as FromStr>::Err: 'static + std::error::Error + Send + Sync,
{
    let mut row = Vec::with_capacity(line.len() / Tile::DISPLAY_WIDTH.max(1));
    for token in SEPARATOR.split(line).filter(|token| !token.is_empty()) {
        for chunk in Tile::chunks(token) {
            let tile = Tile::from_str(&chunk).map_err(|err| {
                MapConversionErr::TileConversion(Box::new(err), chunk.to_string(), line_number)
            })?;
            row.push(tile);
        }
    }
    Ok(row)
}

/// Parse the contents of the provided reader into a map.
///
/// Often [`parse_grid`] or [`parse_grid_str`] are more ergonomic.
///
/// Lines holding nothing but separators are skipped. Line numbers in errors count from 1.
pub fn parse_grid_reader<Tile, Reader>(reader: Reader) -> Result<Map<Tile>, MapConversionErr>
where
    Tile: Clone + DisplayWidth + FromStr,
    <Tile as FromStr>::Err: 'static + std::error::Error + Send + Sync,
    Reader: BufRead,
{
    let mut rows = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let row = parse_row(&line?, idx + 1)?;
        if !row.is_empty() {
            rows.push(row);
        }
    }
    log::debug!(
        "read {} rows of {} tiles",
        rows.len(),
        rows.first().map_or(0, Vec::len)
    );
    Map::try_from_rows(&rows)
}

use super::Traversable;
use smallstr::SmallString;
use std::{convert::TryFrom, marker::PhantomData};

/// Number of characters below which the [`Chunks`] iterator does not allocate.
pub const CHUNK_WIDTH: usize = 4;

/// A type implementing `DisplayWidth` has a constant width for display and parsing.
///
/// This makes it suitable for 2d grid maps.
pub trait DisplayWidth {
    const DISPLAY_WIDTH: usize;

    /// Split a string into an iterator of chunks of characters of length `DISPLAY_WIDTH`
    fn chunks(s: &str) -> Chunks<Self> {
        Chunks(s.chars(), PhantomData)
    }
}

/// Iterator of chunks of equal width from a string.
///
/// Created with [`DisplayWidth::chunks`]. Never heap-allocates if `T::DISPLAY_WIDTH <= CHUNK_WIDTH`.
///
/// A trailing partial chunk is yielded as-is, so that it fails tile parsing
/// rather than silently vanishing.
pub struct Chunks<'a, T: ?Sized>(std::str::Chars<'a>, PhantomData<T>);

impl<T: DisplayWidth> Iterator for Chunks<'_, T> {
    // 4 bytes in a max-width char
    type Item = SmallString<[u8; 4 * CHUNK_WIDTH]>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut s = SmallString::new();
        for _ in 0..T::DISPLAY_WIDTH {
            match self.0.next() {
                Some(ch) => s.push(ch),
                None => break,
            }
        }
        (!s.is_empty()).then_some(s)
    }
}

/// A type implementing `ToRgb` can be converted to a single color.
///
/// This is useful for rendering map tiles.
pub trait ToRgb {
    fn to_rgb(&self) -> [u8; 3];
}

/// Occupancy state of a single grid cell, as delivered by the grid producer.
///
/// The textual form matches the producer's bitmap: `0` is free, `1` is blocked.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    parse_display::Display,
    parse_display::FromStr,
)]
pub enum Occupancy {
    #[display("0")]
    #[default]
    Free,
    #[display("1")]
    Blocked,
}

impl Occupancy {
    #[inline]
    pub fn is_blocked(self) -> bool {
        self == Occupancy::Blocked
    }
}

impl DisplayWidth for Occupancy {
    const DISPLAY_WIDTH: usize = 1;
}

impl From<Occupancy> for Traversable {
    fn from(occupancy: Occupancy) -> Self {
        match occupancy {
            Occupancy::Free => Traversable::Free,
            Occupancy::Blocked => Traversable::Obstructed,
        }
    }
}

/// `true` means blocked.
impl From<bool> for Occupancy {
    fn from(blocked: bool) -> Occupancy {
        if blocked {
            Occupancy::Blocked
        } else {
            Occupancy::Free
        }
    }
}

impl TryFrom<u8> for Occupancy {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Occupancy::Free),
            1 => Ok(Occupancy::Blocked),
            other => Err(other),
        }
    }
}

impl ToRgb for Occupancy {
    fn to_rgb(&self) -> [u8; 3] {
        match self {
            // warm white
            Occupancy::Free => [253, 244, 220],
            Occupancy::Blocked => [0, 0, 0],
        }
    }
}

/// A Tile for displaying a planned route over an occupancy grid.
///
/// Produced by [`GridMap::overlay`][crate::geometry::GridMap::overlay].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    parse_display::Display,
    parse_display::FromStr,
)]
pub enum Marked {
    #[display(".")]
    #[default]
    Free,
    #[display("#")]
    Blocked,
    #[display("*")]
    Route,
    #[display("S")]
    Start,
    #[display("G")]
    Goal,
}

impl DisplayWidth for Marked {
    const DISPLAY_WIDTH: usize = 1;
}

impl From<Occupancy> for Marked {
    fn from(occupancy: Occupancy) -> Self {
        match occupancy {
            Occupancy::Free => Marked::Free,
            Occupancy::Blocked => Marked::Blocked,
        }
    }
}

impl From<Marked> for Traversable {
    fn from(marked: Marked) -> Self {
        match marked {
            Marked::Blocked => Traversable::Obstructed,
            _ => Traversable::Free,
        }
    }
}

impl ToRgb for Marked {
    fn to_rgb(&self) -> [u8; 3] {
        match self {
            Marked::Free => [253, 244, 220],
            Marked::Blocked => [0, 0, 0],
            Marked::Route => [66, 135, 245],
            Marked::Start => [46, 204, 64],
            Marked::Goal => [255, 65, 54],
        }
    }
}

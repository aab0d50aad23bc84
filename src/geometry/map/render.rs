use super::RenderError;
use crate::geometry::{tile::ToRgb, Cell, Map};
use rand::Rng;
use std::time::Duration;

/// Pixels along each side of a cell's square in the image.
const CELL_PIXELS: usize = 4;
/// Blank border around the whole image, in pixels.
const MARGIN: usize = 2;
/// One byte each for red, green and blue.
const CHANNELS: usize = 3;

/// How each tile gets drawn within its square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, parse_display::Display, parse_display::FromStr)]
#[display(style = "kebab-case")]
pub enum Style {
    /// Paint the whole square.
    Fill,
    /// Paint a 3x3 block, leaving a 1px dark seam between cells.
    Grid,
    /// Paint a plus sign within the 3x3 block.
    Cross,
    /// A plus sign with each corner of the 3x3 block lit at random, so
    /// consecutive frames shimmer.
    SparkleCross,
}

/// Pixel position within a cell's square, `(x, y)` from its top left.
type Offset = (usize, usize);

const CROSS: [Offset; 5] = [(1, 0), (0, 1), (1, 1), (2, 1), (1, 2)];
const CORNERS: [Offset; 4] = [(0, 0), (0, 2), (2, 0), (2, 2)];

fn square(side: usize) -> impl Iterator<Item = Offset> {
    (0..side).flat_map(move |y| (0..side).map(move |x| (x, y)))
}

impl Style {
    fn offsets(self) -> Vec<Offset> {
        match self {
            Style::Fill => square(CELL_PIXELS).collect(),
            Style::Grid => square(CELL_PIXELS - 1).collect(),
            Style::Cross => CROSS.to_vec(),
            Style::SparkleCross => {
                let mut rng = rand::thread_rng();
                let mut offsets = CROSS.to_vec();
                offsets.extend(CORNERS.into_iter().filter(|_| rng.gen_bool(0.5)));
                offsets
            }
        }
    }
}

/// Paint one cell into a packed RGB buffer for a map `width` cells wide.
pub fn render_cell<Tile: ToRgb>(
    cell: Cell,
    tile: &Tile,
    subpixels: &mut [u8],
    width: usize,
    style: Style,
) {
    let stride = pixel_width(width) as usize;
    let left = MARGIN + cell.col * CELL_PIXELS;
    let top = MARGIN + cell.row * CELL_PIXELS;
    let rgb = tile.to_rgb();

    for (x, y) in style.offsets() {
        let idx = ((top + y) * stride + left + x) * CHANNELS;
        subpixels[idx..idx + CHANNELS].copy_from_slice(&rgb);
    }
}

fn pixels_across(cells: usize) -> u16 {
    (cells * CELL_PIXELS + 2 * MARGIN) as u16
}

/// Image width in pixels for a map `width` cells wide.
pub fn pixel_width(width: usize) -> u16 {
    pixels_across(width)
}

/// Image height in pixels for a map `height` cells tall.
pub fn pixel_height(height: usize) -> u16 {
    pixels_across(height)
}

/// Total pixels in the image of a `width × height` map.
pub fn n_pixels_for(width: usize, height: usize) -> usize {
    pixel_width(width) as usize * pixel_height(height) as usize
}

pub type Encoder = gif::Encoder<std::io::BufWriter<std::fs::File>>;

/// An unfinished looping gif, one frame per planning cycle.
///
/// _Depends on the `map-render` feature._
///
/// Created with [`Map::prepare_animation`]; every frame must have the dimensions of
/// the map it was created from. The gif is finalized when this is dropped.
pub struct Animation {
    encoder: Encoder,
    style: Style,
    height: usize,
    width: usize,
}

impl Animation {
    pub(crate) fn new(
        mut encoder: Encoder,
        frame_duration: Duration,
        style: Style,
        height: usize,
        width: usize,
    ) -> Result<Animation, gif::EncodingError> {
        encoder.set_repeat(gif::Repeat::Infinite)?;

        // gif delays count hundredths of a second
        encoder.write_extension(gif::ExtensionData::new_control_ext(
            (frame_duration.as_millis() / 10) as u16,
            gif::DisposalMethod::Any,
            false,
            None,
        ))?;

        Ok(Animation {
            encoder,
            style,
            height,
            width,
        })
    }

    /// Append a frame showing `map`.
    ///
    /// Fails without writing anything if `map` is not the size of the animation.
    pub fn write_frame<Tile: ToRgb>(&mut self, map: &Map<Tile>) -> Result<(), RenderError> {
        if (map.height(), map.width()) != (self.height, self.width) {
            return Err(RenderError::FrameSize {
                expected_height: self.height,
                expected_width: self.width,
                height: map.height(),
                width: map.width(),
            });
        }
        self.encoder
            .write_frame(&map.render_frame(self.style))
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{tile::Occupancy, GridMap};

    #[test]
    fn frame_covers_every_cell() {
        let map = Map::procedural(3, 5, |cell| Occupancy::from(cell.col == 2));
        let frame = map.render_frame(Style::Fill);
        assert_eq!(frame.width, pixel_width(5));
        assert_eq!(frame.height, pixel_height(3));
        assert_eq!((frame.width, frame.height), (24, 16));
    }

    #[test]
    fn cell_lands_inside_the_margin() {
        let width = 2;
        let mut subpixels = vec![0; n_pixels_for(width, 1) * CHANNELS];
        render_cell(Cell::new(0, 1), &Occupancy::Free, &mut subpixels, width, Style::Fill);
        let stride = pixel_width(width) as usize;
        let lit: Vec<Offset> = (0..subpixels.len() / CHANNELS)
            .filter(|pixel| subpixels[pixel * CHANNELS] != 0)
            .map(|pixel| (pixel % stride, pixel / stride))
            .collect();
        assert_eq!(lit.len(), CELL_PIXELS * CELL_PIXELS);
        assert!(lit.iter().all(|&(x, y)| (6..10).contains(&x) && (2..6).contains(&y)));
    }

    #[test]
    fn style_names() {
        assert_eq!("sparkle-cross".parse::<Style>().unwrap(), Style::SparkleCross);
        assert_eq!(Style::Grid.to_string(), "grid");
    }

    #[test]
    fn animation_rejects_frames_of_another_size() {
        let output = std::env::temp_dir().join(format!("waypath-frames-{}.gif", std::process::id()));
        let first = GridMap::new(3, 3);
        let mut animation = first
            .prepare_animation(&output, Duration::from_millis(100), Style::Grid)
            .unwrap();
        animation.write_frame(&first).unwrap();
        let err = animation.write_frame(&GridMap::new(4, 3)).unwrap_err();
        assert!(matches!(
            err,
            RenderError::FrameSize {
                expected_height: 3,
                height: 4,
                ..
            }
        ));
        drop(animation);
        std::fs::remove_file(&output).ok();
    }
}

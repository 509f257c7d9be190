use std::io;
use std::io::{ BufWriter, Write };
use std::fs::File;
use std::path::Path;

use crate::color::Color;
use crate::consts::PPM_MAX_LINE;

/// Output flavours of the PPM image format.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PpmFormat {
    /// `P3`: whitespace separated decimal channels.
    Plain,

    /// `P6`: header followed by raw channel bytes.
    Raw,
}

/// A buffer of rendered pixels.
///
/// The raycaster writes one `Color` per primary ray into the buffer. Pixels
/// are stored row-major; the first row is the top of the image. Every pixel
/// starts out black, which doubles as the background for rays that hit
/// nothing.
#[derive(Clone, Default, Debug, PartialEq)]
pub struct PixelBuffer {
    /// The width of the buffer, in pixels.
    pub width: usize,

    /// The height of the buffer, in pixels.
    pub height: usize,

    /// The pixels of the buffer, stored as a flattened vector.
    pixels: Vec<Color>,
}

impl PixelBuffer {
    /// Creates a new, all-black buffer with specified width and height.
    pub fn new(width: usize, height: usize) -> PixelBuffer {
        PixelBuffer {
            width,
            height,
            pixels: vec![Color::black(); width * height]
        }
    }

    /// Writes a color to a location on the buffer.
    ///
    /// Out-of-bounds pixels are ignored. `y` is the row of the pixel and `x`
    /// the column, both zero-indexed.
    ///
    /// # Examples
    ///
    /// ```
    /// # use raycast::color::Color;
    /// # use raycast::canvas::PixelBuffer;
    /// let purple = Color::rgb(255, 0, 255);
    /// let mut buffer = PixelBuffer::new(8, 8);
    /// buffer.write_pixel(4, 2, purple);
    /// assert_eq!(buffer.read_pixel(4, 2), Some(purple));
    /// assert_eq!(buffer.read_pixel(8, 2), None);
    /// ```
    pub fn write_pixel(&mut self, x: usize, y: usize, pixel: Color) {
        if x >= self.width || y >= self.height {
            return;
        }

        self.pixels[(y * self.width) + x] = pixel;
    }

    /// Reads a color from a location on the buffer, or `None` when the
    /// location is out-of-bounds.
    pub fn read_pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None
        }

        Some(self.pixels[(y * self.width) + x])
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Mutable access to the flat pixel storage, for renderers that split the
    /// buffer into disjoint rows.
    pub fn pixels_mut(&mut self) -> &mut [Color] {
        &mut self.pixels
    }

    /// Saves the buffer to a PPM file.
    pub fn save(&self, path: &Path, format: PpmFormat) -> io::Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        self.write_ppm(&mut out, format)?;
        out.flush()
    }

    /// Writes the buffer as a PPM image.
    ///
    /// Plain output keeps every line within 70 columns; a color which would
    /// cross the limit is moved to the next line.
    pub fn write_ppm<W: Write>(&self, out: &mut W, format: PpmFormat)
        -> io::Result<()> {
        let magic = match format {
            PpmFormat::Plain => "P3",
            PpmFormat::Raw => "P6",
        };

        writeln!(out, "{}", magic)?;
        writeln!(out, "{} {}", self.width, self.height)?;
        writeln!(out, "255")?; // Maximum color value

        match format {
            PpmFormat::Raw => {
                for pixel in self.pixels.iter() {
                    out.write_all(&pixel.to_array())?;
                }
            },

            PpmFormat::Plain => {
                let mut col = 0;
                for pixel in self.pixels.iter() {
                    for channel in pixel.to_array().iter() {
                        let s = channel.to_string();

                        if col == 0 {
                            write!(out, "{}", s)?;
                            col = s.len();
                        } else if col + 1 + s.len() > PPM_MAX_LINE {
                            write!(out, "\n{}", s)?;
                            col = s.len();
                        } else {
                            write!(out, " {}", s)?;
                            col += 1 + s.len();
                        }
                    }
                }

                if col != 0 {
                    writeln!(out)?;
                }
            },
        }

        Ok(())
    }
}

#[test]
fn new_buffer_is_black() {
    let buffer = PixelBuffer::new(10, 20);

    assert_eq!(buffer.pixels().len(), 200);
    assert!(buffer.pixels().iter().all(|&p| p == Color::black()));
}

#[test]
fn rows_are_row_major() {
    let mut buffer = PixelBuffer::new(3, 2);
    buffer.write_pixel(0, 1, Color::white());

    assert_eq!(buffer.pixels()[3], Color::white());
}

#[test]
fn plain_ppm_header_and_pixels() {
    let mut buffer = PixelBuffer::new(2, 1);
    buffer.write_pixel(1, 0, Color::rgb(255, 127, 0));

    let mut out = Vec::new();
    buffer.write_ppm(&mut out, PpmFormat::Plain).unwrap();

    assert_eq!(String::from_utf8(out).unwrap(), "P3\n2 1\n255\n0 0 0 255 127 0\n");
}

#[test]
fn plain_ppm_lines_stay_short() {
    let mut buffer = PixelBuffer::new(10, 2);
    for y in 0..2 {
        for x in 0..10 {
            buffer.write_pixel(x, y, Color::rgb(255, 204, 153));
        }
    }

    let mut out = Vec::new();
    buffer.write_ppm(&mut out, PpmFormat::Plain).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.lines().all(|l| l.len() <= 70));
    assert!(text.ends_with('\n'));

    let channels = text.lines().skip(3)
        .flat_map(|l| l.split_whitespace())
        .count();
    assert_eq!(channels, 60);
}

#[test]
fn raw_ppm_bytes() {
    let mut buffer = PixelBuffer::new(1, 2);
    buffer.write_pixel(0, 1, Color::rgb(1, 2, 3));

    let mut out = Vec::new();
    buffer.write_ppm(&mut out, PpmFormat::Raw).unwrap();

    let mut expected = b"P6\n1 2\n255\n".to_vec();
    expected.extend_from_slice(&[0, 0, 0, 1, 2, 3]);
    assert_eq!(out, expected);
}

use std::ops::{ Add, Mul };

use serde::Serialize;

use crate::feq;

/// An 8-bit-per-channel RGB color.
///
/// Scene colors are written as three channels in `[0, 1]` and stored as bytes.
/// The conversion truncates: a channel `c` becomes `floor(c * 255)`, so `1.0`
/// maps to `255` and `0.5` maps to `127`.
///
/// # Examples
///
/// ```
/// # use raycast::color::Color;
/// let c = Color::from_unit(1.0, 0.5, 0.0);
/// assert_eq!(c, Color::rgb(255, 127, 0));
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Creates a color from raw byte channels.
    pub fn rgb(r: u8, g: u8, b: u8) -> Color {
        Color { r, g, b }
    }

    /// Creates a color from unit-interval channels.
    ///
    /// Callers are expected to pass values already validated to `[0, 1]`.
    /// Anything outside saturates at the byte bounds.
    pub fn from_unit(r: f64, g: f64, b: f64) -> Color {
        Color {
            r: channel_to_byte(r),
            g: channel_to_byte(g),
            b: channel_to_byte(b),
        }
    }

    /// The color black, also the background of every rendered image.
    pub fn black() -> Color {
        Color { r: 0, g: 0, b: 0 }
    }

    pub fn white() -> Color {
        Color { r: 255, g: 255, b: 255 }
    }

    pub fn to_array(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

/// Maps a unit-interval channel to a byte by truncating `value * 255`.
pub fn channel_to_byte(value: f64) -> u8 {
    (value * 255.0) as u8
}

/// A floating point color used while evaluating lighting.
///
/// Channels are unbounded during accumulation; `to_color` clamps them back
/// to `[0, 1]` before truncating to bytes.
#[derive(Copy, Clone, Debug, Default, PartialOrd)]
pub struct LinearColor {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl PartialEq for LinearColor {
    fn eq(&self, other: &LinearColor) -> bool {
        feq(self.r, other.r) &&
            feq(self.g, other.g) &&
            feq(self.b, other.b)
    }
}

impl From<Color> for LinearColor {
    fn from(c: Color) -> LinearColor {
        LinearColor {
            r: c.r as f64 / 255.0,
            g: c.g as f64 / 255.0,
            b: c.b as f64 / 255.0,
        }
    }
}

impl LinearColor {
    pub fn rgb(r: f64, g: f64, b: f64) -> LinearColor {
        LinearColor { r, g, b }
    }

    pub fn black() -> LinearColor {
        Default::default()
    }

    /// Computes the Hadamard (component-wise) product of two colors.
    pub fn hadamard(c1: &LinearColor, c2: &LinearColor) -> LinearColor {
        LinearColor {
            r: c1.r * c2.r,
            g: c1.g * c2.g,
            b: c1.b * c2.b,
        }
    }

    /// Clamps each channel to `[0, 1]` and converts to bytes.
    pub fn to_color(&self) -> Color {
        Color::from_unit(
            self.r.clamp(0.0, 1.0),
            self.g.clamp(0.0, 1.0),
            self.b.clamp(0.0, 1.0),
        )
    }
}

impl Add<LinearColor> for LinearColor {
    type Output = LinearColor;

    fn add(self, other: LinearColor) -> Self::Output {
        LinearColor {
            r: self.r + other.r,
            g: self.g + other.g,
            b: self.b + other.b,
        }
    }
}

impl Mul<f64> for LinearColor {
    type Output = LinearColor;

    fn mul(self, other: f64) -> Self::Output {
        LinearColor {
            r: self.r * other,
            g: self.g * other,
            b: self.b * other,
        }
    }
}

/// For colors `c1` and `c2`, `c1 * c2` is shorthand for
/// `LinearColor::hadamard(&c1, &c2)`.
impl Mul<LinearColor> for LinearColor {
    type Output = LinearColor;

    fn mul(self, other: LinearColor) -> Self::Output {
        LinearColor::hadamard(&self, &other)
    }
}

#[test]
fn unit_channel_truncates() {
    assert_eq!(channel_to_byte(1.0), 255);
    assert_eq!(channel_to_byte(0.0), 0);
    assert_eq!(channel_to_byte(0.5), 127);
    assert_eq!(channel_to_byte(0.999), 254);
    assert_eq!(channel_to_byte(0.1), 25);
}

#[test]
fn unit_channel_matches_floor() {
    for i in 0..=1000 {
        let c = i as f64 / 1000.0;
        assert_eq!(channel_to_byte(c) as f64, (c * 255.0).floor());
    }
}

#[test]
fn linear_from_bytes() {
    let c = LinearColor::from(Color::rgb(255, 0, 51));

    assert_eq!(c, LinearColor::rgb(1.0, 0.0, 0.2));
}

#[test]
fn linear_to_color_clamps() {
    let c = LinearColor::rgb(1.7, -0.3, 0.5);

    assert_eq!(c.to_color(), Color::rgb(255, 0, 127));
}

#[test]
fn multiply_linear_colors() {
    let c1 = LinearColor::rgb(1.0, 0.2, 0.4);
    let c2 = LinearColor::rgb(0.9, 1.0, 0.1);

    assert_eq!(c1 * c2, LinearColor::rgb(0.9, 0.2, 0.04));
    assert_eq!(c1 * 2.0, LinearColor::rgb(2.0, 0.4, 0.8));
    assert_eq!(c1 + c2, LinearColor::rgb(1.9, 1.2, 0.5));
}

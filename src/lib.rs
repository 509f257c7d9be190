pub mod consts;

pub mod vector;
pub mod ray;
pub mod color;

pub mod scene;
pub mod reader;

pub mod intersect;
pub mod light;
pub mod camera;
pub mod parallel;

pub mod canvas;
pub mod error;

use consts::FEQ_EPSILON;

/// Compares two floats within `FEQ_EPSILON`.
pub fn feq(left: f64, right: f64) -> bool {
    (left - right).abs() < FEQ_EPSILON
}

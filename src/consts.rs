// Runtime parameters
pub const OUT_FILE: &'static str = "./out.ppm";

// Floating point comparisons
pub const FEQ_EPSILON: f64 = 0.0001;

// Camera space
pub const VIEW_PLANE_DEPTH: f64 = 1.0;

// Scene reader limits
pub const MAX_STRING_LEN: usize = 64 * 1024;

// Lit shading
pub const SHININESS: f64 = 20.0;

// Plain PPM line limit
pub const PPM_MAX_LINE: usize = 70;

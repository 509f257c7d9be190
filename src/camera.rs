use serde::Serialize;
use tracing::debug;

use crate::canvas::PixelBuffer;
use crate::color::Color;
use crate::consts::VIEW_PLANE_DEPTH;
use crate::intersect::shoot;
use crate::light::Shading;
use crate::ray::Ray;
use crate::scene::Scene;
use crate::vector::Vector3;

/// The extent of the view plane.
///
/// The eye sits at the origin looking down +z, and the view plane is centered
/// on the z axis at a fixed depth in front of it. `width` and `height` are in
/// scene units and never negative. They are unrelated to the pixel resolution
/// of the rendered image, which is chosen at render time.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize)]
pub struct Camera {
    pub width: f64,
    pub height: f64,
}

impl Camera {
    pub fn new(width: f64, height: f64) -> Camera {
        Camera { width, height }
    }

    /// The primary ray through the center of pixel (`px`, `py`) of an image
    /// `hsize` pixels wide and `vsize` pixels tall.
    ///
    /// Row 0 is the top of the image, so rows map to decreasing y.
    ///
    /// # Examples
    ///
    /// ```
    /// # use raycast::camera::Camera;
    /// # use raycast::vector::Vector3;
    /// let camera = Camera::new(2.0, 2.0);
    /// let ray = camera.ray_for_pixel(1, 1, 3, 3);
    /// assert_eq!(ray.origin, Vector3::zero());
    /// assert_eq!(ray.dir, Vector3::new(0.0, 0.0, 1.0));
    /// ```
    pub fn ray_for_pixel(&self, px: usize, py: usize, hsize: usize, vsize: usize)
        -> Ray {
        let pixel_width = self.width / hsize as f64;
        let pixel_height = self.height / vsize as f64;

        // Offsets from the left and top edges of the view plane
        let x = -(self.width / 2.0) + pixel_width * (px as f64 + 0.5);
        let y = -(-(self.height / 2.0) + pixel_height * (py as f64 + 0.5));

        Ray::through(Vector3::zero(), Vector3::new(x, y, VIEW_PLANE_DEPTH))
    }
}

/// The color seen along `ray`, or `None` if it hits nothing.
pub fn color_at(scene: &Scene, ray: &Ray, shading: Shading) -> Option<Color> {
    shoot(ray, &scene.objects)
        .map(|hit| shading.shade(&hit, ray, &scene.lights))
}

/// Renders `scene` into a `hsize` by `vsize` buffer, one primary ray per
/// pixel, in row-major order. Pixels whose ray hits nothing stay black.
pub fn render(scene: &Scene, hsize: usize, vsize: usize, shading: Shading)
    -> PixelBuffer {
    debug!(hsize, vsize, ?shading, "rendering sequentially");

    let mut image = PixelBuffer::new(hsize, vsize);

    for y in 0..vsize {
        for x in 0..hsize {
            let ray = scene.camera.ray_for_pixel(x, y, hsize, vsize);
            if let Some(color) = color_at(scene, &ray, shading) {
                image.write_pixel(x, y, color);
            }
        }
    }

    image
}

#[cfg(test)]
use crate::scene::{ SceneObject, Sphere, Plane, Light };

#[cfg(test)]
fn sphere_scene() -> Scene {
    Scene {
        camera: Camera::new(2.0, 2.0),
        objects: vec![
            SceneObject::Sphere(Sphere {
                position: Vector3::new(0.0, 0.0, 5.0),
                radius: 1.0,
                diffuse_color: Color::rgb(255, 0, 0),
                specular_color: Color::white(),
            }),
            SceneObject::Plane(Plane {
                position: Vector3::new(0.0, -1.0, 0.0),
                normal: Vector3::new(0.0, 1.0, 0.0),
                diffuse_color: Color::rgb(0, 255, 0),
                specular_color: Color::black(),
            }),
        ],
        lights: vec![Light::point(Vector3::zero(), Color::white())],
    }
}

#[test]
fn ray_through_center() {
    let c = Camera::new(2.0, 2.0);
    let r = c.ray_for_pixel(1, 1, 3, 3);

    assert_eq!(r.origin, Vector3::zero());
    assert_eq!(r.dir, Vector3::new(0.0, 0.0, 1.0));
}

#[test]
fn ray_through_corner() {
    let c = Camera::new(2.0, 2.0);
    let r = c.ray_for_pixel(0, 0, 3, 3);

    // Top left pixel center is at (-2/3, 2/3) on the view plane.
    let len = 17.0f64.sqrt();
    assert_eq!(r.origin, Vector3::zero());
    assert_eq!(r.dir, Vector3::new(-2.0 / len, 2.0 / len, 3.0 / len));
}

#[test]
fn rows_run_top_to_bottom() {
    let c = Camera::new(4.0, 3.0);

    let top = c.ray_for_pixel(5, 0, 10, 10);
    let bottom = c.ray_for_pixel(5, 9, 10, 10);

    assert!(top.dir.y > 0.0);
    assert!(bottom.dir.y < 0.0);
    assert_eq!(top.dir.x, bottom.dir.x);
}

#[test]
fn degenerate_camera_looks_straight_ahead() {
    let c = Camera::new(0.0, 0.0);

    assert_eq!(c.ray_for_pixel(0, 0, 4, 4).dir, Vector3::new(0.0, 0.0, 1.0));
    assert_eq!(c.ray_for_pixel(3, 3, 4, 4).dir, Vector3::new(0.0, 0.0, 1.0));
}

#[test]
fn render_flat_scene() {
    let image = render(&sphere_scene(), 3, 3, Shading::Flat);

    // Sphere in the middle, floor below it, nothing above.
    assert_eq!(image.read_pixel(1, 1), Some(Color::rgb(255, 0, 0)));
    assert_eq!(image.read_pixel(1, 2), Some(Color::rgb(0, 255, 0)));
    assert_eq!(image.read_pixel(1, 0), Some(Color::black()));
    assert_eq!(image.read_pixel(0, 0), Some(Color::black()));
}

#[test]
fn render_lit_scene() {
    let image = render(&sphere_scene(), 3, 3, Shading::Lit);

    // Light at the eye: full diffuse plus full white specular.
    assert_eq!(image.read_pixel(1, 1), Some(Color::white()));
    assert_eq!(image.read_pixel(1, 0), Some(Color::black()));
}

#[test]
fn render_empty_scene_is_black() {
    let scene = Scene { camera: Camera::new(2.0, 2.0), ..Default::default() };
    let image = render(&scene, 4, 3, Shading::Flat);

    assert_eq!(image.width, 4);
    assert_eq!(image.height, 3);
    assert!(image.pixels().iter().all(|&p| p == Color::black()));
}

#[test]
fn render_zero_sized_image() {
    let image = render(&sphere_scene(), 0, 0, Shading::Flat);

    assert!(image.pixels().is_empty());
}

#[test]
fn resolution_doubling_agrees() {
    let scene = Scene {
        camera: Camera::new(2.0, 2.0),
        objects: vec![SceneObject::Sphere(Sphere {
            position: Vector3::new(0.3, -0.2, 5.0),
            radius: 2.0,
            diffuse_color: Color::white(),
            specular_color: Color::black(),
        })],
        lights: Vec::new(),
    };

    let low = render(&scene, 16, 16, Shading::Flat);
    let high = render(&scene, 32, 32, Shading::Flat);
    let hit = |image: &PixelBuffer, x: usize, y: usize| {
        image.read_pixel(x, y) == Some(Color::white())
    };

    for y in 0..16usize {
        for x in 0..16usize {
            // The low resolution sample sits between the centers of a 2x2
            // block of high resolution pixels; allow one pixel of slack.
            let xs = (2 * x).saturating_sub(1)..=(2 * x + 2).min(31);
            let agrees = xs.into_iter().any(|hx| {
                let ys = (2 * y).saturating_sub(1)..=(2 * y + 2).min(31);
                ys.into_iter().any(|hy| hit(&high, hx, hy) == hit(&low, x, y))
            });

            assert!(agrees, "pixel ({}, {}) disagrees", x, y);
        }
    }

    assert!(hit(&low, 8, 8));
    assert!(!hit(&low, 0, 0));
}

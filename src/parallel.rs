use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use tracing::{ debug, info };

use crate::camera::color_at;
use crate::canvas::PixelBuffer;
use crate::error::RenderError;
use crate::light::Shading;
use crate::scene::Scene;

/// Renders `scene` with rows spread over the current rayon pool.
///
/// The scene is shared read-only between workers and every row of the buffer
/// is written by exactly one of them, so the result is identical to
/// `camera::render`.
pub fn parallel_render(scene: &Scene, hsize: usize, vsize: usize,
    shading: Shading) -> PixelBuffer {
    let mut image = PixelBuffer::new(hsize, vsize);

    // Nothing to split, and rows of width zero cannot be chunked
    if hsize == 0 || vsize == 0 {
        return image;
    }

    debug!(hsize, vsize, ?shading, "rendering in parallel");

    image.pixels_mut()
        .par_chunks_mut(hsize)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, pixel) in row.iter_mut().enumerate() {
                let ray = scene.camera.ray_for_pixel(x, y, hsize, vsize);
                if let Some(color) = color_at(scene, &ray, shading) {
                    *pixel = color;
                }
            }
        });

    image
}

/// Renders on a dedicated pool of `threads` workers; zero means one worker
/// per logical core. Both image dimensions must be at least one pixel.
pub fn render_with_threads(scene: &Scene, hsize: usize, vsize: usize,
    shading: Shading, threads: usize) -> Result<PixelBuffer, RenderError> {
    if hsize == 0 || vsize == 0 {
        return Err(RenderError::InvalidDimensions { width: hsize, height: vsize });
    }

    let pool = ThreadPoolBuilder::new().num_threads(threads).build()?;

    info!("Rendering using {} threads...", pool.current_num_threads());
    let image = pool.install(|| parallel_render(scene, hsize, vsize, shading));
    info!("...done.");

    Ok(image)
}

#[cfg(test)]
use crate::camera::{ render, Camera };
#[cfg(test)]
use crate::color::Color;
#[cfg(test)]
use crate::scene::{ SceneObject, Sphere, Plane, Light };
#[cfg(test)]
use crate::vector::Vector3;

#[cfg(test)]
fn busy_scene() -> Scene {
    Scene {
        camera: Camera::new(4.0, 3.0),
        objects: vec![
            SceneObject::Plane(Plane {
                position: Vector3::new(0.0, -1.0, 0.0),
                normal: Vector3::new(0.0, 1.0, 0.0),
                diffuse_color: Color::rgb(128, 128, 128),
                specular_color: Color::black(),
            }),
            SceneObject::Sphere(Sphere {
                position: Vector3::new(-1.0, 0.0, 6.0),
                radius: 1.5,
                diffuse_color: Color::rgb(255, 0, 0),
                specular_color: Color::white(),
            }),
            SceneObject::Sphere(Sphere {
                position: Vector3::new(1.5, 0.5, 8.0),
                radius: 2.0,
                diffuse_color: Color::rgb(0, 0, 255),
                specular_color: Color::rgb(255, 255, 0),
            }),
        ],
        lights: vec![
            Light::point(Vector3::new(-5.0, 5.0, 0.0), Color::white()),
            Light::point(Vector3::new(5.0, 2.0, 3.0), Color::rgb(128, 64, 0)),
        ],
    }
}

#[test]
fn parallel_matches_sequential() {
    let scene = busy_scene();

    for &shading in &[Shading::Flat, Shading::Lit] {
        let expected = render(&scene, 37, 23, shading);
        let actual = parallel_render(&scene, 37, 23, shading);

        assert_eq!(actual, expected);
    }
}

#[test]
fn thread_count_does_not_change_image() {
    let scene = busy_scene();
    let expected = render(&scene, 20, 15, Shading::Lit);

    for &threads in &[1, 3, 0] {
        let actual = render_with_threads(&scene, 20, 15, Shading::Lit, threads)
            .unwrap();
        assert_eq!(actual, expected);
    }
}

#[test]
fn pool_rejects_empty_image() {
    let scene = busy_scene();

    match render_with_threads(&scene, 0, 10, Shading::Flat, 2) {
        Err(RenderError::InvalidDimensions { width: 0, height: 10 }) => (),
        other => panic!("unexpected result: {:?}", other.map(|i| i.width)),
    }
}

#[test]
fn parallel_zero_sized_image() {
    let scene = busy_scene();

    assert!(parallel_render(&scene, 0, 5, Shading::Flat).pixels().is_empty());
    assert!(parallel_render(&scene, 5, 0, Shading::Flat).pixels().is_empty());
}

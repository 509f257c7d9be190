use crate::color::{ Color, LinearColor };
use crate::consts::SHININESS;
use crate::intersect::Hit;
use crate::ray::Ray;
use crate::scene::{ Light, SceneObject };
use crate::vector::Vector3;

/// How a hit is turned into a pixel color.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Shading {
    /// The object's diffuse color, unlit.
    Flat,

    /// Lambertian diffuse plus a Phong specular term for every light.
    Lit,
}

impl Default for Shading {
    fn default() -> Shading {
        Shading::Flat
    }
}

impl Shading {
    /// Computes the color seen along `ray` at `hit`.
    pub fn shade(&self, hit: &Hit, ray: &Ray, lights: &[Light]) -> Color {
        match self {
            Shading::Flat => shade(hit.object),
            Shading::Lit => lighting(hit, ray, lights).to_color(),
        }
    }
}

/// Flat shading: the color of the object itself.
pub fn shade(obj: &SceneObject) -> Color {
    obj.diffuse_color()
}

/// The unit surface normal of `obj` at `point`.
pub fn normal_at(obj: &SceneObject, point: Vector3) -> Vector3 {
    match obj {
        SceneObject::Sphere(s) => (point - s.position).normalize(),
        SceneObject::Plane(p) => p.normal.normalize(),
    }
}

/// Sums the diffuse and specular contributions of every light at a hit.
///
/// The normal is flipped to face the incoming ray, so planes are lit from
/// whichever side they are seen. Lights are never occluded; there are no
/// shadow rays. Attenuation is not applied.
pub fn lighting(hit: &Hit, ray: &Ray, lights: &[Light]) -> LinearColor {
    let point = hit.point(ray);
    let eyev = -ray.dir;

    let mut normalv = normal_at(hit.object, point);
    if normalv.dot(&ray.dir) > 0.0 {
        normalv = -normalv;
    }

    let diffuse_color = LinearColor::from(hit.object.diffuse_color());
    let specular_color = LinearColor::from(hit.object.specular_color());

    let mut color = LinearColor::black();
    for light in lights.iter() {
        let intensity = LinearColor::from(light.color);
        let lightv = (light.position - point).normalize();

        // Light behind the surface contributes nothing
        let light_dot_normal = lightv.dot(&normalv);
        if light_dot_normal <= 0.0 {
            continue;
        }

        color = color + diffuse_color * intensity * light_dot_normal;

        let reflectv = (-lightv).reflect(&normalv);
        let reflect_dot_eye = reflectv.dot(&eyev);
        if reflect_dot_eye > 0.0 {
            let factor = reflect_dot_eye.powf(SHININESS);
            color = color + specular_color * intensity * factor;
        }
    }

    color
}

#[cfg(test)]
use crate::scene::{ Sphere, Plane };

#[cfg(test)]
fn red_sphere() -> SceneObject {
    SceneObject::Sphere(Sphere {
        position: Vector3::new(0.0, 0.0, 5.0),
        radius: 1.0,
        diffuse_color: Color::rgb(255, 0, 0),
        specular_color: Color::rgb(0, 0, 255),
    })
}

#[cfg(test)]
fn forward() -> Ray {
    Ray::new(Vector3::zero(), Vector3::new(0.0, 0.0, 1.0))
}

#[test]
fn flat_is_diffuse_color() {
    let obj = red_sphere();
    let hit = Hit { t: 4.0, object: &obj };
    let lights = [Light::point(Vector3::zero(), Color::white())];

    assert_eq!(shade(&obj), Color::rgb(255, 0, 0));
    assert_eq!(Shading::Flat.shade(&hit, &forward(), &lights), Color::rgb(255, 0, 0));
    assert_eq!(Shading::Flat.shade(&hit, &forward(), &[]), Color::rgb(255, 0, 0));
}

#[test]
fn sphere_normals() {
    let obj = red_sphere();

    assert_eq!(normal_at(&obj, Vector3::new(0.0, 0.0, 4.0)),
        Vector3::new(0.0, 0.0, -1.0));
    assert_eq!(normal_at(&obj, Vector3::new(1.0, 0.0, 5.0)),
        Vector3::new(1.0, 0.0, 0.0));
}

#[test]
fn light_behind_eye() {
    let obj = red_sphere();
    let hit = Hit { t: 4.0, object: &obj };
    let lights = [Light::point(Vector3::zero(), Color::white())];

    // Full diffuse and full specular.
    assert_eq!(Shading::Lit.shade(&hit, &forward(), &lights), Color::rgb(255, 0, 255));
}

#[test]
fn light_behind_surface() {
    let obj = red_sphere();
    let hit = Hit { t: 4.0, object: &obj };
    let lights = [Light::point(Vector3::new(0.0, 0.0, 10.0), Color::white())];

    assert_eq!(Shading::Lit.shade(&hit, &forward(), &lights), Color::black());
    assert_eq!(Shading::Lit.shade(&hit, &forward(), &[]), Color::black());
}

#[test]
fn light_at_an_angle() {
    let obj = red_sphere();
    let hit = Hit { t: 4.0, object: &obj };
    let lights = [Light::point(Vector3::new(0.0, 4.0, 0.0), Color::white())];

    // 45 degrees off the normal: diffuse scaled by cos(45), specular by
    // cos(45)^20.
    let c = lighting(&hit, &forward(), &lights);
    assert_eq!(c, LinearColor::rgb(2.0f64.sqrt() / 2.0, 0.0, 2.0f64.powi(-10)));
}

#[test]
fn lights_accumulate_and_clamp() {
    let obj = red_sphere();
    let hit = Hit { t: 4.0, object: &obj };
    let light = Light::point(Vector3::zero(), Color::white());
    let lights = [light, light];

    let c = lighting(&hit, &forward(), &lights);
    assert_eq!(c, LinearColor::rgb(2.0, 0.0, 2.0));
    assert_eq!(c.to_color(), Color::rgb(255, 0, 255));
}

#[test]
fn plane_lit_from_viewing_side() {
    // Normal points away from the eye; it is flipped for shading.
    let obj = SceneObject::Plane(Plane {
        position: Vector3::new(0.0, 0.0, 5.0),
        normal: Vector3::new(0.0, 0.0, 3.0),
        diffuse_color: Color::rgb(0, 255, 0),
        specular_color: Color::black(),
    });
    let hit = Hit { t: 5.0, object: &obj };
    let lights = [Light::point(Vector3::zero(), Color::white())];

    assert_eq!(Shading::Lit.shade(&hit, &forward(), &lights), Color::rgb(0, 255, 0));
}

use crate::ray::Ray;
use crate::scene::{ SceneObject, Sphere, Plane };
use crate::vector::Vector3;

/// Returned by the intersection routines when there is no forward hit.
pub const MISS: f64 = -1.0;

/// The visible object along a ray.
///
/// `t` is the distance along the ray's (unit) direction at which `object` is
/// hit; it is always finite and positive.
#[derive(Copy, Clone, Debug)]
pub struct Hit<'a> {
    pub t: f64,
    pub object: &'a SceneObject,
}

/// Two hits are equal if they are at the same distance and refer to the
/// same object in memory.
impl<'a> PartialEq for Hit<'a> {
    fn eq(&self, other: &Hit<'a>) -> bool {
        self.t == other.t && std::ptr::eq(self.object, other.object)
    }
}

impl<'a> Hit<'a> {
    /// The point where the ray meets the object.
    pub fn point(&self, ray: &Ray) -> Vector3 {
        ray.position(self.t)
    }
}

/// Intersects a ray with a scene object, returning the hit distance or a
/// negative value for a miss.
pub fn intersect(ray: &Ray, obj: &SceneObject) -> f64 {
    match obj {
        SceneObject::Sphere(s) => intersect_sphere(ray, s),
        SceneObject::Plane(p) => intersect_plane(ray, p),
    }
}

/// Intersects a ray with a sphere.
///
/// Only the near intersection is reported. A ray starting inside the sphere
/// gets a negative distance, which callers treat as a miss.
pub fn intersect_sphere(ray: &Ray, sphere: &Sphere) -> f64 {
    // Closest approach of the ray to the center, and its distance from it.
    let t_close = ray.dir.dot(&(sphere.position - ray.origin));
    let closest = ray.position(t_close);
    let d = (closest - sphere.position).magnitude();

    if d > sphere.radius {
        MISS
    } else if d < sphere.radius {
        let a = (sphere.radius.powi(2) - d.powi(2)).sqrt();
        t_close - a
    } else {
        t_close
    }
}

/// Intersects a ray with a plane.
///
/// A ray parallel to the plane never hits it, and neither does one pointing
/// away from it. Comparisons are exact.
pub fn intersect_plane(ray: &Ray, plane: &Plane) -> f64 {
    let denominator = plane.normal.dot(&ray.dir);
    if denominator == 0.0 {
        return MISS;
    }

    let t = -plane.normal.dot(&(ray.origin - plane.position)) / denominator;
    if t > 0.0 {
        t
    } else {
        MISS
    }
}

/// An infinite cylinder parallel to the y axis.
///
/// Scene descriptions cannot declare cylinders; the type only exists so the
/// intersection formula can be exercised on its own.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Cylinder {
    /// Any point on the axis; only `x` and `z` matter.
    pub position: Vector3,
    pub radius: f64,
}

/// Intersects a ray with an infinite cylinder, preferring the nearer
/// positive root and falling back to the farther one.
pub fn intersect_cylinder(ray: &Ray, cylinder: &Cylinder) -> f64 {
    let ox = ray.origin.x - cylinder.position.x;
    let oz = ray.origin.z - cylinder.position.z;

    let a = ray.dir.x.powi(2) + ray.dir.z.powi(2);
    let b = 2.0 * (ox * ray.dir.x + oz * ray.dir.z);
    let c = ox.powi(2) + oz.powi(2) - cylinder.radius.powi(2);

    // Parallel to the axis: either always inside or never touching.
    if a == 0.0 {
        return MISS;
    }

    let discriminant = b.powi(2) - 4.0 * a * c;
    if discriminant < 0.0 {
        return MISS;
    }

    let root = discriminant.sqrt();

    let t0 = (-b - root) / (2.0 * a);
    if t0 > 0.0 {
        return t0;
    }

    let t1 = (-b + root) / (2.0 * a);
    if t1 > 0.0 {
        return t1;
    }

    MISS
}

/// Finds the nearest object hit by `ray`.
///
/// Every object is tested. Only finite, strictly positive distances count,
/// and an object only replaces the current best if it is strictly closer, so
/// of two objects at the same distance the first one declared wins.
pub fn shoot<'a>(ray: &Ray, objects: &'a [SceneObject]) -> Option<Hit<'a>> {
    let mut closest = std::f64::INFINITY;
    let mut hit = None;

    for obj in objects.iter() {
        let t = intersect(ray, obj);
        if t > 0.0 && t < closest {
            closest = t;
            hit = Some(Hit { t, object: obj });
        }
    }

    hit
}

/* Tests */

#[cfg(test)]
use crate::color::Color;

#[cfg(test)]
fn sphere(x: f64, y: f64, z: f64, radius: f64) -> Sphere {
    Sphere {
        position: Vector3::new(x, y, z),
        radius,
        diffuse_color: Color::white(),
        specular_color: Color::black(),
    }
}

#[cfg(test)]
fn plane(position: Vector3, normal: Vector3) -> Plane {
    Plane {
        position,
        normal,
        diffuse_color: Color::white(),
        specular_color: Color::black(),
    }
}

#[cfg(test)]
fn forward() -> Ray {
    Ray::new(Vector3::zero(), Vector3::new(0.0, 0.0, 1.0))
}

#[test]
fn sphere_hit_is_near_side() {
    for &r in &[0.5, 1.0, 2.0, 4.5] {
        let s = sphere(0.0, 0.0, 5.0, r);
        assert_eq!(intersect_sphere(&forward(), &s), 5.0 - r);
    }
}

#[test]
fn zero_radius_sphere_hit_at_center() {
    let s = sphere(0.0, 0.0, 5.0, 0.0);

    assert_eq!(intersect_sphere(&forward(), &s), 5.0);
}

#[test]
fn sphere_tangent() {
    let r = Ray::new(Vector3::new(0.0, 1.0, 0.0), Vector3::new(0.0, 0.0, 1.0));
    let s = sphere(0.0, 0.0, 5.0, 1.0);

    assert_eq!(intersect_sphere(&r, &s), 5.0);
}

#[test]
fn sphere_miss() {
    let r = Ray::new(Vector3::new(0.0, 2.0, 0.0), Vector3::new(0.0, 0.0, 1.0));
    let s = sphere(0.0, 0.0, 5.0, 1.0);

    assert_eq!(intersect_sphere(&r, &s), MISS);
}

#[test]
fn sphere_behind_or_around_ray() {
    let behind = sphere(0.0, 0.0, -5.0, 1.0);
    assert!(intersect_sphere(&forward(), &behind) < 0.0);

    let around = sphere(0.0, 0.0, 0.0, 1.0);
    assert!(intersect_sphere(&forward(), &around) < 0.0);
}

#[test]
fn plane_in_front() {
    let p = plane(Vector3::new(0.0, 0.0, 5.0), Vector3::new(0.0, 0.0, -1.0));

    assert_eq!(intersect_plane(&forward(), &p), 5.0);
}

#[test]
fn plane_normal_not_renormalized() {
    // Doubling the normal scales numerator and denominator alike.
    let p = plane(Vector3::new(0.0, 0.0, 5.0), Vector3::new(0.0, 0.0, -2.0));

    assert_eq!(intersect_plane(&forward(), &p), 5.0);
}

#[test]
fn plane_behind() {
    let p = plane(Vector3::new(0.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));

    assert_eq!(intersect_plane(&forward(), &p), MISS);
}

#[test]
fn plane_parallel_always_misses() {
    let p = plane(Vector3::new(0.0, -1.0, 0.0), Vector3::new(0.0, 1.0, 0.0));

    for origin in &[
        Vector3::zero(),
        Vector3::new(0.0, -1.0, 0.0),
        Vector3::new(3.0, -7.0, 2.0),
    ] {
        let r = Ray::new(*origin, Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(intersect_plane(&r, &p), MISS);
    }
}

#[test]
fn cylinder_near_and_far_roots() {
    let c = Cylinder { position: Vector3::new(0.0, 0.0, 5.0), radius: 1.0 };
    assert_eq!(intersect_cylinder(&forward(), &c), 4.0);

    // From inside the cylinder only the far root is ahead.
    let inside = Ray::new(Vector3::new(0.0, 0.0, 5.0), Vector3::new(0.0, 0.0, 1.0));
    assert_eq!(intersect_cylinder(&inside, &c), 1.0);
}

#[test]
fn cylinder_misses() {
    let c = Cylinder { position: Vector3::new(0.0, 0.0, 5.0), radius: 1.0 };

    let wide = Ray::new(Vector3::new(2.0, 0.0, 0.0), Vector3::new(0.0, 0.0, 1.0));
    assert_eq!(intersect_cylinder(&wide, &c), MISS);

    let along_axis = Ray::new(Vector3::new(0.0, 0.0, 5.0), Vector3::new(0.0, 1.0, 0.0));
    assert_eq!(intersect_cylinder(&along_axis, &c), MISS);

    let away = Ray::new(Vector3::zero(), Vector3::new(0.0, 0.0, -1.0));
    assert_eq!(intersect_cylinder(&away, &c), MISS);
}

#[test]
fn shoot_finds_nearest() {
    let objects = vec![
        SceneObject::Sphere(sphere(0.0, 0.0, 10.0, 1.0)),
        SceneObject::Plane(plane(Vector3::new(0.0, 0.0, 20.0),
            Vector3::new(0.0, 0.0, -1.0))),
        SceneObject::Sphere(sphere(0.0, 0.0, 5.0, 1.0)),
    ];

    let hit = shoot(&forward(), &objects).unwrap();

    assert_eq!(hit.t, 4.0);
    assert!(std::ptr::eq(hit.object, &objects[2]));
    assert_eq!(hit.point(&forward()), Vector3::new(0.0, 0.0, 4.0));
}

#[test]
fn shoot_ties_keep_first() {
    let objects = vec![
        SceneObject::Sphere(sphere(0.0, 0.0, 5.0, 1.0)),
        SceneObject::Sphere(sphere(0.0, 0.0, 5.0, 1.0)),
    ];

    let hit = shoot(&forward(), &objects).unwrap();

    assert_eq!(hit, Hit { t: 4.0, object: &objects[0] });
}

#[test]
fn shoot_ignores_objects_behind() {
    let objects = vec![
        SceneObject::Sphere(sphere(0.0, 0.0, -5.0, 1.0)),
        SceneObject::Plane(plane(Vector3::new(0.0, 0.0, -1.0),
            Vector3::new(0.0, 0.0, 1.0))),
    ];

    assert_eq!(shoot(&forward(), &objects), None);
    assert_eq!(shoot(&forward(), &[]), None);
}

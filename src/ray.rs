use crate::vector::Vector3;

/// A ray cast from `origin` along `dir`.
///
/// Intersection routines assume `dir` has unit length; `Ray::new` does not
/// enforce this, `Ray::through` does.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Ray {
    pub origin: Vector3,
    pub dir: Vector3,
}

impl Ray {
    pub fn new(origin: Vector3, dir: Vector3) -> Ray {
        Ray { origin, dir }
    }

    /// Creates a ray from `origin` towards `target`, with a normalized
    /// direction.
    pub fn through(origin: Vector3, target: Vector3) -> Ray {
        Ray { origin, dir: (target - origin).normalize() }
    }

    pub fn position(&self, t: f64) -> Vector3 {
        self.origin + (t * self.dir)
    }
}

#[test]
fn ray_position() {
    let r = Ray::new(
                Vector3::new(2.0, 3.0, 4.0),
                Vector3::new(1.0, 0.0, 0.0)
            );

    assert_eq!(r.position(0.0), Vector3::new(2.0, 3.0, 4.0));
    assert_eq!(r.position(1.0), Vector3::new(3.0, 3.0, 4.0));
    assert_eq!(r.position(-1.0), Vector3::new(1.0, 3.0, 4.0));
    assert_eq!(r.position(2.5), Vector3::new(4.5, 3.0, 4.0));
}

#[test]
fn ray_through_normalizes() {
    let r = Ray::through(Vector3::zero(), Vector3::new(0.0, 0.0, 5.0));

    assert_eq!(r.origin, Vector3::zero());
    assert_eq!(r.dir, Vector3::new(0.0, 0.0, 1.0));
}

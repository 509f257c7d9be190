use serde::Serialize;

use crate::camera::Camera;
use crate::color::Color;
use crate::vector::Vector3;

/// A fully validated scene.
///
/// Built by the scene reader and handed, read-only, to the raycaster.
/// `objects` and `lights` keep the order in which they were declared.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Scene {
    pub camera: Camera,
    pub objects: Vec<SceneObject>,
    pub lights: Vec<Light>,
}

impl Scene {
    /// The number of non-empty entities read into the scene, excluding the
    /// camera.
    pub fn entity_count(&self) -> usize {
        self.objects.len() + self.lights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entity_count() == 0
    }
}

/// A renderable primitive.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SceneObject {
    Sphere(Sphere),
    Plane(Plane),
}

impl SceneObject {
    pub fn diffuse_color(&self) -> Color {
        match self {
            SceneObject::Sphere(s) => s.diffuse_color,
            SceneObject::Plane(p) => p.diffuse_color,
        }
    }

    pub fn specular_color(&self) -> Color {
        match self {
            SceneObject::Sphere(s) => s.specular_color,
            SceneObject::Plane(p) => p.specular_color,
        }
    }

    /// The name used for this kind of object in scene descriptions.
    pub fn kind(&self) -> &'static str {
        match self {
            SceneObject::Sphere(_) => "sphere",
            SceneObject::Plane(_) => "plane",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct Sphere {
    pub position: Vector3,
    pub radius: f64,
    pub diffuse_color: Color,
    pub specular_color: Color,
}

/// An infinite plane through `position`.
///
/// `normal` is used exactly as supplied; it is not re-normalized.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct Plane {
    pub position: Vector3,
    pub normal: Vector3,
    pub diffuse_color: Color,
    pub specular_color: Color,
}

/// A light source.
///
/// `direction` and both attenuation triples are carried for spot lights and
/// distance falloff but no shading formula consumes them yet.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct Light {
    pub position: Vector3,
    pub direction: Option<Vector3>,
    pub color: Color,
    pub radial_attenuation: [f64; 3],
    pub angular_attenuation: [f64; 3],
}

impl Light {
    pub const DEFAULT_RADIAL_ATTENUATION: [f64; 3] = [1.0, 0.0, 0.0];
    pub const DEFAULT_ANGULAR_ATTENUATION: [f64; 3] = [0.0, 0.0, 0.0];

    /// Creates a point light with default attenuation and no direction.
    pub fn point(position: Vector3, color: Color) -> Light {
        Light {
            position,
            direction: None,
            color,
            radial_attenuation: Light::DEFAULT_RADIAL_ATTENUATION,
            angular_attenuation: Light::DEFAULT_ANGULAR_ATTENUATION,
        }
    }
}

#[test]
fn entity_count_includes_lights() {
    let mut scene = Scene::default();
    assert!(scene.is_empty());

    scene.objects.push(SceneObject::Plane(Plane {
        position: Vector3::zero(),
        normal: Vector3::new(0.0, 1.0, 0.0),
        diffuse_color: Color::white(),
        specular_color: Color::black(),
    }));
    scene.lights.push(Light::point(Vector3::zero(), Color::white()));

    assert_eq!(scene.entity_count(), 2);
}

#[test]
fn objects_serialize_tagged() {
    let sphere = SceneObject::Sphere(Sphere {
        position: Vector3::new(0.0, 0.0, 5.0),
        radius: 1.0,
        diffuse_color: Color::rgb(255, 0, 0),
        specular_color: Color::black(),
    });

    let json = serde_json::to_value(&sphere).unwrap();

    assert_eq!(json["type"], "sphere");
    assert_eq!(json["radius"], 1.0);
    assert_eq!(json["position"], serde_json::json!([0.0, 0.0, 5.0]));
    assert_eq!(json["diffuse_color"]["r"], 255);
}

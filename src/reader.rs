//! Streaming reader for scene descriptions.
//!
//! A scene description is a JSON-like array of objects, each tagged by a
//! leading `"type"` key:
//!
//! ```text
//! [
//!   { "type": "camera", "width": 2.0, "height": 2.0 },
//!   { "type": "sphere", "position": [0, 1, 5], "radius": 2,
//!     "diffuse_color": [1, 0, 0], "specular_color": [1, 1, 1] },
//!   { "type": "plane", "position": [0, -1, 0], "normal": [0, 1, 0],
//!     "diffuse_color": [0, 0, 1], "specular_color": [1, 1, 1] },
//!   { "type": "light", "position": [0, 5, 0], "color": [1, 1, 1] }
//! ]
//! ```
//!
//! The reader makes one pass over the input, one byte at a time, and rejects
//! anything outside this schema. Apart from an empty array and empty
//! objects, which are skipped with a warning, every problem aborts the read.

use std::fmt;
use std::io::{ self, BufReader, Bytes, Read };

use thiserror::Error;
use tracing::{ debug, warn };

use crate::camera::Camera;
use crate::color::Color;
use crate::consts::MAX_STRING_LEN;
use crate::scene::{ Scene, SceneObject, Sphere, Plane, Light };
use crate::vector::Vector3;

/// The broad category of a `ReadError`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorClass {
    /// The underlying stream failed.
    Io,

    /// The input ended while a token was still expected.
    PrematureEof,

    /// An expected delimiter, key or literal did not match.
    Syntax,

    /// A well-formed value broke a rule of the scene schema.
    Semantic,

    /// A token exceeded the reader's limits.
    Resource,
}

/// A fatal scene reading error. Every variant records the 1-based line on
/// which the reader stopped.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("Line {line}: Read error: {source}")]
    Io {
        line: usize,
        #[source]
        source: io::Error,
    },

    #[error("Line {line}: Premature end-of-file")]
    PrematureEof { line: usize },

    #[error("Line {line}: Expected '{expected}', found '{found}'")]
    UnexpectedToken { line: usize, expected: char, found: char },

    #[error("Line {line}: First key must be 'type', found '{key}'")]
    TypeNotFirst { line: usize, key: String },

    #[error("Line {line}: Unknown type '{name}'")]
    UnknownType { line: usize, name: String },

    #[error("Line {line}: Invalid number")]
    InvalidNumber { line: usize },

    #[error("Line {line}: Unknown token at end-of-file")]
    TrailingContent { line: usize },

    #[error("Line {line}: Key '{key}' not supported under '{kind}'")]
    UnsupportedKey { line: usize, kind: &'static str, key: String },

    #[error("Line {line}: '{key}' already defined")]
    DuplicateKey { line: usize, key: String },

    #[error("Line {line}: '{kind}' missing '{key}' property")]
    MissingKey { line: usize, kind: &'static str, key: &'static str },

    #[error("Line {line}: {what} cannot be negative")]
    Negative { line: usize, what: &'static str },

    #[error("Line {line}: Color must be between 0.0 and 1.0, found {value}")]
    ColorOutOfRange { line: usize, value: f64 },

    #[error("Line {line}: Number underflow")]
    Underflow { line: usize },

    #[error("Line {line}: Number overflow")]
    Overflow { line: usize },

    #[error("Line {line}: String longer than {limit} bytes")]
    StringTooLong { line: usize, limit: usize },
}

impl ReadError {
    /// The line on which the error was detected.
    pub fn line(&self) -> usize {
        use ReadError::*;
        match *self {
            Io { line, .. }
            | PrematureEof { line }
            | UnexpectedToken { line, .. }
            | TypeNotFirst { line, .. }
            | UnknownType { line, .. }
            | InvalidNumber { line }
            | TrailingContent { line }
            | UnsupportedKey { line, .. }
            | DuplicateKey { line, .. }
            | MissingKey { line, .. }
            | Negative { line, .. }
            | ColorOutOfRange { line, .. }
            | Underflow { line }
            | Overflow { line }
            | StringTooLong { line, .. } => line,
        }
    }

    pub fn class(&self) -> ErrorClass {
        use ReadError::*;
        match self {
            Io { .. } => ErrorClass::Io,
            PrematureEof { .. } => ErrorClass::PrematureEof,

            UnexpectedToken { .. }
            | TypeNotFirst { .. }
            | UnknownType { .. }
            | InvalidNumber { .. }
            | TrailingContent { .. } => ErrorClass::Syntax,

            UnsupportedKey { .. }
            | DuplicateKey { .. }
            | MissingKey { .. }
            | Negative { .. }
            | ColorOutOfRange { .. }
            | Underflow { .. }
            | Overflow { .. } => ErrorClass::Semantic,

            StringTooLong { .. } => ErrorClass::Resource,
        }
    }
}

pub type Result<T> = std::result::Result<T, ReadError>;

/// A recoverable anomaly. The read still succeeds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReadWarning {
    EmptyArray { line: usize },
    EmptyObject { line: usize },
    CameraRedefined { line: usize },
}

impl fmt::Display for ReadWarning {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ReadWarning::EmptyArray { line } =>
                write!(f, "Line {}: Empty array", line),
            ReadWarning::EmptyObject { line } =>
                write!(f, "Line {}: Empty object", line),
            ReadWarning::CameraRedefined { line } =>
                write!(f, "Line {}: Camera redefined, previous camera replaced", line),
        }
    }
}

/// Tunables for a single read.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ReaderOptions {
    /// The longest string token, in bytes, the reader accepts.
    pub max_string_len: usize,
}

impl Default for ReaderOptions {
    fn default() -> ReaderOptions {
        ReaderOptions { max_string_len: MAX_STRING_LEN }
    }
}

/// Reads a scene description from `source` with default options.
///
/// # Examples
///
/// ```
/// # use raycast::reader::read_scene;
/// let text = r#"[ { "type": "camera", "width": 1, "height": 1 } ]"#;
/// let scene = read_scene(text.as_bytes()).unwrap();
/// assert_eq!(scene.camera.width, 1.0);
/// assert!(scene.objects.is_empty());
/// ```
pub fn read_scene<R: Read>(source: R) -> Result<Scene> {
    SceneReader::new(source).read()
}

/// A single-pass scene reader over a byte stream.
pub struct SceneReader<R: Read> {
    bytes: Bytes<BufReader<R>>,
    peeked: Option<u8>,
    line: usize,
    options: ReaderOptions,
    warnings: Vec<ReadWarning>,
}

impl<R: Read> SceneReader<R> {
    pub fn new(source: R) -> SceneReader<R> {
        SceneReader::with_options(source, Default::default())
    }

    pub fn with_options(source: R, options: ReaderOptions) -> SceneReader<R> {
        SceneReader {
            bytes: BufReader::new(source).bytes(),
            peeked: None,
            line: 1,
            options,
            warnings: Vec::new(),
        }
    }

    /// The warnings raised so far.
    pub fn warnings(&self) -> &[ReadWarning] {
        &self.warnings
    }

    /// The line the reader is currently on.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Reads the whole description into a `Scene`.
    pub fn read(&mut self) -> Result<Scene> {
        let mut scene = Scene::default();
        let mut has_camera = false;

        self.skip_whitespace()?;
        self.expect(b'[')?;

        self.skip_whitespace()?;
        if self.peek()? == Some(b']') {
            self.bump()?;
            self.warn(ReadWarning::EmptyArray { line: self.line });
            self.expect_end()?;

            return Ok(scene);
        }

        loop {
            self.skip_whitespace()?;
            self.expect(b'{')?;

            self.skip_whitespace()?;
            if self.peek()? == Some(b'}') {
                // Empty objects contribute nothing.
                self.bump()?;
                self.warn(ReadWarning::EmptyObject { line: self.line });
            } else {
                match self.read_entity()? {
                    Entity::Camera(camera) => {
                        if has_camera {
                            self.warn(
                                ReadWarning::CameraRedefined { line: self.line }
                            );
                        }

                        scene.camera = camera;
                        has_camera = true;
                    },
                    Entity::Object(obj) => scene.objects.push(obj),
                    Entity::Light(light) => scene.lights.push(light),
                }
            }

            self.skip_whitespace()?;
            match self.next_char()? {
                b',' => continue,
                b']' => break,
                found => return Err(self.unexpected(b']', found)),
            }
        }

        self.expect_end()?;

        debug!(
            objects = scene.objects.len(),
            lights = scene.lights.len(),
            lines = self.line,
            "scene read"
        );

        Ok(scene)
    }

    /// Reads one non-empty object, starting at its first key.
    fn read_entity(&mut self) -> Result<Entity> {
        let key = self.next_string()?;
        if key != "type" {
            return Err(ReadError::TypeNotFirst { line: self.line, key });
        }

        self.skip_whitespace()?;
        self.expect(b':')?;

        self.skip_whitespace()?;
        let name = self.next_string()?;

        match name.as_str() {
            "camera" => self.read_fields::<CameraFields>(),
            "sphere" => self.read_fields::<SphereFields>(),
            "plane" => self.read_fields::<PlaneFields>(),
            "light" => self.read_fields::<LightFields>(),
            _ => Err(ReadError::UnknownType { line: self.line, name }),
        }
    }

    /// Reads the `, "key": value` pairs following the type tag, up to and
    /// including the closing brace.
    fn read_fields<F: Fields>(&mut self) -> Result<Entity> {
        let mut fields = F::default();

        self.skip_whitespace()?;
        loop {
            let c = self.next_char()?;
            if c != b',' {
                // Required keys are checked before the closing brace is.
                let entity = fields.finish(self.line)?;
                if c != b'}' {
                    return Err(self.unexpected(b'}', c));
                }

                return Ok(entity);
            }

            self.skip_whitespace()?;
            let key = self.next_string()?;

            self.skip_whitespace()?;
            self.expect(b':')?;

            self.skip_whitespace()?;
            if !fields.read_key(self, &key)? {
                return Err(ReadError::UnsupportedKey {
                    line: self.line,
                    kind: F::KIND,
                    key,
                });
            }

            self.skip_whitespace()?;
        }
    }

    /// Parses a value into `slot`, unless the key was already seen.
    fn fill<T>(&mut self, slot: &mut Option<T>, key: &str,
        parse: impl FnOnce(&mut Self) -> Result<T>) -> Result<bool> {
        if slot.is_some() {
            return Err(ReadError::DuplicateKey {
                line: self.line,
                key: key.to_string(),
            });
        }

        *slot = Some(parse(self)?);
        Ok(true)
    }

    fn warn(&mut self, warning: ReadWarning) {
        warn!("{}", warning);
        self.warnings.push(warning);
    }

    fn unexpected(&self, expected: u8, found: u8) -> ReadError {
        ReadError::UnexpectedToken {
            line: self.line,
            expected: expected as char,
            found: found as char,
        }
    }

    /* Character level */

    fn peek(&mut self) -> Result<Option<u8>> {
        if self.peeked.is_none() {
            self.peeked = match self.bytes.next() {
                None => None,
                Some(Ok(c)) => Some(c),
                Some(Err(source)) =>
                    return Err(ReadError::Io { line: self.line, source }),
            };
        }

        Ok(self.peeked)
    }

    /// Consumes the next byte, if any, counting newlines.
    fn bump(&mut self) -> Result<Option<u8>> {
        let c = self.peek()?;
        self.peeked = None;

        if c == Some(b'\n') {
            self.line += 1;
        }

        Ok(c)
    }

    /// Consumes the next byte, which must exist.
    fn next_char(&mut self) -> Result<u8> {
        match self.bump()? {
            Some(c) => Ok(c),
            None => Err(ReadError::PrematureEof { line: self.line }),
        }
    }

    fn expect(&mut self, token: u8) -> Result<()> {
        let c = self.next_char()?;
        if c != token {
            return Err(self.unexpected(token, c));
        }

        Ok(())
    }

    fn skip_whitespace(&mut self) -> Result<()> {
        while let Some(c) = self.peek()? {
            if !is_space(c) {
                break;
            }

            self.bump()?;
        }

        Ok(())
    }

    /// Only whitespace may follow the top-level array.
    fn expect_end(&mut self) -> Result<()> {
        self.skip_whitespace()?;

        match self.peek()? {
            None => Ok(()),
            Some(_) => Err(ReadError::TrailingContent { line: self.line }),
        }
    }

    /* Tokens */

    fn next_string(&mut self) -> Result<String> {
        self.expect(b'"')?;

        let mut buffer = Vec::new();
        loop {
            let c = self.next_char()?;
            if c == b'"' {
                break;
            }

            if buffer.len() >= self.options.max_string_len {
                return Err(ReadError::StringTooLong {
                    line: self.line,
                    limit: self.options.max_string_len,
                });
            }

            buffer.push(c);
        }

        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    fn next_number(&mut self) -> Result<f64> {
        let mut text = String::new();

        if let Some(c) = self.peek()? {
            if c == b'+' || c == b'-' {
                text.push(c as char);
                self.bump()?;
            }
        }

        let (mut digits, mut nonzero) = self.take_digits(&mut text)?;
        if self.peek()? == Some(b'.') {
            text.push('.');
            self.bump()?;

            let (d, n) = self.take_digits(&mut text)?;
            digits |= d;
            nonzero |= n;
        }

        if !digits {
            return match self.peek()? {
                None => Err(ReadError::PrematureEof { line: self.line }),
                Some(_) => Err(ReadError::InvalidNumber { line: self.line }),
            };
        }

        if let Some(c) = self.peek()? {
            if c == b'e' || c == b'E' {
                text.push('e');
                self.bump()?;

                if let Some(s) = self.peek()? {
                    if s == b'+' || s == b'-' {
                        text.push(s as char);
                        self.bump()?;
                    }
                }

                let (exponent, _) = self.take_digits(&mut text)?;
                if !exponent {
                    return Err(ReadError::InvalidNumber { line: self.line });
                }
            }
        }

        let value: f64 = text.parse()
            .map_err(|_| ReadError::InvalidNumber { line: self.line })?;

        if value == 0.0 && nonzero {
            return Err(ReadError::Underflow { line: self.line });
        }

        if value.is_infinite() {
            return Err(ReadError::Overflow { line: self.line });
        }

        Ok(value)
    }

    /// Appends a run of decimal digits to `text`. Returns whether any digit
    /// was read and whether any of them was non-zero.
    fn take_digits(&mut self, text: &mut String) -> Result<(bool, bool)> {
        let mut any = false;
        let mut nonzero = false;

        while let Some(c) = self.peek()? {
            if !c.is_ascii_digit() {
                break;
            }

            any = true;
            nonzero |= c != b'0';
            text.push(c as char);
            self.bump()?;
        }

        Ok((any, nonzero))
    }

    fn next_non_negative(&mut self, what: &'static str) -> Result<f64> {
        let value = self.next_number()?;
        if value < 0.0 {
            return Err(ReadError::Negative { line: self.line, what });
        }

        Ok(value)
    }

    /// Reads `[a, b, c]`, running `check` on each element as soon as it is
    /// read.
    fn next_triple(&mut self, check: fn(f64, usize) -> Result<()>)
        -> Result<[f64; 3]> {
        let mut values = [0.0; 3];

        self.expect(b'[')?;
        for (i, value) in values.iter_mut().enumerate() {
            if i > 0 {
                self.skip_whitespace()?;
                self.expect(b',')?;
            }

            self.skip_whitespace()?;
            *value = self.next_number()?;
            check(*value, self.line)?;
        }

        self.skip_whitespace()?;
        self.expect(b']')?;

        Ok(values)
    }

    fn next_vector(&mut self) -> Result<Vector3> {
        Ok(self.next_triple(|_, _| Ok(()))?.into())
    }

    fn next_color(&mut self) -> Result<Color> {
        let [r, g, b] = self.next_triple(|value, line| {
            if value < 0.0 || value > 1.0 {
                return Err(ReadError::ColorOutOfRange { line, value });
            }

            Ok(())
        })?;

        Ok(Color::from_unit(r, g, b))
    }
}

fn is_space(c: u8) -> bool {
    matches!(c, b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c)
}

enum Entity {
    Camera(Camera),
    Object(SceneObject),
    Light(Light),
}

/// The keys seen so far for one kind of object.
///
/// Each key maps to an `Option`; a key which is already `Some` is a
/// duplicate.
trait Fields: Default {
    const KIND: &'static str;

    /// Reads the value for `key`. Returns `false` if the key does not belong
    /// to this kind of object.
    fn read_key<R: Read>(&mut self, reader: &mut SceneReader<R>, key: &str)
        -> Result<bool>;

    /// Builds the entity, failing on the first missing required key.
    fn finish(self, line: usize) -> Result<Entity>;
}

fn required<T>(slot: Option<T>, kind: &'static str, key: &'static str,
    line: usize) -> Result<T> {
    slot.ok_or(ReadError::MissingKey { line, kind, key })
}

#[derive(Default)]
struct CameraFields {
    width: Option<f64>,
    height: Option<f64>,
}

impl Fields for CameraFields {
    const KIND: &'static str = "camera";

    fn read_key<R: Read>(&mut self, reader: &mut SceneReader<R>, key: &str)
        -> Result<bool> {
        match key {
            "width" => reader.fill(&mut self.width, key,
                |r| r.next_non_negative("Width")),
            "height" => reader.fill(&mut self.height, key,
                |r| r.next_non_negative("Height")),
            _ => Ok(false),
        }
    }

    fn finish(self, line: usize) -> Result<Entity> {
        Ok(Entity::Camera(Camera {
            width: required(self.width, Self::KIND, "width", line)?,
            height: required(self.height, Self::KIND, "height", line)?,
        }))
    }
}

#[derive(Default)]
struct SphereFields {
    position: Option<Vector3>,
    radius: Option<f64>,
    diffuse_color: Option<Color>,
    specular_color: Option<Color>,
}

impl Fields for SphereFields {
    const KIND: &'static str = "sphere";

    fn read_key<R: Read>(&mut self, reader: &mut SceneReader<R>, key: &str)
        -> Result<bool> {
        match key {
            "position" => reader.fill(&mut self.position, key,
                |r| r.next_vector()),
            "radius" => reader.fill(&mut self.radius, key,
                |r| r.next_non_negative("Radius")),
            "diffuse_color" => reader.fill(&mut self.diffuse_color, key,
                |r| r.next_color()),
            "specular_color" => reader.fill(&mut self.specular_color, key,
                |r| r.next_color()),
            _ => Ok(false),
        }
    }

    fn finish(self, line: usize) -> Result<Entity> {
        Ok(Entity::Object(SceneObject::Sphere(Sphere {
            position: required(self.position, Self::KIND, "position", line)?,
            radius: required(self.radius, Self::KIND, "radius", line)?,
            diffuse_color:
                required(self.diffuse_color, Self::KIND, "diffuse_color", line)?,
            specular_color:
                required(self.specular_color, Self::KIND, "specular_color", line)?,
        })))
    }
}

#[derive(Default)]
struct PlaneFields {
    position: Option<Vector3>,
    normal: Option<Vector3>,
    diffuse_color: Option<Color>,
    specular_color: Option<Color>,
}

impl Fields for PlaneFields {
    const KIND: &'static str = "plane";

    fn read_key<R: Read>(&mut self, reader: &mut SceneReader<R>, key: &str)
        -> Result<bool> {
        match key {
            "position" => reader.fill(&mut self.position, key,
                |r| r.next_vector()),
            "normal" => reader.fill(&mut self.normal, key,
                |r| r.next_vector()),
            "diffuse_color" => reader.fill(&mut self.diffuse_color, key,
                |r| r.next_color()),
            "specular_color" => reader.fill(&mut self.specular_color, key,
                |r| r.next_color()),
            _ => Ok(false),
        }
    }

    fn finish(self, line: usize) -> Result<Entity> {
        Ok(Entity::Object(SceneObject::Plane(Plane {
            position: required(self.position, Self::KIND, "position", line)?,
            normal: required(self.normal, Self::KIND, "normal", line)?,
            diffuse_color:
                required(self.diffuse_color, Self::KIND, "diffuse_color", line)?,
            specular_color:
                required(self.specular_color, Self::KIND, "specular_color", line)?,
        })))
    }
}

#[derive(Default)]
struct LightFields {
    position: Option<Vector3>,
    direction: Option<Vector3>,
    color: Option<Color>,
    radial_attenuation: Option<Vector3>,
    angular_attenuation: Option<Vector3>,
}

impl Fields for LightFields {
    const KIND: &'static str = "light";

    fn read_key<R: Read>(&mut self, reader: &mut SceneReader<R>, key: &str)
        -> Result<bool> {
        match key {
            "position" => reader.fill(&mut self.position, key,
                |r| r.next_vector()),
            "direction" => reader.fill(&mut self.direction, key,
                |r| r.next_vector()),
            "color" => reader.fill(&mut self.color, key,
                |r| r.next_color()),
            "radial_attenuation" => reader.fill(&mut self.radial_attenuation, key,
                |r| r.next_vector()),
            "angular_attenuation" => reader.fill(&mut self.angular_attenuation, key,
                |r| r.next_vector()),
            _ => Ok(false),
        }
    }

    fn finish(self, line: usize) -> Result<Entity> {
        Ok(Entity::Light(Light {
            position: required(self.position, Self::KIND, "position", line)?,
            direction: self.direction,
            color: required(self.color, Self::KIND, "color", line)?,
            radial_attenuation: self.radial_attenuation
                .map(|v| v.to_array())
                .unwrap_or(Light::DEFAULT_RADIAL_ATTENUATION),
            angular_attenuation: self.angular_attenuation
                .map(|v| v.to_array())
                .unwrap_or(Light::DEFAULT_ANGULAR_ATTENUATION),
        }))
    }
}

/* Tests */

#[cfg(test)]
const SPHERE: &str = r#"{ "type": "sphere", "position": [0, 0, 5],
    "radius": 2, "diffuse_color": [1, 0, 0], "specular_color": [1, 1, 1] }"#;

#[cfg(test)]
fn read_str(text: &str) -> Result<Scene> {
    read_scene(text.as_bytes())
}

#[cfg(test)]
fn read_err(text: &str) -> ReadError {
    match read_str(text) {
        Ok(scene) => panic!("expected an error, read {:?}", scene),
        Err(e) => e,
    }
}

#[test]
fn read_full_scene() {
    let text = r#"[
        { "type": "camera", "width": 2.0, "height": 1.5 },
        { "type": "sphere", "position": [0, 1, 5], "radius": 2,
          "diffuse_color": [1, 0, 0], "specular_color": [1, 1, 1] },
        { "type": "plane", "position": [0, -1, 0], "normal": [0, 1, 0],
          "diffuse_color": [0, 0, 1], "specular_color": [0.5, 0.5, 0.5] },
        { "type": "light", "position": [0, 5, 0], "color": [1, 1, 1] }
    ]"#;

    let scene = read_str(text).unwrap();

    assert_eq!(scene.camera, Camera::new(2.0, 1.5));
    assert_eq!(scene.entity_count(), 3);
    assert_eq!(scene.objects[0], SceneObject::Sphere(Sphere {
        position: Vector3::new(0.0, 1.0, 5.0),
        radius: 2.0,
        diffuse_color: Color::rgb(255, 0, 0),
        specular_color: Color::white(),
    }));
    assert_eq!(scene.objects[1], SceneObject::Plane(Plane {
        position: Vector3::new(0.0, -1.0, 0.0),
        normal: Vector3::new(0.0, 1.0, 0.0),
        diffuse_color: Color::rgb(0, 0, 255),
        specular_color: Color::rgb(127, 127, 127),
    }));
    assert_eq!(scene.lights[0],
        Light::point(Vector3::new(0.0, 5.0, 0.0), Color::white()));
}

#[test]
fn objects_keep_declaration_order() {
    let text = r#"[
        { "type": "plane", "position": [0, 0, 0], "normal": [0, 1, 0],
          "diffuse_color": [0, 0, 0], "specular_color": [0, 0, 0] },
        { "type": "sphere", "position": [1, 0, 0], "radius": 1,
          "diffuse_color": [0, 0, 0], "specular_color": [0, 0, 0] },
        { "type": "camera", "width": 1, "height": 1 },
        { "type": "sphere", "position": [2, 0, 0], "radius": 1,
          "diffuse_color": [0, 0, 0], "specular_color": [0, 0, 0] }
    ]"#;

    let scene = read_str(text).unwrap();
    let kinds: Vec<&str> = scene.objects.iter().map(|o| o.kind()).collect();

    assert_eq!(kinds, vec!["plane", "sphere", "sphere"]);
    match &scene.objects[2] {
        SceneObject::Sphere(s) => assert_eq!(s.position.x, 2.0),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn light_optional_keys() {
    let text = r#"[{ "type": "light", "color": [1, 1, 0.5],
        "position": [1, 2, 3], "direction": [0, -1, 0],
        "radial_attenuation": [0.5, 0.25, 0.125] }]"#;

    let scene = read_str(text).unwrap();
    let light = scene.lights[0];

    assert_eq!(light.direction, Some(Vector3::new(0.0, -1.0, 0.0)));
    assert_eq!(light.color, Color::rgb(255, 255, 127));
    assert_eq!(light.radial_attenuation, [0.5, 0.25, 0.125]);
    assert_eq!(light.angular_attenuation, Light::DEFAULT_ANGULAR_ATTENUATION);
}

#[test]
fn empty_array_warns() {
    let mut reader = SceneReader::new("  [ \n ]  \n".as_bytes());
    let scene = reader.read().unwrap();

    assert_eq!(scene, Scene::default());
    assert_eq!(scene.camera, Camera::new(0.0, 0.0));
    assert_eq!(reader.warnings(), &[ReadWarning::EmptyArray { line: 2 }]);
}

#[test]
fn empty_object_is_skipped() {
    let text = format!("[{{}}, {}, {{ }}]", SPHERE);
    let mut reader = SceneReader::new(text.as_bytes());
    let scene = reader.read().unwrap();

    assert_eq!(scene.entity_count(), 1);
    assert_eq!(reader.warnings().len(), 2);
    assert!(reader.warnings().iter()
        .all(|w| matches!(w, ReadWarning::EmptyObject { .. })));
}

#[test]
fn camera_redefinition_overwrites() {
    let text = r#"[{ "type": "camera", "width": 1, "height": 1 },
        { "type": "camera", "width": 3, "height": 4 }]"#;
    let mut reader = SceneReader::new(text.as_bytes());
    let scene = reader.read().unwrap();

    assert_eq!(scene.camera, Camera::new(3.0, 4.0));
    assert_eq!(reader.warnings(), &[ReadWarning::CameraRedefined { line: 2 }]);
}

#[test]
fn whitespace_between_tokens() {
    let text = "\t[\r\n{\"type\"\t:\n\"camera\" ,\"width\"  :  1e1 , \
        \"height\":+.5}\n]\n\n";

    let scene = read_str(text).unwrap();
    assert_eq!(scene.camera, Camera::new(10.0, 0.5));
}

#[test]
fn duplicate_key_fails_even_when_equal() {
    let text = r#"[{ "type": "sphere", "radius": 1, "radius": 1,
        "position": [0, 0, 0], "diffuse_color": [0, 0, 0],
        "specular_color": [0, 0, 0] }]"#;

    let e = read_err(text);
    match e {
        ReadError::DuplicateKey { ref key, line } => {
            assert_eq!(key, "radius");
            assert_eq!(line, 1);
        },
        ref other => panic!("unexpected {:?}", other),
    }
    assert_eq!(e.class(), ErrorClass::Semantic);
    assert!(e.to_string().contains("'radius' already defined"));
}

#[test]
fn duplicate_specular_on_plane() {
    let text = r#"[{ "type": "plane", "specular_color": [0, 0, 0],
        "specular_color": [0, 0, 0] }]"#;

    assert!(matches!(read_err(text), ReadError::DuplicateKey { .. }));
}

#[test]
fn missing_required_key() {
    let text = r#"[{ "type": "sphere", "position": [0, 0, 0],
        "radius": 1, "diffuse_color": [0, 0, 0] }]"#;

    match read_err(text) {
        ReadError::MissingKey { kind, key, .. } => {
            assert_eq!(kind, "sphere");
            assert_eq!(key, "specular_color");
        },
        other => panic!("unexpected {:?}", other),
    }

    let text = r#"[{ "type": "camera", "width": 1 }]"#;
    assert!(matches!(read_err(text),
        ReadError::MissingKey { kind: "camera", key: "height", .. }));

    let text = r#"[{ "type": "light", "position": [0, 0, 0] }]"#;
    assert!(matches!(read_err(text),
        ReadError::MissingKey { kind: "light", key: "color", .. }));
}

#[test]
fn type_must_be_first() {
    let text = r#"[{ "width": 1, "type": "camera", "height": 1 }]"#;

    let e = read_err(text);
    assert!(matches!(e, ReadError::TypeNotFirst { .. }));
    assert_eq!(e.class(), ErrorClass::Syntax);
}

#[test]
fn unknown_type_and_key() {
    let e = read_err(r#"[{ "type": "cylinder", "radius": 1 }]"#);
    assert!(matches!(e, ReadError::UnknownType { ref name, .. } if name == "cylinder"));

    let e = read_err(r#"[{ "type": "camera", "depth": 1 }]"#);
    match e {
        ReadError::UnsupportedKey { kind, ref key, .. } => {
            assert_eq!(kind, "camera");
            assert_eq!(key, "depth");
        },
        ref other => panic!("unexpected {:?}", other),
    }
    assert_eq!(e.class(), ErrorClass::Semantic);
}

#[test]
fn negative_values_rejected() {
    let e = read_err(r#"[{ "type": "camera", "width": -1, "height": 1 }]"#);
    assert!(matches!(e, ReadError::Negative { what: "Width", .. }));

    let e = read_err(r#"[{ "type": "camera", "width": 1, "height": -0.5 }]"#);
    assert!(matches!(e, ReadError::Negative { what: "Height", .. }));

    let e = read_err(r#"[{ "type": "sphere", "radius": -2 }]"#);
    assert!(matches!(e, ReadError::Negative { what: "Radius", .. }));
    assert_eq!(e.class(), ErrorClass::Semantic);
}

#[test]
fn zero_radius_accepted() {
    let text = r#"[{ "type": "sphere", "position": [0, 0, 5], "radius": 0,
        "diffuse_color": [0, 0, 0], "specular_color": [0, 0, 0] }]"#;

    let scene = read_str(text).unwrap();
    assert!(matches!(scene.objects[0], SceneObject::Sphere(s) if s.radius == 0.0));
}

#[test]
fn color_channel_range() {
    let text = r#"[{ "type": "light", "position": [0, 0, 0],
        "color": [0, 1.0001, 0] }]"#;

    let e = read_err(text);
    assert!(matches!(e, ReadError::ColorOutOfRange { value, .. } if value > 1.0));
    assert_eq!(e.class(), ErrorClass::Semantic);

    let text = r#"[{ "type": "light", "position": [0, 0, 0],
        "color": [-0.1, 0, 0] }]"#;
    assert!(matches!(read_err(text), ReadError::ColorOutOfRange { .. }));

    let text = r#"[{ "type": "light", "position": [0, 0, 0],
        "color": [0, 1, 0.2] }]"#;
    assert_eq!(read_str(text).unwrap().lights[0].color, Color::rgb(0, 255, 51));
}

#[test]
fn bad_numbers() {
    let e = read_err(r#"[{ "type": "camera", "width": "wide" }]"#);
    assert!(matches!(e, ReadError::InvalidNumber { .. }));

    let e = read_err(r#"[{ "type": "camera", "width": 1e }]"#);
    assert!(matches!(e, ReadError::InvalidNumber { .. }));

    let e = read_err(r#"[{ "type": "camera", "width": 1e-400, "height": 1 }]"#);
    assert!(matches!(e, ReadError::Underflow { .. }));

    let e = read_err(r#"[{ "type": "camera", "width": 1e400, "height": 1 }]"#);
    assert!(matches!(e, ReadError::Overflow { .. }));

    // A literal zero is not an underflow.
    let scene = read_str(r#"[{ "type": "camera", "width": 0e-400, "height": 0.000 }]"#)
        .unwrap();
    assert_eq!(scene.camera, Camera::new(0.0, 0.0));
}

#[test]
fn malformed_vector() {
    let e = read_err(r#"[{ "type": "plane", "position": [0, 0] }]"#);
    assert!(matches!(e, ReadError::UnexpectedToken { expected: ',', found: ']', .. }));

    let e = read_err(r#"[{ "type": "plane", "position": [0, 0, 0, 0] }]"#);
    assert!(matches!(e, ReadError::UnexpectedToken { expected: ']', found: ',', .. }));
}

#[test]
fn missing_delimiters() {
    let e = read_err(r#"{ "type": "camera" }"#);
    assert!(matches!(e, ReadError::UnexpectedToken { expected: '[', .. }));

    let e = read_err(r#"[{ "type" "camera" }]"#);
    assert!(matches!(e, ReadError::UnexpectedToken { expected: ':', .. }));

    let e = read_err(&format!("[{} {}]", SPHERE, SPHERE));
    assert!(matches!(e, ReadError::UnexpectedToken { expected: ']', found: '{', .. }));

    let e = read_err(&format!("[{},]", SPHERE));
    assert!(matches!(e, ReadError::UnexpectedToken { expected: '{', found: ']', .. }));
}

#[test]
fn missing_keys_reported_before_brace() {
    let text = r#"[{ "type": "camera", "width": 1 ]"#;

    assert!(matches!(read_err(text), ReadError::MissingKey { key: "height", .. }));
}

#[test]
fn trailing_content_rejected() {
    let e = read_err("[]\n\n x");
    assert!(matches!(e, ReadError::TrailingContent { line: 3 }));

    let e = read_err(&format!("[{}] []", SPHERE));
    assert_eq!(e.class(), ErrorClass::Syntax);
}

#[test]
fn premature_end_of_file() {
    for text in &["", "[", "[{", r#"[{"type"#, r#"[{"type":"camera","width":"#,
        r#"[{"type":"camera","width":1,"height":1}"#] {
        let e = read_err(text);
        assert_eq!(e.class(), ErrorClass::PrematureEof, "input {:?}", text);
    }
}

#[test]
fn read_failure_is_not_eof() {
    struct Failing;

    impl Read for Failing {
        fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "disk on fire"))
        }
    }

    let e = read_scene("[\n{".as_bytes().chain(Failing)).unwrap_err();

    assert_eq!(e.class(), ErrorClass::Io);
    assert_eq!(e.line(), 2);
    assert!(e.to_string().starts_with("Line 2: Read error"));
}

#[test]
fn line_numbers_count_every_newline() {
    let text = "[\n  {\n    \"type\": \"sphere\",\n    \"radius\": -1\n  }\n]";

    let e = read_err(text);
    assert_eq!(e.line(), 4);
    assert_eq!(e.to_string(), "Line 4: Radius cannot be negative");
}

#[test]
fn long_strings_rejected() {
    let options = ReaderOptions { max_string_len: 8 };
    let text = r#"[{ "type": "camera", "a_very_long_key": 1 }]"#;

    let e = SceneReader::with_options(text.as_bytes(), options)
        .read()
        .unwrap_err();

    assert!(matches!(e, ReadError::StringTooLong { limit: 8, .. }));
    assert_eq!(e.class(), ErrorClass::Resource);

    // Exactly at the limit is fine.
    let text = r#"[{ "type": "camera", "width": 1, "height": 1 }]"#;
    let options = ReaderOptions { max_string_len: 6 };
    assert!(SceneReader::with_options(text.as_bytes(), options).read().is_ok());
}

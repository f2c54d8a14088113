// SPDX-License-Identifier: MIT OR Apache-2.0
//! Port definitions for step inputs/outputs.

use std::fmt;

/// Port direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortDirection {
    /// Input port
    Input,
    /// Output port
    Output,
}

impl fmt::Display for PortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input => f.write_str("input"),
            Self::Output => f.write_str("output"),
        }
    }
}

/// Data type that can flow through ports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortType {
    /// Boolean value
    Bool,
    /// Integer value
    Int,
    /// Floating point value
    Float,
    /// 2D vector
    Vector2,
    /// 3D vector
    Vector3,
    /// 4D vector
    Vector4,
    /// Color (RGBA)
    Color,
    /// String value
    String,
    /// Any type (for generic steps)
    Any,
}

impl PortType {
    /// Check whether a port declared with this type can hold values of `candidate`.
    ///
    /// `Any` holds everything; every other type only holds itself.
    pub fn accepts(&self, candidate: &PortType) -> bool {
        matches!(self, Self::Any) || self == candidate
    }
}

impl fmt::Display for PortType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Vector2 => "vector2",
            Self::Vector3 => "vector3",
            Self::Vector4 => "vector4",
            Self::Color => "color",
            Self::String => "string",
            Self::Any => "any",
        };
        f.write_str(name)
    }
}

/// Value that can be stored in a port
#[derive(Debug, Clone, PartialEq)]
pub enum PortValue {
    /// Boolean
    Bool(bool),
    /// Integer
    Int(i32),
    /// Float
    Float(f32),
    /// 2D vector
    Vector2([f32; 2]),
    /// 3D vector
    Vector3([f32; 3]),
    /// 4D vector
    Vector4([f32; 4]),
    /// Color
    Color([f32; 4]),
    /// String
    String(String),
}

impl PortValue {
    /// Get the port type for this value
    pub fn port_type(&self) -> PortType {
        match self {
            Self::Bool(_) => PortType::Bool,
            Self::Int(_) => PortType::Int,
            Self::Float(_) => PortType::Float,
            Self::Vector2(_) => PortType::Vector2,
            Self::Vector3(_) => PortType::Vector3,
            Self::Vector4(_) => PortType::Vector4,
            Self::Color(_) => PortType::Color,
            Self::String(_) => PortType::String,
        }
    }
}

impl From<bool> for PortValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for PortValue {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<f32> for PortValue {
    fn from(value: f32) -> Self {
        Self::Float(value)
    }
}

impl From<[f32; 2]> for PortValue {
    fn from(value: [f32; 2]) -> Self {
        Self::Vector2(value)
    }
}

impl From<[f32; 3]> for PortValue {
    fn from(value: [f32; 3]) -> Self {
        Self::Vector3(value)
    }
}

impl From<String> for PortValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for PortValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

/// Typed extraction of a [`PortValue`].
///
/// Extraction succeeds only when the runtime kind of the value matches the
/// requested Rust type; there is no numeric coercion.
pub trait FromPortValue: Sized {
    /// Extract `Self` from `value`, or `None` if the kinds differ
    fn from_port_value(value: &PortValue) -> Option<Self>;
}

impl FromPortValue for bool {
    fn from_port_value(value: &PortValue) -> Option<Self> {
        match value {
            PortValue::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromPortValue for i32 {
    fn from_port_value(value: &PortValue) -> Option<Self> {
        match value {
            PortValue::Int(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromPortValue for f32 {
    fn from_port_value(value: &PortValue) -> Option<Self> {
        match value {
            PortValue::Float(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromPortValue for [f32; 2] {
    fn from_port_value(value: &PortValue) -> Option<Self> {
        match value {
            PortValue::Vector2(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromPortValue for [f32; 3] {
    fn from_port_value(value: &PortValue) -> Option<Self> {
        match value {
            PortValue::Vector3(v) => Some(*v),
            _ => None,
        }
    }
}

// Vector4 and Color share a representation.
impl FromPortValue for [f32; 4] {
    fn from_port_value(value: &PortValue) -> Option<Self> {
        match value {
            PortValue::Vector4(v) | PortValue::Color(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromPortValue for String {
    fn from_port_value(value: &PortValue) -> Option<Self> {
        match value {
            PortValue::String(v) => Some(v.clone()),
            _ => None,
        }
    }
}

impl FromPortValue for PortValue {
    fn from_port_value(value: &PortValue) -> Option<Self> {
        Some(value.clone())
    }
}

/// A named, typed value cell on a step
#[derive(Debug, Clone, PartialEq)]
pub struct Port {
    name: String,
    port_type: PortType,
    value: Option<PortValue>,
}

impl Port {
    /// Create a new empty port accepting `port_type`
    pub fn new(name: impl Into<String>, port_type: PortType) -> Self {
        Self {
            name: name.into(),
            port_type,
            value: None,
        }
    }

    /// Create a new empty port accepting any value
    pub fn any(name: impl Into<String>) -> Self {
        Self::new(name, PortType::Any)
    }

    /// Port name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared accepted type
    pub fn port_type(&self) -> PortType {
        self.port_type
    }

    /// Whether a value is currently stored
    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }

    /// Check whether values of the declared type `candidate` may flow into this port
    pub fn can_store(&self, candidate: &PortType) -> bool {
        self.port_type.accepts(candidate)
    }

    /// Store a value.
    ///
    /// Values whose runtime kind is not accepted are dropped and `false` is
    /// returned; this is never an error.
    pub fn store(&mut self, value: impl Into<PortValue>) -> bool {
        let value = value.into();
        if !self.port_type.accepts(&value.port_type()) {
            tracing::trace!(
                port = %self.name,
                declared = %self.port_type,
                supplied = %value.port_type(),
                "ignoring value of incompatible type"
            );
            return false;
        }
        self.value = Some(value);
        true
    }

    /// Raw stored value
    pub fn fetch(&self) -> Option<&PortValue> {
        self.value.as_ref()
    }

    /// Stored value as `R`, or `None` if absent or of another kind
    pub fn fetch_as<R: FromPortValue>(&self) -> Option<R> {
        self.value.as_ref().and_then(R::from_port_value)
    }

    /// Stored value as `R`, or `R::default()` if absent or of another kind
    pub fn fetch_or_default<R: FromPortValue + Default>(&self) -> R {
        self.fetch_as().unwrap_or_default()
    }

    /// Wipe the stored value
    pub fn clear(&mut self) {
        self.value = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_and_fetch() {
        let mut port = Port::new("value", PortType::Float);
        assert!(!port.has_value());
        assert_eq!(port.fetch(), None);

        assert!(port.store(2.5_f32));
        assert!(port.has_value());
        assert_eq!(port.fetch(), Some(&PortValue::Float(2.5)));
        assert_eq!(port.fetch_as::<f32>(), Some(2.5));
    }

    #[test]
    fn test_store_mismatch_is_noop() {
        let mut port = Port::new("value", PortType::Float);
        assert!(port.store(1.0_f32));

        assert!(!port.store("text"));
        assert_eq!(port.fetch_as::<f32>(), Some(1.0));

        port.clear();
        assert!(!port.store(3_i32));
        assert!(!port.has_value());
    }

    #[test]
    fn test_fetch_wrong_kind_yields_default() {
        let mut port = Port::any("value");
        port.store(7_i32);

        assert_eq!(port.fetch_as::<f32>(), None);
        assert_eq!(port.fetch_or_default::<f32>(), 0.0);
        assert_eq!(port.fetch_or_default::<i32>(), 7);
        assert_eq!(port.fetch_or_default::<String>(), String::new());
    }

    #[test]
    fn test_any_accepts_everything() {
        let mut port = Port::any("sink");
        assert!(port.can_store(&PortType::String));
        assert!(port.can_store(&PortType::Any));
        assert!(port.store("hello"));
        assert!(port.store([1.0_f32, 2.0]));
        assert_eq!(port.fetch_as::<[f32; 2]>(), Some([1.0, 2.0]));
    }

    #[test]
    fn test_typed_port_rejects_any_declared_type() {
        let port = Port::new("first", PortType::Float);
        assert!(port.can_store(&PortType::Float));
        assert!(!port.can_store(&PortType::Int));
        assert!(!port.can_store(&PortType::Any));
    }

    #[test]
    fn test_color_reads_as_array() {
        let mut port = Port::new("tint", PortType::Color);
        assert!(port.store(PortValue::Color([1.0, 0.5, 0.0, 1.0])));
        assert!(!port.store(PortValue::Vector4([0.0; 4])));
        assert_eq!(port.fetch_as::<[f32; 4]>(), Some([1.0, 0.5, 0.0, 1.0]));
    }

    #[test]
    fn test_clear() {
        let mut port = Port::new("flag", PortType::Bool);
        port.store(true);
        port.clear();
        assert!(!port.has_value());
        assert_eq!(port.fetch_as::<bool>(), None);
    }
}

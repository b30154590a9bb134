/*!
 * Declarative description of adapter configuration types.
 *
 * Rust has no runtime reflection, so a configuration type describes itself
 * through an ordered property table. Each [`ConfigProperty`] holds one value
 * type and up to two metadata slots (stored field and accessor); the accessor
 * slot takes precedence.
 */
use std::fmt;

use crate::field::ConfigField;

/// Lazily produced description of an object type.
///
/// A function pointer rather than an owned value, so a type may refer to
/// itself (directly or through other types) and the cycle can be reported at
/// schema generation time.
pub type ConfigTypeRef = fn() -> ConfigType;

/// A configuration type that can describe its properties
pub trait AdapterConfig {
    /// The property table of this type
    fn config_type() -> ConfigType;
}

/// An enumeration usable as a property value type
pub trait ConfigEnum {
    /// The enum's name and its values in declaration order
    fn enum_type() -> EnumType;
}

/// An enumeration and its values in declaration order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumType {
    name: String,
    values: Vec<String>,
}

impl EnumType {
    /// Create an enum type from its values in declaration order
    pub fn new<N, I, S>(name: N, values: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// The enum name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The serialized values in declaration order
    pub fn values(&self) -> &[String] {
        &self.values
    }
}

/// A nested object type, identified by the Rust type that describes it
#[derive(Debug, Clone, Copy)]
pub struct ObjectType {
    key: &'static str,
    describe: ConfigTypeRef,
}

impl ObjectType {
    /// The object type described by `T`
    pub fn of<T: AdapterConfig>() -> Self {
        Self {
            key: std::any::type_name::<T>(),
            describe: T::config_type,
        }
    }

    /// Identity of the describing type.
    ///
    /// Distinct Rust types have distinct keys even when their
    /// [`ConfigType`] names coincide.
    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Produce the property table
    pub fn describe(&self) -> ConfigType {
        (self.describe)()
    }
}

/// The declared value type of a property
#[derive(Clone)]
pub enum ValueType {
    /// UTF-8 string
    String,
    /// Integral number
    Integer,
    /// Floating point number
    Number,
    /// Boolean
    Boolean,
    /// Enumeration, serialized as one of its value names
    Enum(EnumType),
    /// Nested object
    Object(ObjectType),
    /// Array of the inner type
    Array(Box<ValueType>),
}

impl ValueType {
    /// Nested object value type for an [`AdapterConfig`]
    pub fn object<T: AdapterConfig>() -> Self {
        ValueType::Object(ObjectType::of::<T>())
    }

    /// Enum value type for a [`ConfigEnum`]
    pub fn enumeration<E: ConfigEnum>() -> Self {
        ValueType::Enum(E::enum_type())
    }

    /// Array of the given item type
    pub fn array(item: ValueType) -> Self {
        ValueType::Array(Box::new(item))
    }

    /// The innermost non-array type
    pub fn element(&self) -> &ValueType {
        match self {
            ValueType::Array(item) => item.element(),
            other => other,
        }
    }

    /// Short name of the type kind, used in logs and error messages
    pub fn kind(&self) -> &'static str {
        match self {
            ValueType::String => "string",
            ValueType::Integer => "integer",
            ValueType::Number => "number",
            ValueType::Boolean => "boolean",
            ValueType::Enum(_) => "enum",
            ValueType::Object(_) => "object",
            ValueType::Array(_) => "array",
        }
    }
}

impl fmt::Debug for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Enum(e) => f.debug_tuple("Enum").field(&e.name).finish(),
            // Resolving the reference here could recurse forever on cyclic types
            ValueType::Object(_) => f.write_str("Object(..)"),
            ValueType::Array(item) => f.debug_tuple("Array").field(item).finish(),
            other => f.write_str(other.kind()),
        }
    }
}

/// One property of a configuration type
#[derive(Debug, Clone)]
pub struct ConfigProperty {
    name: String,
    rename: Option<String>,
    value_type: ValueType,
    field: Option<ConfigField>,
    accessor: Option<ConfigField>,
}

impl ConfigProperty {
    /// Create a property without metadata
    pub fn new<S: Into<String>>(name: S, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            rename: None,
            value_type,
            field: None,
            accessor: None,
        }
    }

    /// Serialize the property under a different name
    pub fn renamed<S: Into<String>>(mut self, name: S) -> Self {
        self.rename = Some(name.into());
        self
    }

    /// Attach metadata declared on the stored field
    pub fn with_field(mut self, field: ConfigField) -> Self {
        self.field = Some(field);
        self
    }

    /// Attach metadata declared on the accessor
    pub fn with_accessor(mut self, accessor: ConfigField) -> Self {
        self.accessor = Some(accessor);
        self
    }

    /// Shorthand for [`ConfigProperty::with_field`]
    pub fn with_metadata(self, field: ConfigField) -> Self {
        self.with_field(field)
    }

    /// Declared (Rust-side) name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name used in serialized configuration and in the schema
    pub fn serialized_name(&self) -> &str {
        self.rename.as_deref().unwrap_or(&self.name)
    }

    /// The declared value type
    pub fn value_type(&self) -> &ValueType {
        &self.value_type
    }

    /// The authoritative metadata entry: accessor first, then stored field
    pub fn metadata(&self) -> Option<&ConfigField> {
        self.accessor.as_ref().or(self.field.as_ref())
    }
}

/// Ordered description of a configuration type
#[derive(Debug, Clone)]
pub struct ConfigType {
    name: String,
    properties: Vec<ConfigProperty>,
}

impl ConfigType {
    /// Create an empty type description named `name`
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            properties: Vec::new(),
        }
    }

    /// Create an empty description named after the Rust type `T`
    pub fn of<T: ?Sized>() -> Self {
        Self::new(std::any::type_name::<T>())
    }

    /// Append a property
    pub fn property(mut self, property: ConfigProperty) -> Self {
        self.properties.push(property);
        self
    }

    /// Append a property built from its parts
    pub fn field<S: Into<String>>(self, name: S, value_type: ValueType, metadata: ConfigField) -> Self {
        self.property(ConfigProperty::new(name, value_type).with_field(metadata))
    }

    /// Type name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Properties in declaration order
    pub fn properties(&self) -> &[ConfigProperty] {
        &self.properties
    }
}

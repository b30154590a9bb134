/*!
 * Configuration field metadata.
 *
 * A [`ConfigField`] carries the presentation and constraint attributes of one
 * property of an adapter configuration type: title, description, format hint,
 * default literal, numeric/string/array bounds, enum labels, flags and
 * arbitrary extension attributes. It is pure data; the schema generator in
 * `edgeflow-schema` decides how each attribute is rendered.
 */
use std::fmt;

use serde::{Deserialize, Serialize};

/// Format hint attached to a configuration field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldFormat {
    /// No format hint
    #[default]
    Unspecified,
    /// Full-date (RFC 3339)
    Date,
    /// Full-time (RFC 3339)
    Time,
    /// Date-time (RFC 3339)
    DateTime,
    /// Regular expression
    Regex,
    /// Email address
    Email,
    /// Hostname
    Hostname,
    /// IPv4 address
    Ipv4,
    /// IPv6 address
    Ipv6,
    /// JSON pointer
    JsonPointer,
    /// Relative JSON pointer
    RelativeJsonPointer,
    /// URI
    Uri,
    /// Identifier (custom)
    Identifier,
    /// Boolean rendered as a toggle (custom)
    Boolean,
    /// MQTT topic (custom)
    MqttTopic,
    /// MQTT topic filter (custom)
    MqttTopicFilter,
    /// MQTT tag reference (custom)
    MqttTag,
}

impl FieldFormat {
    /// The lower-kebab wire name of the format
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldFormat::Unspecified => "unspecified",
            FieldFormat::Date => "date",
            FieldFormat::Time => "time",
            FieldFormat::DateTime => "date-time",
            FieldFormat::Regex => "regex",
            FieldFormat::Email => "email",
            FieldFormat::Hostname => "hostname",
            FieldFormat::Ipv4 => "ipv4",
            FieldFormat::Ipv6 => "ipv6",
            FieldFormat::JsonPointer => "json-pointer",
            FieldFormat::RelativeJsonPointer => "relative-json-pointer",
            FieldFormat::Uri => "uri",
            FieldFormat::Identifier => "identifier",
            FieldFormat::Boolean => "boolean",
            FieldFormat::MqttTopic => "mqtt-topic",
            FieldFormat::MqttTopicFilter => "mqtt-topic-filter",
            FieldFormat::MqttTag => "mqtt-tag",
        }
    }

    /// Whether a format hint is set
    pub fn is_specified(&self) -> bool {
        !matches!(self, FieldFormat::Unspecified)
    }
}

impl fmt::Display for FieldFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An extension attribute copied verbatim into the generated schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomAttribute {
    /// Attribute key
    pub name: String,
    /// Attribute value
    pub value: String,
}

impl CustomAttribute {
    /// Create a new custom attribute
    pub fn new<N: Into<String>, V: Into<String>>(name: N, value: V) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Metadata for one configuration property
///
/// Bounds are genuine optionals: `None` means "not specified", any `Some`
/// value is rendered as given.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigField {
    title: Option<String>,
    description: Option<String>,
    format: FieldFormat,
    default_value: Option<String>,
    multiple_of: Option<f64>,
    number_min: Option<f64>,
    number_max: Option<f64>,
    string_min_length: Option<u64>,
    string_max_length: Option<u64>,
    string_pattern: Option<String>,
    enum_display_values: Vec<String>,
    required: bool,
    ignore: bool,
    array_min_items: Option<u64>,
    array_max_items: Option<u64>,
    read_only: bool,
    write_only: bool,
    array_unique_items: bool,
    allowed_values: Vec<String>,
    custom_attributes: Vec<CustomAttribute>,
}

impl ConfigField {
    /// Creates metadata with every attribute unset
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the title
    pub fn with_title<S: Into<String>>(mut self, title: S) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the description
    pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the format hint
    pub fn with_format(mut self, format: FieldFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets the default literal; it is type-coerced when the schema is generated
    pub fn with_default<S: Into<String>>(mut self, value: S) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Sets `multipleOf`
    pub fn with_multiple_of(mut self, value: f64) -> Self {
        self.multiple_of = Some(value);
        self
    }

    /// Sets the inclusive numeric minimum
    pub fn with_number_min(mut self, value: f64) -> Self {
        self.number_min = Some(value);
        self
    }

    /// Sets the inclusive numeric maximum
    pub fn with_number_max(mut self, value: f64) -> Self {
        self.number_max = Some(value);
        self
    }

    /// Sets both inclusive numeric bounds
    pub fn with_number_range(self, min: f64, max: f64) -> Self {
        self.with_number_min(min).with_number_max(max)
    }

    /// Sets the minimum string length
    pub fn with_string_min_length(mut self, value: u64) -> Self {
        self.string_min_length = Some(value);
        self
    }

    /// Sets the maximum string length
    pub fn with_string_max_length(mut self, value: u64) -> Self {
        self.string_max_length = Some(value);
        self
    }

    /// Sets the string pattern
    pub fn with_string_pattern<S: Into<String>>(mut self, pattern: S) -> Self {
        self.string_pattern = Some(pattern.into());
        self
    }

    /// Sets the display labels of an enum-typed property, in enum declaration order
    pub fn with_enum_display_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enum_display_values = values.into_iter().map(Into::into).collect();
        self
    }

    /// Marks the property as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Removes the property from generated schemas
    pub fn ignored(mut self) -> Self {
        self.ignore = true;
        self
    }

    /// Sets the minimum number of array items
    pub fn with_array_min_items(mut self, value: u64) -> Self {
        self.array_min_items = Some(value);
        self
    }

    /// Sets the maximum number of array items
    pub fn with_array_max_items(mut self, value: u64) -> Self {
        self.array_max_items = Some(value);
        self
    }

    /// Marks the property as read-only
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Marks the property as write-only
    pub fn write_only(mut self) -> Self {
        self.write_only = true;
        self
    }

    /// Requires array items to be unique
    pub fn unique_items(mut self) -> Self {
        self.array_unique_items = true;
        self
    }

    /// Restricts a string property to the given values
    pub fn with_allowed_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_values = values.into_iter().map(Into::into).collect();
        self
    }

    /// Adds an extension attribute
    pub fn with_custom_attribute<N: Into<String>, V: Into<String>>(mut self, name: N, value: V) -> Self {
        self.custom_attributes.push(CustomAttribute::new(name, value));
        self
    }

    /// The title, if set
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// The description, if set
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The format hint
    pub fn format(&self) -> FieldFormat {
        self.format
    }

    /// The raw default literal, if set
    pub fn default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    /// `multipleOf`, if set
    pub fn multiple_of(&self) -> Option<f64> {
        self.multiple_of
    }

    /// Inclusive numeric minimum, if set
    pub fn number_min(&self) -> Option<f64> {
        self.number_min
    }

    /// Inclusive numeric maximum, if set
    pub fn number_max(&self) -> Option<f64> {
        self.number_max
    }

    /// Minimum string length, if set
    pub fn string_min_length(&self) -> Option<u64> {
        self.string_min_length
    }

    /// Maximum string length, if set
    pub fn string_max_length(&self) -> Option<u64> {
        self.string_max_length
    }

    /// String pattern, if set
    pub fn string_pattern(&self) -> Option<&str> {
        self.string_pattern.as_deref()
    }

    /// Enum display labels
    pub fn enum_display_values(&self) -> &[String] {
        &self.enum_display_values
    }

    /// Whether the property is required
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Whether the property is left out of generated schemas
    pub fn is_ignored(&self) -> bool {
        self.ignore
    }

    /// Minimum number of array items, if set
    pub fn array_min_items(&self) -> Option<u64> {
        self.array_min_items
    }

    /// Maximum number of array items, if set
    pub fn array_max_items(&self) -> Option<u64> {
        self.array_max_items
    }

    /// Whether the property is read-only
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Whether the property is write-only
    pub fn is_write_only(&self) -> bool {
        self.write_only
    }

    /// Whether array items must be unique
    pub fn has_unique_items(&self) -> bool {
        self.array_unique_items
    }

    /// Allowed string values
    pub fn allowed_values(&self) -> &[String] {
        &self.allowed_values
    }

    /// Extension attributes in declaration order
    pub fn custom_attributes(&self) -> &[CustomAttribute] {
        &self.custom_attributes
    }
}

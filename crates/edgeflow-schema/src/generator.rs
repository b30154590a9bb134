/*!
 * Configuration schema synthesis.
 *
 * Turns a [`ConfigType`] property table into a JSON Schema (draft 2020-12)
 * document. Generation is pure: the same table always produces the same
 * document, key order included.
 */
use edgeflow_adapters::config_type::{AdapterConfig, ConfigType, ValueType};
use edgeflow_adapters::field::ConfigField;
use edgeflow_core::logging::Span;
use serde_json::{Map, Number, Value};
use tracing::{debug, warn};

use crate::error::{Result, SchemaError};

/// Dialect written to `$schema`
pub const SCHEMA_DIALECT: &str = "https://json-schema.org/draft/2020-12/schema";

/// Keyword carrying the display labels of an enum-typed property
pub const ENUM_NAMES_ATTRIBUTE: &str = "enumNames";

/// Keywords custom attributes may not replace
const RESERVED_ATTRIBUTES: [&str; 6] = ["$schema", "type", "properties", "required", "items", "enum"];

/// Largest magnitude at which every integral f64 is exact
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    /// The node of a declared property
    Property,
    /// The `items` node of an array property
    ContainerItem,
}

/// An object type on the current generation path
#[derive(Debug)]
struct Visit {
    key: String,
    name: String,
}

/// JSON Schema generator for adapter configuration types
#[derive(Debug, Clone)]
pub struct SchemaGenerator {
    span: Span,
}

impl Default for SchemaGenerator {
    fn default() -> Self {
        Self { span: Span::none() }
    }
}

impl SchemaGenerator {
    /// Create a generator that logs in the caller's span
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a generator that logs in the given span
    pub fn with_span(span: Span) -> Self {
        Self { span }
    }

    /// Generate the schema document of a configuration type
    pub fn generate(&self, config_type: &ConfigType) -> Result<Value> {
        self.generate_root(config_type, config_type.name())
    }

    /// Generate the schema document of an [`AdapterConfig`] type
    pub fn generate_for<T: AdapterConfig>(&self) -> Result<Value> {
        self.generate_root(&T::config_type(), std::any::type_name::<T>())
    }

    fn generate_root(&self, config_type: &ConfigType, key: &str) -> Result<Value> {
        let _entered = self.span.enter();

        let mut stack = Vec::new();
        let object = self.object_schema(config_type, key, &mut stack)?;

        let mut root = Map::new();
        root.insert("$schema".to_string(), Value::String(SCHEMA_DIALECT.to_string()));
        root.extend(object);

        debug!(type_name = config_type.name(), "Generated configuration schema");
        Ok(Value::Object(root))
    }

    /// Object types are identified by `key`; `name` only labels them in errors
    fn object_schema(&self, config_type: &ConfigType, key: &str, stack: &mut Vec<Visit>) -> Result<Map<String, Value>> {
        let type_name = config_type.name();
        if stack.iter().any(|visited| visited.key == key) {
            let mut path: Vec<&str> = stack.iter().map(|visited| visited.name.as_str()).collect();
            path.push(type_name);
            return Err(SchemaError::CyclicType {
                type_name: type_name.to_string(),
                path: path.join(" -> "),
            });
        }

        stack.push(Visit {
            key: key.to_string(),
            name: type_name.to_string(),
        });
        let result = self.object_body(config_type, stack);
        stack.pop();
        result
    }

    fn object_body(&self, config_type: &ConfigType, stack: &mut Vec<Visit>) -> Result<Map<String, Value>> {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for property in config_type.properties() {
            let metadata = property.metadata();
            if metadata.map_or(false, ConfigField::is_ignored) {
                continue;
            }

            let name = property.serialized_name();
            if properties.contains_key(name) {
                return Err(SchemaError::DuplicateProperty {
                    type_name: config_type.name().to_string(),
                    property: name.to_string(),
                });
            }

            let schema = self.property_schema(property.value_type(), metadata, stack)?;
            properties.insert(name.to_string(), Value::Object(schema));

            if metadata.map_or(false, ConfigField::is_required) {
                required.push(Value::String(name.to_string()));
            }
        }

        let mut node = Map::new();
        node.insert("type".to_string(), Value::String("object".to_string()));
        if !properties.is_empty() {
            node.insert("properties".to_string(), Value::Object(properties));
        }
        if !required.is_empty() {
            node.insert("required".to_string(), Value::Array(required));
        }
        Ok(node)
    }

    fn property_schema(
        &self,
        value_type: &ValueType,
        metadata: Option<&ConfigField>,
        stack: &mut Vec<Visit>,
    ) -> Result<Map<String, Value>> {
        let mut node = self.value_schema(value_type, metadata, Scope::Property, stack)?;
        let Some(field) = metadata else {
            return Ok(node);
        };

        if let Some(default) = field.default_value().and_then(coerce_default) {
            node.insert("default".to_string(), default);
        }

        if let ValueType::Array(_) = value_type {
            if let Some(min) = field.array_min_items() {
                node.insert("minItems".to_string(), Value::from(min));
            }
            if let Some(max) = field.array_max_items() {
                node.insert("maxItems".to_string(), Value::from(max));
            }
            if field.has_unique_items() {
                node.insert("uniqueItems".to_string(), Value::Bool(true));
            }
        }

        if let ValueType::Enum(enum_type) = value_type.element() {
            let labels: Vec<Value> = field
                .enum_display_values()
                .iter()
                .take(enum_type.values().len())
                .map(|label| Value::String(label.clone()))
                .collect();
            if !labels.is_empty() {
                node.insert(ENUM_NAMES_ATTRIBUTE.to_string(), Value::Array(labels));
            }
        }

        if field.is_read_only() {
            node.insert("readOnly".to_string(), Value::Bool(true));
        }
        if field.is_write_only() {
            node.insert("writeOnly".to_string(), Value::Bool(true));
        }

        for attribute in field.custom_attributes() {
            if RESERVED_ATTRIBUTES.contains(&attribute.name.as_str()) {
                warn!("Skipping custom attribute {}: reserved schema keyword", attribute.name);
                continue;
            }
            node.insert(attribute.name.clone(), Value::String(attribute.value.clone()));
        }

        Ok(node)
    }

    fn value_schema(
        &self,
        value_type: &ValueType,
        metadata: Option<&ConfigField>,
        scope: Scope,
        stack: &mut Vec<Visit>,
    ) -> Result<Map<String, Value>> {
        let mut node = match value_type {
            ValueType::Object(object) => self.object_schema(&object.describe(), object.key(), stack)?,
            ValueType::Array(item) => {
                let mut node = type_node("array");
                let items = self.value_schema(item, metadata, Scope::ContainerItem, stack)?;
                node.insert("items".to_string(), Value::Object(items));
                node
            }
            ValueType::Enum(enum_type) => {
                let mut node = type_node("string");
                let values = enum_type.values().iter().cloned().map(Value::String).collect();
                node.insert("enum".to_string(), Value::Array(values));
                node
            }
            ValueType::String => type_node("string"),
            ValueType::Integer => type_node("integer"),
            ValueType::Number => type_node("number"),
            ValueType::Boolean => type_node("boolean"),
        };

        let Some(field) = metadata else {
            return Ok(node);
        };

        if scope == Scope::Property {
            if let Some(title) = non_blank(field.title()) {
                node.insert("title".to_string(), Value::String(title.to_string()));
            }
            if let Some(description) = non_blank(field.description()) {
                node.insert("description".to_string(), Value::String(description.to_string()));
            }
        }

        match value_type {
            ValueType::String => apply_string_constraints(&mut node, field),
            ValueType::Integer => apply_numeric_constraints(&mut node, field, true),
            ValueType::Number => apply_numeric_constraints(&mut node, field, false),
            _ => {}
        }

        Ok(node)
    }
}

fn type_node(name: &str) -> Map<String, Value> {
    let mut node = Map::new();
    node.insert("type".to_string(), Value::String(name.to_string()));
    node
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn apply_string_constraints(node: &mut Map<String, Value>, field: &ConfigField) {
    if field.format().is_specified() {
        node.insert("format".to_string(), Value::String(field.format().as_str().to_string()));
    }
    if let Some(min) = field.string_min_length() {
        node.insert("minLength".to_string(), Value::from(min));
    }
    if let Some(max) = field.string_max_length() {
        node.insert("maxLength".to_string(), Value::from(max));
    }
    if let Some(pattern) = non_blank(field.string_pattern()) {
        node.insert("pattern".to_string(), Value::String(pattern.to_string()));
    }
    if !field.allowed_values().is_empty() && !node.contains_key("enum") {
        let values = field.allowed_values().iter().cloned().map(Value::String).collect();
        node.insert("enum".to_string(), Value::Array(values));
    }
}

fn apply_numeric_constraints(node: &mut Map<String, Value>, field: &ConfigField, integral: bool) {
    if let Some(min) = field.number_min().and_then(|v| bound(v, integral)) {
        node.insert("minimum".to_string(), min);
    }
    if let Some(max) = field.number_max().and_then(|v| bound(v, integral)) {
        node.insert("maximum".to_string(), max);
    }
    if let Some(step) = field.multiple_of().filter(|v| *v != 0.0).and_then(|v| bound(v, integral)) {
        node.insert("multipleOf".to_string(), step);
    }
}

/// Numeric bound as JSON; integral values on integer nodes are written without a fraction
fn bound(value: f64, integral: bool) -> Option<Value> {
    if !value.is_finite() {
        return None;
    }
    if integral && value.fract() == 0.0 && value.abs() <= MAX_EXACT_INTEGER {
        return Some(Value::from(value as i64));
    }
    Number::from_f64(value).map(Value::Number)
}

/// Coerce a default literal: boolean, then integer, then finite float, else string
pub fn coerce_default(raw: &str) -> Option<Value> {
    if raw.is_empty() {
        return None;
    }

    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("true") {
        return Some(Value::Bool(true));
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return Some(Value::Bool(false));
    }
    if let Ok(integer) = raw.parse::<i64>() {
        return Some(Value::from(integer));
    }
    if let Some(number) = trimmed.parse::<f64>().ok().and_then(Number::from_f64) {
        return Some(Value::Number(number));
    }
    Some(Value::String(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use edgeflow_adapters::config_type::{ConfigEnum, ConfigProperty, EnumType};
    use edgeflow_adapters::field::FieldFormat;
    use serde_json::json;

    fn schema(config_type: ConfigType) -> Value {
        SchemaGenerator::new().generate(&config_type).unwrap()
    }

    fn mode() -> ValueType {
        ValueType::Enum(EnumType::new("Mode", ["A", "B", "C"]))
    }

    #[test]
    fn test_required_string_property() {
        let ty = ConfigType::new("Simple").field("name", ValueType::String, ConfigField::new().required());
        assert_eq!(
            schema(ty),
            json!({
                "$schema": SCHEMA_DIALECT,
                "type": "object",
                "properties": { "name": { "type": "string" } },
                "required": ["name"]
            })
        );
    }

    #[test]
    fn test_no_metadata_emits_no_constraints() {
        let ty = ConfigType::new("Bare")
            .property(ConfigProperty::new("host", ValueType::String))
            .property(ConfigProperty::new("port", ValueType::Integer))
            .property(ConfigProperty::new("ratio", ValueType::Number))
            .property(ConfigProperty::new("enabled", ValueType::Boolean));
        assert_eq!(
            schema(ty),
            json!({
                "$schema": SCHEMA_DIALECT,
                "type": "object",
                "properties": {
                    "host": { "type": "string" },
                    "port": { "type": "integer" },
                    "ratio": { "type": "number" },
                    "enabled": { "type": "boolean" }
                }
            })
        );
    }

    #[test]
    fn test_empty_type_has_no_properties_key() {
        assert_eq!(
            schema(ConfigType::new("Empty")),
            json!({ "$schema": SCHEMA_DIALECT, "type": "object" })
        );
    }

    #[test]
    fn test_properties_keep_declaration_order() {
        let ty = ConfigType::new("Ordered")
            .property(ConfigProperty::new("zeta", ValueType::String))
            .property(ConfigProperty::new("alpha", ValueType::String))
            .property(ConfigProperty::new("mid", ValueType::String));
        let doc = schema(ty);
        let keys: Vec<&String> = doc["properties"].as_object().unwrap().keys().collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
        let top: Vec<&String> = doc.as_object().unwrap().keys().collect();
        assert_eq!(top, ["$schema", "type", "properties"]);
    }

    #[test]
    fn test_ignored_property_is_absent() {
        let ty = ConfigType::new("Secret")
            .field("visible", ValueType::String, ConfigField::new().required())
            .field("hidden", ValueType::String, ConfigField::new().required().ignored());
        let doc = schema(ty);
        assert!(doc["properties"].get("hidden").is_none());
        assert_eq!(doc["required"], json!(["visible"]));

        let only_hidden = ConfigType::new("Hidden").field("hidden", ValueType::Integer, ConfigField::new().ignored());
        assert_eq!(
            schema(only_hidden),
            json!({ "$schema": SCHEMA_DIALECT, "type": "object" })
        );
    }

    #[test]
    fn test_numeric_minimum() {
        let ty = ConfigType::new("Numbers")
            .field("unset", ValueType::Integer, ConfigField::new().with_title("Unset"))
            .field("port", ValueType::Integer, ConfigField::new().with_number_min(1.0))
            .field("ratio", ValueType::Number, ConfigField::new().with_number_range(0.5, 1.0))
            .field("zero", ValueType::Integer, ConfigField::new().with_number_min(0.0));
        let doc = schema(ty);
        assert!(doc["properties"]["unset"].get("minimum").is_none());
        assert_eq!(doc["properties"]["port"]["minimum"], json!(1));
        assert_eq!(doc["properties"]["ratio"]["minimum"], json!(0.5));
        assert_eq!(doc["properties"]["ratio"]["maximum"], json!(1.0));
        assert_eq!(doc["properties"]["zero"]["minimum"], json!(0));
    }

    #[test]
    fn test_multiple_of_and_non_finite_bounds() {
        let ty = ConfigType::new("Steps")
            .field("step", ValueType::Number, ConfigField::new().with_multiple_of(0.25))
            .field("no_step", ValueType::Number, ConfigField::new().with_multiple_of(0.0))
            .field("inf", ValueType::Number, ConfigField::new().with_number_max(f64::INFINITY));
        let doc = schema(ty);
        assert_eq!(doc["properties"]["step"]["multipleOf"], json!(0.25));
        assert!(doc["properties"]["no_step"].get("multipleOf").is_none());
        assert!(doc["properties"]["inf"].get("maximum").is_none());
    }

    #[test]
    fn test_numeric_bounds_ignored_on_strings() {
        let ty = ConfigType::new("Mixed").field(
            "name",
            ValueType::String,
            ConfigField::new()
                .with_number_min(3.0)
                .with_string_min_length(2)
                .with_string_max_length(8)
                .with_string_pattern("^[a-z]+$"),
        );
        let doc = schema(ty);
        assert_eq!(
            doc["properties"]["name"],
            json!({ "type": "string", "minLength": 2, "maxLength": 8, "pattern": "^[a-z]+$" })
        );
    }

    #[test]
    fn test_blank_title_and_pattern_are_absent() {
        let ty = ConfigType::new("Blank").field(
            "name",
            ValueType::String,
            ConfigField::new()
                .with_title("   ")
                .with_description("")
                .with_string_pattern(" "),
        );
        assert_eq!(schema(ty)["properties"]["name"], json!({ "type": "string" }));
    }

    #[test]
    fn test_format_applies_to_string_nodes() {
        let ty = ConfigType::new("Formats")
            .field("host", ValueType::String, ConfigField::new().with_format(FieldFormat::Hostname))
            .field("count", ValueType::Integer, ConfigField::new().with_format(FieldFormat::Hostname))
            .field(
                "topics",
                ValueType::array(ValueType::String),
                ConfigField::new().with_format(FieldFormat::MqttTopic),
            );
        let doc = schema(ty);
        assert_eq!(doc["properties"]["host"]["format"], "hostname");
        assert!(doc["properties"]["count"].get("format").is_none());
        assert!(doc["properties"]["topics"].get("format").is_none());
        assert_eq!(doc["properties"]["topics"]["items"]["format"], "mqtt-topic");
    }

    #[test]
    fn test_default_coercion() {
        assert_eq!(coerce_default(" TRUE "), Some(json!(true)));
        assert_eq!(coerce_default("False"), Some(json!(false)));
        assert_eq!(coerce_default("42"), Some(json!(42)));
        assert_eq!(coerce_default("-7"), Some(json!(-7)));
        assert_eq!(coerce_default("1.5"), Some(json!(1.5)));
        assert_eq!(coerce_default("abc"), Some(json!("abc")));
        assert_eq!(coerce_default("NaN"), Some(json!("NaN")));
        assert_eq!(coerce_default(""), None);

        let ty = ConfigType::new("Defaults")
            .field("port", ValueType::Integer, ConfigField::new().with_default("502"))
            .field("empty", ValueType::String, ConfigField::new().with_default(""));
        let doc = schema(ty);
        assert_eq!(doc["properties"]["port"]["default"], json!(502));
        assert!(doc["properties"]["empty"].get("default").is_none());
    }

    #[test]
    fn test_read_and_write_only() {
        let ty = ConfigType::new("Access")
            .field("token", ValueType::String, ConfigField::new().write_only())
            .field("status", ValueType::String, ConfigField::new().read_only())
            .field("plain", ValueType::String, ConfigField::new());
        let doc = schema(ty);
        assert_eq!(doc["properties"]["token"]["writeOnly"], json!(true));
        assert_eq!(doc["properties"]["status"]["readOnly"], json!(true));
        assert_eq!(doc["properties"]["plain"], json!({ "type": "string" }));
    }

    #[test]
    fn test_enum_node() {
        let ty = ConfigType::new("Enums").field("mode", mode(), ConfigField::new());
        assert_eq!(
            schema(ty)["properties"]["mode"],
            json!({ "type": "string", "enum": ["A", "B", "C"] })
        );
    }

    #[test]
    fn test_enum_names_alignment() {
        let ty = ConfigType::new("Labels")
            .field(
                "exact",
                mode(),
                ConfigField::new().with_enum_display_values(["Alpha", "Beta", "Gamma"]),
            )
            .field("short", mode(), ConfigField::new().with_enum_display_values(["Alpha"]))
            .field(
                "long",
                mode(),
                ConfigField::new().with_enum_display_values(["Alpha", "Beta", "Gamma", "Delta"]),
            )
            .field("not_enum", ValueType::String, ConfigField::new().with_enum_display_values(["X"]));
        let doc = schema(ty);
        assert_eq!(doc["properties"]["exact"]["enumNames"], json!(["Alpha", "Beta", "Gamma"]));
        assert_eq!(doc["properties"]["short"]["enumNames"], json!(["Alpha"]));
        assert_eq!(doc["properties"]["long"]["enumNames"], json!(["Alpha", "Beta", "Gamma"]));
        assert!(doc["properties"]["not_enum"].get("enumNames").is_none());
    }

    #[test]
    fn test_enum_array_labels_on_property_node() {
        let ty = ConfigType::new("Modes").field(
            "modes",
            ValueType::array(mode()),
            ConfigField::new()
                .with_title("Modes")
                .with_enum_display_values(["Alpha", "Beta"])
                .unique_items(),
        );
        assert_eq!(
            schema(ty)["properties"]["modes"],
            json!({
                "type": "array",
                "items": { "type": "string", "enum": ["A", "B", "C"] },
                "title": "Modes",
                "uniqueItems": true,
                "enumNames": ["Alpha", "Beta"]
            })
        );
    }

    #[test]
    fn test_array_items_do_not_repeat_title() {
        let ty = ConfigType::new("Lists").field(
            "hosts",
            ValueType::array(ValueType::String),
            ConfigField::new()
                .with_title("Hosts")
                .with_description("Hosts to poll")
                .with_string_max_length(255)
                .with_array_min_items(1)
                .with_array_max_items(10),
        );
        assert_eq!(
            schema(ty)["properties"]["hosts"],
            json!({
                "type": "array",
                "items": { "type": "string", "maxLength": 255 },
                "title": "Hosts",
                "description": "Hosts to poll",
                "minItems": 1,
                "maxItems": 10
            })
        );
    }

    #[test]
    fn test_unique_items_only_when_true() {
        let ty = ConfigType::new("Lists").field("ids", ValueType::array(ValueType::Integer), ConfigField::new());
        assert!(schema(ty)["properties"]["ids"].get("uniqueItems").is_none());
    }

    #[test]
    fn test_allowed_values_become_enum() {
        let ty = ConfigType::new("Units").field(
            "unit",
            ValueType::String,
            ConfigField::new().with_allowed_values(["bar", "psi"]),
        );
        assert_eq!(
            schema(ty)["properties"]["unit"],
            json!({ "type": "string", "enum": ["bar", "psi"] })
        );
    }

    #[test]
    fn test_custom_attributes() {
        let ty = ConfigType::new("Custom").field(
            "port",
            ValueType::Integer,
            ConfigField::new()
                .with_title("Port")
                .with_custom_attribute("x-widget", "updown")
                .with_custom_attribute("x-widget", "slider")
                .with_custom_attribute("type", "string")
                .with_custom_attribute("title", "Overridden"),
        );
        assert_eq!(
            schema(ty)["properties"]["port"],
            json!({ "type": "integer", "title": "Overridden", "x-widget": "slider" })
        );
    }

    #[test]
    fn test_accessor_metadata_is_authoritative() {
        let ty = ConfigType::new("Accessor").property(
            ConfigProperty::new("port", ValueType::Integer)
                .with_field(ConfigField::new().with_title("Field").required())
                .with_accessor(ConfigField::new().with_title("Accessor")),
        );
        let doc = schema(ty);
        assert_eq!(doc["properties"]["port"]["title"], "Accessor");
        assert!(doc.get("required").is_none());
    }

    #[test]
    fn test_rename_is_respected() {
        let ty = ConfigType::new("Renamed").property(
            ConfigProperty::new("poll_interval", ValueType::Integer)
                .renamed("pollingIntervalMillis")
                .with_field(ConfigField::new().required()),
        );
        let doc = schema(ty);
        assert!(doc["properties"].get("pollingIntervalMillis").is_some());
        assert_eq!(doc["required"], json!(["pollingIntervalMillis"]));
    }

    struct Endpoint;

    impl AdapterConfig for Endpoint {
        fn config_type() -> ConfigType {
            ConfigType::new("Endpoint")
                .field("url", ValueType::String, ConfigField::new().with_format(FieldFormat::Uri).required())
        }
    }

    struct Connection;

    impl AdapterConfig for Connection {
        fn config_type() -> ConfigType {
            ConfigType::new("Connection")
                .field(
                    "primary",
                    ValueType::object::<Endpoint>(),
                    ConfigField::new().with_title("Primary endpoint"),
                )
                .field("fallbacks", ValueType::array(ValueType::object::<Endpoint>()), ConfigField::new())
        }
    }

    #[test]
    fn test_nested_objects() {
        let doc = SchemaGenerator::new().generate_for::<Connection>().unwrap();
        let endpoint = json!({
            "type": "object",
            "properties": { "url": { "type": "string", "format": "uri" } },
            "required": ["url"]
        });
        let mut primary = endpoint.clone();
        primary["title"] = json!("Primary endpoint");
        assert_eq!(doc["properties"]["primary"], primary);
        assert_eq!(doc["properties"]["fallbacks"]["items"], endpoint);
        assert!(doc["properties"]["primary"].get("$schema").is_none());
    }

    struct Tree;

    impl AdapterConfig for Tree {
        fn config_type() -> ConfigType {
            ConfigType::new("Tree").field(
                "children",
                ValueType::array(ValueType::object::<Tree>()),
                ConfigField::new(),
            )
        }
    }

    #[test]
    fn test_cycle_is_reported() {
        let err = SchemaGenerator::new().generate_for::<Tree>().unwrap_err();
        assert_eq!(
            err,
            SchemaError::CyclicType {
                type_name: "Tree".into(),
                path: "Tree -> Tree".into(),
            }
        );
    }

    #[test]
    fn test_shared_type_is_not_a_cycle() {
        struct Pair;

        impl AdapterConfig for Pair {
            fn config_type() -> ConfigType {
                ConfigType::new("Pair")
                    .field("left", ValueType::object::<Endpoint>(), ConfigField::new())
                    .field("right", ValueType::object::<Endpoint>(), ConfigField::new())
            }
        }

        assert!(SchemaGenerator::new().generate_for::<Pair>().is_ok());
    }

    #[test]
    fn test_cycle_through_untyped_root_is_reported() {
        let root = ConfigType::new("Forest").field("tree", ValueType::object::<Tree>(), ConfigField::new());
        let err = SchemaGenerator::new().generate(&root).unwrap_err();
        assert_eq!(
            err,
            SchemaError::CyclicType {
                type_name: "Tree".into(),
                path: "Forest -> Tree -> Tree".into(),
            }
        );
    }

    #[test]
    fn test_types_sharing_a_name_are_not_a_cycle() {
        struct Inner;

        impl AdapterConfig for Inner {
            fn config_type() -> ConfigType {
                ConfigType::new("Config").field("port", ValueType::Integer, ConfigField::new())
            }
        }

        struct Outer;

        impl AdapterConfig for Outer {
            fn config_type() -> ConfigType {
                ConfigType::new("Config").field("inner", ValueType::object::<Inner>(), ConfigField::new())
            }
        }

        let doc = SchemaGenerator::new().generate_for::<Outer>().unwrap();
        assert_eq!(doc["properties"]["inner"]["properties"]["port"], json!({ "type": "integer" }));

        let doc = SchemaGenerator::new().generate(&Outer::config_type()).unwrap();
        assert_eq!(doc["properties"]["inner"]["type"], "object");
    }

    #[test]
    fn test_ignored_property_is_absent_from_nested_objects() {
        struct Credentials;

        impl AdapterConfig for Credentials {
            fn config_type() -> ConfigType {
                ConfigType::new("Credentials")
                    .field("user", ValueType::String, ConfigField::new().required())
                    .field("password", ValueType::String, ConfigField::new().required().ignored())
            }
        }

        struct Client;

        impl AdapterConfig for Client {
            fn config_type() -> ConfigType {
                ConfigType::new("Client")
                    .field("login", ValueType::object::<Credentials>(), ConfigField::new())
                    .field(
                        "fallbacks",
                        ValueType::array(ValueType::object::<Credentials>()),
                        ConfigField::new(),
                    )
            }
        }

        let doc = SchemaGenerator::new().generate_for::<Client>().unwrap();
        for nested in [&doc["properties"]["login"], &doc["properties"]["fallbacks"]["items"]] {
            assert_eq!(nested["type"], "object");
            assert!(nested["properties"].get("password").is_none());
            assert!(nested["properties"].get("user").is_some());
            assert_eq!(nested["required"], json!(["user"]));
        }
    }

    #[test]
    fn test_duplicate_property_is_reported() {
        let ty = ConfigType::new("Dup")
            .property(ConfigProperty::new("port", ValueType::Integer))
            .property(ConfigProperty::new("port_number", ValueType::Integer).renamed("port"));
        let err = SchemaGenerator::new().generate(&ty).unwrap_err();
        assert_eq!(
            err,
            SchemaError::DuplicateProperty {
                type_name: "Dup".into(),
                property: "port".into(),
            }
        );
    }

    #[test]
    fn test_ignored_duplicate_is_allowed() {
        let ty = ConfigType::new("Dup")
            .property(ConfigProperty::new("port", ValueType::Integer))
            .property(
                ConfigProperty::new("legacy_port", ValueType::Integer)
                    .renamed("port")
                    .with_field(ConfigField::new().ignored()),
            );
        assert!(SchemaGenerator::new().generate(&ty).is_ok());
    }

    struct Parity;

    impl ConfigEnum for Parity {
        fn enum_type() -> EnumType {
            EnumType::new("Parity", ["NONE", "EVEN", "ODD"])
        }
    }

    #[test]
    fn test_generation_is_deterministic() {
        let build = || {
            ConfigType::new("Serial")
                .field(
                    "parity",
                    ValueType::enumeration::<Parity>(),
                    ConfigField::new()
                        .with_default("NONE")
                        .with_enum_display_values(["None", "Even", "Odd"]),
                )
                .field("baud", ValueType::Integer, ConfigField::new().with_default("9600").required())
                .field("endpoint", ValueType::object::<Endpoint>(), ConfigField::new())
        };
        let generator = SchemaGenerator::new();
        let first = serde_json::to_string(&generator.generate(&build()).unwrap()).unwrap();
        let second = serde_json::to_string(&generator.generate(&build()).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test_log::test]
    fn test_generation_inside_component_span() {
        let span = edgeflow_core::logging::component_span("schema-generator", None);
        let generator = SchemaGenerator::with_span(span);
        let doc = generator.generate_for::<Endpoint>().unwrap();
        assert_eq!(doc["$schema"], SCHEMA_DIALECT);
    }
}

/*!
 * Adapter type descriptors.
 *
 * An [`AdapterDescriptor`] is the wire record of one adapter type: its
 * identity and presentation metadata, capabilities, the generated
 * configuration schema and the optional UI schema.
 */
use std::collections::BTreeSet;

use edgeflow_adapters::factory::ProtocolAdapterFactory;
use edgeflow_adapters::information::{AdapterCapability, AdapterCategory, AdapterTag};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::DescriptorError;
use crate::generator::SchemaGenerator;

/// Description of one adapter type as served to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdapterDescriptor {
    /// Protocol id
    pub id: String,
    /// Protocol name
    pub protocol: String,
    /// Display name
    pub name: String,
    /// Description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Documentation link
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Adapter version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Logo location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    /// Author or vendor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Category
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<AdapterCategory>,
    /// Tags
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<AdapterTag>>,
    /// Capabilities
    pub capabilities: BTreeSet<AdapterCapability>,
    /// JSON Schema of the northbound configuration
    pub config_schema: Value,
    /// UI schema for the configuration editor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ui_schema: Option<Value>,
}

/// Builds [`AdapterDescriptor`]s from factories
#[derive(Debug, Clone, Default)]
pub struct DescriptorBuilder {
    generator: SchemaGenerator,
}

impl DescriptorBuilder {
    /// Create a builder with a default schema generator
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder using the given schema generator
    pub fn with_generator(generator: SchemaGenerator) -> Self {
        Self { generator }
    }

    /// Describe the adapter type of a factory
    pub fn build(&self, factory: &dyn ProtocolAdapterFactory) -> Result<AdapterDescriptor, DescriptorError> {
        let info = factory.information();

        let id = non_blank(info.protocol_id(), "protocol id")?;
        let protocol = non_blank(info.protocol_name(), "protocol name")?;
        let name = non_blank(info.display_name(), "display name")?;

        let config_schema = self.generator.generate(&info.configuration_type_northbound())?;
        let ui_schema = parse_ui_schema(id, info.ui_schema());

        debug!("Built descriptor for adapter type {}", id);
        Ok(AdapterDescriptor {
            id: id.to_string(),
            protocol: protocol.to_string(),
            name: name.to_string(),
            description: info.description().map(str::to_string),
            url: info.url().map(str::to_string),
            version: info.version().map(str::to_string),
            logo_url: info.logo_url().map(str::to_string),
            author: info.author().map(str::to_string),
            category: info.category(),
            tags: info.tags(),
            capabilities: info.capabilities(),
            config_schema,
            ui_schema,
        })
    }
}

impl DescriptorBuilder {
    /// JSON Schema of one tag of the factory's adapter type
    pub fn tag_schema(&self, factory: &dyn ProtocolAdapterFactory) -> Result<Value, DescriptorError> {
        let info = factory.information();
        let id = non_blank(info.protocol_id(), "protocol id")?;
        let schema = self.generator.generate(&info.tag_configuration_type())?;
        debug!("Built tag schema for adapter type {}", id);
        Ok(schema)
    }
}

fn non_blank<'a>(value: &'a str, field: &'static str) -> Result<&'a str, DescriptorError> {
    if value.trim().is_empty() {
        Err(DescriptorError::MissingField(field))
    } else {
        Ok(value)
    }
}

fn parse_ui_schema(protocol_id: &str, raw: Option<&str>) -> Option<Value> {
    let raw = raw.filter(|raw| !raw.trim().is_empty())?;
    match serde_json::from_str(raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Failed to parse UI schema for adapter {}: {}", protocol_id, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use edgeflow_adapters::adapter::{AdapterError, ProtocolAdapter};
    use edgeflow_adapters::adapters::SimulationAdapterFactory;
    use edgeflow_adapters::config_type::{ConfigProperty, ConfigType, ValueType};
    use edgeflow_adapters::factory::AdapterFactoryInput;
    use edgeflow_adapters::information::AdapterInformation;
    use serde_json::json;

    struct Info {
        id: &'static str,
        ui_schema: Option<&'static str>,
        config_type: fn() -> ConfigType,
    }

    impl AdapterInformation for Info {
        fn protocol_id(&self) -> &str {
            self.id
        }

        fn protocol_name(&self) -> &str {
            "Test Protocol"
        }

        fn display_name(&self) -> &str {
            "Test Adapter"
        }

        fn configuration_type_northbound(&self) -> ConfigType {
            (self.config_type)()
        }

        fn ui_schema(&self) -> Option<&str> {
            self.ui_schema
        }
    }

    struct Factory(Arc<Info>);

    impl ProtocolAdapterFactory for Factory {
        fn information(&self) -> Arc<dyn AdapterInformation> {
            self.0.clone()
        }

        fn create_adapter(&self, _input: AdapterFactoryInput) -> edgeflow_adapters::adapter::Result<Box<dyn ProtocolAdapter>> {
            Err(AdapterError::Unsupported("descriptor test".into()))
        }
    }

    fn empty_config() -> ConfigType {
        ConfigType::new("Empty")
    }

    fn factory(id: &'static str, ui_schema: Option<&'static str>) -> Factory {
        Factory(Arc::new(Info {
            id,
            ui_schema,
            config_type: empty_config,
        }))
    }

    #[test]
    fn test_simulation_descriptor() {
        let descriptor = DescriptorBuilder::new().build(&SimulationAdapterFactory::new()).unwrap();
        assert_eq!(descriptor.id, "simulation");
        assert_eq!(descriptor.protocol, "Simulation");
        assert_eq!(descriptor.name, "Simulated Edge Device");

        let json = serde_json::to_value(&descriptor).unwrap();
        assert_eq!(json["category"], "SIMULATION");
        assert_eq!(json["tags"], json!(["IOT", "IIOT"]));
        assert_eq!(json["capabilities"], json!(["READ", "DISCOVER"]));
        assert_eq!(json["configSchema"]["$schema"], crate::generator::SCHEMA_DIALECT);
        assert_eq!(json["configSchema"]["required"], json!(["id"]));
        assert_eq!(
            json["configSchema"]["properties"]["tags"]["items"]["properties"]["waveform"]["type"],
            "string"
        );
        assert_eq!(
            json["configSchema"]["properties"]["tags"]["items"]["properties"]["waveform"]["enumNames"],
            json!(["Sine wave", "Sawtooth", "Square wave", "Constant"])
        );
        assert!(json["uiSchema"]["ui:order"].is_array());
        assert!(json.get("url").is_none());
        assert!(json.get("logoUrl").is_none());
    }

    #[test]
    fn test_tag_schemas() {
        let builder = DescriptorBuilder::new();

        let schema = builder.tag_schema(&SimulationAdapterFactory::new()).unwrap();
        assert_eq!(schema["required"], json!(["name"]));
        assert_eq!(schema["properties"]["waveform"]["default"], "SINE");
        assert_eq!(schema["properties"]["name"]["format"], "mqtt-tag");

        let schema = builder.tag_schema(&factory("minimal", None)).unwrap();
        assert_eq!(schema["type"], "object");
        assert!(schema.get("properties").is_none());
        assert!(schema.get("required").is_none());
    }

    #[test]
    fn test_minimal_descriptor_omits_optionals() {
        let descriptor = DescriptorBuilder::new().build(&factory("minimal", None)).unwrap();
        let json = serde_json::to_value(&descriptor).unwrap();
        let keys: Vec<&String> = json.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["id", "protocol", "name", "capabilities", "configSchema"]);
        assert_eq!(json["capabilities"], json!(["READ", "DISCOVER"]));
    }

    #[test]
    fn test_blank_identity_is_rejected() {
        let err = DescriptorBuilder::new().build(&factory("  ", None)).unwrap_err();
        assert_eq!(err, DescriptorError::MissingField("protocol id"));
    }

    #[test_log::test]
    fn test_invalid_ui_schema_is_dropped() {
        let descriptor = DescriptorBuilder::new()
            .build(&factory("broken", Some("{ not json")))
            .unwrap();
        assert_eq!(descriptor.ui_schema, None);

        let descriptor = DescriptorBuilder::new().build(&factory("blank", Some("  \n"))).unwrap();
        assert_eq!(descriptor.ui_schema, None);

        let descriptor = DescriptorBuilder::new()
            .build(&factory("valid", Some(r#"{"ui:tabs": []}"#)))
            .unwrap();
        assert_eq!(descriptor.ui_schema, Some(json!({"ui:tabs": []})));
    }

    #[test]
    fn test_schema_error_is_propagated() {
        fn duplicated() -> ConfigType {
            ConfigType::new("Dup")
                .property(ConfigProperty::new("a", ValueType::String))
                .property(ConfigProperty::new("b", ValueType::String).renamed("a"))
        }

        let factory = Factory(Arc::new(Info {
            id: "dup",
            ui_schema: None,
            config_type: duplicated,
        }));
        let err = DescriptorBuilder::new().build(&factory).unwrap_err();
        assert!(matches!(err, DescriptorError::Schema(_)));
    }

    #[test]
    fn test_descriptor_round_trips_through_serde() {
        let descriptor = DescriptorBuilder::new().build(&SimulationAdapterFactory::new()).unwrap();
        let json = serde_json::to_string(&descriptor).unwrap();
        let parsed: AdapterDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, descriptor);
    }
}

/*!
 * Simulation adapter.
 *
 * Produces deterministic waveforms for a configurable set of tags. It needs no
 * external system, which makes it the reference adapter type for hosts and
 * for the adapter-type server.
 */
use std::collections::BTreeSet;
use std::f64::consts::PI;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::adapter::{
    AdapterError, AdapterState, ConnectionStatus, DiscoveredNode, DiscoveryInput, DiscoveryOutput, NodeType,
    PollingInput, PollingOutput, PollingProtocolAdapter, ProtocolAdapter, Result, RuntimeStatus, StartInput,
    StartOutput, StopInput, StopOutput,
};
use crate::config_type::{AdapterConfig, ConfigEnum, ConfigProperty, ConfigType, EnumType, ValueType};
use crate::factory::{AdapterFactoryInput, ProtocolAdapterFactory};
use crate::field::{ConfigField, FieldFormat};
use crate::information::{AdapterCapability, AdapterCategory, AdapterInformation, AdapterTag};
use crate::tag::Tag;

/// Protocol id of the simulation adapter type
pub const PROTOCOL_ID: &str = "simulation";

const UI_SCHEMA: &str = r#"{
  "ui:order": ["id", "pollingIntervalMillis", "maxPollingErrorsBeforeRemoval", "minValue", "maxValue", "periodSteps", "tags", "*"],
  "id": { "ui:disabled": false },
  "tags": {
    "items": {
      "ui:order": ["name", "waveform", "unit", "*"]
    }
  }
}"#;

/// Shape of a simulated signal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Waveform {
    /// Sine between the configured bounds
    #[default]
    Sine,
    /// Linear ramp from minimum to maximum
    Sawtooth,
    /// Alternates between maximum and minimum
    Square,
    /// Midpoint of the bounds
    Constant,
}

impl Waveform {
    /// Value of the waveform at `phase` (0..1) within `[min, max]`
    pub fn sample(&self, phase: f64, min: f64, max: f64) -> f64 {
        let span = max - min;
        match self {
            Waveform::Sine => min + span * (0.5 + 0.5 * (2.0 * PI * phase).sin()),
            Waveform::Sawtooth => min + span * phase,
            Waveform::Square => {
                if phase < 0.5 {
                    max
                } else {
                    min
                }
            }
            Waveform::Constant => min + span / 2.0,
        }
    }
}

impl ConfigEnum for Waveform {
    fn enum_type() -> EnumType {
        EnumType::new("Waveform", ["SINE", "SAWTOOTH", "SQUARE", "CONSTANT"])
    }
}

/// Where a simulated tag gets its values from
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationTagDefinition {
    /// Signal shape
    #[serde(default)]
    pub waveform: Waveform,
    /// Engineering unit
    #[serde(default)]
    pub unit: Option<String>,
}

/// One simulated tag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationTag {
    /// Tag name
    pub name: String,
    /// Free text description
    #[serde(default)]
    pub description: Option<String>,
    /// Signal definition, inlined on the wire
    #[serde(flatten)]
    pub definition: SimulationTagDefinition,
}

impl Tag for SimulationTag {
    type Definition = SimulationTagDefinition;

    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    fn definition(&self) -> &SimulationTagDefinition {
        &self.definition
    }
}

impl AdapterConfig for SimulationTag {
    fn config_type() -> ConfigType {
        ConfigType::new("SimulationTag")
            .field(
                "name",
                ValueType::String,
                ConfigField::new()
                    .with_title("Tag name")
                    .with_description("Name the simulated values are published under")
                    .with_format(FieldFormat::MqttTag)
                    .with_string_min_length(1)
                    .with_string_max_length(256)
                    .required(),
            )
            .field(
                "description",
                ValueType::String,
                ConfigField::new()
                    .with_title("Description")
                    .with_description("A human readable description of the tag"),
            )
            .field(
                "waveform",
                ValueType::enumeration::<Waveform>(),
                ConfigField::new()
                    .with_title("Waveform")
                    .with_description("Shape of the generated signal")
                    .with_default("SINE")
                    .with_enum_display_values(["Sine wave", "Sawtooth", "Square wave", "Constant"]),
            )
            .field(
                "unit",
                ValueType::String,
                ConfigField::new()
                    .with_title("Unit")
                    .with_allowed_values(["celsius", "percent", "bar", "rpm"]),
            )
    }
}

/// Configuration of a simulation adapter instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationAdapterConfig {
    /// Adapter instance identifier
    pub id: String,
    /// Interval between polls
    #[serde(default = "default_polling_interval")]
    pub polling_interval_millis: u64,
    /// Failed polls before the host gives up, -1 for never
    #[serde(default = "default_max_polling_errors")]
    pub max_polling_errors_before_removal: i32,
    /// Lower bound of generated values
    #[serde(default)]
    pub min_value: f64,
    /// Upper bound of generated values
    #[serde(default = "default_max_value")]
    pub max_value: f64,
    /// Polls per waveform period
    #[serde(default = "default_period_steps")]
    pub period_steps: u32,
    /// Simulated tags
    #[serde(default)]
    pub tags: Vec<SimulationTag>,
}

fn default_polling_interval() -> u64 {
    1000
}

fn default_max_polling_errors() -> i32 {
    10
}

fn default_max_value() -> f64 {
    1000.0
}

fn default_period_steps() -> u32 {
    60
}

impl AdapterConfig for SimulationAdapterConfig {
    fn config_type() -> ConfigType {
        ConfigType::new("SimulationAdapterConfig")
            .field(
                "id",
                ValueType::String,
                ConfigField::new()
                    .with_title("Identifier")
                    .with_description("Unique identifier for this protocol adapter")
                    .with_format(FieldFormat::Identifier)
                    .with_string_pattern("^([a-zA-Z_0-9-_])*$")
                    .with_string_min_length(1)
                    .with_string_max_length(1024)
                    .required(),
            )
            .property(
                ConfigProperty::new("polling_interval_millis", ValueType::Integer)
                    .renamed("pollingIntervalMillis")
                    .with_field(
                        ConfigField::new()
                            .with_title("Polling interval [ms]")
                            .with_description("Time in millisecond that this endpoint will be polled")
                            .with_default("1000")
                            .with_number_range(1.0, 86_400_000.0)
                            .with_custom_attribute("x-unit", "ms"),
                    ),
            )
            .property(
                ConfigProperty::new("max_polling_errors_before_removal", ValueType::Integer)
                    .renamed("maxPollingErrorsBeforeRemoval")
                    .with_field(
                        ConfigField::new()
                            .with_title("Max. polling errors")
                            .with_description(
                                "Max. errors polling the endpoint before the polling daemon is stopped (-1 for unlimited retries)",
                            )
                            .with_default("10")
                            .with_number_min(-1.0),
                    ),
            )
            .property(
                ConfigProperty::new("min_value", ValueType::Number)
                    .renamed("minValue")
                    .with_field(
                        ConfigField::new()
                            .with_title("Minimum value")
                            .with_description("Lower bound of the generated values")
                            .with_default("0"),
                    ),
            )
            .property(
                ConfigProperty::new("max_value", ValueType::Number)
                    .renamed("maxValue")
                    .with_field(
                        ConfigField::new()
                            .with_title("Maximum value")
                            .with_description("Upper bound of the generated values")
                            .with_default("1000"),
                    ),
            )
            .property(
                ConfigProperty::new("period_steps", ValueType::Integer)
                    .renamed("periodSteps")
                    .with_field(
                        ConfigField::new()
                            .with_title("Period")
                            .with_description("Number of polls per waveform period")
                            .with_default("60")
                            .with_number_range(2.0, 100_000.0),
                    ),
            )
            .field(
                "tags",
                ValueType::array(ValueType::object::<SimulationTag>()),
                ConfigField::new()
                    .with_title("Simulated tags")
                    .with_description("The tags this adapter generates values for")
                    .with_array_min_items(1)
                    .with_array_max_items(1000),
            )
    }
}

/// Information about the simulation adapter type
#[derive(Debug, Default)]
pub struct SimulationInformation;

impl AdapterInformation for SimulationInformation {
    fn protocol_id(&self) -> &str {
        PROTOCOL_ID
    }

    fn protocol_name(&self) -> &str {
        "Simulation"
    }

    fn display_name(&self) -> &str {
        "Simulated Edge Device"
    }

    fn description(&self) -> Option<&str> {
        Some("Without needing to configure real devices, simulate traffic from an edge device into the broker.")
    }

    fn version(&self) -> Option<&str> {
        Some(crate::VERSION)
    }

    fn author(&self) -> Option<&str> {
        Some("edgeflow")
    }

    fn category(&self) -> Option<AdapterCategory> {
        Some(AdapterCategory::Simulation)
    }

    fn tags(&self) -> Option<Vec<AdapterTag>> {
        Some(vec![AdapterTag::Iot, AdapterTag::Iiot])
    }

    fn capabilities(&self) -> BTreeSet<AdapterCapability> {
        BTreeSet::from([AdapterCapability::Read, AdapterCapability::Discover])
    }

    fn configuration_type_northbound(&self) -> ConfigType {
        SimulationAdapterConfig::config_type()
    }

    fn tag_configuration_type(&self) -> ConfigType {
        SimulationTag::config_type()
    }

    fn ui_schema(&self) -> Option<&str> {
        Some(UI_SCHEMA)
    }
}

/// A running simulation adapter
#[derive(Debug)]
pub struct SimulationAdapter {
    id: String,
    config: SimulationAdapterConfig,
    information: Arc<SimulationInformation>,
    state: Mutex<AdapterState>,
    tick: AtomicU64,
}

impl SimulationAdapter {
    /// Create an adapter instance
    pub fn new<S: Into<String>>(
        id: S,
        config: SimulationAdapterConfig,
        information: Arc<SimulationInformation>,
    ) -> Self {
        Self {
            id: id.into(),
            config,
            information,
            state: Mutex::new(AdapterState::new()),
            tick: AtomicU64::new(0),
        }
    }

    /// The instance configuration
    pub fn config(&self) -> &SimulationAdapterConfig {
        &self.config
    }

    fn sample(&self, tick: u64, index: usize, tag: &SimulationTag) -> f64 {
        let steps = u64::from(self.config.period_steps.max(1));
        let phase = ((tick + index as u64) % steps) as f64 / steps as f64;
        tag.definition().waveform.sample(phase, self.config.min_value, self.config.max_value)
    }
}

#[async_trait]
impl ProtocolAdapter for SimulationAdapter {
    fn id(&self) -> &str {
        &self.id
    }

    fn information(&self) -> &dyn AdapterInformation {
        self.information.as_ref()
    }

    fn state(&self) -> AdapterState {
        self.state.lock().clone()
    }

    async fn start(&self, _input: &StartInput, output: &mut StartOutput) {
        let mut state = self.state.lock();
        if !(self.config.min_value < self.config.max_value) {
            let message = format!(
                "minValue ({}) must be lower than maxValue ({})",
                self.config.min_value, self.config.max_value
            );
            warn!("Simulation adapter {} failed to start: {}", self.id, message);
            state.set_error_connection_status(message.clone());
            output.fail_start(message);
            return;
        }

        state.set_runtime_status(RuntimeStatus::Started);
        state.set_connection_status(ConnectionStatus::Stateless);
        info!("Simulation adapter {} started with {} tags", self.id, self.config.tags.len());
        output.started_successfully();
    }

    async fn stop(&self, _input: &StopInput, output: &mut StopOutput) {
        let mut state = self.state.lock();
        state.set_runtime_status(RuntimeStatus::Stopped);
        state.set_connection_status(ConnectionStatus::Disconnected);
        info!("Simulation adapter {} stopped", self.id);
        output.stopped_successfully();
    }

    async fn discover_values(&self, _input: &DiscoveryInput, output: &mut DiscoveryOutput) {
        output.add_node(DiscoveredNode {
            id: PROTOCOL_ID.to_string(),
            name: self.id.clone(),
            description: "Simulated tags".to_string(),
            parent_id: None,
            node_type: NodeType::Folder,
            selectable: false,
        });
        for tag in &self.config.tags {
            output.add_node(DiscoveredNode {
                id: format!("{}/{}", PROTOCOL_ID, tag.name()),
                name: tag.name().to_string(),
                description: tag.description().unwrap_or_default().to_string(),
                parent_id: Some(PROTOCOL_ID.to_string()),
                node_type: NodeType::Value,
                selectable: true,
            });
        }
        output.finish();
    }
}

#[async_trait]
impl PollingProtocolAdapter for SimulationAdapter {
    async fn poll(&self, input: &PollingInput, output: &mut PollingOutput) {
        if self.state.lock().runtime_status() != RuntimeStatus::Started {
            output.fail(format!("Adapter {} is not started", self.id));
            return;
        }

        if let Some(unknown) = input
            .tag_names
            .iter()
            .find(|name| !self.config.tags.iter().any(|tag| &tag.name == *name))
        {
            output.fail(format!("Unknown tag: {}", unknown));
            return;
        }

        let tick = self.tick.fetch_add(1, Ordering::SeqCst);
        for (index, tag) in self.config.tags.iter().enumerate() {
            if input.tag_names.is_empty() || input.tag_names.contains(&tag.name) {
                output.add_data_point(tag.name.clone(), self.sample(tick, index, tag));
            }
        }
        debug!("Simulation adapter {} produced {} data points", self.id, output.data_points().len());
        output.finish();
    }

    fn polling_interval_millis(&self) -> u64 {
        self.config.polling_interval_millis
    }

    fn max_polling_errors_before_removal(&self) -> u32 {
        u32::try_from(self.config.max_polling_errors_before_removal).unwrap_or(u32::MAX)
    }
}

/// Factory of [`SimulationAdapter`]s
#[derive(Debug, Default)]
pub struct SimulationAdapterFactory {
    information: Arc<SimulationInformation>,
}

impl SimulationAdapterFactory {
    /// Create the factory
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProtocolAdapterFactory for SimulationAdapterFactory {
    fn information(&self) -> Arc<dyn AdapterInformation> {
        self.information.clone()
    }

    fn create_adapter(&self, input: AdapterFactoryInput) -> Result<Box<dyn ProtocolAdapter>> {
        if input.writing_enabled {
            return Err(AdapterError::Unsupported(
                "the simulation adapter does not support writing".to_string(),
            ));
        }

        let config: SimulationAdapterConfig = serde_json::from_value(input.config)?;
        debug!("Creating simulation adapter {}", input.adapter_id);
        Ok(Box::new(SimulationAdapter::new(
            input.adapter_id,
            config,
            self.information.clone(),
        )))
    }
}

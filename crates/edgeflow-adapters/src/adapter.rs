/*!
 * Protocol adapter lifecycle contract.
 *
 * The host runtime drives adapters through these traits and adapters report
 * back through the output recorders passed in. Nothing in this module runs a
 * scheduler; it only defines what a host can call.
 */
use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use edgeflow_core::error::Error as CoreError;

use crate::information::AdapterInformation;

/// Message reported by adapters that do not implement discovery
pub const DISCOVERY_UNSUPPORTED: &str = "Adapter type does not support discovery";

/// Error type for adapter operations
#[derive(Error, Debug)]
pub enum AdapterError {
    /// The adapter configuration could not be used
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Communication with the external system failed
    #[error("Communication error: {0}")]
    Communication(String),

    /// The requested operation is not supported by the adapter type
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// A factory with the same protocol id is already registered
    #[error("Adapter type {0} already registered")]
    AlreadyRegistered(String),

    /// No factory with the given protocol id is registered
    #[error("Adapter type {0} not registered")]
    NotRegistered(String),

    /// Factories could not be enumerated
    #[error("Discovery error: {0}")]
    Discovery(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Core error
    #[error("Core error: {0}")]
    Core(#[from] CoreError),

    /// Other error
    #[error("Other error: {0}")]
    Other(String),
}

/// Result type for adapter operations
pub type Result<T> = std::result::Result<T, AdapterError>;

/// Outcome recorded by an output object
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationOutcome {
    /// Neither finished nor failed yet
    #[default]
    Pending,
    /// The operation finished successfully
    Succeeded,
    /// The operation failed
    Failed {
        /// Reason given by the adapter
        message: String,
    },
}

impl OperationOutcome {
    /// Whether the operation finished successfully
    pub fn is_success(&self) -> bool {
        matches!(self, OperationOutcome::Succeeded)
    }

    /// Whether the operation failed
    pub fn is_failure(&self) -> bool {
        matches!(self, OperationOutcome::Failed { .. })
    }

    /// The failure message, if any
    pub fn failure_message(&self) -> Option<&str> {
        match self {
            OperationOutcome::Failed { message } => Some(message),
            _ => None,
        }
    }

    fn fail<S: Into<String>>(message: S) -> Self {
        OperationOutcome::Failed {
            message: message.into(),
        }
    }
}

/// Lifecycle state of an adapter instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuntimeStatus {
    /// Running
    Started,
    /// Start in progress
    Starting,
    /// Not running
    Stopped,
}

/// Connection state of an adapter instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConnectionStatus {
    /// Connected to the external system
    Connected,
    /// Not connected
    Disconnected,
    /// The protocol has no notion of a connection
    Stateless,
    /// Unknown
    Unknown,
    /// The connection failed
    Error,
}

/// Runtime and connection state of one adapter instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdapterState {
    runtime_status: RuntimeStatus,
    connection_status: ConnectionStatus,
    last_error_message: Option<String>,
}

impl Default for AdapterState {
    fn default() -> Self {
        Self {
            runtime_status: RuntimeStatus::Stopped,
            connection_status: ConnectionStatus::Disconnected,
            last_error_message: None,
        }
    }
}

impl AdapterState {
    /// Create a stopped, disconnected state
    pub fn new() -> Self {
        Self::default()
    }

    /// Current runtime status
    pub fn runtime_status(&self) -> RuntimeStatus {
        self.runtime_status
    }

    /// Set the runtime status
    pub fn set_runtime_status(&mut self, status: RuntimeStatus) {
        self.runtime_status = status;
    }

    /// Current connection status
    pub fn connection_status(&self) -> ConnectionStatus {
        self.connection_status
    }

    /// Set the connection status, returning whether it changed
    pub fn set_connection_status(&mut self, status: ConnectionStatus) -> bool {
        let changed = self.connection_status != status;
        self.connection_status = status;
        changed
    }

    /// Put the connection into the error state and remember the message
    pub fn set_error_connection_status<S: Into<String>>(&mut self, message: S) {
        self.connection_status = ConnectionStatus::Error;
        self.last_error_message = Some(message.into());
    }

    /// Remember an error message without touching the connection status
    pub fn report_error_message<S: Into<String>>(&mut self, message: S) {
        self.last_error_message = Some(message.into());
    }

    /// The last reported error message
    pub fn last_error_message(&self) -> Option<&str> {
        self.last_error_message.as_deref()
    }
}

/// Input of [`ProtocolAdapter::start`]
#[derive(Debug, Clone)]
pub struct StartInput {
    /// Id of the adapter instance being started
    pub adapter_id: String,
}

/// Records the result of [`ProtocolAdapter::start`]
#[derive(Debug, Clone, Default)]
pub struct StartOutput {
    outcome: OperationOutcome,
}

impl StartOutput {
    /// Create a pending output
    pub fn new() -> Self {
        Self::default()
    }

    /// Report a successful start
    pub fn started_successfully(&mut self) {
        self.outcome = OperationOutcome::Succeeded;
    }

    /// Report a failed start
    pub fn fail_start<S: Into<String>>(&mut self, message: S) {
        self.outcome = OperationOutcome::fail(message);
    }

    /// The recorded outcome
    pub fn outcome(&self) -> &OperationOutcome {
        &self.outcome
    }
}

/// Input of [`ProtocolAdapter::stop`]
#[derive(Debug, Clone)]
pub struct StopInput {
    /// Id of the adapter instance being stopped
    pub adapter_id: String,
}

/// Records the result of [`ProtocolAdapter::stop`]
#[derive(Debug, Clone, Default)]
pub struct StopOutput {
    outcome: OperationOutcome,
}

impl StopOutput {
    /// Create a pending output
    pub fn new() -> Self {
        Self::default()
    }

    /// Report a successful stop
    pub fn stopped_successfully(&mut self) {
        self.outcome = OperationOutcome::Succeeded;
    }

    /// Report a failed stop
    pub fn fail_stop<S: Into<String>>(&mut self, message: S) {
        self.outcome = OperationOutcome::fail(message);
    }

    /// The recorded outcome
    pub fn outcome(&self) -> &OperationOutcome {
        &self.outcome
    }
}

/// One sampled value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataPoint {
    /// Tag the value belongs to
    pub tag_name: String,
    /// The sampled value
    pub tag_value: serde_json::Value,
    /// When the value was sampled
    pub timestamp: DateTime<Utc>,
}

impl DataPoint {
    /// Create a data point stamped with the current time
    pub fn new<S: Into<String>, V: Into<serde_json::Value>>(tag_name: S, tag_value: V) -> Self {
        Self {
            tag_name: tag_name.into(),
            tag_value: tag_value.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Input of [`PollingProtocolAdapter::poll`]
#[derive(Debug, Clone, Default)]
pub struct PollingInput {
    /// Tags to sample; empty means all tags the adapter knows
    pub tag_names: Vec<String>,
}

/// Collects the data points of one poll
#[derive(Debug, Clone, Default)]
pub struct PollingOutput {
    data_points: Vec<DataPoint>,
    outcome: OperationOutcome,
}

impl PollingOutput {
    /// Create an empty, pending output
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value for a tag
    pub fn add_data_point<S: Into<String>, V: Into<serde_json::Value>>(&mut self, tag_name: S, tag_value: V) {
        self.data_points.push(DataPoint::new(tag_name, tag_value));
    }

    /// Add a prepared data point
    pub fn add(&mut self, data_point: DataPoint) {
        self.data_points.push(data_point);
    }

    /// Report that all values were added
    pub fn finish(&mut self) {
        self.outcome = OperationOutcome::Succeeded;
    }

    /// Report a failed poll
    pub fn fail<S: Into<String>>(&mut self, message: S) {
        self.outcome = OperationOutcome::fail(message);
    }

    /// The collected data points
    pub fn data_points(&self) -> &[DataPoint] {
        &self.data_points
    }

    /// The recorded outcome
    pub fn outcome(&self) -> &OperationOutcome {
        &self.outcome
    }
}

/// Input of [`WritingProtocolAdapter::write`]
#[derive(Debug, Clone)]
pub struct WriteInput {
    /// Tag to write
    pub tag_name: String,
    /// Value to write
    pub payload: serde_json::Value,
}

/// Records the result of one write
#[derive(Debug, Clone, Default)]
pub struct WriteOutput {
    outcome: OperationOutcome,
    retry: bool,
}

impl WriteOutput {
    /// Create a pending output
    pub fn new() -> Self {
        Self::default()
    }

    /// Report a successful write
    pub fn finish(&mut self) {
        self.outcome = OperationOutcome::Succeeded;
        self.retry = false;
    }

    /// Report a failed write; `retry` asks the host to try again
    pub fn fail<S: Into<String>>(&mut self, message: S, retry: bool) {
        self.outcome = OperationOutcome::fail(message);
        self.retry = retry;
    }

    /// Whether the host should retry the write
    pub fn should_retry(&self) -> bool {
        self.retry
    }

    /// The recorded outcome
    pub fn outcome(&self) -> &OperationOutcome {
        &self.outcome
    }
}

/// Kind of a discovered node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeType {
    /// Groups other nodes
    Folder,
    /// A structured object
    Object,
    /// A readable value
    Value,
}

/// A node found by [`ProtocolAdapter::discover_values`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveredNode {
    /// Node id, unique within the adapter
    pub id: String,
    /// Display name
    pub name: String,
    /// Description
    pub description: String,
    /// Parent node, `None` for roots
    pub parent_id: Option<String>,
    /// Kind of node
    pub node_type: NodeType,
    /// Whether the node can be selected as a tag
    pub selectable: bool,
}

/// Input of [`ProtocolAdapter::discover_values`]
#[derive(Debug, Clone, Default)]
pub struct DiscoveryInput {
    /// Node to start browsing from, `None` for the root
    pub root_node: Option<String>,
    /// Maximum browse depth, 0 for unlimited
    pub depth: u32,
}

/// Collects the nodes of one discovery run
#[derive(Debug, Clone, Default)]
pub struct DiscoveryOutput {
    nodes: Vec<DiscoveredNode>,
    outcome: OperationOutcome,
}

impl DiscoveryOutput {
    /// Create an empty, pending output
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a discovered node
    pub fn add_node(&mut self, node: DiscoveredNode) {
        self.nodes.push(node);
    }

    /// Report that discovery completed
    pub fn finish(&mut self) {
        self.outcome = OperationOutcome::Succeeded;
    }

    /// Report a failed discovery
    pub fn fail<S: Into<String>>(&mut self, message: S) {
        self.outcome = OperationOutcome::fail(message);
    }

    /// The discovered nodes
    pub fn nodes(&self) -> &[DiscoveredNode] {
        &self.nodes
    }

    /// The recorded outcome
    pub fn outcome(&self) -> &OperationOutcome {
        &self.outcome
    }
}

/// A running instance of a protocol adapter
#[async_trait]
pub trait ProtocolAdapter: Send + Sync {
    /// Id of this adapter instance
    fn id(&self) -> &str;

    /// Information about the adapter type
    fn information(&self) -> &dyn AdapterInformation;

    /// Current runtime and connection state
    fn state(&self) -> AdapterState;

    /// Start the adapter
    async fn start(&self, input: &StartInput, output: &mut StartOutput);

    /// Stop the adapter
    async fn stop(&self, input: &StopInput, output: &mut StopOutput);

    /// Browse the external system for values
    async fn discover_values(&self, _input: &DiscoveryInput, output: &mut DiscoveryOutput) {
        output.fail(DISCOVERY_UNSUPPORTED);
    }

    /// Release resources; called once after the final stop
    fn destroy(&self) {}
}

/// An adapter the host polls on a fixed interval
#[async_trait]
pub trait PollingProtocolAdapter: ProtocolAdapter {
    /// Sample values
    async fn poll(&self, input: &PollingInput, output: &mut PollingOutput);

    /// Interval between polls
    fn polling_interval_millis(&self) -> u64;

    /// Consecutive failed polls after which the host stops polling
    fn max_polling_errors_before_removal(&self) -> u32;
}

/// An adapter that writes values to the external system
#[async_trait]
pub trait WritingProtocolAdapter: ProtocolAdapter {
    /// Write one value
    async fn write(&self, input: &WriteInput, output: &mut WriteOutput);
}

impl fmt::Debug for dyn ProtocolAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProtocolAdapter")
            .field("id", &self.id())
            .field("protocol_id", &self.information().protocol_id())
            .finish()
    }
}

/*!
 * Adapter type information.
 *
 * Identity, presentation metadata, capabilities and configuration types of one
 * protocol adapter type, as published by its factory.
 */
use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config_type::ConfigType;
use crate::tag::UNTYPED_TAG;

/// What an adapter type can do
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdapterCapability {
    /// Reads values from the external source and publishes them
    Read,
    /// Discovers tags/names on the external source
    Discover,
    /// Writes values derived from MQTT topic filters to the external destination
    Write,
    /// Can be the source of data combining
    Combine,
}

impl AdapterCapability {
    /// Capabilities assumed when an adapter type does not declare any
    pub fn default_set() -> BTreeSet<AdapterCapability> {
        BTreeSet::from([AdapterCapability::Read, AdapterCapability::Discover])
    }

    /// The wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            AdapterCapability::Read => "READ",
            AdapterCapability::Discover => "DISCOVER",
            AdapterCapability::Write => "WRITE",
            AdapterCapability::Combine => "COMBINE",
        }
    }
}

impl fmt::Display for AdapterCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closed set of adapter categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdapterCategory {
    /// Web-standard connectivity protocols
    Connectivity,
    /// Field bus and other industrial protocols
    Industrial,
    /// Building automation protocols
    BuildingAutomation,
    /// Protocols emulating real world devices
    Simulation,
}

impl AdapterCategory {
    /// Every category in declaration order
    pub const ALL: [AdapterCategory; 4] = [
        AdapterCategory::Connectivity,
        AdapterCategory::Industrial,
        AdapterCategory::BuildingAutomation,
        AdapterCategory::Simulation,
    ];

    /// The wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            AdapterCategory::Connectivity => "CONNECTIVITY",
            AdapterCategory::Industrial => "INDUSTRIAL",
            AdapterCategory::BuildingAutomation => "BUILDING_AUTOMATION",
            AdapterCategory::Simulation => "SIMULATION",
        }
    }

    /// Human readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            AdapterCategory::Connectivity => "Connectivity",
            AdapterCategory::Industrial => "Industrial",
            AdapterCategory::BuildingAutomation => "Building Automation",
            AdapterCategory::Simulation => "Simulation",
        }
    }

    /// Short description
    pub fn description(&self) -> &'static str {
        match self {
            AdapterCategory::Connectivity => "A standard connectivity based protocol, typically web standard.",
            AdapterCategory::Industrial => "Industrial, typically field bus protocols.",
            AdapterCategory::BuildingAutomation => "Protocols related to building automation",
            AdapterCategory::Simulation => "Simulation protocols, that emulate real world devices",
        }
    }

    /// Optional image reference
    pub fn image(&self) -> Option<&'static str> {
        None
    }
}

impl fmt::Display for AdapterCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closed tag vocabulary for adapter types
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[allow(missing_docs)]
pub enum AdapterTag {
    Udp,
    Tcp,
    Serial,
    Internet,
    Web,
    Iot,
    Iiot,
    Automation,
    Factory,
}

impl AdapterTag {
    /// The wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            AdapterTag::Udp => "UDP",
            AdapterTag::Tcp => "TCP",
            AdapterTag::Serial => "SERIAL",
            AdapterTag::Internet => "INTERNET",
            AdapterTag::Web => "WEB",
            AdapterTag::Iot => "IOT",
            AdapterTag::Iiot => "IIOT",
            AdapterTag::Automation => "AUTOMATION",
            AdapterTag::Factory => "FACTORY",
        }
    }
}

impl fmt::Display for AdapterTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static information about one adapter type
pub trait AdapterInformation: Send + Sync {
    /// Unique id of the protocol (e.g. `modbus`)
    fn protocol_id(&self) -> &str;

    /// Protocol name (e.g. `Modbus TCP`)
    fn protocol_name(&self) -> &str;

    /// Name shown to users
    fn display_name(&self) -> &str;

    /// Description shown to users
    fn description(&self) -> Option<&str> {
        None
    }

    /// Documentation link
    fn url(&self) -> Option<&str> {
        None
    }

    /// Adapter version
    fn version(&self) -> Option<&str> {
        None
    }

    /// Logo location
    fn logo_url(&self) -> Option<&str> {
        None
    }

    /// Author or vendor
    fn author(&self) -> Option<&str> {
        None
    }

    /// Category of the adapter type
    fn category(&self) -> Option<AdapterCategory> {
        None
    }

    /// Tags of the adapter type
    fn tags(&self) -> Option<Vec<AdapterTag>> {
        None
    }

    /// Capabilities, `{READ, DISCOVER}` unless overridden
    fn capabilities(&self) -> BTreeSet<AdapterCapability> {
        AdapterCapability::default_set()
    }

    /// Configuration type used when the adapter only reads (northbound)
    fn configuration_type_northbound(&self) -> ConfigType;

    /// Configuration type used when the adapter also writes
    fn configuration_type_north_and_southbound(&self) -> ConfigType {
        self.configuration_type_northbound()
    }

    /// Configuration type of one tag, an empty type unless overridden
    fn tag_configuration_type(&self) -> ConfigType {
        ConfigType::new(UNTYPED_TAG)
    }

    /// Protocol ids this adapter type was known by before
    fn legacy_protocol_ids(&self) -> &[&str] {
        &[]
    }

    /// Raw UI-schema JSON for the configuration editor
    fn ui_schema(&self) -> Option<&str> {
        None
    }

    /// Current version of the configuration layout
    fn current_config_version(&self) -> u32 {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Minimal;

    impl AdapterInformation for Minimal {
        fn protocol_id(&self) -> &str {
            "minimal"
        }

        fn protocol_name(&self) -> &str {
            "Minimal"
        }

        fn display_name(&self) -> &str {
            "Minimal Adapter"
        }

        fn configuration_type_northbound(&self) -> ConfigType {
            ConfigType::new("MinimalConfig")
        }
    }

    #[test]
    fn test_default_capabilities() {
        let caps = Minimal.capabilities();
        assert_eq!(
            caps.into_iter().collect::<Vec<_>>(),
            vec![AdapterCapability::Read, AdapterCapability::Discover]
        );
    }

    #[test]
    fn test_defaults() {
        let info = Minimal;
        assert_eq!(info.category(), None);
        assert_eq!(info.tags(), None);
        assert_eq!(info.ui_schema(), None);
        assert_eq!(info.current_config_version(), 1);
        assert_eq!(info.configuration_type_north_and_southbound().name(), "MinimalConfig");
        assert_eq!(info.tag_configuration_type().name(), UNTYPED_TAG);
        assert!(info.tag_configuration_type().properties().is_empty());
        assert!(info.legacy_protocol_ids().is_empty());
    }

    #[test]
    fn test_wire_names_match_serde() {
        for category in AdapterCategory::ALL {
            assert_eq!(
                serde_json::to_value(category).unwrap(),
                serde_json::Value::String(category.as_str().to_string())
            );
        }
        assert_eq!(serde_json::to_value(AdapterTag::Iiot).unwrap(), "IIOT");
        assert_eq!(serde_json::to_value(AdapterCapability::Combine).unwrap(), "COMBINE");
        assert_eq!(AdapterCategory::BuildingAutomation.display_name(), "Building Automation");
    }
}

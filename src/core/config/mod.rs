//! Configuration types for the thread factory.
//!
//! [`FactoryConfig`] is the serializable form of a [`DefaultThreadFactory`]'s
//! settings, so a host can keep its thread naming policy in the same YAML file as
//! the rest of its transport configuration.
//!
//! [`DefaultThreadFactory`]: crate::factory::DefaultThreadFactory

pub mod validation;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::errors::{Result, ThreadFactoryError};

pub use validation::{validate_non_empty, validate_optional_name_part, validate_thread_name_part};

/// Settings for a [`DefaultThreadFactory`](crate::factory::DefaultThreadFactory).
///
/// `base_name`, `create_daemons` and `use_numbering` are fixed once a factory is
/// built from this config; everything else can still be changed on the factory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactoryConfig {
    /// Base name for units created without an explicit name
    #[serde(default = "FactoryConfig::default_base_name")]
    pub base_name: String,

    /// Whether produced units are daemons (detached when their handle drops)
    #[serde(default)]
    pub create_daemons: bool,

    /// Append a per-factory sequence number (`-1`, `-2`, ...) to every name
    #[serde(default)]
    pub use_numbering: bool,

    /// Compact flag string: `c` includes the cluster name, `l` the local address.
    /// Applied after the explicit `include_*` flags; an empty pattern changes nothing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    /// Append the cluster name to generated names
    #[serde(default)]
    pub include_cluster_name: bool,

    /// Append the local address to generated names
    #[serde(default)]
    pub include_local_address: bool,

    /// Try lightweight units before falling back to OS threads
    #[serde(default)]
    pub use_lightweight_units: bool,

    /// Default cluster name used when a call supplies none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_name: Option<String>,

    /// Default local address used when a call supplies none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_address: Option<String>,
}

impl Default for FactoryConfig {
    fn default() -> Self {
        Self {
            base_name: Self::default_base_name(),
            create_daemons: false,
            use_numbering: false,
            pattern: None,
            include_cluster_name: false,
            include_local_address: false,
            use_lightweight_units: false,
            cluster_name: None,
            local_address: None,
        }
    }
}

impl FactoryConfig {
    /// Create a config with the given base name and all other settings at their defaults
    pub fn new(base_name: impl Into<String>) -> Self {
        Self {
            base_name: base_name.into(),
            ..Self::default()
        }
    }

    fn default_base_name() -> String {
        "thread".to_string()
    }

    /// Enable or disable sequence numbering
    pub fn with_numbering(mut self, enabled: bool) -> Self {
        self.use_numbering = enabled;
        self
    }

    /// Produce daemon units
    pub fn with_daemons(mut self, enabled: bool) -> Self {
        self.create_daemons = enabled;
        self
    }

    /// Set the naming pattern
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Set the default cluster name
    pub fn with_cluster_name(mut self, cluster_name: impl Into<String>) -> Self {
        self.cluster_name = Some(cluster_name.into());
        self
    }

    /// Set the default local address
    pub fn with_local_address(mut self, address: impl Into<String>) -> Self {
        self.local_address = Some(address.into());
        self
    }

    /// Enable or disable lightweight units
    pub fn with_lightweight_units(mut self, enabled: bool) -> Self {
        self.use_lightweight_units = enabled;
        self
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(Into::into)
    }

    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| {
            ThreadFactoryError::io(format!("Failed to read config file: {}", path.display()), e)
        })?;

        Self::from_yaml_str(&content)
    }

    /// Save configuration to a YAML file
    pub fn to_yaml_file(&self, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();
        let content = serde_yaml::to_string(self)?;
        std::fs::write(&path, content).map_err(|e| {
            ThreadFactoryError::io(
                format!("Failed to write config file: {}", path.display()),
                e,
            )
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        validate_non_empty(&self.base_name, "base_name")?;
        validate_thread_name_part(&self.base_name, "base_name")?;
        validate_optional_name_part(self.cluster_name.as_deref(), "cluster_name")?;
        validate_optional_name_part(self.local_address.as_deref(), "local_address")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = FactoryConfig::default();
        assert_eq!(config.base_name, "thread");
        assert!(!config.use_numbering);
        assert!(!config.create_daemons);
        assert!(config.pattern.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_yaml_defaults_fill_missing_fields() {
        let config = FactoryConfig::from_yaml_str("base_name: OOB\nuse_numbering: true\n")
            .expect("valid yaml");
        assert_eq!(config.base_name, "OOB");
        assert!(config.use_numbering);
        assert!(!config.include_cluster_name);
        assert!(config.cluster_name.is_none());
    }

    #[test]
    fn test_yaml_file_round_trip() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("threads.yml");

        let config = FactoryConfig::new("Incoming")
            .with_numbering(true)
            .with_pattern("cl")
            .with_cluster_name("ClusterA")
            .with_local_address("10.0.0.1:7800");
        config.to_yaml_file(&path).expect("write config");

        let loaded = FactoryConfig::from_yaml_file(&path).expect("read config");
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempdir().expect("tempdir");
        let err = FactoryConfig::from_yaml_file(dir.path().join("absent.yml")).unwrap_err();
        assert!(matches!(err, ThreadFactoryError::Io { .. }));
    }

    #[test]
    fn test_validation_rejects_bad_names() {
        assert!(FactoryConfig::new("").validate().is_err());
        assert!(FactoryConfig::new("a\0b").validate().is_err());
        assert!(FactoryConfig::new("ok")
            .with_cluster_name("bad\0cluster")
            .validate()
            .is_err());
    }
}

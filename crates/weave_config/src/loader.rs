//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::{ProjectConfig, ProtocolParams, TechnologyParams};
use std::path::Path;

/// Name of the configuration file looked up in a project directory.
pub const CONFIG_FILE_NAME: &str = "weave.toml";

/// Loads and validates `<project_dir>/weave.toml`.
pub fn load_config(project_dir: &Path) -> Result<ProjectConfig, ConfigError> {
    load_config_file(&project_dir.join(CONFIG_FILE_NAME))
}

/// Loads and validates a configuration file at an explicit path.
pub fn load_config_file(path: &Path) -> Result<ProjectConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Parses and validates a `weave.toml` configuration from a string.
pub fn load_config_from_str(content: &str) -> Result<ProjectConfig, ConfigError> {
    let config: ProjectConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &ProjectConfig) -> Result<(), ConfigError> {
    if config.project.name.is_empty() {
        return Err(ConfigError::MissingField("project.name".to_string()));
    }
    if config.project.store.is_empty() {
        return Err(ConfigError::MissingField("project.store".to_string()));
    }
    for (name, tech) in &config.technologies {
        validate_technology(name, tech)?;
    }
    for (name, protocol) in &config.protocols {
        validate_protocol(name, protocol)?;
    }
    if let Some(context) = &config.context {
        if !config.technologies.contains_key(&context.technology) {
            return Err(ConfigError::UnknownTechnology(context.technology.clone()));
        }
        if !config.protocols.contains_key(&context.protocol) {
            return Err(ConfigError::UnknownProtocol(context.protocol.clone()));
        }
        if context.bandwidth == 0 {
            return Err(ConfigError::ValidationError(
                "context.bandwidth must be at least 1 bit".to_string(),
            ));
        }
    }
    Ok(())
}

fn require_positive(table: &str, name: &str, field: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(format!(
            "{table}.{name}.{field} must be positive, got {value}"
        )))
    }
}

fn require_non_negative(
    table: &str,
    name: &str,
    field: &str,
    value: f64,
) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(format!(
            "{table}.{name}.{field} must not be negative, got {value}"
        )))
    }
}

fn validate_technology(name: &str, tech: &TechnologyParams) -> Result<(), ConfigError> {
    let fields = [
        ("mm2_per_ge", tech.mm2_per_ge),
        ("mm_per_vertical_wire", tech.mm_per_vertical_wire),
        ("mm_per_horizontal_wire", tech.mm_per_horizontal_wire),
        ("s_per_mm", tech.s_per_mm),
    ];
    for (field, value) in fields {
        require_positive("technologies", name, field, value)?;
    }
    require_non_negative("technologies", name, "w_per_mm2_logic", tech.w_per_mm2_logic)?;
    require_non_negative("technologies", name, "w_per_mm2_wire", tech.w_per_mm2_wire)
}

fn validate_protocol(name: &str, protocol: &ProtocolParams) -> Result<(), ConfigError> {
    let fields = [
        ("wires_per_bit", protocol.wires_per_bit),
        ("mux_ge_per_input_bit", protocol.mux_ge_per_input_bit),
        ("demux_ge_per_output_bit", protocol.demux_ge_per_output_bit),
        ("router_base_ge", protocol.router_base_ge),
        ("phy_base_ge", protocol.phy_base_ge),
        ("phy_ge_per_bit", protocol.phy_ge_per_bit),
    ];
    for (field, value) in fields {
        require_non_negative("protocols", name, field, value)?;
    }
    if protocol.wires_per_connection(1) == 0 {
        return Err(ConfigError::ValidationError(format!(
            "protocols.{name} describes connections without any wires"
        )));
    }
    Ok(())
}

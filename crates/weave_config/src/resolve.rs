//! Context resolution: binding a fabric context to its parameter tables.

use crate::error::ConfigError;
use crate::types::{FabricContext, ProjectConfig, ProtocolParams, TechnologyParams};

/// A fabric context together with the technology and protocol it names.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedContext {
    /// The context as written in the configuration or a descriptor.
    pub context: FabricContext,
    /// Parameters of `context.technology`.
    pub technology: TechnologyParams,
    /// Parameters of `context.protocol`.
    pub protocol: ProtocolParams,
}

impl ResolvedContext {
    /// Bundles a context with explicitly supplied parameters.
    pub fn new(context: FabricContext, technology: TechnologyParams, protocol: ProtocolParams) -> Self {
        Self {
            context,
            technology,
            protocol,
        }
    }
}

/// Looks up the technology and protocol named by `context`.
pub fn resolve_context(
    config: &ProjectConfig,
    context: &FabricContext,
) -> Result<ResolvedContext, ConfigError> {
    let technology = config
        .technologies
        .get(&context.technology)
        .ok_or_else(|| ConfigError::UnknownTechnology(context.technology.clone()))?;
    let protocol = config
        .protocols
        .get(&context.protocol)
        .ok_or_else(|| ConfigError::UnknownProtocol(context.protocol.clone()))?;
    Ok(ResolvedContext::new(
        context.clone(),
        technology.clone(),
        protocol.clone(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_config_from_str;

    const CONFIG: &str = r#"
[project]
name = "noc"

[technologies.gf22]
mm2_per_ge = 1.9e-7
mm_per_vertical_wire = 8e-5
mm_per_horizontal_wire = 8e-5
s_per_mm = 1e-10
w_per_mm2_logic = 0.5
w_per_mm2_wire = 0.1

[protocols.axi]
wires_per_bit = 2.0
"#;

    fn context(technology: &str, protocol: &str) -> FabricContext {
        FabricContext {
            technology: technology.into(),
            protocol: protocol.into(),
            bandwidth: 32,
            frequency: "1GHz".parse().unwrap(),
        }
    }

    #[test]
    fn resolves_known_names() {
        let config = load_config_from_str(CONFIG).unwrap();
        let resolved = resolve_context(&config, &context("gf22", "axi")).unwrap();
        assert_eq!(resolved.technology.s_per_mm, 1e-10);
        assert_eq!(resolved.protocol.wires_per_connection(32), 64);
    }

    #[test]
    fn unknown_technology() {
        let config = load_config_from_str(CONFIG).unwrap();
        let err = resolve_context(&config, &context("tsmc7", "axi")).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownTechnology(name) if name == "tsmc7"));
    }

    #[test]
    fn unknown_protocol() {
        let config = load_config_from_str(CONFIG).unwrap();
        let err = resolve_context(&config, &context("gf22", "apb")).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownProtocol(_)));
    }
}

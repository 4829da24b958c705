//! Delegation configuration.

use serde::{Deserialize, Serialize};

use crate::sub_agent::{SubAgentConfig, DEFAULT_MAX_STEPS, DEFAULT_MODEL};

/// Configuration for the delegation layer.
///
/// Seeds the per-agent defaults; individual [`SubAgentConfig`]s can still
/// override every field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DelegationConfig {
    /// Model selector used when a sub-agent doesn't name one.
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Step budget used when a sub-agent doesn't name one.
    #[serde(default = "default_max_steps")]
    pub default_max_steps: u32,

    /// Override for the base instruction template. `{submit}` expands to
    /// the end-run tool id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_max_steps() -> u32 {
    DEFAULT_MAX_STEPS
}

impl Default for DelegationConfig {
    fn default() -> Self {
        Self {
            default_model: default_model(),
            default_max_steps: default_max_steps(),
            system_prompt: None,
        }
    }
}

impl DelegationConfig {
    /// Load configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Start a sub-agent configuration seeded with these defaults.
    pub fn sub_agent(&self) -> SubAgentConfig {
        let mut config = SubAgentConfig::new()
            .with_model(self.default_model.clone())
            .with_max_steps(self.default_max_steps);
        config.system_prompt = self.system_prompt.clone();
        config
    }
}

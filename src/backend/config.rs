//! Per-backend provider configuration (spec §4.6, §4.10).

use serde::{Deserialize, Serialize};

/// Configuration accepted by any [`super::TranslationBackend`]. Not every
/// field is meaningful to every provider; unused fields are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    pub endpoint_url: Option<String>,
    pub region: Option<String>,
    pub formality: Option<String>,
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub timeout_ms: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint_url: None,
            region: None,
            formality: None,
            model: None,
            max_tokens: None,
            temperature: None,
            timeout_ms: 30_000,
        }
    }
}

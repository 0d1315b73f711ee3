use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub tracing: TracingConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    /// Per-blueprint settings, keyed by blueprint name.
    #[serde(default)]
    pub crud: BTreeMap<String, CrudSettings>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_days: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TracingConfig {
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
}

/// Settings for one CRUD blueprint.
///
/// `methods` and `skip_methods` are kept as raw values: their shape is only
/// known once the blueprint resolves them, and a wrong shape must surface as a
/// configuration error naming the allowed forms.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CrudSettings {
    #[serde(default)]
    pub url_prefix: Option<String>,
    #[serde(default)]
    pub methods: Option<serde_json::Value>,
    #[serde(default)]
    pub skip_methods: Option<serde_json::Value>,
}

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct Config {
    /// Base URL of the Taskwire API.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default)]
    pub recurrence: RecurrenceConfig,
}

/// Configuration for client-side series expansion.
#[derive(Deserialize, Debug)]
pub struct RecurrenceConfig {
    /// How many occurrences an open-ended rule expands to.
    pub horizon_count: usize,
}

fn default_api_url() -> String {
    "http://localhost:4000/api".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            recurrence: RecurrenceConfig::default(),
        }
    }
}

impl Default for RecurrenceConfig {
    fn default() -> Self {
        Self {
            horizon_count: taskwire_core::models::DEFAULT_HORIZON_COUNT,
        }
    }
}

impl Config {
    pub fn new() -> Result<Self, figment::Error> {
        Figment::new()
            .merge(Toml::file("taskwire.toml"))
            .merge(Env::prefixed("TASKWIRE_"))
            .extract()
    }
}

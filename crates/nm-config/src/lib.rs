//! # nm-config
//!
//! Typed settings for nmedia front-ends.
//!
//! Layers, lowest priority first: built-in defaults, an optional
//! `nmedia.toml` (or any format `config` understands under that stem),
//! then `NMEDIA_*` environment variables. A `.env` file is loaded into the
//! environment first when one exists.

use std::path::PathBuf;
use std::time::Duration;

use config::{Config, Environment, File};
use nm_core::FailurePolicy;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

pub const ENV_PREFIX: &str = "NMEDIA";
const FILE_STEM: &str = "nmedia";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load settings: {0}")]
    Load(#[from] config::ConfigError),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// JSON array of posts the in-memory repository starts with.
    pub seed_path: Option<PathBuf>,
    /// Artificial delay applied to every repository call.
    pub latency_ms: u64,
    pub failure_policy: FailurePolicy,
    /// Issue a refresh as soon as the controller is built.
    pub load_on_start: bool,
    /// Author stamped on posts created from this client.
    pub author: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed_path: None,
            latency_ms: 0,
            failure_policy: FailurePolicy::default(),
            load_on_start: true,
            author: "Me".to_string(),
        }
    }
}

impl Settings {
    /// Loads `.env`, the optional settings file and the environment.
    pub fn load() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!(path = %path.display(), "loaded .env");
        }
        Self::from_sources(
            Some(File::with_name(FILE_STEM).required(false)),
            Environment::with_prefix(ENV_PREFIX),
        )
    }

    fn from_sources<S>(file: Option<S>, env: Environment) -> Result<Self>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let mut builder = Config::builder();
        if let Some(file) = file {
            builder = builder.add_source(file);
        }
        let settings = builder
            .add_source(env.try_parsing(true))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }
}

use std::{
    env,
    path::{Path, PathBuf},
    time::Duration,
};

use lazy_static::lazy_static;
use paths::PathContext;
use serde::Deserialize;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

#[derive(Clone, Debug, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    #[serde(default)]
    pub token: Option<String>,
    pub timeout_secs: u64,
}

impl ApiConfig {
    /// Configured token, ignoring an empty value.
    pub fn bearer_token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.trim().is_empty())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct PostcodeConfig {
    /// Search endpoint of the postcode lookup. Without one the lookup stays inert.
    #[serde(default)]
    pub endpoint: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct FormConfig {
    pub focus_delay_ms: u64,
}

#[derive(Clone, Debug, Deserialize)]
pub struct TuiConfig {
    pub tick_rate: f64,
    pub frame_rate: f64,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    #[serde(default)]
    pub postcode: PostcodeConfig,
    pub form: FormConfig,
    pub tui: TuiConfig,
    pub config_dir: PathBuf,
}

lazy_static! {
    pub static ref PROJECT_NAME: String = env!("CARGO_CRATE_NAME").to_uppercase().to_string();
    pub static ref CONFIG_FOLDER: Option<PathBuf> =
        env::var(format!("{}_CONFIG", PROJECT_NAME.clone()))
            .ok()
            .map(PathBuf::from);
}

impl Config {
    /// Load from `$STOREFRONT_CONFIG`, or from the project root of `paths`.
    pub fn new(paths: &PathContext) -> Result<Self, config::ConfigError> {
        let config_dir = CONFIG_FOLDER
            .clone()
            .unwrap_or_else(|| paths.config_dir());
        Self::load_from(&config_dir)
    }

    /// Defaults, then `config.json5` / `config.toml` in `config_dir`, then
    /// `STOREFRONT__SECTION__KEY` environment variables.
    pub fn load_from(config_dir: &Path) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            .set_default("api.base_url", DEFAULT_BASE_URL)?
            .set_default("api.timeout_secs", 10_i64)?
            .set_default("form.focus_delay_ms", 200_i64)?
            .set_default("tui.tick_rate", 4.0_f64)?
            .set_default("tui.frame_rate", 30.0_f64)?
            .set_default("config_dir", config_dir.to_string_lossy().as_ref())?;

        let config_files = [
            ("config.json5", config::FileFormat::Json5),
            ("config.toml", config::FileFormat::Toml),
        ];
        let mut found_config = false;
        for (file, format) in &config_files {
            let source = config::File::from(config_dir.join(file))
                .format(*format)
                .required(false);
            builder = builder.add_source(source);
            if config_dir.join(file).exists() {
                found_config = true
            }
        }
        if !found_config {
            debug!(dir = %config_dir.display(), "no configuration file found, using defaults");
        }

        builder = builder.add_source(
            config::Environment::with_prefix(&PROJECT_NAME)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }

    pub fn focus_delay(&self) -> Duration {
        Duration::from_millis(self.form.focus_delay_ms)
    }
}

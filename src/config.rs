use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use crate::models::{MatchingParams, ScoringWeights};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub appwrite: AppwriteSettings,
    pub collection: CollectionSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppwriteSettings {
    pub endpoint: String,
    pub api_key: String,
    pub project_id: String,
    pub database_id: String,
    pub page_size: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectionSettings {
    pub organizations: String,
    pub donations: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchingSettings {
    pub top_n: Option<usize>,
    pub group_radius_km: Option<f64>,
    pub slot_step_minutes: Option<i64>,
    pub slot_separation_minutes: Option<i64>,
    pub recent_window_days: Option<i64>,
    pub utc_offset_minutes: Option<i32>,
}

impl MatchingSettings {
    /// Resolve unset values to the pipeline defaults and clamp the rest
    pub fn to_params(&self) -> MatchingParams {
        let defaults = MatchingParams::default();
        MatchingParams {
            top_n: self.top_n.unwrap_or(defaults.top_n),
            group_radius_km: self.group_radius_km.unwrap_or(defaults.group_radius_km),
            slot_step_minutes: self.slot_step_minutes.unwrap_or(defaults.slot_step_minutes),
            slot_separation_minutes: self
                .slot_separation_minutes
                .unwrap_or(defaults.slot_separation_minutes),
            recent_window_days: self.recent_window_days.unwrap_or(defaults.recent_window_days),
            utc_offset_minutes: self.utc_offset_minutes.unwrap_or(defaults.utc_offset_minutes),
        }
        .clamped()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_food_type_weight")]
    pub food_type: f64,
    #[serde(default = "default_quantity_weight")]
    pub quantity: f64,
    #[serde(default = "default_distance_weight")]
    pub distance: f64,
    #[serde(default = "default_distance_decay")]
    pub distance_decay_per_km: f64,
    #[serde(default = "default_pickup_hour_weight")]
    pub pickup_hour: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            food_type: default_food_type_weight(),
            quantity: default_quantity_weight(),
            distance: default_distance_weight(),
            distance_decay_per_km: default_distance_decay(),
            pickup_hour: default_pickup_hour_weight(),
        }
    }
}

impl From<&WeightsConfig> for ScoringWeights {
    fn from(value: &WeightsConfig) -> Self {
        Self {
            food_type: value.food_type,
            quantity: value.quantity,
            distance: value.distance,
            distance_decay_per_km: value.distance_decay_per_km,
            pickup_hour: value.pickup_hour,
        }
    }
}

fn default_food_type_weight() -> f64 { 30.0 }
fn default_quantity_weight() -> f64 { 20.0 }
fn default_distance_weight() -> f64 { 30.0 }
fn default_distance_decay() -> f64 { 3.0 }
fn default_pickup_hour_weight() -> f64 { 20.0 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with DONATION_)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., DONATION__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("DONATION")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings = apply_appwrite_overrides(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("DONATION")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Apply Appwrite credentials from the conventional single-underscore variables
/// (DONATION_APPWRITE__API_KEY and friends) used by deployment manifests
fn apply_appwrite_overrides(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let overrides = [
        ("DONATION_APPWRITE__ENDPOINT", "appwrite.endpoint"),
        ("DONATION_APPWRITE__API_KEY", "appwrite.api_key"),
        ("DONATION_APPWRITE__PROJECT_ID", "appwrite.project_id"),
        ("DONATION_APPWRITE__DATABASE_ID", "appwrite.database_id"),
    ];

    let mut builder = Config::builder().add_source(settings);

    for (var, key) in overrides {
        if let Ok(value) = env::var(var) {
            builder = builder.set_override(key, value)?;
        }
    }

    builder.build()
}

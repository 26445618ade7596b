//! TOML-based application configuration.
//!
//! Stores:
//! - Event and places endpoints
//! - Nearby-places search parameters
//! - The category vocabulary for the type/genre filters
//! - The signed-in user
//!
//! Configuration is stored at `~/.config/citypulse/config.toml`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::data_dir;
use crate::error::ConfigError;
use crate::filter::Vocabulary;
use crate::saved::UserId;

/// Upstream service endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_events_url")]
    pub events_url: String,
    #[serde(default = "default_places_url")]
    pub places_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Nearby-places search parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacesConfig {
    /// Search radius in meters.
    #[serde(default = "default_radius")]
    pub radius: u32,
    /// Max results per place type.
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default = "default_place_types")]
    pub types: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Signed-in user. Empty means signed out.
    #[serde(default)]
    pub user: String,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/citypulse/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub places: PlacesConfig,
    #[serde(default)]
    pub vocabulary: Vocabulary,
    #[serde(default)]
    pub session: SessionConfig,
}

fn default_events_url() -> String {
    "http://127.0.0.1:5000/events".into()
}
fn default_places_url() -> String {
    "http://127.0.0.1:5000/api/places/nearby".into()
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_radius() -> u32 {
    1000
}
fn default_limit() -> u32 {
    10
}
fn default_place_types() -> Vec<String> {
    ["restaurants", "bars", "entertainment", "attractions", "shopping"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            events_url: default_events_url(),
            places_url: default_places_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for PlacesConfig {
    fn default() -> Self {
        Self {
            radius: default_radius(),
            limit: default_limit(),
            types: default_place_types(),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    fn get_json_value_by_path<'a>(root: &'a Value, key: &str) -> Option<&'a Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(root: &mut Value, key: &str, value: &str) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_some() {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }

            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;

            let new_value = match existing {
                Value::Bool(_) => Value::Bool(value.parse::<bool>().map_err(|e| invalid(e.to_string()))?),
                Value::Number(_) => value
                    .parse::<u64>()
                    .map(|n| Value::Number(n.into()))
                    .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?,
                // Lists accept JSON (`["a","b"]`) or a comma-separated string.
                Value::Array(_) => match serde_json::from_str::<Value>(value) {
                    Ok(v @ Value::Array(_)) => v,
                    _ => Value::Array(
                        value
                            .split(',')
                            .map(str::trim)
                            .filter(|s| !s.is_empty())
                            .map(|s| Value::String(s.to_string()))
                            .collect(),
                    ),
                },
                Value::Object(_) => serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?,
                _ => Value::String(value.into()),
            };

            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there when it does not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, writing defaults");
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Every leaf setting as `(dot.path, value)`, sorted by path.
    pub fn entries(&self) -> Vec<(String, String)> {
        fn walk(prefix: &str, value: &Value, out: &mut Vec<(String, String)>) {
            match value {
                Value::Object(map) => {
                    for (k, v) in map {
                        let path = if prefix.is_empty() {
                            k.clone()
                        } else {
                            format!("{prefix}.{k}")
                        };
                        walk(&path, v, out);
                    }
                }
                Value::String(s) => out.push((prefix.to_string(), s.clone())),
                other => out.push((prefix.to_string(), other.to_string())),
            }
        }

        let mut out = Vec::new();
        if let Ok(json) = serde_json::to_value(self) {
            walk("", &json, &mut out);
        }
        out
    }

    /// The configured user, if any.
    pub fn user(&self) -> Option<UserId> {
        UserId::new(self.session.user.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn missing_sections_take_defaults() {
        let parsed: Config = toml::from_str("[places]\nradius = 500\n").unwrap();
        assert_eq!(parsed.places.radius, 500);
        assert_eq!(parsed.places.limit, 10);
        assert_eq!(parsed.api, ApiConfig::default());
        assert_eq!(parsed.vocabulary, Vocabulary::default());
        assert!(parsed.user().is_none());
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("api.timeout_secs").as_deref(), Some("10"));
        assert_eq!(
            cfg.get("api.events_url").as_deref(),
            Some("http://127.0.0.1:5000/events")
        );
        assert!(cfg.get("api.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn set_updates_number_string_and_list() {
        let mut cfg = Config::default();
        cfg.set("places.radius", "250").unwrap();
        cfg.set("session.user", "alice").unwrap();
        cfg.set("vocabulary.genres", "jazz, blues").unwrap();
        cfg.set("vocabulary.types", r#"["music"]"#).unwrap();

        assert_eq!(cfg.places.radius, 250);
        assert_eq!(cfg.user().unwrap().as_str(), "alice");
        assert_eq!(cfg.vocabulary.genres, vec!["jazz", "blues"]);
        assert_eq!(cfg.vocabulary.types, vec!["music"]);
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("api.nonexistent", "x"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(cfg.set("", "x"), Err(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn set_rejects_invalid_number() {
        let mut cfg = Config::default();
        let result = cfg.set("places.limit", "lots");
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
        assert_eq!(cfg.places.limit, 10);
    }

    #[test]
    fn entries_list_every_leaf() {
        let entries = Config::default().entries();
        let keys: Vec<_> = entries.iter().map(|(k, _)| k.as_str()).collect();
        assert!(keys.contains(&"api.places_url"));
        assert!(keys.contains(&"places.types"));
        assert!(keys.contains(&"session.user"));
    }

    #[test]
    fn load_from_writes_defaults_then_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg, Config::default());
        assert!(path.exists());

        let mut changed = cfg;
        changed.set("api.timeout_secs", "3").unwrap();
        changed.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().api.timeout(), Duration::from_secs(3));
    }

    #[test]
    fn load_from_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "api = 3").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::LoadFailed { .. })
        ));
    }
}

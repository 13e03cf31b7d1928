//! Externally supplied configuration.
//!
//! Nothing remote-facing is embedded in source: endpoints, credentials and
//! the table name all arrive here. An optional TOML file (EXOGEN_CONFIG_PATH)
//! provides the base; environment variables override it and are the usual way
//! to supply credentials:
//!
//!   COHERE_API_KEY       : generation credential (required)
//!   COHERE_ENDPOINT_URL  : default "https://api.cohere.ai/v1/generate"
//!   COHERE_MODEL         : default "command"
//!   SUPABASE_URL         : store base url (required), e.g. https://xyz.supabase.co
//!   SUPABASE_KEY         : store credential (required)
//!   EXOGEN_TABLE_NAME    : default "exercices"

use serde::Deserialize;
use tracing::info;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Could not read the config file {0}: {1}")]
    UnreadableFile(String, String),
    #[error("Could not parse the config file {0}: {1}")]
    InvalidFile(String, String),
}

#[derive(Clone, Debug, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_generation_endpoint")]
    pub endpoint_url: String,
    #[serde(default)]
    pub credential: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_top_p")]
    pub top_p: f32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            endpoint_url: default_generation_endpoint(),
            credential: String::new(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            top_p: default_top_p(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub endpoint_url: String,
    #[serde(default)]
    pub credential: String,
    #[serde(default = "default_table_name")]
    pub table_name: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            endpoint_url: String::new(),
            credential: String::new(),
            table_name: default_table_name(),
        }
    }
}

/// Prompt used against the generation endpoint. Overridable in TOML if the
/// tone or structure needs tuning; the `{subject}` placeholder is filled with
/// the requested topic.
#[derive(Clone, Debug, Deserialize)]
pub struct Prompts {
    pub generation_template: String,
}

impl Default for Prompts {
    fn default() -> Self {
        Self {
            generation_template: "\
Génère 3 exercices sur le sujet suivant : {subject}.\n\
Pour chaque exercice, utilise la structure suivante :\n\
1. Titre: [Titre de l'exercice]\n\
  Énoncé: [Énoncé de l'exercice]\n\
  Correction: [Correction étape par étape]\n\
Assure-toi que les exercices sont clairs, détaillés et adaptés à un niveau débutant.\n"
                .into(),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub prompts: Option<Prompts>,
}

impl AppConfig {
    /// Load from EXOGEN_CONFIG_PATH (if set) and apply environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let file = match std::env::var("EXOGEN_CONFIG_PATH") {
            Ok(path) => {
                let raw = std::fs::read_to_string(&path)
                    .map_err(|e| ConfigError::UnreadableFile(path.clone(), e.to_string()))?;
                let cfg: AppConfig = toml::from_str(&raw)
                    .map_err(|e| ConfigError::InvalidFile(path.clone(), e.to_string()))?;
                info!(target: "exogen_backend", %path, "Loaded config file (TOML)");
                Some(cfg)
            }
            Err(_) => None,
        };
        Self::from_sources(file, |key| std::env::var(key).ok())
    }

    /// Merge an optional file config with an environment lookup.
    /// Split out from `load` so tests can run hermetically.
    pub fn from_sources(
        file: Option<AppConfig>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut cfg = file.unwrap_or_default();

        if let Some(v) = env("COHERE_ENDPOINT_URL") {
            cfg.generation.endpoint_url = v;
        }
        if let Some(v) = env("COHERE_API_KEY") {
            cfg.generation.credential = v;
        }
        if let Some(v) = env("COHERE_MODEL") {
            cfg.generation.model = v;
        }
        if let Some(v) = env("SUPABASE_URL") {
            cfg.store.endpoint_url = v;
        }
        if let Some(v) = env("SUPABASE_KEY") {
            cfg.store.credential = v;
        }
        if let Some(v) = env("EXOGEN_TABLE_NAME") {
            cfg.store.table_name = v;
        }

        if cfg.generation.credential.is_empty() {
            return Err(ConfigError::MissingVar("COHERE_API_KEY".into()));
        }
        if cfg.store.endpoint_url.is_empty() {
            return Err(ConfigError::MissingVar("SUPABASE_URL".into()));
        }
        if cfg.store.credential.is_empty() {
            return Err(ConfigError::MissingVar("SUPABASE_KEY".into()));
        }

        Ok(cfg)
    }

    pub fn prompts(&self) -> Prompts {
        self.prompts.clone().unwrap_or_default()
    }
}

fn default_generation_endpoint() -> String {
    "https://api.cohere.ai/v1/generate".into()
}
fn default_model() -> String {
    "command".into()
}
fn default_max_tokens() -> u32 {
    300
}
fn default_temperature() -> f32 {
    0.5
}
fn default_top_p() -> f32 {
    0.8
}
fn default_table_name() -> String {
    "exercices".into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env_of<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn missing_generation_credential_is_named() {
        let err = AppConfig::from_sources(
            None,
            env_of(&[("SUPABASE_URL", "https://x.supabase.co"), ("SUPABASE_KEY", "k")]),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar(ref v) if v == "COHERE_API_KEY"));
    }

    #[test]
    fn env_overrides_file_values() {
        let file: AppConfig = toml::from_str(
            r#"
            [generation]
            credential = "from-file"
            model = "command-light"

            [store]
            endpoint_url = "https://file.supabase.co"
            credential = "file-key"
            "#,
        )
        .unwrap();

        let cfg = AppConfig::from_sources(
            Some(file),
            env_of(&[("COHERE_API_KEY", "from-env"), ("EXOGEN_TABLE_NAME", "exos")]),
        )
        .unwrap();

        assert_eq!(cfg.generation.credential, "from-env");
        assert_eq!(cfg.generation.model, "command-light");
        assert_eq!(cfg.store.table_name, "exos");
        assert_eq!(cfg.store.endpoint_url, "https://file.supabase.co");
    }

    #[test]
    fn defaults_match_the_remote_contract() {
        let cfg = AppConfig::from_sources(
            None,
            env_of(&[
                ("COHERE_API_KEY", "k"),
                ("SUPABASE_URL", "https://x.supabase.co"),
                ("SUPABASE_KEY", "k"),
            ]),
        )
        .unwrap();
        assert_eq!(cfg.generation.endpoint_url, "https://api.cohere.ai/v1/generate");
        assert_eq!(cfg.generation.model, "command");
        assert_eq!(cfg.generation.max_tokens, 300);
        assert_eq!(cfg.store.table_name, "exercices");
        assert!(cfg.prompts().generation_template.contains("{subject}"));
    }
}

//! Configuração do edugen carregada a partir de `edugen.toml`.
//!
//! Valores não presentes no arquivo usam defaults sensíveis.
//! A variável de ambiente `ANTHROPIC_API_KEY` tem precedência sobre o arquivo,
//! e as flags da CLI têm precedência sobre ambos.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::anthropic::API_URL;
use crate::error::EdugenError;
use crate::steps::{FeedbackPolicy, GeneratorOptions};
use crate::structured::ModelSettings;

pub const DEFAULT_CONFIG_FILE: &str = "edugen.toml";

/// Configuração de nível superior carregada de `edugen.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct EdugenConfig {
    /// Chave da API Anthropic.
    #[serde(default)]
    pub api_key: String,

    /// Modelo usado pelas etapas de geração e revisão.
    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Endpoint de mensagens. Útil para proxies e testes.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Encaminha o feedback do revisor na segunda geração.
    #[serde(default)]
    pub attach_feedback: bool,

    /// Rejeita MCQs cuja resposta não está entre as opções.
    #[serde(default)]
    pub validate_answers: bool,
}

fn default_model() -> String {
    "claude-sonnet-4-5-20250929".to_string()
}

fn default_max_tokens() -> u32 {
    4096
}

fn default_temperature() -> f32 {
    0.3
}

fn default_base_url() -> String {
    API_URL.to_string()
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_timeout_secs() -> u64 {
    120
}

impl Default for EdugenConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            base_url: default_base_url(),
            connect_timeout_secs: default_connect_timeout_secs(),
            timeout_secs: default_timeout_secs(),
            attach_feedback: false,
            validate_answers: false,
        }
    }
}

impl EdugenConfig {
    /// Carrega `edugen.toml` do diretório atual, ou defaults se não existir.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(DEFAULT_CONFIG_FILE))
    }

    /// Carrega a configuração de um caminho explícito.
    /// Um arquivo ausente não é erro.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            toml::from_str::<EdugenConfig>(&contents)
                .with_context(|| format!("failed to parse {}", path.display()))?
        } else {
            Self::default()
        };

        if let Ok(key) = std::env::var("ANTHROPIC_API_KEY")
            && !key.is_empty()
        {
            config.api_key = key;
        }

        Ok(config)
    }

    /// Verifica o que precisa estar correto antes da primeira requisição.
    pub fn validate(&self) -> Result<(), EdugenError> {
        if self.api_key.trim().is_empty() {
            return Err(EdugenError::Config(
                "no API key: set ANTHROPIC_API_KEY or api_key in edugen.toml".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.temperature) {
            return Err(EdugenError::Config(format!(
                "temperature must be between 0.0 and 1.0, got {}",
                self.temperature
            )));
        }
        if self.max_tokens == 0 {
            return Err(EdugenError::Config("max_tokens must be positive".into()));
        }
        Ok(())
    }

    pub fn model_settings(&self) -> ModelSettings {
        ModelSettings {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: Some(self.temperature),
        }
    }

    pub fn generator_options(&self) -> GeneratorOptions {
        GeneratorOptions {
            feedback: if self.attach_feedback {
                FeedbackPolicy::OnRetry
            } else {
                FeedbackPolicy::Legacy
            },
            validate_answers: self.validate_answers,
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let config = EdugenConfig::default();
        assert_eq!(config.model, "claude-sonnet-4-5-20250929");
        assert_eq!(config.max_tokens, 4096);
        assert!((config.temperature - 0.3).abs() < f32::EPSILON);
        assert_eq!(config.base_url, API_URL);
        assert_eq!(config.timeout(), Duration::from_secs(120));
        assert!(!config.attach_feedback);
        assert!(config.api_key.is_empty());
    }

    #[test]
    fn deserialize_partial_toml() {
        let toml_str = r#"
            api_key = "sk-test-123"
            attach_feedback = true
            timeout_secs = 30
        "#;
        let config: EdugenConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.api_key, "sk-test-123");
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.max_tokens, 4096);
        assert_eq!(config.generator_options().feedback, FeedbackPolicy::OnRetry);
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("edugen.toml");
        std::fs::write(&path, "model = \"claude-haiku-4-5-20251001\"\nvalidate_answers = true\n")
            .unwrap();

        let config = EdugenConfig::load_from(&path).unwrap();
        assert_eq!(config.model, "claude-haiku-4-5-20251001");
        assert!(config.generator_options().validate_answers);
        assert_eq!(config.model_settings().model, "claude-haiku-4-5-20251001");
    }

    #[test]
    fn load_from_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = EdugenConfig::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.max_tokens, 4096);
    }

    #[test]
    fn invalid_toml_is_reported_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("edugen.toml");
        std::fs::write(&path, "max_tokens = \"lots\"").unwrap();

        let err = EdugenConfig::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("failed to parse"));
    }

    #[test]
    fn validate_requires_api_key() {
        let config = EdugenConfig::default();
        assert!(matches!(config.validate(), Err(EdugenError::Config(_))));

        let config = EdugenConfig {
            api_key: "sk-test".into(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_out_of_range_temperature() {
        let config = EdugenConfig {
            api_key: "sk-test".into(),
            temperature: 1.5,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("temperature"));
    }
}

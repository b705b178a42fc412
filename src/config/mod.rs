use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub capture: CaptureConfig,
    pub transcription: TranscriptionConfig,
    pub summary: SummaryConfig,
    pub relay: RelayConfig,
    pub api: ApiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Capture sample rate in Hz. 16 kHz mono is what speech models expect.
    pub sample_rate: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptionConfig {
    /// Whisper-compatible transcription endpoint.
    pub endpoint: Option<String>,
    /// Model identifier sent with every upload.
    pub model: String,
    /// Bearer credential. May also come from BRIEFLY_TRANSCRIPTION_API_KEY.
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    /// Full URL of the summarization relay's /transcribe route.
    pub relay_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Listening port for `briefly relay`.
    pub port: u16,
    /// generateContent-style provider endpoint the relay forwards to.
    pub provider_endpoint: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Listening port for the control API.
    pub port: u16,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self { sample_rate: 16000 }
    }
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            model: "whisper-large-v3".to_string(),
            api_key: None,
        }
    }
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self { relay_url: None }
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            port: 8787,
            provider_endpoint: None,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self { port: 3746 }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        if !config_path.exists() {
            info!(
                "Config file not found, creating default at {:?}",
                config_path
            );
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let content =
            std::fs::read_to_string(&config_path).context("Failed to read config file")?;

        let config: Self = toml::from_str(&content).context("Failed to parse config file")?;

        info!("Loaded config from {:?}", config_path);
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(&config_path, content).context("Failed to write config file")?;

        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let base = dirs::config_dir().context("Could not determine config directory")?;
        Ok(base.join("briefly").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = Config::default();
        assert_eq!(config.capture.sample_rate, 16000);
        assert_eq!(config.transcription.model, "whisper-large-v3");
        assert_eq!(config.relay.port, 8787);
        assert_eq!(config.api.port, 3746);
        assert!(config.transcription.api_key.is_none());
    }

    #[test]
    fn partial_toml_fills_missing_sections() {
        let config: Config = toml::from_str(
            r#"
            [relay]
            port = 9000
            "#,
        )
        .unwrap();

        assert_eq!(config.relay.port, 9000);
        assert_eq!(config.api.port, 3746);
        assert_eq!(config.capture.sample_rate, 16000);
    }

    #[test]
    fn config_round_trips_through_toml() {
        let mut config = Config::default();
        config.transcription.api_key = Some("k".to_string());
        config.summary.relay_url = Some("http://127.0.0.1:9999/transcribe".to_string());

        let serialized = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&serialized).unwrap();

        assert_eq!(parsed.transcription.api_key.as_deref(), Some("k"));
        assert_eq!(
            parsed.summary.relay_url.as_deref(),
            Some("http://127.0.0.1:9999/transcribe")
        );
    }
}

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;

/// Card content and toggle defaults.
///
/// Loaded once at startup from an optional JSON file; runtime state is
/// never written back.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CardConfig {
    /// Name shown on the card and announced with the greeting
    pub recipient_name: String,

    /// Message revealed in the final card section
    pub message: String,

    /// Sound effects and music master toggle
    pub sound_enabled: bool,

    /// Background music toggle
    pub music_playing: bool,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            recipient_name: "Beautiful Soul".to_string(),
            message: "Happy Birthday! Wishing you all the joy, love, and laughter \
                      in the world. You deserve the very best today and always."
                .to_string(),
            sound_enabled: true,
            music_playing: false,
        }
    }
}

impl CardConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> AppResult<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config from {}", path.display()))?;
        let config: CardConfig = serde_json::from_str(&content)
            .with_context(|| format!("invalid config in {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configs the experience cannot present
    pub fn validate(&self) -> AppResult<()> {
        anyhow::ensure!(
            !self.recipient_name.trim().is_empty(),
            "recipient_name must not be empty"
        );
        anyhow::ensure!(!self.message.trim().is_empty(), "message must not be empty");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = CardConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.recipient_name, "Beautiful Soul");
        assert!(config.sound_enabled);
        assert!(!config.music_playing);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: CardConfig = serde_json::from_str(r#"{"recipient_name": "Mom"}"#).unwrap();
        assert_eq!(config.recipient_name, "Mom");
        assert!(config.sound_enabled);
        assert!(!config.message.is_empty());
    }

    #[test]
    fn test_empty_recipient_rejected() {
        let config = CardConfig {
            recipient_name: "   ".to_string(),
            ..CardConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_missing_file_fails_with_context() {
        let err = CardConfig::load(Path::new("/nonexistent/card.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/card.json"));
    }
}

//! Configuration file support for the pantry.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/pantry/config.toml`.

use crate::note::{DelimitedNoteParser, NoteGrammar};
use crate::{Error, NameIdentity, QuantityPolicy, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub inventory: InventoryConfig,

    #[serde(default)]
    pub notes: NotesConfig,

    #[serde(default)]
    pub expiry: ExpiryConfig,
}

/// How goods are identified and which lots are accepted
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct InventoryConfig {
    #[serde(default)]
    pub identity: NameIdentity,

    #[serde(default)]
    pub quantity_policy: QuantityPolicy,
}

/// Grammar names accepted in `[notes] grammar`
#[derive(Clone, Copy, Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GrammarKind {
    #[default]
    Greedy,
    Delimited,
}

/// Note parsing configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NotesConfig {
    #[serde(default)]
    pub grammar: GrammarKind,

    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

impl Default for NotesConfig {
    fn default() -> Self {
        Self {
            grammar: GrammarKind::default(),
            delimiter: default_delimiter(),
        }
    }
}

impl NotesConfig {
    /// Build the note grammar described by this section
    pub fn grammar(&self) -> Result<NoteGrammar> {
        match self.grammar {
            GrammarKind::Greedy => Ok(NoteGrammar::Greedy),
            GrammarKind::Delimited => {
                if self.delimiter.is_whitespace() {
                    return Err(Error::Config(format!(
                        "note delimiter {:?} must not be whitespace",
                        self.delimiter
                    )));
                }
                Ok(NoteGrammar::Delimited(DelimitedNoteParser {
                    delimiter: self.delimiter,
                }))
            }
        }
    }
}

/// Expiration query defaults
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct ExpiryConfig {
    /// Days past today included by `Inventory::expire_default`
    #[serde(default)]
    pub lookahead_days: i64,
}

// Default value functions
fn default_delimiter() -> char {
    ';'
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        // Surface a bad delimiter at load time rather than on first note
        config.notes.grammar()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> Result<PathBuf> {
        let base = dirs::config_dir()
            .ok_or_else(|| Error::Config("unable to determine config directory".into()))?;
        Ok(base.join("pantry").join("config.toml"))
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path()?;
        self.save_to(&config_path)
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.inventory.identity, NameIdentity::CaseSensitive);
        assert_eq!(config.inventory.quantity_policy, QuantityPolicy::AcceptAny);
        assert_eq!(config.notes.grammar().unwrap(), NoteGrammar::Greedy);
        assert_eq!(config.expiry.lookahead_days, 0);
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[inventory]
identity = "case_folded"

[notes]
grammar = "delimited"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.inventory.identity, NameIdentity::CaseFolded);
        assert_eq!(config.inventory.quantity_policy, QuantityPolicy::AcceptAny); // default
        assert_eq!(
            config.notes.grammar().unwrap(),
            NoteGrammar::Delimited(DelimitedNoteParser { delimiter: ';' })
        );
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.inventory.quantity_policy = QuantityPolicy::NonNegative;
        config.notes.grammar = GrammarKind::Delimited;
        config.notes.delimiter = '|';
        config.expiry.lookahead_days = 3;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.inventory.quantity_policy, QuantityPolicy::NonNegative);
        assert_eq!(loaded.notes.delimiter, '|');
        assert_eq!(loaded.expiry.lookahead_days, 3);
    }

    #[test]
    fn test_whitespace_delimiter_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[notes]\ngrammar = \"delimited\"\ndelimiter = \" \"\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_unknown_identity_is_toml_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[inventory]\nidentity = \"fuzzy\"\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, Error::Toml(_)));
    }
}

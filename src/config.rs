use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::difficulty::{Difficulty, ProfileTable};
use crate::error::ConfigError;
use crate::evaluation::WIN_SCORE;
use crate::{DEFAULT_COLUMNS, DEFAULT_ROWS, WIN_LENGTH};

/// Game setup, loadable from TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub rows: usize,
    pub columns: usize,
    pub difficulty: Difficulty,
    /// Seed for the AI's random moves. A fresh seed is drawn when absent.
    pub seed: Option<u64>,
    pub profiles: ProfileTable,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            rows: DEFAULT_ROWS,
            columns: DEFAULT_COLUMNS,
            difficulty: Difficulty::default(),
            seed: None,
            profiles: ProfileTable::default(),
        }
    }
}

impl GameConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: GameConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows < WIN_LENGTH || self.columns < WIN_LENGTH {
            return Err(ConfigError::Validation(format!(
                "board must be at least {}x{}, got {}x{}",
                WIN_LENGTH, WIN_LENGTH, self.rows, self.columns
            )));
        }

        for difficulty in Difficulty::ALL {
            let profile = self.profiles.get(difficulty);
            profile
                .validate()
                .map_err(|source| ConfigError::Profile { difficulty, source })?;

            let bound = profile.weights.heuristic_bound(self.rows, self.columns);
            if bound >= i64::from(WIN_SCORE) {
                return Err(ConfigError::Validation(format!(
                    "profiles.{}.weights can reach {}, must stay below {}",
                    difficulty, bound, WIN_SCORE
                )));
            }
        }
        Ok(())
    }

    /// The default configuration as TOML, for writing a starting file.
    pub fn default_toml() -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(&GameConfig::default())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use crate::difficulty::{DifficultyProfile, WindowWeights};
    use crate::error::ProfileError;

    #[test]
    fn default_config_is_valid() {
        GameConfig::default()
            .validate()
            .expect("default config should be valid");
    }

    #[test]
    fn empty_toml_uses_all_defaults() {
        let config: GameConfig = toml::from_str("").unwrap();
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let toml_str = r#"
rows = 6
difficulty = "hard"
"#;
        let config: GameConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.rows, 6);
        assert_eq!(config.columns, DEFAULT_COLUMNS);
        assert_eq!(config.difficulty, Difficulty::Hard);
        assert_eq!(config.seed, None);
        assert_eq!(config.profiles.hard, DifficultyProfile::hard());
    }

    #[test]
    fn profile_override() {
        let toml_str = r#"
[profiles.medium]
depth = 4
noise = 0.1

[profiles.medium.weights]
four = 50
three = 4
two = 1
opponent_three = -3
opponent_two = -1
center = 2
"#;
        let config: GameConfig = toml::from_str(toml_str).unwrap();
        config.validate().unwrap();
        assert_eq!(config.profiles.medium.depth, 4);
        assert_eq!(config.profiles.medium.weights.center, 2);
        assert_eq!(config.profiles.easy, DifficultyProfile::easy());
    }

    #[test]
    fn partial_profile_keeps_built_in_values() {
        let toml_str = r#"
[profiles.medium]
depth = 4

[profiles.hard.weights]
three = 7
"#;
        let config: GameConfig = toml::from_str(toml_str).unwrap();
        config.validate().unwrap();

        let medium = &config.profiles.medium;
        assert_eq!(medium.depth, 4);
        assert_eq!(medium.noise, 0.0);
        assert_eq!(medium.weights, WindowWeights::defensive());

        let hard = &config.profiles.hard;
        assert_eq!(hard.depth, 5);
        assert_eq!(hard.weights.three, 7);
        assert_eq!(hard.weights.four, WindowWeights::full().four);
        assert_eq!(config.profiles.easy, DifficultyProfile::easy());
    }

    #[test]
    fn partial_profile_is_still_validated() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[profiles.easy]\nnoise = 2.0").unwrap();
        assert!(matches!(
            GameConfig::load(file.path()),
            Err(ConfigError::Profile {
                difficulty: Difficulty::Easy,
                source: ProfileError::NoiseOutOfRange(_)
            })
        ));
    }

    #[test]
    fn small_board_rejected() {
        let config = GameConfig {
            columns: 3,
            ..GameConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn zero_depth_rejected() {
        let mut config = GameConfig::default();
        config.profiles.easy.depth = 0;
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Profile {
                difficulty: Difficulty::Easy,
                source: ProfileError::ZeroDepth
            }
        ));
        assert!(err.to_string().contains("profiles.easy"));
    }

    #[test]
    fn noise_outside_unit_interval_rejected() {
        let mut config = GameConfig::default();
        config.profiles.hard.noise = -0.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn weights_reaching_win_score_rejected() {
        let mut config = GameConfig::default();
        config.profiles.hard.weights.four = WIN_SCORE;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("profiles.hard.weights"));
    }

    #[test]
    fn default_toml_roundtrips() {
        let text = GameConfig::default_toml().unwrap();
        let config: GameConfig = toml::from_str(&text).unwrap();
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "columns = 8\nseed = 42").unwrap();
        let config = GameConfig::load(file.path()).unwrap();
        assert_eq!(config.columns, 8);
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn load_rejects_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "rows = 2").unwrap();
        assert!(matches!(
            GameConfig::load(file.path()),
            Err(ConfigError::Validation(_))
        ));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "rows = \"many\"").unwrap();
        assert!(matches!(
            GameConfig::load(file.path()),
            Err(ConfigError::TomlParse(_))
        ));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = GameConfig::load_or_default(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn unreadable_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        match GameConfig::load(&path) {
            Err(ConfigError::FileRead { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected a read error, got {:?}", other),
        }
    }
}

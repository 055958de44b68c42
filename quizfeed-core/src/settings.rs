use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::deck::DeckId;

/// Similarity cutoffs mapping a best fuzzy score to a grade.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct FuzzyThresholds {
    pub high: f32,
    pub medium: f32,
    pub low: f32,
}

impl Default for FuzzyThresholds {
    fn default() -> Self {
        Self {
            high: 0.9,
            medium: 0.75,
            low: 0.6,
        }
    }
}

/// Knobs the surrounding app owns and the core only reads.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    /// Characters stripped before comparison, each one literal.
    pub eliminate_chars: String,
    pub lowercase: bool,
    /// Sticky pointer for the deck round robin.
    pub active_deck: Option<DeckId>,
    pub thresholds: FuzzyThresholds,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            eliminate_chars: ".,!?;:'\"()".to_string(),
            lowercase: true,
            active_deck: None,
            thresholds: FuzzyThresholds::default(),
        }
    }
}

impl Settings {
    pub fn normalize(&self, text: &str) -> String {
        likhet::normalize(text, &self.eliminate_chars, self.lowercase)
    }

    // Save the settings to a file
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let toml = toml::to_string(&self).expect("Failed to serialize settings");
        let mut file = File::create(path)?;
        file.write_all(toml.as_bytes())?;
        Ok(())
    }

    // Load the settings from a file, falling back to defaults when missing
    pub fn load(path: &Path) -> std::io::Result<Settings> {
        let mut file = match File::open(path) {
            Ok(file) => file,
            Err(_) => {
                Self::default().save(path)?;
                File::open(path)?
            }
        };

        let mut contents = String::new();
        file.read_to_string(&mut contents)?;
        let settings = toml::from_str(&contents).expect("Failed to deserialize settings");
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn default_strips_quiz_noise() {
        let settings = Settings::default();

        assert_eq!(settings.normalize("  The CAPITAL, of France!  "), "the capital of france");
    }

    #[test]
    fn casing_can_be_kept() {
        let settings = Settings {
            lowercase: false,
            ..Default::default()
        };

        assert_eq!(settings.normalize("Paris!"), "Paris");
    }

    #[test]
    fn toml_roundtrip() {
        let settings = Settings {
            active_deck: Some(Uuid::new_v4()),
            ..Default::default()
        };

        let path = std::env::temp_dir().join(format!("quizfeed-settings-{}", Uuid::new_v4()));
        settings.save(&path).unwrap();
        let loaded = Settings::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(loaded, settings);
    }

    #[test]
    fn load_missing_file_writes_defaults() {
        let path = std::env::temp_dir().join(format!("quizfeed-settings-{}", Uuid::new_v4()));
        let loaded = Settings::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(loaded, Settings::default());
    }
}

//! Team strength table. Ratings only matter as a ratio between two teams.

use std::collections::BTreeMap;
use std::path::Path;

use unicode_normalization::UnicodeNormalization;

use crate::error::ConfigError;

pub const NEUTRAL_STRENGTH: f64 = 1.0;

/// Case, accent and punctuation insensitive team key ("KRÜ Esports" → "kruesports").
pub fn normalize_team_name(name: &str) -> String {
    name.nfkd()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Same folding as `normalize_team_name`, but split into words
/// ("Team Liquid Academy" → ["team", "liquid", "academy"]).
fn team_words(name: &str) -> Vec<String> {
    let folded: String = name.nfkd().filter(char::is_ascii).collect();
    folded
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_ascii_lowercase)
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
struct RatedTeam {
    name:   String,
    words:  Vec<String>,
    rating: f64,
}

impl RatedTeam {
    fn new(name: String, rating: f64) -> Self {
        let words = team_words(&name);
        Self { name, words, rating }
    }

    /// Rated name appears as whole consecutive words inside `query`.
    fn is_part_of(&self, query: &[String]) -> bool {
        !self.words.is_empty()
            && query
                .windows(self.words.len())
                .any(|w| w == self.words.as_slice())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TeamRatings {
    // normalized key → rated team
    entries: BTreeMap<String, RatedTeam>,
}

impl Default for TeamRatings {
    fn default() -> Self {
        let defaults = [
            ("Team Liquid", 1.15),
            ("Fnatic", 1.10),
            ("DRX", 1.08),
            ("LOUD", 1.05),
            ("OpTic Gaming", 1.03),
        ];
        let mut entries = BTreeMap::new();
        for (name, rating) in defaults {
            entries.insert(normalize_team_name(name), RatedTeam::new(name.to_string(), rating));
        }
        Self { entries }
    }
}

impl TeamRatings {
    pub fn empty() -> Self {
        Self { entries: BTreeMap::new() }
    }

    /// Builds a validated table. Ratings must be finite and positive.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut table = Self::empty();
        for (name, rating) in pairs {
            table.insert(name, rating)?;
        }
        Ok(table)
    }

    /// Reads `{"Team": rating, ...}`.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let map: BTreeMap<String, f64> = serde_json::from_str(raw)?;
        Self::from_pairs(map)
    }

    pub fn insert(&mut self, name: impl Into<String>, rating: f64) -> Result<(), ConfigError> {
        let name = name.into();
        let key = normalize_team_name(&name);
        if key.is_empty() {
            return Err(ConfigError::BlankTeamName);
        }
        if !rating.is_finite() || rating <= 0.0 {
            return Err(ConfigError::InvalidRating { team: name, value: rating });
        }
        self.entries.insert(key, RatedTeam::new(name, rating));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Exact normalized match first, then the longest rated name that appears
    /// as whole words in `team` ("Team Liquid Academy" → "Team Liquid", but
    /// "Cloud9" is not "LOUD").
    pub fn lookup(&self, team: &str) -> Option<f64> {
        let key = normalize_team_name(team);
        if key.is_empty() {
            return None;
        }
        if let Some(rated) = self.entries.get(&key) {
            return Some(rated.rating);
        }
        let words = team_words(team);
        self.entries
            .values()
            .filter(|rated| rated.is_part_of(&words))
            .max_by_key(|rated| rated.words.len())
            .map(|rated| rated.rating)
    }

    pub fn strength_or_neutral(&self, team: &str) -> f64 {
        self.lookup(team).unwrap_or(NEUTRAL_STRENGTH)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.values().map(|rated| (rated.name.as_str(), rated.rating))
    }
}

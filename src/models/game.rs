//! Board game model.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use super::PlayerId;
use crate::error::CatalogError;

/// Two average ratings closer than this compare as equal.
pub const RATING_EPSILON: f64 = 0.001;

/// A rated, feature-tagged catalog entry.
///
/// Ratings are keyed by player id and constrained to 1-5; features are
/// free-form string pairs. Both maps are kept ordered so filter output is
/// deterministic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    /// Catalog name (identity within a catalog)
    pub name: String,

    /// Short description
    pub description: String,

    /// Minimum player count
    pub min_players: u32,

    /// Maximum player count
    pub max_players: u32,

    /// Edition or printing
    pub edition: String,

    /// Ratings by player id, each 1-5
    ratings: BTreeMap<PlayerId, u8>,

    /// Named features (e.g. genre, complexity)
    features: BTreeMap<String, String>,
}

impl Game {
    /// Create a new Game with an empty description and edition.
    pub fn new(name: impl Into<String>, min_players: u32, max_players: u32) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            min_players,
            max_players,
            edition: String::new(),
            ratings: BTreeMap::new(),
            features: BTreeMap::new(),
        }
    }

    /// Builder method to set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Builder method to set the edition.
    pub fn with_edition(mut self, edition: impl Into<String>) -> Self {
        self.edition = edition.into();
        self
    }

    /// A game is valid iff its name is non-empty.
    pub fn is_valid(&self) -> bool {
        !self.name.is_empty()
    }

    /// Record a rating for a player. Each player rates a game at most once.
    pub fn add_rating(&mut self, player_id: &str, score: u8) -> Result<(), CatalogError> {
        if !(1..=5).contains(&score) {
            return Err(CatalogError::OutOfRange(score));
        }
        if self.ratings.contains_key(player_id) {
            return Err(CatalogError::DuplicateKey(player_id.to_string()));
        }
        self.ratings.insert(PlayerId::from(player_id), score);
        Ok(())
    }

    /// Overwrite an existing rating.
    pub fn update_rating(&mut self, player_id: &str, score: u8) -> Result<(), CatalogError> {
        if !(1..=5).contains(&score) {
            return Err(CatalogError::OutOfRange(score));
        }
        if !self.ratings.contains_key(player_id) {
            return Err(CatalogError::NotFound(player_id.to_string()));
        }
        self.ratings.insert(PlayerId::from(player_id), score);
        Ok(())
    }

    /// Remove a player's rating.
    pub fn remove_rating(&mut self, player_id: &str) -> Result<(), CatalogError> {
        self.ratings
            .remove(player_id)
            .map(|_| ())
            .ok_or_else(|| CatalogError::NotFound(player_id.to_string()))
    }

    /// Arithmetic mean of the current ratings, 0.0 when none exist.
    pub fn average_rating(&self) -> f64 {
        if self.ratings.is_empty() {
            return 0.0;
        }
        let sum: u32 = self.ratings.values().map(|&s| u32::from(s)).sum();
        f64::from(sum) / self.ratings.len() as f64
    }

    /// All recorded ratings by player id.
    pub fn ratings(&self) -> &BTreeMap<PlayerId, u8> {
        &self.ratings
    }

    /// Number of recorded ratings.
    pub fn rating_count(&self) -> usize {
        self.ratings.len()
    }

    /// Add a named feature. Feature names are unique per game.
    pub fn add_feature(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), CatalogError> {
        let name = name.into();
        if self.features.contains_key(&name) {
            return Err(CatalogError::DuplicateKey(name));
        }
        self.features.insert(name, value.into());
        Ok(())
    }

    /// Overwrite an existing feature value.
    pub fn update_feature(
        &mut self,
        name: &str,
        value: impl Into<String>,
    ) -> Result<(), CatalogError> {
        if !self.features.contains_key(name) {
            return Err(CatalogError::NotFound(name.to_string()));
        }
        self.features.insert(name.to_string(), value.into());
        Ok(())
    }

    /// Remove a feature.
    pub fn remove_feature(&mut self, name: &str) -> Result<(), CatalogError> {
        self.features
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| CatalogError::NotFound(name.to_string()))
    }

    /// Look up a feature value.
    pub fn feature(&self, name: &str) -> Option<&str> {
        self.features.get(name).map(String::as_str)
    }

    /// Check whether a feature is present.
    pub fn has_feature(&self, name: &str) -> bool {
        self.features.contains_key(name)
    }

    /// All features.
    pub fn features(&self) -> &BTreeMap<String, String> {
        &self.features
    }

    /// Compare two games by average rating alone.
    ///
    /// Averages within [`RATING_EPSILON`] compare as equal, so this is a
    /// total preorder over games, not an identity comparison: differently
    /// named games with the same average are "equal" here.
    pub fn cmp_by_rating(&self, other: &Game) -> Ordering {
        let a = self.average_rating();
        let b = other.average_rating();
        if (a - b).abs() < RATING_EPSILON {
            Ordering::Equal
        } else if a < b {
            Ordering::Less
        } else {
            Ordering::Greater
        }
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Game[Name: {}, Players: {}-{}, Avg rating: {:.2}",
            self.name,
            self.min_players,
            self.max_players,
            self.average_rating()
        )?;
        if !self.edition.is_empty() {
            write!(f, ", Edition: {}", self.edition)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_game() -> Game {
        Game::new("Carcassonne", 2, 6)
            .with_description("Tile placement")
            .with_edition("Big Box")
    }

    #[test]
    fn test_game_creation() {
        let game = create_test_game();
        assert_eq!(game.name, "Carcassonne");
        assert_eq!(game.description, "Tile placement");
        assert_eq!(game.min_players, 2);
        assert_eq!(game.max_players, 6);
        assert_eq!(game.edition, "Big Box");
        assert_eq!(game.rating_count(), 0);
    }

    #[test]
    fn test_game_validity() {
        assert!(create_test_game().is_valid());
        assert!(!Game::new("", 2, 4).is_valid());
    }

    #[test]
    fn test_add_rating() {
        let mut game = create_test_game();
        game.add_rating("p1", 5).unwrap();
        game.add_rating("p2", 4).unwrap();
        assert_eq!(game.rating_count(), 2);
        assert_eq!(game.ratings().get("p1"), Some(&5));
    }

    #[test]
    fn test_add_rating_out_of_range() {
        let mut game = create_test_game();
        assert_eq!(game.add_rating("p1", 0), Err(CatalogError::OutOfRange(0)));
        assert_eq!(game.add_rating("p1", 6), Err(CatalogError::OutOfRange(6)));
        assert_eq!(game.rating_count(), 0);
    }

    #[test]
    fn test_add_rating_duplicate_keeps_existing() {
        let mut game = create_test_game();
        game.add_rating("p1", 5).unwrap();
        assert_eq!(
            game.add_rating("p1", 2),
            Err(CatalogError::DuplicateKey("p1".to_string()))
        );
        assert_eq!(game.ratings().get("p1"), Some(&5));
    }

    #[test]
    fn test_update_rating() {
        let mut game = create_test_game();
        game.add_rating("p1", 3).unwrap();
        game.update_rating("p1", 5).unwrap();
        assert_eq!(game.ratings().get("p1"), Some(&5));

        assert_eq!(
            game.update_rating("p2", 4),
            Err(CatalogError::NotFound("p2".to_string()))
        );
        assert_eq!(game.update_rating("p1", 9), Err(CatalogError::OutOfRange(9)));
    }

    #[test]
    fn test_remove_rating() {
        let mut game = create_test_game();
        game.add_rating("p1", 4).unwrap();
        game.remove_rating("p1").unwrap();
        assert_eq!(game.rating_count(), 0);
        assert_eq!(
            game.remove_rating("p1"),
            Err(CatalogError::NotFound("p1".to_string()))
        );
    }

    #[test]
    fn test_average_rating_empty() {
        let game = create_test_game();
        assert_eq!(game.average_rating(), 0.0);
    }

    #[test]
    fn test_average_rating_mean() {
        let mut game = create_test_game();
        game.add_rating("p1", 5).unwrap();
        game.add_rating("p2", 3).unwrap();
        game.add_rating("p3", 4).unwrap();
        assert!((game.average_rating() - 4.0).abs() < 0.001);
    }

    #[test]
    fn test_features() {
        let mut game = create_test_game();
        game.add_feature("Genre", "Family").unwrap();
        assert!(game.has_feature("Genre"));
        assert_eq!(game.feature("Genre"), Some("Family"));
        assert_eq!(game.feature("Weight"), None);

        assert_eq!(
            game.add_feature("Genre", "Strategy"),
            Err(CatalogError::DuplicateKey("Genre".to_string()))
        );
        assert_eq!(game.feature("Genre"), Some("Family"));

        game.update_feature("Genre", "Strategy").unwrap();
        assert_eq!(game.feature("Genre"), Some("Strategy"));
        assert_eq!(
            game.update_feature("Weight", "Low"),
            Err(CatalogError::NotFound("Weight".to_string()))
        );

        game.remove_feature("Genre").unwrap();
        assert!(!game.has_feature("Genre"));
        assert_eq!(
            game.remove_feature("Genre"),
            Err(CatalogError::NotFound("Genre".to_string()))
        );
    }

    #[test]
    fn test_cmp_by_rating() {
        let mut high = Game::new("High", 2, 4);
        high.add_rating("p1", 5).unwrap();

        let mut low = Game::new("Low", 2, 4);
        low.add_rating("p1", 3).unwrap();

        let mut tied = Game::new("Tied", 1, 8);
        tied.add_rating("p9", 5).unwrap();

        assert_eq!(high.cmp_by_rating(&low), Ordering::Greater);
        assert_eq!(low.cmp_by_rating(&high), Ordering::Less);
        assert_eq!(high.cmp_by_rating(&tied), Ordering::Equal);
    }

    #[test]
    fn test_game_display() {
        let mut game = create_test_game();
        game.add_rating("p1", 4).unwrap();
        assert_eq!(
            format!("{}", game),
            "Game[Name: Carcassonne, Players: 2-6, Avg rating: 4.00, Edition: Big Box]"
        );
        assert_eq!(
            format!("{}", Game::new("Chess", 2, 2)),
            "Game[Name: Chess, Players: 2-2, Avg rating: 0.00]"
        );
    }

    #[test]
    fn test_game_serialization() {
        let mut game = create_test_game();
        game.add_rating("p1", 4).unwrap();
        game.add_feature("Genre", "Family").unwrap();

        let json = serde_json::to_string(&game).unwrap();
        let deserialized: Game = serde_json::from_str(&json).unwrap();
        assert_eq!(game.name, deserialized.name);
        assert_eq!(deserialized.ratings().get("p1"), Some(&4));
        assert_eq!(deserialized.feature("Genre"), Some("Family"));
    }
}

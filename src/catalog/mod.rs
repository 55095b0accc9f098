//! The owning store for games, players, matches, and the similarity
//! relation, plus filter execution over it.

use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tracing::debug;

use crate::error::CatalogError;
use crate::filter::{Filter, SimilarityPairs};
use crate::models::{Game, Match, Player, PlayerId};

/// In-memory game catalog.
///
/// Games are keyed by name, players by id; matches keep insertion order.
/// Removal never cascades: dropping a game leaves its matches in place, and
/// dropping a player leaves their ratings and recorded results in place.
#[derive(Debug, Default)]
pub struct Catalog {
    games: BTreeMap<String, Game>,
    players: BTreeMap<PlayerId, Player>,
    matches: Vec<Match>,
    similar_games: SimilarityPairs,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    // --- Games ---

    /// Register a game. Names are unique within the catalog.
    pub fn add_game(&mut self, game: Game) -> Result<(), CatalogError> {
        if self.games.contains_key(&game.name) {
            return Err(CatalogError::DuplicateKey(format!("game '{}'", game.name)));
        }
        debug!("Added game '{}'", game.name);
        self.games.insert(game.name.clone(), game);
        Ok(())
    }

    /// Remove a game. Matches that reference it stay untouched.
    pub fn remove_game(&mut self, name: &str) -> Result<(), CatalogError> {
        if self.games.remove(name).is_none() {
            return Err(CatalogError::NotFound(format!("game '{}'", name)));
        }
        debug!("Removed game '{}'", name);
        Ok(())
    }

    /// Look up a game by name.
    pub fn get_game(&self, name: &str) -> Option<&Game> {
        self.games.get(name)
    }

    /// Mutable lookup, for editing features or ratings in place.
    pub fn get_game_mut(&mut self, name: &str) -> Option<&mut Game> {
        self.games.get_mut(name)
    }

    /// All games, keyed by name.
    pub fn games(&self) -> &BTreeMap<String, Game> {
        &self.games
    }

    /// Number of registered games.
    pub fn game_count(&self) -> usize {
        self.games.len()
    }

    // --- Players ---

    /// Register a player. Ids are unique within the catalog.
    pub fn add_player(&mut self, player: Player) -> Result<(), CatalogError> {
        if self.players.contains_key(player.id.as_str()) {
            return Err(CatalogError::DuplicateKey(format!(
                "player '{}'",
                player.id
            )));
        }
        debug!("Added player '{}'", player.id);
        self.players.insert(player.id.clone(), player);
        Ok(())
    }

    /// Remove a player. Ratings and match results they produced survive.
    pub fn remove_player(&mut self, id: &str) -> Result<(), CatalogError> {
        if self.players.remove(id).is_none() {
            return Err(CatalogError::NotFound(format!("player '{}'", id)));
        }
        debug!("Removed player '{}'", id);
        Ok(())
    }

    /// Look up a player by id.
    pub fn get_player(&self, id: &str) -> Option<&Player> {
        self.players.get(id)
    }

    /// All players, keyed by id.
    pub fn players(&self) -> &BTreeMap<PlayerId, Player> {
        &self.players
    }

    /// Number of registered players.
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    // --- Ratings ---

    /// Record a rating. Both the game and the player must be registered;
    /// range and per-player uniqueness checks are the game's own.
    pub fn add_rating(
        &mut self,
        game_name: &str,
        player_id: &str,
        score: u8,
    ) -> Result<(), CatalogError> {
        let game = self
            .games
            .get_mut(game_name)
            .ok_or_else(|| CatalogError::NotFound(format!("game '{}'", game_name)))?;
        if !self.players.contains_key(player_id) {
            return Err(CatalogError::NotFound(format!("player '{}'", player_id)));
        }
        game.add_rating(player_id, score)?;
        debug!("Player '{}' rated '{}' {}", player_id, game_name, score);
        Ok(())
    }

    // --- Matches ---

    /// Record a finished match and wire it into player histories.
    ///
    /// The referenced game must be registered. Participants are wired into
    /// their match history only when they are registered players; results of
    /// unregistered participants stay on the match but link nowhere.
    pub fn add_match(&mut self, game_match: Match) -> Result<(), CatalogError> {
        if !self.games.contains_key(game_match.game_name.as_str()) {
            return Err(CatalogError::ReferentialViolation(format!(
                "match '{}' references unknown game '{}'",
                game_match.id, game_match.game_name
            )));
        }
        for player_id in game_match.player_results().keys() {
            match self.players.get_mut(player_id.as_str()) {
                Some(player) => player.add_match_to_history(game_match.id.clone()),
                None => debug!(
                    "Match '{}' has a result for unregistered player '{}'",
                    game_match.id, player_id
                ),
            }
        }
        debug!(
            "Added match '{}' for game '{}'",
            game_match.id, game_match.game_name
        );
        self.matches.push(game_match);
        Ok(())
    }

    /// Look up a match by id. Ids are not enforced unique; the first
    /// recorded match wins.
    pub fn get_match(&self, id: &str) -> Option<&Match> {
        self.matches.iter().find(|m| m.id.as_str() == id)
    }

    /// All matches, in insertion order.
    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    /// Number of recorded matches.
    pub fn match_count(&self) -> usize {
        self.matches.len()
    }

    /// Matches played for a given game.
    pub fn matches_by_game(&self, game_name: &str) -> Vec<&Match> {
        self.matches
            .iter()
            .filter(|m| m.game_name == game_name)
            .collect()
    }

    /// Matches a given player took part in.
    pub fn matches_by_player(&self, player_id: &str) -> Vec<&Match> {
        self.matches
            .iter()
            .filter(|m| m.has_player(player_id))
            .collect()
    }

    /// Names of the games a player has played, unique and sorted.
    pub fn player_games(&self, player_id: &str) -> Vec<String> {
        let names: BTreeSet<&str> = self
            .matches
            .iter()
            .filter(|m| m.has_player(player_id))
            .map(|m| m.game_name.as_str())
            .collect();
        names.into_iter().map(String::from).collect()
    }

    /// Average of the results a player has recorded across all matches of
    /// one game. 0.0 when the player is unregistered or has no results.
    pub fn player_rating_in_game(&self, player_id: &str, game_name: &str) -> f64 {
        let results: Vec<f64> = self
            .matches
            .iter()
            .filter(|m| m.game_name == game_name)
            .filter_map(|m| m.player_result(player_id))
            .collect();
        match self.players.get(player_id) {
            Some(player) => player.average_result(&results),
            None => 0.0,
        }
    }

    // --- Similarity ---

    /// Declare two registered games similar.
    ///
    /// The relation is symmetric and stored once per pair, members in
    /// lexicographic order. Declaring an existing pair again is a no-op.
    pub fn add_similarity(&mut self, a: &str, b: &str) -> Result<(), CatalogError> {
        if !self.games.contains_key(a) {
            return Err(CatalogError::ReferentialViolation(format!(
                "unknown game '{}'",
                a
            )));
        }
        if !self.games.contains_key(b) {
            return Err(CatalogError::ReferentialViolation(format!(
                "unknown game '{}'",
                b
            )));
        }
        if a == b {
            return Err(CatalogError::ReferentialViolation(format!(
                "game '{}' cannot be similar to itself",
                a
            )));
        }
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        debug!("Marked '{}' and '{}' similar", lo, hi);
        self.similar_games.insert((lo.to_string(), hi.to_string()));
        Ok(())
    }

    /// Check the similarity relation in either argument order.
    pub fn are_similar(&self, a: &str, b: &str) -> bool {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        self.similar_games
            .contains(&(lo.to_string(), hi.to_string()))
    }

    /// Games similar to the given one. Canonical pair order makes the
    /// result already sorted.
    pub fn similar_games(&self, name: &str) -> Vec<String> {
        self.similar_games
            .iter()
            .filter_map(|(a, b)| {
                if a.as_str() == name {
                    Some(b.clone())
                } else if b.as_str() == name {
                    Some(a.clone())
                } else {
                    None
                }
            })
            .collect()
    }

    /// The whole similarity relation, for building similarity filters.
    pub fn similarity_pairs(&self) -> &SimilarityPairs {
        &self.similar_games
    }

    // --- Queries ---

    /// Run a single filter and sort the result by average rating, highest
    /// first.
    pub fn find_games(&self, filter: &Filter) -> Vec<Game> {
        let mut result = filter.apply(&self.games);
        sort_by_rating_desc(&mut result);
        result
    }

    /// Run a filter chain: the first filter sees the whole catalog, each
    /// later filter sees only what the previous one kept. An empty chain
    /// yields an empty result. The final rating sort applies regardless of
    /// which filters ran, so a similarity filter's score order does not
    /// survive to the output.
    pub fn find_games_chained(&self, filters: &[Filter]) -> Vec<Game> {
        if filters.is_empty() {
            return Vec::new();
        }
        let mut result = filters[0].apply(&self.games);
        for filter in &filters[1..] {
            let narrowed: BTreeMap<String, Game> = result
                .into_iter()
                .map(|game| (game.name.clone(), game))
                .collect();
            result = filter.apply(&narrowed);
        }
        sort_by_rating_desc(&mut result);
        result
    }

    /// Aggregate counts over the whole catalog.
    pub fn statistics(&self) -> CatalogStats {
        let rating_count: usize = self.games.values().map(Game::rating_count).sum();
        let rating_sum: u32 = self
            .games
            .values()
            .flat_map(|game| game.ratings().values())
            .map(|&score| u32::from(score))
            .sum();
        let average_rating = if rating_count == 0 {
            0.0
        } else {
            f64::from(rating_sum) / rating_count as f64
        };
        CatalogStats {
            game_count: self.games.len(),
            player_count: self.players.len(),
            match_count: self.matches.len(),
            rating_count,
            similarity_count: self.similar_games.len(),
            average_rating,
        }
    }
}

/// Sort games by average rating, highest first. Stable, so ties keep the
/// order the filter produced.
fn sort_by_rating_desc(games: &mut [Game]) {
    games.sort_by(|a, b| {
        b.average_rating()
            .partial_cmp(&a.average_rating())
            .unwrap_or(Ordering::Equal)
    });
}

/// Aggregate catalog counts, for reporting.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogStats {
    pub game_count: usize,
    pub player_count: usize,
    pub match_count: usize,
    pub rating_count: usize,
    pub similarity_count: usize,
    pub average_rating: f64,
}

impl fmt::Display for CatalogStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Games: {}, Players: {}, Matches: {}, Ratings: {}, Similarity pairs: {}, Average rating: {:.2}",
            self.game_count,
            self.player_count,
            self.match_count,
            self.rating_count,
            self.similarity_count,
            self.average_rating
        )
    }
}

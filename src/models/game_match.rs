//! Match model: a recorded play of one game on a given date.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use super::{MatchId, PlayerId};
use crate::error::CatalogError;

/// A dated play record with per-player numeric results.
///
/// Results carry no range validation: a result may be win/loss (1/0) or a
/// raw score, positive or negative. The game is referenced by name only, so
/// removing that game from the catalog later leaves the name dangling here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Match {
    /// Unique identifier
    pub id: MatchId,

    /// Name of the game played (weak reference, not ownership)
    pub game_name: String,

    /// Date the match was played
    pub date: NaiveDate,

    /// Result per participating player
    results: BTreeMap<PlayerId, f64>,
}

impl Match {
    /// Create a new Match with no participants yet.
    pub fn new(id: impl Into<MatchId>, game_name: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id: id.into(),
            game_name: game_name.into(),
            date,
            results: BTreeMap::new(),
        }
    }

    /// Record a participant's result. Each player appears at most once.
    pub fn add_player_result(&mut self, player_id: &str, result: f64) -> Result<(), CatalogError> {
        if self.results.contains_key(player_id) {
            return Err(CatalogError::DuplicateKey(player_id.to_string()));
        }
        self.results.insert(PlayerId::from(player_id), result);
        Ok(())
    }

    /// The recorded result for a player, if they participated.
    pub fn player_result(&self, player_id: &str) -> Option<f64> {
        self.results.get(player_id).copied()
    }

    /// Check whether a player participated.
    pub fn has_player(&self, player_id: &str) -> bool {
        self.results.contains_key(player_id)
    }

    /// All participant results.
    pub fn player_results(&self) -> &BTreeMap<PlayerId, f64> {
        &self.results
    }

    /// Number of participants.
    pub fn player_count(&self) -> usize {
        self.results.len()
    }

    /// The participant with the highest result, or `None` when the match has
    /// no participants. Ties go to the first maximal entry in id order.
    pub fn winner(&self) -> Option<&PlayerId> {
        self.results
            .iter()
            .reduce(|best, entry| if entry.1 > best.1 { entry } else { best })
            .map(|(id, _)| id)
    }

    /// Compare two matches by date alone.
    pub fn cmp_by_date(&self, other: &Match) -> Ordering {
        self.date.cmp(&other.date)
    }
}

impl fmt::Display for Match {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Match[ID: {}, Game: {}, Date: {}, Players: {}]",
            self.id,
            self.game_name,
            self.date,
            self.results.len()
        )
    }
}

//! Player model.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{MatchId, PlayerId};

/// A registered player: identity plus an append-only match history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Unique identifier
    pub id: PlayerId,

    /// Display name (may be empty)
    pub name: String,

    /// Ids of matches this player took part in, in insertion order.
    /// The catalog keeps this consistent; the player itself does not
    /// deduplicate or validate entries.
    match_history: Vec<MatchId>,
}

impl Player {
    /// Create a new Player with an empty match history.
    pub fn new(id: impl Into<PlayerId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            match_history: Vec::new(),
        }
    }

    /// Append a match id to the history.
    pub fn add_match_to_history(&mut self, match_id: MatchId) {
        self.match_history.push(match_id);
    }

    /// Match ids in insertion order.
    pub fn match_history(&self) -> &[MatchId] {
        &self.match_history
    }

    /// Number of matches played.
    pub fn matches_played(&self) -> usize {
        self.match_history.len()
    }

    /// Mean of the supplied match results, 0.0 for an empty slice.
    ///
    /// Pure computation: the catalog gathers the results and delegates here.
    pub fn average_result(&self, results: &[f64]) -> f64 {
        if results.is_empty() {
            return 0.0;
        }
        results.iter().sum::<f64>() / results.len() as f64
    }
}

// Player identity is the id alone; name and history do not participate.
impl PartialEq for Player {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Player {}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Player[ID: {}", self.id)?;
        if !self.name.is_empty() {
            write!(f, ", Name: {}", self.name)?;
        }
        write!(f, ", Matches played: {}]", self.match_history.len())
    }
}

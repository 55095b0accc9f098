//! Composable game filters.
//!
//! The filter kinds are a closed set dispatched by pattern matching:
//! - **Rating**: average-rating threshold
//! - **Feature**: required feature pairs, with player-count pseudo-features
//! - **Similarity**: games related to a set of reference games, scored
//!
//! Filters are plain values. Each one consumes a name-keyed catalog map and
//! returns a filtered subset; combining filters into a chain and the final
//! rating sort belong to the catalog, not to the filters.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::models::Game;

/// The symmetric similarity relation: each unordered pair stored once with
/// its members in lexicographic order.
pub type SimilarityPairs = BTreeSet<(String, String)>;

/// A predicate over the game catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Filter {
    /// Keep games whose average rating reaches the threshold (inclusive).
    Rating { min_rating: f64 },

    /// Keep games satisfying every required feature pair.
    Feature { required: BTreeMap<String, String> },

    /// Keep games similar to at least one reference game, most similar
    /// first. Holds a snapshot of the similarity pairs, so relation edits
    /// made after construction are not visible to this filter.
    Similarity {
        reference_games: Vec<String>,
        pairs: SimilarityPairs,
    },
}

impl Filter {
    /// Rating-threshold filter.
    pub fn by_rating(min_rating: f64) -> Self {
        Filter::Rating { min_rating }
    }

    /// Required-features filter.
    ///
    /// Three pseudo-feature keys are checked against the game itself rather
    /// than its feature map: `minPlayers` and `maxPlayers` compare the
    /// numeric player bounds (as strings, exact match), and `players`
    /// matches games whose player range contains the given count.
    pub fn by_features(required: BTreeMap<String, String>) -> Self {
        Filter::Feature { required }
    }

    /// Similarity filter over a snapshot of the catalog's similarity pairs.
    pub fn similar_to(reference_games: Vec<String>, pairs: SimilarityPairs) -> Self {
        Filter::Similarity {
            reference_games,
            pairs,
        }
    }

    /// Run the filter against a name-keyed catalog map.
    ///
    /// Returns owned clones. Output order is unspecified for the rating and
    /// feature variants; the similarity variant orders by descending score,
    /// though the catalog's final rating sort overrides that ordering when a
    /// query runs through it.
    pub fn apply(&self, games: &BTreeMap<String, Game>) -> Vec<Game> {
        match self {
            Filter::Rating { min_rating } => games
                .values()
                .filter(|game| game.average_rating() >= *min_rating)
                .cloned()
                .collect(),
            Filter::Feature { required } => games
                .values()
                .filter(|game| matches_all_features(game, required))
                .cloned()
                .collect(),
            Filter::Similarity {
                reference_games,
                pairs,
            } => {
                let mut scored: Vec<(Game, usize)> = games
                    .values()
                    .filter(|game| !reference_games.contains(&game.name))
                    .filter_map(|game| {
                        let score = similarity_score(&game.name, reference_games, pairs);
                        (score > 0).then(|| (game.clone(), score))
                    })
                    .collect();
                // Stable sort: equal scores keep catalog (name) order.
                scored.sort_by(|a, b| b.1.cmp(&a.1));
                scored.into_iter().map(|(game, _)| game).collect()
            }
        }
    }
}

/// True iff the game satisfies every required pair.
fn matches_all_features(game: &Game, required: &BTreeMap<String, String>) -> bool {
    required.iter().all(|(name, value)| match name.as_str() {
        "minPlayers" => game.min_players.to_string() == *value,
        "maxPlayers" => game.max_players.to_string() == *value,
        "players" => match value.parse::<u32>() {
            Ok(count) => game.min_players <= count && count <= game.max_players,
            Err(_) => false,
        },
        _ => game.feature(name) == Some(value.as_str()),
    })
}

/// How many reference games are similar to the given game.
fn similarity_score(game_name: &str, references: &[String], pairs: &SimilarityPairs) -> usize {
    references
        .iter()
        .filter(|reference| are_similar(pairs, game_name, reference))
        .count()
}

/// Symmetric lookup: storage is canonicalized, queries may come in either
/// order.
fn are_similar(pairs: &SimilarityPairs, a: &str, b: &str) -> bool {
    pairs.contains(&(a.to_string(), b.to_string()))
        || pairs.contains(&(b.to_string(), a.to_string()))
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Rating { min_rating } => {
                write!(f, "RatingFilter[min rating >= {:.2}]", min_rating)
            }
            Filter::Feature { required } => {
                write!(f, "FeatureFilter[required: ")?;
                for (i, (name, value)) in required.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}='{}'", name, value)?;
                }
                write!(f, "]")
            }
            Filter::Similarity {
                reference_games, ..
            } => {
                write!(f, "SimilarityFilter[references: ")?;
                for (i, name) in reference_games.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "'{}'", name)?;
                }
                write!(f, "]")
            }
        }
    }
}

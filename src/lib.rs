//! # Game Shelf
//!
//! An in-memory board game catalog with ratings, match records, and
//! composable search filters.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (games, players, matches)
//! - **filter**: Composable filters (rating threshold, features, similarity)
//! - **catalog**: The owning store and filter execution
//! - **error**: The error type shared across the crate

pub mod catalog;
pub mod error;
pub mod filter;
pub mod models;

pub use catalog::{Catalog, CatalogStats};
pub use error::CatalogError;
pub use filter::{Filter, SimilarityPairs};
pub use models::*;

/// Parse a "name=value" feature pair (e.g., "Genre=Strategy").
pub fn parse_feature_pair(s: &str) -> Option<(String, String)> {
    let (name, value) = s.split_once('=')?;
    let name = name.trim();
    let value = value.trim();
    if name.is_empty() || value.is_empty() {
        return None;
    }
    Some((name.to_string(), value.to_string()))
}

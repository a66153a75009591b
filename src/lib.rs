//! VibeCheck: business reviews with a heuristic "vibe score".
//!
//! Every submitted review is scored by [`scorer::Scorer`] and the owning
//! business's cached aggregate is refreshed by [`aggregator`] in the same
//! database transaction.
pub mod aggregator;
pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod lexicon;
pub mod models;
pub mod scorer;

pub use error::AppError;
pub use scorer::{Scorer, Sentiment, VibeResult};

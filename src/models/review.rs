// src/models/review.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scorer::Sentiment;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Review {
    pub id: i64,
    pub business_id: i64,            // Business the review is about
    pub user_id: i64,                // Author
    pub content: String,             // Raw review text
    pub vibe_score: Option<u8>,      // None until scored
    pub sentiment: Option<Sentiment>,
    pub keywords: Option<Vec<String>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct NewReview {
    pub content: String,
}

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Business {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub location: String,
    pub aggregated_vibe_score: f64, // Cached mean of scored reviews
    pub total_reviews: i64,         // Cached count of all reviews
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct NewBusiness {
    pub name: String,
    pub category: String,
    pub location: String,
}

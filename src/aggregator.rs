//! Keeps a business's cached `aggregated_vibe_score` and `total_reviews` in
//! line with its reviews.
//!
//! Metrics are always recomputed from the full review set rather than
//! updated incrementally. Callers run [`refresh_business_metrics`] inside the
//! same transaction that inserted the review, so the review and the refreshed
//! aggregate commit or roll back together.
use std::fmt;
use std::str::FromStr;

use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, warn};

use crate::error::AppError;

/// What a refresh does when the business row is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingBusinessPolicy {
    /// Do nothing; the caller has already checked existence.
    #[default]
    Ignore,
    /// Fail with [`AppError::BusinessNotFound`].
    Report,
}

impl FromStr for MissingBusinessPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ignore" => Ok(MissingBusinessPolicy::Ignore),
            "report" => Ok(MissingBusinessPolicy::Report),
            other => Err(format!("expected 'ignore' or 'report', got '{other}'")),
        }
    }
}

impl fmt::Display for MissingBusinessPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingBusinessPolicy::Ignore => f.write_str("ignore"),
            MissingBusinessPolicy::Report => f.write_str("report"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BusinessMetrics {
    pub aggregated_vibe_score: f64,
    pub total_reviews: i64,
}

/// Mean of the present scores rounded to two decimals (0.0 when none are
/// present) and the count of all reviews, scored or not.
pub fn compute_metrics(scores: &[Option<u8>]) -> BusinessMetrics {
    let scored: Vec<f64> = scores.iter().flatten().map(|s| f64::from(*s)).collect();
    let aggregated_vibe_score = if scored.is_empty() {
        0.0
    } else {
        round2(scored.iter().sum::<f64>() / scored.len() as f64)
    };

    BusinessMetrics {
        aggregated_vibe_score,
        total_reviews: scores.len() as i64,
    }
}

// Formatting expands the exact binary value and breaks ties to even, so
// 80.125 becomes 80.12.
fn round2(value: f64) -> f64 {
    format!("{value:.2}").parse().unwrap_or(value)
}

/// Recomputes and stores the metrics for one business.
///
/// Returns `Ok(None)` when the business does not exist and the policy is
/// [`MissingBusinessPolicy::Ignore`]. Both fields are written by a single
/// `UPDATE`, so a partial write is never visible.
pub fn refresh_business_metrics(
    conn: &Connection,
    business_id: i64,
    policy: MissingBusinessPolicy,
) -> Result<Option<BusinessMetrics>, AppError> {
    let exists = conn
        .query_row(
            "SELECT 1 FROM businesses WHERE id = ?",
            [business_id],
            |_| Ok(()),
        )
        .optional()?
        .is_some();

    if !exists {
        return match policy {
            MissingBusinessPolicy::Ignore => {
                debug!("[AGG] Business {} not found, skipping refresh", business_id);
                Ok(None)
            }
            MissingBusinessPolicy::Report => {
                warn!("[AGG] Refresh requested for missing business {}", business_id);
                Err(AppError::BusinessNotFound(business_id))
            }
        };
    }

    let scores = {
        let mut stmt = conn.prepare("SELECT vibe_score FROM reviews WHERE business_id = ?")?;
        let rows = stmt.query_map([business_id], |row| row.get::<_, Option<u8>>(0))?;
        rows.collect::<Result<Vec<_>, _>>()?
    };

    let metrics = compute_metrics(&scores);
    conn.execute(
        "UPDATE businesses SET aggregated_vibe_score = ?, total_reviews = ? WHERE id = ?",
        params![metrics.aggregated_vibe_score, metrics.total_reviews, business_id],
    )?;

    debug!(
        "[AGG] Business {} refreshed: score {:.2} over {} reviews",
        business_id, metrics.aggregated_vibe_score, metrics.total_reviews
    );
    Ok(Some(metrics))
}

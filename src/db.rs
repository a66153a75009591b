use std::sync::Arc;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::aggregator::{self, BusinessMetrics, MissingBusinessPolicy};
use crate::auth::{hash_password, verify_password};
use crate::error::AppError;
use crate::models::business::{Business, NewBusiness};
use crate::models::review::Review;
use crate::models::user::{NewUser, User};
use crate::scorer::{Scorer, Sentiment};

type Result<T> = std::result::Result<T, AppError>;

const BUSINESS_COLUMNS: &str =
    "id, name, category, location, aggregated_vibe_score, total_reviews";
const REVIEW_COLUMNS: &str =
    "id, business_id, user_id, content, vibe_score, sentiment, keywords, created_at";
const USER_COLUMNS: &str = "id, username, email, hashed_password, created_at";

// Shared handle to the SQLite store
#[derive(Debug, Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    // Open (or create) the database at `db_path`; ":memory:" for a throwaway store
    pub fn new(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        info!("Database connection established at: {}", db_path);
        Ok(Database {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    // Create the database schema
    pub async fn create_schema(&self) -> Result<()> {
        let conn = self.conn.lock().await;

        // 1. Users table
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY,
                username TEXT NOT NULL UNIQUE,
                email TEXT NOT NULL UNIQUE,
                hashed_password TEXT NOT NULL,
                created_at TEXT NOT NULL
            );",
        )
        .map_err(|e| {
            error!("Failed creating users table: {}", e);
            e
        })?;

        // 2. Businesses table, carrying the cached review metrics
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS businesses (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                category TEXT NOT NULL,
                location TEXT NOT NULL,
                aggregated_vibe_score REAL NOT NULL DEFAULT 0.0,
                total_reviews INTEGER NOT NULL DEFAULT 0
            );",
        )
        .map_err(|e| {
            error!("Failed creating businesses table: {}", e);
            e
        })?;

        // 3. Reviews table
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS reviews (
                id INTEGER PRIMARY KEY,
                business_id INTEGER NOT NULL,
                user_id INTEGER NOT NULL,
                content TEXT NOT NULL,
                vibe_score INTEGER CHECK (vibe_score BETWEEN 0 AND 100),
                sentiment TEXT CHECK (sentiment IN ('positive', 'neutral', 'negative')),
                keywords TEXT,
                created_at TEXT NOT NULL,
                FOREIGN KEY (business_id) REFERENCES businesses(id),
                FOREIGN KEY (user_id) REFERENCES users(id)
            );
            CREATE INDEX IF NOT EXISTS idx_reviews_business ON reviews(business_id);",
        )
        .map_err(|e| {
            error!("Failed creating reviews table: {}", e);
            e
        })?;

        Ok(())
    }

    // Register a new user; username and email must both be unused
    pub async fn create_user(&self, new_user: &NewUser) -> Result<User> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;

        let username_taken = tx
            .query_row(
                "SELECT 1 FROM users WHERE username = ?",
                [&new_user.username],
                |_| Ok(()),
            )
            .optional()?
            .is_some();
        if username_taken {
            return Err(AppError::UsernameTaken);
        }

        let email_taken = tx
            .query_row(
                "SELECT 1 FROM users WHERE email = ?",
                [&new_user.email],
                |_| Ok(()),
            )
            .optional()?
            .is_some();
        if email_taken {
            return Err(AppError::EmailTaken);
        }

        let created_at = Utc::now();
        tx.execute(
            "INSERT INTO users (username, email, hashed_password, created_at)
            VALUES (?, ?, ?, ?)",
            params![
                &new_user.username,
                &new_user.email,
                hash_password(&new_user.password),
                created_at
            ],
        )?;
        let id = tx.last_insert_rowid();
        let user = tx.query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"),
            [id],
            user_from_row,
        )?;

        tx.commit()?;
        info!("[DB] User {} registered as '{}'", id, user.username);
        Ok(user)
    }

    // Look up a user by name and check the password against the stored hash
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<User> {
        let conn = self.conn.lock().await;
        let user = conn
            .query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?"),
                [username],
                user_from_row,
            )
            .optional()?;

        match user {
            Some(user) if verify_password(password, &user.hashed_password) => Ok(user),
            _ => {
                debug!("[DB] Failed login for '{}'", username);
                Err(AppError::InvalidCredentials)
            }
        }
    }

    pub async fn create_business(&self, new_business: &NewBusiness) -> Result<Business> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO businesses (name, category, location) VALUES (?, ?, ?)",
            params![
                &new_business.name,
                &new_business.category,
                &new_business.location
            ],
        )?;
        let id = conn.last_insert_rowid();
        let business = conn.query_row(
            &format!("SELECT {BUSINESS_COLUMNS} FROM businesses WHERE id = ?"),
            [id],
            business_from_row,
        )?;
        info!("[DB] Business {} created: {}", id, business.name);
        Ok(business)
    }

    // Retrieve all businesses, oldest first
    pub async fn list_businesses(&self) -> Result<Vec<Business>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(&format!(
            "SELECT {BUSINESS_COLUMNS} FROM businesses ORDER BY id ASC"
        ))?;
        let rows = stmt.query_map([], business_from_row)?;

        let mut businesses = Vec::new();
        for business in rows {
            businesses.push(business?);
        }
        debug!("[DB] Fetched {} businesses", businesses.len());
        Ok(businesses)
    }

    pub async fn get_business(&self, business_id: i64) -> Result<Option<Business>> {
        let conn = self.conn.lock().await;
        let business = conn
            .query_row(
                &format!("SELECT {BUSINESS_COLUMNS} FROM businesses WHERE id = ?"),
                [business_id],
                business_from_row,
            )
            .optional()?;
        Ok(business)
    }

    /// Scores and stores a review, then refreshes the business aggregate.
    ///
    /// Validation, insert and refresh share one transaction: if any step
    /// fails nothing is committed, and a committed review is always reflected
    /// in the business's metrics.
    pub async fn submit_review(
        &self,
        business_id: i64,
        user_id: i64,
        content: &str,
        scorer: &Scorer,
        policy: MissingBusinessPolicy,
    ) -> Result<Review> {
        debug!(
            "[DB] Starting review insert for business {}, user {}",
            business_id, user_id
        );

        let lock_start = std::time::Instant::now();
        let mut conn = self.conn.lock().await;
        debug!("[DB] Lock acquired in {:?}", lock_start.elapsed());

        let tx = conn.transaction().map_err(|e| {
            error!("[DB] Transaction start failed: {:?}", e);
            e
        })?;

        // 1. Existence checks
        if !row_exists(&tx, "SELECT 1 FROM businesses WHERE id = ?", business_id)? {
            return Err(AppError::BusinessNotFound(business_id));
        }
        if !row_exists(&tx, "SELECT 1 FROM users WHERE id = ?", user_id)? {
            return Err(AppError::UserNotFound(user_id));
        }

        // 2. Scoring
        let vibe = scorer.score(content);
        let keywords = serde_json::to_string(&vibe.keywords)
            .map_err(|e| AppError::CorruptRecord(format!("keywords: {e}")))?;

        // 3. Review insertion
        tx.execute(
            "INSERT INTO reviews
                (business_id, user_id, content, vibe_score, sentiment, keywords, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)",
            params![
                business_id,
                user_id,
                content,
                vibe.vibe_score,
                vibe.sentiment.as_str(),
                keywords,
                Utc::now()
            ],
        )?;
        let review_id = tx.last_insert_rowid();

        // 4. Aggregate refresh
        aggregator::refresh_business_metrics(&tx, business_id, policy)?;

        let review = tx
            .query_row(
                &format!("SELECT {REVIEW_COLUMNS} FROM reviews WHERE id = ?"),
                [review_id],
                ReviewRow::from_row,
            )?
            .into_review()?;

        tx.commit()?;
        info!(
            "[DB] Review {} stored for business {} (score {}, {})",
            review.id, business_id, vibe.vibe_score, vibe.sentiment
        );
        Ok(review)
    }

    // Retrieve every review for a business, oldest first
    pub async fn get_reviews_for_business(&self, business_id: i64) -> Result<Vec<Review>> {
        let conn = self.conn.lock().await;
        if !row_exists(&conn, "SELECT 1 FROM businesses WHERE id = ?", business_id)? {
            return Err(AppError::BusinessNotFound(business_id));
        }

        let mut stmt = conn.prepare(&format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews WHERE business_id = ? ORDER BY id ASC"
        ))?;
        let rows = stmt.query_map([business_id], ReviewRow::from_row)?;

        let mut reviews = Vec::new();
        for row in rows {
            reviews.push(row?.into_review()?);
        }
        debug!(
            "[DB] Fetched {} reviews for business {}",
            reviews.len(),
            business_id
        );
        Ok(reviews)
    }

    // Recompute a business's cached metrics in a transaction of its own
    pub async fn refresh_business_metrics(
        &self,
        business_id: i64,
        policy: MissingBusinessPolicy,
    ) -> Result<Option<BusinessMetrics>> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;
        let metrics = aggregator::refresh_business_metrics(&tx, business_id, policy)?;
        tx.commit()?;
        Ok(metrics)
    }
}

fn row_exists(conn: &Connection, sql: &str, id: i64) -> Result<bool> {
    Ok(conn.query_row(sql, [id], |_| Ok(())).optional()?.is_some())
}

fn business_from_row(row: &Row<'_>) -> rusqlite::Result<Business> {
    Ok(Business {
        id: row.get(0)?,
        name: row.get(1)?,
        category: row.get(2)?,
        location: row.get(3)?,
        aggregated_vibe_score: row.get(4)?,
        total_reviews: row.get(5)?,
    })
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        hashed_password: row.get(3)?,
        created_at: row.get(4)?,
    })
}

// Review columns as stored; sentiment and keywords are decoded afterwards
struct ReviewRow {
    id: i64,
    business_id: i64,
    user_id: i64,
    content: String,
    vibe_score: Option<u8>,
    sentiment: Option<String>,
    keywords: Option<String>,
    created_at: DateTime<Utc>,
}

impl ReviewRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(ReviewRow {
            id: row.get(0)?,
            business_id: row.get(1)?,
            user_id: row.get(2)?,
            content: row.get(3)?,
            vibe_score: row.get(4)?,
            sentiment: row.get(5)?,
            keywords: row.get(6)?,
            created_at: row.get(7)?,
        })
    }

    fn into_review(self) -> Result<Review> {
        let sentiment = self
            .sentiment
            .map(|s| s.parse::<Sentiment>())
            .transpose()
            .map_err(|e| AppError::CorruptRecord(format!("review {}: {e}", self.id)))?;
        let keywords = self
            .keywords
            .map(|k| serde_json::from_str::<Vec<String>>(&k))
            .transpose()
            .map_err(|e| AppError::CorruptRecord(format!("review {} keywords: {e}", self.id)))?;

        Ok(Review {
            id: self.id,
            business_id: self.business_id,
            user_id: self.user_id,
            content: self.content,
            vibe_score: self.vibe_score,
            sentiment,
            keywords,
            created_at: self.created_at,
        })
    }
}

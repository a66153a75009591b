use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::aggregator::MissingBusinessPolicy;
use crate::db::Database;
use crate::error::AppError;
use crate::models::business::NewBusiness;
use crate::models::review::NewReview;
use crate::models::user::{LoginRequest, NewUser, User};
use crate::scorer::Scorer;

const MIN_PASSWORD_LEN: usize = 6;

/// Shared by every worker.
pub struct AppState {
    pub db: Database,
    pub scorer: Scorer,
    pub missing_business: MissingBusinessPolicy,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct LoginResponse {
    pub message: String,
    pub user: User,
}

#[derive(Deserialize, Debug)]
pub struct ReviewAuthor {
    pub user_id: i64,
}

#[derive(Deserialize, Debug)]
pub struct AnalyzeRequest {
    pub text: String,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(home))
        .route("/health", web::get().to(health))
        .route("/register", web::post().to(register))
        .route("/login", web::post().to(login))
        .route("/analyze", web::post().to(analyze))
        .route("/businesses", web::get().to(list_businesses))
        .route("/businesses", web::post().to(create_business))
        .route("/businesses/{business_id}", web::get().to(get_business))
        .route(
            "/businesses/{business_id}/reviews",
            web::get().to(get_reviews),
        )
        .route(
            "/businesses/{business_id}/reviews",
            web::post().to(submit_review),
        );
}

pub async fn home() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "active",
        "message": "VibeCheck Business Platform API"
    }))
}

pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

pub async fn register(
    state: web::Data<AppState>,
    request: web::Json<NewUser>,
) -> Result<HttpResponse, AppError> {
    let new_user = request.into_inner();
    require_text("username", &new_user.username)?;
    if !new_user.email.contains('@') {
        return Err(AppError::Validation("A valid email is required".into()));
    }
    if new_user.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    let user = state.db.create_user(&new_user).await?;
    info!("[API] Registered user {}", user.id);
    Ok(HttpResponse::Created().json(user))
}

pub async fn login(
    state: web::Data<AppState>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let user = state
        .db
        .authenticate(&request.username, &request.password)
        .await?;
    Ok(HttpResponse::Ok().json(LoginResponse {
        message: "Authentication successful".into(),
        user,
    }))
}

pub async fn analyze(
    state: web::Data<AppState>,
    request: web::Json<AnalyzeRequest>,
) -> HttpResponse {
    HttpResponse::Ok().json(state.scorer.score(&request.text))
}

pub async fn list_businesses(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let businesses = state.db.list_businesses().await?;
    Ok(HttpResponse::Ok().json(businesses))
}

pub async fn create_business(
    state: web::Data<AppState>,
    request: web::Json<NewBusiness>,
) -> Result<HttpResponse, AppError> {
    let new_business = request.into_inner();
    require_text("name", &new_business.name)?;
    require_text("category", &new_business.category)?;
    require_text("location", &new_business.location)?;

    let business = state.db.create_business(&new_business).await?;
    Ok(HttpResponse::Created().json(business))
}

pub async fn get_business(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let business_id = path.into_inner();
    match state.db.get_business(business_id).await? {
        Some(business) => Ok(HttpResponse::Ok().json(business)),
        None => Err(AppError::BusinessNotFound(business_id)),
    }
}

pub async fn submit_review(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    author: web::Query<ReviewAuthor>,
    request: web::Json<NewReview>,
) -> Result<HttpResponse, AppError> {
    let business_id = path.into_inner();
    info!(
        "[API] Review submitted for business {} by user {}",
        business_id, author.user_id
    );

    let review = state
        .db
        .submit_review(
            business_id,
            author.user_id,
            &request.content,
            &state.scorer,
            state.missing_business,
        )
        .await?;
    Ok(HttpResponse::Created().json(review))
}

pub async fn get_reviews(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let reviews = state.db.get_reviews_for_business(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(reviews))
}

fn require_text(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

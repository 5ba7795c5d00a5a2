use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::{Value, json};
use tracing::{info, warn};
use uuid::Uuid;

use shiftbook_core::CoreError;
use shiftbook_db::{Document, DocumentStore, InstantAdapter, is_unique_violation};
use shiftbook_types::Envelope;
use shiftbook_types::api::{Claims, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
use shiftbook_types::models::User;

use crate::error::{ApiError, ApiResult};
use crate::state::{AppState, run_blocking};
use crate::validation::validate_credentials;

pub const USERS: &str = "users";
pub const DEFAULT_ROLES: &[&str] = &["user"];

enum Registration {
    Created(Uuid),
    Taken,
}

pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(req) = payload?;
    validate_credentials(&req.username, &req.password)?;

    let username = req.username.clone();
    let outcome = run_blocking(&state, move |db| {
        if db.find_by_username(USERS, &req.username)?.is_some() {
            return Ok(Registration::Taken);
        }

        let password_hash = hash_password(&req.password)?;
        let user_id = Uuid::new_v4();
        let doc = json!({
            "username": req.username,
            "password": password_hash,
            "roles": DEFAULT_ROLES,
            "createdAt": db.encode_instant(Utc::now()),
        });
        // Concurrent registrations can all pass the lookup; the unique
        // username index decides.
        match db.create_document(USERS, doc, Some(&user_id.to_string())) {
            Ok(_) => Ok(Registration::Created(user_id)),
            Err(e) if is_unique_violation(&e) => Ok(Registration::Taken),
            Err(e) => Err(e.into()),
        }
    })
    .await?;

    let user_id = match outcome {
        Registration::Created(id) => id,
        Registration::Taken => {
            return Err(ApiError::Conflict(format!("username {username:?} is already taken")));
        }
    };

    let roles = DEFAULT_ROLES.iter().map(|r| r.to_string()).collect();
    let token = create_token(&state, user_id, &username, roles)?;
    info!(%user_id, %username, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(Envelope::success(RegisterResponse { user_id, token })),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(req) = payload?;

    let found = run_blocking(&state, move |db| {
        let Some(doc) = db.find_by_username(USERS, &req.username)? else {
            return Ok(None);
        };
        let Some((user, stored_hash)) = user_from_document(&doc) else {
            return Ok(None);
        };
        Ok(verify_password(&req.password, &stored_hash).then_some(user))
    })
    .await?;

    let Some(user) = found else {
        warn!("failed login attempt");
        return Err(ApiError::Unauthorized);
    };

    let user_id: Uuid = user
        .id
        .parse()
        .map_err(|_| ApiError::internal(format!("user {} has a non-uuid id", user.id)))?;
    let token = create_token(&state, user_id, &user.username, user.roles)?;

    Ok(Json(Envelope::success(LoginResponse {
        user_id,
        username: user.username,
        token,
    })))
}

/// Public user fields plus the stored password hash.
fn user_from_document(doc: &Document) -> Option<(User, String)> {
    let username = doc.field("username")?.as_str()?.to_string();
    let hash = doc.field("password")?.as_str()?.to_string();
    let roles = doc
        .field("roles")
        .and_then(Value::as_array)
        .map(|roles| roles.iter().filter_map(Value::as_str).map(String::from).collect())
        .unwrap_or_default();
    let created_at = doc.field("createdAt").and_then(shiftbook_db::coerce_instant);

    Some((
        User {
            id: doc.id.clone(),
            username,
            roles,
            created_at,
        },
        hash,
    ))
}

fn hash_password(password: &str) -> Result<String, CoreError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| CoreError::Store(anyhow::anyhow!("password hashing failed: {e}")))
}

fn verify_password(password: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

pub(crate) fn create_token(
    state: &AppState,
    user_id: Uuid,
    username: &str,
    roles: Vec<String>,
) -> ApiResult<String> {
    let claims = Claims {
        sub: user_id,
        username: username.to_string(),
        roles,
        exp: (Utc::now() + state.token_ttl).timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(state.jwt_secret.as_bytes()),
    )
    .map_err(|e| ApiError::internal(format!("token encoding failed: {e}")))
}

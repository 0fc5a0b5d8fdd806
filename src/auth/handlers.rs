use axum::{
    extract::{rejection::JsonRejection, FromRef, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{CredentialsRequest, MessageResponse, PublicUser, TokenResponse},
        jwt::JwtKeys,
        password::{hash_password, verify_password},
    },
    error::ApiError,
    state::AppState,
    store::InsertUserError,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(sign_up))
        .route("/signin", post(sign_in))
        .route("/signout", post(sign_out))
}

#[instrument(skip(state, payload))]
pub async fn sign_up(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PublicUser>), ApiError> {
    let Json(payload) = payload.map_err(|_| ApiError::bad_request("cannot parse JSON"))?;

    if payload.username.is_empty() || payload.password.is_empty() {
        return Err(ApiError::bad_request(
            "username and password should not be blank",
        ));
    }

    // Pre-insert existence check; the unique index on username closes the
    // race between concurrent sign-ups.
    if state
        .users
        .find_by_username(&payload.username)
        .await?
        .is_some()
    {
        warn!(username = %payload.username, "username already taken");
        return Err(ApiError::conflict("username already taken"));
    }

    let hash = hash_password(&payload.password)?;

    let user = match state.users.insert(&payload.username, &hash).await {
        Ok(u) => u,
        Err(InsertUserError::UsernameTaken) => {
            warn!(username = %payload.username, "lost sign-up race");
            return Err(ApiError::conflict("username already taken"));
        }
        Err(InsertUserError::Store(e)) => return Err(e.into()),
    };

    info!(user_id = %user.id, username = %user.username, "user signed up");
    Ok((
        StatusCode::CREATED,
        Json(PublicUser {
            id: user.id,
            username: user.username,
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn sign_in(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, ApiError> {
    let Json(payload) = payload.map_err(|_| ApiError::bad_request("cannot parse JSON"))?;

    if payload.username.is_empty() || payload.password.is_empty() {
        return Err(ApiError::bad_request(
            "username and password should not be blank",
        ));
    }

    // Unknown username and wrong password answer identically.
    let Some(user) = state.users.find_by_username(&payload.username).await? else {
        warn!(username = %payload.username, "sign-in with unknown username");
        return Err(ApiError::Unauthorized);
    };

    if !verify_password(&payload.password, &user.password_hash) {
        warn!(user_id = %user.id, "sign-in with invalid password");
        return Err(ApiError::Unauthorized);
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id)?;

    info!(user_id = %user.id, "user signed in");
    Ok(Json(TokenResponse { token }))
}

/// Stateless acknowledgment. There is no server-side revocation; issued
/// tokens stay valid until they expire.
#[instrument]
pub async fn sign_out() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "signed out".into(),
    })
}

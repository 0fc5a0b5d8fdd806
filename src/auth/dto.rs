use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request body for sign-up and sign-in.
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

/// Response returned after a successful sign-in.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Simple acknowledgment body.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Public view of a user; the password hash never leaves the server.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub username: String,
}

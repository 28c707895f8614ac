pub mod credentials;
pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::User;

// Re-export necessary items
pub use extractors::AuthenticatedUser;
pub use middleware::{AuthMiddleware, TOKEN_COOKIE};
pub use token::{Claims, TokenService};

lazy_static! {
    // At least one non-whitespace character.
    static ref NON_BLANK_REGEX: regex::Regex = regex::Regex::new(r"\S").unwrap();
}

/// Represents the payload for a user login request.
///
/// Missing fields deserialize as empty strings and fail validation, so every malformed
/// payload gets the same 400 shape.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Represents the payload for a new user registration request.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct RegisterRequest {
    /// Display name. Must contain a non-whitespace character.
    #[validate(
        length(min = 1, max = 100),
        regex(path = "NON_BLANK_REGEX", message = "Name must not be blank")
    )]
    pub name: String,
    #[validate(email(message = "Email must be a valid address"))]
    pub email: String,
    /// Between 6 and 72 characters; bcrypt ignores anything past 72 bytes.
    #[validate(length(
        min = 6,
        max = 72,
        message = "Password must be between 6 and 72 characters"
    ))]
    pub password: String,
}

/// Response structure after successful authentication (login or registration).
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: String,
    /// Session token to present as `Authorization: Bearer <token>`.
    pub token: String,
    pub user: User,
}

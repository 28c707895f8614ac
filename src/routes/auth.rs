use crate::{
    auth::{credentials, AuthResponse, LoginRequest, RegisterRequest, TOKEN_COOKIE},
    error::AppError,
    models::User,
    state::AppState,
};
use actix_web::{
    cookie::{time, Cookie, SameSite},
    post, web, HttpResponse, HttpResponseBuilder, Responder,
};
use validator::Validate;

/// Register a new user
///
/// Creates a new account and returns a session token, also set as an httpOnly cookie.
///
/// ## Responses:
/// - `201 Created`: `{message, token, user}`.
/// - `400 Bad Request`: Missing fields, malformed email, short password, or email already on file.
#[post("/register")]
pub async fn register(
    state: web::Data<AppState>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    register_data.validate()?;

    let user = credentials::create_user(
        state.users.as_ref(),
        &register_data.name,
        &register_data.email,
        &register_data.password,
        state.bcrypt_cost,
    )
    .await?;
    log::info!("Registered user {}", user.id);

    session_response(HttpResponse::Created(), &state, user, "User created successfully")
}

/// Login user
///
/// Authenticates a user and returns a session token, also set as an httpOnly cookie.
///
/// ## Responses:
/// - `200 OK`: `{message, token, user}`.
/// - `400 Bad Request`: Missing fields.
/// - `401 Unauthorized`: Unknown email or wrong password.
#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    login_data.validate()?;

    let user = credentials::authenticate(
        state.users.as_ref(),
        &login_data.email,
        &login_data.password,
    )
    .await?;
    log::info!("User {} logged in", user.id);

    session_response(HttpResponse::Ok(), &state, user, "Login successful")
}

fn session_response(
    mut builder: HttpResponseBuilder,
    state: &AppState,
    user: User,
    message: &str,
) -> Result<HttpResponse, AppError> {
    let token = state.tokens.issue(user.id, &user.email)?;
    let cookie = Cookie::build(TOKEN_COOKIE, token.clone())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(state.tokens.ttl().num_seconds()))
        .finish();

    Ok(builder.cookie(cookie).json(AuthResponse {
        message: message.to_string(),
        token,
        user,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TokenService;
    use actix_web::{http::StatusCode, test, App};
    use serde_json::json;

    fn state() -> AppState {
        let tokens = TokenService::new("auth_route_secret", chrono::Duration::hours(1)).unwrap();
        AppState::in_memory(tokens, 4)
    }

    #[actix_rt::test]
    async fn test_register_sets_cookie_and_hides_password() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state()))
                .service(register),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/register")
            .set_json(json!({
                "name": "Ann",
                "email": "ann@x.com",
                "password": "secret1"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let cookie = resp
            .response()
            .cookies()
            .find(|c| c.name() == TOKEN_COOKIE)
            .expect("session cookie");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
        let cookie_value = cookie.value().to_string();

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["token"], cookie_value.as_str());
        assert_eq!(body["user"]["name"], "Ann");
        assert!(body["user"].get("passwordHash").is_none());
    }

    #[actix_rt::test]
    async fn test_login_rejects_unknown_user() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state()))
                .service(login),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/login")
            .set_json(json!({ "email": "nobody@x.com", "password": "secret1" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Invalid credentials");
    }
}

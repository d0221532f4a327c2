//! Authentication endpoints.
//!
//! ```text
//! POST /api/v1/auth/register {"name":"Ada","email":"ada@example.com","password":"123456","role":"publisher"}
//! POST /api/v1/auth/login {"email":"ada@example.com","password":"123456"}
//! GET  /api/v1/auth/me
//! ```
//!
//! Every sign-in returns `{success, token}` and sets the `token` cookie.

use actix_web::{HttpRequest, HttpResponse, get, post, put, web};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::ports::{AuthSession, ProfileUpdate, ResetRequest};
use crate::domain::{EmailAddress, Error, LoginCredentials, Password, Registration, User, UserName};

use super::auth::{CurrentUser, logout_cookie, session_cookie};
use super::envelope::{self, Envelope};
use super::state::HttpState;
use super::validation::{account_error, auth_error};
use super::ApiResult;

/// Body of `POST /auth/register`.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    /// `user` (default) or `publisher`.
    pub role: Option<String>,
}

/// Body of `POST /auth/login`.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body of `PUT /auth/updatedetails`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateDetailsRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Body of `PUT /auth/updatepassword`.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdatePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Body of `POST /auth/forgotpassword`.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// Body of `PUT /auth/resetpassword/{token}`.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct ResetPasswordRequest {
    pub password: String,
}

fn token_response(state: &HttpState, session: AuthSession) -> HttpResponse {
    let token = String::from(session.token);
    HttpResponse::Ok()
        .cookie(session_cookie(&token, state))
        .json(Envelope::token(token))
}

/// Register an account and sign it in.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Signed in", headers(("Set-Cookie" = String, description = "token cookie"))),
        (status = 400, description = "Invalid payload or email taken", body = Error),
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let RegisterRequest {
        name,
        email,
        password,
        role,
    } = payload.into_inner();
    let registration = Registration::try_from_parts(&name, &email, &password, role.as_deref())
        .map_err(auth_error)?;
    let session = state.auth.register(registration).await?;
    Ok(token_response(&state, session))
}

/// Sign in with email and password.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", headers(("Set-Cookie" = String, description = "token cookie"))),
        (status = 400, description = "Missing email or password", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials = LoginCredentials::try_from_parts(&payload.email, &payload.password)
        .map_err(auth_error)?;
    let session = state.auth.login(credentials).await?;
    Ok(token_response(&state, session))
}

/// Clear the session cookie.
#[utoipa::path(
    get,
    path = "/api/v1/auth/logout",
    responses((status = 200, description = "Signed out")),
    tags = ["auth"],
    operation_id = "logout",
    security([])
)]
#[get("/auth/logout")]
pub async fn logout(state: web::Data<HttpState>) -> HttpResponse {
    let mut response = envelope::empty();
    if let Err(error) = response.add_cookie(&logout_cookie(&state)) {
        tracing::warn!(%error, "failed to attach logout cookie");
    }
    response
}

/// The signed-in account.
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    responses(
        (status = 200, description = "Current account", body = User),
        (status = 401, description = "Not signed in", body = Error),
    ),
    tags = ["auth"],
    operation_id = "me"
)]
#[get("/auth/me")]
pub async fn me(state: web::Data<HttpState>, user: CurrentUser) -> ApiResult<HttpResponse> {
    let account = state.auth.current_user(&user.0).await?;
    Ok(envelope::ok(account))
}

/// Change the signed-in account's name or email.
#[utoipa::path(
    put,
    path = "/api/v1/auth/updatedetails",
    request_body = UpdateDetailsRequest,
    responses(
        (status = 200, description = "Updated account", body = User),
        (status = 400, description = "Invalid payload or email taken", body = Error),
        (status = 401, description = "Not signed in", body = Error),
    ),
    tags = ["auth"],
    operation_id = "updateDetails"
)]
#[put("/auth/updatedetails")]
pub async fn update_details(
    state: web::Data<HttpState>,
    user: CurrentUser,
    payload: web::Json<UpdateDetailsRequest>,
) -> ApiResult<HttpResponse> {
    let UpdateDetailsRequest { name, email } = payload.into_inner();
    let update = ProfileUpdate {
        name: name.map(UserName::new).transpose().map_err(account_error)?,
        email: email.map(EmailAddress::new).transpose().map_err(account_error)?,
    };
    let account = state.auth.update_details(&user.0, update).await?;
    Ok(envelope::ok(account))
}

/// Change the signed-in account's password.
#[utoipa::path(
    put,
    path = "/api/v1/auth/updatepassword",
    request_body = UpdatePasswordRequest,
    responses(
        (status = 200, description = "Password changed; fresh token issued"),
        (status = 400, description = "New password too short", body = Error),
        (status = 401, description = "Current password is wrong", body = Error),
    ),
    tags = ["auth"],
    operation_id = "updatePassword"
)]
#[put("/auth/updatepassword")]
pub async fn update_password(
    state: web::Data<HttpState>,
    user: CurrentUser,
    payload: web::Json<UpdatePasswordRequest>,
) -> ApiResult<HttpResponse> {
    let new_password = Password::new(&payload.new_password).map_err(auth_error)?;
    let session = state
        .auth
        .update_password(&user.0, &payload.current_password, new_password)
        .await?;
    Ok(token_response(&state, session))
}

fn reset_url_base(req: &HttpRequest) -> String {
    let info = req.connection_info();
    format!(
        "{}://{}/api/v1/auth/resetpassword/",
        info.scheme(),
        info.host()
    )
}

/// Email a password-reset link.
#[utoipa::path(
    post,
    path = "/api/v1/auth/forgotpassword",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Email sent"),
        (status = 404, description = "No account with that email", body = Error),
        (status = 500, description = "Email could not be sent", body = Error),
    ),
    tags = ["auth"],
    operation_id = "forgotPassword",
    security([])
)]
#[post("/auth/forgotpassword")]
pub async fn forgot_password(
    req: HttpRequest,
    state: web::Data<HttpState>,
    payload: web::Json<ForgotPasswordRequest>,
) -> ApiResult<HttpResponse> {
    let request = ResetRequest {
        email: payload.into_inner().email,
        reset_url_base: reset_url_base(&req),
    };
    state.auth.forgot_password(request).await?;
    Ok(envelope::ok("Email sent"))
}

/// Redeem a reset token and sign in.
#[utoipa::path(
    put,
    path = "/api/v1/auth/resetpassword/{token}",
    params(("token" = String, Path, description = "Raw reset token from the email")),
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password reset; signed in"),
        (status = 400, description = "Invalid or expired token", body = Error),
    ),
    tags = ["auth"],
    operation_id = "resetPassword",
    security([])
)]
#[put("/auth/resetpassword/{token}")]
pub async fn reset_password(
    state: web::Data<HttpState>,
    token: web::Path<String>,
    payload: web::Json<ResetPasswordRequest>,
) -> ApiResult<HttpResponse> {
    let password = Password::new(&payload.password).map_err(auth_error)?;
    let session = state.auth.reset_password(&token, password).await?;
    Ok(token_response(&state, session))
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;

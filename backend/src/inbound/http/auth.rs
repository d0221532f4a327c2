//! Token transport for HTTP handlers.
//!
//! Callers authenticate with `Authorization: Bearer <token>` or a `token`
//! cookie; the header wins when both are present. [`CurrentUser`] resolves
//! the token through [`AuthService::authenticate`](crate::domain::ports::AuthService)
//! on every request, so a deleted account's token stops working at once.

use actix_web::cookie::time::{Duration as CookieDuration, OffsetDateTime};
use actix_web::cookie::{Cookie, SameSite};
use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;
use tracing::debug;

use crate::domain::{Error, Principal};

use super::state::HttpState;

/// Name of the session cookie.
pub const TOKEN_COOKIE: &str = "token";
/// Value written to the cookie on logout.
const LOGGED_OUT: &str = "none";
/// Lifetime of the logout cookie.
const LOGOUT_TTL_SECONDS: i64 = 10;

/// Raw token presented by the caller, if any.
pub fn presented_token(req: &HttpRequest) -> Option<String> {
    let bearer = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty());
    if let Some(token) = bearer {
        return Some(token.to_owned());
    }
    req.cookie(TOKEN_COOKIE)
        .map(|cookie| cookie.value().to_owned())
        .filter(|token| !token.is_empty() && token != LOGGED_OUT)
}

/// Authenticated principal extracted from the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser(pub Principal);

impl FromRequest for CurrentUser {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        let token = presented_token(req);
        Box::pin(async move {
            let state =
                state.ok_or_else(|| Error::internal("HTTP state is not registered"))?;
            let Some(token) = token else {
                debug!("request carried no token");
                return Err(Error::unauthorized("Not authorized to access this route").into());
            };
            let principal = state.auth.authenticate(&token).await?;
            Ok(CurrentUser(principal))
        })
    }
}

fn unix_to_offset(seconds: i64) -> OffsetDateTime {
    OffsetDateTime::from_unix_timestamp(seconds).unwrap_or(OffsetDateTime::UNIX_EPOCH)
}

/// Session cookie carrying `token`, expiring `expire_days` after `now`.
pub fn session_cookie(token: &str, state: &HttpState) -> Cookie<'static> {
    let now = state.clock.utc().timestamp();
    let lifetime = CookieDuration::days(i64::from(state.settings.cookie_expire_days));
    Cookie::build(TOKEN_COOKIE, token.to_owned())
        .path("/")
        .http_only(true)
        .secure(state.settings.cookie_secure)
        .same_site(SameSite::Lax)
        .expires(unix_to_offset(now) + lifetime)
        .finish()
}

/// Short-lived cookie overwriting the session on logout.
pub fn logout_cookie(state: &HttpState) -> Cookie<'static> {
    let now = state.clock.utc().timestamp();
    Cookie::build(TOKEN_COOKIE, LOGGED_OUT)
        .path("/")
        .http_only(true)
        .secure(state.settings.cookie_secure)
        .same_site(SameSite::Lax)
        .expires(unix_to_offset(now + LOGOUT_TTL_SECONDS))
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockAuthService;
    use crate::domain::{Role, UserId};
    use crate::inbound::http::test_utils::state_with;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test as actix_test};
    use rstest::rstest;

    async fn whoami(user: CurrentUser) -> HttpResponse {
        HttpResponse::Ok().body(user.0.id.to_string())
    }

    #[rstest]
    #[case::bearer(Some("Bearer abc"), None, Some("abc"))]
    #[case::cookie(None, Some("abc"), Some("abc"))]
    #[case::header_wins(Some("Bearer head"), Some("jar"), Some("head"))]
    #[case::logged_out(None, Some("none"), None)]
    #[case::wrong_scheme(Some("Basic abc"), None, None)]
    #[case::nothing(None, None, None)]
    fn token_sources(
        #[case] header: Option<&str>,
        #[case] cookie: Option<&str>,
        #[case] expected: Option<&str>,
    ) {
        let mut request = actix_test::TestRequest::default();
        if let Some(header) = header {
            request = request.insert_header((AUTHORIZATION, header));
        }
        if let Some(cookie) = cookie {
            request = request.cookie(Cookie::new(TOKEN_COOKIE, cookie));
        }
        let req = request.to_http_request();
        assert_eq!(presented_token(&req).as_deref(), expected);
    }

    #[actix_web::test]
    async fn valid_tokens_resolve_to_the_principal() {
        let id = UserId::random();
        let mut auth = MockAuthService::new();
        auth.expect_authenticate()
            .withf(|token| token == "good")
            .returning(move |_| Ok(Principal { id, role: Role::User }));
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state_with(|ports| ports.auth = auth)))
                .route("/", web::get().to(whoami)),
        )
        .await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/")
                .insert_header((AUTHORIZATION, "Bearer good"))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(actix_test::read_body(res).await, id.to_string());
    }

    #[actix_web::test]
    async fn missing_tokens_are_unauthorised() {
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state_with(|_| {})))
                .route("/", web::get().to(whoami)),
        )
        .await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[rstest]
    fn session_cookies_follow_settings() {
        let mut state = state_with(|_| {});
        state.settings.cookie_secure = true;
        let cookie = session_cookie("abc", &state);

        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
        let expected = unix_to_offset(state.clock.utc().timestamp()) + CookieDuration::days(30);
        assert_eq!(cookie.expires_datetime(), Some(expected));
    }

    #[rstest]
    fn logout_cookie_expires_in_ten_seconds() {
        let state = state_with(|_| {});
        let cookie = logout_cookie(&state);

        assert_eq!(cookie.value(), "none");
        let expected = unix_to_offset(state.clock.utc().timestamp() + 10);
        assert_eq!(cookie.expires_datetime(), Some(expected));
    }
}

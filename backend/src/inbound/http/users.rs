//! Account administration endpoints. Every route requires the `admin` role,
//! which the service checks before touching storage.
//!
//! ```text
//! GET  /api/v1/users?sort=name
//! POST /api/v1/users {"name":"Eve","email":"eve@example.com","password":"123456","role":"publisher"}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::ports::{NewAccount, UserUpdate};
use crate::domain::{EmailAddress, Error, Password, Role, User, UserId, UserName, UserSortField};

use super::ApiResult;
use super::auth::CurrentUser;
use super::envelope::{self, Envelope};
use super::list_params::{ListParams, Projection, USER_FIELDS};
use super::state::HttpState;
use super::validation::{account_error, auth_error, parse_id};

/// Body of `POST /users`.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    /// `user` (default), `publisher` or `admin`.
    pub role: Option<String>,
}

/// Body of `PUT /users/{id}`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
}

fn parse_role(raw: Option<&str>) -> Result<Option<Role>, Error> {
    raw.map(str::parse::<Role>).transpose().map_err(account_error)
}

impl TryFrom<CreateUserRequest> for NewAccount {
    type Error = Error;

    fn try_from(value: CreateUserRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: UserName::new(&value.name).map_err(account_error)?,
            email: EmailAddress::new(&value.email).map_err(account_error)?,
            password: Password::new(&value.password).map_err(auth_error)?,
            role: parse_role(value.role.as_deref())?.unwrap_or_default(),
        })
    }
}

impl TryFrom<UpdateUserRequest> for UserUpdate {
    type Error = Error;

    fn try_from(value: UpdateUserRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: value.name.map(UserName::new).transpose().map_err(account_error)?,
            email: value.email.map(EmailAddress::new).transpose().map_err(account_error)?,
            role: parse_role(value.role.as_deref())?,
        })
    }
}

/// List accounts.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    params(ListParams),
    responses(
        (status = 200, description = "One page of accounts", body = [User]),
        (status = 401, description = "Not signed in", body = Error),
        (status = 403, description = "Not an administrator", body = Error),
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    user: CurrentUser,
    params: web::Query<ListParams>,
) -> ApiResult<HttpResponse> {
    let projection = Projection::parse(params.select.as_deref(), USER_FIELDS)?;
    let query = params.into_inner().into_query::<UserSortField>()?;
    let page = state.users.list(&user.0, query).await?;
    Ok(HttpResponse::Ok().json(Envelope::page(projection.apply(page)?)))
}

/// One account.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "Account id")),
    responses(
        (status = 200, description = "Account", body = User),
        (status = 403, description = "Not an administrator", body = Error),
        (status = 404, description = "No such account", body = Error),
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    user: CurrentUser,
    id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id: UserId = parse_id(&id)?;
    Ok(envelope::ok(state.users.get(&user.0, id).await?))
}

/// Create an account with any role.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "Created", body = User),
        (status = 400, description = "Invalid payload or email taken", body = Error),
        (status = 403, description = "Not an administrator", body = Error),
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    user: CurrentUser,
    payload: web::Json<CreateUserRequest>,
) -> ApiResult<HttpResponse> {
    let account = NewAccount::try_from(payload.into_inner())?;
    let created = state.users.create(&user.0, account).await?;
    Ok(envelope::created(created))
}

/// Change an account's name, email or role.
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "Account id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated", body = User),
        (status = 400, description = "Invalid payload or email taken", body = Error),
        (status = 403, description = "Not an administrator", body = Error),
        (status = 404, description = "No such account", body = Error),
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    user: CurrentUser,
    id: web::Path<String>,
    payload: web::Json<UpdateUserRequest>,
) -> ApiResult<HttpResponse> {
    let id: UserId = parse_id(&id)?;
    let update = UserUpdate::try_from(payload.into_inner())?;
    Ok(envelope::ok(state.users.update(&user.0, id, update).await?))
}

/// Delete an account.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "Account id")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 403, description = "Not an administrator", body = Error),
        (status = 404, description = "No such account", body = Error),
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    user: CurrentUser,
    id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id: UserId = parse_id(&id)?;
    state.users.delete(&user.0, id).await?;
    Ok(envelope::empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::{BEARER, accept_token, principal, state_with, test_app};
    use crate::test_support::fixture_timestamp;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use pagination::Page;
    use rstest::rstest;
    use serde_json::{Value, json};

    fn account(name: &str, role: Role) -> User {
        User {
            id: UserId::random(),
            name: UserName::new(name).expect("name"),
            email: EmailAddress::new(format!("{}@example.com", name.to_lowercase()))
                .expect("email"),
            role,
            created_at: fixture_timestamp(),
        }
    }

    #[rstest]
    #[actix_web::test]
    async fn non_admins_are_forbidden() {
        let caller = principal(Role::Publisher);
        let state = state_with(|mocks| {
            accept_token(&mut mocks.auth, caller);
            mocks.users.expect_list().returning(|principal, _| {
                Err(Error::forbidden(format!(
                    "User role {} is not authorized to access this route",
                    principal.role
                )))
            });
        });
        let app = test::init_service(test_app(state)).await;

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/users")
                .insert_header(BEARER)
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::FORBIDDEN);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(
            body["error"],
            "User role publisher is not authorized to access this route"
        );
    }

    #[rstest]
    #[actix_web::test]
    async fn list_returns_a_page_of_accounts() {
        let caller = principal(Role::Admin);
        let state = state_with(|mocks| {
            accept_token(&mut mocks.auth, caller);
            mocks.users.expect_list().return_once(|_, query| {
                Ok(Page {
                    items: vec![account("Ada", Role::User), account("Eve", Role::Publisher)],
                    total: 2,
                    request: query.page,
                })
            });
        });
        let app = test::init_service(test_app(state)).await;

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/users?sort=name")
                .insert_header(BEARER)
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["count"], 2);
        assert_eq!(body["data"][1]["role"], "publisher");
    }

    #[rstest]
    #[actix_web::test]
    async fn admins_may_create_other_admins() {
        let caller = principal(Role::Admin);
        let created = account("Root", Role::Admin);
        let state = state_with(|mocks| {
            accept_token(&mut mocks.auth, caller);
            mocks
                .users
                .expect_create()
                .withf(|_, account| account.role == Role::Admin)
                .return_once(move |_, _| Ok(created));
        });
        let app = test::init_service(test_app(state)).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/users")
                .insert_header(BEARER)
                .set_json(json!({
                    "name": "Root",
                    "email": "root@example.com",
                    "password": "123456",
                    "role": "admin",
                }))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::CREATED);
    }

    #[rstest]
    #[actix_web::test]
    async fn unknown_roles_are_rejected() {
        let caller = principal(Role::Admin);
        let state = state_with(|mocks| accept_token(&mut mocks.auth, caller));
        let app = test::init_service(test_app(state)).await;

        let res = test::call_service(
            &app,
            test::TestRequest::put()
                .uri(&format!("/api/v1/users/{}", UserId::random()))
                .insert_header(BEARER)
                .set_json(json!({"role": "superuser"}))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["details"]["field"], "role");
    }

    #[rstest]
    #[actix_web::test]
    async fn delete_passes_the_target_id() {
        let caller = principal(Role::Admin);
        let target = UserId::random();
        let state = state_with(|mocks| {
            accept_token(&mut mocks.auth, caller);
            mocks
                .users
                .expect_delete()
                .withf(move |_, id| *id == target)
                .returning(|_, _| Ok(()));
        });
        let app = test::init_service(test_app(state)).await;

        let res = test::call_service(
            &app,
            test::TestRequest::delete()
                .uri(&format!("/api/v1/users/{target}"))
                .insert_header(BEARER)
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
    }
}

//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] collects every `/api/v1` handler, the health probes and the
//! wire schemas. Two security schemes are declared because the API accepts
//! the JWT either as a bearer token or as the `token` cookie set at sign-in.
//!
//! Swagger UI serves the document at `/docs` in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{
    Bootcamp, BootcampDetail, BootcampSummary, Career, Course, CourseDetail, Error, ErrorCode,
    LocationDto, MinimumSkill, Review, ReviewDetail, Role, User,
};
use crate::inbound::http::bootcamps::BootcampRequest;
use crate::inbound::http::courses::CourseRequest;
use crate::inbound::http::reviews::ReviewRequest;
use crate::inbound::http::session::{
    ForgotPasswordRequest, LoginRequest, RegisterRequest, ResetPasswordRequest,
    UpdateDetailsRequest, UpdatePasswordRequest,
};
use crate::inbound::http::users::{CreateUserRequest, UpdateUserRequest};

/// Register the bearer and cookie security schemes.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
        components.add_security_scheme(
            "TokenCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "token",
                "JWT cookie set by the sign-in endpoints.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Bootcamp directory API",
        description = "Bootcamps, their courses and reviews, with JWT-authenticated publishing."
    ),
    servers((url = "/", description = "Relative to the deployment base URL")),
    security(("BearerToken" = []), ("TokenCookie" = [])),
    paths(
        crate::inbound::http::session::register,
        crate::inbound::http::session::login,
        crate::inbound::http::session::logout,
        crate::inbound::http::session::me,
        crate::inbound::http::session::update_details,
        crate::inbound::http::session::update_password,
        crate::inbound::http::session::forgot_password,
        crate::inbound::http::session::reset_password,
        crate::inbound::http::bootcamps::list_bootcamps,
        crate::inbound::http::bootcamps::bootcamps_in_radius,
        crate::inbound::http::bootcamps::get_bootcamp,
        crate::inbound::http::bootcamps::create_bootcamp,
        crate::inbound::http::bootcamps::update_bootcamp,
        crate::inbound::http::bootcamps::delete_bootcamp,
        crate::inbound::http::bootcamps::upload_photo,
        crate::inbound::http::courses::list_courses,
        crate::inbound::http::courses::list_bootcamp_courses,
        crate::inbound::http::courses::get_course,
        crate::inbound::http::courses::add_course,
        crate::inbound::http::courses::update_course,
        crate::inbound::http::courses::delete_course,
        crate::inbound::http::reviews::list_reviews,
        crate::inbound::http::reviews::list_bootcamp_reviews,
        crate::inbound::http::reviews::get_review,
        crate::inbound::http::reviews::add_review,
        crate::inbound::http::reviews::update_review,
        crate::inbound::http::reviews::delete_review,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        Bootcamp,
        BootcampDetail,
        BootcampSummary,
        LocationDto,
        Career,
        Course,
        CourseDetail,
        MinimumSkill,
        Review,
        ReviewDetail,
        User,
        Role,
        BootcampRequest,
        CourseRequest,
        ReviewRequest,
        RegisterRequest,
        LoginRequest,
        UpdateDetailsRequest,
        UpdatePasswordRequest,
        ForgotPasswordRequest,
        ResetPasswordRequest,
        CreateUserRequest,
        UpdateUserRequest,
    )),
    tags(
        (name = "auth", description = "Registration, sign-in and password management"),
        (name = "bootcamps", description = "Bootcamp listings"),
        (name = "courses", description = "Courses offered by bootcamps"),
        (name = "reviews", description = "Reviews of bootcamps"),
        (name = "users", description = "Account administration"),
        (name = "health", description = "Orchestration probes")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn object_fields(name: &str) -> Vec<String> {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        match schemas.get(name).expect("schema registered") {
            RefOr::T(Schema::Object(obj)) => obj.properties.keys().cloned().collect(),
            _ => panic!("expected an object schema for {name}"),
        }
    }

    #[rstest]
    fn error_schema_matches_the_failure_envelope() {
        let fields = object_fields("Error");
        for field in ["success", "error", "code", "details", "traceId"] {
            assert!(fields.iter().any(|f| f == field), "missing {field}");
        }
    }

    #[rstest]
    #[case("Bootcamp", "averageCost")]
    #[case("Course", "minimumSkill")]
    #[case("User", "createdAt")]
    fn entity_schemas_use_camel_case(#[case] schema: &str, #[case] field: &str) {
        assert!(object_fields(schema).iter().any(|f| f == field));
    }

    #[rstest]
    #[case("/api/v1/bootcamps/radius/{zipcode}/{distance}")]
    #[case("/api/v1/auth/resetpassword/{token}")]
    #[case("/api/v1/users/{id}")]
    #[case("/health/ready")]
    fn paths_are_documented(#[case] path: &str) {
        assert!(ApiDoc::openapi().paths.paths.contains_key(path));
    }

    #[rstest]
    fn both_token_transports_are_declared() {
        let doc = ApiDoc::openapi();
        let schemes = &doc
            .components
            .as_ref()
            .expect("components")
            .security_schemes;
        assert!(schemes.contains_key("BearerToken"));
        assert!(schemes.contains_key("TokenCookie"));
    }
}

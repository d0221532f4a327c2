//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};

use crate::Trace;
use crate::domain::ports::{
    MockAuthService, MockBootcampService, MockCourseService, MockReviewService,
    MockUserAdminService,
};
use crate::domain::{Principal, Role, UserId};
use crate::inbound::http::error::extractor_configs;
use crate::inbound::http::routes;
use crate::inbound::http::state::{HttpSettings, HttpState};
use crate::test_support::MutableClock;

/// Mocked driving ports; tests set expectations before wiring.
pub struct MockServices {
    pub auth: MockAuthService,
    pub bootcamps: MockBootcampService,
    pub courses: MockCourseService,
    pub reviews: MockReviewService,
    pub users: MockUserAdminService,
}

/// Build state over mocks configured by `configure`.
pub fn state_with(configure: impl FnOnce(&mut MockServices)) -> HttpState {
    let mut mocks = MockServices {
        auth: MockAuthService::new(),
        bootcamps: MockBootcampService::new(),
        courses: MockCourseService::new(),
        reviews: MockReviewService::new(),
        users: MockUserAdminService::new(),
    };
    configure(&mut mocks);
    HttpState {
        auth: Arc::new(mocks.auth),
        bootcamps: Arc::new(mocks.bootcamps),
        courses: Arc::new(mocks.courses),
        reviews: Arc::new(mocks.reviews),
        users: Arc::new(mocks.users),
        clock: Arc::new(MutableClock::at_fixture()),
        settings: HttpSettings::default(),
    }
}

/// Principal with `role` and a fresh id.
pub fn principal(role: Role) -> Principal {
    Principal {
        id: UserId::random(),
        role,
    }
}

/// Make `auth` accept the bearer token `"test-token"` as `principal`.
pub fn accept_token(auth: &mut MockAuthService, principal: Principal) {
    auth.expect_authenticate()
        .withf(|token| token == "test-token")
        .returning(move |_| Ok(principal));
}

/// Header value presenting the token accepted by [`accept_token`].
pub const BEARER: (&str, &str) = ("Authorization", "Bearer test-token");

/// Full application over `state`, mirroring the production wiring.
pub fn test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let (json, path, query) = extractor_configs(64 * 1024);
    App::new()
        .app_data(web::Data::new(state))
        .app_data(json)
        .app_data(path)
        .app_data(query)
        .wrap(Trace)
        .configure(routes::configure)
}

//! Shared harness for the end-to-end API suites.
//!
//! Every world wires the real services over the in-memory store, so the
//! suites exercise handlers, services and adapters together without a
//! database or network.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use actix_web::{App, web};
use rstest::fixture;
use serde_json::{Value, json};
use tempfile::TempDir;

use bootcamp_directory::Trace;
use bootcamp_directory::domain::GeoPoint;
use bootcamp_directory::domain::ports::{FixtureGeocoder, FixtureMailer};
use bootcamp_directory::inbound::http::error::extractor_configs;
use bootcamp_directory::inbound::http::routes;
use bootcamp_directory::inbound::http::state::{HttpSettings, HttpState, HttpStatePorts};
use bootcamp_directory::outbound::credential_hasher::Argon2CredentialHasher;
use bootcamp_directory::outbound::memory::MemoryStore;
use bootcamp_directory::outbound::photo_store::CapStdPhotoStore;
use bootcamp_directory::outbound::token_issuer::JwtTokenIssuer;
use bootcamp_directory::test_support::MutableClock;

/// Wired state plus the doubles tests inspect afterwards.
pub struct World {
    pub state: HttpState,
    pub mailer: FixtureMailer,
    pub clock: Arc<MutableClock>,
    pub uploads: TempDir,
}

/// Boston, where every address in these suites resolves.
pub fn boston() -> GeoPoint {
    GeoPoint::new(-71.104_028, 42.350_846).expect("valid point")
}

#[fixture]
pub fn world() -> World {
    let store = MemoryStore::new();
    let clock = Arc::new(MutableClock::at_fixture());
    let mailer = FixtureMailer::default();
    let uploads = tempfile::tempdir().expect("upload dir");
    let geocoder = FixtureGeocoder::new()
        .with_fallback(FixtureGeocoder::location_at(boston(), "Boston", "02215"));
    let ports = HttpStatePorts {
        bootcamps: Arc::new(store.clone()),
        courses: Arc::new(store.clone()),
        reviews: Arc::new(store.clone()),
        users: Arc::new(store),
        geocoder: Arc::new(geocoder),
        mailer: Arc::new(mailer.clone()),
        photos: Arc::new(CapStdPhotoStore::open(uploads.path()).expect("photo store")),
        hasher: Arc::new(Argon2CredentialHasher::new()),
        tokens: Arc::new(JwtTokenIssuer::new(b"integration-secret", 30, clock.clone())),
        clock: clock.clone(),
    };
    World {
        state: HttpState::wire(ports, HttpSettings::default()),
        mailer,
        clock,
        uploads,
    }
}

/// Application mounted the way the server mounts it. The factory owns a
/// clone of the state, so it does not borrow `state`.
pub fn app(
    state: &HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    > + use<>,
> {
    let (json, path, query) = extractor_configs(64 * 1024);
    App::new()
        .app_data(web::Data::new(state.clone()))
        .app_data(json)
        .app_data(path)
        .app_data(query)
        .wrap(Trace)
        .configure(routes::configure)
}

/// Send `req` through a fresh application over the world's state.
///
/// Services share the store, so consecutive calls observe each other.
pub async fn call(world: &World, req: TestRequest) -> (StatusCode, Value) {
    let app = test::init_service(app(&world.state)).await;
    let res = test::call_service(&app, req.to_request()).await;
    let status = res.status();
    let body: Value = test::read_body_json(res).await;
    (status, body)
}

/// `req` carrying `token` as a bearer credential.
pub fn bearer(req: TestRequest, token: &str) -> TestRequest {
    req.insert_header(("Authorization", format!("Bearer {token}")))
}

/// Register an account and return its token.
pub async fn register(world: &World, name: &str, email: &str, role: &str) -> String {
    let (status, body) = call(
        world,
        TestRequest::post().uri("/api/v1/auth/register").set_json(json!({
            "name": name,
            "email": email,
            "password": "123456",
            "role": role,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "register {email}: {body}");
    body["token"].as_str().expect("token").to_owned()
}

/// Minimal valid bootcamp payload named `name`.
pub fn bootcamp_body(name: &str) -> Value {
    json!({
        "name": name,
        "description": "Full stack web development with a job guarantee",
        "address": "233 Bay State Rd Boston MA 02215",
        "careers": ["Web Development", "UI/UX"],
        "housing": true,
        "jobGuarantee": true,
    })
}

/// Create a bootcamp as `token` and return its id.
pub async fn create_bootcamp(world: &World, token: &str, name: &str) -> String {
    let (status, body) = call(
        world,
        bearer(TestRequest::post().uri("/api/v1/bootcamps"), token).set_json(bootcamp_body(name)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create {name}: {body}");
    body["data"]["id"].as_str().expect("bootcamp id").to_owned()
}

//! Builders choosing driven-port adapters from configuration.
//!
//! Every optional collaborator has a local stand-in so a bare `cargo run`
//! serves the full API: the in-memory store replaces PostgreSQL, a fixed
//! Boston location replaces the geocoder and a logging mailer replaces the
//! relay.

use std::io;
use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use bootcamp_directory::domain::GeoPoint;
use bootcamp_directory::domain::ports::{
    BootcampRepository, CourseRepository, FixtureGeocoder, Geocoder, Mailer, ReviewRepository,
    UserRepository,
};
use bootcamp_directory::inbound::http::state::{HttpState, HttpStatePorts};
use bootcamp_directory::outbound::credential_hasher::Argon2CredentialHasher;
use bootcamp_directory::outbound::geocoder::HttpGeocoder;
use bootcamp_directory::outbound::mailer::{HttpMailer, LogMailer};
use bootcamp_directory::outbound::memory::MemoryStore;
use bootcamp_directory::outbound::persistence::{
    DbPool, DieselBootcampRepository, DieselCourseRepository, DieselReviewRepository,
    DieselUserRepository,
};
use bootcamp_directory::outbound::photo_store::CapStdPhotoStore;
use bootcamp_directory::outbound::token_issuer::JwtTokenIssuer;
use bootcamp_directory::settings::AppSettings;

use super::ServerConfig;

/// The four repositories, all backed by one store.
struct Repositories {
    bootcamps: Arc<dyn BootcampRepository>,
    courses: Arc<dyn CourseRepository>,
    reviews: Arc<dyn ReviewRepository>,
    users: Arc<dyn UserRepository>,
}

fn build_repositories(pool: Option<&DbPool>) -> Repositories {
    match pool {
        Some(pool) => Repositories {
            bootcamps: Arc::new(DieselBootcampRepository::new(pool.clone())),
            courses: Arc::new(DieselCourseRepository::new(pool.clone())),
            reviews: Arc::new(DieselReviewRepository::new(pool.clone())),
            users: Arc::new(DieselUserRepository::new(pool.clone())),
        },
        None => {
            warn!("database_url not set; records live in memory and vanish on restart");
            let store = MemoryStore::new();
            Repositories {
                bootcamps: Arc::new(store.clone()),
                courses: Arc::new(store.clone()),
                reviews: Arc::new(store.clone()),
                users: Arc::new(store),
            }
        }
    }
}

fn build_geocoder(settings: &AppSettings) -> io::Result<Arc<dyn Geocoder>> {
    if let Some(geo) = settings.geocoder().map_err(io::Error::other)? {
        info!(endpoint = %geo.endpoint, "using HTTP geocoder");
        let geocoder =
            HttpGeocoder::new(geo.endpoint, geo.api_key, geo.timeout).map_err(io::Error::other)?;
        return Ok(Arc::new(geocoder));
    }
    warn!("geocoder_endpoint not set; every address resolves to Boston, MA");
    let point = GeoPoint::new(-71.104_028, 42.350_846).map_err(io::Error::other)?;
    Ok(Arc::new(FixtureGeocoder::new().with_fallback(
        FixtureGeocoder::location_at(point, "Boston", "02215"),
    )))
}

fn build_mailer(settings: &AppSettings) -> io::Result<Arc<dyn Mailer>> {
    match settings.mail().map_err(io::Error::other)? {
        Some(mail) => {
            let mailer = HttpMailer::new(mail.endpoint, mail.api_key, mail.from, mail.timeout)
                .map_err(io::Error::other)?;
            Ok(Arc::new(mailer))
        }
        None => {
            warn!("mail_relay_url not set; outgoing mail is only logged");
            Ok(Arc::new(LogMailer))
        }
    }
}

/// Wire the HTTP state from `config`.
///
/// # Errors
/// Fails when a configured adapter cannot be built, the upload directory
/// cannot be opened or no signing secret is available.
pub(super) fn build_http_state(config: &ServerConfig) -> io::Result<HttpState> {
    let settings = &config.settings;
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let Repositories {
        bootcamps,
        courses,
        reviews,
        users,
    } = build_repositories(config.db_pool.as_ref());
    let secret = settings.signing_secret().map_err(io::Error::other)?;
    if settings.jwt_secret.is_none() {
        warn!("jwt_secret not set; using an ephemeral signing secret");
    }
    let upload_path = settings.file_upload_path();
    let photos = CapStdPhotoStore::open(&upload_path).map_err(|error| {
        io::Error::other(format!(
            "cannot open upload directory {}: {error}",
            upload_path.display()
        ))
    })?;

    let ports = HttpStatePorts {
        bootcamps,
        courses,
        reviews,
        users,
        geocoder: build_geocoder(settings)?,
        mailer: build_mailer(settings)?,
        photos: Arc::new(photos),
        hasher: Arc::new(Argon2CredentialHasher::new()),
        tokens: Arc::new(JwtTokenIssuer::new(
            &secret,
            settings.jwt_expire_days(),
            Arc::clone(&clock),
        )),
        clock,
    };
    Ok(HttpState::wire(ports, settings.http_settings()))
}

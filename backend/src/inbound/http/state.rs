//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on driving ports and remain testable without I/O.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{
    AuthService, BootcampRepository, BootcampService, CourseRepository, CourseService,
    CredentialHasher, Geocoder, Mailer, PhotoStore, ReviewRepository, ReviewService,
    TokenIssuer, UserAdminService, UserRepository,
};
use crate::domain::{
    AggregateRefresher, AuthServiceImpl, BootcampServiceImpl, CourseServiceImpl,
    ReviewServiceImpl, UserAdminServiceImpl,
};

/// Driven-port implementations the services are wired over.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub bootcamps: Arc<dyn BootcampRepository>,
    pub courses: Arc<dyn CourseRepository>,
    pub reviews: Arc<dyn ReviewRepository>,
    pub users: Arc<dyn UserRepository>,
    pub geocoder: Arc<dyn Geocoder>,
    pub mailer: Arc<dyn Mailer>,
    pub photos: Arc<dyn PhotoStore>,
    pub hasher: Arc<dyn CredentialHasher>,
    pub tokens: Arc<dyn TokenIssuer>,
    pub clock: Arc<dyn Clock>,
}

/// Adapter-level knobs that do not belong to any service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpSettings {
    /// Lifetime of the `token` cookie.
    pub cookie_expire_days: u32,
    /// Mark the `token` cookie `Secure`.
    pub cookie_secure: bool,
    /// Largest accepted photo upload in bytes.
    pub max_file_upload: usize,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            cookie_expire_days: 30,
            cookie_secure: false,
            max_file_upload: 1_000_000,
        }
    }
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub auth: Arc<dyn AuthService>,
    pub bootcamps: Arc<dyn BootcampService>,
    pub courses: Arc<dyn CourseService>,
    pub reviews: Arc<dyn ReviewService>,
    pub users: Arc<dyn UserAdminService>,
    pub clock: Arc<dyn Clock>,
    pub settings: HttpSettings,
}

impl HttpState {
    /// Wire the domain services over `ports`.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use bootcamp_directory::domain::ports::{FixtureGeocoder, FixtureMailer};
    /// use bootcamp_directory::inbound::http::state::{HttpSettings, HttpState, HttpStatePorts};
    /// use bootcamp_directory::outbound::credential_hasher::Argon2CredentialHasher;
    /// use bootcamp_directory::outbound::memory::MemoryStore;
    /// use bootcamp_directory::outbound::photo_store::CapStdPhotoStore;
    /// use bootcamp_directory::outbound::token_issuer::JwtTokenIssuer;
    /// use mockable::DefaultClock;
    ///
    /// let store = MemoryStore::default();
    /// let clock = Arc::new(DefaultClock);
    /// let dir = tempfile::tempdir().unwrap();
    /// let ports = HttpStatePorts {
    ///     bootcamps: Arc::new(store.clone()),
    ///     courses: Arc::new(store.clone()),
    ///     reviews: Arc::new(store.clone()),
    ///     users: Arc::new(store),
    ///     geocoder: Arc::new(FixtureGeocoder::new()),
    ///     mailer: Arc::new(FixtureMailer::default()),
    ///     photos: Arc::new(CapStdPhotoStore::open(dir.path()).unwrap()),
    ///     hasher: Arc::new(Argon2CredentialHasher::new()),
    ///     tokens: Arc::new(JwtTokenIssuer::new(b"secret", 30, clock.clone())),
    ///     clock,
    /// };
    /// let state = HttpState::wire(ports, HttpSettings::default());
    /// let _auth = state.auth.clone();
    /// ```
    pub fn wire(ports: HttpStatePorts, settings: HttpSettings) -> Self {
        let HttpStatePorts {
            bootcamps,
            courses,
            reviews,
            users,
            geocoder,
            mailer,
            photos,
            hasher,
            tokens,
            clock,
        } = ports;
        let aggregates = AggregateRefresher::new(
            Arc::clone(&bootcamps),
            Arc::clone(&courses),
            Arc::clone(&reviews),
        );
        Self {
            auth: Arc::new(AuthServiceImpl::new(
                Arc::clone(&users),
                Arc::clone(&hasher),
                tokens,
                mailer,
                Arc::clone(&clock),
            )),
            bootcamps: Arc::new(BootcampServiceImpl::new(
                Arc::clone(&bootcamps),
                Arc::clone(&courses),
                geocoder,
                photos,
                Arc::clone(&clock),
                settings.max_file_upload,
            )),
            courses: Arc::new(CourseServiceImpl::new(
                Arc::clone(&bootcamps),
                courses,
                aggregates.clone(),
                Arc::clone(&clock),
            )),
            reviews: Arc::new(ReviewServiceImpl::new(
                bootcamps,
                reviews,
                aggregates,
                Arc::clone(&clock),
            )),
            users: Arc::new(UserAdminServiceImpl::new(users, hasher, Arc::clone(&clock))),
            clock,
            settings,
        }
    }
}

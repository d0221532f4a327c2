//! Actix middleware shared by every route.
//!
//! Authentication is an extractor ([`crate::inbound::http::auth::CurrentUser`])
//! rather than middleware; only request tracing wraps the whole app.

pub mod trace;

pub use trace::Trace;

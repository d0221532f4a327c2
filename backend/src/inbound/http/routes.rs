//! Mounts every `/api/v1` handler.
//!
//! Health probes and the docs UI are registered by the server alongside this
//! scope rather than inside it.

use actix_web::web;

use super::bootcamps::{
    bootcamps_in_radius, create_bootcamp, delete_bootcamp, get_bootcamp, list_bootcamps,
    update_bootcamp, upload_photo,
};
use super::courses::{
    add_course, delete_course, get_course, list_bootcamp_courses, list_courses, update_course,
};
use super::reviews::{
    add_review, delete_review, get_review, list_bootcamp_reviews, list_reviews, update_review,
};
use super::session::{
    forgot_password, login, logout, me, register, reset_password, update_details, update_password,
};
use super::users::{create_user, delete_user, get_user, list_users, update_user};

/// Path prefix shared by every resource.
pub const API_PREFIX: &str = "/api/v1";

/// Register the API scope on `cfg`.
///
/// `/bootcamps/radius/...` is registered ahead of `/bootcamps/{id}` so the
/// literal segment wins.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope(API_PREFIX)
            .service(register)
            .service(login)
            .service(logout)
            .service(me)
            .service(update_details)
            .service(update_password)
            .service(forgot_password)
            .service(reset_password)
            .service(list_bootcamps)
            .service(bootcamps_in_radius)
            .service(create_bootcamp)
            .service(get_bootcamp)
            .service(update_bootcamp)
            .service(delete_bootcamp)
            .service(upload_photo)
            .service(list_bootcamp_courses)
            .service(add_course)
            .service(list_bootcamp_reviews)
            .service(add_review)
            .service(list_courses)
            .service(get_course)
            .service(update_course)
            .service(delete_course)
            .service(list_reviews)
            .service(get_review)
            .service(update_review)
            .service(delete_review)
            .service(list_users)
            .service(create_user)
            .service(get_user)
            .service(update_user)
            .service(delete_user),
    );
}

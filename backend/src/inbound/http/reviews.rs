//! Review endpoints.
//!
//! ```text
//! GET  /api/v1/reviews?sort=-rating
//! POST /api/v1/bootcamps/{bootcampId}/reviews {"title":"Great","text":"...","rating":9}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::{
    BootcampId, Error, Review, ReviewDetail, ReviewDraft, ReviewId, ReviewInput,
    ReviewSortField,
};

use super::ApiResult;
use super::auth::CurrentUser;
use super::envelope::{self, Envelope};
use super::list_params::{ListParams, Projection, REVIEW_FIELDS};
use super::state::HttpState;
use super::validation::parse_id;

/// Create or update payload.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ReviewRequest {
    pub title: Option<String>,
    pub text: Option<String>,
    /// Whole number from 1 to 10.
    pub rating: Option<i64>,
}

impl From<ReviewRequest> for ReviewInput {
    fn from(value: ReviewRequest) -> Self {
        Self {
            title: value.title,
            text: value.text,
            rating: value.rating,
        }
    }
}

/// List reviews across every bootcamp.
#[utoipa::path(
    get,
    path = "/api/v1/reviews",
    params(ListParams),
    responses(
        (status = 200, description = "One page of reviews", body = [ReviewDetail]),
        (status = 400, description = "Invalid sort or page", body = Error),
    ),
    tags = ["reviews"],
    operation_id = "listReviews",
    security([])
)]
#[get("/reviews")]
pub async fn list_reviews(
    state: web::Data<HttpState>,
    params: web::Query<ListParams>,
) -> ApiResult<HttpResponse> {
    let projection = Projection::parse(params.select.as_deref(), REVIEW_FIELDS)?;
    let query = params.into_inner().into_query::<ReviewSortField>()?;
    let page = state.reviews.list(query).await?;
    Ok(HttpResponse::Ok().json(Envelope::page(projection.apply(page)?)))
}

/// Every review of one bootcamp.
#[utoipa::path(
    get,
    path = "/api/v1/bootcamps/{bootcampId}/reviews",
    params(("bootcampId" = String, Path, description = "Bootcamp id")),
    responses((status = 200, description = "Reviews of the bootcamp", body = [Review])),
    tags = ["reviews"],
    operation_id = "listBootcampReviews",
    security([])
)]
#[get("/bootcamps/{bootcamp_id}/reviews")]
pub async fn list_bootcamp_reviews(
    state: web::Data<HttpState>,
    bootcamp_id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let bootcamp: BootcampId = parse_id(&bootcamp_id)?;
    let reviews = state.reviews.list_for_bootcamp(bootcamp).await?;
    Ok(HttpResponse::Ok().json(Envelope::list(reviews)))
}

/// One review with its parent summary.
#[utoipa::path(
    get,
    path = "/api/v1/reviews/{id}",
    params(("id" = String, Path, description = "Review id")),
    responses(
        (status = 200, description = "Review", body = ReviewDetail),
        (status = 404, description = "No such review", body = Error),
    ),
    tags = ["reviews"],
    operation_id = "getReview",
    security([])
)]
#[get("/reviews/{id}")]
pub async fn get_review(
    state: web::Data<HttpState>,
    id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id: ReviewId = parse_id(&id)?;
    Ok(envelope::ok(state.reviews.get(id).await?))
}

/// Review a bootcamp.
#[utoipa::path(
    post,
    path = "/api/v1/bootcamps/{bootcampId}/reviews",
    params(("bootcampId" = String, Path, description = "Bootcamp id")),
    request_body = ReviewRequest,
    responses(
        (status = 201, description = "Created", body = Review),
        (status = 400, description = "Invalid payload or already reviewed", body = Error),
        (status = 403, description = "Role may not review", body = Error),
        (status = 404, description = "No such bootcamp", body = Error),
    ),
    tags = ["reviews"],
    operation_id = "addReview"
)]
#[post("/bootcamps/{bootcamp_id}/reviews")]
pub async fn add_review(
    state: web::Data<HttpState>,
    user: CurrentUser,
    bootcamp_id: web::Path<String>,
    payload: web::Json<ReviewRequest>,
) -> ApiResult<HttpResponse> {
    let bootcamp: BootcampId = parse_id(&bootcamp_id)?;
    let draft = ReviewDraft::try_from(ReviewInput::from(payload.into_inner()))?;
    let review = state.reviews.create(&user.0, bootcamp, draft).await?;
    Ok(envelope::created(review))
}

/// Partially update a review.
#[utoipa::path(
    put,
    path = "/api/v1/reviews/{id}",
    params(("id" = String, Path, description = "Review id")),
    request_body = ReviewRequest,
    responses(
        (status = 200, description = "Updated", body = Review),
        (status = 400, description = "Invalid payload", body = Error),
        (status = 403, description = "Not the author", body = Error),
        (status = 404, description = "No such review", body = Error),
    ),
    tags = ["reviews"],
    operation_id = "updateReview"
)]
#[put("/reviews/{id}")]
pub async fn update_review(
    state: web::Data<HttpState>,
    user: CurrentUser,
    id: web::Path<String>,
    payload: web::Json<ReviewRequest>,
) -> ApiResult<HttpResponse> {
    let id: ReviewId = parse_id(&id)?;
    let input = ReviewInput::from(payload.into_inner());
    Ok(envelope::ok(state.reviews.update(&user.0, id, input).await?))
}

/// Delete a review.
#[utoipa::path(
    delete,
    path = "/api/v1/reviews/{id}",
    params(("id" = String, Path, description = "Review id")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 403, description = "Not the author", body = Error),
        (status = 404, description = "No such review", body = Error),
    ),
    tags = ["reviews"],
    operation_id = "deleteReview"
)]
#[delete("/reviews/{id}")]
pub async fn delete_review(
    state: web::Data<HttpState>,
    user: CurrentUser,
    id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id: ReviewId = parse_id(&id)?;
    state.reviews.delete(&user.0, id).await?;
    Ok(envelope::empty())
}

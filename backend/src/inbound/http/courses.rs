//! Course endpoints.
//!
//! ```text
//! GET  /api/v1/courses?minimumSkill=beginner&tuition[lte]=10000
//! GET  /api/v1/bootcamps/{bootcampId}/courses
//! POST /api/v1/bootcamps/{bootcampId}/courses {"title":"Front End","weeks":"8","tuition":8000,...}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::{
    BootcampId, Course, CourseDetail, CourseDraft, CourseId, CourseInput, Error,
    MinimumSkill,
};

use super::ApiResult;
use super::auth::CurrentUser;
use super::envelope::{self, Envelope};
use super::list_params::{COURSE_FIELDS, CourseParams, Projection};
use super::state::HttpState;
use super::validation::parse_id;

/// Create or update payload.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    /// Duration as free text, e.g. `"8"`.
    pub weeks: Option<String>,
    pub tuition: Option<i64>,
    pub minimum_skill: Option<MinimumSkill>,
    pub scholarship_available: Option<bool>,
}

impl From<CourseRequest> for CourseInput {
    fn from(value: CourseRequest) -> Self {
        Self {
            title: value.title,
            description: value.description,
            weeks: value.weeks,
            tuition: value.tuition,
            minimum_skill: value.minimum_skill,
            scholarship_available: value.scholarship_available,
        }
    }
}

/// List courses across every bootcamp.
#[utoipa::path(
    get,
    path = "/api/v1/courses",
    params(CourseParams),
    responses(
        (status = 200, description = "One page of courses", body = [CourseDetail]),
        (status = 400, description = "Invalid filter, sort or page", body = Error),
    ),
    tags = ["courses"],
    operation_id = "listCourses",
    security([])
)]
#[get("/courses")]
pub async fn list_courses(
    state: web::Data<HttpState>,
    params: web::Query<CourseParams>,
) -> ApiResult<HttpResponse> {
    let projection = Projection::parse(params.select.as_deref(), COURSE_FIELDS)?;
    let query = params.into_inner().into_query()?;
    let page = state.courses.list(query).await?;
    Ok(HttpResponse::Ok().json(Envelope::page(projection.apply(page)?)))
}

/// Every course of one bootcamp.
#[utoipa::path(
    get,
    path = "/api/v1/bootcamps/{bootcampId}/courses",
    params(("bootcampId" = String, Path, description = "Bootcamp id")),
    responses((status = 200, description = "Courses of the bootcamp", body = [Course])),
    tags = ["courses"],
    operation_id = "listBootcampCourses",
    security([])
)]
#[get("/bootcamps/{bootcamp_id}/courses")]
pub async fn list_bootcamp_courses(
    state: web::Data<HttpState>,
    bootcamp_id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let bootcamp: BootcampId = parse_id(&bootcamp_id)?;
    let courses = state.courses.list_for_bootcamp(bootcamp).await?;
    Ok(HttpResponse::Ok().json(Envelope::list(courses)))
}

/// One course with its parent summary.
#[utoipa::path(
    get,
    path = "/api/v1/courses/{id}",
    params(("id" = String, Path, description = "Course id")),
    responses(
        (status = 200, description = "Course", body = CourseDetail),
        (status = 404, description = "No such course", body = Error),
    ),
    tags = ["courses"],
    operation_id = "getCourse",
    security([])
)]
#[get("/courses/{id}")]
pub async fn get_course(
    state: web::Data<HttpState>,
    id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id: CourseId = parse_id(&id)?;
    Ok(envelope::ok(state.courses.get(id).await?))
}

/// Add a course to a bootcamp the caller owns.
#[utoipa::path(
    post,
    path = "/api/v1/bootcamps/{bootcampId}/courses",
    params(("bootcampId" = String, Path, description = "Bootcamp id")),
    request_body = CourseRequest,
    responses(
        (status = 200, description = "Created", body = Course),
        (status = 400, description = "Invalid payload", body = Error),
        (status = 403, description = "Not the bootcamp owner", body = Error),
        (status = 404, description = "No such bootcamp", body = Error),
    ),
    tags = ["courses"],
    operation_id = "addCourse"
)]
#[post("/bootcamps/{bootcamp_id}/courses")]
pub async fn add_course(
    state: web::Data<HttpState>,
    user: CurrentUser,
    bootcamp_id: web::Path<String>,
    payload: web::Json<CourseRequest>,
) -> ApiResult<HttpResponse> {
    let bootcamp: BootcampId = parse_id(&bootcamp_id)?;
    let draft = CourseDraft::try_from(CourseInput::from(payload.into_inner()))?;
    let course = state.courses.create(&user.0, bootcamp, draft).await?;
    Ok(envelope::ok(course))
}

/// Partially update a course.
#[utoipa::path(
    put,
    path = "/api/v1/courses/{id}",
    params(("id" = String, Path, description = "Course id")),
    request_body = CourseRequest,
    responses(
        (status = 200, description = "Updated", body = Course),
        (status = 400, description = "Invalid payload", body = Error),
        (status = 403, description = "Not the owner", body = Error),
        (status = 404, description = "No such course", body = Error),
    ),
    tags = ["courses"],
    operation_id = "updateCourse"
)]
#[put("/courses/{id}")]
pub async fn update_course(
    state: web::Data<HttpState>,
    user: CurrentUser,
    id: web::Path<String>,
    payload: web::Json<CourseRequest>,
) -> ApiResult<HttpResponse> {
    let id: CourseId = parse_id(&id)?;
    let input = CourseInput::from(payload.into_inner());
    Ok(envelope::ok(state.courses.update(&user.0, id, input).await?))
}

/// Delete a course.
#[utoipa::path(
    delete,
    path = "/api/v1/courses/{id}",
    params(("id" = String, Path, description = "Course id")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 403, description = "Not the owner", body = Error),
        (status = 404, description = "No such course", body = Error),
    ),
    tags = ["courses"],
    operation_id = "deleteCourse"
)]
#[delete("/courses/{id}")]
pub async fn delete_course(
    state: web::Data<HttpState>,
    user: CurrentUser,
    id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id: CourseId = parse_id(&id)?;
    state.courses.delete(&user.0, id).await?;
    Ok(envelope::empty())
}

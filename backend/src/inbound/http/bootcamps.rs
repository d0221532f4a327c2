//! Bootcamp endpoints.
//!
//! ```text
//! GET    /api/v1/bootcamps?careers=Business&sort=-averageCost
//! GET    /api/v1/bootcamps/radius/02118/10
//! POST   /api/v1/bootcamps {"name":"Devworks Bootcamp","address":"233 Bay State Rd Boston MA 02215",...}
//! PUT    /api/v1/bootcamps/{id}/photo?filename=front.jpg   (raw image body)
//! ```

use actix_web::http::header::CONTENT_TYPE;
use actix_web::{HttpRequest, HttpResponse, delete, get, post, put, web};
use futures_util::StreamExt;
use serde::Deserialize;
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::PhotoUpload;
use crate::domain::{
    Bootcamp, BootcampDetail, BootcampDraft, BootcampId, BootcampInput, Career, Error,
};

use super::ApiResult;
use super::auth::CurrentUser;
use super::envelope::{self, Envelope};
use super::list_params::{BOOTCAMP_FIELDS, BootcampParams, Projection};
use super::state::HttpState;
use super::validation::parse_id;

/// Create or update payload. Absent fields are left untouched on update.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BootcampRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub careers: Option<Vec<Career>>,
    pub housing: Option<bool>,
    pub job_assistance: Option<bool>,
    pub job_guarantee: Option<bool>,
    #[serde(alias = "acceptGI")]
    pub accept_gi: Option<bool>,
}

impl From<BootcampRequest> for BootcampInput {
    fn from(value: BootcampRequest) -> Self {
        Self {
            name: value.name,
            description: value.description,
            website: value.website,
            phone: value.phone,
            email: value.email,
            address: value.address,
            careers: value.careers,
            housing: value.housing,
            job_assistance: value.job_assistance,
            job_guarantee: value.job_guarantee,
            accept_gi: value.accept_gi,
        }
    }
}

/// Query accompanying a raw photo body.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PhotoParams {
    /// Client-side file name; only its extension is kept.
    pub filename: Option<String>,
}

/// List bootcamps.
#[utoipa::path(
    get,
    path = "/api/v1/bootcamps",
    params(BootcampParams),
    responses(
        (status = 200, description = "One page of bootcamps with their courses", body = [BootcampDetail]),
        (status = 400, description = "Invalid filter, sort or page", body = Error),
    ),
    tags = ["bootcamps"],
    operation_id = "listBootcamps",
    security([])
)]
#[get("/bootcamps")]
pub async fn list_bootcamps(
    state: web::Data<HttpState>,
    params: web::Query<BootcampParams>,
) -> ApiResult<HttpResponse> {
    let projection = Projection::parse(params.select.as_deref(), BOOTCAMP_FIELDS)?;
    let query = params.into_inner().into_query()?;
    let page = state.bootcamps.list(query).await?;
    Ok(HttpResponse::Ok().json(Envelope::page(projection.apply(page)?)))
}

/// Bootcamps within `distance` miles of `zipcode`.
#[utoipa::path(
    get,
    path = "/api/v1/bootcamps/radius/{zipcode}/{distance}",
    params(
        ("zipcode" = String, Path, description = "Postal code to centre the search on"),
        ("distance" = f64, Path, description = "Radius in miles"),
    ),
    responses(
        (status = 200, description = "Bootcamps inside the radius", body = [Bootcamp]),
        (status = 400, description = "Invalid distance or unknown zipcode", body = Error),
    ),
    tags = ["bootcamps"],
    operation_id = "bootcampsInRadius",
    security([])
)]
#[get("/bootcamps/radius/{zipcode}/{distance}")]
pub async fn bootcamps_in_radius(
    state: web::Data<HttpState>,
    path: web::Path<(String, String)>,
) -> ApiResult<HttpResponse> {
    let (zipcode, distance) = path.into_inner();
    let miles: f64 = distance.parse().map_err(|_| {
        Error::invalid_request("distance must be a number")
            .with_details(json!({ "field": "distance", "value": distance }))
    })?;
    let found = state.bootcamps.within_radius(&zipcode, miles).await?;
    Ok(HttpResponse::Ok().json(Envelope::list(found)))
}

/// One bootcamp with its courses.
#[utoipa::path(
    get,
    path = "/api/v1/bootcamps/{id}",
    params(("id" = String, Path, description = "Bootcamp id")),
    responses(
        (status = 200, description = "Bootcamp", body = BootcampDetail),
        (status = 404, description = "No such bootcamp", body = Error),
    ),
    tags = ["bootcamps"],
    operation_id = "getBootcamp",
    security([])
)]
#[get("/bootcamps/{id}")]
pub async fn get_bootcamp(
    state: web::Data<HttpState>,
    id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id: BootcampId = parse_id(&id)?;
    Ok(envelope::ok(state.bootcamps.get(id).await?))
}

/// Create a bootcamp owned by the caller.
#[utoipa::path(
    post,
    path = "/api/v1/bootcamps",
    request_body = BootcampRequest,
    responses(
        (status = 201, description = "Created", body = Bootcamp),
        (status = 400, description = "Invalid payload or second bootcamp", body = Error),
        (status = 401, description = "Not signed in", body = Error),
        (status = 403, description = "Role may not publish", body = Error),
    ),
    tags = ["bootcamps"],
    operation_id = "createBootcamp"
)]
#[post("/bootcamps")]
pub async fn create_bootcamp(
    state: web::Data<HttpState>,
    user: CurrentUser,
    payload: web::Json<BootcampRequest>,
) -> ApiResult<HttpResponse> {
    let draft = BootcampDraft::try_from(BootcampInput::from(payload.into_inner()))?;
    let created = state.bootcamps.create(&user.0, draft).await?;
    Ok(envelope::created(created))
}

/// Partially update a bootcamp.
#[utoipa::path(
    put,
    path = "/api/v1/bootcamps/{id}",
    params(("id" = String, Path, description = "Bootcamp id")),
    request_body = BootcampRequest,
    responses(
        (status = 200, description = "Updated", body = Bootcamp),
        (status = 400, description = "Invalid payload", body = Error),
        (status = 403, description = "Not the owner", body = Error),
        (status = 404, description = "No such bootcamp", body = Error),
    ),
    tags = ["bootcamps"],
    operation_id = "updateBootcamp"
)]
#[put("/bootcamps/{id}")]
pub async fn update_bootcamp(
    state: web::Data<HttpState>,
    user: CurrentUser,
    id: web::Path<String>,
    payload: web::Json<BootcampRequest>,
) -> ApiResult<HttpResponse> {
    let id: BootcampId = parse_id(&id)?;
    let input = BootcampInput::from(payload.into_inner());
    Ok(envelope::ok(state.bootcamps.update(&user.0, id, input).await?))
}

/// Delete a bootcamp with its courses and reviews.
#[utoipa::path(
    delete,
    path = "/api/v1/bootcamps/{id}",
    params(("id" = String, Path, description = "Bootcamp id")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 403, description = "Not the owner", body = Error),
        (status = 404, description = "No such bootcamp", body = Error),
    ),
    tags = ["bootcamps"],
    operation_id = "deleteBootcamp"
)]
#[delete("/bootcamps/{id}")]
pub async fn delete_bootcamp(
    state: web::Data<HttpState>,
    user: CurrentUser,
    id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id: BootcampId = parse_id(&id)?;
    state.bootcamps.delete(&user.0, id).await?;
    Ok(envelope::empty())
}

/// Read the body, failing once it grows past `limit` bytes.
async fn read_limited(mut body: web::Payload, limit: usize) -> Result<Vec<u8>, Error> {
    let mut bytes = Vec::new();
    while let Some(chunk) = body.next().await {
        let chunk =
            chunk.map_err(|error| Error::invalid_request(format!("unreadable upload: {error}")))?;
        if bytes.len() + chunk.len() > limit {
            return Err(Error::payload_too_large(format!(
                "Please upload an image less than {limit} bytes"
            )));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

/// Upload a bootcamp photo as the raw request body.
#[utoipa::path(
    put,
    path = "/api/v1/bootcamps/{id}/photo",
    params(("id" = String, Path, description = "Bootcamp id"), PhotoParams),
    request_body(content = Vec<u8>, content_type = "image/*"),
    responses(
        (status = 200, description = "Stored file name", body = String),
        (status = 400, description = "Not an image, empty or too large", body = Error),
        (status = 403, description = "Not the owner", body = Error),
        (status = 404, description = "No such bootcamp", body = Error),
    ),
    tags = ["bootcamps"],
    operation_id = "uploadBootcampPhoto"
)]
#[put("/bootcamps/{id}/photo")]
pub async fn upload_photo(
    req: HttpRequest,
    state: web::Data<HttpState>,
    user: CurrentUser,
    id: web::Path<String>,
    params: web::Query<PhotoParams>,
    body: web::Payload,
) -> ApiResult<HttpResponse> {
    let id: BootcampId = parse_id(&id)?;
    let content_type = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_owned();
    let bytes = read_limited(body, state.settings.max_file_upload).await?;
    let upload = PhotoUpload {
        content_type,
        file_name: params.into_inner().filename,
        bytes,
    };
    let stored = state.bootcamps.upload_photo(&user.0, id, upload).await?;
    Ok(envelope::ok(stored))
}

#[cfg(test)]
#[path = "bootcamps_tests.rs"]
mod tests;

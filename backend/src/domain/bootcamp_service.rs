//! Bootcamp orchestration: CRUD, radius search and photo upload.
//!
//! Every mutation runs the role gate first, then looks the bootcamp up (so a
//! missing record is reported as not found), then the ownership gate.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::Page;
use tracing::info;

use super::authorization::{PUBLISHER_ROLES, ensure_can_mutate, ensure_role};
use super::ports::{
    BootcampRepository, BootcampService, CourseRepository, Geocoder, PhotoStore, PhotoUpload,
};
use super::repository_errors::{bootcamp_store, course_store, geocoder, photo_store};
use super::{
    Bootcamp, BootcampDetail, BootcampDraft, BootcampId, BootcampInput, BootcampListQuery,
    BootcampPatch, Course, Error, Principal, SphericalCap,
};

/// Concrete implementation of [`BootcampService`].
#[derive(Clone)]
pub struct BootcampServiceImpl {
    bootcamps: Arc<dyn BootcampRepository>,
    courses: Arc<dyn CourseRepository>,
    geocoder: Arc<dyn Geocoder>,
    photos: Arc<dyn PhotoStore>,
    clock: Arc<dyn Clock>,
    max_photo_bytes: usize,
}

impl BootcampServiceImpl {
    /// Create a service over the given ports. Uploads larger than
    /// `max_photo_bytes` are rejected.
    pub fn new(
        bootcamps: Arc<dyn BootcampRepository>,
        courses: Arc<dyn CourseRepository>,
        geocoder: Arc<dyn Geocoder>,
        photos: Arc<dyn PhotoStore>,
        clock: Arc<dyn Clock>,
        max_photo_bytes: usize,
    ) -> Self {
        Self {
            bootcamps,
            courses,
            geocoder,
            photos,
            clock,
            max_photo_bytes,
        }
    }

    async fn find(&self, id: &BootcampId) -> Result<Bootcamp, Error> {
        self.bootcamps
            .find_by_id(id)
            .await
            .map_err(bootcamp_store)?
            .ok_or_else(|| not_found(id))
    }

    fn photo_file_name(&self, id: &BootcampId, upload: &PhotoUpload) -> Result<String, Error> {
        let mime = upload.content_type.trim();
        let Some(subtype) = mime.strip_prefix("image/") else {
            return Err(Error::invalid_request("please upload an image file"));
        };
        if upload.bytes.is_empty() {
            return Err(Error::invalid_request("please upload a file"));
        }
        if upload.bytes.len() > self.max_photo_bytes {
            return Err(Error::payload_too_large(format!(
                "please upload an image less than {} bytes",
                self.max_photo_bytes
            )));
        }
        let from_name = upload
            .file_name
            .as_deref()
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str());
        let from_mime = subtype.split(';').next().map(str::trim);
        let ext = from_name
            .or(from_mime)
            .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
            .ok_or_else(|| Error::invalid_request("could not determine the image file extension"))?;
        Ok(format!("photo_{id}.{}", ext.to_ascii_lowercase()))
    }
}

fn not_found(id: &BootcampId) -> Error {
    Error::not_found(format!("bootcamp not found with id of {id}"))
}

#[async_trait]
impl BootcampService for BootcampServiceImpl {
    async fn list(&self, query: BootcampListQuery) -> Result<Page<BootcampDetail>, Error> {
        let page = self.bootcamps.list(&query).await.map_err(bootcamp_store)?;
        let ids: Vec<BootcampId> = page.items.iter().map(|bootcamp| bootcamp.id).collect();
        let mut by_parent: HashMap<BootcampId, Vec<Course>> = HashMap::new();
        for course in self
            .courses
            .list_for_bootcamps(&ids)
            .await
            .map_err(course_store)?
        {
            by_parent.entry(course.bootcamp).or_default().push(course);
        }
        Ok(page.map(|bootcamp| {
            let courses = by_parent.remove(&bootcamp.id).unwrap_or_default();
            BootcampDetail { bootcamp, courses }
        }))
    }

    async fn get(&self, id: BootcampId) -> Result<BootcampDetail, Error> {
        let bootcamp = self.find(&id).await?;
        let courses = self
            .courses
            .list_for_bootcamp(&id)
            .await
            .map_err(course_store)?;
        Ok(BootcampDetail { bootcamp, courses })
    }

    async fn within_radius(
        &self,
        zipcode: &str,
        distance_miles: f64,
    ) -> Result<Vec<Bootcamp>, Error> {
        let location = self
            .geocoder
            .geocode(zipcode)
            .await
            .map_err(|error| geocoder("zipcode", error))?;
        let cap = SphericalCap::from_miles(location.point, distance_miles)
            .map_err(|error| Error::invalid_request(error.to_string()))?;
        self.bootcamps.within(&cap).await.map_err(bootcamp_store)
    }

    async fn create(&self, principal: &Principal, draft: BootcampDraft) -> Result<Bootcamp, Error> {
        ensure_role(principal, PUBLISHER_ROLES)?;
        if !principal.is_admin()
            && self
                .bootcamps
                .find_by_owner(&principal.id)
                .await
                .map_err(bootcamp_store)?
                .is_some()
        {
            return Err(Error::conflict(format!(
                "the user with id {} has already published a bootcamp",
                principal.id
            )));
        }
        let location = self
            .geocoder
            .geocode(&draft.address)
            .await
            .map_err(|error| geocoder("address", error))?;
        let bootcamp = Bootcamp::create(
            BootcampId::random(),
            principal.id,
            draft,
            location,
            self.clock.utc(),
        );
        self.bootcamps
            .insert(&bootcamp)
            .await
            .map_err(bootcamp_store)?;
        info!(bootcamp_id = %bootcamp.id, user_id = %principal.id, "bootcamp created");
        Ok(bootcamp)
    }

    async fn update(
        &self,
        principal: &Principal,
        id: BootcampId,
        input: BootcampInput,
    ) -> Result<Bootcamp, Error> {
        ensure_role(principal, PUBLISHER_ROLES)?;
        let mut bootcamp = self.find(&id).await?;
        ensure_can_mutate(&bootcamp.user, principal, "bootcamp")?;
        let patch = BootcampPatch::try_from(input)?;
        let location = match patch.address.as_deref() {
            Some(address) => Some(
                self.geocoder
                    .geocode(address)
                    .await
                    .map_err(|error| geocoder("address", error))?,
            ),
            None => None,
        };
        bootcamp.apply(patch, location);
        if !self
            .bootcamps
            .update(&bootcamp)
            .await
            .map_err(bootcamp_store)?
        {
            return Err(not_found(&id));
        }
        Ok(bootcamp)
    }

    async fn delete(&self, principal: &Principal, id: BootcampId) -> Result<(), Error> {
        ensure_role(principal, PUBLISHER_ROLES)?;
        let bootcamp = self.find(&id).await?;
        ensure_can_mutate(&bootcamp.user, principal, "bootcamp")?;
        if !self.bootcamps.delete(&id).await.map_err(bootcamp_store)? {
            return Err(not_found(&id));
        }
        info!(bootcamp_id = %id, user_id = %principal.id, "bootcamp deleted");
        Ok(())
    }

    async fn upload_photo(
        &self,
        principal: &Principal,
        id: BootcampId,
        upload: PhotoUpload,
    ) -> Result<String, Error> {
        ensure_role(principal, PUBLISHER_ROLES)?;
        let bootcamp = self.find(&id).await?;
        ensure_can_mutate(&bootcamp.user, principal, "bootcamp")?;
        let file_name = self.photo_file_name(&id, &upload)?;
        self.photos
            .store(&file_name, &upload.bytes)
            .await
            .map_err(photo_store)?;
        if !self
            .bootcamps
            .set_photo(&id, &file_name)
            .await
            .map_err(bootcamp_store)?
        {
            return Err(not_found(&id));
        }
        Ok(file_name)
    }
}

#[cfg(test)]
#[path = "bootcamp_service_tests.rs"]
mod tests;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tracing::{debug, info, warn};

use super::domain::{
    Apartment, ApartmentError, ApartmentId, CostCategory, Direction, MoveInFee, Photo,
    PhotoId, PhotoSource, ScalarField, UserId,
};
use super::report::ComparisonReport;
use super::repository::{
    ApartmentRepository, PhotoStore, PhotoStoreError, PhotoUpload, RepositoryError,
};
use super::store::ApartmentStore;
use crate::import::{edits_for_unit, ImportedListing, ListingImportError, ListingImporter};

pub const DEFAULT_PHOTO_MAX_BYTES: usize = 2 * 1024 * 1024;

/// Transient message for the user about a collaborator that failed while the
/// in-memory edit itself went through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    SaveFailed { detail: String },
    PhotoUploadFailed { photo_id: PhotoId, detail: String },
    PhotoDeleteFailed { photo_id: PhotoId, detail: String },
}

/// Result of a write: the operation's value plus any collaborator notices.
#[derive(Debug, Clone, Serialize)]
pub struct Mutation<T> {
    pub value: T,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notices: Vec<Notice>,
}

/// Read snapshot of one owner's list.
#[derive(Debug, Clone, Serialize)]
pub struct ListSnapshot {
    pub apartments: Vec<Apartment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_id: Option<ApartmentId>,
    pub compare_selection: Vec<ApartmentId>,
    pub report: ComparisonReport,
}

impl ListSnapshot {
    fn of(store: &ApartmentStore) -> Self {
        Self {
            apartments: store.apartments().to_vec(),
            active_id: store.active().cloned(),
            compare_selection: store.compare_selection().to_vec(),
            report: store.report(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PhotoRejection {
    #[error("'{0}' is not an image type")]
    NotAnImage(String),
    #[error("photo is {size} bytes, limit is {limit}")]
    TooLarge { size: usize, limit: usize },
}

/// Serializes every edit to a user's list through one in-memory store and
/// persists after each change.
pub struct ComparisonService<R, P> {
    repository: Arc<R>,
    photos: Arc<P>,
    stores: Mutex<HashMap<UserId, ApartmentStore>>,
    photo_max_bytes: usize,
}

impl<R, P> ComparisonService<R, P>
where
    R: ApartmentRepository + 'static,
    P: PhotoStore + 'static,
{
    pub fn new(repository: Arc<R>, photos: Arc<P>) -> Self {
        Self::with_photo_limit(repository, photos, DEFAULT_PHOTO_MAX_BYTES)
    }

    pub fn with_photo_limit(repository: Arc<R>, photos: Arc<P>, photo_max_bytes: usize) -> Self {
        Self {
            repository,
            photos,
            stores: Mutex::new(HashMap::new()),
            photo_max_bytes,
        }
    }

    pub fn snapshot(&self, owner: &UserId) -> Result<ListSnapshot, ComparisonServiceError> {
        let mut stores = self.lock_stores();
        let store = self.hydrate(&mut stores, owner)?;
        Ok(ListSnapshot::of(store))
    }

    pub fn report(&self, owner: &UserId) -> Result<ComparisonReport, ComparisonServiceError> {
        let mut stores = self.lock_stores();
        let store = self.hydrate(&mut stores, owner)?;
        Ok(store.report())
    }

    pub fn add(&self, owner: &UserId) -> Result<Mutation<ApartmentId>, ComparisonServiceError> {
        self.mutate(owner, |store| Ok(store.add()))
    }

    pub fn duplicate(
        &self,
        owner: &UserId,
        id: &ApartmentId,
    ) -> Result<Mutation<ApartmentId>, ComparisonServiceError> {
        self.mutate(owner, |store| store.duplicate(id))
    }

    /// Removes the apartment, then deletes its uploaded photos from blob
    /// storage on a best-effort basis. A blob still shown by another
    /// apartment (a duplicate) is kept.
    pub fn remove(
        &self,
        owner: &UserId,
        id: &ApartmentId,
    ) -> Result<Mutation<()>, ComparisonServiceError> {
        let Mutation {
            value: orphaned,
            mut notices,
        } = self.mutate(owner, |store| {
            let removed = store.remove(id)?;
            Ok(unreferenced_blobs(store, &removed.photos))
        })?;

        notices.extend(self.delete_blobs(owner, orphaned));
        Ok(Mutation { value: (), notices })
    }

    pub fn reorder(
        &self,
        owner: &UserId,
        id: &ApartmentId,
        direction: Direction,
    ) -> Result<Mutation<bool>, ComparisonServiceError> {
        self.mutate(owner, |store| store.reorder(id, direction))
    }

    pub fn set_cost(
        &self,
        owner: &UserId,
        id: &ApartmentId,
        category: CostCategory,
        value: String,
    ) -> Result<Mutation<()>, ComparisonServiceError> {
        self.mutate(owner, |store| store.set_cost(id, category, value))
    }

    pub fn set_move_in_fee(
        &self,
        owner: &UserId,
        id: &ApartmentId,
        fee: MoveInFee,
        value: String,
    ) -> Result<Mutation<()>, ComparisonServiceError> {
        self.mutate(owner, |store| store.set_move_in_fee(id, fee, value))
    }

    pub fn set_scalar_field(
        &self,
        owner: &UserId,
        id: &ApartmentId,
        field: ScalarField,
        value: String,
    ) -> Result<Mutation<()>, ComparisonServiceError> {
        self.mutate(owner, |store| store.set_scalar_field(id, field, value))
    }

    pub fn toggle_compare(
        &self,
        owner: &UserId,
        id: &ApartmentId,
    ) -> Result<Mutation<Vec<ApartmentId>>, ComparisonServiceError> {
        self.mutate(owner, |store| {
            store.toggle_compare(id)?;
            Ok(store.compare_selection().to_vec())
        })
    }

    pub fn set_active(
        &self,
        owner: &UserId,
        id: Option<&ApartmentId>,
    ) -> Result<Mutation<()>, ComparisonServiceError> {
        self.mutate(owner, |store| store.set_active(id))
    }

    pub fn clear_all(&self, owner: &UserId) -> Result<Mutation<()>, ComparisonServiceError> {
        self.mutate(owner, |store| {
            store.clear_all();
            Ok(())
        })
    }

    /// Copies one unit of an imported listing into a new apartment, or over
    /// the fields of `target` when given.
    pub fn apply_listing(
        &self,
        owner: &UserId,
        listing: &ImportedListing,
        unit_index: usize,
        target: Option<&ApartmentId>,
    ) -> Result<Mutation<ApartmentId>, ComparisonServiceError> {
        let edits = edits_for_unit(listing, unit_index)?;
        debug!(%owner, unit_index, edits = edits.len(), "applying imported unit");
        self.mutate(owner, |store| store.apply_edits(target, edits))
    }

    /// Single-shot import: one request to the importer, no retry.
    pub fn import_listing<I>(
        &self,
        owner: &UserId,
        importer: &I,
        url: &str,
        unit_index: usize,
        target: Option<&ApartmentId>,
    ) -> Result<Mutation<ApartmentId>, ComparisonServiceError>
    where
        I: ListingImporter + ?Sized,
    {
        let listing = importer.import_listing(url).map_err(|err| {
            warn!(%owner, url, error = %err, "listing import failed");
            err
        })?;
        info!(%owner, url, units = listing.units.len(), "listing imported");
        self.apply_listing(owner, &listing, unit_index, target)
    }

    /// Shows the photo immediately as a local preview, then hands it to blob
    /// storage. An upload failure leaves the preview marked as failed.
    pub fn upload_photo(
        &self,
        owner: &UserId,
        id: &ApartmentId,
        upload: PhotoUpload,
    ) -> Result<Mutation<PhotoId>, ComparisonServiceError> {
        self.check_photo(&upload)?;

        let Mutation {
            value: photo_id,
            mut notices,
        } = self.mutate(owner, |store| {
            store.add_photo(
                id,
                upload.file_name.clone(),
                PhotoSource::Embedded {
                    data: upload.data.clone(),
                },
            )
        })?;

        let outcome = self
            .photos
            .upload(owner, id, &photo_id, &upload)
            .map_err(|err| {
                warn!(%owner, apartment = %id, photo = %photo_id, error = %err, "photo upload failed");
                notices.push(Notice::PhotoUploadFailed {
                    photo_id: photo_id.clone(),
                    detail: err.to_string(),
                });
                err.to_string()
            });

        let resolved = self.mutate(owner, |store| {
            match store.resolve_photo_upload(id, &photo_id, outcome) {
                Err(ApartmentError::NotFound(_)) | Err(ApartmentError::PhotoNotFound { .. }) => {
                    // removed while the upload was in flight
                    Ok(())
                }
                other => other,
            }
        })?;
        notices.extend(resolved.notices);

        Ok(Mutation {
            value: photo_id,
            notices,
        })
    }

    pub fn remove_photo(
        &self,
        owner: &UserId,
        id: &ApartmentId,
        photo_id: &PhotoId,
    ) -> Result<Mutation<()>, ComparisonServiceError> {
        let Mutation {
            value: orphaned,
            mut notices,
        } = self.mutate(owner, |store| {
            let removed = store.remove_photo(id, photo_id)?;
            Ok(unreferenced_blobs(store, std::slice::from_ref(&removed)))
        })?;

        notices.extend(self.delete_blobs(owner, orphaned));
        Ok(Mutation { value: (), notices })
    }

    fn delete_blobs(&self, owner: &UserId, blobs: Vec<(PhotoId, String)>) -> Vec<Notice> {
        blobs
            .into_iter()
            .filter_map(|(photo_id, url)| {
                self.photos
                    .delete(owner, &url)
                    .err()
                    .map(|err| photo_delete_notice(&photo_id, err))
            })
            .collect()
    }

    fn check_photo(&self, upload: &PhotoUpload) -> Result<(), PhotoRejection> {
        if upload.content_type.type_() != mime::IMAGE {
            return Err(PhotoRejection::NotAnImage(
                upload.content_type.essence_str().to_string(),
            ));
        }
        let size = upload.decoded_len();
        if size > self.photo_max_bytes {
            return Err(PhotoRejection::TooLarge {
                size,
                limit: self.photo_max_bytes,
            });
        }
        Ok(())
    }

    fn mutate<T, F>(&self, owner: &UserId, apply: F) -> Result<Mutation<T>, ComparisonServiceError>
    where
        F: FnOnce(&mut ApartmentStore) -> Result<T, ApartmentError>,
    {
        let mut stores = self.lock_stores();
        let store = self.hydrate(&mut stores, owner)?;
        let value = apply(store)?;

        let mut notices = Vec::new();
        if let Err(err) = self.repository.save(owner, store.apartments()) {
            warn!(%owner, error = %err, "saving apartment list failed");
            notices.push(Notice::SaveFailed {
                detail: err.to_string(),
            });
        }

        Ok(Mutation { value, notices })
    }

    fn hydrate<'a>(
        &self,
        stores: &'a mut MutexGuard<'_, HashMap<UserId, ApartmentStore>>,
        owner: &UserId,
    ) -> Result<&'a mut ApartmentStore, ComparisonServiceError> {
        if !stores.contains_key(owner) {
            let store = match self.repository.load(owner)? {
                Some(apartments) if !apartments.is_empty() => {
                    info!(%owner, count = apartments.len(), "loaded saved apartment list");
                    ApartmentStore::from_apartments(apartments)
                }
                _ => ApartmentStore::new(),
            };
            stores.insert(owner.clone(), store);
        }

        stores
            .get_mut(owner)
            .ok_or(ComparisonServiceError::StoreUnavailable)
    }

    fn lock_stores(&self) -> MutexGuard<'_, HashMap<UserId, ApartmentStore>> {
        self.stores.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Remote urls of `removed` photos that no photo left in `store` still shows.
fn unreferenced_blobs(store: &ApartmentStore, removed: &[Photo]) -> Vec<(PhotoId, String)> {
    let mut orphaned: Vec<(PhotoId, String)> = Vec::new();
    for photo in removed {
        let PhotoSource::Remote { url } = &photo.source else {
            continue;
        };
        let still_shown = store
            .apartments()
            .iter()
            .flat_map(|apartment| &apartment.photos)
            .any(|kept| matches!(&kept.source, PhotoSource::Remote { url: shown } if shown == url));
        if !still_shown && !orphaned.iter().any(|(_, seen)| seen == url) {
            orphaned.push((photo.id.clone(), url.clone()));
        }
    }
    orphaned
}

fn photo_delete_notice(photo_id: &PhotoId, err: PhotoStoreError) -> Notice {
    warn!(photo = %photo_id, error = %err, "photo delete failed");
    Notice::PhotoDeleteFailed {
        photo_id: photo_id.clone(),
        detail: err.to_string(),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ComparisonServiceError {
    #[error(transparent)]
    Apartment(#[from] ApartmentError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Photo(#[from] PhotoRejection),
    #[error(transparent)]
    Import(#[from] ListingImportError),
    #[error("apartment list unavailable")]
    StoreUnavailable,
}

use chrono::{DateTime, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use rentwise::apartments::{
    Apartment, ApartmentId, ApartmentRepository, PhotoId, PhotoStore, PhotoStoreError,
    PhotoUpload, RepositoryError, UserId,
};
use rentwise::error::AppError;
use rentwise::import::{parse_model_reply, ImportedListing, ListingImportError, ListingImporter};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::debug;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// On-disk shape of a saved list. Bare arrays are accepted on read so that
/// hand-written fixtures load too.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct SavedList {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) saved_at: Option<DateTime<Utc>>,
    pub(crate) apartments: Vec<Apartment>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ListFile {
    Saved(SavedList),
    Bare(Vec<Apartment>),
}

pub(crate) fn parse_list(text: &str) -> Result<Vec<Apartment>, serde_json::Error> {
    Ok(match serde_json::from_str::<ListFile>(text)? {
        ListFile::Saved(saved) => saved.apartments,
        ListFile::Bare(apartments) => apartments,
    })
}

pub(crate) fn render_list(apartments: &[Apartment]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&SavedList {
        saved_at: Some(Utc::now()),
        apartments: apartments.to_vec(),
    })
}

pub(crate) fn read_list_file(path: &Path) -> Result<Vec<Apartment>, AppError> {
    let text = fs::read_to_string(path)?;
    Ok(parse_list(&text)?)
}

pub(crate) fn write_list_file(path: &Path, apartments: &[Apartment]) -> Result<(), AppError> {
    fs::write(path, render_list(apartments)?)?;
    Ok(())
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryApartmentRepository {
    lists: Arc<Mutex<HashMap<UserId, Vec<Apartment>>>>,
}

impl ApartmentRepository for InMemoryApartmentRepository {
    fn load(&self, owner: &UserId) -> Result<Option<Vec<Apartment>>, RepositoryError> {
        let guard = self
            .lists
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository lock poisoned".to_string()))?;
        Ok(guard.get(owner).cloned())
    }

    fn save(&self, owner: &UserId, apartments: &[Apartment]) -> Result<(), RepositoryError> {
        let mut guard = self
            .lists
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository lock poisoned".to_string()))?;
        guard.insert(owner.clone(), apartments.to_vec());
        Ok(())
    }
}

/// One JSON document per list under `root`, named after the owner's link id.
#[derive(Debug, Clone)]
pub(crate) struct FileApartmentRepository {
    root: PathBuf,
}

impl FileApartmentRepository {
    pub(crate) fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, owner: &UserId) -> Result<PathBuf, RepositoryError> {
        let valid = !owner.0.is_empty()
            && owner
                .0
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_');
        if !valid {
            return Err(RepositoryError::Unavailable(format!(
                "'{}' is not a valid list id",
                owner
            )));
        }
        Ok(self.root.join(format!("{}.json", owner.0)))
    }
}

impl ApartmentRepository for FileApartmentRepository {
    fn load(&self, owner: &UserId) -> Result<Option<Vec<Apartment>>, RepositoryError> {
        let path = self.path_for(owner)?;
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(RepositoryError::Unavailable(err.to_string())),
        };
        parse_list(&text)
            .map(Some)
            .map_err(|err| RepositoryError::Corrupt(format!("{}: {err}", path.display())))
    }

    fn save(&self, owner: &UserId, apartments: &[Apartment]) -> Result<(), RepositoryError> {
        let path = self.path_for(owner)?;
        let unavailable = |err: io::Error| RepositoryError::Unavailable(err.to_string());

        fs::create_dir_all(&self.root).map_err(unavailable)?;
        let body = render_list(apartments)
            .map_err(|err| RepositoryError::Corrupt(err.to_string()))?;
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, body).map_err(unavailable)?;
        fs::rename(&staging, &path).map_err(unavailable)?;

        debug!(%owner, path = %path.display(), count = apartments.len(), "list saved");
        Ok(())
    }
}

/// Keeps uploaded photo payloads in memory and hands back a stable path for
/// each, with an extension matching the declared content type.
#[derive(Default, Clone)]
pub(crate) struct InMemoryPhotoStore {
    blobs: Arc<Mutex<HashMap<String, String>>>,
}

impl PhotoStore for InMemoryPhotoStore {
    fn upload(
        &self,
        owner: &UserId,
        apartment: &ApartmentId,
        photo: &PhotoId,
        upload: &PhotoUpload,
    ) -> Result<String, PhotoStoreError> {
        let extension = mime_guess::get_mime_extensions(&upload.content_type)
            .and_then(|extensions| extensions.first())
            .ok_or_else(|| {
                PhotoStoreError::Rejected(format!(
                    "no file extension known for {}",
                    upload.content_type
                ))
            })?;

        let url = format!("/photos/{owner}/{apartment}/{photo}.{extension}");
        let mut blobs = self
            .blobs
            .lock()
            .map_err(|_| PhotoStoreError::Unavailable("photo lock poisoned".to_string()))?;
        blobs.insert(url.clone(), upload.data.clone());
        debug!(photo = %photo, bytes = upload.data.len(), "photo stored");
        Ok(url)
    }

    fn delete(&self, _owner: &UserId, url: &str) -> Result<(), PhotoStoreError> {
        let mut blobs = self
            .blobs
            .lock()
            .map_err(|_| PhotoStoreError::Unavailable("photo lock poisoned".to_string()))?;
        match blobs.remove(url) {
            Some(data) => {
                debug!(url, bytes = data.len(), "photo deleted");
                Ok(())
            }
            None => Err(PhotoStoreError::Rejected(format!("{url} not stored"))),
        }
    }
}

/// Treats the "url" as a path to a saved model reply.
pub(crate) struct SavedReplyImporter;

impl ListingImporter for SavedReplyImporter {
    fn import_listing(&self, url: &str) -> Result<ImportedListing, ListingImportError> {
        let reply = fs::read_to_string(url)
            .map_err(|err| ListingImportError::Fetch(format!("{url}: {err}")))?;
        parse_model_reply(&reply)
    }
}

use super::domain::{Apartment, ApartmentId, PhotoId, UserId};

/// Document store for saved apartment lists, keyed by the owner's opaque
/// link id. Saves overwrite whatever was there; there is no version check.
pub trait ApartmentRepository: Send + Sync {
    fn load(&self, owner: &UserId) -> Result<Option<Vec<Apartment>>, RepositoryError>;
    fn save(&self, owner: &UserId, apartments: &[Apartment]) -> Result<(), RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("repository unavailable: {0}")]
    Unavailable(String),
    #[error("stored list is unreadable: {0}")]
    Corrupt(String),
}

/// Photo payload as received from the client, before it reaches blob storage.
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub file_name: String,
    pub content_type: mime::Mime,
    /// Base64 file contents, bare or as a `data:` URL.
    pub data: String,
}

impl PhotoUpload {
    /// Size of the file itself, before base64 encoding.
    pub fn decoded_len(&self) -> usize {
        let payload = match self.data.strip_prefix("data:") {
            Some(url) => url.split_once(',').map_or(url, |(_, encoded)| encoded),
            None => self.data.as_str(),
        };
        let symbols = payload
            .bytes()
            .filter(|byte| !byte.is_ascii_whitespace() && *byte != b'=')
            .count();
        symbols * 3 / 4
    }
}

/// Blob storage for apartment photos.
pub trait PhotoStore: Send + Sync {
    /// Returns the public url of the stored blob.
    fn upload(
        &self,
        owner: &UserId,
        apartment: &ApartmentId,
        photo: &PhotoId,
        upload: &PhotoUpload,
    ) -> Result<String, PhotoStoreError>;

    /// Deletes the blob behind a url previously returned by `upload`.
    fn delete(&self, owner: &UserId, url: &str) -> Result<(), PhotoStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum PhotoStoreError {
    #[error("photo storage unavailable: {0}")]
    Unavailable(String),
    #[error("photo storage rejected the upload: {0}")]
    Rejected(String),
}

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::apartments::repository::{
    ApartmentRepository, PhotoStore, PhotoStoreError, PhotoUpload, RepositoryError,
};
use crate::apartments::{
    comparison_router, Apartment, ApartmentId, ComparisonService, CostCategory, PhotoId, UserId,
};

pub(super) fn owner() -> UserId {
    UserId("link-7f3a".to_string())
}

pub(super) fn apartment(id: &str, name: &str, rent: &str) -> Apartment {
    let mut apartment = Apartment::empty(ApartmentId(id.to_string()));
    apartment.name = name.to_string();
    apartment.costs.set(CostCategory::Rent, rent);
    apartment
}

pub(super) fn in_neighborhood(mut apartment: Apartment, neighborhood: &str) -> Apartment {
    apartment.neighborhood = neighborhood.to_string();
    apartment
}

pub(super) fn with_sqft(mut apartment: Apartment, sqft: &str) -> Apartment {
    apartment.sqft = sqft.to_string();
    apartment
}

/// A(rent 2000, 700 sqft) and B(rent 1800 + parking 150, 600 sqft).
pub(super) fn rent_pair() -> Vec<Apartment> {
    let a = with_sqft(apartment("apt-a", "Alder Court", "2000"), "700");
    let mut b = with_sqft(apartment("apt-b", "Birch Flats", "1800"), "600");
    b.costs.set(CostCategory::Parking, "150");
    vec![a, b]
}

pub(super) fn photo_upload(content_type: &str, data: &str) -> PhotoUpload {
    PhotoUpload {
        file_name: "kitchen.jpg".to_string(),
        content_type: content_type.parse().expect("valid mime"),
        data: data.to_string(),
    }
}

pub(super) fn build_service() -> (
    ComparisonService<MemoryRepository, MemoryPhotos>,
    Arc<MemoryRepository>,
    Arc<MemoryPhotos>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let photos = Arc::new(MemoryPhotos::default());
    let service = ComparisonService::new(repository.clone(), photos.clone());
    (service, repository, photos)
}

pub(super) fn seeded_service(
    apartments: Vec<Apartment>,
) -> (
    ComparisonService<MemoryRepository, MemoryPhotos>,
    Arc<MemoryRepository>,
    Arc<MemoryPhotos>,
) {
    let (service, repository, photos) = build_service();
    repository.seed(&owner(), apartments);
    (service, repository, photos)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    lists: Arc<Mutex<HashMap<UserId, Vec<Apartment>>>>,
    saves: Arc<Mutex<usize>>,
}

impl MemoryRepository {
    pub(super) fn seed(&self, owner: &UserId, apartments: Vec<Apartment>) {
        self.lists
            .lock()
            .expect("repository mutex poisoned")
            .insert(owner.clone(), apartments);
    }

    pub(super) fn stored(&self, owner: &UserId) -> Option<Vec<Apartment>> {
        self.lists
            .lock()
            .expect("repository mutex poisoned")
            .get(owner)
            .cloned()
    }

    pub(super) fn save_count(&self) -> usize {
        *self.saves.lock().expect("repository mutex poisoned")
    }
}

impl ApartmentRepository for MemoryRepository {
    fn load(&self, owner: &UserId) -> Result<Option<Vec<Apartment>>, RepositoryError> {
        Ok(self.stored(owner))
    }

    fn save(&self, owner: &UserId, apartments: &[Apartment]) -> Result<(), RepositoryError> {
        *self.saves.lock().expect("repository mutex poisoned") += 1;
        self.seed(owner, apartments.to_vec());
        Ok(())
    }
}

/// Loads fine but refuses every write.
pub(super) struct ReadOnlyRepository;

impl ApartmentRepository for ReadOnlyRepository {
    fn load(&self, _owner: &UserId) -> Result<Option<Vec<Apartment>>, RepositoryError> {
        Ok(None)
    }

    fn save(&self, _owner: &UserId, _apartments: &[Apartment]) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("quota exceeded".to_string()))
    }
}

pub(super) struct UnavailableRepository;

impl ApartmentRepository for UnavailableRepository {
    fn load(&self, _owner: &UserId) -> Result<Option<Vec<Apartment>>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn save(&self, _owner: &UserId, _apartments: &[Apartment]) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryPhotos {
    stored: Arc<Mutex<Vec<PhotoId>>>,
    live: Arc<Mutex<Vec<String>>>,
    deleted: Arc<Mutex<Vec<String>>>,
}

impl MemoryPhotos {
    pub(super) fn stored(&self) -> Vec<PhotoId> {
        self.stored.lock().expect("photo mutex poisoned").clone()
    }

    pub(super) fn live(&self) -> Vec<String> {
        self.live.lock().expect("photo mutex poisoned").clone()
    }

    pub(super) fn deleted(&self) -> Vec<String> {
        self.deleted.lock().expect("photo mutex poisoned").clone()
    }
}

impl PhotoStore for MemoryPhotos {
    fn upload(
        &self,
        owner: &UserId,
        apartment: &ApartmentId,
        photo: &PhotoId,
        _upload: &PhotoUpload,
    ) -> Result<String, PhotoStoreError> {
        let url = format!("https://photos.test/{owner}/{apartment}/{photo}");
        self.stored
            .lock()
            .expect("photo mutex poisoned")
            .push(photo.clone());
        self.live
            .lock()
            .expect("photo mutex poisoned")
            .push(url.clone());
        Ok(url)
    }

    fn delete(&self, _owner: &UserId, url: &str) -> Result<(), PhotoStoreError> {
        let mut live = self.live.lock().expect("photo mutex poisoned");
        let index = live
            .iter()
            .position(|stored| stored == url)
            .ok_or_else(|| PhotoStoreError::Rejected(format!("{url} not stored")))?;
        live.remove(index);
        self.deleted
            .lock()
            .expect("photo mutex poisoned")
            .push(url.to_string());
        Ok(())
    }
}

pub(super) struct OfflinePhotos;

impl PhotoStore for OfflinePhotos {
    fn upload(
        &self,
        _owner: &UserId,
        _apartment: &ApartmentId,
        _photo: &PhotoId,
        _upload: &PhotoUpload,
    ) -> Result<String, PhotoStoreError> {
        Err(PhotoStoreError::Unavailable("bucket offline".to_string()))
    }

    fn delete(&self, _owner: &UserId, _url: &str) -> Result<(), PhotoStoreError> {
        Err(PhotoStoreError::Unavailable("bucket offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn router_with_service(
    service: ComparisonService<MemoryRepository, MemoryPhotos>,
) -> axum::Router {
    comparison_router(Arc::new(service))
}

use super::common::*;
use crate::apartments::{
    ApartmentError, ApartmentId, ComparisonService, ComparisonServiceError, CostCategory,
    Direction, Notice, PhotoRejection, PhotoSource, RepositoryError, ScalarField, UploadState,
};
use crate::import::{parse_model_reply, ImportedListing, ListingImportError, ListingImporter};
use std::sync::Arc;

fn id(raw: &str) -> ApartmentId {
    ApartmentId(raw.to_string())
}

const REPLY: &str = r#"```json
{
  "building": {
    "name": "The Maxwell",
    "address": "500 E 5th St, Austin, TX 78701",
    "neighborhood": "Downtown",
    "fees": {"parkingSurface": 125, "securityDeposit": "$500"}
  },
  "units": [{"unit": "1204", "beds": "1 Bed", "sqft": 712, "rent": 2105}]
}
```"#;

struct SavedReply;

impl ListingImporter for SavedReply {
    fn import_listing(&self, _url: &str) -> Result<ImportedListing, ListingImportError> {
        parse_model_reply(REPLY)
    }
}

struct UnreachableSite;

impl ListingImporter for UnreachableSite {
    fn import_listing(&self, url: &str) -> Result<ImportedListing, ListingImportError> {
        Err(ListingImportError::Fetch(format!("{url} timed out")))
    }
}

#[test]
fn first_visit_starts_with_blank_apartment() {
    let (service, repository, _) = build_service();
    let snapshot = service.snapshot(&owner()).expect("snapshot");

    assert_eq!(snapshot.apartments.len(), 1);
    assert_eq!(snapshot.report.filled_count, 0);
    assert_eq!(repository.save_count(), 0);
}

#[test]
fn edits_are_saved_after_each_change() {
    let (service, repository, _) = seeded_service(rent_pair());

    let result = service
        .set_cost(&owner(), &id("apt-a"), CostCategory::Rent, "1700".to_string())
        .expect("edit applies");
    assert!(result.notices.is_empty());
    assert_eq!(repository.save_count(), 1);

    let stored = repository.stored(&owner()).expect("list saved");
    assert_eq!(stored[0].costs.get(CostCategory::Rent), "1700");

    let report = service.report(&owner()).expect("report");
    assert_eq!(report.cheapest_id, Some(id("apt-a")));
}

#[test]
fn lists_are_scoped_per_owner() {
    let (service, _, _) = seeded_service(rent_pair());
    let stranger = crate::apartments::UserId("link-other".to_string());

    let snapshot = service.snapshot(&stranger).expect("snapshot");
    assert_eq!(snapshot.apartments.len(), 1);
    assert_eq!(service.snapshot(&owner()).expect("snapshot").apartments.len(), 2);
}

#[test]
fn failed_save_keeps_edit_and_reports_notice() {
    let service = ComparisonService::new(
        Arc::new(ReadOnlyRepository),
        Arc::new(MemoryPhotos::default()),
    );

    let added = service.add(&owner()).expect("add applies in memory");
    assert!(matches!(
        added.notices.as_slice(),
        [Notice::SaveFailed { .. }]
    ));
    assert_eq!(service.snapshot(&owner()).expect("snapshot").apartments.len(), 2);
}

#[test]
fn unavailable_repository_blocks_hydration() {
    let service = ComparisonService::new(
        Arc::new(UnavailableRepository),
        Arc::new(MemoryPhotos::default()),
    );

    match service.add(&owner()) {
        Err(ComparisonServiceError::Repository(RepositoryError::Unavailable(_))) => {}
        other => panic!("expected repository error, got {other:?}"),
    }
}

#[test]
fn unknown_apartment_is_not_found() {
    let (service, repository, _) = seeded_service(rent_pair());

    match service.reorder(&owner(), &id("apt-missing"), Direction::Up) {
        Err(ComparisonServiceError::Apartment(ApartmentError::NotFound(missing))) => {
            assert_eq!(missing, id("apt-missing"));
        }
        other => panic!("expected not found, got {other:?}"),
    }
    assert_eq!(repository.save_count(), 0);
}

#[test]
fn toggle_compare_returns_current_selection() {
    let (service, _, _) = seeded_service(rent_pair());

    let first = service.toggle_compare(&owner(), &id("apt-a")).expect("toggle");
    assert_eq!(first.value, vec![id("apt-a")]);
    let second = service.toggle_compare(&owner(), &id("apt-b")).expect("toggle");
    assert_eq!(second.value, vec![id("apt-a"), id("apt-b")]);

    let snapshot = service.snapshot(&owner()).expect("snapshot");
    let head_to_head = snapshot.report.head_to_head.expect("two filled");
    assert_eq!(head_to_head.apartment_ids, vec![id("apt-b"), id("apt-a")]);
}

#[test]
fn import_applies_unit_as_new_apartment() {
    let (service, _, _) = seeded_service(rent_pair());

    let created = service
        .import_listing(&owner(), &SavedReply, "https://maxwell.test", 0, None)
        .expect("import applies");

    let snapshot = service.snapshot(&owner()).expect("snapshot");
    let imported = snapshot
        .apartments
        .iter()
        .find(|apartment| apartment.id == created.value)
        .expect("imported apartment present");
    assert_eq!(imported.name, "The Maxwell #1204");
    assert_eq!(imported.costs.get(CostCategory::Parking), "125");
    assert_eq!(snapshot.active_id, Some(created.value));
}

#[test]
fn import_over_existing_apartment_keeps_unlisted_fields() {
    let (service, _, _) = seeded_service(rent_pair());
    service
        .set_scalar_field(&owner(), &id("apt-a"), ScalarField::Unit, "7B".to_string())
        .expect("edit");
    service
        .set_cost(&owner(), &id("apt-a"), CostCategory::Water, "40".to_string())
        .expect("edit");

    service
        .import_listing(&owner(), &SavedReply, "https://maxwell.test", 0, Some(&id("apt-a")))
        .expect("import applies");

    let snapshot = service.snapshot(&owner()).expect("snapshot");
    let updated = &snapshot.apartments[0];
    assert_eq!(updated.costs.get(CostCategory::Rent), "2105");
    assert_eq!(updated.costs.get(CostCategory::Water), "40");
    assert_eq!(updated.unit, "1204");
}

#[test]
fn failed_import_leaves_list_untouched() {
    let (service, repository, _) = seeded_service(rent_pair());

    let err = service
        .import_listing(&owner(), &UnreachableSite, "https://down.test", 0, None)
        .expect_err("fetch fails");
    assert!(matches!(
        err,
        ComparisonServiceError::Import(ListingImportError::Fetch(_))
    ));

    let err = service
        .import_listing(&owner(), &SavedReply, "https://maxwell.test", 3, None)
        .expect_err("unit out of range");
    assert!(matches!(
        err,
        ComparisonServiceError::Import(ListingImportError::UnitOutOfRange { .. })
    ));
    assert_eq!(repository.save_count(), 0);
}

#[test]
fn uploaded_photo_becomes_remote() {
    let (service, _, photos) = seeded_service(rent_pair());

    let uploaded = service
        .upload_photo(&owner(), &id("apt-a"), photo_upload("image/jpeg", "AAAA"))
        .expect("upload");
    assert!(uploaded.notices.is_empty());
    assert_eq!(photos.stored(), vec![uploaded.value.clone()]);

    let snapshot = service.snapshot(&owner()).expect("snapshot");
    let photo = &snapshot.apartments[0].photos[0];
    assert_eq!(photo.upload, UploadState::Uploaded);
    assert!(matches!(&photo.source, PhotoSource::Remote { url } if url.starts_with("https://photos.test/")));
}

#[test]
fn failed_upload_keeps_preview_and_warns() {
    let service = ComparisonService::new(
        Arc::new(MemoryRepository::default()),
        Arc::new(OfflinePhotos),
    );
    let apartment_id = service.snapshot(&owner()).expect("snapshot").apartments[0]
        .id
        .clone();

    let uploaded = service
        .upload_photo(&owner(), &apartment_id, photo_upload("image/png", "iVBOR"))
        .expect("preview kept");
    assert!(matches!(
        uploaded.notices.as_slice(),
        [Notice::PhotoUploadFailed { .. }]
    ));

    let snapshot = service.snapshot(&owner()).expect("snapshot");
    let photo = &snapshot.apartments[0].photos[0];
    assert!(matches!(photo.upload, UploadState::Failed { .. }));
    assert!(matches!(photo.source, PhotoSource::Embedded { .. }));
}

#[test]
fn photo_checks_type_and_size() {
    let repository = Arc::new(MemoryRepository::default());
    let service =
        ComparisonService::with_photo_limit(repository, Arc::new(MemoryPhotos::default()), 4);
    let apartment_id = service.snapshot(&owner()).expect("snapshot").apartments[0]
        .id
        .clone();

    let err = service
        .upload_photo(&owner(), &apartment_id, photo_upload("application/pdf", "AA"))
        .expect_err("not an image");
    assert!(matches!(
        err,
        ComparisonServiceError::Photo(PhotoRejection::NotAnImage(_))
    ));

    let err = service
        .upload_photo(&owner(), &apartment_id, photo_upload("image/jpeg", "AAAAAAAA"))
        .expect_err("too large");
    assert!(matches!(
        err,
        ComparisonServiceError::Photo(PhotoRejection::TooLarge { size: 6, limit: 4 })
    ));
    assert!(service.snapshot(&owner()).expect("snapshot").apartments[0]
        .photos
        .is_empty());
}

#[test]
fn removing_apartment_deletes_its_photos() {
    let (service, _, photos) = seeded_service(rent_pair());
    let uploaded = service
        .upload_photo(&owner(), &id("apt-b"), photo_upload("image/jpeg", "AAAA"))
        .expect("upload");

    let url = photos.live().pop().expect("blob stored");
    assert_eq!(photos.stored(), vec![uploaded.value]);

    let removed = service.remove(&owner(), &id("apt-b")).expect("remove");
    assert!(removed.notices.is_empty());
    assert_eq!(photos.deleted(), vec![url]);
    assert!(photos.live().is_empty());
    assert_eq!(service.snapshot(&owner()).expect("snapshot").apartments.len(), 1);
}

#[test]
fn duplicate_and_clear_all_round_out_list_management() {
    let (service, repository, _) = seeded_service(rent_pair());

    let copy = service.duplicate(&owner(), &id("apt-a")).expect("duplicate");
    let snapshot = service.snapshot(&owner()).expect("snapshot");
    assert_eq!(snapshot.apartments[1].id, copy.value);
    assert_eq!(snapshot.apartments[1].name, "Alder Court (copy)");

    service.clear_all(&owner()).expect("clear");
    let stored = repository.stored(&owner()).expect("saved");
    assert_eq!(stored.len(), 1);
    assert_eq!(service.report(&owner()).expect("report").filled_count, 0);
}

#[test]
fn photo_limit_applies_to_the_decoded_file() {
    let service = ComparisonService::with_photo_limit(
        Arc::new(MemoryRepository::default()),
        Arc::new(MemoryPhotos::default()),
        6,
    );
    let apartment_id = service.snapshot(&owner()).expect("snapshot").apartments[0]
        .id
        .clone();

    // eight base64 symbols carry six bytes
    service
        .upload_photo(&owner(), &apartment_id, photo_upload("image/png", "AAAAAAAA"))
        .expect("six bytes fit");
    service
        .upload_photo(
            &owner(),
            &apartment_id,
            photo_upload("image/png", "data:image/png;base64,AAAAAA=="),
        )
        .expect("data url measured by its payload");

    let err = service
        .upload_photo(&owner(), &apartment_id, photo_upload("image/png", "AAAAAAAAAAAA"))
        .expect_err("nine bytes");
    assert!(matches!(
        err,
        ComparisonServiceError::Photo(PhotoRejection::TooLarge { size: 9, limit: 6 })
    ));
}

#[test]
fn duplicated_photos_share_their_blob_until_the_last_copy_goes() {
    let (service, _, photos) = seeded_service(rent_pair());
    service
        .upload_photo(&owner(), &id("apt-a"), photo_upload("image/jpeg", "AAAA"))
        .expect("upload");
    let copy = service
        .duplicate(&owner(), &id("apt-a"))
        .expect("duplicate")
        .value;

    let removed = service.remove(&owner(), &id("apt-a")).expect("remove source");
    assert!(removed.notices.is_empty());
    assert!(photos.deleted().is_empty());

    let snapshot = service.snapshot(&owner()).expect("snapshot");
    let kept = snapshot
        .apartments
        .iter()
        .find(|apartment| apartment.id == copy)
        .expect("copy listed");
    let PhotoSource::Remote { url } = &kept.photos[0].source else {
        panic!("copy lost its remote photo");
    };
    assert_eq!(kept.photos[0].upload, UploadState::Uploaded);
    assert_eq!(photos.live(), vec![url.clone()]);

    let removed = service.remove(&owner(), &copy).expect("remove copy");
    assert!(removed.notices.is_empty());
    assert_eq!(photos.deleted(), vec![url.clone()]);
    assert!(photos.live().is_empty());
}

#[test]
fn removing_a_shared_photo_keeps_the_blob_for_the_copy() {
    let (service, _, photos) = seeded_service(rent_pair());
    let uploaded = service
        .upload_photo(&owner(), &id("apt-b"), photo_upload("image/jpeg", "AAAA"))
        .expect("upload");
    let copy = service
        .duplicate(&owner(), &id("apt-b"))
        .expect("duplicate")
        .value;

    let removed = service
        .remove_photo(&owner(), &id("apt-b"), &uploaded.value)
        .expect("remove photo");
    assert!(removed.notices.is_empty());
    assert!(photos.deleted().is_empty());

    let copied_photo = service.snapshot(&owner()).expect("snapshot").apartments[2].photos[0]
        .id
        .clone();
    let removed = service
        .remove_photo(&owner(), &copy, &copied_photo)
        .expect("remove copied photo");
    assert!(removed.notices.is_empty());
    assert_eq!(photos.deleted().len(), 1);
}

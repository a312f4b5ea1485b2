use super::domain::{
    Apartment, ApartmentError, ApartmentId, CostCategory, Direction, MoveInFee, Photo, PhotoId,
    PhotoSource, ScalarField, UploadState,
};
use super::report::ComparisonReport;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A single routed edit. Each variant maps onto one of the explicit update
/// operations on [`ApartmentStore`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "target", rename_all = "snake_case")]
pub enum FieldEdit {
    Cost {
        category: CostCategory,
        value: String,
    },
    MoveInFee {
        fee: MoveInFee,
        value: String,
    },
    Scalar {
        field: ScalarField,
        value: String,
    },
}

impl FieldEdit {
    fn apply(self, apartment: &mut Apartment) -> Result<(), ApartmentError> {
        match self {
            FieldEdit::Cost { category, value } => apartment.costs.set(category, value),
            FieldEdit::MoveInFee { fee, value } => apartment.move_in_fees.set(fee, value),
            FieldEdit::Scalar { field, value } => apartment.set_scalar(field, value)?,
        }
        Ok(())
    }
}

/// Owned, single-writer apartment list plus the view selection state that
/// depends on it: which entry is expanded and which two are being compared.
#[derive(Debug, Clone)]
pub struct ApartmentStore {
    apartments: Vec<Apartment>,
    active: Option<ApartmentId>,
    compare_selection: Vec<ApartmentId>,
    sequence: u64,
}

impl Default for ApartmentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ApartmentStore {
    /// Starts with one blank apartment, ready for input.
    pub fn new() -> Self {
        let mut store = Self::empty();
        let id = store.mint_apartment_id();
        store.apartments.push(Apartment::empty(id));
        store
    }

    fn empty() -> Self {
        Self {
            apartments: Vec::new(),
            active: None,
            compare_selection: Vec::new(),
            sequence: 0,
        }
    }

    /// Hydrates from persisted records. Duplicate apartment or photo ids are
    /// re-minted so the collection invariant holds from the start.
    pub fn from_apartments(apartments: Vec<Apartment>) -> Self {
        let mut store = Self::empty();
        let mut seen_apartments = HashSet::new();
        let mut seen_photos = HashSet::new();

        for mut apartment in apartments {
            if !seen_apartments.insert(apartment.id.clone()) {
                apartment.id = store.mint_apartment_id_avoiding(&seen_apartments);
                seen_apartments.insert(apartment.id.clone());
            }
            for photo in &mut apartment.photos {
                if !seen_photos.insert(photo.id.clone()) {
                    photo.id = PhotoId(store.mint_avoiding("photo", |candidate| {
                        seen_photos.contains(&PhotoId(candidate.to_string()))
                    }));
                    seen_photos.insert(photo.id.clone());
                }
            }
            store.apartments.push(apartment);
        }

        store
    }

    pub fn apartments(&self) -> &[Apartment] {
        &self.apartments
    }

    pub fn into_apartments(self) -> Vec<Apartment> {
        self.apartments
    }

    pub fn get(&self, id: &ApartmentId) -> Option<&Apartment> {
        self.apartments.iter().find(|apartment| &apartment.id == id)
    }

    pub fn active(&self) -> Option<&ApartmentId> {
        self.active.as_ref()
    }

    pub fn compare_selection(&self) -> &[ApartmentId] {
        &self.compare_selection
    }

    pub fn report(&self) -> ComparisonReport {
        ComparisonReport::build(&self.apartments, &self.compare_selection)
    }

    /// Appends a blank apartment and expands it.
    pub fn add(&mut self) -> ApartmentId {
        let id = self.mint_apartment_id();
        self.apartments.push(Apartment::empty(id.clone()));
        self.active = Some(id.clone());
        id
    }

    /// Inserts a deep copy right after the source and expands it. The copy
    /// gets a fresh id, fresh photo ids, and " (copy)" on a nonempty name.
    pub fn duplicate(&mut self, id: &ApartmentId) -> Result<ApartmentId, ApartmentError> {
        let index = self.position(id)?;
        let mut copy = self.apartments[index].clone();

        copy.id = self.mint_apartment_id();
        if !copy.name.is_empty() {
            copy.name = format!("{} (copy)", copy.name);
        }
        for photo in &mut copy.photos {
            photo.id = self.mint_photo_id();
        }

        let new_id = copy.id.clone();
        self.apartments.insert(index + 1, copy);
        self.active = Some(new_id.clone());
        Ok(new_id)
    }

    /// Removes the entry and evicts it from the active slot and the
    /// comparison selection. The selection is not refilled.
    pub fn remove(&mut self, id: &ApartmentId) -> Result<Apartment, ApartmentError> {
        let index = self.position(id)?;
        let removed = self.apartments.remove(index);

        if self.active.as_ref() == Some(id) {
            self.active = None;
        }
        self.compare_selection.retain(|selected| selected != id);
        Ok(removed)
    }

    /// Swaps with the neighbour in `direction`. Returns `false` at either end
    /// of the list, where nothing moves.
    pub fn reorder(
        &mut self,
        id: &ApartmentId,
        direction: Direction,
    ) -> Result<bool, ApartmentError> {
        let index = self.position(id)?;
        let target = match direction {
            Direction::Up if index > 0 => index - 1,
            Direction::Down if index + 1 < self.apartments.len() => index + 1,
            _ => return Ok(false),
        };
        self.apartments.swap(index, target);
        Ok(true)
    }

    pub fn set_cost(
        &mut self,
        id: &ApartmentId,
        category: CostCategory,
        value: impl Into<String>,
    ) -> Result<(), ApartmentError> {
        self.get_mut(id)?.costs.set(category, value);
        Ok(())
    }

    pub fn set_move_in_fee(
        &mut self,
        id: &ApartmentId,
        fee: MoveInFee,
        value: impl Into<String>,
    ) -> Result<(), ApartmentError> {
        self.get_mut(id)?.move_in_fees.set(fee, value);
        Ok(())
    }

    pub fn set_scalar_field(
        &mut self,
        id: &ApartmentId,
        field: ScalarField,
        value: impl Into<String>,
    ) -> Result<(), ApartmentError> {
        self.get_mut(id)?.set_scalar(field, value.into())
    }

    /// Applies a batch of edits atomically: if any edit is rejected nothing
    /// changes. Without a target the edits land in a new apartment appended
    /// to the list.
    pub fn apply_edits(
        &mut self,
        target: Option<&ApartmentId>,
        edits: Vec<FieldEdit>,
    ) -> Result<ApartmentId, ApartmentError> {
        let (index, mut draft) = match target {
            Some(id) => {
                let index = self.position(id)?;
                (Some(index), self.apartments[index].clone())
            }
            None => (None, Apartment::empty(self.mint_apartment_id())),
        };

        for edit in edits {
            edit.apply(&mut draft)?;
        }

        let id = draft.id.clone();
        match index {
            Some(index) => self.apartments[index] = draft,
            None => {
                self.apartments.push(draft);
                self.active = Some(id.clone());
            }
        }
        Ok(id)
    }

    /// Selects an apartment for head-to-head comparison, or deselects it if
    /// already chosen. A third pick pushes out the oldest of the two.
    pub fn toggle_compare(&mut self, id: &ApartmentId) -> Result<(), ApartmentError> {
        self.position(id)?;
        if let Some(index) = self.compare_selection.iter().position(|selected| selected == id) {
            self.compare_selection.remove(index);
            return Ok(());
        }
        if self.compare_selection.len() >= 2 {
            self.compare_selection.remove(0);
        }
        self.compare_selection.push(id.clone());
        Ok(())
    }

    pub fn set_active(&mut self, id: Option<&ApartmentId>) -> Result<(), ApartmentError> {
        if let Some(id) = id {
            self.position(id)?;
        }
        self.active = id.cloned();
        Ok(())
    }

    /// Resets to a single blank apartment with nothing expanded or selected.
    pub fn clear_all(&mut self) {
        self.apartments.clear();
        self.active = None;
        self.compare_selection.clear();
        let id = self.mint_apartment_id();
        self.apartments.push(Apartment::empty(id));
    }

    /// Attaches a photo as a local-only preview.
    pub fn add_photo(
        &mut self,
        id: &ApartmentId,
        name: impl Into<String>,
        source: PhotoSource,
    ) -> Result<PhotoId, ApartmentError> {
        self.position(id)?;
        let photo_id = self.mint_photo_id();
        let apartment = self.get_mut(id)?;
        apartment.photos.push(Photo {
            id: photo_id.clone(),
            name: name.into(),
            source,
            upload: UploadState::LocalOnly,
        });
        Ok(photo_id)
    }

    pub fn remove_photo(
        &mut self,
        id: &ApartmentId,
        photo_id: &PhotoId,
    ) -> Result<Photo, ApartmentError> {
        let apartment = self.get_mut(id)?;
        let index = apartment
            .photos
            .iter()
            .position(|photo| &photo.id == photo_id)
            .ok_or_else(|| ApartmentError::PhotoNotFound {
                apartment: id.clone(),
                photo: photo_id.clone(),
            })?;
        Ok(apartment.photos.remove(index))
    }

    /// Records the outcome of a blob upload. Success swaps the embedded
    /// preview for the remote url; failure keeps the preview and marks it.
    pub fn resolve_photo_upload(
        &mut self,
        id: &ApartmentId,
        photo_id: &PhotoId,
        outcome: Result<String, String>,
    ) -> Result<(), ApartmentError> {
        let apartment = self.get_mut(id)?;
        let photo = apartment
            .photos
            .iter_mut()
            .find(|photo| &photo.id == photo_id)
            .ok_or_else(|| ApartmentError::PhotoNotFound {
                apartment: id.clone(),
                photo: photo_id.clone(),
            })?;

        match outcome {
            Ok(url) => {
                photo.source = PhotoSource::Remote { url };
                photo.upload = UploadState::Uploaded;
            }
            Err(reason) => photo.upload = UploadState::Failed { reason },
        }
        Ok(())
    }

    fn position(&self, id: &ApartmentId) -> Result<usize, ApartmentError> {
        self.apartments
            .iter()
            .position(|apartment| &apartment.id == id)
            .ok_or_else(|| ApartmentError::NotFound(id.clone()))
    }

    fn get_mut(&mut self, id: &ApartmentId) -> Result<&mut Apartment, ApartmentError> {
        self.apartments
            .iter_mut()
            .find(|apartment| &apartment.id == id)
            .ok_or_else(|| ApartmentError::NotFound(id.clone()))
    }

    fn mint_apartment_id(&mut self) -> ApartmentId {
        let existing: HashSet<ApartmentId> = self
            .apartments
            .iter()
            .map(|apartment| apartment.id.clone())
            .collect();
        self.mint_apartment_id_avoiding(&existing)
    }

    fn mint_apartment_id_avoiding(&mut self, taken: &HashSet<ApartmentId>) -> ApartmentId {
        ApartmentId(self.mint_avoiding("apt", |candidate| {
            taken.contains(&ApartmentId(candidate.to_string()))
        }))
    }

    fn mint_photo_id(&mut self) -> PhotoId {
        let existing: HashSet<PhotoId> = self
            .apartments
            .iter()
            .flat_map(|apartment| apartment.photos.iter().map(|photo| photo.id.clone()))
            .collect();
        PhotoId(self.mint_avoiding("photo", |candidate| {
            existing.contains(&PhotoId(candidate.to_string()))
        }))
    }

    fn mint_avoiding<F>(&mut self, prefix: &str, taken: F) -> String
    where
        F: Fn(&str) -> bool,
    {
        loop {
            self.sequence = self.sequence.wrapping_add(1);
            let candidate = format!(
                "{prefix}-{:x}-{:04x}",
                Utc::now().timestamp_millis(),
                self.sequence
            );
            if !taken(&candidate) {
                return candidate;
            }
        }
    }
}

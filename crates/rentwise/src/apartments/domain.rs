use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApartmentId(pub String);

impl fmt::Display for ApartmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhotoId(pub String);

impl fmt::Display for PhotoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque link identifier that scopes a saved apartment list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostCategory {
    Rent,
    Parking,
    Electricity,
    Gas,
    Water,
    Internet,
    Trash,
    Insurance,
    Laundry,
    Storage,
    Pet,
    Other,
}

impl CostCategory {
    pub const ALL: [Self; 12] = [
        Self::Rent,
        Self::Parking,
        Self::Electricity,
        Self::Gas,
        Self::Water,
        Self::Internet,
        Self::Trash,
        Self::Insurance,
        Self::Laundry,
        Self::Storage,
        Self::Pet,
        Self::Other,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Rent => "Rent",
            Self::Parking => "Parking",
            Self::Electricity => "Electricity",
            Self::Gas => "Gas",
            Self::Water => "Water",
            Self::Internet => "Internet",
            Self::Trash => "Trash / Waste",
            Self::Insurance => "Renter's Insurance",
            Self::Laundry => "Laundry",
            Self::Storage => "Storage Unit",
            Self::Pet => "Pet Rent",
            Self::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveInFee {
    FirstMonth,
    LastMonth,
    Deposit,
    PetDeposit,
    ApplicationFee,
    AdminFee,
    BrokerFee,
    OtherMoveIn,
}

impl MoveInFee {
    pub const ALL: [Self; 8] = [
        Self::FirstMonth,
        Self::LastMonth,
        Self::Deposit,
        Self::PetDeposit,
        Self::ApplicationFee,
        Self::AdminFee,
        Self::BrokerFee,
        Self::OtherMoveIn,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::FirstMonth => "First Month's Rent",
            Self::LastMonth => "Last Month's Rent",
            Self::Deposit => "Security Deposit",
            Self::PetDeposit => "Pet Deposit",
            Self::ApplicationFee => "Application Fee",
            Self::AdminFee => "Admin Fee",
            Self::BrokerFee => "Broker Fee",
            Self::OtherMoveIn => "Other Move-In",
        }
    }
}

/// Monthly recurring costs, one entry per category. Values are kept as the
/// text the user typed; blank means "not provided".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Costs {
    pub rent: String,
    pub parking: String,
    pub electricity: String,
    pub gas: String,
    pub water: String,
    pub internet: String,
    pub trash: String,
    pub insurance: String,
    pub laundry: String,
    pub storage: String,
    pub pet: String,
    pub other: String,
}

impl Costs {
    pub fn get(&self, category: CostCategory) -> &str {
        match category {
            CostCategory::Rent => &self.rent,
            CostCategory::Parking => &self.parking,
            CostCategory::Electricity => &self.electricity,
            CostCategory::Gas => &self.gas,
            CostCategory::Water => &self.water,
            CostCategory::Internet => &self.internet,
            CostCategory::Trash => &self.trash,
            CostCategory::Insurance => &self.insurance,
            CostCategory::Laundry => &self.laundry,
            CostCategory::Storage => &self.storage,
            CostCategory::Pet => &self.pet,
            CostCategory::Other => &self.other,
        }
    }

    pub fn set(&mut self, category: CostCategory, value: impl Into<String>) {
        let slot = match category {
            CostCategory::Rent => &mut self.rent,
            CostCategory::Parking => &mut self.parking,
            CostCategory::Electricity => &mut self.electricity,
            CostCategory::Gas => &mut self.gas,
            CostCategory::Water => &mut self.water,
            CostCategory::Internet => &mut self.internet,
            CostCategory::Trash => &mut self.trash,
            CostCategory::Insurance => &mut self.insurance,
            CostCategory::Laundry => &mut self.laundry,
            CostCategory::Storage => &mut self.storage,
            CostCategory::Pet => &mut self.pet,
            CostCategory::Other => &mut self.other,
        };
        *slot = value.into();
    }

    pub fn amount(&self, category: CostCategory) -> f64 {
        parse_amount(self.get(category))
    }
}

/// One-time fees due at move-in, same blank semantics as [`Costs`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoveInFees {
    pub first_month: String,
    pub last_month: String,
    pub deposit: String,
    pub pet_deposit: String,
    pub application_fee: String,
    pub admin_fee: String,
    pub broker_fee: String,
    pub other_move_in: String,
}

impl MoveInFees {
    pub fn get(&self, fee: MoveInFee) -> &str {
        match fee {
            MoveInFee::FirstMonth => &self.first_month,
            MoveInFee::LastMonth => &self.last_month,
            MoveInFee::Deposit => &self.deposit,
            MoveInFee::PetDeposit => &self.pet_deposit,
            MoveInFee::ApplicationFee => &self.application_fee,
            MoveInFee::AdminFee => &self.admin_fee,
            MoveInFee::BrokerFee => &self.broker_fee,
            MoveInFee::OtherMoveIn => &self.other_move_in,
        }
    }

    pub fn set(&mut self, fee: MoveInFee, value: impl Into<String>) {
        let slot = match fee {
            MoveInFee::FirstMonth => &mut self.first_month,
            MoveInFee::LastMonth => &mut self.last_month,
            MoveInFee::Deposit => &mut self.deposit,
            MoveInFee::PetDeposit => &mut self.pet_deposit,
            MoveInFee::ApplicationFee => &mut self.application_fee,
            MoveInFee::AdminFee => &mut self.admin_fee,
            MoveInFee::BrokerFee => &mut self.broker_fee,
            MoveInFee::OtherMoveIn => &mut self.other_move_in,
        };
        *slot = value.into();
    }

    pub fn amount(&self, fee: MoveInFee) -> f64 {
        parse_amount(self.get(fee))
    }
}

/// Top-level apartment fields that are edited as free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarField {
    Name,
    Neighborhood,
    City,
    Address,
    Unit,
    Notes,
    Sqft,
    Bedrooms,
    LeaseTermMonths,
    DateAvailable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PhotoSource {
    Embedded { data: String },
    Remote { url: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum UploadState {
    LocalOnly,
    Uploaded,
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    pub id: PhotoId,
    pub name: String,
    pub source: PhotoSource,
    pub upload: UploadState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Apartment {
    pub id: ApartmentId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub neighborhood: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub sqft: String,
    #[serde(default)]
    pub bedrooms: String,
    #[serde(default)]
    pub lease_term_months: String,
    #[serde(default)]
    pub date_available: Option<NaiveDate>,
    #[serde(default)]
    pub costs: Costs,
    #[serde(default)]
    pub move_in_fees: MoveInFees,
    #[serde(default)]
    pub photos: Vec<Photo>,
}

impl Apartment {
    pub fn empty(id: ApartmentId) -> Self {
        Self {
            id,
            name: String::new(),
            neighborhood: String::new(),
            city: String::new(),
            address: String::new(),
            unit: String::new(),
            notes: String::new(),
            sqft: String::new(),
            bedrooms: String::new(),
            lease_term_months: String::new(),
            date_available: None,
            costs: Costs::default(),
            move_in_fees: MoveInFees::default(),
            photos: Vec::new(),
        }
    }

    /// Square footage when provided and positive.
    pub fn square_feet(&self) -> Option<f64> {
        let sqft = parse_amount(&self.sqft);
        (sqft > 0.0).then_some(sqft)
    }

    /// Trimmed neighborhood label, or `None` when blank.
    pub fn neighborhood_label(&self) -> Option<&str> {
        let trimmed = self.neighborhood.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }

    pub fn display_name(&self, position: usize) -> String {
        if self.name.trim().is_empty() {
            format!("Apartment {}", position + 1)
        } else {
            self.name.clone()
        }
    }

    pub(crate) fn set_scalar(
        &mut self,
        field: ScalarField,
        value: String,
    ) -> Result<(), ApartmentError> {
        match field {
            ScalarField::Name => self.name = value,
            ScalarField::Neighborhood => self.neighborhood = value,
            ScalarField::City => self.city = value,
            ScalarField::Address => self.address = value,
            ScalarField::Unit => self.unit = value,
            ScalarField::Notes => self.notes = value,
            ScalarField::Sqft => self.sqft = value,
            ScalarField::Bedrooms => self.bedrooms = value,
            ScalarField::LeaseTermMonths => self.lease_term_months = value,
            ScalarField::DateAvailable => self.date_available = parse_optional_date(&value)?,
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApartmentError {
    #[error("apartment {0} not found")]
    NotFound(ApartmentId),
    #[error("photo {photo} not found on apartment {apartment}")]
    PhotoNotFound {
        apartment: ApartmentId,
        photo: PhotoId,
    },
    #[error("'{0}' is not a YYYY-MM-DD date")]
    InvalidDate(String),
}

/// Coerces user-entered amount text to a number. Blank, unparseable and
/// non-finite input all read as zero; negative values pass through.
pub fn parse_amount(raw: &str) -> f64 {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix('$').unwrap_or(trimmed).trim_start();
    if trimmed.is_empty() {
        return 0.0;
    }

    let cleaned: String = trimmed.chars().filter(|ch| *ch != ',').collect();
    match cleaned.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

pub(crate) fn parse_optional_date(raw: &str) -> Result<Option<NaiveDate>, ApartmentError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| ApartmentError::InvalidDate(trimmed.to_string()))
}

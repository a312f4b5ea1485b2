//! Listing import: the structured unit and fee data a language model pulls out
//! of a listing page, and how one unit of it becomes apartment field edits.
//!
//! Fetching the page and calling the model happen outside this crate behind
//! [`ListingImporter`]; what arrives here is the model's reply.

mod mapping;
mod normalizer;
mod parser;

use serde::{Deserialize, Serialize};

pub use mapping::edits_for_unit;
pub use parser::parse_model_reply;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportedListing {
    pub building: ImportedBuilding,
    #[serde(default)]
    pub units: Vec<ImportedUnit>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImportedBuilding {
    #[serde(deserialize_with = "normalizer::loose_text")]
    pub name: Option<String>,
    #[serde(deserialize_with = "normalizer::loose_text")]
    pub address: Option<String>,
    #[serde(deserialize_with = "normalizer::loose_text")]
    pub neighborhood: Option<String>,
    #[serde(deserialize_with = "normalizer::loose_text")]
    pub lease_terms: Option<String>,
    #[serde(deserialize_with = "normalizer::loose_text")]
    pub special: Option<String>,
    pub fees: ImportedFees,
    #[serde(deserialize_with = "normalizer::loose_text_list")]
    pub utilities_included: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImportedFees {
    #[serde(deserialize_with = "normalizer::loose_amount")]
    pub internet: Option<f64>,
    #[serde(deserialize_with = "normalizer::loose_amount")]
    pub parking: Option<f64>,
    #[serde(deserialize_with = "normalizer::loose_amount")]
    pub parking_garage: Option<f64>,
    #[serde(deserialize_with = "normalizer::loose_amount")]
    pub parking_surface: Option<f64>,
    #[serde(deserialize_with = "normalizer::loose_amount")]
    pub pet_rent: Option<f64>,
    #[serde(deserialize_with = "normalizer::loose_amount")]
    pub pet_deposit: Option<f64>,
    #[serde(deserialize_with = "normalizer::loose_amount")]
    pub storage: Option<f64>,
    #[serde(deserialize_with = "normalizer::loose_amount")]
    pub application_fee: Option<f64>,
    #[serde(deserialize_with = "normalizer::loose_amount")]
    pub admin_fee: Option<f64>,
    #[serde(deserialize_with = "normalizer::loose_amount")]
    pub security_deposit: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImportedUnit {
    #[serde(deserialize_with = "normalizer::loose_text")]
    pub unit: Option<String>,
    #[serde(deserialize_with = "normalizer::loose_text")]
    pub plan: Option<String>,
    #[serde(deserialize_with = "normalizer::loose_text")]
    pub beds: Option<String>,
    #[serde(deserialize_with = "normalizer::loose_text")]
    pub baths: Option<String>,
    #[serde(deserialize_with = "normalizer::loose_amount")]
    pub sqft: Option<f64>,
    #[serde(deserialize_with = "normalizer::loose_amount")]
    pub rent: Option<f64>,
    #[serde(deserialize_with = "normalizer::loose_text")]
    pub available: Option<String>,
}

/// External collaborator that turns a listing url into structured data.
/// One request per call; callers decide whether to try again.
pub trait ListingImporter: Send + Sync {
    fn import_listing(&self, url: &str) -> Result<ImportedListing, ListingImportError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ListingImportError {
    #[error("listing could not be fetched: {0}")]
    Fetch(String),
    #[error("model reply is not valid JSON: {0}")]
    MalformedReply(#[from] serde_json::Error),
    #[error("model reply has an unexpected structure: {0}")]
    UnexpectedStructure(&'static str),
    #[error("listing has {available} units, no unit at index {index}")]
    UnitOutOfRange { index: usize, available: usize },
}

use super::normalizer::first_amount;
use super::{ImportedBuilding, ImportedListing, ImportedUnit, ListingImportError};
use crate::apartments::domain::{CostCategory, MoveInFee, ScalarField};
use crate::apartments::FieldEdit;
use chrono::NaiveDate;

/// Field edits that copy one unit of `listing` into an apartment. Only
/// values the listing actually provides produce edits, so applying them
/// over an existing apartment keeps whatever the listing left out.
pub fn edits_for_unit(
    listing: &ImportedListing,
    unit_index: usize,
) -> Result<Vec<FieldEdit>, ListingImportError> {
    let unit = listing
        .units
        .get(unit_index)
        .ok_or(ListingImportError::UnitOutOfRange {
            index: unit_index,
            available: listing.units.len(),
        })?;
    let building = &listing.building;

    let mut edits = Vec::new();
    let mut scalar = |field: ScalarField, value: Option<String>| {
        if let Some(value) = value {
            edits.push(FieldEdit::Scalar { field, value });
        }
    };

    scalar(ScalarField::Name, display_name(building, unit));
    scalar(ScalarField::Address, building.address.clone());
    scalar(ScalarField::City, building.address.as_deref().and_then(city_from_address));
    scalar(ScalarField::Neighborhood, building.neighborhood.clone());
    scalar(ScalarField::Unit, unit.unit.clone());
    scalar(ScalarField::Sqft, positive(unit.sqft));
    scalar(ScalarField::Bedrooms, unit.beds.as_deref().and_then(bedroom_count));
    scalar(
        ScalarField::LeaseTermMonths,
        building.lease_terms.as_deref().and_then(single_term_months),
    );
    scalar(
        ScalarField::DateAvailable,
        unit.available.as_deref().and_then(iso_date),
    );
    scalar(ScalarField::Notes, notes(building, unit));

    let fees = &building.fees;
    let parking = fees
        .parking
        .or_else(|| cheaper(fees.parking_surface, fees.parking_garage));
    let monthly = [
        (CostCategory::Rent, unit.rent),
        (CostCategory::Parking, parking),
        (CostCategory::Internet, fees.internet),
        (CostCategory::Pet, fees.pet_rent),
        (CostCategory::Storage, fees.storage),
    ];
    for (category, amount) in monthly {
        if let Some(value) = positive(amount) {
            edits.push(FieldEdit::Cost { category, value });
        }
    }

    let one_time = [
        (MoveInFee::Deposit, fees.security_deposit),
        (MoveInFee::PetDeposit, fees.pet_deposit),
        (MoveInFee::ApplicationFee, fees.application_fee),
        (MoveInFee::AdminFee, fees.admin_fee),
    ];
    for (fee, amount) in one_time {
        if let Some(value) = positive(amount) {
            edits.push(FieldEdit::MoveInFee { fee, value });
        }
    }

    Ok(edits)
}

fn positive(amount: Option<f64>) -> Option<String> {
    amount
        .filter(|value| *value > 0.0)
        .map(|value| value.to_string())
}

fn cheaper(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

fn display_name(building: &ImportedBuilding, unit: &ImportedUnit) -> Option<String> {
    match (building.name.as_deref(), unit.unit.as_deref()) {
        (Some(name), Some(unit)) => Some(format!("{name} #{unit}")),
        (Some(name), None) => Some(name.to_string()),
        (None, Some(unit)) => Some(format!("Unit {unit}")),
        (None, None) => None,
    }
}

/// "500 E 5th St, Austin, TX 78701" -> "Austin".
fn city_from_address(address: &str) -> Option<String> {
    let parts: Vec<&str> = address
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();
    if parts.len() < 3 {
        return None;
    }
    Some(parts[parts.len() - 2].to_string())
}

fn bedroom_count(beds: &str) -> Option<String> {
    if beds.trim().eq_ignore_ascii_case("studio") {
        return Some("0".to_string());
    }
    first_amount(beds).map(|count| count.to_string())
}

/// Only a single stated term becomes the lease length; ranges go to notes.
fn single_term_months(terms: &str) -> Option<String> {
    let numbers = terms
        .split(|ch: char| !ch.is_ascii_digit())
        .filter(|chunk| !chunk.is_empty())
        .count();
    if numbers == 1 {
        first_amount(terms).map(|months| months.to_string())
    } else {
        None
    }
}

fn iso_date(raw: &str) -> Option<String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .ok()
        .map(|date| date.format("%Y-%m-%d").to_string())
}

fn notes(building: &ImportedBuilding, unit: &ImportedUnit) -> Option<String> {
    let mut lines = Vec::new();

    if let Some(plan) = &unit.plan {
        lines.push(format!("Floor plan: {plan}"));
    }
    if let Some(baths) = &unit.baths {
        lines.push(format!("Baths: {baths}"));
    }
    if let Some(available) = &unit.available {
        if iso_date(available).is_none() {
            lines.push(format!("Available: {available}"));
        }
    }
    if let Some(terms) = &building.lease_terms {
        if single_term_months(terms).is_none() {
            lines.push(format!("Lease terms: {terms}"));
        }
    }
    if let Some(special) = &building.special {
        lines.push(format!("Special: {special}"));
    }
    if !building.utilities_included.is_empty() {
        lines.push(format!(
            "Utilities included: {}",
            building.utilities_included.join(", ")
        ));
    }

    (!lines.is_empty()).then(|| lines.join("\n"))
}

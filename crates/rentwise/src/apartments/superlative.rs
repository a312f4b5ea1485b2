use super::domain::{Apartment, ApartmentId, CostCategory};
use serde::Serialize;

/// Lowest nonzero value for a category within a scope, and who owns it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Superlative {
    pub category: CostCategory,
    pub category_label: &'static str,
    pub apartment_id: ApartmentId,
    pub amount: f64,
}

/// Needs at least two apartments reporting a positive value. Equal minimums
/// resolve to whichever comes first in `scope`.
pub fn cheapest_in_category(scope: &[&Apartment], category: CostCategory) -> Option<Superlative> {
    let mut reported = scope
        .iter()
        .map(|apartment| (apartment, apartment.costs.amount(category)))
        .filter(|(_, amount)| *amount > 0.0);

    let mut best = reported.next()?;
    let mut contenders = 1usize;
    for candidate in reported {
        contenders += 1;
        if candidate.1 < best.1 {
            best = candidate;
        }
    }

    if contenders < 2 {
        return None;
    }

    let (apartment, amount) = best;
    Some(Superlative {
        category,
        category_label: category.label(),
        apartment_id: apartment.id.clone(),
        amount,
    })
}

/// One entry per category that has a winner, in category order.
pub fn category_winners(scope: &[&Apartment]) -> Vec<Superlative> {
    CostCategory::ALL
        .into_iter()
        .filter_map(|category| cheapest_in_category(scope, category))
        .collect()
}

pub fn winner_for<'a>(
    winners: &'a [Superlative],
    category: CostCategory,
) -> Option<&'a ApartmentId> {
    winners
        .iter()
        .find(|winner| winner.category == category)
        .map(|winner| &winner.apartment_id)
}

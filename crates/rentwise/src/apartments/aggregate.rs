use super::domain::{Apartment, CostCategory, MoveInFee};

/// True monthly cost: every cost category summed, blanks counting as zero.
pub fn monthly_total(apartment: &Apartment) -> f64 {
    CostCategory::ALL
        .into_iter()
        .map(|category| apartment.costs.amount(category))
        .sum()
}

pub fn move_in_total(apartment: &Apartment) -> f64 {
    MoveInFee::ALL
        .into_iter()
        .map(|fee| apartment.move_in_fees.amount(fee))
        .sum()
}

/// Fraction of the monthly total taken by one category. `None` unless the
/// monthly total is positive.
pub fn category_share(apartment: &Apartment, category: CostCategory) -> Option<f64> {
    let total = monthly_total(apartment);
    (total > 0.0).then(|| apartment.costs.amount(category) / total)
}

pub fn per_sqft_rate(apartment: &Apartment) -> Option<f64> {
    let total = monthly_total(apartment);
    if total <= 0.0 {
        return None;
    }
    apartment.square_feet().map(|sqft| total / sqft)
}

pub fn is_filled(apartment: &Apartment) -> bool {
    monthly_total(apartment) > 0.0
}

/// Filled apartments in the order they were given.
pub fn filled<'a, I>(apartments: I) -> Vec<&'a Apartment>
where
    I: IntoIterator<Item = &'a Apartment>,
{
    apartments
        .into_iter()
        .filter(|apartment| is_filled(apartment))
        .collect()
}

use super::aggregate::{filled, monthly_total};
use super::domain::{Apartment, ApartmentId};
use std::cmp::Ordering;

/// Cheaper first; at equal totals the larger unit wins (missing sqft counts
/// as zero here only). Remaining ties compare equal so a stable sort keeps
/// input order.
pub fn compare(a: &Apartment, b: &Apartment) -> Ordering {
    monthly_total(a)
        .total_cmp(&monthly_total(b))
        .then_with(|| sqft_or_zero(b).total_cmp(&sqft_or_zero(a)))
}

fn sqft_or_zero(apartment: &Apartment) -> f64 {
    apartment.square_feet().unwrap_or(0.0)
}

/// Sorts references with [`compare`]; `sort_by` is stable.
pub fn rank<'a>(mut apartments: Vec<&'a Apartment>) -> Vec<&'a Apartment> {
    apartments.sort_by(|a, b| compare(a, b));
    apartments
}

/// Filled apartments in ranking order.
pub fn ranked_filled<'a, I>(apartments: I) -> Vec<&'a Apartment>
where
    I: IntoIterator<Item = &'a Apartment>,
{
    rank(filled(apartments))
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Extremes {
    pub cheapest: Option<ApartmentId>,
    pub most_expensive: Option<ApartmentId>,
}

impl Extremes {
    /// Expects an already-ranked slice. Both ends stay unset below two members.
    pub fn of_ranked(ranked: &[&Apartment]) -> Self {
        if ranked.len() < 2 {
            return Self::default();
        }
        Self {
            cheapest: ranked.first().map(|apartment| apartment.id.clone()),
            most_expensive: ranked.last().map(|apartment| apartment.id.clone()),
        }
    }

    pub fn of<'a, I>(apartments: I) -> Self
    where
        I: IntoIterator<Item = &'a Apartment>,
    {
        Self::of_ranked(&ranked_filled(apartments))
    }
}

/// Spread between the most and least expensive member of a ranked slice.
pub fn savings(ranked: &[&Apartment]) -> Option<f64> {
    match ranked {
        [first, .., last] => Some(monthly_total(last) - monthly_total(first)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apartment(id: &str, rent: &str, sqft: &str) -> Apartment {
        let mut apartment = Apartment::empty(ApartmentId(id.to_string()));
        apartment.costs.rent = rent.to_string();
        apartment.sqft = sqft.to_string();
        apartment
    }

    fn ids(ranked: &[&Apartment]) -> Vec<String> {
        ranked.iter().map(|apt| apt.id.0.clone()).collect()
    }

    #[test]
    fn equal_totals_prefer_larger_sqft() {
        let small = apartment("small", "1500", "800");
        let large = apartment("large", "1500", "1000");
        assert_eq!(compare(&large, &small), Ordering::Less);
        assert_eq!(ids(&rank(vec![&small, &large])), vec!["large", "small"]);
    }

    #[test]
    fn missing_sqft_loses_tie_break() {
        let unknown = apartment("unknown", "1500", "");
        let sized = apartment("sized", "1500", "400");
        assert_eq!(ids(&rank(vec![&unknown, &sized])), vec!["sized", "unknown"]);
    }

    #[test]
    fn compare_is_irreflexive_and_full_ties_keep_input_order() {
        let a = apartment("a", "1500", "700");
        let b = apartment("b", "1500", "700");
        assert_eq!(compare(&a, &a), Ordering::Equal);
        assert_eq!(ids(&rank(vec![&a, &b])), vec!["a", "b"]);
        assert_eq!(ids(&rank(vec![&b, &a])), vec!["b", "a"]);
    }

    #[test]
    fn ranking_is_repeatable_and_transitive() {
        let a = apartment("a", "1200", "500");
        let b = apartment("b", "1500", "900");
        let c = apartment("c", "1500", "600");
        let d = apartment("d", "900", "");
        let once = rank(vec![&a, &b, &c, &d]);
        let twice = rank(once.clone());
        assert_eq!(ids(&once), vec!["d", "a", "b", "c"]);
        assert_eq!(ids(&once), ids(&twice));
        for window in once.windows(2) {
            assert_ne!(compare(window[0], window[1]), Ordering::Greater);
        }
    }

    #[test]
    fn extremes_need_two_filled_apartments() {
        let blank = apartment("blank", "", "");
        let only = apartment("only", "1500", "");
        assert_eq!(Extremes::of([&blank, &only]), Extremes::default());
        assert_eq!(Extremes::of(Vec::<&Apartment>::new()), Extremes::default());

        let cheaper = apartment("cheaper", "1200", "");
        let extremes = Extremes::of([&blank, &only, &cheaper]);
        assert_eq!(extremes.cheapest, Some(ApartmentId("cheaper".to_string())));
        assert_eq!(
            extremes.most_expensive,
            Some(ApartmentId("only".to_string()))
        );
    }

    #[test]
    fn savings_spans_ranked_ends() {
        let a = apartment("a", "1500", "");
        let b = apartment("b", "1700", "");
        assert_eq!(savings(&[&a, &b]), Some(200.0));
        assert_eq!(savings(&[&a]), None);
    }
}

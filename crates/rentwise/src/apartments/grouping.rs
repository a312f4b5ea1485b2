use super::aggregate::{filled, monthly_total};
use super::domain::{Apartment, ApartmentId};
use super::ranking::{rank, savings, Extremes};
use super::superlative::{category_winners, Superlative};
use std::collections::BTreeMap;

/// Filled apartments partitioned by trimmed, case-sensitive neighborhood
/// label. Members of each group are in ranking order; `BTreeMap` keeps the
/// names sorted.
#[derive(Debug, Default)]
pub struct NeighborhoodGroups<'a> {
    groups: BTreeMap<String, Vec<&'a Apartment>>,
}

impl<'a> NeighborhoodGroups<'a> {
    pub fn build<I>(apartments: I) -> Self
    where
        I: IntoIterator<Item = &'a Apartment>,
    {
        let mut groups: BTreeMap<String, Vec<&'a Apartment>> = BTreeMap::new();
        for apartment in filled(apartments) {
            if let Some(label) = apartment.neighborhood_label() {
                groups.entry(label.to_string()).or_default().push(apartment);
            }
        }

        let groups = groups
            .into_iter()
            .map(|(name, members)| (name, rank(members)))
            .collect();

        Self { groups }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    pub fn members(&self, name: &str) -> Option<&[&'a Apartment]> {
        self.groups.get(name).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Group comparisons only mean something once two areas exist.
    pub fn has_multiple(&self) -> bool {
        self.groups.len() >= 2
    }

    pub fn stats(&self) -> Vec<GroupStats> {
        self.groups
            .iter()
            .map(|(name, members)| GroupStats::compute(name, members))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupStats {
    pub name: String,
    pub member_ids: Vec<ApartmentId>,
    pub average_total: f64,
    pub min_total: f64,
    pub max_total: f64,
    pub savings: Option<f64>,
    pub extremes: Extremes,
    pub category_winners: Vec<Superlative>,
}

impl GroupStats {
    fn compute(name: &str, ranked: &[&Apartment]) -> Self {
        let totals: Vec<f64> = ranked.iter().map(|apartment| monthly_total(apartment)).collect();
        let sum: f64 = totals.iter().sum();
        let average_total = if totals.is_empty() {
            0.0
        } else {
            (sum / totals.len() as f64).round()
        };

        Self {
            name: name.to_string(),
            member_ids: ranked.iter().map(|apartment| apartment.id.clone()).collect(),
            average_total,
            min_total: totals.first().copied().unwrap_or(0.0),
            max_total: totals.last().copied().unwrap_or(0.0),
            savings: savings(ranked),
            extremes: Extremes::of_ranked(ranked),
            category_winners: category_winners(ranked),
        }
    }
}

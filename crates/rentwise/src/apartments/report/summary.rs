use super::super::aggregate::{
    category_share, filled, monthly_total, move_in_total, per_sqft_rate,
};
use super::super::domain::{Apartment, ApartmentId, CostCategory, MoveInFee};
use super::super::grouping::{GroupStats, NeighborhoodGroups};
use super::super::ranking::{rank, ranked_filled, savings, Extremes};
use super::super::superlative::category_winners;
use super::views::{
    ApartmentSummaryView, ComparisonReport, ComparisonScope, CostLineView, FeeLineView,
    HeadToHeadView, NeighborhoodGroupView, PhotoStatusView,
};

impl ComparisonReport {
    pub fn build(apartments: &[Apartment], selection: &[ApartmentId]) -> Self {
        let filled_in_order = filled(apartments);
        let ranked = rank(filled_in_order.clone());
        let extremes = Extremes::of_ranked(&ranked);

        let summaries = apartments
            .iter()
            .enumerate()
            .map(|(position, apartment)| {
                let rank = ranked
                    .iter()
                    .position(|candidate| candidate.id == apartment.id)
                    .map(|index| index + 1);
                summarize(apartment, position, rank, &extremes)
            })
            .collect();

        let groups = NeighborhoodGroups::build(apartments);
        let neighborhoods = groups.stats().into_iter().map(group_view).collect();

        let head_to_head =
            (ranked.len() >= 2).then(|| build_head_to_head(apartments, selection, &ranked));

        Self {
            apartments: summaries,
            ranking: ranked.iter().map(|apartment| apartment.id.clone()).collect(),
            filled_count: ranked.len(),
            cheapest_id: extremes.cheapest,
            most_expensive_id: extremes.most_expensive,
            category_winners: category_winners(&filled_in_order),
            has_multiple_neighborhoods: groups.has_multiple(),
            neighborhoods,
            head_to_head,
        }
    }

    pub fn summary_for(&self, id: &ApartmentId) -> Option<&ApartmentSummaryView> {
        self.apartments.iter().find(|summary| &summary.id == id)
    }

    /// Summaries of filled apartments, cheapest first.
    pub fn ranked_summaries(&self) -> Vec<&ApartmentSummaryView> {
        self.ranking
            .iter()
            .filter_map(|id| self.summary_for(id))
            .collect()
    }
}

fn summarize(
    apartment: &Apartment,
    position: usize,
    rank: Option<usize>,
    extremes: &Extremes,
) -> ApartmentSummaryView {
    let monthly_total = monthly_total(apartment);

    let cost_lines = CostCategory::ALL
        .into_iter()
        .filter_map(|category| {
            let amount = apartment.costs.amount(category);
            if amount <= 0.0 {
                return None;
            }
            let share = category_share(apartment, category)?;
            Some(CostLineView {
                category,
                category_label: category.label(),
                amount,
                share,
            })
        })
        .collect();

    let move_in_lines = MoveInFee::ALL
        .into_iter()
        .filter_map(|fee| {
            let amount = apartment.move_in_fees.amount(fee);
            (amount > 0.0).then(|| FeeLineView {
                fee,
                fee_label: fee.label(),
                amount,
            })
        })
        .collect();

    ApartmentSummaryView {
        id: apartment.id.clone(),
        display_name: apartment.display_name(position),
        position,
        rank,
        neighborhood: apartment.neighborhood_label().map(str::to_string),
        monthly_total,
        move_in_total: move_in_total(apartment),
        per_sqft: per_sqft_rate(apartment),
        filled: monthly_total > 0.0,
        is_cheapest: extremes.cheapest.as_ref() == Some(&apartment.id),
        is_most_expensive: extremes.most_expensive.as_ref() == Some(&apartment.id),
        cost_lines,
        move_in_lines,
        photos: PhotoStatusView::from_states(apartment.photos.iter().map(|photo| &photo.upload)),
    }
}

fn group_view(stats: GroupStats) -> NeighborhoodGroupView {
    NeighborhoodGroupView {
        name: stats.name,
        member_ids: stats.member_ids,
        average_total: stats.average_total,
        min_total: stats.min_total,
        max_total: stats.max_total,
        savings: stats.savings,
        cheapest_id: stats.extremes.cheapest,
        most_expensive_id: stats.extremes.most_expensive,
        category_winners: stats.category_winners,
    }
}

fn build_head_to_head(
    apartments: &[Apartment],
    selection: &[ApartmentId],
    ranked_filled_all: &[&Apartment],
) -> HeadToHeadView {
    let (scope, members) = if selection.len() == 2 {
        let picked = apartments
            .iter()
            .filter(|apartment| selection.contains(&apartment.id));
        (ComparisonScope::Selection, ranked_filled(picked))
    } else {
        (ComparisonScope::AllFilled, ranked_filled_all.to_vec())
    };

    let extremes = Extremes::of_ranked(&members);
    HeadToHeadView {
        scope,
        apartment_ids: members.iter().map(|apartment| apartment.id.clone()).collect(),
        cheapest_id: extremes.cheapest,
        most_expensive_id: extremes.most_expensive,
        savings: savings(&members),
        category_winners: category_winners(&members),
    }
}

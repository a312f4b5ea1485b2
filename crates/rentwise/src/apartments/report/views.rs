use super::super::domain::{ApartmentId, CostCategory, MoveInFee, UploadState};
use super::super::superlative::Superlative;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct CostLineView {
    pub category: CostCategory,
    pub category_label: &'static str,
    pub amount: f64,
    pub share: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeeLineView {
    pub fee: MoveInFee,
    pub fee_label: &'static str,
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PhotoStatusView {
    pub total: usize,
    pub pending: usize,
    pub failed: usize,
}

impl PhotoStatusView {
    pub(crate) fn from_states<'a, I>(states: I) -> Self
    where
        I: IntoIterator<Item = &'a UploadState>,
    {
        let mut view = Self {
            total: 0,
            pending: 0,
            failed: 0,
        };
        for state in states {
            view.total += 1;
            match state {
                UploadState::LocalOnly => view.pending += 1,
                UploadState::Failed { .. } => view.failed += 1,
                UploadState::Uploaded => {}
            }
        }
        view
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ApartmentSummaryView {
    pub id: ApartmentId,
    pub display_name: String,
    pub position: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub neighborhood: Option<String>,
    pub monthly_total: f64,
    pub move_in_total: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_sqft: Option<f64>,
    pub filled: bool,
    pub is_cheapest: bool,
    pub is_most_expensive: bool,
    pub cost_lines: Vec<CostLineView>,
    pub move_in_lines: Vec<FeeLineView>,
    pub photos: PhotoStatusView,
}

#[derive(Debug, Clone, Serialize)]
pub struct NeighborhoodGroupView {
    pub name: String,
    pub member_ids: Vec<ApartmentId>,
    pub average_total: f64,
    pub min_total: f64,
    pub max_total: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub savings: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cheapest_id: Option<ApartmentId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub most_expensive_id: Option<ApartmentId>,
    pub category_winners: Vec<Superlative>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonScope {
    /// Exactly two apartments picked by the user.
    Selection,
    AllFilled,
}

#[derive(Debug, Clone, Serialize)]
pub struct HeadToHeadView {
    pub scope: ComparisonScope,
    pub apartment_ids: Vec<ApartmentId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cheapest_id: Option<ApartmentId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub most_expensive_id: Option<ApartmentId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub savings: Option<f64>,
    pub category_winners: Vec<Superlative>,
}

/// Everything the comparison screens render, derived in one pass from the
/// current list.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    pub apartments: Vec<ApartmentSummaryView>,
    pub ranking: Vec<ApartmentId>,
    pub filled_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cheapest_id: Option<ApartmentId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub most_expensive_id: Option<ApartmentId>,
    pub category_winners: Vec<Superlative>,
    pub has_multiple_neighborhoods: bool,
    pub neighborhoods: Vec<NeighborhoodGroupView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head_to_head: Option<HeadToHeadView>,
}

//! Apartment cost comparison: the record model, the derived totals and
//! rankings, and the single-writer store that every edit goes through.

pub mod aggregate;
pub mod domain;
pub mod grouping;
pub mod ranking;
pub mod report;
pub mod repository;
pub mod router;
pub mod service;
mod store;
pub mod superlative;

#[cfg(test)]
mod tests;

pub use aggregate::{category_share, is_filled, monthly_total, move_in_total, per_sqft_rate};
pub use domain::{
    parse_amount, Apartment, ApartmentError, ApartmentId, CostCategory, Costs, Direction,
    MoveInFee, MoveInFees, Photo, PhotoId, PhotoSource, ScalarField, UploadState, UserId,
};
pub use grouping::{GroupStats, NeighborhoodGroups};
pub use ranking::{compare, rank, ranked_filled, Extremes};
pub use report::{write_ranking_csv, ComparisonReport};
pub use repository::{
    ApartmentRepository, PhotoStore, PhotoStoreError, PhotoUpload, RepositoryError,
};
pub use router::comparison_router;
pub use service::{
    ComparisonService, ComparisonServiceError, ListSnapshot, Mutation, Notice, PhotoRejection,
};
pub use store::{ApartmentStore, FieldEdit};
pub use superlative::{category_winners, cheapest_in_category, Superlative};

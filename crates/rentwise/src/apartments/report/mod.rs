mod export;
mod summary;
pub mod views;

pub use export::write_ranking_csv;
pub use views::ComparisonReport;

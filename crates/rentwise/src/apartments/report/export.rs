use super::views::ComparisonReport;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
struct RankingRow<'a> {
    rank: usize,
    id: &'a str,
    name: &'a str,
    neighborhood: &'a str,
    monthly_total: f64,
    move_in_total: f64,
    per_sqft: Option<f64>,
    designation: &'static str,
}

/// Writes the filled apartments in ranking order as CSV with a header row.
pub fn write_ranking_csv<W: Write>(report: &ComparisonReport, writer: W) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    for summary in report.ranked_summaries() {
        let designation = if summary.is_cheapest {
            "cheapest"
        } else if summary.is_most_expensive {
            "most_expensive"
        } else {
            ""
        };
        csv_writer.serialize(RankingRow {
            rank: summary.rank.unwrap_or_default(),
            id: &summary.id.0,
            name: &summary.display_name,
            neighborhood: summary.neighborhood.as_deref().unwrap_or_default(),
            monthly_total: summary.monthly_total,
            move_in_total: summary.move_in_total,
            per_sqft: summary.per_sqft.map(|rate| (rate * 100.0).round() / 100.0),
            designation,
        })?;
    }

    csv_writer.flush()?;
    Ok(())
}

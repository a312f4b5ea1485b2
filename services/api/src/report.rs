use crate::infra::{
    read_list_file, write_list_file, InMemoryApartmentRepository, InMemoryPhotoStore,
    SavedReplyImporter,
};
use clap::Args;
use rentwise::apartments::report::views::{ComparisonScope, HeadToHeadView};
use rentwise::apartments::{
    write_ranking_csv, ApartmentId, ApartmentRepository, ApartmentStore, ComparisonReport,
    ComparisonService, ComparisonServiceError, Superlative, UserId,
};
use rentwise::error::AppError;
use std::fmt::Write as _;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// Saved apartment list (JSON) to compare
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Emit the ranking as CSV instead of the text report
    #[arg(long)]
    pub(crate) csv: bool,
    /// Apartment ids to compare head-to-head (pass twice)
    #[arg(long = "compare", value_name = "APARTMENT_ID")]
    pub(crate) compare: Vec<String>,
}

#[derive(Args, Debug)]
pub(crate) struct ImportArgs {
    /// Saved model reply describing a listing page
    #[arg(long)]
    pub(crate) listing: PathBuf,
    /// Which unit of the listing to import (0-based)
    #[arg(long, default_value_t = 0)]
    pub(crate) unit: usize,
    /// Existing apartment list to import into; a fresh list is used otherwise
    #[arg(long)]
    pub(crate) input: Option<PathBuf>,
    /// Where to write the updated list; printed to stdout when omitted
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
    /// Overwrite this apartment instead of appending a new one
    #[arg(long)]
    pub(crate) apartment: Option<String>,
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let ReportArgs {
        input,
        csv,
        compare,
    } = args;

    let mut store = ApartmentStore::from_apartments(read_list_file(&input)?);
    for id in compare {
        store
            .toggle_compare(&ApartmentId(id))
            .map_err(ComparisonServiceError::from)?;
    }

    let report = store.report();
    if csv {
        write_ranking_csv(&report, io::stdout().lock())?;
    } else {
        print!("{}", render_comparison(&report));
    }
    Ok(())
}

pub(crate) fn run_import(args: ImportArgs) -> Result<(), AppError> {
    let ImportArgs {
        listing,
        unit,
        input,
        output,
        apartment,
    } = args;

    let owner = UserId("cli".to_string());
    let repository = Arc::new(InMemoryApartmentRepository::default());
    if let Some(path) = input {
        repository
            .save(&owner, &read_list_file(&path)?)
            .map_err(ComparisonServiceError::from)?;
    }
    let service = ComparisonService::new(repository, Arc::new(InMemoryPhotoStore::default()));

    let target = apartment.map(ApartmentId);
    let imported = service.import_listing(
        &owner,
        &SavedReplyImporter,
        &listing.to_string_lossy(),
        unit,
        target.as_ref(),
    )?;
    for notice in &imported.notices {
        eprintln!("warning: {notice:?}");
    }
    let id = imported.value;
    let apartments = service.snapshot(&owner)?.apartments;

    match output {
        Some(path) => {
            write_list_file(&path, &apartments)?;
            println!("Imported unit {} into {} ({})", unit, id, path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(&apartments)?),
    }
    Ok(())
}

pub(crate) fn render_comparison(report: &ComparisonReport) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_comparison(report, &mut out);
    out
}

fn write_comparison(report: &ComparisonReport, out: &mut String) -> std::fmt::Result {
    writeln!(
        out,
        "Apartment comparison ({} of {} filled in)",
        report.filled_count,
        report.apartments.len()
    )?;

    if report.filled_count == 0 {
        writeln!(out, "No apartment has any costs yet.")?;
        return Ok(());
    }

    writeln!(out, "\nRanking (cheapest first)")?;
    for summary in report.ranked_summaries() {
        let mut line = format!(
            "{}. {}: {}/mo | move-in {}",
            summary.rank.unwrap_or_default(),
            summary.display_name,
            dollars(summary.monthly_total),
            dollars(summary.move_in_total)
        );
        if let Some(rate) = summary.per_sqft {
            let _ = write!(line, " | {}/sqft", cents(rate));
        }
        if summary.is_cheapest {
            line.push_str(" [cheapest]");
        } else if summary.is_most_expensive {
            line.push_str(" [most expensive]");
        }
        writeln!(out, "- {line}")?;
    }

    if !report.category_winners.is_empty() {
        writeln!(out, "\nBest by category")?;
        write_winners(report, &report.category_winners, out)?;
    }

    if report.has_multiple_neighborhoods {
        writeln!(out, "\nNeighborhoods")?;
        for group in &report.neighborhoods {
            let mut line = format!(
                "{}: {} listed | avg {} | range {} - {}",
                group.name,
                group.member_ids.len(),
                dollars(group.average_total),
                dollars(group.min_total),
                dollars(group.max_total)
            );
            if let Some(savings) = group.savings {
                let _ = write!(line, " | save {}", dollars(savings));
            }
            writeln!(out, "- {line}")?;
        }
    }

    if let Some(head_to_head) = &report.head_to_head {
        write_head_to_head(report, head_to_head, out)?;
    }

    Ok(())
}

fn write_head_to_head(
    report: &ComparisonReport,
    view: &HeadToHeadView,
    out: &mut String,
) -> std::fmt::Result {
    let heading = match view.scope {
        ComparisonScope::Selection => "Head to head (selected)",
        ComparisonScope::AllFilled => "Head to head (all filled)",
    };
    writeln!(out, "\n{heading}")?;

    let names: Vec<&str> = view
        .apartment_ids
        .iter()
        .map(|id| display_name(report, id))
        .collect();
    writeln!(out, "- Comparing: {}", names.join(" vs "))?;

    if let (Some(cheapest), Some(savings)) = (&view.cheapest_id, view.savings) {
        writeln!(
            out,
            "- {} saves {}/mo",
            display_name(report, cheapest),
            dollars(savings)
        )?;
    }
    write_winners(report, &view.category_winners, out)
}

fn write_winners(
    report: &ComparisonReport,
    winners: &[Superlative],
    out: &mut String,
) -> std::fmt::Result {
    for winner in winners {
        writeln!(
            out,
            "- {}: {} ({})",
            winner.category_label,
            display_name(report, &winner.apartment_id),
            dollars(winner.amount)
        )?;
    }
    Ok(())
}

fn display_name<'a>(report: &'a ComparisonReport, id: &'a ApartmentId) -> &'a str {
    report
        .summary_for(id)
        .map(|summary| summary.display_name.as_str())
        .unwrap_or(id.0.as_str())
}

/// Whole dollars with thousands separators, e.g. `$1,950`.
fn dollars(amount: f64) -> String {
    let rounded = amount.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

fn cents(amount: f64) -> String {
    format!("${amount:.2}")
}

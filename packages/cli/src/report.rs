//! Plain-text tables for the CLI subcommands.

use std::fmt::{self, Write};

use pharmacy_gap_area_models::DashboardStatistics;
use pharmacy_gap_dataset::{LayerProbe, LayerStatus};
use pharmacy_gap_ranking::diagnostics::NoFacilityPlacement;
use pharmacy_gap_ranking::{AreaDetail, Ranking};

/// Writes the top `limit` underserved areas.
pub fn write_ranking(out: &mut impl Write, ranking: &Ranking<'_>, limit: usize) -> fmt::Result {
    let top = ranking.top(limit);
    if top.is_empty() {
        return writeln!(out, "No underserved areas.");
    }

    writeln!(
        out,
        "{:>4}  {:<28} {:>10} {:>6} {:>6} {:>8} {:>8}  STATUS",
        "RANK", "AREA", "POP", "PHARM", "IDEAL", "DEFICIT", "SCORE"
    )?;
    writeln!(out, "{}", "-".repeat(96))?;

    for (i, area) in top.iter().enumerate() {
        writeln!(
            out,
            "{:>4}  {:<28} {:>10} {:>6} {:>6} {:>8} {:>8.2}  {}",
            i + 1,
            area.record.display_name(),
            area.record.population,
            area.record.existing_facilities,
            area.metrics.ideal_facility_count,
            area.metrics.deficit,
            area.priority_score,
            area.status().label(),
        )?;
    }

    writeln!(
        out,
        "\n{} of {} underserved areas shown ({} areas total)",
        top.len(),
        ranking.underserved_count(),
        ranking.derived().len()
    )
}

/// Writes the summary statistics.
pub fn write_statistics(out: &mut impl Write, city: &str, stats: &DashboardStatistics) -> fmt::Result {
    let population_source = if stats.official_population {
        "official"
    } else {
        "sum of areas"
    };

    writeln!(out, "{city}")?;
    writeln!(
        out,
        "  Population:             {} ({population_source})",
        stats.total_population
    )?;
    writeln!(out, "  Pharmacies:             {}", stats.total_pharmacies)?;
    writeln!(out, "  Hospitals:              {}", stats.total_hospitals)?;
    writeln!(out, "  Districts:              {}", stats.total_districts)?;
    writeln!(
        out,
        "  Reported deficit areas: {}",
        stats.reported_deficit_areas
    )?;
    writeln!(out, "  Underserved areas:      {}", stats.underserved_areas)
}

/// Writes the single-area detail view.
pub fn write_detail(out: &mut impl Write, detail: &AreaDetail<'_>) -> fmt::Result {
    writeln!(out, "{}", detail.record.display_name())?;
    writeln!(out, "  Population:          {}", detail.record.population)?;
    writeln!(
        out,
        "  Existing pharmacies: {}",
        detail.record.existing_facilities
    )?;
    writeln!(out, "  Hospitals:           {}", detail.record.hospitals)?;
    writeln!(
        out,
        "  Ideal pharmacies:    {}",
        detail.metrics.ideal_facility_count
    )?;
    writeln!(out, "  Deficit:             {}", detail.metrics.deficit)?;
    writeln!(out, "  Pharmacies needed:   {}", detail.needed_facilities)?;
    writeln!(out, "  Status:              {}", detail.status().label())
}

/// Writes where each facility-less area landed.
pub fn write_diagnostics(
    out: &mut impl Write,
    placements: &[NoFacilityPlacement],
    top_k: usize,
) -> fmt::Result {
    if placements.is_empty() {
        return writeln!(out, "Every area has at least one pharmacy.");
    }

    writeln!(
        out,
        "{:<28} {:>10} {:>6} {:>8} {:>8} {:>6}",
        "AREA", "POP", "IDEAL", "DEFICIT", "SCORE", "RANK"
    )?;
    writeln!(out, "{}", "-".repeat(72))?;

    for placement in placements {
        let rank = placement
            .rank
            .map_or_else(|| "-".to_string(), |rank| rank.to_string());
        writeln!(
            out,
            "{:<28} {:>10} {:>6} {:>8} {:>8.2} {:>6}{}",
            placement.name,
            placement.population,
            placement.metrics.ideal_facility_count,
            placement.metrics.deficit,
            placement.priority_score,
            rank,
            if placement.in_top { " *" } else { "" },
        )?;
    }

    let in_top = placements.iter().filter(|p| p.in_top).count();
    writeln!(
        out,
        "\n{in_top} of {} areas without a pharmacy are in the top {top_k} (*)",
        placements.len()
    )
}

/// Writes the availability of every layer.
pub fn write_layers(out: &mut impl Write, probes: &[LayerProbe]) -> fmt::Result {
    writeln!(out, "{:<20} {:<8} {:<30} STATUS", "ID", "KIND", "NAME")?;
    writeln!(out, "{}", "-".repeat(80))?;

    for probe in probes {
        let kind = format!("{:?}", probe.layer.kind).to_lowercase();
        let status = match &probe.status {
            LayerStatus::Available { features } => format!("{features} features"),
            LayerStatus::Unavailable { reason } => format!("unavailable: {reason}"),
        };
        writeln!(
            out,
            "{:<20} {:<8} {:<30} {status}",
            probe.layer.id, kind, probe.layer.name
        )?;
    }

    Ok(())
}

//! Placement report for areas without any pharmacy.
//!
//! Every facility-less area is underserved, so each one should appear in
//! the ranking. This report shows where each landed and whether it made
//! the top of the table.

use pharmacy_gap_area_models::AreaMetrics;

use crate::ranking::Ranking;

/// Where one facility-less area landed in the ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct NoFacilityPlacement {
    /// Area display name.
    pub name: String,
    /// Resident population.
    pub population: u64,
    /// Ideal facility count and (overridden) deficit.
    pub metrics: AreaMetrics,
    /// Priority score.
    pub priority_score: f64,
    /// 1-based rank, `None` if the area was filtered out.
    pub rank: Option<usize>,
    /// Whether the rank is within the top `k`.
    pub in_top: bool,
}

/// Builds the placement report for every area with no pharmacy, in input
/// order.
#[must_use]
pub fn no_facility_placements(ranking: &Ranking<'_>, top_k: usize) -> Vec<NoFacilityPlacement> {
    let placements: Vec<NoFacilityPlacement> = ranking
        .derived()
        .iter()
        .filter(|area| area.record.has_no_facility())
        .map(|area| {
            let rank = ranking.rank_of(area.position);
            NoFacilityPlacement {
                name: area.record.display_name().to_string(),
                population: area.record.population,
                metrics: area.metrics,
                priority_score: area.priority_score,
                rank,
                in_top: rank.is_some_and(|rank| rank <= top_k),
            }
        })
        .collect();

    for placement in placements.iter().filter(|p| p.rank.is_none()) {
        log::warn!(
            "Area {} has no pharmacy but was not ranked",
            placement.name
        );
    }

    placements
}

#[cfg(test)]
mod tests {
    use pharmacy_gap_area_models::AreaRecord;

    use super::*;
    use crate::ranking::rank_areas;

    #[test]
    fn reports_every_facility_less_area() {
        let mut records: Vec<AreaRecord> = (0..12u64)
            .map(|i| AreaRecord::new(format!("busy-{i}"), 90_000 + i * 1_000, 1))
            .collect();
        records.push(AreaRecord::new("island", 800, 0));
        records.push(AreaRecord::new("", 40_000, 0));
        records.push(AreaRecord::new("served", 8_333, 1));

        let ranking = rank_areas(&records);
        let report = no_facility_placements(&ranking, 10);

        assert_eq!(report.len(), 2);

        let island = &report[0];
        assert_eq!(island.name, "island");
        assert_eq!(island.metrics.deficit, 1);
        assert_eq!(island.rank, Some(ranking.underserved_count()));
        assert!(!island.in_top);

        let unnamed = &report[1];
        assert_eq!(unnamed.name, "Unknown");
        assert!(unnamed.rank.is_some());
    }

    #[test]
    fn facility_less_area_in_top_is_flagged() {
        let records = vec![
            AreaRecord::new("a", 20_000, 1),
            AreaRecord::new("b", 50_000, 0),
        ];
        let ranking = rank_areas(&records);
        let report = no_facility_placements(&ranking, 10);

        assert_eq!(report.len(), 1);
        assert_eq!(report[0].rank, Some(1));
        assert!(report[0].in_top);
    }
}

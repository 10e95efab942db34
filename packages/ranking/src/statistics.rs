//! City-wide summary statistics.

use pharmacy_gap_area_models::{AreaRecord, DashboardStatistics};

use crate::metrics::{derive_metrics, is_underserved};

/// Summarizes the dataset.
///
/// `reported_deficit_areas` counts areas whose dataset-reported deficit is
/// positive, without the zero-facility override. `underserved_areas` is
/// the ranking engine's count. When `official_population` is set it
/// replaces the summed population.
#[must_use]
pub fn compute_statistics(
    records: &[AreaRecord],
    official_population: Option<u64>,
) -> DashboardStatistics {
    let summed_population = records
        .iter()
        .fold(0u64, |acc, r| acc.saturating_add(r.population));

    DashboardStatistics {
        total_population: official_population.unwrap_or(summed_population),
        official_population: official_population.is_some(),
        total_pharmacies: records
            .iter()
            .fold(0u64, |acc, r| acc.saturating_add(r.existing_facilities)),
        total_hospitals: records
            .iter()
            .fold(0u64, |acc, r| acc.saturating_add(r.hospitals)),
        reported_deficit_areas: records.iter().filter(|r| r.reported_deficit > 0).count(),
        underserved_areas: records
            .iter()
            .filter(|r| {
                is_underserved(
                    derive_metrics(r.population, r.existing_facilities),
                    r.existing_facilities,
                )
            })
            .count(),
        total_districts: records.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranking::rank_areas;

    fn record(population: u64, pharmacies: u64, hospitals: u64, reported: i64) -> AreaRecord {
        AreaRecord {
            hospitals,
            reported_deficit: reported,
            ..AreaRecord::new("area", population, pharmacies)
        }
    }

    #[test]
    fn sums_population_and_facilities() {
        let records = vec![record(10_000, 1, 0, 0), record(25_000, 2, 1, 1)];
        let stats = compute_statistics(&records, None);

        assert_eq!(stats.total_population, 35_000);
        assert!(!stats.official_population);
        assert_eq!(stats.total_pharmacies, 3);
        assert_eq!(stats.total_hospitals, 1);
        assert_eq!(stats.total_districts, 2);
    }

    #[test]
    fn official_population_replaces_sum() {
        let records = vec![record(10_000, 1, 0, 0)];
        let stats = compute_statistics(&records, Some(1_477_861));

        assert_eq!(stats.total_population, 1_477_861);
        assert!(stats.official_population);
    }

    #[test]
    fn reported_deficit_count_differs_from_underserved_count() {
        // No pharmacy and a reported deficit of 0: underserved, but not
        // counted as a reported-deficit area.
        let records = vec![
            record(500, 0, 0, 0),
            record(100_000, 10, 0, 2),
            record(83_330, 10, 0, -1),
        ];
        let stats = compute_statistics(&records, None);

        assert_eq!(stats.reported_deficit_areas, 1);
        assert_eq!(stats.underserved_areas, 2);
        assert_eq!(stats.underserved_areas, rank_areas(&records).underserved_count());
    }

    #[test]
    fn empty_dataset() {
        let stats = compute_statistics(&[], None);
        assert_eq!(stats.total_population, 0);
        assert_eq!(stats.total_districts, 0);
        assert_eq!(stats.underserved_areas, 0);
    }
}

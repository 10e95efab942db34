//! Single-area detail view (the map popup).
//!
//! Runs on one record at a time, independently of any ranking pass, but
//! through the same [`derive_metrics`] as the ranking.

use pharmacy_gap_area_models::{AreaMetrics, AreaRecord, MarketStatus};

use crate::metrics::{derive_metrics, is_underserved};

/// Derived figures for one area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AreaDetail<'a> {
    /// The source record.
    pub record: &'a AreaRecord,
    /// Ideal facility count and (overridden) deficit.
    pub metrics: AreaMetrics,
    /// Pharmacies the area needs, shown as "ideal need". At least `1`
    /// when the area has no pharmacy.
    pub needed_facilities: u64,
    /// Whether the area is a potential market.
    pub is_potential: bool,
}

impl AreaDetail<'_> {
    /// Market status label for this area.
    #[must_use]
    pub const fn status(&self) -> MarketStatus {
        MarketStatus::from_underserved(self.is_potential)
    }
}

/// Computes the detail view for one area.
#[must_use]
pub fn area_detail(record: &AreaRecord) -> AreaDetail<'_> {
    let metrics = derive_metrics(record.population, record.existing_facilities);
    let floor = u64::from(record.has_no_facility());

    AreaDetail {
        record,
        metrics,
        needed_facilities: metrics.ideal_facility_count.max(floor),
        is_potential: is_underserved(metrics, record.existing_facilities),
    }
}

/// Finds an area by its displayed name, ignoring case and surrounding
/// whitespace. Unnamed areas answer to
/// [`UNKNOWN_AREA_NAME`](pharmacy_gap_area_models::UNKNOWN_AREA_NAME).
///
/// Returns the first match when names repeat.
#[must_use]
pub fn find_area<'a>(records: &'a [AreaRecord], name: &str) -> Option<&'a AreaRecord> {
    let wanted = name.trim();
    records
        .iter()
        .find(|record| record.display_name().trim().eq_ignore_ascii_case(wanted))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranking::rank_areas;

    #[test]
    fn detail_agrees_with_ranking() {
        let records: Vec<AreaRecord> = (0..120u64)
            .map(|i| AreaRecord::new(format!("area-{i}"), i * 1_379, i % 7))
            .collect();
        let ranking = rank_areas(&records);

        for ranked in ranking.derived() {
            let detail = area_detail(ranked.record);
            assert_eq!(detail.metrics, ranked.metrics, "area {}", ranked.record.name);
            assert_eq!(detail.is_potential, ranked.is_underserved);
            assert_eq!(detail.status(), ranked.status());
        }
    }

    #[test]
    fn facility_less_area_needs_at_least_one() {
        let record = AreaRecord::new("Kodingareng", 500, 0);
        let detail = area_detail(&record);

        assert_eq!(detail.metrics.ideal_facility_count, 0);
        assert_eq!(detail.needed_facilities, 1);
        assert_eq!(detail.metrics.deficit, 1);
        assert!(detail.is_potential);
    }

    #[test]
    fn served_area_shows_raw_need() {
        let record = AreaRecord::new("Pisang Utara", 83_330, 10);
        let detail = area_detail(&record);

        assert_eq!(detail.needed_facilities, 10);
        assert_eq!(detail.metrics.deficit, 0);
        assert!(!detail.is_potential);
        assert_eq!(detail.status(), MarketStatus::Saturated);
    }

    #[test]
    fn finds_area_case_insensitively() {
        let records = vec![
            AreaRecord::new("Bara-Baraya", 10_000, 1),
            AreaRecord::new("Maccini", 20_000, 2),
            AreaRecord::new("maccini", 1, 0),
        ];

        assert_eq!(find_area(&records, " MACCINI ").map(|r| r.population), Some(20_000));
        assert!(find_area(&records, "Tamalate").is_none());
    }

    #[test]
    fn unnamed_areas_are_found_by_their_displayed_name() {
        let records = vec![
            AreaRecord::new("Bara-Baraya", 10_000, 1),
            AreaRecord::new("", 2_000, 0),
        ];

        let found = find_area(&records, "Unknown").unwrap();
        assert_eq!(found.population, 2_000);
        assert_eq!(found.display_name(), pharmacy_gap_area_models::UNKNOWN_AREA_NAME);
        assert_eq!(find_area(&records, " unknown ").map(|r| r.population), Some(2_000));
        assert!(find_area(&records, "").is_none());
    }
}

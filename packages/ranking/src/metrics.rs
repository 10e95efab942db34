//! Ideal facility count and deficit derivation.

use pharmacy_gap_area_models::AreaMetrics;

/// Residents served by one pharmacy. Anchors the deficit definition.
pub const POPULATION_PER_FACILITY: u64 = 8_333;

/// `round(population / 8333)`, rounding halves up.
///
/// Computed in integer arithmetic as `floor((2p + r) / 2r)`.
#[must_use]
pub fn ideal_facility_count(population: u64) -> u64 {
    let population = u128::from(population);
    let ratio = u128::from(POPULATION_PER_FACILITY);
    let rounded = (2 * population + ratio) / (2 * ratio);
    u64::try_from(rounded).unwrap_or(u64::MAX)
}

/// Derives the ideal facility count and deficit for an area.
///
/// An area with no pharmacy whose population rounds to an ideal count of
/// zero still gets a deficit of `1`.
#[must_use]
pub fn derive_metrics(population: u64, existing_facilities: u64) -> AreaMetrics {
    let ideal_facility_count = ideal_facility_count(population);

    let deficit = if existing_facilities == 0 && ideal_facility_count == 0 {
        1
    } else {
        saturating_i64(ideal_facility_count).saturating_sub(saturating_i64(existing_facilities))
    };

    AreaMetrics {
        ideal_facility_count,
        deficit,
    }
}

/// `deficit > 0 || existing_facilities == 0`.
#[must_use]
pub const fn is_underserved(metrics: AreaMetrics, existing_facilities: u64) -> bool {
    metrics.deficit > 0 || existing_facilities == 0
}

fn saturating_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

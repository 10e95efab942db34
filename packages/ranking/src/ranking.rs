//! Underserved-area ranking.
//!
//! Every record is derived independently; the only cross-record step is
//! the final sort. Ties in priority score keep their input order (the
//! sort is stable and there is no secondary key).

use pharmacy_gap_area_models::{AreaMetrics, AreaRecord, MarketStatus};

use crate::metrics::{derive_metrics, is_underserved};
use crate::scoring::ScoringWeights;

/// Number of areas shown in the recommendations table.
pub const DEFAULT_TOP_K: usize = 10;

/// An area together with everything derived from it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedArea<'a> {
    /// The source record.
    pub record: &'a AreaRecord,
    /// Index of the record in the input sequence.
    pub position: usize,
    /// Ideal facility count and (overridden) deficit.
    pub metrics: AreaMetrics,
    /// Weighted priority score.
    pub priority_score: f64,
    /// `deficit > 0 || existing_facilities == 0`.
    pub is_underserved: bool,
}

impl<'a> RankedArea<'a> {
    /// Derives a single record.
    #[must_use]
    pub fn derive(record: &'a AreaRecord, position: usize, weights: &ScoringWeights) -> Self {
        let metrics = derive_metrics(record.population, record.existing_facilities);
        let priority_score =
            weights.priority_score(record.population, record.existing_facilities, metrics.deficit);

        Self {
            record,
            position,
            metrics,
            priority_score,
            is_underserved: is_underserved(metrics, record.existing_facilities),
        }
    }

    /// Market status label for this area.
    #[must_use]
    pub const fn status(&self) -> MarketStatus {
        MarketStatus::from_underserved(self.is_underserved)
    }
}

/// Result of a ranking pass.
#[derive(Debug, Clone)]
pub struct Ranking<'a> {
    derived: Vec<RankedArea<'a>>,
    /// Indices into `derived` of underserved areas, best first.
    order: Vec<usize>,
}

impl<'a> Ranking<'a> {
    /// Every derived area in input order, underserved or not.
    #[must_use]
    pub fn derived(&self) -> &[RankedArea<'a>] {
        &self.derived
    }

    /// Underserved areas sorted by descending priority score.
    pub fn underserved(&self) -> impl ExactSizeIterator<Item = &RankedArea<'a>> + '_ {
        self.order.iter().map(|&idx| &self.derived[idx])
    }

    /// Number of underserved areas.
    #[must_use]
    pub fn underserved_count(&self) -> usize {
        self.order.len()
    }

    /// The first `k` underserved areas (all of them if fewer qualify).
    #[must_use]
    pub fn top(&self, k: usize) -> Vec<RankedArea<'a>> {
        self.underserved().take(k).copied().collect()
    }

    /// 1-based rank of the record at input `position`, `None` if it is not
    /// underserved.
    #[must_use]
    pub fn rank_of(&self, position: usize) -> Option<usize> {
        self.order
            .iter()
            .position(|&idx| self.derived[idx].position == position)
            .map(|idx| idx + 1)
    }
}

/// Ranks areas with the default weights.
#[must_use]
pub fn rank_areas(records: &[AreaRecord]) -> Ranking<'_> {
    rank_areas_with(records, &ScoringWeights::default())
}

/// Ranks areas with custom weights.
#[must_use]
pub fn rank_areas_with<'a>(records: &'a [AreaRecord], weights: &ScoringWeights) -> Ranking<'a> {
    let derived: Vec<RankedArea<'a>> = records
        .iter()
        .enumerate()
        .map(|(position, record)| RankedArea::derive(record, position, weights))
        .collect();

    let mut order: Vec<usize> = derived
        .iter()
        .enumerate()
        .filter(|(_, area)| area.is_underserved)
        .map(|(idx, _)| idx)
        .collect();

    // `sort_by` is stable: equal scores keep input order.
    order.sort_by(|&a, &b| {
        derived[b]
            .priority_score
            .total_cmp(&derived[a].priority_score)
    });

    log::debug!(
        "Ranked {} areas: {} underserved",
        derived.len(),
        order.len()
    );

    Ranking { derived, order }
}

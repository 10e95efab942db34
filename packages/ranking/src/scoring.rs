//! Priority score weighting.

/// Weights of the priority score.
///
/// `score = deficit * deficit_weight
///        + (population / population_unit) * population_weight
///        + bonus`
///
/// where `bonus = no_facility_weight * no_facility_scale` for areas with
/// no pharmacy and more than `no_facility_min_population` residents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    /// Weight of the deficit term.
    pub deficit_weight: f64,
    /// Weight of the normalized population term.
    pub population_weight: f64,
    /// Population is divided by this before weighting.
    pub population_unit: f64,
    /// Weight of the no-pharmacy bonus.
    pub no_facility_weight: f64,
    /// Scale applied to the bonus weight, so the bonus is worth about one
    /// deficit unit rather than a fraction.
    pub no_facility_scale: f64,
    /// Population an area must exceed to earn the no-pharmacy bonus.
    pub no_facility_min_population: u64,
}

/// Default weight of the deficit term.
pub const DEFICIT_WEIGHT: f64 = 0.7;
/// Default weight of the population term.
pub const POPULATION_WEIGHT: f64 = 0.2;
/// Default population normalization unit.
pub const POPULATION_UNIT: f64 = 10_000.0;
/// Default weight of the no-pharmacy bonus.
pub const NO_FACILITY_WEIGHT: f64 = 0.1;
/// Default scale of the no-pharmacy bonus.
pub const NO_FACILITY_SCALE: f64 = 10.0;
/// Default population threshold for the no-pharmacy bonus.
pub const NO_FACILITY_MIN_POPULATION: u64 = 1_000;

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            deficit_weight: DEFICIT_WEIGHT,
            population_weight: POPULATION_WEIGHT,
            population_unit: POPULATION_UNIT,
            no_facility_weight: NO_FACILITY_WEIGHT,
            no_facility_scale: NO_FACILITY_SCALE,
            no_facility_min_population: NO_FACILITY_MIN_POPULATION,
        }
    }
}

impl ScoringWeights {
    /// The no-pharmacy bonus an area earns, `0.0` if it does not qualify.
    #[must_use]
    pub fn no_facility_bonus(&self, population: u64, existing_facilities: u64) -> f64 {
        if existing_facilities == 0 && population > self.no_facility_min_population {
            self.no_facility_weight * self.no_facility_scale
        } else {
            0.0
        }
    }

    /// Computes the priority score of an area from its (overridden)
    /// deficit.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn priority_score(&self, population: u64, existing_facilities: u64, deficit: i64) -> f64 {
        let deficit_term = deficit as f64 * self.deficit_weight;
        let population_term = (population as f64 / self.population_unit) * self.population_weight;
        let bonus = self.no_facility_bonus(population, existing_facilities);

        deficit_term + population_term + bonus
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn bonus_is_one_deficit_unit() {
        let weights = ScoringWeights::default();
        assert!((weights.no_facility_bonus(2_000, 0) - 1.0).abs() < EPSILON);
    }

    #[test]
    fn bonus_requires_population_above_threshold() {
        let weights = ScoringWeights::default();
        assert!(weights.no_facility_bonus(1_000, 0).abs() < EPSILON);
        assert!((weights.no_facility_bonus(1_001, 0) - 1.0).abs() < EPSILON);
        assert!(weights.no_facility_bonus(50_000, 1).abs() < EPSILON);
    }

    #[test]
    fn score_combines_all_terms() {
        let weights = ScoringWeights::default();
        assert!((weights.priority_score(100_000, 10, 2) - 3.4).abs() < EPSILON);
        assert!((weights.priority_score(500, 0, 1) - 0.71).abs() < EPSILON);
        assert!((weights.priority_score(2_000, 0, 1) - 1.74).abs() < EPSILON);
    }

    #[test]
    fn custom_weights_change_only_their_term() {
        let weights = ScoringWeights {
            population_weight: 0.0,
            ..ScoringWeights::default()
        };
        assert!((weights.priority_score(100_000, 10, 2) - 1.4).abs() < EPSILON);
    }
}

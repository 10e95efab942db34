#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Administrative area types shared across the pharmacy-gap workspace.
//!
//! An [`AreaRecord`] is one kelurah (administrative area) as read from the
//! area `GeoJSON` layer. Everything derived from it (ideal facility count,
//! deficit, priority score) is computed by the ranking crate and never
//! stored back on the record.

use geojson::Geometry;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Display name used when an area has no name property.
pub const UNKNOWN_AREA_NAME: &str = "Unknown";

/// One administrative area with its raw attributes.
///
/// Numeric fields have already been coerced by the data source: anything
/// missing or malformed is `0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaRecord {
    /// Area display name (empty if the source had none).
    pub name: String,
    /// Resident population.
    pub population: u64,
    /// Number of pharmacies already operating in the area.
    pub existing_facilities: u64,
    /// Number of hospitals in the area.
    pub hospitals: u64,
    /// Deficit as pre-computed in the source dataset. Kept verbatim (no
    /// zero-facility override) and only used for statistics.
    pub reported_deficit: i64,
    /// Population density in residents per km².
    pub density: f64,
    /// Area boundary. Never inspected by the ranking engine.
    pub geometry: Option<Geometry>,
}

impl AreaRecord {
    /// Creates a record with only the fields the ranking engine reads.
    #[must_use]
    pub fn new(name: impl Into<String>, population: u64, existing_facilities: u64) -> Self {
        Self {
            name: name.into(),
            population,
            existing_facilities,
            hospitals: 0,
            reported_deficit: 0,
            density: 0.0,
            geometry: None,
        }
    }

    /// Returns the name to show to users, falling back to
    /// [`UNKNOWN_AREA_NAME`] for unnamed areas.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            UNKNOWN_AREA_NAME
        } else {
            &self.name
        }
    }

    /// Whether the area has no pharmacy at all.
    #[must_use]
    pub const fn has_no_facility(&self) -> bool {
        self.existing_facilities == 0
    }
}

/// Facility need derived from population and existing provision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaMetrics {
    /// `round(population / 8333)`.
    pub ideal_facility_count: u64,
    /// Ideal minus existing facilities, floored to `1` for areas with no
    /// facility whose ideal count rounds to zero.
    pub deficit: i64,
}

/// Where the map should fly to show an area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaFocus {
    /// Center of the bounding box as `[lng, lat]`.
    pub center: [f64; 2],
    /// Bounding box as `[west, south, east, north]`.
    pub bounds: [f64; 4],
}

/// Market status label shown for an area.
///
/// A pure function of whether the area is underserved.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum MarketStatus {
    /// The area needs more pharmacies.
    Potential,
    /// Existing pharmacies cover the area's need.
    Saturated,
}

impl MarketStatus {
    /// Maps the underserved flag to its status.
    #[must_use]
    pub const fn from_underserved(is_underserved: bool) -> Self {
        if is_underserved {
            Self::Potential
        } else {
            Self::Saturated
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Potential => "Potential market",
            Self::Saturated => "Saturated market",
        }
    }
}

/// Population density class used for the choropleth layer.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum DensityClass {
    /// 2,000/km² or less.
    Sparse,
    /// Above 2,000 up to 4,000.
    Low,
    /// Above 4,000 up to 6,000.
    Modest,
    /// Above 6,000 up to 8,000.
    Moderate,
    /// Above 8,000 up to 10,000.
    Elevated,
    /// Above 10,000 up to 12,000.
    High,
    /// Above 12,000 up to 15,000.
    VeryHigh,
    /// Above 15,000.
    Extreme,
}

impl DensityClass {
    /// All classes from densest to sparsest, in legend order.
    pub const ALL: &[Self] = &[
        Self::Extreme,
        Self::VeryHigh,
        Self::High,
        Self::Elevated,
        Self::Moderate,
        Self::Modest,
        Self::Low,
        Self::Sparse,
    ];

    /// Classifies a density. Thresholds are exclusive lower bounds.
    #[must_use]
    pub fn for_density(density: f64) -> Self {
        Self::ALL
            .iter()
            .copied()
            .find(|class| class.lower_bound().is_some_and(|bound| density > bound))
            .unwrap_or(Self::Sparse)
    }

    /// Exclusive lower bound of the class, `None` for [`Self::Sparse`].
    #[must_use]
    pub const fn lower_bound(self) -> Option<f64> {
        match self {
            Self::Sparse => None,
            Self::Low => Some(2_000.0),
            Self::Modest => Some(4_000.0),
            Self::Moderate => Some(6_000.0),
            Self::Elevated => Some(8_000.0),
            Self::High => Some(10_000.0),
            Self::VeryHigh => Some(12_000.0),
            Self::Extreme => Some(15_000.0),
        }
    }

    /// Fill colour for the class.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Extreme => "#800026",
            Self::VeryHigh => "#BD0026",
            Self::High => "#E31A1C",
            Self::Elevated => "#FC4E2A",
            Self::Moderate => "#FD8D3C",
            Self::Modest => "#FEB24C",
            Self::Low => "#FED976",
            Self::Sparse => "#FFEDA0",
        }
    }

    /// Legend label for the class.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Extreme => "> 15,000/km²",
            Self::VeryHigh => "12,000 - 15,000",
            Self::High => "10,000 - 12,000",
            Self::Elevated => "8,000 - 10,000",
            Self::Moderate => "6,000 - 8,000",
            Self::Modest => "4,000 - 6,000",
            Self::Low => "2,000 - 4,000",
            Self::Sparse => "< 2,000",
        }
    }
}

/// City-wide summary figures shown above the map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStatistics {
    /// Total population (summed, or the configured official figure).
    pub total_population: u64,
    /// Whether `total_population` came from the configured official figure.
    pub official_population: bool,
    /// Total pharmacies across all areas.
    pub total_pharmacies: u64,
    /// Total hospitals across all areas.
    pub total_hospitals: u64,
    /// Areas whose dataset-reported deficit is positive.
    pub reported_deficit_areas: usize,
    /// Areas the ranking engine flags as underserved. Usually larger than
    /// `reported_deficit_areas` because it also counts every area without
    /// a pharmacy.
    pub underserved_areas: usize,
    /// Number of administrative areas in the dataset.
    pub total_districts: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_falls_back_for_blank_names() {
        assert_eq!(AreaRecord::new("", 0, 0).display_name(), UNKNOWN_AREA_NAME);
        assert_eq!(AreaRecord::new("   ", 0, 0).display_name(), UNKNOWN_AREA_NAME);
        assert_eq!(AreaRecord::new("Bara-Baraya", 0, 0).display_name(), "Bara-Baraya");
    }

    #[test]
    fn market_status_follows_underserved_flag() {
        assert_eq!(MarketStatus::from_underserved(true), MarketStatus::Potential);
        assert_eq!(MarketStatus::from_underserved(false), MarketStatus::Saturated);
        assert_eq!(MarketStatus::Potential.to_string(), "POTENTIAL");
        assert_eq!("SATURATED".parse::<MarketStatus>().unwrap(), MarketStatus::Saturated);
    }

    #[test]
    fn density_thresholds_are_exclusive() {
        assert_eq!(DensityClass::for_density(15_000.0), DensityClass::VeryHigh);
        assert_eq!(DensityClass::for_density(15_000.1), DensityClass::Extreme);
        assert_eq!(DensityClass::for_density(2_000.0), DensityClass::Sparse);
        assert_eq!(DensityClass::for_density(2_000.5), DensityClass::Low);
        assert_eq!(DensityClass::for_density(0.0), DensityClass::Sparse);
        assert_eq!(DensityClass::for_density(-5.0), DensityClass::Sparse);
        assert_eq!(DensityClass::for_density(9_000.0), DensityClass::Elevated);
    }

    #[test]
    fn density_classes_parse_from_their_names() {
        for &class in DensityClass::ALL {
            assert_eq!(class.as_ref().parse::<DensityClass>().unwrap(), class);
        }
        assert_eq!("VERY_HIGH".parse::<DensityClass>().unwrap(), DensityClass::VeryHigh);
        assert_eq!(
            "crowded".parse::<DensityClass>(),
            Err(strum::ParseError::VariantNotFound)
        );
    }

    #[test]
    fn legend_is_ordered_densest_first() {
        let bounds: Vec<f64> = DensityClass::ALL
            .iter()
            .filter_map(|class| class.lower_bound())
            .collect();
        assert!(
            bounds.windows(2).all(|pair| pair[0] > pair[1]),
            "legend bounds not strictly descending: {bounds:?}"
        );
        assert_eq!(DensityClass::ALL.last(), Some(&DensityClass::Sparse));
    }

    #[test]
    fn area_record_serializes_camel_case() {
        let json = serde_json::to_value(AreaRecord::new("Maccini", 12_000, 3)).unwrap();
        assert_eq!(json["existingFacilities"], 3);
        assert_eq!(json["reportedDeficit"], 0);
        assert!(json["geometry"].is_null());
    }
}

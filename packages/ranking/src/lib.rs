#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Scoring and ranking engine for underserved areas.
//!
//! Everything in this crate is pure and synchronous. The same
//! [`metrics::derive_metrics`] function backs both the ranked table
//! ([`ranking::rank_areas`]) and the single-area detail view
//! ([`detail::area_detail`]), so the two can never disagree on an area's
//! ideal facility count or deficit.

pub mod detail;
pub mod diagnostics;
pub mod metrics;
pub mod ranking;
pub mod scoring;
pub mod statistics;

pub use detail::{AreaDetail, area_detail, find_area};
pub use metrics::{POPULATION_PER_FACILITY, derive_metrics, ideal_facility_count, is_underserved};
pub use ranking::{DEFAULT_TOP_K, RankedArea, Ranking, rank_areas, rank_areas_with};
pub use scoring::ScoringWeights;
pub use statistics::compute_statistics;

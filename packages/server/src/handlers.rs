//! HTTP handler functions for the pharmacy gap API.

use actix_web::{HttpResponse, web};
use pharmacy_gap_area_models::{AreaFocus, AreaRecord, DensityClass};
use pharmacy_gap_dataset::DatasetError;
use pharmacy_gap_ranking::diagnostics::no_facility_placements;
use pharmacy_gap_ranking::{DEFAULT_TOP_K, area_detail, compute_statistics, find_area, rank_areas};
use pharmacy_gap_server_models::{
    ApiArea, ApiAreaDetail, ApiError, ApiFacility, ApiHealth, ApiLayerManifest, ApiLegendEntry,
    ApiNoFacilityPlacement, ApiRecommendation, PointQuery, RecommendationParams,
};
use pharmacy_gap_spatial::focus_of;

use crate::AppState;

/// Resolves the loaded dashboard or returns the `503` response.
macro_rules! ready_or_unavailable {
    ($state:expr) => {
        match $state.dashboard.ready() {
            Ok(dashboard) => dashboard,
            Err(reason) => return unavailable(reason),
        }
    };
}

/// `GET /api/health`
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    let loaded = state.dashboard.ready().ok();

    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        data_ready: loaded.is_some(),
        loaded_at: loaded.map(|dashboard| dashboard.loaded_at),
    })
}

/// `GET /api/statistics`
pub async fn statistics(state: web::Data<AppState>) -> HttpResponse {
    let dashboard = ready_or_unavailable!(state);

    HttpResponse::Ok().json(compute_statistics(
        &dashboard.records,
        dashboard.config().official_population,
    ))
}

/// `GET /api/recommendations`
///
/// Returns the top underserved areas, highest priority first.
pub async fn recommendations(
    state: web::Data<AppState>,
    params: web::Query<RecommendationParams>,
) -> HttpResponse {
    let dashboard = ready_or_unavailable!(state);
    let limit = params.limit.unwrap_or(DEFAULT_TOP_K);

    let ranking = rank_areas(&dashboard.records);
    let rows: Vec<ApiRecommendation> = ranking
        .top(limit)
        .iter()
        .enumerate()
        .map(|(i, area)| ApiRecommendation::new(i + 1, area, focus(area.record)))
        .collect();

    HttpResponse::Ok().json(rows)
}

/// `GET /api/areas`
///
/// Returns every area with its derived fields, in layer order.
pub async fn areas(state: web::Data<AppState>) -> HttpResponse {
    let dashboard = ready_or_unavailable!(state);

    let ranking = rank_areas(&dashboard.records);
    let rows: Vec<ApiArea> = ranking
        .derived()
        .iter()
        .map(|area| ApiArea::new(area, ranking.rank_of(area.position)))
        .collect();

    HttpResponse::Ok().json(rows)
}

/// `GET /api/areas/at`
///
/// Returns the detail of the area containing a point.
pub async fn area_at(state: web::Data<AppState>, query: web::Query<PointQuery>) -> HttpResponse {
    let dashboard = ready_or_unavailable!(state);

    match dashboard
        .index
        .lookup(query.lng, query.lat)
        .and_then(|idx| dashboard.records.get(idx))
    {
        Some(record) => detail_response(record),
        None => not_found(format!("No area contains ({}, {})", query.lng, query.lat)),
    }
}

/// `GET /api/areas/{name}`
pub async fn area_by_name(state: web::Data<AppState>, name: web::Path<String>) -> HttpResponse {
    let dashboard = ready_or_unavailable!(state);

    match find_area(&dashboard.records, &name) {
        Some(record) => detail_response(record),
        None => not_found(format!("Unknown area: {name}")),
    }
}

/// `GET /api/diagnostics/no-facility`
///
/// Reports where every area without a pharmacy landed in the ranking.
pub async fn no_facility_diagnostics(state: web::Data<AppState>) -> HttpResponse {
    let dashboard = ready_or_unavailable!(state);

    let ranking = rank_areas(&dashboard.records);
    let placements: Vec<ApiNoFacilityPlacement> = no_facility_placements(&ranking, DEFAULT_TOP_K)
        .into_iter()
        .map(ApiNoFacilityPlacement::from)
        .collect();

    HttpResponse::Ok().json(placements)
}

/// `GET /api/layers`
pub async fn layers(state: web::Data<AppState>) -> HttpResponse {
    let dashboard = ready_or_unavailable!(state);
    let config = dashboard.config();

    HttpResponse::Ok().json(ApiLayerManifest::new(
        &config.city,
        config.view,
        &dashboard.probes,
    ))
}

/// `GET /api/layers/{id}`
///
/// Returns the raw `GeoJSON` `FeatureCollection` of a layer.
pub async fn layer(state: web::Data<AppState>, id: web::Path<String>) -> HttpResponse {
    let dashboard = ready_or_unavailable!(state);

    match dashboard.source.load_layer(&id).await {
        Ok(collection) => HttpResponse::Ok().json(collection),
        Err(e) => layer_error(&id, &e),
    }
}

/// `GET /api/facilities/{id}`
///
/// Returns the labelled markers of a points layer.
pub async fn facilities(state: web::Data<AppState>, id: web::Path<String>) -> HttpResponse {
    let dashboard = ready_or_unavailable!(state);

    match dashboard.source.load_facilities(&id).await {
        Ok(points) => {
            let points: Vec<ApiFacility> = points.into_iter().map(ApiFacility::from).collect();
            HttpResponse::Ok().json(points)
        }
        Err(e) => layer_error(&id, &e),
    }
}

/// `GET /api/legend`
///
/// Returns the density choropleth classes, densest first.
pub async fn legend() -> HttpResponse {
    let entries: Vec<ApiLegendEntry> = DensityClass::ALL
        .iter()
        .copied()
        .map(ApiLegendEntry::from)
        .collect();

    HttpResponse::Ok().json(entries)
}

fn focus(record: &AreaRecord) -> Option<AreaFocus> {
    record.geometry.as_ref().and_then(focus_of)
}

fn detail_response(record: &AreaRecord) -> HttpResponse {
    let detail = area_detail(record);
    HttpResponse::Ok().json(ApiAreaDetail::new(&detail, focus(record)))
}

fn layer_error(id: &str, e: &DatasetError) -> HttpResponse {
    if let DatasetError::UnknownLayer(_) = e {
        return not_found(format!("Unknown layer: {id}"));
    }

    log::error!("Failed to load layer {id}: {e}");
    HttpResponse::InternalServerError().json(ApiError {
        error: format!("Failed to load layer {id}"),
        reason: Some(e.to_string()),
    })
}

fn not_found(error: String) -> HttpResponse {
    HttpResponse::NotFound().json(ApiError {
        error,
        reason: None,
    })
}

fn unavailable(reason: &str) -> HttpResponse {
    HttpResponse::ServiceUnavailable().json(ApiError {
        error: "Area data unavailable".to_string(),
        reason: Some(reason.to_string()),
    })
}

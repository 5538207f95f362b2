use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::{
    TourMapError, category,
    models::{Coordinates, ProximityQuery, Region, RegionQuery, Selection},
    service::{ExploreRequest, ExploreView, HotelListing, NearbyRequest, NearbyView, TourService},
};

pub type SharedService = Arc<TourService>;

#[derive(Serialize, Deserialize)]
pub struct ApiRegion {
    pub code: u32,
    pub name: String,
}

#[derive(Serialize, Deserialize)]
pub struct ApiCategory {
    pub code: u32,
    pub display_name: String,
    pub color: String,
    pub icon: String,
}

#[derive(Debug, Deserialize)]
pub struct HotelsParams {
    pub radius: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct NearbyParams {
    pub lat: f64,
    pub lng: f64,
    pub radius: Option<u32>,
    pub category: Option<String>,
    pub selected: Option<String>,
    pub limit: Option<usize>,
    /// Catalog id to leave out, usually the hotel at the center
    pub exclude: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ExploreParams {
    pub region: Option<u32>,
    pub hotel: Option<String>,
    pub radius: Option<u32>,
    pub category: Option<String>,
    pub selected: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// [`TourMapError`] rendered as a JSON error response
pub struct ApiError(TourMapError);

impl From<TourMapError> for ApiError {
    fn from(error: TourMapError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            TourMapError::Validation { .. } => StatusCode::BAD_REQUEST,
            TourMapError::Fetch(_) => StatusCode::BAD_GATEWAY,
            TourMapError::Config { .. } | TourMapError::Schema(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        if self.0.is_fatal() {
            error!("Request failed: {}", self.0);
        } else if status.is_server_error() {
            warn!("Request failed: {}", self.0);
        }
        let body = ErrorBody {
            error: self.0.user_message(),
        };
        (status, Json(body)).into_response()
    }
}

pub fn router(service: SharedService) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/regions", get(get_regions))
        .route("/categories", get(get_categories))
        .route("/regions/{code}/hotels", get(get_hotels))
        .route("/nearby", get(get_nearby))
        .route("/explore", get(get_explore))
        .with_state(service)
}

async fn health() -> &'static str {
    "ok"
}

async fn get_regions() -> Json<Vec<ApiRegion>> {
    let regions = Region::ALL
        .iter()
        .map(|region| ApiRegion {
            code: region.code(),
            name: region.name().to_string(),
        })
        .collect();
    Json(regions)
}

async fn get_categories() -> Json<Vec<ApiCategory>> {
    let categories = category::categories()
        .map(|(code, style)| ApiCategory {
            code,
            display_name: style.display_name.to_string(),
            color: style.color.to_string(),
            icon: style.icon.to_string(),
        })
        .collect();
    Json(categories)
}

async fn get_hotels(
    State(service): State<SharedService>,
    Path(code): Path<u32>,
    Query(params): Query<HotelsParams>,
) -> Result<Json<HotelListing>, ApiError> {
    let mut query = RegionQuery::new(Region::try_from(code)?);
    if let Some(radius) = params.radius {
        query = query.with_radius(radius)?;
    }
    Ok(Json(service.hotels(&query).await))
}

async fn get_nearby(
    State(service): State<SharedService>,
    Query(params): Query<NearbyParams>,
) -> Result<Json<NearbyView>, ApiError> {
    let radius = params
        .radius
        .unwrap_or(service.defaults().radius_meters);
    let proximity = ProximityQuery::new(Coordinates::new(params.lat, params.lng), radius)?;

    let request = NearbyRequest {
        proximity,
        selection: Selection::from_ui(params.category.as_deref(), params.selected.as_deref()),
        limit: params.limit,
        exclude_id: params.exclude.filter(|id| !id.trim().is_empty()),
    };
    Ok(Json(service.nearby(&request).await))
}

async fn get_explore(
    State(service): State<SharedService>,
    Query(params): Query<ExploreParams>,
) -> Result<Json<ExploreView>, ApiError> {
    let code = params.region.unwrap_or(service.defaults().region_code);
    let mut region = RegionQuery::new(Region::try_from(code)?);
    if let Some(radius) = params.radius {
        region = region.with_radius(radius)?;
    }

    let request = ExploreRequest {
        region,
        hotel: params.hotel.filter(|hotel| !hotel.trim().is_empty()),
        selection: Selection::from_ui(params.category.as_deref(), params.selected.as_deref()),
        limit: params.limit,
    };
    Ok(Json(service.explore(&request).await?))
}

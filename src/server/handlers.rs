use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, MutexGuard};
use std::time::Instant;
use tracing::info;

use crate::catalog::{rank, Location};
use crate::format::{format_distance, format_stars, SauceVerdict};
use crate::leaderboard::{top_n, DEFAULT_TOP_N};
use crate::position;
use crate::ratings::{NewRating, Rating, RatingError, RatingStore};

use super::state::AppState;

// ─── Error response ──────────────────────────────────────────────

#[derive(Serialize)]
struct ApiErrorBody {
    error: String,
    code: u16,
}

#[derive(Debug)]
pub struct ApiError(StatusCode, String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: self.1,
            code: self.0.as_u16(),
        };
        (self.0, Json(body)).into_response()
    }
}

impl From<RatingError> for ApiError {
    fn from(e: RatingError) -> Self {
        let status = match &e {
            RatingError::UnknownLocation(_) => StatusCode::NOT_FOUND,
            RatingError::OutOfRange { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            RatingError::ExternalReadFailure(_) | RatingError::ExternalWriteFailure(_) => {
                StatusCode::BAD_GATEWAY
            }
        };
        ApiError(status, e.to_string())
    }
}

fn api_error(status: StatusCode, msg: impl Into<String>) -> ApiError {
    ApiError(status, msg.into())
}

fn lock_store(state: &AppState) -> Result<MutexGuard<'_, RatingStore>, ApiError> {
    state
        .store
        .lock()
        .map_err(|_| api_error(StatusCode::INTERNAL_SERVER_ERROR, "rating store unavailable"))
}

/// Runs `f` against the locked store on the blocking pool. A slow backend
/// write holds the lock, so waiting for it must never park a runtime worker.
async fn with_store<T, F>(state: &Arc<AppState>, f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&AppState, &mut RatingStore) -> Result<T, ApiError> + Send + 'static,
{
    let worker = Arc::clone(state);
    tokio::task::spawn_blocking(move || {
        let mut store = lock_store(&worker)?;
        f(&*worker, &mut *store)
    })
    .await
    .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

// ─── Views ───────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct RatingView {
    #[serde(flatten)]
    pub rating: Rating,
    pub sauce_verdict: SauceVerdict,
}

impl From<Rating> for RatingView {
    fn from(rating: Rating) -> Self {
        let sauce_verdict = SauceVerdict::from_level(rating.sauce_level);
        Self { rating, sauce_verdict }
    }
}

// ─── GET /api/stores ─────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct StoresQuery {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StoreSummary {
    #[serde(flatten)]
    pub location: Location,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_label: Option<String>,
    pub average_stars: Option<f64>,
    pub rating_count: usize,
}

pub async fn stores(
    State(state): State<Arc<AppState>>,
    Query(params): Query<StoresQuery>,
) -> Result<Json<Vec<StoreSummary>>, ApiError> {
    let start = Instant::now();

    if params.lat.is_some() != params.lon.is_some() {
        return Err(api_error(StatusCode::BAD_REQUEST, "Provide both 'lat' and 'lon', or neither"));
    }
    if let (Some(lat), Some(lon)) = (params.lat, params.lon) {
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return Err(api_error(
                StatusCode::BAD_REQUEST,
                "Invalid coordinates. Lat: -90..90, Lon: -180..180",
            ));
        }
    }

    let position = position::from_manual(params.lat, params.lon);
    let query = params.q.unwrap_or_default();

    let needle = query.clone();
    let body: Vec<StoreSummary> = with_store(&state, move |state, store| {
        Ok(rank(&state.catalog, position, &needle)
            .into_iter()
            .map(|r| StoreSummary {
                location: r.location.clone(),
                distance_km: r.distance_km,
                distance_label: r.distance_km.map(format_distance),
                average_stars: store.average_stars(r.location.id),
                rating_count: store.rating_count(r.location.id),
            })
            .collect())
    })
    .await?;

    info!(
        query = %query,
        located = position.is_some(),
        results = body.len(),
        elapsed_ms = elapsed_ms(start),
        "GET /api/stores"
    );

    Ok(Json(body))
}

// ─── GET /api/stores/{id} ────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct StoreDetail {
    #[serde(flatten)]
    pub location: Location,
    pub average_stars: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_label: Option<String>,
    pub ratings: Vec<RatingView>,
}

pub async fn store_detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
) -> Result<Json<StoreDetail>, ApiError> {
    let start = Instant::now();

    let location = state
        .catalog
        .get(id)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, format!("Unknown store {}", id)))?;

    let (average_stars, ratings) = with_store(&state, move |_, store| {
        let ratings: Vec<RatingView> = store
            .ratings_for(id)
            .into_iter()
            .cloned()
            .map(RatingView::from)
            .collect();
        Ok((store.average_stars(id), ratings))
    })
    .await?;

    info!(id, ratings = ratings.len(), elapsed_ms = elapsed_ms(start), "GET /api/stores/{{id}}");

    Ok(Json(StoreDetail {
        location: location.clone(),
        average_stars,
        average_label: average_stars.map(format_stars),
        ratings,
    }))
}

// ─── GET /api/leaderboard ────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct LeaderboardQuery {
    pub n: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct LeaderboardRow {
    pub rank: usize,
    pub location: Location,
    pub average_stars: f64,
    pub average_label: String,
    pub rating_count: usize,
}

pub async fn leaderboard(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LeaderboardQuery>,
) -> Result<Json<Vec<LeaderboardRow>>, ApiError> {
    let start = Instant::now();
    let n = params.n.unwrap_or(DEFAULT_TOP_N);

    let rows: Vec<LeaderboardRow> = with_store(&state, move |state, store| {
        Ok(top_n(&state.catalog, store, n)
            .into_iter()
            .enumerate()
            .map(|(i, e)| LeaderboardRow {
                rank: i + 1,
                location: e.location.clone(),
                average_stars: e.average_stars,
                average_label: format_stars(e.average_stars),
                rating_count: e.rating_count,
            })
            .collect())
    })
    .await?;

    info!(n, rows = rows.len(), elapsed_ms = elapsed_ms(start), "GET /api/leaderboard");

    Ok(Json(rows))
}

// ─── POST /api/ratings ───────────────────────────────────────────

pub async fn submit_rating(
    State(state): State<Arc<AppState>>,
    Json(candidate): Json<NewRating>,
) -> Result<(StatusCode, Json<RatingView>), ApiError> {
    let start = Instant::now();

    candidate.validate(&state.catalog)?;

    let saved: Rating = with_store(&state, move |_, store| Ok(store.insert(&candidate)?)).await?;

    info!(
        id = %saved.id,
        location_id = saved.location_id,
        elapsed_ms = elapsed_ms(start),
        "POST /api/ratings"
    );

    Ok((StatusCode::CREATED, Json(RatingView::from(saved))))
}

// ─── POST /api/ratings/reload ────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub count: usize,
}

pub async fn reload(State(state): State<Arc<AppState>>) -> Result<Json<ReloadResponse>, ApiError> {
    let start = Instant::now();

    let count = with_store(&state, |_, store| Ok(store.load_all()?.len())).await?;

    info!(count, elapsed_ms = elapsed_ms(start), "POST /api/ratings/reload");

    Ok(Json(ReloadResponse { count }))
}

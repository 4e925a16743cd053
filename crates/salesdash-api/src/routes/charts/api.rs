//! Chart API endpoints

use axum::extract::{Query, State};
use axum::Json;
use salesdash_core::{CategoryBreakdown, PriceBucket, SalesStatistics};

use crate::routes::params::{period, Params};
use crate::error::{ApiError, WithContext};
use crate::AppState;

/// Sold amount and sold/unsold counts for a month
pub async fn api_statistics(
    State(state): State<AppState>,
    Query(params): Query<Params>,
) -> Result<Json<SalesStatistics>, ApiError> {
    const CONTEXT: &str = "Error fetching statistics";
    let period = period(&params).context(CONTEXT)?;
    log::debug!("statistics for {}", period);
    Ok(Json(state.service.statistics(period).await.context(CONTEXT)?))
}

/// Price-range histogram for a month
pub async fn api_bar_chart(
    State(state): State<AppState>,
    Query(params): Query<Params>,
) -> Result<Json<Vec<PriceBucket>>, ApiError> {
    const CONTEXT: &str = "Error generating bar chart";
    let period = period(&params).context(CONTEXT)?;
    log::debug!("bar chart for {}", period);
    Ok(Json(state.service.price_histogram(period).await.context(CONTEXT)?))
}

/// Per-category counts for a month
pub async fn api_categories_count(
    State(state): State<AppState>,
    Query(params): Query<Params>,
) -> Result<Json<CategoryBreakdown>, ApiError> {
    const CONTEXT: &str = "Error fetching category data";
    let period = period(&params).context(CONTEXT)?;
    log::debug!("categories for {}", period);
    Ok(Json(state.service.category_breakdown(period).await.context(CONTEXT)?))
}

//! Combined API endpoint

use axum::extract::{Query, State};
use axum::Json;
use salesdash_core::CombinedView;

use crate::routes::params::{period, Params};
use crate::error::{ApiError, WithContext};
use crate::AppState;

/// Everything the dashboard shows for a month, in one response
pub async fn api_combined(
    State(state): State<AppState>,
    Query(params): Query<Params>,
) -> Result<Json<CombinedView>, ApiError> {
    const CONTEXT: &str = "Error fetching combined data";
    let period = period(&params).context(CONTEXT)?;
    log::debug!("combined view for {}", period);
    Ok(Json(state.service.combined(period).await.context(CONTEXT)?))
}

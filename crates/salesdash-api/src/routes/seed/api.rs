//! Seed API endpoint

use axum::extract::State;
use axum::Json;
use salesdash_core::SeedReport;

use crate::error::{ApiError, WithContext};
use crate::AppState;

/// Fetch the feed and replace every stored transaction
pub async fn api_initialize_database(State(state): State<AppState>) -> Result<Json<SeedReport>, ApiError> {
    log::info!("Reseed requested");
    let report = state.seeder.initialize().await.context("Error seeding database")?;
    Ok(Json(report))
}

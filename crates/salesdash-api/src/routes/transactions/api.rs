//! Transactions API endpoint

use axum::extract::{Query, State};
use axum::Json;
use salesdash_core::{ListRequest, TransactionPage};

use crate::routes::params::{positive, Params};
use crate::error::{ApiError, WithContext};
use crate::AppState;

const CONTEXT: &str = "Error fetching transactions";

/// Get one page of transactions (JSON API)
pub async fn api_all_transactions(
    State(state): State<AppState>,
    Query(params): Query<Params>,
) -> Result<Json<TransactionPage>, ApiError> {
    let request = ListRequest {
        page: positive(&params, "page").context(CONTEXT)?.unwrap_or(1),
        per_page: positive(&params, "perPage").context(CONTEXT)?,
        search: params.get("search").cloned(),
    };

    let page = state.service.list(request).await.context(CONTEXT)?;
    Ok(Json(page))
}

use axum::{
    extract::{rejection::{JsonRejection, QueryRejection}, Path, Query, State},
    http::StatusCode,
    Json,
};
use models::subscription::Model as Subscription;
use service::subscription::domain::{CreateSubscriptionInput, ListQuery, TotalCost, UpdateSubscriptionInput};
use tracing::info;

use crate::{errors::JsonApiError, routes::AppState};

#[utoipa::path(
    post, path = "/api/v1/subscriptions/", tag = "subscriptions",
    request_body = crate::openapi::CreateSubscriptionDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::SubscriptionDoc),
        (status = 400, description = "Invalid Input"),
        (status = 500, description = "Storage Error")
    )
)]
pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<CreateSubscriptionInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Subscription>), JsonApiError> {
    let Json(input) = body?;
    let sub = state.subscriptions.create(input).await?;
    Ok((StatusCode::CREATED, Json(sub)))
}

#[utoipa::path(
    get, path = "/api/v1/subscriptions/", tag = "subscriptions",
    params(crate::openapi::ListQueryDoc),
    responses(
        (status = 200, description = "List OK", body = [crate::openapi::SubscriptionDoc]),
        (status = 400, description = "Invalid Filter"),
        (status = 500, description = "Storage Error")
    )
)]
pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<Subscription>>, JsonApiError> {
    let Query(q) = query?;
    let rows = state.subscriptions.list(&q).await?;
    info!(count = rows.len(), "list subscriptions");
    Ok(Json(rows))
}

#[utoipa::path(
    get, path = "/api/v1/subscriptions/total", tag = "subscriptions",
    params(crate::openapi::ListQueryDoc),
    responses(
        (status = 200, description = "Total OK", body = crate::openapi::TotalCostDoc),
        (status = 400, description = "Invalid Filter"),
        (status = 500, description = "Storage Error")
    )
)]
pub async fn total(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<TotalCost>, JsonApiError> {
    let Query(q) = query?;
    Ok(Json(state.subscriptions.total_cost(&q).await?))
}

#[utoipa::path(
    get, path = "/api/v1/subscriptions/{id}", tag = "subscriptions",
    params(("id" = String, Path, description = "Subscription ID")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::SubscriptionDoc),
        (status = 400, description = "Invalid ID"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Subscription>, JsonApiError> {
    Ok(Json(state.subscriptions.get(&id).await?))
}

#[utoipa::path(
    put, path = "/api/v1/subscriptions/{id}", tag = "subscriptions",
    params(("id" = String, Path, description = "Subscription ID")),
    request_body = crate::openapi::UpdateSubscriptionDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::SubscriptionDoc),
        (status = 400, description = "Invalid Input"),
        (status = 404, description = "Not Found"),
        (status = 500, description = "Storage Error")
    )
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<UpdateSubscriptionInput>, JsonRejection>,
) -> Result<Json<Subscription>, JsonApiError> {
    let Json(input) = body?;
    Ok(Json(state.subscriptions.update(&id, input).await?))
}

#[utoipa::path(
    delete, path = "/api/v1/subscriptions/{id}", tag = "subscriptions",
    params(("id" = String, Path, description = "Subscription ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 400, description = "Invalid ID"),
        (status = 500, description = "Storage Error")
    )
)]
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> Result<StatusCode, JsonApiError> {
    state.subscriptions.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

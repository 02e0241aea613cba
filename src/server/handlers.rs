use crate::domain::model::{
    Actor, Advertisement, AdvertisementFilter, AdvertisementId, AdvertisementPayload,
};
use crate::server::extract::{ApiJson, ApiPath, ApiQuery};
use crate::server::AppState;
use crate::utils::error::AdError;
use axum::{extract::State, http::StatusCode, Extension, Json};
use tracing::instrument;

type ApiResult<T> = Result<T, AdError>;

#[instrument(name = "advertisements.list", skip(state, actor))]
pub async fn list_advertisements(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    ApiQuery(filter): ApiQuery<AdvertisementFilter>,
) -> ApiResult<Json<Vec<Advertisement>>> {
    let ads = state.service.list(&actor, &filter).await?;
    Ok(Json(ads))
}

#[instrument(name = "advertisements.retrieve", skip(state, actor))]
pub async fn retrieve_advertisement(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    ApiPath(id): ApiPath<AdvertisementId>,
) -> ApiResult<Json<Advertisement>> {
    Ok(Json(state.service.retrieve(&actor, id).await?))
}

#[instrument(name = "advertisements.create", skip(state, actor, payload))]
pub async fn create_advertisement(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    ApiJson(payload): ApiJson<AdvertisementPayload>,
) -> ApiResult<(StatusCode, Json<Advertisement>)> {
    let ad = state.service.create(&actor, payload).await?;
    Ok((StatusCode::CREATED, Json(ad)))
}

#[instrument(name = "advertisements.update", skip(state, actor, payload))]
pub async fn update_advertisement(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    ApiPath(id): ApiPath<AdvertisementId>,
    ApiJson(payload): ApiJson<AdvertisementPayload>,
) -> ApiResult<Json<Advertisement>> {
    Ok(Json(state.service.update(&actor, id, payload).await?))
}

#[instrument(name = "advertisements.partial_update", skip(state, actor, payload))]
pub async fn partial_update_advertisement(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    ApiPath(id): ApiPath<AdvertisementId>,
    ApiJson(payload): ApiJson<AdvertisementPayload>,
) -> ApiResult<Json<Advertisement>> {
    Ok(Json(state.service.partial_update(&actor, id, payload).await?))
}

#[instrument(name = "advertisements.destroy", skip(state, actor))]
pub async fn destroy_advertisement(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    ApiPath(id): ApiPath<AdvertisementId>,
) -> ApiResult<StatusCode> {
    state.service.destroy(&actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

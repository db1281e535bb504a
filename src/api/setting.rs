use actix_web::{HttpResponse, web};
use tracing::info;

use crate::{
    error::ApiError,
    model::setting::{Setting, SettingUpdate},
    models::MessageResponse,
    store::Stores,
};

#[utoipa::path(
    get,
    path = "/api/setting",
    responses(
        (status = 200, description = "All settings records", body = Vec<Setting>),
        (status = 500, description = "Internal server error", body = MessageResponse)
    ),
    tag = "Setting"
)]
pub async fn list_settings(stores: web::Data<Stores>) -> Result<HttpResponse, ApiError> {
    let settings = stores.settings.all().await?;
    Ok(HttpResponse::Ok().json(settings))
}

#[utoipa::path(
    get,
    path = "/api/setting/{id}",
    params(("id" = u64, Path, description = "Setting ID")),
    responses(
        (status = 200, description = "Setting found", body = Setting),
        (status = 404, description = "Setting not found", body = MessageResponse)
    ),
    tag = "Setting"
)]
pub async fn get_setting(
    stores: web::Data<Stores>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    match stores.settings.find_by_id(path.into_inner()).await? {
        Some(setting) => Ok(HttpResponse::Ok().json(setting)),
        None => Err(ApiError::NotFound("Setting")),
    }
}

#[utoipa::path(
    put,
    path = "/api/setting/{id}",
    params(("id" = u64, Path, description = "Setting ID")),
    request_body = SettingUpdate,
    responses(
        (status = 200, description = "Setting updated", body = Setting),
        (status = 400, description = "Empty update", body = MessageResponse),
        (status = 404, description = "Setting not found", body = MessageResponse)
    ),
    tag = "Setting"
)]
pub async fn update_setting(
    stores: web::Data<Stores>,
    path: web::Path<u64>,
    payload: web::Json<SettingUpdate>,
) -> Result<HttpResponse, ApiError> {
    let setting_id = path.into_inner();

    if payload.is_empty() {
        return Err(ApiError::EmptyUpdate);
    }

    match stores.settings.update(setting_id, &payload).await? {
        Some(setting) => {
            info!(setting_id, "Settings updated");
            Ok(HttpResponse::Ok().json(setting))
        }
        None => Err(ApiError::NotFound("Setting")),
    }
}

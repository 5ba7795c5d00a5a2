use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;

use shiftbook_core::EmployerService;
use shiftbook_types::Envelope;
use shiftbook_types::api::{Claims, CreateEmployerRequest, UpdateEmployerRequest};
use shiftbook_types::models::{EmployerPatch, NewEmployer};

use crate::error::ApiResult;
use crate::state::{AppState, run_blocking};
use crate::validation::{MAX_EMPLOYER_NAME_LEN, validate_hourly_rate, validate_required_text};

pub async fn list_employers(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<impl IntoResponse> {
    let owner = claims.sub.to_string();
    let employers =
        run_blocking(&state, move |db| EmployerService::new(db).list_employers(&owner)).await?;

    Ok(Json(Envelope::success(employers)))
}

pub async fn get_employer(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let owner = claims.sub.to_string();
    let employer = run_blocking(&state, move |db| {
        EmployerService::new(db).get_employer_by_id(&owner, &id)
    })
    .await?;

    Ok(Json(Envelope::success(employer)))
}

pub async fn create_employer(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    payload: Result<Json<CreateEmployerRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(req) = payload?;
    validate_required_text(&req.name, "name", MAX_EMPLOYER_NAME_LEN)?;
    validate_hourly_rate(req.hourly_rate)?;
    let input = NewEmployer {
        name: req.name.trim().to_string(),
        hourly_rate: req.hourly_rate,
    };

    let owner = claims.sub.to_string();
    let employer = run_blocking(&state, move |db| {
        EmployerService::new(db).create_employer(&owner, input)
    })
    .await?;

    info!(employer_id = %employer.id, user_id = %claims.sub, "employer created");
    Ok((
        StatusCode::CREATED,
        Json(Envelope::success_with_message(employer, "Employer created")),
    ))
}

pub async fn update_employer(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateEmployerRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(req) = payload?;
    if let Some(name) = &req.name {
        validate_required_text(name, "name", MAX_EMPLOYER_NAME_LEN)?;
    }
    if let Some(rate) = req.hourly_rate {
        validate_hourly_rate(rate)?;
    }
    let patch = EmployerPatch {
        name: req.name.map(|n| n.trim().to_string()),
        hourly_rate: req.hourly_rate,
    };

    let owner = claims.sub.to_string();
    let employer = run_blocking(&state, move |db| {
        EmployerService::new(db).update_employer(&owner, &id, patch)
    })
    .await?;

    Ok(Json(Envelope::success_with_message(employer, "Employer updated")))
}

pub async fn delete_employer(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let owner = claims.sub.to_string();
    let employer_id = id.clone();
    run_blocking(&state, move |db| {
        EmployerService::new(db).delete_employer(&owner, &id)
    })
    .await?;

    info!(%employer_id, user_id = %claims.sub, "employer deleted");
    Ok(Json(Envelope::<()>::message("Employer deleted")))
}
